use sea_orm::{ColumnTrait, DbErr, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::db::postgres_service::PostgresService;
use crate::types::error::StoreError;
use crate::types::team::{Role, Team, TeamMember};

impl PostgresService {
    /// Load a team with its full membership roster, ready for guardian
    /// decisions.
    pub async fn get_team(&self, id: Uuid) -> Result<Team, StoreError> {
        let team = entity::team::Entity::find_by_id(id)
            .one(&self.database_connection)
            .await
            .map_err(StoreError::Db)?
            .ok_or(StoreError::NotFound)?;

        let rows = entity::membership::Entity::find()
            .filter(entity::membership::Column::TeamId.eq(id))
            .all(&self.database_connection)
            .await
            .map_err(StoreError::Db)?;

        let mut members = Vec::with_capacity(rows.len());
        for row in rows {
            let role: Role = row
                .role
                .parse()
                .map_err(|e: String| StoreError::Db(DbErr::Custom(e)))?;
            members.push(TeamMember {
                user_id: row.user_id,
                role,
            });
        }

        Ok(Team {
            id: team.id,
            name: team.name,
            members,
        })
    }
}
