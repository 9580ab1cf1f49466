use sea_orm::{Database, DatabaseConnection, DbErr};
use tracing::info;

/// sea-orm backed store. Schema lives with the deployment's migration
/// tooling; this service only reads and writes it.
#[derive(Clone)]
pub struct PostgresService {
    pub(crate) database_connection: DatabaseConnection,
}

impl PostgresService {
    pub async fn new(uri: &str) -> Result<Self, DbErr> {
        info!("Connecting to PostgreSQL...");
        let database_connection = Database::connect(uri).await?;
        info!("Connected to PostgreSQL.");
        Ok(Self {
            database_connection,
        })
    }
}
