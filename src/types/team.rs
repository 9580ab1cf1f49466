use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Team-scoped role carried by a membership row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Lead,
    Member,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Lead => "lead",
            Role::Member => "member",
        }
    }

    /// Staff covers the roles that run a team day to day.
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Owner | Role::Lead)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(Role::Owner),
            "lead" => Ok(Role::Lead),
            "member" => Ok(Role::Member),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub user_id: Uuid,
    pub role: Role,
}

/// A team with its membership roster loaded, enough for the guardian layer
/// to answer staff/owner questions without touching the store again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    pub members: Vec<TeamMember>,
}

impl Team {
    pub fn is_owner(&self, user_id: Uuid) -> bool {
        self.members
            .iter()
            .any(|m| m.user_id == user_id && m.role == Role::Owner)
    }

    pub fn is_staff(&self, user_id: Uuid) -> bool {
        self.members
            .iter()
            .any(|m| m.user_id == user_id && m.role.is_staff())
    }
}

/// A membership a caller is asking to create. The team is optional on
/// purpose: the guardian treats an absent team as a denial, not an error.
#[derive(Debug, Clone)]
pub struct NewMembership<'a> {
    pub team: Option<&'a Team>,
    pub user_id: Uuid,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_strings() {
        for role in [Role::Owner, Role::Lead, Role::Member] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn staff_covers_owner_and_lead_only() {
        assert!(Role::Owner.is_staff());
        assert!(Role::Lead.is_staff());
        assert!(!Role::Member.is_staff());
    }
}
