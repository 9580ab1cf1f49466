use crate::guardian::Actor;
use crate::types::user::UserRecord;

pub fn can_see_user(actor: &Actor, user: &UserRecord) -> bool {
    is_me(actor, user) || actor.is_admin()
}

/// Alias of [`can_see_user`]; the rules are identical today.
pub fn can_edit_user(actor: &Actor, user: &UserRecord) -> bool {
    can_see_user(actor, user)
}

fn is_me(actor: &Actor, user: &UserRecord) -> bool {
    actor.user_id().is_some_and(|id| id == user.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn record(id: Uuid, admin: bool) -> UserRecord {
        let now = Utc::now();
        UserRecord {
            id,
            email: format!("{id}@example.com"),
            password_digest: String::new(),
            activated: true,
            activated_at: Some(now),
            activation_digest: None,
            reset_digest: None,
            reset_sent_at: None,
            remember_digest: None,
            authentication_token: format!("tok_{id}"),
            admin,
            partially_registered: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn users_see_themselves_but_not_others() {
        let a = record(Uuid::new_v4(), false);
        let b = record(Uuid::new_v4(), false);

        assert!(can_see_user(&Actor::from_user(&a), &a));
        assert!(!can_see_user(&Actor::from_user(&a), &b));
    }

    #[test]
    fn admins_see_everyone() {
        let admin = record(Uuid::new_v4(), true);
        let other = record(Uuid::new_v4(), false);

        assert!(can_see_user(&Actor::from_user(&admin), &other));
    }

    #[test]
    fn anonymous_actors_see_no_one() {
        let target = record(Uuid::new_v4(), false);
        assert!(!can_see_user(&Actor::Anonymous, &target));
    }

    #[test]
    fn edit_mirrors_see_exactly() {
        let a = record(Uuid::new_v4(), false);
        let b = record(Uuid::new_v4(), false);
        let admin = record(Uuid::new_v4(), true);

        for actor in [Actor::from_user(&a), Actor::from_user(&admin), Actor::Anonymous] {
            assert_eq!(can_see_user(&actor, &b), can_edit_user(&actor, &b));
        }
    }
}
