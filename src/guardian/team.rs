use crate::guardian::Actor;
use crate::types::team::{NewMembership, Role, Team};

pub fn can_see_team(actor: &Actor, team: &Team) -> bool {
    actor.is_admin() || is_staff_of(actor, team)
}

/// Same rule as [`can_see_team`], kept as a separate entry point on
/// purpose: view and edit share one rule today and callers should not
/// start depending on them being the same function.
pub fn can_edit_team(actor: &Actor, team: &Team) -> bool {
    actor.is_admin() || is_staff_of(actor, team)
}

/// Membership provisioning. Owners and admins may create any role; staff
/// may only provision equal-or-lower roles, never a new owner.
pub fn can_create_membership(actor: &Actor, membership: Option<&NewMembership<'_>>) -> bool {
    if actor.is_anonymous() {
        return false;
    }
    let Some(membership) = membership else {
        return false;
    };
    let Some(team) = membership.team else {
        return false;
    };

    actor.is_admin()
        || is_owner_of(actor, team)
        || (is_staff_of(actor, team) && matches!(membership.role, Role::Lead | Role::Member))
}

fn is_owner_of(actor: &Actor, team: &Team) -> bool {
    actor.user_id().is_some_and(|id| team.is_owner(id))
}

fn is_staff_of(actor: &Actor, team: &Team) -> bool {
    actor.user_id().is_some_and(|id| team.is_staff(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::team::TeamMember;
    use uuid::Uuid;

    fn team_with(members: &[(Uuid, Role)]) -> Team {
        Team {
            id: Uuid::new_v4(),
            name: "ops".to_string(),
            members: members
                .iter()
                .map(|&(user_id, role)| TeamMember { user_id, role })
                .collect(),
        }
    }

    fn user(id: Uuid) -> Actor {
        Actor::User { id, admin: false }
    }

    fn admin() -> Actor {
        Actor::User {
            id: Uuid::new_v4(),
            admin: true,
        }
    }

    fn request<'a>(team: Option<&'a Team>, role: Role) -> NewMembership<'a> {
        NewMembership {
            team,
            user_id: Uuid::new_v4(),
            role,
        }
    }

    #[test]
    fn team_visibility_requires_admin_or_staff() {
        let staff_id = Uuid::new_v4();
        let member_id = Uuid::new_v4();
        let team = team_with(&[(staff_id, Role::Lead), (member_id, Role::Member)]);

        assert!(can_see_team(&admin(), &team));
        assert!(can_see_team(&user(staff_id), &team));
        assert!(!can_see_team(&user(member_id), &team));
        assert!(!can_see_team(&user(Uuid::new_v4()), &team));
        assert!(!can_see_team(&Actor::Anonymous, &team));
    }

    #[test]
    fn edit_mirrors_see() {
        let lead_id = Uuid::new_v4();
        let team = team_with(&[(lead_id, Role::Lead)]);
        let actors = [
            admin(),
            user(lead_id),
            user(Uuid::new_v4()),
            Actor::Anonymous,
        ];
        for actor in actors {
            assert_eq!(can_see_team(&actor, &team), can_edit_team(&actor, &team));
        }
    }

    #[test]
    fn staff_may_only_provision_equal_or_lower_roles() {
        let lead_id = Uuid::new_v4();
        let team = team_with(&[(lead_id, Role::Lead)]);
        let staff = user(lead_id);

        assert!(can_create_membership(&staff, Some(&request(Some(&team), Role::Member))));
        assert!(can_create_membership(&staff, Some(&request(Some(&team), Role::Lead))));
        assert!(!can_create_membership(&staff, Some(&request(Some(&team), Role::Owner))));
    }

    #[test]
    fn owners_and_admins_may_provision_owners() {
        let owner_id = Uuid::new_v4();
        let team = team_with(&[(owner_id, Role::Owner)]);

        assert!(can_create_membership(
            &user(owner_id),
            Some(&request(Some(&team), Role::Owner))
        ));
        assert!(can_create_membership(
            &admin(),
            Some(&request(Some(&team), Role::Owner))
        ));
    }

    #[test]
    fn missing_entities_and_anonymous_actors_are_denied() {
        let team = team_with(&[]);

        assert!(!can_create_membership(
            &Actor::Anonymous,
            Some(&request(Some(&team), Role::Member))
        ));
        assert!(!can_create_membership(&admin(), None));
        assert!(!can_create_membership(&admin(), Some(&request(None, Role::Member))));
    }

    #[test]
    fn plain_members_cannot_provision_anyone() {
        let member_id = Uuid::new_v4();
        let team = team_with(&[(member_id, Role::Member)]);

        assert!(!can_create_membership(
            &user(member_id),
            Some(&request(Some(&team), Role::Member))
        ));
    }
}
