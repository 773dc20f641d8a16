//! Who may do what.
//!
//! Every role-gated operation names an [`Action`] and asks [`authorize`]
//! before touching a store, so the whole permission model lives in
//! [`permits`].

use crate::{
    error::Error,
    models::{Role, User},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateClub,
    ApproveClub,
    RejectClub,
    ListPendingClubs,
    SetupClub,
    SubmitClub,
    ViewClub,
    CreateAnnouncement,
    CreateNote,
    CreatePost,
    LikePost,
    CreateEvent,
    RegisterForEvent,
    ManageLocations,
    CreateWhatsappGroup,
}

impl Action {
    fn denial(self) -> &'static str {
        match self {
            Action::ApproveClub => "only principal can approve clubs",
            Action::RejectClub => "only principal can reject clubs",
            Action::ListPendingClubs => "only principal can view pending clubs",
            Action::SetupClub => "only the club's creator can set it up",
            Action::SubmitClub => "only the club's creator can submit it",
            Action::ViewClub => "only the club's creator can view it before it is live",
            Action::CreateAnnouncement => "only principal can create announcements",
            Action::CreateNote => "only lecturers can create notes",
            Action::CreateEvent => "only staff can create events",
            Action::ManageLocations => "only staff can manage locations",
            Action::CreateClub
            | Action::CreatePost
            | Action::LikePost
            | Action::RegisterForEvent
            | Action::CreateWhatsappGroup => "not allowed",
        }
    }
}

/// The caller's relation to the record an action targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    Owner,
    NotOwner,
    /// The action does not target an owned record.
    Unowned,
}

impl Ownership {
    pub fn of(owner_id: &str, caller: &User) -> Self {
        if owner_id == caller.id {
            Ownership::Owner
        } else {
            Ownership::NotOwner
        }
    }
}

pub fn permits(action: Action, role: Role, ownership: Ownership) -> bool {
    use Action::*;

    let staff = matches!(role, Role::Lecturer | Role::Principal);
    match action {
        CreateClub | CreatePost | LikePost | RegisterForEvent | CreateWhatsappGroup => true,
        ApproveClub | RejectClub | ListPendingClubs | CreateAnnouncement => {
            role == Role::Principal
        }
        SetupClub | SubmitClub => ownership == Ownership::Owner,
        ViewClub => ownership == Ownership::Owner || role == Role::Principal,
        CreateNote => role == Role::Lecturer,
        CreateEvent | ManageLocations => staff,
    }
}

pub fn authorize(action: Action, caller: &User, ownership: Ownership) -> Result<(), Error> {
    if permits(action, caller.role, ownership) {
        Ok(())
    } else {
        tracing::debug!(?action, user = %caller.id, role = %caller.role, "denied");
        Err(Error::Forbidden(action.denial().into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Ownership::*;
    use Role::*;

    const ROLES: [Role; 3] = [Student, Lecturer, Principal];

    #[test]
    fn review_is_principal_only() {
        for action in [Action::ApproveClub, Action::RejectClub, Action::ListPendingClubs] {
            assert!(!permits(action, Student, Unowned));
            assert!(!permits(action, Lecturer, Unowned));
            assert!(permits(action, Principal, Unowned));
            // creating the club gives no say over its review
            assert!(!permits(action, Student, Owner));
        }
    }

    #[test]
    fn creator_actions_ignore_role() {
        for role in ROLES {
            for action in [Action::SetupClub, Action::SubmitClub] {
                assert!(permits(action, role, Owner));
                assert!(!permits(action, role, NotOwner));
            }
        }
    }

    #[test]
    fn principal_sees_unpublished_clubs() {
        assert!(permits(Action::ViewClub, Principal, NotOwner));
        assert!(permits(Action::ViewClub, Student, Owner));
        assert!(!permits(Action::ViewClub, Lecturer, NotOwner));
    }

    #[test]
    fn content_roles() {
        assert!(permits(Action::CreateNote, Lecturer, Unowned));
        assert!(!permits(Action::CreateNote, Principal, Unowned));
        assert!(permits(Action::CreateAnnouncement, Principal, Unowned));
        assert!(!permits(Action::CreateAnnouncement, Lecturer, Unowned));
        assert!(!permits(Action::CreateEvent, Student, Unowned));
        assert!(!permits(Action::ManageLocations, Student, Unowned));
        for role in ROLES {
            assert!(permits(Action::CreateClub, role, Unowned));
            assert!(permits(Action::CreatePost, role, Unowned));
        }
    }

    #[test]
    fn denial_names_the_rule() {
        let user = User {
            id: "u1".into(),
            username: "1RN21CS001".into(),
            password: crate::auth::Credential::Plain("x".into()),
            role: Student,
        };
        match authorize(Action::ApproveClub, &user, Unowned) {
            Err(Error::Forbidden(msg)) => assert_eq!(msg, "only principal can approve clubs"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
