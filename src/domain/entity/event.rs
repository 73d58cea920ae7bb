use uuid::Uuid;

use crate::domain::datatype::team_code::TeamCode;

use super::{impl_entity, state_copy, state_ref, EntityData, EntityState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventTeamState {
    pub(in crate::domain) team_code: TeamCode,
}

/// Team of accepted participants during the event.
///
/// Shares the code of the registration team it was created from.
#[derive(Debug, Clone)]
pub struct EventTeam {
    pub(in crate::domain) data: EntityData,
    pub(in crate::domain) state: EventTeamState,
}

impl EntityState for EventTeam {
    type State = EventTeamState;
}

impl_entity!(EventTeam);

impl EventTeam {
    state_ref!(team_code, TeamCode);

    pub fn new(team_code: TeamCode) -> Self {
        Self::restore(EntityData::new(), EventTeamState { team_code })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileState {
    pub(in crate::domain) user_id: Uuid,
    pub(in crate::domain) team_id: Uuid,
    pub(in crate::domain) id_provided: bool,
    pub(in crate::domain) attended: bool,
    pub(in crate::domain) acknowledge_rules: bool,
    pub(in crate::domain) e_signature: Option<String>,
    pub(in crate::domain) phone_number: String,
}

#[derive(Debug, Clone)]
pub struct Profile {
    pub(in crate::domain) data: EntityData,
    pub(in crate::domain) state: ProfileState,
}

impl EntityState for Profile {
    type State = ProfileState;
}

impl_entity!(Profile);

impl Profile {
    state_copy!(user_id, Uuid);
    state_copy!(team_id, Uuid);
    state_copy!(id_provided, bool);
    state_copy!(attended, bool);
    state_copy!(acknowledge_rules, bool);
    state_ref!(e_signature, Option<String>);
    state_ref!(phone_number, String);

    pub fn new(
        user_id: Uuid,
        team_id: Uuid,
        phone_number: String,
        acknowledge_rules: bool,
        e_signature: String,
    ) -> Self {
        Self::restore(
            EntityData::new(),
            ProfileState {
                user_id,
                team_id,
                id_provided: false,
                attended: false,
                acknowledge_rules,
                e_signature: Some(e_signature),
                phone_number,
            },
        )
    }

    /// Fields a participant can change on their own profile.
    pub fn sign_rules(&mut self, acknowledge_rules: bool, e_signature: Option<String>) {
        self.state.acknowledge_rules = acknowledge_rules;
        self.state.e_signature = e_signature;
        self.data.touch();
    }

    /// Fields set by organizers at the check-in desk.
    pub fn check_in(&mut self, id_provided: bool, attended: bool) {
        self.state.id_provided = id_provided;
        self.state.attended = attended;
        self.data.touch();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserActivityState {
    pub(in crate::domain) user_id: Uuid,
    pub(in crate::domain) sign_in_event: String,
    pub(in crate::domain) signed_in_by: Uuid,
}

/// Attendance of a participant at one of the sign in times.
#[derive(Debug, Clone)]
pub struct UserActivity {
    pub(in crate::domain) data: EntityData,
    pub(in crate::domain) state: UserActivityState,
}

impl EntityState for UserActivity {
    type State = UserActivityState;
}

impl_entity!(UserActivity);

impl UserActivity {
    state_copy!(user_id, Uuid);
    state_ref!(sign_in_event, String);
    state_copy!(signed_in_by, Uuid);

    pub fn new(user_id: Uuid, sign_in_event: String, signed_in_by: Uuid) -> Self {
        Self::restore(
            EntityData::new(),
            UserActivityState {
                user_id,
                sign_in_event,
                signed_in_by,
            },
        )
    }
}
