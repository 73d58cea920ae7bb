use crate::domain::datatype::security::PasswordHash;

use super::{impl_entity, state_copy, state_ref, EntityData, EntityState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserState {
    pub(in crate::domain) email: String,
    pub(in crate::domain) first_name: String,
    pub(in crate::domain) last_name: String,
    pub(in crate::domain) password_hash: PasswordHash,
    pub(in crate::domain) is_staff: bool,
}

/// Account of a participant or an organizer.
///
/// The email is the username, stored lowercase.
#[derive(Debug, Clone)]
pub struct User {
    pub(in crate::domain) data: EntityData,
    pub(in crate::domain) state: UserState,
}

impl EntityState for User {
    type State = UserState;
}

impl_entity!(User);

impl User {
    state_ref!(email, String);
    state_ref!(first_name, String);
    state_ref!(last_name, String);
    state_ref!(password_hash, PasswordHash);
    state_copy!(is_staff, bool);

    pub fn new(
        email: String,
        first_name: String,
        last_name: String,
        password_hash: PasswordHash,
    ) -> Self {
        Self::restore(
            EntityData::new(),
            UserState {
                email: email.to_lowercase(),
                first_name,
                last_name,
                password_hash,
                is_staff: false,
            },
        )
    }

    pub fn change_password(&mut self, password_hash: PasswordHash) {
        self.state.password_hash = password_hash;
        self.data.touch();
    }
}
