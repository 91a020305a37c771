//! Per-connection session state
//!
//! Each live connection owns exactly one `Session`. It starts anonymous,
//! becomes authenticated on a successful login, and reverts to anonymous
//! on logout. The value is never shared across connections and is never
//! persisted; the authenticated variant carries only the client id and
//! first name, never the password.

use super::client::ClientId;

/// Authentication state of one connection
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    /// No login has succeeded yet (or a logout reverted the session)
    #[default]
    Anonymous,

    /// A login succeeded; requests act on behalf of this client
    Authenticated {
        /// Id of the logged-in client
        client_id: ClientId,
        /// First name, kept for greeting responses
        first_name: String,
    },
}

impl Session {
    /// Create the initial anonymous session for a new connection
    pub fn new() -> Self {
        Session::Anonymous
    }

    /// True once a login has succeeded
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated { .. })
    }

    /// Id of the authenticated client, if any
    pub fn client_id(&self) -> Option<ClientId> {
        match self {
            Session::Anonymous => None,
            Session::Authenticated { client_id, .. } => Some(*client_id),
        }
    }

    /// Transition to the authenticated state
    pub fn login(&mut self, client_id: ClientId, first_name: String) {
        *self = Session::Authenticated {
            client_id,
            first_name,
        };
    }

    /// Revert to anonymous, returning the first name that was logged in
    ///
    /// Returns `None` if the session was already anonymous.
    pub fn logout(&mut self) -> Option<String> {
        match std::mem::take(self) {
            Session::Anonymous => None,
            Session::Authenticated { first_name, .. } => Some(first_name),
        }
    }
}
