//! Session identity for one client run
//!
//! A [`SessionIdentity`] is created once when the client starts and tags
//! every query request sent to the decision service. The backend uses it
//! to group queries; it is not a credential.

use std::fmt;
use ulid::Ulid;

/// Opaque token identifying this running client instance
///
/// The value is a ULID, so it is time-ordered and practically unique across
/// runs. There is no way to change it after creation; clones carry the same
/// value.
///
/// # Examples
///
/// ```
/// use claimdesk::session::SessionIdentity;
///
/// let identity = SessionIdentity::create();
/// let copy = identity.clone();
/// assert_eq!(identity, copy);
/// assert_eq!(identity.as_str().len(), 26);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionIdentity(String);

impl SessionIdentity {
    /// Generate a new identity
    pub fn create() -> Self {
        let identity = Self(Ulid::new().to_string());
        tracing::debug!(session_id = %identity, "Created session identity");
        identity
    }

    /// Token value as sent on the wire
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
