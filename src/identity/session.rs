use std::fmt;

use super::principal::{Identity, Role};

/// Opaque bearer token issued by the backend at login.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self { Credential(token.into()) }

    pub fn as_str(&self) -> &str { &self.0 }

    pub fn is_empty(&self) -> bool { self.0.trim().is_empty() }

    /// Value for an `Authorization` header.
    pub fn bearer(&self) -> String { format!("Bearer {}", self.0) }
}

// Tokens never end up in logs.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str("Credential(<redacted>)") }
}

impl From<&str> for Credential {
    fn from(s: &str) -> Self { Credential::new(s) }
}

impl From<String> for Credential {
    fn from(s: String) -> Self { Credential(s) }
}

/// Current login state: anonymous, or a credential paired with its identity.
///
/// Credential and identity live in a single `Option`, so a session holding one
/// without the other cannot be built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    auth: Option<(Credential, Identity)>,
}

impl Session {
    pub fn anonymous() -> Self { Self { auth: None } }

    pub fn authenticated(credential: Credential, identity: Identity) -> Self {
        Self { auth: Some((credential, identity)) }
    }

    pub fn is_authenticated(&self) -> bool { self.auth.is_some() }

    pub fn credential(&self) -> Option<&Credential> { self.auth.as_ref().map(|(c, _)| c) }

    pub fn identity(&self) -> Option<&Identity> { self.auth.as_ref().map(|(_, i)| i) }

    pub fn role(&self) -> Option<&Role> { self.identity().map(|i| &i.role) }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.identity() {
            Some(i) => write!(f, "{}@{}", i.username, i.role),
            None => f.write_str("anonymous"),
        }
    }
}
