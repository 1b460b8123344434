use tracing::{debug, warn};

use crate::error::AppResult;
use crate::storage::SlotStorage;

use super::principal::Identity;
use super::session::{Credential, Session};

/// Slot holding the raw bearer credential.
pub const TOKEN_SLOT: &str = "adminToken";
/// Slot holding the JSON-serialized identity.
pub const IDENTITY_SLOT: &str = "adminInfo";

/// Persists the session in two slots that are always written and cleared together.
///
/// Writes put the identity down first and the credential last; clears remove the
/// credential first. An interrupted write therefore leaves at most an identity
/// without a credential, which `load` treats as anonymous and cleans up.
pub struct SessionStore<S: SlotStorage> {
    slots: S,
}

impl<S: SlotStorage> SessionStore<S> {
    pub fn new(slots: S) -> Self { Self { slots } }

    pub fn slots(&self) -> &S { &self.slots }

    /// Restore the persisted session. Never fails: unreadable or inconsistent
    /// state degrades to an anonymous session and the slots are cleared.
    pub fn load(&self) -> Session {
        let token = match self.slots.get(TOKEN_SLOT) {
            Ok(v) => v,
            Err(e) => {
                warn!(target: "civic::session", "session.load token slot unreadable: {}", e);
                self.discard();
                return Session::anonymous();
            }
        };
        let info = match self.slots.get(IDENTITY_SLOT) {
            Ok(v) => v,
            Err(e) => {
                warn!(target: "civic::session", "session.load identity slot unreadable: {}", e);
                self.discard();
                return Session::anonymous();
            }
        };
        match (token, info) {
            (None, None) => Session::anonymous(),
            (Some(token), Some(raw)) => {
                let credential = Credential::new(token);
                if credential.is_empty() {
                    debug!(target: "civic::session", "session.load empty credential; clearing");
                    self.discard();
                    return Session::anonymous();
                }
                match serde_json::from_str::<Identity>(&raw) {
                    Ok(identity) => {
                        debug!(target: "civic::session", "session.load restored user={} role={}", identity.username, identity.role);
                        Session::authenticated(credential, identity)
                    }
                    Err(e) => {
                        debug!(target: "civic::session", "session.load malformed identity ({}); clearing", e);
                        self.discard();
                        Session::anonymous()
                    }
                }
            }
            (Some(_), None) => {
                debug!(target: "civic::session", "session.load credential without identity; clearing");
                self.discard();
                Session::anonymous()
            }
            (None, Some(_)) => {
                debug!(target: "civic::session", "session.load stale identity without credential; clearing");
                self.discard();
                Session::anonymous()
            }
        }
    }

    /// Persist `session`; an anonymous session removes both slots.
    pub fn save(&self, session: &Session) -> AppResult<()> {
        match (session.credential(), session.identity()) {
            (Some(credential), Some(identity)) => {
                let raw = serde_json::to_string(identity)
                    .map_err(|e| crate::error::AppError::internal("identity_encode".to_string(), e.to_string()))?;
                self.slots.put(IDENTITY_SLOT, &raw)?;
                if let Err(e) = self.slots.put(TOKEN_SLOT, credential.as_str()) {
                    // leave nothing half-written behind
                    if let Err(re) = self.slots.remove(IDENTITY_SLOT) {
                        warn!(target: "civic::session", "session.save could not roll back identity slot: {}", re);
                    }
                    return Err(e.into());
                }
                Ok(())
            }
            _ => self.clear(),
        }
    }

    /// Remove both slots.
    pub fn clear(&self) -> AppResult<()> {
        self.slots.remove(TOKEN_SLOT)?;
        self.slots.remove(IDENTITY_SLOT)?;
        Ok(())
    }

    fn discard(&self) {
        if let Err(e) = self.clear() {
            warn!(target: "civic::session", "session.load could not clear slots: {}", e);
        }
    }
}
