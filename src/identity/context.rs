use parking_lot::{RwLock, RwLockWriteGuard};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::storage::SlotStorage;
use crate::tprintln;

use super::authorizer::landing_path;
use super::principal::{Identity, Role};
use super::provider::{AuthProvider, LoginRequest};
use super::session::{Credential, Session};
use super::store::SessionStore;

/// Callback the request layer invokes when the backend answers 401.
///
/// `sent_with` is the credential the rejected request carried, `None` when it
/// went out without one.
pub trait UnauthorizedHandler: Send + Sync {
    fn on_unauthorized(&self, sent_with: Option<&Credential>);
}

/// Read side of the session the request layer needs.
pub trait CredentialSource: Send + Sync {
    fn current_credential(&self) -> Option<Credential>;
}

/// Single source of truth for the running client's session.
///
/// Built once at startup from a [`SessionStore`] and shared behind an `Arc`.
/// Every commit swaps the whole [`Session`] value under the write lock, after the
/// store has accepted it, and then publishes it to subscribers.
pub struct AuthContext<S: SlotStorage> {
    store: SessionStore<S>,
    state: RwLock<Session>,
    tx: watch::Sender<Session>,
}

impl<S: SlotStorage> AuthContext<S> {
    /// Initialize from whatever the store holds.
    pub fn init(store: SessionStore<S>) -> Self {
        let session = store.load();
        info!(target: "civic::session", "session.init state={}", session);
        let (tx, _rx) = watch::channel(session.clone());
        Self { store, state: RwLock::new(session), tx }
    }

    /// Commit a fresh login. The only transition out of the anonymous state.
    pub fn login(&self, credential: Credential, identity: Identity) -> AppResult<()> {
        if credential.is_empty() {
            return Err(AppError::user("empty_credential", "login requires a non-empty credential"));
        }
        let next = Session::authenticated(credential, identity);
        let mut state = self.state.write();
        self.store.save(&next)?;
        *state = next.clone();
        drop(state);
        info!(target: "civic::session", "session.login state={}", next);
        self.tx.send_replace(next);
        Ok(())
    }

    /// Drop the session. Calling this while anonymous is a no-op.
    ///
    /// Memory is cleared even when the slots cannot be; the storage error is
    /// still returned.
    pub fn logout(&self) -> AppResult<()> {
        let state = self.state.write();
        if !state.is_authenticated() {
            return Ok(());
        }
        self.logout_locked(state)
    }

    /// Logout only while `credential` is still the committed one.
    /// Returns whether the session was dropped.
    pub fn logout_if_current(&self, credential: &Credential) -> AppResult<bool> {
        let state = self.state.write();
        if state.credential() != Some(credential) {
            return Ok(false);
        }
        self.logout_locked(state).map(|_| true)
    }

    // the slots are cleared before the lock is released so a concurrent login
    // cannot be erased by a late clear
    fn logout_locked(&self, mut state: RwLockWriteGuard<'_, Session>) -> AppResult<()> {
        let prev = std::mem::take(&mut *state);
        let cleared = self.store.clear();
        drop(state);
        info!(target: "civic::session", "session.logout state={}", prev);
        self.tx.send_replace(Session::anonymous());
        cleared
    }

    /// Run the login collaborator and commit its result.
    /// Returns the landing path for the newly authenticated role.
    pub async fn sign_in<P: AuthProvider + ?Sized>(&self, provider: &P, req: &LoginRequest) -> AppResult<&'static str> {
        let resp = provider.login(req).await?;
        let landing = landing_path(Some(&resp.identity.role));
        tprintln!("session.sign_in email={} landing={}", req.email, landing);
        self.login(resp.credential, resp.identity)?;
        Ok(landing)
    }

    pub fn is_authenticated(&self) -> bool { self.state.read().is_authenticated() }

    pub fn current_role(&self) -> Option<Role> { self.state.read().role().cloned() }

    pub fn has_role(&self, role: &Role) -> bool { self.state.read().role() == Some(role) }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        match self.state.read().role() {
            Some(r) => roles.contains(r),
            None => false,
        }
    }

    pub fn credential(&self) -> Option<Credential> { self.state.read().credential().cloned() }

    pub fn identity(&self) -> Option<Identity> { self.state.read().identity().cloned() }

    /// Snapshot of the committed session.
    pub fn session(&self) -> Session { self.state.read().clone() }

    /// Observe committed session changes.
    pub fn subscribe(&self) -> watch::Receiver<Session> { self.tx.subscribe() }

    /// Landing path for the current session.
    pub fn landing(&self) -> &'static str { landing_path(self.state.read().role()) }
}

impl<S: SlotStorage> UnauthorizedHandler for AuthContext<S> {
    fn on_unauthorized(&self, sent_with: Option<&Credential>) {
        // a request that carried no credential cannot invalidate the session
        let Some(credential) = sent_with else { return };
        match self.logout_if_current(credential) {
            Ok(true) => warn!(target: "civic::session", "session.unauthorized backend rejected credential; logged out"),
            Ok(false) => debug!(target: "civic::session", "session.unauthorized stale credential; session kept"),
            Err(e) => warn!(target: "civic::session", "session.unauthorized slot cleanup failed: {}", e),
        }
    }
}

impl<S: SlotStorage> CredentialSource for AuthContext<S> {
    fn current_credential(&self) -> Option<Credential> { self.credential() }
}
