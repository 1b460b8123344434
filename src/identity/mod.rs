//! Client-side identity and session management for the console.
//! Keep the public surface thin and split implementation across sub-modules.

mod principal;
mod session;
mod store;
mod context;
mod provider;
mod authorizer;

pub use principal::{Identity, Role, UserId};
pub use session::{Credential, Session};
pub use store::{SessionStore, TOKEN_SLOT, IDENTITY_SLOT};
pub use context::{AuthContext, CredentialSource, UnauthorizedHandler};
pub use provider::{AuthProvider, HttpAuthProvider, LoginRequest, LoginResponse};
pub(crate) use provider::backend_message;
pub use authorizer::{Access, landing_path};
