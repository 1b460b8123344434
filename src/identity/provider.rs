use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::tprintln;

use super::principal::Identity;
use super::session::Credential;

// no Debug: carries the password
#[derive(Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into() }
    }
}

#[derive(Debug, Clone)]
pub struct LoginResponse {
    pub credential: Credential,
    pub identity: Identity,
}

/// The login collaborator. Failures carry a human-readable message.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn login(&self, req: &LoginRequest) -> AppResult<LoginResponse>;
}

pub(crate) const LOGIN_FAILED: &str = "Login failed";

#[derive(Deserialize)]
struct LoginBody {
    token: String,
    #[serde(alias = "user")]
    admin: Identity,
}

/// Pull a backend message (`msg` or `message`) out of an error body.
pub(crate) fn backend_message(body: &serde_json::Value) -> Option<String> {
    body.get("msg")
        .or_else(|| body.get("message"))
        .and_then(|m| m.as_str())
        .filter(|m| !m.trim().is_empty())
        .map(|m| m.to_string())
}

/// Login against `POST {base}/admin/login`.
pub struct HttpAuthProvider {
    base: Url,
    client: reqwest::Client,
}

impl HttpAuthProvider {
    pub fn new(base: Url, timeout: Duration) -> AppResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { base, client })
    }

    pub fn with_client(base: Url, client: reqwest::Client) -> Self { Self { base, client } }
}

#[async_trait]
impl AuthProvider for HttpAuthProvider {
    async fn login(&self, req: &LoginRequest) -> AppResult<LoginResponse> {
        let url = crate::api::endpoint(&self.base, "admin/login")?;
        let resp = self.client.post(url).json(req).send().await?;
        let status = resp.status();
        let body: serde_json::Value = resp.json().await.unwrap_or(serde_json::Value::Null);
        if !status.is_success() {
            let msg = backend_message(&body).unwrap_or_else(|| LOGIN_FAILED.to_string());
            warn!(target: "civic::auth", "auth.login rejected email={} status={}", req.email, status.as_u16());
            // a 401 here means bad credentials, not an expired session
            return Err(AppError::auth("invalid_credentials".to_string(), msg));
        }
        let parsed: LoginBody = serde_json::from_value(body)
            .map_err(|e| AppError::remote("invalid_login_body".to_string(), format!("{}: {}", LOGIN_FAILED, e)))?;
        let credential = Credential::new(parsed.token);
        if credential.is_empty() {
            return Err(AppError::remote("invalid_login_body", "Login failed: empty token"));
        }
        info!(target: "civic::auth", "auth.login user={} role={}", parsed.admin.username, parsed.admin.role);
        tprintln!("auth.login email={} id={}", req.email, parsed.admin.id);
        Ok(LoginResponse { credential, identity: parsed.admin })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_message_prefers_msg() {
        let v = serde_json::json!({"msg": "Invalid email or password", "message": "other"});
        assert_eq!(backend_message(&v).as_deref(), Some("Invalid email or password"));
        let v = serde_json::json!({"message": "Account locked"});
        assert_eq!(backend_message(&v).as_deref(), Some("Account locked"));
        assert_eq!(backend_message(&serde_json::json!({"msg": ""})), None);
        assert_eq!(backend_message(&serde_json::Value::Null), None);
    }

    #[test]
    fn login_body_accepts_admin_or_user_key() {
        let a: LoginBody = serde_json::from_value(serde_json::json!({
            "token": "t", "admin": {"id": 1, "username": "bob", "role": "admin"}
        })).unwrap();
        assert_eq!(a.admin.username, "bob");
        let b: LoginBody = serde_json::from_value(serde_json::json!({
            "token": "t", "user": {"_id": "x1", "username": "roads", "role": "department"}
        })).unwrap();
        assert_eq!(b.admin.username, "roads");
    }
}
