use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{AppError, AppResult};
use crate::identity::{backend_message, Credential, CredentialSource, UnauthorizedHandler};
use crate::workflow::IssueStatus;

use super::endpoint;
use super::models::{Assignment, AssignmentUpdate, ClusterProgress, Post};

/// HTTP client for protected backend resources.
#[derive(Clone)]
pub struct ApiClient {
    base: Url,
    client: reqwest::Client,
    credentials: Arc<dyn CredentialSource>,
    unauthorized: Arc<dyn UnauthorizedHandler>,
}

impl ApiClient {
    /// Build a client whose credential source and 401 handler are the same session object.
    pub fn new<A>(base: Url, timeout: Duration, auth: Arc<A>) -> AppResult<Self>
    where
        A: CredentialSource + UnauthorizedHandler + 'static,
    {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_parts(base, client, auth.clone(), auth))
    }

    pub fn with_parts(
        base: Url,
        client: reqwest::Client,
        credentials: Arc<dyn CredentialSource>,
        unauthorized: Arc<dyn UnauthorizedHandler>,
    ) -> Self {
        Self { base, client, credentials, unauthorized }
    }

    pub fn base(&self) -> &Url { &self.base }

    /// Headers for one request, plus the credential they carry.
    fn auth_headers(&self) -> AppResult<(HeaderMap, Option<Credential>)> {
        let mut headers = HeaderMap::new();
        let cred = self.credentials.current_credential();
        if let Some(c) = cred.as_ref() {
            let v = HeaderValue::from_str(&c.bearer())
                .map_err(|_| AppError::internal("invalid_credential", "credential is not a valid header value"))?;
            headers.insert(AUTHORIZATION, v);
        }
        Ok((headers, cred))
    }

    async fn send<B: Serialize + ?Sized>(&self, method: Method, rel: &str, body: Option<&B>) -> AppResult<serde_json::Value> {
        let url = endpoint(&self.base, rel)?;
        let (headers, sent_with) = self.auth_headers()?;
        let mut req = self.client.request(method.clone(), url).headers(headers);
        if let Some(b) = body {
            req = req.json(b);
        }
        let resp = req.send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        let val: serde_json::Value = if text.trim().is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text))
        };
        if status == StatusCode::UNAUTHORIZED {
            warn!(target: "civic::api", "api.unauthorized method={} path={}", method, rel);
            self.unauthorized.on_unauthorized(sent_with.as_ref());
            let msg = backend_message(&val).unwrap_or_else(|| "session expired; please log in again".to_string());
            return Err(AppError::from_status(401, msg));
        }
        if !status.is_success() {
            let msg = backend_message(&val).unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
            debug!(target: "civic::api", "api.error method={} path={} status={}", method, rel, status.as_u16());
            return Err(AppError::from_status(status.as_u16(), msg));
        }
        debug!(target: "civic::api", "api.ok method={} path={} status={}", method, rel, status.as_u16());
        Ok(val)
    }

    fn decode<T: DeserializeOwned>(rel: &str, val: serde_json::Value) -> AppResult<T> {
        serde_json::from_value(val)
            .map_err(|e| AppError::remote("invalid_body".to_string(), format!("{}: {}", rel, e)))
    }

    pub async fn get_json<T: DeserializeOwned>(&self, rel: &str) -> AppResult<T> {
        let val = self.send::<()>(Method::GET, rel, None).await?;
        Self::decode(rel, val)
    }

    pub async fn patch_json<B: Serialize + ?Sized, T: DeserializeOwned>(&self, rel: &str, body: &B) -> AppResult<T> {
        let val = self.send(Method::PATCH, rel, Some(body)).await?;
        Self::decode(rel, val)
    }

    /// All citizen reports.
    pub async fn list_posts(&self) -> AppResult<Vec<Post>> {
        self.get_json("posts/admin/posts").await
    }

    /// Clusters with their workflow position.
    pub async fn clusters_progress(&self) -> AppResult<Vec<ClusterProgress>> {
        let v: Option<Vec<ClusterProgress>> = self.get_json("admin/clusters/progress").await?;
        Ok(v.unwrap_or_default())
    }

    pub async fn cluster_assignments(&self) -> AppResult<Vec<Assignment>> {
        self.get_json("admin/cluster-assignments").await
    }

    pub async fn cluster_assignment(&self, id: &str) -> AppResult<Assignment> {
        self.get_json(&format!("admin/cluster-assignments/{}", urlencoding::encode(id))).await
    }

    /// Move an assignment along the workflow; returns the updated record.
    pub async fn update_assignment(&self, id: &str, status: IssueStatus, comment: &str) -> AppResult<Assignment> {
        let body = AssignmentUpdate { status, comment: comment.to_string() };
        self.patch_json(&format!("admin/cluster-assignments/{}", urlencoding::encode(id)), &body).await
    }

    /// Dashboard analytics are optional; any failure other than 401 yields an empty object.
    pub async fn dashboard_analytics(&self) -> AppResult<serde_json::Value> {
        match self.get_json::<serde_json::Value>("admin/dashboard-analytics").await {
            Ok(serde_json::Value::Null) => Ok(serde_json::json!({})),
            Ok(v) => Ok(v),
            Err(e) if e.is_unauthorized() => Err(e),
            Err(e) => {
                debug!(target: "civic::api", "api.analytics unavailable: {}", e);
                Ok(serde_json::json!({}))
            }
        }
    }
}
