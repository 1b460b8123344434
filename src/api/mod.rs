//! Authenticated access to the platform backend.
//!
//! [`ApiClient`] attaches the session's bearer credential to every request and
//! reports 401 responses back to the session through [`UnauthorizedHandler`]
//! before handing the error to the caller.
//!
//! [`UnauthorizedHandler`]: crate::identity::UnauthorizedHandler

mod client;
mod models;

pub use client::ApiClient;
pub use models::{Assignment, AssignmentUpdate, ClusterProgress, GeoPoint, Post, PostAuthor};

use reqwest::Url;

use crate::error::{AppError, AppResult};

/// Join `rel` onto the API base, keeping the base's path prefix (`/api`).
pub fn endpoint(base: &Url, rel: &str) -> AppResult<Url> {
    let mut b = base.clone();
    if !b.path().ends_with('/') {
        let p = format!("{}/", b.path());
        b.set_path(&p);
    }
    b.join(rel.trim_start_matches('/'))
        .map_err(|e| AppError::user("invalid_endpoint".to_string(), format!("{}: {}", rel, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_keeps_api_prefix() {
        let base = Url::parse("http://localhost:5000/api").unwrap();
        assert_eq!(endpoint(&base, "/admin/login").unwrap().as_str(), "http://localhost:5000/api/admin/login");
        let base = Url::parse("http://localhost:5000/api/").unwrap();
        assert_eq!(endpoint(&base, "posts/admin/posts").unwrap().as_str(), "http://localhost:5000/api/posts/admin/posts");
        let bare = Url::parse("http://127.0.0.1:9000").unwrap();
        assert_eq!(endpoint(&bare, "admin/clusters/progress").unwrap().as_str(), "http://127.0.0.1:9000/admin/clusters/progress");
    }
}
