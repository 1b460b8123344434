use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflow::IssueStatus;

/// GeoJSON point, `[longitude, latitude]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(default)]
    pub coordinates: Vec<f64>,
}

impl GeoPoint {
    pub fn longitude(&self) -> Option<f64> { self.coordinates.first().copied() }
    pub fn latitude(&self) -> Option<f64> { self.coordinates.get(1).copied() }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostAuthor {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// A citizen report as returned by `GET /posts/admin/posts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: IssueStatus,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    #[serde(default)]
    pub user: Option<PostAuthor>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub media: Vec<serde_json::Value>,
    #[serde(default)]
    pub upvotes: Option<u64>,
}

impl Post {
    /// Map views skip posts with missing or zeroed coordinates.
    pub fn has_valid_location(&self) -> bool {
        match self.location.as_ref() {
            Some(loc) => matches!((loc.longitude(), loc.latitude()), (Some(lng), Some(lat)) if lng != 0.0 && lat != 0.0),
            None => false,
        }
    }

    pub fn reporter(&self) -> &str {
        self.user.as_ref().and_then(|u| u.username.as_deref())
            .or(self.user_name.as_deref())
            .unwrap_or("Anonymous")
    }

    pub fn summary(&self) -> &str {
        self.description.as_deref().filter(|d| !d.trim().is_empty()).unwrap_or("No description")
    }
}

/// A deduplicated cluster with its workflow position (`GET /admin/clusters/progress`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterProgress {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub status: IssueStatus,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A cluster handed to a department (`/admin/cluster-assignments`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub status: IssueStatus,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub issues: Vec<Post>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Body of `PATCH /admin/cluster-assignments/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentUpdate {
    pub status: IssueStatus,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub comment: String,
}
