//! Issue resolution workflow: status parsing, progress stages and tallies.
//!
//! Issues and clusters move through a fixed sequence
//! `Pending -> Dept Assigned -> In Progress -> Resolved`. The backend is not
//! consistent about the final label (`Completed` in cluster progress,
//! `Resolved` on posts), so both parse to [`IssueStatus::Resolved`].

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Age after which an unresolved item is flagged.
pub const OVERDUE_AFTER_DAYS: i64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IssueStatus {
    #[default]
    Pending,
    DeptAssigned,
    InProgress,
    Resolved,
}

impl IssueStatus {
    pub const ALL: [IssueStatus; 4] = [IssueStatus::Pending, IssueStatus::DeptAssigned, IssueStatus::InProgress, IssueStatus::Resolved];

    /// Lenient parse for backend data: unknown labels fall back to `Pending`.
    pub fn parse(s: &str) -> IssueStatus { IssueStatus::from_label(s).unwrap_or_default() }

    /// Strict parse for operator input. Case-insensitive; `-` and `_` may stand
    /// in for spaces (`in-progress`).
    pub fn from_label(s: &str) -> Option<IssueStatus> {
        let norm = s.trim().to_ascii_lowercase().replace(['-', '_'], " ");
        match norm.as_str() {
            "pending" => Some(IssueStatus::Pending),
            "dept assigned" | "assigned" => Some(IssueStatus::DeptAssigned),
            "in progress" => Some(IssueStatus::InProgress),
            "completed" | "resolved" => Some(IssueStatus::Resolved),
            _ => None,
        }
    }

    /// Zero-based position in the progress stepper.
    pub fn stage(self) -> usize {
        match self {
            IssueStatus::Pending => 0,
            IssueStatus::DeptAssigned => 1,
            IssueStatus::InProgress => 2,
            IssueStatus::Resolved => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            IssueStatus::Pending => "Pending",
            IssueStatus::DeptAssigned => "Assigned",
            IssueStatus::InProgress => "In Progress",
            IssueStatus::Resolved => "Resolved",
        }
    }

    /// Label the backend expects on updates.
    pub fn wire(self) -> &'static str {
        match self {
            IssueStatus::Pending => "Pending",
            IssueStatus::DeptAssigned => "Dept Assigned",
            IssueStatus::InProgress => "In Progress",
            IssueStatus::Resolved => "Resolved",
        }
    }

    pub fn is_resolved(self) -> bool { self == IssueStatus::Resolved }
}

impl std::fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(self.label()) }
}

impl Serialize for IssueStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.wire())
    }
}

impl<'de> Deserialize<'de> for IssueStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = Option::<String>::deserialize(deserializer)?;
        Ok(s.as_deref().map(IssueStatus::parse).unwrap_or_default())
    }
}

/// Headline counts for dashboards. Assigned items count as pending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusTally {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub resolved: usize,
}

impl StatusTally {
    pub fn from_statuses<I: IntoIterator<Item = IssueStatus>>(statuses: I) -> Self {
        let mut t = StatusTally::default();
        for s in statuses {
            t.total += 1;
            match s {
                IssueStatus::Pending | IssueStatus::DeptAssigned => t.pending += 1,
                IssueStatus::InProgress => t.in_progress += 1,
                IssueStatus::Resolved => t.resolved += 1,
            }
        }
        t
    }
}

/// Unresolved and older than [`OVERDUE_AFTER_DAYS`].
pub fn is_overdue(status: IssueStatus, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    !status.is_resolved() && now - created_at > Duration::days(OVERDUE_AFTER_DAYS)
}
