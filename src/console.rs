//!
//! civic-console wiring
//! ---------------------
//! Builds the running client from a [`ConsoleConfig`]: slot storage, the session
//! context restored from it, the login provider, the authenticated API client
//! and the route guard. The binary drives a `Console`; tests can build one over
//! in-memory slots.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::api::{ApiClient, Assignment, ClusterProgress, Post};
use crate::config::ConsoleConfig;
use crate::error::{AppError, AppResult};
use crate::identity::{AuthContext, AuthProvider, HttpAuthProvider, LoginRequest, Role, SessionStore};
use crate::navigation::{NavigationTable, Page, Resolution, RouteDescriptor, RouteGuard};
use crate::storage::{FileSlots, SlotStorage};
use crate::workflow::{is_overdue, IssueStatus, StatusTally};

/// Posts plus the counts shown on the admin dashboard.
#[derive(Debug, Clone)]
pub struct IssueReport {
    pub posts: Vec<Post>,
    pub tally: StatusTally,
    /// Posts that can be placed on a map.
    pub mappable: usize,
    pub overdue: usize,
}

impl IssueReport {
    pub fn from_posts(posts: Vec<Post>) -> Self {
        let now = Utc::now();
        let tally = StatusTally::from_statuses(posts.iter().map(|p| p.status));
        let mappable = posts.iter().filter(|p| p.has_valid_location()).count();
        let overdue = posts
            .iter()
            .filter(|p| p.created_at.map(|c| is_overdue(p.status, c, now)).unwrap_or(false))
            .count();
        Self { posts, tally, mappable, overdue }
    }
}

/// What the department dashboard shows: the department's assignments, their
/// status counts and whatever analytics the backend offers.
#[derive(Debug, Clone)]
pub struct DepartmentOverview {
    pub assignments: Vec<Assignment>,
    pub tally: StatusTally,
    /// The analytics `summary` object when present, else the whole body; `{}` when unavailable.
    pub analytics: serde_json::Value,
}

impl DepartmentOverview {
    pub fn new(assignments: Vec<Assignment>, analytics: serde_json::Value) -> Self {
        let tally = StatusTally::from_statuses(assignments.iter().map(|a| a.status));
        let analytics = match analytics.get("summary") {
            Some(summary) if summary.is_object() => summary.clone(),
            _ => analytics,
        };
        Self { assignments, tally, analytics }
    }

    /// Analytics total when the backend reports one, else the assignment count.
    pub fn total_assignments(&self) -> u64 {
        self.analytics
            .get("totalAssignments")
            .and_then(|v| v.as_u64())
            .filter(|n| *n > 0)
            .unwrap_or(self.assignments.len() as u64)
    }
}

pub struct Console<S: SlotStorage + 'static> {
    auth: Arc<AuthContext<S>>,
    provider: Box<dyn AuthProvider>,
    api: ApiClient,
    guard: RouteGuard<'static>,
}

impl Console<FileSlots> {
    /// Open the on-disk state under `config.state_dir` and restore the session.
    pub fn open(config: &ConsoleConfig) -> AppResult<Self> {
        let slots = FileSlots::open(&config.state_dir)?;
        let provider = HttpAuthProvider::new(config.api_base.clone(), config.http_timeout)?;
        Self::with_slots(config, slots, Box::new(provider))
    }
}

impl<S: SlotStorage + 'static> Console<S> {
    pub fn with_slots(config: &ConsoleConfig, slots: S, provider: Box<dyn AuthProvider>) -> AppResult<Self> {
        let auth = Arc::new(AuthContext::init(SessionStore::new(slots)));
        let api = ApiClient::new(config.api_base.clone(), config.http_timeout, auth.clone())?;
        info!(target: "civic::console", "console.open api_base={} session={}", config.api_base, auth.session());
        Ok(Self { auth, provider, api, guard: RouteGuard::default() })
    }

    pub fn auth(&self) -> &Arc<AuthContext<S>> { &self.auth }

    pub fn api(&self) -> &ApiClient { &self.api }

    /// Log in and return where the new session lands.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<&'static str> {
        self.auth.sign_in(self.provider.as_ref(), &LoginRequest::new(email, password)).await
    }

    pub fn logout(&self) -> AppResult<()> { self.auth.logout() }

    pub fn open_path(&self, path: &str) -> Resolution { self.guard.resolve(path, &self.auth.session()) }

    /// Drawer entries for the current role; empty when anonymous.
    pub fn menu(&self) -> Vec<&'static RouteDescriptor> {
        match self.auth.current_role() {
            Some(role) => NavigationTable::standard().menu_for(&role),
            None => Vec::new(),
        }
    }

    /// Fail with a 403-class error unless the session may see `page`'s route.
    fn require(&self, path: &str, page: Page) -> AppResult<()> {
        match self.open_path(path) {
            Resolution::Page { page: got, .. } if got == page => Ok(()),
            _ if !self.auth.is_authenticated() => Err(AppError::auth("not_logged_in", "log in first")),
            _ => Err(AppError::forbidden("role_forbidden".to_string(), format!("{} is not available to this role", path))),
        }
    }

    pub async fn issues(&self) -> AppResult<IssueReport> {
        self.require(crate::navigation::paths::ADMIN_ISSUES, Page::AdminIssues)?;
        Ok(IssueReport::from_posts(self.api.list_posts().await?))
    }

    pub async fn progress(&self) -> AppResult<Vec<ClusterProgress>> {
        self.require(crate::navigation::paths::ADMIN_PROGRESS, Page::AdminProgress)?;
        self.api.clusters_progress().await
    }

    pub async fn assignments(&self) -> AppResult<Vec<Assignment>> {
        self.require(crate::navigation::paths::DEPARTMENT_ISSUES, Page::DepartmentIssues)?;
        self.api.cluster_assignments().await
    }

    /// Assignments and analytics for the department landing page.
    pub async fn department_dashboard(&self) -> AppResult<DepartmentOverview> {
        self.require(crate::navigation::paths::DEPARTMENT_DASHBOARD, Page::DepartmentDashboard)?;
        let (assignments, analytics) = tokio::join!(self.api.cluster_assignments(), self.api.dashboard_analytics());
        Ok(DepartmentOverview::new(assignments?, analytics?))
    }

    /// One assignment with its member issues.
    pub async fn assignment(&self, id: &str) -> AppResult<Assignment> {
        self.require(crate::navigation::paths::DEPARTMENT_ISSUES, Page::DepartmentIssues)?;
        self.api.cluster_assignment(id).await
    }

    pub async fn update_assignment(&self, id: &str, status: IssueStatus, comment: &str) -> AppResult<Assignment> {
        self.require(crate::navigation::paths::DEPARTMENT_ISSUES, Page::DepartmentIssues)?;
        self.api.update_assignment(id, status, comment).await
    }

    pub fn current_role(&self) -> Option<Role> { self.auth.current_role() }
}
