//! Static navigation table and the route guard that consults it.
//!
//! Role-based dispatch lives here and nowhere else: views ask the guard where a
//! navigation request ends up and render whatever [`Page`] comes back.

mod table;
mod guard;

pub use table::{NavigationTable, Page, RouteDescriptor, normalize_path};
pub use guard::{Decision, Resolution, RouteGuard};

/// Fixed navigation surface.
pub mod paths {
    pub const LOGIN: &str = "/login";
    pub const ROOT: &str = "/";
    pub const ADMIN_DASHBOARD: &str = "/dashboard";
    pub const ADMIN_ISSUES: &str = "/issues";
    pub const ADMIN_PROGRESS: &str = "/progress";
    pub const COMMUNITY: &str = "/community";
    pub const DEPARTMENT_DASHBOARD: &str = "/department";
    pub const DEPARTMENT_ISSUES: &str = "/department/issues";
}
