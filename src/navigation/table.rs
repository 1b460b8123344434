use once_cell::sync::Lazy;

use crate::identity::{Access, Role};

use super::paths;

/// What a route renders. Rendering itself happens outside this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Login,
    /// Alias that forwards to the caller's landing page.
    Root,
    AdminDashboard,
    AdminIssues,
    AdminProgress,
    Community,
    DepartmentDashboard,
    DepartmentIssues,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDescriptor {
    pub path: &'static str,
    pub label: &'static str,
    pub access: Access,
    pub page: Page,
}

impl RouteDescriptor {
    fn new(path: &'static str, label: &'static str, access: Access, page: Page) -> Self {
        Self { path, label, access, page }
    }
}

static STANDARD: Lazy<NavigationTable> = Lazy::new(|| {
    let admins = Access::roles(&[Role::Admin, Role::Superadmin]);
    NavigationTable::new(vec![
        RouteDescriptor::new(paths::LOGIN, "Login", Access::Unrestricted, Page::Login),
        RouteDescriptor::new(paths::ROOT, "Home", Access::any_authenticated(), Page::Root),
        RouteDescriptor::new(paths::ADMIN_DASHBOARD, "Dashboard", admins.clone(), Page::AdminDashboard),
        RouteDescriptor::new(paths::ADMIN_ISSUES, "Reported Issues", admins.clone(), Page::AdminIssues),
        RouteDescriptor::new(paths::ADMIN_PROGRESS, "Progress Tracking", admins, Page::AdminProgress),
        RouteDescriptor::new(
            paths::COMMUNITY,
            "Community",
            Access::roles(&[Role::Admin, Role::Superadmin, Role::Department]),
            Page::Community,
        ),
        RouteDescriptor::new(paths::DEPARTMENT_DASHBOARD, "Department Dashboard", Access::roles(&[Role::Department]), Page::DepartmentDashboard),
        RouteDescriptor::new(paths::DEPARTMENT_ISSUES, "Department Issues", Access::roles(&[Role::Department]), Page::DepartmentIssues),
    ])
});

/// Immutable list of route descriptors, consulted by the guard.
#[derive(Debug, Clone)]
pub struct NavigationTable {
    routes: Vec<RouteDescriptor>,
}

impl NavigationTable {
    pub fn new(routes: Vec<RouteDescriptor>) -> Self { Self { routes } }

    /// The console's fixed route set.
    pub fn standard() -> &'static NavigationTable { &STANDARD }

    pub fn routes(&self) -> &[RouteDescriptor] { &self.routes }

    pub fn len(&self) -> usize { self.routes.len() }

    pub fn is_empty(&self) -> bool { self.routes.is_empty() }

    pub fn lookup(&self, path: &str) -> Option<&RouteDescriptor> {
        let p = normalize_path(path);
        self.routes.iter().find(|r| r.path == p)
    }

    /// Drawer entries for `role`, in table order.
    pub fn menu_for(&self, role: &Role) -> Vec<&RouteDescriptor> {
        self.routes
            .iter()
            .filter(|r| !r.access.is_unrestricted() && r.page != Page::Root)
            .filter(|r| r.access.admits(role))
            .collect()
    }
}

/// Strip query/fragment and trailing slashes; an empty path is the root.
pub fn normalize_path(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let p = path[..end].trim();
    let p = p.trim_end_matches('/');
    if p.is_empty() { paths::ROOT } else { p }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_variants() {
        assert_eq!(normalize_path("/dashboard/"), "/dashboard");
        assert_eq!(normalize_path("/issues?page=2#top"), "/issues");
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("///"), "/");
        assert_eq!(normalize_path("/department/issues"), "/department/issues");
    }

    #[test]
    fn lookup_hits_and_misses() {
        let t = NavigationTable::standard();
        assert_eq!(t.lookup("/login").map(|r| r.page), Some(Page::Login));
        assert_eq!(t.lookup("/department/issues/").map(|r| r.page), Some(Page::DepartmentIssues));
        assert!(t.lookup("/nope").is_none());
        assert!(t.lookup("/Dashboard").is_none());
    }

    #[test]
    fn paths_are_unique() {
        let t = NavigationTable::standard();
        let mut seen: Vec<&str> = t.routes().iter().map(|r| r.path).collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), t.len());
    }

    #[test]
    fn menus_follow_roles() {
        let t = NavigationTable::standard();
        let labels = |r: &Role| t.menu_for(r).iter().map(|d| d.label).collect::<Vec<_>>();
        assert_eq!(labels(&Role::Admin), vec!["Dashboard", "Reported Issues", "Progress Tracking", "Community"]);
        assert_eq!(labels(&Role::Superadmin), labels(&Role::Admin));
        assert_eq!(labels(&Role::Department), vec!["Community", "Department Dashboard", "Department Issues"]);
        assert!(labels(&Role::Unrecognized("guest".into())).is_empty());
    }
}
