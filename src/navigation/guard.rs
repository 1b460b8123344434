use tracing::debug;

use crate::identity::{landing_path, Session};

use super::paths;
use super::table::{NavigationTable, Page};

/// Outcome of a single navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow(Page),
    Redirect(&'static str),
    /// Path is not in the table; the caller picks what to show.
    NotFound,
}

/// Where a navigation request finally lands after following redirects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Page { path: String, page: Page },
    NotFound { path: String },
}

/// Decides reachability of a path for a session. A total function of its inputs.
#[derive(Debug, Clone, Copy)]
pub struct RouteGuard<'t> {
    table: &'t NavigationTable,
}

impl Default for RouteGuard<'static> {
    fn default() -> Self { Self { table: NavigationTable::standard() } }
}

impl<'t> RouteGuard<'t> {
    pub fn new(table: &'t NavigationTable) -> Self { Self { table } }

    pub fn table(&self) -> &'t NavigationTable { self.table }

    pub fn decide(&self, path: &str, session: &Session) -> Decision {
        let Some(route) = self.table.lookup(path) else { return Decision::NotFound; };
        if route.access.is_unrestricted() {
            return Decision::Allow(route.page);
        }
        let Some(role) = session.role() else {
            return Decision::Redirect(paths::LOGIN);
        };
        if !role.is_recognized() {
            return Decision::Redirect(paths::LOGIN);
        }
        if !route.access.admits(role) {
            return Decision::Redirect(landing_path(Some(role)));
        }
        if route.page == Page::Root {
            return Decision::Redirect(landing_path(Some(role)));
        }
        Decision::Allow(route.page)
    }

    /// Follow redirects from `path` until a page or a miss.
    pub fn resolve(&self, path: &str, session: &Session) -> Resolution {
        let mut current = super::normalize_path(path).to_string();
        // every hop moves to a distinct table entry, so the table size bounds the walk
        for _ in 0..=self.table.len() {
            match self.decide(&current, session) {
                Decision::Allow(page) => return Resolution::Page { path: current, page },
                Decision::NotFound => return Resolution::NotFound { path: current },
                Decision::Redirect(next) => {
                    debug!(target: "civic::nav", "nav.redirect from={} to={} session={}", current, next, session);
                    current = next.to_string();
                }
            }
        }
        // unreachable with the standard table; fall back to the login page
        Resolution::Page { path: paths::LOGIN.to_string(), page: Page::Login }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{Identity, Role};

    fn as_role(role: Role) -> Session { Session::authenticated("t".into(), Identity::new(1, "u", role)) }

    #[test]
    fn anonymous_is_sent_to_login() {
        let g = RouteGuard::default();
        let anon = Session::anonymous();
        assert_eq!(g.decide("/dashboard", &anon), Decision::Redirect("/login"));
        assert_eq!(g.decide("/", &anon), Decision::Redirect("/login"));
        assert_eq!(g.decide("/department/issues", &anon), Decision::Redirect("/login"));
        assert_eq!(g.decide("/login", &anon), Decision::Allow(Page::Login));
    }

    #[test]
    fn wrong_role_goes_to_own_landing() {
        let g = RouteGuard::default();
        assert_eq!(g.decide("/dashboard", &as_role(Role::Department)), Decision::Redirect("/department"));
        assert_eq!(g.decide("/department/issues", &as_role(Role::Admin)), Decision::Redirect("/dashboard"));
        assert_eq!(g.decide("/department", &as_role(Role::Superadmin)), Decision::Redirect("/dashboard"));
    }

    #[test]
    fn every_mismatch_redirects_to_landing() {
        let g = RouteGuard::default();
        for role in [Role::Admin, Role::Superadmin, Role::Department] {
            let s = as_role(role.clone());
            for r in g.table().routes() {
                if r.access.is_unrestricted() || r.access.admits(&role) {
                    continue;
                }
                assert_eq!(g.decide(r.path, &s), Decision::Redirect(landing_path(Some(&role))), "{} as {}", r.path, role);
            }
        }
    }

    #[test]
    fn unrecognized_role_fails_closed() {
        let g = RouteGuard::default();
        let s = as_role(Role::Unrecognized("contractor".into()));
        assert_eq!(g.decide("/community", &s), Decision::Redirect("/login"));
        assert_eq!(g.decide("/", &s), Decision::Redirect("/login"));
        assert_eq!(g.decide("/login", &s), Decision::Allow(Page::Login));
    }

    #[test]
    fn root_forwards_to_landing() {
        let g = RouteGuard::default();
        assert_eq!(g.decide("/", &as_role(Role::Department)), Decision::Redirect("/department"));
        assert_eq!(
            g.resolve("/", &as_role(Role::Superadmin)),
            Resolution::Page { path: "/dashboard".into(), page: Page::AdminDashboard }
        );
    }

    #[test]
    fn allowed_and_missing_paths() {
        let g = RouteGuard::default();
        assert_eq!(g.decide("/community", &as_role(Role::Department)), Decision::Allow(Page::Community));
        assert_eq!(g.decide("/issues?sort=date", &as_role(Role::Admin)), Decision::Allow(Page::AdminIssues));
        assert_eq!(g.decide("/reports", &as_role(Role::Admin)), Decision::NotFound);
        assert_eq!(g.resolve("/reports/", &Session::anonymous()), Resolution::NotFound { path: "/reports".into() });
    }

    #[test]
    fn resolve_lands_on_login_for_anonymous() {
        let g = RouteGuard::default();
        assert_eq!(
            g.resolve("/progress", &Session::anonymous()),
            Resolution::Page { path: "/login".into(), page: Page::Login }
        );
    }
}
