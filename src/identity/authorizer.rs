use super::principal::Role;

/// Who may reach a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// Reachable with or without a session (e.g. the login page).
    Unrestricted,
    /// Requires a session; an empty list admits any recognized role.
    Roles(Vec<Role>),
}

impl Access {
    pub fn any_authenticated() -> Self { Access::Roles(Vec::new()) }

    pub fn roles(roles: &[Role]) -> Self { Access::Roles(roles.to_vec()) }

    pub fn is_unrestricted(&self) -> bool { matches!(self, Access::Unrestricted) }

    /// Whether `role` satisfies this requirement. Unrecognized roles never do.
    pub fn admits(&self, role: &Role) -> bool {
        match self {
            Access::Unrestricted => true,
            Access::Roles(_) if !role.is_recognized() => false,
            Access::Roles(required) => required.is_empty() || required.contains(role),
        }
    }
}

/// Where a role lands after login or after being bounced off a route it may not see.
/// `None` means the login page.
pub fn landing_path(role: Option<&Role>) -> &'static str {
    match role {
        Some(Role::Department) => crate::navigation::paths::DEPARTMENT_DASHBOARD,
        Some(Role::Admin) | Some(Role::Superadmin) => crate::navigation::paths::ADMIN_DASHBOARD,
        Some(Role::Unrecognized(_)) | None => crate::navigation::paths::LOGIN,
    }
}
