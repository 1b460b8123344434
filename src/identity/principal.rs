use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Access level carried by an identity.
///
/// The recognized set is closed; any other role string coming back from the
/// backend is kept verbatim as `Unrecognized` and never grants access.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Superadmin,
    Department,
    Unrecognized(String),
}

impl Role {
    pub fn parse(s: &str) -> Role {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Role::Admin,
            "superadmin" => Role::Superadmin,
            "department" => Role::Department,
            _ => Role::Unrecognized(s.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "admin",
            Role::Superadmin => "superadmin",
            Role::Department => "department",
            Role::Unrecognized(s) => s.as_str(),
        }
    }

    pub fn is_recognized(&self) -> bool { !matches!(self, Role::Unrecognized(_)) }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Role::parse(&s))
    }
}

/// Backend user ids arrive either as numbers or as opaque strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Num(i64),
    Text(String),
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserId::Num(n) => write!(f, "{}", n),
            UserId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for UserId {
    fn from(n: i64) -> Self { UserId::Num(n) }
}

impl From<i32> for UserId {
    fn from(n: i32) -> Self { UserId::Num(n as i64) }
}

impl From<String> for UserId {
    fn from(s: String) -> Self { UserId::Text(s) }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self { UserId::Text(s.to_string()) }
}

/// Decoded user record paired with a credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(alias = "_id")]
    pub id: UserId,
    pub username: String,
    pub role: Role,
}

impl Identity {
    pub fn new(id: impl Into<UserId>, username: impl Into<String>, role: Role) -> Self {
        Self { id: id.into(), username: username.into(), role }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parse_is_case_insensitive_and_keeps_unknowns() {
        assert_eq!(Role::parse("Admin"), Role::Admin);
        assert_eq!(Role::parse(" superadmin "), Role::Superadmin);
        assert_eq!(Role::parse("department"), Role::Department);
        let r = Role::parse("Janitor");
        assert_eq!(r, Role::Unrecognized("Janitor".into()));
        assert!(!r.is_recognized());
        assert_eq!(r.to_string(), "Janitor");
    }

    #[test]
    fn identity_accepts_numeric_and_mongo_ids() {
        let a: Identity = serde_json::from_str(r#"{"id":1,"username":"bob","role":"superadmin"}"#).unwrap();
        assert_eq!(a, Identity::new(1, "bob", Role::Superadmin));

        let b: Identity = serde_json::from_str(
            r#"{"_id":"650f1c","username":"roads","email":"roads@city.gov","role":"department"}"#,
        ).unwrap();
        assert_eq!(b.id, UserId::Text("650f1c".into()));
        assert_eq!(b.role, Role::Department);
    }

    #[test]
    fn identity_serializes_role_as_plain_string() {
        let v = serde_json::to_value(Identity::new(7, "eve", Role::Admin)).unwrap();
        assert_eq!(v, serde_json::json!({"id": 7, "username": "eve", "role": "admin"}));
    }

    #[test]
    fn identity_missing_role_fails_to_parse() {
        assert!(serde_json::from_str::<Identity>(r#"{"id":1,"username":"bob"}"#).is_err());
    }
}
