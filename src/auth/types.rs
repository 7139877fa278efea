use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PrincipalKind {
    User,
    Admin,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
    SuperAdmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
            Role::SuperAdmin => "superadmin",
        }
    }

    /// Which principal kind may carry this role.
    pub fn kind(&self) -> PrincipalKind {
        match self {
            Role::User => PrincipalKind::User,
            Role::Admin | Role::SuperAdmin => PrincipalKind::Admin,
        }
    }
}

impl TryFrom<&str> for Role {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            "superadmin" => Ok(Role::SuperAdmin),
            _ => Err(()),
        }
    }
}

/// Token payload. `iat`/`exp` are unix seconds.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    #[serde(rename = "type")]
    pub kind: PrincipalKind,
    pub id: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn principal(&self) -> Principal {
        Principal {
            kind: self.kind,
            id: self.id.clone(),
            role: self.role,
        }
    }
}

/// The authenticated caller of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub kind: PrincipalKind,
    pub id: String,
    pub role: Role,
}

impl Principal {
    pub fn user(id: impl Into<String>) -> Self {
        Self {
            kind: PrincipalKind::User,
            id: id.into(),
            role: Role::User,
        }
    }

    pub fn admin(id: impl Into<String>, role: Role) -> Self {
        Self {
            kind: PrincipalKind::Admin,
            id: id.into(),
            role,
        }
    }

    pub fn is_superadmin(&self) -> bool {
        self.kind == PrincipalKind::Admin && self.role == Role::SuperAdmin
    }
}

pub trait RequiredRole {
    fn kind() -> PrincipalKind;

    fn superadmin_only() -> bool {
        false
    }
}

pub struct UserRole;

impl RequiredRole for UserRole {
    fn kind() -> PrincipalKind {
        PrincipalKind::User
    }
}

pub struct AdminRole;

impl RequiredRole for AdminRole {
    fn kind() -> PrincipalKind {
        PrincipalKind::Admin
    }
}

pub struct SuperAdminRole;

impl RequiredRole for SuperAdminRole {
    fn kind() -> PrincipalKind {
        PrincipalKind::Admin
    }

    fn superadmin_only() -> bool {
        true
    }
}
