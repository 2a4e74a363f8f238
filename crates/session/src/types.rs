//! Wire types for the DAHOUSE API.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque bearer token returned by `/login`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Body of `POST /login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(rename = "nombre_usuario")]
    pub username: String,
    pub password: String,
}

/// Body of a successful `POST /login`. Extra fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: AccessToken,
}

/// A single profile value as sent by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Integer(i64),
    /// Only values above `i64::MAX` land here.
    Unsigned(u64),
    Float(f64),
    Text(String),
    Other(serde_json::Value),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::Integer(n) => write!(f, "{n}"),
            FieldValue::Unsigned(n) => write!(f, "{n}"),
            FieldValue::Float(n) => write!(f, "{n}"),
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Other(v) => write!(f, "{v}"),
        }
    }
}

/// Body of `GET /user`.
///
/// Every key is optional on the wire; a missing key or JSON `null` becomes
/// `None` here so callers never look up fields by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<FieldValue>,
    #[serde(
        rename = "correo_electronico",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub email: Option<FieldValue>,
    #[serde(
        rename = "nombre_usuario",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub username: Option<FieldValue>,
    #[serde(rename = "rol", default, skip_serializing_if = "Option::is_none")]
    pub role: Option<FieldValue>,
    #[serde(rename = "jornada", default, skip_serializing_if = "Option::is_none")]
    pub shift: Option<FieldValue>,
    #[serde(
        rename = "fecha_registro",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub registered_at: Option<FieldValue>,
}

/// Profile fields in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Id,
    Email,
    Username,
    Role,
    Shift,
    RegisteredAt,
}

impl ProfileField {
    pub const ALL: [ProfileField; 6] = [
        ProfileField::Id,
        ProfileField::Email,
        ProfileField::Username,
        ProfileField::Role,
        ProfileField::Shift,
        ProfileField::RegisteredAt,
    ];
}

impl UserProfile {
    pub fn get(&self, field: ProfileField) -> Option<&FieldValue> {
        match field {
            ProfileField::Id => self.id.as_ref(),
            ProfileField::Email => self.email.as_ref(),
            ProfileField::Username => self.username.as_ref(),
            ProfileField::Role => self.role.as_ref(),
            ProfileField::Shift => self.shift.as_ref(),
            ProfileField::RegisteredAt => self.registered_at.as_ref(),
        }
    }
}
