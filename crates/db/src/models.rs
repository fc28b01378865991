//! Row structs for the tables this crate writes to or reads typed.
//!
//! Search and reservation listings stay as untyped [`ResultRow`]s; only
//! users are decoded, because callers need their fields for login.
//!
//! [`ResultRow`]: crate::store::ResultRow

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// users
// ---------------------------------------------------------------------------

/// A persisted user row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    /// Password hash as stored; never a plain-text password.
    pub password: String,
}

/// Fields required to register a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

// ---------------------------------------------------------------------------
// properties
// ---------------------------------------------------------------------------

/// A property listing to insert. Unset optional fields are left to the
/// column defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewProperty {
    pub owner_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub thumbnail_photo_url: Option<String>,
    #[serde(default)]
    pub cover_photo_url: Option<String>,
    /// Minor currency units (cents).
    pub cost_per_night: i64,
    #[serde(default)]
    pub parking_spaces: Option<i64>,
    #[serde(default)]
    pub number_of_bathrooms: Option<i64>,
    #[serde(default)]
    pub number_of_bedrooms: Option<i64>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub post_code: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
}
