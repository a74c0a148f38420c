use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::de::{int_or_string, opt_int_or_string, string_or_int};

// Projects

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewProject {
    #[serde(default)]
    pub name: String,
    /// Set from the authenticated caller, never from the request body.
    /// Empty for projects created anonymously.
    #[serde(skip)]
    pub owner_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectPatch {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    pub owner_id: Option<String>,
    pub name: Option<String>,
    pub created_after: Option<DateTime<Utc>>,
}

// Components

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub id: i64,
    pub project_id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewComponent {
    #[serde(default, deserialize_with = "int_or_string")]
    pub project_id: i64,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComponentPatch {
    #[serde(default, deserialize_with = "opt_int_or_string")]
    pub project_id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ComponentFilter {
    pub project_id: Option<i64>,
    pub name: Option<String>,
    pub created_after: Option<DateTime<Utc>>,
}

// Bugs

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bug {
    pub id: i64,
    pub user_id: String,
    pub component_id: i64,
    pub category: String,
    pub severity: String,
    pub summary: String,
    pub status: String,
    pub votes: i64,
    pub opened: bool,
    pub opened_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewBug {
    #[serde(default, deserialize_with = "string_or_int")]
    pub user_id: String,
    #[serde(default, deserialize_with = "int_or_string")]
    pub component_id: i64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BugPatch {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub votes: Option<i64>,
    #[serde(default)]
    pub opened: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct BugFilter {
    pub user_id: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub component_id: Option<i64>,
}

// Comments

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub owner_id: String,
    pub bug_id: i64,
    pub summary: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewComment {
    #[serde(default, alias = "user_id", deserialize_with = "string_or_int")]
    pub owner_id: String,
    #[serde(default, deserialize_with = "int_or_string")]
    pub bug_id: i64,
    #[serde(default)]
    pub summary: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentPatch {
    #[serde(default)]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CommentFilter {
    pub bug_id: Option<i64>,
    pub owner_id: Option<String>,
}

// Members

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: i64,
    pub user_id: String,
    pub project_id: i64,
    pub admin: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewMember {
    #[serde(default, deserialize_with = "string_or_int")]
    pub user_id: String,
    #[serde(default, deserialize_with = "int_or_string")]
    pub project_id: i64,
    #[serde(default, alias = "admin_bool")]
    pub admin: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemberPatch {
    #[serde(default, alias = "admin_bool")]
    pub admin: Option<bool>,
}

// Users

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password: String,
    #[serde(skip)]
    pub verification_code: i64,
    #[serde(skip)]
    pub verification_code_expires_at: Option<DateTime<Utc>>,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewUser {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}
