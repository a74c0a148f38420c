use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::server::response::ApiError;
use crate::types::de::opt_string_or_int;
use crate::types::{BugFilter, CommentFilter, ComponentFilter, ProjectFilter, User};

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn parse_opt_id(value: Option<String>, field: &str) -> Result<Option<i64>, ApiError> {
    non_empty(value)
        .map(|v| {
            v.parse::<i64>()
                .map_err(|_| ApiError::bad_request(format!("failed to parse the {field}")))
        })
        .transpose()
}

/// Accepts RFC 3339 timestamps or plain `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_after(value: Option<String>) -> Result<Option<DateTime<Utc>>, ApiError> {
    let Some(value) = non_empty(value) else {
        return Ok(None);
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&value) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }
    NaiveDate::parse_from_str(&value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|ndt| Some(ndt.and_utc()))
        .ok_or_else(|| ApiError::bad_request("after must be a date (YYYY-MM-DD) or RFC 3339 time"))
}

#[derive(Debug, Default, Deserialize)]
pub struct ProjectQuery {
    #[serde(default)]
    pub userid: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub after: Option<String>,
}

impl ProjectQuery {
    pub fn into_filter(self) -> Result<ProjectFilter, ApiError> {
        Ok(ProjectFilter {
            owner_id: non_empty(self.userid),
            name: non_empty(self.name),
            created_after: parse_after(self.after)?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ComponentQuery {
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub after: Option<String>,
}

impl ComponentQuery {
    /// Components are always listed per project, so `project_id` is mandatory.
    pub fn into_filter(self) -> Result<ComponentFilter, ApiError> {
        let project_id = parse_opt_id(self.project_id, "project id")?
            .ok_or_else(|| ApiError::bad_request("missing or invalid project_id"))?;

        Ok(ComponentFilter {
            project_id: Some(project_id),
            name: non_empty(self.name),
            created_after: parse_after(self.after)?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct BugQuery {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub component_id: Option<String>,
}

impl BugQuery {
    pub fn into_filter(self) -> Result<BugFilter, ApiError> {
        Ok(BugFilter {
            user_id: non_empty(self.user_id),
            category: non_empty(self.category),
            status: non_empty(self.status),
            component_id: parse_opt_id(self.component_id, "component id")?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CommentQuery {
    #[serde(default)]
    pub bug_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl CommentQuery {
    pub fn into_filter(self) -> Result<CommentFilter, ApiError> {
        Ok(CommentFilter {
            bug_id: parse_opt_id(self.bug_id, "bug id")?,
            owner_id: non_empty(self.user_id),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct VerifyRequest {
    #[serde(default, deserialize_with = "opt_string_or_int")]
    pub verification_code: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SignInRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct RefreshTokenRequest {
    #[serde(default)]
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct SignInResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct AccessTokenResponse {
    pub access_token: String,
}
