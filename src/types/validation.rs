use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use super::models::*;

const MAX_NAME_LEN: usize = 100;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-z]+@[0-9a-z]+(\.[0-9a-z]+)+$").expect("email pattern compiles")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Shape checks that run before a value is handed to the store.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

fn require_text(value: &str, field: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(format!("{field} is required")));
    }
    Ok(())
}

fn require_id(value: i64, field: &str) -> Result<(), ValidationError> {
    if value <= 0 {
        return Err(ValidationError::new(format!(
            "{field} is required and must be positive"
        )));
    }
    Ok(())
}

fn validate_name(name: &str, entity: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::new(format!("{entity} name cannot be empty")));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::new(format!(
            "{entity} name cannot exceed {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if !EMAIL_RE.is_match(email) {
        return Err(ValidationError::new("email is invalid"));
    }
    Ok(())
}

impl Validate for NewProject {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.name, "Project")
    }
}

impl Validate for ProjectPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        match &self.name {
            Some(name) => validate_name(name, "Project"),
            None => Err(ValidationError::new("name is required")),
        }
    }
}

impl Validate for NewComponent {
    fn validate(&self) -> Result<(), ValidationError> {
        require_id(self.project_id, "project_id")?;
        validate_name(&self.name, "Component")
    }
}

impl Validate for ComponentPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(project_id) = self.project_id {
            require_id(project_id, "project_id")?;
        }
        if let Some(name) = &self.name {
            validate_name(name, "Component")?;
        }
        Ok(())
    }
}

impl Validate for NewBug {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text(&self.user_id, "user_id")?;
        require_id(self.component_id, "component_id")
    }
}

impl Validate for BugPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(votes) = self.votes {
            if votes < 0 {
                return Err(ValidationError::new("votes cannot be negative"));
            }
        }
        Ok(())
    }
}

impl Validate for NewComment {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text(&self.owner_id, "owner_id")?;
        require_id(self.bug_id, "bug_id")?;
        require_text(&self.summary, "summary")
    }
}

impl Validate for CommentPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text(self.summary.as_deref().unwrap_or_default(), "summary")
    }
}

impl Validate for NewMember {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text(&self.user_id, "user_id")?;
        require_id(self.project_id, "project_id")
    }
}

impl Validate for MemberPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.admin.is_none() {
            return Err(ValidationError::new("admin is required"));
        }
        Ok(())
    }
}

impl Validate for NewUser {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() || self.email.is_empty() || self.password.is_empty() {
            return Err(ValidationError::new(
                "missing data name, email, or password",
            ));
        }
        validate_email(&self.email)
    }
}

impl Validate for UserPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            require_text(name, "name")?;
        }
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        Ok(())
    }
}
