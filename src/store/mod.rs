mod query;
mod schema;
mod sqlite;

pub use schema::latest_version;
pub use sqlite::SqliteStore;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::types::*;

/// Store defines the database interface.
///
/// `get_*` return `Ok(None)` for a missing row, `update_*` return
/// [`crate::error::Error::NotFound`], and `delete_*` return `Ok(false)`.
pub trait Store: Send + Sync {
    /// Brings the schema up to date. Safe to call repeatedly.
    fn migrate(&self) -> Result<()>;

    // Project operations
    fn create_project(&self, project: &NewProject) -> Result<Project>;
    fn get_project(&self, id: i64) -> Result<Option<Project>>;
    fn get_project_by_name(&self, name: &str) -> Result<Option<Project>>;
    fn update_project(&self, id: i64, patch: &ProjectPatch) -> Result<Project>;
    fn delete_project(&self, id: i64) -> Result<bool>;
    fn filter_projects(&self, filter: &ProjectFilter) -> Result<Vec<Project>>;

    // Component operations
    fn create_component(&self, component: &NewComponent) -> Result<Component>;
    fn get_component(&self, id: i64) -> Result<Option<Component>>;
    fn update_component(&self, id: i64, patch: &ComponentPatch) -> Result<Component>;
    fn delete_component(&self, id: i64) -> Result<bool>;
    fn filter_components(&self, filter: &ComponentFilter) -> Result<Vec<Component>>;

    // Bug operations
    fn create_bug(&self, bug: &NewBug) -> Result<Bug>;
    fn get_bug(&self, id: i64) -> Result<Option<Bug>>;
    fn update_bug(&self, id: i64, patch: &BugPatch) -> Result<Bug>;
    fn delete_bug(&self, id: i64) -> Result<bool>;
    fn filter_bugs(&self, filter: &BugFilter) -> Result<Vec<Bug>>;

    // Comment operations
    fn create_comment(&self, comment: &NewComment) -> Result<Comment>;
    fn get_comment(&self, id: i64) -> Result<Option<Comment>>;
    fn update_comment(&self, id: i64, patch: &CommentPatch) -> Result<Comment>;
    fn delete_comment(&self, id: i64) -> Result<bool>;
    fn filter_comments(&self, filter: &CommentFilter) -> Result<Vec<Comment>>;

    // Member operations
    fn create_member(&self, member: &NewMember) -> Result<Member>;
    fn get_member(&self, id: i64) -> Result<Option<Member>>;
    fn find_member(&self, user_id: &str, project_id: i64) -> Result<Option<Member>>;
    fn list_members(&self) -> Result<Vec<Member>>;
    fn update_member(&self, id: i64, patch: &MemberPatch) -> Result<Member>;
    fn delete_member(&self, id: i64) -> Result<bool>;

    // User operations
    fn create_user(&self, user: &User) -> Result<()>;
    fn get_user(&self, id: &str) -> Result<Option<User>>;
    fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    fn get_user_by_verification_code(&self, code: i64) -> Result<Option<User>>;
    fn verification_code_exists(&self, code: i64) -> Result<bool>;
    fn mark_user_verified(&self, id: &str) -> Result<()>;
    fn replace_verification_code(
        &self,
        id: &str,
        code: i64,
        expires_at: DateTime<Utc>,
    ) -> Result<()>;
    fn update_user(&self, id: &str, patch: &UserPatch) -> Result<User>;
}
