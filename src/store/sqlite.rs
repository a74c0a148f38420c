use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

use super::Store;
use super::query::{SetBuilder, WhereBuilder};
use super::schema::{MIGRATIONS, latest_version};
use crate::error::{Error, Result};
use crate::types::*;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const PROJECT_COLUMNS: &str = "id, name, owner_id, created_at";
const COMPONENT_COLUMNS: &str = "id, project_id, name, created_at";
const BUG_COLUMNS: &str = "id, user_id, component_id, category, severity, summary, status, \
                           votes, opened, opened_at, updated_at";
const COMMENT_COLUMNS: &str = "id, owner_id, bug_id, summary, created_at";
const MEMBER_COLUMNS: &str = "id, user_id, project_id, admin";
const USER_COLUMNS: &str = "id, name, email, password, verification_code, \
                            verification_code_expires_at, verified, created_at";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.busy_timeout(BUSY_TIMEOUT)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Opens a private in-memory database, mostly useful for tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Returns the schema version recorded in the database file.
    pub fn schema_version(&self) -> Result<i64> {
        let conn = self.conn();
        let version = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
        Ok(version)
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Handle SQLite's default datetime format: "YYYY-MM-DD HH:MM:SS"
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            tracing::error!("Invalid datetime in database: '{}' - {}", s, e);
            Utc::now()
        })
}

/// Fixed-width UTC timestamps, so TEXT comparisons order chronologically.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn project_from_row(row: &Row<'_>) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get(0)?,
        name: row.get(1)?,
        owner_id: row.get(2)?,
        created_at: parse_datetime(&row.get::<_, String>(3)?),
    })
}

fn component_from_row(row: &Row<'_>) -> rusqlite::Result<Component> {
    Ok(Component {
        id: row.get(0)?,
        project_id: row.get(1)?,
        name: row.get(2)?,
        created_at: parse_datetime(&row.get::<_, String>(3)?),
    })
}

fn bug_from_row(row: &Row<'_>) -> rusqlite::Result<Bug> {
    Ok(Bug {
        id: row.get(0)?,
        user_id: row.get(1)?,
        component_id: row.get(2)?,
        category: row.get(3)?,
        severity: row.get(4)?,
        summary: row.get(5)?,
        status: row.get(6)?,
        votes: row.get(7)?,
        opened: row.get(8)?,
        opened_at: parse_datetime(&row.get::<_, String>(9)?),
        updated_at: parse_datetime(&row.get::<_, String>(10)?),
    })
}

fn comment_from_row(row: &Row<'_>) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        bug_id: row.get(2)?,
        summary: row.get(3)?,
        created_at: parse_datetime(&row.get::<_, String>(4)?),
    })
}

fn member_from_row(row: &Row<'_>) -> rusqlite::Result<Member> {
    Ok(Member {
        id: row.get(0)?,
        user_id: row.get(1)?,
        project_id: row.get(2)?,
        admin: row.get(3)?,
    })
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password: row.get(3)?,
        verification_code: row.get::<_, Option<i64>>(4)?.unwrap_or_default(),
        verification_code_expires_at: row
            .get::<_, Option<String>>(5)?
            .map(|s| parse_datetime(&s)),
        verified: row.get(6)?,
        created_at: parse_datetime(&row.get::<_, String>(7)?),
    })
}

fn select_by_id<T>(
    conn: &Connection,
    table: &str,
    columns: &str,
    id: i64,
    map: fn(&Row<'_>) -> rusqlite::Result<T>,
) -> Result<Option<T>> {
    conn.query_row(
        &format!("SELECT {columns} FROM {table} WHERE id = ?1"),
        params![id],
        map,
    )
    .optional()
    .map_err(Error::from)
}

fn select_where<T>(
    conn: &Connection,
    table: &str,
    columns: &str,
    filter: &WhereBuilder,
    map: fn(&Row<'_>) -> rusqlite::Result<T>,
) -> Result<Vec<T>> {
    let sql = format!("SELECT {columns} FROM {table}{} ORDER BY id", filter.sql());
    let mut stmt = conn.prepare(&sql)?;
    let params = filter.params();
    let rows = stmt.query_map(params.as_slice(), map)?;

    rows.collect::<std::result::Result<Vec<_>, _>>()
        .map_err(Error::from)
}

/// Applies `set` to the row with `id`, failing with [`Error::NotFound`] when
/// no such row exists. An empty `set` only checks existence.
fn apply_update(conn: &Connection, table: &str, id: i64, set: &SetBuilder) -> Result<()> {
    if set.is_empty() {
        let exists: Option<i64> = conn
            .query_row(
                &format!("SELECT 1 FROM {table} WHERE id = ?1"),
                params![id],
                |row| row.get(0),
            )
            .optional()?;
        return exists.map(|_| ()).ok_or(Error::NotFound);
    }

    let rows = conn
        .execute(&set.update_sql(table), set.params_with_id(&id).as_slice())
        .map_err(Error::from_write)?;

    if rows == 0 {
        return Err(Error::NotFound);
    }
    Ok(())
}

fn delete_by_id(conn: &Connection, table: &str, id: i64) -> Result<bool> {
    let rows = conn.execute(&format!("DELETE FROM {table} WHERE id = ?1"), params![id])?;
    Ok(rows > 0)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl Store for SqliteStore {
    fn migrate(&self) -> Result<()> {
        let mut conn = self.conn();
        let current: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

        if current > latest_version() {
            return Err(Error::UnsupportedSchema(current));
        }

        for (index, migration) in MIGRATIONS.iter().enumerate().skip(current as usize) {
            let version = index as i64 + 1;
            let tx = conn.transaction()?;
            tx.execute_batch(migration)?;
            tx.pragma_update(None, "user_version", version)?;
            tx.commit()?;
            tracing::info!("Applied schema migration {}", version);
        }
        Ok(())
    }

    // Project operations

    fn create_project(&self, project: &NewProject) -> Result<Project> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO projects (name, owner_id, created_at) VALUES (?1, ?2, ?3)",
            params![
                project.name,
                project.owner_id,
                format_datetime(&Utc::now())
            ],
        )
        .map_err(Error::from_write)?;

        let id = conn.last_insert_rowid();
        select_by_id(&conn, "projects", PROJECT_COLUMNS, id, project_from_row)?
            .ok_or(Error::NotFound)
    }

    fn get_project(&self, id: i64) -> Result<Option<Project>> {
        let conn = self.conn();
        select_by_id(&conn, "projects", PROJECT_COLUMNS, id, project_from_row)
    }

    fn get_project_by_name(&self, name: &str) -> Result<Option<Project>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE name = ?1 ORDER BY id LIMIT 1"),
            params![name],
            project_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn update_project(&self, id: i64, patch: &ProjectPatch) -> Result<Project> {
        let conn = self.conn();
        let set = SetBuilder::new().set("name", patch.name.clone());
        apply_update(&conn, "projects", id, &set)?;

        select_by_id(&conn, "projects", PROJECT_COLUMNS, id, project_from_row)?
            .ok_or(Error::NotFound)
    }

    fn delete_project(&self, id: i64) -> Result<bool> {
        delete_by_id(&self.conn(), "projects", id)
    }

    fn filter_projects(&self, filter: &ProjectFilter) -> Result<Vec<Project>> {
        let conn = self.conn();
        let clause = WhereBuilder::new()
            .eq_text("owner_id", non_empty(&filter.owner_id))
            .eq_text("name", non_empty(&filter.name))
            .push(
                "created_at",
                ">",
                filter.created_after.as_ref().map(format_datetime),
            );
        select_where(&conn, "projects", PROJECT_COLUMNS, &clause, project_from_row)
    }

    // Component operations

    fn create_component(&self, component: &NewComponent) -> Result<Component> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO components (project_id, name, created_at) VALUES (?1, ?2, ?3)",
            params![
                component.project_id,
                component.name,
                format_datetime(&Utc::now())
            ],
        )
        .map_err(Error::from_write)?;

        let id = conn.last_insert_rowid();
        select_by_id(&conn, "components", COMPONENT_COLUMNS, id, component_from_row)?
            .ok_or(Error::NotFound)
    }

    fn get_component(&self, id: i64) -> Result<Option<Component>> {
        let conn = self.conn();
        select_by_id(&conn, "components", COMPONENT_COLUMNS, id, component_from_row)
    }

    fn update_component(&self, id: i64, patch: &ComponentPatch) -> Result<Component> {
        let conn = self.conn();
        let set = SetBuilder::new()
            .set("project_id", patch.project_id)
            .set("name", patch.name.clone());
        apply_update(&conn, "components", id, &set)?;

        select_by_id(&conn, "components", COMPONENT_COLUMNS, id, component_from_row)?
            .ok_or(Error::NotFound)
    }

    fn delete_component(&self, id: i64) -> Result<bool> {
        delete_by_id(&self.conn(), "components", id)
    }

    fn filter_components(&self, filter: &ComponentFilter) -> Result<Vec<Component>> {
        let conn = self.conn();
        let clause = WhereBuilder::new()
            .eq("project_id", filter.project_id)
            .eq_text("name", non_empty(&filter.name))
            .push(
                "created_at",
                ">",
                filter.created_after.as_ref().map(format_datetime),
            );
        select_where(
            &conn,
            "components",
            COMPONENT_COLUMNS,
            &clause,
            component_from_row,
        )
    }

    // Bug operations

    fn create_bug(&self, bug: &NewBug) -> Result<Bug> {
        let conn = self.conn();
        let now = format_datetime(&Utc::now());
        conn.execute(
            "INSERT INTO bugs (user_id, component_id, category, severity, summary, status,
                               votes, opened, opened_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, 1, ?7, ?7)",
            params![
                bug.user_id,
                bug.component_id,
                bug.category,
                bug.severity,
                bug.summary,
                bug.status,
                now,
            ],
        )
        .map_err(Error::from_write)?;

        let id = conn.last_insert_rowid();
        select_by_id(&conn, "bugs", BUG_COLUMNS, id, bug_from_row)?.ok_or(Error::NotFound)
    }

    fn get_bug(&self, id: i64) -> Result<Option<Bug>> {
        let conn = self.conn();
        select_by_id(&conn, "bugs", BUG_COLUMNS, id, bug_from_row)
    }

    fn update_bug(&self, id: i64, patch: &BugPatch) -> Result<Bug> {
        let conn = self.conn();
        let mut set = SetBuilder::new()
            .set("category", patch.category.clone())
            .set("severity", patch.severity.clone())
            .set("summary", patch.summary.clone())
            .set("status", patch.status.clone())
            .set("votes", patch.votes)
            .set("opened", patch.opened);
        if !set.is_empty() {
            set = set.set("updated_at", Some(format_datetime(&Utc::now())));
        }
        apply_update(&conn, "bugs", id, &set)?;

        select_by_id(&conn, "bugs", BUG_COLUMNS, id, bug_from_row)?.ok_or(Error::NotFound)
    }

    fn delete_bug(&self, id: i64) -> Result<bool> {
        delete_by_id(&self.conn(), "bugs", id)
    }

    fn filter_bugs(&self, filter: &BugFilter) -> Result<Vec<Bug>> {
        let conn = self.conn();
        let clause = WhereBuilder::new()
            .eq_text("user_id", non_empty(&filter.user_id))
            .eq_text("category", non_empty(&filter.category))
            .eq_text("status", non_empty(&filter.status))
            .eq("component_id", filter.component_id);
        select_where(&conn, "bugs", BUG_COLUMNS, &clause, bug_from_row)
    }

    // Comment operations

    fn create_comment(&self, comment: &NewComment) -> Result<Comment> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO comments (owner_id, bug_id, summary, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                comment.owner_id,
                comment.bug_id,
                comment.summary,
                format_datetime(&Utc::now())
            ],
        )
        .map_err(Error::from_write)?;

        let id = conn.last_insert_rowid();
        select_by_id(&conn, "comments", COMMENT_COLUMNS, id, comment_from_row)?
            .ok_or(Error::NotFound)
    }

    fn get_comment(&self, id: i64) -> Result<Option<Comment>> {
        let conn = self.conn();
        select_by_id(&conn, "comments", COMMENT_COLUMNS, id, comment_from_row)
    }

    fn update_comment(&self, id: i64, patch: &CommentPatch) -> Result<Comment> {
        let conn = self.conn();
        let set = SetBuilder::new().set("summary", patch.summary.clone());
        apply_update(&conn, "comments", id, &set)?;

        select_by_id(&conn, "comments", COMMENT_COLUMNS, id, comment_from_row)?
            .ok_or(Error::NotFound)
    }

    fn delete_comment(&self, id: i64) -> Result<bool> {
        delete_by_id(&self.conn(), "comments", id)
    }

    fn filter_comments(&self, filter: &CommentFilter) -> Result<Vec<Comment>> {
        let conn = self.conn();
        let clause = WhereBuilder::new()
            .eq("bug_id", filter.bug_id)
            .eq_text("owner_id", non_empty(&filter.owner_id));
        select_where(&conn, "comments", COMMENT_COLUMNS, &clause, comment_from_row)
    }

    // Member operations

    fn create_member(&self, member: &NewMember) -> Result<Member> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO members (user_id, project_id, admin) VALUES (?1, ?2, ?3)",
            params![member.user_id, member.project_id, member.admin],
        )
        .map_err(Error::from_write)?;

        let id = conn.last_insert_rowid();
        select_by_id(&conn, "members", MEMBER_COLUMNS, id, member_from_row)?
            .ok_or(Error::NotFound)
    }

    fn get_member(&self, id: i64) -> Result<Option<Member>> {
        let conn = self.conn();
        select_by_id(&conn, "members", MEMBER_COLUMNS, id, member_from_row)
    }

    fn find_member(&self, user_id: &str, project_id: i64) -> Result<Option<Member>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {MEMBER_COLUMNS} FROM members WHERE user_id = ?1 AND project_id = ?2"),
            params![user_id, project_id],
            member_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_members(&self) -> Result<Vec<Member>> {
        let conn = self.conn();
        select_where(
            &conn,
            "members",
            MEMBER_COLUMNS,
            &WhereBuilder::new(),
            member_from_row,
        )
    }

    fn update_member(&self, id: i64, patch: &MemberPatch) -> Result<Member> {
        let conn = self.conn();
        let set = SetBuilder::new().set("admin", patch.admin);
        apply_update(&conn, "members", id, &set)?;

        select_by_id(&conn, "members", MEMBER_COLUMNS, id, member_from_row)?
            .ok_or(Error::NotFound)
    }

    fn delete_member(&self, id: i64) -> Result<bool> {
        delete_by_id(&self.conn(), "members", id)
    }

    // User operations

    fn create_user(&self, user: &User) -> Result<()> {
        self.conn()
            .execute(
                "INSERT INTO users (id, name, email, password, verification_code,
                                    verification_code_expires_at, verified, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    user.id,
                    user.name,
                    user.email,
                    user.password,
                    user.verification_code,
                    user.verification_code_expires_at.as_ref().map(format_datetime),
                    user.verified,
                    format_datetime(&user.created_at),
                ],
            )
            .map_err(Error::from_write)?;
        Ok(())
    }

    fn get_user(&self, id: &str) -> Result<Option<User>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            params![id],
            user_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
            params![email],
            user_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn get_user_by_verification_code(&self, code: i64) -> Result<Option<User>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE verification_code = ?1"),
            params![code],
            user_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn verification_code_exists(&self, code: i64) -> Result<bool> {
        let conn = self.conn();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM users WHERE verification_code = ?1",
            params![code],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn mark_user_verified(&self, id: &str) -> Result<()> {
        let rows = self
            .conn()
            .execute("UPDATE users SET verified = 1 WHERE id = ?1", params![id])?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn replace_verification_code(
        &self,
        id: &str,
        code: i64,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        let rows = self
            .conn()
            .execute(
                "UPDATE users SET verification_code = ?1, verification_code_expires_at = ?2
                 WHERE id = ?3",
                params![code, format_datetime(&expires_at), id],
            )
            .map_err(Error::from_write)?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn update_user(&self, id: &str, patch: &UserPatch) -> Result<User> {
        let conn = self.conn();
        let mut assignments = Vec::new();
        if patch.name.is_some() {
            assignments.push("name = COALESCE(?1, name)");
        }
        if patch.email.is_some() {
            assignments.push("email = COALESCE(?2, email)");
        }

        if !assignments.is_empty() {
            let rows = conn
                .execute(
                    &format!("UPDATE users SET {} WHERE id = ?3", assignments.join(", ")),
                    params![patch.name, patch.email, id],
                )
                .map_err(Error::from_write)?;
            if rows == 0 {
                return Err(Error::NotFound);
            }
        }

        conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            params![id],
            user_from_row,
        )
        .optional()?
        .ok_or(Error::NotFound)
    }
}
