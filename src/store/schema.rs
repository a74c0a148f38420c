/// Ordered schema migrations. Entry `n` moves the database from
/// `user_version = n` to `n + 1`; entries are never edited once released.
pub const MIGRATIONS: &[&str] = &[
    // 1: initial schema
    r#"
-- Projects group components and members
CREATE TABLE IF NOT EXISTS projects (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    owner_id TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Components belong to a project (not enforced as a foreign key)
CREATE TABLE IF NOT EXISTS components (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    project_id INTEGER NOT NULL,
    name TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS bugs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL,
    component_id INTEGER NOT NULL,
    category TEXT NOT NULL DEFAULT '',
    severity TEXT NOT NULL DEFAULT '',
    summary TEXT NOT NULL DEFAULT '',
    status TEXT NOT NULL DEFAULT '',
    votes INTEGER NOT NULL DEFAULT 0,
    opened INTEGER NOT NULL DEFAULT 1,
    opened_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS comments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    owner_id TEXT NOT NULL,
    bug_id INTEGER NOT NULL,
    summary TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS members (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL,
    project_id INTEGER NOT NULL,
    admin INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL,
    verification_code INTEGER UNIQUE,
    verification_code_expires_at TEXT,
    verified INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_projects_owner ON projects(owner_id);
CREATE INDEX IF NOT EXISTS idx_projects_name ON projects(name);
CREATE INDEX IF NOT EXISTS idx_components_project ON components(project_id);
CREATE INDEX IF NOT EXISTS idx_bugs_component ON bugs(component_id);
CREATE INDEX IF NOT EXISTS idx_bugs_user ON bugs(user_id);
CREATE INDEX IF NOT EXISTS idx_comments_bug ON comments(bug_id);
CREATE INDEX IF NOT EXISTS idx_comments_owner ON comments(owner_id);
"#,
    // 2: one membership per user and project
    r#"
CREATE UNIQUE INDEX IF NOT EXISTS idx_members_user_project ON members(user_id, project_id);
"#,
    // 3: project names are unique
    r#"
DROP INDEX IF EXISTS idx_projects_name;
CREATE UNIQUE INDEX IF NOT EXISTS idx_projects_name_unique ON projects(name);
"#,
];

/// Schema version a fully migrated database reports.
#[must_use]
pub fn latest_version() -> i64 {
    MIGRATIONS.len() as i64
}
