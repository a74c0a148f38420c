use rusqlite::types::ToSql;

/// Builds a conjunctive `WHERE` clause from optional criteria.
///
/// Absent criteria and empty strings are skipped entirely, so an empty
/// builder matches every row.
#[derive(Default)]
pub struct WhereBuilder {
    clauses: Vec<String>,
    params: Vec<Box<dyn ToSql>>,
}

impl WhereBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `column op ?` when `value` is present.
    #[must_use]
    pub fn push<T: ToSql + 'static>(mut self, column: &str, op: &str, value: Option<T>) -> Self {
        if let Some(value) = value {
            self.params.push(Box::new(value));
            self.clauses
                .push(format!("{column} {op} ?{}", self.params.len()));
        }
        self
    }

    /// Adds `column = ?` when `value` is present and non-empty.
    #[must_use]
    pub fn eq_text(self, column: &str, value: Option<&str>) -> Self {
        let value = value.filter(|v| !v.is_empty()).map(str::to_string);
        self.push(column, "=", value)
    }

    #[must_use]
    pub fn eq<T: ToSql + 'static>(self, column: &str, value: Option<T>) -> Self {
        self.push(column, "=", value)
    }

    /// The clause including the leading `WHERE`, or an empty string.
    #[must_use]
    pub fn sql(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clauses.join(" AND "))
        }
    }

    #[must_use]
    pub fn params(&self) -> Vec<&dyn ToSql> {
        self.params.iter().map(|p| p.as_ref()).collect()
    }
}

/// Collects `column = ?` assignments for a partial UPDATE; `None` values
/// are left untouched.
#[derive(Default)]
pub struct SetBuilder {
    assignments: Vec<String>,
    params: Vec<Box<dyn ToSql>>,
}

impl SetBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn set<T: ToSql + 'static>(mut self, column: &str, value: Option<T>) -> Self {
        if let Some(value) = value {
            self.params.push(Box::new(value));
            self.assignments
                .push(format!("{column} = ?{}", self.params.len()));
        }
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// `UPDATE {table} SET ... WHERE id = ?N` with the id bound last.
    #[must_use]
    pub fn update_sql(&self, table: &str) -> String {
        format!(
            "UPDATE {table} SET {} WHERE id = ?{}",
            self.assignments.join(", "),
            self.params.len() + 1
        )
    }

    #[must_use]
    pub fn params_with_id<'a>(&'a self, id: &'a dyn ToSql) -> Vec<&'a dyn ToSql> {
        let mut params: Vec<&dyn ToSql> = self.params.iter().map(|p| p.as_ref()).collect();
        params.push(id);
        params
    }
}
