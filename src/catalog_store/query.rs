//! Structural builders for dynamic `WHERE` and `SET` clauses.
//!
//! Column names are `'static` strings chosen by the store, values always go
//! through numbered placeholders. Nothing a caller supplies is ever spliced
//! into SQL text.

use rusqlite::types::Value;

/// Escape character used in every generated `LIKE` pattern.
const LIKE_ESCAPE: char = '\\';

/// Wrap `text` in `%...%` so it matches as a literal substring.
pub fn contains_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

enum Condition {
    Equals(&'static str),
    /// Case-insensitive (ASCII) substring match on any of the columns.
    ContainsAny(&'static [&'static str]),
}

/// A conjunction of conditions, each bound to exactly one value.
#[derive(Default)]
pub struct Filter {
    conditions: Vec<(Condition, Value)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn equals(&mut self, column: &'static str, value: impl Into<Value>) -> &mut Self {
        self.conditions
            .push((Condition::Equals(column), value.into()));
        self
    }

    pub fn contains(&mut self, column: &'static [&'static str], text: &str) -> &mut Self {
        self.conditions.push((
            Condition::ContainsAny(column),
            Value::Text(contains_pattern(text)),
        ));
        self
    }

    /// Renders ` WHERE ...` (or nothing) with placeholders numbered from
    /// `first_placeholder`, and returns the values in placeholder order.
    pub fn build(self, first_placeholder: usize) -> (String, Vec<Value>) {
        if self.conditions.is_empty() {
            return (String::new(), Vec::new());
        }

        let mut clauses = Vec::with_capacity(self.conditions.len());
        let mut values = Vec::with_capacity(self.conditions.len());
        for (index, (condition, value)) in self.conditions.into_iter().enumerate() {
            let placeholder = first_placeholder + index;
            clauses.push(match condition {
                Condition::Equals(column) => format!("{} = ?{}", column, placeholder),
                Condition::ContainsAny(columns) => {
                    let alternatives = columns
                        .iter()
                        .map(|column| {
                            format!("{} LIKE ?{} ESCAPE '{}'", column, placeholder, LIKE_ESCAPE)
                        })
                        .collect::<Vec<_>>();
                    if alternatives.len() == 1 {
                        alternatives.concat()
                    } else {
                        format!("({})", alternatives.join(" OR "))
                    }
                }
            });
            values.push(value);
        }
        (format!(" WHERE {}", clauses.join(" AND ")), values)
    }
}

/// Column assignments for an `UPDATE ... SET`.
#[derive(Default)]
pub struct Assignments {
    columns: Vec<&'static str>,
    values: Vec<Value>,
}

impl Assignments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, column: &'static str, value: impl Into<Value>) -> &mut Self {
        self.columns.push(column);
        self.values.push(value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Renders `UPDATE table SET a = ?1, b = ?2 WHERE key = ?3`. The key value
    /// is appended after the assigned values.
    pub fn build_update(
        self,
        table: &'static str,
        key_column: &'static str,
        key: impl Into<Value>,
    ) -> (String, Vec<Value>) {
        let set = self
            .columns
            .iter()
            .enumerate()
            .map(|(index, column)| format!("{} = ?{}", column, index + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE {} SET {} WHERE {} = ?{}",
            table,
            set,
            key_column,
            self.columns.len() + 1
        );
        let mut values = self.values;
        values.push(key.into());
        (sql, values)
    }
}
