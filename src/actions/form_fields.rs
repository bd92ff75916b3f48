//! Submitted form values.

use crate::catalog_store::{CatalogError, CatalogResult};
use chrono::NaiveDate;

/// Field names shared by the rendered forms and the form parser.
pub mod field {
    pub const ID: &str = "id";
    pub const TITLE: &str = "title";
    pub const DEVELOPER: &str = "developer";
    pub const RELEASE_DATE: &str = "releaseDate";
    pub const DESCRIPTION: &str = "description";
    pub const GENRE_ID: &str = "genreID";
    pub const NAME: &str = "name";
    pub const ROLE: &str = "role";
    pub const VISUAL_NOVEL_ID: &str = "visualNovelID";
    pub const USER_NAME: &str = "userName";
    pub const RATING: &str = "rating";
    pub const COMMENT: &str = "comment";
    pub const SEARCH_TERM: &str = "searchTerm";
    /// Comma separated list of nullable fields to clear on update.
    pub const CLEAR: &str = "clear";
}

/// Key/value pairs as submitted by a form. An empty value counts as not
/// submitted, the same as a blank form input.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormFields {
    fields: Vec<(String, String)>,
}

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.fields.push((key.into(), value.into()));
        self
    }

    /// Parse `key=value` tokens. The value may itself contain `=`.
    pub fn parse_pairs<I, S>(pairs: I) -> CatalogResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut fields = FormFields::new();
        for pair in pairs {
            let pair = pair.as_ref();
            match pair.split_once('=') {
                Some((key, value)) if !key.trim().is_empty() => {
                    fields.insert(key.trim(), value);
                }
                _ => {
                    return Err(CatalogError::Validation {
                        field: "form",
                        reason: format!("expected key=value, got '{}'", pair),
                    })
                }
            }
        }
        Ok(fields)
    }

    /// The last non-empty value submitted for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .rev()
            .find(|(k, v)| k == key && !v.is_empty())
            .map(|(_, v)| v.as_str())
    }

    pub fn optional_text(&self, key: &str) -> Option<String> {
        self.get(key).map(str::to_string)
    }

    pub fn required_text(&self, key: &'static str) -> CatalogResult<String> {
        self.get(key)
            .filter(|v| !v.trim().is_empty())
            .map(str::to_string)
            .ok_or_else(|| CatalogError::required(key))
    }

    pub fn optional_integer(&self, key: &'static str) -> CatalogResult<Option<i64>> {
        self.get(key)
            .map(|value| {
                value.trim().parse::<i64>().map_err(|_| CatalogError::Validation {
                    field: key,
                    reason: format!("'{}' is not an integer", value),
                })
            })
            .transpose()
    }

    pub fn required_integer(&self, key: &'static str) -> CatalogResult<i64> {
        self.optional_integer(key)?
            .ok_or_else(|| CatalogError::required(key))
    }

    pub fn optional_date(&self, key: &'static str) -> CatalogResult<Option<NaiveDate>> {
        self.get(key)
            .map(|value| parse_date(key, value))
            .transpose()
    }

    /// Names listed in a comma separated field.
    pub fn list(&self, key: &str) -> Vec<&str> {
        self.get(key)
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormFields {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut fields = FormFields::new();
        for (key, value) in iter {
            fields.insert(key, value);
        }
        fields
    }
}

pub fn parse_date(field: &'static str, value: &str) -> CatalogResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| CatalogError::Validation {
        field,
        reason: format!("'{}' is not a date (YYYY-MM-DD)", value),
    })
}
