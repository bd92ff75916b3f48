//! Catalog models.
//!
//! Row types returned by the store, plus the request types callers build to
//! create, update and search records.

use chrono::NaiveDate;
use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Identifiers
// =============================================================================

macro_rules! row_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.0))
            }
        }

        impl FromSql for $name {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                i64::column_result(value).map($name)
            }
        }
    };
}

row_id!(
    /// Rowid of a genre.
    GenreId
);
row_id!(
    /// Rowid of a visual novel.
    NovelId
);
row_id!(CharacterId);
row_id!(ReviewId);

// =============================================================================
// Stored Entities
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: GenreId,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualNovel {
    pub id: NovelId,
    pub title: String,
    pub developer: String,
    pub release_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub genre_id: Option<GenreId>,
}

/// A visual novel with its genre name resolved, `None` when no genre is set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualNovelWithGenre {
    #[serde(flatten)]
    pub novel: VisualNovel,
    pub genre_name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub role: Option<String>,
    pub visual_novel_id: NovelId,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub user_name: String,
    pub rating: i64,
    pub comment: Option<String>,
    pub visual_novel_id: NovelId,
}

/// A visual novel together with everything that belongs to it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NovelDetails {
    pub novel: VisualNovelWithGenre,
    pub characters: Vec<Character>,
    pub reviews: Vec<Review>,
}

/// What was removed together with a deleted visual novel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedNovel {
    pub id: NovelId,
    pub characters_removed: usize,
    pub reviews_removed: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogCounts {
    pub genres: usize,
    pub novels: usize,
    pub characters: usize,
    pub reviews: usize,
}

// =============================================================================
// Requests
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewVisualNovel {
    pub title: String,
    pub developer: String,
    pub release_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub genre_id: Option<GenreId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewCharacter {
    pub name: String,
    pub role: Option<String>,
    pub visual_novel_id: NovelId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewReview {
    pub user_name: String,
    pub rating: i64,
    pub comment: Option<String>,
    pub visual_novel_id: NovelId,
}

/// Update of a nullable column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldUpdate<T> {
    Keep,
    Clear,
    Set(T),
}

impl<T> Default for FieldUpdate<T> {
    fn default() -> Self {
        FieldUpdate::Keep
    }
}

impl<T> FieldUpdate<T> {
    pub fn is_keep(&self) -> bool {
        matches!(self, FieldUpdate::Keep)
    }

    /// The new column value, `None` when the column is left untouched.
    pub fn as_change(&self) -> Option<Option<&T>> {
        match self {
            FieldUpdate::Keep => None,
            FieldUpdate::Clear => Some(None),
            FieldUpdate::Set(value) => Some(Some(value)),
        }
    }
}

/// Partial update of a visual novel. Fields left at their default are not
/// touched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NovelUpdate {
    pub title: Option<String>,
    pub developer: Option<String>,
    pub release_date: FieldUpdate<NaiveDate>,
    pub description: FieldUpdate<String>,
    pub genre_id: FieldUpdate<GenreId>,
}

impl NovelUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.developer.is_none()
            && self.release_date.is_keep()
            && self.description.is_keep()
            && self.genre_id.is_keep()
    }
}

/// Search filters, combined with AND. `None` imposes no constraint.
///
/// Text matching follows SQLite `LIKE`: case folding covers ASCII letters
/// only, so `été` does not match `ÉTÉ`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NovelSearch {
    /// Case-insensitive substring of the title or the developer.
    pub text: Option<String>,
    pub genre_id: Option<GenreId>,
    /// Case-insensitive substring of the developer.
    pub developer: Option<String>,
}
