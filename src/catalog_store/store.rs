//! SQLite-backed catalog store implementation.
//!
//! This module provides the `SqliteCatalogStore`, the only component that
//! issues statements against the catalog database.

use super::error::{violated_constraint, CatalogError, CatalogResult, Constraint};
use super::models::*;
use super::query::{Assignments, Filter};
use super::schema::CATALOG_VERSIONED_SCHEMAS;
use super::trait_def::CatalogStore;
use super::validation;
use crate::sqlite_persistence::BASE_DB_VERSION;
use anyhow::{bail, Context, Result};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

const GENRE: &str = "genre";
const VISUAL_NOVEL: &str = "visual novel";

const SELECT_NOVEL_WITH_GENRE: &str =
    "SELECT vn.id, vn.title, vn.developer, vn.release_date, vn.description, vn.genre_id, g.name
     FROM visual_novels vn
     LEFT JOIN genres g ON g.id = vn.genre_id";

/// SQLite-backed catalog store.
///
/// A single connection guarded by a mutex: every operation runs to
/// completion before the next one starts.
pub struct SqliteCatalogStore {
    conn: Mutex<Connection>,
    db_path: Option<PathBuf>,
}

fn migrate_if_needed(conn: &Connection) -> Result<()> {
    let latest_version = CATALOG_VERSIONED_SCHEMAS.len() - 1;
    let latest_schema = &CATALOG_VERSIONED_SCHEMAS[latest_version];

    let table_count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |r| r.get(0),
    )?;

    if table_count == 0 {
        info!("Creating catalog db schema at version {}", latest_version);
        latest_schema.create(conn)?;
        return Ok(());
    }

    let db_version: i64 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
    let expected_version = (BASE_DB_VERSION + latest_version) as i64;
    if db_version != expected_version {
        bail!(
            "Catalog db is at version {}, expected {}",
            db_version,
            expected_version
        );
    }
    latest_schema
        .validate(conn)
        .context("Catalog db schema validation failed")
}

fn nullable(value: Option<Value>) -> Value {
    value.unwrap_or(Value::Null)
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

impl SqliteCatalogStore {
    /// Open (or create) a catalog database file.
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref();
        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open catalog database at {:?}", db_path))?;
        Self::init(conn, Some(db_path.to_path_buf()))
    }

    /// Create a private in-memory catalog. Its content is lost on drop.
    pub fn in_memory() -> Result<Self> {
        let conn =
            Connection::open_in_memory().context("Failed to open in-memory catalog database")?;
        Self::init(conn, None)
    }

    fn init(conn: Connection, db_path: Option<PathBuf>) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", true)?;
        migrate_if_needed(&conn)?;

        let store = SqliteCatalogStore {
            conn: Mutex::new(conn),
            db_path,
        };

        let counts = store.counts()?;
        info!(
            "Opened catalog at {}: {} genres, {} visual novels, {} characters, {} reviews",
            store.location(),
            counts.genres,
            counts.novels,
            counts.characters,
            counts.reviews
        );
        Ok(store)
    }

    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// Human readable location of the database.
    pub fn location(&self) -> String {
        match &self.db_path {
            Some(path) => path.display().to_string(),
            None => ":memory:".to_string(),
        }
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `op` inside an immediate transaction, rolled back on error.
    fn write<T>(&self, op: impl FnOnce(&Connection) -> CatalogResult<T>) -> CatalogResult<T> {
        let conn = self.conn();
        conn.execute("BEGIN IMMEDIATE", [])?;

        match op(&conn) {
            Ok(value) => {
                conn.execute("COMMIT", [])?;
                Ok(value)
            }
            Err(e) => {
                let _ = conn.execute("ROLLBACK", []);
                Err(e)
            }
        }
    }

    // =========================================================================
    // Internal Helper Methods
    // =========================================================================

    fn novel_exists(conn: &Connection, id: NovelId) -> CatalogResult<bool> {
        Ok(conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM visual_novels WHERE id = ?1)",
            params![id],
            |r| r.get(0),
        )?)
    }

    fn genre_exists(conn: &Connection, id: GenreId) -> CatalogResult<bool> {
        Ok(conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM genres WHERE id = ?1)",
            params![id],
            |r| r.get(0),
        )?)
    }

    fn require_referenced_genre(conn: &Connection, id: GenreId) -> CatalogResult<()> {
        if !Self::genre_exists(conn, id)? {
            return Err(CatalogError::InvalidReference {
                entity: GENRE,
                id: id.0,
            });
        }
        Ok(())
    }

    fn require_referenced_novel(conn: &Connection, id: NovelId) -> CatalogResult<()> {
        if !Self::novel_exists(conn, id)? {
            return Err(CatalogError::InvalidReference {
                entity: VISUAL_NOVEL,
                id: id.0,
            });
        }
        Ok(())
    }

    fn require_novel(conn: &Connection, id: NovelId) -> CatalogResult<()> {
        if !Self::novel_exists(conn, id)? {
            return Err(CatalogError::NotFound {
                entity: VISUAL_NOVEL,
                id: id.0,
            });
        }
        Ok(())
    }

    /// Parse a row selected with `SELECT_NOVEL_WITH_GENRE`.
    fn parse_novel_row(row: &Row) -> rusqlite::Result<VisualNovelWithGenre> {
        Ok(VisualNovelWithGenre {
            novel: VisualNovel {
                id: row.get(0)?,
                title: row.get(1)?,
                developer: row.get(2)?,
                release_date: row.get(3)?,
                description: row.get(4)?,
                genre_id: row.get(5)?,
            },
            genre_name: row.get(6)?,
        })
    }

    fn parse_character_row(row: &Row) -> rusqlite::Result<Character> {
        Ok(Character {
            id: row.get(0)?,
            name: row.get(1)?,
            role: row.get(2)?,
            visual_novel_id: row.get(3)?,
        })
    }

    fn parse_review_row(row: &Row) -> rusqlite::Result<Review> {
        Ok(Review {
            id: row.get(0)?,
            user_name: row.get(1)?,
            rating: row.get(2)?,
            comment: row.get(3)?,
            visual_novel_id: row.get(4)?,
        })
    }

    fn count(conn: &Connection, table: &'static str) -> CatalogResult<usize> {
        let count: i64 =
            conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))?;
        Ok(count as usize)
    }
}

impl CatalogStore for SqliteCatalogStore {
    fn add_genre(&self, name: &str) -> CatalogResult<GenreId> {
        validation::require_non_blank("name", name)?;

        let duplicate = || CatalogError::DuplicateName {
            entity: GENRE,
            name: name.to_string(),
        };

        let id = self.write(|conn| {
            let exists: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM genres WHERE name = ?1)",
                params![name],
                |r| r.get(0),
            )?;
            if exists {
                return Err(duplicate());
            }

            conn.execute("INSERT INTO genres (name) VALUES (?1)", params![name])
                .map_err(|e| match violated_constraint(&e) {
                    Some(Constraint::Unique) => duplicate(),
                    _ => e.into(),
                })?;
            Ok(GenreId(conn.last_insert_rowid()))
        })?;

        info!("Added genre {} ({:?})", id, name);
        Ok(id)
    }

    fn list_genres(&self) -> CatalogResult<Vec<Genre>> {
        let conn = self.conn();
        let mut stmt = conn.prepare_cached("SELECT id, name FROM genres ORDER BY name, id")?;
        let genres = stmt
            .query_map([], |row| {
                Ok(Genre {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(genres)
    }

    fn add_visual_novel(&self, novel: &NewVisualNovel) -> CatalogResult<NovelId> {
        validation::validate_new_novel(novel)?;

        let id = self.write(|conn| {
            if let Some(genre_id) = novel.genre_id {
                Self::require_referenced_genre(conn, genre_id)?;
            }

            conn.execute(
                "INSERT INTO visual_novels (title, developer, release_date, description, genre_id)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    &novel.title,
                    &novel.developer,
                    novel.release_date,
                    &novel.description,
                    novel.genre_id
                ],
            )
            .map_err(|e| match (violated_constraint(&e), novel.genre_id) {
                (Some(Constraint::ForeignKey), Some(genre_id)) => CatalogError::InvalidReference {
                    entity: GENRE,
                    id: genre_id.0,
                },
                _ => e.into(),
            })?;
            Ok(NovelId(conn.last_insert_rowid()))
        })?;

        info!("Added visual novel {} ({:?})", id, novel.title);
        Ok(id)
    }

    fn update_visual_novel(&self, id: NovelId, update: &NovelUpdate) -> CatalogResult<()> {
        validation::validate_novel_update(update)?;

        let changed = self.write(|conn| {
            Self::require_novel(conn, id)?;

            let mut assignments = Assignments::new();
            if let Some(title) = &update.title {
                assignments.set("title", title.clone());
            }
            if let Some(developer) = &update.developer {
                assignments.set("developer", developer.clone());
            }
            if let Some(release_date) = update.release_date.as_change() {
                let value = release_date.map(|d| Value::Text(d.format("%Y-%m-%d").to_string()));
                assignments.set("release_date", nullable(value));
            }
            if let Some(description) = update.description.as_change() {
                let value = description.map(|d| Value::Text(d.clone()));
                assignments.set("description", nullable(value));
            }
            if let Some(genre_id) = update.genre_id.as_change() {
                if let Some(genre_id) = genre_id {
                    Self::require_referenced_genre(conn, *genre_id)?;
                }
                assignments.set("genre_id", nullable(genre_id.map(|g| Value::Integer(g.0))));
            }

            if assignments.is_empty() {
                return Ok(0);
            }

            let changed = assignments.len();
            let (sql, values) = assignments.build_update("visual_novels", "id", id.0);
            conn.execute(&sql, params_from_iter(values))
                .map_err(|e| match violated_constraint(&e) {
                    Some(Constraint::ForeignKey) => CatalogError::InvalidReference {
                        entity: GENRE,
                        id: match update.genre_id {
                            FieldUpdate::Set(genre_id) => genre_id.0,
                            _ => 0,
                        },
                    },
                    _ => e.into(),
                })?;
            Ok(changed)
        })?;

        if changed == 0 {
            debug!("Empty update for visual novel {}, nothing to do", id);
        } else {
            info!("Updated {} field(s) of visual novel {}", changed, id);
        }
        Ok(())
    }

    fn delete_visual_novel(&self, id: NovelId) -> CatalogResult<DeletedNovel> {
        let deleted = self.write(|conn| {
            Self::require_novel(conn, id)?;

            // Dependents are removed explicitly, the schema's ON DELETE CASCADE
            // is the backstop for writers that skip this path.
            let characters_removed = conn.execute(
                "DELETE FROM characters WHERE visual_novel_id = ?1",
                params![id],
            )?;
            let reviews_removed = conn.execute(
                "DELETE FROM reviews WHERE visual_novel_id = ?1",
                params![id],
            )?;
            conn.execute("DELETE FROM visual_novels WHERE id = ?1", params![id])?;

            Ok(DeletedNovel {
                id,
                characters_removed,
                reviews_removed,
            })
        })?;

        info!(
            "Deleted visual novel {} with {} character(s) and {} review(s)",
            id, deleted.characters_removed, deleted.reviews_removed
        );
        Ok(deleted)
    }

    fn search_visual_novels(
        &self,
        search: &NovelSearch,
    ) -> CatalogResult<Vec<VisualNovelWithGenre>> {
        let mut filter = Filter::new();
        if let Some(text) = non_blank(&search.text) {
            filter.contains(&["vn.title", "vn.developer"], text);
        }
        if let Some(genre_id) = search.genre_id {
            filter.equals("vn.genre_id", genre_id.0);
        }
        if let Some(developer) = non_blank(&search.developer) {
            filter.contains(&["vn.developer"], developer);
        }
        debug!(?search, "Searching visual novels");

        let (where_clause, values) = filter.build(1);
        let sql = format!("{}{} ORDER BY vn.id", SELECT_NOVEL_WITH_GENRE, where_clause);

        let conn = self.conn();
        let mut stmt = conn.prepare_cached(&sql)?;
        let novels = stmt
            .query_map(params_from_iter(values), Self::parse_novel_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(novels)
    }

    fn get_visual_novel_details(&self, id: NovelId) -> CatalogResult<NovelDetails> {
        let conn = self.conn();

        let novel = match conn.query_row(
            &format!("{} WHERE vn.id = ?1", SELECT_NOVEL_WITH_GENRE),
            params![id],
            Self::parse_novel_row,
        ) {
            Ok(novel) => novel,
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                return Err(CatalogError::NotFound {
                    entity: VISUAL_NOVEL,
                    id: id.0,
                })
            }
            Err(e) => return Err(e.into()),
        };

        let mut stmt = conn.prepare_cached(
            "SELECT id, name, role, visual_novel_id FROM characters
             WHERE visual_novel_id = ?1 ORDER BY id",
        )?;
        let characters = stmt
            .query_map(params![id], Self::parse_character_row)?
            .collect::<Result<Vec<_>, _>>()?;

        let mut stmt = conn.prepare_cached(
            "SELECT id, user_name, rating, comment, visual_novel_id FROM reviews
             WHERE visual_novel_id = ?1 ORDER BY id",
        )?;
        let reviews = stmt
            .query_map(params![id], Self::parse_review_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(NovelDetails {
            novel,
            characters,
            reviews,
        })
    }

    fn add_character(&self, character: &NewCharacter) -> CatalogResult<CharacterId> {
        validation::validate_new_character(character)?;
        let novel_id = character.visual_novel_id;

        let id = self.write(|conn| {
            Self::require_referenced_novel(conn, novel_id)?;

            conn.execute(
                "INSERT INTO characters (name, role, visual_novel_id) VALUES (?1, ?2, ?3)",
                params![&character.name, &character.role, novel_id],
            )
            .map_err(|e| match violated_constraint(&e) {
                Some(Constraint::ForeignKey) => CatalogError::InvalidReference {
                    entity: VISUAL_NOVEL,
                    id: novel_id.0,
                },
                _ => e.into(),
            })?;
            Ok(CharacterId(conn.last_insert_rowid()))
        })?;

        info!(
            "Added character {} ({:?}) to visual novel {}",
            id, character.name, novel_id
        );
        Ok(id)
    }

    fn add_review(&self, review: &NewReview) -> CatalogResult<ReviewId> {
        validation::validate_new_review(review)?;
        let novel_id = review.visual_novel_id;

        let id = self.write(|conn| {
            Self::require_referenced_novel(conn, novel_id)?;

            conn.execute(
                "INSERT INTO reviews (user_name, rating, comment, visual_novel_id)
                 VALUES (?1, ?2, ?3, ?4)",
                params![&review.user_name, review.rating, &review.comment, novel_id],
            )
            .map_err(|e| match violated_constraint(&e) {
                Some(Constraint::Check) => CatalogError::InvalidRating(review.rating),
                Some(Constraint::ForeignKey) => CatalogError::InvalidReference {
                    entity: VISUAL_NOVEL,
                    id: novel_id.0,
                },
                _ => e.into(),
            })?;
            Ok(ReviewId(conn.last_insert_rowid()))
        })?;

        info!(
            "Added review {} ({}/5) to visual novel {}",
            id, review.rating, novel_id
        );
        Ok(id)
    }

    fn counts(&self) -> CatalogResult<CatalogCounts> {
        let conn = self.conn();
        Ok(CatalogCounts {
            genres: Self::count(&conn, "genres")?,
            novels: Self::count(&conn, "visual_novels")?,
            characters: Self::count(&conn, "characters")?,
            reviews: Self::count(&conn, "reviews")?,
        })
    }
}
