//! SQLite schema definitions for the visual novel catalog.
//!
//! Integer primary keys are assigned by SQLite. Characters and reviews are
//! owned by their visual novel and go away with it; a novel whose genre is
//! removed keeps existing with no genre.

use crate::sqlite_column;
use crate::sqlite_persistence::{
    Column, ForeignKey, ForeignKeyOnChange, SqlType, Table, VersionedSchema,
};

const GENRES_TABLE: Table = Table {
    name: "genres",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true, is_unique = true),
    ],
    indices: &[],
};

const VISUAL_NOVELS_TABLE: Table = Table {
    name: "visual_novels",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("developer", &SqlType::Text, non_null = true),
        sqlite_column!("release_date", &SqlType::Text), // 'YYYY-MM-DD'
        sqlite_column!("description", &SqlType::Text),
        sqlite_column!(
            "genre_id",
            &SqlType::Integer,
            foreign_key = Some(&ForeignKey {
                foreign_table: "genres",
                foreign_column: "id",
                on_delete: ForeignKeyOnChange::SetNull,
            })
        ),
    ],
    indices: &[("idx_visual_novels_genre", "genre_id")],
};

const CHARACTERS_TABLE: Table = Table {
    name: "characters",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!("role", &SqlType::Text),
        sqlite_column!(
            "visual_novel_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ForeignKey {
                foreign_table: "visual_novels",
                foreign_column: "id",
                on_delete: ForeignKeyOnChange::Cascade,
            })
        ),
    ],
    indices: &[("idx_characters_visual_novel", "visual_novel_id")],
};

const REVIEWS_TABLE: Table = Table {
    name: "reviews",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("user_name", &SqlType::Text, non_null = true),
        sqlite_column!(
            "rating",
            &SqlType::Integer,
            non_null = true,
            check = Some("rating BETWEEN 1 AND 5")
        ),
        sqlite_column!("comment", &SqlType::Text),
        sqlite_column!(
            "visual_novel_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ForeignKey {
                foreign_table: "visual_novels",
                foreign_column: "id",
                on_delete: ForeignKeyOnChange::Cascade,
            })
        ),
    ],
    indices: &[("idx_reviews_visual_novel", "visual_novel_id")],
};

pub const CATALOG_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[
        GENRES_TABLE,
        VISUAL_NOVELS_TABLE,
        CHARACTERS_TABLE,
        REVIEWS_TABLE,
    ],
}];

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::{params, Connection};

    fn create_schema() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.pragma_update(None, "foreign_keys", true).unwrap();
        let schema = &CATALOG_VERSIONED_SCHEMAS[0];
        schema.create(&conn).unwrap();
        conn
    }

    #[test]
    fn test_schema_creates_successfully() {
        let conn = create_schema();
        CATALOG_VERSIONED_SCHEMAS[0].validate(&conn).unwrap();
    }

    #[test]
    fn test_schema_rejects_out_of_range_rating() {
        let conn = create_schema();
        conn.execute(
            "INSERT INTO visual_novels (title, developer) VALUES (?1, ?2)",
            params!["Clannad", "Key"],
        )
        .unwrap();

        for rating in [0, 6] {
            let result = conn.execute(
                "INSERT INTO reviews (user_name, rating, visual_novel_id) VALUES (?1, ?2, 1)",
                params!["reader", rating],
            );
            assert!(result.is_err(), "rating {} should be rejected", rating);
        }
        conn.execute(
            "INSERT INTO reviews (user_name, rating, visual_novel_id) VALUES (?1, ?2, 1)",
            params!["reader", 5],
        )
        .unwrap();
    }

    #[test]
    fn test_schema_rejects_duplicate_genre_and_dangling_references() {
        let conn = create_schema();
        conn.execute("INSERT INTO genres (name) VALUES (?1)", params!["Drama"])
            .unwrap();
        assert!(conn
            .execute("INSERT INTO genres (name) VALUES (?1)", params!["Drama"])
            .is_err());
        assert!(conn
            .execute(
                "INSERT INTO visual_novels (title, developer, genre_id) VALUES ('a', 'b', 99)",
                [],
            )
            .is_err());
        assert!(conn
            .execute(
                "INSERT INTO characters (name, visual_novel_id) VALUES ('Saber', 99)",
                [],
            )
            .is_err());
    }

    #[test]
    fn test_deleting_novel_cascades() {
        let conn = create_schema();
        conn.execute(
            "INSERT INTO visual_novels (title, developer) VALUES ('Fate/Stay Night', 'Type-Moon')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO characters (name, visual_novel_id) VALUES ('Saber', 1)",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO reviews (user_name, rating, visual_novel_id) VALUES ('reader', 5, 1)",
            [],
        )
        .unwrap();

        conn.execute("DELETE FROM visual_novels WHERE id = 1", [])
            .unwrap();

        let characters: i64 = conn
            .query_row("SELECT COUNT(*) FROM characters", [], |r| r.get(0))
            .unwrap();
        let reviews: i64 = conn
            .query_row("SELECT COUNT(*) FROM reviews", [], |r| r.get(0))
            .unwrap();
        assert_eq!((characters, reviews), (0, 0));
    }
}
