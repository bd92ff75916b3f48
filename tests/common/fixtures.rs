//! Seeded catalogs for end-to-end tests.

use super::constants::*;
use chrono::NaiveDate;
use std::path::PathBuf;
use tempfile::TempDir;
use vn_catalog::catalog_store::*;

/// A catalog with four genres, four visual novels and a few characters and
/// reviews. Ids of the seeded rows are kept so tests never guess rowids.
pub struct TestCatalog {
    pub store: SqliteCatalogStore,

    pub action: GenreId,
    pub romance: GenreId,
    pub mystery: GenreId,
    pub horror: GenreId,

    pub fate: NovelId,
    pub remember11: NovelId,
    pub clannad: NovelId,
    pub tsukihime: NovelId,

    // Kept alive for file-backed catalogs.
    _dir: Option<TempDir>,
}

#[allow(dead_code)]
impl TestCatalog {
    pub fn in_memory() -> Self {
        let store = SqliteCatalogStore::in_memory().expect("in-memory catalog");
        Self::seed(store, None)
    }

    pub fn on_disk() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let store = SqliteCatalogStore::open(dir.path().join("catalog.db")).expect("catalog file");
        Self::seed(store, Some(dir))
    }

    pub fn db_path(&self) -> PathBuf {
        self.store
            .db_path()
            .expect("file-backed catalog")
            .to_path_buf()
    }

    fn seed(store: SqliteCatalogStore, dir: Option<TempDir>) -> Self {
        let action = store.add_genre(ACTION_GENRE).unwrap();
        let romance = store.add_genre(ROMANCE_GENRE).unwrap();
        let mystery = store.add_genre(MYSTERY_GENRE).unwrap();
        let horror = store.add_genre(HORROR_GENRE).unwrap();

        let fate = store
            .add_visual_novel(&NewVisualNovel {
                title: FATE_TITLE.to_string(),
                developer: TYPE_MOON.to_string(),
                release_date: NaiveDate::from_ymd_opt(2004, 1, 30),
                description: Some("The Fifth Holy Grail War".to_string()),
                genre_id: Some(action),
            })
            .unwrap();
        let remember11 = store
            .add_visual_novel(&NewVisualNovel {
                title: REMEMBER11_TITLE.to_string(),
                developer: FATEWORKS.to_string(),
                genre_id: Some(mystery),
                ..Default::default()
            })
            .unwrap();
        let clannad = store
            .add_visual_novel(&NewVisualNovel {
                title: CLANNAD_TITLE.to_string(),
                developer: KEY.to_string(),
                release_date: NaiveDate::from_ymd_opt(2004, 4, 28),
                description: None,
                genre_id: Some(romance),
            })
            .unwrap();
        let tsukihime = store
            .add_visual_novel(&NewVisualNovel {
                title: TSUKIHIME_TITLE.to_string(),
                developer: TYPE_MOON.to_string(),
                ..Default::default()
            })
            .unwrap();

        for (name, role) in [("Saber", "Heroine"), ("Shirou Emiya", "Protagonist")] {
            store
                .add_character(&NewCharacter {
                    name: name.to_string(),
                    role: Some(role.to_string()),
                    visual_novel_id: fate,
                })
                .unwrap();
        }
        store
            .add_character(&NewCharacter {
                name: "Nagisa Furukawa".to_string(),
                role: None,
                visual_novel_id: clannad,
            })
            .unwrap();

        for (user, rating, comment) in [("alice", 5, Some("A classic")), ("bob", 3, None)] {
            store
                .add_review(&NewReview {
                    user_name: user.to_string(),
                    rating,
                    comment: comment.map(str::to_string),
                    visual_novel_id: fate,
                })
                .unwrap();
        }
        store
            .add_review(&NewReview {
                user_name: "carol".to_string(),
                rating: 4,
                comment: Some("Bring tissues".to_string()),
                visual_novel_id: clannad,
            })
            .unwrap();

        TestCatalog {
            store,
            action,
            romance,
            mystery,
            horror,
            fate,
            remember11,
            clannad,
            tsukihime,
            _dir: dir,
        }
    }
}
