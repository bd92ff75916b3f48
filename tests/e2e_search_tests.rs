//! End-to-end tests for visual novel search

mod common;

use common::*;
use vn_catalog::catalog_store::*;

fn search(catalog: &TestCatalog, search: NovelSearch) -> Vec<String> {
    catalog
        .store
        .search_visual_novels(&search)
        .unwrap()
        .into_iter()
        .map(|n| n.novel.title)
        .collect()
}

fn text(value: &str) -> NovelSearch {
    NovelSearch {
        text: Some(value.to_string()),
        ..Default::default()
    }
}

#[test]
fn test_no_filters_lists_everything_by_id() {
    let catalog = TestCatalog::in_memory();
    assert_eq!(
        search(&catalog, NovelSearch::default()),
        vec![FATE_TITLE, REMEMBER11_TITLE, CLANNAD_TITLE, TSUKIHIME_TITLE]
    );
    assert_eq!(catalog.store.list_visual_novels().unwrap().len(), 4);
}

#[test]
fn test_text_matches_title_or_developer() {
    let catalog = TestCatalog::in_memory();
    assert_eq!(
        search(&catalog, text("Fate")),
        vec![FATE_TITLE, REMEMBER11_TITLE]
    );
}

#[test]
fn test_text_and_developer_filters_are_combined() {
    let catalog = TestCatalog::in_memory();
    let found = search(
        &catalog,
        NovelSearch {
            text: Some("Fate".to_string()),
            developer: Some(TYPE_MOON.to_string()),
            ..Default::default()
        },
    );
    assert_eq!(found, vec![FATE_TITLE]);
}

#[test]
fn test_text_search_ignores_ascii_case() {
    let catalog = TestCatalog::in_memory();
    assert_eq!(search(&catalog, text("cLaNnAd")), vec![CLANNAD_TITLE]);
    assert_eq!(
        search(
            &catalog,
            NovelSearch {
                developer: Some("type-moon".to_string()),
                ..Default::default()
            }
        ),
        vec![FATE_TITLE, TSUKIHIME_TITLE]
    );
}

#[test]
fn test_genre_filter_returns_only_that_genre() {
    let catalog = TestCatalog::in_memory();
    let genre = catalog.store.add_genre("Comedy").unwrap();
    for title in ["Grisaia", "Nekopara"] {
        catalog
            .store
            .add_visual_novel(&NewVisualNovel {
                title: title.to_string(),
                developer: "Frontwing".to_string(),
                genre_id: Some(genre),
                ..Default::default()
            })
            .unwrap();
    }

    let found = catalog
        .store
        .search_visual_novels(&NovelSearch {
            genre_id: Some(genre),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(found.len(), 2);
    assert!(found
        .iter()
        .all(|n| n.novel.genre_id == Some(genre) && n.genre_name.as_deref() == Some("Comedy")));

    let empty = search(
        &catalog,
        NovelSearch {
            genre_id: Some(catalog.horror),
            ..Default::default()
        },
    );
    assert!(empty.is_empty());
}

#[test]
fn test_genre_and_text_filters_are_combined() {
    let catalog = TestCatalog::in_memory();
    let found = search(
        &catalog,
        NovelSearch {
            text: Some("Fate".to_string()),
            genre_id: Some(catalog.mystery),
            developer: None,
        },
    );
    assert_eq!(found, vec![REMEMBER11_TITLE]);
}

#[test]
fn test_blank_filters_are_ignored() {
    let catalog = TestCatalog::in_memory();
    let found = search(
        &catalog,
        NovelSearch {
            text: Some("  ".to_string()),
            developer: Some(String::new()),
            genre_id: None,
        },
    );
    assert_eq!(found.len(), 4);
}

#[test]
fn test_wildcards_in_text_match_literally() {
    let catalog = TestCatalog::in_memory();
    assert!(search(&catalog, text("%")).is_empty());
    assert!(search(&catalog, text("_")).is_empty());

    catalog
        .store
        .add_visual_novel(&NewVisualNovel {
            title: "100% Orange_Juice".to_string(),
            developer: "Fruitbat".to_string(),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(search(&catalog, text("0% O")), vec!["100% Orange_Juice"]);
    assert_eq!(search(&catalog, text("e_J")), vec!["100% Orange_Juice"]);
}

#[test]
fn test_quote_in_search_text_is_a_plain_value() {
    let catalog = TestCatalog::in_memory();
    assert!(search(&catalog, text("' OR '1'='1")).is_empty());
}

#[test]
fn test_deleted_novel_disappears_from_search() {
    let catalog = TestCatalog::in_memory();
    catalog.store.delete_visual_novel(catalog.remember11).unwrap();
    assert_eq!(search(&catalog, text("Fate")), vec![FATE_TITLE]);
}

#[test]
fn test_novel_without_genre_has_no_genre_name() {
    let catalog = TestCatalog::in_memory();
    let found = catalog.store.search_visual_novels(&text("Tsuki")).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].novel.id, catalog.tsukihime);
    assert_eq!(found[0].genre_name, None);
}
