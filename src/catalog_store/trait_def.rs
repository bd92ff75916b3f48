//! CatalogStore trait definition.
//!
//! The caller-facing surface of the catalog. Presentation layers (forms, the
//! shell) only ever talk to this trait.

use super::error::CatalogResult;
use super::models::*;

pub trait CatalogStore: Send + Sync {
    // =========================================================================
    // Genres
    // =========================================================================

    /// Create a genre. Fails with `DuplicateName` if the name is taken.
    fn add_genre(&self, name: &str) -> CatalogResult<GenreId>;

    /// All genres, ordered by name.
    fn list_genres(&self) -> CatalogResult<Vec<Genre>>;

    // =========================================================================
    // Visual Novels
    // =========================================================================

    /// Create a visual novel. Fails with `InvalidReference` if a genre id is
    /// given but unknown.
    fn add_visual_novel(&self, novel: &NewVisualNovel) -> CatalogResult<NovelId>;

    /// Apply the supplied fields of `update`. An empty update is a no-op, but
    /// the novel must still exist.
    fn update_visual_novel(&self, id: NovelId, update: &NovelUpdate) -> CatalogResult<()>;

    /// Delete a visual novel together with its characters and reviews.
    fn delete_visual_novel(&self, id: NovelId) -> CatalogResult<DeletedNovel>;

    fn search_visual_novels(&self, search: &NovelSearch)
        -> CatalogResult<Vec<VisualNovelWithGenre>>;

    fn list_visual_novels(&self) -> CatalogResult<Vec<VisualNovelWithGenre>> {
        self.search_visual_novels(&NovelSearch::default())
    }

    fn get_visual_novel_details(&self, id: NovelId) -> CatalogResult<NovelDetails>;

    // =========================================================================
    // Characters & Reviews
    // =========================================================================

    fn add_character(&self, character: &NewCharacter) -> CatalogResult<CharacterId>;

    /// Fails with `InvalidRating` unless the rating is within 1..=5.
    fn add_review(&self, review: &NewReview) -> CatalogResult<ReviewId>;

    // =========================================================================
    // Counts
    // =========================================================================

    fn counts(&self) -> CatalogResult<CatalogCounts>;
}
