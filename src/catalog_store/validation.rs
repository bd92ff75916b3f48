//! Validation for catalog requests.
//!
//! Runs before anything is sent to SQLite. The schema enforces the same
//! rules again, so a request that bypasses these checks is still rejected.

use super::error::{CatalogError, CatalogResult};
use super::models::{NewCharacter, NewReview, NewVisualNovel, NovelUpdate};

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

pub fn require_non_blank(field: &'static str, value: &str) -> CatalogResult<()> {
    if value.trim().is_empty() {
        return Err(CatalogError::required(field));
    }
    Ok(())
}

pub fn validate_rating(rating: i64) -> CatalogResult<()> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(CatalogError::InvalidRating(rating));
    }
    Ok(())
}

pub fn validate_new_novel(novel: &NewVisualNovel) -> CatalogResult<()> {
    require_non_blank("title", &novel.title)?;
    require_non_blank("developer", &novel.developer)
}

/// Supplied required fields may change but not be blanked.
pub fn validate_novel_update(update: &NovelUpdate) -> CatalogResult<()> {
    if let Some(title) = &update.title {
        require_non_blank("title", title)?;
    }
    if let Some(developer) = &update.developer {
        require_non_blank("developer", developer)?;
    }
    Ok(())
}

pub fn validate_new_character(character: &NewCharacter) -> CatalogResult<()> {
    require_non_blank("name", &character.name)
}

pub fn validate_new_review(review: &NewReview) -> CatalogResult<()> {
    require_non_blank("user_name", &review.user_name)?;
    validate_rating(review.rating)
}
