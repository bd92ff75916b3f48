//! Names of the seeded catalog records.

#![allow(dead_code)]

// ============================================================================
// Genres
// ============================================================================

pub const ACTION_GENRE: &str = "Action";
pub const ROMANCE_GENRE: &str = "Romance";
pub const MYSTERY_GENRE: &str = "Mystery";
/// Seeded without any novel.
pub const HORROR_GENRE: &str = "Horror";

// ============================================================================
// Visual Novels
// ============================================================================

pub const FATE_TITLE: &str = "Fate/Stay Night";
pub const TYPE_MOON: &str = "Type-Moon";

/// Matches "Fate" through its developer only.
pub const REMEMBER11_TITLE: &str = "Remember11";
pub const FATEWORKS: &str = "FateWorks Studio";

pub const CLANNAD_TITLE: &str = "Clannad";
pub const KEY: &str = "Key";

/// Seeded without a genre.
pub const TSUKIHIME_TITLE: &str = "Tsukihime";

// ============================================================================
// Dependents of Fate/Stay Night
// ============================================================================

pub const FATE_CHARACTERS: usize = 2;
pub const FATE_REVIEWS: usize = 2;
