//! Catalog actions.
//!
//! Every user-facing action is an `Action` tag. A submitted form for that
//! action turns into a typed `Command`, which runs against a `CatalogStore`
//! and produces an `Outcome` for the presentation layer.

mod command;
mod form_fields;

pub use command::Command;
pub use form_fields::{field, parse_date, FormFields};

use crate::catalog_store::*;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    AddNovel,
    AddGenre,
    AddCharacter,
    AddReview,
    UpdateNovel,
    DeleteNovel,
    SearchNovels,
    ViewNovels,
    ViewNovel,
}

impl Action {
    pub const ALL: [Action; 9] = [
        Action::AddNovel,
        Action::AddGenre,
        Action::AddCharacter,
        Action::AddReview,
        Action::UpdateNovel,
        Action::DeleteNovel,
        Action::SearchNovels,
        Action::ViewNovels,
        Action::ViewNovel,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            Action::AddNovel => "add-novel",
            Action::AddGenre => "add-genre",
            Action::AddCharacter => "add-character",
            Action::AddReview => "add-review",
            Action::UpdateNovel => "update-novel",
            Action::DeleteNovel => "delete-novel",
            Action::SearchNovels => "search-novels",
            Action::ViewNovels => "view-novels",
            Action::ViewNovel => "view-novel",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Action {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|action| action.tag() == s)
            .ok_or_else(|| CatalogError::Validation {
                field: "action",
                reason: format!(
                    "unknown action '{}', expected one of: {}",
                    s,
                    Action::ALL.map(|a| a.tag()).join(", ")
                ),
            })
    }
}

/// Result of a successfully executed `Command`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "data", rename_all = "snake_case")]
pub enum Outcome {
    GenreAdded(GenreId),
    NovelAdded(NovelId),
    CharacterAdded(CharacterId),
    ReviewAdded(ReviewId),
    NovelUpdated(NovelId),
    NothingToUpdate(NovelId),
    NovelDeleted(DeletedNovel),
    Novels(Vec<VisualNovelWithGenre>),
    Details(NovelDetails),
}

impl Outcome {
    /// Confirmation for write outcomes, `None` for listings.
    pub fn message(&self) -> Option<String> {
        let message = match self {
            Outcome::GenreAdded(id) => format!("Genre added successfully! (id {})", id),
            Outcome::NovelAdded(id) => format!("Visual novel added successfully! (id {})", id),
            Outcome::CharacterAdded(id) => {
                format!("Character added successfully! (id {})", id)
            }
            Outcome::ReviewAdded(id) => format!("Review added successfully! (id {})", id),
            Outcome::NovelUpdated(id) => format!("Visual novel {} updated successfully!", id),
            Outcome::NothingToUpdate(_) => "No changes made.".to_string(),
            Outcome::NovelDeleted(deleted) => format!(
                "Visual novel {} deleted successfully, together with {} character(s) and {} review(s).",
                deleted.id, deleted.characters_removed, deleted.reviews_removed
            ),
            Outcome::Novels(_) | Outcome::Details(_) => return None,
        };
        Some(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_tags_round_trip() {
        for action in Action::ALL {
            assert_eq!(action.tag().parse::<Action>().unwrap(), action);
        }
        let err = "addNovel".parse::<Action>().unwrap_err();
        assert!(err.to_string().contains("unknown action"));
    }

    #[test]
    fn test_outcome_messages() {
        assert_eq!(
            Outcome::NothingToUpdate(NovelId(1)).message().as_deref(),
            Some("No changes made.")
        );
        assert!(Outcome::Novels(Vec::new()).message().is_none());
        let deleted = Outcome::NovelDeleted(DeletedNovel {
            id: NovelId(3),
            characters_removed: 2,
            reviews_removed: 1,
        });
        assert!(deleted.message().unwrap().contains("2 character(s)"));
    }

    #[test]
    fn test_outcome_serializes_tagged() {
        let json = serde_json::to_value(Outcome::GenreAdded(GenreId(7))).unwrap();
        assert_eq!(json, serde_json::json!({"outcome": "genre_added", "data": 7}));
    }
}
