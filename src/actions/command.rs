use super::form_fields::{field, FormFields};
use super::{Action, Outcome};
use crate::catalog_store::*;

/// A validated catalog request, ready to run against a store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    AddGenre { name: String },
    AddNovel(NewVisualNovel),
    AddCharacter(NewCharacter),
    AddReview(NewReview),
    UpdateNovel { id: NovelId, update: NovelUpdate },
    DeleteNovel { id: NovelId },
    SearchNovels(NovelSearch),
    ViewNovels,
    ViewNovel { id: NovelId },
}

impl Command {
    pub fn action(&self) -> Action {
        match self {
            Command::AddGenre { .. } => Action::AddGenre,
            Command::AddNovel(_) => Action::AddNovel,
            Command::AddCharacter(_) => Action::AddCharacter,
            Command::AddReview(_) => Action::AddReview,
            Command::UpdateNovel { .. } => Action::UpdateNovel,
            Command::DeleteNovel { .. } => Action::DeleteNovel,
            Command::SearchNovels(_) => Action::SearchNovels,
            Command::ViewNovels => Action::ViewNovels,
            Command::ViewNovel { .. } => Action::ViewNovel,
        }
    }

    /// Build the command for `action` from submitted form fields.
    pub fn from_form(action: Action, fields: &FormFields) -> CatalogResult<Self> {
        let command = match action {
            Action::AddGenre => Command::AddGenre {
                name: fields.required_text(field::NAME)?,
            },
            Action::AddNovel => Command::AddNovel(NewVisualNovel {
                title: fields.required_text(field::TITLE)?,
                developer: fields.required_text(field::DEVELOPER)?,
                release_date: fields.optional_date(field::RELEASE_DATE)?,
                description: fields.optional_text(field::DESCRIPTION),
                genre_id: fields.optional_integer(field::GENRE_ID)?.map(GenreId),
            }),
            Action::AddCharacter => Command::AddCharacter(NewCharacter {
                name: fields.required_text(field::NAME)?,
                role: fields.optional_text(field::ROLE),
                visual_novel_id: NovelId(fields.required_integer(field::VISUAL_NOVEL_ID)?),
            }),
            Action::AddReview => Command::AddReview(NewReview {
                user_name: fields.required_text(field::USER_NAME)?,
                rating: fields.required_integer(field::RATING)?,
                comment: fields.optional_text(field::COMMENT),
                visual_novel_id: NovelId(fields.required_integer(field::VISUAL_NOVEL_ID)?),
            }),
            Action::UpdateNovel => Command::UpdateNovel {
                id: NovelId(fields.required_integer(field::ID)?),
                update: novel_update_from_form(fields)?,
            },
            Action::DeleteNovel => Command::DeleteNovel {
                id: NovelId(fields.required_integer(field::ID)?),
            },
            Action::SearchNovels => Command::SearchNovels(NovelSearch {
                text: fields.optional_text(field::SEARCH_TERM),
                genre_id: fields.optional_integer(field::GENRE_ID)?.map(GenreId),
                developer: fields.optional_text(field::DEVELOPER),
            }),
            Action::ViewNovels => Command::ViewNovels,
            Action::ViewNovel => Command::ViewNovel {
                id: NovelId(fields.required_integer(field::ID)?),
            },
        };
        Ok(command)
    }

    pub fn execute(&self, store: &dyn CatalogStore) -> CatalogResult<Outcome> {
        let outcome = match self {
            Command::AddGenre { name } => Outcome::GenreAdded(store.add_genre(name)?),
            Command::AddNovel(novel) => Outcome::NovelAdded(store.add_visual_novel(novel)?),
            Command::AddCharacter(character) => {
                Outcome::CharacterAdded(store.add_character(character)?)
            }
            Command::AddReview(review) => Outcome::ReviewAdded(store.add_review(review)?),
            Command::UpdateNovel { id, update } => {
                store.update_visual_novel(*id, update)?;
                if update.is_empty() {
                    Outcome::NothingToUpdate(*id)
                } else {
                    Outcome::NovelUpdated(*id)
                }
            }
            Command::DeleteNovel { id } => Outcome::NovelDeleted(store.delete_visual_novel(*id)?),
            Command::SearchNovels(search) => {
                Outcome::Novels(store.search_visual_novels(search)?)
            }
            Command::ViewNovels => Outcome::Novels(store.list_visual_novels()?),
            Command::ViewNovel { id } => Outcome::Details(store.get_visual_novel_details(*id)?),
        };
        Ok(outcome)
    }
}

/// Blank inputs leave a column alone; nullable columns are cleared only when
/// listed in the `clear` field.
fn novel_update_from_form(fields: &FormFields) -> CatalogResult<NovelUpdate> {
    let clear = fields.list(field::CLEAR);
    for name in &clear {
        if ![field::RELEASE_DATE, field::DESCRIPTION, field::GENRE_ID].contains(name) {
            return Err(CatalogError::Validation {
                field: field::CLEAR,
                reason: format!("'{}' cannot be cleared", name),
            });
        }
    }

    fn resolve<T>(
        key: &'static str,
        value: Option<T>,
        clear: &[&str],
    ) -> CatalogResult<FieldUpdate<T>> {
        match (value, clear.contains(&key)) {
            (Some(_), true) => Err(CatalogError::Validation {
                field: key,
                reason: "cannot be both set and cleared".to_string(),
            }),
            (Some(value), false) => Ok(FieldUpdate::Set(value)),
            (None, true) => Ok(FieldUpdate::Clear),
            (None, false) => Ok(FieldUpdate::Keep),
        }
    }

    Ok(NovelUpdate {
        title: fields.optional_text(field::TITLE),
        developer: fields.optional_text(field::DEVELOPER),
        release_date: resolve(
            field::RELEASE_DATE,
            fields.optional_date(field::RELEASE_DATE)?,
            &clear,
        )?,
        description: resolve(
            field::DESCRIPTION,
            fields.optional_text(field::DESCRIPTION),
            &clear,
        )?,
        genre_id: resolve(
            field::GENRE_ID,
            fields.optional_integer(field::GENRE_ID)?.map(GenreId),
            &clear,
        )?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn form(pairs: &[(&str, &str)]) -> FormFields {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_add_novel_from_form() {
        let fields = form(&[
            ("title", "Fate/Stay Night"),
            ("developer", "Type-Moon"),
            ("releaseDate", "2004-01-30"),
            ("description", ""),
            ("genreID", "2"),
        ]);
        let command = Command::from_form(Action::AddNovel, &fields).unwrap();
        assert_eq!(
            command,
            Command::AddNovel(NewVisualNovel {
                title: "Fate/Stay Night".to_string(),
                developer: "Type-Moon".to_string(),
                release_date: NaiveDate::from_ymd_opt(2004, 1, 30),
                description: None,
                genre_id: Some(GenreId(2)),
            })
        );
        assert_eq!(command.action(), Action::AddNovel);
    }

    #[test]
    fn test_missing_required_field_is_reported() {
        let fields = form(&[("name", "Saber")]);
        let err = Command::from_form(Action::AddCharacter, &fields).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Validation {
                field: "visualNovelID",
                ..
            }
        ));
    }

    #[test]
    fn test_blank_update_form_is_empty_update() {
        let fields = form(&[("id", "4"), ("title", ""), ("description", "")]);
        match Command::from_form(Action::UpdateNovel, &fields).unwrap() {
            Command::UpdateNovel { id, update } => {
                assert_eq!(id, NovelId(4));
                assert!(update.is_empty());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_update_form_clear_list() {
        let fields = form(&[("id", "1"), ("clear", "description,genreID")]);
        match Command::from_form(Action::UpdateNovel, &fields).unwrap() {
            Command::UpdateNovel { update, .. } => {
                assert_eq!(update.description, FieldUpdate::Clear);
                assert_eq!(update.genre_id, FieldUpdate::Clear);
                assert_eq!(update.release_date, FieldUpdate::Keep);
            }
            other => panic!("unexpected command {:?}", other),
        }

        let conflicting = form(&[("id", "1"), ("description", "x"), ("clear", "description")]);
        assert!(Command::from_form(Action::UpdateNovel, &conflicting).is_err());

        let required = form(&[("id", "1"), ("clear", "title")]);
        assert!(Command::from_form(Action::UpdateNovel, &required).is_err());
    }

    #[test]
    fn test_execute_against_store() {
        let store = SqliteCatalogStore::in_memory().unwrap();

        let outcome = Command::from_form(Action::AddGenre, &form(&[("name", "Drama")]))
            .unwrap()
            .execute(&store)
            .unwrap();
        assert_eq!(outcome, Outcome::GenreAdded(GenreId(1)));

        let outcome = Command::from_form(
            Action::AddNovel,
            &form(&[("title", "Clannad"), ("developer", "Key"), ("genreID", "1")]),
        )
        .unwrap()
        .execute(&store)
        .unwrap();
        assert_eq!(outcome, Outcome::NovelAdded(NovelId(1)));

        let outcome = Command::UpdateNovel {
            id: NovelId(1),
            update: NovelUpdate::default(),
        }
        .execute(&store)
        .unwrap();
        assert_eq!(outcome, Outcome::NothingToUpdate(NovelId(1)));

        match Command::ViewNovels.execute(&store).unwrap() {
            Outcome::Novels(novels) => {
                assert_eq!(novels.len(), 1);
                assert_eq!(novels[0].genre_name.as_deref(), Some("Drama"));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }
}
