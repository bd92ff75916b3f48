use super::escape_html;
use crate::actions::{field, Action};
use crate::catalog_store::{Genre, MAX_RATING, MIN_RATING};
use std::fmt::Write;

enum Input {
    Text,
    Number,
    Date,
    TextArea,
    Rating,
    /// Genre selector, the first option carries the given label and no value.
    Genres(&'static str),
}

struct FormField {
    name: &'static str,
    label: &'static str,
    input: Input,
    required: bool,
}

const fn input(name: &'static str, label: &'static str, input: Input, required: bool) -> FormField {
    FormField {
        name,
        label,
        input,
        required,
    }
}

struct FormSpec {
    heading: &'static str,
    submit: &'static str,
    fields: &'static [FormField],
}

const ADD_NOVEL_FIELDS: &[FormField] = &[
    input(field::TITLE, "Title", Input::Text, true),
    input(field::DEVELOPER, "Developer", Input::Text, true),
    input(field::RELEASE_DATE, "Release Date", Input::Date, false),
    input(field::DESCRIPTION, "Description", Input::TextArea, false),
    input(field::GENRE_ID, "Genre", Input::Genres("Select a genre"), false),
];

const ADD_GENRE_FIELDS: &[FormField] = &[input(field::NAME, "Genre Name", Input::Text, true)];

const ADD_CHARACTER_FIELDS: &[FormField] = &[
    input(field::NAME, "Name", Input::Text, true),
    input(field::ROLE, "Role", Input::Text, false),
    input(field::VISUAL_NOVEL_ID, "Visual Novel ID", Input::Number, true),
];

const ADD_REVIEW_FIELDS: &[FormField] = &[
    input(field::USER_NAME, "User Name", Input::Text, true),
    input(field::RATING, "Rating (1-5)", Input::Rating, true),
    input(field::COMMENT, "Comment", Input::TextArea, false),
    input(field::VISUAL_NOVEL_ID, "Visual Novel ID", Input::Number, true),
];

const UPDATE_NOVEL_FIELDS: &[FormField] = &[
    input(field::ID, "Visual Novel ID", Input::Number, true),
    input(field::TITLE, "New Title", Input::Text, false),
    input(field::DEVELOPER, "New Developer", Input::Text, false),
    input(field::RELEASE_DATE, "New Release Date", Input::Date, false),
    input(field::DESCRIPTION, "New Description", Input::TextArea, false),
    input(field::GENRE_ID, "New Genre", Input::Genres("Keep current genre"), false),
    input(
        field::CLEAR,
        "Clear (releaseDate, description, genreID)",
        Input::Text,
        false,
    ),
];

const NOVEL_ID_FIELDS: &[FormField] = &[input(field::ID, "Visual Novel ID", Input::Number, true)];

const SEARCH_FIELDS: &[FormField] = &[
    input(field::SEARCH_TERM, "Search Term", Input::Text, false),
    input(field::GENRE_ID, "Genre", Input::Genres("All Genres"), false),
    input(field::DEVELOPER, "Developer", Input::Text, false),
];

fn form_spec(action: Action) -> FormSpec {
    match action {
        Action::AddNovel => FormSpec {
            heading: "Add a Visual Novel",
            submit: "Add Novel",
            fields: ADD_NOVEL_FIELDS,
        },
        Action::AddGenre => FormSpec {
            heading: "Add a Genre",
            submit: "Add Genre",
            fields: ADD_GENRE_FIELDS,
        },
        Action::AddCharacter => FormSpec {
            heading: "Add a Character",
            submit: "Add Character",
            fields: ADD_CHARACTER_FIELDS,
        },
        Action::AddReview => FormSpec {
            heading: "Add a Review",
            submit: "Add Review",
            fields: ADD_REVIEW_FIELDS,
        },
        Action::UpdateNovel => FormSpec {
            heading: "Update a Visual Novel",
            submit: "Update Novel",
            fields: UPDATE_NOVEL_FIELDS,
        },
        Action::DeleteNovel => FormSpec {
            heading: "Delete a Visual Novel",
            submit: "Delete Novel",
            fields: NOVEL_ID_FIELDS,
        },
        Action::SearchNovels => FormSpec {
            heading: "Search Visual Novels",
            submit: "Search",
            fields: SEARCH_FIELDS,
        },
        Action::ViewNovels => FormSpec {
            heading: "All Visual Novels",
            submit: "Show All",
            fields: &[],
        },
        Action::ViewNovel => FormSpec {
            heading: "Visual Novel Details",
            submit: "Show Details",
            fields: NOVEL_ID_FIELDS,
        },
    }
}

/// HTML form for `action`. `genres` fill the genre selectors.
pub fn render_form(action: Action, genres: &[Genre]) -> String {
    let spec = form_spec(action);
    let mut html = String::new();

    let _ = writeln!(html, "<h2>{}</h2>", spec.heading);
    let _ = writeln!(html, "<form id=\"form\" data-action=\"{}\">", action.tag());
    for form_field in spec.fields {
        let required = if form_field.required { " required" } else { "" };
        let _ = writeln!(
            html,
            "    <label for=\"{name}\">{label}:</label>",
            name = form_field.name,
            label = form_field.label
        );
        let _ = match &form_field.input {
            Input::Text | Input::Number | Input::Date => writeln!(
                html,
                "    <input type=\"{kind}\" id=\"{name}\" name=\"{name}\"{required}>",
                kind = match form_field.input {
                    Input::Number => "number",
                    Input::Date => "date",
                    _ => "text",
                },
                name = form_field.name,
            ),
            Input::Rating => writeln!(
                html,
                "    <input type=\"number\" id=\"{name}\" name=\"{name}\" min=\"{MIN_RATING}\" max=\"{MAX_RATING}\"{required}>",
                name = form_field.name,
            ),
            Input::TextArea => writeln!(
                html,
                "    <textarea id=\"{name}\" name=\"{name}\"{required}></textarea>",
                name = form_field.name,
            ),
            Input::Genres(placeholder) => {
                let _ = writeln!(
                    html,
                    "    <select id=\"{name}\" name=\"{name}\"{required}>",
                    name = form_field.name,
                );
                let _ = writeln!(html, "        <option value=\"\">{}</option>", placeholder);
                for genre in genres {
                    let _ = writeln!(
                        html,
                        "        <option value=\"{}\">{}</option>",
                        genre.id,
                        escape_html(&genre.name)
                    );
                }
                writeln!(html, "    </select>")
            }
        };
    }
    let _ = writeln!(html, "    <button type=\"submit\">{}</button>", spec.submit);
    html.push_str("</form>\n");
    html
}
