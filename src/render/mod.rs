//! HTML rendering of forms, listings and outcomes.
//!
//! Every value taken from the catalog or from a submitted form goes through
//! `escape_html` before it is written into markup.

mod forms;
mod pages;

pub use forms::render_form;
pub use pages::{render_details, render_novels};

use crate::actions::Outcome;
use serde::Deserialize;

/// How the shell presents outcomes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Styled terminal output.
    #[default]
    Pretty,
    Html,
    Json,
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn render_outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Novels(novels) => render_novels(novels),
        Outcome::Details(details) => render_details(details),
        other => match other.message() {
            Some(message) => format!("<p class=\"message\">{}</p>\n", escape_html(&message)),
            None => String::new(),
        },
    }
}

/// Error paragraph shown in place of an outcome.
pub fn render_error(message: &str) -> String {
    format!("<p class=\"error\">{}</p>\n", escape_html(message))
}
