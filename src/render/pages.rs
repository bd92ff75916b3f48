use super::escape_html;
use crate::catalog_store::{NovelDetails, VisualNovelWithGenre, MAX_RATING};
use std::fmt::Write;

const NOT_AVAILABLE: &str = "N/A";

fn or_not_available(value: Option<&str>) -> String {
    value.map(escape_html).unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Result table for a listing or a search.
pub fn render_novels(novels: &[VisualNovelWithGenre]) -> String {
    let mut html = String::from("<h2>Search Results</h2>\n");
    if novels.is_empty() {
        html.push_str("<p>No results found.</p>\n");
        return html;
    }

    html.push_str("<table>\n");
    html.push_str(
        "    <tr><th>ID</th><th>Title</th><th>Developer</th><th>Release Date</th><th>Genre</th><th>Description</th></tr>\n",
    );
    for entry in novels {
        let novel = &entry.novel;
        let release_date = novel.release_date.map(|d| d.format("%Y-%m-%d").to_string());
        let _ = writeln!(
            html,
            "    <tr data-novel-id=\"{id}\"><td>{id}</td><td>{title}</td><td>{developer}</td><td>{release}</td><td>{genre}</td><td>{description}</td></tr>",
            id = novel.id,
            title = escape_html(&novel.title),
            developer = escape_html(&novel.developer),
            release = or_not_available(release_date.as_deref()),
            genre = or_not_available(entry.genre_name.as_deref()),
            description = or_not_available(novel.description.as_deref()),
        );
    }
    html.push_str("</table>\n");
    html
}

/// Detail page of a single visual novel with its characters and reviews.
pub fn render_details(details: &NovelDetails) -> String {
    let novel = &details.novel.novel;
    let release_date = novel.release_date.map(|d| d.format("%Y-%m-%d").to_string());
    let mut html = String::new();

    let _ = writeln!(html, "<h2>{}</h2>", escape_html(&novel.title));
    let _ = writeln!(
        html,
        "<p><strong>Developer:</strong> {}</p>",
        escape_html(&novel.developer)
    );
    let _ = writeln!(
        html,
        "<p><strong>Release Date:</strong> {}</p>",
        or_not_available(release_date.as_deref())
    );
    let _ = writeln!(
        html,
        "<p><strong>Genre:</strong> {}</p>",
        or_not_available(details.novel.genre_name.as_deref())
    );
    let _ = writeln!(
        html,
        "<p><strong>Description:</strong> {}</p>",
        or_not_available(novel.description.as_deref())
    );

    html.push_str("<h3>Characters</h3>\n");
    if details.characters.is_empty() {
        html.push_str("<p>No characters yet.</p>\n");
    } else {
        html.push_str("<ul>\n");
        for character in &details.characters {
            let _ = match &character.role {
                Some(role) => writeln!(
                    html,
                    "    <li>{} ({})</li>",
                    escape_html(&character.name),
                    escape_html(role)
                ),
                None => writeln!(html, "    <li>{}</li>", escape_html(&character.name)),
            };
        }
        html.push_str("</ul>\n");
    }

    html.push_str("<h3>Reviews</h3>\n");
    if details.reviews.is_empty() {
        html.push_str("<p>No reviews yet.</p>\n");
    } else {
        html.push_str("<ul>\n");
        for review in &details.reviews {
            let _ = write!(
                html,
                "    <li>{} - {}/{}",
                escape_html(&review.user_name),
                review.rating,
                MAX_RATING
            );
            if let Some(comment) = &review.comment {
                let _ = write!(html, ": {}", escape_html(comment));
            }
            html.push_str("</li>\n");
        }
        html.push_str("</ul>\n");
    }
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog_store::*;
    use chrono::NaiveDate;

    fn entry(id: i64, title: &str, genre: Option<&str>) -> VisualNovelWithGenre {
        VisualNovelWithGenre {
            novel: VisualNovel {
                id: NovelId(id),
                title: title.to_string(),
                developer: "Key".to_string(),
                release_date: None,
                description: None,
                genre_id: genre.map(|_| GenreId(1)),
            },
            genre_name: genre.map(str::to_string),
        }
    }

    #[test]
    fn test_empty_listing() {
        assert_eq!(
            render_novels(&[]),
            "<h2>Search Results</h2>\n<p>No results found.</p>\n"
        );
    }

    #[test]
    fn test_listing_rows() {
        let html = render_novels(&[entry(1, "Clannad", Some("Drama")), entry(2, "Kanon", None)]);
        assert!(html.contains("<tr data-novel-id=\"1\"><td>1</td><td>Clannad</td>"));
        assert!(html.contains("<td>Drama</td>"));
        let kanon_row = html.lines().find(|l| l.contains("data-novel-id=\"2\"")).unwrap();
        assert_eq!(kanon_row.matches(NOT_AVAILABLE).count(), 3);
    }

    #[test]
    fn test_listing_escapes_stored_markup() {
        let html = render_novels(&[entry(1, "<script>alert('x')</script>", None)]);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
    }

    #[test]
    fn test_details_page() {
        let mut novel = entry(5, "Fate/Stay Night", Some("Action"));
        novel.novel.release_date = NaiveDate::from_ymd_opt(2004, 1, 30);
        novel.novel.description = Some("Holy Grail War & more".to_string());
        let details = NovelDetails {
            novel,
            characters: vec![
                Character {
                    id: CharacterId(1),
                    name: "Saber".to_string(),
                    role: Some("Heroine".to_string()),
                    visual_novel_id: NovelId(5),
                },
                Character {
                    id: CharacterId(2),
                    name: "Shirou".to_string(),
                    role: None,
                    visual_novel_id: NovelId(5),
                },
            ],
            reviews: vec![Review {
                id: ReviewId(1),
                user_name: "ann".to_string(),
                rating: 4,
                comment: Some("<b>great</b>".to_string()),
                visual_novel_id: NovelId(5),
            }],
        };

        let html = render_details(&details);
        assert!(html.starts_with("<h2>Fate/Stay Night</h2>\n"));
        assert!(html.contains("<strong>Release Date:</strong> 2004-01-30"));
        assert!(html.contains("<strong>Description:</strong> Holy Grail War &amp; more"));
        assert!(html.contains("<li>Saber (Heroine)</li>"));
        assert!(html.contains("<li>Shirou</li>"));
        assert!(html.contains("<li>ann - 4/5: &lt;b&gt;great&lt;/b&gt;</li>"));
    }

    #[test]
    fn test_details_without_dependents() {
        let details = NovelDetails {
            novel: entry(1, "Kanon", None),
            characters: Vec::new(),
            reviews: Vec::new(),
        };
        let html = render_details(&details);
        assert!(html.contains("<strong>Genre:</strong> N/A"));
        assert!(html.contains("<p>No characters yet.</p>"));
        assert!(html.contains("<p>No reviews yet.</p>"));
    }
}
