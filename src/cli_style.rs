use clap::builder::styling::{AnsiColor, Color, Style};
use clap::builder::Styles;
use crossterm::style::{Attribute, Stylize};
use std::path::Path;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

// ═══════════════════════════════════════════════════════════════════════════════
// Clap Styles
// ═══════════════════════════════════════════════════════════════════════════════

pub fn get_styles() -> Styles {
    let bold = |color: AnsiColor| Style::new().bold().fg_color(Some(Color::Ansi(color)));

    Styles::styled()
        .usage(bold(AnsiColor::Magenta).underline())
        .header(bold(AnsiColor::Magenta).underline())
        .literal(bold(AnsiColor::Green))
        .invalid(bold(AnsiColor::Red))
        .error(bold(AnsiColor::Red))
        .valid(bold(AnsiColor::Green))
        .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightBlack))))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Color Palette
// ═══════════════════════════════════════════════════════════════════════════════

pub mod colors {
    use crossterm::style::Color;

    pub const PINK: Color = Color::Rgb {
        r: 255,
        g: 121,
        b: 198,
    };
    pub const PURPLE: Color = Color::Rgb {
        r: 189,
        g: 147,
        b: 249,
    };
    pub const CYAN: Color = Color::Rgb {
        r: 139,
        g: 233,
        b: 253,
    };
    pub const GREEN: Color = Color::Rgb {
        r: 80,
        g: 250,
        b: 123,
    };
    pub const YELLOW: Color = Color::Rgb {
        r: 241,
        g: 250,
        b: 140,
    };
    pub const RED: Color = Color::Rgb {
        r: 255,
        g: 85,
        b: 85,
    };
    pub const DIM: Color = Color::Rgb {
        r: 128,
        g: 128,
        b: 128,
    };
    pub const WHITE: Color = Color::Rgb {
        r: 248,
        g: 248,
        b: 242,
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Box Drawing Characters
// ═══════════════════════════════════════════════════════════════════════════════

pub mod box_chars {
    pub const DOUBLE_TOP_LEFT: &str = "╔";
    pub const DOUBLE_TOP_RIGHT: &str = "╗";
    pub const DOUBLE_BOTTOM_LEFT: &str = "╚";
    pub const DOUBLE_BOTTOM_RIGHT: &str = "╝";
    pub const DOUBLE_HORIZONTAL: &str = "═";
    pub const DOUBLE_VERTICAL: &str = "║";

    pub const HORIZONTAL: &str = "─";
    pub const VERTICAL: &str = "│";

    pub const ROUND_TOP_LEFT: &str = "╭";
    pub const ROUND_TOP_RIGHT: &str = "╮";
    pub const ROUND_BOTTOM_LEFT: &str = "╰";
    pub const ROUND_BOTTOM_RIGHT: &str = "╯";

    pub const T_LEFT: &str = "├";
    pub const T_RIGHT: &str = "┤";
    pub const T_TOP: &str = "┬";
    pub const T_BOTTOM: &str = "┴";
    pub const CROSS: &str = "┼";

    pub const ARROW_RIGHT: &str = "▶";
    pub const BULLET: &str = "●";
    pub const BULLET_EMPTY: &str = "○";
    pub const STAR: &str = "★";
    pub const STAR_EMPTY: &str = "☆";
    pub const CHECK: &str = "✓";
    pub const CROSS_MARK: &str = "✗";
    pub const ELLIPSIS: &str = "…";
}

// ═══════════════════════════════════════════════════════════════════════════════
// Status Indicators
// ═══════════════════════════════════════════════════════════════════════════════

pub fn print_success(message: &str) {
    println!(
        " {} {}",
        box_chars::CHECK.with(colors::GREEN).bold(),
        message.with(colors::GREEN)
    );
}

pub fn print_error(message: &str) {
    println!(
        " {} {}",
        box_chars::CROSS_MARK.with(colors::RED).bold(),
        message.with(colors::RED)
    );
}

// ═══════════════════════════════════════════════════════════════════════════════
// Sections
// ═══════════════════════════════════════════════════════════════════════════════

const SECTION_WIDTH: usize = 60;

pub fn print_section_header(title: &str) {
    let title_width = title.width();
    let left = SECTION_WIDTH.saturating_sub(title_width + 2) / 2;
    let right = SECTION_WIDTH.saturating_sub(title_width + 2 + left);

    println!();
    println!(
        "{}{} {} {}{}",
        box_chars::ROUND_TOP_LEFT.with(colors::PURPLE),
        box_chars::HORIZONTAL.repeat(left).with(colors::PURPLE),
        title.with(colors::PINK).bold().attribute(Attribute::Italic),
        box_chars::HORIZONTAL.repeat(right).with(colors::PURPLE),
        box_chars::ROUND_TOP_RIGHT.with(colors::PURPLE),
    );
}

pub fn print_section_footer() {
    println!(
        "{}{}{}",
        box_chars::ROUND_BOTTOM_LEFT.with(colors::PURPLE),
        box_chars::HORIZONTAL.repeat(SECTION_WIDTH).with(colors::PURPLE),
        box_chars::ROUND_BOTTOM_RIGHT.with(colors::PURPLE),
    );
    println!();
}

pub fn print_key_value(key: &str, value: &str) {
    println!(
        "  {} {} {}",
        box_chars::BULLET.with(colors::PURPLE),
        format!("{}:", key).with(colors::DIM),
        value.with(colors::WHITE)
    );
}

pub fn print_subheading(title: &str) {
    println!();
    println!("  {}", title.with(colors::CYAN).bold());
}

pub fn print_list_item(item: &str) {
    println!(
        "    {}  {}",
        box_chars::ARROW_RIGHT.with(colors::CYAN),
        item.with(colors::WHITE)
    );
}

pub fn print_empty_list(message: &str) {
    println!(
        "    {} {}",
        box_chars::BULLET_EMPTY.with(colors::DIM),
        message.with(colors::DIM).attribute(Attribute::Italic)
    );
}

/// Rating as filled and empty stars, e.g. `★★★☆☆`.
pub fn rating_stars(rating: i64, max: i64) -> String {
    let filled = rating.clamp(0, max) as usize;
    format!(
        "{}{}",
        box_chars::STAR.repeat(filled),
        box_chars::STAR_EMPTY.repeat(max as usize - filled)
    )
}

// ═══════════════════════════════════════════════════════════════════════════════
// Table Display
// ═══════════════════════════════════════════════════════════════════════════════

/// Widest a single cell gets before it is cut with an ellipsis.
const MAX_CELL_WIDTH: usize = 40;

fn truncate_cell(text: &str) -> String {
    if text.width() <= MAX_CELL_WIDTH {
        return text.to_string();
    }
    let mut out = String::new();
    let mut width = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if width + w > MAX_CELL_WIDTH - 1 {
            break;
        }
        out.push(c);
        width += w;
    }
    out.push_str(box_chars::ELLIPSIS);
    out
}

pub struct TableBuilder {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    col_widths: Vec<usize>,
}

impl TableBuilder {
    pub fn new(headers: &[&str]) -> Self {
        TableBuilder {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
            col_widths: headers.iter().map(|h| h.width()).collect(),
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        let row: Vec<String> = row.iter().map(|cell| truncate_cell(cell)).collect();
        for (width, cell) in self.col_widths.iter_mut().zip(&row) {
            *width = (*width).max(cell.width());
        }
        self.rows.push(row);
    }

    fn print_border(&self, left: &str, junction: &str, right: &str) {
        let segments: Vec<String> = self
            .col_widths
            .iter()
            .map(|w| box_chars::HORIZONTAL.repeat(w + 2))
            .collect();
        println!(
            "{}",
            format!("{}{}{}", left, segments.join(junction), right).with(colors::PURPLE)
        );
    }

    fn print_cells(&self, cells: &[String], header: bool) {
        print!("{}", box_chars::VERTICAL.with(colors::PURPLE));
        for (i, width) in self.col_widths.iter().enumerate() {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            let padding = " ".repeat(width.saturating_sub(cell.width()));
            if header {
                print!(" {}{} ", cell.with(colors::PINK).bold(), padding);
            } else {
                print!(" {}{} ", cell.with(colors::WHITE), padding);
            }
            print!("{}", box_chars::VERTICAL.with(colors::PURPLE));
        }
        println!();
    }

    pub fn print(&self) {
        self.print_border(
            box_chars::ROUND_TOP_LEFT,
            box_chars::T_TOP,
            box_chars::ROUND_TOP_RIGHT,
        );
        self.print_cells(&self.headers, true);
        self.print_border(box_chars::T_LEFT, box_chars::CROSS, box_chars::T_RIGHT);
        for row in &self.rows {
            self.print_cells(row, false);
        }
        self.print_border(
            box_chars::ROUND_BOTTOM_LEFT,
            box_chars::T_BOTTOM,
            box_chars::ROUND_BOTTOM_RIGHT,
        );
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Prompt, Welcome and Goodbye
// ═══════════════════════════════════════════════════════════════════════════════

pub fn get_prompt() -> String {
    format!(
        "{}{} ",
        "vn".with(colors::PINK).bold(),
        "❯".with(colors::PURPLE).bold(),
    )
}

pub fn print_welcome(location: &str) {
    let box_width: usize = 64;
    let border = |left: &str, right: &str| {
        println!(
            "  {}",
            format!(
                "{}{}{}",
                left,
                box_chars::DOUBLE_HORIZONTAL.repeat(box_width),
                right
            )
            .with(colors::PURPLE)
        );
    };
    let line = |text: String, visible: usize| {
        println!(
            "  {}{}{}{}",
            box_chars::DOUBLE_VERTICAL.with(colors::PURPLE),
            text,
            " ".repeat(box_width.saturating_sub(visible)),
            box_chars::DOUBLE_VERTICAL.with(colors::PURPLE)
        );
    };

    let title = "  Visual Novel Catalog";
    let version = format!("{} ({})", env!("APP_VERSION"), env!("GIT_HASH"));
    let help = "  Type 'help' for available commands";

    println!();
    border(box_chars::DOUBLE_TOP_LEFT, box_chars::DOUBLE_TOP_RIGHT);
    line(title.with(colors::PINK).bold().to_string(), title.width());
    line(String::new(), 0);
    for (key, value) in [("Database", location), ("Version", version.as_str())] {
        line(
            format!("  {} {}", format!("{}:", key).with(colors::DIM), value),
            key.width() + value.width() + 4,
        );
    }
    line(String::new(), 0);
    line(help.with(colors::DIM).to_string(), help.width());
    border(box_chars::DOUBLE_BOTTOM_LEFT, box_chars::DOUBLE_BOTTOM_RIGHT);
    println!();
}

fn goodbye_message(db_path: Option<&Path>) -> String {
    match db_path {
        Some(path) => format!("Goodbye! Catalog changes are saved in {}.", path.display()),
        None => "Goodbye! The in-memory catalog is discarded, use --db to keep it.".to_string(),
    }
}

pub fn print_goodbye(db_path: Option<&Path>) {
    println!();
    println!("  {}", goodbye_message(db_path).with(colors::YELLOW).bold());
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_cell() {
        assert_eq!(truncate_cell("short"), "short");
        let long = "x".repeat(MAX_CELL_WIDTH + 10);
        let cut = truncate_cell(&long);
        assert_eq!(cut.width(), MAX_CELL_WIDTH);
        assert!(cut.ends_with(box_chars::ELLIPSIS));
    }

    #[test]
    fn test_goodbye_message_matches_persistence() {
        assert_eq!(
            goodbye_message(Some(Path::new("/tmp/catalog.db"))),
            "Goodbye! Catalog changes are saved in /tmp/catalog.db."
        );
        assert!(goodbye_message(None).contains("in-memory catalog is discarded"));
    }

    #[test]
    fn test_rating_stars() {
        assert_eq!(rating_stars(3, 5), "★★★☆☆");
        assert_eq!(rating_stars(5, 5), "★★★★★");
    }

    #[test]
    fn test_table_widths_follow_content() {
        let mut table = TableBuilder::new(&["ID", "Title"]);
        table.add_row(vec!["1".to_string(), "Tsukihime".to_string()]);
        assert_eq!(table.col_widths, vec![2, 9]);
    }
}
