use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli_style;

use cli_style::get_styles;
use vn_catalog::actions::{field, parse_date, Action, Command, FormFields, Outcome};
use vn_catalog::catalog_store::*;
use vn_catalog::config::{AppConfig, CliConfig, FileConfig};
use vn_catalog::render::{self, render_form, OutputFormat};

use rustyline::{
    completion::Completer, highlight::Highlighter, history::FileHistory, validate::Validator,
    CompletionType, Config, Editor, Helper,
};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path = PathBuf::from(s);
    if path.is_absolute() {
        return Ok(path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(path))
}

fn parse_release_date(s: &str) -> Result<NaiveDate, CatalogError> {
    parse_date(field::RELEASE_DATE, s)
}

#[derive(Parser, Debug)]
#[command(styles=get_styles(), version = env!("APP_VERSION"))]
struct CliArgs {
    /// Path to a TOML config file. Its values override the command line.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Path to the SQLite catalog database, created when missing.
    /// The catalog is kept in memory when omitted.
    #[clap(long, value_parser = parse_path)]
    pub db: Option<PathBuf>,

    /// File used to persist the shell history.
    #[clap(long, value_parser = parse_path)]
    pub history: Option<PathBuf>,

    /// How results are printed.
    #[clap(long, value_enum, default_value_t = OutputFormat::Pretty)]
    pub output: OutputFormat,
}

#[derive(Parser)]
#[command(styles=get_styles(), name = "")]
struct InnerCli {
    #[command(subcommand)]
    command: InnerCommand,
}

#[derive(Subcommand)]
enum InnerCommand {
    /// Adds a genre, names are unique.
    AddGenre { name: String },

    /// Shows all genres.
    Genres,

    /// Adds a visual novel.
    AddNovel {
        title: String,
        developer: String,
        /// Release date as YYYY-MM-DD.
        #[clap(long, value_parser = parse_release_date)]
        release_date: Option<NaiveDate>,
        #[clap(long)]
        description: Option<String>,
        /// Id of an existing genre.
        #[clap(long)]
        genre: Option<i64>,
    },

    /// Changes the given fields of a visual novel, the others are kept.
    UpdateNovel {
        id: i64,
        #[clap(long)]
        title: Option<String>,
        #[clap(long)]
        developer: Option<String>,
        #[clap(long, value_parser = parse_release_date, conflicts_with = "clear_release_date")]
        release_date: Option<NaiveDate>,
        #[clap(long, conflicts_with = "clear_description")]
        description: Option<String>,
        #[clap(long, conflicts_with = "clear_genre")]
        genre: Option<i64>,
        #[clap(long)]
        clear_release_date: bool,
        #[clap(long)]
        clear_description: bool,
        #[clap(long)]
        clear_genre: bool,
    },

    /// Deletes a visual novel together with its characters and reviews.
    DeleteNovel { id: i64 },

    /// Adds a character to a visual novel.
    AddCharacter {
        novel_id: i64,
        name: String,
        #[clap(long)]
        role: Option<String>,
    },

    /// Adds a review to a visual novel, ratings go from 1 to 5.
    AddReview {
        novel_id: i64,
        user_name: String,
        #[arg(allow_negative_numbers = true)]
        rating: i64,
        #[clap(long)]
        comment: Option<String>,
    },

    /// Searches title and developer, optionally narrowed by genre and developer.
    Search {
        text: Option<String>,
        #[clap(long)]
        genre: Option<i64>,
        #[clap(long)]
        developer: Option<String>,
    },

    /// Shows every visual novel.
    List,

    /// Shows a visual novel with its characters and reviews.
    Show { id: i64 },

    /// Prints the HTML form of an action (add-novel, search-novels, ...).
    Form { action: String },

    /// Submits form fields for an action, e.g. `submit add-genre name=Drama`.
    Submit {
        action: String,
        /// key=value pairs, named as in the HTML form.
        fields: Vec<String>,
    },

    /// Shows the location of the current catalog db.
    Where,

    /// Close this program.
    Exit,
}

enum CommandExecutionResult {
    Ok,
    Exit,
    Error(String),
}

/// Clap rejects a value together with its `--clear-*` flag.
fn field_update<T>(clear: bool, value: Option<T>) -> FieldUpdate<T> {
    match (clear, value) {
        (true, _) => FieldUpdate::Clear,
        (false, Some(value)) => FieldUpdate::Set(value),
        (false, None) => FieldUpdate::Keep,
    }
}

impl InnerCommand {
    /// The catalog command this shell command stands for, if any.
    fn to_catalog_command(&self) -> CatalogResult<Option<Command>> {
        let command = match self {
            InnerCommand::AddGenre { name } => Command::AddGenre { name: name.clone() },
            InnerCommand::AddNovel {
                title,
                developer,
                release_date,
                description,
                genre,
            } => Command::AddNovel(NewVisualNovel {
                title: title.clone(),
                developer: developer.clone(),
                release_date: *release_date,
                description: description.clone(),
                genre_id: genre.map(GenreId),
            }),
            InnerCommand::UpdateNovel {
                id,
                title,
                developer,
                release_date,
                description,
                genre,
                clear_release_date,
                clear_description,
                clear_genre,
            } => Command::UpdateNovel {
                id: NovelId(*id),
                update: NovelUpdate {
                    title: title.clone(),
                    developer: developer.clone(),
                    release_date: field_update(*clear_release_date, *release_date),
                    description: field_update(*clear_description, description.clone()),
                    genre_id: field_update(*clear_genre, genre.map(GenreId)),
                },
            },
            InnerCommand::DeleteNovel { id } => Command::DeleteNovel { id: NovelId(*id) },
            InnerCommand::AddCharacter {
                novel_id,
                name,
                role,
            } => Command::AddCharacter(NewCharacter {
                name: name.clone(),
                role: role.clone(),
                visual_novel_id: NovelId(*novel_id),
            }),
            InnerCommand::AddReview {
                novel_id,
                user_name,
                rating,
                comment,
            } => Command::AddReview(NewReview {
                user_name: user_name.clone(),
                rating: *rating,
                comment: comment.clone(),
                visual_novel_id: NovelId(*novel_id),
            }),
            InnerCommand::Search {
                text,
                genre,
                developer,
            } => Command::SearchNovels(NovelSearch {
                text: text.clone(),
                genre_id: genre.map(GenreId),
                developer: developer.clone(),
            }),
            InnerCommand::List => Command::ViewNovels,
            InnerCommand::Show { id } => Command::ViewNovel { id: NovelId(*id) },
            InnerCommand::Submit { action, fields } => {
                let action: Action = action.parse()?;
                Command::from_form(action, &FormFields::parse_pairs(fields)?)?
            }
            InnerCommand::Genres
            | InnerCommand::Form { .. }
            | InnerCommand::Where
            | InnerCommand::Exit => return Ok(None),
        };
        Ok(Some(command))
    }
}

struct Shell {
    store: SqliteCatalogStore,
    output: OutputFormat,
}

impl Shell {
    fn execute_command(&self, line: &str) -> CommandExecutionResult {
        if line.trim().is_empty() {
            return CommandExecutionResult::Ok;
        }

        let args =
            shlex::split(line).unwrap_or_else(|| line.split_whitespace().map(String::from).collect());

        let cli =
            InnerCli::try_parse_from(std::iter::once(" ").chain(args.iter().map(String::as_str)));

        let command = match cli {
            Ok(cli) => cli.command,
            Err(e) => {
                if e.print().is_err() {
                    println!("{}", e);
                }
                return CommandExecutionResult::Ok;
            }
        };

        match self.run(&command) {
            Ok(true) => CommandExecutionResult::Ok,
            Ok(false) => CommandExecutionResult::Exit,
            Err(err) => CommandExecutionResult::Error(err.to_string()),
        }
    }

    /// Returns `false` when the shell should exit.
    fn run(&self, command: &InnerCommand) -> CatalogResult<bool> {
        if let Some(catalog_command) = command.to_catalog_command()? {
            debug!("Running {}", catalog_command.action().tag());
            let outcome = catalog_command.execute(&self.store)?;
            self.print_outcome(&outcome);
            return Ok(true);
        }

        match command {
            InnerCommand::Genres => {
                let genres = self.store.list_genres()?;
                self.print_genres(&genres);
            }
            InnerCommand::Form { action } => {
                let action: Action = action.parse()?;
                print!("{}", render_form(action, &self.store.list_genres()?));
            }
            InnerCommand::Where => {
                cli_style::print_key_value("Catalog database", &self.store.location());
            }
            InnerCommand::Exit => return Ok(false),
            _ => {}
        }
        Ok(true)
    }

    fn print_error(&self, message: &str) {
        match self.output {
            OutputFormat::Pretty => cli_style::print_error(message),
            OutputFormat::Html => print!("{}", render::render_error(message)),
            OutputFormat::Json => println!("{}", serde_json::json!({ "error": message })),
        }
    }

    fn print_genres(&self, genres: &[Genre]) {
        if self.output == OutputFormat::Json {
            print_json(genres);
            return;
        }
        if genres.is_empty() {
            cli_style::print_empty_list("No genres yet.");
            return;
        }
        let mut table = cli_style::TableBuilder::new(&["ID", "Name"]);
        for genre in genres {
            table.add_row(vec![genre.id.to_string(), genre.name.clone()]);
        }
        table.print();
    }

    fn print_outcome(&self, outcome: &Outcome) {
        match self.output {
            OutputFormat::Html => print!("{}", render::render_outcome(outcome)),
            OutputFormat::Json => print_json(outcome),
            OutputFormat::Pretty => match outcome {
                Outcome::Novels(novels) => print_novels(novels),
                Outcome::Details(details) => print_details(details),
                other => {
                    if let Some(message) = other.message() {
                        cli_style::print_success(&message);
                    }
                }
            },
        }
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(err) => cli_style::print_error(&format!("Could not serialize result: {}", err)),
    }
}

fn or_not_available(value: Option<String>) -> String {
    value.unwrap_or_else(|| "N/A".to_string())
}

fn print_novels(novels: &[VisualNovelWithGenre]) {
    if novels.is_empty() {
        cli_style::print_empty_list("No results found.");
        return;
    }
    let mut table = cli_style::TableBuilder::new(&[
        "ID",
        "Title",
        "Developer",
        "Release Date",
        "Genre",
        "Description",
    ]);
    for entry in novels {
        let novel = &entry.novel;
        table.add_row(vec![
            novel.id.to_string(),
            novel.title.clone(),
            novel.developer.clone(),
            or_not_available(novel.release_date.map(|d| d.to_string())),
            or_not_available(entry.genre_name.clone()),
            or_not_available(novel.description.clone()),
        ]);
    }
    table.print();
}

fn print_details(details: &NovelDetails) {
    let novel = &details.novel.novel;
    cli_style::print_section_header(&novel.title);
    cli_style::print_key_value("ID", &novel.id.to_string());
    cli_style::print_key_value("Developer", &novel.developer);
    cli_style::print_key_value(
        "Release Date",
        &or_not_available(novel.release_date.map(|d| d.to_string())),
    );
    cli_style::print_key_value("Genre", &or_not_available(details.novel.genre_name.clone()));
    cli_style::print_key_value("Description", &or_not_available(novel.description.clone()));

    cli_style::print_subheading("Characters");
    if details.characters.is_empty() {
        cli_style::print_empty_list("No characters yet.");
    }
    for character in &details.characters {
        match &character.role {
            Some(role) => cli_style::print_list_item(&format!("{} ({})", character.name, role)),
            None => cli_style::print_list_item(&character.name),
        }
    }

    cli_style::print_subheading("Reviews");
    if details.reviews.is_empty() {
        cli_style::print_empty_list("No reviews yet.");
    }
    for review in &details.reviews {
        let stars = cli_style::rating_stars(review.rating, MAX_RATING);
        match &review.comment {
            Some(comment) => cli_style::print_list_item(&format!(
                "{} {} {}: {}",
                stars, review.user_name, review.rating, comment
            )),
            None => cli_style::print_list_item(&format!(
                "{} {} {}",
                stars, review.user_name, review.rating
            )),
        }
    }
    cli_style::print_section_footer();
}

#[derive(rustyline_derive::Hinter)]
struct MyHelper {
    commands_names: Vec<String>,
}

impl MyHelper {
    pub fn new() -> Self {
        let commands_names: Vec<String> = InnerCli::command()
            .get_subcommands()
            .map(|sc| sc.get_name().to_string())
            .collect();

        MyHelper { commands_names }
    }
}

impl Completer for MyHelper {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        _pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        // Second word of `form` and `submit` is an action tag.
        if let Some((command, partial)) = line.split_once(' ') {
            if (command == "form" || command == "submit") && !partial.contains(' ') {
                let matches = Action::ALL
                    .iter()
                    .map(|a| a.tag())
                    .filter(|tag| tag.starts_with(partial))
                    .map(String::from)
                    .collect();
                return Ok((command.len() + 1, matches));
            }
            return Ok((0, Vec::with_capacity(0)));
        }
        let matches = self
            .commands_names
            .iter()
            .filter(|c| c.starts_with(line))
            .map(|c| c.to_string())
            .collect::<Vec<_>>();

        Ok((0, matches))
    }
}

impl Highlighter for MyHelper {}
impl Validator for MyHelper {}
impl Helper for MyHelper {}

fn load_config(cli_args: &CliArgs) -> Result<AppConfig> {
    let file_config = cli_args
        .config
        .as_deref()
        .map(FileConfig::load)
        .transpose()?;
    let cli_config = CliConfig {
        db_path: cli_args.db.clone(),
        history_file: cli_args.history.clone(),
        output: cli_args.output,
    };
    AppConfig::resolve(&cli_config, file_config)
}

fn open_store(db_path: Option<&Path>) -> Result<SqliteCatalogStore> {
    match db_path {
        Some(path) => {
            info!("Opening SQLite catalog database at {:?}...", path);
            SqliteCatalogStore::open(path)
        }
        None => {
            info!("No database path configured, using an in-memory catalog");
            SqliteCatalogStore::in_memory()
        }
    }
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();
    let config = load_config(&cli_args)?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(config.log_level.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to install the log subscriber")?;

    let shell = Shell {
        store: open_store(config.db_path.as_deref())?,
        output: config.output,
    };

    let rl_config = Config::builder()
        .completion_type(CompletionType::List)
        .build();
    let mut rl = Editor::<MyHelper, FileHistory>::with_config(rl_config)?;
    rl.set_helper(Some(MyHelper::new()));

    if let Some(history_file) = &config.history_file {
        if let Err(err) = rl.load_history(history_file) {
            debug!("No shell history loaded from {:?}: {}", history_file, err);
        }
    }

    if shell.output == OutputFormat::Pretty {
        cli_style::print_welcome(&shell.store.location());
    }

    let prompt = cli_style::get_prompt();
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let _ = rl.add_history_entry(line.as_str());
                match shell.execute_command(&line) {
                    CommandExecutionResult::Ok => {}
                    CommandExecutionResult::Exit => break,
                    CommandExecutionResult::Error(err) => {
                        debug!("Rejected {:?}: {}", line, err);
                        shell.print_error(&err);
                    }
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("CTRL-D: exiting.");
                break;
            }
            Err(e) => {
                println!("Error: {:?}", e);
                break;
            }
        }
    }

    if let Some(history_file) = &config.history_file {
        if let Err(err) = rl.save_history(history_file) {
            warn!("Failed to save shell history to {:?}: {}", history_file, err);
        }
    }

    if shell.output == OutputFormat::Pretty {
        cli_style::print_goodbye(shell.store.db_path());
    }
    Ok(())
}
