//! regform - Main entry point
//!
//! Parses the command line, then either runs a headless command against the
//! stored draft or starts the terminal form.

use anyhow::{Context, Result};
use crossterm::event::{DisableFocusChange, EnableFocusChange};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::stdout;
use std::path::Path;
use tracing::{debug, error, info};

use regform::app::App;
use regform::cli::{Cli, Commands};
use regform::commands;
use regform::config::Settings;
use regform::controller::FormController;
use regform::i18n::{self, Translator};
use regform::logging;
use regform::rules::RuleTable;
use regform::storage::FileStore;

/// Main application entry point
fn main() -> Result<()> {
    let cli = Cli::parse_args();

    let settings = Settings::load_or_default(cli.config.as_deref())?;
    settings.validate().context("Invalid settings")?;
    let data_dir = settings.data_dir(cli.data_dir.as_deref())?;

    match &cli.command {
        Some(Commands::Status) => {
            logging::init_stderr_logging()?;
            debug!("Reading draft from {:?}", data_dir);
            match commands::draft_status(FileStore::new(&data_dir), RuleTable::standard()) {
                Some(summary) => println!("{}", commands::format_summary(&summary)),
                None => println!("No draft stored in {:?}", data_dir),
            }
        }
        Some(Commands::Check { file }) => {
            logging::init_stderr_logging()?;
            info!("Checking draft file: {:?}", file);
            match commands::check_draft_file(file, RuleTable::standard()) {
                Ok(summary) => {
                    println!("{}", commands::format_summary(&summary));
                    if !summary.is_complete() {
                        std::process::exit(1);
                    }
                }
                Err(e) => {
                    error!("Draft check failed: {:#}", e);
                    eprintln!("✗ {:#}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Reset) => {
            logging::init_stderr_logging()?;
            if commands::reset_draft(FileStore::new(&data_dir))? {
                println!("✓ Draft deleted");
            } else {
                println!("No draft stored in {:?}", data_dir);
            }
        }
        Some(Commands::Run) | None => run_form(&cli, &settings, &data_dir)?,
    }

    Ok(())
}

/// Start the interactive form
fn run_form(cli: &Cli, settings: &Settings, data_dir: &Path) -> Result<()> {
    let log_path = logging::init_file_logging(data_dir)?;
    info!("regform starting up, logging to {:?}", log_path);

    let params = cli.launch_params();
    debug!("Launch parameters: {:?}", params);

    let store = FileStore::new(data_dir);
    // The configured default stands in for a missing or unsupported locale
    let locale = i18n::system_locale()
        .filter(|locale| i18n::locale_language(locale).is_some())
        .unwrap_or_else(|| settings.default_language.code().to_string());
    let language = i18n::detect_language(params.lang.as_deref(), &store, Some(&locale));

    let form = FormController::new(store, RuleTable::standard(), settings.timings());
    let mut app = App::new(form, Translator::new(language), params.debug);
    app.restore_draft();
    if let Some(step) = params.step {
        app.open_step(step);
    }

    run_tui(&mut app)
}

/// Set up the terminal, run the app, and always restore the terminal
fn run_tui(app: &mut App<FileStore>) -> Result<()> {
    debug!("Initializing terminal for TUI mode");

    enable_raw_mode().context("Failed to enable raw mode")?;
    crossterm::execute!(stdout(), EnterAlternateScreen, EnableFocusChange)
        .context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout());
    let result = Terminal::new(backend)
        .context("Failed to create terminal")
        .and_then(|mut terminal| app.run(&mut terminal).map_err(Into::into));

    // Cleanup terminal (always attempt cleanup, even if app failed)
    let _ = disable_raw_mode();
    let _ = crossterm::execute!(stdout(), DisableFocusChange, LeaveAlternateScreen);

    if let Err(e) = &result {
        error!("Application error: {:#}", e);
    }
    info!("regform shutting down");
    result
}
