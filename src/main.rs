use anyhow::Result;
use crossterm::style::Stylize;
use photo_search::config::Config;
use photo_search::logging;
use photo_search::state::SearchEvent;
use photo_search::utils::app_paths::AppPaths;
use photo_search::{scheduler, DateFilter, FilterSettings, FiveHundredPxClient, SearchController};
use reedline::{
    FileBackedHistory, Prompt, PromptEditMode, PromptHistorySearch, PromptHistorySearchStatus,
    Reedline, Signal,
};
use std::borrow::Cow;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::warn;

mod command;
mod table_display;

use command::Command;
use table_display::{display_photos, display_state};

struct SearchPrompt;

impl Prompt for SearchPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        Cow::Borrowed("search")
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, _edit_mode: PromptEditMode) -> Cow<'_, str> {
        Cow::Borrowed("> ")
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed("... ")
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "failing ",
        };
        Cow::Owned(format!(
            "({}reverse search: {})",
            prefix, history_search.term
        ))
    }
}

fn print_help() {
    println!("{}", "Photo Search - debounced photo search".blue().bold());
    println!();
    println!("{}", "Usage:".yellow());
    println!("  photo-search [OPTIONS]");
    println!();
    println!("{}", "Options:".yellow());
    println!(
        "  {} - Write a commented config file with defaults",
        "--generate-config".green()
    );
    println!("  {}            - Show this help", "--help".green());
    println!();
    println!("{}", "At the prompt:".yellow());
    println!("  {}                 - Set the query (searches after a pause)", "text".green());
    println!("  {}           - Creative Commons photos only", ":cc on|off".green());
    println!("  {} - Only photos uploaded in range", ":dates <min> <max>".green());
    println!("  {}           - Remove the date range", ":dates off".green());
    println!("  {}               - Show the current search state", ":state".green());
    println!("  {}             - Show recent log lines", ":log [n]".green());
    println!("  {}                - Show this help", ":help".green());
    println!("  {}                - Exit (or Ctrl+D)", ":quit".green());
    println!();
}

fn generate_config() -> Result<()> {
    let path = Config::get_config_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, Config::create_default_with_comments())?;
    println!("Configuration file created at: {:?}", path);
    Ok(())
}

/// Print dispatches, results and errors as they happen
async fn render_events(controller: Arc<SearchController>) {
    let mut events = controller.events();
    loop {
        match events.recv().await {
            Ok(SearchEvent::Dispatched { query, .. }) => {
                println!("{}", format!("Searching for {:?}...", query.text).cyan());
            }
            Ok(SearchEvent::Completed { .. }) => display_photos(&controller.results()),
            Ok(SearchEvent::Failed { message, .. }) => println!("{}", message.red()),
            Ok(SearchEvent::Superseded { .. }) => {}
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(target: "ui", "renderer skipped {} events", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

fn apply_command(controller: &SearchController, filters: &FilterSettings, cmd: Command) {
    match cmd {
        Command::Query(text) => controller.set_query_text(text),
        Command::CreativeCommons(enabled) => filters.set_creative_commons_only(enabled),
        Command::DatesOff => filters.clear_date_range(),
        Command::Dates { min, max } => {
            filters.set_min_upload_date(Some(min));
            filters.set_max_upload_date(Some(max));
            filters.set_date_filter(DateFilter::UploadedBetween);
        }
        Command::State => display_state(&controller.state(), filters),
        Command::Log(count) => match logging::get_log_buffer() {
            Some(buffer) => {
                for entry in buffer.get_recent(count) {
                    println!("{}", entry.format_for_display());
                }
            }
            None => println!("{}", "Logging not initialized".yellow()),
        },
        Command::Help => print_help(),
        Command::Quit => {}
    }
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.contains(&"--help".to_string()) {
        print_help();
        return Ok(());
    }

    if args.contains(&"--generate-config".to_string()) {
        return generate_config();
    }

    let config = Config::load()?;
    logging::init_tracing(&config.logging.default_filter);

    let client = FiveHundredPxClient::from_config(&config.api);
    if !client.has_consumer_key() {
        eprintln!(
            "{}",
            "No API key configured: set PHOTO_SEARCH_API_KEY or api.consumer_key. Searches will fail."
                .yellow()
        );
    }

    let runtime = tokio::runtime::Runtime::new()?;
    let filters = Arc::new(FilterSettings::new());
    let controller = Arc::new(SearchController::new(
        Arc::new(client),
        Arc::clone(&filters),
        config.search.clone(),
    ));

    let (scheduler, renderer) = {
        let _guard = runtime.enter();
        let renderer = tokio::spawn(render_events(Arc::clone(&controller)));
        (scheduler::spawn(Arc::clone(&controller)), renderer)
    };

    print_help();
    println!(
        "{}",
        format!("Starting with query {:?}", controller.query_text()).cyan()
    );

    let mut line_editor = Reedline::create();
    match AppPaths::history_file().and_then(|path| Ok(FileBackedHistory::with_file(100, path)?)) {
        Ok(history) => line_editor = line_editor.with_history(Box::new(history)),
        Err(e) => warn!(target: "ui", "history disabled: {:#}", e),
    }

    let prompt = SearchPrompt;
    loop {
        match line_editor.read_line(&prompt)? {
            Signal::Success(buffer) => match command::parse(buffer.trim()) {
                Ok(Command::Quit) => break,
                Ok(cmd) => apply_command(&controller, &filters, cmd),
                Err(msg) => println!("{}", msg.red()),
            },
            Signal::CtrlC => continue,
            Signal::CtrlD => break,
        }
    }

    runtime.block_on(scheduler.shutdown());
    renderer.abort();
    Ok(())
}
