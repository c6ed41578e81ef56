mod config;
mod interact;
mod items;
mod output;
mod session;

use clap::Parser;
use pairsort_core::{apply_decision, start_session, worst_case_comparisons, Phase};
use rand::seq::SliceRandom;
use std::io::{self, BufRead, IsTerminal};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::interact::Choice;
use crate::session::Session;

pub fn bail(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {msg}");
    std::process::exit(1);
}

#[derive(Parser)]
#[command(name = "pairsort", version, about = "Sort a list by taste, one pairwise choice at a time")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Sort items interactively (or resume a saved session)
    Rank(RankArgs),
    /// Show a saved session's progress or final ranking
    Show(ShowArgs),
    /// Create a default config file at ~/.config/pairsort/config.toml
    Init,
}

#[derive(Parser)]
struct RankArgs {
    /// File with items: one per line, a JSON array of strings, or a JSON
    /// array of {id, name, detail} objects
    #[arg(long)]
    items: Option<PathBuf>,

    /// Inline item (repeatable)
    #[arg(long = "item")]
    inline_items: Vec<String>,

    /// Session file to create or resume (default: ./pairsort-session.json)
    #[arg(long)]
    session: Option<PathBuf>,

    /// Discard any existing session at the session path and start over
    #[arg(long)]
    fresh: bool,

    /// Shuffle items before sorting starts
    #[arg(long)]
    shuffle: bool,

    /// Output JSON instead of a table when sorting completes
    #[arg(long)]
    json: bool,

    /// Path to config file (default: ~/.config/pairsort/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser)]
struct ShowArgs {
    /// Session file to inspect (default: ./pairsort-session.json)
    #[arg(long)]
    session: Option<PathBuf>,

    /// Output JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Path to config file (default: ~/.config/pairsort/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Rank(args) => run_rank(args),
        Commands::Show(args) => run_show(args),
        Commands::Init => {
            let path = config::create_default_config();
            println!("Created config at {}", path.display());
            println!("Edit it to set your default session path, shuffle, etc.");
        }
    }
}

/// Load items from all sources: --items file, --item inline args, or stdin.
fn load_items(args: &RankArgs) -> Vec<pairsort_core::Item> {
    let mut loaded = Vec::new();

    // From file (auto-detects JSON vs one-per-line)
    if let Some(ref path) = args.items {
        let content = std::fs::read_to_string(path)
            .unwrap_or_else(|e| bail(format!("Failed to read items file {}: {e}", path.display())));
        loaded = items::parse_items_from_str(&content).unwrap_or_else(|e| bail(e));
    }

    // From inline --item flags
    let offset = loaded.len();
    loaded.extend(
        args.inline_items
            .iter()
            .enumerate()
            .map(|(i, name)| pairsort_core::Item::new((offset + i + 1).to_string(), name)),
    );

    // From stdin (only if no file and no inline items)
    if loaded.is_empty() {
        let stdin = io::stdin();
        if stdin.is_terminal() {
            bail("No items provided. Use --items <file>, --item <name>, or pipe items via stdin.");
        }
        let content: String = stdin
            .lock()
            .lines()
            .map(|l| l.expect("Failed to read from stdin"))
            .collect::<Vec<_>>()
            .join("\n");
        loaded = items::parse_items_from_str(&content).unwrap_or_else(|e| bail(e));
    }

    if loaded.len() < 2 {
        bail(format!("Need at least 2 items to sort, got {}", loaded.len()));
    }
    loaded
}

fn run_rank(args: RankArgs) {
    let config_path = args.config.clone().unwrap_or_else(config::config_path);
    let cfg = config::load_config(&config_path);

    let session_path = args
        .session
        .clone()
        .or(cfg.session)
        .unwrap_or_else(|| PathBuf::from(session::DEFAULT_SESSION_FILE));
    let history_limit = cfg.history_limit.unwrap_or(session::DEFAULT_HISTORY_LIMIT);
    let shuffle = args.shuffle || cfg.shuffle.unwrap_or(false);
    let json = args.json || cfg.json.unwrap_or(false);

    // Resume when a session exists and no new item source was given.
    let no_new_items = args.items.is_none() && args.inline_items.is_empty();
    let resume = session_path.exists() && !args.fresh && no_new_items;

    let mut session = if resume {
        let session = Session::load(&session_path, history_limit).unwrap_or_else(|e| {
            bail(format!(
                "Failed to resume session {}: {e}",
                session_path.display()
            ))
        });
        info!(path = %session_path.display(), "resuming session");
        println!(
            "Resuming session from {} ({} decisions so far)",
            session_path.display(),
            session.decisions
        );
        session
    } else {
        let mut loaded = load_items(&args);
        if shuffle {
            loaded.shuffle(&mut rand::rng());
        }
        let state = start_session(&loaded);
        let session = Session::new(loaded, state, history_limit);
        // Written before the first pair is shown, like every later state.
        session
            .save(&session_path)
            .unwrap_or_else(|e| bail(format!("Failed to save session: {e}")));
        info!(path = %session_path.display(), items = session.items.len(), "new session");
        session
    };

    // Items piped through stdin leave nothing to read decisions from.
    if !io::stdin().is_terminal() && !session.state.is_complete() {
        println!(
            "Session saved to {}. Re-run `pairsort rank --session {}` from a terminal to start comparing.",
            session_path.display(),
            session_path.display()
        );
        return;
    }

    let bound = worst_case_comparisons(session.items.len());

    loop {
        let Some(pair) = session.state.current_pair().cloned() else {
            break;
        };

        // The current state is already on disk: persist-then-present.
        let winner = match interact::prompt_choice(&pair, session.decisions, bound) {
            Choice::Quit => {
                println!("Session saved to {}", session_path.display());
                return;
            }
            Choice::Undo => {
                if session.undo() {
                    session
                        .save(&session_path)
                        .unwrap_or_else(|e| bail(format!("Failed to save session: {e}")));
                } else {
                    println!("Nothing to undo.");
                }
                continue;
            }
            Choice::Left => pair.left.id.clone(),
            Choice::Right => pair.right.id.clone(),
        };

        let next = apply_decision(&session.state, &winner)
            .unwrap_or_else(|e| bail(format!("Decision failed: {e}")));
        debug!(%winner, decisions = session.decisions + 1, "decision applied");
        session
            .push(next)
            .unwrap_or_else(|e| bail(format!("Failed to record decision: {e}")));
        session
            .save(&session_path)
            .unwrap_or_else(|e| bail(format!("Failed to save session: {e}")));
    }

    finish(&session, json);
}

fn run_show(args: ShowArgs) {
    let config_path = args.config.clone().unwrap_or_else(config::config_path);
    let cfg = config::load_config(&config_path);

    let session_path = args
        .session
        .clone()
        .or(cfg.session)
        .unwrap_or_else(|| PathBuf::from(session::DEFAULT_SESSION_FILE));

    let session = Session::load(&session_path, session::DEFAULT_HISTORY_LIMIT)
        .unwrap_or_else(|e| bail(format!("Failed to read session {}: {e}", session_path.display())));

    let (placed, total) = session.state.progress();
    match session.state.phase() {
        Phase::Completed => finish(&session, args.json || cfg.json.unwrap_or(false)),
        phase => {
            println!("Session: {}", session_path.display());
            println!("Phase: {phase}");
            println!(
                "Progress: {placed}/{total} items placed, {} of at most {} comparisons answered",
                session.decisions,
                worst_case_comparisons(session.items.len())
            );
        }
    }
}

fn finish(session: &Session, json: bool) {
    let Some(ranking) = session.state.ranking() else {
        bail("Session is not complete yet");
    };
    if json {
        output::print_json(&ranking, session.decisions);
    } else {
        output::print_table(&ranking, session.decisions);
    }
}
