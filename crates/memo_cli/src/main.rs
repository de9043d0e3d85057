//! Memo board command-line client.
//!
//! # Responsibility
//! - Drive `MemoService` over the SQLite persistence adapter.
//! - Render the derived view as text or JSON.
//!
//! # Invariants
//! - Every command loads the confirmed collection before acting.
//! - Failures go to stderr with a non-zero exit code.

use clap::{Args, Parser, Subcommand};
use log::{error, info};
use memo_core::db::open_db;
use memo_core::{
    core_version, default_log_level, derive_preview_text, init_logging, Category, CategoryFilter,
    Memo, MemoDraft, MemoId, MemoPatch, MemoService, MemoView, SqliteMemoRepository,
};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

type CliResult<T> = Result<T, Box<dyn Error>>;

/// Personal memo board.
#[derive(Parser)]
#[command(name = "memo", version, about = "Personal markdown memo board")]
struct Cli {
    /// SQLite database file
    #[arg(long, env = "MEMO_DB", default_value = "memos.sqlite3", global = true)]
    db: PathBuf,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, env = "MEMO_LOG_DIR", global = true)]
    log_dir: Option<String>,

    /// trace|debug|info|warn|error
    #[arg(long, env = "MEMO_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List memos visible under a category/search filter
    List {
        #[command(flatten)]
        filter: FilterArgs,
        /// Print the full derived view as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one memo
    Show { id: MemoId },
    /// Create a memo
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long, default_value = "personal")]
        category: Category,
        /// Repeatable; blanks and duplicates are dropped
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Update selected fields of a memo
    Edit {
        id: MemoId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        category: Option<Category>,
        /// Replaces the whole tag list when given
        #[arg(long = "tag")]
        tags: Option<Vec<String>>,
    },
    /// Delete a memo
    Delete { id: MemoId },
    /// Delete every memo
    Clear,
    /// Per-category totals
    Counts {
        #[arg(long)]
        json: bool,
    },
    /// Print the core library version
    Version,
}

#[derive(Args)]
struct FilterArgs {
    /// Category name or `all`
    #[arg(long, default_value = "all")]
    category: CategoryFilter,
    /// Search text; prefix with `#` to match tags only
    #[arg(long, default_value = "")]
    search: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli
            .log_level
            .clone()
            .unwrap_or_else(|| default_log_level().to_string());
        if let Err(err) = init_logging(&level, log_dir) {
            eprintln!("warning: logging disabled: {err}");
        }
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_command module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<()> {
    if matches!(cli.command, Command::Version) {
        println!("memo_core {}", core_version());
        return Ok(());
    }

    let mut conn = open_db(&cli.db)?;
    let repo = SqliteMemoRepository::try_new(&mut conn)?;
    let mut service = MemoService::new(repo);
    let loaded = service.load()?;
    info!("event=cli_load module=cli status=ok count={loaded}");

    match cli.command {
        Command::List { filter, json } => {
            service.set_category_filter(filter.category);
            let view = service.set_search(filter.search);
            if json {
                println!("{}", serde_json::to_string_pretty(view)?);
            } else {
                print_view(view);
            }
        }
        Command::Show { id } => {
            let memo = service
                .get_memo(id)
                .ok_or_else(|| format!("memo not found: {id}"))?;
            print_memo_detail(memo);
        }
        Command::Add {
            title,
            content,
            category,
            tags,
        } => {
            let draft = MemoDraft::new(title, content, category).with_tags(tags);
            draft.validate()?;
            let memo = service.create_memo(draft)?;
            println!("created {}", memo.id);
        }
        Command::Edit {
            id,
            title,
            content,
            category,
            tags,
        } => {
            let patch = MemoPatch {
                title,
                content,
                category,
                tags,
            };
            if patch.is_empty() {
                return Err("nothing to update; pass at least one field".into());
            }
            patch.validate()?;
            let memo = service.update_memo(id, patch)?;
            println!("updated {}", memo.id);
        }
        Command::Delete { id } => {
            service.delete_memo(id)?;
            println!("deleted {id}");
        }
        Command::Clear => {
            service.clear_all()?;
            println!("cleared");
        }
        Command::Counts { json } => {
            let counts = service.view().category_counts;
            if json {
                println!("{}", serde_json::to_string_pretty(&counts)?);
            } else {
                println!("{} ({})", CategoryFilter::All.label(), counts.total());
                for (category, count) in counts.iter() {
                    println!("{} ({count})", category.label());
                }
            }
        }
        Command::Version => {}
    }
    Ok(())
}

fn print_view(view: &MemoView) {
    println!("{} / {} memos", view.visible_count, view.total_count);
    for memo in &view.visible {
        print_memo_line(memo);
    }
}

fn print_memo_line(memo: &Memo) {
    let preview = derive_preview_text(&memo.content).unwrap_or_default();
    let tags = format_tags(&memo.tags);
    println!(
        "{}  [{}] {}  {}  {}",
        memo.id,
        memo.category.label(),
        memo.title,
        tags,
        preview
    );
}

fn print_memo_detail(memo: &Memo) {
    println!("id:        {}", memo.id);
    println!("title:     {}", memo.title);
    println!("category:  {} ({})", memo.category.label(), memo.category);
    println!("tags:      {}", format_tags(&memo.tags));
    println!("createdAt: {}", memo.created_at);
    println!("updatedAt: {}", memo.updated_at);
    println!();
    println!("{}", memo.content);
}

fn format_tags(tags: &[String]) -> String {
    tags.iter()
        .map(|tag| format!("#{tag}"))
        .collect::<Vec<_>>()
        .join(" ")
}
