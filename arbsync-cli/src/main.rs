mod edit;
mod history;
mod languages;
mod stats;
mod translate;
mod validate;

use std::path::PathBuf;

use arbsync_cli::{Config, config::DEFAULT_CONFIG_FILE};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::{
    edit::{run_remove, run_rename},
    history::{print_changes, run_exclude},
    languages::print_languages,
    stats::print_stats,
    translate::run_translate,
    validate::run_validate,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Project configuration file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Log debug output to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// List the supported languages.
    Languages {
        #[arg(long)]
        json: bool,
    },

    /// Show what a translation run would create, update, retain and delete.
    Stats {
        /// Target languages (comma separated or repeated); defaults to the config
        #[arg(short, long, value_delimiter = ',')]
        lang: Vec<String>,

        #[arg(long)]
        json: bool,
    },

    /// Validate translated files against the source file.
    Validate {
        #[arg(short, long, value_delimiter = ',')]
        lang: Vec<String>,

        /// Decode HTML entities left in translations and write the files back
        #[arg(long)]
        fix_html: bool,

        #[arg(long)]
        json: bool,
    },

    /// Machine-translate new and changed keys into the target files.
    Translate {
        #[arg(short, long, value_delimiter = ',')]
        lang: Vec<String>,

        /// Only print the plan
        #[arg(long)]
        dry_run: bool,

        #[arg(long)]
        json: bool,
    },

    /// Inspect or edit the history snapshot.
    History {
        #[command(subcommand)]
        command: HistoryCommands,
    },

    /// Rename keys in every ARB file and the history.
    Rename {
        /// Key to rename (repeatable, paired with --new)
        #[arg(long, required = true)]
        old: Vec<String>,

        /// New key name (repeatable, paired with --old)
        #[arg(long, required = true)]
        new: Vec<String>,

        #[arg(long)]
        json: bool,
    },

    /// Remove keys from every ARB file and the history.
    Remove {
        /// Key to remove (repeatable)
        #[arg(short, long, required = true)]
        key: Vec<String>,

        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Debug)]
enum HistoryCommands {
    /// List source keys changed since the last successful run.
    Changes {
        #[arg(long)]
        json: bool,
    },

    /// Accept the current source value of keys without retranslating them.
    Exclude {
        #[arg(short, long, required = true)]
        key: Vec<String>,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn run(args: Args) -> Result<(), String> {
    let load_config = || Config::load(&args.config);
    match args.commands {
        Commands::Languages { json } => {
            print_languages(json);
            Ok(())
        }
        Commands::Stats { lang, json } => print_stats(&load_config()?, &lang, json),
        Commands::Validate {
            lang,
            fix_html,
            json,
        } => run_validate(&load_config()?, &lang, fix_html, json),
        Commands::Translate {
            lang,
            dry_run,
            json,
        } => run_translate(&load_config()?, &lang, dry_run, json).await,
        Commands::History { command } => match command {
            HistoryCommands::Changes { json } => print_changes(&load_config()?, json),
            HistoryCommands::Exclude { key } => run_exclude(&load_config()?, &key),
        },
        Commands::Rename { old, new, json } => run_rename(&load_config()?, &old, &new, json),
        Commands::Remove { key, json } => run_remove(&load_config()?, &key, json),
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(args).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
