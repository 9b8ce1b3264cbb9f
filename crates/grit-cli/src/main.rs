//! grit - a minimal git-compatible version control tool.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

/// grit - content-addressed version control
#[derive(Parser, Debug)]
#[command(name = "grit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Initialize the .git skeleton in the current directory
    Init,

    /// Print the payload of a stored object
    CatFile {
        /// Pretty-print the object's payload
        #[arg(short = 'p')]
        pretty: bool,

        /// Object hash (40 hex characters)
        hash: String,
    },

    /// Store a file as a blob and print its hash
    HashObject {
        /// File to hash
        path: String,
    },

    /// List the entries of a tree object
    LsTree {
        /// Print entry names only
        #[arg(long)]
        name_only: bool,

        /// Tree hash
        hash: String,
    },

    /// Snapshot the working directory as a tree and print its hash
    WriteTree,

    /// Create a commit from a tree and print its hash
    CommitTree {
        /// Tree hash
        tree: String,

        /// Commit message
        #[arg(short)]
        message: String,

        /// Parent commit hash
        #[arg(short)]
        parent: Option<String>,
    },

    /// Clone a repository over smart HTTP
    Clone {
        /// Repository URL
        url: String,

        /// Destination directory
        dir: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let result = match cli.command {
        Commands::Init => commands::init(),
        Commands::CatFile { pretty, hash } => commands::cat_file(&hash, pretty),
        Commands::HashObject { path } => commands::hash_object(&path),
        Commands::LsTree { name_only, hash } => commands::ls_tree(&hash, name_only),
        Commands::WriteTree => commands::write_tree(),
        Commands::CommitTree {
            tree,
            message,
            parent,
        } => commands::commit_tree(&tree, &message, parent.as_deref()),
        Commands::Clone { url, dir } => commands::clone(&url, &dir),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
