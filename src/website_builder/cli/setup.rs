use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.3.2" for releases, "0.3.2@abc1234 2024-01-15 14:30" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "website-builder", bin_name = "website-builder", version = get_version())]
#[command(about = "Build static websites and manage their versioned output", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output root (defaults to ./output)
    #[arg(
        short,
        long,
        global = true,
        env = "WEBSITE_BUILDER_OUTPUT",
        default_value = "output"
    )]
    pub output_dir: PathBuf,

    /// Verbose output (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the output tree
    Init,

    /// Write a file, backing up and versioning the previous content
    #[command(alias = "w")]
    Write {
        /// File name relative to the output root
        filename: String,

        /// Content to write (reads stdin when omitted)
        #[arg(short, long, conflicts_with = "from")]
        content: Option<String>,

        /// Read content from this file
        #[arg(long)]
        from: Option<PathBuf>,

        /// Do not back up the file being replaced
        #[arg(long)]
        no_backup: bool,
    },

    /// Print a file's current content
    #[command(alias = "cat")]
    Read { filename: String },

    /// Check whether a file exists
    Exists { filename: String },

    /// Back up a file now
    Backup { filename: String },

    /// List backups, optionally for one file
    #[command(alias = "bk")]
    Backups { filename: Option<String> },

    /// Copy a backup over its original file
    RestoreBackup { backup_name: String },

    /// List recorded versions of a file
    #[command(alias = "log")]
    Versions {
        filename: String,

        /// Print each version's full content
        #[arg(long)]
        full: bool,
    },

    /// Make an earlier version the live file
    RestoreVersion { filename: String, index: usize },

    /// Run the generation pipeline with artifacts from a directory
    Build {
        /// Topic of the website
        topic: String,

        /// Directory holding index.html, style.css and script.js
        #[arg(long)]
        from: PathBuf,
    },

    /// Get or set configuration
    Config {
        /// Configuration key (e.g., create-backups)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}
