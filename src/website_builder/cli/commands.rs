//! # CLI Layer
//!
//! One possible client of the library. This is the only place that:
//! - Parses arguments
//! - Writes to stdout/stderr
//! - Installs the tracing subscriber
//! - Decides exit codes (via `main`)
//!
//! Handlers call the API and hand the `CmdResult` to `print`.

use super::print::{
    print_backups, print_config, print_full_versions, print_messages, print_versions,
};
use super::setup::{Cli, Commands};
use clap::Parser;
use std::fs;
use std::io::{IsTerminal, Read};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use website_builder::api::{BuilderApi, ConfigAction};
use website_builder::clock::SystemClock;
use website_builder::config::BuilderConfig;
use website_builder::error::{BuilderError, Result};
use website_builder::pipeline::DirectoryGenerator;
use website_builder::store::json_history::JsonHistoryFile;
use website_builder::store::FileStore;

struct AppContext {
    api: BuilderApi<JsonHistoryFile, SystemClock>,
    config: BuilderConfig,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let mut ctx = init_context(&cli)?;

    match cli.command {
        Commands::Init => handle_init(&ctx),
        Commands::Write {
            filename,
            content,
            from,
            no_backup,
        } => handle_write(&mut ctx, filename, content, from, no_backup),
        Commands::Read { filename } => handle_read(&ctx, filename),
        Commands::Exists { filename } => handle_exists(&ctx, filename),
        Commands::Backup { filename } => handle_backup(&ctx, filename),
        Commands::Backups { filename } => handle_backups(&ctx, filename),
        Commands::RestoreBackup { backup_name } => handle_restore_backup(&ctx, backup_name),
        Commands::Versions { filename, full } => handle_versions(&ctx, filename, full),
        Commands::RestoreVersion { filename, index } => {
            handle_restore_version(&mut ctx, filename, index)
        }
        Commands::Build { topic, from } => handle_build(&mut ctx, topic, from),
        Commands::Config { key, value } => handle_config(&ctx, key, value),
    }
}

/// Logs go to stderr so stdout stays clean for `read`.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "website_builder=warn",
        1 => "website_builder=info",
        _ => "website_builder=debug",
    };
    let is_tty = std::io::stderr().is_terminal();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_ansi(is_tty)
        .with_writer(std::io::stderr)
        .init();
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let config = BuilderConfig::load(&cli.output_dir)?;
    let store = FileStore::open(&cli.output_dir, &config)?;
    Ok(AppContext {
        api: BuilderApi::new(store),
        config,
    })
}

fn handle_init(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.init()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_write(
    ctx: &mut AppContext,
    filename: String,
    content: Option<String>,
    from: Option<PathBuf>,
    no_backup: bool,
) -> Result<()> {
    let content = match (content, from) {
        (Some(text), _) => text,
        (None, Some(path)) => {
            let label = path.display().to_string();
            fs::read_to_string(&path).map_err(|e| BuilderError::io(label, e))?
        }
        (None, None) => read_stdin()?,
    };
    let backup = ctx.config.create_backups && !no_backup;

    let result = ctx.api.write_file(&filename, &content, backup)?;
    print_messages(&result.messages);
    Ok(())
}

fn read_stdin() -> Result<String> {
    let mut stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Err(BuilderError::Api(
            "No content given: pass --content, --from, or pipe it on stdin".into(),
        ));
    }
    let mut buffer = String::new();
    stdin
        .read_to_string(&mut buffer)
        .map_err(|e| BuilderError::io("<stdin>", e))?;
    Ok(buffer)
}

fn handle_read(ctx: &AppContext, filename: String) -> Result<()> {
    let result = ctx.api.read_file(&filename)?;
    if let Some(content) = &result.content {
        print!("{}", content);
    }
    Ok(())
}

fn handle_exists(ctx: &AppContext, filename: String) -> Result<()> {
    let result = ctx.api.file_exists(&filename)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_backup(ctx: &AppContext, filename: String) -> Result<()> {
    let result = ctx.api.create_backup(&filename)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_backups(ctx: &AppContext, filename: Option<String>) -> Result<()> {
    let result = ctx.api.list_backups(filename.as_deref())?;
    print_backups(&result.backups);
    print_messages(&result.messages);
    Ok(())
}

fn handle_restore_backup(ctx: &AppContext, backup_name: String) -> Result<()> {
    let result = ctx.api.restore_backup(&backup_name)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_versions(ctx: &AppContext, filename: String, full: bool) -> Result<()> {
    let result = ctx.api.list_versions(&filename)?;
    if full {
        print_full_versions(&result.versions);
    } else {
        print_versions(&result.versions);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_restore_version(ctx: &mut AppContext, filename: String, index: usize) -> Result<()> {
    let result = ctx.api.restore_version(&filename, index)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_build(ctx: &mut AppContext, topic: String, from: PathBuf) -> Result<()> {
    let mut generator = DirectoryGenerator::new(from);
    let result = ctx.api.build(&topic, &mut generator)?;
    for path in &result.paths {
        println!("{}", path.display());
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };

    let result = ctx.api.config(action)?;
    if let Some(config) = &result.config {
        if result.messages.is_empty() {
            print_config(config);
        }
    }
    print_messages(&result.messages);
    Ok(())
}
