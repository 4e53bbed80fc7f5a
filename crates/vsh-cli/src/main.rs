//! vsh CLI — vault size history.
//!
//! Commands: init, refresh, timeline, category, watch.
//! The binary emits graph data as JSON; drawing is a consumer's job.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use vsh_core::config::CONFIG_REL_PATH;
use vsh_core::{Category, Settings};
use vsh_index::{FileIndexStore, Notifier};
use vsh_vault::watcher::VaultWatcher;
use vsh_vault::{FsVault, Vault};

#[derive(Parser)]
#[command(name = "vsh")]
#[command(version)]
#[command(about = "Vault size history — category time series for file collections")]
struct Cli {
    /// Vault root directory.
    #[arg(long, global = true, default_value = ".")]
    vault: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create `.vsh/config.toml` with default settings
    Init,
    /// Rebuild the file index now
    Refresh,
    /// Build cumulative per-category series and print them as JSON
    Timeline {
        /// Additionally write a per-file summary report CSV to this
        /// vault-relative path.
        #[arg(long)]
        csv_report: Option<String>,
    },
    /// Inspect or edit the configured categories
    Category {
        #[command(subcommand)]
        command: CategoryCommands,
    },
    /// Keep the index fresh: refresh every interval tick, sooner when the
    /// vault changes
    Watch {
        /// Seconds between refreshes.
        #[arg(long, default_value_t = 600)]
        interval: u64,
    },
}

#[derive(Subcommand)]
enum CategoryCommands {
    /// List configured categories
    List,
    /// Add a category (id is assigned automatically)
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        pattern: String,
        #[arg(long, default_value = "#5470c6")]
        color: String,
        /// Evaluate independently of the single-apply group.
        #[arg(long)]
        always_apply: bool,
    },
}

/// Prints index notices to the terminal.
struct TermNotifier;

impl Notifier for TermNotifier {
    fn notify(&self, message: &str) {
        println!("[vsh] {message}");
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = cli.vault.join(CONFIG_REL_PATH);

    match cli.command {
        Commands::Init => {
            if config_path.exists() {
                bail!("already initialized: {}", config_path.display());
            }
            Settings::default().save(&config_path)?;
            println!("Initialized vsh vault at {}", cli.vault.display());
        }
        Commands::Refresh => {
            let settings = Settings::load(&config_path)?;
            let vault = FsVault::new(&cli.vault);
            let notifier = TermNotifier;
            let mut store = FileIndexStore::new(&vault, &settings).with_notifier(&notifier);
            store.refresh(true)?;
        }
        Commands::Timeline { csv_report } => {
            let settings = Settings::load(&config_path)?;
            let vault = FsVault::new(&cli.vault);
            let mut store = FileIndexStore::new(&vault, &settings);
            store.load()?;

            let data = vsh_timeline::build(&vault, store.snapshot(), &settings)?;
            println!("{}", serde_json::to_string_pretty(&data)?);

            if let Some(report_path) = csv_report {
                write_csv_report(&vault, &settings, &report_path)?;
            }
        }
        Commands::Category { command } => match command {
            CategoryCommands::List => {
                let settings = Settings::load(&config_path)?;
                for c in &settings.categories {
                    let group = if c.always_apply { "always" } else { "single" };
                    println!("{:>3}  {:<20} {:<8} {}", c.id, c.name, group, c.pattern);
                }
            }
            CategoryCommands::Add {
                name,
                pattern,
                color,
                always_apply,
            } => {
                let mut settings = Settings::load(&config_path)?;
                let id = settings.next_category_id();
                settings
                    .categories
                    .push(Category::new(id, &name, &pattern, &color, always_apply));
                settings.save(&config_path)?;
                println!("Added category {id}: {name}");
            }
        },
        Commands::Watch { interval } => {
            let settings = Settings::load(&config_path)?;
            let vault = FsVault::new(&cli.vault);
            let watcher =
                VaultWatcher::start(&cli.vault).context("failed to start vault watcher")?;
            let mut store = FileIndexStore::new(&vault, &settings);

            // One logical thread: interval ticks and change signals are
            // serialized behind the same loop, so refreshes never overlap.
            store.refresh(false)?;
            loop {
                if watcher.changed_within(Duration::from_secs(interval)) {
                    info!("vault change detected");
                }
                store.refresh(false)?;
            }
        }
    }

    Ok(())
}

/// Write the per-file summary report: every live file with its creation
/// date in the display format.
fn write_csv_report(vault: &FsVault, settings: &Settings, report_path: &str) -> Result<()> {
    let mut files = vault.files()?;
    files.sort_by(|a, b| a.path.cmp(&b.path));

    let mut out = String::from("\"File Path\",\"Created Date\"\n");
    for file in &files {
        out.push('"');
        out.push_str(&file.path.replace('"', "\"\""));
        out.push_str("\",");
        out.push_str(&file.created.format(&settings.date_format).to_string());
        out.push('\n');
    }
    vault.write(report_path, &out)?;
    println!("CSV report written to {report_path}");
    Ok(())
}
