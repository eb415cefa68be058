//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use docsite_core::{ScanObserver, get_packages_info_with, render_catalog, write_catalog};
use docsite_server::DevServer;
use docsite_shared::{
    AppConfig, BundlerKind, CONFIG_FILE_NAME, Catalog, DevServerConfig, DocsiteError,
    PackageRecord, ScanOptions, ScanResult, init_config, load_config, load_config_from,
};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// docsite — build and serve the documentation website for a package repository.
#[derive(Parser)]
#[command(
    name = "docsite",
    version,
    about = "Discover packages, build their catalog, and serve the docs website.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to docsite.toml (defaults to ./docsite.toml).
    #[arg(long, global = true, env = "DOCSITE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Build step selection for `serve`.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum BundlerArg {
    Copy,
    Command,
}

impl From<BundlerArg> for BundlerKind {
    fn from(arg: BundlerArg) -> Self {
        match arg {
            BundlerArg::Copy => BundlerKind::Copy,
            BundlerArg::Command => BundlerKind::Command,
        }
    }
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Scan packages and emit the catalog as JSON.
    Scan {
        /// Glob patterns for package directories (defaults to config).
        patterns: Vec<String>,

        /// Fall back to manifest.json when package.json is absent.
        #[arg(long)]
        use_manifests: bool,

        /// Abort on the first directory that fails to scan.
        #[arg(long)]
        strict: bool,

        /// Base directory for relative patterns.
        #[arg(long)]
        root: Option<PathBuf>,

        /// Write the catalog here instead of stdout.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Start the watch-driven development server.
    Serve {
        /// Port to bind (defaults to config, then 3001).
        #[arg(short, long)]
        port: Option<u16>,

        /// Directory containing index.html and static/.
        #[arg(long)]
        static_root: Option<PathBuf>,

        /// Build step to run on every change.
        #[arg(long)]
        bundler: Option<BundlerArg>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Write docsite.toml with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "docsite=info",
        1 => "docsite=debug",
        _ => "docsite=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    // Logs go to stderr so `scan` output on stdout stays valid JSON.
    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.clone();
    match cli.command {
        Command::Scan {
            patterns,
            use_manifests,
            strict,
            root,
            out,
        } => {
            let config = resolve_config(config_path.as_deref())?;
            let patterns = if patterns.is_empty() {
                config.scan.patterns.clone()
            } else {
                patterns
            };
            let mut options = ScanOptions::from(&config);
            options.use_manifests |= use_manifests;
            options.strict |= strict;
            if root.is_some() {
                options.root = root;
            }
            cmd_scan(&patterns, &options, out.as_deref())
        }
        Command::Serve {
            port,
            static_root,
            bundler,
        } => {
            let config = resolve_config(config_path.as_deref())?;
            let mut server = DevServerConfig::from(&config);
            if port.is_some() {
                server.port = port;
            }
            if let Some(static_root) = static_root {
                server.static_root = static_root;
            }
            if let Some(bundler) = bundler {
                server.bundler = bundler.into();
            }
            cmd_serve(&server).await
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(config_path.as_deref()),
            ConfigAction::Show => cmd_config_show(config_path.as_deref()),
        },
    }
}

fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    Ok(config)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_scan(patterns: &[String], options: &ScanOptions, out: Option<&Path>) -> Result<()> {
    info!(
        patterns = ?patterns,
        use_manifests = options.use_manifests,
        strict = options.strict,
        "scanning packages"
    );

    let progress = CliProgress::new();
    let result = match get_packages_info_with(patterns, options, &progress) {
        Ok(result) => result,
        Err(e) => {
            progress.spinner.finish_and_clear();
            return Err(e.into());
        }
    };

    let failures = result.errors.clone();
    let catalog = Catalog::from(result);

    match out {
        Some(path) => {
            write_catalog(&catalog, path)?;
            eprintln!();
            eprintln!("  Packages:         {}", catalog.packages.len());
            eprintln!("  External sources: {}", catalog.external_sources.len());
            eprintln!("  Catalog:          {}", path.display());
            eprintln!();
        }
        None => print!("{}", render_catalog(&catalog)?),
    }

    if !failures.is_empty() {
        for failure in &failures {
            eprintln!("  error: {}: {}", failure.dir.display(), failure.message);
        }
        return Err(eyre!("{} package directories failed to scan", failures.len()));
    }

    Ok(())
}

async fn cmd_serve(config: &DevServerConfig) -> Result<()> {
    info!(
        static_root = %config.static_root.display(),
        port = config.effective_port(),
        bundler = ?config.bundler,
        "starting development server"
    );

    let server = DevServer::start(config).await?;
    println!("website ready on port: {}", server.local_addr().port());

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| eyre!("failed to listen for ctrl-c: {e}"))?;

    info!("shutting down");
    server.dispose().await?;
    Ok(())
}

fn cmd_config_init(path: Option<&Path>) -> Result<()> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(CONFIG_FILE_NAME),
    };
    init_config(&path)?;
    println!("Created {}", path.display());
    Ok(())
}

fn cmd_config_show(path: Option<&Path>) -> Result<()> {
    let config = resolve_config(path)?;
    let rendered =
        toml::to_string_pretty(&config).map_err(|e| eyre!("failed to render config: {e}"))?;
    print!("{rendered}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// Scan progress on an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            spinner.set_style(
                style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
            );
        }
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ScanObserver for CliProgress {
    fn package_found(&self, record: &PackageRecord) {
        self.spinner.set_message(format!(
            "{} ({} examples, {} docs)",
            record.id,
            record.examples_paths.len(),
            record.docs_paths.len()
        ));
    }

    fn directory_skipped(&self, dir: &Path) {
        self.spinner
            .set_message(format!("skipping {}", dir.display()));
    }

    fn directory_failed(&self, dir: &Path, error: &DocsiteError) {
        self.spinner
            .println(format!("  failed {}: {error}", dir.display()));
    }

    fn done(&self, _result: &ScanResult) {
        self.spinner.finish_and_clear();
    }
}
