//! Watch-mode bundling: build once, then rebuild on every source change.
//!
//! The build itself is a [`BuildStep`]; [`WatchBundler`] owns the watcher and
//! a single long-lived rebuild task that runs the step for each burst of
//! changes until the returned [`WatchSubscription`] is unsubscribed.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use docsite_shared::{DocsiteError, Result};
use notify::event::{MetadataKind, ModifyKind};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Inputs shared by every build.
#[derive(Debug, Clone)]
pub struct BundleOptions {
    /// Entry files handed to the build step.
    pub entries: Vec<PathBuf>,
    /// Output directory; changes under it never trigger a rebuild.
    pub dist_dir: PathBuf,
    pub source_maps: bool,
    /// Window for coalescing bursts of file events.
    pub debounce: Duration,
}

/// One build of the site into `BundleOptions::dist_dir`.
pub trait BuildStep: Send + Sync + 'static {
    fn name(&self) -> &str;
    fn build(&self, options: &BundleOptions) -> impl Future<Output = Result<()>> + Send;
}

// ---------------------------------------------------------------------------
// Build steps
// ---------------------------------------------------------------------------

/// Copies each entry file into the output directory unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct CopyStep;

impl BuildStep for CopyStep {
    fn name(&self) -> &str {
        "copy"
    }

    async fn build(&self, options: &BundleOptions) -> Result<()> {
        tokio::fs::create_dir_all(&options.dist_dir)
            .await
            .map_err(|e| DocsiteError::io(&options.dist_dir, e))?;

        for entry in &options.entries {
            let file_name = entry.file_name().ok_or_else(|| {
                DocsiteError::Bundle(format!("entry has no file name: {}", entry.display()))
            })?;
            tokio::fs::copy(entry, options.dist_dir.join(file_name))
                .await
                .map_err(|e| DocsiteError::io(entry, e))?;
        }

        Ok(())
    }
}

/// Runs an external bundler CLI for every build.
#[derive(Debug, Clone)]
pub struct CommandStep {
    program: String,
    args: Vec<String>,
}

impl CommandStep {
    pub fn new(
        program: impl Into<String>,
        args: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Split a configured command line (`["npx", "parcel"]`) into program and args.
    pub fn from_command(command: &[String]) -> Result<Self> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| DocsiteError::config("bundler command is empty"))?;
        Ok(Self::new(program.clone(), args.iter().cloned()))
    }

    /// Full argument list for one build.
    pub fn command_args(&self, options: &BundleOptions) -> Vec<String> {
        let mut args = self.args.clone();
        args.push("build".into());
        args.extend(options.entries.iter().map(|e| e.to_string_lossy().into_owned()));
        args.push("--dist-dir".into());
        args.push(options.dist_dir.to_string_lossy().into_owned());
        args.push("--public-url".into());
        args.push("/".into());
        if !options.source_maps {
            args.push("--no-source-maps".into());
        }
        args
    }
}

impl BuildStep for CommandStep {
    fn name(&self) -> &str {
        &self.program
    }

    async fn build(&self, options: &BundleOptions) -> Result<()> {
        let output = tokio::process::Command::new(&self.program)
            .args(self.command_args(options))
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| DocsiteError::Bundle(format!("failed to run {}: {e}", self.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DocsiteError::Bundle(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Watch session
// ---------------------------------------------------------------------------

/// A build step plus the directory tree whose changes trigger it.
pub struct WatchBundler<S> {
    step: Arc<S>,
    options: BundleOptions,
    watch_root: PathBuf,
}

impl<S: BuildStep> WatchBundler<S> {
    pub fn new(step: S, options: BundleOptions, watch_root: impl Into<PathBuf>) -> Self {
        Self {
            step: Arc::new(step),
            options,
            watch_root: watch_root.into(),
        }
    }

    /// Run the initial build, then start watching.
    ///
    /// Resolves only after the first build has finished, so the output
    /// directory is populated before anyone serves it. A failing initial
    /// build is returned as an error; later failures are logged and the
    /// previous output stays in place.
    pub async fn watch(self) -> Result<WatchSubscription> {
        self.step.build(&self.options).await?;
        info!(step = self.step.name(), "initial build complete");

        let (changes_tx, changes_rx) = mpsc::unbounded_channel();
        let ignored = self.options.dist_dir.clone();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if triggers_rebuild(&event, &ignored) {
                    let _ = changes_tx.send(());
                }
            }
            Err(e) => warn!(error = %e, "watch error"),
        })
        .map_err(|e| DocsiteError::Watch(e.to_string()))?;

        watcher
            .watch(&self.watch_root, RecursiveMode::Recursive)
            .map_err(|e| DocsiteError::Watch(format!("{}: {e}", self.watch_root.display())))?;
        debug!(root = %self.watch_root.display(), "watching for changes");

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(rebuild_loop(self.step, self.options, changes_rx, shutdown_rx));

        Ok(WatchSubscription {
            watcher,
            shutdown: shutdown_tx,
            task,
        })
    }
}

/// Handle to a running watch session.
pub struct WatchSubscription {
    watcher: RecommendedWatcher,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl WatchSubscription {
    /// Stop watching and wait for the rebuild task to exit.
    ///
    /// A rebuild already in progress runs to completion; no further
    /// rebuilds are scheduled.
    pub async fn unsubscribe(self) -> Result<()> {
        drop(self.watcher);
        let _ = self.shutdown.send(());
        self.task
            .await
            .map_err(|e| DocsiteError::Watch(format!("rebuild task failed: {e}")))?;
        debug!("watch subscription closed");
        Ok(())
    }
}

async fn rebuild_loop<S: BuildStep>(
    step: Arc<S>,
    options: BundleOptions,
    mut changes: mpsc::UnboundedReceiver<()>,
    mut shutdown: oneshot::Receiver<()>,
) {
    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            change = changes.recv() => {
                if change.is_none() {
                    break;
                }
                tokio::time::sleep(options.debounce).await;
                while changes.try_recv().is_ok() {}

                match step.build(&options).await {
                    Ok(()) => info!(step = step.name(), "rebuilt"),
                    Err(e) => warn!(
                        step = step.name(),
                        error = %e,
                        "rebuild failed, keeping previous output"
                    ),
                }
            }
        }
    }
}

fn triggers_rebuild(event: &Event, ignored: &Path) -> bool {
    let relevant_kind = match event.kind {
        EventKind::Modify(ModifyKind::Metadata(MetadataKind::AccessTime)) => false,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => true,
        _ => false,
    };
    relevant_kind && event.paths.iter().any(|path| !path.starts_with(ignored))
}
