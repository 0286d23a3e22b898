//! Concurrent recursive tree builder.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use futures::future::BoxFuture;
use futures::stream::{self, StreamExt, TryStreamExt};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use fstree_core::{
    BuildConfig, BuildWarning, ChildHandle, DirectoryHandle, Entry, FetchErrorPolicy, FileHandle,
    TreeError, TreeStats,
};

use crate::progress::BuildProgress;
use crate::skip::{NeverSkip, PatternSkip, SkipPredicate};

/// Files fetched between two progress updates.
const PROGRESS_INTERVAL: u64 = 1000;

/// Result of a successful build.
#[derive(Debug)]
pub struct BuildOutput {
    /// Root directory entry.
    pub root: Entry,
    /// Summary statistics.
    pub stats: TreeStats,
    /// Warnings encountered during the build.
    pub warnings: Vec<BuildWarning>,
    /// Duration of the build.
    pub duration: Duration,
}

impl BuildOutput {
    /// Check if there were any warnings during the build.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Builds [`Entry`] trees from host directory capabilities.
pub struct TreeBuilder {
    config: BuildConfig,
    skip: Arc<dyn SkipPredicate>,
    cancel: CancellationToken,
    progress_tx: broadcast::Sender<BuildProgress>,
}

impl TreeBuilder {
    /// Create a builder with default configuration.
    pub fn new() -> Self {
        Self::with_config(BuildConfig::default())
    }

    /// Create a builder with the given configuration.
    pub fn with_config(config: BuildConfig) -> Self {
        let (progress_tx, _) = broadcast::channel(100);
        Self {
            config,
            skip: Arc::new(NeverSkip),
            cancel: CancellationToken::new(),
            progress_tx,
        }
    }

    /// Set the caller's skip predicate. It is combined with the configured
    /// ignore patterns.
    pub fn with_skip(mut self, skip: impl SkipPredicate + 'static) -> Self {
        self.skip = Arc::new(skip);
        self
    }

    /// Use `token` to abandon builds started by this builder.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Token that cancels builds started by this builder.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Subscribe to build progress updates.
    pub fn subscribe(&self) -> broadcast::Receiver<BuildProgress> {
        self.progress_tx.subscribe()
    }

    /// Build a tree rooted at `root`. The root entry gets the empty path.
    pub async fn build(&self, root: Arc<dyn DirectoryHandle>) -> Result<BuildOutput, TreeError> {
        self.build_at(root, "").await
    }

    /// Build a tree whose root already sits at `prefix`.
    pub async fn build_at(
        &self,
        root: Arc<dyn DirectoryHandle>,
        prefix: &str,
    ) -> Result<BuildOutput, TreeError> {
        let patterns = PatternSkip::from_config(&self.config)?;
        let state = BuildState::new(patterns, self.progress_tx.clone());

        let result = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(TreeError::Cancelled),
            result = self.build_dir(&state, root, prefix.to_string()) => result,
        };
        let root = result.inspect_err(|e| debug!(error = %e, "tree build failed"))?;

        let duration = state.start.elapsed();
        let stats = TreeStats::collect(&root);
        state.send_progress(root.path(), true);
        info!(
            files = stats.total_files,
            dirs = stats.total_dirs,
            bytes = stats.total_size,
            ?duration,
            "tree build complete"
        );

        Ok(BuildOutput {
            root,
            stats,
            warnings: state.into_warnings(),
            duration,
        })
    }

    /// Enumerate a directory and build all of its children.
    fn build_dir<'a>(
        &'a self,
        state: &'a BuildState,
        dir: Arc<dyn DirectoryHandle>,
        path: String,
    ) -> BoxFuture<'a, Result<Entry, TreeError>> {
        Box::pin(async move {
            if self.cancel.is_cancelled() {
                return Err(TreeError::Cancelled);
            }

            let children = dir
                .entries()
                .await
                .map_err(|e| TreeError::enumeration(path.clone(), e))?;
            state.record_dir();
            debug!(path = %path, children = children.len(), "enumerated directory");

            let pending: Vec<_> = children
                .into_iter()
                .filter(|child| !state.should_skip(self.skip.as_ref(), child, &path))
                .map(|child| {
                    let child_path = join_path(&path, child.name());
                    self.build_child(state, child, child_path)
                })
                .collect();

            // `buffered` yields results in submission order, whatever order
            // they complete in.
            let entries: Vec<Entry> = stream::iter(pending)
                .buffered(self.config.max_concurrency)
                .try_collect()
                .await?;

            let name = dir.name().to_string();
            Ok(Entry::directory(dir, name, path, entries))
        })
    }

    fn build_child<'a>(
        &'a self,
        state: &'a BuildState,
        child: ChildHandle,
        path: String,
    ) -> BoxFuture<'a, Result<Entry, TreeError>> {
        match child {
            ChildHandle::Directory(dir) => self.build_dir(state, dir, path),
            ChildHandle::File(file) => Box::pin(self.fetch_file(state, file, path)),
        }
    }

    async fn fetch_file(
        &self,
        state: &BuildState,
        file: Arc<dyn FileHandle>,
        path: String,
    ) -> Result<Entry, TreeError> {
        if self.cancel.is_cancelled() {
            return Err(TreeError::Cancelled);
        }

        match file.get_file().await {
            Ok(blob) => {
                state.record_file(&path, blob.size());
                Ok(Entry::file(file.name(), path, blob))
            }
            Err(err) => match self.config.on_fetch_error {
                FetchErrorPolicy::Abort => Err(TreeError::fetch(path, err)),
                FetchErrorPolicy::Placeholder => {
                    warn!(path = %path, error = %err, "file unreadable, using placeholder");
                    state.push_warning(BuildWarning::unreadable(path.as_str(), &err));
                    Ok(Entry::unreadable(file.name(), path))
                }
            },
        }
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a tree with default configuration.
///
/// `prefix` is the path already accumulated for `dir`; `None` uses the
/// directory's own name. Pass `Some("")` for a root.
pub async fn build_tree(
    dir: Arc<dyn DirectoryHandle>,
    skip: impl SkipPredicate + 'static,
    prefix: Option<&str>,
) -> Result<Entry, TreeError> {
    let prefix = match prefix {
        Some(prefix) => prefix.to_string(),
        None => dir.name().to_string(),
    };
    let output = TreeBuilder::new()
        .with_skip(skip)
        .build_at(dir, &prefix)
        .await?;
    Ok(output.root)
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}/{name}")
    }
}

/// Shared state of a single build invocation.
struct BuildState {
    patterns: PatternSkip,
    warnings: Mutex<Vec<BuildWarning>>,
    files: AtomicU64,
    dirs: AtomicU64,
    bytes: AtomicU64,
    start: Instant,
    progress_tx: broadcast::Sender<BuildProgress>,
}

impl BuildState {
    fn new(patterns: PatternSkip, progress_tx: broadcast::Sender<BuildProgress>) -> Self {
        Self {
            patterns,
            warnings: Mutex::new(Vec::new()),
            files: AtomicU64::new(0),
            dirs: AtomicU64::new(0),
            bytes: AtomicU64::new(0),
            start: Instant::now(),
            progress_tx,
        }
    }

    fn should_skip(&self, skip: &dyn SkipPredicate, child: &ChildHandle, parent: &str) -> bool {
        self.patterns.should_skip(child, parent) || skip.should_skip(child, parent)
    }

    fn record_dir(&self) {
        self.dirs.fetch_add(1, Ordering::Relaxed);
    }

    fn record_file(&self, path: &str, size: u64) {
        self.bytes.fetch_add(size, Ordering::Relaxed);
        let count = self.files.fetch_add(1, Ordering::Relaxed) + 1;
        if count % PROGRESS_INTERVAL == 0 {
            self.send_progress(path, false);
        }
    }

    fn push_warning(&self, warning: BuildWarning) {
        self.warnings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(warning);
    }

    fn send_progress(&self, path: &str, finished: bool) {
        let warnings_count = self
            .warnings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len() as u64;
        // No subscribers is fine.
        let _ = self.progress_tx.send(BuildProgress {
            files_seen: self.files.load(Ordering::Relaxed),
            dirs_seen: self.dirs.load(Ordering::Relaxed),
            bytes_seen: self.bytes.load(Ordering::Relaxed),
            current_path: path.to_string(),
            warnings_count,
            elapsed: self.start.elapsed(),
            finished,
        });
    }

    fn into_warnings(self) -> Vec<BuildWarning> {
        self.warnings
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
