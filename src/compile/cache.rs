use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use parking_lot::{Condvar, Mutex};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use super::config::CacheConfig;
use super::snapshot::{CompilationSnapshot, ParsedDocument};
use crate::base::{Digest, DigestBuilder, LineIndex};
use crate::error::{Result, WorkspaceError};
use crate::project::{ProjectGraph, ProjectSet, project_key};
use crate::source::{Document, SourceDocumentStore};
use crate::toolchain::{BindUnit, Diagnostic, SymbolTable, ToolchainAdapter};

type BuildResult = Result<Arc<CompilationSnapshot>>;
type BuildKey = (String, Digest);

/// A build in flight. Every caller asking for the same `(project, digest)`
/// waits here for the one result.
#[derive(Default)]
struct BuildSlot {
    result: Mutex<Option<BuildResult>>,
    ready: Condvar,
}

impl BuildSlot {
    fn complete(&self, result: BuildResult) {
        *self.result.lock() = Some(result);
        self.ready.notify_all();
    }

    /// Waits for the result until `deadline`. `None` means the deadline passed.
    fn wait(&self, deadline: Instant) -> Option<BuildResult> {
        let mut result = self.result.lock();
        while result.is_none() {
            if self.ready.wait_until(&mut result, deadline).timed_out() {
                break;
            }
        }
        result.clone()
    }
}

#[derive(Default)]
struct CacheState {
    /// The one live snapshot per project key.
    live: FxHashMap<String, Arc<CompilationSnapshot>>,
    in_flight: FxHashMap<BuildKey, Arc<BuildSlot>>,
}

#[derive(Default)]
struct Counters {
    hits: AtomicU64,
    builds: AtomicU64,
    joins: AtomicU64,
    failures: AtomicU64,
    timeouts: AtomicU64,
}

/// Counters describing cache activity since creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Requests answered by a live snapshot.
    pub hits: u64,
    /// Builds started.
    pub builds: u64,
    /// Requests that attached to a build already in flight.
    pub joins: u64,
    /// Builds that ended in an error.
    pub failures: u64,
    /// Requests that gave up waiting.
    pub timeouts: u64,
}

/// Everything a build needs, owned, so it can run off the caller's thread.
struct BuildJob {
    project: SmolStr,
    key: String,
    digest: Digest,
    sequence: u64,
    documents: Vec<Document>,
    references: Vec<Arc<CompilationSnapshot>>,
    parallel: bool,
}

/// Derives and caches [`CompilationSnapshot`]s.
///
/// A snapshot is keyed by the project and the digest of every
/// `(path, version)` pair in its reference closure. Asking again with no
/// intervening edit returns the same snapshot; any edit in the closure
/// changes the digest and triggers a rebuild.
///
/// Builds run on a rayon pool owned by the cache, never on the caller's
/// pool, so callers may block in `get_compilation` from inside their own
/// rayon work. The table lock is only held to look up or register a build,
/// never while one runs, so builds of different projects or digests proceed
/// independently.
pub struct CompilationCache {
    toolchain: Arc<dyn ToolchainAdapter>,
    config: CacheConfig,
    /// `None` if the pool could not be started; builds then run inline.
    pool: Option<rayon::ThreadPool>,
    state: Arc<Mutex<CacheState>>,
    counters: Arc<Counters>,
    next_sequence: AtomicU64,
}

impl CompilationCache {
    pub fn new(toolchain: Arc<dyn ToolchainAdapter>, config: CacheConfig) -> Self {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.build_threads)
            .thread_name(|i| format!("quarry-build-{i}"))
            .build()
            .map_err(|e| {
                tracing::warn!(error = %e, "build pool unavailable, building on callers' threads");
            })
            .ok();
        Self {
            toolchain,
            config,
            pool,
            state: Arc::new(Mutex::new(CacheState::default())),
            counters: Arc::new(Counters::default()),
            next_sequence: AtomicU64::new(1),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn toolchain(&self) -> &dyn ToolchainAdapter {
        &*self.toolchain
    }

    /// Returns the compilation of `name`, building it (and any referenced
    /// project whose snapshot is stale) if needed.
    ///
    /// Reference cycles and missing documents fail before the toolchain is
    /// called. Error diagnostics fail with `Compilation`; a build that does
    /// not finish within `build_timeout` fails with `BuildTimeout`.
    pub fn get_compilation(
        &self,
        projects: &ProjectSet,
        store: &SourceDocumentStore,
        name: &str,
    ) -> Result<Arc<CompilationSnapshot>> {
        let order = projects.compilation_order(name)?;

        // One read of the store for the whole closure.
        let paths = order
            .iter()
            .flat_map(|p| p.document_paths().iter().map(PathBuf::as_path));
        let mut captured = store.capture(paths)?.into_iter();

        let mut built: FxHashMap<&str, Arc<CompilationSnapshot>> = FxHashMap::default();
        let mut last = None;
        for project in &order {
            let documents: Vec<Document> =
                captured.by_ref().take(project.document_paths().len()).collect();
            let references = project
                .references()
                .map(|reference| {
                    built
                        .get(reference)
                        .cloned()
                        .ok_or_else(|| WorkspaceError::project_not_found(reference))
                })
                .collect::<Result<Vec<_>>>()?;

            let digest = project_digest(project, &documents, &references);
            let snapshot = self.ensure(project, digest, documents, references)?;
            built.insert(project.name(), Arc::clone(&snapshot));
            last = Some(snapshot);
        }

        last.ok_or_else(|| WorkspaceError::project_not_found(name))
    }

    /// The live snapshot of a project, if one was built. May be stale.
    pub fn live_snapshot(&self, name: &str) -> Option<Arc<CompilationSnapshot>> {
        self.state.lock().live.get(&project_key(name)).cloned()
    }

    /// Drops the live snapshot of a project. Builds in flight are unaffected.
    pub fn invalidate(&self, name: &str) -> bool {
        self.state.lock().live.remove(&project_key(name)).is_some()
    }

    pub fn clear(&self) {
        self.state.lock().live.clear();
    }

    pub fn stats(&self) -> CacheStats {
        let c = &self.counters;
        CacheStats {
            hits: c.hits.load(Ordering::Relaxed),
            builds: c.builds.load(Ordering::Relaxed),
            joins: c.joins.load(Ordering::Relaxed),
            failures: c.failures.load(Ordering::Relaxed),
            timeouts: c.timeouts.load(Ordering::Relaxed),
        }
    }

    fn ensure(
        &self,
        project: &ProjectGraph,
        digest: Digest,
        documents: Vec<Document>,
        references: Vec<Arc<CompilationSnapshot>>,
    ) -> BuildResult {
        let key = project_key(project.name());
        let deadline = Instant::now() + self.config.build_timeout;

        let (slot, job) = {
            let mut state = self.state.lock();
            if let Some(live) = state.live.get(&key) {
                if live.digest() == digest {
                    self.counters.hits.fetch_add(1, Ordering::Relaxed);
                    tracing::trace!(project = project.name(), %digest, "compilation cache hit");
                    return Ok(Arc::clone(live));
                }
            }

            let build_key = (key.clone(), digest);
            match state.in_flight.get(&build_key) {
                Some(slot) => {
                    self.counters.joins.fetch_add(1, Ordering::Relaxed);
                    tracing::debug!(project = project.name(), %digest, "joining build in flight");
                    (Arc::clone(slot), None)
                }
                None => {
                    let slot = Arc::new(BuildSlot::default());
                    state.in_flight.insert(build_key, Arc::clone(&slot));
                    self.counters.builds.fetch_add(1, Ordering::Relaxed);
                    let job = BuildJob {
                        project: project.name().into(),
                        key,
                        digest,
                        sequence: self.next_sequence.fetch_add(1, Ordering::Relaxed),
                        documents,
                        references,
                        parallel: self.config.parallel_parse,
                    };
                    (slot, Some(job))
                }
            }
        };

        if let Some(job) = job {
            let run = build_task(
                Arc::clone(&self.toolchain),
                Arc::clone(&self.state),
                Arc::clone(&self.counters),
                job,
                Arc::clone(&slot),
            );
            match &self.pool {
                Some(pool) => pool.spawn(run),
                None => run(),
            }
        }

        slot.wait(deadline).unwrap_or_else(|| {
            self.counters.timeouts.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(
                project = project.name(),
                timeout = ?self.config.build_timeout,
                "gave up waiting for build"
            );
            Err(WorkspaceError::BuildTimeout {
                project: project.name().to_string(),
                timeout: self.config.build_timeout,
            })
        })
    }
}

/// The build of `job`, publishing into the live table and `slot`.
fn build_task(
    toolchain: Arc<dyn ToolchainAdapter>,
    state: Arc<Mutex<CacheState>>,
    counters: Arc<Counters>,
    job: BuildJob,
    slot: Arc<BuildSlot>,
) -> impl FnOnce() + Send + 'static {
    move || {
        let started = Instant::now();
        let result = catch_unwind(AssertUnwindSafe(|| build_snapshot(&*toolchain, &job)))
            .unwrap_or_else(|payload| Err(panic_error(&job.project, payload)))
            .map(Arc::new);

        match &result {
            Ok(_) => tracing::debug!(
                project = %job.project,
                digest = %job.digest,
                elapsed = ?started.elapsed(),
                "compilation built"
            ),
            Err(e) => {
                counters.failures.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(project = %job.project, error = %e, "compilation failed");
            }
        }

        {
            let mut state = state.lock();
            state.in_flight.remove(&(job.key.clone(), job.digest));
            if let Ok(snapshot) = &result {
                // A slow build of an older digest must not replace a newer one.
                let newer = state
                    .live
                    .get(&job.key)
                    .is_none_or(|live| live.sequence() < snapshot.sequence());
                if newer {
                    state.live.insert(job.key.clone(), Arc::clone(snapshot));
                }
            }
        }
        slot.complete(result);
    }
}

/// Digest of a project: its name, its own `(path, version)` pairs, and the
/// digests of its references, which in turn cover their own closures.
fn project_digest(
    project: &ProjectGraph,
    documents: &[Document],
    references: &[Arc<CompilationSnapshot>],
) -> Digest {
    let mut builder = DigestBuilder::new();
    builder.str(project.name()).u64(documents.len() as u64);
    for document in documents {
        builder.document(document.path(), document.version());
    }
    builder.u64(references.len() as u64);
    for reference in references {
        builder.digest(reference.digest());
    }
    builder.finish()
}

fn build_snapshot(toolchain: &dyn ToolchainAdapter, job: &BuildJob) -> Result<CompilationSnapshot> {
    tracing::debug!(
        project = %job.project,
        toolchain = toolchain.name(),
        documents = job.documents.len(),
        "building compilation"
    );

    let parse_one = |document: &Document| {
        tracing::trace!(path = %document.path().display(), "parsing");
        let output = toolchain.parse(document.path(), document.text());
        let path = document.path_arc();
        let diagnostics: Vec<Diagnostic> = output
            .diagnostics
            .into_iter()
            .map(|d| match d.path {
                Some(_) => d,
                None => d.with_path(Arc::clone(&path)),
            })
            .collect();
        let parsed = ParsedDocument {
            path,
            version: document.version(),
            tree: output.tree,
            line_index: LineIndex::new(document.text()),
        };
        (parsed, diagnostics)
    };

    let parsed: Vec<(ParsedDocument, Vec<Diagnostic>)> = if job.parallel {
        job.documents.par_iter().map(parse_one).collect()
    } else {
        job.documents.iter().map(parse_one).collect()
    };

    let mut diagnostics = Vec::new();
    let mut documents = Vec::with_capacity(parsed.len());
    for (document, parse_diagnostics) in parsed {
        diagnostics.extend(parse_diagnostics);
        documents.push(document);
    }

    let units: Vec<BindUnit<'_>> = documents
        .iter()
        .map(|d| BindUnit {
            path: d.path(),
            tree: d.tree(),
            line_index: d.line_index(),
        })
        .collect();
    let reference_tables: Vec<&SymbolTable> =
        job.references.iter().map(|r| r.symbols()).collect();
    let bound = toolchain.bind(&job.project, &units, &reference_tables);
    drop(units);
    diagnostics.extend(bound.diagnostics);

    if diagnostics.iter().any(Diagnostic::is_error) {
        return Err(WorkspaceError::Compilation {
            project: job.project.to_string(),
            diagnostics,
        });
    }

    Ok(CompilationSnapshot {
        project: job.project.clone(),
        digest: job.digest,
        sequence: job.sequence,
        documents,
        symbols: bound.symbols,
        diagnostics,
        references: job.references.clone(),
    })
}

fn panic_error(project: &str, payload: Box<dyn Any + Send>) -> WorkspaceError {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    WorkspaceError::Compilation {
        project: project.to_string(),
        diagnostics: vec![Diagnostic::error(format!("toolchain panicked: {detail}"))],
    }
}
