//! Concurrent requests, deadlines and out-of-order build completion.

use std::sync::{Arc, Barrier};
use std::time::Duration;

use quarry::{
    CacheConfig, CompilationCache, ProjectSet, SourceDocumentStore, ToolchainAdapter,
    WorkspaceError,
};
use rstest::rstest;

use crate::helpers::fixtures::*;
use crate::helpers::mock_toolchain::{CountingToolchain, HOLD};

fn lib_cache(
    toolchain: &Arc<CountingToolchain>,
    timeout: Duration,
) -> (ProjectSet, SourceDocumentStore, CompilationCache) {
    let projects = ProjectSet::from_descriptor(&app_lib_solution()).unwrap();
    let store = SourceDocumentStore::new();
    store.put_document("lib/Widget.cs", LIB_WIDGET);
    store.put_document("app/Program.cs", APP_MAIN);
    let adapter: Arc<dyn ToolchainAdapter> = toolchain.clone();
    let cache = CompilationCache::new(
        adapter,
        CacheConfig::default().with_build_timeout(timeout),
    );
    (projects, store, cache)
}

// =============================================================================
// SINGLE BUILD
// =============================================================================

#[rstest]
#[case(2)]
#[case(8)]
fn test_concurrent_requests_share_one_build(#[case] callers: usize) {
    let toolchain = Arc::new(CountingToolchain::with_delay(Duration::from_millis(50)));
    let (projects, store, cache) = lib_cache(&toolchain, Duration::from_secs(10));
    let barrier = Barrier::new(callers);

    let snapshots: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..callers)
            .map(|_| {
                scope.spawn(|| {
                    barrier.wait();
                    cache.get_compilation(&projects, &store, "App").unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(snapshots.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    assert_eq!(toolchain.parses(), 2);
    assert_eq!(toolchain.binds(), 2);
    assert_eq!(cache.stats().builds, 2);
}

#[test]
fn test_distinct_projects_build_independently() {
    let toolchain = Arc::new(CountingToolchain::new());
    let (projects, store, cache) = lib_cache(&toolchain, Duration::from_secs(10));

    std::thread::scope(|scope| {
        scope.spawn(|| cache.get_compilation(&projects, &store, "Lib").unwrap());
        scope.spawn(|| cache.get_compilation(&projects, &store, "App").unwrap());
    });

    // Lib is built once even though both callers need it.
    assert_eq!(toolchain.parses(), 2);
    assert!(cache.live_snapshot("Lib").is_some());
    assert!(cache.live_snapshot("App").is_some());
}

#[test]
fn test_compiles_from_inside_a_saturated_rayon_pool() {
    let toolchain = Arc::new(CountingToolchain::new());
    let (projects, store, cache) = lib_cache(&toolchain, Duration::from_secs(2));
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(1)
        .build()
        .unwrap();

    let snapshot = pool.install(|| cache.get_compilation(&projects, &store, "App"));
    let snapshot = snapshot.unwrap();
    assert_eq!(snapshot.project(), "App");
    assert_eq!(cache.stats().timeouts, 0);
}

#[test]
fn test_parallel_callers_on_caller_pool_share_builds() {
    use rayon::prelude::*;

    let toolchain = Arc::new(CountingToolchain::with_delay(Duration::from_millis(20)));
    let (projects, store, cache) = lib_cache(&toolchain, Duration::from_secs(10));
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(2)
        .build()
        .unwrap();

    let snapshots: Vec<_> = pool.install(|| {
        (0..8)
            .into_par_iter()
            .map(|_| cache.get_compilation(&projects, &store, "App").unwrap())
            .collect()
    });

    assert!(snapshots.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    assert_eq!(toolchain.parses(), 2);
}

// =============================================================================
// TIMEOUTS
// =============================================================================

#[test]
fn test_timeout_keeps_build_registered() {
    let toolchain = Arc::new(CountingToolchain::new());
    let (projects, store, cache) = lib_cache(&toolchain, Duration::from_millis(50));
    store.put_document("lib/Widget.cs", format!("{LIB_WIDGET}{HOLD}"));

    let err = cache.get_compilation(&projects, &store, "Lib").unwrap_err();
    match &err {
        WorkspaceError::BuildTimeout { project, timeout } => {
            assert_eq!(project, "Lib");
            assert_eq!(*timeout, Duration::from_millis(50));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(cache.stats().timeouts, 1);

    toolchain.open_gate();
    toolchain.wait_for_finished_parses(1, Duration::from_secs(10));

    // The held build finishes and is reused; nothing is built twice.
    let mut snapshot = cache.get_compilation(&projects, &store, "Lib");
    for _ in 0..100 {
        if snapshot.is_ok() {
            break;
        }
        std::thread::sleep(Duration::from_millis(10));
        snapshot = cache.get_compilation(&projects, &store, "Lib");
    }
    assert!(snapshot.is_ok());
    assert_eq!(toolchain.parses(), 1);
    assert_eq!(cache.stats().builds, 1);
}

// =============================================================================
// STALE BUILDS
// =============================================================================

#[test]
fn test_stale_build_never_replaces_newer_snapshot() {
    let toolchain = Arc::new(CountingToolchain::new());
    let (projects, store, cache) = lib_cache(&toolchain, Duration::from_millis(50));

    // The first build is held past its caller's deadline.
    store.put_document("lib/Widget.cs", format!("{LIB_WIDGET}{HOLD}"));
    assert!(matches!(
        cache.get_compilation(&projects, &store, "Lib"),
        Err(WorkspaceError::BuildTimeout { .. })
    ));

    // The edit starts a second build; release the first one too.
    store.put_document("lib/Widget.cs", LIB_GADGET);
    toolchain.open_gate();
    let mut newer = cache.get_compilation(&projects, &store, "Lib");
    for _ in 0..100 {
        if newer.is_ok() {
            break;
        }
        std::thread::sleep(Duration::from_millis(10));
        newer = cache.get_compilation(&projects, &store, "Lib");
    }
    let newer = newer.unwrap();
    toolchain.wait_for_finished_parses(2, Duration::from_secs(10));

    // Whichever finished last, the live snapshot is the newer one.
    let live = cache.live_snapshot("Lib").unwrap();
    assert!(Arc::ptr_eq(&live, &newer));
    assert!(live.symbols().contains("Lib.Gadget"));
    assert_eq!(cache.stats().builds, 2);
}
