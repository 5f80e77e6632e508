//! Snapshot reuse, invalidation and diagnostics.

use std::path::Path;
use std::sync::Arc;

use quarry::toolchain::codes;
use quarry::{Severity, WorkspaceError};

use crate::helpers::fixtures::*;
use crate::helpers::mock_toolchain::{CountingToolchain, PANIC};

// =============================================================================
// IDEMPOTENCE
// =============================================================================

#[test]
fn test_repeated_compilation_returns_same_snapshot() {
    let toolchain = Arc::new(CountingToolchain::new());
    let ws = app_lib_workspace(Arc::clone(&toolchain));
    let app = ws.open_project(&app_lib_solution(), "App").unwrap();

    let first = app.compilation().unwrap();
    let calls = toolchain.calls();
    let second = app.compilation().unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.digest(), second.digest());
    assert_eq!(toolchain.calls(), calls);
    assert_eq!(toolchain.parses(), 2);
    assert_eq!(toolchain.binds(), 2);
}

#[test]
fn test_handles_share_the_workspace_cache() {
    let toolchain = Arc::new(CountingToolchain::new());
    let ws = app_lib_workspace(Arc::clone(&toolchain));
    let solution = app_lib_solution();

    let lib = ws.open_project(&solution, "lib").unwrap().compilation().unwrap();
    let app = ws.open_project(&solution, "APP").unwrap().compilation().unwrap();

    assert!(Arc::ptr_eq(&lib, &app.references()[0]));
    assert_eq!(toolchain.parses(), 2);
}

// =============================================================================
// INVALIDATION
// =============================================================================

#[test]
fn test_edit_changes_digest() {
    let toolchain = Arc::new(CountingToolchain::new());
    let ws = app_lib_workspace(Arc::clone(&toolchain));
    let app = ws.open_project(&app_lib_solution(), "App").unwrap();

    let before = app.compilation().unwrap();
    ws.store().put_document("app/Program.cs", APP_MAIN);
    let after = app.compilation().unwrap();

    assert_ne!(before.digest(), after.digest());
    assert!(!before.is_current(ws.store()));
    assert!(after.is_current(ws.store()));
}

#[test]
fn test_edit_rebuilds_only_affected_projects() {
    let toolchain = Arc::new(CountingToolchain::new());
    let ws = app_lib_workspace(Arc::clone(&toolchain));
    let app = ws.open_project(&app_lib_solution(), "App").unwrap();
    let before = app.compilation().unwrap();

    // App is not referenced by Lib, so Lib's snapshot survives.
    ws.store().put_document("app/Program.cs", "class Program {}");
    let after = app.compilation().unwrap();

    assert!(Arc::ptr_eq(&before.references()[0], &after.references()[0]));
    assert_eq!(toolchain.parses(), 3);

    // An edit in Lib invalidates both.
    ws.store().put_document("lib/Widget.cs", LIB_GADGET);
    let rebuilt = app.compilation().unwrap();
    assert!(!Arc::ptr_eq(&after.references()[0], &rebuilt.references()[0]));
    assert_ne!(after.digest(), rebuilt.digest());
    assert_eq!(toolchain.parses(), 5);
}

#[test]
fn test_evicted_document_fails_compilation() {
    let ws = app_lib_workspace(Arc::new(CountingToolchain::new()));
    let app = ws.open_project(&app_lib_solution(), "App").unwrap();
    ws.store().evict(Path::new("lib/Widget.cs"));

    let err = app.compilation().unwrap_err();
    assert!(err.to_string().contains("lib/Widget.cs"), "{err}");
}

// =============================================================================
// DIAGNOSTICS
// =============================================================================

#[test]
fn test_warnings_are_attached_not_fatal() {
    let ws = app_lib_workspace(Arc::new(CountingToolchain::new()));
    // Redeclares Lib.Widget inside App.
    ws.store()
        .put_document("app/Program.cs", "namespace Lib {\n    class Widget {}\n}\n");
    let app = ws.open_project(&app_lib_solution(), "App").unwrap();

    let snapshot = app.compilation().unwrap();
    let warnings = snapshot.diagnostics();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].severity, Severity::Warning);
    assert_eq!(warnings[0].code.as_deref(), Some(codes::SHADOWED_SYMBOL));
}

#[test]
fn test_errors_fail_with_every_diagnostic() {
    let ws = app_lib_workspace(Arc::new(CountingToolchain::new()));
    ws.store().put_document(
        "lib/Widget.cs",
        "class Widget {}\nclass Widget {}\nclass {}\n\"unterminated\n",
    );
    let app = ws.open_project(&app_lib_solution(), "App").unwrap();

    let err = app.compilation().unwrap_err();
    let WorkspaceError::Compilation { project, diagnostics } = &err else {
        panic!("unexpected error: {err}");
    };
    assert_eq!(project, "Lib");
    let errors = diagnostics.iter().filter(|d| d.is_error()).count();
    assert_eq!(errors, 2);
    assert!(diagnostics.iter().any(|d| d.severity == Severity::Warning));

    // Every diagnostic is rendered, one per line.
    let message = err.to_string();
    assert_eq!(message.lines().count(), 1 + diagnostics.len());
    assert!(message.contains("already defined"));
}

#[test]
fn test_failed_build_is_retried_after_fix() {
    let ws = app_lib_workspace(Arc::new(CountingToolchain::new()));
    let lib = ws.open_project(&app_lib_solution(), "Lib").unwrap();
    ws.store().put_document("lib/Widget.cs", "class Widget {");
    assert!(lib.compilation().is_err());
    assert!(ws.cache().live_snapshot("Lib").is_none());

    ws.store().put_document("lib/Widget.cs", LIB_WIDGET);
    assert!(lib.compilation().is_ok());
    assert_eq!(ws.cache().stats().failures, 1);
}

#[test]
fn test_toolchain_panic_becomes_compilation_error() {
    let ws = app_lib_workspace(Arc::new(CountingToolchain::new()));
    ws.store()
        .put_document("lib/Widget.cs", format!("class Widget {{}} {PANIC}"));
    let lib = ws.open_project(&app_lib_solution(), "Lib").unwrap();

    let err = lib.compilation().unwrap_err();
    assert!(matches!(err, WorkspaceError::Compilation { .. }));
    assert_eq!(err.diagnostics().len(), 1);
    assert!(err.to_string().contains("toolchain panicked"));
}
