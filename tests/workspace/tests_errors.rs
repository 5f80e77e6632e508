//! Failures surfaced by the facade.

use std::sync::Arc;

use quarry::{
    ProjectDescriptor, SolutionDescriptor, Workspace, WorkspaceConfig, WorkspaceError,
};
use rstest::rstest;

use crate::helpers::fixtures::*;
use crate::helpers::mock_toolchain::CountingToolchain;

// =============================================================================
// PROJECT NOT FOUND
// =============================================================================

#[test]
fn test_missing_project_is_named_in_error() {
    let ws = app_lib_workspace(Arc::new(CountingToolchain::new()));
    let err = ws.open_project(&app_lib_solution(), "Missing").unwrap_err();

    assert!(matches!(err, WorkspaceError::ProjectNotFound { ref name } if name == "Missing"));
    assert!(err.to_string().contains("Missing"));
    assert!(err.is_structural());
}

#[rstest]
#[case("app")]
#[case("APP")]
#[case("App")]
fn test_project_names_ignore_case(#[case] name: &str) {
    let ws = app_lib_workspace(Arc::new(CountingToolchain::new()));
    let handle = ws.open_project(&app_lib_solution(), name).unwrap();
    assert_eq!(handle.name(), "App");
}

// =============================================================================
// GRAPH ERRORS
// =============================================================================

#[test]
fn test_cycle_fails_before_any_toolchain_call() {
    let toolchain = Arc::new(CountingToolchain::new());
    let ws = Workspace::new(toolchain.clone(), WorkspaceConfig::default());
    ws.store().put_document("a.cs", "class A {}");
    ws.store().put_document("b.cs", "class B {}");

    let handle = ws.open_project(&cyclic_solution(), "A").unwrap();
    let err = handle.compilation().unwrap_err();

    match &err {
        WorkspaceError::CyclicReference { cycle } => {
            assert!(cycle.contains(&"A".to_string()));
            assert!(cycle.contains(&"B".to_string()));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("A -> B -> A"));
    assert_eq!(toolchain.calls(), 0);
    assert_eq!(ws.cache().stats().builds, 0);
}

#[test]
fn test_dangling_reference_rejected_on_open() {
    let ws = app_lib_workspace(Arc::new(CountingToolchain::new()));
    let solution = SolutionDescriptor::new()
        .with_project(ProjectDescriptor::new("App").with_reference("Nowhere"));

    let err = ws.open_project(&solution, "App").unwrap_err();
    assert!(matches!(err, WorkspaceError::DanglingReference { .. }));
    assert!(err.to_string().contains("Nowhere"));
}

#[test]
fn test_duplicate_project_rejected_on_open() {
    let ws = app_lib_workspace(Arc::new(CountingToolchain::new()));
    let solution = app_lib_solution().with_project(ProjectDescriptor::new("lib"));

    let err = ws.open_project(&solution, "App").unwrap_err();
    assert!(matches!(err, WorkspaceError::DuplicateProject { .. }));
}

// =============================================================================
// LOADING
// =============================================================================

#[test]
fn test_unreadable_documents_aggregate_into_one_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("ok.cs"), "class Ok {}").unwrap();

    let ws = Workspace::new(
        Arc::new(CountingToolchain::new()),
        WorkspaceConfig::default().with_load_from_disk(true),
    );
    let solution = SolutionDescriptor::new().with_project(
        ProjectDescriptor::new("P").with_documents([
            dir.path().join("ok.cs"),
            dir.path().join("gone.cs"),
            dir.path().join("lost.cs"),
        ]),
    );

    let err = ws.open_project(&solution, "P").unwrap_err();
    assert!(matches!(err, WorkspaceError::WorkspaceLoad { .. }));
    assert_eq!(err.diagnostics().len(), 2);
    let message = err.to_string();
    assert!(message.contains("gone.cs"));
    assert!(message.contains("lost.cs"));
    // Nothing is stored when any read fails.
    assert!(ws.store().is_empty());
}

#[test]
fn test_discovered_project_compiles() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("src")).unwrap();
    std::fs::write(dir.path().join("src/a.cs"), "class Alpha {}").unwrap();
    std::fs::write(dir.path().join("src/b.cs"), "class Beta {}").unwrap();

    let project = quarry::project::discover_project("Disk", dir.path(), &["cs"]).unwrap();
    let ws = Workspace::new(
        Arc::new(CountingToolchain::new()),
        WorkspaceConfig::default().with_load_from_disk(true),
    );
    let handle = ws
        .open_project(&SolutionDescriptor::new().with_project(project), "disk")
        .unwrap();

    let names: Vec<_> = handle.classes().unwrap().iter().map(|d| d.name).collect();
    assert_eq!(names, vec!["Alpha", "Beta"]);
}
