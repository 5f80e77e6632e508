//! End-to-end scenarios: open, compile, query, edit, query again.

use std::sync::Arc;

use quarry::syntax::NodeKind;
use quarry::{DeclarationFilter, DeclarationScope, find_declarations};
use rstest::rstest;

use crate::helpers::fixtures::*;
use crate::helpers::mock_toolchain::CountingToolchain;

fn class_names(handle: &quarry::ProjectHandle) -> Vec<String> {
    handle
        .classes()
        .unwrap()
        .iter()
        .map(|d| d.qualified_name.to_string())
        .collect()
}

// =============================================================================
// RENAME ACROSS A REFERENCE
// =============================================================================

#[test]
fn test_rename_in_referenced_project_is_visible() {
    let ws = app_lib_workspace(Arc::new(CountingToolchain::new()));
    let app = ws.open_project(&app_lib_solution(), "App").unwrap();
    assert_eq!(
        class_names(&app),
        vec!["Lib.Widget", "App.Program", "App.Options"]
    );

    ws.store().put_document("lib/Widget.cs", LIB_GADGET);

    let names = class_names(&app);
    assert_eq!(names, vec!["Lib.Gadget", "App.Program", "App.Options"]);
    assert!(!names.iter().any(|n| n.contains("Widget")));
}

#[test]
fn test_query_taken_before_edit_keeps_its_snapshot() {
    let toolchain = Arc::new(CountingToolchain::new());
    let ws = app_lib_workspace(toolchain.clone());
    let app = ws.open_project(&app_lib_solution(), "App").unwrap();

    let before = app.classes().unwrap();
    let calls = toolchain.calls();
    ws.store().put_document("lib/Widget.cs", LIB_GADGET);

    // Walking an existing query never goes back to the toolchain.
    for _ in 0..3 {
        let first = before.iter().next().unwrap();
        assert_eq!(first.qualified_name, "Lib.Widget");
    }
    assert_eq!(before.iter().count(), 3);
    assert_eq!(toolchain.calls(), calls);

    let after = app.classes().unwrap();
    assert_eq!(after.iter().next().unwrap().qualified_name, "Lib.Gadget");
    assert!(toolchain.calls() > calls);
}

// =============================================================================
// DETERMINISTIC ORDER
// =============================================================================

#[test]
fn test_declaration_order_is_stable() {
    let ws = app_lib_workspace(Arc::new(CountingToolchain::new()));
    let app = ws.open_project(&app_lib_solution(), "App").unwrap();
    let snapshot = app.compilation().unwrap();

    let found = find_declarations(&snapshot, DeclarationFilter::all(), DeclarationScope::Transitive);
    let first: Vec<_> = found.iter().collect();
    for _ in 0..5 {
        assert_eq!(found.iter().collect::<Vec<_>>(), first);
    }

    let names: Vec<_> = first.iter().map(|d| d.qualified_name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Lib",
            "Lib.Widget",
            "Lib.Widget.Render",
            "App",
            "App.Program",
            "App.Program.Main",
            "App.Options",
        ]
    );
    // Source positions increase within each document.
    assert!(first[..3].windows(2).all(|w| w[0].range.start() <= w[1].range.start()));
}

#[test]
fn test_documents_follow_project_order() {
    let ws = quarry::Workspace::new(
        Arc::new(CountingToolchain::new()),
        quarry::WorkspaceConfig::default(),
    );
    ws.store().put_document("z.cs", "class Zed {}");
    ws.store().put_document("a.cs", "class Ay {}");
    let solution = quarry::SolutionDescriptor::new().with_project(
        quarry::ProjectDescriptor::new("P").with_documents(["z.cs", "a.cs"]),
    );
    let handle = ws.open_project(&solution, "P").unwrap();
    assert_eq!(class_names(&handle), vec!["Zed", "Ay"]);
}

// =============================================================================
// FILTERS
// =============================================================================

#[rstest]
#[case::class_like(DeclarationFilter::class_like(), &["App.Program", "App.Options"])]
#[case::functions(DeclarationFilter::kind(NodeKind::Function), &["App.Program.Main"])]
#[case::structs(DeclarationFilter::kind(NodeKind::Struct), &["App.Options"])]
#[case::named(DeclarationFilter::named("Program"), &["App.Program"])]
#[case::top_level(
    DeclarationFilter::top_level().and(DeclarationFilter::kind(NodeKind::Namespace).or(DeclarationFilter::class_like())),
    &["App", "App.Program", "App.Options"]
)]
fn test_project_scope_filters(#[case] filter: DeclarationFilter, #[case] expected: &[&str]) {
    let ws = app_lib_workspace(Arc::new(CountingToolchain::new()));
    let app = ws.open_project(&app_lib_solution(), "App").unwrap();
    let names: Vec<_> = app
        .declarations(filter)
        .unwrap()
        .iter()
        .map(|d| d.qualified_name.to_string())
        .collect();
    assert_eq!(names, expected);
}

#[test]
fn test_declaration_carries_location() {
    let ws = app_lib_workspace(Arc::new(CountingToolchain::new()));
    let lib = ws.open_project(&app_lib_solution(), "Lib").unwrap();
    let widget = lib
        .declarations(DeclarationFilter::named("Widget"))
        .unwrap()
        .iter()
        .next()
        .unwrap();

    assert_eq!(widget.project, "Lib");
    assert_eq!(&*widget.path, std::path::Path::new("lib/Widget.cs"));
    assert_eq!(widget.kind, NodeKind::Class);
    assert_eq!(widget.depth, 1);
    assert_eq!(widget.span.start.line, 1);
    assert_eq!(widget.span.end.line, 3);
}
