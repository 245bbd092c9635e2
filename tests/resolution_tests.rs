//! End-to-end resolution tests
//!
//! Loads compilation units from fixtures and checks the generated contexts.

use std::collections::HashSet;

use triple_gen::alias::is_identifier;
use triple_gen::{
    CompilationUnit, DescriptorIndex, DiagnosticCode, GeneratorConfig, Generator, MethodKind,
    ResolvedType, TypeResolver,
};

fn fixture(json: &str) -> CompilationUnit {
    serde_json::from_str(json).unwrap()
}

fn generator() -> Generator {
    Generator::new(&GeneratorConfig::default()).unwrap()
}

// =============================================================================
// Shop fixture
// =============================================================================

#[test]
fn test_shop_generates_only_files_with_services() {
    let unit = fixture(include_str!("fixtures/shop_unit.json"));
    let report = generator().run(&unit);

    assert!(report.is_ok());
    assert_eq!(report.files.len(), 1);
    assert_eq!(report.files[0].name, "shop/orders.triple.go");
}

#[test]
fn test_shop_import_order_and_aliases() {
    let unit = fixture(include_str!("fixtures/shop_unit.json"));
    let report = generator().run(&unit);
    let ctx = &report.file("shop/orders.proto").unwrap().context;

    let imports: Vec<(&str, &str)> = ctx
        .imports
        .iter()
        .map(|i| (i.path.as_str(), i.alias.as_str()))
        .collect();
    assert_eq!(
        imports,
        vec![
            ("github.com/x/common", "common"),
            ("c/d/v1", "v1"),
            ("a/b/v1", "v1_1"),
        ]
    );
}

#[test]
fn test_shop_rendered_types() {
    let unit = fixture(include_str!("fixtures/shop_unit.json"));
    let report = generator().run(&unit);
    let ctx = &report.file("shop/orders.proto").unwrap().context;

    let orders = &ctx.services[0];
    assert_eq!(orders.methods[0].request_type(), "CreateReq");
    assert_eq!(orders.methods[0].response_type(), "common.Status");
    assert_eq!(orders.methods[1].request_type(), "v1.Filter");
    assert_eq!(orders.methods[1].response_type(), "v1_1.Event");
    assert_eq!(orders.methods[1].kind, MethodKind::ServerStream);

    let ledger = &ctx.services[1];
    assert_eq!(ledger.methods[0].request_type(), "v1_1.Event");
    assert_eq!(ledger.methods[0].kind, MethodKind::ClientStream);
    assert_eq!(ledger.methods[1].request_type(), "Entry");
    assert_eq!(ledger.methods[1].kind, MethodKind::BidiStream);
    assert_eq!(ledger.methods[1].procedure, "/shop.orders.Ledger/Sync");

    assert!(ctx.is_stream);
    assert_eq!(ctx.package_name, "orders");
    assert!(ctx.diagnostics.is_empty());
}

#[test]
fn test_every_import_is_listed_once_with_distinct_alias() {
    let unit = fixture(include_str!("fixtures/shop_unit.json"));
    let report = generator().run(&unit);
    let ctx = &report.file("shop/orders.proto").unwrap().context;

    let paths: HashSet<&str> = ctx.import_paths().collect();
    assert_eq!(paths.len(), ctx.imports.len());

    let aliases: HashSet<&str> = ctx.imports.iter().map(|i| i.alias.as_str()).collect();
    assert_eq!(aliases.len(), ctx.imports.len());
    assert!(aliases.iter().all(|a| is_identifier(a)));

    for method in ctx.services.iter().flat_map(|s| &s.methods) {
        for ty in [&method.request, &method.response] {
            if let Some(path) = ty.resolved.module_path() {
                let alias = ctx.alias_for(path).unwrap();
                assert_eq!(ty.rendered, format!("{}.{}", alias, ty.resolved.name()));
            }
        }
    }
}

#[test]
fn test_rerun_is_byte_identical() {
    let unit = fixture(include_str!("fixtures/shop_unit.json"));
    let first = serde_json::to_string(&generator().run(&unit)).unwrap();
    let second = serde_json::to_string(&generator().run(&unit)).unwrap();
    assert_eq!(first, second);
}

// =============================================================================
// Shared package fixture
// =============================================================================

#[test]
fn test_shared_package_index_keeps_last_file() {
    let unit = fixture(include_str!("fixtures/shared_package.json"));
    let index = DescriptorIndex::from_unit(&unit);
    assert_eq!(
        index.package("shop.money").map(|f| f.path.as_str()),
        Some("money/currency.proto")
    );
}

#[test]
fn test_shared_package_earlier_file_degrades_to_local() {
    let unit = fixture(include_str!("fixtures/shared_package.json"));
    let report = generator().run(&unit);
    let ctx = &report.file("pay/charge.proto").unwrap().context;

    assert_eq!(ctx.services[0].methods[0].request_type(), "Amount");
    assert!(ctx.imports.is_empty());

    let diag = &ctx.diagnostics.all()[0];
    assert_eq!(diag.code, DiagnosticCode::UnresolvedType);
    assert!(diag.notes[0].contains("money/currency.proto"));
}

#[test]
fn test_shared_package_last_file_imports() {
    let unit = fixture(include_str!("fixtures/shared_package.json"));
    let report = generator().run(&unit);
    let ctx = &report.file("pay/refund.proto").unwrap().context;

    assert_eq!(ctx.services[0].methods[0].request_type(), "currency.Currency");
    assert_eq!(ctx.alias_for("github.com/x/money/currency"), Some("currency"));
}

// =============================================================================
// Nested package fixture
// =============================================================================

#[test]
fn test_longest_package_prefix_wins() {
    let unit = fixture(include_str!("fixtures/nested_packages.json"));
    let index = DescriptorIndex::from_unit(&unit);
    let resolver = TypeResolver::new(&index);
    let client = unit.file("client.proto").unwrap();

    assert_eq!(
        resolver.resolve_type(".a.b.c.Msg", client),
        ResolvedType::imported("example.com/a/b/c", "Msg")
    );
    assert_eq!(
        resolver.resolve_type(".a.b.Msg", client),
        ResolvedType::imported("example.com/a/b", "Msg")
    );
}

#[test]
fn test_nested_fixture_contexts() {
    let unit = fixture(include_str!("fixtures/nested_packages.json"));
    let report = generator().run(&unit);
    let ctx = &report.file("client.proto").unwrap().context;

    let probe = &ctx.services[0];
    assert_eq!(probe.methods[0].request_type(), "c.Msg");
    assert_eq!(probe.methods[0].response_type(), "b.Msg");
    assert_eq!(probe.methods[1].request_type(), "Gone");
    assert_eq!(probe.methods[1].response_type(), "Local");

    assert_eq!(ctx.imports.len(), 2);
    assert_eq!(ctx.diagnostics.warning_count(), 1);
    assert!(!ctx.is_stream);
}
