// Wed Jan 14 2026 - Alex

use struct_padding::orchestration::{BatchExecutor, BatchInput};
use struct_padding::output::JsonSerializer;
use struct_padding::structure::StructureValidator;
use struct_padding::{AbiTable, BatchReport, DeclarationDocument, FieldNode, LayoutEngine, LayoutIssue};
use std::fs;

fn process(abi: AbiTable, json: &str) -> BatchReport {
    let forest = DeclarationDocument::from_json(json).unwrap().into_forest().unwrap();
    LayoutEngine::new(abi).process("test.json", forest)
}

fn order(node: &FieldNode) -> Vec<&str> {
    node.children().iter().map(FieldNode::name).collect()
}

const PADDED: &str = r#"{ "structs": [
    { "name": "BadStruct", "fields": [
        { "name": "a", "type": "bool" },
        { "name": "b", "type": "int32" },
        { "name": "c", "type": "bool" },
        { "name": "d", "type": "int64" }
    ] }
] }"#;

#[test]
fn test_padded_struct_shrinks() {
    let report = process(AbiTable::amd64(), PADDED);
    let bad = report.get("BadStruct").unwrap();

    assert_eq!(bad.before_size(), 24);
    assert_eq!(bad.after_size(), 16);
    assert_eq!(bad.saved(), 8);
    assert!(bad.needs_fix());
    assert_eq!(order(bad.after()), vec!["d", "b", "a", "c"]);
    assert_eq!(order(bad.before()), vec!["a", "b", "c", "d"]);
    assert!(report.issues().is_empty());
}

#[test]
fn test_padded_struct_on_386() {
    let report = process(AbiTable::i386(), PADDED);
    let bad = report.get("BadStruct").unwrap();

    assert_eq!(bad.before_size(), 20);
    assert_eq!(bad.after_size(), 16);
    assert_eq!(bad.align().as_u64(), 4);
}

#[test]
fn test_sequence_goes_last() {
    let report = process(
        AbiTable::amd64(),
        r#"{ "structs": [ { "name": "S", "fields": [
            { "name": "items", "type": "[]Item" },
            { "name": "ok", "type": "bool" },
            { "name": "n", "type": "int64" }
        ] } ] }"#,
    );
    let s = report.get("S").unwrap();
    assert_eq!(order(s.after()), vec!["n", "ok", "items"]);
    assert_eq!(s.after_size(), 40);
    assert!(!s.needs_fix());
}

#[test]
fn test_empty_struct() {
    let report = process(AbiTable::amd64(), r#"{ "structs": [ { "name": "Empty", "fields": [] } ] }"#);
    let empty = report.get("Empty").unwrap();
    assert_eq!(empty.before_size(), 0);
    assert_eq!(empty.align().as_u64(), 1);
    assert!(empty.after().children().is_empty());
}

#[test]
fn test_nested_struct_ranked_by_own_layout() {
    let report = process(
        AbiTable::amd64(),
        r#"{ "structs": [ { "name": "Outer", "fields": [
            { "name": "a", "type": "bool" },
            { "name": "inner", "type": "struct", "fields": [
                { "name": "y", "type": "bool" },
                { "name": "x", "type": "int64" },
                { "name": "z", "type": "bool" }
            ] },
            { "name": "b", "type": "int32" }
        ] } ] }"#,
    );
    let outer = report.get("Outer").unwrap();

    assert_eq!(outer.before_size(), 40);
    assert_eq!(outer.after_size(), 24);
    assert_eq!(order(outer.after()), vec!["inner", "b", "a"]);
    let inner = &outer.after().children()[0];
    assert_eq!(inner.size(), 16);
    assert_eq!(order(inner), vec!["x", "y", "z"]);
}

#[test]
fn test_inline_struct_type_text_is_reordered() {
    let report = process(
        AbiTable::amd64(),
        r#"{ "structs": [ { "name": "Outer", "fields": [
            { "name": "flag", "type": "bool" },
            { "name": "inner", "type": "struct{ a bool; b int64; c bool }" }
        ] } ] }"#,
    );
    let outer = report.get("Outer").unwrap();

    assert_eq!(outer.before_size(), 32);
    assert_eq!(outer.after_size(), 24);
    let inner = outer.after().find("Outer/inner").unwrap();
    assert!(inner.is_composite());
    assert_eq!(order(inner), vec!["b", "a", "c"]);
    assert_eq!(inner.size(), 16);
}

#[test]
fn test_named_reference_uses_reordered_declaration() {
    let report = process(
        AbiTable::amd64(),
        r#"{ "structs": [
            { "name": "Outer", "fields": [
                { "name": "inner", "type": "Inner" },
                { "name": "flag", "type": "bool" }
            ] },
            { "name": "Inner", "fields": [
                { "name": "a", "type": "bool" },
                { "name": "b", "type": "int64" },
                { "name": "c", "type": "bool" }
            ] }
        ] }"#,
    );

    assert_eq!(report.get("Inner").unwrap().after_size(), 16);
    let outer = report.get("Outer").unwrap();
    assert_eq!(outer.before_size(), 32);
    assert_eq!(outer.after_size(), 24);
}

#[test]
fn test_declared_order_kept_when_smaller() {
    let report = process(
        AbiTable::amd64(),
        r#"{ "structs": [ { "name": "S", "fields": [
            { "name": "a", "type": "[1]int64" },
            { "name": "b", "type": "int32" },
            { "name": "c", "type": "bool" },
            { "name": "d", "type": "[3]byte" }
        ] } ] }"#,
    );
    let s = report.get("S").unwrap();
    assert_eq!(s.before_size(), 16);
    assert_eq!(s.after_size(), 16);
    assert_eq!(order(s.after()), vec!["a", "b", "c", "d"]);
    assert_eq!(report.fixable_count(), 0);
}

#[test]
fn test_self_reference_through_pointer() {
    let report = process(
        AbiTable::amd64(),
        r#"{ "structs": [ { "name": "Node", "fields": [
            { "name": "val", "type": "int32" },
            { "name": "next", "type": "*Node" },
            { "name": "children", "type": "[]Node" }
        ] } ] }"#,
    );
    let node = report.get("Node").unwrap();
    assert_eq!(node.before_size(), 40);
    assert_eq!(node.before().children()[1].size(), 8);
}

#[test]
fn test_mutual_recursion_terminates() {
    let report = process(
        AbiTable::amd64(),
        r#"{ "structs": [
            { "name": "A", "fields": [ { "name": "b", "type": "B" }, { "name": "x", "type": "bool" } ] },
            { "name": "B", "fields": [ { "name": "a", "type": "A" } ] }
        ] }"#,
    );

    assert!(report
        .issues()
        .iter()
        .any(|issue| matches!(issue, LayoutIssue::CyclicType { .. })));
    for s in report.structs() {
        assert_eq!(s.before_size() % s.align().as_u64(), 0);
        assert!(s.after_size() <= s.before_size());
    }
}

#[test]
fn test_unknown_types_fall_back() {
    let report = process(
        AbiTable::amd64(),
        r#"{ "structs": [ { "name": "S", "fields": [
            { "name": "t", "type": "time.Time" },
            { "name": "ok", "type": "bool" }
        ] } ] }"#,
    );
    let s = report.get("S").unwrap();
    assert_eq!(s.before_size(), 24);
    assert!(matches!(
        report.issues()[0],
        LayoutIssue::UnresolvableType { ref type_name, .. } if type_name == "time.Time"
    ));
}

#[test]
fn test_oversized_array_falls_back() {
    let report = process(
        AbiTable::amd64(),
        r#"{ "structs": [ { "name": "S", "fields": [
            { "name": "a", "type": "bool" },
            { "name": "b", "type": "[4611686018427387904]int64" }
        ] } ] }"#,
    );
    let s = report.get("S").unwrap();
    assert_eq!(s.before_size(), 24);
    assert_eq!(s.after_size(), 24);
    assert!(matches!(
        report.issues()[0],
        LayoutIssue::UnresolvableType { ref path, .. } if path == "S/b"
    ));
}

#[test]
fn test_layouts_are_consistent() {
    let report = process(
        AbiTable::amd64(),
        r#"{ "structs": [ { "name": "Mixed", "fields": [
            { "name": "a", "type": "uint8" },
            { "name": "m", "type": "map[string]int" },
            { "name": "c", "type": "complex128" },
            { "name": "s", "type": "string" },
            { "name": "arr", "type": "[3]int16" },
            { "name": "f", "type": "func(int) error" },
            { "name": "i", "type": "interface{}" },
            { "name": "ch", "type": "chan int" },
            { "name": "r", "type": "rune" }
        ] } ] }"#,
    );
    let validator = StructureValidator::new();
    for s in report.structs() {
        assert!(validator.validate(s.before()).is_ok());
        assert!(validator.validate(s.after()).is_ok());
        assert!(s.after_size() <= s.before_size());
    }

    let engine = LayoutEngine::new(AbiTable::amd64());
    let again = engine.process("again", vec![report.structs()[0].after().clone()]);
    assert_eq!(order(again.structs()[0].after()), order(report.structs()[0].after()));
}

#[test]
fn test_files_through_executor() {
    let dir = std::env::temp_dir().join(format!("struct-padding-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let good = dir.join("good.json");
    let broken = dir.join("broken.json");
    fs::write(&good, PADDED).unwrap();
    fs::write(&broken, r#"{ "structs": [ { "fields": [] } ] }"#).unwrap();

    let executor = BatchExecutor::new(LayoutEngine::default(), 2);
    let outcomes = executor.execute_files(&[good, broken], None);
    fs::remove_dir_all(&dir).ok();

    let report = outcomes[0].as_ref().unwrap();
    assert_eq!(report.fixable_count(), 1);
    assert!(outcomes[1].is_err());

    let json = JsonSerializer::new().serialize(report).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["structs"][0]["after_size"], 16);
    assert_eq!(value["total_saved"], 8);
}

#[test]
fn test_in_memory_batches() {
    let executor = BatchExecutor::new(LayoutEngine::new(AbiTable::arm64()), 1);
    let outcomes = executor.execute(&[BatchInput::new("mem", PADDED)], None);
    assert_eq!(outcomes[0].as_ref().unwrap().total_saved(), 8);
}
