use veil_core::{IdentifierNamesGeneratorKind, ObfuscatorOptions};
use veil_transform::Obfuscator;

fn rename_only() -> ObfuscatorOptions {
    ObfuscatorOptions {
        identifier_names_generator: IdentifierNamesGeneratorKind::Mangled,
        seed: Some(1),
        numbers_to_hex: false,
        ..ObfuscatorOptions::no_additional_nodes()
    }
}

fn obfuscate(source: &str) -> String {
    Obfuscator::obfuscate(source, &rename_only())
        .unwrap()
        .obfuscated_code
}

#[test]
fn test_globals_and_properties_survive() {
    let out = obfuscate(
        "var total = 0;
         function add(value) { total += value.amount; return { value, total: total }; }",
    );
    assert_eq!(
        out,
        "var total=0;function add(a){total+=a.amount;return{value:a,total:total};}"
    );
}

#[test]
fn test_nested_functions_and_shadowing() {
    let out = obfuscate(
        "function outer(x) {
             var y = x * 2;
             return function inner(x) { return x + y; };
         }",
    );
    assert_eq!(
        out,
        "function outer(a){var b=a*2;return function c(d){return d+b;};}"
    );
}

#[test]
fn test_object_methods_and_class_members_keep_names() {
    let out = obfuscate(
        "function make(size) {
             class Box { grow(by) { return by; } }
             return { size() { return size; }, box: new Box() };
         }",
    );
    assert_eq!(
        out,
        "function make(a){class b{grow(by){return by;}}return{size(){return a;},box:new b()};}"
    );
}

#[test]
fn test_with_statement_disables_renaming() {
    let source = "function f(o) { with (o) { return p; } }";
    assert_eq!(obfuscate(source), "function f(o){with(o){return p;}}");
}
