use veil_core::Error;
use veil_core::template::{Bindings, Template};

const CALL: Template = Template::new("function {name}() { return {value}; }");

#[test]
fn test_render_fills_every_placeholder() {
    let out = CALL
        .render(&Bindings::new().bind("name", "f").bind("value", "0x1"))
        .unwrap();
    assert_eq!(out, "function f() { return 0x1; }");
}

#[test]
fn test_missing_binding_fails() {
    let err = CALL.render(&Bindings::new().bind("name", "f")).unwrap_err();
    assert!(matches!(err, Error::UnboundPlaceholder(name) if name == "value"));
}

#[test]
fn test_values_are_not_rescanned() {
    let out = CALL
        .render(&Bindings::new().bind("name", "{value}").bind("value", "1"))
        .unwrap();
    assert_eq!(out, "function {value}() { return 1; }");
}

#[test]
fn test_extra_bindings_are_ignored() {
    let out = Template::new("{a}{a}")
        .render(&Bindings::new().bind("a", "x").bind("b", "y"))
        .unwrap();
    assert_eq!(out, "xx");
}
