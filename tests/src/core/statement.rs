use veil_core::token::TokenKind;
use veil_core::{Error, Program, StatementKind, parse_to_statements};

#[test]
fn test_print_reparses_to_same_tokens() {
    let source = "var re = /a\\/b/g, x = a / b / c;\n\
                  label: for (var i = 0; i < 10; i++) { if (i % 2) continue label; }\n\
                  var s = `t ${x}` + 'q';\n\
                  do { x-- } while (x > 0)\n\
                  a = b\n\
                  ++c";
    let program = Program::parse(source).unwrap();
    let printed = program.print(true);
    let reparsed = Program::parse(&printed).unwrap();

    let values = |p: &Program| p.tokens().map(|t| t.value.clone()).collect::<Vec<_>>();
    assert_eq!(values(&program), values(&reparsed));
    assert_eq!(program.statements.len(), reparsed.statements.len());
}

#[test]
fn test_return_keeps_its_line_break() {
    let program = Program::parse("function f() { return\n1; }").unwrap();
    assert_eq!(program.print(true), "function f(){return\n1;}");
}

#[test]
fn test_classifies_statements() {
    let kinds: Vec<_> = parse_to_statements("let a; class B {} { } ; async function c() {} x()")
        .unwrap()
        .iter()
        .map(|s| s.kind)
        .collect();
    assert_eq!(
        kinds,
        [
            StatementKind::Variable,
            StatementKind::Class,
            StatementKind::Block,
            StatementKind::Empty,
            StatementKind::Function,
            StatementKind::Expression,
        ]
    );
}

#[test]
fn test_prepend_keeps_order() {
    let mut program = Program::parse("c();").unwrap();
    program.prepend(parse_to_statements("a(); b();").unwrap());
    assert_eq!(program.print(true), "a();b();c();");
}

#[test]
fn test_lexer_errors_carry_position() {
    match Program::parse("var a = 1;\nvar b = 'open") {
        Err(Error::Lex { line, .. }) => assert_eq!(line, 2),
        other => panic!("expected lexing error, got {other:?}"),
    }
}

#[test]
fn test_optional_chaining_is_not_a_conditional() {
    let program = Program::parse("a?.b; c?.5:d").unwrap();
    let values: Vec<_> = program.tokens().map(|t| t.value.as_str()).collect();
    assert_eq!(values, ["a", "?.", "b", ";", "c", "?", ".5", ":", "d"]);
    assert_eq!(
        program.tokens().filter(|t| t.kind == TokenKind::Number).count(),
        1
    );
}
