//! Moves string literals into a single array and replaces each literal with an
//! indexed access into it.

pub mod storage;

use crate::{Result, Transform, TransformContext};
use storage::StringArray;
use tracing::debug;
use veil_core::Program;
use veil_core::number::hex_literal;
use veil_core::token::{Token, TokenKind};

#[derive(Debug, Default)]
pub struct StringArrayTransform;

impl StringArrayTransform {
    pub fn new() -> Self {
        Self
    }
}

/// Whether the literal at `index` must stay in place.
fn is_pinned(tokens: &[Token], index: usize) -> bool {
    let prev = index.checked_sub(1).map(|i| &tokens[i]);
    let next = tokens.get(index + 1);

    // Module specifiers: `import 'a'`, `import x from 'a'`, `export * from 'a'`.
    if prev.is_some_and(|p| p.is_keyword("import") || (p.is_identifier() && p.value == "from")) {
        return true;
    }
    // Object keys: `{ 'a': 1, 'b': 2 }`.
    if prev.is_some_and(|p| p.is_punct("{") || p.is_punct(","))
        && next.is_some_and(|n| n.is_punct(":"))
    {
        return true;
    }
    // Method and accessor names: `{ 'a'() {} }`, `{ get 'x'() {} }`.
    if next.is_some_and(|n| n.is_punct("("))
        || prev.is_some_and(|p| {
            p.is_identifier() && matches!(p.value.as_str(), "get" | "set" | "static" | "async")
        })
    {
        return true;
    }
    // Class fields: `class K { 'f' = 1; 'g'; }`.
    if in_class_body(tokens, index)
        && (prev.is_some_and(|p| p.is_punct("{") || p.is_punct("}") || p.is_punct(";"))
            || next.is_some_and(|n| n.is_punct("=")))
    {
        return true;
    }
    // Directive prologue of a function body.
    prev.is_some_and(|p| p.is_punct("{"))
        && next.is_none_or(|n| n.is_punct(";") || n.is_punct("}") || n.newline_before)
}

/// Whether the token at `index` sits directly inside a class body.
fn in_class_body(tokens: &[Token], index: usize) -> bool {
    let mut depth = 0usize;
    for at in (0..index).rev() {
        let token = &tokens[at];
        if token.closes().is_some() {
            depth += 1;
        } else if token.opens() {
            if depth == 0 {
                return token.is_punct("{") && opens_class_body(tokens, at);
            }
            depth -= 1;
        }
    }
    false
}

/// `class`, `class Name` or `class Name extends a.b` right before the brace.
fn opens_class_body(tokens: &[Token], brace: usize) -> bool {
    tokens[..brace]
        .iter()
        .rev()
        .take_while(|t| {
            t.is_keyword("class") || t.is_keyword("extends") || t.is_identifier() || t.is_punct(".")
        })
        .any(|t| t.is_keyword("class"))
}

fn indexed_access(array_name: &str, index: usize, literal: &Token) -> [Token; 4] {
    let mut name = Token::identifier(array_name);
    name.line = literal.line;
    name.newline_before = literal.newline_before;
    [
        name,
        Token::punctuator("["),
        Token::new(TokenKind::Number, hex_literal(index as u64)),
        Token::punctuator("]"),
    ]
}

impl Transform for StringArrayTransform {
    fn name(&self) -> &'static str {
        "StringArray"
    }

    fn apply(&self, program: &mut Program, ctx: &mut TransformContext) -> Result<bool> {
        if !(ctx.options.string_array && ctx.options.custom_nodes) {
            return Ok(false);
        }

        let mut array: Option<StringArray> = None;
        let mut in_prologue = true;

        for statement in &mut program.statements {
            if in_prologue && statement.is_directive() {
                continue;
            }
            in_prologue = false;

            if !statement.tokens.iter().any(|t| t.kind == TokenKind::String) {
                continue;
            }

            let tokens = std::mem::take(&mut statement.tokens);
            let mut rewritten = Vec::with_capacity(tokens.len() + 8);
            for (index, token) in tokens.iter().enumerate() {
                if token.kind != TokenKind::String || is_pinned(&tokens, index) {
                    rewritten.push(token.clone());
                    continue;
                }
                let storage = array.get_or_insert_with(|| StringArray::new(ctx.naming.generate()));
                let slot = storage.insert(&token.value)?;
                rewritten.extend(indexed_access(storage.name(), slot, token));
            }
            statement.tokens = rewritten;
        }

        let Some(array) = array else {
            return Ok(false);
        };
        debug!(
            "StringArray: {} literals moved into {}",
            array.len(),
            array.name()
        );
        ctx.string_array = Some(array);
        Ok(true)
    }
}
