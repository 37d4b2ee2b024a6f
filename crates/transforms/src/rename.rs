//! Renames bindings declared inside functions.
//!
//! Scopes are function bodies. Every name a function declares (its parameters,
//! `var`/`let`/`const` bindings, `catch` parameters, nested function and class
//! declarations) gets a fresh name, and each reference resolves to the
//! innermost function declaring it. Top-level bindings are globals and keep
//! their names.

use crate::{Result, Transform, TransformContext};
use std::collections::HashMap;
use tracing::debug;
use veil_core::Program;
use veil_core::token::{Token, TokenKind};

#[derive(Debug, Default)]
pub struct RenameIdentifiers;

impl RenameIdentifiers {
    pub fn new() -> Self {
        Self
    }
}

/// Innermost bracket around a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    Top,
    Paren,
    Bracket,
    Block,
    Object,
    Class,
}

#[derive(Debug)]
struct Scope {
    parent: usize,
    start: usize,
    end: usize,
    declared: Vec<String>,
    renames: HashMap<String, String>,
}

impl Scope {
    fn new(start: usize, end: usize) -> Self {
        Self {
            parent: 0,
            start,
            end,
            declared: Vec::new(),
            renames: HashMap::new(),
        }
    }
}

#[derive(Debug)]
struct FunctionSite {
    keyword: usize,
    name: Option<usize>,
    params: (usize, usize),
    end: usize,
    declaration: bool,
}

impl FunctionSite {
    /// Named function expressions see their own name; declarations bind it
    /// in the enclosing scope.
    fn start(&self) -> usize {
        match self.name {
            Some(name) if !self.declaration => name,
            _ => self.params.0,
        }
    }
}

fn matching(tokens: &[Token], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(open) {
        if token.opens() {
            depth += 1;
        } else if token.closes().is_some() {
            depth = depth.checked_sub(1)?;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

fn prev(tokens: &[Token], index: usize) -> Option<&Token> {
    index.checked_sub(1).map(|p| &tokens[p])
}

fn is_one_of(token: Option<&Token>, values: &[&str]) -> bool {
    token.is_some_and(|t| {
        matches!(t.kind, TokenKind::Punctuator | TokenKind::Identifier)
            && values.contains(&t.value.as_str())
    })
}

/// `with`, direct `eval` and template substitutions make static resolution
/// unreliable; such programs are left untouched.
fn has_dynamic_scope(tokens: &[Token]) -> bool {
    tokens.iter().any(|t| {
        t.is_keyword("with")
            || (t.is_identifier() && t.value == "eval")
            || (t.kind == TokenKind::Template && t.value.contains("${"))
    })
}

fn in_statement_position(tokens: &[Token], index: usize) -> bool {
    let mut index = index;
    if prev(tokens, index).is_some_and(|p| p.is_identifier() && p.value == "async") {
        index -= 1;
    }
    prev(tokens, index).is_none_or(|p| p.is_punct(";") || p.is_punct("{") || p.is_punct("}"))
}

fn function_sites(tokens: &[Token]) -> Vec<FunctionSite> {
    let mut sites = Vec::new();
    for (keyword, token) in tokens.iter().enumerate() {
        if !token.is_keyword("function") {
            continue;
        }
        let mut j = keyword + 1;
        if tokens.get(j).is_some_and(|t| t.is_punct("*")) {
            j += 1;
        }
        let name = tokens.get(j).filter(|t| t.is_identifier()).map(|_| j);
        if name.is_some() {
            j += 1;
        }
        if !tokens.get(j).is_some_and(|t| t.is_punct("(")) {
            continue;
        }
        let Some(close) = matching(tokens, j) else {
            continue;
        };
        if !tokens.get(close + 1).is_some_and(|t| t.is_punct("{")) {
            continue;
        }
        let Some(end) = matching(tokens, close + 1) else {
            continue;
        };
        sites.push(FunctionSite {
            keyword,
            name,
            params: (j, close),
            end,
            declaration: name.is_some() && in_statement_position(tokens, keyword),
        });
    }
    sites
}

/// Skips an initializer up to the `,` or closing bracket ending it.
fn skip_expression(tokens: &[Token], mut i: usize, end: usize) -> usize {
    let mut depth = 0usize;
    while i < end {
        let token = &tokens[i];
        if token.opens() {
            depth += 1;
        } else if token.closes().is_some() {
            if depth == 0 {
                return i;
            }
            depth -= 1;
        } else if depth == 0 && token.is_punct(",") {
            return i;
        }
        i += 1;
    }
    i
}

/// Binding identifiers of the pattern list between `start` and `end`.
fn pattern_bindings(tokens: &[Token], start: usize, end: usize) -> Vec<usize> {
    let mut bindings = Vec::new();
    let mut i = start;
    while i < end {
        let token = &tokens[i];
        if token.is_punct("=") {
            i = skip_expression(tokens, i + 1, end);
            continue;
        }
        if token.is_identifier()
            && is_one_of(prev(tokens, i), &["(", ",", "{", "[", "...", ":"])
            && (i + 1 >= end || is_one_of(tokens.get(i + 1), &[",", ")", "}", "]", "="]))
        {
            bindings.push(i);
        }
        i += 1;
    }
    bindings
}

/// Bindings of the declarator list starting at `i`, right after the keyword.
fn declarators(tokens: &[Token], mut i: usize) -> Vec<usize> {
    let mut bindings = Vec::new();
    loop {
        match tokens.get(i) {
            Some(t) if t.is_identifier() => {
                bindings.push(i);
                i += 1;
            }
            Some(t) if t.is_punct("{") || t.is_punct("[") => {
                let Some(close) = matching(tokens, i) else {
                    break;
                };
                bindings.extend(pattern_bindings(tokens, i + 1, close));
                i = close + 1;
            }
            _ => break,
        }
        if tokens.get(i).is_some_and(|t| t.is_punct("=")) {
            let mut depth = 0usize;
            i += 1;
            while let Some(t) = tokens.get(i) {
                if t.opens() {
                    depth += 1;
                } else if t.closes().is_some() {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                } else if depth == 0
                    && (t.is_punct(",")
                        || t.is_punct(";")
                        || t.is_keyword("in")
                        || (t.is_identifier() && t.value == "of"))
                {
                    break;
                }
                i += 1;
            }
        }
        if !tokens.get(i).is_some_and(|t| t.is_punct(",")) {
            break;
        }
        i += 1;
    }
    bindings
}

/// Builds the scope tree and the innermost scope of every token.
fn analyze(tokens: &[Token]) -> (Vec<Scope>, Vec<usize>) {
    let sites = function_sites(tokens);
    let mut scopes = vec![Scope::new(0, usize::MAX)];
    scopes.extend(sites.iter().map(|s| Scope::new(s.start(), s.end)));

    let mut scope_of = Vec::with_capacity(tokens.len());
    let mut stack = vec![0usize];
    let mut next = 1;
    for t in 0..tokens.len() {
        while stack.len() > 1 && stack.last().is_some_and(|&s| scopes[s].end < t) {
            stack.pop();
        }
        while next < scopes.len() && scopes[next].start <= t {
            scopes[next].parent = stack.last().copied().unwrap_or(0);
            stack.push(next);
            next += 1;
        }
        scope_of.push(stack.last().copied().unwrap_or(0));
    }

    let site_at: HashMap<usize, usize> = sites
        .iter()
        .enumerate()
        .map(|(i, site)| (site.keyword, i))
        .collect();

    for (t, token) in tokens.iter().enumerate() {
        if token.kind != TokenKind::Keyword {
            continue;
        }
        let enclosing = scope_of[t];
        match token.value.as_str() {
            "function" => {
                let Some(&index) = site_at.get(&t) else {
                    continue;
                };
                let site = &sites[index];
                let own = index + 1;
                if let Some(name) = site.name {
                    let target = if site.declaration { enclosing } else { own };
                    declare(&mut scopes, target, &tokens[name].value);
                }
                for binding in pattern_bindings(tokens, site.params.0 + 1, site.params.1) {
                    declare(&mut scopes, own, &tokens[binding].value);
                }
            }
            "var" | "let" | "const" => {
                for binding in declarators(tokens, t + 1) {
                    declare(&mut scopes, enclosing, &tokens[binding].value);
                }
            }
            "catch" => {
                if tokens.get(t + 1).is_some_and(|n| n.is_punct("("))
                    && let Some(close) = matching(tokens, t + 1)
                {
                    for binding in pattern_bindings(tokens, t + 2, close) {
                        declare(&mut scopes, enclosing, &tokens[binding].value);
                    }
                }
            }
            "class" => {
                if in_statement_position(tokens, t)
                    && let Some(name) = tokens.get(t + 1).filter(|n| n.is_identifier())
                {
                    declare(&mut scopes, enclosing, &name.value);
                }
            }
            _ => {}
        }
    }

    (scopes, scope_of)
}

fn declare(scopes: &mut [Scope], scope: usize, name: &str) {
    if scope == 0 {
        return;
    }
    let declared = &mut scopes[scope].declared;
    if !declared.iter().any(|n| n == name) {
        declared.push(name.to_string());
    }
}

fn class_bodies(tokens: &[Token]) -> Vec<usize> {
    let mut bodies = Vec::new();
    for (i, token) in tokens.iter().enumerate() {
        if !token.is_keyword("class") {
            continue;
        }
        let mut depth = 0usize;
        for (j, t) in tokens.iter().enumerate().skip(i + 1) {
            if depth == 0 && t.is_punct("{") {
                bodies.push(j);
                break;
            }
            if t.opens() {
                depth += 1;
            } else if t.closes().is_some() {
                match depth.checked_sub(1) {
                    Some(d) => depth = d,
                    None => break,
                }
            }
        }
    }
    bodies
}

/// Whether the `:` at `colon` ends a `case` clause or a label.
fn ends_clause_or_label(tokens: &[Token], colon: usize) -> bool {
    let mut depth = 0usize;
    let mut k = colon;
    while k > 0 {
        let t = &tokens[k - 1];
        if depth == 0 && (t.is_punct(";") || t.is_punct("}")) {
            break;
        }
        if t.closes().is_some() {
            depth += 1;
        } else if t.opens() {
            if depth == 0 {
                break;
            }
            depth -= 1;
        }
        k -= 1;
    }
    let first = &tokens[k];
    first.is_keyword("case") || first.is_keyword("default") || (k + 1 == colon && first.is_identifier())
}

fn opens_block(tokens: &[Token], brace: usize, outer: Context) -> bool {
    let Some(p) = prev(tokens, brace) else {
        return true;
    };
    match p.kind {
        TokenKind::Punctuator => match p.value.as_str() {
            ")" | ";" | "{" | "}" | "=>" => true,
            ":" => {
                matches!(outer, Context::Top | Context::Block)
                    && ends_clause_or_label(tokens, brace - 1)
            }
            _ => false,
        },
        TokenKind::Keyword => matches!(p.value.as_str(), "else" | "do" | "try" | "finally"),
        _ => false,
    }
}

fn contexts(tokens: &[Token]) -> Vec<Context> {
    let class_bodies = class_bodies(tokens);
    let mut stack: Vec<Context> = Vec::new();
    let mut out = Vec::with_capacity(tokens.len());
    for (i, token) in tokens.iter().enumerate() {
        let current = stack.last().copied().unwrap_or(Context::Top);
        out.push(current);
        if token.closes().is_some() {
            stack.pop();
        } else if token.opens() {
            let kind = match token.value.as_str() {
                "(" => Context::Paren,
                "[" => Context::Bracket,
                _ if class_bodies.contains(&i) => Context::Class,
                _ if opens_block(tokens, i, current) => Context::Block,
                _ => Context::Object,
            };
            stack.push(kind);
        }
    }
    out
}

/// False for identifiers in property position: member accesses, object
/// keys, method and class member names, labels.
fn is_reference(tokens: &[Token], contexts: &[Context], i: usize) -> bool {
    let before = prev(tokens, i);
    let after = tokens.get(i + 1);
    if before.is_some_and(|p| {
        p.is_punct(".") || p.is_punct("?.") || p.is_keyword("break") || p.is_keyword("continue")
    }) {
        return false;
    }
    match contexts[i] {
        Context::Object => {
            let key = is_one_of(before, &["{", ","]) && after.is_some_and(|n| n.is_punct(":"));
            let method = is_one_of(before, &["{", ",", "get", "set", "async", "*"])
                && after.is_some_and(|n| n.is_punct("("));
            !(key || method)
        }
        Context::Class => {
            !is_one_of(before, &["{", "}", ";", "static", "get", "set", "async", "*", "#"])
        }
        Context::Top | Context::Block => {
            let label = after.is_some_and(|n| n.is_punct(":"))
                && (before.is_none() || is_one_of(before, &[";", "{", "}"]));
            !label
        }
        Context::Paren | Context::Bracket => true,
    }
}

fn is_shorthand(tokens: &[Token], contexts: &[Context], i: usize) -> bool {
    contexts[i] == Context::Object
        && is_one_of(prev(tokens, i), &["{", ","])
        && is_one_of(tokens.get(i + 1), &[",", "}", "="])
}

fn resolve<'s>(scopes: &'s [Scope], mut scope: usize, name: &str) -> Option<&'s str> {
    while scope != 0 {
        if let Some(renamed) = scopes[scope].renames.get(name) {
            return Some(renamed.as_str());
        }
        scope = scopes[scope].parent;
    }
    None
}

impl Transform for RenameIdentifiers {
    fn name(&self) -> &'static str {
        "RenameIdentifiers"
    }

    fn apply(&self, program: &mut Program, ctx: &mut TransformContext) -> Result<bool> {
        if !ctx.options.rename_locals {
            return Ok(false);
        }
        let tokens: Vec<Token> = program.tokens().cloned().collect();
        if has_dynamic_scope(&tokens) {
            debug!("RenameIdentifiers: dynamic scope detected, skipping");
            return Ok(false);
        }
        for token in tokens.iter().filter(|t| t.is_identifier()) {
            ctx.naming.reserve(&token.value);
        }

        let (mut scopes, scope_of) = analyze(&tokens);
        let mut bindings = 0usize;
        for scope in scopes.iter_mut().skip(1) {
            for name in &scope.declared {
                scope.renames.insert(name.clone(), ctx.naming.generate());
                bindings += 1;
            }
        }
        if bindings == 0 {
            return Ok(false);
        }

        let contexts = contexts(&tokens);
        let mut cursor = 0usize;
        let mut references = 0usize;
        for statement in &mut program.statements {
            let mut rewritten = Vec::with_capacity(statement.tokens.len());
            for mut token in statement.tokens.drain(..) {
                let index = cursor;
                cursor += 1;
                if !token.is_identifier() || !is_reference(&tokens, &contexts, index) {
                    rewritten.push(token);
                    continue;
                }
                let Some(renamed) = resolve(&scopes, scope_of[index], &token.value) else {
                    rewritten.push(token);
                    continue;
                };
                references += 1;
                if is_shorthand(&tokens, &contexts, index) {
                    rewritten.push(token);
                    rewritten.push(Token::punctuator(":"));
                    rewritten.push(Token::identifier(renamed));
                } else {
                    token.value = renamed.to_string();
                    rewritten.push(token);
                }
            }
            statement.tokens = rewritten;
        }

        debug!(
            "RenameIdentifiers: {} bindings, {} references renamed",
            bindings, references
        );
        Ok(references > 0)
    }
}
