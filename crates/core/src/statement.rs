//! Top-level statement model used to splice generated code into a program.
//!
//! Statements keep their tokens; nested structure is only tracked as far as
//! bracket balancing and statement boundaries require.

use crate::lexer::tokenize;
use crate::result::{Error, Result};
use crate::token::{Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Empty,
    Block,
    Variable,
    Function,
    Class,
    Control,
    Expression,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub kind: StatementKind,
    pub tokens: Vec<Token>,
}

/// A parsed program: an ordered list of top-level statements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    pub statements: Vec<Statement>,
}

/// Parses `source` into top-level statements.
pub fn parse_to_statements(source: &str) -> Result<Vec<Statement>> {
    let tokens = tokenize(source)?;
    let statements = split_statements(tokens)?;
    tracing::trace!("parsed {} statements", statements.len());
    Ok(statements)
}

impl Statement {
    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Self {
            kind: classify(&tokens),
            tokens,
        }
    }

    /// A directive prologue entry such as `'use strict';`.
    pub fn is_directive(&self) -> bool {
        match self.tokens.as_slice() {
            [literal] | [literal, _] => {
                literal.kind == TokenKind::String
                    && self.tokens.get(1).is_none_or(|t| t.is_punct(";"))
            }
            _ => false,
        }
    }

    pub fn print(&self) -> String {
        print_tokens(&self.tokens)
    }

    /// Whether the next statement may follow on the same line.
    fn is_terminated(&self) -> bool {
        let body = labeled_body(&self.tokens);
        match (self.tokens.last(), body.first()) {
            (Some(last), _) if last.is_punct(";") => true,
            (Some(last), Some(head)) if last.is_punct("}") => {
                ends_with_block(classify(body), head)
            }
            _ => false,
        }
    }
}

impl Program {
    pub fn parse(source: &str) -> Result<Self> {
        Ok(Self {
            statements: parse_to_statements(source)?,
        })
    }

    pub fn token_count(&self) -> usize {
        self.statements.iter().map(|s| s.tokens.len()).sum()
    }

    /// Inserts `statements` before the existing ones, keeping their order.
    pub fn prepend(&mut self, statements: Vec<Statement>) {
        self.statements.splice(0..0, statements);
    }

    /// All tokens in source order, flattened across statements.
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.statements.iter().flat_map(|s| s.tokens.iter())
    }

    pub fn tokens_mut(&mut self) -> impl Iterator<Item = &mut Token> {
        self.statements.iter_mut().flat_map(|s| s.tokens.iter_mut())
    }

    /// Prints the program. Compact output keeps statements on one line unless
    /// a line break is needed to terminate one.
    pub fn print(&self, compact: bool) -> String {
        let mut printer = Printer::with_capacity(self.token_count() * 4);
        let mut terminated = true;
        for statement in &self.statements {
            for (index, token) in statement.tokens.iter().enumerate() {
                if index == 0 && !printer.is_empty() && (!compact || !terminated) {
                    printer.out.push('\n');
                    printer.push_token(token);
                } else {
                    printer.push(token);
                }
            }
            if !statement.tokens.is_empty() {
                terminated = statement.is_terminated();
            }
        }
        printer.out
    }
}

fn classify(tokens: &[Token]) -> StatementKind {
    let Some(head) = tokens.first() else {
        return StatementKind::Empty;
    };
    match (head.kind, head.value.as_str()) {
        (TokenKind::Punctuator, ";") => StatementKind::Empty,
        (TokenKind::Punctuator, "{") => StatementKind::Block,
        (TokenKind::Keyword, "var" | "let" | "const") => StatementKind::Variable,
        (TokenKind::Keyword, "function") => StatementKind::Function,
        (TokenKind::Identifier, "async") if tokens.get(1).is_some_and(|t| t.is_keyword("function")) => {
            StatementKind::Function
        }
        (TokenKind::Keyword, "class") => StatementKind::Class,
        (
            TokenKind::Keyword,
            "if" | "for" | "while" | "do" | "try" | "switch" | "return" | "throw" | "break"
            | "continue" | "with" | "debugger",
        ) => StatementKind::Control,
        _ => StatementKind::Expression,
    }
}

/// The statement after any leading `label:` prefixes.
fn labeled_body(tokens: &[Token]) -> &[Token] {
    let mut body = tokens;
    while let [label, colon, rest @ ..] = body
        && label.is_identifier()
        && colon.is_punct(":")
        && !rest.is_empty()
    {
        body = rest;
    }
    body
}

/// Statements whose closing `}` at depth zero ends them.
fn ends_with_block(kind: StatementKind, head: &Token) -> bool {
    match kind {
        StatementKind::Block | StatementKind::Function | StatementKind::Class => true,
        StatementKind::Control => matches!(
            head.value.as_str(),
            "if" | "for" | "while" | "do" | "try" | "switch" | "with"
        ),
        _ => false,
    }
}

/// Whether `next` continues a statement across a line break after `last`.
fn continues_across_newline(last: &Token, next: &Token) -> bool {
    let operator_like = |t: &Token| {
        t.kind == TokenKind::Punctuator
            && !matches!(t.value.as_str(), ")" | "]" | "}" | "++" | "--" | ";")
    };
    if operator_like(last) || matches!(last.kind, TokenKind::Keyword) && last.value != "this" {
        return true;
    }
    next.kind == TokenKind::Punctuator
        && !matches!(next.value.as_str(), "{" | "++" | "--" | "!" | "~" | "[" | "(" | ";")
}

fn split_statements(tokens: Vec<Token>) -> Result<Vec<Statement>> {
    let mut statements = Vec::new();
    let mut current: Vec<Token> = Vec::new();
    let mut brackets: Vec<(&'static str, u32)> = Vec::new();
    let mut iter = tokens.into_iter().peekable();

    while let Some(token) = iter.next() {
        if token.opens() {
            let open = match token.value.as_str() {
                "(" => "(",
                "[" => "[",
                _ => "{",
            };
            brackets.push((open, token.line));
        } else if let Some(expected) = token.closes() {
            match brackets.pop() {
                Some((open, _)) if open == expected => {}
                _ => {
                    return Err(Error::Parse {
                        line: token.line,
                        msg: format!("unexpected `{}`", token.value),
                    });
                }
            }
        }
        current.push(token);
        if !brackets.is_empty() {
            continue;
        }

        let last = &current[current.len() - 1];
        let body = labeled_body(&current);
        let head = &body[0];
        let kind = classify(body);
        let next = iter.peek();
        let ends = if last.is_punct(";") {
            // `if (a) b; else c;` and `do x; while (y);` are single statements.
            !(head.is_keyword("if") && next.is_some_and(|n| n.is_keyword("else"))
                || head.is_keyword("do") && next.is_some_and(|n| n.is_keyword("while")) && !has_trailing_while(&current))
        } else if last.is_punct("}") && ends_with_block(kind, head) {
            !next.is_some_and(|n| {
                n.is_keyword("else")
                    || n.is_keyword("catch")
                    || n.is_keyword("finally")
                    || (n.is_keyword("while") && head.is_keyword("do"))
            })
        } else {
            next.is_some_and(|n| n.newline_before && !continues_across_newline(last, n))
        };

        if ends {
            statements.push(Statement::from_tokens(std::mem::take(&mut current)));
        }
    }

    if let Some((open, line)) = brackets.pop() {
        return Err(Error::Parse {
            line,
            msg: format!("unclosed `{open}`"),
        });
    }
    if !current.is_empty() {
        statements.push(Statement::from_tokens(current));
    }
    Ok(statements)
}

/// True once a `do` statement already has its `while (...)` tail.
fn has_trailing_while(tokens: &[Token]) -> bool {
    let mut depth = 0i32;
    tokens.iter().skip(1).any(|t| {
        if t.opens() {
            depth += 1;
        } else if t.closes().is_some() {
            depth -= 1;
        }
        depth == 0 && t.is_keyword("while")
    })
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$' || c == '\\'
}

/// Whether printing `next` right after `prev` would change the token stream.
fn needs_space(prev: &Token, next: &Token) -> bool {
    let (Some(last), Some(first)) = (prev.value.chars().last(), next.value.chars().next()) else {
        return false;
    };
    if is_word_char(last) && is_word_char(first) {
        return true;
    }
    if prev.kind == TokenKind::Number && first == '.' {
        return true;
    }
    matches!((last, first), ('+', '+') | ('-', '-') | ('/', '/') | ('/', '*') | ('<', '!'))
}

/// A line break before `next` only matters when the parser would insert a
/// semicolon there. `after_block` means `prev` closed a statement block.
fn keeps_newline(prev: &Token, next: &Token, after_block: bool) -> bool {
    if !next.newline_before || after_block {
        return false;
    }
    if prev.kind == TokenKind::Keyword
        && matches!(prev.value.as_str(), "return" | "break" | "continue" | "throw" | "yield")
    {
        return true;
    }
    let prev_ends = match prev.kind {
        TokenKind::Punctuator => matches!(prev.value.as_str(), ")" | "]" | "}" | "++" | "--"),
        TokenKind::Keyword => matches!(
            prev.value.as_str(),
            "this" | "null" | "true" | "false" | "super"
        ),
        _ => true,
    };
    let next_starts = match next.kind {
        TokenKind::Punctuator => matches!(
            next.value.as_str(),
            "{" | "++" | "--" | "!" | "~" | "#" | "@"
        ),
        _ => true,
    };
    prev_ends && next_starts
}

/// Token printer that knows which `{` open statement blocks, so the line
/// break after a block's `}` can be dropped.
struct Printer<'t> {
    out: String,
    history: Vec<&'t Token>,
    parens: Vec<usize>,
    /// One entry per open `{`: whether it opened a statement block.
    braces: Vec<bool>,
    /// Index of the `(` matching the most recent `)`.
    last_paren: Option<usize>,
    /// A `class` keyword waiting for its body, with the nesting it appeared at
    /// and whether it declares.
    pending_class: Option<(usize, usize, bool)>,
    closed_block: bool,
}

impl<'t> Printer<'t> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            out: String::with_capacity(capacity),
            history: Vec::new(),
            parens: Vec::new(),
            braces: Vec::new(),
            last_paren: None,
            pending_class: None,
            closed_block: false,
        }
    }

    fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Appends `token` with whatever separator it needs.
    fn push(&mut self, token: &'t Token) {
        if let Some(prev) = self.history.last() {
            if keeps_newline(prev, token, self.closed_block) {
                self.out.push('\n');
            } else if needs_space(prev, token) {
                self.out.push(' ');
            }
        }
        self.push_token(token);
    }

    /// Appends `token` with no separator.
    fn push_token(&mut self, token: &'t Token) {
        self.closed_block = false;
        match token.value.as_str() {
            _ if token.kind != TokenKind::Punctuator => {
                if token.is_keyword("class") {
                    let declares = self.starts_statement(self.history.len());
                    self.pending_class = Some((self.parens.len(), self.braces.len(), declares));
                }
            }
            "(" => self.parens.push(self.history.len()),
            ")" => self.last_paren = self.parens.pop(),
            "{" => {
                let block = self.opens_block();
                self.braces.push(block);
            }
            "}" => self.closed_block = self.braces.pop().unwrap_or(false),
            _ => {}
        }
        self.out.push_str(&token.value);
        self.history.push(token);
    }

    /// Whether the token at `at` begins a statement, ignoring an `async`
    /// prefix.
    fn starts_statement(&self, at: usize) -> bool {
        let mut before = self.history[..at].iter().rev();
        let mut prev = before.next();
        if prev.is_some_and(|t| t.is_identifier() && t.value == "async") {
            prev = before.next();
        }
        match prev {
            None => true,
            Some(t) if t.kind == TokenKind::Punctuator => matches!(t.value.as_str(), ";" | "{" | "}"),
            Some(t) => matches!(t.value.as_str(), "export" | "default" | "else"),
        }
    }

    /// Decides, before it is pushed, whether the next `{` opens a statement
    /// block.
    fn opens_block(&mut self) -> bool {
        if let Some((parens, braces, declares)) = self.pending_class
            && parens == self.parens.len()
            && braces == self.braces.len()
        {
            self.pending_class = None;
            return declares;
        }
        let Some(prev) = self.history.last() else {
            return true;
        };
        match (prev.kind, prev.value.as_str()) {
            (TokenKind::Punctuator, ";" | "{" | "}") => true,
            (TokenKind::Punctuator, ")") => self.last_paren.is_some_and(|open| self.owns_block(open)),
            (TokenKind::Keyword, "else" | "do" | "try" | "finally") => true,
            _ => false,
        }
    }

    /// Whether the parenthesized list opening at `open` heads a block body:
    /// a control header, a method, or a function declaration.
    fn owns_block(&self, open: usize) -> bool {
        let mut at = open;
        let mut seen_function = None;
        while at > 0 {
            at -= 1;
            let token = self.history[at];
            if token.is_keyword("function") {
                seen_function = Some(at);
                break;
            }
            if at + 1 == open && token.kind == TokenKind::Keyword {
                return matches!(
                    token.value.as_str(),
                    "if" | "for" | "while" | "with" | "switch" | "catch"
                );
            }
            if !(token.is_identifier() || token.is_punct("*")) || open - at > 2 {
                break;
            }
        }
        match seen_function {
            Some(keyword) => self.starts_statement(keyword),
            None => true,
        }
    }
}

/// Prints tokens with minimal separation.
pub fn print_tokens(tokens: &[Token]) -> String {
    let mut printer = Printer::with_capacity(tokens.iter().map(|t| t.value.len() + 1).sum());
    for token in tokens {
        printer.push(token);
    }
    printer.out
}
