//! Named placeholder substitution for source templates.
//!
//! A placeholder is `{name}` where `name` is one or more ASCII alphanumerics or
//! underscores. Any other brace, such as a JavaScript block, is copied as is.
//! Substituted values are never rescanned.

use crate::result::{Error, Result};

/// A source template kept as plain data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template(&'static str);

/// Values bound to placeholder names for one render.
#[derive(Debug, Default, Clone)]
pub struct Bindings<'a> {
    entries: Vec<(&'a str, &'a str)>,
}

impl<'a> Bindings<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name`, replacing an earlier binding of the same name.
    pub fn bind(mut self, name: &'a str, value: &'a str) -> Self {
        match self.entries.iter_mut().find(|(bound, _)| *bound == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&'a str> {
        self.entries
            .iter()
            .find(|(bound, _)| *bound == name)
            .map(|(_, value)| *value)
    }
}

impl Template {
    pub const fn new(source: &'static str) -> Self {
        Self(source)
    }

    pub fn source(&self) -> &'static str {
        self.0
    }

    /// Placeholder names in order of first appearance.
    pub fn placeholders(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = Vec::new();
        let mut rest = self.0;
        while let Some(start) = rest.find('{') {
            match placeholder_at(&rest[start..]) {
                Some(name) => {
                    if !names.contains(&name) {
                        names.push(name);
                    }
                    rest = &rest[start + name.len() + 2..];
                }
                None => rest = &rest[start + 1..],
            }
        }
        names
    }

    /// Fills every placeholder. An unbound placeholder fails the whole render.
    pub fn render(&self, bindings: &Bindings<'_>) -> Result<String> {
        let mut out = String::with_capacity(self.0.len() + 64);
        let mut rest = self.0;
        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let tail = &rest[start..];
            match placeholder_at(tail) {
                Some(name) => {
                    let value = bindings
                        .get(name)
                        .ok_or_else(|| Error::UnboundPlaceholder(name.to_string()))?;
                    out.push_str(value);
                    rest = &tail[name.len() + 2..];
                }
                None => {
                    out.push('{');
                    rest = &tail[1..];
                }
            }
        }
        out.push_str(rest);
        Ok(out)
    }
}

/// Name of the placeholder starting at `text[0] == '{'`, if any.
fn placeholder_at(text: &str) -> Option<&str> {
    let body = text.strip_prefix('{')?;
    let len = body
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
        .count();
    (len > 0 && body.as_bytes().get(len) == Some(&b'}')).then(|| &body[..len])
}
