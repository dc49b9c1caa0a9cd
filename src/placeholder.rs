//! Placeholder resolution for TaskPaper templates
//!
//! The second line of a template declares its placeholders as space-separated
//! `$name` tokens:
//!
//! ```text
//! Prepare luggage for trip to $destination: @start($start)
//! 	$start $due $destination
//! 	- Book hotel @due($due)
//! ```
//!
//! Each declared name is asked for once through a [`ValueSource`], then every
//! occurrence of `$name` in the document is replaced. The declaration line is
//! blanked out so the parser never sees it, while line numbers stay intact for
//! error reporting.

use crate::error::{Error, Result};
use std::collections::HashMap;
use tracing::{debug, info};

/// Default symbol introducing a placeholder
pub const DEFAULT_SYMBOL: char = '$';

/// Supplies values for placeholders
///
/// Implementations may block, e.g. waiting for the user to type a value.
pub trait ValueSource {
    /// Return the value to substitute for `name` (given without the symbol)
    fn get_value(&mut self, name: &str) -> Result<String>;
}

impl<F> ValueSource for F
where
    F: FnMut(&str) -> Result<String>,
{
    fn get_value(&mut self, name: &str) -> Result<String> {
        self(name)
    }
}

/// Value source backed by a fixed map, recording every lookup
///
/// Used for non-interactive runs and in tests.
#[derive(Debug, Default, Clone)]
pub struct ScriptedValues {
    values: HashMap<String, String>,
    calls: Vec<String>,
}

impl ScriptedValues {
    /// Create a scripted source from `(name, value)` pairs
    pub fn new<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: values
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            calls: Vec::new(),
        }
    }

    /// Names requested so far, in call order
    pub fn calls(&self) -> &[String] {
        &self.calls
    }
}

impl ValueSource for ScriptedValues {
    fn get_value(&mut self, name: &str) -> Result<String> {
        self.calls.push(name.to_string());
        self.values.get(name).cloned().ok_or_else(|| {
            Error::Prompt(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no value scripted for placeholder '{}'", name),
            ))
        })
    }
}

/// List the placeholder names declared on the second line of `text`
///
/// The second line only declares placeholders when its first token starts
/// with `symbol`; otherwise it is ordinary content and nothing is returned.
/// Names are returned without the symbol, deduplicated, in order of first
/// appearance. Tokens that do not start with `symbol` are ignored; a bare
/// symbol is not a placeholder.
pub fn find_placeholders(text: &str, symbol: char) -> Vec<String> {
    let Some(line) = text.lines().nth(1) else {
        return Vec::new();
    };
    if !line.trim_start().starts_with(symbol) {
        return Vec::new();
    }

    let mut names: Vec<String> = Vec::new();
    for token in line.split_whitespace() {
        if let Some(name) = token.strip_prefix(symbol)
            && !name.is_empty()
            && !names.iter().any(|n| n == name)
        {
            names.push(name.to_string());
        }
    }
    names
}

/// Resolve `$name` placeholders in `text` using the default `$` symbol
pub fn resolve_placeholders(text: &str, source: &mut dyn ValueSource) -> Result<String> {
    resolve_placeholders_with(text, DEFAULT_SYMBOL, source)
}

/// Resolve placeholders introduced by `symbol`
///
/// Returns `text` unchanged when the second line declares nothing; the value
/// source is not consulted at all in that case.
///
/// # Errors
/// * `Error::Prompt` when the value source fails
/// * `Error::UnresolvedPlaceholder` when a placeholder token is left after
///   substitution, e.g. an undeclared `$name` in the body
pub fn resolve_placeholders_with(
    text: &str,
    symbol: char,
    source: &mut dyn ValueSource,
) -> Result<String> {
    let names = find_placeholders(text, symbol);
    if names.is_empty() {
        debug!("No placeholder declaration on line 2");
        return Ok(text.to_string());
    }

    let mut values = Vec::with_capacity(names.len());
    for name in names {
        let value = source.get_value(&name)?;
        debug!(placeholder = %name, value = %value, "Placeholder value collected");
        values.push((name, value));
    }
    // Longest names first so `$start2` wins over `$start`
    values.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

    let mut resolved = String::with_capacity(text.len());
    for (index, line) in text.split_inclusive('\n').enumerate() {
        if index == 1 {
            // Keep the terminator so line numbers do not shift
            resolved.push_str(line_terminator(line));
        } else {
            resolved.push_str(&substitute(line, index + 1, symbol, &values)?);
        }
    }

    info!("Resolved {} placeholder(s)", values.len());
    Ok(resolved)
}

fn line_terminator(line: &str) -> &str {
    if line.ends_with("\r\n") {
        "\r\n"
    } else if line.ends_with('\n') {
        "\n"
    } else {
        ""
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// True if `name` sits at the start of `text` and ends on an identifier boundary
fn matches_at(text: &str, name: &str) -> bool {
    text.starts_with(name)
        && (!name.ends_with(is_ident_char) || !text[name.len()..].starts_with(is_ident_char))
}

/// Single left-to-right pass over one template line; substituted values are
/// never rescanned
///
/// An unmatched `symbol` followed by a letter or `_` is an undeclared
/// placeholder. Anything else after the symbol (`$5`, a lone `$`) is kept as is.
fn substitute(
    text: &str,
    line: usize,
    symbol: char,
    values: &[(String, String)],
) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find(symbol) {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + symbol.len_utf8()..];
        match values.iter().find(|(name, _)| matches_at(after, name)) {
            Some((name, value)) => {
                out.push_str(value);
                rest = &after[name.len()..];
            }
            None if after.starts_with(|c: char| c.is_alphabetic() || c == '_') => {
                let name: String = after.chars().take_while(|c| is_ident_char(*c)).collect();
                return Err(Error::UnresolvedPlaceholder { line, name });
            }
            None => {
                out.push(symbol);
                rest = after;
            }
        }
    }
    out.push_str(rest);
    Ok(out)
}
