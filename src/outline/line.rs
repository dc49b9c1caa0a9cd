//! Line classification and tag extraction
//!
//! A line's shape only depends on its own text; what the line becomes in the
//! tree (project, heading, task, checklist item or note) is decided later by
//! the builder from the shape and the line's parent.

use super::node::Tags;
use once_cell::sync::Lazy;
use regex::Regex;

/// `@name` or `@name(value)` at the start of the text or after whitespace
static TAG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|\s)@([\w-]+)(?:\(([^)]*)\))?").unwrap());

/// Textual shape of a line, before context is taken into account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Shape {
    /// `- text`
    Task,
    /// `text:` once tags are stripped
    Project,
    /// Anything else
    Note,
}

/// One non-blank line of the document
#[derive(Debug, Clone)]
pub(crate) struct Line<'a> {
    /// 1-based physical line number
    pub number: usize,
    /// Count of leading tabs
    pub depth: usize,
    pub shape: Shape,
    /// Line without leading tabs and trailing whitespace, used verbatim for notes
    pub text: &'a str,
    /// Title with marker, trailing colon and tags removed
    pub title: String,
    pub tags: Tags,
}

/// Classify a raw line; returns `None` for blank lines
pub(crate) fn classify_line(raw: &str, number: usize) -> Option<Line<'_>> {
    let text = raw.trim_start_matches('\t');
    let depth = raw.len() - text.len();
    let text = text.trim_end();
    if text.trim_start().is_empty() {
        return None;
    }

    let (shape, title, tags) = if let Some(rest) = text.strip_prefix("- ") {
        let (title, tags) = split_tags(rest);
        (Shape::Task, title, tags)
    } else {
        let (title, tags) = split_tags(text);
        match title.strip_suffix(':') {
            Some(stripped) => (Shape::Project, stripped.trim_end().to_string(), tags),
            None => (Shape::Note, title, tags),
        }
    };

    Some(Line {
        number,
        depth,
        shape,
        text,
        title,
        tags,
    })
}

/// Remove tags from `text`, returning the remaining title and the tags found
///
/// A candidate only counts as a tag when it is followed by whitespace or the
/// end of the line, so `@home,` or `me@example.com` stay in the title.
/// A repeated tag keeps its last value.
pub(crate) fn split_tags(text: &str) -> (String, Tags) {
    let mut tags = Tags::new();
    let mut title = String::with_capacity(text.len());
    let mut last = 0;

    for caps in TAG_REGEX.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let followed_by_space = text[whole.end()..]
            .chars()
            .next()
            .is_none_or(char::is_whitespace);
        if !followed_by_space {
            continue;
        }
        let name = caps[1].to_string();
        let value = caps.get(2).map(|m| m.as_str().trim().to_string());
        tags.insert(name, value);
        title.push_str(&text[last..whole.start()]);
        last = whole.end();
    }
    title.push_str(&text[last..]);

    (title.trim().to_string(), tags)
}
