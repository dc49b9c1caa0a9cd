//! popthings Library
//!
//! Imports a TaskPaper template with placeholders into Things as projects,
//! headings, to-dos and checklist items.
//!
//! # Architecture
//!
//! The library is a short pipeline:
//! - **Placeholder layer**: `placeholder` - collects `$name` values and substitutes them
//! - **Outline layer**: `outline` - parses the tab-indented text into a tree
//! - **Export layer**: `things` - renders the tree as a Things JSON import URL
//!
//! # Template format
//!
//! - Indentation must be done with tabs.
//! - Placeholders are declared on the second line with a `$` prefix,
//!   space-separated.
//! - `@start` and `@due` need a value and become the "when" and "deadline"
//!   of a project or to-do. Other tags are passed through, values ignored.
//! - A project under a project is a heading. It cannot hold notes.
//! - A task under a task is a checklist item.
//!
//! ```text
//! Project 1:
//! 	$due $start $where
//! 	Note under project 1
//! 	- Task 1 @due($start + 7) @$where
//! 		A note under task 1
//! 	- Task 2 @start($start)
//! 		- Checklist item under task 2
//! 	Heading 1:
//! 		- Task under heading 1
//! ```
//!
//! # Example
//!
//! ```
//! use popthings::{ParseOptions, ScriptedValues, parse_template, things};
//!
//! # fn main() -> popthings::Result<()> {
//! let template = "Trip to $city:\n\t$city\n\t- Book hotel in $city";
//! let mut values = ScriptedValues::new([("city", "Paris")]);
//! let outline = parse_template(template, &mut values, '$', &ParseOptions::default())?;
//! assert_eq!(outline.root().title, "Trip to Paris");
//!
//! let url = things::build_url(&things::to_json(&outline)).unwrap();
//! assert!(url.starts_with("things:///json?data="));
//! # Ok(())
//! # }
//! ```

pub mod config;
mod error;
pub mod outline;
pub mod placeholder;
mod prompt;
pub mod things;

pub use config::Config;
pub use error::{Error, Result};
pub use outline::{
    ChecklistNesting, Node, NodeKind, Outline, ParseOptions, Tags, parse_outline,
    parse_outline_with,
};
pub use placeholder::{
    ScriptedValues, ValueSource, find_placeholders, resolve_placeholders,
    resolve_placeholders_with,
};
pub use prompt::StdinPrompt;

use tracing::info;

/// Resolve placeholders in `template`, then parse the result
///
/// `source` is asked once per placeholder declared on the second line.
pub fn parse_template(
    template: &str,
    source: &mut dyn ValueSource,
    symbol: char,
    options: &ParseOptions,
) -> Result<Outline> {
    let text = resolve_placeholders_with(template, symbol, source)?;
    let outline = parse_outline_with(&text, options)?;
    info!(
        projects = outline.projects().len(),
        root = %outline.root().title,
        "Parsed template"
    );
    Ok(outline)
}
