//! TaskPaper outline parsing
//!
//! This module turns a placeholder-free TaskPaper document into a tree of
//! projects, headings, tasks and checklist items.
//! - `line`: line shapes, indentation depth and tag extraction
//! - `node`: the tree model (`Node`, `NodeKind`, `Outline`)
//! - `builder`: depth-stack tree construction and classification

mod builder;
mod line;
mod node;

pub use builder::{ChecklistNesting, ParseOptions, parse_outline, parse_outline_with};
pub use node::{DUE_TAG, Node, NodeKind, Outline, START_TAG, Tags};
