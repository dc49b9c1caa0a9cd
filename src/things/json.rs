//! Things JSON import schema
//!
//! Shapes follow the `things:///json` command: every item is an object with
//! a `type` and an `attributes` map.

use super::dates::compute_date;
use crate::outline::{DUE_TAG, Node, NodeKind, Outline, START_TAG};
use serde::Serialize;
use tracing::warn;

/// One item of a Things JSON import
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "attributes", rename_all = "kebab-case")]
pub enum ThingsItem {
    Project(ProjectAttributes),
    #[serde(rename = "to-do")]
    ToDo(ToDoAttributes),
    Heading(TitleAttributes),
    ChecklistItem(TitleAttributes),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectAttributes {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub when: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// To-dos and headings, in order; to-dos after a heading are grouped under it
    pub items: Vec<ThingsItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToDoAttributes {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub when: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(rename = "checklist-items")]
    pub checklist_items: Vec<ThingsItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TitleAttributes {
    pub title: String,
}

/// Convert every top-level project of the outline
pub fn to_json(outline: &Outline) -> Vec<ThingsItem> {
    outline.projects().iter().map(project_item).collect()
}

/// Convert a single project node and its subtree
pub fn project_item(node: &Node) -> ThingsItem {
    let mut items = Vec::new();
    collect_items(&node.children, &mut items);
    ThingsItem::Project(ProjectAttributes {
        title: node.title.clone(),
        notes: node.note.clone(),
        when: node.start().map(compute_date),
        deadline: node.due().map(compute_date),
        tags: plain_tags(node),
        items,
    })
}

/// Things has no nested headings, so a heading's subtree is flattened after it
fn collect_items(children: &[Node], items: &mut Vec<ThingsItem>) {
    for child in children {
        match child.kind {
            NodeKind::Task => items.push(to_do_item(child)),
            NodeKind::Heading => {
                items.push(ThingsItem::Heading(TitleAttributes {
                    title: child.title.clone(),
                }));
                collect_items(&child.children, items);
            }
            kind => warn!(%kind, title = %child.title, "Skipping item that cannot sit in a project"),
        }
    }
}

fn to_do_item(node: &Node) -> ThingsItem {
    let checklist_items = node
        .children_of_kind(NodeKind::ChecklistItem)
        .map(|c| {
            ThingsItem::ChecklistItem(TitleAttributes {
                title: c.title.clone(),
            })
        })
        .collect();
    ThingsItem::ToDo(ToDoAttributes {
        title: node.title.clone(),
        notes: node.note.clone(),
        when: node.start().map(compute_date),
        deadline: node.due().map(compute_date),
        tags: plain_tags(node),
        checklist_items,
    })
}

/// Tag names other than `@start` and `@due`; values are dropped
fn plain_tags(node: &Node) -> Vec<String> {
    node.tags
        .keys()
        .filter(|name| *name != START_TAG && *name != DUE_TAG)
        .cloned()
        .collect()
}
