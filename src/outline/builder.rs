//! Tree construction from classified lines
//!
//! Nodes live in an arena while the document is read; a stack holds the open
//! entry at each depth, so every line finds its parent in constant time.
//! Once all lines are consumed the arena is folded into owned [`Node`]s.

use super::line::{Line, Shape, classify_line};
use super::node::{DUE_TAG, Node, NodeKind, Outline, START_TAG, Tags};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// What to do with a task nested under a checklist item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChecklistNesting {
    /// Attach it as a further checklist item of the same task
    #[default]
    Flatten,
    /// Fail with `Error::InvalidNesting`
    Reject,
}

/// Parser settings
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    pub checklist_nesting: ChecklistNesting,
}

/// Parse a placeholder-free TaskPaper document with default options
pub fn parse_outline(text: &str) -> Result<Outline> {
    parse_outline_with(text, &ParseOptions::default())
}

/// Parse a placeholder-free TaskPaper document
///
/// # Errors
/// The first structural problem aborts the parse; see [`Error`] for the
/// variants. All of them carry the offending line number.
pub fn parse_outline_with(text: &str, options: &ParseOptions) -> Result<Outline> {
    let mut builder = TreeBuilder::new(options);
    for (index, raw) in text.lines().enumerate() {
        match classify_line(raw, index + 1) {
            Some(line) => builder.push_line(line)?,
            None => trace!(line = index + 1, "Skipping blank line"),
        }
    }
    builder.finish()
}

#[derive(Debug)]
struct ArenaNode {
    kind: NodeKind,
    title: String,
    tags: Tags,
    note: Option<String>,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// Entry open at a given depth
#[derive(Debug, Clone, Copy)]
enum Open {
    Node(usize),
    /// A note line; deeper lines continue the note of `holder`
    Note { holder: usize },
}

struct TreeBuilder<'o> {
    options: &'o ParseOptions,
    arena: Vec<ArenaNode>,
    roots: Vec<usize>,
    stack: Vec<Open>,
    /// Most recently declared project or task
    last_holder: Option<usize>,
}

impl<'o> TreeBuilder<'o> {
    fn new(options: &'o ParseOptions) -> Self {
        Self {
            options,
            arena: Vec::new(),
            roots: Vec::new(),
            stack: Vec::new(),
            last_holder: None,
        }
    }

    fn push_line(&mut self, line: Line<'_>) -> Result<()> {
        if self.roots.is_empty() {
            return self.push_root(line);
        }

        let expected_max = self.stack.len();
        if line.depth > expected_max {
            return Err(Error::MalformedIndentation {
                line: line.number,
                depth: line.depth,
                expected_max,
            });
        }
        self.stack.truncate(line.depth);

        let parent = if line.depth == 0 {
            if line.shape == Shape::Project {
                return self.push_root(line);
            }
            // Unindented lines belong to the most recent top-level project
            Open::Node(self.roots[self.roots.len() - 1])
        } else {
            self.stack[line.depth - 1]
        };

        let parent_id = match parent {
            Open::Note { holder } => {
                self.append_note(holder, &line);
                self.stack.push(Open::Note { holder });
                return Ok(());
            }
            Open::Node(id) => id,
        };

        let kind = match (line.shape, self.arena[parent_id].kind) {
            (Shape::Task, NodeKind::Project | NodeKind::Heading) => Some(NodeKind::Task),
            (Shape::Task, NodeKind::Task) => Some(NodeKind::ChecklistItem),
            (Shape::Task, NodeKind::ChecklistItem) => match self.options.checklist_nesting {
                ChecklistNesting::Flatten => Some(NodeKind::ChecklistItem),
                ChecklistNesting::Reject => {
                    return Err(Error::InvalidNesting { line: line.number });
                }
            },
            (Shape::Project, NodeKind::Project | NodeKind::Heading) => Some(NodeKind::Heading),
            _ => None,
        };

        match kind {
            Some(kind) => {
                let attach_to = if self.arena[parent_id].kind == NodeKind::ChecklistItem {
                    // Flattened: hang it on the checklist item's task
                    self.arena[parent_id].parent.unwrap_or(parent_id)
                } else {
                    parent_id
                };
                let id = self.add_node(kind, line, Some(attach_to))?;
                self.stack.push(Open::Node(id));
            }
            None => {
                let holder = self.note_holder(parent_id);
                self.append_note(holder, &line);
                self.stack.push(Open::Note { holder });
            }
        }
        Ok(())
    }

    /// First line of the document, or a later top-level project line
    fn push_root(&mut self, line: Line<'_>) -> Result<()> {
        if self.roots.is_empty() && (line.depth > 0 || line.shape == Shape::Task) {
            return Err(Error::RootNotProject { line: line.number });
        }
        let id = self.add_node(NodeKind::Project, line, None)?;
        self.roots.push(id);
        self.stack.clear();
        self.stack.push(Open::Node(id));
        Ok(())
    }

    fn add_node(&mut self, kind: NodeKind, line: Line<'_>, parent: Option<usize>) -> Result<usize> {
        for tag in [START_TAG, DUE_TAG] {
            if let Some(value) = line.tags.get(tag)
                && value.as_deref().is_none_or(str::is_empty)
            {
                return Err(Error::MissingTagValue {
                    line: line.number,
                    tag: tag.to_string(),
                });
            }
        }

        let id = self.arena.len();
        debug!(
            line = line.number,
            depth = line.depth,
            %kind,
            title = %line.title,
            parent = ?parent.map(|p| &self.arena[p].title),
            "Adding node"
        );
        self.arena.push(ArenaNode {
            kind,
            title: line.title,
            tags: line.tags,
            note: None,
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.arena[parent].children.push(id);
        }
        if kind.accepts_note() {
            self.last_holder = Some(id);
        }
        Ok(id)
    }

    /// Node that receives a note line whose structural parent is `parent`
    ///
    /// Headings cannot hold notes: a comment under a heading goes to the
    /// task or project declared just before it.
    fn note_holder(&self, parent: usize) -> usize {
        if self.arena[parent].kind == NodeKind::Heading
            && let Some(holder) = self.last_holder
        {
            return holder;
        }
        let mut current = parent;
        while !self.arena[current].kind.accepts_note() {
            match self.arena[current].parent {
                Some(up) => current = up,
                None => break,
            }
        }
        current
    }

    fn append_note(&mut self, holder: usize, line: &Line<'_>) {
        debug!(
            line = line.number,
            holder = %self.arena[holder].title,
            "Appending note"
        );
        let note = &mut self.arena[holder].note;
        match note {
            Some(existing) => {
                existing.push('\n');
                existing.push_str(line.text);
            }
            None => *note = Some(line.text.to_string()),
        }
    }

    fn finish(mut self) -> Result<Outline> {
        if self.roots.is_empty() {
            return Err(Error::EmptyDocument);
        }
        let roots = std::mem::take(&mut self.roots);
        let projects = roots
            .into_iter()
            .map(|id| self.take_node(id))
            .collect();
        Ok(Outline::new(projects))
    }

    fn take_node(&mut self, id: usize) -> Node {
        let children = std::mem::take(&mut self.arena[id].children);
        let children = children.into_iter().map(|c| self.take_node(c)).collect();
        let node = &mut self.arena[id];
        Node {
            kind: node.kind,
            title: std::mem::take(&mut node.title),
            tags: std::mem::take(&mut node.tags),
            note: node.note.take(),
            children,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reject() -> ParseOptions {
        ParseOptions {
            checklist_nesting: ChecklistNesting::Reject,
        }
    }

    #[test]
    fn test_first_line_is_root_project() {
        let outline = parse_outline("Errands:\n\t- Buy milk").unwrap();
        let root = outline.root();
        assert_eq!(root.kind, NodeKind::Project);
        assert_eq!(root.title, "Errands");
        assert_eq!(root.children[0].kind, NodeKind::Task);
        assert_eq!(root.children[0].title, "Buy milk");
    }

    #[test]
    fn test_root_colon_is_optional() {
        let outline = parse_outline("Errands\n\t- Buy milk").unwrap();
        assert_eq!(outline.root().title, "Errands");
    }

    #[test]
    fn test_task_first_line_is_rejected() {
        let err = parse_outline("- Buy milk\n\t- Eggs").unwrap_err();
        assert!(matches!(err, Error::RootNotProject { line: 1 }));
    }

    #[test]
    fn test_indented_first_line_is_rejected() {
        let err = parse_outline("\n\tErrands:").unwrap_err();
        assert!(matches!(err, Error::RootNotProject { line: 2 }));
    }

    #[test]
    fn test_empty_document() {
        assert!(matches!(
            parse_outline("\n\t\n").unwrap_err(),
            Error::EmptyDocument
        ));
    }

    #[test]
    fn test_indentation_jump_is_rejected() {
        let err = parse_outline("P:\n\t- a\n\t\t\t- b").unwrap_err();
        match err {
            Error::MalformedIndentation {
                line,
                depth,
                expected_max,
            } => {
                assert_eq!(line, 3);
                assert_eq!(depth, 3);
                assert_eq!(expected_max, 2);
            }
            other => panic!("expected MalformedIndentation, got {:?}", other),
        }
    }

    #[test]
    fn test_project_under_project_is_heading() {
        let outline = parse_outline("P:\n\tH:\n\t\t- t").unwrap();
        let heading = &outline.root().children[0];
        assert_eq!(heading.kind, NodeKind::Heading);
        assert_eq!(heading.title, "H");
        assert_eq!(heading.children[0].kind, NodeKind::Task);
    }

    #[test]
    fn test_task_under_task_is_checklist_item() {
        let outline = parse_outline("P:\n\t- t\n\t\t- c1\n\t\t- c2").unwrap();
        let task = &outline.root().children[0];
        assert_eq!(task.kind, NodeKind::Task);
        let titles: Vec<_> = task.children.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["c1", "c2"]);
        assert!(task.children.iter().all(|c| c.kind == NodeKind::ChecklistItem));
    }

    #[test]
    fn test_deep_checklist_flattens_by_default() {
        let outline = parse_outline("P:\n\t- t\n\t\t- c1\n\t\t\t- c2\n\t\t- c3").unwrap();
        let task = &outline.root().children[0];
        let titles: Vec<_> = task.children.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["c1", "c2", "c3"]);
        assert!(task.children.iter().all(|c| c.children.is_empty()));
    }

    #[test]
    fn test_deep_checklist_rejected_when_configured() {
        let err = parse_outline_with("P:\n\t- t\n\t\t- c1\n\t\t\t- c2", &reject()).unwrap_err();
        assert!(matches!(err, Error::InvalidNesting { line: 4 }));
    }

    #[test]
    fn test_notes_attach_to_project_and_task() {
        let text = "P:\n\tAbout the project\n\t- t\n\t\tfirst\n\t\tsecond";
        let outline = parse_outline(text).unwrap();
        let root = outline.root();
        assert_eq!(root.note.as_deref(), Some("About the project"));
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].note.as_deref(), Some("first\nsecond"));
    }

    #[test]
    fn test_note_under_checklist_item_goes_to_task() {
        let outline = parse_outline("P:\n\t- t\n\t\t- c\n\t\t\tremember").unwrap();
        let task = &outline.root().children[0];
        assert_eq!(task.note.as_deref(), Some("remember"));
        assert!(task.children[0].note.is_none());
    }

    #[test]
    fn test_heading_comment_goes_to_prior_sibling_task() {
        let text = "P:\n\t- before\n\tH:\n\t\tcomment\n\t\t- inside";
        let outline = parse_outline(text).unwrap();
        let root = outline.root();
        let heading = root.child("H").unwrap();
        assert!(heading.note.is_none());
        assert_eq!(root.child("before").unwrap().note.as_deref(), Some("comment"));
        assert_eq!(heading.children.len(), 1);
    }

    #[test]
    fn test_heading_comment_without_prior_task_goes_to_project() {
        let outline = parse_outline("P:\n\tH:\n\t\tcomment").unwrap();
        assert_eq!(outline.root().note.as_deref(), Some("comment"));
    }

    #[test]
    fn test_project_line_under_task_is_note() {
        let outline = parse_outline("P:\n\t- t\n\t\tSee also:").unwrap();
        let task = &outline.root().children[0];
        assert_eq!(task.note.as_deref(), Some("See also:"));
        assert!(task.children.is_empty());
    }

    #[test]
    fn test_lines_under_note_continue_it() {
        let text = "P:\n\t- t\n\t\tLinks\n\t\t\thttp://example.com\n\t\t\t- not a task";
        let outline = parse_outline(text).unwrap();
        let task = &outline.root().children[0];
        assert_eq!(
            task.note.as_deref(),
            Some("Links\nhttp://example.com\n- not a task")
        );
        assert!(task.children.is_empty());
    }

    #[test]
    fn test_notes_keep_tag_text() {
        let outline = parse_outline("P:\n\t- t\n\t\tping @bob(later)").unwrap();
        assert_eq!(
            outline.root().children[0].note.as_deref(),
            Some("ping @bob(later)")
        );
    }

    #[test]
    fn test_start_and_due_need_values() {
        let err = parse_outline("P:\n\t- t @due").unwrap_err();
        match err {
            Error::MissingTagValue { line, tag } => {
                assert_eq!(line, 2);
                assert_eq!(tag, "due");
            }
            other => panic!("expected MissingTagValue, got {:?}", other),
        }
        assert!(matches!(
            parse_outline("P: @start()").unwrap_err(),
            Error::MissingTagValue { line: 1, .. }
        ));
    }

    #[test]
    fn test_other_tags_need_no_value() {
        let outline = parse_outline("P:\n\t- t @errand @where(home)").unwrap();
        let task = &outline.root().children[0];
        assert!(task.has_tag("errand"));
        assert_eq!(task.tag("where"), Some("home"));
    }

    #[test]
    fn test_multiple_top_level_projects() {
        let text = "Project 1:\n\t- a\nProject 2:\n\t- b\n\tHeading 2:\n\t- c";
        let outline = parse_outline(text).unwrap();
        let titles: Vec<_> = outline.projects().iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Project 1", "Project 2"]);

        let second = &outline.projects()[1];
        let kinds: Vec<_> = second.children.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![NodeKind::Task, NodeKind::Heading, NodeKind::Task]
        );
    }

    #[test]
    fn test_unindented_tasks_belong_to_last_project() {
        let outline = parse_outline("P:\n- a\n\t- sub").unwrap();
        let task = &outline.root().children[0];
        assert_eq!(task.title, "a");
        assert_eq!(task.kind, NodeKind::Task);
        assert_eq!(task.children[0].kind, NodeKind::ChecklistItem);
    }

    #[test]
    fn test_dedent_returns_to_outer_level() {
        let text = "P:\n\tH1:\n\t\t- a\n\t\t\t- a1\n\tH2:\n\t\t- b";
        let outline = parse_outline(text).unwrap();
        let root = outline.root();
        assert_eq!(root.child("H1").unwrap().children.len(), 1);
        assert_eq!(root.child("H2").unwrap().child("b").unwrap().kind, NodeKind::Task);
    }

    #[test]
    fn test_blank_lines_do_not_break_nesting() {
        let outline = parse_outline("P:\n\n\t- t\n\n\t\t- c\n").unwrap();
        let task = &outline.root().children[0];
        assert_eq!(task.children[0].title, "c");
    }
}
