use std::collections::BTreeMap;
use std::fmt;

/// Tag name → optional value, e.g. `@due(2018-09-10)` → `("due", Some("2018-09-10"))`
pub type Tags = BTreeMap<String, Option<String>>;

/// Tag holding the start ("when") date
pub const START_TAG: &str = "start";
/// Tag holding the deadline
pub const DUE_TAG: &str = "due";

/// Kind of an outline node, decided once while the tree is built
///
/// The same line shape means different things depending on where it sits:
/// a `Name:` line is a project at the top level but a heading under a
/// project, and a `- item` line is a task under a project but a checklist
/// item under a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Top-level project
    Project,
    /// Project line nested under a project; groups tasks, never holds a note
    Heading,
    /// To-do under a project or heading
    Task,
    /// Task nested under a task
    ChecklistItem,
}

impl NodeKind {
    /// Only projects and tasks can carry a note
    pub fn accepts_note(self) -> bool {
        matches!(self, NodeKind::Project | NodeKind::Task)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Project => "project",
            NodeKind::Heading => "heading",
            NodeKind::Task => "task",
            NodeKind::ChecklistItem => "checklist-item",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node of the parsed outline
///
/// Depth is not stored: nesting is expressed by ownership of `children`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    /// Line text without the task marker, trailing colon and tags
    pub title: String,
    pub tags: Tags,
    /// Newline-joined note lines; always `None` for headings and checklist items
    pub note: Option<String>,
    pub children: Vec<Node>,
}

impl Node {
    /// Create a childless node without tags or note
    pub fn new(kind: NodeKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            tags: Tags::new(),
            note: None,
            children: Vec::new(),
        }
    }

    /// Value of tag `name`; `None` if the tag is absent or has no value
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags.get(name).and_then(|v| v.as_deref())
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.contains_key(name)
    }

    /// Value of the `@start` tag
    pub fn start(&self) -> Option<&str> {
        self.tag(START_TAG)
    }

    /// Value of the `@due` tag
    pub fn due(&self) -> Option<&str> {
        self.tag(DUE_TAG)
    }

    /// First direct child with the given title
    pub fn child(&self, title: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.title == title)
    }

    /// First node with the given title in this subtree, depth first
    pub fn find(&self, title: &str) -> Option<&Node> {
        if self.title == title {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(title))
    }

    /// Direct children of the given kind
    pub fn children_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &Node> {
        self.children.iter().filter(move |c| c.kind == kind)
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, level: usize) -> fmt::Result {
        let pad = "  ".repeat(level);
        write!(f, "{}[{}] {}", pad, self.kind, self.title)?;
        for (name, value) in &self.tags {
            match value {
                Some(v) => write!(f, " @{}({})", name, v)?,
                None => write!(f, " @{}", name)?,
            }
        }
        writeln!(f)?;
        if let Some(note) = &self.note {
            for line in note.lines() {
                writeln!(f, "{}  | {}", pad, line)?;
            }
        }
        for child in &self.children {
            child.write_indented(f, level + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}

/// Parsed document: the root project plus any further top-level projects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outline {
    projects: Vec<Node>,
}

impl Outline {
    pub(crate) fn new(projects: Vec<Node>) -> Self {
        debug_assert!(!projects.is_empty());
        Self { projects }
    }

    /// The project declared on the first line of the document
    pub fn root(&self) -> &Node {
        &self.projects[0]
    }

    /// All top-level projects in document order
    pub fn projects(&self) -> &[Node] {
        &self.projects
    }
}

impl fmt::Display for Outline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for project in &self.projects {
            write!(f, "{}", project)?;
        }
        Ok(())
    }
}
