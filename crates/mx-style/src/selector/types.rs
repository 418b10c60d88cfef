//! Selector type definitions.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::rules::DeclarationTable;

/// Index of a [`Selector`] inside a [`SelectorArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SelectorId(u32);

impl SelectorId {
    /// The arena slot this id refers to.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Type selector - matches the widget type name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeSelector {
    /// Universal selector (*) - matches any widget.
    Universal,
    /// Named type (e.g., "Button", "MxLabel").
    Named(String),
}

/// How a selector is linked to the selector on its left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combinator {
    /// Descendant combinator (whitespace): any ancestor.
    Descendant,
    /// Child combinator (>): the direct parent only.
    Child,
}

/// A simple selector with its optional link to the selector on its left.
///
/// `Button.danger`, `#submit`, `*:hover` and `MxFrame > MxLabel` (where the
/// `MxLabel` selector holds a `parent` link to `MxFrame`) are all selectors.
/// Only the rightmost selector of a chain carries the declaration block.
#[derive(Debug, Clone, Default)]
pub struct Selector {
    /// Type constraint, `None` when the selector starts with `#`, `.` or `:`.
    pub type_selector: Option<TypeSelector>,
    /// ID constraint (#id).
    pub id: Option<String>,
    /// Class constraint (.class).
    pub class: Option<String>,
    /// Pseudo-class constraint; several pseudo-classes are joined with ':'.
    pub pseudo_class: Option<String>,
    /// Child-combinator link.
    pub parent: Option<SelectorId>,
    /// Descendant-combinator link.
    pub ancestor: Option<SelectorId>,
    /// The declaration block shared by every selector of the same rule.
    pub declarations: Option<Arc<DeclarationTable>>,
    /// The file this selector was parsed from.
    pub origin: Option<Arc<Path>>,
}

impl Selector {
    /// Create an empty selector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a type selector.
    pub fn type_selector(widget_type: impl Into<String>) -> Self {
        Self {
            type_selector: Some(TypeSelector::Named(widget_type.into())),
            ..Default::default()
        }
    }

    /// Create a universal selector (*).
    pub fn universal() -> Self {
        Self {
            type_selector: Some(TypeSelector::Universal),
            ..Default::default()
        }
    }

    /// Add an ID constraint.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Add a class constraint.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Add a pseudo-class constraint, joining it to any existing one.
    pub fn with_pseudo_class(mut self, pseudo_class: impl AsRef<str>) -> Self {
        let pseudo_class = pseudo_class.as_ref();
        self.pseudo_class = Some(match self.pseudo_class.take() {
            Some(existing) => format!("{}:{}", existing, pseudo_class),
            None => pseudo_class.to_string(),
        });
        self
    }

    /// Returns `true` if nothing has been added to this selector yet.
    pub fn is_empty(&self) -> bool {
        self.type_selector.is_none()
            && self.id.is_none()
            && self.class.is_none()
            && self.pseudo_class.is_none()
    }

    /// The named type, if the selector has one (`*` is not a name).
    pub fn type_name(&self) -> Option<&str> {
        match &self.type_selector {
            Some(TypeSelector::Named(name)) => Some(name),
            _ => None,
        }
    }
}

/// Owner of every selector parsed into a stylesheet.
///
/// Chain links are indices into the arena, so a chain of any depth is
/// released with the arena in one pass.
#[derive(Debug, Clone, Default)]
pub struct SelectorArena {
    nodes: Vec<Selector>,
}

impl SelectorArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move a selector into the arena.
    pub fn push(&mut self, selector: Selector) -> SelectorId {
        let id = SelectorId(self.nodes.len() as u32);
        self.nodes.push(selector);
        id
    }

    /// Look up a selector.
    ///
    /// Ids are only ever produced by [`push`](Self::push) on the same arena.
    pub fn get(&self, id: SelectorId) -> &Selector {
        &self.nodes[id.index()]
    }

    /// Look up a selector for modification.
    pub fn get_mut(&mut self, id: SelectorId) -> &mut Selector {
        &mut self.nodes[id.index()]
    }

    /// Number of selectors, chain links included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the arena is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drop every selector pushed after `len` was observed.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.nodes.truncate(len);
    }

    /// Wrap a selector id for display (`MxFrame > MxLabel.title`).
    pub fn display(&self, id: SelectorId) -> SelectorDisplay<'_> {
        SelectorDisplay { arena: self, id }
    }
}

/// Formats a selector chain from its arena.
pub struct SelectorDisplay<'a> {
    arena: &'a SelectorArena,
    id: SelectorId,
}

impl fmt::Display for SelectorDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let selector = self.arena.get(self.id);

        if let Some(ancestor) = selector.ancestor {
            write!(f, "{} ", self.arena.display(ancestor))?;
        }
        if let Some(parent) = selector.parent {
            write!(f, "{} > ", self.arena.display(parent))?;
        }

        match &selector.type_selector {
            Some(TypeSelector::Universal) => write!(f, "*")?,
            Some(TypeSelector::Named(name)) => write!(f, "{}", name)?,
            None => {}
        }
        if let Some(class) = &selector.class {
            write!(f, ".{}", class)?;
        }
        if let Some(id) = &selector.id {
            write!(f, "#{}", id)?;
        }
        if let Some(pseudo_class) = &selector.pseudo_class {
            write!(f, ":{}", pseudo_class)?;
        }

        Ok(())
    }
}
