//! Selector matching algorithm.

use std::fmt::Write as _;

use super::{Selector, SelectorArena, SelectorId, Specificity, TypeSelector};

/// The style-relevant identity of a widget.
///
/// Implemented by the widget layer; the style engine only reads it.
pub trait StyleNode {
    /// Widget type name (e.g., "MxButton").
    fn type_name(&self) -> &str;

    /// Widget name, matched by `#id` selectors.
    fn style_id(&self) -> Option<&str>;

    /// Style class, matched by `.class` selectors.
    fn style_class(&self) -> Option<&str>;

    /// Pseudo-class, matched by `:pseudo` selectors.
    fn style_pseudo_class(&self) -> Option<&str>;

    /// The enclosing stylable node, if any.
    fn style_parent(&self) -> Option<&dyn StyleNode>;

    /// Serialize everything selectors can match on into a cache key.
    ///
    /// Ancestors come first, root-most first, each as `Type#id.class:pseudo>`,
    /// followed by the node itself as `Type#id.class:pseudo`.
    fn style_string(&self) -> String {
        let mut string = match self.style_parent() {
            Some(parent) => {
                let mut string = parent.style_string();
                string.push('>');
                string
            }
            None => String::with_capacity(64),
        };

        let _ = write!(
            string,
            "{}#{}.{}:{}",
            self.type_name(),
            self.style_id().unwrap_or(""),
            self.style_class().unwrap_or(""),
            self.style_pseudo_class().unwrap_or(""),
        );

        string
    }
}

/// Human-readable `Type.class#id:pseudo` form of a node, for logging.
pub fn describe_node<N: StyleNode + ?Sized>(node: &N) -> String {
    let mut out = node.type_name().to_string();
    if let Some(class) = node.style_class() {
        let _ = write!(out, ".{}", class);
    }
    if let Some(id) = node.style_id() {
        let _ = write!(out, "#{}", id);
    }
    if let Some(pseudo_class) = node.style_pseudo_class() {
        let _ = write!(out, ":{}", pseudo_class);
    }
    out
}

/// A borrowed, free-standing [`StyleNode`].
///
/// Handy for widgets that keep their identity in plain fields, and for tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct WidgetMatchContext<'a> {
    /// Widget type name (e.g., "Button", "Label").
    pub widget_type: &'a str,
    /// Widget name/ID (for #id selectors).
    pub widget_name: Option<&'a str>,
    /// Widget's style class.
    pub style_class: Option<&'a str>,
    /// Widget's pseudo-class.
    pub pseudo_class: Option<&'a str>,
    /// The enclosing widget.
    pub parent: Option<&'a WidgetMatchContext<'a>>,
}

impl<'a> WidgetMatchContext<'a> {
    /// Create a context for a widget type.
    pub fn new(widget_type: &'a str) -> Self {
        Self {
            widget_type,
            ..Default::default()
        }
    }

    /// Set the widget name.
    pub fn with_name(mut self, name: &'a str) -> Self {
        self.widget_name = Some(name);
        self
    }

    /// Set the style class.
    pub fn with_class(mut self, class: &'a str) -> Self {
        self.style_class = Some(class);
        self
    }

    /// Set the pseudo-class.
    pub fn with_pseudo_class(mut self, pseudo_class: &'a str) -> Self {
        self.pseudo_class = Some(pseudo_class);
        self
    }

    /// Set the enclosing widget.
    pub fn with_parent(mut self, parent: &'a WidgetMatchContext<'a>) -> Self {
        self.parent = Some(parent);
        self
    }
}

impl StyleNode for WidgetMatchContext<'_> {
    fn type_name(&self) -> &str {
        self.widget_type
    }

    fn style_id(&self) -> Option<&str> {
        self.widget_name
    }

    fn style_class(&self) -> Option<&str> {
        self.style_class
    }

    fn style_pseudo_class(&self) -> Option<&str> {
        self.pseudo_class
    }

    fn style_parent(&self) -> Option<&dyn StyleNode> {
        self.parent.map(|p| p as &dyn StyleNode)
    }
}

/// Selector matching engine.
pub struct SelectorMatcher;

impl SelectorMatcher {
    /// Score a selector chain against a node.
    ///
    /// Returns [`Specificity::ZERO`] when any constraint fails. A `parent`
    /// link must score above zero on the node's parent; an `ancestor` link
    /// must score above zero on some ancestor, nearest first.
    pub fn score<N: StyleNode + ?Sized>(
        arena: &SelectorArena,
        id: SelectorId,
        node: &N,
    ) -> Specificity {
        let selector = arena.get(id);

        if let Some(parent_id) = selector.parent {
            match node.style_parent() {
                Some(parent) if Self::score(arena, parent_id, parent).is_match() => {}
                _ => return Specificity::ZERO,
            }
        }

        if !Self::part_matches(selector, node) {
            return Specificity::ZERO;
        }

        if let Some(ancestor_id) = selector.ancestor
            && !Self::has_matching_ancestor(arena, ancestor_id, node)
        {
            return Specificity::ZERO;
        }

        Specificity::of_selector(selector)
    }

    /// Check the selector's own type/id/class/pseudo-class constraints.
    pub fn part_matches<N: StyleNode + ?Sized>(selector: &Selector, node: &N) -> bool {
        // A type mismatch fails before anything else is looked at.
        match &selector.type_selector {
            None | Some(TypeSelector::Universal) => {}
            Some(TypeSelector::Named(name)) => {
                if name != node.type_name() {
                    return false;
                }
            }
        }

        if let Some(id) = &selector.id
            && node.style_id() != Some(id.as_str())
        {
            return false;
        }

        if let Some(class) = &selector.class
            && node.style_class() != Some(class.as_str())
        {
            return false;
        }

        if let Some(pseudo_class) = &selector.pseudo_class
            && node.style_pseudo_class() != Some(pseudo_class.as_str())
        {
            return false;
        }

        true
    }

    fn has_matching_ancestor<N: StyleNode + ?Sized>(
        arena: &SelectorArena,
        ancestor_id: SelectorId,
        node: &N,
    ) -> bool {
        let mut current = node.style_parent();
        while let Some(ancestor) = current {
            if Self::score(arena, ancestor_id, ancestor).is_match() {
                return true;
            }
            current = ancestor.style_parent();
        }
        false
    }
}
