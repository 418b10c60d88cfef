//! Selector specificity scoring.

use super::{Selector, SelectorId, TypeSelector};

/// Match score of a selector against a node.
///
/// Each constraint present on the selector adds a fixed weight:
///
/// | constraint   | weight |
/// |--------------|--------|
/// | type         | 1      |
/// | class        | 2      |
/// | id           | 4      |
/// | pseudo-class | 8      |
///
/// `*` and chain links carry no weight. A score of zero means "not applied",
/// whether the selector failed or simply had nothing to score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Specificity(pub u32);

impl Specificity {
    /// No match, or a match with nothing to score.
    pub const ZERO: Self = Self(0);

    /// Weight of a named type.
    pub const TYPE: u32 = 1;
    /// Weight of a class.
    pub const CLASS: u32 = 2;
    /// Weight of an id.
    pub const ID: u32 = 4;
    /// Weight of a pseudo-class.
    pub const PSEUDO_CLASS: u32 = 8;

    /// The score a selector earns when all of its constraints match.
    pub fn of_selector(selector: &Selector) -> Self {
        let mut score = 0;

        if let Some(TypeSelector::Named(_)) = &selector.type_selector {
            score += Self::TYPE;
        }
        if selector.class.is_some() {
            score += Self::CLASS;
        }
        if selector.id.is_some() {
            score += Self::ID;
        }
        if selector.pseudo_class.is_some() {
            score += Self::PSEUDO_CLASS;
        }

        Self(score)
    }

    /// Whether the selector takes part in resolution.
    pub fn is_match(self) -> bool {
        self.0 > 0
    }

    /// The raw score.
    pub fn value(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for Specificity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A selector that matched a node, with its score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorMatch {
    /// The matching selector.
    pub selector: SelectorId,
    /// Its score against the node.
    pub specificity: Specificity,
}

/// Order matches by ascending specificity, keeping discovery order on ties.
pub fn sort_matches(matches: &mut [SelectorMatch]) {
    // Stable: equal scores stay in the order they were discovered.
    matches.sort_by_key(|m| m.specificity);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::SelectorArena;

    #[test]
    fn specificity_calculation() {
        // * -> 0
        assert_eq!(Specificity::of_selector(&Selector::universal()), Specificity(0));

        // Button -> 1
        let sel = Selector::type_selector("Button");
        assert_eq!(Specificity::of_selector(&sel), Specificity(1));

        // .primary -> 2
        let sel = Selector::new().with_class("primary");
        assert_eq!(Specificity::of_selector(&sel), Specificity(2));

        // #submit -> 4
        let sel = Selector::new().with_id("submit");
        assert_eq!(Specificity::of_selector(&sel), Specificity(4));

        // Button.primary:hover -> 11
        let sel = Selector::type_selector("Button")
            .with_class("primary")
            .with_pseudo_class("hover");
        assert_eq!(Specificity::of_selector(&sel), Specificity(11));

        // *#submit.primary:hover -> 14
        let sel = Selector::universal()
            .with_id("submit")
            .with_class("primary")
            .with_pseudo_class("hover");
        assert_eq!(Specificity::of_selector(&sel), Specificity(14));
    }

    #[test]
    fn specificity_comparison() {
        // pseudo-class > id > class > type
        assert!(Specificity(Specificity::PSEUDO_CLASS) > Specificity(Specificity::ID));
        assert!(Specificity(Specificity::ID) > Specificity(Specificity::CLASS + Specificity::TYPE));
        assert!(Specificity(Specificity::CLASS) > Specificity(Specificity::TYPE));
        assert!(!Specificity::ZERO.is_match());
    }

    #[test]
    fn sort_is_stable_on_ties() {
        let mut arena = SelectorArena::new();
        let a = arena.push(Selector::type_selector("A"));
        let b = arena.push(Selector::type_selector("B"));
        let c = arena.push(Selector::new().with_id("c"));

        let mut matches = vec![
            SelectorMatch { selector: c, specificity: Specificity(4) },
            SelectorMatch { selector: a, specificity: Specificity(1) },
            SelectorMatch { selector: b, specificity: Specificity(1) },
        ];
        sort_matches(&mut matches);

        let order: Vec<_> = matches.iter().map(|m| m.selector).collect();
        assert_eq!(order, vec![a, b, c]);
    }
}
