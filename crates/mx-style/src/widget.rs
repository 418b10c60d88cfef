//! Widget styling integration.
//!
//! Widgets take part in styling by implementing [`Stylable`], registering
//! with a [`Style`](crate::Style) when they are created and unregistering
//! when they are destroyed.

use crate::selector::StyleNode;
use crate::style::{PropertyManifest, StyleProperty};
use crate::types::StyleValue;

/// Trait for widgets that read style properties.
///
/// # Example
///
/// ```ignore
/// struct Label {
///     name: Option<String>,
///     class: Option<String>,
///     hovered: bool,
///     manifest: PropertyManifest,
///     style_handle: StylableId,
/// }
///
/// impl StyleNode for Label {
///     fn type_name(&self) -> &str {
///         "MxLabel"
///     }
///
///     fn style_id(&self) -> Option<&str> {
///         self.name.as_deref()
///     }
///
///     fn style_class(&self) -> Option<&str> {
///         self.class.as_deref()
///     }
///
///     fn style_pseudo_class(&self) -> Option<&str> {
///         self.hovered.then_some("hover")
///     }
///
///     fn style_parent(&self) -> Option<&dyn StyleNode> {
///         None
///     }
/// }
///
/// impl Stylable for Label {
///     fn style_properties(&self) -> &PropertyManifest {
///         &self.manifest
///     }
/// }
///
/// let values = style.get_properties(label.style_handle, &label, &["color", "font-size"]);
/// ```
pub trait Stylable: StyleNode {
    /// The style properties this widget reads.
    fn style_properties(&self) -> &PropertyManifest;

    /// Find one of this widget's style properties.
    fn find_property(&self, name: &str) -> Option<&StyleProperty> {
        self.style_properties().find(name)
    }

    /// The value a property has when no rule sets it.
    ///
    /// Logs a warning and returns `None` for an unknown property.
    fn default_value(&self, name: &str) -> Option<StyleValue> {
        match self.find_property(name) {
            Some(property) => Some(property.default.clone()),
            None => {
                tracing::warn!(
                    "No style property named '{}' found for '{}'",
                    name,
                    self.type_name()
                );
                None
            }
        }
    }
}
