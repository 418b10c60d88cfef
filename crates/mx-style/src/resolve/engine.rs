//! Main style resolution engine.

use std::path::Path;
use std::sync::Arc;

use slotmap::{SlotMap, new_key_type};

use super::cache::{CacheStats, StyleCache};
use super::signal::{ConnectionId, Signal};
use super::transform::{normalize_property_name, transform_value};
use crate::rules::{DeclarationTable, StyleSheet};
use crate::selector::StyleNode;
use crate::style::StyleProperty;
use crate::types::StyleValue;
use crate::widget::Stylable;
use crate::{Error, Result, targets};

/// Cache entries allowed per attached stylable.
pub const CACHE_SLOTS_PER_STYLABLE: usize = 6;

/// Display resolution assumed when none is configured, in dots per inch.
pub const DEFAULT_RESOLUTION: f64 = 96.0;

new_key_type! {
    /// Registration handle of a stylable attached to a [`Style`].
    pub struct StylableId;
}

/// Per-stylable bookkeeping.
#[derive(Debug, Default)]
struct StylableRecord {
    /// Cached cache key; cleared when the stylable's state changes.
    style_string: Option<String>,
}

/// Payload of the changed notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleChanged {
    /// The style age after the change.
    pub age: u64,
}

/// The style resolver: loaded stylesheets plus a cache of matching results.
///
/// Stylables register with [`attach`](Self::attach) and unregister with
/// [`detach`](Self::detach); the number attached bounds the cache at
/// [`CACHE_SLOTS_PER_STYLABLE`] entries each. Every load bumps the style age,
/// which makes earlier cache entries stale.
#[derive(Debug)]
pub struct Style {
    stylesheet: StyleSheet,
    age: u64,
    cache: StyleCache,
    stylables: SlotMap<StylableId, StylableRecord>,
    resolution: f64,
    changed: Signal<StyleChanged>,
}

impl Style {
    /// Create a style with no stylesheets at the default resolution.
    pub fn new() -> Self {
        Self::with_resolution(DEFAULT_RESOLUTION)
    }

    /// Create a style that converts points to pixels at `resolution` DPI.
    pub fn with_resolution(resolution: f64) -> Self {
        Self {
            stylesheet: StyleSheet::new(),
            age: 0,
            cache: StyleCache::new(),
            stylables: SlotMap::with_key(),
            resolution,
            changed: Signal::new(),
        }
    }

    /// Load a stylesheet file, adding to the rules already loaded.
    ///
    /// Fails with [`Error::InvalidFile`] if `path` is not a regular file and
    /// with [`Error::Io`] if it cannot be read; neither changes anything. A
    /// [`Error::Parse`] failure keeps the rules before the error, and like a
    /// successful load it bumps the age and emits the changed notification.
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::invalid_file(path));
        }

        let result = self.stylesheet.add_from_file(path);
        if !matches!(result, Err(Error::Io { .. })) {
            self.bump_age();
        }
        result
    }

    /// Load stylesheet text, adding to the rules already loaded.
    ///
    /// `name` is recorded as the source of the declarations.
    pub fn load_from_data(&mut self, css: &str, name: impl AsRef<Path>) -> Result<()> {
        let result = self.stylesheet.add_from_str(css, name);
        self.bump_age();
        result
    }

    /// Re-read every stylesheet loaded so far, in load order.
    ///
    /// The rules are rebuilt from scratch even if a source fails; the first
    /// failure is returned.
    pub fn reload(&mut self) -> Result<()> {
        let (stylesheet, error) = self.stylesheet.rebuild();
        self.stylesheet = stylesheet;
        self.bump_age();

        match error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn bump_age(&mut self) {
        self.age += 1;
        tracing::debug!(target: targets::STYLE_CACHE, age = self.age, "Style changed");
        self.changed.emit(&StyleChanged { age: self.age });
    }

    /// Register a stylable. Call [`detach`](Self::detach) when it is destroyed.
    pub fn attach(&mut self) -> StylableId {
        let id = self.stylables.insert(StylableRecord::default());
        tracing::debug!(
            target: targets::STYLE_CACHE,
            "Alive stylables: {}",
            self.stylables.len()
        );
        id
    }

    /// Unregister a stylable. Returns `false` if it was not attached.
    pub fn detach(&mut self, id: StylableId) -> bool {
        if self.stylables.remove(id).is_none() {
            tracing::warn!("Detaching a stylable that is not attached to this style");
            return false;
        }

        tracing::debug!(
            target: targets::STYLE_CACHE,
            "Alive stylables: {}",
            self.stylables.len()
        );
        true
    }

    /// Forget a stylable's cache key after its id, class or pseudo-class changed.
    ///
    /// The key is rebuilt on the next lookup. Cached entries are untouched.
    pub fn invalidate_cache(&mut self, id: StylableId) {
        match self.stylables.get_mut(id) {
            Some(record) => record.style_string = None,
            None => tracing::warn!("Invalidating a stylable that is not attached to this style"),
        }
    }

    /// Resolve one style property of a stylable.
    ///
    /// Returns the stylable's default when no rule sets the property.
    pub fn get_property<S: Stylable + ?Sized>(
        &mut self,
        id: StylableId,
        stylable: &S,
        property: &StyleProperty,
    ) -> StyleValue {
        let declarations = self.declarations_for(id, stylable);
        self.resolve_property(&declarations, property, stylable)
    }

    /// Resolve several style properties of a stylable by name.
    ///
    /// An unknown name is a caller error: it is logged, its slot is `None`
    /// and the names after it are not resolved but get their default values.
    pub fn get_properties<S: Stylable + ?Sized>(
        &mut self,
        id: StylableId,
        stylable: &S,
        names: &[&str],
    ) -> Vec<Option<StyleValue>> {
        let declarations = self.declarations_for(id, stylable);
        let mut values = Vec::with_capacity(names.len());

        let mut names = names.iter();
        for &name in names.by_ref() {
            match stylable.find_property(name) {
                Some(property) => {
                    values.push(Some(self.resolve_property(&declarations, property, stylable)));
                }
                None => {
                    tracing::error!(
                        "No style property \"{}\" installed on object of type \"{}\"",
                        name,
                        stylable.type_name()
                    );
                    values.push(None);
                    break;
                }
            }
        }

        values.extend(
            names.map(|&name| stylable.find_property(name).map(|p| p.default.clone())),
        );
        values
    }

    fn resolve_property<S: Stylable + ?Sized>(
        &self,
        declarations: &DeclarationTable,
        property: &StyleProperty,
        stylable: &S,
    ) -> StyleValue {
        match declarations.get(normalize_property_name(property.name)) {
            Some(declaration) => {
                transform_value(declaration, property, stylable.type_name(), self.resolution)
            }
            None => stylable
                .default_value(property.name)
                .unwrap_or_else(|| property.default.clone()),
        }
    }

    /// The merged declarations for a node, from the cache when possible.
    fn declarations_for<N: StyleNode + ?Sized>(
        &mut self,
        id: StylableId,
        node: &N,
    ) -> Arc<DeclarationTable> {
        let capacity = self.stylables.len() * CACHE_SLOTS_PER_STYLABLE;

        let Some(record) = self.stylables.get_mut(id) else {
            tracing::error!("Style lookup for a stylable that is not attached to this style");
            return Arc::new(self.stylesheet.properties_for(node));
        };
        let key: &str = record.style_string.get_or_insert_with(|| node.style_string());

        if let Some(declarations) = self.cache.get(key, self.age) {
            return declarations;
        }

        let declarations = Arc::new(self.stylesheet.properties_for(node));
        self.cache.insert(key, self.age, Arc::clone(&declarations));
        self.cache.shrink_to(capacity);

        tracing::debug!(
            target: targets::STYLE_CACHE,
            "Cache size: {}, (Max-size: {})",
            self.cache.len(),
            capacity
        );

        declarations
    }

    /// Connect a slot run after every load or reload.
    pub fn connect_changed<F>(&mut self, slot: F) -> ConnectionId
    where
        F: Fn(&StyleChanged) + 'static,
    {
        self.changed.connect(slot)
    }

    /// Disconnect a changed slot. Returns `false` if it was not connected.
    pub fn disconnect_changed(&mut self, id: ConnectionId) -> bool {
        self.changed.disconnect(id)
    }

    /// Incremented by every load; cache entries from older ages are stale.
    pub fn age(&self) -> u64 {
        self.age
    }

    /// The accumulated stylesheet.
    pub fn stylesheet(&self) -> &StyleSheet {
        &self.stylesheet
    }

    /// Files loaded so far, in load order.
    pub fn filenames(&self) -> impl Iterator<Item = &Path> {
        self.stylesheet.filenames()
    }

    /// Number of attached stylables.
    pub fn alive_stylables(&self) -> usize {
        self.stylables.len()
    }

    /// Number of cache entries.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// The cache bound: attached stylables times [`CACHE_SLOTS_PER_STYLABLE`].
    pub fn cache_capacity(&self) -> usize {
        self.stylables.len() * CACHE_SLOTS_PER_STYLABLE
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Display resolution in DPI.
    pub fn resolution(&self) -> f64 {
        self.resolution
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{PropertyKind, PropertyManifest};
    use crate::types::Color;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Widget<'a> {
        type_name: &'static str,
        name: Option<&'static str>,
        class: Option<String>,
        pseudo_class: Option<&'static str>,
        parent: Option<&'a Widget<'a>>,
        manifest: PropertyManifest,
    }

    impl<'a> Widget<'a> {
        fn new(type_name: &'static str) -> Self {
            Self {
                type_name,
                name: None,
                class: None,
                pseudo_class: None,
                parent: None,
                manifest: PropertyManifest::widget(),
            }
        }
    }

    impl StyleNode for Widget<'_> {
        fn type_name(&self) -> &str {
            self.type_name
        }

        fn style_id(&self) -> Option<&str> {
            self.name
        }

        fn style_class(&self) -> Option<&str> {
            self.class.as_deref()
        }

        fn style_pseudo_class(&self) -> Option<&str> {
            self.pseudo_class
        }

        fn style_parent(&self) -> Option<&dyn StyleNode> {
            self.parent.map(|p| p as &dyn StyleNode)
        }
    }

    impl Stylable for Widget<'_> {
        fn style_properties(&self) -> &PropertyManifest {
            &self.manifest
        }
    }

    fn color_of(style: &mut Style, id: StylableId, widget: &Widget<'_>) -> Option<Color> {
        let property = widget.find_property("color").unwrap().clone();
        style.get_property(id, widget, &property).as_color()
    }

    const BUTTONS: &str = r#"
        MxButton { color: red; }
        MxButton.danger { color: crimson; }
        #submit { color: blue; }
    "#;

    #[test]
    fn id_beats_class_beats_type() {
        let mut style = Style::new();
        style.load_from_data(BUTTONS, "buttons.css").unwrap();

        let mut button = Widget::new("MxButton");
        button.class = Some("danger".into());
        button.name = Some("submit");
        let id = style.attach();

        assert_eq!(color_of(&mut style, id, &button), Some(Color::from_rgb8(0, 0, 255)));
    }

    #[test]
    fn unset_property_uses_default() {
        let mut style = Style::new();
        style.load_from_data(BUTTONS, "buttons.css").unwrap();

        let label = Widget::new("MxLabel");
        let id = style.attach();

        assert_eq!(color_of(&mut style, id, &label), Some(Color::BLACK));
    }

    #[test]
    fn second_lookup_hits_cache() {
        let mut style = Style::new();
        style.load_from_data(BUTTONS, "buttons.css").unwrap();

        let button = Widget::new("MxButton");
        let id = style.attach();

        let first = color_of(&mut style, id, &button);
        let second = color_of(&mut style, id, &button);

        assert_eq!(first, second);
        assert_eq!(style.cache_stats(), CacheStats { hits: 1, misses: 1, evictions: 0 });
        assert_eq!(style.cache_len(), 1);
    }

    #[test]
    fn load_makes_cache_stale() {
        let mut style = Style::new();
        style.load_from_data("MxButton { color: red; }", "a.css").unwrap();

        let button = Widget::new("MxButton");
        let id = style.attach();
        assert_eq!(color_of(&mut style, id, &button), Some(Color::from_rgb8(255, 0, 0)));

        let age = style.age();
        style.load_from_data("MxButton:hover, MxButton#ok { color: blue; }", "b.css").unwrap();
        assert_eq!(style.age(), age + 1);

        // Same key, but recomputed.
        assert_eq!(color_of(&mut style, id, &button), Some(Color::from_rgb8(255, 0, 0)));
        assert_eq!(style.cache_stats().misses, 2);
        assert_eq!(style.cache_len(), 1);
    }

    #[test]
    fn invalidate_cache_rebuilds_the_key() {
        let mut style = Style::new();
        style.load_from_data(BUTTONS, "buttons.css").unwrap();

        let mut button = Widget::new("MxButton");
        let id = style.attach();
        assert_eq!(color_of(&mut style, id, &button), Some(Color::from_rgb8(255, 0, 0)));

        // Without invalidation the old key is still used.
        button.class = Some("danger".into());
        assert_eq!(color_of(&mut style, id, &button), Some(Color::from_rgb8(255, 0, 0)));

        style.invalidate_cache(id);
        assert_eq!(color_of(&mut style, id, &button), Some(Color::from_rgb8(220, 20, 60)));
    }

    #[test]
    fn cache_is_bounded_by_alive_stylables() {
        let mut style = Style::new();
        style.load_from_data(BUTTONS, "buttons.css").unwrap();

        let mut button = Widget::new("MxButton");
        let id = style.attach();
        let _other = style.attach();
        assert_eq!(style.cache_capacity(), 12);

        for i in 0..20 {
            button.class = Some(format!("variant{}", i));
            style.invalidate_cache(id);
            color_of(&mut style, id, &button);
            assert!(style.cache_len() <= 12);
        }

        assert_eq!(style.cache_len(), 12);
        assert_eq!(style.cache_stats().evictions, 8);
    }

    #[test]
    fn detach_shrinks_capacity() {
        let mut style = Style::new();
        let a = style.attach();
        let b = style.attach();
        assert_eq!(style.alive_stylables(), 2);

        assert!(style.detach(b));
        assert!(!style.detach(b));
        assert_eq!(style.alive_stylables(), 1);
        assert_eq!(style.cache_capacity(), 6);

        assert!(style.detach(a));
        assert_eq!(style.cache_capacity(), 0);
    }

    #[test]
    fn unknown_handle_resolves_uncached() {
        let mut style = Style::new();
        style.load_from_data(BUTTONS, "buttons.css").unwrap();

        let button = Widget::new("MxButton");
        let id = style.attach();
        style.detach(id);

        assert_eq!(color_of(&mut style, id, &button), Some(Color::from_rgb8(255, 0, 0)));
        assert_eq!(style.cache_len(), 0);
    }

    #[test]
    fn vendor_properties_are_normalized() {
        let mut style = Style::new();
        style
            .load_from_data("MxButton { -mx-border-image-transition-duration: 250; }", "a.css")
            .unwrap();

        let button = Widget::new("MxButton");
        let id = style.attach();
        let values = style.get_properties(id, &button, &["x-mx-border-image-transition-duration"]);

        assert_eq!(values, vec![Some(StyleValue::UInt(250))]);
    }

    #[test]
    fn get_properties_stops_at_unknown_name() {
        let mut style = Style::new();
        style
            .load_from_data("MxButton { color: red; font-size: 24pt; }", "a.css")
            .unwrap();

        let button = Widget::new("MxButton");
        let id = style.attach();
        let values = style.get_properties(id, &button, &["font-size", "bogus", "color", "nothing"]);

        assert_eq!(
            values,
            vec![
                Some(StyleValue::Int(32)),
                None,
                // Not resolved; the default is returned.
                Some(StyleValue::Color(Color::BLACK)),
                None,
            ]
        );
    }

    #[test]
    fn custom_property_kinds() {
        let mut style = Style::new();
        style
            .load_from_data("MxSlider { handle-width: 18px; }", "a.css")
            .unwrap();

        let mut slider = Widget::new("MxSlider");
        slider.manifest.insert(StyleProperty::new(
            "handle-width",
            PropertyKind::UInt,
            StyleValue::UInt(10),
        ));
        slider.manifest.insert(StyleProperty::new(
            "handle-height",
            PropertyKind::UInt,
            StyleValue::UInt(10),
        ));
        let id = style.attach();

        let values = style.get_properties(id, &slider, &["handle-width", "handle-height"]);
        assert_eq!(values, vec![Some(StyleValue::UInt(18)), Some(StyleValue::UInt(10))]);
    }

    #[test]
    fn changed_notification() {
        let mut style = Style::new();
        let ages = Rc::new(Cell::new(0));

        let seen = Rc::clone(&ages);
        let connection = style.connect_changed(move |changed| seen.set(changed.age));

        style.load_from_data("MxLabel { color: red; }", "a.css").unwrap();
        assert_eq!(ages.get(), 1);

        // A parse error still adds the earlier rules.
        assert!(style.load_from_data("MxLabel { color: red; } MxButton { color }", "b.css").is_err());
        assert_eq!(ages.get(), 2);

        assert!(style.disconnect_changed(connection));
        style.load_from_data("MxLabel { color: blue; }", "c.css").unwrap();
        assert_eq!(ages.get(), 2);
        assert_eq!(style.age(), 3);
    }

    #[test]
    fn invalid_file_changes_nothing() {
        let mut style = Style::new();
        let err = style.load_from_file("/nonexistent/mx-style/theme.css").unwrap_err();

        assert!(matches!(err, Error::InvalidFile { .. }));
        assert_eq!(style.age(), 0);
        assert!(style.stylesheet().is_empty());
    }

    #[test]
    fn reload_rebuilds_from_sources() {
        let mut style = Style::new();
        style.load_from_data("MxLabel { color: red; }", "a.css").unwrap();
        style.load_from_data("MxButton { color: blue; }", "b.css").unwrap();

        style.reload().unwrap();
        assert_eq!(style.age(), 3);
        assert_eq!(style.stylesheet().len(), 2);
    }
}
