//! Process-wide style configuration and the default style.

use std::path::{Path, PathBuf};

use crate::resolve::{DEFAULT_RESOLUTION, Style};

/// Overrides the default stylesheet path when set and non-empty.
pub const RC_FILE_VAR: &str = "MX_RC_FILE";

/// Overrides the display resolution, in DPI.
pub const RESOLUTION_VAR: &str = "MX_RESOLUTION";

/// Settings the default style is built from.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleSettings {
    /// Display resolution used for point sizes, in DPI.
    pub resolution: f64,
    /// Stylesheet loaded into the default style, if it exists.
    pub default_stylesheet: Option<PathBuf>,
}

impl StyleSettings {
    /// Read settings from the environment.
    ///
    /// The default stylesheet is `$MX_RC_FILE`, falling back to
    /// `<data dir>/mx/style/default.css`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let default_stylesheet = match lookup(RC_FILE_VAR) {
            Some(path) if !path.is_empty() => Some(PathBuf::from(path)),
            _ => Self::data_stylesheet(),
        };

        let resolution = lookup(RESOLUTION_VAR)
            .and_then(|value| match value.trim().parse::<f64>() {
                Ok(dpi) if dpi > 0.0 => Some(dpi),
                _ => {
                    tracing::warn!("Ignoring invalid {}: \"{}\"", RESOLUTION_VAR, value);
                    None
                }
            })
            .unwrap_or(DEFAULT_RESOLUTION);

        Self {
            resolution,
            default_stylesheet,
        }
    }

    fn data_stylesheet() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("mx").join("style").join("default.css"))
    }

    /// Use `path` as the default stylesheet.
    pub fn with_default_stylesheet(mut self, path: impl Into<PathBuf>) -> Self {
        self.default_stylesheet = Some(path.into());
        self
    }

    /// Use `resolution` DPI.
    pub fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = resolution;
        self
    }
}

impl Default for StyleSettings {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            default_stylesheet: None,
        }
    }
}

/// Owner of the default style.
///
/// Build one at startup and hand widgets a reference to it. The default
/// stylesheet is loaded once, when the context is created.
#[derive(Debug)]
pub struct StyleContext {
    settings: StyleSettings,
    style: Style,
}

impl StyleContext {
    /// Create a context and load its default stylesheet.
    ///
    /// A missing default stylesheet is skipped; one that fails to load is
    /// logged and whatever was parsed is kept.
    pub fn new(settings: StyleSettings) -> Self {
        let mut style = Style::with_resolution(settings.resolution);

        if let Some(path) = settings.default_stylesheet.as_deref() {
            load_default(&mut style, path);
        }

        Self { settings, style }
    }

    /// Create a context from [`StyleSettings::from_env`].
    pub fn from_env() -> Self {
        Self::new(StyleSettings::from_env())
    }

    /// The default style.
    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut Style {
        &mut self.style
    }

    pub fn settings(&self) -> &StyleSettings {
        &self.settings
    }
}

impl Default for StyleContext {
    fn default() -> Self {
        Self::new(StyleSettings::default())
    }
}

fn load_default(style: &mut Style, path: &Path) {
    if !path.exists() {
        tracing::debug!("No default stylesheet at {}", path.display());
        return;
    }

    match style.load_from_file(path) {
        Ok(()) => tracing::info!("Loaded default stylesheet: {}", path.display()),
        Err(e) => tracing::error!("Error loading default style: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;

    use tempfile::tempdir;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn rc_file_overrides_default_path() {
        let settings = StyleSettings::from_lookup(lookup(&[(RC_FILE_VAR, "/etc/mx/theme.css")]));
        assert_eq!(settings.default_stylesheet, Some(PathBuf::from("/etc/mx/theme.css")));
        assert_eq!(settings.resolution, DEFAULT_RESOLUTION);
    }

    #[test]
    fn empty_rc_file_is_ignored() {
        let settings = StyleSettings::from_lookup(lookup(&[(RC_FILE_VAR, "")]));
        assert_eq!(settings.default_stylesheet, StyleSettings::data_stylesheet());
    }

    #[test]
    fn resolution_from_env() {
        let settings = StyleSettings::from_lookup(lookup(&[(RESOLUTION_VAR, "144")]));
        assert_eq!(settings.resolution, 144.0);

        let settings = StyleSettings::from_lookup(lookup(&[(RESOLUTION_VAR, "dense")]));
        assert_eq!(settings.resolution, DEFAULT_RESOLUTION);

        let settings = StyleSettings::from_lookup(lookup(&[(RESOLUTION_VAR, "-1")]));
        assert_eq!(settings.resolution, DEFAULT_RESOLUTION);
    }

    #[test]
    fn context_loads_default_stylesheet() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("default.css");
        fs::write(&path, "MxButton { color: red; }").unwrap();

        let context = StyleContext::new(StyleSettings::default().with_default_stylesheet(&path));
        assert_eq!(context.style().stylesheet().len(), 1);
        assert_eq!(context.style().age(), 1);
        assert_eq!(context.style().filenames().collect::<Vec<_>>(), vec![path.as_path()]);
    }

    #[test]
    fn context_survives_broken_default_stylesheet() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("default.css");
        fs::write(&path, "MxLabel { color: red; } MxButton { color }").unwrap();

        let context = StyleContext::new(StyleSettings::default().with_default_stylesheet(&path));
        assert_eq!(context.style().stylesheet().len(), 1);
    }

    #[test]
    fn context_without_stylesheet() {
        let dir = tempdir().unwrap();
        let settings = StyleSettings::default()
            .with_default_stylesheet(dir.path().join("missing.css"))
            .with_resolution(72.0);

        let context = StyleContext::new(settings);
        assert!(context.style().stylesheet().is_empty());
        assert_eq!(context.style().age(), 0);
        assert_eq!(context.style().resolution(), 72.0);
    }
}
