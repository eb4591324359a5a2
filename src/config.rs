//! Resolver configuration.

use serde::{Deserialize, Serialize};

use crate::theme::Theme;

/// Key under which the preference record is stored by default.
pub const DEFAULT_STORAGE_KEY: &str = "theme";

/// Settings that shape how a [`ThemeResolver`](crate::ThemeResolver) resolves
/// and applies the theme.
///
/// All fields have defaults, so a partial JSON document is enough:
///
/// ```rust
/// use theme_switch::{Theme, ThemeConfig};
///
/// let config: ThemeConfig = serde_json::from_str(r#"{ "fallback": "dark" }"#).unwrap();
/// assert_eq!(config.fallback, Theme::Dark);
/// assert_eq!(config.storage_key, "theme");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Key of the preference record in the store.
    pub storage_key: String,
    /// Theme used when neither the store nor the environment can answer.
    pub fallback: Theme,
    /// Class label applied to the root surface for [`Theme::Light`].
    pub light_class: String,
    /// Class label applied to the root surface for [`Theme::Dark`].
    pub dark_class: String,
}

impl ThemeConfig {
    /// Returns the class label for `theme`.
    pub fn class_for(&self, theme: Theme) -> &str {
        match theme {
            Theme::Light => &self.light_class,
            Theme::Dark => &self.dark_class,
        }
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            fallback: Theme::Light,
            light_class: Theme::Light.as_str().to_string(),
            dark_class: Theme::Dark.as_str().to_string(),
        }
    }
}
