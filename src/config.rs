//! Render settings.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! serialized to a TOML table, the user's file is merged on top, and the
//! result is deserialized into [`RenderSettings`] and validated.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [thumbnails]
//! admin_size = 109          # square crop shown in the editing UI
//! width = 150               # public thumbnail width
//! height = 150              # public thumbnail height
//!
//! [caption]
//! template = "%title%"      # tokens: %title% %alt% %filename% %caption%
//!
//! [lightbox]
//! use_bootstrap_modal = false
//! full_screen = false
//!
//! [resize_proxy]
//! enabled = false           # rewrite public thumbnails through a resize endpoint
//! endpoint = "/timthumb.php"
//! quality = 85
//!
//! [content]
//! append = true             # append galleries to content bodies
//! single_only = true        # ...but only on single-entry views
//! filter_priority = 10      # position among the host's content filters
//! ```
//!
//! Config files are sparse: override just the values you want. Unknown keys
//! are rejected to catch typos early.

use crate::caption::DEFAULT_TEMPLATE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Everything the gallery needs to know at render time. Read-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderSettings {
    /// Thumbnail dimensions for the editing UI and public pages.
    pub thumbnails: ThumbnailsConfig,
    /// Caption template used for link titles.
    pub caption: CaptionConfig,
    /// Lightbox display flags.
    pub lightbox: LightboxConfig,
    /// External on-demand resizing.
    pub resize_proxy: ResizeProxyConfig,
    /// Automatic injection into content bodies.
    pub content: ContentConfig,
}

impl RenderSettings {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.thumbnails;
        if t.admin_size == 0 || t.width == 0 || t.height == 0 {
            return Err(ConfigError::Validation(
                "thumbnails sizes must be non-zero".into(),
            ));
        }
        if !(1..=100).contains(&self.resize_proxy.quality) {
            return Err(ConfigError::Validation(
                "resize_proxy.quality must be 1-100".into(),
            ));
        }
        if self.resize_proxy.enabled && self.resize_proxy.endpoint.trim().is_empty() {
            return Err(ConfigError::Validation(
                "resize_proxy.endpoint must be set when the proxy is enabled".into(),
            ));
        }
        Ok(())
    }
}

/// Thumbnail dimensions in pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbnailsConfig {
    /// Edge of the square editing-UI thumbnail.
    pub admin_size: u32,
    pub width: u32,
    pub height: u32,
}

impl Default for ThumbnailsConfig {
    fn default() -> Self {
        Self {
            admin_size: 109,
            width: 150,
            height: 150,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CaptionConfig {
    pub template: String,
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

/// Flags handed to the client-side lightbox through data attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LightboxConfig {
    pub use_bootstrap_modal: bool,
    pub full_screen: bool,
}

/// External resize endpoint, queried as `{endpoint}?src=..&q=..&w=..&h=..`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizeProxyConfig {
    pub enabled: bool,
    pub endpoint: String,
    /// Encoding quality requested from the proxy (1-100).
    pub quality: u32,
}

impl Default for ResizeProxyConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: "/timthumb.php".to_string(),
            quality: 85,
        }
    }
}

/// When galleries are appended to content automatically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContentConfig {
    pub append: bool,
    /// Only append on single-entry views.
    pub single_only: bool,
    /// Ordering among the host's content filters (lower runs first).
    pub filter_priority: i32,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            append: true,
            single_only: true,
            filter_priority: 10,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default settings as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(RenderSettings::default())
        .map_err(|e| ConfigError::Validation(format!("default settings must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_settings(overlay: Option<toml::Value>) -> Result<RenderSettings, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let settings: RenderSettings = merged.try_into()?;
    settings.validate()?;
    Ok(settings)
}

/// Load settings from `config.toml` in the given directory.
pub fn load_settings(dir: &Path) -> Result<RenderSettings, ConfigError> {
    resolve_settings(load_raw_config(dir)?)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Lightbox Gallery Configuration
# ==============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Thumbnails
# ---------------------------------------------------------------------------
[thumbnails]
# Edge length of the square thumbnails in the gallery editor.
admin_size = 109

# Public thumbnail crop.
width = 150
height = 150

# ---------------------------------------------------------------------------
# Captions
# ---------------------------------------------------------------------------
[caption]
# Text shown as the link title and lightbox caption.
# Tokens: %title% %alt% %filename% %caption%
# A line break in the template is rendered as " - ".
template = "%title%"

# ---------------------------------------------------------------------------
# Lightbox
# ---------------------------------------------------------------------------
[lightbox]
# Present slides inside a modal dialog instead of the borderless overlay.
use_bootstrap_modal = false

# Request browser full-screen mode when the lightbox opens.
full_screen = false

# ---------------------------------------------------------------------------
# Resize proxy
# ---------------------------------------------------------------------------
[resize_proxy]
# Serve public thumbnails through an on-demand resizing endpoint instead of
# the catalog's pre-generated renditions.
enabled = false
endpoint = "/timthumb.php"

# Encoding quality requested from the proxy (1-100).
quality = 85

# ---------------------------------------------------------------------------
# Content injection
# ---------------------------------------------------------------------------
[content]
# Append each entry's gallery to its content body.
append = true

# Only append on single-entry views (not on listings or archives).
single_only = true

# Position among the host's content filters (lower runs first).
filter_priority = 10
"##
}
