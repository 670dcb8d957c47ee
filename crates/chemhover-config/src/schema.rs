//! Configuration schema definitions.

use std::path::PathBuf;

use chemhover_protocols::Palette;
use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub classifier: ClassifierConfig,

    #[serde(default)]
    pub channel: ChannelConfig,

    #[serde(default)]
    pub walker: WalkerConfig,

    #[serde(default)]
    pub overlay: OverlayConfig,

    #[serde(default)]
    pub sites: SitesConfig,
}

/// Classifier and threshold policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// A token is accepted only when its score is strictly above this.
    #[serde(default = "default_threshold")]
    pub threshold: f32,

    /// Remote model artifact, fetched once on first use.
    #[serde(default)]
    pub model_url: Option<String>,

    /// Local model artifact; takes precedence over `model_url`.
    #[serde(default)]
    pub model_path: Option<PathBuf>,

    /// JSON `{"stoi": {...}}` vocabulary; the built-in table is used when unset.
    #[serde(default)]
    pub vocabulary_path: Option<PathBuf>,
}

fn default_threshold() -> f32 {
    1.0
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            model_url: None,
            model_path: None,
            vocabulary_path: None,
        }
    }
}

/// Inference channel settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Correlation ids wrap modulo this bound.
    #[serde(default = "default_max_id")]
    pub max_id: u32,

    /// Give up on a reply after this long. Unset waits forever.
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
}

fn default_max_id() -> u32 {
    1024
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            max_id: default_max_id(),
            request_timeout_ms: None,
        }
    }
}

/// DOM walker guards and scheduling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalkerConfig {
    /// Text nodes must be strictly longer than this (in chars) to be scanned.
    #[serde(default = "default_min_text_len")]
    pub min_text_len: usize,

    /// Id prefix shared by every element the overlay inserts.
    #[serde(default = "default_overlay_id_prefix")]
    pub overlay_id_prefix: String,

    /// Upper bound on node scans awaiting classification at once.
    #[serde(default = "default_max_concurrent_scans")]
    pub max_concurrent_scans: usize,
}

fn default_min_text_len() -> usize {
    2
}

fn default_overlay_id_prefix() -> String {
    "_ch".to_string()
}

fn default_max_concurrent_scans() -> usize {
    16
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            min_text_len: default_min_text_len(),
            overlay_id_prefix: default_overlay_id_prefix(),
            max_concurrent_scans: default_max_concurrent_scans(),
        }
    }
}

/// Overlay element geometry and decoration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayConfig {
    #[serde(default = "default_width")]
    pub width: u32,

    #[serde(default = "default_height")]
    pub height: u32,

    #[serde(default)]
    pub palette: Palette,

    /// Wrap accepted labels with `sparkle_marker` (never inside editable fields).
    #[serde(default = "default_true")]
    pub sparkle: bool,

    #[serde(default = "default_sparkle_marker")]
    pub sparkle_marker: String,
}

fn default_width() -> u32 {
    250
}

fn default_height() -> u32 {
    200
}

fn default_true() -> bool {
    true
}

fn default_sparkle_marker() -> String {
    "\u{2728}".to_string()
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            palette: Palette::default(),
            sparkle: default_true(),
            sparkle_marker: default_sparkle_marker(),
        }
    }
}

/// Site filter persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SitesConfig {
    #[serde(default = "default_filters_path")]
    pub filters_path: String,
}

fn default_filters_path() -> String {
    "~/.chemhover/filters.json".to_string()
}

impl Default for SitesConfig {
    fn default() -> Self {
        Self {
            filters_path: default_filters_path(),
        }
    }
}

/// Base directory for chemhover state (`~/.chemhover`).
pub fn chemhover_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".chemhover"))
        .unwrap_or_else(|| PathBuf::from(".chemhover"))
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
