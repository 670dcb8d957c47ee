//! Overlay element markup.

use std::fmt;

use chemhover_config::Config;
use chemhover_protocols::{DomError, Palette};

use crate::dom::html::{escape_attr, escape_text, style_value};
use crate::dom::{Document, NodeId};

/// Inline style of a freshly allocated detail container.
const DETAIL_STYLE: [(&str, &str); 3] = [
    ("background-color", "rgba(0,0,0,0.8)"),
    ("z-index", "100"),
    ("position", "absolute"),
];

/// Geometry, naming and decoration of overlay elements.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlaySettings {
    pub id_prefix: String,
    pub width: u32,
    pub height: u32,
    pub palette: Palette,
    pub sparkle_marker: String,
}

impl OverlaySettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            id_prefix: config.walker.overlay_id_prefix.clone(),
            width: config.overlay.width,
            height: config.overlay.height,
            palette: config.overlay.palette,
            sparkle_marker: config.overlay.sparkle_marker.clone(),
        }
    }

    pub fn label_id(&self, handle: u64) -> String {
        format!("{}-p{}", self.id_prefix, handle)
    }

    pub fn detail_id(&self, handle: u64) -> String {
        format!("{}-modal{}", self.id_prefix, handle)
    }

    pub fn surface_id(&self, handle: u64) -> String {
        format!("{}-canvas{}", self.id_prefix, handle)
    }

    /// Id of the element that replaces a scanned text node.
    pub fn wrapper_id(&self, first_handle: u64) -> String {
        format!("{}-w{}", self.id_prefix, first_handle)
    }
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// The three elements one overlay owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayTriplet {
    pub label: NodeId,
    pub detail: NodeId,
    pub surface: NodeId,
}

/// One allocated overlay, ready to be inserted.
///
/// `Display` yields the HTML; [`build`](Self::build) creates the same tree in
/// a [`Document`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayMarkup {
    handle: u64,
    notation: String,
    label_id: String,
    detail_id: String,
    surface_id: String,
    width: u32,
    height: u32,
}

impl OverlayMarkup {
    pub(crate) fn new(handle: u64, notation: &str, settings: &OverlaySettings) -> Self {
        Self {
            handle,
            notation: notation.to_string(),
            label_id: settings.label_id(handle),
            detail_id: settings.detail_id(handle),
            surface_id: settings.surface_id(handle),
            width: settings.width,
            height: settings.height,
        }
    }

    pub fn handle(&self) -> u64 {
        self.handle
    }

    pub fn notation(&self) -> &str {
        &self.notation
    }

    pub fn label_id(&self) -> &str {
        &self.label_id
    }

    pub fn detail_id(&self) -> &str {
        &self.detail_id
    }

    pub fn surface_id(&self) -> &str {
        &self.surface_id
    }

    /// Create the label subtree, detached. The label is the root to insert.
    pub fn build(&self, doc: &mut Document) -> Result<OverlayTriplet, DomError> {
        let label = doc.create_element("span");
        doc.set_attribute(label, "id", self.label_id.as_str())?;
        let text = doc.create_text(self.notation.as_str());
        doc.append_child(label, text)?;

        let detail = doc.create_element("div");
        doc.set_attribute(detail, "id", self.detail_id.as_str())?;
        for (property, value) in DETAIL_STYLE {
            doc.set_style(detail, property, value)?;
        }
        doc.append_child(label, detail)?;

        let surface = doc.create_element("canvas");
        doc.set_attribute(surface, "id", self.surface_id.as_str())?;
        doc.set_attribute(surface, "width", self.width.to_string())?;
        doc.set_attribute(surface, "height", self.height.to_string())?;
        doc.append_child(detail, surface)?;

        Ok(OverlayTriplet {
            label,
            detail,
            surface,
        })
    }
}

impl fmt::Display for OverlayMarkup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<span id=\"{}\">{}<div id=\"{}\" style=\"{}\"><canvas id=\"{}\" width=\"{}\" height=\"{}\"></canvas></div></span>",
            escape_attr(&self.label_id),
            escape_text(&self.notation),
            escape_attr(&self.detail_id),
            escape_attr(&style_value(DETAIL_STYLE)),
            escape_attr(&self.surface_id),
            self.width,
            self.height,
        )
    }
}
