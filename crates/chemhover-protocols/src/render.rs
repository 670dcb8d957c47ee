//! Structure renderer boundary.

use serde::{Deserialize, Serialize};

use crate::error::RenderError;

/// Colour scheme handed to the renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Palette {
    #[default]
    Dark,
    Light,
}

impl Palette {
    pub fn as_str(&self) -> &'static str {
        match self {
            Palette::Dark => "dark",
            Palette::Light => "light",
        }
    }
}

/// The render surface an overlay owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceSpec {
    /// Element id of the surface inside the document.
    pub element_id: String,
    pub width: u32,
    pub height: u32,
}

/// Opaque result of drawing a structure, stored on the render surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Depiction(pub String);

/// Draws a chemical notation onto a surface.
///
/// Rendering is best effort: callers log and swallow failures.
pub trait StructureRenderer: Send + Sync {
    fn render(
        &self,
        notation: &str,
        surface: &SurfaceSpec,
        palette: Palette,
    ) -> Result<Depiction, RenderError>;
}
