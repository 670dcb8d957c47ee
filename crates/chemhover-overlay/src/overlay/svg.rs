//! Built-in best-effort structure renderer.

use chemhover_protocols::{Depiction, Palette, RenderError, StructureRenderer, SurfaceSpec};

use crate::dom::html::{escape_attr, escape_text};

/// Punctuation allowed in SMILES besides letters and digits.
const SMILES_PUNCTUATION: &str = "()[]=#@+-/\\.%:*$~";

/// Draws the notation as a text card sized to the surface.
///
/// No structure layout: a notation that contains characters outside the
/// SMILES alphabet is rejected like an unparseable one.
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgLabelRenderer;

impl SvgLabelRenderer {
    pub fn new() -> Self {
        Self
    }

    fn validate(notation: &str) -> Result<(), RenderError> {
        if notation.is_empty() {
            return Err(RenderError::Parse {
                notation: String::new(),
                reason: "empty notation".to_string(),
            });
        }
        if let Some(c) = notation
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && !SMILES_PUNCTUATION.contains(*c))
        {
            return Err(RenderError::Parse {
                notation: notation.to_string(),
                reason: format!("unexpected character {:?}", c),
            });
        }
        Ok(())
    }
}

impl StructureRenderer for SvgLabelRenderer {
    fn render(
        &self,
        notation: &str,
        surface: &SurfaceSpec,
        palette: Palette,
    ) -> Result<Depiction, RenderError> {
        Self::validate(notation)?;
        if surface.width == 0 || surface.height == 0 {
            return Err(RenderError::Failed(format!(
                "surface {} has no area",
                surface.element_id
            )));
        }

        let (background, foreground) = match palette {
            Palette::Dark => ("#1e1e1e", "#f0f0f0"),
            Palette::Light => ("#ffffff", "#202020"),
        };
        let chars = notation.chars().count() as u32;
        let font_size = (surface.width / chars.max(1)).clamp(8, (surface.height / 2).max(8));

        Ok(Depiction(format!(
            concat!(
                "<svg xmlns=\"http://www.w3.org/2000/svg\" data-surface=\"{id}\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">",
                "<rect width=\"{w}\" height=\"{h}\" fill=\"{bg}\"/>",
                "<text x=\"{cx}\" y=\"{cy}\" fill=\"{fg}\" font-family=\"monospace\" font-size=\"{size}\" text-anchor=\"middle\" dominant-baseline=\"middle\">{text}</text>",
                "</svg>"
            ),
            id = escape_attr(&surface.element_id),
            w = surface.width,
            h = surface.height,
            bg = background,
            fg = foreground,
            cx = surface.width / 2,
            cy = surface.height / 2,
            size = font_size,
            text = escape_text(notation),
        )))
    }
}
