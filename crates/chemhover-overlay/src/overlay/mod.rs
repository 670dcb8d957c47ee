//! Overlay elements: allocation, markup, deferred hookup.

mod markup;
mod registry;
mod svg;

pub use markup::{OverlayMarkup, OverlaySettings, OverlayTriplet};
pub use registry::{HookupReport, OverlayEntry, OverlayRegistry, OverlayState};
pub use svg::SvgLabelRenderer;
