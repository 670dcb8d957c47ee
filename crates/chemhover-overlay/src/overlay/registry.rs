//! Overlay handle allocation and post-insertion hookup.

use std::collections::BTreeMap;
use std::sync::Arc;

use chemhover_protocols::{DomError, StructureRenderer, SurfaceSpec};
use parking_lot::Mutex;
use tracing::{debug, trace};

use super::markup::{OverlayMarkup, OverlaySettings, OverlayTriplet};
use crate::dom::{Document, NodeId, PointerAction, PointerBinding};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayState {
    /// Markup handed out, hookup not run yet.
    Allocated,
    /// Elements in the document and wired.
    Bound(OverlayTriplet),
    /// Hookup ran but the elements were not in the document, or could not
    /// be wired.
    Missed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayEntry {
    pub handle: u64,
    pub notation: String,
    pub state: OverlayState,
    /// Elements created by [`OverlayRegistry::build`]. Unset for markup
    /// inserted as an HTML string.
    pub elements: Option<OverlayTriplet>,
    /// Whether the renderer produced a depiction.
    pub rendered: bool,
}

/// What one [`OverlayRegistry::hookup`] call did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HookupReport {
    pub bound: usize,
    pub missed: usize,
    pub render_failures: usize,
}

struct RegistryState {
    next: u64,
    entries: BTreeMap<u64, OverlayEntry>,
}

/// Hands out overlay handles and wires the elements once they are inserted.
///
/// Handles increase strictly and are never reused, even after an entry has
/// been pruned.
pub struct OverlayRegistry {
    settings: OverlaySettings,
    renderer: Arc<dyn StructureRenderer>,
    state: Mutex<RegistryState>,
}

impl OverlayRegistry {
    pub fn new(settings: OverlaySettings, renderer: Arc<dyn StructureRenderer>) -> Self {
        Self {
            settings,
            renderer,
            state: Mutex::new(RegistryState {
                next: 0,
                entries: BTreeMap::new(),
            }),
        }
    }

    pub fn settings(&self) -> &OverlaySettings {
        &self.settings
    }

    /// Handle the next allocation will get.
    pub fn next_handle(&self) -> u64 {
        self.state.lock().next
    }

    pub fn allocate(&self, token: &str) -> OverlayMarkup {
        let mut state = self.state.lock();
        self.allocate_locked(&mut state, token)
    }

    /// Allocate a contiguous handle range, one per token, in order.
    pub fn allocate_all<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<OverlayMarkup> {
        let mut state = self.state.lock();
        tokens
            .iter()
            .map(|token| self.allocate_locked(&mut state, token.as_ref()))
            .collect()
    }

    fn allocate_locked(&self, state: &mut RegistryState, token: &str) -> OverlayMarkup {
        let handle = state.next;
        state.next += 1;
        state.entries.insert(
            handle,
            OverlayEntry {
                handle,
                notation: token.to_string(),
                state: OverlayState::Allocated,
                elements: None,
                rendered: false,
            },
        );
        trace!("allocated overlay {} for {:?}", handle, token);
        OverlayMarkup::new(handle, token, &self.settings)
    }

    /// Create `markup`'s elements in `doc`, detached, and remember them so
    /// hookup binds these nodes and never looks them up by id.
    pub fn build(&self, doc: &mut Document, markup: &OverlayMarkup) -> Result<OverlayTriplet, DomError> {
        let triplet = markup.build(doc)?;
        if let Some(entry) = self.state.lock().entries.get_mut(&markup.handle()) {
            entry.elements = Some(triplet);
        }
        Ok(triplet)
    }

    pub fn entry(&self, handle: u64) -> Option<OverlayEntry> {
        self.state.lock().entries.get(&handle).cloned()
    }

    /// Entries currently tracked.
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Wire the overlays `[first, first + count)` after their markup has been
    /// inserted into `doc`.
    ///
    /// Entries built through [`build`](Self::build) are bound to the nodes
    /// that were created, once the label is connected. Markup inserted as an
    /// HTML string is found by element id. Missing elements are tolerated and
    /// leave the entry `Missed`. Renderer failures are logged and swallowed.
    /// Entries that are not `Allocated` are left alone.
    pub fn hookup(&self, doc: &mut Document, first: u64, count: usize, sparkle: bool) -> HookupReport {
        let mut report = HookupReport::default();
        let mut state = self.state.lock();

        for handle in first..first + count as u64 {
            let Some(entry) = state.entries.get_mut(&handle) else {
                debug!("overlay {} is not registered", handle);
                report.missed += 1;
                continue;
            };
            if entry.state != OverlayState::Allocated {
                continue;
            }

            let triplet = match entry.elements {
                Some(triplet) if doc.is_connected(triplet.label) => Some(triplet),
                Some(_) => None,
                None => self.locate(doc, handle),
            };
            let Some(triplet) = triplet else {
                debug!("overlay {} elements not in the document, skipping", handle);
                entry.state = OverlayState::Missed;
                report.missed += 1;
                continue;
            };

            let surface = SurfaceSpec {
                element_id: self.settings.surface_id(handle),
                width: self.settings.width,
                height: self.settings.height,
            };
            match self.renderer.render(&entry.notation, &surface, self.settings.palette) {
                Ok(depiction) => match doc.set_depiction(triplet.surface, depiction) {
                    Ok(()) => entry.rendered = true,
                    Err(e) => debug!("overlay {} depiction not stored: {}", handle, e),
                },
                Err(e) => {
                    debug!("overlay {} not drawn: {}", handle, e);
                    report.render_failures += 1;
                }
            }

            if let Err(e) = self.wire(doc, &triplet, sparkle) {
                debug!("overlay {} could not be wired: {}", handle, e);
                entry.state = OverlayState::Missed;
                report.missed += 1;
                continue;
            }

            entry.state = OverlayState::Bound(triplet);
            report.bound += 1;
        }

        report
    }

    /// Hide the detail container, install hover behaviour, decorate.
    fn wire(&self, doc: &mut Document, triplet: &OverlayTriplet, sparkle: bool) -> Result<(), DomError> {
        doc.set_style(triplet.detail, "display", "none")?;
        doc.set_pointer_binding(
            triplet.label,
            PointerBinding {
                over: Some(PointerAction::ShowAt(triplet.detail)),
                out: Some(PointerAction::Hide(triplet.detail)),
            },
        )?;
        doc.set_pointer_binding(
            triplet.detail,
            PointerBinding {
                over: None,
                out: Some(PointerAction::Hide(triplet.detail)),
            },
        )?;
        if sparkle {
            self.sparkle(doc, triplet.label)?;
        }
        Ok(())
    }

    fn locate(&self, doc: &Document, handle: u64) -> Option<OverlayTriplet> {
        Some(OverlayTriplet {
            label: doc.get_element_by_id(&self.settings.label_id(handle))?,
            detail: doc.get_element_by_id(&self.settings.detail_id(handle))?,
            surface: doc.get_element_by_id(&self.settings.surface_id(handle))?,
        })
    }

    fn sparkle(&self, doc: &mut Document, label: NodeId) -> Result<(), DomError> {
        let Some(text_node) = doc.first_child(label) else {
            return Ok(());
        };
        let Some(text) = doc.text(text_node) else {
            return Ok(());
        };
        let marker = &self.settings.sparkle_marker;
        let decorated = format!("{}{}{}", marker, text, marker);
        doc.set_text(text_node, decorated)
    }

    /// Forget overlays whose label has left the document, and misses.
    ///
    /// Returns how many entries were dropped.
    pub fn prune(&self, doc: &Document) -> usize {
        let mut state = self.state.lock();
        let before = state.entries.len();
        state.entries.retain(|_, entry| match entry.state {
            OverlayState::Allocated => true,
            OverlayState::Bound(triplet) => doc.is_connected(triplet.label),
            OverlayState::Missed => false,
        });
        let dropped = before - state.entries.len();
        if dropped > 0 {
            debug!("pruned {} overlay entries", dropped);
        }
        dropped
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
