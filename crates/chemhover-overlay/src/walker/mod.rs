//! DOM walker: classify the words of a text node and splice in overlays.

mod candidate;

use std::sync::Arc;

use chemhover_config::Config;
use chemhover_protocols::{DomError, Inference};
use tracing::{debug, trace, warn};

pub use candidate::{extract, Candidate};

use crate::dom::{Document, NodeId, NodeKind, SharedDocument};
use crate::overlay::{OverlayMarkup, OverlayRegistry};
use crate::queue::ScanQueue;

/// Guards and acceptance policy of the walker.
#[derive(Debug, Clone, PartialEq)]
pub struct WalkerSettings {
    /// Scores must be strictly above this.
    pub threshold: f32,
    /// Text must be strictly longer than this many characters.
    pub min_text_len: usize,
    /// Elements whose id starts with this were inserted by the overlay.
    pub id_prefix: String,
    /// Decorate labels, except inside editable fields.
    pub sparkle: bool,
}

impl WalkerSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            threshold: config.classifier.threshold,
            min_text_len: config.walker.min_text_len,
            id_prefix: config.walker.overlay_id_prefix.clone(),
            sparkle: config.overlay.sparkle,
        }
    }
}

impl Default for WalkerSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Result of scanning one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Not a node the walker handles, or guarded against re-scanning.
    Skipped,
    /// Element whose children were queued.
    Descended { children: usize },
    /// Text node without words.
    NoCandidates,
    /// Nothing scored above the threshold, or the classifier had no answer.
    NoDetections,
    /// The node left the document while its batch was being classified.
    Detached,
    /// The text node was swapped for a wrapper holding this many overlays.
    Replaced { overlays: usize },
}

enum Visit {
    Skip(&'static str),
    Descend(Vec<NodeId>),
    Text(String),
}

/// Scans one node at a time; element children go back to the queue.
pub struct Walker {
    document: SharedDocument,
    inference: Arc<dyn Inference>,
    overlays: Arc<OverlayRegistry>,
    queue: Arc<ScanQueue>,
    settings: WalkerSettings,
}

impl Walker {
    pub fn new(
        document: SharedDocument,
        inference: Arc<dyn Inference>,
        overlays: Arc<OverlayRegistry>,
        queue: Arc<ScanQueue>,
        settings: WalkerSettings,
    ) -> Self {
        Self {
            document,
            inference,
            overlays,
            queue,
            settings,
        }
    }

    pub fn settings(&self) -> &WalkerSettings {
        &self.settings
    }

    pub async fn scan(&self, node: NodeId) -> ScanOutcome {
        let content = match self.visit(node) {
            Visit::Skip(reason) => {
                trace!("skip {}: {}", node, reason);
                return ScanOutcome::Skipped;
            }
            Visit::Descend(children) => {
                let count = children.len();
                self.queue.extend(children);
                return ScanOutcome::Descended { children: count };
            }
            Visit::Text(content) => content,
        };

        let candidates = extract(&content);
        if candidates.is_empty() {
            return ScanOutcome::NoCandidates;
        }

        let tokens: Vec<String> = candidates
            .iter()
            .map(|c| c.inner_str(&content).to_string())
            .collect();
        let scores = match self.inference.predict(tokens).await {
            Ok(Some(scores)) => scores,
            Ok(None) => return ScanOutcome::NoDetections,
            Err(e) => {
                warn!("Classification failed for {}, no detections: {}", node, e);
                return ScanOutcome::NoDetections;
            }
        };
        if scores.len() != candidates.len() {
            warn!(
                "Got {} scores for {} words in {}",
                scores.len(),
                candidates.len(),
                node
            );
            return ScanOutcome::NoDetections;
        }

        let accepted: Vec<&Candidate> = candidates
            .iter()
            .zip(&scores)
            .filter(|(c, score)| c.accepts(&content, **score, self.settings.threshold))
            .map(|(c, _)| c)
            .collect();
        if accepted.is_empty() {
            return ScanOutcome::NoDetections;
        }

        self.apply(node, &content, &accepted)
    }

    fn visit(&self, node: NodeId) -> Visit {
        let doc = self.document.lock();
        match doc.kind(node) {
            None => Visit::Skip("unknown node"),
            Some(NodeKind::Comment(_)) => Visit::Skip("comment"),
            Some(NodeKind::Element(tag)) => {
                if tag == "script" || tag == "style" {
                    return Visit::Skip("script or style");
                }
                if self.is_overlay(&doc, node) {
                    return Visit::Skip("overlay element");
                }
                Visit::Descend(doc.children(node).to_vec())
            }
            Some(NodeKind::Text(text)) => {
                let Some(parent) = doc.parent(node) else {
                    return Visit::Skip("no parent");
                };
                if text.chars().count() <= self.settings.min_text_len {
                    return Visit::Skip("too short");
                }
                if self.is_overlay(&doc, parent) {
                    return Visit::Skip("inside overlay");
                }
                Visit::Text(text.clone())
            }
        }
    }

    fn is_overlay(&self, doc: &Document, node: NodeId) -> bool {
        doc.id(node)
            .is_some_and(|id| id.starts_with(self.settings.id_prefix.as_str()))
    }

    /// Swap the text node for a wrapper with the overlays spliced in, then
    /// hook them up. One document write per node.
    fn apply(&self, node: NodeId, content: &str, accepted: &[&Candidate]) -> ScanOutcome {
        let mut doc = self.document.lock();

        if doc.parent(node).is_none() {
            debug!("{} detached while classifying, dropping result", node);
            return ScanOutcome::Detached;
        }
        if doc.text(node) != Some(content) {
            debug!("{} changed while classifying, scanning again", node);
            drop(doc);
            self.queue.push(node);
            return ScanOutcome::Skipped;
        }

        let sparkle = self.settings.sparkle && !doc.is_editable(node);
        let notations: Vec<&str> = accepted.iter().map(|c| c.inner_str(content)).collect();
        let markups = self.overlays.allocate_all(&notations);
        let first = markups[0].handle();

        let spliced = self
            .build_wrapper(&mut doc, content, accepted, &markups)
            .and_then(|wrapper| doc.replace_child(node, wrapper));
        if let Err(e) = spliced {
            warn!("Could not replace {}: {}", node, e);
            return ScanOutcome::Detached;
        }

        let report = self.overlays.hookup(&mut doc, first, markups.len(), sparkle);
        debug!(
            "replaced {} with {} overlays ({} render failures)",
            node,
            markups.len(),
            report.render_failures
        );
        ScanOutcome::Replaced {
            overlays: markups.len(),
        }
    }

    fn build_wrapper(
        &self,
        doc: &mut Document,
        content: &str,
        accepted: &[&Candidate],
        markups: &[OverlayMarkup],
    ) -> Result<NodeId, DomError> {
        let wrapper = doc.create_element("span");
        let wrapper_id = self.overlays.settings().wrapper_id(markups[0].handle());
        doc.set_attribute(wrapper, "id", wrapper_id)?;

        let mut cursor = 0;
        for (candidate, markup) in accepted.iter().zip(markups) {
            let inner = candidate.inner();
            if inner.start > cursor {
                let text = doc.create_text(&content[cursor..inner.start]);
                doc.append_child(wrapper, text)?;
            }
            let label = self.overlays.build(doc, markup)?.label;
            doc.append_child(wrapper, label)?;
            cursor = inner.end;
        }
        if cursor < content.len() {
            let text = doc.create_text(&content[cursor..]);
            doc.append_child(wrapper, text)?;
        }

        Ok(wrapper)
    }
}

#[cfg(test)]
#[path = "walker_tests.rs"]
mod tests;
