use std::time::Duration;

use async_trait::async_trait;
use chemhover_protocols::ChannelError;
use tokio::sync::Notify;

use super::*;
use crate::dom::{Document, NodeId};
use crate::overlay::SvgLabelRenderer;

/// Scores mixed letter/digit words at 2.0.
struct FormulaInference;

#[async_trait]
impl Inference for FormulaInference {
    async fn predict(&self, tokens: Vec<String>) -> Result<Option<Vec<f32>>, ChannelError> {
        Ok(Some(
            tokens
                .iter()
                .map(|t| {
                    let letters = t.chars().any(|c| c.is_ascii_alphabetic());
                    let digits = t.chars().any(|c| c.is_ascii_digit());
                    if letters && digits { 2.0 } else { 0.0 }
                })
                .collect(),
        ))
    }

    async fn loading_status(&self) -> Result<bool, ChannelError> {
        Ok(true)
    }
}

/// Holds every batch until released; reports when one arrives.
struct GatedInference {
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

#[async_trait]
impl Inference for GatedInference {
    async fn predict(&self, tokens: Vec<String>) -> Result<Option<Vec<f32>>, ChannelError> {
        self.entered.notify_one();
        self.release.notified().await;
        FormulaInference.predict(tokens).await
    }

    async fn loading_status(&self) -> Result<bool, ChannelError> {
        Ok(true)
    }
}

fn session_with(document: Document) -> PageSession {
    PageSession::new(
        document.into_shared(),
        Arc::new(FormulaInference),
        Arc::new(SvgLabelRenderer),
        &Config::default(),
    )
}

fn add_paragraph(document: &SharedDocument, text: &str) -> NodeId {
    let mut doc = document.lock();
    let p = doc.create_element("p");
    let t = doc.create_text(text);
    doc.append_child(p, t).unwrap();
    let body = doc.body();
    doc.append_child(body, p).unwrap();
    t
}

#[tokio::test]
async fn test_inject_scans_body() {
    let session = session_with(Document::new());
    add_paragraph(session.document(), "water is H2O");
    add_paragraph(session.document(), "nothing here");

    assert_eq!(session.inject(true), Injection::Started);
    let report = session.run_until_idle().await;

    assert_eq!(report.replaced, 1);
    assert_eq!(report.overlays, 1);
    let doc = session.document().lock();
    assert!(doc.get_element_by_id("_ch-p0").is_some());
    assert!(doc.get_element_by_id("_ch-w0").is_some());
}

#[tokio::test]
async fn test_inject_is_idempotent() {
    let session = session_with(Document::new());
    add_paragraph(session.document(), "burn CH4");

    assert_eq!(session.inject(true), Injection::Started);
    assert_eq!(session.inject(true), Injection::AlreadyInjected);
    assert_eq!(session.queue().len(), 1);

    session.run_until_idle().await;
    assert_eq!(session.overlays().next_handle(), 1);
}

#[tokio::test]
async fn test_not_allowed_does_nothing() {
    let session = session_with(Document::new());
    add_paragraph(session.document(), "burn CH4");

    assert_eq!(session.inject(false), Injection::NotAllowed);
    assert!(!session.is_injected());
    assert!(session.queue().is_empty());

    // A later allowed injection still works.
    assert_eq!(session.inject(true), Injection::Started);
}

#[tokio::test]
async fn test_added_nodes_are_scanned_after_injection() {
    let session = session_with(Document::new());
    session.inject(true);
    session.run_until_idle().await;

    add_paragraph(session.document(), "later CO2 shows up");
    let report = session.run_until_idle().await;
    assert_eq!(report.replaced, 1);
    assert!(session.document().lock().get_element_by_id("_ch-p0").is_some());
}

#[tokio::test]
async fn test_own_insertions_do_not_cascade() {
    let session = session_with(Document::new());
    add_paragraph(session.document(), "H2O H2O H2O");
    session.inject(true);

    let first = session.run_until_idle().await;
    assert_eq!(first.overlays, 3);

    let body = session.document().lock().body();
    let html = session.document().lock().outer_html(body);
    let again = session.run_until_idle().await;
    assert_eq!(again, ScanReport::default());
    assert_eq!(session.document().lock().outer_html(body), html);
    assert_eq!(session.overlays().next_handle(), 3);
}

#[tokio::test]
async fn test_selection_release_scans_containers() {
    let session = session_with(Document::new());
    let text = add_paragraph(session.document(), "select NaCl here");

    assert_eq!(session.selection_released(Selection::collapsed(text)), 0);

    session.inject(true);
    session.run_until_idle().await;
    // Already replaced by the body scan; the selection finds a detached node.
    assert_eq!(session.selection_released(Selection::collapsed(text)), 1);
    let report = session.run_until_idle().await;
    assert_eq!(report.replaced, 0);
    assert_eq!(report.skipped, 1);
}

#[tokio::test]
async fn test_selection_release_in_fresh_text() {
    let mut doc = Document::new();
    let body = doc.body();
    let p = doc.create_element("p");
    doc.append_child(body, p).unwrap();
    let session = session_with(doc);
    session.inject(true);
    session.run_until_idle().await;

    // Text that appears without a reported mutation, as with edited content.
    let (start, end) = {
        let mut doc = session.document().lock();
        let start = doc.create_text("start LiOH");
        let end = doc.create_text("end KOH2");
        doc.append_child(p, start).unwrap();
        doc.append_child(p, end).unwrap();
        (start, end)
    };
    // Drop the mutation reports so only the selection triggers the scan.
    while session
        .observer
        .lock()
        .as_mut()
        .and_then(|o| o.try_batch())
        .is_some()
    {}

    assert_eq!(session.selection_released(Selection::new(start, end)), 2);
    let report = session.run_until_idle().await;
    assert_eq!(report.replaced, 2);
}

#[tokio::test]
async fn test_removed_overlays_are_pruned() {
    let session = session_with(Document::new());
    add_paragraph(session.document(), "first H2O");
    session.inject(true);
    session.run_until_idle().await;
    assert_eq!(session.overlays().len(), 1);

    {
        let mut doc = session.document().lock();
        let body = doc.body();
        let p = doc.first_child(body).unwrap();
        doc.remove(p).unwrap();
    }
    session.run_until_idle().await;
    assert!(session.overlays().is_empty());
}

#[tokio::test]
async fn test_spawned_session_reacts_to_mutations() {
    let session = session_with(Document::new());
    session.inject(true);
    session.spawn();

    add_paragraph(session.document(), "async NH3 arrives");

    let waited = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if session.document().lock().get_element_by_id("_ch-p0").is_some() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await;
    assert!(waited.is_ok(), "overlay never appeared");
}

#[tokio::test]
async fn test_dropped_session_abandons_scans_in_flight() {
    let entered = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let session = PageSession::new(
        Document::new().into_shared(),
        Arc::new(GatedInference {
            entered: entered.clone(),
            release: release.clone(),
        }),
        Arc::new(SvgLabelRenderer),
        &Config::default(),
    );
    add_paragraph(session.document(), "water is H2O");
    let document = session.document().clone();

    session.inject(true);
    session.spawn();
    tokio::time::timeout(Duration::from_secs(5), entered.notified())
        .await
        .expect("scan never reached the classifier");

    drop(session);
    tokio::time::sleep(Duration::from_millis(20)).await;
    release.notify_waiters();
    release.notify_one();
    tokio::time::sleep(Duration::from_millis(20)).await;

    let doc = document.lock();
    let body = doc.body();
    assert!(doc.get_element_by_id("_ch-p0").is_none());
    assert_eq!(doc.inner_html(body), "<p>water is H2O</p>");
}
