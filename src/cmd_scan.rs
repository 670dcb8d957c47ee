//! `scan` and `tokenize` subcommand handlers.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use chemhover_config::Config;
use chemhover_inference::channel::pair;
use chemhover_inference::{ClassifierAdapter, InferenceClient, InferenceHost};
use chemhover_overlay::{Document, Injection, PageSession, ScanReport, SvgLabelRenderer};
use chemhover_protocols::DomError;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

use crate::adapters;

static PARAGRAPH_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n[ \t\r]*\n").expect("static pattern"));

/// `<body>` with one `<p>` per blank-line separated paragraph.
pub(crate) fn build_document(text: &str) -> Result<Document, DomError> {
    let mut doc = Document::new();
    let body = doc.body();
    for paragraph in PARAGRAPH_BREAK.split(text) {
        let paragraph = paragraph.trim();
        if paragraph.is_empty() {
            continue;
        }
        let p = doc.create_element("p");
        let t = doc.create_text(paragraph);
        doc.append_child(p, t)?;
        doc.append_child(body, p)?;
    }
    Ok(doc)
}

/// Apply `scan` flags on top of the loaded configuration.
pub(crate) fn apply_overrides(
    config: &mut Config,
    threshold: Option<f32>,
    model: Option<String>,
    no_sparkle: bool,
) {
    if let Some(threshold) = threshold {
        config.classifier.threshold = threshold;
    }
    if let Some(model) = model {
        if model.starts_with("http://") || model.starts_with("https://") {
            config.classifier.model_url = Some(model);
            config.classifier.model_path = None;
        } else {
            config.classifier.model_path = Some(model.into());
        }
    }
    if no_sparkle {
        config.overlay.sparkle = false;
    }
}

/// Run the whole pipeline over `text`, with the classifier behind a channel
/// served from a background task. Returns the resulting body HTML.
pub(crate) async fn scan_text(config: &Config, text: &str) -> anyhow::Result<(String, ScanReport)> {
    let document = build_document(text)?.into_shared();

    let vocabulary = adapters::load_vocabulary(config).await?;
    let adapter = Arc::new(ClassifierAdapter::new(adapters::model_loader(
        config,
        vocabulary.clone(),
    )));
    let host = Arc::new(InferenceHost::new(adapter, adapters::tokenizer(vocabulary)));

    let (client_port, host_port) = pair();
    let host_task = host.spawn(host_port);
    let client = InferenceClient::connect(client_port, &config.channel);

    let session = PageSession::new(
        document,
        Arc::new(client),
        Arc::new(SvgLabelRenderer::new()),
        config,
    );
    if session.inject(true) != Injection::Started {
        anyhow::bail!("overlay did not start");
    }
    let report = session.run_until_idle().await;
    debug!("{:?}", report);

    let html = {
        let doc = session.document().lock();
        doc.outer_html(doc.body())
    };
    drop(session);
    host_task.abort();
    Ok((html, report))
}

pub(crate) async fn handle_scan(config: &Config, file: &Path) -> anyhow::Result<()> {
    let text = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("reading {}", file.display()))?;
    info!("Scanning {}", file.display());

    let (html, report) = scan_text(config, &text).await?;
    println!("{}", html);
    println!(
        "{} nodes scanned, {} text nodes replaced, {} overlays, {} without detections",
        report.scanned, report.replaced, report.overlays, report.no_detections
    );
    Ok(())
}

pub(crate) async fn handle_tokenize(config: &Config, words: &[String]) -> anyhow::Result<()> {
    let tokenizer = adapters::tokenizer(adapters::load_vocabulary(config).await?);
    let Some(tensor) = tokenizer.tokenize(words) else {
        println!("(empty batch)");
        return Ok(());
    };

    let (rows, cols) = tensor.shape();
    println!("shape: [{}, {}]", rows, cols);
    for (word, row) in words.iter().zip(tensor.iter_rows()) {
        let ids: Vec<String> = row.iter().map(|id| format!("{:>2}", id)).collect();
        println!("{:<16} {}", word, ids.join(" "));
    }
    Ok(())
}
