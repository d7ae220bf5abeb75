use crate::api::state::{AppState, MessageStructure};
use crate::{api, opts::*};

use std::fs;

use anyhow::Context;
use mass_format_core::YrsDocument;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

pub async fn run(http_opts: HttpOpts, highlight_opts: HighlightOpts) -> anyhow::Result<()> {
    let config = highlight_opts.config();
    let mut document = YrsDocument::new(&config);

    if let Some(seed) = &http_opts.seed {
        let text = fs::read_to_string(seed)
            .with_context(|| format!("failed to read seed {}", seed.display()))?;
        for line in text.lines() {
            document.push_paragraph(line);
        }
        tracing::info!(paragraphs = text.lines().count(), "seeded document");
    }

    // Server -> all clients
    let (broadcast_tx, _) = broadcast::channel::<MessageStructure>(100);

    // Every committed transaction (client edit or highlight pass) goes out as a delta.
    // The returned handle must stay alive for the observer to keep firing.
    let tx_for_observer = broadcast_tx.clone();
    let _subscription = document.doc().observe_update_v1(move |_txn, update_event| {
        let _ = tx_for_observer.send(MessageStructure::YjsUpdate(update_event.update.to_vec()));
    });

    let app_state = AppState::new(document, config, broadcast_tx);

    tracing::info!("http listening on {}", http_opts.host);
    let app = api::build_app(&http_opts, app_state)?;
    let listener = TcpListener::bind(&http_opts.host).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {:?}", e);
    }
    tracing::info!("shutting down");
}
