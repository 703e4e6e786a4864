//! `serve` command
//!
//! Loads the deck once, then serves it until cancelled. A failed load is
//! logged and the server keeps running, answering every page request with
//! the error page.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::cli::args::ServeArgs;
use crate::cli::commands::{build_speaker, load_deck_config};
use crate::data::{DataSource, load_cards};
use crate::error::NamedeckError;
use crate::server::{self, AppState};

/// Serve the deck over HTTP.
///
/// # Errors
///
/// Returns a configuration error for bad configuration or a server error
/// if the address cannot be bound.
pub async fn run(args: &ServeArgs, cancel: CancellationToken) -> Result<(), NamedeckError> {
    let config = load_deck_config(&args.source)?;
    let speaker = build_speaker(&config)?;

    let cards = match load_cards(&config.data, &reqwest::Client::new()).await {
        Ok(cards) => Some(Arc::new(cards)),
        Err(e) => {
            tracing::error!(error = %e, "failed to load deck data; serving error page");
            None
        }
    };

    let static_root = args.static_root.clone().or_else(|| match &config.data.catalog {
        DataSource::Path(path) => path.parent().map(std::path::Path::to_path_buf),
        DataSource::Url(_) => None,
    });
    if let Some(root) = &static_root {
        tracing::debug!(root = %root.display(), "serving static assets");
    }

    let state = Arc::new(AppState {
        cards,
        config,
        speaker: Arc::new(speaker),
        title: args.title.clone(),
        static_root,
    });

    let (handle, bound) = server::bind(&args.http, state, cancel.clone()).await?;
    tracing::info!(%bound, "HTTP server listening");

    cancel.cancelled().await;
    tracing::info!("shutting down");
    if let Err(e) = handle.await {
        tracing::warn!(error = %e, "server task ended abnormally");
    }
    Ok(())
}
