//! `render` command
//!
//! Loads the deck and writes it as static HTML (or one fragment of it).
//! When any source fails to load, the error page is written instead and
//! the command exits with the data-error code.

use std::path::Path;
use std::sync::Arc;

use tokio::io::AsyncWriteExt;

use crate::cli::args::{Fragment, RenderArgs};
use crate::cli::commands::load_deck_config;
use crate::data::load_cards;
use crate::deck::Deck;
use crate::device::{DeviceClass, FixedProbe, Viewport};
use crate::error::NamedeckError;
use crate::layout::render_error_page;

/// Render the deck.
///
/// # Errors
///
/// Returns a configuration error for bad configuration, a data error after
/// writing the error page if loading fails, or an I/O error if the output
/// cannot be written.
pub async fn run(args: &RenderArgs) -> Result<(), NamedeckError> {
    let config = load_deck_config(&args.source)?;
    let client = reqwest::Client::new();

    let cards = match load_cards(&config.data, &client).await {
        Ok(cards) => cards,
        Err(e) => {
            tracing::error!(error = %e, "failed to load deck data");
            write_output(args.output.as_deref(), &render_error_page()).await?;
            return Err(e.into());
        }
    };

    let class = DeviceClass::from(args.device);
    let mut deck = Deck::new(
        Arc::new(cards),
        FixedProbe(Viewport::for_class(class)),
        &config,
    );
    if args.page > 0 && !deck.select_page(args.page) {
        return Err(NamedeckError::Usage(format!(
            "page {} out of range (deck has {} pages)",
            args.page,
            deck.pager().total()
        )));
    }

    let output = match args.fragment {
        Fragment::Document => deck.render_page(&args.title),
        Fragment::Sheets => deck.render_sheets(),
        Fragment::Pager => deck.render_pager(),
        Fragment::Cards => serde_json::to_string_pretty(deck.cards())
            .map_err(|e| NamedeckError::Io(std::io::Error::other(e)))?,
    };
    tracing::info!(
        class = %deck.device_class(),
        sheets = deck.sheets().len(),
        page = deck.pager().current(),
        "deck rendered"
    );
    write_output(args.output.as_deref(), &output).await
}

async fn write_output(path: Option<&Path>, content: &str) -> Result<(), NamedeckError> {
    match path {
        Some(path) => tokio::fs::write(path, content).await?,
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(content.as_bytes()).await?;
            stdout.flush().await?;
        }
    }
    Ok(())
}
