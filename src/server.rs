//! HTTP front end.
//!
//! Serves the rendered deck, the card list as JSON, the pager fragment and
//! a `POST /speak` endpoint backed by the configured [`Speaker`]. Static
//! files referenced by the cards (images, icons) are served from an
//! optional root directory.

use std::net::SocketAddr;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, Uri, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::DeckConfig;
use crate::data::Card;
use crate::deck::Deck;
use crate::device::{DeviceClass, FixedProbe, Viewport};
use crate::error::ServerError;
use crate::layout::render_error_page;
use crate::pager::{Pager, PagerAction};
use crate::speech::{SpeechOutcome, Speaker};

/// Default listen address.
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

const STYLESHEET: &str = include_str!("../assets/style.css");

/// State shared by all handlers.
#[derive(Debug)]
pub struct AppState {
    /// Loaded cards, or `None` when loading failed.
    pub cards: Option<Arc<Vec<Card>>>,
    /// Deck configuration.
    pub config: DeckConfig,
    /// Speech controller.
    pub speaker: Arc<Speaker>,
    /// Document title.
    pub title: String,
    /// Directory static card assets are served from.
    pub static_root: Option<PathBuf>,
}

/// Binds the server and starts serving in the background.
///
/// Returns the serve task and the bound address (useful when binding to
/// port 0 in tests). The task ends once `cancel` fires and in-flight
/// requests have drained.
///
/// # Errors
///
/// Returns [`ServerError`] if the address is invalid or cannot be bound.
pub async fn bind(
    bind_addr: &str,
    state: Arc<AppState>,
    cancel: CancellationToken,
) -> Result<(JoinHandle<()>, SocketAddr), ServerError> {
    let addr = parse_bind_addr(bind_addr)?;
    let listener = TcpListener::bind(&addr).await?;
    let bound = listener.local_addr()?;

    let router = build_router(state);
    let handle = tokio::spawn(async move {
        info!(%bound, "deck server started");
        if let Err(e) = axum::serve(listener, router)
            .with_graceful_shutdown(async move { cancel.cancelled().await })
            .await
        {
            warn!(error = %e, "deck server stopped with error");
        }
        debug!("deck server shut down");
    });
    Ok((handle, bound))
}

/// Builds the router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handle_index))
        .route("/style.css", get(handle_stylesheet))
        .route("/api/cards", get(handle_cards))
        .route("/pager", get(handle_pager))
        .route("/speak", axum::routing::post(handle_speak).options(handle_preflight))
        .fallback(handle_static)
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
struct IndexQuery {
    device: Option<DeviceClass>,
    page: Option<usize>,
}

/// `GET /`: the full deck.
///
/// The layout comes from `?device=` when given, otherwise from the
/// request's user agent.
async fn handle_index(
    State(state): State<Arc<AppState>>,
    Query(query): Query<IndexQuery>,
    headers: HeaderMap,
) -> Response {
    let Some(cards) = state.cards.clone() else {
        return (StatusCode::SERVICE_UNAVAILABLE, Html(render_error_page())).into_response();
    };

    let viewport = query.device.map_or_else(
        || Viewport {
            width: u32::MAX,
            user_agent: headers
                .get(header::USER_AGENT)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string(),
            ..Viewport::default()
        },
        Viewport::for_class,
    );
    let mut deck = Deck::new(cards, FixedProbe(viewport), &state.config);
    if let Some(page) = query.page {
        deck.select_page(page);
    }
    debug!(class = %deck.device_class(), page = deck.pager().current(), "rendering deck");
    Html(deck.render_page(&state.title)).into_response()
}

async fn handle_stylesheet() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], STYLESHEET)
}

/// `GET /api/cards`: the joined card list.
async fn handle_cards(State(state): State<Arc<AppState>>) -> Response {
    state.cards.as_ref().map_or_else(
        || {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                axum::Json(SpeakResponse::error("deck data not loaded")),
            )
                .into_response()
        },
        |cards| axum::Json(cards.as_slice()).into_response(),
    )
}

#[derive(Debug, Deserialize)]
struct PagerQuery {
    #[serde(default)]
    current: usize,
    total: usize,
}

/// `GET /pager?current=&total=`: the pager fragment.
async fn handle_pager(Query(query): Query<PagerQuery>) -> Html<String> {
    let mut pager = Pager::new(query.total);
    pager.apply(PagerAction::Select(query.current));
    Html(pager.render())
}

#[derive(Debug, Deserialize)]
struct SpeakRequest {
    text: String,
    lang: Option<String>,
}

/// Body of every `/speak` response.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpeakResponse {
    /// `success`, `canceled` or `error`.
    pub status: String,
    /// Human-readable detail.
    pub message: String,
}

impl SpeakResponse {
    fn new(status: &str, message: impl Into<String>) -> Self {
        Self {
            status: status.to_string(),
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self::new("error", message)
    }
}

fn with_cors(status: StatusCode, body: &SpeakResponse) -> Response {
    let mut response = (status, axum::Json(body)).into_response();
    response.headers_mut().insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    response
}

/// `POST /speak`: speaks `{"text", "lang"}`.
async fn handle_speak(State(state): State<Arc<AppState>>, body: axum::body::Bytes) -> Response {
    let request: SpeakRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            debug!(error = %e, "rejecting speak request");
            return with_cors(StatusCode::BAD_REQUEST, &SpeakResponse::error("Invalid JSON data"));
        }
    };
    if request.text.trim().is_empty() {
        return with_cors(StatusCode::BAD_REQUEST, &SpeakResponse::error("No text provided"));
    }

    info!(text = %request.text, lang = ?request.lang, "speak request");
    match state
        .speaker
        .speak(&request.text, request.lang.as_deref())
        .await
    {
        SpeechOutcome::Spoken { lang } => with_cors(
            StatusCode::OK,
            &SpeakResponse::new("success", format!("TTS executed ({lang})")),
        ),
        SpeechOutcome::Superseded | SpeechOutcome::Canceled => with_cors(
            StatusCode::OK,
            &SpeakResponse::new("canceled", "superseded by a newer request"),
        ),
        SpeechOutcome::Notified(notification) => with_cors(
            StatusCode::INTERNAL_SERVER_ERROR,
            &SpeakResponse::error(notification.message),
        ),
    }
}

/// `OPTIONS /speak`: CORS preflight.
async fn handle_preflight() -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
        ],
    )
}

/// Serves card assets from the static root.
async fn handle_static(State(state): State<Arc<AppState>>, uri: Uri) -> Response {
    let Some(root) = &state.static_root else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let Some(path) = safe_join(root, uri.path()) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    match tokio::fs::read(&path).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, content_type(&path))], bytes).into_response(),
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Joins a request path onto `root`, refusing anything but plain segments.
fn safe_join(root: &Path, request_path: &str) -> Option<PathBuf> {
    let relative = Path::new(request_path.trim_start_matches('/'));
    if relative.as_os_str().is_empty()
        || !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
    {
        return None;
    }
    Some(root.join(relative))
}

fn content_type(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        Some("json") => "application/json",
        Some("css") => "text/css; charset=utf-8",
        _ => "application/octet-stream",
    }
}

/// Parses a bind address string into a full `host:port` form.
///
/// Accepts:
/// - `:8080` → `0.0.0.0:8080`
/// - `8080` → `127.0.0.1:8080`
/// - `1.2.3.4:8080` → as-is
///
/// # Errors
///
/// Returns [`ServerError::InvalidAddress`] if the result is not a socket
/// address.
pub fn parse_bind_addr(input: &str) -> Result<String, ServerError> {
    let addr = if input.starts_with(':') {
        format!("0.0.0.0{input}")
    } else if input.parse::<u16>().is_ok() {
        format!("127.0.0.1:{input}")
    } else {
        input.to_string()
    };
    addr.parse::<SocketAddr>()
        .map_err(|e| ServerError::InvalidAddress {
            input: input.to_string(),
            message: e.to_string(),
        })?;
    Ok(addr)
}
