//! HTTP front end.
//!
//! `GET /search?query=...` answers with a JSON array of
//! `{"rank", "path", "score"}` objects, best first. A missing or blank
//! query answers `[]`. `GET /` serves a small search page built on that
//! endpoint.

use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json,
    Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse},
    routing::get,
};
use serde::Deserialize;

use crate::{
    config::DEFAULT_HTTP_RESULT_LIMIT,
    corpus::Corpus,
    error::Result,
    ranker::Ranker,
    search::{self, SearchHit, SearchParams},
};

/// State shared by every request.
#[derive(Debug)]
pub struct AppState {
    pub corpus: Corpus,
    pub ranker: Ranker,
    pub limit: usize,
}

impl AppState {
    pub fn new(corpus: Corpus, ranker: Ranker) -> Self {
        Self {
            corpus,
            ranker,
            limit: DEFAULT_HTTP_RESULT_LIMIT,
        }
    }
}

const INDEX_HTML: &str = include_str!("../web/index.html");
const APP_JS: &str = include_str!("../web/app.js");
const STYLE_CSS: &str = include_str!("../web/style.css");

#[derive(Debug, Deserialize)]
struct SearchQuery {
    query: Option<String>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/app.js", get(app_script))
        .route("/style.css", get(stylesheet))
        .route("/search", get(handle_search))
        .with_state(state)
}

async fn index_page() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn app_script() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/javascript; charset=utf-8")], APP_JS)
}

async fn stylesheet() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], STYLE_CSS)
}

async fn handle_search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> std::result::Result<Json<Vec<SearchHit>>, StatusCode> {
    let query = params.query.unwrap_or_default();
    if query.trim().is_empty() {
        return Ok(Json(Vec::new()));
    }

    // Ranking is CPU bound and fans out on rayon.
    let hits = tokio::task::spawn_blocking(move || {
        let params = SearchParams {
            query,
            count: state.limit,
            all: false,
            min_score: 0.0,
        };
        search::execute_search(&params, &state.corpus, &state.ranker)
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "search task failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(hits))
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(addr: SocketAddr, state: Arc<AppState>) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        documents = state.corpus.len(),
        "listening"
    );
    axum::serve(listener, router(state)).await?;
    Ok(())
}
