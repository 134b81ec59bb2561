//! HTTP server rendering the listing and post pages

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::content::PostKey;
use crate::source::SourceError;
use crate::templates::DetailState;
use crate::Blog;

#[derive(Debug, Deserialize)]
struct ListingParams {
    pages: Option<usize>,
}

/// Build the application router
pub fn router(blog: Blog) -> Router {
    let assets = ServeDir::new(&blog.static_dir);

    Router::new()
        .route("/", get(listing_handler))
        .route("/post/:slug", get(post_handler))
        .fallback_service(assets)
        .layer(TraceLayer::new_for_http())
        .with_state(blog)
}

/// Start the server
pub async fn start(blog: Blog, ip: &str, port: u16) -> Result<()> {
    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let app = router(blog);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Listing of posts; `?pages=N` keeps N pages loaded
async fn listing_handler(
    State(blog): State<Blog>,
    Query(params): Query<ListingParams>,
) -> Response {
    let controller = match blog.listing(params.pages.unwrap_or(1)).await {
        Ok(controller) => controller,
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch first page");
            return (StatusCode::BAD_GATEWAY, "Content source unavailable").into_response();
        }
    };

    let nav = blog.navigator();
    match blog.renderer().render_listing(
        &blog.config,
        &nav,
        controller.state(),
        controller.pages_loaded(),
    ) {
        Ok(html) => Html(html).into_response(),
        Err(e) => render_error(e),
    }
}

/// Detail page of a single post
async fn post_handler(State(blog): State<Blog>, Path(slug): Path<String>) -> Response {
    let key = match PostKey::parse(&slug) {
        Ok(key) => key,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };

    let state = blog.detail(&key).await;
    let status = match &state {
        DetailState::Ready(_) | DetailState::Pending => StatusCode::OK,
        DetailState::Failed(SourceError::NotFound(_)) => StatusCode::NOT_FOUND,
        DetailState::Failed(_) => StatusCode::BAD_GATEWAY,
    };

    let nav = blog.navigator();
    match blog.renderer().render_detail(&blog.config, &nav, &state) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => render_error(e),
    }
}

fn render_error(e: anyhow::Error) -> Response {
    tracing::error!("Template rendering failed: {:#}", e);
    (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
}
