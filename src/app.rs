use std::net::SocketAddr;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::state::AppState;
use crate::users::handlers;

/// Build the router: the two credential endpoints, their HTML pages, and the
/// static asset fallback (which also serves index.html at `/`).
pub fn build_app(state: AppState) -> Router {
    let public = state.config.public_dir.clone();

    Router::new()
        .route(
            "/register",
            post(handlers::register).get_service(ServeFile::new(public.join("register.html"))),
        )
        .route(
            "/login",
            post(handlers::login).get_service(ServeFile::new(public.join("login.html"))),
        )
        .route("/health", get(|| async { "ok" }))
        .fallback_service(ServeDir::new(&public))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router, host: &str, port: u16) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
