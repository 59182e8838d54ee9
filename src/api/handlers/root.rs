use axum::response::IntoResponse;

// axum handler for the root path, intentionally undocumented
pub async fn root() -> impl IntoResponse {
    concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"))
}
