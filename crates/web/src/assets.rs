//! Embedded static assets for the operator page.

use axum::{
    extract::Path,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};

static ASSETS: include_dir::Dir = include_dir::include_dir!("$CARGO_MANIFEST_DIR/src/assets");

pub(crate) async fn index() -> Response {
    match ASSETS.get_file("index.html") {
        Some(file) => Html(file.contents()).into_response(),
        None => (StatusCode::NOT_FOUND, "dashboard page missing").into_response(),
    }
}

pub(crate) async fn serve_asset(Path(path): Path<String>) -> Response {
    match ASSETS.get_file(&path) {
        Some(file) => {
            ([(header::CONTENT_TYPE, mime_for_path(&path))], file.contents()).into_response()
        },
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

fn mime_for_path(path: &str) -> &'static str {
    match path.rsplit('.').next().unwrap_or("") {
        "css" => "text/css; charset=utf-8",
        "js" => "application/javascript; charset=utf-8",
        "html" => "text/html; charset=utf-8",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "ico" => "image/x-icon",
        _ => "application/octet-stream",
    }
}
