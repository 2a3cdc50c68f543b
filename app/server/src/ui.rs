//! Browser UI, embedded in the binary.

use axum::response::Html;

pub const INDEX_HTML: &str = include_str!("../static/index.html");

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
