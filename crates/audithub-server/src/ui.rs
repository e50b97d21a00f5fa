use axum::response::Html;

/// The single-page checklist UI, compiled into the binary.
pub const INDEX_HTML: &str = include_str!("../assets/index.html");

pub(crate) async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
