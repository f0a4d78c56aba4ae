use axum::response::Html;

/// Static landing page.
pub async fn index() -> Html<&'static str> {
    Html(include_str!("../../static/index.html"))
}
