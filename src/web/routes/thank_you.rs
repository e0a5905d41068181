use axum::response::Html;

/// Static confirmation page shown after a browser form submission.
pub async fn thank_you() -> Html<&'static str> {
    Html(include_str!("../../../static/gracias.html"))
}
