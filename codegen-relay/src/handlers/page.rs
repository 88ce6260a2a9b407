use crate::config::DEFAULT_PROMPT;
use askama::Template;
use axum::response::IntoResponse;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub default_prompt: &'static str,
}

pub async fn index() -> impl IntoResponse {
    IndexTemplate {
        default_prompt: DEFAULT_PROMPT,
    }
}
