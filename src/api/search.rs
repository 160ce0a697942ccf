use axum::{
    Form, Json,
    extract::{Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::{Arc, Mutex};
use tracing::error;

use crate::domain::{SearchQuery, TravelEntry};
use crate::services::{Navigator, Notifier, ResultsView, SearchRedirector, all_matches};

use super::assets::index_page;
use super::{ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug)]
enum Reply {
    Notice(String),
    Navigate(String),
    Results(Vec<TravelEntry>),
}

/// Collects what one form submission wants to show, so the handler can turn
/// it into a single HTTP response.
#[derive(Default)]
struct PageReply {
    reply: Mutex<Option<Reply>>,
}

impl PageReply {
    fn set(&self, reply: Reply) {
        if let Ok(mut slot) = self.reply.lock() {
            *slot = Some(reply);
        }
    }

    fn take(&self) -> Option<Reply> {
        self.reply.lock().ok().and_then(|mut slot| slot.take())
    }
}

impl Notifier for PageReply {
    fn notify(&self, message: &str) {
        self.set(Reply::Notice(message.to_string()));
    }
}

impl Navigator for PageReply {
    fn navigate(&self, url: &str) {
        self.set(Reply::Navigate(url.to_string()));
    }
}

impl ResultsView for PageReply {
    fn show(&self, entries: &[TravelEntry]) {
        self.set(Reply::Results(entries.to_vec()));
    }
}

/// Form target of the search page.
///
/// A match answers with `303 See Other`; notices and result lists re-render
/// the page; a failed retrieval answers `204 No Content` so the browser
/// keeps showing the page it already has.
pub async fn submit_search(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SearchForm>,
) -> Response {
    let page = Arc::new(PageReply::default());

    let redirector = SearchRedirector::new(state.source.clone(), page.clone(), page.clone())
        .configured(&state.config.search)
        .with_results_view(page.clone());

    redirector.handle_submit(&form.query).await;

    match page.take() {
        Some(Reply::Navigate(url)) => see_other(&url),
        Some(Reply::Notice(message)) => render(&notice_html(&message)),
        Some(Reply::Results(entries)) => render(&results_html(&entries)),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

/// All matches as JSON, regardless of the configured mode.
pub async fn search_entries(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<ApiResponse<Vec<TravelEntry>>>, ApiError> {
    let query = SearchQuery::normalize(&params.q);
    if query.is_empty() {
        return Err(ApiError::validation(
            state.config.search.empty_query_message.clone(),
        ));
    }

    let entries = state.source.fetch().await?;

    Ok(Json(ApiResponse::success(all_matches(&entries, &query))))
}

pub async fn list_entries(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<TravelEntry>>>, ApiError> {
    let entries = state.source.fetch().await?;
    Ok(Json(ApiResponse::success(entries)))
}

fn see_other(url: &str) -> Response {
    match HeaderValue::from_str(url) {
        Ok(location) => (StatusCode::SEE_OTHER, [(header::LOCATION, location)]).into_response(),
        Err(e) => {
            error!(event = "redirect_rejected", url, error = %e, "Matched URL is not a valid Location header");
            StatusCode::NO_CONTENT.into_response()
        }
    }
}

fn render(content: &str) -> Response {
    match index_page(content) {
        Some(html) => Html(html).into_response(),
        None => ApiError::InternalError("search page asset missing".to_string()).into_response(),
    }
}

fn notice_html(message: &str) -> String {
    format!(
        r#"<p class="notice" role="alert">{}</p>"#,
        html_escape::encode_text(message)
    )
}

fn results_html(entries: &[TravelEntry]) -> String {
    let mut html = String::new();
    for entry in entries {
        html.push_str(&format!(
            concat!(
                r#"<div class="result-item">"#,
                "<h3>{name}</h3><p>{location}</p><p>{description}</p>",
                r#"<a href="{url}" target="_blank">자세히 보기</a>"#,
                "</div>"
            ),
            name = html_escape::encode_text(&entry.name),
            location = html_escape::encode_text(&entry.location),
            description = html_escape::encode_text(&entry.description),
            url = html_escape::encode_double_quoted_attribute(&entry.url),
        ));
    }
    html
}
