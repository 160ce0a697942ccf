//! End-to-end submissions against a real HTTP dataset endpoint.

use axum::{Json, Router, http::StatusCode, routing::get};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tripfinder::clients::{DataSource, HttpDataSource};
use tripfinder::domain::{SubmitOutcome, TravelEntry};
use tripfinder::services::{Navigator, Notifier, SearchRedirector};

#[derive(Default)]
struct Recorder {
    notices: Mutex<Vec<String>>,
    navigations: Mutex<Vec<String>>,
}

impl Notifier for Recorder {
    fn notify(&self, message: &str) {
        self.notices.lock().unwrap().push(message.to_string());
    }
}

impl Navigator for Recorder {
    fn navigate(&self, url: &str) {
        self.navigations.lock().unwrap().push(url.to_string());
    }
}

fn travels() -> Vec<TravelEntry> {
    vec![
        TravelEntry {
            name: "Paris Tour".to_string(),
            location: "France".to_string(),
            description: "Eiffel tower and museums".to_string(),
            url: "paris.html".to_string(),
        },
        TravelEntry {
            name: "Tokyo Trip".to_string(),
            location: "Japan".to_string(),
            description: "Shibuya and Asakusa".to_string(),
            url: "tokyo.html".to_string(),
        },
        TravelEntry {
            name: "Jeju Island".to_string(),
            location: "Korea".to_string(),
            description: "Hallasan".to_string(),
            url: "jeju.html".to_string(),
        },
        TravelEntry {
            name: "New York City".to_string(),
            location: "USA".to_string(),
            description: "Manhattan".to_string(),
            url: "nyc.html".to_string(),
        },
    ]
}

/// Serves `/travels.json`, `/broken.json` (500) and `/garbage.json`, and
/// counts dataset requests.
async fn spawn_dataset_server() -> (String, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();

    let app = Router::new()
        .route(
            "/travels.json",
            get(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Json(travels()) }
            }),
        )
        .route(
            "/broken.json",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        )
        .route("/garbage.json", get(|| async { "not json" }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), hits)
}

fn redirector_for(url: String) -> (SearchRedirector, Arc<Recorder>) {
    let recorder = Arc::new(Recorder::default());
    let redirector = SearchRedirector::new(
        Arc::new(HttpDataSource::new(url)),
        recorder.clone(),
        recorder.clone(),
    );
    (redirector, recorder)
}

#[tokio::test]
async fn http_source_returns_entries_in_order() {
    let (base, _) = spawn_dataset_server().await;
    let entries = HttpDataSource::new(format!("{base}/travels.json"))
        .fetch()
        .await
        .unwrap();
    assert_eq!(entries, travels());
}

#[tokio::test]
async fn tour_redirects_to_first_match() {
    let (base, hits) = spawn_dataset_server().await;
    let (redirector, recorder) = redirector_for(format!("{base}/travels.json"));

    let outcome = redirector.handle_submit("tour").await;

    assert_eq!(outcome, SubmitOutcome::Navigated("paris.html".to_string()));
    assert_eq!(*recorder.navigations.lock().unwrap(), ["paris.html"]);
    assert!(recorder.notices.lock().unwrap().is_empty());
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn matching_ignores_case_and_surrounding_whitespace() {
    let (base, _) = spawn_dataset_server().await;
    let (redirector, recorder) = redirector_for(format!("{base}/travels.json"));

    for raw in ["jeju", "JEJU", "  Jeju  "] {
        assert_eq!(
            redirector.handle_submit(raw).await,
            SubmitOutcome::Navigated("jeju.html".to_string())
        );
    }
    assert_eq!(
        redirector.handle_submit("york").await,
        SubmitOutcome::Navigated("nyc.html".to_string())
    );
    assert_eq!(recorder.navigations.lock().unwrap().len(), 4);
}

#[tokio::test]
async fn unknown_destination_notifies_without_navigation() {
    let (base, _) = spawn_dataset_server().await;
    let (redirector, recorder) = redirector_for(format!("{base}/travels.json"));

    assert_eq!(redirector.handle_submit("xyz").await, SubmitOutcome::NoResults);
    assert_eq!(recorder.notices.lock().unwrap().len(), 1);
    assert!(recorder.navigations.lock().unwrap().is_empty());
}

#[tokio::test]
async fn blank_query_never_hits_the_network() {
    let (base, hits) = spawn_dataset_server().await;
    let (redirector, recorder) = redirector_for(format!("{base}/travels.json"));

    assert_eq!(redirector.handle_submit("").await, SubmitOutcome::EmptyQuery);
    assert_eq!(redirector.handle_submit("   ").await, SubmitOutcome::EmptyQuery);

    assert_eq!(hits.load(Ordering::SeqCst), 0);
    assert_eq!(recorder.notices.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn dataset_is_fetched_for_every_submission() {
    let (base, hits) = spawn_dataset_server().await;
    let (redirector, _) = redirector_for(format!("{base}/travels.json"));

    redirector.handle_submit("paris").await;
    redirector.handle_submit("tokyo").await;

    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn error_status_is_silent_for_the_user() {
    let (base, _) = spawn_dataset_server().await;
    let (redirector, recorder) = redirector_for(format!("{base}/broken.json"));

    let outcome = redirector.handle_submit("tour").await;

    assert!(matches!(outcome, SubmitOutcome::Failed(ref msg) if msg.contains("500")));
    assert!(recorder.notices.lock().unwrap().is_empty());
    assert!(recorder.navigations.lock().unwrap().is_empty());
}

#[tokio::test]
async fn malformed_payload_is_silent_for_the_user() {
    let (base, _) = spawn_dataset_server().await;
    let (redirector, recorder) = redirector_for(format!("{base}/garbage.json"));

    let outcome = redirector.handle_submit("tour").await;

    assert!(matches!(outcome, SubmitOutcome::Failed(ref msg) if msg.contains("Malformed")));
    assert!(recorder.notices.lock().unwrap().is_empty());
    assert!(recorder.navigations.lock().unwrap().is_empty());
}

#[tokio::test]
async fn unreachable_endpoint_is_silent_for_the_user() {
    // Bind then drop to get a port nothing listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let (redirector, recorder) = redirector_for(format!("http://{addr}/travels.json"));

    assert!(matches!(
        redirector.handle_submit("tour").await,
        SubmitOutcome::Failed(_)
    ));
    assert!(recorder.notices.lock().unwrap().is_empty());
    assert!(recorder.navigations.lock().unwrap().is_empty());
}
