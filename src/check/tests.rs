use std::sync::Arc;
use std::time::Duration;

use super::*;
use crate::error::ErrorKind;
use crate::probe::{MockProber, MockResponse, ProbeMethod};
use crate::source::SourceDescriptor;

const BUDGET: Duration = Duration::from_secs(4);

fn example_source() -> SourceDescriptor {
    SourceDescriptor::new(
        "example",
        "https://example.com/search?q={keyword}",
        "Example",
    )
}

fn checker(prober: &Arc<MockProber>) -> TieredChecker {
    TieredChecker::new(prober.clone(), CheckConfig::default())
}

fn results_page(keyword: &str, cards: usize) -> String {
    let mut html = format!("<html><head><title>{keyword} results</title></head><body>");
    for i in 0..cards {
        html.push_str(&format!("<div class=\"result-card\">{keyword} #{i}</div>"));
    }
    html.push_str("</body></html>");
    html
}

#[tokio::test]
async fn test_basic_all_probes_succeed() {
    let prober = Arc::new(MockProber::new());
    let report = checker(&prober)
        .run(&example_source(), CheckTier::Basic, None, BUDGET)
        .await;

    assert_eq!(report.sub_scores.basic, Some(1.0));
    assert_eq!(report.sub_scores.functional, None);
    assert!(!report.short_circuited);
    assert_eq!(prober.call_count(), 3);
    assert!(prober.calls().iter().all(|c| c.method == ProbeMethod::Head));
    assert_eq!(prober.calls_matching("https://example.com/favicon.ico"), 1);
    assert_eq!(prober.calls_matching("https://example.com/robots.txt"), 1);
    assert_eq!(
        report.diagnostics.get("basic.connectivity"),
        Some(&serde_json::Value::Bool(true))
    );
}

#[tokio::test]
async fn test_dead_basic_short_circuits_higher_tiers() {
    let prober = Arc::new(MockProber::with_fallback(MockResponse::transport_error()));
    let report = checker(&prober)
        .run(&example_source(), CheckTier::Deep, Some("MIMK-138"), BUDGET)
        .await;

    assert_eq!(report.sub_scores.basic, Some(0.0));
    assert_eq!(report.sub_scores.highest(), Some(CheckTier::Basic));
    assert!(report.short_circuited);
    assert_eq!(prober.call_count(), 3);
    assert_eq!(report.dominant_error(), Some(ErrorKind::Transport));
}

#[tokio::test]
async fn test_partial_basic_connectivity_escalates() {
    let prober = Arc::new(
        MockProber::with_fallback(MockResponse::status(503))
            .route("/robots.txt", MockResponse::ok()),
    );
    let report = checker(&prober)
        .run(&example_source(), CheckTier::Functional, None, BUDGET)
        .await;

    let basic = report.sub_scores.basic.unwrap();
    assert!((basic - 1.0 / 3.0).abs() < 1e-9);
    assert!(!report.short_circuited);
    assert_eq!(report.sub_scores.functional, Some(0.0));
    assert_eq!(prober.calls_matching("/search?q="), 3);
}

#[tokio::test]
async fn test_functional_stops_at_first_working_keyword() {
    let prober = Arc::new(
        MockProber::new()
            .route("q=test", MockResponse::status(503))
            .route("q=video", MockResponse::html("<html><body>ok</body></html>")),
    );
    let report = checker(&prober)
        .run(&example_source(), CheckTier::Functional, None, BUDGET)
        .await;

    assert_eq!(report.sub_scores.functional, Some(0.5));
    assert_eq!(prober.calls_matching("q=2024"), 0);
    assert_eq!(
        report.diagnostics.get("functional.keyword"),
        Some(&serde_json::Value::String("video".to_string()))
    );
}

#[tokio::test]
async fn test_functional_first_keyword_success_scores_one() {
    let prober = Arc::new(MockProber::new());
    let report = checker(&prober)
        .run(&example_source(), CheckTier::Functional, None, BUDGET)
        .await;

    assert_eq!(report.sub_scores.functional, Some(1.0));
    assert_eq!(prober.calls_matching("/search?q="), 1);
}

#[tokio::test]
async fn test_content_tier_scores_relevant_page() {
    let prober = Arc::new(
        MockProber::new().route("q=MIMK-138", MockResponse::html(results_page("MIMK-138", 12))),
    );
    let report = checker(&prober)
        .run(&example_source(), CheckTier::Content, Some("MIMK-138"), BUDGET)
        .await;

    assert!(report.sub_scores.content.unwrap() >= 0.9);
    assert_eq!(
        report.diagnostics["content.relevance"]["quality"],
        serde_json::json!("excellent")
    );
    assert_eq!(
        report.diagnostics["content.keyword"],
        serde_json::json!("MIMK-138")
    );
}

#[tokio::test]
async fn test_content_tier_uses_default_keyword() {
    let prober = Arc::new(MockProber::new());
    let checker = checker(&prober);
    checker
        .run(&example_source(), CheckTier::Content, None, BUDGET)
        .await;

    let default = &checker.config().default_keyword;
    assert_eq!(prober.calls_matching(&format!("q={default}")), 1);
}

#[tokio::test]
async fn test_non_html_content_records_parse_error() {
    let prober = Arc::new(
        MockProber::new().route(
            "q=MIMK-138",
            MockResponse::html("<html><title>MIMK-138</title></html>")
                .with_content_type("application/json"),
        ),
    );
    let report = checker(&prober)
        .run(&example_source(), CheckTier::Content, Some("MIMK-138"), BUDGET)
        .await;

    assert_eq!(report.sub_scores.content, Some(0.0));
    assert!(report.errors.contains(&ErrorKind::Parse));
    assert_eq!(
        report.diagnostics["content.relevance"]["parse_failed"],
        serde_json::json!(true)
    );
}

#[tokio::test]
async fn test_deep_tier_fraction_of_keywords_with_content() {
    let prober = Arc::new(
        MockProber::new()
            .route("q=MIMK-138", MockResponse::html(results_page("MIMK-138", 12)))
            .route("q=SSIS-001", MockResponse::transport_error())
            .route("q=sample", MockResponse::html("<html><body>nothing</body></html>")),
    );
    let report = checker(&prober)
        .run(&example_source(), CheckTier::Deep, Some("MIMK-138"), BUDGET)
        .await;

    let deep = report.sub_scores.deep.unwrap();
    assert!((deep - 1.0 / 3.0).abs() < 1e-9);

    let metrics: DeepMetrics =
        serde_json::from_value(report.diagnostics["deep.quality_metrics"].clone()).unwrap();
    assert_eq!(metrics.attempted, 3);
    assert_eq!(metrics.with_target_content, 1);
    assert!((metrics.success_rate - 2.0 / 3.0).abs() < 1e-9);
    // The transport failure on one keyword did not stop the next one.
    assert_eq!(prober.calls_matching("q=sample"), 1);
}

#[tokio::test]
async fn test_budget_is_split_across_requested_tiers() {
    let prober = Arc::new(MockProber::new());
    checker(&prober)
        .run(
            &example_source(),
            CheckTier::Deep,
            Some("x"),
            Duration::from_millis(4000),
        )
        .await;

    let calls = prober.calls();
    assert!(calls.iter().all(|c| c.timeout <= Duration::from_millis(1000)));
    // Basic probes run side by side and share the whole first quarter.
    assert!(
        calls[..3]
            .iter()
            .all(|c| c.timeout > Duration::from_millis(900))
    );
}

#[tokio::test]
async fn test_hung_functional_keyword_leaves_time_for_the_next() {
    let prober = Arc::new(
        MockProber::new()
            .route("q=test", MockResponse::hang())
            .route(
                "q=video",
                MockResponse::html("<html><body>ok</body></html>")
                    .with_delay(Duration::from_millis(50)),
            ),
    );
    let report = checker(&prober)
        .run(
            &example_source(),
            CheckTier::Functional,
            None,
            Duration::from_millis(2000),
        )
        .await;

    assert_eq!(report.sub_scores.functional, Some(0.5));
    assert!(!report.diagnostics.contains_key("functional.timed_out"));
    assert_eq!(report.diagnostics["functional.attempts"].as_array().unwrap().len(), 2);
    assert_eq!(
        report.diagnostics["functional.keyword"],
        serde_json::json!("video")
    );

    let hung = prober
        .calls()
        .into_iter()
        .find(|c| c.url.contains("q=test"))
        .unwrap();
    assert!(hung.timeout < Duration::from_millis(500), "{:?}", hung.timeout);
}

#[tokio::test]
async fn test_hung_deep_keyword_does_not_abort_the_rest() {
    let prober = Arc::new(
        MockProber::new()
            .route("q=MIMK-138", MockResponse::html(results_page("MIMK-138", 12)))
            .route("q=SSIS-001", MockResponse::hang())
            .route("q=sample", MockResponse::html(results_page("sample", 12))),
    );
    let report = checker(&prober)
        .run(
            &example_source(),
            CheckTier::Deep,
            Some("MIMK-138"),
            Duration::from_millis(2000),
        )
        .await;

    let deep = report.sub_scores.deep.unwrap();
    assert!((deep - 2.0 / 3.0).abs() < 1e-9, "{deep}");
    assert!(!report.diagnostics.contains_key("deep.timed_out"));
    assert_eq!(prober.calls_matching("q=sample"), 1);
    assert_eq!(report.diagnostics["deep.keywords"].as_array().unwrap().len(), 3);
    assert!(report.errors.contains(&ErrorKind::Timeout));
}

#[tokio::test]
async fn test_hanging_tier_times_out_without_hanging_the_check() {
    let prober = Arc::new(MockProber::new().route("q=", MockResponse::hang()));
    let start = std::time::Instant::now();
    let report = checker(&prober)
        .run(
            &example_source(),
            CheckTier::Functional,
            None,
            Duration::from_millis(200),
        )
        .await;

    assert!(start.elapsed() < Duration::from_secs(2));
    assert_eq!(report.sub_scores.basic, Some(1.0));
    assert_eq!(report.sub_scores.functional, Some(0.0));
    assert_eq!(report.dominant_error(), Some(ErrorKind::Timeout));
}

#[tokio::test]
async fn test_invalid_template_fails_basic_with_transport_error() {
    let prober = Arc::new(MockProber::new());
    let source = SourceDescriptor::new("bad", "not a url {keyword}", "Bad");
    let report = checker(&prober)
        .run(&source, CheckTier::Content, None, BUDGET)
        .await;

    assert_eq!(report.sub_scores.basic, Some(0.0));
    assert!(report.short_circuited);
    assert_eq!(prober.call_count(), 0);
    assert!(report.diagnostics.contains_key("source.error"));
    assert_eq!(report.dominant_error(), Some(ErrorKind::Transport));
}

#[test]
fn test_deep_extra_keywords_skip_target_and_duplicates() {
    let config = CheckConfig::default();
    assert_eq!(
        config.deep_extra_keywords("MIMK-138"),
        vec!["SSIS-001".to_string(), "sample".to_string()]
    );
    assert_eq!(
        config.deep_extra_keywords("ssis-001"),
        vec!["IPX-001".to_string(), "sample".to_string()]
    );
}

#[test]
fn test_check_tier_order_and_parsing() {
    assert!(CheckTier::Basic < CheckTier::Functional);
    assert!(CheckTier::Content < CheckTier::Deep);
    assert_eq!(CheckTier::default(), CheckTier::Functional);
    assert_eq!("DEEP".parse::<CheckTier>(), Ok(CheckTier::Deep));
    assert!("bogus".parse::<CheckTier>().is_err());
    assert_eq!(CheckTier::Content.depth(), 3);
}

#[test]
fn test_report_response_time_falls_back_without_responses() {
    let mut report = CheckReport::default();
    assert_eq!(report.response_time_ms(42), 42);
    report.probe_times_ms = vec![10, 20, 30];
    assert_eq!(report.response_time_ms(42), 20);
}

#[test]
fn test_dominant_error_prefers_timeout_over_http() {
    let report = CheckReport {
        errors: vec![ErrorKind::Http, ErrorKind::Timeout, ErrorKind::Parse],
        ..CheckReport::default()
    };
    assert_eq!(report.dominant_error(), Some(ErrorKind::Timeout));
}
