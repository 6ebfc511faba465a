use super::*;

fn example_source() -> SourceDescriptor {
    SourceDescriptor::new(
        "example",
        "https://example.com/search?q={keyword}",
        "Example",
    )
}

#[test]
fn test_render_substitutes_keyword() {
    let source = example_source();
    assert_eq!(
        source.render("MIMK-138"),
        "https://example.com/search?q=MIMK-138"
    );
}

#[test]
fn test_render_encodes_keyword() {
    let source = example_source();
    assert_eq!(
        source.render("a b&c"),
        "https://example.com/search?q=a+b%26c"
    );
}

#[test]
fn test_render_replaces_every_placeholder() {
    let source = SourceDescriptor::new("s", "https://x.test/{keyword}/?q={keyword}", "S");
    assert_eq!(source.render("k"), "https://x.test/k/?q=k");
}

#[test]
fn test_origin_strips_path_and_query() {
    assert_eq!(example_source().origin().unwrap(), "https://example.com");
}

#[test]
fn test_origin_keeps_explicit_port() {
    let source = SourceDescriptor::new("s", "http://127.0.0.1:8123/find/{keyword}", "S");
    assert_eq!(source.origin().unwrap(), "http://127.0.0.1:8123");
}

#[test]
fn test_origin_path_joins() {
    let source = example_source();
    assert_eq!(
        source.origin_path("/robots.txt").unwrap(),
        "https://example.com/robots.txt"
    );
    assert_eq!(
        source.origin_path("favicon.ico").unwrap(),
        "https://example.com/favicon.ico"
    );
}

#[test]
fn test_invalid_template_is_rejected() {
    let source = SourceDescriptor::new("bad", "not a url {keyword}", "Bad");
    assert!(matches!(
        source.origin(),
        Err(SourceError::InvalidTemplate { .. })
    ));
}

#[test]
fn test_non_http_scheme_is_rejected() {
    let source = SourceDescriptor::new("ftp", "ftp://files.test/{keyword}", "Ftp");
    assert!(matches!(
        source.origin(),
        Err(SourceError::UnsupportedScheme { .. })
    ));
}

#[test]
fn test_descriptor_deserializes_from_json() {
    let json = r#"{"id":"a","url_template":"https://a.test/?q={keyword}","name":"A"}"#;
    let source: SourceDescriptor = serde_json::from_str(json).unwrap();
    assert_eq!(source.id, "a");
}
