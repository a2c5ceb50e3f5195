// tests/runner.rs
use std::fs;

use serde_json::Value;
use tempfile::TempDir;

use lb_scrape::config::options::RunOptions;
use lb_scrape::runner;
use lb_scrape::{ScrapeError, SourceKind};

const PAGE: &str = r#"
<section class="activity-row"><h2 class="name">Wicked</h2><span class="rating rated-9"></span></section>
<section class="activity-row"><h2 class="name">Heat</h2></section>
"#;

const FEED: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<rss version="2.0" xmlns:letterboxd="https://letterboxd.com"><channel>
  <item>
    <letterboxd:filmTitle>Alien</letterboxd:filmTitle>
    <letterboxd:memberRating>5.0</letterboxd:memberRating>
  </item>
</channel></rss>"#;

fn tmp() -> TempDir {
    tempfile::tempdir().unwrap()
}

#[test]
fn missing_source_is_distinct_error() {
    let dir = tmp();
    let opts = RunOptions::default()
        .with_source(dir.path().join("nope.html"))
        .with_out(None);

    let err = runner::run(&opts).err().unwrap();
    assert!(err.is_missing_source());
    assert!(matches!(err, ScrapeError::MissingSource(_)));
}

#[test]
fn writes_pretty_envelope_creating_dirs() {
    let dir = tmp();
    let src = dir.path().join("page.html");
    fs::write(&src, PAGE).unwrap();
    let out = dir.path().join("nested/out/data.json");

    let opts = RunOptions::default()
        .with_source(&src)
        .with_out(Some(out.clone()))
        .with_limit(1);
    let summary = runner::run(&opts).unwrap();

    assert_eq!(summary.records.len(), 2);
    assert_eq!(summary.written.as_deref(), Some(out.as_path()));

    let text = fs::read_to_string(&out).unwrap();
    assert!(text.starts_with("{\n  \"merge_variables\": {"));
    assert!(text.contains("★★★★½"), "non-ASCII must not be escaped");

    let v: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(v["merge_variables"]["total_activities"], 1);
    assert_eq!(v["merge_variables"]["latest_title"], "Wicked");
}

#[test]
fn zero_records_still_publish_an_envelope() {
    let dir = tmp();
    let src = dir.path().join("empty.html");
    fs::write(&src, "<div>nothing here</div>").unwrap();

    let opts = RunOptions::default().with_source(&src).with_out(None);
    let summary = runner::run(&opts).unwrap();
    assert!(summary.records.is_empty());
    assert!(summary.written.is_none());

    let env = &summary.payload.merge_variables;
    assert_eq!(env.total_activities, 0);
    assert!(env.latest.is_none());
}

#[test]
fn feed_is_detected_without_a_kind() {
    let dir = tmp();
    let src = dir.path().join("rss.xml");
    fs::write(&src, FEED).unwrap();

    let summary = runner::run(&RunOptions::default().with_source(&src).with_out(None)).unwrap();
    assert_eq!(summary.records[0].title, "Alien");
    assert_eq!(summary.records[0].rating_display.as_deref(), Some("★★★★★"));
}

#[test]
fn forced_feed_kind_rejects_html() {
    let dir = tmp();
    let src = dir.path().join("page.html");
    fs::write(&src, "<section class=\"activity-row\"><br></section><p>").unwrap();

    let opts = RunOptions::default()
        .with_source(&src)
        .with_kind(Some(SourceKind::Feed))
        .with_out(None);
    assert!(matches!(runner::run(&opts), Err(ScrapeError::MalformedInput(_))));
}

#[test]
fn unreadable_source_is_a_read_error() {
    let dir = tmp();
    let err = runner::load_source(dir.path()).err().unwrap();
    assert!(!err.is_missing_source());
    assert!(matches!(err, ScrapeError::ReadSource { .. }));
}
