// tests/envelope.rs
use chrono::NaiveDate;
use serde_json::{Value, json};

use lb_scrape::format::{Payload, build_envelope, build_envelope_at};
use lb_scrape::specs::activity;
use lb_scrape::ActivityRecord;

fn record(title: &str, rating: Option<f64>) -> ActivityRecord {
    ActivityRecord {
        title: title.into(),
        year: Some("2024".into()),
        slug: None,
        url: None,
        rating,
        rating_display: rating.map(lb_scrape::format::render_stars),
        review: None,
        datetime: None,
        date: None,
        date_short: None,
    }
}

fn noon() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 12, 26)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

#[test]
fn limit_selects_first_records_in_order() {
    let records: Vec<_> = (1..=8).map(|i| record(&format!("Film {i}"), Some(3.0))).collect();
    let env = build_envelope(&records, 5, "NicoleP");

    assert_eq!(env.movies.len(), 5);
    assert_eq!(env.total_activities, 5);
    let titles: Vec<_> = env.movies.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, ["Film 1", "Film 2", "Film 3", "Film 4", "Film 5"]);

    let latest = env.latest.as_ref().unwrap();
    assert_eq!(latest.latest_title, env.movies[0].title);
    assert_eq!(records.len(), 8);
}

#[test]
fn empty_input_has_no_latest_keys() {
    let env = build_envelope_at(&[], 5, "NicoleP", noon());
    assert_eq!(env.total_activities, 0);
    assert!(env.latest.is_none());

    let v = serde_json::to_value(Payload::from(env)).unwrap();
    let vars = v["merge_variables"].as_object().unwrap();
    assert!(vars.keys().all(|k| !k.starts_with("latest_")));
    assert_eq!(vars["movies"], json!([]));
    assert_eq!(vars["total_activities"], json!(0));
}

#[test]
fn serialized_envelope_is_fully_keyed() {
    let records = activity::extract(concat!(
        r#"<section class="activity-row"><h2 class="name">Wicked</h2>"#,
        r#"<a href="/films/year/2024/">2024</a><span class="rating rated-9"></span>"#,
        r#"<time datetime="2024-12-25T10:00:00"></time>"#,
        r#"<div class="js-review-body">Great movie</div></section>"#,
        r#"<section class="activity-row"><h2 class="name">Heat</h2></section>"#,
    ));
    let env = build_envelope_at(&records, 5, "NicoleP", noon());
    let v = serde_json::to_value(Payload::from(env)).unwrap();

    assert_eq!(
        v,
        json!({
            "merge_variables": {
                "user": "NicoleP",
                "update_time": "Dec 26, 2024 12:00 PM",
                "movies": [
                    {
                        "title": "Wicked",
                        "year": "2024",
                        "rating": 4.5,
                        "rating_display": "★★★★½",
                        "review": "Great movie",
                        "date": "Dec 25, 2024",
                        "date_short": "Dec 25",
                        "url": ""
                    },
                    {
                        "title": "Heat",
                        "year": "",
                        "rating": 0.0,
                        "rating_display": "",
                        "review": "",
                        "date": "",
                        "date_short": "",
                        "url": ""
                    }
                ],
                "total_activities": 2,
                "latest_title": "Wicked",
                "latest_year": "2024",
                "latest_rating": "★★★★½",
                "latest_review": "Great movie",
                "latest_date": "Dec 25, 2024"
            }
        })
    );
}

// Lossy on purpose: an unrated entry and a zero-star entry look the same.
#[test]
fn absent_rating_coerces_to_zero() {
    let env = build_envelope_at(&[record("Heat", None), record("Cats", Some(0.0))], 5, "u", noon());
    assert_eq!(env.movies[0].rating, 0.0);
    assert_eq!(env.movies[0].rating, env.movies[1].rating);
    assert_eq!(env.movies[0].rating_display, "");

    let v = serde_json::to_value(&env.movies[0]).unwrap();
    assert_eq!(v["rating"].as_f64(), Some(0.0));
}

#[test]
fn limit_larger_than_input_keeps_everything() {
    let records = vec![record("A", None), record("B", None)];
    let env = build_envelope_at(&records, 5, "u", noon());
    assert_eq!(env.total_activities, 2);
}

#[test]
fn zero_limit_is_an_empty_envelope() {
    let env = build_envelope_at(&[record("A", None)], 0, "u", noon());
    assert!(env.movies.is_empty());
    assert!(env.latest.is_none());
}

#[test]
fn update_time_is_the_only_time_dependent_field() {
    let records = vec![record("A", Some(2.5))];
    let a = serde_json::to_value(build_envelope_at(&records, 5, "u", noon())).unwrap();
    let later = noon() + chrono::Duration::hours(3);
    let b = serde_json::to_value(build_envelope_at(&records, 5, "u", later)).unwrap();

    let strip = |mut v: Value| {
        v.as_object_mut().unwrap().remove("update_time");
        v
    };
    assert_ne!(a["update_time"], b["update_time"]);
    assert_eq!(strip(a), strip(b));
}
