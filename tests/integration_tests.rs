use review_pulse::analytics::aggregate::aggregate;
use review_pulse::analytics::insight::build_insight_context;
use review_pulse::parser::records::parse_reviews;
use serde_json::Value;

#[test]
fn test_full_pipeline() {
    let text = include_str!("fixtures/acme_reviews.csv");
    let reviews = parse_reviews(text).expect("Failed to parse export");
    assert_eq!(reviews.len(), 6);

    let result = aggregate(&reviews, "Acme Apartments", Some(2024), Some(1))
        .expect("Failed to aggregate reviews");

    assert_eq!(result.metrics.all_time_total, 6);
    assert_eq!(result.metrics.ytd_total, 4);
    assert_eq!(result.metrics.ytd_average, 4.5);
    assert_eq!(result.metrics.quarter_total, 4);
    assert_eq!(result.metrics.quarter_average, 4.5);
    // Lifting 4.5 over 4 reviews to 4.6 takes a single 5-star review.
    assert_eq!(result.metrics.reviews_to_improve, 1);

    // Quarterly trend covers Q1-Q4 even though only Q1 has data.
    assert_eq!(result.quarterly_trend.len(), 4);
    assert_eq!(result.quarterly_trend[0].review_count, 4);
    assert_eq!(result.quarterly_trend[3].review_count, 0);

    // Both years appear, ascending.
    let years: Vec<i32> = result.yearly_trend.iter().map(|b| b.year).collect();
    assert_eq!(years, vec![2023, 2024]);

    // YTD ratings 5,4,4,5 land in the 4- and 5-star buckets.
    let counts: Vec<usize> = result.distribution.iter().map(|b| b.count).collect();
    assert_eq!(counts, vec![0, 0, 0, 2, 2]);

    // Two quotable 5-star reviews in the quarter, longest text first.
    assert_eq!(result.top_reviews.len(), 2);
    assert_eq!(result.top_reviews[0].reviewer, "Priya N.");
    assert_eq!(result.top_reviews[1].reviewer, "Tom W.");
}

#[test]
fn test_previous_quarter_context_crosses_year_boundary() {
    let text = include_str!("fixtures/acme_reviews.csv");
    let reviews = parse_reviews(text).unwrap();

    let context = build_insight_context(&reviews, "Acme Apartments", 2024, 1);
    assert_eq!((context.previous_year, context.previous_quarter), (2023, 4));
    assert_eq!(context.current_reviews.len(), 4);
    assert_eq!(context.previous_reviews.len(), 2);
}

#[test]
fn test_messy_legacy_export() {
    // Semicolon-delimited, preamble rows above the header, CRLF line endings,
    // quoted delimiters, and a junk row that is dropped.
    let text = "Quarterly export\r\n\
Generated by the portal\r\n\
Published At;Score;Comment;Customer\r\n\
2024-01-15;5;\"Great pool; great gym\";Ana\r\n\
2024-02-03;4;Fine overall;Ben\r\n\
garbage-date;5;never counted;Cam\r\n";

    let reviews = parse_reviews(text).unwrap();
    assert_eq!(reviews.len(), 2);
    assert_eq!(reviews[0].text, "Fine overall");
    assert_eq!(reviews[1].text, "Great pool; great gym");

    let result = aggregate(&reviews, "Legacy", Some(2024), Some(1)).unwrap();
    assert_eq!(result.metrics.quarter_total, 2);
    assert_eq!(result.metrics.quarter_average, 4.5);
}

#[test]
fn test_fatal_errors_surface_verbatim() {
    let err = parse_reviews("\n").unwrap_err();
    assert_eq!(err.to_string(), "File appears to be empty.");

    let err = parse_reviews("color,shape\nred,square\n").unwrap_err();
    assert!(
        err.to_string()
            .starts_with("Could not identify Date or Rating columns.")
    );

    // A file whose rows all fail date parsing leaves nothing to aggregate.
    let reviews = parse_reviews("date,rating\nnope,5\n").unwrap();
    let err = aggregate(&reviews, "Acme", None, None).unwrap_err();
    assert_eq!(err.to_string(), "No valid reviews found.");
}

#[test]
fn test_json_artifact_keeps_bucket_order() {
    let text = include_str!("fixtures/acme_reviews.csv");
    let reviews = parse_reviews(text).unwrap();
    let result = aggregate(&reviews, "Acme Apartments", Some(2024), Some(1)).unwrap();

    let json: Value = serde_json::from_str(&serde_json::to_string_pretty(&result).unwrap()).unwrap();

    let quarters: Vec<i64> = json["quarterly_trend"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["quarter"].as_i64().unwrap())
        .collect();
    assert_eq!(quarters, vec![1, 2, 3, 4]);

    let stars: Vec<i64> = json["distribution"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["stars"].as_i64().unwrap())
        .collect();
    assert_eq!(stars, vec![1, 2, 3, 4, 5]);

    let years: Vec<i64> = json["yearly_trend"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["year"].as_i64().unwrap())
        .collect();
    assert_eq!(years, vec![2023, 2024]);

    assert_eq!(json["metrics"]["ytd_average"].as_f64().unwrap(), 4.5);
    assert_eq!(json["client_name"].as_str().unwrap(), "Acme Apartments");
}
