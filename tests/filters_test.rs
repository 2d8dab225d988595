// ABOUTME: Tests for the generic record filter/sort/project pipeline
// ABOUTME: Covers the identity law, stage semantics, ordering, limits, and projection

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use serde_json::{json, Value};
use trainerroad_export::filters::{apply_filters, FilterConfig, SortKey};

fn sample_records() -> Vec<Value> {
    vec![
        json!({ "id": 1, "name": "Baxter", "dateOnly": "2024-03-01", "tss": 60, "type": "workout" }),
        json!({ "id": 2, "name": "Antelope", "dateOnly": "2024-03-05", "tss": 90, "type": "workout" }),
        json!({ "id": 3, "name": "Carson", "dateOnly": "2024-02-20", "tss": 40, "typeId": 2 }),
        json!({ "id": 4, "name": "Dateless", "tss": 30, "type": "workout" }),
        json!({ "id": 5, "name": "Loadless", "dateOnly": "2024-03-03", "type": "event" }),
    ]
}

#[test]
fn empty_config_is_identity() {
    let records = sample_records();
    let outcome = apply_filters(&records, &FilterConfig::default()).unwrap();
    assert_eq!(outcome.records, records);
    assert_eq!(outcome.summary.input_count, 5);
    assert_eq!(outcome.summary.output_count, 5);
}

#[test]
fn date_range_excludes_out_of_range_and_unresolvable() {
    let records = sample_records();
    let config = FilterConfig {
        from_date: Some("2024-03-01".into()),
        to_date: Some("2024-03-31".into()),
        ..FilterConfig::default()
    };
    let outcome = apply_filters(&records, &config).unwrap();
    let ids: Vec<i64> = outcome
        .records
        .iter()
        .map(|record| record["id"].as_i64().unwrap())
        .collect();
    // Record 3 is before the range; record 4 has no resolvable date.
    assert_eq!(ids, vec![1, 2, 5]);
}

#[test]
fn date_range_is_idempotent() {
    let records = sample_records();
    let config = FilterConfig {
        from_date: Some("2024-03-01".into()),
        to_date: Some("2024-03-31".into()),
        ..FilterConfig::default()
    };
    let once = apply_filters(&records, &config).unwrap();
    let twice = apply_filters(&once.records, &config).unwrap();
    assert_eq!(once.records, twice.records);
}

#[test]
fn type_filter_matches_by_string_or_number() {
    let records = sample_records();
    let by_name = apply_filters(
        &records,
        &FilterConfig {
            type_filters: vec!["workout".into()],
            ..FilterConfig::default()
        },
    )
    .unwrap();
    assert_eq!(by_name.records.len(), 3);

    // Record 3 carries typeId 2; a numeric candidate must match it.
    let by_code = apply_filters(
        &records,
        &FilterConfig {
            type_filters: vec!["2".into()],
            ..FilterConfig::default()
        },
    )
    .unwrap();
    assert_eq!(by_code.records.len(), 1);
    assert_eq!(by_code.records[0]["id"], 3);
}

#[test]
fn contains_filter_is_case_insensitive() {
    let records = sample_records();
    let outcome = apply_filters(
        &records,
        &FilterConfig {
            contains: Some("antelope".into()),
            ..FilterConfig::default()
        },
    )
    .unwrap();
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0]["id"], 2);
}

#[test]
fn load_range_excludes_unresolvable_loads() {
    let records = sample_records();
    let outcome = apply_filters(
        &records,
        &FilterConfig {
            min_load: Some(50.0),
            max_load: Some(100.0),
            ..FilterConfig::default()
        },
    )
    .unwrap();
    let ids: Vec<i64> = outcome
        .records
        .iter()
        .map(|record| record["id"].as_i64().unwrap())
        .collect();
    // Record 5 has no load at all and must be absent, not erroring.
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn date_sort_is_lexical_and_stable() {
    let records = sample_records();
    let outcome = apply_filters(
        &records,
        &FilterConfig {
            sort: Some(SortKey::Date),
            ..FilterConfig::default()
        },
    )
    .unwrap();
    let ids: Vec<i64> = outcome
        .records
        .iter()
        .map(|record| record["id"].as_i64().unwrap())
        .collect();
    // The dateless record resolves to the empty string and sorts first.
    assert_eq!(ids, vec![4, 3, 1, 5, 2]);

    let desc = apply_filters(
        &records,
        &FilterConfig {
            sort: Some(SortKey::DateDesc),
            ..FilterConfig::default()
        },
    )
    .unwrap();
    let ids: Vec<i64> = desc
        .records
        .iter()
        .map(|record| record["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![2, 5, 1, 3, 4]);
}

#[test]
fn load_sort_places_unresolvable_last_in_both_directions() {
    let records = sample_records();
    let ascending = apply_filters(
        &records,
        &FilterConfig {
            sort: Some(SortKey::Load),
            ..FilterConfig::default()
        },
    )
    .unwrap();
    let ids: Vec<i64> = ascending
        .records
        .iter()
        .map(|record| record["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![4, 3, 1, 2, 5]);

    let descending = apply_filters(
        &records,
        &FilterConfig {
            sort: Some(SortKey::LoadDesc),
            ..FilterConfig::default()
        },
    )
    .unwrap();
    let ids: Vec<i64> = descending
        .records
        .iter()
        .map(|record| record["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![2, 1, 3, 4, 5]);
}

#[test]
fn result_limit_preserves_the_sorted_prefix() {
    let records = sample_records();
    let full = apply_filters(
        &records,
        &FilterConfig {
            sort: Some(SortKey::LoadDesc),
            ..FilterConfig::default()
        },
    )
    .unwrap();
    for limit in 0..=records.len() {
        let capped = apply_filters(
            &records,
            &FilterConfig {
                sort: Some(SortKey::LoadDesc),
                result_limit: Some(limit),
                ..FilterConfig::default()
            },
        )
        .unwrap();
        assert!(capped.records.len() <= limit);
        assert_eq!(capped.records[..], full.records[..limit]);
    }
}

#[test]
fn projection_keeps_missing_paths_as_null() {
    let records = vec![json!({
        "id": 9,
        "nested": { "inner": { "value": 7 } },
        "dateOnly": "2024-01-01",
    })];
    let outcome = apply_filters(
        &records,
        &FilterConfig {
            fields: vec!["id".into(), "nested.inner.value".into(), "missing.path".into()],
            ..FilterConfig::default()
        },
    )
    .unwrap();
    assert_eq!(
        outcome.records[0],
        json!({ "id": 9, "nested.inner.value": 7, "missing.path": null })
    );
}

#[test]
fn summary_echoes_the_resolved_config() {
    let records = sample_records();
    let config = FilterConfig {
        from_date: Some("2024-03-01".into()),
        to_date: Some("2024-03-31".into()),
        type_filters: vec!["workout".into()],
        contains: None,
        min_load: Some(50.0),
        max_load: None,
        sort: Some(SortKey::LoadDesc),
        result_limit: Some(1),
        fields: vec!["id".into()],
    };
    let outcome = apply_filters(&records, &config).unwrap();
    assert_eq!(outcome.summary.from.as_deref(), Some("2024-03-01"));
    assert_eq!(outcome.summary.type_filters, vec!["workout"]);
    assert_eq!(outcome.summary.min_tss, Some(50.0));
    assert_eq!(outcome.summary.sort.as_deref(), Some("tss-desc"));
    assert_eq!(outcome.summary.result_limit, Some(1));
    assert_eq!(outcome.summary.input_count, 5);
    assert_eq!(outcome.summary.output_count, 1);
    assert_eq!(outcome.records[0], json!({ "id": 2 }));
}

#[test]
fn pipeline_stage_order_filters_before_sort_and_limit() {
    let records = sample_records();
    let outcome = apply_filters(
        &records,
        &FilterConfig {
            type_filters: vec!["workout".into()],
            sort: Some(SortKey::Load),
            result_limit: Some(2),
            ..FilterConfig::default()
        },
    )
    .unwrap();
    let ids: Vec<i64> = outcome
        .records
        .iter()
        .map(|record| record["id"].as_i64().unwrap())
        .collect();
    // Type filter first (1, 2, 4), then load ascending (4, 1, 2), then cap.
    assert_eq!(ids, vec![4, 1]);
}

#[test]
fn pascal_cased_payloads_still_resolve() {
    let records = vec![json!({ "Id": 1, "Name": "Pascal", "Tss": 75, "Date": "2024-03-01T00:00:00Z" })];
    let outcome = apply_filters(
        &records,
        &FilterConfig {
            from_date: Some("2024-03-01".into()),
            to_date: Some("2024-03-01".into()),
            min_load: Some(70.0),
            contains: Some("pascal".into()),
            ..FilterConfig::default()
        },
    )
    .unwrap();
    assert_eq!(outcome.records.len(), 1);
}
