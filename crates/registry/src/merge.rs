//! Monthly economic-index merging.
//!
//! Newly fetched records are merged into the held history without losing
//! previously stored readings for a month the fetch only partially covers:
//! incoming values win per index name, readings present only in the
//! existing record are preserved, and unseen months insert as-is.

use std::collections::BTreeMap;

use patrimonio_types::MonthlyRecord;

/// Merges incoming records into the existing history.
///
/// Returns the full merged history sorted most-recent-month first. Merging
/// the same batch twice yields the same result as merging it once.
#[must_use]
pub fn merge_indices(existing: &[MonthlyRecord], incoming: &[MonthlyRecord]) -> Vec<MonthlyRecord> {
    let mut by_date: BTreeMap<String, MonthlyRecord> =
        existing.iter().map(|record| (record.date.clone(), record.clone())).collect();

    for record in incoming {
        match by_date.get_mut(&record.date) {
            Some(held) => {
                for (name, value) in &record.indices {
                    held.indices.insert(name.clone(), *value);
                }
            }
            None => {
                by_date.insert(record.date.clone(), record.clone());
            }
        }
    }

    // BTreeMap iterates ascending; the history is served descending.
    by_date.into_values().rev().collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(date: &str, pairs: &[(&str, f64)]) -> MonthlyRecord {
        MonthlyRecord {
            date: date.to_string(),
            indices: pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }

    #[test]
    fn test_new_month_inserts_unchanged() {
        let existing = vec![record("2025-05", &[("IPCA", 0.3)])];
        let incoming = vec![record("2025-06", &[("IPCA", 0.26), ("IGPM", 0.1)])];

        let merged = merge_indices(&existing, &incoming);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0], incoming[0]);
        assert_eq!(merged[1], existing[0]);
    }

    #[test]
    fn test_partial_update_preserves_other_readings() {
        let existing = vec![record("2025-06", &[("IPCA", 0.26), ("IGPM", 0.1)])];
        let incoming = vec![record("2025-06", &[("IPCA", 0.31)])];

        let merged = merge_indices(&existing, &incoming);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].indices.get("IPCA"), Some(&0.31), "incoming wins per field");
        assert_eq!(merged[0].indices.get("IGPM"), Some(&0.1), "existing-only field preserved");
    }

    #[test]
    fn test_output_sorted_descending() {
        let existing = vec![record("2024-11", &[("IPCA", 0.4)])];
        let incoming = vec![
            record("2025-02", &[("IPCA", 0.2)]),
            record("2024-12", &[("IPCA", 0.5)]),
        ];

        let merged = merge_indices(&existing, &incoming);
        let dates: Vec<&str> = merged.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, vec!["2025-02", "2024-12", "2024-11"]);
    }

    #[test]
    fn test_empty_incoming_is_identity() {
        let existing = vec![record("2025-01", &[("IPCA", 0.5)])];
        let merged = merge_indices(&existing, &[]);
        assert_eq!(merged, existing);
    }

    #[test]
    fn test_empty_existing_takes_incoming() {
        let incoming = vec![record("2025-01", &[("IPCA", 0.5)])];
        let merged = merge_indices(&[], &incoming);
        assert_eq!(merged, incoming);
    }

    #[test]
    fn test_merging_twice_equals_merging_once() {
        let existing = vec![
            record("2025-06", &[("IPCA", 0.26), ("IGPM", 0.1)]),
            record("2025-05", &[("IPCA", 0.3)]),
        ];
        let incoming = vec![
            record("2025-06", &[("IPCA", 0.31)]),
            record("2025-07", &[("INCC", 0.7)]),
        ];

        let once = merge_indices(&existing, &incoming);
        let twice = merge_indices(&once, &incoming);
        assert_eq!(once, twice);
    }

    prop_compose! {
        fn arb_record()(
            year in 2020u32..2030,
            month in 1u32..=12,
            values in proptest::collection::btree_map(
                prop_oneof![Just("IPCA"), Just("IGPM"), Just("INCC"), Just("SELIC")],
                -1.0f64..3.0,
                0..4,
            ),
        ) -> MonthlyRecord {
            MonthlyRecord {
                date: format!("{year:04}-{month:02}"),
                indices: values.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
            }
        }
    }

    proptest! {
        #[test]
        fn prop_merge_is_idempotent(
            existing in proptest::collection::vec(arb_record(), 0..8),
            incoming in proptest::collection::vec(arb_record(), 0..8),
        ) {
            let once = merge_indices(&existing, &incoming);
            let twice = merge_indices(&once, &incoming);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_merge_output_is_sorted_descending(
            existing in proptest::collection::vec(arb_record(), 0..8),
            incoming in proptest::collection::vec(arb_record(), 0..8),
        ) {
            let merged = merge_indices(&existing, &incoming);
            for window in merged.windows(2) {
                prop_assert!(window[0].date > window[1].date);
            }
        }

        #[test]
        fn prop_merge_never_drops_a_month(
            existing in proptest::collection::vec(arb_record(), 0..8),
            incoming in proptest::collection::vec(arb_record(), 0..8),
        ) {
            let merged = merge_indices(&existing, &incoming);
            let dates: std::collections::BTreeSet<&str> =
                merged.iter().map(|r| r.date.as_str()).collect();
            for record in existing.iter().chain(incoming.iter()) {
                prop_assert!(dates.contains(record.date.as_str()));
            }
        }
    }
}
