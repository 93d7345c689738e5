//! Pure aggregation of transaction lists into chart-ready series.
//!
//! Each function here is deterministic, side-effect-free, and safe for empty input. Identical
//! input as a multiset yields identical output.

use momoda::tx::Transaction;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// How the rendering sink should draw a series.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    Line,
    Bar,
    Pie,
}

/// A labeled series: the typed contract between the aggregator and any rendering sink.
///
/// `labels` and `values` are parallel sequences of equal length.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub kind: SeriesKind,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

/// Fixed amount ranges for the histogram.
///
/// Upper bounds are inclusive; the final range is unbounded above. The ranges partition the
/// non-negative amount domain, so every transaction lands in exactly one.
pub const AMOUNT_BUCKETS: [(&str, Option<u32>); 5] = [
    ("0-5,000", Some(5_000)),
    ("5,001-10,000", Some(10_000)),
    ("10,001-20,000", Some(20_000)),
    ("20,001-50,000", Some(50_000)),
    ("50,001+", None),
];

/// Count transactions per fixed amount range.
///
/// All five labels are always present, in declared order, even when a count is zero.
pub fn bucket_amounts(txs: &[Transaction]) -> Series {
    let mut counts = [0_u64; AMOUNT_BUCKETS.len()];
    for tx in txs {
        let mut slot = AMOUNT_BUCKETS.len() - 1;
        for (i, (_, upper)) in AMOUNT_BUCKETS.iter().enumerate() {
            if let Some(upper) = upper {
                if tx.amount <= Decimal::from(*upper) {
                    slot = i;
                    break;
                }
            }
        }
        counts[slot] += 1;
    }

    Series {
        name: "Amount Distribution".to_string(),
        kind: SeriesKind::Bar,
        labels: AMOUNT_BUCKETS
            .iter()
            .map(|(label, _)| label.to_string())
            .collect(),
        values: counts.iter().map(|&n| n as f64).collect(),
    }
}

/// Count transactions per calendar date, dates ascending.
///
/// The date key is the `YYYY-MM-DD` prefix of the `DateTime` string, so lexicographic label
/// order is chronological.
pub fn volume_by_date(txs: &[Transaction]) -> Series {
    let mut by_date = BTreeMap::new();
    for tx in txs {
        *by_date.entry(tx.date_only().to_string()).or_insert(0_u64) += 1;
    }

    let (labels, values): (Vec<String>, Vec<f64>) = by_date
        .into_iter()
        .map(|(date, n)| (date, n as f64))
        .unzip();

    Series {
        name: "Transaction Volume".to_string(),
        kind: SeriesKind::Line,
        labels,
        values,
    }
}

/// Percentage of transactions per type label, in first-occurrence order.
///
/// An empty input yields an empty series; the zero total never reaches a division.
pub fn type_distribution(txs: &[Transaction]) -> Series {
    // The type domain is small; a linear scan preserves first-occurrence order.
    let mut counts: Vec<(String, u64)> = Vec::new();
    for tx in txs {
        match counts.iter_mut().find(|(label, _)| *label == tx.transaction_type) {
            Some((_, n)) => *n += 1,
            None => counts.push((tx.transaction_type.clone(), 1)),
        }
    }

    let total = txs.len() as f64;
    let (labels, values): (Vec<String>, Vec<f64>) = counts
        .into_iter()
        .map(|(label, n)| (label, n as f64 * 100.0 / total))
        .unzip();

    Series {
        name: "Transaction Types".to_string(),
        kind: SeriesKind::Pie,
        labels,
        values,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use arbtest::arbitrary::Unstructured;
    use arbtest::arbtest;
    use similar_asserts::assert_eq;

    pub(crate) fn tx(amount: u32, date_time: &str, transaction_type: &str) -> Transaction {
        Transaction {
            id: None,
            amount: Decimal::from(amount),
            date_time: date_time.to_string(),
            transaction_type: transaction_type.to_string(),
            currency: None,
        }
    }

    fn amounts(list: &[u32]) -> Vec<Transaction> {
        list.iter()
            .map(|&amount| tx(amount, "2024-01-01T00:00:00", "payment"))
            .collect()
    }

    #[test]
    fn test_bucket_amounts() {
        let txs = amounts(&[3_000, 7_000, 15_000, 25_000, 60_000, 5_000]);
        let series = bucket_amounts(&txs);

        assert_eq!(series.kind, SeriesKind::Bar);
        assert_eq!(
            series.labels,
            vec!["0-5,000", "5,001-10,000", "10,001-20,000", "20,001-50,000", "50,001+"]
        );
        assert_eq!(series.values, vec![2.0, 1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_bucket_boundaries_are_upper_inclusive() {
        let txs = amounts(&[0, 5_000, 5_001, 10_000, 10_001, 20_000, 20_001, 50_000, 50_001]);
        let series = bucket_amounts(&txs);

        assert_eq!(series.values, vec![2.0, 2.0, 2.0, 2.0, 1.0]);
    }

    #[test]
    fn test_bucket_amounts_empty() {
        let series = bucket_amounts(&[]);

        assert_eq!(series.labels.len(), 5);
        assert_eq!(series.values, vec![0.0; 5]);
    }

    #[test]
    fn test_volume_by_date_sorts_labels() {
        let txs = vec![
            tx(100, "2024-01-02T10:00:00", "cashin"),
            tx(100, "2024-01-01T09:00:00", "cashin"),
            tx(100, "2024-01-02T11:00:00", "cashin"),
        ];
        let series = volume_by_date(&txs);

        assert_eq!(series.kind, SeriesKind::Line);
        assert_eq!(series.labels, vec!["2024-01-01", "2024-01-02"]);
        assert_eq!(series.values, vec![1.0, 2.0]);
    }

    #[test]
    fn test_volume_by_date_empty() {
        let series = volume_by_date(&[]);

        assert!(series.labels.is_empty());
        assert!(series.values.is_empty());
    }

    #[test]
    fn test_type_distribution() {
        let txs = vec![
            tx(100, "2024-01-01", "cashin"),
            tx(100, "2024-01-01", "cashin"),
            tx(100, "2024-01-01", "payment"),
        ];
        let series = type_distribution(&txs);

        assert_eq!(series.kind, SeriesKind::Pie);
        assert_eq!(series.labels, vec!["cashin", "payment"]);
        assert!((series.values[0] - 66.67).abs() < 0.01);
        assert!((series.values[1] - 33.33).abs() < 0.01);
    }

    #[test]
    fn test_type_distribution_empty() {
        let series = type_distribution(&[]);

        assert!(series.labels.is_empty());
        assert!(series.values.is_empty());
    }

    #[test]
    fn prop_test_aggregate_invariants() {
        let test = |u: &mut Unstructured<'_>| {
            let mut txs = Vec::new();
            for _ in 0..u.arbitrary_len::<(u32, u8, u8, u8)>()? {
                let amount: u32 = u.int_in_range(0..=100_000)?;
                let year: u32 = u.int_in_range(2020..=2030)?;
                let month: u32 = u.int_in_range(1..=12)?;
                let day: u32 = u.int_in_range(1..=28)?;
                let transaction_type =
                    *u.choose(&["cashin", "cashout", "payment", "transfer", "airtime"])?;

                txs.push(tx(
                    amount,
                    &format!("{year:04}-{month:02}-{day:02}T00:00:00"),
                    transaction_type,
                ));
            }

            let len = txs.len() as f64;

            // Bucket counts partition the input.
            let buckets = bucket_amounts(&txs);
            assert_eq!(buckets.labels.len(), 5);
            assert_eq!(buckets.values.iter().sum::<f64>(), len);

            // Volume labels are strictly ascending and counts sum to the input length.
            let volume = volume_by_date(&txs);
            assert!(volume.labels.windows(2).all(|pair| pair[0] < pair[1]));
            assert_eq!(volume.values.iter().sum::<f64>(), len);

            // Percentages sum to 100 for non-empty input; empty input yields an empty series.
            let types = type_distribution(&txs);
            assert_eq!(types.labels.len(), types.values.len());
            if txs.is_empty() {
                assert!(types.labels.is_empty());
            } else {
                assert!((types.values.iter().sum::<f64>() - 100.0).abs() < 1e-6);
            }

            Ok(())
        };

        arbtest(&test).budget_ms(500).run();
    }
}
