use std::collections::{HashMap, HashSet};

use crate::carrier::{CanonicalField, Carrier};
use crate::normalizer::NormalizedTable;

/// Summary statistics for one processed report file.
#[derive(Debug, Clone)]
pub struct FileStats {
    pub carrier: Carrier,
    pub total_records: usize,
    pub total_amount: f64,
    pub avg_amount: f64,
    pub unique_policies: usize,
    pub unique_members: usize,
    /// Min/max ISO payment date among parseable dates.
    pub date_range: Option<(String, String)>,
    /// Record counts per transaction type, largest first.
    pub by_transaction_type: Vec<(String, usize)>,
    /// Record counts per assigned agent, largest first.
    pub by_agent: Vec<(String, usize)>,
}

/// Compute file statistics from a normalized table. Pure; the table is the
/// only input.
pub fn summarize(table: &NormalizedTable) -> FileStats {
    let amounts: Vec<f64> = table
        .column_values(CanonicalField::Amount)
        .filter_map(|v| v.as_f64())
        .collect();
    let total_amount: f64 = amounts.iter().sum();
    let avg_amount = if amounts.is_empty() {
        0.0
    } else {
        total_amount / amounts.len() as f64
    };

    let dates: Vec<&str> = table
        .column_values(CanonicalField::PaymentDate)
        .filter_map(|v| v.as_text())
        .collect();
    let date_range = match (dates.iter().min(), dates.iter().max()) {
        (Some(min), Some(max)) => Some((min.to_string(), max.to_string())),
        _ => None,
    };

    FileStats {
        carrier: table.carrier,
        total_records: table.len(),
        total_amount,
        avg_amount,
        unique_policies: distinct_count(table, CanonicalField::PolicyNumber),
        unique_members: distinct_count(table, CanonicalField::MemberId),
        date_range,
        by_transaction_type: value_counts(table, CanonicalField::TransactionType),
        by_agent: value_counts(table, CanonicalField::AssignedAgentName),
    }
}

fn distinct_count(table: &NormalizedTable, field: CanonicalField) -> usize {
    table
        .column_values(field)
        .filter_map(|v| v.as_text())
        .collect::<HashSet<_>>()
        .len()
}

fn value_counts(table: &NormalizedTable, field: CanonicalField) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for v in table.column_values(field) {
        if let Some(s) = v.as_text() {
            *counts.entry(s).or_default() += 1;
        }
    }
    let mut out: Vec<(String, usize)> =
        counts.into_iter().map(|(k, v)| (k.to_string(), v)).collect();
    // Largest count first; name breaks ties so output is deterministic
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out
}
