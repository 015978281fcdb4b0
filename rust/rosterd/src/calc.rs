use crate::roster::StudentRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Bucket for records with no gender value.
pub const UNKNOWN_GENDER: &str = "未知";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsRow {
    pub gender: String,
    pub count: usize,
    pub ratio: String,
}

/// `"{count}/{total} ({percent:.2}%)"`, e.g. `2/4 (50.00%)`.
pub fn format_ratio(count: usize, total: usize) -> String {
    if total == 0 {
        return "0/0 (0.00%)".to_string();
    }
    let pct = (count as f64) / (total as f64) * 100.0;
    format!("{}/{} ({:.2}%)", count, total, pct)
}

/// Counts per gender, in first-encounter order.
pub fn gender_stats(records: &[StudentRecord]) -> Vec<StatsRow> {
    let total = records.len();
    let mut order: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for r in records {
        let key = if r.gender.trim().is_empty() {
            UNKNOWN_GENDER.to_string()
        } else {
            r.gender.clone()
        };
        match index.get(&key) {
            Some(&i) => order[i].1 += 1,
            None => {
                index.insert(key.clone(), order.len());
                order.push((key, 1));
            }
        }
    }

    order
        .into_iter()
        .map(|(gender, count)| StatsRow {
            ratio: format_ratio(count, total),
            gender,
            count,
        })
        .collect()
}
