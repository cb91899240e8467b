// src/domain/filter.rs

use crate::domain::property::PropertyRecord;

/// Case-insensitive substring match over city, broker and the stringified id.
/// Coordinates, price and acres are never searched.
pub fn matches_query(record: &PropertyRecord, query: &str) -> bool {
    let needle = query.to_lowercase();
    let contains = |field: &Option<String>| {
        field
            .as_deref()
            .map(|v| v.to_lowercase().contains(&needle))
            .unwrap_or(false)
    };

    contains(&record.city) || contains(&record.broker) || record.id.to_string().contains(&needle)
}

/// Positions in `records` of the visible projection for `query`.
/// An empty query keeps everything, in order.
pub fn visible_indices(records: &[PropertyRecord], query: &str) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| query.is_empty() || matches_query(r, query))
        .map(|(i, _)| i)
        .collect()
}
