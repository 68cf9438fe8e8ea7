//! Partitioning of daily records into calendar months

use crate::models::{DailyRecord, MonthBucket};

/// Group records by month, keeping buckets in first-seen order.
///
/// Input sorted by date yields chronological buckets.
#[must_use]
pub fn group_by_month(records: Vec<DailyRecord>) -> Vec<MonthBucket> {
    let mut buckets: Vec<MonthBucket> = Vec::new();

    for record in records {
        let key = record.month_key();
        match buckets.iter_mut().rev().find(|bucket| bucket.key == key) {
            Some(bucket) => bucket.days.push(record),
            None => {
                let mut bucket = MonthBucket::new(key);
                bucket.days.push(record);
                buckets.push(bucket);
            }
        }
    }

    buckets
}
