//! Grouped summaries over crash records.
//!
//! Every function here is pure: it reads the record slice and returns freshly
//! computed aggregates. Groups are emitted in the order their key first
//! appears in the input.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, trace};

use crate::record::CrashRecord;

/// Number of crashes in one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearAggregate {
    /// Calendar year.
    pub year: i32,
    /// Crashes recorded in that year.
    pub crash_count: usize,
}

/// Fatalities and crashes of one operator within a single year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperatorAggregate<'a> {
    /// Operator name.
    pub operator: String,
    /// Sum of fatalities over the operator's crashes.
    pub total_fatalities: u64,
    /// Number of crashes; never zero.
    pub crash_count: usize,
    /// The operator's crash with the most fatalities (first one on ties).
    pub deadliest_crash: &'a CrashRecord,
}

/// Year-range filter as entered, each bound optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct YearRange {
    /// Inclusive lower bound.
    pub start: Option<i32>,
    /// Inclusive upper bound.
    pub end: Option<i32>,
}

impl YearRange {
    /// Create a range from optional bounds.
    #[must_use]
    pub fn new(start: Option<i32>, end: Option<i32>) -> Self {
        Self { start, end }
    }

    /// A range with no bounds (the whole dataset).
    #[must_use]
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Parse the two text inputs of the range controls.
    ///
    /// Anything that is not an integer year counts as "not given".
    #[must_use]
    pub fn parse(start: &str, end: &str) -> Self {
        Self {
            start: start.trim().parse().ok(),
            end: end.trim().parse().ok(),
        }
    }

    /// Whether neither bound is set.
    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Resolve against the dataset's `(min, max)` years.
    ///
    /// Missing bounds take the dataset bound. An inverted range falls back to
    /// the full dataset range.
    #[must_use]
    pub fn resolve(&self, bounds: (i32, i32)) -> (i32, i32) {
        let (min, max) = bounds;
        let start = self.start.unwrap_or(min);
        let end = self.end.unwrap_or(max);
        if start > end {
            debug!(start, end, "Inverted year range, using dataset range");
            return bounds;
        }
        (start, end)
    }
}

/// Earliest and latest year among `records`.
#[must_use]
pub fn year_bounds(records: &[CrashRecord]) -> Option<(i32, i32)> {
    records.iter().fold(None, |acc, r| match acc {
        None => Some((r.year, r.year)),
        Some((lo, hi)) => Some((lo.min(r.year), hi.max(r.year))),
    })
}

/// Count crashes per year within `[start, end]`.
///
/// Missing bounds default to the earliest/latest year present; if the
/// resolved start is after the resolved end the whole dataset is counted.
#[must_use]
pub fn aggregate_by_year(
    records: &[CrashRecord],
    start: Option<i32>,
    end: Option<i32>,
) -> Vec<YearAggregate> {
    let Some(bounds) = year_bounds(records) else {
        return Vec::new();
    };
    let (start, end) = YearRange::new(start, end).resolve(bounds);

    let mut index: HashMap<i32, usize> = HashMap::new();
    let mut groups: Vec<YearAggregate> = Vec::new();
    for record in records.iter().filter(|r| (start..=end).contains(&r.year)) {
        let slot = *index.entry(record.year).or_insert_with(|| {
            groups.push(YearAggregate {
                year: record.year,
                crash_count: 0,
            });
            groups.len() - 1
        });
        groups[slot].crash_count += 1;
    }

    trace!(start, end, years = groups.len(), "Aggregated by year");
    groups
}

/// Group the crashes of `year` by operator.
#[must_use]
pub fn aggregate_by_operator(records: &[CrashRecord], year: i32) -> Vec<OperatorAggregate<'_>> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<OperatorAggregate<'_>> = Vec::new();

    for record in records.iter().filter(|r| r.year == year) {
        match index.get(record.operator.as_str()) {
            Some(&slot) => {
                let group = &mut groups[slot];
                group.total_fatalities += u64::from(record.fatalities);
                group.crash_count += 1;
                if record.fatalities > group.deadliest_crash.fatalities {
                    group.deadliest_crash = record;
                }
            }
            None => {
                index.insert(record.operator.as_str(), groups.len());
                groups.push(OperatorAggregate {
                    operator: record.operator.clone(),
                    total_fatalities: u64::from(record.fatalities),
                    crash_count: 1,
                    deadliest_crash: record,
                });
            }
        }
    }

    trace!(year, operators = groups.len(), "Aggregated by operator");
    groups
}

/// The `n` operators with the most fatalities, highest first.
///
/// The sort is stable, so operators with equal totals keep their relative
/// order.
#[must_use]
pub fn top_n<'a>(aggregates: &[OperatorAggregate<'a>], n: usize) -> Vec<OperatorAggregate<'a>> {
    let mut ranked = aggregates.to_vec();
    ranked.sort_by(|a, b| b.total_fatalities.cmp(&a.total_fatalities));
    ranked.truncate(n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rec(year: i32, month: u32, operator: &str, fatalities: u32) -> CrashRecord {
        let date = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
        CrashRecord::new(date, operator, fatalities, format!("{operator} {year}-{month}"))
    }

    fn scenario() -> Vec<CrashRecord> {
        vec![rec(1920, 1, "A", 5), rec(1920, 2, "B", 10), rec(1921, 1, "A", 2)]
    }

    fn mixed() -> Vec<CrashRecord> {
        vec![
            rec(1950, 1, "Aeroflot", 12),
            rec(1948, 1, "Pan Am", 3),
            rec(1950, 2, "Pan Am", 40),
            rec(1950, 3, "Aeroflot", 40),
            rec(1951, 1, "KLM", 0),
            rec(1950, 4, "KLM", 7),
            rec(1948, 5, "KLM", 9),
            rec(1950, 5, "Aeroflot", 1),
        ]
    }

    #[test]
    fn test_scenario_by_year() {
        let years = aggregate_by_year(&scenario(), None, None);
        assert_eq!(
            years,
            vec![
                YearAggregate { year: 1920, crash_count: 2 },
                YearAggregate { year: 1921, crash_count: 1 },
            ]
        );
    }

    #[test]
    fn test_scenario_by_operator_and_top() {
        let records = scenario();
        let operators = aggregate_by_operator(&records, 1920);

        assert_eq!(operators.len(), 2);
        assert_eq!(operators[0].operator, "A");
        assert_eq!(operators[0].total_fatalities, 5);
        assert_eq!(operators[0].crash_count, 1);
        assert_eq!(operators[1].operator, "B");
        assert_eq!(operators[1].total_fatalities, 10);
        assert_eq!(operators[1].crash_count, 1);

        let top = top_n(&operators, 1);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].operator, "B");
    }

    #[test]
    fn test_year_counts_sum_to_record_count() {
        let records = mixed();
        let total: usize = aggregate_by_year(&records, None, None)
            .iter()
            .map(|y| y.crash_count)
            .sum();
        assert_eq!(total, records.len());
    }

    #[test]
    fn test_by_year_first_appearance_order() {
        let years: Vec<i32> = aggregate_by_year(&mixed(), None, None)
            .iter()
            .map(|y| y.year)
            .collect();
        assert_eq!(years, vec![1950, 1948, 1951]);
    }

    #[test]
    fn test_by_year_range_filter() {
        let years = aggregate_by_year(&mixed(), Some(1949), Some(1950));
        assert_eq!(years, vec![YearAggregate { year: 1950, crash_count: 5 }]);
    }

    #[test]
    fn test_by_year_open_bounds() {
        let years = aggregate_by_year(&mixed(), Some(1950), None);
        assert_eq!(years.len(), 2);
        assert!(years.iter().all(|y| y.year >= 1950));

        let years = aggregate_by_year(&mixed(), None, Some(1948));
        assert_eq!(years, vec![YearAggregate { year: 1948, crash_count: 2 }]);
    }

    #[test]
    fn test_by_year_inverted_range_uses_full_range() {
        let records = mixed();
        let inverted = aggregate_by_year(&records, Some(1951), Some(1948));
        let full = aggregate_by_year(&records, None, None);
        assert_eq!(inverted, full);
    }

    #[test]
    fn test_by_year_range_outside_data_is_empty() {
        assert!(aggregate_by_year(&mixed(), Some(2000), Some(2010)).is_empty());
    }

    #[test]
    fn test_by_year_is_idempotent() {
        let records = mixed();
        let first = aggregate_by_year(&records, Some(1948), Some(1950));
        let second = aggregate_by_year(&records, Some(1948), Some(1950));
        assert_eq!(first, second);
    }

    #[test]
    fn test_by_year_empty_input() {
        assert!(aggregate_by_year(&[], None, None).is_empty());
    }

    #[test]
    fn test_by_operator_partitions_year() {
        let records = mixed();
        let operators = aggregate_by_operator(&records, 1950);

        let in_year = records.iter().filter(|r| r.year == 1950).count();
        let grouped: usize = operators.iter().map(|o| o.crash_count).sum();
        assert_eq!(grouped, in_year);

        for group in &operators {
            let members: Vec<&CrashRecord> = records
                .iter()
                .filter(|r| r.year == 1950 && r.operator == group.operator)
                .collect();
            assert_eq!(group.crash_count, members.len());
            let sum: u64 = members.iter().map(|r| u64::from(r.fatalities)).sum();
            assert_eq!(group.total_fatalities, sum);
        }

        let names: Vec<&str> = operators.iter().map(|o| o.operator.as_str()).collect();
        assert_eq!(names, vec!["Aeroflot", "Pan Am", "KLM"]);
    }

    #[test]
    fn test_deadliest_crash_first_occurrence_on_tie() {
        let records = vec![
            rec(1960, 1, "A", 8),
            rec(1960, 2, "A", 20),
            rec(1960, 3, "A", 20),
            rec(1960, 4, "A", 3),
        ];
        let operators = aggregate_by_operator(&records, 1960);

        assert_eq!(operators.len(), 1);
        assert!(std::ptr::eq(operators[0].deadliest_crash, &records[1]));
        assert_eq!(operators[0].total_fatalities, 51);
    }

    #[test]
    fn test_by_operator_missing_year_is_empty() {
        assert!(aggregate_by_operator(&mixed(), 1800).is_empty());
    }

    #[test]
    fn test_top_n_sorted_and_bounded() {
        let records = mixed();
        let operators = aggregate_by_operator(&records, 1950);
        let top = top_n(&operators, 3);

        assert!(top.len() <= 3);
        assert!(top
            .windows(2)
            .all(|w| w[0].total_fatalities >= w[1].total_fatalities));
        assert_eq!(top[0].operator, "Aeroflot");
        assert_eq!(top[0].total_fatalities, 53);
    }

    #[test]
    fn test_top_n_stable_on_ties() {
        let records = vec![
            rec(1970, 1, "First", 10),
            rec(1970, 2, "Big", 30),
            rec(1970, 3, "Second", 10),
            rec(1970, 4, "Third", 10),
        ];
        let operators = aggregate_by_operator(&records, 1970);
        let top = top_n(&operators, 3);

        let names: Vec<&str> = top.iter().map(|o| o.operator.as_str()).collect();
        assert_eq!(names, vec!["Big", "First", "Second"]);
    }

    #[test]
    fn test_top_n_more_than_available() {
        let records = scenario();
        let operators = aggregate_by_operator(&records, 1921);
        assert_eq!(top_n(&operators, 3).len(), 1);
        assert!(top_n(&[], 3).is_empty());
    }

    #[test]
    fn test_year_range_parse() {
        assert_eq!(YearRange::parse("1950", " 1960 "), YearRange::new(Some(1950), Some(1960)));
        assert_eq!(YearRange::parse("", "abc"), YearRange::unbounded());
        assert!(YearRange::parse("x", "").is_unbounded());
    }

    #[test]
    fn test_year_range_resolve() {
        let bounds = (1908, 2009);
        assert_eq!(YearRange::unbounded().resolve(bounds), (1908, 2009));
        assert_eq!(YearRange::new(Some(1950), None).resolve(bounds), (1950, 2009));
        assert_eq!(YearRange::new(Some(2000), Some(1990)).resolve(bounds), (1908, 2009));
    }

    #[test]
    fn test_year_bounds() {
        assert_eq!(year_bounds(&mixed()), Some((1948, 1951)));
        assert_eq!(year_bounds(&[]), None);
    }
}
