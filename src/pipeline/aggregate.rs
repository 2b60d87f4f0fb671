//! Summary metrics and grouped rollups over a (filtered) table.

use super::record::{first_of_month, Record};
use super::table::Table;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Column a rollup groups by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Year,
    Month,
    Segment,
    Desk,
    Advisor,
    Client,
    YearMonth,
}

/// Aggregate computed per group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// Sum of `aum_value`
    Aum,
    /// Sum of `client_flag`
    Clients,
    /// Distinct advisors
    Advisors,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum GroupKey {
    Year(i16),
    Month(u8),
    Text(String),
    YearMonth { year: i16, month: u8 },
}

impl GroupKey {
    fn of(record: &Record, dimension: Dimension) -> Self {
        match dimension {
            Dimension::Year => GroupKey::Year(record.year),
            Dimension::Month => GroupKey::Month(record.month),
            Dimension::Segment => GroupKey::Text(record.segment.clone()),
            Dimension::Desk => GroupKey::Text(record.desk.clone()),
            Dimension::Advisor => GroupKey::Text(record.advisor().to_string()),
            Dimension::Client => GroupKey::Text(record.client_id.clone()),
            Dimension::YearMonth => GroupKey::YearMonth {
                year: record.year,
                month: record.month,
            },
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Year(year) => write!(f, "{year}"),
            GroupKey::Month(month) => write!(f, "{month}"),
            GroupKey::Text(text) => f.write_str(text),
            GroupKey::YearMonth { year, month } => write!(f, "{year}-{month:02}"),
        }
    }
}

/// One group of a rollup. Only the requested metrics are `Some`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupRow {
    pub key: GroupKey,
    pub aum_total: Option<Decimal>,
    pub client_total: Option<u64>,
    pub advisor_count: Option<usize>,
}

impl GroupRow {
    pub fn value(&self, metric: Metric) -> Option<Decimal> {
        match metric {
            Metric::Aum => self.aum_total,
            Metric::Clients => self.client_total.map(Decimal::from),
            Metric::Advisors => self.advisor_count.map(Decimal::from),
        }
    }
}

#[derive(Default)]
struct Accumulator<'a> {
    aum: Decimal,
    clients: u64,
    advisors: HashSet<&'a str>,
}

/// One row per distinct value of `dimension`, in first-encounter order.
pub fn group_by(table: &Table, dimension: Dimension, metrics: &[Metric]) -> Vec<GroupRow> {
    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    let mut groups: Vec<(GroupKey, Accumulator)> = Vec::new();

    for record in table {
        let key = GroupKey::of(record, dimension);
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push((key, Accumulator::default()));
            groups.len() - 1
        });
        let acc = &mut groups[slot].1;
        acc.aum = acc.aum.saturating_add(record.aum_value);
        acc.clients += u64::from(record.client_flag);
        if metrics.contains(&Metric::Advisors) {
            acc.advisors.insert(record.advisor());
        }
    }

    groups
        .into_iter()
        .map(|(key, acc)| GroupRow {
            key,
            aum_total: metrics.contains(&Metric::Aum).then_some(acc.aum),
            client_total: metrics.contains(&Metric::Clients).then_some(acc.clients),
            advisor_count: metrics
                .contains(&Metric::Advisors)
                .then_some(acc.advisors.len()),
        })
        .collect()
}

/// Number of distinct values in a column.
pub fn distinct_count(table: &Table, dimension: Dimension) -> usize {
    table
        .iter()
        .map(|r| GroupKey::of(r, dimension))
        .collect::<HashSet<_>>()
        .len()
}

/// The `n` groups with the largest summed `metric`, ties kept in encounter order.
pub fn top_n(table: &Table, dimension: Dimension, metric: Metric, n: usize) -> Vec<GroupRow> {
    let mut rows = group_by(table, dimension, &[metric]);
    rank_descending(&mut rows, metric);
    rows.truncate(n);
    rows
}

fn rank_descending(rows: &mut [GroupRow], metric: Metric) {
    // slice::sort_by is stable
    rows.sort_by(|a, b| b.value(metric).cmp(&a.value(metric)));
}

/// Headline KPIs of a table. AUM sums saturate at `Decimal::MAX`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryMetrics {
    pub total_aum: Decimal,
    /// Sum of the client indicator, not a distinct-client count.
    pub total_clients: u64,
    pub advisor_count: usize,
    pub segment_count: usize,
    /// `None` when there is no data.
    pub mean_aum: Option<Decimal>,
    /// `None` when there is no data.
    pub median_aum: Option<Decimal>,
}

pub fn summary_metrics(table: &Table) -> SummaryMetrics {
    let total_aum = table
        .iter()
        .fold(Decimal::ZERO, |sum, r| sum.saturating_add(r.aum_value));
    let total_clients = table.iter().map(|r| u64::from(r.client_flag)).sum();

    let mean_aum = if table.is_empty() {
        None
    } else {
        Some(total_aum / Decimal::from(table.len()))
    };

    SummaryMetrics {
        total_aum,
        total_clients,
        advisor_count: distinct_count(table, Dimension::Advisor),
        segment_count: distinct_count(table, Dimension::Segment),
        mean_aum,
        median_aum: median(table.iter().map(|r| r.aum_value).collect()),
    }
}

fn median(mut values: Vec<Decimal>) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    values.sort();
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(values[mid])
    } else {
        let (lo, hi) = (values[mid - 1], values[mid]);
        // lo <= hi, so when lo + hi overflows both share a sign and hi - lo fits
        Some(match lo.checked_add(hi) {
            Some(sum) => sum / Decimal::TWO,
            None => lo + (hi - lo) / Decimal::TWO,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentRollup {
    pub segment: String,
    pub aum_total: Decimal,
    pub client_total: u64,
    pub advisor_count: usize,
}

/// Per-segment totals, largest AUM first.
pub fn by_segment(table: &Table) -> Vec<SegmentRollup> {
    let mut rows = group_by(
        table,
        Dimension::Segment,
        &[Metric::Aum, Metric::Clients, Metric::Advisors],
    );
    rank_descending(&mut rows, Metric::Aum);
    rows.into_iter()
        .map(|row| SegmentRollup {
            segment: row.key.to_string(),
            aum_total: row.aum_total.unwrap_or_default(),
            client_total: row.client_total.unwrap_or_default(),
            advisor_count: row.advisor_count.unwrap_or_default(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdvisorRollup {
    pub advisor: String,
    pub aum_total: Decimal,
    pub client_total: u64,
}

/// The `n` advisors managing the most AUM.
pub fn top_advisors(table: &Table, n: usize) -> Vec<AdvisorRollup> {
    let mut rows = group_by(table, Dimension::Advisor, &[Metric::Aum, Metric::Clients]);
    rank_descending(&mut rows, Metric::Aum);
    rows.truncate(n);
    rows.into_iter()
        .map(|row| AdvisorRollup {
            advisor: row.key.to_string(),
            aum_total: row.aum_total.unwrap_or_default(),
            client_total: row.client_total.unwrap_or_default(),
        })
        .collect()
}

/// Advisor names offered for drill-down: top `n` by AUM.
pub fn advisor_options(table: &Table, n: usize) -> Vec<String> {
    top_n(table, Dimension::Advisor, Metric::Aum, n)
        .into_iter()
        .map(|row| row.key.to_string())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRollup {
    pub year: i16,
    pub month: u8,
    pub date: NaiveDate,
    pub aum_total: Decimal,
    pub client_total: u64,
}

/// Totals per (year, month), oldest first.
pub fn monthly_trend(table: &Table) -> Vec<MonthlyRollup> {
    let groups = group_by(table, Dimension::YearMonth, &[Metric::Aum, Metric::Clients]);
    let mut rows: Vec<MonthlyRollup> = groups
        .into_iter()
        .filter_map(|row| match row.key {
            GroupKey::YearMonth { year, month } => Some(MonthlyRollup {
                year,
                month,
                date: first_of_month(year, month)?,
                aum_total: row.aum_total.unwrap_or_default(),
                client_total: row.client_total.unwrap_or_default(),
            }),
            _ => None,
        })
        .collect();
    rows.sort_by_key(|r| r.date);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record(year: i16, month: u8, segment: &str, advisor: &str, aum: Decimal, flag: u8) -> Record {
        Record {
            year,
            month,
            segment: segment.to_string(),
            desk: format!("DESK {segment}"),
            advisor_id: format!("id-{advisor}"),
            advisor_name: advisor.to_string(),
            client_id: format!("c-{advisor}-{month}"),
            client_name: "Client".to_string(),
            aum_value: aum,
            client_flag: flag,
            date: first_of_month(year, month).unwrap(),
            month_name: crate::pipeline::record::month_name(month).unwrap(),
        }
    }

    fn sample() -> Table {
        Table::new(vec![
            record(2018, 2, "B", "Bob", dec!(40), 1),
            record(2017, 1, "A", "Ann", dec!(100), 1),
            record(2017, 1, "B", "Cid", dec!(60), 0),
            record(2018, 2, "A", "Ann", dec!(25), 1),
            record(2017, 3, "C", "Bob", dec!(85), 1),
            record(2017, 1, "A", "Dee", dec!(0), 0),
        ])
    }

    #[test]
    fn scenario_with_null_aum() {
        let table = Table::new(vec![
            record(2020, 1, "A", "Ann", dec!(10), 1),
            record(2020, 1, "A", "Bob", dec!(20), 1),
            record(2020, 1, "A", "Ann", Decimal::ZERO, 0),
        ]);

        let metrics = summary_metrics(&table);
        assert_eq!(
            metrics,
            SummaryMetrics {
                total_aum: dec!(30),
                total_clients: 2,
                advisor_count: 2,
                segment_count: 1,
                mean_aum: Some(dec!(10)),
                median_aum: Some(dec!(10)),
            }
        );
    }

    #[test]
    fn empty_table_reports_no_data() {
        let metrics = summary_metrics(&Table::default());
        assert_eq!(metrics.total_aum, Decimal::ZERO);
        assert_eq!(metrics.total_clients, 0);
        assert_eq!(metrics.advisor_count, 0);
        assert_eq!(metrics.segment_count, 0);
        assert_eq!(metrics.mean_aum, None);
        assert_eq!(metrics.median_aum, None);

        assert!(by_segment(&Table::default()).is_empty());
        assert!(top_advisors(&Table::default(), 10).is_empty());
        assert!(monthly_trend(&Table::default()).is_empty());
    }

    #[test]
    fn median_of_even_count_averages_middle() {
        let metrics = summary_metrics(&sample());
        // 0, 25, 40, 60, 85, 100
        assert_eq!(metrics.median_aum, Some(dec!(50)));
        assert_eq!(metrics.total_aum, dec!(310));
        assert_eq!(metrics.total_clients, 4);
        assert_eq!(metrics.advisor_count, 4);
    }

    #[test]
    fn group_by_segment_preserves_totals() {
        let table = sample();
        let rows = group_by(
            &table,
            Dimension::Segment,
            &[Metric::Aum, Metric::Clients, Metric::Advisors],
        );

        assert_eq!(rows.len(), distinct_count(&table, Dimension::Segment));
        let keys: Vec<_> = rows.iter().map(|r| r.key.to_string()).collect();
        assert_eq!(keys, vec!["B", "A", "C"]);

        let aum: Decimal = rows.iter().filter_map(|r| r.aum_total).sum();
        let clients: u64 = rows.iter().filter_map(|r| r.client_total).sum();
        let summary = summary_metrics(&table);
        assert_eq!(aum, summary.total_aum);
        assert_eq!(clients, summary.total_clients);

        let a = rows.iter().find(|r| r.key == GroupKey::Text("A".into())).unwrap();
        assert_eq!(a.advisor_count, Some(2));
    }

    #[test]
    fn group_by_fills_only_requested_metrics() {
        let rows = group_by(&sample(), Dimension::Year, &[Metric::Clients]);
        assert_eq!(rows[0].key, GroupKey::Year(2018));
        assert_eq!(rows[0].client_total, Some(2));
        assert_eq!(rows[0].aum_total, None);
        assert_eq!(rows[0].advisor_count, None);
    }

    #[test]
    fn top_n_is_descending_and_bounded() {
        let rows = top_n(&sample(), Dimension::Advisor, Metric::Aum, 2);
        let ranked: Vec<_> = rows
            .iter()
            .map(|r| (r.key.to_string(), r.aum_total.unwrap()))
            .collect();
        assert_eq!(
            ranked,
            vec![("Bob".to_string(), dec!(125)), ("Ann".to_string(), dec!(125))]
        );
    }

    #[test]
    fn top_n_ties_keep_encounter_order() {
        let table = Table::new(vec![
            record(2017, 1, "A", "Zed", dec!(10), 1),
            record(2017, 1, "A", "Amy", dec!(10), 1),
            record(2017, 1, "A", "Max", dec!(30), 1),
            record(2017, 1, "A", "Bea", dec!(10), 1),
        ]);

        let names = advisor_options(&table, 10);
        assert_eq!(names, vec!["Max", "Zed", "Amy", "Bea"]);
        assert_eq!(advisor_options(&table, 2), vec!["Max", "Zed"]);
    }

    #[test]
    fn segment_rollup_sorted_by_aum() {
        let rollup = by_segment(&sample());
        let order: Vec<_> = rollup.iter().map(|r| r.segment.as_str()).collect();
        assert_eq!(order, vec!["A", "B", "C"]);
        assert_eq!(rollup[0].aum_total, dec!(125));
        assert_eq!(rollup[0].client_total, 2);
        assert_eq!(rollup[0].advisor_count, 2);
    }

    #[test]
    fn top_advisors_carry_clients() {
        let top = top_advisors(&sample(), 1);
        assert_eq!(
            top,
            vec![AdvisorRollup {
                advisor: "Bob".to_string(),
                aum_total: dec!(125),
                client_total: 2,
            }]
        );
    }

    #[test]
    fn monthly_trend_sorted_by_date() {
        let trend = monthly_trend(&sample());
        let dates: Vec<_> = trend.iter().map(|r| (r.year, r.month)).collect();
        assert_eq!(dates, vec![(2017, 1), (2017, 3), (2018, 2)]);
        assert_eq!(trend[0].aum_total, dec!(160));
        assert_eq!(trend[0].client_total, 1);
        assert_eq!(trend[2].date, NaiveDate::from_ymd_opt(2018, 2, 1).unwrap());
    }

    #[test]
    fn huge_values_saturate_instead_of_overflowing() {
        let table = Table::new(vec![
            record(2020, 1, "A", "Ann", Decimal::MAX, 1),
            record(2020, 2, "A", "Ann", Decimal::MAX, 1),
        ]);

        let metrics = summary_metrics(&table);
        assert_eq!(metrics.total_aum, Decimal::MAX);
        assert_eq!(metrics.median_aum, Some(Decimal::MAX));
        assert!(metrics.mean_aum.is_some());

        let rows = group_by(&table, Dimension::Segment, &[Metric::Aum]);
        assert_eq!(rows[0].aum_total, Some(Decimal::MAX));
        assert_eq!(by_segment(&table)[0].aum_total, Decimal::MAX);
    }

    #[test]
    fn duplicates_are_summed() {
        let row = record(2020, 5, "A", "Ann", dec!(7), 1);
        let table = Table::new(vec![row.clone(), row]);
        let rows = group_by(&table, Dimension::Client, &[Metric::Aum, Metric::Clients]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].aum_total, Some(dec!(14)));
        assert_eq!(rows[0].client_total, Some(2));
    }
}
