use super::record::Record;
use super::table::Table;
use std::cmp::Ordering;

pub const MIN_DETAIL_ROWS: usize = 10;
pub const MAX_DETAIL_ROWS: usize = 1000;

/// Column the detail table can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Aum,
    Year,
    Advisor,
    Segment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Descending,
    Ascending,
}

impl SortKey {
    fn compare(self, a: &Record, b: &Record) -> Ordering {
        match self {
            SortKey::Aum => a.aum_value.cmp(&b.aum_value),
            SortKey::Year => a.year.cmp(&b.year),
            SortKey::Advisor => a.advisor().cmp(b.advisor()),
            SortKey::Segment => a.segment.cmp(&b.segment),
        }
    }
}

/// Row limit clamped to the range the detail view supports.
pub fn clamp_rows(limit: usize) -> usize {
    limit.clamp(MIN_DETAIL_ROWS, MAX_DETAIL_ROWS)
}

/// First `limit` rows after a stable sort on `key`.
pub fn detail_rows(table: &Table, key: SortKey, order: SortOrder, limit: usize) -> Vec<&Record> {
    let mut rows: Vec<&Record> = table.iter().collect();
    match order {
        SortOrder::Ascending => rows.sort_by(|a, b| key.compare(a, b)),
        SortOrder::Descending => rows.sort_by(|a, b| key.compare(b, a)),
    }
    rows.truncate(clamp_rows(limit));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::record::{first_of_month, month_name};
    use rust_decimal::Decimal;

    fn record(year: i16, advisor: &str, aum: i64) -> Record {
        Record {
            year,
            month: 1,
            segment: format!("S{}", aum % 3),
            desk: "D".to_string(),
            advisor_id: advisor.to_string(),
            advisor_name: advisor.to_string(),
            client_id: format!("c{aum}"),
            client_name: "Client".to_string(),
            aum_value: Decimal::from(aum),
            client_flag: 1,
            date: first_of_month(year, 1).unwrap(),
            month_name: month_name(1).unwrap(),
        }
    }

    #[test]
    fn descending_aum_by_default() {
        let table = Table::new(vec![
            record(2017, "Ann", 5),
            record(2018, "Bob", 50),
            record(2019, "Cid", 20),
        ]);

        let rows = detail_rows(&table, SortKey::default(), SortOrder::default(), 100);
        let aum: Vec<_> = rows.iter().map(|r| r.aum_value).collect();
        assert_eq!(aum, vec![Decimal::from(50), Decimal::from(20), Decimal::from(5)]);
    }

    #[test]
    fn equal_keys_keep_source_order() {
        let table = Table::new(vec![
            record(2018, "Ann", 1),
            record(2017, "Bob", 2),
            record(2018, "Cid", 3),
        ]);

        let asc = detail_rows(&table, SortKey::Year, SortOrder::Ascending, 100);
        let names: Vec<_> = asc.iter().map(|r| r.advisor_name.as_str()).collect();
        assert_eq!(names, vec!["Bob", "Ann", "Cid"]);

        let desc = detail_rows(&table, SortKey::Year, SortOrder::Descending, 100);
        let names: Vec<_> = desc.iter().map(|r| r.advisor_name.as_str()).collect();
        assert_eq!(names, vec!["Ann", "Cid", "Bob"]);
    }

    #[test]
    fn limit_is_clamped() {
        let table: Table = (0..1500).map(|i| record(2020, "Ann", i)).collect();
        assert_eq!(detail_rows(&table, SortKey::Aum, SortOrder::Ascending, 1).len(), 10);
        assert_eq!(detail_rows(&table, SortKey::Aum, SortOrder::Ascending, 5000).len(), 1000);
        assert_eq!(detail_rows(&table, SortKey::Aum, SortOrder::Ascending, 25).len(), 25);
    }
}
