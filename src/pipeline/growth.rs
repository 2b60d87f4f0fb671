use super::aggregate::{group_by, Dimension, GroupKey, Metric};
use super::table::Table;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyGrowth {
    pub year: i16,
    pub aum_total: Decimal,
    pub client_total: u64,
    /// `None` for the first year or a zero baseline.
    pub aum_growth_pct: Option<Decimal>,
    pub client_growth_pct: Option<Decimal>,
}

/// Percentage change from `previous` to `current`.
///
/// Undefined without a non-zero baseline or when the ratio does not fit
/// in a `Decimal`.
pub fn pct_change(previous: Option<Decimal>, current: Decimal) -> Option<Decimal> {
    let prev = previous.filter(|p| !p.is_zero())?;
    current
        .checked_sub(prev)?
        .checked_div(prev)?
        .checked_mul(dec!(100))
}

/// Yearly totals, ascending by year, each compared with the entry before it.
///
/// The baseline is the previous year present in the table, not the
/// previous calendar year.
pub fn yearly_growth(table: &Table) -> Vec<YearlyGrowth> {
    let groups = group_by(table, Dimension::Year, &[Metric::Aum, Metric::Clients]);
    let mut years: Vec<(i16, Decimal, u64)> = groups
        .into_iter()
        .filter_map(|row| match row.key {
            GroupKey::Year(year) => Some((
                year,
                row.aum_total.unwrap_or_default(),
                row.client_total.unwrap_or_default(),
            )),
            _ => None,
        })
        .collect();
    years.sort_by_key(|(year, _, _)| *year);

    let mut previous: Option<(Decimal, Decimal)> = None;
    years
        .into_iter()
        .map(|(year, aum, clients)| {
            let clients_dec = Decimal::from(clients);
            let entry = YearlyGrowth {
                year,
                aum_total: aum,
                client_total: clients,
                aum_growth_pct: pct_change(previous.map(|p| p.0), aum),
                client_growth_pct: pct_change(previous.map(|p| p.1), clients_dec),
            };
            previous = Some((aum, clients_dec));
            entry
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientRetention {
    pub year: i16,
    /// Distinct client identifiers seen in the year.
    pub unique_clients: usize,
    pub change_pct: Option<Decimal>,
}

/// Distinct clients per year and their year-over-year change.
pub fn client_retention(table: &Table) -> Vec<ClientRetention> {
    let mut per_year: BTreeMap<i16, HashSet<&str>> = BTreeMap::new();
    for record in table {
        per_year
            .entry(record.year)
            .or_default()
            .insert(record.client_id.as_str());
    }

    let mut previous = None;
    per_year
        .into_iter()
        .map(|(year, clients)| {
            let count = Decimal::from(clients.len());
            let entry = ClientRetention {
                year,
                unique_clients: clients.len(),
                change_pct: pct_change(previous, count),
            };
            previous = Some(count);
            entry
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::record::{first_of_month, month_name, Record};

    fn record(year: i16, client: &str, aum: Decimal, flag: u8) -> Record {
        Record {
            year,
            month: 6,
            segment: "A".to_string(),
            desk: "D".to_string(),
            advisor_id: "1".to_string(),
            advisor_name: "Ann".to_string(),
            client_id: client.to_string(),
            client_name: client.to_string(),
            aum_value: aum,
            client_flag: flag,
            date: first_of_month(year, 6).unwrap(),
            month_name: month_name(6).unwrap(),
        }
    }

    #[test]
    fn growth_against_previous_year() {
        let table = Table::new(vec![
            record(2018, "c1", dec!(100), 1),
            record(2017, "c1", dec!(60), 1),
            record(2018, "c2", dec!(50), 1),
            record(2017, "c2", dec!(40), 1),
        ]);

        let growth = yearly_growth(&table);
        assert_eq!(growth.len(), 2);
        assert_eq!(growth[0].year, 2017);
        assert_eq!(growth[0].aum_total, dec!(100));
        assert_eq!(growth[0].aum_growth_pct, None);
        assert_eq!(growth[0].client_growth_pct, None);

        assert_eq!(growth[1].year, 2018);
        assert_eq!(growth[1].aum_total, dec!(150));
        assert_eq!(growth[1].aum_growth_pct, Some(dec!(50.0)));
        assert_eq!(growth[1].client_growth_pct, Some(dec!(0)));
    }

    #[test]
    fn missing_year_uses_previous_entry() {
        let table = Table::new(vec![
            record(2017, "c1", dec!(200), 1),
            record(2019, "c1", dec!(100), 1),
        ]);

        let growth = yearly_growth(&table);
        assert_eq!(growth[1].year, 2019);
        assert_eq!(growth[1].aum_growth_pct, Some(dec!(-50)));
    }

    #[test]
    fn zero_baseline_is_undefined() {
        let table = Table::new(vec![
            record(2017, "c1", dec!(0), 0),
            record(2018, "c1", dec!(10), 1),
            record(2019, "c1", dec!(15), 3),
        ]);

        let growth = yearly_growth(&table);
        assert_eq!(growth[1].aum_growth_pct, None);
        assert_eq!(growth[1].client_growth_pct, None);
        assert_eq!(growth[2].aum_growth_pct, Some(dec!(50)));
        assert_eq!(growth[2].client_growth_pct, Some(dec!(200)));
    }

    #[test]
    fn unrepresentable_growth_is_undefined() {
        let tiny = dec!(0.0001);
        let huge = dec!(10_000_000_000_000_000_000_000_000);
        assert_eq!(pct_change(Some(tiny), huge), None);
        assert_eq!(pct_change(Some(Decimal::MIN), Decimal::MAX), None);

        let table = Table::new(vec![
            record(2017, "c1", tiny, 1),
            record(2018, "c1", huge, 1),
        ]);
        let growth = yearly_growth(&table);
        assert_eq!(growth[1].aum_total, huge);
        assert_eq!(growth[1].aum_growth_pct, None);
        assert_eq!(growth[1].client_growth_pct, Some(dec!(0)));
    }

    #[test]
    fn empty_table_has_no_growth() {
        assert!(yearly_growth(&Table::default()).is_empty());
        assert!(client_retention(&Table::default()).is_empty());
    }

    #[test]
    fn retention_counts_distinct_clients() {
        let table = Table::new(vec![
            record(2017, "c1", dec!(1), 1),
            record(2017, "c1", dec!(1), 1),
            record(2017, "c2", dec!(1), 0),
            record(2018, "c1", dec!(1), 1),
            record(2018, "c3", dec!(1), 1),
            record(2018, "c4", dec!(1), 1),
        ]);

        let retention = client_retention(&table);
        assert_eq!(
            retention,
            vec![
                ClientRetention {
                    year: 2017,
                    unique_clients: 2,
                    change_pct: None,
                },
                ClientRetention {
                    year: 2018,
                    unique_clients: 3,
                    change_pct: Some(dec!(50)),
                },
            ]
        );
    }
}
