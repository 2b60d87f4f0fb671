//! Rollup command - group the filtered records by any dimension

use crate::cmd::{Dashboard, FilterArgs, SourceArgs};
use crate::pipeline::{group_by, top_n, Dimension, GroupRow, Metric};
use crate::utils::{format_money, print_json, print_table, write_csv};
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde::Serialize;
use std::io;
use tabled::Tabled;

#[derive(Args, Debug)]
pub struct RollupCommand {
    #[command(flatten)]
    source: SourceArgs,

    #[command(flatten)]
    filters: FilterArgs,

    /// Column to group by
    #[arg(short, long, value_enum)]
    by: DimensionArg,

    /// Metric to compute, repeatable
    #[arg(long = "metric", value_enum, default_values_t = [MetricArg::Aum])]
    metrics: Vec<MetricArg>,

    /// Keep only the N largest groups by the first metric
    #[arg(short, long)]
    top: Option<usize>,

    /// Output as JSON
    #[arg(long, conflicts_with = "csv")]
    json: bool,

    /// Output as CSV
    #[arg(long)]
    csv: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DimensionArg {
    Year,
    Month,
    Segment,
    Desk,
    Advisor,
    Client,
    YearMonth,
}

impl From<DimensionArg> for Dimension {
    fn from(arg: DimensionArg) -> Self {
        match arg {
            DimensionArg::Year => Dimension::Year,
            DimensionArg::Month => Dimension::Month,
            DimensionArg::Segment => Dimension::Segment,
            DimensionArg::Desk => Dimension::Desk,
            DimensionArg::Advisor => Dimension::Advisor,
            DimensionArg::Client => Dimension::Client,
            DimensionArg::YearMonth => Dimension::YearMonth,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MetricArg {
    /// Summed AUM
    Aum,
    /// Summed client indicator
    Clients,
    /// Distinct advisors
    Advisors,
}

impl From<MetricArg> for Metric {
    fn from(arg: MetricArg) -> Self {
        match arg {
            MetricArg::Aum => Metric::Aum,
            MetricArg::Clients => Metric::Clients,
            MetricArg::Advisors => Metric::Advisors,
        }
    }
}

/// Flat form of a group row for JSON and CSV output.
#[derive(Debug, Serialize)]
struct RollupRow {
    key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    aum_total: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    client_total: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    advisor_count: Option<usize>,
}

impl From<GroupRow> for RollupRow {
    fn from(row: GroupRow) -> Self {
        RollupRow {
            key: row.key.to_string(),
            aum_total: row.aum_total,
            client_total: row.client_total,
            advisor_count: row.advisor_count,
        }
    }
}

#[derive(Tabled)]
struct RollupTableRow {
    #[tabled(rename = "Group")]
    key: String,
    #[tabled(rename = "AUM")]
    aum: String,
    #[tabled(rename = "Clients")]
    clients: String,
    #[tabled(rename = "Advisors")]
    advisors: String,
}

fn cell<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl RollupCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let mut dashboard = Dashboard::open(&self.source)?;
        let (_, filtered) = dashboard.filtered(&self.filters)?;

        let dimension = Dimension::from(self.by);
        let metrics: Vec<Metric> = self.metrics.iter().copied().map(Metric::from).collect();
        let groups = match (self.top, metrics.first()) {
            (Some(n), Some(&rank_by)) => {
                let ranked = top_n(&filtered, dimension, rank_by, n);
                // top_n only fills the ranking metric; refill the rest by key
                let all = group_by(&filtered, dimension, &metrics);
                ranked
                    .into_iter()
                    .filter_map(|r| all.iter().find(|g| g.key == r.key).cloned())
                    .collect()
            }
            _ => group_by(&filtered, dimension, &metrics),
        };
        let rows: Vec<RollupRow> = groups.into_iter().map(RollupRow::from).collect();

        if self.json {
            return print_json(&rows);
        }
        if self.csv {
            return write_csv(&rows, io::stdout());
        }

        let table_rows = rows
            .into_iter()
            .map(|r| RollupTableRow {
                aum: r.aum_total.map(format_money).unwrap_or_default(),
                clients: cell(r.client_total),
                advisors: cell(r.advisor_count),
                key: r.key,
            })
            .collect();
        print_table(table_rows);
        Ok(())
    }
}
