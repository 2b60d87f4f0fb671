use crate::cmd::{Dashboard, FilterArgs, SourceArgs};
use crate::pipeline::{clamp_rows, detail_rows, SheetRow, SortKey, SortOrder};
use crate::utils::{format_money, print_json, print_table, write_csv};
use clap::{Args, ValueEnum};
use std::io;
use tabled::Tabled;

/// Individual records, sorted and truncated
#[derive(Args, Debug)]
pub struct DetailCommand {
    #[command(flatten)]
    source: SourceArgs,

    #[command(flatten)]
    filters: FilterArgs,

    /// Column to sort by
    #[arg(long, value_enum, default_value_t = SortKeyArg::Aum)]
    sort: SortKeyArg,

    /// Sort direction
    #[arg(long, value_enum, default_value_t = SortOrderArg::Desc)]
    order: SortOrderArg,

    /// Rows to show, 10-1000 (defaults to the configured value)
    #[arg(short = 'n', long)]
    rows: Option<usize>,

    /// Output as JSON
    #[arg(long, conflicts_with = "csv")]
    json: bool,

    /// Output as CSV in the input sheet layout
    #[arg(long)]
    csv: bool,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum SortKeyArg {
    #[default]
    Aum,
    Year,
    Advisor,
    Segment,
}

impl From<SortKeyArg> for SortKey {
    fn from(arg: SortKeyArg) -> Self {
        match arg {
            SortKeyArg::Aum => SortKey::Aum,
            SortKeyArg::Year => SortKey::Year,
            SortKeyArg::Advisor => SortKey::Advisor,
            SortKeyArg::Segment => SortKey::Segment,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum SortOrderArg {
    #[default]
    Desc,
    Asc,
}

impl From<SortOrderArg> for SortOrder {
    fn from(arg: SortOrderArg) -> Self {
        match arg {
            SortOrderArg::Desc => SortOrder::Descending,
            SortOrderArg::Asc => SortOrder::Ascending,
        }
    }
}

#[derive(Tabled)]
struct DetailRow {
    #[tabled(rename = "Year")]
    year: i16,
    #[tabled(rename = "Month")]
    month: &'static str,
    #[tabled(rename = "Segment")]
    segment: String,
    #[tabled(rename = "Desk")]
    desk: String,
    #[tabled(rename = "Advisor")]
    advisor: String,
    #[tabled(rename = "Client")]
    client: String,
    #[tabled(rename = "AUM")]
    aum: String,
    #[tabled(rename = "Flag")]
    flag: u8,
}

impl DetailCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let mut dashboard = Dashboard::open(&self.source)?;
        let requested = self.rows.unwrap_or(dashboard.config().views.detail_rows);
        let limit = clamp_rows(requested);
        if limit != requested {
            log::warn!("Row count {} clamped to {}", requested, limit);
        }

        let (_, filtered) = dashboard.filtered(&self.filters)?;
        let records = detail_rows(&filtered, self.sort.into(), self.order.into(), limit);

        if self.json {
            return print_json(&records);
        }
        if self.csv {
            return write_csv(records.into_iter().map(SheetRow::from), io::stdout());
        }

        let rows = records
            .into_iter()
            .map(|r| DetailRow {
                year: r.year,
                month: r.month_name,
                segment: r.segment.clone(),
                desk: r.desk.clone(),
                advisor: r.advisor_name.clone(),
                client: format!("{} ({})", r.client_name, r.client_id),
                aum: format_money(r.aum_value),
                flag: r.client_flag,
            })
            .collect();
        print_table(rows);
        Ok(())
    }
}
