use crate::cmd::{Dashboard, FilterArgs, SourceArgs};
use crate::pipeline::monthly_trend;
use crate::utils::{format_count, format_money, print_json, print_table, write_csv};
use clap::Args;
use std::io;
use tabled::Tabled;

/// Monthly AUM and client totals, oldest first
#[derive(Args, Debug)]
pub struct TrendCommand {
    #[command(flatten)]
    source: SourceArgs,

    #[command(flatten)]
    filters: FilterArgs,

    /// Output as JSON
    #[arg(long, conflicts_with = "csv")]
    json: bool,

    /// Output as CSV
    #[arg(long)]
    csv: bool,
}

#[derive(Tabled)]
struct TrendRow {
    #[tabled(rename = "Month")]
    month: String,
    #[tabled(rename = "AUM")]
    aum: String,
    #[tabled(rename = "Clients")]
    clients: String,
}

impl TrendCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let mut dashboard = Dashboard::open(&self.source)?;
        let (_, filtered) = dashboard.filtered(&self.filters)?;
        let trend = monthly_trend(&filtered);

        if self.json {
            return print_json(&trend);
        }
        if self.csv {
            return write_csv(&trend, io::stdout());
        }

        let rows = trend
            .iter()
            .map(|m| TrendRow {
                month: m.date.format("%Y-%m").to_string(),
                aum: format_money(m.aum_total),
                clients: format_count(m.client_total),
            })
            .collect();
        print_table(rows);
        Ok(())
    }
}
