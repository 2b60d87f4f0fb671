use crate::cmd::{Dashboard, FilterArgs, SourceArgs};
use crate::pipeline::yearly_growth;
use crate::utils::{format_count, format_money, format_pct, print_json, print_table, write_csv};
use clap::Args;
use std::io;
use tabled::Tabled;

/// Year-over-year AUM and client growth
#[derive(Args, Debug)]
pub struct GrowthCommand {
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
struct GrowthRow {
    #[tabled(rename = "Year")]
    year: i16,
    #[tabled(rename = "AUM")]
    aum: String,
    #[tabled(rename = "AUM Growth")]
    aum_growth: String,
    #[tabled(rename = "Clients")]
    clients: String,
    #[tabled(rename = "Client Growth")]
    client_growth: String,
}

impl GrowthCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let mut dashboard = Dashboard::open(&self.source)?;
        let (_, filtered) = dashboard.filtered(&self.filters)?;
        let growth = yearly_growth(&filtered);

        if self.json {
            return print_json(&growth);
        }
        if self.csv {
            return write_csv(&growth, io::stdout());
        }

        let rows = growth
            .iter()
            .map(|g| GrowthRow {
                year: g.year,
                aum: format_money(g.aum_total),
                aum_growth: format_pct(g.aum_growth_pct),
                clients: format_count(g.client_total),
                client_growth: format_pct(g.client_growth_pct),
            })
            .collect();
        print_table(rows);
        Ok(())
    }
}
