use crate::cmd::{Dashboard, FilterArgs, SourceArgs};
use crate::pipeline::client_retention;
use crate::utils::{format_count, format_pct, print_json, print_table, write_csv};
use clap::Args;
use std::io;
use tabled::Tabled;

/// Distinct clients per year and the year-over-year change
#[derive(Args, Debug)]
pub struct RetentionCommand {
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
struct RetentionRow {
    #[tabled(rename = "Year")]
    year: i16,
    #[tabled(rename = "Unique Clients")]
    clients: String,
    #[tabled(rename = "Change")]
    change: String,
}

impl RetentionCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let mut dashboard = Dashboard::open(&self.source)?;
        let (_, filtered) = dashboard.filtered(&self.filters)?;
        let retention = client_retention(&filtered);

        if self.json {
            return print_json(&retention);
        }
        if self.csv {
            return write_csv(&retention, io::stdout());
        }

        if retention.len() < 2 {
            println!("Retention needs at least two years of data.");
        }
        let rows = retention
            .iter()
            .map(|r| RetentionRow {
                year: r.year,
                clients: format_count(r.unique_clients as u64),
                change: format_pct(r.change_pct),
            })
            .collect();
        print_table(rows);
        Ok(())
    }
}
