//! Advisors command - top advisors by AUM, or the drill-down choices

use crate::cmd::{Dashboard, FilterArgs, SourceArgs};
use crate::pipeline::{advisor_options, top_advisors};
use crate::utils::{format_count, format_money, print_json, print_table, write_csv};
use clap::Args;
use std::io;
use tabled::Tabled;

#[derive(Args, Debug)]
pub struct AdvisorsCommand {
    #[command(flatten)]
    source: SourceArgs,

    #[command(flatten)]
    filters: FilterArgs,

    /// Number of advisors to rank (defaults to the configured value)
    #[arg(short, long)]
    top: Option<usize>,

    /// List the advisor names offered for --advisor instead of the ranking.
    /// These come from the whole workbook, ignoring filters.
    #[arg(long)]
    options: bool,

    /// Output as JSON
    #[arg(long, conflicts_with = "csv")]
    json: bool,

    /// Output as CSV
    #[arg(long)]
    csv: bool,
}

#[derive(Tabled)]
struct AdvisorRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Advisor")]
    advisor: String,
    #[tabled(rename = "AUM")]
    aum: String,
    #[tabled(rename = "Clients")]
    clients: String,
}

impl AdvisorsCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let mut dashboard = Dashboard::open(&self.source)?;
        if self.options {
            return self.print_options(&mut dashboard);
        }

        let top = self.top.unwrap_or(dashboard.config().views.top_advisors);
        let (_, filtered) = dashboard.filtered(&self.filters)?;
        let advisors = top_advisors(&filtered, top);

        if self.json {
            return print_json(&advisors);
        }
        if self.csv {
            return write_csv(&advisors, io::stdout());
        }

        let rows = advisors
            .into_iter()
            .enumerate()
            .map(|(i, a)| AdvisorRow {
                rank: i + 1,
                aum: format_money(a.aum_total),
                clients: format_count(a.client_total),
                advisor: a.advisor,
            })
            .collect();
        print_table(rows);
        Ok(())
    }

    fn print_options(&self, dashboard: &mut Dashboard) -> anyhow::Result<()> {
        let n = self.top.unwrap_or(dashboard.config().views.advisor_options);
        let table = dashboard.table()?;
        let names = advisor_options(&table, n);

        if self.json {
            return print_json(&names);
        }
        for name in names {
            println!("{}", name);
        }
        Ok(())
    }
}
