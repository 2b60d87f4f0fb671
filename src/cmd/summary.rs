//! Summary command - headline KPIs of the filtered records

use crate::cmd::{Dashboard, FilterArgs, SourceArgs};
use crate::pipeline::{summary_metrics, SummaryMetrics};
use crate::utils::{format_compact, format_count, format_optional_money, print_json};
use clap::Args;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct SummaryCommand {
    #[command(flatten)]
    source: SourceArgs,

    #[command(flatten)]
    filters: FilterArgs,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct SummaryData {
    records: usize,
    total_records: usize,
    #[serde(flatten)]
    metrics: SummaryMetrics,
}

impl SummaryCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let mut dashboard = Dashboard::open(&self.source)?;
        let (table, filtered) = dashboard.filtered(&self.filters)?;
        let metrics = summary_metrics(&filtered);

        if self.json {
            return print_json(&SummaryData {
                records: filtered.len(),
                total_records: table.len(),
                metrics,
            });
        }

        println!("AUM SUMMARY");
        println!("===========");
        println!();
        println!(
            "  Records:          {} of {}",
            format_count(filtered.len() as u64),
            format_count(table.len() as u64)
        );
        println!("  Total AUM:        {}", format_compact(metrics.total_aum));
        println!("  Total Clients:    {}", format_count(metrics.total_clients));
        println!("  Active Advisors:  {}", metrics.advisor_count);
        println!("  Segments:         {}", metrics.segment_count);
        println!(
            "  Average AUM:      {}",
            format_optional_money(metrics.mean_aum)
        );
        println!(
            "  Median AUM:       {}",
            format_optional_money(metrics.median_aum)
        );
        Ok(())
    }
}
