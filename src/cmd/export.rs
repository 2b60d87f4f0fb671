//! Export command - write the filtered records and their rollups to disk

use crate::cmd::{Dashboard, FilterArgs, SourceArgs};
use crate::export::{timestamped, write_data_csv, write_report};
use chrono::Local;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ExportCommand {
    #[command(flatten)]
    source: SourceArgs,

    #[command(flatten)]
    filters: FilterArgs,

    /// Directory the export is written into
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Also write a report directory with segment and advisor rollups
    #[arg(long)]
    report: bool,
}

impl ExportCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let mut dashboard = Dashboard::open(&self.source)?;
        let (_, filtered) = dashboard.filtered(&self.filters)?;
        let now = Local::now();

        std::fs::create_dir_all(&self.output)?;
        let data_path = self
            .output
            .join(format!("{}.csv", timestamped("filtered_data", now)));
        write_data_csv(&filtered, &data_path)?;
        println!("Wrote {} records to {}", filtered.len(), data_path.display());

        if self.report {
            let config = dashboard.config();
            let dir = self.output.join(timestamped("report", now));
            let report = write_report(
                &filtered,
                &dir,
                config.export.max_rows,
                config.views.top_advisors,
            )?;
            println!(
                "Wrote report to {} ({} data rows{})",
                report.dir.display(),
                report.data_rows,
                if report.truncated { ", truncated" } else { "" }
            );
        }
        Ok(())
    }
}
