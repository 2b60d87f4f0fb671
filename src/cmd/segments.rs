use crate::cmd::{Dashboard, FilterArgs, SourceArgs};
use crate::pipeline::by_segment;
use crate::utils::{format_count, format_money, print_json, print_table, write_csv};
use clap::Args;
use std::io;
use tabled::Tabled;

/// AUM, clients and advisors per segment, largest AUM first
#[derive(Args, Debug)]
pub struct SegmentsCommand {
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
struct SegmentRow {
    #[tabled(rename = "Segment")]
    segment: String,
    #[tabled(rename = "AUM")]
    aum: String,
    #[tabled(rename = "Clients")]
    clients: String,
    #[tabled(rename = "Advisors")]
    advisors: usize,
}

impl SegmentsCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let mut dashboard = Dashboard::open(&self.source)?;
        let (_, filtered) = dashboard.filtered(&self.filters)?;
        let segments = by_segment(&filtered);

        if self.json {
            return print_json(&segments);
        }
        if self.csv {
            return write_csv(&segments, io::stdout());
        }

        let rows = segments
            .into_iter()
            .map(|s| SegmentRow {
                aum: format_money(s.aum_total),
                clients: format_count(s.client_total),
                advisors: s.advisor_count,
                segment: s.segment,
            })
            .collect();
        print_table(rows);
        Ok(())
    }
}
