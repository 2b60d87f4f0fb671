mod cmd;
mod config;
mod demo;
mod export;
mod pipeline;
mod utils;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "aumdash")]
#[command(version, about = "Assets-under-management dashboard for advisor and client data")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Headline KPIs of the filtered records
    Summary(cmd::summary::SummaryCommand),
    /// Year-over-year AUM and client growth
    Growth(cmd::growth::GrowthCommand),
    /// Totals per segment
    Segments(cmd::segments::SegmentsCommand),
    /// Top advisors by AUM
    Advisors(cmd::advisors::AdvisorsCommand),
    /// Monthly AUM and client trend
    Trend(cmd::trend::TrendCommand),
    /// Distinct clients per year
    Retention(cmd::retention::RetentionCommand),
    /// Group by any dimension
    Rollup(cmd::rollup::RollupCommand),
    /// Sorted record listing
    Detail(cmd::detail::DetailCommand),
    /// Write the filtered records to CSV
    Export(cmd::export::ExportCommand),
    /// Generate a synthetic workbook
    Demo(cmd::demo::DemoCommand),
    /// Print the expected sheet layout
    Schema(cmd::schema::SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Summary(summary) => summary.exec(),
        Command::Growth(growth) => growth.exec(),
        Command::Segments(segments) => segments.exec(),
        Command::Advisors(advisors) => advisors.exec(),
        Command::Trend(trend) => trend.exec(),
        Command::Retention(retention) => retention.exec(),
        Command::Rollup(rollup) => rollup.exec(),
        Command::Detail(detail) => detail.exec(),
        Command::Export(export) => export.exec(),
        Command::Demo(demo) => demo.exec(),
        Command::Schema(schema) => schema.exec(),
    }
}
