pub mod advisors;
pub mod demo;
pub mod detail;
pub mod export;
pub mod growth;
pub mod retention;
pub mod rollup;
pub mod schema;
pub mod segments;
pub mod summary;
pub mod trend;

use crate::config::Config;
use crate::pipeline::{apply, FilterSelection, Table, TableCache, WorkbookDir};
use anyhow::Context;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

/// Where the workbook is read from.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Workbook directory holding one CSV file per sheet
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Sheet to load, repeatable (defaults to the configured sheets)
    #[arg(long = "sheet")]
    sheets: Vec<String>,

    /// Configuration file (defaults to ./aumdash.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Filter selections. An absent dimension selects every observed value;
/// an absent advisor list means no advisor drill-down.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Year to include, repeatable
    #[arg(short, long = "year")]
    years: Vec<i16>,

    /// Month number (1-12) to include, repeatable
    #[arg(short, long = "month")]
    months: Vec<u8>,

    /// Segment to include, repeatable
    #[arg(short, long = "segment")]
    segments: Vec<String>,

    /// Desk to include, repeatable
    #[arg(long = "desk")]
    desks: Vec<String>,

    /// Advisor name to drill down to, repeatable
    #[arg(short, long = "advisor")]
    advisors: Vec<String>,
}

impl FilterArgs {
    pub fn selection(&self, table: &Table) -> FilterSelection {
        let all = FilterSelection::all(table);
        FilterSelection {
            years: pick(&self.years, all.years),
            months: pick(&self.months, all.months),
            segments: pick(&self.segments, all.segments),
            desks: pick(&self.desks, all.desks),
            advisors: self.advisors.clone(),
        }
    }
}

fn pick<T: Clone>(given: &[T], observed: Vec<T>) -> Vec<T> {
    if given.is_empty() {
        observed
    } else {
        given.to_vec()
    }
}

/// A loaded workbook plus the settings it was loaded with.
pub struct Dashboard {
    config: Config,
    source: WorkbookDir,
    cache: TableCache,
}

impl Dashboard {
    pub fn open(args: &SourceArgs) -> anyhow::Result<Self> {
        let config = Config::resolve(args.config.as_deref())?;
        let dir = args
            .data
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.source.data_dir));
        let sheets = if args.sheets.is_empty() {
            config.source.sheets.clone()
        } else {
            args.sheets.clone()
        };
        Ok(Dashboard {
            source: WorkbookDir::new(dir, sheets),
            config,
            cache: TableCache::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The full, unfiltered table.
    pub fn table(&mut self) -> anyhow::Result<Arc<Table>> {
        self.cache
            .get_or_load(&self.source)
            .with_context(|| format!("Failed to load workbook {}", self.source.dir().display()))
    }

    /// The full table and the subset passing `filters`.
    pub fn filtered(&mut self, filters: &FilterArgs) -> anyhow::Result<(Arc<Table>, Table)> {
        let table = self.table()?;
        let selection = filters.selection(&table);
        let filtered = apply(&table, &selection);
        log::info!(
            "Filtered records: {} of {}",
            filtered.len(),
            table.len()
        );
        Ok((table, filtered))
    }
}
