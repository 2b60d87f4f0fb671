use crate::demo::{write_workbook, DemoOptions};
use clap::Args;
use std::path::PathBuf;

/// Generate a synthetic workbook
#[derive(Args, Debug)]
pub struct DemoCommand {
    /// Directory the sheets are written into
    #[arg(short, long, default_value = "data")]
    output: PathBuf,

    /// Number of distinct clients
    #[arg(long, default_value_t = 1000)]
    clients: usize,

    /// Number of distinct advisors
    #[arg(long, default_value_t = 50)]
    advisors: usize,

    /// First year generated
    #[arg(long, default_value_t = 2017)]
    first_year: i16,

    /// Last year generated
    #[arg(long, default_value_t = 2022)]
    last_year: i16,

    /// Seed for the random generator
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

impl DemoCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let options = DemoOptions {
            clients: self.clients,
            advisors: self.advisors,
            first_year: self.first_year,
            last_year: self.last_year,
            seed: self.seed,
        };
        let sheets = write_workbook(&options, &self.output)?;

        let total: usize = sheets.iter().map(|(_, rows)| rows).sum();
        println!(
            "Wrote {} sheets ({} records) to {}",
            sheets.len(),
            total,
            self.output.display()
        );
        Ok(())
    }
}
