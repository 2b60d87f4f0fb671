//! Schema command - print the expected sheet layout

use crate::pipeline::SheetRow;
use clap::Args;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format: json-schema, csv-header or csv-fields
    #[arg(value_enum, default_value = "csv-fields")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for one sheet row
    JsonSchema,
    /// CSV header row with column names
    CsvHeader,
    /// Column descriptions
    CsvFields,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => {
                let schema = schema_for!(SheetRow);
                println!("{}", serde_json::to_string_pretty(&schema)?);
            }
            SchemaFormat::CsvHeader => println!("{}", SheetRow::COLUMNS.join(",")),
            SchemaFormat::CsvFields => {
                println!("Sheet Format");
                println!("============");
                println!();
                for column in SheetRow::columns() {
                    println!(
                        "{:14} ({:7})  {}",
                        column.name, column.kind, column.description
                    );
                    for alias in column.aliases {
                        println!("{:14}  also read from '{}'", "", alias);
                    }
                }
                println!();
                println!("Blank numeric cells read as zero. Extra columns are ignored.");
            }
        }
        Ok(())
    }
}
