//! Writes the filtered table and its rollups to disk.

use crate::pipeline::{by_segment, top_advisors, Table};
use crate::utils::write_csv;
use anyhow::Context;
use chrono::{DateTime, Local};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

pub const DATA_FILE: &str = "data.csv";
pub const SEGMENT_FILE: &str = "by_segment.csv";
pub const ADVISOR_FILE: &str = "top_advisors.csv";

/// `<prefix>_<YYYYmmdd_HHMMSS>`
pub fn timestamped(prefix: &str, at: DateTime<Local>) -> String {
    format!("{}_{}", prefix, at.format("%Y%m%d_%H%M%S"))
}

/// Every filtered record, one CSV row each.
pub fn write_data_csv(table: &Table, path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_csv(table.iter(), file)?;
    log::info!("Exported {} records to {}", table.len(), path.display());
    Ok(())
}

/// The files written by [`write_report`].
#[derive(Debug)]
pub struct Report {
    pub dir: PathBuf,
    pub data_rows: usize,
    pub truncated: bool,
}

/// A report directory holding the data (capped at `max_rows`), the segment
/// rollup and the top advisors.
pub fn write_report(
    table: &Table,
    dir: &Path,
    max_rows: usize,
    top: usize,
) -> anyhow::Result<Report> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let data_rows = table.len().min(max_rows);
    let data = File::create(dir.join(DATA_FILE))?;
    write_csv(table.iter().take(data_rows), data)?;

    let segments = File::create(dir.join(SEGMENT_FILE))?;
    write_csv(by_segment(table), segments)?;

    let advisors = File::create(dir.join(ADVISOR_FILE))?;
    write_csv(top_advisors(table, top), advisors)?;

    log::info!("Report written to {}", dir.display());
    if data_rows < table.len() {
        log::warn!(
            "Report data capped at {} of {} rows",
            data_rows,
            table.len()
        );
    }

    Ok(Report {
        dir: dir.to_path_buf(),
        data_rows,
        truncated: data_rows < table.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{load, MemorySource, WorkbookDir};
    use chrono::TimeZone;

    const SHEET: &str = "\
year,month,segment,desk,advisor_id,advisor_name,client_id,client_name,aum_value,client_flag
2020,1,A,DA,1,Ann,c1,One,300,1
2020,1,B,DB,2,Bob,c2,Two,100,1
2020,2,A,DA,1,Ann,c3,Three,50,0
";

    fn table() -> Table {
        load(&MemorySource::new().with_batch("Base 2020", SHEET)).unwrap()
    }

    #[test]
    fn timestamp_format() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(timestamped("filtered_data", at), "filtered_data_20240309_140507");
    }

    #[test]
    fn data_csv_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Base 2020.csv");
        let table = table();
        write_data_csv(&table, &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("year,month,segment,desk,advisor_id"));
        assert!(text.contains("2020-01-01,January"));

        let source = WorkbookDir::new(dir.path(), vec!["Base 2020".to_string()]);
        assert_eq!(load(&source).unwrap(), table);
    }

    #[test]
    fn report_caps_data_rows() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("report");
        let report = write_report(&table(), &out, 2, 10).unwrap();

        assert_eq!(report.data_rows, 2);
        assert!(report.truncated);

        let data = fs::read_to_string(out.join(DATA_FILE)).unwrap();
        assert_eq!(data.lines().count(), 3);

        let segments = fs::read_to_string(out.join(SEGMENT_FILE)).unwrap();
        let lines: Vec<_> = segments.lines().collect();
        assert_eq!(lines[0], "segment,aum_total,client_total,advisor_count");
        assert_eq!(lines[1], "A,350,1,1");
        assert_eq!(lines[2], "B,100,1,1");

        let advisors = fs::read_to_string(out.join(ADVISOR_FILE)).unwrap();
        assert_eq!(advisors.lines().nth(1), Some("Ann,350,1"));
    }
}
