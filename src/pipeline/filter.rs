use super::record::Record;
use super::table::Table;
use serde::Serialize;

/// Inclusion lists for each filter dimension.
///
/// Years, months, segments and desks are strict: an empty list selects
/// nothing. An empty advisor list means no advisor restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterSelection {
    pub years: Vec<i16>,
    pub months: Vec<u8>,
    pub segments: Vec<String>,
    pub desks: Vec<String>,
    pub advisors: Vec<String>,
}

impl FilterSelection {
    /// Every observed value selected, no advisor drill-down.
    pub fn all(table: &Table) -> Self {
        FilterSelection {
            years: table.years(),
            months: table.months(),
            segments: table.segments(),
            desks: table.desks(),
            advisors: Vec::new(),
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.years.contains(&record.year)
            && self.months.contains(&record.month)
            && self.segments.iter().any(|s| *s == record.segment)
            && self.desks.iter().any(|d| *d == record.desk)
            && (self.advisors.is_empty() || self.advisors.iter().any(|a| a == record.advisor()))
    }
}

/// Rows of `table` passing `selection`, in source order.
pub fn apply(table: &Table, selection: &FilterSelection) -> Table {
    table
        .iter()
        .filter(|r| selection.matches(r))
        .cloned()
        .collect()
}
