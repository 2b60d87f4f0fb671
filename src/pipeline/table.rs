use super::record::Record;
use std::collections::BTreeSet;

/// The unified fact table: every batch concatenated in load order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    records: Vec<Record>,
}

impl Table {
    pub fn new(records: Vec<Record>) -> Self {
        Table { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Observed years, ascending.
    pub fn years(&self) -> Vec<i16> {
        self.distinct(|r| r.year)
    }

    /// Observed month numbers, ascending.
    pub fn months(&self) -> Vec<u8> {
        self.distinct(|r| r.month)
    }

    /// Observed segments, sorted.
    pub fn segments(&self) -> Vec<String> {
        self.distinct(|r| r.segment.clone())
    }

    /// Observed desks, sorted.
    pub fn desks(&self) -> Vec<String> {
        self.distinct(|r| r.desk.clone())
    }

    fn distinct<T: Ord>(&self, key: impl Fn(&Record) -> T) -> Vec<T> {
        self.records
            .iter()
            .map(key)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl FromIterator<Record> for Table {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Table::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
