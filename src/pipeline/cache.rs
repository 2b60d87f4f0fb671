use super::loader::{BatchSource, LoadError, Snapshot, SourceId};
use super::table::Table;
use std::collections::HashMap;
use std::sync::Arc;

/// Memoizes loaded tables by source identity.
///
/// Only successful loads are stored; a failing source is loaded again on
/// the next request. Each request reads every batch once; a hit skips only
/// the parse, so the gain is for callers asking for the same source more
/// than once in a process.
#[derive(Debug, Default)]
pub struct TableCache {
    tables: HashMap<SourceId, Arc<Table>>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_load(&mut self, source: &dyn BatchSource) -> Result<Arc<Table>, LoadError> {
        let snapshot = Snapshot::read(source)?;
        if let Some(table) = self.tables.get(snapshot.id()) {
            log::info!("Using cached table for source {}", snapshot.id());
            return Ok(Arc::clone(table));
        }

        let table = Arc::new(snapshot.parse()?);
        self.tables.insert(snapshot.into_id(), Arc::clone(&table));
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
