use super::{StatusRecord, Store, StoreError, TimelineEntry, TimelineLimit};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Default)]
struct Tables {
    status: Option<StatusRecord>,
    timeline: Vec<TimelineEntry>,
    next_id: i32,
}

/// In-process store with the same semantics as the Postgres backend.
/// Selected with `DATABASE_URL=memory://`; contents are lost on restart.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub const URL_SCHEME: &'static str = "memory://";

    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get_status(&self) -> Result<StatusRecord, StoreError> {
        self.tables()
            .status
            .clone()
            .ok_or(StoreError::StatusNotFound)
    }

    async fn set_status(&self, kind: &str, message: &str) -> Result<StatusRecord, StoreError> {
        let record = StatusRecord {
            kind: kind.to_string(),
            message: message.to_string(),
        };
        self.tables().status = Some(record.clone());
        Ok(record)
    }

    async fn add_timeline_entry(
        &self,
        date: &str,
        title: &str,
        description: &str,
    ) -> Result<TimelineEntry, StoreError> {
        let mut tables = self.tables();
        tables.next_id += 1;
        let entry = TimelineEntry {
            id: tables.next_id,
            date: date.to_string(),
            title: title.to_string(),
            description: description.to_string(),
        };
        tables.timeline.push(entry.clone());
        Ok(entry)
    }

    async fn get_timeline_entries(&self, limit: i64) -> Result<Vec<TimelineEntry>, StoreError> {
        let limit = TimelineLimit::new(limit)?.get() as usize;
        // Entries are pushed in id order.
        Ok(self
            .tables()
            .timeline
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect())
    }

    async fn edit_timeline_entry(
        &self,
        id: i32,
        date: &str,
        title: &str,
        description: &str,
    ) -> Result<TimelineEntry, StoreError> {
        let mut tables = self.tables();
        let entry = tables
            .timeline
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(StoreError::EntryNotFound(id))?;

        entry.date = date.to_string();
        entry.title = title.to_string();
        entry.description = description.to_string();
        Ok(entry.clone())
    }
}
