//! In-memory example data service.
//!
//! Handles are cheap to clone and share one table, so several use-cases
//! can be wired against the same store. Timestamps are kept at millisecond
//! precision, matching what the SQLite store can represent.

use super::{DataResult, DataServiceError, ExampleDataService};
use crate::model::example::{Example, ExampleId, ExamplePatch};
use chrono::{DateTime, SubsecRound, Utc};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

#[derive(Debug, Default)]
struct MemoryTable {
    last_id: ExampleId,
    rows: BTreeMap<ExampleId, Example>,
}

impl MemoryTable {
    fn row(&self, id: ExampleId) -> DataResult<&Example> {
        self.rows.get(&id).ok_or(DataServiceError::NotFound(id))
    }

    fn row_mut(&mut self, id: ExampleId) -> DataResult<&mut Example> {
        self.rows.get_mut(&id).ok_or(DataServiceError::NotFound(id))
    }

    fn active_name_owner(&self, name: &str) -> Option<&Example> {
        self.rows
            .values()
            .find(|example| example.is_active() && example.name == name)
    }

    fn ensure_name_free(&self, name: &str, id: ExampleId) -> DataResult<()> {
        match self.active_name_owner(name) {
            Some(owner) if owner.id != id => Err(DataServiceError::Backend(format!(
                "unique constraint failed: examples.name `{name}`"
            ))),
            _ => Ok(()),
        }
    }
}

/// Map-backed example data service with monotonically assigned ids.
#[derive(Debug, Clone, Default)]
pub struct InMemoryExampleDataService {
    table: Rc<RefCell<MemoryTable>>,
}

impl InMemoryExampleDataService {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ExampleDataService for InMemoryExampleDataService {
    fn create(&self, example: &Example) -> DataResult<Example> {
        example.validate()?;

        let mut table = self.table.borrow_mut();
        if example.is_active() {
            table.ensure_name_free(&example.name, 0)?;
        }
        table.last_id += 1;
        let mut stored = example.clone();
        stored.id = table.last_id;
        stored.created_at = to_millis(stored.created_at);
        stored.deactivated_at = stored.deactivated_at.map(to_millis);
        table.rows.insert(stored.id, stored.clone());
        Ok(stored)
    }

    fn update(&self, example: &Example) -> DataResult<Example> {
        example.validate()?;

        let mut table = self.table.borrow_mut();
        if table.row(example.id)?.is_active() {
            table.ensure_name_free(&example.name, example.id)?;
        }
        let row = table.row_mut(example.id)?;
        row.name = example.name.clone();
        row.useful = example.useful;
        Ok(row.clone())
    }

    fn update_properties(&self, id: ExampleId, patch: &ExamplePatch) -> DataResult<()> {
        patch.validate()?;

        let mut table = self.table.borrow_mut();
        if let Some(name) = &patch.name {
            if table.row(id)?.is_active() {
                table.ensure_name_free(name, id)?;
            }
        }
        table.row_mut(id)?.apply(patch);
        Ok(())
    }

    fn delete(&self, id: ExampleId) -> DataResult<()> {
        self.table
            .borrow_mut()
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(DataServiceError::NotFound(id))
    }

    fn find_all(&self) -> DataResult<Vec<Example>> {
        Ok(self.table.borrow().rows.values().cloned().collect())
    }

    fn find_actives(&self) -> DataResult<Vec<Example>> {
        Ok(self
            .table
            .borrow()
            .rows
            .values()
            .filter(|example| example.is_active())
            .cloned()
            .collect())
    }

    fn find_by_id(&self, id: ExampleId) -> DataResult<Option<Example>> {
        Ok(self.table.borrow().rows.get(&id).cloned())
    }

    fn find_by_name(&self, name: &str) -> DataResult<Option<Example>> {
        Ok(self.table.borrow().active_name_owner(name).cloned())
    }

    fn logical_deletion(&self, id: ExampleId, deactivated_at: DateTime<Utc>) -> DataResult<()> {
        self.table
            .borrow_mut()
            .row_mut(id)?
            .deactivate(to_millis(deactivated_at));
        Ok(())
    }
}

fn to_millis(at: DateTime<Utc>) -> DateTime<Utc> {
    at.trunc_subsecs(3)
}
