use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::time;

/// Creation and last-modification timestamps of an entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    created: Option<DateTime<Utc>>,
    modified: Option<DateTime<Utc>>,
}

impl History {
    pub fn created(&self) -> Option<DateTime<Utc>> {
        self.created
    }

    pub fn modified(&self) -> Option<DateTime<Utc>> {
        self.modified
    }

    /// Records the creation time; only the first call has an effect.
    pub fn mark_created(&mut self, at: DateTime<Utc>) {
        if self.created.is_none() {
            self.created = Some(at);
        }
    }

    pub fn mark_modified(&mut self, at: DateTime<Utc>) {
        self.modified = Some(at);
    }
}

/// Entities that keep a [`History`], stamped from the process clock.
pub trait HasHistory {
    fn history(&self) -> &History;

    fn history_mut(&mut self) -> &mut History;

    fn created(&self) -> Option<DateTime<Utc>> {
        self.history().created()
    }

    fn modified(&self) -> Option<DateTime<Utc>> {
        self.history().modified()
    }

    fn set_as_created(&mut self) {
        self.history_mut().mark_created(time::now());
    }

    fn set_as_modified(&mut self) {
        self.history_mut().mark_modified(time::now());
    }
}
