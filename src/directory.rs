//! Worker directory.
//!
//! Static roster of the team on shift: who they are, which role their share
//! is drawn from, and how many hours they are scheduled for. Loaded once from
//! configuration and read-only afterwards.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TipError};

/// Role a worker's share is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerRole {
    Service,
    Kitchen,
    Bar,
}

impl WorkerRole {
    /// Every role, in display order.
    pub const ALL: [WorkerRole; 3] = [WorkerRole::Service, WorkerRole::Kitchen, WorkerRole::Bar];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkerRole::Service => "service",
            WorkerRole::Kitchen => "kitchen",
            WorkerRole::Bar => "bar",
        }
    }
}

impl fmt::Display for WorkerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A member of the team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    /// Unique identifier (e.g. "mesero1").
    pub id: String,
    /// Display name.
    pub name: String,
    pub role: WorkerRole,
    /// Scheduled hours for the shift.
    pub hours: f64,
}

impl Worker {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: WorkerRole, hours: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
            hours,
        }
    }
}

/// Roster problems detected while building a directory.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RosterError {
    #[error("Worker id cannot be empty")]
    EmptyId,

    #[error("Duplicate worker id: {0}")]
    DuplicateWorker(String),

    #[error("Worker {id} has non-positive scheduled hours: {hours}")]
    InvalidHours { id: String, hours: f64 },
}

/// Insertion-ordered worker roster with id lookup.
#[derive(Debug, Clone, Default)]
pub struct WorkerDirectory {
    workers: Vec<Worker>,
    index: HashMap<String, usize>,
}

impl WorkerDirectory {
    /// Build a directory, rejecting empty ids, duplicates and non-positive hours.
    pub fn new(workers: Vec<Worker>) -> std::result::Result<Self, RosterError> {
        let mut index = HashMap::with_capacity(workers.len());
        for (position, worker) in workers.iter().enumerate() {
            if worker.id.is_empty() {
                return Err(RosterError::EmptyId);
            }
            if worker.hours.is_nan() || worker.hours <= 0.0 {
                return Err(RosterError::InvalidHours {
                    id: worker.id.clone(),
                    hours: worker.hours,
                });
            }
            if index.insert(worker.id.clone(), position).is_some() {
                return Err(RosterError::DuplicateWorker(worker.id.clone()));
            }
        }
        Ok(Self { workers, index })
    }

    /// Look up a worker by id.
    pub fn get(&self, worker_id: &str) -> Result<&Worker> {
        self.index
            .get(worker_id)
            .map(|&position| &self.workers[position])
            .ok_or_else(|| TipError::NotFound(worker_id.to_string()))
    }

    pub fn contains(&self, worker_id: &str) -> bool {
        self.index.contains_key(worker_id)
    }

    /// Workers holding `role`, in directory order.
    pub fn list_by_role(&self, role: WorkerRole) -> Vec<&Worker> {
        self.workers.iter().filter(|w| w.role == role).collect()
    }

    pub fn count_by_role(&self, role: WorkerRole) -> usize {
        self.workers.iter().filter(|w| w.role == role).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Worker> {
        self.workers.iter()
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }
}
