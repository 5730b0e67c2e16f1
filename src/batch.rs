use crate::{ArchiverError, Result};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStatus {
    Pending { remaining: usize },
    Complete,
}

/// Ordered, bounded collection of decoded messages
#[derive(Debug)]
pub struct BatchAccumulator {
    capacity: usize,
    items: Vec<Value>,
}

impl BatchAccumulator {
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(ArchiverError::Config(
                "batch capacity must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            capacity,
            items: Vec::with_capacity(capacity),
        })
    }

    pub fn push(&mut self, value: Value) -> Result<BatchStatus> {
        if self.is_complete() {
            return Err(ArchiverError::Batch(format!(
                "batch already holds {} messages",
                self.capacity
            )));
        }
        self.items.push(value);
        Ok(self.status())
    }

    pub fn status(&self) -> BatchStatus {
        if self.is_complete() {
            BatchStatus::Complete
        } else {
            BatchStatus::Pending {
                remaining: self.capacity - self.items.len(),
            }
        }
    }

    pub fn is_complete(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    pub fn into_items(self) -> Vec<Value> {
        self.items
    }
}
