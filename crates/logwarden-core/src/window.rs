//! Window: bounded FIFO of the most recent log keys.
//!
//! Storage is allocated once at construction; a full window evicts its oldest
//! key before accepting a new one, so pushes never reallocate.

use crate::error::ConfigError;
use crate::types::LogKey;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct Window {
    keys: VecDeque<LogKey>,
    capacity: usize,
}

impl Window {
    /// Create an empty window. A capacity of zero is a configuration error.
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity < 1 {
            return Err(ConfigError::InvalidWindowSize(capacity));
        }
        Ok(Self {
            keys: VecDeque::with_capacity(capacity),
            capacity,
        })
    }

    /// Append `key`, evicting the oldest key first when full, and return a
    /// copy of the resulting contents in arrival order.
    pub fn push(&mut self, key: LogKey) -> Vec<LogKey> {
        if self.keys.len() == self.capacity {
            self.keys.pop_front();
        }
        self.keys.push_back(key);
        self.snapshot()
    }

    /// Copy of the current contents, oldest first.
    pub fn snapshot(&self) -> Vec<LogKey> {
        self.keys.iter().cloned().collect()
    }

    pub fn size(&self) -> usize {
        self.keys.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.keys.len() == self.capacity
    }
}
