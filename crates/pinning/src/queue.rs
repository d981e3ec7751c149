//! Delayed-pin queue with priority jump.

use moor_core::{ContentAddress, PinJob, PinPriority};
use std::collections::VecDeque;

/// A FIFO queue where high-priority jobs jump to the head.
///
/// This is deliberately not a full priority heap: High jobs go to the
/// front, everything else appends to the tail, and ties keep arrival
/// order.
#[derive(Debug, Default)]
pub struct PinQueue {
    jobs: VecDeque<PinJob>,
}

impl PinQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            jobs: VecDeque::new(),
        }
    }

    /// Enqueue a job according to its priority.
    pub fn push(&mut self, job: PinJob) {
        match job.priority {
            PinPriority::High => self.jobs.push_front(job),
            _ => self.jobs.push_back(job),
        }
    }

    /// Pop the queue head.
    pub fn pop(&mut self) -> Option<PinJob> {
        self.jobs.pop_front()
    }

    /// Zero-based position of the first job for an address.
    pub fn position(&self, address: &ContentAddress) -> Option<usize> {
        self.jobs.iter().position(|job| &job.address == address)
    }

    /// Whether any queued job targets the address.
    pub fn contains(&self, address: &ContentAddress) -> bool {
        self.position(address).is_some()
    }

    /// Number of queued jobs.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
