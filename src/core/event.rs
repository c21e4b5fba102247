use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::core::{Pid, ProcessId, Time};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Arrival,
    Departure,
    TimeSlice,
}

/// A pending occurrence in logical time.
///
/// `epoch` is the process's scheduling epoch at the moment the event was
/// created. CPU events whose stamp no longer matches are stale.
#[derive(Debug, Clone, Copy)]
pub struct Event {
    pub time: Time,
    pub kind: EventKind,
    pub process: ProcessId,
    pub epoch: u64,
    seq: u64,
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Event {}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// BinaryHeap is a max-heap, so earliest time (then lowest seq) must compare greatest
impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .time
            .total_cmp(&self.time)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Time-ordered queue of pending events. Equal timestamps pop in insertion order.
#[derive(Debug, Default)]
pub struct EventQueue {
    heap: BinaryHeap<Event>,
    next_seq: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, time: Time, kind: EventKind, process: ProcessId, epoch: u64) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Event {
            time,
            kind,
            process,
            epoch,
            seq,
        });
    }

    pub fn pop_min(&mut self) -> Option<Event> {
        self.heap.pop()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

/// Notifications produced while handling one event.
#[derive(Debug, Clone, PartialEq)]
pub enum SchedEvent {
    Arrived {
        pid: Pid,
        service_time: Time,
    },
    // Process took the CPU slot
    Dispatched {
        pid: Pid,
    },
    // RR only: CPU time granted for the current turn
    SliceGranted {
        pid: Pid,
        length: Time,
    },
    Preempted {
        pid: Pid,
        remaining: Time,
    },
    Departed {
        pid: Pid,
        turnaround: Time,
    },
    StaleDiscarded {
        kind: EventKind,
    },
    CpuIdle,
}
