// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Cycle-driven event scheduler
//!
//! The scheduler keeps a virtual clock measured in CPU cycles (one cycle per
//! instruction step) and a queue of callbacks keyed by the cycle they are
//! due. The owner advances the clock one cycle at a time; at every cycle
//! boundary all due callbacks run in the order they were scheduled, before
//! the CPU executes the instruction for that cycle.
//!
//! Events scheduled for a cycle that has already passed run at the next
//! boundary.
//!
//! # Example
//!
//! ```
//! use n64rx::core::cpu::CPU;
//! use n64rx::core::memory::Bus;
//! use n64rx::core::timing::Scheduler;
//!
//! let mut scheduler = Scheduler::new();
//! let mut cpu = CPU::new();
//! let mut bus = Bus::new();
//!
//! scheduler.schedule_at(2, |_cpu, bus| bus.vi.vblank());
//!
//! for _ in 0..3 {
//!     scheduler.run_due(&mut cpu, &mut bus);
//!     scheduler.advance();
//! }
//!
//! assert_eq!(bus.vi.frame_count(), 1);
//! assert_eq!(scheduler.pending_events(), 0);
//! ```

use crate::core::cpu::CPU;
use crate::core::memory::Bus;
use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::rc::Rc;

/// Absolute time in CPU cycles since the scheduler was created
pub type Cycle = u64;

/// Scheduled callback
///
/// Shared so that a repeating schedule can queue one callback many times.
type Callback = Rc<RefCell<dyn FnMut(&mut CPU, &mut Bus)>>;

/// One queued callback invocation
struct ScheduledEvent {
    /// Cycle at which the event is due
    cycle: Cycle,
    /// Insertion order, breaks ties between events due on the same cycle
    seq: u64,
    callback: Callback,
}

impl PartialEq for ScheduledEvent {
    fn eq(&self, other: &Self) -> bool {
        self.cycle == other.cycle && self.seq == other.seq
    }
}

impl Eq for ScheduledEvent {}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledEvent {
    /// Reversed so the max-heap yields the earliest (cycle, seq) first
    fn cmp(&self, other: &Self) -> Ordering {
        (other.cycle, other.seq).cmp(&(self.cycle, self.seq))
    }
}

/// Deterministic event queue and virtual clock
pub struct Scheduler {
    /// Current cycle
    cycle: Cycle,

    /// Next insertion sequence number
    next_seq: u64,

    /// Pending events ordered by (cycle, seq)
    queue: BinaryHeap<ScheduledEvent>,
}

impl Scheduler {
    /// Create an empty scheduler at cycle 0
    pub fn new() -> Self {
        Self {
            cycle: 0,
            next_seq: 0,
            queue: BinaryHeap::new(),
        }
    }

    /// Current cycle of the virtual clock
    pub fn current_cycle(&self) -> Cycle {
        self.cycle
    }

    /// Number of queued callback invocations
    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    /// Cycle of the earliest queued event
    pub fn next_event_cycle(&self) -> Option<Cycle> {
        self.queue.peek().map(|event| event.cycle)
    }

    /// Schedule `callback` to run at `cycle`
    ///
    /// Callbacks due on the same cycle run in the order they were scheduled.
    pub fn schedule_at<F>(&mut self, cycle: Cycle, callback: F)
    where
        F: FnMut(&mut CPU, &mut Bus) + 'static,
    {
        self.push(cycle, Rc::new(RefCell::new(callback)));
    }

    /// Schedule `callback` at `first`, `first + interval`, ... `count` times
    ///
    /// Equivalent to `count` calls to [`Scheduler::schedule_at`] sharing one
    /// callback.
    pub fn schedule_every<F>(&mut self, first: Cycle, interval: Cycle, count: usize, callback: F)
    where
        F: FnMut(&mut CPU, &mut Bus) + 'static,
    {
        let callback: Callback = Rc::new(RefCell::new(callback));
        for i in 0..count as u64 {
            self.push(first + i * interval, Rc::clone(&callback));
        }
    }

    fn push(&mut self, cycle: Cycle, callback: Callback) {
        if cycle < self.cycle {
            log::trace!(
                "Event scheduled for past cycle {} runs at cycle {}",
                cycle,
                self.cycle
            );
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(ScheduledEvent {
            cycle,
            seq,
            callback,
        });
    }

    /// Run every event due at or before the current cycle
    ///
    /// # Returns
    ///
    /// Number of callbacks invoked
    pub fn run_due(&mut self, cpu: &mut CPU, bus: &mut Bus) -> usize {
        let mut ran = 0;
        while self
            .queue
            .peek()
            .is_some_and(|event| event.cycle <= self.cycle)
        {
            let Some(event) = self.queue.pop() else {
                break;
            };
            log::trace!("Cycle {}: event #{} (due {})", self.cycle, event.seq, event.cycle);
            (&mut *event.callback.borrow_mut())(cpu, bus);
            ran += 1;
        }
        ran
    }

    /// Move the clock to the next cycle
    #[inline]
    pub fn advance(&mut self) {
        self.cycle += 1;
    }

    /// Drop all queued events; the clock keeps its value
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    /// Drop all events and rewind the clock to cycle 0
    pub fn reset(&mut self) {
        self.queue.clear();
        self.cycle = 0;
        self.next_seq = 0;
    }

    /// Drop all events and move the clock to `cycle`
    pub(crate) fn restore_cycle(&mut self, cycle: Cycle) {
        self.queue.clear();
        self.cycle = cycle;
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
