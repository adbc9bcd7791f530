//! Callback timer wheel (§3 Callbacks, §4.G, §9 Design Notes: "Implement with a binary heap keyed
//! by absolute sample time"). Never invoked from PHY interrupt context -- only from the firmware
//! dispatcher, per §9.

use crate::sched::allocation::SampleTime64;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

pub type CallbackId = u64;

struct Entry {
    fire_at: SampleTime64,
    period: Option<i64>,
    id: CallbackId,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.fire_at == other.fire_at
    }
}
impl Eq for Entry {}
impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Entry {
    /// Reversed so [`BinaryHeap`] (a max-heap) pops the *earliest* `fire_at` first.
    fn cmp(&self, other: &Self) -> Ordering {
        other.fire_at.cmp(&self.fire_at)
    }
}

/// A monotonically-ordered map from absolute sample-count timestamps to callback ids (§3
/// Callbacks). The wheel itself carries no function pointers -- `run` yields due ids to the
/// caller, which dispatches them in the firmware's own callback registry; this keeps the wheel
/// free of lifetime/closure-ownership complications the source's raw function-pointer callbacks
/// don't have to contend with in Rust.
#[derive(Default)]
pub struct TimerWheel {
    heap: BinaryHeap<Entry>,
    next_id: CallbackId,
}

impl TimerWheel {
    pub fn new() -> Self {
        TimerWheel {
            heap: BinaryHeap::new(),
            next_id: 0,
        }
    }

    /// Inserts a callback due at `absolute_time`. If `period` is `Some`, the callback is
    /// re-inserted at `absolute_time + period` every time it fires.
    pub fn add_callback(&mut self, absolute_time: SampleTime64, period: Option<i64>) -> CallbackId {
        let id = self.next_id;
        self.next_id += 1;
        self.heap.push(Entry {
            fire_at: absolute_time,
            period,
            id,
        });
        id
    }

    /// Removes every callback with `fire_at <= now`, re-inserting periodic ones at their next
    /// fire time, and returns their ids in time order.
    pub fn run(&mut self, now: SampleTime64) -> Vec<CallbackId> {
        let mut due = Vec::new();
        while let Some(top) = self.heap.peek() {
            if top.fire_at > now {
                break;
            }
            let entry = self.heap.pop().unwrap();
            due.push(entry.id);
            if let Some(period) = entry.period {
                self.heap.push(Entry {
                    fire_at: entry.fire_at + period,
                    period: Some(period),
                    id: entry.id,
                });
            }
        }
        due
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn fires_due_callbacks_in_time_order() {
        let mut wheel = TimerWheel::new();
        let later = wheel.add_callback(200, None);
        let earlier = wheel.add_callback(100, None);
        assert_eq!(wheel.run(150), vec![earlier]);
        assert_eq!(wheel.run(250), vec![later]);
        assert!(wheel.is_empty());
    }

    #[test]
    fn periodic_callback_reinserts_itself() {
        let mut wheel = TimerWheel::new();
        let id = wheel.add_callback(100, Some(50));
        assert_eq!(wheel.run(100), vec![id]);
        assert!(wheel.run(130).is_empty());
        assert_eq!(wheel.run(150), vec![id]);
    }
}
