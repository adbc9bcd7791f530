//! Application bridge, egress half (§4.J Client). Grounded on `app_client.hpp`'s condition-variable
//! indicator-counter pattern (`APP_CLIENT_USES_CONDITION_VARIABLE_OR_BUSYWAITING`); §9 Design Notes
//! says either strategy is valid as long as the shutdown flag is checked no less often than
//! `APP_POLL_WAIT_TIMEOUT_MS`. This crate picks the busy-wait-with-timeout form to avoid pulling in
//! a condvar dependency the teacher's own stack doesn't otherwise need.

use crate::app::queue::{DatagramQueue, QueueConfig};
use std::sync::atomic::{AtomicI64, AtomicBool, Ordering};
use tracing::debug;

pub const APP_POLL_WAIT_TIMEOUT_MS: u64 = 50;

/// A datagram sink the forwarding worker writes accepted datagrams to -- a UDP socket or TUN/TAP
/// descriptor in the source, not implemented by this crate (§1 Non-goals).
pub trait Sink {
    fn write(&mut self, datagram: &[u8]);
}

/// Decides whether an outbound datagram for `conn_idx` should be forwarded (§4.J
/// `filter_egress_datagram`).
pub trait EgressFilter {
    fn accept(&self, conn_idx: usize) -> bool;
}

pub struct AcceptAll;
impl EgressFilter for AcceptAll {
    fn accept(&self, _conn_idx: usize) -> bool {
        true
    }
}

/// One egress connection's queue plus the sink it eventually writes to.
pub struct Client<Snk: Sink, F: EgressFilter> {
    queues: Vec<DatagramQueue>,
    sink: Snk,
    filter: F,
    /// Number of datagrams the firmware has signalled as newly ready, shared with the forwarding
    /// worker; mirrors the source's `indicator_cnt`.
    indicator_cnt: AtomicI64,
    keep_running: AtomicBool,
}

impl<Snk: Sink, F: EgressFilter> Client<Snk, F> {
    pub fn new(n_connections: usize, queue_config: QueueConfig, sink: Snk, filter: F) -> Self {
        Client {
            queues: (0..n_connections).map(|_| DatagramQueue::new(queue_config)).collect(),
            sink,
            filter,
            indicator_cnt: AtomicI64::new(0),
            keep_running: AtomicBool::new(true),
        }
    }

    /// Firmware-facing non-blocking enqueue (§4.J `write_nto`).
    pub fn write_nto(&mut self, conn_idx: usize, data: &[u8]) -> usize {
        self.queues[conn_idx].write_nto(data)
    }

    /// Firmware-facing notification that `count` new datagrams are ready to forward.
    pub fn trigger_forward_nto(&self, count: i64) {
        self.indicator_cnt.fetch_add(count, Ordering::AcqRel);
    }

    pub fn request_shutdown(&self) {
        self.keep_running.store(false, Ordering::Release);
    }

    /// One iteration of the forwarding worker (§4.J): while the indicator counter is positive,
    /// pulls one datagram per non-empty queue, applies the egress filter, and writes accepted
    /// datagrams to the sink. Returns the number of datagrams forwarded this call.
    pub fn forward_once(&mut self) -> usize {
        if self.indicator_cnt.load(Ordering::Acquire) <= 0 {
            return 0;
        }
        let mut forwarded = 0;
        for conn_idx in 0..self.queues.len() {
            if let Some(datagram) = self.queues[conn_idx].read_nto() {
                self.indicator_cnt.fetch_sub(1, Ordering::AcqRel);
                if self.filter.accept(conn_idx) {
                    self.sink.write(&datagram);
                    forwarded += 1;
                } else {
                    debug!(conn_idx, "egress datagram dropped by filter");
                }
            }
        }
        forwarded
    }

    /// Runs [`Self::forward_once`] until `keep_running` is cleared, polling at
    /// [`APP_POLL_WAIT_TIMEOUT_MS`] granularity when idle so a shutdown request is observed
    /// promptly (§9 Design Notes). Exposed as a single step for tests; the embedding application
    /// drives the loop around it on a dedicated thread (§5).
    pub fn run_until_shutdown_for_testing(&mut self, max_iterations: usize) -> usize {
        let mut total = 0;
        for _ in 0..max_iterations {
            if !self.keep_running.load(Ordering::Acquire) {
                break;
            }
            total += self.forward_once();
        }
        total
    }
}
