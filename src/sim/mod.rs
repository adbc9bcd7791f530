//! Virtual radio / simulator channel (§4.K): a deterministic shared time-domain sample space for
//! multi-node in-process simulation, consumed as a collaborator by the radio hardware abstraction
//! (not by firmware directly -- §4.K: "The firmware does not interact with `vspace` directly; only
//! the simulator HW implementation does").
//!
//! Grounded on `simulation/vspp/vspp.hpp`'s "virtual samples per packet" buffer and, per §9 Design
//! Notes ("represent time-domain synchronization... as a rendezvous barrier per sample packet;
//! avoid shared mutable sample buffers by using per-endpoint ring buffers"), implemented as a
//! `std::sync::Barrier`-style rendezvous over per-endpoint sample-packet queues rather than the
//! source's shared `cf_t*` buffers -- Rust's aliasing rules make a shared mutable sample buffer
//! across simulated radios the wrong shape here.

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex};

/// Per-packet metadata exchanged alongside the I/Q buffer (§4.K).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PacketMeta {
    pub position_m: (f32, f32, f32),
    pub frequency_hz: f64,
    pub tx_rx_power_0dbfs_dbm: f32,
    pub snr_target_db: f32,
}

impl Default for PacketMeta {
    fn default() -> Self {
        PacketMeta {
            position_m: (0.0, 0.0, 0.0),
            frequency_hz: 0.0,
            tx_rx_power_0dbfs_dbm: 0.0,
            snr_target_db: 30.0,
        }
    }
}

/// One sample packet ("vspp" in the source): an I/Q buffer plus its metadata.
#[derive(Debug, Clone, Default)]
pub struct SamplePacket {
    pub iq: Vec<(f32, f32)>,
    pub meta: PacketMeta,
}

struct EndpointState {
    tx_ring: VecDeque<SamplePacket>,
    rx_ring: VecDeque<SamplePacket>,
}

/// A shared simulation space every simulated radio registers a TX and RX endpoint in. Endpoints
/// rendezvous sample-packet by sample-packet: `wait_writable_nto` publishes a packet to every
/// other registered endpoint's RX ring, `wait_readable_nto` blocks (with timeout) until this
/// endpoint's own RX ring has a packet.
pub struct VSpace {
    inner: Mutex<Vec<EndpointState>>,
    cv: Condvar,
}

pub type EndpointId = usize;

impl VSpace {
    pub fn new() -> Arc<Self> {
        Arc::new(VSpace {
            inner: Mutex::new(Vec::new()),
            cv: Condvar::new(),
        })
    }

    pub fn register_endpoint(&self) -> EndpointId {
        let mut endpoints = self.inner.lock().unwrap();
        endpoints.push(EndpointState {
            tx_ring: VecDeque::new(),
            rx_ring: VecDeque::new(),
        });
        endpoints.len() - 1
    }

    /// Publishes `packet` to every other endpoint's RX ring and wakes waiters. Non-blocking: the
    /// source's `nto` naming denotes "no timeout on failure", not "never blocks" -- here it simply
    /// never needs to block since per-endpoint rings are unbounded in this reference
    /// implementation (the real sizing policy lives in the HW abstraction this module is a
    /// collaborator for, out of scope per §1).
    pub fn wait_writable_nto(&self, from: EndpointId, packet: SamplePacket) {
        let mut endpoints = self.inner.lock().unwrap();
        for (idx, endpoint) in endpoints.iter_mut().enumerate() {
            if idx != from {
                endpoint.rx_ring.push_back(packet.clone());
            }
        }
        self.cv.notify_all();
    }

    /// Blocks until `endpoint`'s RX ring has a packet or `timeout` elapses, returning the oldest
    /// queued packet.
    pub fn wait_readable_nto(&self, endpoint: EndpointId, timeout: std::time::Duration) -> Option<SamplePacket> {
        let endpoints = self.inner.lock().unwrap();
        let (mut endpoints, timeout_result) = self
            .cv
            .wait_timeout_while(endpoints, timeout, |endpoints| {
                endpoints[endpoint].rx_ring.is_empty()
            })
            .unwrap();
        if timeout_result.timed_out() {
            None
        } else {
            endpoints[endpoint].rx_ring.pop_front()
        }
    }
}

impl Default for VSpace {
    fn default() -> Self {
        VSpace {
            inner: Mutex::new(Vec::new()),
            cv: Condvar::new(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::time::Duration;

    #[test]
    fn published_packet_reaches_other_endpoints_only() {
        let vspace = VSpace::new();
        let tx = vspace.register_endpoint();
        let rx = vspace.register_endpoint();

        let packet = SamplePacket {
            iq: vec![(1.0, 0.0)],
            meta: PacketMeta::default(),
        };
        vspace.wait_writable_nto(tx, packet.clone());

        let received = vspace.wait_readable_nto(rx, Duration::from_millis(100));
        assert_eq!(received.unwrap().iq, packet.iq);

        assert!(vspace
            .wait_readable_nto(tx, Duration::from_millis(10))
            .is_none());
    }

    #[test]
    fn read_times_out_when_nothing_published() {
        let vspace = VSpace::new();
        let rx = vspace.register_endpoint();
        assert!(vspace
            .wait_readable_nto(rx, Duration::from_millis(5))
            .is_none());
    }
}
