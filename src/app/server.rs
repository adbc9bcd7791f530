//! Application bridge, ingress half (§4.J Server). Grounded on `vnic_server.cpp`/`socket_server.cpp`,
//! which both poll a datagram source and push accepted datagrams into a per-connection queue; the
//! two backends differ only in their datagram source, modeled here as the [`Source`] trait.

use crate::app::queue::{DatagramQueue, QueueConfig};

/// A datagram source the server polls -- a UDP socket or TUN/TAP descriptor in the source, not
/// implemented by this crate (§1 Non-goals); an in-memory [`crate::app::LoopbackSource`] stands in
/// for tests.
pub trait Source {
    /// Non-blocking read. Returns `None` if nothing is currently available.
    fn poll_nto(&mut self) -> Option<Vec<u8>>;
}

/// Inspects a candidate datagram before it is enqueued; may reject based on IP version / UDP
/// ports per §4.J ("applies an ingress filter").
pub trait IngressFilter {
    fn accept(&self, datagram: &[u8]) -> bool;
}

pub struct AcceptAll;
impl IngressFilter for AcceptAll {
    fn accept(&self, _datagram: &[u8]) -> bool {
        true
    }
}

pub struct Server<S: Source, F: IngressFilter> {
    source: S,
    filter: F,
    queue: DatagramQueue,
}

impl<S: Source, F: IngressFilter> Server<S, F> {
    pub fn new(source: S, filter: F, queue_config: QueueConfig) -> Self {
        Server {
            source,
            filter,
            queue: DatagramQueue::new(queue_config),
        }
    }

    /// One polling iteration (§4.J: "runs a polling loop"). Returns `true` if a datagram was
    /// accepted and enqueued, incrementing the conceptual PHY job-queue notifier (left to the
    /// caller, which owns the firmware instance this server feeds).
    pub fn poll_once(&mut self) -> bool {
        match self.source.poll_nto() {
            Some(datagram) if self.filter.accept(&datagram) => self.queue.write_nto(&datagram) > 0,
            _ => false,
        }
    }

    pub fn read_nto(&mut self) -> Option<Vec<u8>> {
        self.queue.read_nto()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::VecDeque;

    struct FakeSource(VecDeque<Vec<u8>>);
    impl Source for FakeSource {
        fn poll_nto(&mut self) -> Option<Vec<u8>> {
            self.0.pop_front()
        }
    }

    #[test]
    fn accepted_datagram_is_queued() {
        let mut server = Server::new(
            FakeSource(VecDeque::from([vec![1, 2, 3]])),
            AcceptAll,
            QueueConfig::default(),
        );
        assert!(server.poll_once());
        assert_eq!(server.read_nto(), Some(vec![1, 2, 3]));
    }

    struct RejectAll;
    impl IngressFilter for RejectAll {
        fn accept(&self, _datagram: &[u8]) -> bool {
            false
        }
    }

    #[test]
    fn filtered_datagram_is_dropped() {
        let mut server = Server::new(
            FakeSource(VecDeque::from([vec![1]])),
            RejectAll,
            QueueConfig::default(),
        );
        assert!(!server.poll_once());
        assert_eq!(server.read_nto(), None);
    }
}
