//! Application bridge (§4.J): server (ingress queue) and client (egress writer).

pub mod client;
pub mod queue;
pub mod server;

pub use client::{Client, EgressFilter, Sink, APP_POLL_WAIT_TIMEOUT_MS};
pub use queue::{DatagramQueue, QueueConfig};
pub use server::{IngressFilter, Server, Source};

use std::collections::VecDeque;

/// In-memory [`Source`]/[`Sink`] pair standing in for the TUN/UDP backends this crate does not
/// implement (§1 Non-goals), for use in this crate's own tests and by embedding applications that
/// want a loopback path.
#[derive(Debug, Default)]
pub struct LoopbackSource(pub VecDeque<Vec<u8>>);

impl Source for LoopbackSource {
    fn poll_nto(&mut self) -> Option<Vec<u8>> {
        self.0.pop_front()
    }
}

#[derive(Debug, Default)]
pub struct LoopbackSink(pub Vec<Vec<u8>>);

impl Sink for LoopbackSink {
    fn write(&mut self, datagram: &[u8]) {
        self.0.push(datagram.to_vec());
    }
}
