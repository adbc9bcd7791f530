//! Bounded per-connection datagram queue (§4.J Queue semantics). Grounded on `app_client.hpp`'s
//! `write_nto`/non-blocking contract: "Write-non-timeout (`nto`) semantics: if full, the write
//! returns zero rather than blocking."

use std::collections::VecDeque;

#[derive(Debug, Clone, Copy)]
pub struct QueueConfig {
    pub n_datagram: usize,
    pub n_datagram_max_byte: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        QueueConfig {
            n_datagram: 4,
            n_datagram_max_byte: 1500,
        }
    }
}

/// A bounded, single-connection MPSC-shaped datagram queue. Modeled as a plain `VecDeque` behind
/// the caller's own synchronization rather than a channel type, matching §4.J's description of
/// "one queue per connection index" owned by the server/client rather than a free-floating
/// channel pair.
#[derive(Debug, Clone)]
pub struct DatagramQueue {
    config: QueueConfig,
    datagrams: VecDeque<Vec<u8>>,
}

impl DatagramQueue {
    pub fn new(config: QueueConfig) -> Self {
        DatagramQueue {
            config,
            datagrams: VecDeque::with_capacity(config.n_datagram),
        }
    }

    /// Non-blocking enqueue. Returns the number of bytes accepted: `n` on success, `0` if the
    /// queue is full or `data` exceeds `n_datagram_max_byte` (§4.J: "the write returns zero rather
    /// than blocking").
    pub fn write_nto(&mut self, data: &[u8]) -> usize {
        if self.datagrams.len() >= self.config.n_datagram || data.len() > self.config.n_datagram_max_byte {
            return 0;
        }
        self.datagrams.push_back(data.to_vec());
        data.len()
    }

    /// Non-blocking dequeue. Returns `None` if empty.
    pub fn read_nto(&mut self) -> Option<Vec<u8>> {
        self.datagrams.pop_front()
    }

    pub fn len(&self) -> usize {
        self.datagrams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datagrams.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.datagrams.len() >= self.config.n_datagram
    }
}
