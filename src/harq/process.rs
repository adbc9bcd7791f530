//! A single HARQ process (§4.F): a [`crate::harq::buffer::HarqBuffer`] plus the acquisition key
//! and finalization policy that govern when it may be reused. Grounded on the acquisition
//! signature `get_process_tx/rx(plcf_type, network_id, packet_sizes_def, finalize_policy)`.

use crate::harq::buffer::{Direction, HarqBuffer};
use crate::packet_sizes::PacketSizesDef;

/// Selects whether a process's soft buffer and (for TX) serialized content survive past the
/// current transmission/reception, to support a same-content redundancy-version retransmission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FinalizePolicy {
    /// Soft buffer and `a_cnt` are preserved; a subsequent acquisition with `rv > 0` skips
    /// re-running systematic/parity encoding and only re-runs rate matching.
    KeepForRetransmission,
    /// Soft buffer is cleared and the process returns to the free list immediately.
    #[default]
    ResetAndTerminate,
}

/// Redundancy version selecting the FEC rate-matcher's puncturing pattern (§3, GLOSSARY: RV).
pub type RedundancyVersion = u8;

/// The key a caller acquires a process by; two in-flight RX processes must never share a key
/// (§4.F invariant: "RX processes do not overlap across in-flight receive operations of the same
/// `(plcf_type, network_id)` key").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProcessKey {
    pub plcf_type: u32,
    pub network_id: u32,
}

#[derive(Debug, Clone)]
pub struct HarqProcess {
    pub buffer: HarqBuffer,
    pub key: Option<ProcessKey>,
    pub packet_sizes: Option<PacketSizesDef>,
    pub finalize_policy: FinalizePolicy,
    pub rv: RedundancyVersion,
    in_use: bool,
}

impl HarqProcess {
    pub fn new(direction: Direction, a_len: usize, d_len: usize) -> Self {
        HarqProcess {
            buffer: HarqBuffer::new(direction, a_len, d_len),
            key: None,
            packet_sizes: None,
            finalize_policy: FinalizePolicy::default(),
            rv: 0,
            in_use: false,
        }
    }

    pub fn is_free(&self) -> bool {
        !self.in_use
    }

    /// Reserves this process for a new transmission/reception at `rv=0`. Resets the soft buffer
    /// unless the caller previously finalized with `KeepForRetransmission` and is re-acquiring the
    /// same key at `rv > 0` -- see [`Self::acquire_retransmission`] for that path.
    pub fn acquire(
        &mut self,
        key: ProcessKey,
        packet_sizes: PacketSizesDef,
        finalize_policy: FinalizePolicy,
    ) {
        self.buffer.reset_a_cnt_and_softbuffer();
        self.key = Some(key);
        self.packet_sizes = Some(packet_sizes);
        self.finalize_policy = finalize_policy;
        self.rv = 0;
        self.in_use = true;
    }

    /// Re-acquires an already-held process for a retransmission at `rv`, per §8 scenario 5: the
    /// soft buffer is NOT reset, only `rv` changes.
    pub fn acquire_retransmission(&mut self, rv: RedundancyVersion) {
        self.rv = rv;
        self.in_use = true;
    }

    /// Releases the process per its declared finalize policy. Returns `true` if the process is
    /// now free for a new, unrelated acquisition.
    pub fn finalize(&mut self) -> bool {
        match self.finalize_policy {
            FinalizePolicy::ResetAndTerminate => {
                self.buffer.reset_a_cnt_and_softbuffer();
                self.key = None;
                self.packet_sizes = None;
                self.in_use = false;
                true
            }
            FinalizePolicy::KeepForRetransmission => {
                self.in_use = false;
                false
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn sizes() -> PacketSizesDef {
        PacketSizesDef {
            u: 1,
            b: 1,
            packet_length_type: 1,
            packet_length: 1,
            tm_mode_index: 0,
            mcs_index: 2,
            z: 2048,
        }
    }

    #[test]
    fn retransmission_keeps_softbuffer_contents() {
        let mut p = HarqProcess::new(Direction::Tx, 128, 6400);
        let key = ProcessKey {
            plcf_type: 2,
            network_id: 100,
        };
        p.acquire(key, sizes(), FinalizePolicy::KeepForRetransmission);
        p.buffer.d_mut()[0] = 0xAB;
        assert!(!p.finalize());
        p.acquire_retransmission(1);
        assert_eq!(p.rv, 1);
        assert_eq!(p.buffer.d()[0], 0xAB);
    }

    #[test]
    fn reset_and_terminate_frees_and_clears() {
        let mut p = HarqProcess::new(Direction::Rx, 128, 6400);
        let key = ProcessKey {
            plcf_type: 2,
            network_id: 100,
        };
        p.acquire(key, sizes(), FinalizePolicy::ResetAndTerminate);
        assert!(p.finalize());
        assert!(p.is_free());
        assert!(p.key.is_none());
    }
}
