//! HARQ process pool (§4.F): "two pools (TX / RX), each containing a small, fixed number of
//! processes". Grounded on `mmie_pool_tx.hpp`'s eager-preallocation idiom, applied here to HARQ
//! processes instead of MMIEs: a fixed-size `Vec<HarqProcess>` scanned linearly for a free slot.

use crate::harq::buffer::{softbuffer_size_for_z, Direction};
use crate::harq::process::{FinalizePolicy, HarqProcess, ProcessKey, RedundancyVersion};
use crate::packet_sizes::PacketSizesDef;
use tracing::warn;

/// Upper bound on transport-block bytes a process's `a` buffer must accommodate, plus the 12-byte
/// margin the source's `buffer_tx_t` documentation calls for around MAC header overhead.
const A_BUFFER_MARGIN_BYTES: usize = 12;

#[derive(Debug, Clone, Copy)]
pub struct HarqPoolConfig {
    pub n_processes: usize,
    pub n_tb_byte_max: usize,
}

impl Default for HarqPoolConfig {
    fn default() -> Self {
        HarqPoolConfig {
            n_processes: 8,
            n_tb_byte_max: 1024,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HarqProcessPool {
    direction: Direction,
    processes: Vec<HarqProcess>,
}

impl HarqProcessPool {
    pub fn new(direction: Direction, config: HarqPoolConfig) -> Self {
        let a_len = config.n_tb_byte_max + A_BUFFER_MARGIN_BYTES;
        let d_len = softbuffer_size_for_z(6144);
        HarqProcessPool {
            direction,
            processes: (0..config.n_processes)
                .map(|_| HarqProcess::new(direction, a_len, d_len))
                .collect(),
        }
    }

    pub fn n_free(&self) -> usize {
        self.processes.iter().filter(|p| p.is_free()).count()
    }

    /// Acquires a free process for a new `rv=0` transmission/reception. Per §7 (`HarqUnavailable`):
    /// returns `None` rather than blocking or erroring when the pool is exhausted; the caller logs
    /// a warning and returns an empty batch.
    pub fn acquire(
        &mut self,
        key: ProcessKey,
        packet_sizes: PacketSizesDef,
        finalize_policy: FinalizePolicy,
    ) -> Option<&mut HarqProcess> {
        if self.direction == Direction::Rx
            && self
                .processes
                .iter()
                .any(|p| !p.is_free() && p.key == Some(key))
        {
            warn!(?key, "rx harq process already in flight for this key");
            return None;
        }
        match self.processes.iter_mut().find(|p| p.is_free()) {
            Some(p) => {
                p.acquire(key, packet_sizes, finalize_policy);
                Some(p)
            }
            None => {
                warn!(?key, direction = ?self.direction, "harq process pool exhausted");
                None
            }
        }
    }

    /// Re-acquires the process already holding `key` for a retransmission at `rv`, per §8 scenario
    /// 5. Returns `None` if no such process is currently held (it was already finalized).
    pub fn acquire_retransmission(
        &mut self,
        key: ProcessKey,
        rv: RedundancyVersion,
    ) -> Option<&mut HarqProcess> {
        match self
            .processes
            .iter_mut()
            .find(|p| p.key == Some(key) && matches!(p.finalize_policy, FinalizePolicy::KeepForRetransmission))
        {
            Some(p) => {
                p.acquire_retransmission(rv);
                Some(p)
            }
            None => None,
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
    fn exhaustion_returns_none_and_does_not_panic() {
        let mut pool = HarqProcessPool::new(
            Direction::Tx,
            HarqPoolConfig {
                n_processes: 1,
                n_tb_byte_max: 64,
            },
        );
        let key = ProcessKey {
            plcf_type: 2,
            network_id: 1,
        };
        assert!(pool
            .acquire(key, sizes(), FinalizePolicy::ResetAndTerminate)
            .is_some());
        assert!(pool
            .acquire(key, sizes(), FinalizePolicy::ResetAndTerminate)
            .is_none());
    }

    #[test]
    fn rx_processes_do_not_overlap_same_key() {
        let mut pool = HarqProcessPool::new(
            Direction::Rx,
            HarqPoolConfig {
                n_processes: 4,
                n_tb_byte_max: 64,
            },
        );
        let key = ProcessKey {
            plcf_type: 2,
            network_id: 1,
        };
        assert!(pool
            .acquire(key, sizes(), FinalizePolicy::KeepForRetransmission)
            .is_some());
        assert!(pool
            .acquire(key, sizes(), FinalizePolicy::ResetAndTerminate)
            .is_none());
    }

    #[test]
    fn retransmission_reacquires_kept_process() {
        let mut pool = HarqProcessPool::new(
            Direction::Tx,
            HarqPoolConfig {
                n_processes: 2,
                n_tb_byte_max: 64,
            },
        );
        let key = ProcessKey {
            plcf_type: 2,
            network_id: 1,
        };
        pool.acquire(key, sizes(), FinalizePolicy::KeepForRetransmission)
            .unwrap()
            .finalize();
        let p = pool.acquire_retransmission(key, 1).expect("kept process");
        assert_eq!(p.rv, 1);
    }
}
