//! HARQ process pool (§4.F): retransmission buffer management with soft-combining, transmit
//! ordering and finalization policies.

pub mod buffer;
pub mod pool;
pub mod process;

pub use buffer::{Direction, HarqBuffer};
pub use pool::{HarqPoolConfig, HarqProcessPool};
pub use process::{FinalizePolicy, HarqProcess, ProcessKey, RedundancyVersion};
