//! Scheduling / allocation engine (§4.G): periodic beacon clock, per-peer uplink/downlink
//! opportunity calculation, callback timer wheel.

pub mod allocation;
pub mod timer_wheel;

pub use allocation::{Direction, FtAllocation, PtAllocation, SampleTime64, NO_OPPORTUNITY};
pub use timer_wheel::{CallbackId, TimerWheel};
