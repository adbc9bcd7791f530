//! Contact / association state machines (§4.H): per-peer state, identity management.

pub mod ft;
pub mod pt;
pub mod record;

pub use ft::{FtState, FtStateMachine};
pub use pt::{PtState, PtStateMachine};
pub use record::{Contact, FeedbackPlan, MimoCsi, SyncReport};
