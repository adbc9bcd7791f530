/*!
A layer-2 protocol engine for DECT NR+ (ETSI TS 103 636): bit-exact PLCF and MAC header codecs,
the MAC multiplexing/message-IE (MMIE) codec and its streaming decoder, a HARQ process pool,
FT/PT beacon scheduling and association state machines, and the application-bridge queue contract
that ties MAC SDUs to an external TUN/UDP shim.

The PHY numerical kernel, radio hardware abstraction, configuration file parsing and the
application-side TUN/UDP shim itself are external collaborators this crate calls into or is called
by, not things it implements -- see each module's own documentation for the narrow interface it
expects from its collaborator.
*/

pub mod app;
pub mod bitfield;
pub mod contact;
pub mod enumeration;
pub mod error;
pub mod firmware;
pub mod harq;
pub mod identity;
pub mod mac_pdu;
pub mod mmie;
pub mod packet_sizes;
pub mod plcf;
pub mod sched;
pub mod sim;

pub use error::{Error, PeekError, Result};
