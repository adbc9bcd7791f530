//! PT (Portable Termination) association state machine (§4.H): Discover -> Associate -> Steady ->
//! Dissociate.

use crate::mmie::association::RejectCause;
use tracing::{info, warn};

/// Bounded retry budget for a rejected association attempt (§4.H Failures: "after a bounded number,
/// give up").
pub const MAX_ASSOCIATION_RETRIES: u32 = 3;

/// Consecutive missed beacons before a PT falls back to scanning (§4.H Failures).
pub const MAX_MISSED_BEACONS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PtState {
    Discover,
    Associate,
    Steady,
    Dissociate,
}

#[derive(Debug, Clone)]
pub struct PtStateMachine {
    pub state: PtState,
    pub retry_count: u32,
    pub missed_beacon_count: u32,
}

impl Default for PtStateMachine {
    fn default() -> Self {
        PtStateMachine {
            state: PtState::Discover,
            retry_count: 0,
            missed_beacon_count: 0,
        }
    }
}

impl PtStateMachine {
    /// A beacon matching the target network was found; moves Discover -> Associate.
    pub fn on_beacon_found(&mut self) {
        if self.state == PtState::Discover {
            self.state = PtState::Associate;
            self.retry_count = 0;
        }
    }

    /// `association_response_message` decoded with `nof_flows_accepted` -- moves Associate ->
    /// Steady on success.
    pub fn on_association_response(&mut self, nof_flows_accepted: bool) {
        if self.state != PtState::Associate {
            return;
        }
        if nof_flows_accepted {
            info!("association accepted, entering steady state");
            self.state = PtState::Steady;
            self.missed_beacon_count = 0;
        } else {
            warn!(retry_count = self.retry_count, "association rejected");
            self.retry_count += 1;
            if self.retry_count >= MAX_ASSOCIATION_RETRIES {
                warn!("association retries exhausted, returning to discover");
                self.state = PtState::Discover;
            }
        }
    }

    /// `association_request_not_secure`/`conflicting_short_rd_id` reject causes retry with an
    /// incremented counter (§4.H Failures).
    pub fn on_association_rejected(&mut self, cause: RejectCause) {
        warn!(?cause, "association rejected by ft");
        self.on_association_response(false);
    }

    /// A beacon window elapsed with no beacon received; past [`MAX_MISSED_BEACONS`] the PT falls
    /// back to Discover (§4.H Failures).
    pub fn on_beacon_missed(&mut self) {
        if self.state != PtState::Steady {
            return;
        }
        self.missed_beacon_count += 1;
        if self.missed_beacon_count > MAX_MISSED_BEACONS {
            warn!("too many missed beacons, returning to discover");
            self.state = PtState::Discover;
        }
    }

    pub fn on_beacon_received(&mut self) {
        self.missed_beacon_count = 0;
    }

    /// Initiates teardown: sends `association_release`, tears down locally.
    pub fn dissociate(&mut self) {
        self.state = PtState::Dissociate;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn happy_path_reaches_steady() {
        let mut pt = PtStateMachine::default();
        pt.on_beacon_found();
        assert_eq!(pt.state, PtState::Associate);
        pt.on_association_response(true);
        assert_eq!(pt.state, PtState::Steady);
    }

    #[test]
    fn exhausted_retries_return_to_discover() {
        let mut pt = PtStateMachine::default();
        pt.on_beacon_found();
        for _ in 0..MAX_ASSOCIATION_RETRIES {
            pt.on_association_response(false);
        }
        assert_eq!(pt.state, PtState::Discover);
    }

    #[test]
    fn too_many_missed_beacons_falls_back_to_discover() {
        let mut pt = PtStateMachine {
            state: PtState::Steady,
            ..Default::default()
        };
        for _ in 0..=MAX_MISSED_BEACONS {
            pt.on_beacon_missed();
        }
        assert_eq!(pt.state, PtState::Discover);
    }
}
