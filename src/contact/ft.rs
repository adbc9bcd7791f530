//! FT (Fixed Termination) association state machine (§4.H): Resource -> Steady -> Dissociation.

use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FtState {
    /// Advertise capacity, accept `association_request` and answer.
    Resource,
    /// Transmit beacons, grant unicasts.
    Steady,
    /// Stop accepting, drain, broadcast shutdown.
    Dissociation,
}

impl Default for FtState {
    fn default() -> Self {
        FtState::Resource
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FtStateMachine {
    pub state: FtState,
}

impl FtStateMachine {
    pub fn new() -> Self {
        FtStateMachine::default()
    }

    /// The first beacon has gone out; an FT is "Steady" once it has started its regular beacon
    /// cadence (§4.H FT state flow).
    pub fn on_first_beacon_sent(&mut self) {
        if self.state == FtState::Resource {
            info!("ft entering steady state");
            self.state = FtState::Steady;
        }
    }

    /// Orchestrator requested shutdown (`keep_running = false`, §5/§7): stop accepting new
    /// associations and begin draining, per §5 Cancellation and §4.H FT state flow.
    pub fn begin_dissociation(&mut self) {
        info!("ft entering dissociation, draining and broadcasting shutdown");
        self.state = FtState::Dissociation;
    }

    pub fn accepts_new_associations(&self) -> bool {
        self.state == FtState::Resource || self.state == FtState::Steady
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn resource_transitions_to_steady_on_first_beacon() {
        let mut ft = FtStateMachine::new();
        assert_eq!(ft.state, FtState::Resource);
        ft.on_first_beacon_sent();
        assert_eq!(ft.state, FtState::Steady);
    }

    #[test]
    fn dissociation_stops_accepting_associations() {
        let mut ft = FtStateMachine::new();
        ft.begin_dissociation();
        assert!(!ft.accepts_new_associations());
    }
}
