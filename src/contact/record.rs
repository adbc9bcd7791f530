//! Per-peer contact record (§3 Contact).

use crate::identity::Identity;
use crate::mmie::association::FlowIdEntry;
use crate::sched::allocation::PtAllocation;

/// Last known receive quality for a contact, mirroring `sync_report`'s role in §6 (the PHY-facing
/// structure is out of scope; this is the subset the contact record retains across receptions).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SyncReport {
    pub snr_db: f32,
    pub fine_peak_time_64: i64,
}

/// Most recently reported MIMO channel-state info; kept opaque beyond a layer count since the PHY
/// numerical kernel that produces it is out of scope (§1 Non-goals).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MimoCsi {
    pub n_layers: u32,
}

/// Ordered list of feedback formats a contact cycles through on successive unicast PLCFs (§4.H:
/// "chooses a PLCF feedback format from the contact's `feedback_plan`, rotating through the list
/// in order").
#[derive(Debug, Clone, Default)]
pub struct FeedbackPlan {
    formats: Vec<u32>,
    next: usize,
}

impl FeedbackPlan {
    pub fn new(formats: Vec<u32>) -> Self {
        FeedbackPlan { formats, next: 0 }
    }

    /// Returns the next feedback format to use, rotating back to the start after the last one.
    pub fn next_format(&mut self) -> Option<u32> {
        if self.formats.is_empty() {
            return None;
        }
        let format = self.formats[self.next];
        self.next = (self.next + 1) % self.formats.len();
        Some(format)
    }
}

/// Per-peer record (§3): identity, allocation, sync/CSI state, application-bridge connection
/// indices, and a feedback plan.
#[derive(Debug, Clone)]
pub struct Contact {
    pub identity: Identity,
    pub allocation_pt: PtAllocation,
    pub sync_report: SyncReport,
    pub mimo_csi: MimoCsi,
    pub connection_idx_rx: u32,
    pub connection_idx_tx: u32,
    pub feedback_plan: FeedbackPlan,
    pub flow_ids: Vec<FlowIdEntry>,
    pub missed_beacon_count: u32,
}

impl Contact {
    pub fn new(identity: Identity, connection_idx_rx: u32, connection_idx_tx: u32) -> Self {
        Contact {
            identity,
            allocation_pt: PtAllocation::default(),
            sync_report: SyncReport::default(),
            mimo_csi: MimoCsi::default(),
            connection_idx_rx,
            connection_idx_tx,
            feedback_plan: FeedbackPlan::default(),
            flow_ids: Vec::new(),
            missed_beacon_count: 0,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn feedback_plan_rotates() {
        let mut plan = FeedbackPlan::new(vec![1, 2, 3]);
        assert_eq!(plan.next_format(), Some(1));
        assert_eq!(plan.next_format(), Some(2));
        assert_eq!(plan.next_format(), Some(3));
        assert_eq!(plan.next_format(), Some(1));
    }

    #[test]
    fn empty_plan_yields_none() {
        let mut plan = FeedbackPlan::default();
        assert_eq!(plan.next_format(), None);
    }
}
