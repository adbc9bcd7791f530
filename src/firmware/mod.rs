//! Firmware orchestration ("tpoint", §4.I): dispatch of PHY callbacks to state-specific handlers,
//! tying the codec/pool/scheduling/contact components to the external PHY and application.
//!
//! Grounded on `upper/tpoint_firmware/p2p/tfw_p2p_pt.hpp`: a firmware instance owns the HARQ pool,
//! MMIE pool, contact list, allocation and a state handle, and answers a small fixed set of
//! PHY-facing callbacks, each returning a batch of `tx_descriptor`s plus an updated wake request.

use crate::app::queue::{DatagramQueue, QueueConfig};
use crate::contact::{Contact, FtStateMachine, PtStateMachine};
use crate::harq::{Direction, HarqPoolConfig, HarqProcessPool};
use crate::identity::Identity;
use crate::mmie::association::{
    AssociationRequestMessage, AssociationResponseMessage, NofFlowsAccepted, RejectCause, RejectInfo,
};
use crate::mmie::pool::MmiePool;
use crate::sched::allocation::NO_OPPORTUNITY;
use crate::sched::{Direction as AllocDirection, FtAllocation, SampleTime64, TimerWheel};
use tracing::{info_span, warn};

/// Bound on how many contacts are granted a unicast TX opportunity per `work_irregular` call
/// (§4.G: "the FT's loop iterates over contacts up to `max_simultaneous_tx_unicast` times").
pub const MAX_SIMULTANEOUS_TX_UNICAST: usize = 4;

/// One-shot/periodic wake request a callback hands back to the dispatcher (§4.I, §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IrregularReport {
    pub call_asap_after_this_time_has_passed_64: SampleTime64,
}

/// Minimal stand-in for the PHY's `pcc_report`/`pdc_report` collaborators (§6): this crate does
/// not implement the PHY numerical kernel, so these carry only the fields firmware logic actually
/// branches on.
#[derive(Debug, Clone, Default)]
pub struct MaclowPhy {
    pub attempt_pdc_decode: bool,
    pub harq_process_idx: Option<usize>,
    pub rv: u8,
}

#[derive(Debug, Clone)]
pub struct MacHighPhy {
    pub crc_status: bool,
    pub decoded_mmies: Vec<crate::mac_pdu::DecodedMmie>,
}

/// A queued PHY transmission request (§6 `tx_descriptor`, narrowed to what firmware logic needs).
#[derive(Debug, Clone, Copy, Default)]
pub struct TxDescriptor {
    pub tx_order_id: u64,
    pub tx_time_64: SampleTime64,
    pub harq_process_idx: usize,
}

/// Ordered batch of descriptors plus the next requested wake, returned by every callback (§4.I:
/// "All callbacks return `MacHigh_Phy` batches").
#[derive(Debug, Clone, Default)]
pub struct TxBatch {
    pub descriptors: Vec<TxDescriptor>,
    pub next_irregular: IrregularReport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Ft,
    Pt,
}

/// Owns everything a single radio device's MAC instance needs across callbacks (§4.I). Not
/// `Sync`; per §5, only one PHY worker executes a given firmware's callbacks at a time.
pub struct Firmware {
    pub role: Role,
    pub identity: Identity,
    pub harq_tx: HarqProcessPool,
    pub harq_rx: HarqProcessPool,
    pub mmie_pool: MmiePool,
    pub contacts: Vec<Contact>,
    pub ft_allocation: Option<FtAllocation>,
    pub ft_state: FtStateMachine,
    pub pt_state: PtStateMachine,
    pub timer_wheel: TimerWheel,
    /// Datagrams decoded from `user_plane_data` MMIEs, pending delivery to the application bridge
    /// (§4.H Steady: "`user_plane_data` is queued to the application client").
    pub app_egress: DatagramQueue,
    /// Last TX power adjustment signalled by a peer's `power_target_ie` (§4.H Steady).
    pub tx_power_target_dbm: i32,
    /// System time signalled by a peer's `time_announce_ie`, used to seed the PPX rising edge
    /// (§4.H Steady).
    pub ppx_edge_system_time_us: Option<u32>,
    tx_order_id_next: u64,
}

impl Firmware {
    pub fn new(role: Role, identity: Identity, harq_config: HarqPoolConfig) -> Self {
        Firmware {
            role,
            identity,
            harq_tx: HarqProcessPool::new(Direction::Tx, harq_config),
            harq_rx: HarqProcessPool::new(Direction::Rx, harq_config),
            mmie_pool: MmiePool::new(),
            contacts: Vec::new(),
            ft_allocation: None,
            ft_state: FtStateMachine::new(),
            pt_state: PtStateMachine::default(),
            timer_wheel: TimerWheel::new(),
            app_egress: DatagramQueue::new(QueueConfig::default()),
            tx_power_target_dbm: 0,
            ppx_edge_system_time_us: None,
            tx_order_id_next: 0,
        }
    }

    fn next_tx_order_id(&mut self) -> u64 {
        let id = self.tx_order_id_next;
        self.tx_order_id_next += 1;
        id
    }

    /// One-shot: called when the PHY first becomes available. Establishes the FT beacon clock if
    /// this instance is an FT (§4.G: first full-second boundary after initial PHY availability).
    pub fn work_start_imminent(&mut self, start_time_64: SampleTime64, samp_rate: i64) -> IrregularReport {
        let _span = info_span!("work_start_imminent").entered();
        if self.role == Role::Ft {
            let first_full_second = ((start_time_64 / samp_rate) + 1) * samp_rate;
            self.ft_allocation = Some(FtAllocation::new(samp_rate, first_full_second));
        }
        self.next_irregular_report()
    }

    /// Periodic housekeeping (§4.I `work_regular`): currently limited to draining due timer-wheel
    /// callbacks, since PHY-level housekeeping is out of scope.
    pub fn work_regular(&mut self, now: SampleTime64) -> Vec<crate::sched::CallbackId> {
        self.timer_wheel.run(now)
    }

    /// Fires at the requested wake time; for an FT, emits a beacon descriptor when due and
    /// advances the beacon clock (§4.G).
    pub fn work_irregular(&mut self, now: SampleTime64) -> TxBatch {
        let _span = info_span!("work_irregular").entered();
        let mut batch = TxBatch::default();
        if self.role == Role::Ft {
            if let Some(ft_allocation) = &mut self.ft_allocation {
                if ft_allocation.due_and_advance(now) {
                    self.ft_state.on_first_beacon_sent();
                    let id = self.next_tx_order_id();
                    batch.descriptors.push(TxDescriptor {
                        tx_order_id: id,
                        tx_time_64: now,
                        harq_process_idx: 0,
                    });
                }
            }
            self.grant_unicast_opportunities(now, &mut batch);
        }
        batch.next_irregular = self.next_irregular_report();
        batch
    }

    /// Grants up to [`MAX_SIMULTANEOUS_TX_UNICAST`] contacts a unicast TX opportunity this call
    /// (§4.G Unicast scheduling), choosing the next PLCF feedback format for each granted contact
    /// from its `feedback_plan` (§4.H Steady).
    fn grant_unicast_opportunities(&mut self, now: SampleTime64, batch: &mut TxBatch) {
        let beacon_period_samples = match &self.ft_allocation {
            Some(a) => a.beacon_period_samples,
            None => return,
        };
        let n = self.contacts.len().min(MAX_SIMULTANEOUS_TX_UNICAST);
        for i in 0..n {
            let tx_time = self.contacts[i].allocation_pt.get_tx_opportunity(
                AllocDirection::Downlink,
                beacon_period_samples,
                now,
                now,
            );
            if tx_time == NO_OPPORTUNITY {
                continue;
            }
            self.contacts[i].feedback_plan.next_format();
            let id = self.next_tx_order_id();
            batch.descriptors.push(TxDescriptor {
                tx_order_id: id,
                tx_time_64: tx_time,
                harq_process_idx: 0,
            });
        }
    }

    fn next_irregular_report(&self) -> IrregularReport {
        const PREPARE_DURATION_SAMPLES: i64 = 480; // ~10us @ 48MHz, lead time for PHY prep
        let next = self
            .ft_allocation
            .as_ref()
            .map(|a| a.next_wake(PREPARE_DURATION_SAMPLES))
            .unwrap_or(i64::MAX);
        IrregularReport {
            call_asap_after_this_time_has_passed_64: next,
        }
    }

    /// PLCF decoded (§4.I `work_pcc`): decides whether to attempt a PDC decode and with which HARQ
    /// process.
    pub fn work_pcc(&mut self, key: crate::harq::ProcessKey, packet_sizes: crate::packet_sizes::PacketSizesDef) -> MaclowPhy {
        match self.harq_rx.acquire(key, packet_sizes, crate::harq::FinalizePolicy::ResetAndTerminate) {
            Some(_) => MaclowPhy {
                attempt_pdc_decode: true,
                harq_process_idx: Some(0),
                rv: 0,
            },
            None => {
                warn!("harq rx pool exhausted, skipping pdc decode");
                MaclowPhy::default()
            }
        }
    }

    /// PDC decoded successfully (§4.I `work_pdc`): dispatches each MMIE to state-specific handling.
    /// Unexpected/unknown MMIE types are skipped without aborting the remaining list (§4.H Steady).
    pub fn work_pdc(&mut self, report: &MacHighPhy) -> TxBatch {
        let _span = info_span!("work_pdc").entered();
        let mut batch = TxBatch::default();
        if !report.crc_status {
            warn!("pdc crc failed");
            return batch;
        }
        for mmie in &report.decoded_mmies {
            if let Some(descriptor) = self.handle_decoded_mmie(mmie) {
                batch.descriptors.push(descriptor);
            }
        }
        batch
    }

    pub fn work_pdc_error(&mut self) {
        warn!("pdc decode failed");
    }

    /// Dispatches one decoded MMIE to state-specific handling (§4.H Steady), returning a TX
    /// descriptor when the MMIE requires an immediate reply (e.g. an association response).
    fn handle_decoded_mmie(&mut self, mmie: &crate::mac_pdu::DecodedMmie) -> Option<TxDescriptor> {
        use crate::mac_pdu::DecodedMmie::*;
        match mmie {
            AssociationResponse(resp) => {
                self.pt_state.on_association_response(resp.accepted);
                None
            }
            ClusterBeacon(_) => {
                self.pt_state.on_beacon_received();
                None
            }
            AssociationRequest(req) => self.handle_association_request(req),
            PowerTarget(ie) => {
                self.tx_power_target_dbm = ie.target_dbm;
                None
            }
            TimeAnnounce(ie) => {
                self.ppx_edge_system_time_us = Some(ie.system_time_us);
                None
            }
            UserPlaneDataFlow1(ie) => self.queue_app_payload(&ie.payload.data),
            UserPlaneDataFlow2(ie) => self.queue_app_payload(&ie.payload.data),
            UserPlaneDataFlow3(ie) => self.queue_app_payload(&ie.payload.data),
            UserPlaneDataFlow4(ie) => self.queue_app_payload(&ie.payload.data),
            _ => None,
        }
    }

    fn queue_app_payload(&mut self, payload: &[u8]) -> Option<TxDescriptor> {
        if self.app_egress.write_nto(payload) == 0 && !payload.is_empty() {
            warn!("app egress queue full, dropping datagram");
        }
        None
    }

    /// FT side of the association handshake (§4.H FT state flow "Resource"): answers an
    /// `association_request` with an `association_response`, accepting iff the FT is still taking
    /// new associations.
    fn handle_association_request(&mut self, req: &AssociationRequestMessage) -> Option<TxDescriptor> {
        if self.role != Role::Ft {
            return None;
        }
        let accepted = self.ft_state.accepts_new_associations();
        let response = AssociationResponseMessage {
            accepted,
            reject_info: (!accepted).then_some(RejectInfo {
                reject_cause: RejectCause::RadioCapacityNotSufficient,
                reject_time_s: 0,
            }),
            harq_configuration: accepted.then_some(req.harq_configuration),
            nof_flows_accepted: if accepted { NofFlowsAccepted::AsRequested } else { NofFlowsAccepted::None },
            flow_ids: if accepted { req.flow_ids.clone() } else { Vec::new() },
            group_info: None,
            tx_power: false,
        };
        self.mmie_pool.association_response.push(response);
        let id = self.next_tx_order_id();
        Some(TxDescriptor {
            tx_order_id: id,
            tx_time_64: 0,
            harq_process_idx: 0,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::identity::Identity;

    fn id() -> Identity {
        Identity::new(100, 0x0000_01BC, 0x01BD).unwrap()
    }

    #[test]
    fn ft_emits_beacon_on_schedule() {
        let mut fw = Firmware::new(Role::Ft, id(), HarqPoolConfig::default());
        let samp_rate = 100_000;
        fw.work_start_imminent(0, samp_rate);
        let beacon_time = fw.ft_allocation.unwrap().beacon_time_scheduled;
        let batch = fw.work_irregular(beacon_time);
        assert_eq!(batch.descriptors.len(), 1);
        assert_eq!(fw.ft_state.state, crate::contact::FtState::Steady);
    }

    #[test]
    fn pt_ignores_unrelated_mmie_without_aborting() {
        let mut fw = Firmware::new(Role::Pt, id(), HarqPoolConfig::default());
        let report = MacHighPhy {
            crc_status: true,
            decoded_mmies: vec![crate::mac_pdu::DecodedMmie::RadioDeviceStatus(Default::default())],
        };
        let batch = fw.work_pdc(&report);
        assert!(batch.descriptors.is_empty());
        assert_eq!(fw.pt_state.state, crate::contact::PtState::Discover);
    }

    #[test]
    fn pt_power_target_updates_tx_agc() {
        let mut fw = Firmware::new(Role::Pt, id(), HarqPoolConfig::default());
        let report = MacHighPhy {
            crc_status: true,
            decoded_mmies: vec![crate::mac_pdu::DecodedMmie::PowerTarget(
                crate::mmie::extensions::PowerTargetIe { target_dbm: -7 },
            )],
        };
        fw.work_pdc(&report);
        assert_eq!(fw.tx_power_target_dbm, -7);
    }

    #[test]
    fn pt_time_announce_seeds_ppx_edge() {
        let mut fw = Firmware::new(Role::Pt, id(), HarqPoolConfig::default());
        let report = MacHighPhy {
            crc_status: true,
            decoded_mmies: vec![crate::mac_pdu::DecodedMmie::TimeAnnounce(
                crate::mmie::extensions::TimeAnnounceIe { system_time_us: 42 },
            )],
        };
        fw.work_pdc(&report);
        assert_eq!(fw.ppx_edge_system_time_us, Some(42));
    }

    #[test]
    fn pt_user_plane_data_is_queued_for_app() {
        let mut fw = Firmware::new(Role::Pt, id(), HarqPoolConfig::default());
        let mut flow = crate::mmie::signalling::UserPlaneDataFlow1::default();
        flow.payload.set_data_size(4);
        let report = MacHighPhy {
            crc_status: true,
            decoded_mmies: vec![crate::mac_pdu::DecodedMmie::UserPlaneDataFlow1(flow)],
        };
        fw.work_pdc(&report);
        assert_eq!(fw.app_egress.len(), 1);
    }

    #[test]
    fn ft_answers_association_request_when_accepting() {
        let mut fw = Firmware::new(Role::Ft, id(), HarqPoolConfig::default());
        let request = AssociationRequestMessage::default();
        let report = MacHighPhy {
            crc_status: true,
            decoded_mmies: vec![crate::mac_pdu::DecodedMmie::AssociationRequest(request)],
        };
        let batch = fw.work_pdc(&report);
        assert_eq!(batch.descriptors.len(), 1);
        assert_eq!(fw.mmie_pool.association_response.len(), 1);
        assert!(fw.mmie_pool.association_response[0].accepted);
    }

    #[test]
    fn ft_grants_unicast_opportunity_to_contact() {
        let mut fw = Firmware::new(Role::Ft, id(), HarqPoolConfig::default());
        fw.work_start_imminent(0, 100_000);
        let mut contact = Contact::new(id(), 0, 0);
        contact.allocation_pt.last_known_beacon_time = 0;
        contact.allocation_pt.downlink_offset_samples = 10;
        contact.feedback_plan = crate::contact::FeedbackPlan::new(vec![1, 2]);
        fw.contacts.push(contact);
        let batch = fw.work_irregular(5);
        assert_eq!(batch.descriptors.len(), 1);
        assert_eq!(batch.descriptors[0].tx_time_64, 10);
    }
}
