//! MMIE pool (§4.D): pre-allocated storage for every MMIE type a MAC PDU's mux header might
//! reference, so the decoder never allocates per-message. Grounded on `mmie_pool_tx.hpp`'s
//! per-type `std::vector` members and `set_nof_elements<T>`/`get<T>`; templated container access
//! has no direct Rust equivalent, so each type gets its own named field and a matching
//! `push_*`/`*_mut` accessor pair instead of a generic `get<T>`.

use super::association::{
    AssociationReleaseMessage, AssociationRequestMessage, AssociationResponseMessage,
    ReconfigurationRequestMessage, ReconfigurationResponseMessage,
};
use super::beacon::{ClusterBeaconMessage, NetworkBeaconMessage};
use super::extensions::{ForwardToIe, PowerTargetIe, TimeAnnounceIe};
use super::padding::PaddingIe;
use super::resource::{
    BroadcastIndicationIe, ConfigurationRequestIe, GroupAssignmentIe, LoadInfoIe,
    MeasurementReportIe, NeighbouringIe, RadioDeviceStatusIe, RandomAccessResourceIe,
    RdCapabilityIe, ResourceAllocationIe, RouteInfoIe, SecurityInfoIe,
};
use super::signalling::{
    HigherLayerSignallingFlow1, HigherLayerSignallingFlow2, UserPlaneDataFlow1, UserPlaneDataFlow2,
    UserPlaneDataFlow3, UserPlaneDataFlow4,
};

/// Declares one `Vec<$ty>` field per MMIE type plus a shared `clear()`, mirroring the source's
/// per-type `std::vector` members. Rust generics can't range over a heterogeneous type list the
/// way the source's `get<T>(i)` template does, so callers index the field for the type they want
/// directly (`pool.network_beacon[i]`) instead of through a generic accessor.
macro_rules! mmie_pool {
    ($( $field:ident : $ty:ty ),+ $(,)?) => {
        #[derive(Debug, Clone, Default)]
        pub struct MmiePool {
            $( pub $field: Vec<$ty> ),+
        }

        impl MmiePool {
            pub fn clear(&mut self) {
                $( self.$field.clear(); )+
            }
        }
    };
}

mmie_pool! {
    network_beacon: NetworkBeaconMessage,
    cluster_beacon: ClusterBeaconMessage,
    association_request: AssociationRequestMessage,
    association_response: AssociationResponseMessage,
    association_release: AssociationReleaseMessage,
    reconfiguration_request: ReconfigurationRequestMessage,
    reconfiguration_response: ReconfigurationResponseMessage,
    security_info: SecurityInfoIe,
    route_info: RouteInfoIe,
    resource_allocation: ResourceAllocationIe,
    random_access_resource: RandomAccessResourceIe,
    rd_capability: RdCapabilityIe,
    neighbouring: NeighbouringIe,
    broadcast_indication: BroadcastIndicationIe,
    group_assignment: GroupAssignmentIe,
    load_info: LoadInfoIe,
    measurement_report: MeasurementReportIe,
    configuration_request: ConfigurationRequestIe,
    radio_device_status: RadioDeviceStatusIe,
    power_target: PowerTargetIe,
    time_announce: TimeAnnounceIe,
    forward_to: ForwardToIe,
    higher_layer_signalling_flow_1: HigherLayerSignallingFlow1,
    higher_layer_signalling_flow_2: HigherLayerSignallingFlow2,
    user_plane_data_flow_1: UserPlaneDataFlow1,
    user_plane_data_flow_2: UserPlaneDataFlow2,
    user_plane_data_flow_3: UserPlaneDataFlow3,
    user_plane_data_flow_4: UserPlaneDataFlow4,
    padding: PaddingIe,
}

impl MmiePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocates `n` default-constructed elements of every MMIE type at once, matching the
    /// source's eager per-type `set_nof_elements` calls issued at startup.
    pub fn reserve_all(&mut self, n: usize) {
        self.network_beacon.reserve(n);
        self.cluster_beacon.reserve(n);
        self.association_request.reserve(n);
        self.association_response.reserve(n);
        self.association_release.reserve(n);
        self.reconfiguration_request.reserve(n);
        self.reconfiguration_response.reserve(n);
        self.security_info.reserve(n);
        self.route_info.reserve(n);
        self.resource_allocation.reserve(n);
        self.random_access_resource.reserve(n);
        self.rd_capability.reserve(n);
        self.neighbouring.reserve(n);
        self.broadcast_indication.reserve(n);
        self.group_assignment.reserve(n);
        self.load_info.reserve(n);
        self.measurement_report.reserve(n);
        self.configuration_request.reserve(n);
        self.radio_device_status.reserve(n);
        self.power_target.reserve(n);
        self.time_announce.reserve(n);
        self.forward_to.reserve(n);
        self.higher_layer_signalling_flow_1.reserve(n);
        self.higher_layer_signalling_flow_2.reserve(n);
        self.user_plane_data_flow_1.reserve(n);
        self.user_plane_data_flow_2.reserve(n);
        self.user_plane_data_flow_3.reserve(n);
        self.user_plane_data_flow_4.reserve(n);
        self.padding.reserve(n);
    }

    /// Fills `dst` with one or more padding IEs -- delegates to [`super::padding::fill_with_padding_ies`];
    /// kept here too since the source exposes padding fill-in as a pool-level operation.
    pub fn fill_with_padding_ies(&self, dst: &mut [u8], n_bytes: usize) {
        super::padding::fill_with_padding_ies(dst, n_bytes);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn pool_starts_empty_and_clears() {
        let mut pool = MmiePool::new();
        pool.network_beacon.push(NetworkBeaconMessage::default());
        pool.padding.push(PaddingIe::new(4));
        assert_eq!(pool.network_beacon.len(), 1);
        pool.clear();
        assert!(pool.network_beacon.is_empty());
        assert!(pool.padding.is_empty());
    }

    #[test]
    fn reserve_all_does_not_panic() {
        let mut pool = MmiePool::new();
        pool.reserve_all(16);
        assert!(pool.user_plane_data_flow_1.capacity() >= 16);
    }
}
