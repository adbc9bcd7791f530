//! Flowing MMIEs (§4.D): opaque variable-length payloads exposed to the application bridge
//! with zero-copy semantics. Grounded on `mmie.hpp`'s `mmie_flowing_t` (`set_flow_id`,
//! `set_data_size`/`get_data_ptr`) and Table 6.3.4-2's flow IDs.

use super::{Flowing, IeTypeExt00_01_10, MmieEnvelope, MuxHeaderTemplate};

/// Table 6.3.4-2's `flow_id_t`, restricted to the values this crate's flowing MMIEs can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowId {
    HigherLayerSignallingFlow1,
    HigherLayerSignallingFlow2,
    UserPlaneDataFlow1,
    UserPlaneDataFlow2,
    UserPlaneDataFlow3,
    UserPlaneDataFlow4,
}

impl FlowId {
    fn ie_type(self) -> IeTypeExt00_01_10 {
        match self {
            FlowId::HigherLayerSignallingFlow1 => IeTypeExt00_01_10::HigherLayerSignallingFlow1,
            FlowId::HigherLayerSignallingFlow2 => IeTypeExt00_01_10::HigherLayerSignallingFlow2,
            FlowId::UserPlaneDataFlow1 => IeTypeExt00_01_10::UserPlaneDataFlow1,
            FlowId::UserPlaneDataFlow2 => IeTypeExt00_01_10::UserPlaneDataFlow2,
            FlowId::UserPlaneDataFlow3 => IeTypeExt00_01_10::UserPlaneDataFlow3,
            FlowId::UserPlaneDataFlow4 => IeTypeExt00_01_10::UserPlaneDataFlow4,
        }
    }
}

/// A flowing payload holder. On TX, `data` is populated by the caller before `pack_mmh_sdu`;
/// on RX, the decoder stashes a byte range here without copying (see [`crate::mac_pdu::decoder`]).
#[derive(Debug, Clone, Default)]
pub struct FlowingPayload {
    pub data: Vec<u8>,
}

impl FlowingPayload {
    pub fn set_data_size(&mut self, n_bytes: usize) {
        self.data.resize(n_bytes, 0);
    }
}

macro_rules! flowing_mmie {
    ($name:ident, $flow_id:expr) => {
        #[derive(Debug, Clone, Default)]
        pub struct $name {
            pub payload: FlowingPayload,
        }

        impl MmieEnvelope for $name {
            fn mux_header_template(&self) -> MuxHeaderTemplate {
                MuxHeaderTemplate::variable($flow_id.ie_type())
            }

            fn packed_size_of_sdu(&self) -> usize {
                self.payload.data.len()
            }
        }

        impl Flowing for $name {
            fn flow_id(&self) -> FlowId {
                $flow_id
            }

            fn set_flow_id(&mut self, flow_id: FlowId) {
                debug_assert_eq!(flow_id, $flow_id, "flow id is fixed per MMIE type");
            }

            fn data_len(&self) -> usize {
                self.payload.data.len()
            }
        }
    };
}

flowing_mmie!(HigherLayerSignallingFlow1, FlowId::HigherLayerSignallingFlow1);
flowing_mmie!(HigherLayerSignallingFlow2, FlowId::HigherLayerSignallingFlow2);
flowing_mmie!(UserPlaneDataFlow1, FlowId::UserPlaneDataFlow1);
flowing_mmie!(UserPlaneDataFlow2, FlowId::UserPlaneDataFlow2);
flowing_mmie!(UserPlaneDataFlow3, FlowId::UserPlaneDataFlow3);
flowing_mmie!(UserPlaneDataFlow4, FlowId::UserPlaneDataFlow4);

/// Umbrella over the two higher-layer-signalling flows, used where the caller only cares that
/// the MMIE is signalling, not which flow.
#[derive(Debug, Clone)]
pub enum HigherLayerSignalling {
    Flow1(HigherLayerSignallingFlow1),
    Flow2(HigherLayerSignallingFlow2),
}

/// Umbrella over the four user-plane-data flows.
#[derive(Debug, Clone)]
pub enum UserPlaneData {
    Flow1(UserPlaneDataFlow1),
    Flow2(UserPlaneDataFlow2),
    Flow3(UserPlaneDataFlow3),
    Flow4(UserPlaneDataFlow4),
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn packed_size_tracks_payload() {
        let mut ie = UserPlaneDataFlow1::default();
        ie.payload.set_data_size(42);
        assert_eq!(ie.packed_size_of_sdu(), 42);
        assert_eq!(ie.flow_id(), FlowId::UserPlaneDataFlow1);
    }

    #[test]
    fn mmh_sdu_size_picks_byte_length_form_under_256() {
        let mut ie = HigherLayerSignallingFlow2::default();
        ie.payload.set_data_size(10);
        assert_eq!(ie.packed_size_of_mmh_sdu(), 2 + 10);
    }

    #[test]
    fn mmh_sdu_size_picks_short_length_form_over_255() {
        let mut ie = UserPlaneDataFlow3::default();
        ie.payload.set_data_size(300);
        assert_eq!(ie.packed_size_of_mmh_sdu(), 3 + 300);
    }
}
