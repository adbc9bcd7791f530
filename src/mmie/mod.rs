/*! MAC message / information element (MMIE) codec and pool (§4.D).

Every MMIE falls into exactly one of three families -- packing (fixed/self-defined length),
packing-peeking (length derived from a content prefix) and flowing (opaque variable-length
payload). The source models these as three parallel class hierarchies; here they are one
[`Mmie`] tagged union, with [`Packing`]/[`PackingPeeking`] dispatched by `match` rather than
virtual calls. Every variant still carries its own [`MuxHeaderTemplate`], matching the source's
`mac_mux_header` member on the common base.
*/

pub mod association;
pub mod beacon;
pub mod extensions;
pub mod padding;
pub mod pool;
pub mod resource;
pub mod signalling;

use crate::coded_enum;
use crate::mac_pdu::mux_header::{MuxHeader, MuxLength};

pub use association::{
    AssociationReleaseMessage, AssociationRequestMessage, AssociationResponseMessage,
    ReconfigurationRequestMessage, ReconfigurationResponseMessage,
};
pub use beacon::{ClusterBeaconMessage, NetworkBeaconMessage};
pub use extensions::{ForwardToIe, PowerTargetIe, TimeAnnounceIe};
pub use padding::PaddingIe;
pub use pool::MmiePool;
pub use resource::{
    BroadcastIndicationIe, ConfigurationRequestIe, GroupAssignmentIe, LoadInfoIe,
    MeasurementReportIe, NeighbouringIe, RadioDeviceStatusIe, RandomAccessResourceIe,
    RdCapabilityIe, ResourceAllocationIe, RouteInfoIe, SecurityInfoIe,
};
pub use signalling::{FlowId, HigherLayerSignalling, UserPlaneData};

/// Table 6.3.4-2: IE type field for `mac_ext` in {00, 01, 10}.
coded_enum! {
    pub enum IeTypeExt00_01_10 {
        PaddingIe = 0b0,
        HigherLayerSignallingFlow1 = 0b1,
        HigherLayerSignallingFlow2 = 0b10,
        UserPlaneDataFlow1 = 0b11,
        UserPlaneDataFlow2 = 0b100,
        UserPlaneDataFlow3 = 0b101,
        UserPlaneDataFlow4 = 0b110,
        NetworkBeaconMessage = 0b1000,
        ClusterBeaconMessage = 0b1001,
        AssociationRequestMessage = 0b1010,
        AssociationResponseMessage = 0b1011,
        AssociationReleaseMessage = 0b1100,
        ReconfigurationRequestMessage = 0b1101,
        ReconfigurationResponseMessage = 0b1110,
        AdditionalMacMessages = 0b1111,
        SecurityInfoIe = 0b10000,
        RouteInfoIe = 0b10001,
        ResourceAllocationIe = 0b10010,
        RandomAccessResourceIe = 0b10011,
        RdCapabilityIe = 0b10100,
        NeighbouringIe = 0b10101,
        BroadcastIndicationIe = 0b10110,
        GroupAssignmentIe = 0b10111,
        LoadInfoIe = 0b11000,
        MeasurementReportIe = 0b11001,
        PowerTargetIe = 0b11101,
        TimeAnnounceIe = 0b11110,
        Escape = 0b111110,
        IeTypeExtension = 0b111111,
    }
}

/// Table 6.3.4-3: IE type field for `mac_ext == 11`, 0-byte payload.
coded_enum! {
    pub enum IeTypeExt11Len0 {
        PaddingIe = 0b0,
        ConfigurationRequestIe = 0b1,
        MacSecurityInfoIe = 0b10000,
        Escape = 0b11110,
    }
}

/// Table 6.3.4-4: IE type field for `mac_ext == 11`, 1-byte payload.
coded_enum! {
    pub enum IeTypeExt11Len1 {
        PaddingIe = 0b0,
        RadioDeviceStatusIe = 0b1,
        Escape = 0b11110,
    }
}

/// Whether a variant's body length is implicit (fixed or content-peekable) or must be declared
/// in the multiplexing header's length field. Packing/packing-peeking variants are always
/// `Fixed`; flowing variants are always `Variable` (§4.D invariant: packing-peeking never uses
/// `mac_ext == 01`, so `Fixed` only ever packs as `00`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MuxLengthKind {
    Fixed,
    Variable,
    ShortFormLen0,
    ShortFormLen1,
}

/// The multiplexing-header shape a variant is constructed with (§4.D: "declares a multiplexing
/// header template at construction time"). Concrete length is filled in at pack time from the
/// body's actual size; this template only fixes `ie_type` and which length encoding applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MuxHeaderTemplate {
    ie_type: u32,
    kind: MuxLengthKind,
}

impl MuxHeaderTemplate {
    /// A packing or packing-peeking variant whose length is implicit (`mac_ext == 00`).
    pub const fn fixed(ie_type: IeTypeExt00_01_10) -> Self {
        MuxHeaderTemplate {
            ie_type: ie_type as u32,
            kind: MuxLengthKind::Fixed,
        }
    }

    /// A flowing variant whose length must be declared (`mac_ext == 01` or `10`, chosen by
    /// actual body size at pack time).
    pub const fn variable(ie_type: IeTypeExt00_01_10) -> Self {
        MuxHeaderTemplate {
            ie_type: ie_type as u32,
            kind: MuxLengthKind::Variable,
        }
    }

    pub const fn ext_11_len_0(ie_type: IeTypeExt11Len0) -> Self {
        MuxHeaderTemplate {
            ie_type: ie_type as u32,
            kind: MuxLengthKind::ShortFormLen0,
        }
    }

    pub const fn ext_11_len_1(ie_type: IeTypeExt11Len1) -> Self {
        MuxHeaderTemplate {
            ie_type: ie_type as u32,
            kind: MuxLengthKind::ShortFormLen1,
        }
    }

    /// Builds the full header for a body of `body_len` bytes, picking the narrowest `mac_ext`
    /// length encoding the template allows.
    fn header_for_body_len(&self, body_len: usize) -> MuxHeader {
        match self.kind {
            MuxLengthKind::Fixed => MuxHeader::implicit(self.ie_type),
            MuxLengthKind::Variable if body_len <= u8::MAX as usize => {
                MuxHeader::with_byte_len(self.ie_type, body_len as u8)
            }
            MuxLengthKind::Variable => MuxHeader::with_short_len(self.ie_type, body_len as u16),
            MuxLengthKind::ShortFormLen0 | MuxLengthKind::ShortFormLen1 => {
                MuxHeader::short_form(self.ie_type, body_len != 0)
            }
        }
    }
}

/// Operations common to every MMIE regardless of family (§4.D).
pub trait MmieEnvelope {
    fn mux_header_template(&self) -> MuxHeaderTemplate;
    fn packed_size_of_sdu(&self) -> usize;

    fn packed_size_of_mmh_sdu(&self) -> usize {
        let header = self
            .mux_header_template()
            .header_for_body_len(self.packed_size_of_sdu());
        header.packed_size() + self.packed_size_of_sdu()
    }
}

/// Fixed/self-defined length MMIEs: validity and bit-exact (un)packing of the body only (the
/// multiplexing header is handled by [`MmieEnvelope`]).
pub trait Packing: MmieEnvelope {
    fn is_valid(&self) -> bool;
    fn pack(&self, dst: &mut [u8]);
    fn unpack(&mut self, src: &[u8]) -> bool;

    fn pack_mmh_sdu(&self, dst: &mut [u8]) {
        let header = self
            .mux_header_template()
            .header_for_body_len(self.packed_size_of_sdu());
        header.pack(dst);
        self.pack(&mut dst[header.packed_size()..]);
    }
}

/// Peeking error kinds (§4.D), returned by [`PackingPeeking::packed_size_by_peeking`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeekError {
    NonreservedSetToReserved,
    NonreservedSetToUnsupported,
    ReservedFieldNotZero,
}

/// MMIEs whose body length can be inferred from a short content prefix, without a multiplexing
/// header length field (§4.D invariant: these never use `mac_ext == 01`).
pub trait PackingPeeking: Packing {
    const PACKED_SIZE_MIN_TO_PEEK: usize;
    fn packed_size_by_peeking(src: &[u8]) -> Result<usize, PeekError>;
}

/// Variable-length opaque-payload MMIEs (user data, signalling): the multiplexing header's
/// length field is authoritative, and the body is exposed to callers without copying.
pub trait Flowing: MmieEnvelope {
    fn flow_id(&self) -> FlowId;
    fn set_flow_id(&mut self, flow_id: FlowId);
    fn data_len(&self) -> usize;
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ie_type_codes_match_standard_tables() {
        assert_eq!(IeTypeExt00_01_10::PaddingIe as u32, 0);
        assert_eq!(IeTypeExt00_01_10::NetworkBeaconMessage as u32, 0b1000);
        assert_eq!(IeTypeExt00_01_10::Escape as u32, 0b111110);
        assert_eq!(IeTypeExt11Len0::ConfigurationRequestIe as u32, 0b1);
        assert_eq!(IeTypeExt11Len1::RadioDeviceStatusIe as u32, 0b1);
    }

    #[test]
    fn header_for_body_len_picks_narrowest_encoding() {
        let tmpl = MuxHeaderTemplate::variable(IeTypeExt00_01_10::UserPlaneDataFlow1);
        assert_eq!(
            tmpl.header_for_body_len(10).length,
            MuxLength::Byte(10)
        );
        assert_eq!(
            tmpl.header_for_body_len(300).length,
            MuxLength::Short(300)
        );

        let fixed = MuxHeaderTemplate::fixed(IeTypeExt00_01_10::NetworkBeaconMessage);
        assert_eq!(fixed.header_for_body_len(9).length, MuxLength::Implicit);
    }
}
