//! PLCF Type 2, Format 1 (10 bytes) -- ETSI TS 103 636-4 §6.2.1, Table 6.2.1-2b.
//!
//! Identical to [`super::PlcfType2Fmt0`] except the HARQ triplet (redundancy version, new-data
//! indicator, process number) is replaced by a 6-bit reserved field: used for transmissions that
//! carry no retransmittable data, e.g. pure feedback or RD-broadcast data.

use super::feedback_info::{pack_12bit, unpack_12bit, FeedbackFormat, FeedbackInfoPool};
use super::{
    coded_to_spatial_streams, dbm_to_tx_power_index, spatial_streams_to_coded,
    tx_power_index_to_dbm, Plcf, PlcfPrefix,
};
use crate::bitfield::{extract_bits, pack_lower, place_bits, unpack_lower};
use crate::enumeration::CodedEnum;
use crate::identity::is_short_rd_id_valid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlcfType2Fmt1 {
    pub prefix: PlcfPrefix,
    pub short_network_id: u8,
    pub transmitter_identity: u16,
    pub receiver_identity: u16,
    pub transmit_power: u32,
    pub df_mcs: u32,
    pub number_of_spatial_streams: u32,
    pub reserved: u32,
    pub feedback_format: FeedbackFormat,
    pub feedback_info_pool: FeedbackInfoPool,
}

impl PlcfType2Fmt1 {
    pub fn set_transmit_power_dbm(&mut self, dbm: i32) {
        self.transmit_power = dbm_to_tx_power_index(dbm);
    }

    pub fn transmit_power_dbm(&self) -> Option<i32> {
        tx_power_index_to_dbm(self.transmit_power)
    }

    pub fn set_number_of_spatial_streams(&mut self, n_ss: u32) {
        self.number_of_spatial_streams = spatial_streams_to_coded(n_ss).unwrap_or(0);
    }
}

impl Plcf for PlcfType2Fmt1 {
    const PACKED_SIZE: usize = 10;
    const TYPE: u32 = 2;
    const HEADER_FORMAT: u32 = 1;

    fn is_valid(&self) -> bool {
        self.prefix.header_format == Self::HEADER_FORMAT
            && is_short_rd_id_valid(self.transmitter_identity)
            && is_short_rd_id_valid(self.receiver_identity)
            && self.transmit_power <= 15
            && self.df_mcs <= 11
            && self.reserved == 0
            && (self.feedback_format.is_valid() || self.feedback_format == FeedbackFormat::NoFeedback)
    }

    fn pack(&self, dst: &mut [u8]) {
        dst[0] = self.prefix.pack();
        dst[1] = self.short_network_id;
        pack_lower(&mut dst[2..4], self.transmitter_identity as u32, 2);
        pack_lower(&mut dst[4..6], self.receiver_identity as u32, 2);
        dst[6] = ((self.transmit_power & 0xF) << 4) as u8 | (self.df_mcs & 0xF) as u8;
        dst[7] = place_bits(0, self.number_of_spatial_streams as u8, 7, 6);
        dst[7] = place_bits(dst[7], 0, 5, 0);
        let format_code = self.feedback_format.to_coded_value().unwrap_or(0) as u8;
        dst[8] = format_code << 4;
        pack_12bit(
            &mut dst[8..10],
            self.feedback_info_pool.pack(self.feedback_format),
        );
    }

    fn unpack(&mut self, src: &[u8]) -> bool {
        if src.len() < Self::PACKED_SIZE {
            return false;
        }
        self.prefix = PlcfPrefix::unpack(src[0]);
        self.short_network_id = src[1];
        self.transmitter_identity = unpack_lower(&src[2..4], 2) as u16;
        self.receiver_identity = unpack_lower(&src[4..6], 2) as u16;
        self.transmit_power = (src[6] >> 4) as u32;
        self.df_mcs = (src[6] & 0xF) as u32;
        self.number_of_spatial_streams = extract_bits(src[7], 7, 6) as u32;
        self.reserved = extract_bits(src[7], 5, 0) as u32;
        self.feedback_format = FeedbackFormat::from_coded_value(extract_bits(src[8], 7, 4) as u32);
        let info = unpack_12bit(&src[8..10]);
        if !self.feedback_info_pool.unpack(self.feedback_format, info) {
            return false;
        }
        self.is_valid()
    }

    fn get_n_ss(&self) -> u32 {
        coded_to_spatial_streams(self.number_of_spatial_streams)
    }

    fn get_df_redundancy_version(&self) -> u32 {
        0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn sample() -> PlcfType2Fmt1 {
        let mut p = PlcfType2Fmt1 {
            prefix: PlcfPrefix {
                header_format: 1,
                packet_length_type: 0,
                packet_length_minus_one: 0,
            },
            short_network_id: 7,
            transmitter_identity: 0x0457,
            receiver_identity: 0xFFFE,
            transmit_power: 3,
            df_mcs: 4,
            number_of_spatial_streams: 0b01,
            reserved: 0,
            feedback_format: FeedbackFormat::NoFeedback,
            feedback_info_pool: FeedbackInfoPool::default(),
        };
        p.prefix.set_packet_length(1);
        p
    }

    #[test]
    fn round_trip() {
        let p = sample();
        assert!(p.is_valid());
        let mut buf = [0u8; PlcfType2Fmt1::PACKED_SIZE];
        p.pack(&mut buf);
        let mut q = PlcfType2Fmt1::default();
        assert!(q.unpack(&buf));
        assert_eq!(p, q);
    }

    #[test]
    fn rejects_nonzero_reserved() {
        let mut p = sample();
        p.reserved = 1;
        assert!(!p.is_valid());
    }

    #[test]
    fn header_format_is_one() {
        assert_eq!(PlcfType2Fmt1::HEADER_FORMAT, 1);
    }
}
