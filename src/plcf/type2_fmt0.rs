//! PLCF Type 2, Format 0 (10 bytes) -- ETSI TS 103 636-4 §6.2.1, Table 6.2.1-2a.
//!
//! Adds a receiver identity, spatial-stream count, HARQ fields (redundancy version, new-data
//! indicator, process number) and a PLCF-carried feedback report over [`super::PlcfType1Fmt0`].

use super::feedback_info::{pack_12bit, unpack_12bit, FeedbackFormat, FeedbackInfoPool};
use super::{
    coded_to_spatial_streams, dbm_to_tx_power_index, spatial_streams_to_coded,
    tx_power_index_to_dbm, Plcf, PlcfPrefix,
};
use crate::bitfield::{extract_bits, pack_lower, place_bits, unpack_lower};
use crate::enumeration::CodedEnum;
use crate::identity::is_short_rd_id_valid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlcfType2Fmt0 {
    pub prefix: PlcfPrefix,
    pub short_network_id: u8,
    pub transmitter_identity: u16,
    pub receiver_identity: u16,
    pub transmit_power: u32,
    pub df_mcs: u32,
    pub number_of_spatial_streams: u32,
    pub df_redundancy_version: u32,
    pub df_new_data_indication: u32,
    pub df_harq_process_number: u32,
    pub feedback_format: FeedbackFormat,
    pub feedback_info_pool: FeedbackInfoPool,
}

impl PlcfType2Fmt0 {
    pub fn set_transmit_power_dbm(&mut self, dbm: i32) {
        self.transmit_power = dbm_to_tx_power_index(dbm);
    }

    pub fn transmit_power_dbm(&self) -> Option<i32> {
        tx_power_index_to_dbm(self.transmit_power)
    }

    /// See open question in SPEC_FULL.md: when the device has >4 antennas but only one stream is
    /// active, the smallest encoding (00, i.e. N_SS=1) is used.
    pub fn set_number_of_spatial_streams(&mut self, n_ss: u32) {
        self.number_of_spatial_streams = spatial_streams_to_coded(n_ss).unwrap_or(0);
    }
}

impl Plcf for PlcfType2Fmt0 {
    const PACKED_SIZE: usize = 10;
    const TYPE: u32 = 2;
    const HEADER_FORMAT: u32 = 0;

    fn is_valid(&self) -> bool {
        self.prefix.header_format == Self::HEADER_FORMAT
            && is_short_rd_id_valid(self.transmitter_identity)
            && is_short_rd_id_valid(self.receiver_identity)
            && self.transmit_power <= 15
            && self.df_mcs <= 11
            && self.df_redundancy_version <= 3
            && self.df_new_data_indication <= 1
            && self.df_harq_process_number <= 7
            && (self.feedback_format.is_valid() || self.feedback_format == FeedbackFormat::NoFeedback)
    }

    fn pack(&self, dst: &mut [u8]) {
        dst[0] = self.prefix.pack();
        dst[1] = self.short_network_id;
        pack_lower(&mut dst[2..4], self.transmitter_identity as u32, 2);
        pack_lower(&mut dst[4..6], self.receiver_identity as u32, 2);
        dst[6] = ((self.transmit_power & 0xF) << 4) as u8 | (self.df_mcs & 0xF) as u8;
        dst[7] = place_bits(0, self.number_of_spatial_streams as u8, 7, 6);
        dst[7] = place_bits(dst[7], self.df_redundancy_version as u8, 5, 4);
        dst[7] = place_bits(dst[7], self.df_new_data_indication as u8, 3, 3);
        dst[7] = place_bits(dst[7], self.df_harq_process_number as u8, 2, 0);
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
        self.df_redundancy_version = extract_bits(src[7], 5, 4) as u32;
        self.df_new_data_indication = extract_bits(src[7], 3, 3) as u32;
        self.df_harq_process_number = extract_bits(src[7], 2, 0) as u32;
        self.feedback_format = FeedbackFormat::from_coded_value(extract_bits(src[8], 7, 4) as u32);
        let info = unpack_12bit(&src[8..10]);
        if !self
            .feedback_info_pool
            .unpack(self.feedback_format, info)
        {
            return false;
        }
        self.is_valid() && self.prefix.header_format == Self::HEADER_FORMAT
    }

    fn get_n_ss(&self) -> u32 {
        coded_to_spatial_streams(self.number_of_spatial_streams)
    }

    fn get_df_redundancy_version(&self) -> u32 {
        self.df_redundancy_version
    }
}
