//! PLCF Type 2, Format 2 (10 bytes) -- project extension (not normative ETSI).
//!
//! Carries scheduling hints for the *next* packet instead of HARQ/feedback state: whether this
//! transmission is downlink, whether the receiver should forward it up despite a failed CRC (used
//! by the simulator to exercise soft-combining paths), and whether a follow-on packet is already
//! scheduled and what it looks like. Grounded in the header-format reservation the normative
//! formats leave open (`HeaderFormat` 2..7 are all project/future-use in Table 6.2.1-3).

use super::{dbm_to_tx_power_index, tx_power_index_to_dbm, Plcf, PlcfPrefix};
use crate::bitfield::{extract_bits, pack_lower, place_bits, unpack_lower};
use crate::identity::is_short_rd_id_valid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlcfType2Fmt2 {
    pub prefix: PlcfPrefix,
    pub short_network_id: u8,
    pub transmitter_identity: u16,
    pub receiver_identity: u16,
    pub transmit_power: u32,
    pub df_mcs: u32,
    pub dl: bool,
    pub forward_despite_crc_error: bool,
    pub next_scheduled_packet_stf: bool,
    pub next_scheduled_packet_has_plcf: bool,
}

impl PlcfType2Fmt2 {
    pub fn set_transmit_power_dbm(&mut self, dbm: i32) {
        self.transmit_power = dbm_to_tx_power_index(dbm);
    }

    pub fn transmit_power_dbm(&self) -> Option<i32> {
        tx_power_index_to_dbm(self.transmit_power)
    }
}

impl Plcf for PlcfType2Fmt2 {
    const PACKED_SIZE: usize = 10;
    const TYPE: u32 = 2;
    const HEADER_FORMAT: u32 = 2;

    fn is_valid(&self) -> bool {
        self.prefix.header_format == Self::HEADER_FORMAT
            && is_short_rd_id_valid(self.transmitter_identity)
            && is_short_rd_id_valid(self.receiver_identity)
            && self.transmit_power <= 15
            && self.df_mcs <= 11
    }

    fn pack(&self, dst: &mut [u8]) {
        dst[0] = self.prefix.pack();
        dst[1] = self.short_network_id;
        pack_lower(&mut dst[2..4], self.transmitter_identity as u32, 2);
        pack_lower(&mut dst[4..6], self.receiver_identity as u32, 2);
        dst[6] = ((self.transmit_power & 0xF) << 4) as u8 | (self.df_mcs & 0xF) as u8;
        dst[7] = place_bits(0, self.dl as u8, 7, 7);
        dst[7] = place_bits(dst[7], self.forward_despite_crc_error as u8, 6, 6);
        dst[7] = place_bits(dst[7], self.next_scheduled_packet_stf as u8, 5, 5);
        dst[7] = place_bits(dst[7], self.next_scheduled_packet_has_plcf as u8, 4, 4);
        dst[8] = 0;
        dst[9] = 0;
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
        self.dl = extract_bits(src[7], 7, 7) != 0;
        self.forward_despite_crc_error = extract_bits(src[7], 6, 6) != 0;
        self.next_scheduled_packet_stf = extract_bits(src[7], 5, 5) != 0;
        self.next_scheduled_packet_has_plcf = extract_bits(src[7], 4, 4) != 0;
        self.is_valid()
    }

    fn get_n_ss(&self) -> u32 {
        1
    }

    fn get_df_redundancy_version(&self) -> u32 {
        0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn sample() -> PlcfType2Fmt2 {
        let mut p = PlcfType2Fmt2 {
            prefix: PlcfPrefix {
                header_format: 2,
                packet_length_type: 1,
                packet_length_minus_one: 0,
            },
            short_network_id: 42,
            transmitter_identity: 0x1234,
            receiver_identity: 0x5678,
            transmit_power: 7,
            df_mcs: 9,
            dl: true,
            forward_despite_crc_error: false,
            next_scheduled_packet_stf: true,
            next_scheduled_packet_has_plcf: false,
        };
        p.prefix.set_packet_length(4);
        p
    }

    #[test]
    fn round_trip() {
        let p = sample();
        assert!(p.is_valid());
        let mut buf = [0u8; PlcfType2Fmt2::PACKED_SIZE];
        p.pack(&mut buf);
        let mut q = PlcfType2Fmt2::default();
        assert!(q.unpack(&buf));
        assert_eq!(p, q);
    }

    #[test]
    fn trailing_bytes_are_reserved_zero() {
        let p = sample();
        let mut buf = [0xFFu8; PlcfType2Fmt2::PACKED_SIZE];
        p.pack(&mut buf);
        assert_eq!(buf[8], 0);
        assert_eq!(buf[9], 0);
    }

    #[test]
    fn rejects_wrong_header_format() {
        let mut p = sample();
        p.prefix.header_format = 0;
        assert!(!p.is_valid());
    }
}
