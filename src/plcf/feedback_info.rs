/*! Feedback-info pool (§3 Data model, "Feedback-info pool").

A 12-bit field, interpreted per `FeedbackFormat` 1..6 as one of six entirely different bit
layouts. Every sub-variant packs into the same 12 bits regardless of which fields it carries,
so the pool holds one pre-constructed instance of each and the caller picks which to (un)pack by
`FeedbackFormat`, mirroring how [`crate::mmie::pool`] holds one instance per MMIE variant.

CQI/MCS convention: `CQI = MCS + 1`, with `CQI == 0` meaning "out of range" (`MCS == -1`).
*/

use crate::bitfield::{extract_bits, place_bits};
use crate::coded_enum;
use crate::enumeration::CodedEnum;

coded_enum! {
    pub enum FeedbackFormat {
        NoFeedback = 0,
        F1 = 1,
        F2 = 2,
        F3 = 3,
        F4 = 4,
        F5 = 5,
        F6 = 6,
    }
}

coded_enum! {
    pub enum TransmissionFeedback {
        Nack = 0,
        Ack = 1,
    }
}

coded_enum! {
    pub enum MimoFeedback {
        SingleLayer = 0,
        DualLayer = 1,
        FourLayer = 2,
        Reserved = 3,
    }
}

/// Buffer-status lower bound per bucket, Table-equivalent of `buffer_status_2_buffer_size_lower`.
const BUFFER_STATUS_LOWER: [u32; 16] = [
    0, 0, 16, 32, 64, 128, 256, 512, 1024, 2048, 4096, 8192, 16384, 32768, 65536, 131072,
];

/// Quantizes a byte count into one of 16 log2 buckets (Buffer Status field), mirroring the
/// source's `buffer_size_2_buffer_status()` if-else chain: bucket `i`'s range is
/// `(BUFFER_STATUS_LOWER[i], BUFFER_STATUS_LOWER[i+1]]` for `i` in `1..=14`, bucket 0 is exactly
/// 0, and bucket 15 is everything above 131072.
pub fn buffer_size_to_status(buffer_size: u32) -> u32 {
    match buffer_size {
        0 => 0,
        1..=16 => 1,
        17..=32 => 2,
        33..=64 => 3,
        65..=128 => 4,
        129..=256 => 5,
        257..=512 => 6,
        513..=1024 => 7,
        1025..=2048 => 8,
        2049..=4096 => 9,
        4097..=8192 => 10,
        8193..=16384 => 11,
        16385..=32768 => 12,
        32769..=65536 => 13,
        65537..=131072 => 14,
        _ => 15,
    }
}

/// Expands a Buffer Status bucket back to its lower-bound byte count.
pub fn status_to_buffer_size(status: u32) -> u32 {
    BUFFER_STATUS_LOWER[status.min(15) as usize]
}

/// `CQI == 0` means out of range (`MCS == -1`); otherwise `CQI = MCS + 1`.
pub fn mcs_to_cqi(mcs: i32) -> u32 {
    if mcs < 0 {
        0
    } else {
        (mcs + 1) as u32
    }
}

pub fn cqi_to_mcs(cqi: u32) -> i32 {
    if cqi == 0 {
        -1
    } else {
        cqi as i32 - 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeedbackInfoF1 {
    pub harq_process_number: u32,
    pub transmission_feedback: TransmissionFeedback,
    pub buffer_size: u32,
    pub mcs: i32,
}

impl Default for FeedbackFormat {
    fn default() -> Self {
        FeedbackFormat::NoFeedback
    }
}
impl Default for TransmissionFeedback {
    fn default() -> Self {
        TransmissionFeedback::Nack
    }
}
impl Default for MimoFeedback {
    fn default() -> Self {
        MimoFeedback::SingleLayer
    }
}

impl FeedbackInfoF1 {
    pub fn is_valid(&self) -> bool {
        self.harq_process_number <= 7 && self.transmission_feedback.is_valid()
    }

    pub fn pack(&self) -> u16 {
        let mut v = 0u16;
        v |= (self.harq_process_number as u16 & 0x7) << 9;
        v |= (self.transmission_feedback as u16 & 0x1) << 8;
        v |= (buffer_size_to_status(self.buffer_size) as u16 & 0xF) << 4;
        v |= (mcs_to_cqi(self.mcs) as u16 & 0xF) << 0;
        v
    }

    pub fn unpack(v: u16) -> Self {
        FeedbackInfoF1 {
            harq_process_number: ((v >> 9) & 0x7) as u32,
            transmission_feedback: TransmissionFeedback::from_coded_value(((v >> 8) & 0x1) as u32),
            buffer_size: status_to_buffer_size(((v >> 4) & 0xF) as u32),
            mcs: cqi_to_mcs((v & 0xF) as u32),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeedbackInfoF2 {
    pub codebook_index: u32,
    pub mimo_feedback: MimoFeedback,
    pub buffer_size: u32,
    pub mcs: i32,
}

impl FeedbackInfoF2 {
    pub fn is_valid(&self) -> bool {
        self.codebook_index <= 0b11 && self.mimo_feedback.is_valid()
    }

    pub fn pack(&self) -> u16 {
        let mut v = 0u16;
        v |= (self.codebook_index as u16 & 0x3) << 10;
        v |= (self.mimo_feedback as u16 & 0x3) << 8;
        v |= (buffer_size_to_status(self.buffer_size) as u16 & 0xF) << 4;
        v |= mcs_to_cqi(self.mcs) as u16 & 0xF;
        v
    }

    pub fn unpack(v: u16) -> Self {
        FeedbackInfoF2 {
            codebook_index: ((v >> 10) & 0x3) as u32,
            mimo_feedback: MimoFeedback::from_coded_value(((v >> 8) & 0x3) as u32),
            buffer_size: status_to_buffer_size(((v >> 4) & 0xF) as u32),
            mcs: cqi_to_mcs((v & 0xF) as u32),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeedbackInfoF3 {
    pub harq_process_number_0: u32,
    pub transmission_feedback_0: TransmissionFeedback,
    pub harq_process_number_1: u32,
    pub transmission_feedback_1: TransmissionFeedback,
    pub mcs: i32,
}

impl FeedbackInfoF3 {
    pub fn is_valid(&self) -> bool {
        self.harq_process_number_0 <= 7
            && self.harq_process_number_1 <= 7
            && self.transmission_feedback_0.is_valid()
            && self.transmission_feedback_1.is_valid()
    }

    pub fn pack(&self) -> u16 {
        let mut v = 0u16;
        v |= (self.harq_process_number_0 as u16 & 0x7) << 9;
        v |= (self.transmission_feedback_0 as u16 & 0x1) << 8;
        v |= (self.harq_process_number_1 as u16 & 0x7) << 5;
        v |= (self.transmission_feedback_1 as u16 & 0x1) << 4;
        v |= mcs_to_cqi(self.mcs) as u16 & 0xF;
        v
    }

    pub fn unpack(v: u16) -> Self {
        FeedbackInfoF3 {
            harq_process_number_0: ((v >> 9) & 0x7) as u32,
            transmission_feedback_0: TransmissionFeedback::from_coded_value(((v >> 8) & 0x1) as u32),
            harq_process_number_1: ((v >> 5) & 0x7) as u32,
            transmission_feedback_1: TransmissionFeedback::from_coded_value(((v >> 4) & 0x1) as u32),
            mcs: cqi_to_mcs((v & 0xF) as u32),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeedbackInfoF4 {
    pub harq_feedback_bitmap: u32,
    pub mcs: i32,
}

impl FeedbackInfoF4 {
    pub fn is_valid(&self) -> bool {
        self.harq_feedback_bitmap <= 0xFF
    }

    pub fn pack(&self) -> u16 {
        ((self.harq_feedback_bitmap as u16 & 0xFF) << 4) | (mcs_to_cqi(self.mcs) as u16 & 0xF)
    }

    pub fn unpack(v: u16) -> Self {
        FeedbackInfoF4 {
            harq_feedback_bitmap: ((v >> 4) & 0xFF) as u32,
            mcs: cqi_to_mcs((v & 0xF) as u32),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeedbackInfoF5 {
    pub harq_process_number: u32,
    pub transmission_feedback: TransmissionFeedback,
    pub mimo_feedback: MimoFeedback,
    pub codebook_index: u32,
}

impl FeedbackInfoF5 {
    pub fn is_valid(&self) -> bool {
        self.harq_process_number <= 7
            && self.transmission_feedback.is_valid()
            && self.mimo_feedback.is_valid()
            && self.codebook_index <= 0x3F
    }

    pub fn pack(&self) -> u16 {
        let mut v = 0u16;
        v |= (self.harq_process_number as u16 & 0x7) << 9;
        v |= (self.transmission_feedback as u16 & 0x1) << 8;
        v |= (self.mimo_feedback as u16 & 0x3) << 6;
        v |= self.codebook_index as u16 & 0x3F;
        v
    }

    pub fn unpack(v: u16) -> Self {
        FeedbackInfoF5 {
            harq_process_number: ((v >> 9) & 0x7) as u32,
            transmission_feedback: TransmissionFeedback::from_coded_value(((v >> 8) & 0x1) as u32),
            mimo_feedback: MimoFeedback::from_coded_value(((v >> 6) & 0x3) as u32),
            codebook_index: (v & 0x3F) as u32,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeedbackInfoF6 {
    pub harq_process_number: u32,
    pub reserved: u32,
    pub buffer_size: u32,
    pub mcs: i32,
}

impl FeedbackInfoF6 {
    pub fn is_valid(&self) -> bool {
        self.harq_process_number <= 7 && self.reserved == 0
    }

    pub fn pack(&self) -> u16 {
        let mut v = 0u16;
        v |= (self.harq_process_number as u16 & 0x7) << 9;
        v |= (self.reserved as u16 & 0x1) << 8;
        v |= (buffer_size_to_status(self.buffer_size) as u16 & 0xF) << 4;
        v |= mcs_to_cqi(self.mcs) as u16 & 0xF;
        v
    }

    pub fn unpack(v: u16) -> Self {
        FeedbackInfoF6 {
            harq_process_number: ((v >> 9) & 0x7) as u32,
            reserved: ((v >> 8) & 0x1) as u32,
            buffer_size: status_to_buffer_size(((v >> 4) & 0xF) as u32),
            mcs: cqi_to_mcs((v & 0xF) as u32),
        }
    }
}

/// Owns one pre-constructed instance of each feedback-info sub-variant, packed/unpacked by
/// `FeedbackFormat`. A PLCF that carries feedback holds one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeedbackInfoPool {
    pub f1: FeedbackInfoF1,
    pub f2: FeedbackInfoF2,
    pub f3: FeedbackInfoF3,
    pub f4: FeedbackInfoF4,
    pub f5: FeedbackInfoF5,
    pub f6: FeedbackInfoF6,
}

impl FeedbackInfoPool {
    /// Packs the 12-bit feedback-info field into `dst`'s low 12 bits (`dst` treated as a u16).
    pub fn pack(&self, format: FeedbackFormat) -> u16 {
        match format {
            FeedbackFormat::F1 => self.f1.pack(),
            FeedbackFormat::F2 => self.f2.pack(),
            FeedbackFormat::F3 => self.f3.pack(),
            FeedbackFormat::F4 => self.f4.pack(),
            FeedbackFormat::F5 => self.f5.pack(),
            FeedbackFormat::F6 => self.f6.pack(),
            _ => 0,
        }
    }

    pub fn unpack(&mut self, format: FeedbackFormat, v: u16) -> bool {
        match format {
            FeedbackFormat::F1 => {
                self.f1 = FeedbackInfoF1::unpack(v);
                self.f1.is_valid()
            }
            FeedbackFormat::F2 => {
                self.f2 = FeedbackInfoF2::unpack(v);
                self.f2.is_valid()
            }
            FeedbackFormat::F3 => {
                self.f3 = FeedbackInfoF3::unpack(v);
                self.f3.is_valid()
            }
            FeedbackFormat::F4 => {
                self.f4 = FeedbackInfoF4::unpack(v);
                self.f4.is_valid()
            }
            FeedbackFormat::F5 => {
                self.f5 = FeedbackInfoF5::unpack(v);
                self.f5.is_valid()
            }
            FeedbackFormat::F6 => {
                self.f6 = FeedbackInfoF6::unpack(v);
                self.f6.is_valid()
            }
            FeedbackFormat::NoFeedback => true,
            FeedbackFormat::NotDefined => false,
        }
    }
}

/// Packs a 12-bit value into two bytes as `[bits 11:8 in low nibble][bits 7:0]`, the layout every
/// PLCF variant that carries feedback-info uses for its trailing two bytes.
pub fn pack_12bit(dst: &mut [u8], v: u16) {
    dst[0] = place_bits(dst[0] & 0xF0, ((v >> 8) & 0xF) as u8, 3, 0);
    dst[1] = (v & 0xFF) as u8;
}

pub fn unpack_12bit(src: &[u8]) -> u16 {
    ((extract_bits(src[0], 3, 0) as u16) << 8) | src[1] as u16
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn cqi_convention() {
        assert_eq!(mcs_to_cqi(-1), 0);
        assert_eq!(cqi_to_mcs(0), -1);
        assert_eq!(mcs_to_cqi(10), 11);
        assert_eq!(cqi_to_mcs(11), 10);
    }

    #[test]
    fn buffer_status_buckets() {
        assert_eq!(buffer_size_to_status(0), 0);
        assert_eq!(buffer_size_to_status(15), 1);
        assert_eq!(buffer_size_to_status(16), 1);
        assert_eq!(buffer_size_to_status(17), 2);
        assert_eq!(buffer_size_to_status(200_000), 15);
    }

    #[test]
    fn buffer_status_expands_to_lower_bound() {
        assert_eq!(status_to_buffer_size(0), 0);
        assert_eq!(status_to_buffer_size(1), 0);
        assert_eq!(status_to_buffer_size(2), 16);
        assert_eq!(status_to_buffer_size(15), 131072);
    }

    #[test]
    fn f1_roundtrip() {
        let f = FeedbackInfoF1 {
            harq_process_number: 5,
            transmission_feedback: TransmissionFeedback::Ack,
            buffer_size: 0,
            mcs: 3,
        };
        assert!(f.is_valid());
        assert_eq!(FeedbackInfoF1::unpack(f.pack()), f);
    }

    #[test]
    fn f1_buffer_size_quantizes_to_bucket_lower_bound() {
        let f = FeedbackInfoF1 {
            harq_process_number: 5,
            transmission_feedback: TransmissionFeedback::Ack,
            buffer_size: 9_000,
            mcs: 3,
        };
        let unpacked = FeedbackInfoF1::unpack(f.pack());
        assert_eq!(unpacked.buffer_size, 8192);
    }

    #[test]
    fn f5_roundtrip() {
        let f = FeedbackInfoF5 {
            harq_process_number: 2,
            transmission_feedback: TransmissionFeedback::Nack,
            mimo_feedback: MimoFeedback::DualLayer,
            codebook_index: 0x2A,
        };
        assert!(f.is_valid());
        assert_eq!(FeedbackInfoF5::unpack(f.pack()), f);
    }

    #[test]
    fn twelve_bit_field_packs_into_trailing_bytes() {
        let mut dst = [0xFFu8, 0xFF];
        pack_12bit(&mut dst, 0x0AB);
        // low nibble of byte0 carries bits 11:8, byte1 carries bits 7:0
        assert_eq!(unpack_12bit(&dst), 0x0AB);
    }
}
