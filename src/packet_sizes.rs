/*! Packet-size free parameters (§3 Data model, `packet_sizes_def`).

The free parameters of a single transmission. This value is the key by which HARQ buffers are
sized (see [`crate::harq`]); the PHY numerical kernel derives `N_TB_byte` from it, a step this
crate does not implement (it is the PHY's job) but whose *output* the HARQ pool is sized against.
*/

/// Subcarrier scaling factor µ ∈ {1, 2, 4, 8}.
pub type Mu = u32;

/// Free parameters of a transmission, used both to size HARQ buffers and as the key identifying
/// a HARQ process acquisition request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketSizesDef {
    /// Subcarrier scaling factor, one of {1, 2, 4, 8}.
    pub u: Mu,
    /// FFT factor.
    pub b: u32,
    /// 0 = subslots, 1 = slots (determines the unit PacketLength is counted in).
    pub packet_length_type: u32,
    /// Packet length in units of 1..16 (wire value is `PacketLength - 1`).
    pub packet_length: u32,
    /// TX-mode index, bounded by the radio device class' antenna count.
    pub tm_mode_index: u32,
    /// MCS index, 0..11.
    pub mcs_index: u32,
    /// FEC code-block size.
    pub z: u32,
}

impl PacketSizesDef {
    pub fn is_valid(&self) -> bool {
        matches!(self.u, 1 | 2 | 4 | 8)
            && self.packet_length_type <= 1
            && (1..=16).contains(&self.packet_length)
            && self.mcs_index <= 11
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn validity() {
        let good = PacketSizesDef {
            u: 1,
            b: 1,
            packet_length_type: 1,
            packet_length: 16,
            tm_mode_index: 0,
            mcs_index: 11,
            z: 2048,
        };
        assert!(good.is_valid());

        let mut bad = good;
        bad.packet_length = 17;
        assert!(!bad.is_valid());

        let mut bad = good;
        bad.mcs_index = 12;
        assert!(!bad.is_valid());
    }
}
