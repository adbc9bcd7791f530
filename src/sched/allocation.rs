//! FT/PT allocation records (§3 Allocation, §4.G). Absolute times are counted in samples since a
//! device-local epoch (§6 Time base) as a signed 64-bit integer, matching the source's
//! `int64_t`-everywhere convention for sample-count time.

/// A sample-count absolute or relative time value (§6: "every absolute time in the system is a
/// signed 64-bit integer counting samples since a device-local epoch").
pub type SampleTime64 = i64;

/// Sentinel returned by [`PtAllocation::get_tx_opportunity`] when no opportunity exists in the
/// current beacon cycle.
pub const NO_OPPORTUNITY: SampleTime64 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Uplink,
    Downlink,
}

/// The FT's own beacon clock (§4.G Beacon scheduling).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FtAllocation {
    /// Beacon period in samples; default corresponds to 10 ms at the configured sample rate.
    pub beacon_period_samples: i64,
    pub beacon_time_scheduled: SampleTime64,
}

impl FtAllocation {
    pub fn new(samp_rate: i64, first_full_second_64: SampleTime64) -> Self {
        let beacon_period_samples = samp_rate / 100; // 10 ms default, §4.G
        FtAllocation {
            beacon_period_samples,
            beacon_time_scheduled: first_full_second_64,
        }
    }

    /// Derived count of beacons transmitted per second at the configured period.
    pub fn beacons_per_second(&self, samp_rate: i64) -> i64 {
        if self.beacon_period_samples == 0 {
            0
        } else {
            samp_rate / self.beacon_period_samples
        }
    }

    /// Returns `true` and advances `beacon_time_scheduled` by one period if `now` has reached the
    /// scheduled beacon time; §4.G: "advances `beacon_time_scheduled` by the beacon period."
    pub fn due_and_advance(&mut self, now: SampleTime64) -> bool {
        if now >= self.beacon_time_scheduled {
            self.beacon_time_scheduled += self.beacon_period_samples;
            true
        } else {
            false
        }
    }

    /// The absolute time at which the next irregular callback should be requested, leaving
    /// `prepare_duration` samples of lead time (§4.G).
    pub fn next_wake(&self, prepare_duration_samples: i64) -> SampleTime64 {
        self.beacon_time_scheduled - prepare_duration_samples
    }
}

/// A PT's offsets relative to the last known beacon (§3 Allocation, §4.G PT scheduling).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PtAllocation {
    pub last_known_beacon_time: SampleTime64,
    pub uplink_offset_samples: i64,
    pub downlink_offset_samples: i64,
}

impl PtAllocation {
    /// Returns the next transmit/receive time for `direction` no earlier than
    /// `earliest_allowed_tx_64`, or [`NO_OPPORTUNITY`] if none exists before the next beacon is
    /// due (at `last_known_beacon_time + beacon_period_samples`).
    pub fn get_tx_opportunity(
        &self,
        direction: Direction,
        beacon_period_samples: i64,
        current_time_64: SampleTime64,
        earliest_allowed_tx_64: SampleTime64,
    ) -> SampleTime64 {
        let offset = match direction {
            Direction::Uplink => self.uplink_offset_samples,
            Direction::Downlink => self.downlink_offset_samples,
        };
        let candidate = self.last_known_beacon_time + offset;
        let next_cycle_limit = self.last_known_beacon_time + beacon_period_samples;
        if candidate < current_time_64.max(earliest_allowed_tx_64) || candidate >= next_cycle_limit
        {
            NO_OPPORTUNITY
        } else {
            candidate
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ft_allocation_advances_by_one_period_when_due() {
        let mut ft = FtAllocation::new(100_000, 1_000_000);
        assert!(!ft.due_and_advance(999_999));
        assert!(ft.due_and_advance(1_000_000));
        assert_eq!(ft.beacon_time_scheduled, 1_000_000 + 1_000);
    }

    #[test]
    fn pt_opportunity_respects_beacon_cycle_window() {
        let pt = PtAllocation {
            last_known_beacon_time: 1_000_000,
            uplink_offset_samples: 500,
            downlink_offset_samples: 200,
        };
        let opp = pt.get_tx_opportunity(Direction::Uplink, 1_000, 1_000_000, 1_000_000);
        assert_eq!(opp, 1_000_500);

        let too_late = pt.get_tx_opportunity(Direction::Uplink, 1_000, 1_000_000, 1_000_600);
        assert_eq!(too_late, NO_OPPORTUNITY);
    }
}
