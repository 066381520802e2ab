//! Per-run counters surfaced to the analyzer.

use serde::{Deserialize, Serialize};

/// Counters accumulated over a run.
///
/// Plain data: the simulator increments them, the analyzer reads them.
/// `energy_wasted` records the cost that *failed* actions would have
/// spent; failed actions deduct nothing from the battery.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// World time. Moves, turns and collects advance it by 1, waits by
    /// their duration; scans do not advance it.
    pub ticks: u32,
    /// Successful moves.
    pub moves: u32,
    /// Successful turns.
    pub turns: u32,
    /// Successful collects.
    pub collects: u32,
    /// Scans that actually fired (not cooldown/no-energy sentinels).
    pub scans: u32,
    /// Energy actually drained: action costs plus hazard losses.
    pub energy_used: u32,
    /// Energy that failed actions would have cost.
    pub energy_wasted: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_zeroed() {
        let stats = RunStats::default();
        assert_eq!(stats.ticks, 0);
        assert_eq!(stats.energy_used, 0);
        assert_eq!(stats.energy_wasted, 0);
    }
}
