//! Score arithmetic.

use autodrone_world::{Level, Status, World};

/// Points per category, fixed weights: energy 40, steps 30, time 20,
/// completion 10.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoreBreakdown {
    /// Energy efficiency against the level's `optimal_energy`.
    pub energy: u32,
    /// Step efficiency against the level's `optimal_steps`.
    pub steps: u32,
    /// Speed: full marks under 10 ticks, minus one per 10 ticks.
    pub time: u32,
    /// 10 when the level was won, 0 otherwise.
    pub completion: u32,
    /// Sum of the categories.
    pub total: u32,
}

impl ScoreBreakdown {
    /// Compute the breakdown from a terminal world and its level.
    pub fn compute(world: &World, level: &Level) -> ScoreBreakdown {
        let stats = world.stats();
        let energy = ratio_points(level.optimal_energy, stats.energy_used, 40);
        let steps = ratio_points(level.optimal_steps, stats.ticks, 30);
        let time = 20u32.saturating_sub(stats.ticks / 10);
        let completion = if world.status() == Status::Won { 10 } else { 0 };
        ScoreBreakdown {
            energy,
            steps,
            time,
            completion,
            total: energy + steps + time + completion,
        }
    }
}

/// `min(weight, round(optimal / max(1, actual) * weight))`.
fn ratio_points(optimal: u32, actual: u32, weight: u32) -> u32 {
    let ratio = f64::from(optimal) / f64::from(actual.max(1));
    let points = (ratio * f64::from(weight)).round() as u32;
    points.min(weight)
}

/// Star rating for a total score.
pub fn stars(total: u32) -> u32 {
    match total {
        90.. => 5,
        75..=89 => 4,
        60..=74 => 3,
        40..=59 => 2,
        20..=39 => 1,
        _ => 0,
    }
}
