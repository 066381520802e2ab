//! Action descriptors and receipts.
//!
//! The virtual machine never mutates the world itself. When it executes
//! an action opcode it returns an [`Action`] to its driver, and the
//! driver applies it to the simulator. The simulator answers every
//! action with an [`ActionReceipt`]; gameplay failures are receipts with
//! a reason code, never errors.

use std::fmt;

use crate::direction::{RelDir, TurnDir};
use crate::pos::Pos;
use crate::tile::TileKind;

/// The operation an action performs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionKind {
    /// Translate one tile in a direction relative to the heading.
    Move(RelDir),
    /// Rotate the heading 90°.
    Turn(TurnDir),
    /// Pick up the resource on the current tile.
    Collect,
    /// Idle for the given number of ticks, recharging.
    Wait(u32),
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Move(dir) => write!(f, "move {dir}"),
            ActionKind::Turn(dir) => write!(f, "turn {dir}"),
            ActionKind::Collect => write!(f, "collect"),
            ActionKind::Wait(n) => write!(f, "wait {n}"),
        }
    }
}

/// An action descriptor emitted by the VM for its driver.
///
/// `line` is the source line of the instruction that produced the
/// action, via the bytecode source map; 0 when unknown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Action {
    /// The operation to apply to the world.
    pub kind: ActionKind,
    /// Originating source line, 0 if unmapped.
    pub line: u32,
}

/// Why the simulator rejected an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionError {
    /// The drone's battery cannot cover the action's cost.
    NotEnoughEnergy {
        /// Energy the action requires.
        required: u32,
        /// Energy currently available.
        available: u32,
    },
    /// The target tile is a wall.
    WallBlocked {
        /// The blocked target cell.
        target: Pos,
    },
    /// `collect` on a tile with nothing collectible.
    NothingHere,
}

impl ActionError {
    /// A short hint the driver can surface next to the failure message.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            ActionError::NotEnoughEnergy { .. } => {
                Some("wait to recharge, or find a charger tile")
            }
            ActionError::WallBlocked { .. } => Some("scan before moving to find open tiles"),
            ActionError::NothingHere => Some("scan nearby tiles to locate resources first"),
        }
    }
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionError::NotEnoughEnergy {
                required,
                available,
            } => write!(f, "not enough energy: need {required}, have {available}"),
            ActionError::WallBlocked { target } => write!(f, "blocked by a wall at {target}"),
            ActionError::NothingHere => write!(f, "nothing to collect here"),
        }
    }
}

impl std::error::Error for ActionError {}

/// Receipt returned by the simulator for every applied action.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionReceipt {
    /// Whether the action took effect.
    pub ok: bool,
    /// The rejection reason, when `ok` is false.
    pub reason: Option<ActionError>,
    /// The drone's position after the action, for successful moves.
    pub position: Option<Pos>,
    /// The tile under the drone after the action, for successful moves
    /// and collects.
    pub tile: Option<TileKind>,
}

impl ActionReceipt {
    /// A bare success receipt.
    pub fn success() -> ActionReceipt {
        ActionReceipt {
            ok: true,
            reason: None,
            position: None,
            tile: None,
        }
    }

    /// A success receipt reporting the drone's new position and tile.
    pub fn success_at(position: Pos, tile: TileKind) -> ActionReceipt {
        ActionReceipt {
            ok: true,
            reason: None,
            position: Some(position),
            tile: Some(tile),
        }
    }

    /// A failure receipt with a reason code.
    pub fn failure(reason: ActionError) -> ActionReceipt {
        ActionReceipt {
            ok: false,
            reason: Some(reason),
            position: None,
            tile: None,
        }
    }

    /// The receipt for an action arriving after the run has ended.
    /// Not a gameplay failure, so it carries no reason code.
    pub fn ignored() -> ActionReceipt {
        ActionReceipt {
            ok: false,
            reason: None,
            position: None,
            tile: None,
        }
    }
}

/// Result of a sensor scan.
///
/// Scans do not advance world time, so the blocked outcomes are
/// sentinels rather than receipt failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanOutcome {
    /// The sensor is still recharging from a previous scan.
    Cooldown,
    /// Not enough energy to power the sensor.
    NoEnergy,
    /// The scanned tile's kind.
    Revealed(TileKind),
}

impl ScanOutcome {
    /// The string form pushed onto the VM stack, matched by scripts
    /// against literals like `"crystal"`.
    pub fn name(self) -> &'static str {
        match self {
            ScanOutcome::Cooldown => "cooldown",
            ScanOutcome::NoEnergy => "no_energy",
            ScanOutcome::Revealed(tile) => tile.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receipt_constructors() {
        let ok = ActionReceipt::success_at(Pos::new(2, 1), TileKind::Crystal);
        assert!(ok.ok);
        assert_eq!(ok.tile, Some(TileKind::Crystal));

        let fail = ActionReceipt::failure(ActionError::NothingHere);
        assert!(!fail.ok);
        assert_eq!(fail.reason, Some(ActionError::NothingHere));
        assert!(fail.reason.unwrap().hint().is_some());
    }

    #[test]
    fn test_scan_outcome_names() {
        assert_eq!(ScanOutcome::Cooldown.name(), "cooldown");
        assert_eq!(ScanOutcome::NoEnergy.name(), "no_energy");
        assert_eq!(ScanOutcome::Revealed(TileKind::Wall).name(), "wall");
    }
}
