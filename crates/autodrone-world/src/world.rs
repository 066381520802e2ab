//! The grid world and its primitive actions.

use log::warn;

use autodrone_core::{
    ActionError, ActionKind, ActionReceipt, Facing, Pos, RelDir, ScanDir, ScanOutcome, Resource,
    TileKind, TurnDir, Value,
};

use crate::level::{Level, LevelError, Objective};
use crate::snapshot::WorldSnapshot;
use crate::stats::RunStats;

/// The drone's pose and battery.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Drone {
    /// Current cell. Always in bounds, never on a wall.
    pub pos: Pos,
    /// Current heading.
    pub facing: Facing,
    /// Battery charge, in `[0, max_energy]`.
    pub energy: u32,
    /// Battery capacity.
    pub max_energy: u32,
}

/// Collected resource counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Inventory {
    /// Crystals held.
    pub crystal: u32,
    /// Data caches held.
    pub data: u32,
    /// Energy cells held.
    pub energy_cell: u32,
}

impl Inventory {
    /// Count for one resource.
    pub fn count(&self, resource: Resource) -> u32 {
        match resource {
            Resource::Crystal => self.crystal,
            Resource::Data => self.data,
            Resource::EnergyCell => self.energy_cell,
        }
    }

    fn add(&mut self, resource: Resource) {
        match resource {
            Resource::Crystal => self.crystal += 1,
            Resource::Data => self.data += 1,
            Resource::EnergyCell => self.energy_cell += 1,
        }
    }
}

/// Whether the run is still going, and how it ended if not.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    /// The run is in progress.
    Playing,
    /// All objectives were completed.
    Won,
    /// The drone ran out of energy.
    Lost,
}

/// The deterministic grid-world simulator.
///
/// Owns all level-run state: the tile grid, the reveal mask, the drone,
/// the inventory, the scan cooldown, run counters, and the win/lose
/// status. Mutation happens only through the `execute_*` action methods,
/// [`scan`](World::scan), [`restore`](World::restore) and
/// [`reset`](World::reset). Once the status leaves
/// [`Playing`](Status::Playing) the world never changes again.
#[derive(Clone, Debug)]
pub struct World {
    width: u32,
    height: u32,
    grid: Vec<TileKind>,
    revealed: Vec<bool>,
    fog_of_war: bool,
    scan_radius: u32,
    drone: Drone,
    inventory: Inventory,
    scan_cooldown: u32,
    stats: RunStats,
    status: Status,
    status_message: String,
    objectives: Vec<Objective>,
    objectives_complete: bool,
}

impl World {
    /// Energy cost of a move.
    pub const MOVE_COST: u32 = 2;
    /// Energy cost of a turn.
    pub const TURN_COST: u32 = 1;
    /// Energy cost of a collect.
    pub const COLLECT_COST: u32 = 3;
    /// Energy cost of a scan.
    pub const SCAN_COST: u32 = 1;
    /// Extra energy drained by entering a hazard tile.
    pub const HAZARD_PENALTY: u32 = 10;
    /// Energy granted by entering a charger tile.
    pub const CHARGER_BONUS: u32 = 20;
    /// Energy granted by collecting an energy cell.
    pub const ENERGY_CELL_BONUS: u32 = 10;
    /// Cooldown ticks imposed after a scan fires.
    pub const SCAN_COOLDOWN_MAX: u32 = 3;

    /// Build a world from a level, validating it first.
    pub fn new(level: &Level) -> Result<World, LevelError> {
        level.validate()?;
        let mut grid = Vec::with_capacity((level.width * level.height) as usize);
        for y in 0..level.height {
            for x in 0..level.width {
                grid.push(level.tile(x, y));
            }
        }
        let mut world = World {
            width: level.width,
            height: level.height,
            grid,
            revealed: vec![false; (level.width * level.height) as usize],
            fog_of_war: level.fog_of_war,
            scan_radius: level.scan_radius,
            drone: Drone {
                pos: Pos::new(level.start_x, level.start_y),
                facing: level.start_facing,
                energy: level.start_energy,
                max_energy: level.max_energy,
            },
            inventory: Inventory::default(),
            scan_cooldown: 0,
            stats: RunStats::default(),
            status: Status::Playing,
            status_message: String::new(),
            objectives: level.objectives.clone(),
            objectives_complete: false,
        };
        world.reveal_around(world.drone.pos);
        Ok(world)
    }

    /// Throw away all run state and rebuild from `level`.
    pub fn reset(&mut self, level: &Level) -> Result<(), LevelError> {
        *self = World::new(level)?;
        Ok(())
    }

    // ── Accessors ───────────────────────────────────────────────

    /// Grid width in tiles.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in tiles.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The tile at `pos`, or `None` outside the grid.
    pub fn tile_at(&self, pos: Pos) -> Option<TileKind> {
        self.index(pos).map(|i| self.grid[i])
    }

    /// The drone's pose and battery.
    pub fn drone(&self) -> &Drone {
        &self.drone
    }

    /// Collected resources.
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Run counters.
    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// Whether the run is in progress, won or lost.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Human-readable explanation of a terminal status.
    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    /// Ticks remaining before the scanner can fire again.
    pub fn scan_cooldown(&self) -> u32 {
        self.scan_cooldown
    }

    /// The level's win conditions.
    pub fn objectives(&self) -> &[Objective] {
        &self.objectives
    }

    /// Whether a tile should render as known.
    ///
    /// Unconditionally true when the level has no fog of war.
    pub fn is_revealed(&self, pos: Pos) -> bool {
        if !self.fog_of_war {
            return true;
        }
        self.index(pos).map(|i| self.revealed[i]).unwrap_or(false)
    }

    /// Read-only script variables: `energy`, `x`, `y`, `facing`,
    /// `inventory`. `None` for names outside that set.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        match name {
            "energy" => Some(Value::Number(f64::from(self.drone.energy))),
            "x" => Some(Value::Number(f64::from(self.drone.pos.x))),
            "y" => Some(Value::Number(f64::from(self.drone.pos.y))),
            "facing" => Some(Value::from(self.drone.facing.name())),
            "inventory" => Some(Value::Record(vec![
                ("crystal".to_string(), f64::from(self.inventory.crystal)),
                ("data".to_string(), f64::from(self.inventory.data)),
                (
                    "energy_cell".to_string(),
                    f64::from(self.inventory.energy_cell),
                ),
            ])),
            _ => None,
        }
    }

    // ── Actions ─────────────────────────────────────────────────

    /// Apply an action descriptor, dispatching to the matching
    /// `execute_*` method.
    pub fn apply(&mut self, kind: ActionKind) -> ActionReceipt {
        match kind {
            ActionKind::Move(dir) => self.execute_move(dir),
            ActionKind::Turn(dir) => self.execute_turn(dir),
            ActionKind::Collect => self.execute_collect(),
            ActionKind::Wait(n) => self.execute_wait(n),
        }
    }

    /// Move one tile in a heading-relative direction. Costs 2 energy.
    ///
    /// On success the drone advances, the neighborhood around the new
    /// cell is revealed, and the entered tile's side effect (hazard
    /// drain, charger recharge) is applied. Reaching 0 energy loses the
    /// run.
    pub fn execute_move(&mut self, dir: RelDir) -> ActionReceipt {
        if self.status != Status::Playing {
            return ActionReceipt::ignored();
        }
        if self.drone.energy < Self::MOVE_COST {
            return self.fail(
                ActionKind::Move(dir),
                Self::MOVE_COST,
                ActionError::NotEnoughEnergy {
                    required: Self::MOVE_COST,
                    available: self.drone.energy,
                },
            );
        }
        let heading = dir.resolve(self.drone.facing);
        let target = self.drone.pos.step(heading);
        let entered = match self.tile_at(target) {
            Some(tile) if tile.is_walkable() => tile,
            _ => {
                return self.fail(
                    ActionKind::Move(dir),
                    Self::MOVE_COST,
                    ActionError::WallBlocked { target },
                );
            }
        };

        self.drone.pos = target;
        self.spend(Self::MOVE_COST);
        self.stats.ticks += 1;
        self.stats.moves += 1;
        self.scan_cooldown = self.scan_cooldown.saturating_sub(1);
        self.reveal_around(target);

        // Tile side effects apply to the entered tile, after the move.
        match entered {
            TileKind::Hazard => {
                let drained = self.drone.energy.min(Self::HAZARD_PENALTY);
                self.drone.energy -= drained;
                self.stats.energy_used += drained;
            }
            TileKind::Charger => {
                self.recharge(Self::CHARGER_BONUS);
                let i = self.index(target).expect("entered tile is in bounds");
                self.grid[i] = TileKind::Empty;
            }
            _ => {}
        }

        if self.drone.energy == 0 {
            self.status = Status::Lost;
            self.status_message = "Out of energy!".to_string();
        }

        ActionReceipt::success_at(target, entered)
    }

    /// Rotate the heading 90°. Costs 1 energy.
    pub fn execute_turn(&mut self, dir: TurnDir) -> ActionReceipt {
        if self.status != Status::Playing {
            return ActionReceipt::ignored();
        }
        if self.drone.energy < Self::TURN_COST {
            return self.fail(
                ActionKind::Turn(dir),
                Self::TURN_COST,
                ActionError::NotEnoughEnergy {
                    required: Self::TURN_COST,
                    available: self.drone.energy,
                },
            );
        }
        self.drone.facing = dir.apply(self.drone.facing);
        self.spend(Self::TURN_COST);
        self.stats.ticks += 1;
        self.stats.turns += 1;
        self.scan_cooldown = self.scan_cooldown.saturating_sub(1);
        ActionReceipt::success()
    }

    /// Pick up the resource under the drone. Costs 3 energy.
    ///
    /// Fails with [`ActionError::NothingHere`] — at no energy cost — if
    /// the current tile holds nothing collectible. A successful collect
    /// re-checks the level objectives and may win the run.
    pub fn execute_collect(&mut self) -> ActionReceipt {
        if self.status != Status::Playing {
            return ActionReceipt::ignored();
        }
        if self.drone.energy < Self::COLLECT_COST {
            return self.fail(
                ActionKind::Collect,
                Self::COLLECT_COST,
                ActionError::NotEnoughEnergy {
                    required: Self::COLLECT_COST,
                    available: self.drone.energy,
                },
            );
        }
        let here = self.drone.pos;
        let tile = self.tile_at(here).expect("drone is in bounds");
        let resource = match tile.resource() {
            Some(resource) => resource,
            None => {
                return self.fail(
                    ActionKind::Collect,
                    Self::COLLECT_COST,
                    ActionError::NothingHere,
                );
            }
        };

        self.inventory.add(resource);
        if resource == Resource::EnergyCell {
            self.recharge(Self::ENERGY_CELL_BONUS);
        }
        let i = self.index(here).expect("drone is in bounds");
        self.grid[i] = TileKind::Empty;
        self.spend(Self::COLLECT_COST);
        self.stats.ticks += 1;
        self.stats.collects += 1;
        self.scan_cooldown = self.scan_cooldown.saturating_sub(1);
        self.check_objectives();

        ActionReceipt::success_at(here, tile)
    }

    /// Idle for `n` ticks, recharging `n` energy. Always succeeds.
    pub fn execute_wait(&mut self, n: u32) -> ActionReceipt {
        if self.status != Status::Playing {
            return ActionReceipt::ignored();
        }
        self.recharge(n);
        self.stats.ticks += n;
        self.scan_cooldown = self.scan_cooldown.saturating_sub(n);
        ActionReceipt::success()
    }

    /// Fire the scanner at the adjacent tile in a heading-relative
    /// direction.
    ///
    /// Blocked scans return sentinel outcomes without touching the
    /// world. A fired scan costs 1 energy, imposes the full cooldown,
    /// reveals the target tile, and reports its kind. Scanning does not
    /// advance world time.
    pub fn scan(&mut self, dir: ScanDir) -> ScanOutcome {
        if self.status != Status::Playing {
            return ScanOutcome::Cooldown;
        }
        if self.scan_cooldown > 0 {
            return ScanOutcome::Cooldown;
        }
        if self.drone.energy < Self::SCAN_COST {
            return ScanOutcome::NoEnergy;
        }
        self.spend(Self::SCAN_COST);
        self.scan_cooldown = Self::SCAN_COOLDOWN_MAX;
        self.stats.scans += 1;

        let heading = dir.resolve(self.drone.facing);
        let target = self.drone.pos.step(heading);
        match self.index(target) {
            Some(i) => {
                self.revealed[i] = true;
                ScanOutcome::Revealed(self.grid[i])
            }
            // Off the grid edge reads as solid wall.
            None => ScanOutcome::Revealed(TileKind::Wall),
        }
    }

    // ── Snapshots ───────────────────────────────────────────────

    /// Deep-copy all mutable run state.
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            grid: self.grid.clone(),
            revealed: self.revealed.clone(),
            drone: self.drone,
            inventory: self.inventory,
            scan_cooldown: self.scan_cooldown,
            stats: self.stats,
            status: self.status,
            status_message: self.status_message.clone(),
            objectives_complete: self.objectives_complete,
        }
    }

    /// Overwrite all mutable run state from a snapshot.
    pub fn restore(&mut self, snap: &WorldSnapshot) {
        self.grid.clone_from(&snap.grid);
        self.revealed.clone_from(&snap.revealed);
        self.drone = snap.drone;
        self.inventory = snap.inventory;
        self.scan_cooldown = snap.scan_cooldown;
        self.stats = snap.stats;
        self.status = snap.status;
        self.status_message.clone_from(&snap.status_message);
        self.objectives_complete = snap.objectives_complete;
    }

    // ── Internals ───────────────────────────────────────────────

    fn index(&self, pos: Pos) -> Option<usize> {
        if pos.x < 0 || pos.x >= self.width as i32 || pos.y < 0 || pos.y >= self.height as i32 {
            return None;
        }
        Some((pos.y as u32 * self.width + pos.x as u32) as usize)
    }

    fn spend(&mut self, cost: u32) {
        self.drone.energy -= cost;
        self.stats.energy_used += cost;
    }

    fn recharge(&mut self, amount: u32) {
        self.drone.energy = (self.drone.energy + amount).min(self.drone.max_energy);
    }

    /// Record a failed action: no energy moves, but the cost the action
    /// would have spent is added to the wasted-energy counter.
    fn fail(&mut self, action: ActionKind, cost: u32, reason: ActionError) -> ActionReceipt {
        warn!("action {action} failed: {reason}");
        self.stats.energy_wasted += cost;
        ActionReceipt::failure(reason)
    }

    /// Reveal the square of side `2 * scan_radius + 1` centered on `pos`.
    fn reveal_around(&mut self, pos: Pos) {
        let r = self.scan_radius as i32;
        for dy in -r..=r {
            for dx in -r..=r {
                if let Some(i) = self.index(Pos::new(pos.x + dx, pos.y + dy)) {
                    self.revealed[i] = true;
                }
            }
        }
    }

    /// Win the run once every objective is satisfied. A level with no
    /// objectives can never be won.
    fn check_objectives(&mut self) {
        if self.objectives.is_empty() {
            return;
        }
        let complete = self.objectives.iter().all(|obj| match obj {
            Objective::Collect { resource, count } => self.inventory.count(*resource) >= *count,
        });
        if complete {
            self.objectives_complete = true;
            self.status = Status::Won;
            self.status_message = "All objectives completed!".to_string();
        }
    }
}
