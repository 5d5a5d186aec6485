use crate::constants::{
    ghost_start, GHOST_ELEVATED_SPEED, GHOST_EYES_SPEED, GHOST_FRIGHTENED_SPEED,
    GHOST_HIT_HALF_SIZE, GHOST_SPEED, PELLET_POINTS, PICKUP_MAX_X, PICKUP_MIN_X,
    PLAYER_HIT_RADIUS, PLAYER_SPEED, PLAYER_START, PLAYER_START_DIR, POWER_PELLET_POINTS,
    POWER_TICKS, STARTING_LIVES, STARTUP_TICKS, TICK_RATE,
};
use crate::grid::{pixel_to_tile, Grid};
use crate::types::{
    GhostRole, GhostState, GhostView, InputEvent, Pickup, PlayerView, RoundOutcome,
    RoundSummary, RuntimeEvent, Snapshot, TurnSet, Vec2,
};

pub mod power;
pub mod release;
pub mod schedule;
mod steering;
mod targeting;
mod utils;

use self::power::PowerState;
use self::release::{GateChange, ReleaseGates};
use self::schedule::ModeScheduler;
use self::steering::{advance, ghost_turns, player_turns, profile_for, roam_profile, steer};
use self::targeting::{pursuer_target, PursuerFacts, TargetContext};
use self::utils::{circle_hits_square, ghost_center, in_pen, is_caged, player_center};

#[derive(Clone, Debug)]
pub struct EngineOptions {
    pub tick_rate: u32,
    pub starting_lives: u32,
    pub startup_ticks: u32,
    pub power_ticks: u32,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            tick_rate: TICK_RATE,
            starting_lives: STARTING_LIVES,
            startup_ticks: STARTUP_TICKS,
            power_ticks: POWER_TICKS,
        }
    }
}

#[derive(Clone, Debug, Default)]
struct RoundStats {
    ghosts_eaten: u32,
    deaths: u32,
}

#[derive(Clone, Debug)]
struct PlayerInternal {
    view: PlayerView,
    turns: TurnSet,
}

impl PlayerInternal {
    fn spawn() -> Self {
        Self {
            view: PlayerView {
                x: PLAYER_START.x,
                y: PLAYER_START.y,
                dir: PLAYER_START_DIR,
                intent: PLAYER_START_DIR,
                speed: PLAYER_SPEED,
            },
            turns: TurnSet::default(),
        }
    }

    fn pos(&self) -> Vec2 {
        Vec2::new(self.view.x, self.view.y)
    }
}

#[derive(Clone, Debug)]
struct GhostInternal {
    view: GhostView,
    wait_point: Vec2,
    eyes: bool,
    caged: bool,
}

impl GhostInternal {
    fn spawn(role: GhostRole) -> Self {
        let (pos, dir) = ghost_start(role);
        Self {
            view: GhostView {
                role,
                x: pos.x,
                y: pos.y,
                dir,
                state: GhostState::Caged,
                speed: GHOST_SPEED,
                target: pos,
                turns: TurnSet::default(),
                eaten_this_cycle: false,
            },
            wait_point: pos,
            eyes: false,
            caged: is_caged(pos),
        }
    }

    fn pos(&self) -> Vec2 {
        Vec2::new(self.view.x, self.view.y)
    }

    fn set_pos(&mut self, pos: Vec2) {
        self.view.x = pos.x;
        self.view.y = pos.y;
    }
}

#[derive(Clone, Debug)]
pub struct GameEngine {
    options: EngineOptions,
    grid: Grid,
    player: PlayerInternal,
    ghosts: Vec<GhostInternal>,
    scheduler: ModeScheduler,
    power: PowerState,
    gates: ReleaseGates,
    events: Vec<RuntimeEvent>,
    score: u32,
    lives: u32,
    startup_counter: u32,
    tick_counter: u64,
    outcome: Option<RoundOutcome>,
    stats: RoundStats,
}

impl GameEngine {
    pub fn new(options: EngineOptions) -> Self {
        let mut engine = Self {
            grid: Grid::new(),
            player: PlayerInternal::spawn(),
            ghosts: GhostRole::ALL.iter().map(|role| GhostInternal::spawn(*role)).collect(),
            scheduler: ModeScheduler::new(options.tick_rate),
            power: PowerState::new(options.power_ticks),
            gates: ReleaseGates::default(),
            events: Vec::new(),
            score: 0,
            lives: options.starting_lives,
            startup_counter: 0,
            tick_counter: 0,
            outcome: None,
            stats: RoundStats::default(),
            options,
        };
        engine.refresh_ghost_views();
        engine
    }

    pub fn restart(&mut self) {
        *self = Self::new(self.options.clone());
    }

    pub fn is_paused(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn outcome(&self) -> Option<RoundOutcome> {
        self.outcome
    }

    pub fn tick(&self) -> u64 {
        self.tick_counter
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn queue_input(&mut self, input: InputEvent) {
        match input {
            InputEvent::Press(dir) => self.player.view.intent = dir,
            InputEvent::Release(dir) => {
                if self.player.view.intent == dir {
                    self.player.view.intent = self.player.view.dir;
                }
            }
        }
    }

    pub fn step(&mut self) {
        if self.is_paused() {
            return;
        }
        self.tick_counter += 1;

        self.update_power();
        let holding = self.startup_counter < self.options.startup_ticks;
        if holding {
            self.startup_counter += 1;
        }
        if !self.power.is_active() {
            self.advance_schedule();
        }
        for ghost in &mut self.ghosts {
            ghost.caged = is_caged(ghost.pos());
        }
        self.update_speeds();
        self.update_targets();
        if holding {
            self.refresh_ghost_views();
            return;
        }

        self.move_player();
        self.move_ghosts();
        self.collect_pickups();
        self.resolve_ghost_collisions();
        self.update_release_gates();
        self.revive_eyes();
        if self.outcome.is_none() && self.grid.is_cleared() {
            self.outcome = Some(RoundOutcome::Won);
            self.events.push(RuntimeEvent::RoundWon);
        }
        self.refresh_ghost_views();
    }

    pub fn build_snapshot(&mut self, include_events: bool) -> Snapshot {
        Snapshot {
            tick: self.tick_counter,
            grid: self.grid.codes(),
            player: self.player.view.clone(),
            ghosts: self.ghosts.iter().map(|g| g.view.clone()).collect(),
            score: self.score,
            lives: self.lives,
            phase: self.scheduler.phase(),
            schedule_index: self.scheduler.index(),
            power_active: self.power.is_active(),
            power_ticks_left: self.power.ticks_left(),
            pellets_eaten: self.gates.pellets_eaten(),
            pellets_remaining: self.grid.remaining_items(),
            outcome: self.outcome,
            events: if include_events {
                std::mem::take(&mut self.events)
            } else {
                Vec::new()
            },
        }
    }

    pub fn build_summary(&self) -> RoundSummary {
        RoundSummary {
            outcome: self.outcome,
            ticks: self.tick_counter,
            score: self.score,
            lives: self.lives,
            pellets_eaten: self.gates.pellets_eaten(),
            ghosts_eaten: self.stats.ghosts_eaten,
            deaths: self.stats.deaths,
        }
    }

    fn update_power(&mut self) {
        if self.power.tick() {
            self.events.push(RuntimeEvent::PowerEnded);
        }
    }

    fn advance_schedule(&mut self) {
        let Some(phase) = self.scheduler.advance() else {
            return;
        };
        for ghost in &mut self.ghosts {
            ghost.view.dir = ghost.view.dir.opposite();
        }
        self.events.push(RuntimeEvent::ModeChanged {
            phase,
            schedule_index: self.scheduler.index(),
        });
    }

    fn update_release_gates(&mut self) {
        for change in self.gates.update() {
            self.events.push(match change {
                GateChange::Released(role) => RuntimeEvent::GhostReleased { role },
                GateChange::ElevatedAggression => RuntimeEvent::ElevatedAggression,
            });
        }
    }

    fn ghost_speed(&self, ghost: &GhostInternal) -> i32 {
        let role = ghost.view.role;
        if ghost.eyes {
            GHOST_EYES_SPEED
        } else if self.power.is_active() {
            if self.power.is_eaten(role) {
                GHOST_SPEED
            } else {
                GHOST_FRIGHTENED_SPEED
            }
        } else if role == GhostRole::Chaser && self.gates.elevated_aggression() {
            GHOST_ELEVATED_SPEED
        } else {
            GHOST_SPEED
        }
    }

    fn update_speeds(&mut self) {
        let speeds: Vec<i32> = self.ghosts.iter().map(|g| self.ghost_speed(g)).collect();
        for (ghost, speed) in self.ghosts.iter_mut().zip(speeds) {
            ghost.view.speed = speed;
        }
    }

    fn update_targets(&mut self) {
        let ctx = TargetContext {
            player: self.player.pos(),
            player_dir: self.player.view.dir,
            chaser: self.ghosts[GhostRole::Chaser.index()].pos(),
            phase: self.scheduler.phase(),
            power_active: self.power.is_active(),
            elevated: self.gates.elevated_aggression(),
        };
        let targets: Vec<Vec2> = self
            .ghosts
            .iter()
            .map(|ghost| {
                let facts = PursuerFacts {
                    role: ghost.view.role,
                    pos: ghost.pos(),
                    wait_point: ghost.wait_point,
                    eyes: ghost.eyes,
                    caged: ghost.caged,
                    released: self.gates.is_released(ghost.view.role),
                    eaten: self.power.is_eaten(ghost.view.role),
                };
                pursuer_target(&facts, &ctx)
            })
            .collect();
        for (ghost, target) in self.ghosts.iter_mut().zip(targets) {
            ghost.view.target = target;
        }
    }

    fn move_player(&mut self) {
        let player = &mut self.player;
        let center = player_center(player.pos());
        player.turns = player_turns(&self.grid, center, player.view.dir);
        if player.turns.allows(player.view.intent) {
            player.view.dir = player.view.intent;
        }
        if player.turns.allows(player.view.dir) {
            let moved = advance(player.pos(), player.view.dir, player.view.speed);
            player.view.x = moved.x;
            player.view.y = moved.y;
        }
    }

    fn move_ghosts(&mut self) {
        for ghost in &mut self.ghosts {
            let role = ghost.view.role;
            let gate_access = ghost.caged || ghost.eyes;
            ghost.view.turns =
                ghost_turns(&self.grid, ghost_center(ghost.pos()), ghost.view.dir, gate_access);
            if ghost.caged && !ghost.eyes && !self.gates.is_released(role) {
                continue;
            }
            let profile = if gate_access {
                roam_profile()
            } else {
                profile_for(role)
            };
            let choice = steer(
                profile,
                ghost.view.dir,
                ghost.view.turns,
                ghost.pos(),
                ghost.view.target,
            );
            if let Some(dir) = choice {
                ghost.view.dir = dir;
                let moved = advance(ghost.pos(), dir, ghost.view.speed);
                ghost.set_pos(moved);
            }
        }
    }

    fn collect_pickups(&mut self) {
        let pos = self.player.pos();
        if pos.x <= PICKUP_MIN_X || pos.x >= PICKUP_MAX_X {
            return;
        }
        let center = player_center(pos);
        let (col, row) = pixel_to_tile(center.x, center.y);
        match self.grid.consume(col, row) {
            Some(Pickup::Pellet) => {
                self.score += PELLET_POINTS;
                self.gates.record_pellet();
                self.events.push(RuntimeEvent::PelletEaten { col, row });
            }
            Some(Pickup::PowerPellet) => {
                self.score += POWER_PELLET_POINTS;
                self.gates.record_pellet();
                self.power.activate();
                self.events.push(RuntimeEvent::PowerPelletEaten { col, row });
            }
            None => {}
        }
    }

    fn touches_player(&self, ghost: &GhostInternal) -> bool {
        circle_hits_square(
            player_center(self.player.pos()),
            PLAYER_HIT_RADIUS,
            ghost_center(ghost.pos()),
            GHOST_HIT_HALF_SIZE,
        )
    }

    fn resolve_ghost_collisions(&mut self) {
        if !self.power.is_active() {
            let caught = self
                .ghosts
                .iter()
                .any(|ghost| !ghost.eyes && self.touches_player(ghost));
            if caught {
                self.lose_life();
            }
            return;
        }

        for idx in 0..self.ghosts.len() {
            let ghost = &self.ghosts[idx];
            let role = ghost.view.role;
            if ghost.eyes || self.power.is_eaten(role) || !self.touches_player(ghost) {
                continue;
            }
            self.ghosts[idx].eyes = true;
            let points = self.power.mark_eaten(role);
            self.score += points;
            self.stats.ghosts_eaten += 1;
            self.events.push(RuntimeEvent::GhostEaten { role, points });
        }
    }

    fn lose_life(&mut self) {
        self.stats.deaths += 1;
        if self.lives == 0 {
            self.outcome = Some(RoundOutcome::GameOver);
            self.events.push(RuntimeEvent::GameOver);
            return;
        }
        self.lives -= 1;
        self.player = PlayerInternal::spawn();
        for ghost in &mut self.ghosts {
            let (pos, dir) = ghost_start(ghost.view.role);
            ghost.set_pos(pos);
            ghost.view.dir = dir;
            ghost.eyes = false;
            ghost.caged = is_caged(pos);
        }
        self.power.clear();
        self.startup_counter = 0;
        self.events.push(RuntimeEvent::PlayerDied {
            lives_left: self.lives,
        });
    }

    fn revive_eyes(&mut self) {
        for ghost in &mut self.ghosts {
            if ghost.eyes && in_pen(ghost.pos()) {
                ghost.eyes = false;
                self.events.push(RuntimeEvent::GhostRevived {
                    role: ghost.view.role,
                });
            }
        }
    }

    fn refresh_ghost_views(&mut self) {
        for ghost in &mut self.ghosts {
            let role = ghost.view.role;
            let eaten = self.power.is_eaten(role);
            ghost.view.eaten_this_cycle = eaten;
            ghost.view.state = if ghost.eyes {
                GhostState::Eyes
            } else if is_caged(ghost.pos()) {
                GhostState::Caged
            } else if self.power.is_active() && !eaten {
                GhostState::Frightened
            } else {
                GhostState::Normal
            };
        }
    }
}
