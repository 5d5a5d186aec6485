use crate::types::{Direction, GhostRole, Phase, Vec2};

pub const TICK_RATE: u32 = 60;

pub const BOARD_WIDTH: i32 = 900;
pub const BOARD_HEIGHT: i32 = 950;
pub const GRID_COLS: usize = 30;
pub const GRID_ROWS: usize = 32;
pub const TILE_WIDTH: i32 = BOARD_WIDTH / GRID_COLS as i32;
pub const TILE_HEIGHT: i32 = (BOARD_HEIGHT - 50) / GRID_ROWS as i32;

pub const PROBE_OFFSET: i32 = 15;
pub const TURN_BAND_MIN: i32 = 12;
pub const TURN_BAND_MAX: i32 = 18;

/// Tunnel wrap: leaving past `WRAP_MIN_X` re-enters at `BOARD_WIDTH` and vice versa.
pub const WRAP_MIN_X: i32 = -30;
pub const TUNNEL_ROW: i32 = 15;

pub const PLAYER_CENTER_OFFSET: Vec2 = Vec2::new(23, 24);
pub const GHOST_CENTER_OFFSET: i32 = 22;
pub const PLAYER_HIT_RADIUS: i32 = 20;
pub const GHOST_HIT_HALF_SIZE: i32 = 18;
/// Pellets are only collected while the player's x lies strictly inside this span.
pub const PICKUP_MIN_X: i32 = 0;
pub const PICKUP_MAX_X: i32 = 870;

pub const PLAYER_SPEED: i32 = 2;
pub const GHOST_SPEED: i32 = 2;
pub const GHOST_FRIGHTENED_SPEED: i32 = 1;
pub const GHOST_ELEVATED_SPEED: i32 = 3;
pub const GHOST_EYES_SPEED: i32 = 4;

pub const STARTING_LIVES: u32 = 3;
pub const STARTUP_TICKS: u32 = 60;
pub const POWER_TICKS: u32 = 600;

pub const PELLET_POINTS: u32 = 10;
pub const POWER_PELLET_POINTS: u32 = 50;
pub const GHOST_BASE_POINTS: u32 = 100;

pub const FLANKER_RELEASE_PELLETS: u32 = 15;
pub const SHY_RELEASE_PELLETS: u32 = 30;
pub const ELEVATED_AGGRESSION_PELLETS: u32 = 60;

pub const AMBUSH_LEAD_TILES: i32 = 4;
pub const FLANK_LEAD_TILES: i32 = 2;
pub const SHY_RADIUS_TILES: f32 = 8.0;

/// `None` marks the closing chase entry, which never times out.
pub const MODE_SCHEDULE: [(Phase, Option<u32>); 8] = [
    (Phase::Scatter, Some(5)),
    (Phase::Chase, Some(25)),
    (Phase::Scatter, Some(5)),
    (Phase::Chase, Some(25)),
    (Phase::Scatter, Some(3)),
    (Phase::Chase, Some(30)),
    (Phase::Scatter, Some(1)),
    (Phase::Chase, None),
];

pub const PLAYER_START: Vec2 = Vec2::new(450, 663);
pub const PLAYER_START_DIR: Direction = Direction::Right;

pub const PEN_MIN: Vec2 = Vec2::new(350, 370);
pub const PEN_MAX: Vec2 = Vec2::new(550, 480);
/// Pen interior plus the gate row, as inclusive tile (col, row) bounds.
pub const PEN_TILE_MIN: (i32, i32) = (12, 13);
pub const PEN_TILE_MAX: (i32, i32) = (17, 16);
/// Wider box used to steer revived pursuers back out during power mode.
pub const PEN_APPROACH_MIN: Vec2 = Vec2::new(340, 340);
pub const PEN_APPROACH_MAX: Vec2 = Vec2::new(560, 500);
pub const PEN_EXIT_TARGET: Vec2 = Vec2::new(400, 100);
pub const PEN_RETURN_TARGET: Vec2 = Vec2::new(380, 400);

pub fn ghost_start(role: GhostRole) -> (Vec2, Direction) {
    match role {
        GhostRole::Chaser => (Vec2::new(56, 58), Direction::Right),
        GhostRole::Ambusher => (Vec2::new(440, 438), Direction::Up),
        GhostRole::Flanker => (Vec2::new(440, 388), Direction::Up),
        GhostRole::Shy => (Vec2::new(440, 438), Direction::Up),
    }
}

pub fn scatter_corner_tile(role: GhostRole) -> (i32, i32) {
    match role {
        GhostRole::Chaser => (28, 1),
        GhostRole::Ambusher => (1, 1),
        GhostRole::Flanker => (28, 31),
        GhostRole::Shy => (1, 31),
    }
}

pub fn schedule_duration_ticks(index: usize, tick_rate: u32) -> Option<u64> {
    MODE_SCHEDULE[index % MODE_SCHEDULE.len()]
        .1
        .map(|secs| secs as u64 * tick_rate as u64)
}

pub fn ghost_points(eaten_count: u32) -> u32 {
    GHOST_BASE_POINTS << eaten_count.min(4)
}
