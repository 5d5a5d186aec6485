use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Right,
    Left,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Left,
        Direction::Up,
        Direction::Down,
    ];

    pub fn index(self) -> usize {
        match self {
            Self::Right => 0,
            Self::Left => 1,
            Self::Up => 2,
            Self::Down => 3,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::Right => Self::Left,
            Self::Left => Self::Right,
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GhostRole {
    Chaser,
    Ambusher,
    Flanker,
    Shy,
}

impl GhostRole {
    /// Identity order: every per-tick pass over pursuers walks this array.
    pub const ALL: [GhostRole; 4] = [
        GhostRole::Chaser,
        GhostRole::Ambusher,
        GhostRole::Flanker,
        GhostRole::Shy,
    ];

    pub fn index(self) -> usize {
        match self {
            Self::Chaser => 0,
            Self::Ambusher => 1,
            Self::Flanker => 2,
            Self::Shy => 3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Scatter,
    Chase,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GhostState {
    Normal,
    Caged,
    Frightened,
    Eyes,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundOutcome {
    Won,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Pickup {
    Pellet,
    PowerPellet,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Press(Direction),
    Release(Direction),
}

/// Pixel-space point. Agent positions are sprite top-left corners.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Vec2 {
    pub x: i32,
    pub y: i32,
}

impl Vec2 {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TurnSet([bool; 4]);

impl TurnSet {
    pub fn allows(&self, dir: Direction) -> bool {
        self.0[dir.index()]
    }

    pub fn allow(&mut self, dir: Direction) {
        self.0[dir.index()] = true;
    }

    pub fn count(&self) -> usize {
        self.0.iter().filter(|allowed| **allowed).count()
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct PlayerView {
    pub x: i32,
    pub y: i32,
    pub dir: Direction,
    pub intent: Direction,
    pub speed: i32,
}

#[derive(Clone, Debug, Serialize)]
pub struct GhostView {
    pub role: GhostRole,
    pub x: i32,
    pub y: i32,
    pub dir: Direction,
    pub state: GhostState,
    pub speed: i32,
    pub target: Vec2,
    pub turns: TurnSet,
    #[serde(rename = "eatenThisCycle")]
    pub eaten_this_cycle: bool,
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuntimeEvent {
    PelletEaten {
        col: i32,
        row: i32,
    },
    PowerPelletEaten {
        col: i32,
        row: i32,
    },
    PowerEnded,
    ModeChanged {
        phase: Phase,
        #[serde(rename = "scheduleIndex")]
        schedule_index: usize,
    },
    GhostReleased {
        role: GhostRole,
    },
    ElevatedAggression,
    GhostEaten {
        role: GhostRole,
        points: u32,
    },
    GhostRevived {
        role: GhostRole,
    },
    PlayerDied {
        #[serde(rename = "livesLeft")]
        lives_left: u32,
    },
    RoundWon,
    GameOver,
}

#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    pub grid: Vec<Vec<u8>>,
    pub player: PlayerView,
    pub ghosts: Vec<GhostView>,
    pub score: u32,
    pub lives: u32,
    pub phase: Phase,
    #[serde(rename = "scheduleIndex")]
    pub schedule_index: usize,
    #[serde(rename = "powerActive")]
    pub power_active: bool,
    #[serde(rename = "powerTicksLeft")]
    pub power_ticks_left: u32,
    #[serde(rename = "pelletsEaten")]
    pub pellets_eaten: u32,
    #[serde(rename = "pelletsRemaining")]
    pub pellets_remaining: usize,
    pub outcome: Option<RoundOutcome>,
    pub events: Vec<RuntimeEvent>,
}

#[derive(Clone, Debug, Serialize)]
pub struct RoundSummary {
    pub outcome: Option<RoundOutcome>,
    pub ticks: u64,
    pub score: u32,
    pub lives: u32,
    #[serde(rename = "pelletsEaten")]
    pub pellets_eaten: u32,
    #[serde(rename = "ghostsEaten")]
    pub ghosts_eaten: u32,
    pub deaths: u32,
}
