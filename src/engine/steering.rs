use crate::constants::{
    BOARD_WIDTH, GRID_COLS, PROBE_OFFSET, TILE_HEIGHT, TILE_WIDTH, TURN_BAND_MAX, TURN_BAND_MIN,
    WRAP_MIN_X,
};
use crate::grid::{pixel_to_tile, Grid, Tile};
use crate::types::Direction::{Down, Left, Right, Up};
use crate::types::{Direction, GhostRole, TurnSet, Vec2};

#[derive(Debug)]
pub(super) struct HeadingRule {
    eager: &'static [Direction],
    cruise: &'static [Direction],
    fallback: [Direction; 3],
}

#[derive(Debug)]
pub(super) struct SteeringProfile {
    right: HeadingRule,
    left: HeadingRule,
    up: HeadingRule,
    down: HeadingRule,
}

impl SteeringProfile {
    fn rule(&self, heading: Direction) -> &HeadingRule {
        match heading {
            Direction::Right => &self.right,
            Direction::Left => &self.left,
            Direction::Up => &self.up,
            Direction::Down => &self.down,
        }
    }
}

static CHASER_PROFILE: SteeringProfile = SteeringProfile {
    right: HeadingRule { eager: &[], cruise: &[], fallback: [Down, Up, Left] },
    left: HeadingRule { eager: &[], cruise: &[], fallback: [Down, Up, Right] },
    up: HeadingRule { eager: &[], cruise: &[], fallback: [Down, Right, Left] },
    down: HeadingRule { eager: &[], cruise: &[], fallback: [Up, Right, Left] },
};

static AMBUSHER_PROFILE: SteeringProfile = SteeringProfile {
    right: HeadingRule { eager: &[], cruise: &[], fallback: [Down, Up, Left] },
    left: HeadingRule { eager: &[Down], cruise: &[], fallback: [Down, Up, Right] },
    up: HeadingRule { eager: &[Left], cruise: &[Right, Left], fallback: [Left, Down, Right] },
    down: HeadingRule { eager: &[], cruise: &[Right, Left], fallback: [Up, Left, Right] },
};

static FLANKER_PROFILE: SteeringProfile = SteeringProfile {
    right: HeadingRule { eager: &[], cruise: &[Down, Up], fallback: [Down, Up, Left] },
    left: HeadingRule { eager: &[Down], cruise: &[Down, Up], fallback: [Down, Up, Right] },
    up: HeadingRule { eager: &[], cruise: &[], fallback: [Left, Down, Right] },
    down: HeadingRule { eager: &[], cruise: &[], fallback: [Up, Left, Right] },
};

// Also drives caged and eyes pursuers.
static ROAM_PROFILE: SteeringProfile = SteeringProfile {
    right: HeadingRule { eager: &[], cruise: &[Down, Up], fallback: [Down, Up, Left] },
    left: HeadingRule { eager: &[Down], cruise: &[Down, Up], fallback: [Down, Up, Right] },
    up: HeadingRule { eager: &[Left], cruise: &[Right, Left], fallback: [Left, Down, Right] },
    down: HeadingRule { eager: &[], cruise: &[Right, Left], fallback: [Up, Left, Right] },
};

pub(super) fn profile_for(role: GhostRole) -> &'static SteeringProfile {
    match role {
        GhostRole::Chaser => &CHASER_PROFILE,
        GhostRole::Ambusher => &AMBUSHER_PROFILE,
        GhostRole::Flanker => &FLANKER_PROFILE,
        GhostRole::Shy => &ROAM_PROFILE,
    }
}

pub(super) fn roam_profile() -> &'static SteeringProfile {
    &ROAM_PROFILE
}

fn seek_order(heading: Direction) -> [Direction; 3] {
    match heading {
        Right => [Down, Up, Left],
        Left => [Down, Up, Right],
        Up => [Right, Left, Down],
        Down => [Right, Left, Up],
    }
}

fn approaches(dir: Direction, pos: Vec2, target: Vec2) -> bool {
    match dir {
        Right => target.x > pos.x,
        Left => target.x < pos.x,
        Up => target.y < pos.y,
        Down => target.y > pos.y,
    }
}

pub(super) fn steer(
    profile: &SteeringProfile,
    heading: Direction,
    turns: TurnSet,
    pos: Vec2,
    target: Vec2,
) -> Option<Direction> {
    let rule = profile.rule(heading);
    let seeks = |dir: &Direction| turns.allows(*dir) && approaches(*dir, pos, target);

    if let Some(dir) = rule.eager.iter().find(|dir| seeks(dir)) {
        return Some(*dir);
    }
    if turns.allows(heading) {
        if approaches(heading, pos, target) {
            return Some(heading);
        }
        return Some(rule.cruise.iter().find(|dir| seeks(dir)).copied().unwrap_or(heading));
    }
    seek_order(heading)
        .iter()
        .find(|dir| seeks(dir))
        .or_else(|| rule.fallback.iter().find(|dir| turns.allows(**dir)))
        .copied()
}

fn in_turn_band(offset: i32) -> bool {
    (TURN_BAND_MIN..=TURN_BAND_MAX).contains(&offset)
}

fn probe_point(center: Vec2, dir: Direction, reach: i32) -> (i32, i32) {
    match dir {
        Right => (center.x + reach, center.y),
        Left => (center.x - reach, center.y),
        Up => (center.x, center.y - reach),
        Down => (center.x, center.y + reach),
    }
}

fn inside_side_walls(center: Vec2) -> bool {
    let col = center.x.div_euclid(TILE_WIDTH);
    0 < col && col < GRID_COLS as i32 - 1
}

pub(super) fn ghost_turns(
    grid: &Grid,
    center: Vec2,
    heading: Direction,
    gate_access: bool,
) -> TurnSet {
    let mut turns = TurnSet::default();
    if !inside_side_walls(center) {
        turns.allow(Right);
        turns.allow(Left);
        return turns;
    }
    let open = |dir: Direction, reach: i32| {
        let (px, py) = probe_point(center, dir, reach);
        grid.probe(px, py, gate_access)
    };

    let (above_col, above_row) = pixel_to_tile(center.x, center.y - PROBE_OFFSET);
    if grid.tile_at(above_col, above_row) == Some(Tile::Gate) {
        turns.allow(Up);
    }
    for dir in Direction::ALL {
        if open(dir, PROBE_OFFSET) {
            turns.allow(dir);
        }
    }
    // Moving vertically near a row's middle, look a whole tile to each side.
    if heading.is_vertical() && in_turn_band(center.y.rem_euclid(TILE_HEIGHT)) {
        for dir in [Left, Right] {
            if open(dir, TILE_WIDTH) {
                turns.allow(dir);
            }
        }
    }
    turns
}

pub(super) fn player_turns(grid: &Grid, center: Vec2, heading: Direction) -> TurnSet {
    let mut turns = TurnSet::default();
    if !inside_side_walls(center) {
        turns.allow(Right);
        turns.allow(Left);
        return turns;
    }
    let open = |dir: Direction, reach: i32| {
        let (px, py) = probe_point(center, dir, reach);
        grid.probe(px, py, false)
    };

    let back = heading.opposite();
    if open(back, PROBE_OFFSET) {
        turns.allow(back);
    }

    let (vertical_reach, side_reach) = if heading.is_vertical() {
        (PROBE_OFFSET, TILE_WIDTH)
    } else {
        (TILE_HEIGHT, PROBE_OFFSET)
    };
    if in_turn_band(center.x.rem_euclid(TILE_WIDTH)) {
        for dir in [Down, Up] {
            if open(dir, vertical_reach) {
                turns.allow(dir);
            }
        }
    }
    if in_turn_band(center.y.rem_euclid(TILE_HEIGHT)) {
        for dir in [Left, Right] {
            if open(dir, side_reach) {
                turns.allow(dir);
            }
        }
    }
    turns
}

pub(super) fn advance(pos: Vec2, dir: Direction, speed: i32) -> Vec2 {
    let moved = match dir {
        Right => Vec2::new(pos.x + speed, pos.y),
        Left => Vec2::new(pos.x - speed, pos.y),
        Up => Vec2::new(pos.x, pos.y - speed),
        Down => Vec2::new(pos.x, pos.y + speed),
    };
    wrap_x(moved)
}

pub(super) fn wrap_x(pos: Vec2) -> Vec2 {
    if pos.x < WRAP_MIN_X {
        Vec2::new(BOARD_WIDTH, pos.y)
    } else if pos.x > BOARD_WIDTH {
        Vec2::new(WRAP_MIN_X, pos.y)
    } else {
        pos
    }
}
