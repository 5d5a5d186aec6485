use crate::constants::{
    scatter_corner_tile, AMBUSH_LEAD_TILES, BOARD_WIDTH, FLANK_LEAD_TILES, PEN_APPROACH_MAX,
    PEN_APPROACH_MIN, PEN_EXIT_TARGET, PEN_RETURN_TARGET, SHY_RADIUS_TILES,
};
use crate::grid::tile_center;
use crate::types::{Direction, GhostRole, Phase, Vec2};

use super::utils::{ghost_center, in_box, lead_point, player_center, tile_distance};

#[derive(Clone, Copy, Debug)]
pub(super) struct TargetContext {
    pub player: Vec2,
    pub player_dir: Direction,
    pub chaser: Vec2,
    pub phase: Phase,
    pub power_active: bool,
    pub elevated: bool,
}

#[derive(Clone, Copy, Debug)]
pub(super) struct PursuerFacts {
    pub role: GhostRole,
    pub pos: Vec2,
    pub wait_point: Vec2,
    pub eyes: bool,
    pub caged: bool,
    pub released: bool,
    pub eaten: bool,
}

pub(super) fn scatter_corner(role: GhostRole) -> Vec2 {
    let (col, row) = scatter_corner_tile(role);
    tile_center(col, row)
}

pub(super) fn pursuer_target(pursuer: &PursuerFacts, ctx: &TargetContext) -> Vec2 {
    if pursuer.eyes {
        return PEN_RETURN_TARGET;
    }
    if pursuer.caged {
        return if pursuer.released {
            PEN_EXIT_TARGET
        } else {
            pursuer.wait_point
        };
    }
    if ctx.power_active {
        if !pursuer.eaten {
            return flee_target(pursuer.role, ctx.player);
        }
        return if in_box(pursuer.pos, PEN_APPROACH_MIN, PEN_APPROACH_MAX) {
            PEN_EXIT_TARGET
        } else {
            ctx.player
        };
    }

    let chasing = ctx.phase == Phase::Chase;
    match pursuer.role {
        GhostRole::Chaser if chasing || ctx.elevated => ctx.player,
        GhostRole::Ambusher if chasing => lead_point(ctx.player, ctx.player_dir, AMBUSH_LEAD_TILES),
        GhostRole::Flanker if chasing => {
            let pivot = lead_point(ctx.player, ctx.player_dir, FLANK_LEAD_TILES);
            Vec2::new(
                ctx.chaser.x + 2 * (pivot.x - ctx.chaser.x),
                ctx.chaser.y + 2 * (pivot.y - ctx.chaser.y),
            )
        }
        GhostRole::Shy if chasing => {
            let distance = tile_distance(player_center(ctx.player), ghost_center(pursuer.pos));
            if distance > SHY_RADIUS_TILES {
                ctx.player
            } else {
                scatter_corner(GhostRole::Shy)
            }
        }
        role => scatter_corner(role),
    }
}

fn flee_target(role: GhostRole, player: Vec2) -> Vec2 {
    let half = BOARD_WIDTH / 2;
    let runaway_x = if player.x < half { BOARD_WIDTH } else { 0 };
    let runaway_y = if player.y < half { BOARD_WIDTH } else { 0 };
    match role {
        GhostRole::Chaser | GhostRole::Shy => Vec2::new(runaway_x, runaway_y),
        GhostRole::Flanker => Vec2::new(runaway_x, player.y),
        GhostRole::Ambusher => Vec2::new(player.x, runaway_y),
    }
}
