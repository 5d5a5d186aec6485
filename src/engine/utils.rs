use crate::constants::{
    GHOST_CENTER_OFFSET, PEN_MAX, PEN_MIN, PEN_TILE_MAX, PEN_TILE_MIN, PLAYER_CENTER_OFFSET,
    TILE_HEIGHT, TILE_WIDTH,
};
use crate::grid::pixel_to_tile;
use crate::types::{Direction, Vec2};

pub(super) fn player_center(pos: Vec2) -> Vec2 {
    Vec2::new(pos.x + PLAYER_CENTER_OFFSET.x, pos.y + PLAYER_CENTER_OFFSET.y)
}

pub(super) fn ghost_center(pos: Vec2) -> Vec2 {
    Vec2::new(pos.x + GHOST_CENTER_OFFSET, pos.y + GHOST_CENTER_OFFSET)
}

pub(super) fn in_box(pos: Vec2, min: Vec2, max: Vec2) -> bool {
    min.x < pos.x && pos.x < max.x && min.y < pos.y && pos.y < max.y
}

pub(super) fn in_pen(pos: Vec2) -> bool {
    in_box(pos, PEN_MIN, PEN_MAX)
}

/// A pursuer stays caged until its center clears the gate row.
pub(super) fn is_caged(pos: Vec2) -> bool {
    let center = ghost_center(pos);
    let (col, row) = pixel_to_tile(center.x, center.y);
    in_pen(pos)
        || ((PEN_TILE_MIN.0..=PEN_TILE_MAX.0).contains(&col)
            && (PEN_TILE_MIN.1..=PEN_TILE_MAX.1).contains(&row))
}

pub(super) fn lead_point(pos: Vec2, dir: Direction, tiles: i32) -> Vec2 {
    match dir {
        Direction::Right => Vec2::new(pos.x + tiles * TILE_WIDTH, pos.y),
        Direction::Left => Vec2::new(pos.x - tiles * TILE_WIDTH, pos.y),
        Direction::Up => Vec2::new(pos.x, pos.y - tiles * TILE_HEIGHT),
        Direction::Down => Vec2::new(pos.x, pos.y + tiles * TILE_HEIGHT),
    }
}

/// Euclidean distance with each axis measured in its own tile size.
pub(super) fn tile_distance(a: Vec2, b: Vec2) -> f32 {
    let dx = (a.x - b.x) as f32 / TILE_WIDTH as f32;
    let dy = (a.y - b.y) as f32 / TILE_HEIGHT as f32;
    (dx * dx + dy * dy).sqrt()
}

pub(super) fn circle_hits_square(center: Vec2, radius: i32, square_center: Vec2, half: i32) -> bool {
    let nearest_x = center.x.clamp(square_center.x - half, square_center.x + half);
    let nearest_y = center.y.clamp(square_center.y - half, square_center.y + half);
    let dx = (center.x - nearest_x) as i64;
    let dy = (center.y - nearest_y) as i64;
    dx * dx + dy * dy < (radius as i64) * (radius as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pen_box_is_exclusive() {
        assert!(in_pen(Vec2::new(440, 438)));
        assert!(in_pen(Vec2::new(440, 388)));
        assert!(!in_pen(Vec2::new(350, 400)));
        assert!(!in_pen(Vec2::new(440, 480)));
        assert!(!in_pen(Vec2::new(56, 58)));
    }

    #[test]
    fn caged_until_center_leaves_gate_row() {
        // Center (422,392): row 14, under the gate, but outside the corner box.
        assert!(!in_pen(Vec2::new(400, 370)));
        assert!(is_caged(Vec2::new(400, 370)));
        // Center on the gate row.
        assert!(is_caged(Vec2::new(400, 342)));
        // Center at y=363 is row 12, above the gate.
        assert!(!is_caged(Vec2::new(400, 341)));
        assert!(!is_caged(Vec2::new(56, 58)));
        assert!(is_caged(Vec2::new(440, 438)));
    }

    #[test]
    fn lead_point_uses_per_axis_tile_size() {
        let pos = Vec2::new(300, 300);
        assert_eq!(lead_point(pos, Direction::Right, 4), Vec2::new(420, 300));
        assert_eq!(lead_point(pos, Direction::Up, 4), Vec2::new(300, 188));
        assert_eq!(lead_point(pos, Direction::Left, 2), Vec2::new(240, 300));
        assert_eq!(lead_point(pos, Direction::Down, 2), Vec2::new(300, 356));
    }

    #[test]
    fn tile_distance_scales_axes() {
        let a = Vec2::new(0, 0);
        assert!((tile_distance(a, Vec2::new(240, 0)) - 8.0).abs() < 1e-6);
        assert!((tile_distance(a, Vec2::new(0, 224)) - 8.0).abs() < 1e-6);
        assert!((tile_distance(a, Vec2::new(90, 112)) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn circle_square_overlap() {
        let square = Vec2::new(100, 100);
        assert!(circle_hits_square(Vec2::new(100, 100), 20, square, 18));
        assert!(circle_hits_square(Vec2::new(137, 100), 20, square, 18));
        assert!(!circle_hits_square(Vec2::new(138, 100), 20, square, 18));
        // Corner: nearest point (118,118), offset (14,14) is inside the radius.
        assert!(circle_hits_square(Vec2::new(132, 132), 20, square, 18));
        assert!(!circle_hits_square(Vec2::new(134, 134), 20, square, 18));
    }
}
