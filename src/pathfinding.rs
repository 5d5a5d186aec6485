use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use crate::grid::Grid;

type Cell = (i32, i32);

fn manhattan(a: Cell, b: Cell) -> i32 {
    (a.0 - b.0).abs() + (a.1 - b.1).abs()
}

/// Empty when either end is off-grid, impassable, or unreachable.
pub fn shortest_path(grid: &Grid, from: Cell, to: Cell, gate_access: bool) -> Vec<Cell> {
    let passable = |cell: Cell| {
        grid.tile_at(cell.0, cell.1)
            .map(|tile| tile.is_passable(gate_access))
            .unwrap_or(false)
    };
    if !passable(from) || !passable(to) {
        return Vec::new();
    }

    let mut open = BinaryHeap::new();
    let mut came_from: HashMap<Cell, Cell> = HashMap::new();
    let mut cost_so_far: HashMap<Cell, i32> = HashMap::new();
    cost_so_far.insert(from, 0);
    open.push(Reverse((manhattan(from, to), 0, from)));

    while let Some(Reverse((_, cost, current))) = open.pop() {
        if current == to {
            let mut path = vec![current];
            let mut cursor = current;
            while let Some(prev) = came_from.get(&cursor) {
                path.push(*prev);
                cursor = *prev;
            }
            path.reverse();
            return path;
        }
        if cost > cost_so_far.get(&current).copied().unwrap_or(i32::MAX) {
            continue;
        }
        let (x, y) = current;
        for next in [(x - 1, y), (x + 1, y), (x, y - 1), (x, y + 1)] {
            if !passable(next) {
                continue;
            }
            let next_cost = cost + 1;
            if next_cost < cost_so_far.get(&next).copied().unwrap_or(i32::MAX) {
                cost_so_far.insert(next, next_cost);
                came_from.insert(next, current);
                open.push(Reverse((next_cost + manhattan(next, to), next_cost, next)));
            }
        }
    }

    Vec::new()
}
