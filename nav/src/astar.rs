//! Grid A* with diagonal movement and two-stage path post-processing.
//!
//! The searcher works on a rectangular grid of [`Tile`] seeds. Diagonal steps
//! are allowed but may not cut past a blocked cardinal neighbor. Raw cell
//! paths are compressed (collinear triples removed) and then pruned with a
//! Bresenham line-of-sight pass so the returned waypoints hug corners instead
//! of stair-stepping through open space.

/// Static per-cell data the searcher reads: whether the cell is covered by an
/// obstacle and its terrain cost multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub blocked: bool,
    pub weight: i32,
}

impl Default for Tile {
    fn default() -> Self {
        Self {
            blocked: false,
            weight: 1,
        }
    }
}

/// Per-search state of one cell. Rebuilt from the tile seeds on every
/// invocation, so a search never observes a previous search's costs.
#[derive(Debug, Clone, Copy)]
struct AstarNode {
    x: i32,
    y: i32,
    g: i32,
    h: i32,
    f: i32,
    visited: bool,
    in_open: bool,
    blocked: bool,
    weight: i32,
    parent: Option<(i32, i32)>,
}

#[derive(Debug, Clone)]
struct CachedPath {
    start: (i32, i32),
    end: (i32, i32),
    path: Vec<(i32, i32)>,
}

#[derive(Debug)]
pub struct GridPathfinder {
    width: i32,
    height: i32,
    entity_width: i32,
    entity_height: i32,
    tiles: Vec<Tile>,
    cache: Option<CachedPath>,
}

impl GridPathfinder {
    /// `entity_width`/`entity_height` describe the moving entity's footprint
    /// in tiles; the goal test and line-of-sight checks use the whole
    /// footprint anchored at the queried cell.
    pub fn new(width: i32, height: i32, entity_width: i32, entity_height: i32) -> Self {
        Self {
            width: width.max(0),
            height: height.max(0),
            entity_width: entity_width.max(1),
            entity_height: entity_height.max(1),
            tiles: Vec::new(),
            cache: None,
        }
    }

    /// Replaces the tile seeds. `tiles` must hold `width * height` entries in
    /// row-major order (`y * width + x`).
    pub fn set_tile_map(&mut self, tiles: Vec<Tile>) {
        debug_assert_eq!(tiles.len(), (self.width * self.height) as usize);
        self.tiles = tiles;
        self.cache = None;
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Finds a path of grid cells from start to goal, inclusive.
    ///
    /// Returns an empty list when the map is empty, the goal footprint is
    /// blocked, or the goal is unreachable. A degenerate query (start equals
    /// goal) returns the single start cell. Repeating the previous query
    /// returns the cached waypoints without searching again.
    pub fn new_path(&mut self, sx: i32, sy: i32, ex: i32, ey: i32) -> Vec<(i32, i32)> {
        if self.tiles.is_empty() {
            return Vec::new();
        }

        if self.is_blocked(ex, ey) {
            return Vec::new();
        }

        if let Some(cached) = &self.cache {
            if cached.start == (sx, sy) && cached.end == (ex, ey) {
                return cached.path.clone();
            }
        }

        let path = if (sx, sy) == (ex, ey) {
            vec![(sx, sy)]
        } else {
            self.search(sx, sy, ex, ey)
        };

        self.cache = Some(CachedPath {
            start: (sx, sy),
            end: (ex, ey),
            path: path.clone(),
        });

        path
    }

    /// Entity-footprint blocked test against the tile seeds: the cell is
    /// blocked if any covered tile is out of bounds or marked.
    pub fn is_blocked(&self, x: i32, y: i32) -> bool {
        if self.tiles.is_empty() {
            return true;
        }

        for i in 0..self.entity_width {
            for j in 0..self.entity_height {
                let tx = x + i;
                let ty = y + j;

                if tx < 0 || ty < 0 || tx >= self.width || ty >= self.height {
                    return true;
                }

                if self.tiles[(ty * self.width + tx) as usize].blocked {
                    return true;
                }
            }
        }
        false
    }

    fn idx(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && x < self.width && y >= 0 && y < self.height {
            Some((y * self.width + x) as usize)
        } else {
            None
        }
    }

    fn search(&self, sx: i32, sy: i32, ex: i32, ey: i32) -> Vec<(i32, i32)> {
        let mut nodes: Vec<AstarNode> = Vec::with_capacity((self.width * self.height) as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                let blocked = self.is_blocked(x, y);
                let h = if blocked { 0 } else { phyt(x, y, ex, ey) };
                nodes.push(AstarNode {
                    x,
                    y,
                    g: 0,
                    h,
                    f: h,
                    visited: false,
                    in_open: false,
                    blocked,
                    weight: self.tiles[(y * self.width + x) as usize].weight,
                    parent: None,
                });
            }
        }

        let mut open: Vec<usize> = Vec::new();

        // The start expands unconditionally; it may itself sit on a blocked
        // footprint (clamped into a wall) and still path out of it.
        if let Some(start) = self.idx(sx, sy) {
            if !nodes[start].blocked {
                nodes[start].visited = true;
            }
            self.expand(&mut nodes, &mut open, start);
        }

        loop {
            let Some(current) = pop_lowest(&mut nodes, &mut open) else {
                return Vec::new();
            };

            if (nodes[current].x, nodes[current].y) == (ex, ey) {
                return self.backtrack(&nodes, current);
            }

            self.expand(&mut nodes, &mut open, current);
        }
    }

    /// Relaxes the 8-neighborhood of `current`.
    fn expand(&self, nodes: &mut [AstarNode], open: &mut Vec<usize>, current: usize) {
        let (cx, cy) = (nodes[current].x, nodes[current].y);
        let current_g = nodes[current].g;

        for ny in (cy - 1)..=(cy + 1) {
            for nx in (cx - 1)..=(cx + 1) {
                let Some(n) = self.idx(nx, ny) else {
                    continue;
                };
                if n == current || nodes[n].blocked || nodes[n].visited {
                    continue;
                }
                if !self.diagonal_allowed(nodes, cx, cy, nx, ny) {
                    continue;
                }

                let move_cost = phyt(nx, ny, cx, cy) * nodes[n].weight;
                let new_g = current_g + move_cost;

                if !nodes[n].in_open || nodes[n].g > new_g {
                    nodes[n].g = new_g;
                    nodes[n].f = new_g + nodes[n].h;
                    nodes[n].parent = Some((cx, cy));
                }

                if !nodes[n].in_open {
                    nodes[n].in_open = true;
                    open.push(n);
                }
            }
        }
    }

    /// A diagonal step may not cut the corner past a blocked cardinal cell.
    fn diagonal_allowed(&self, nodes: &[AstarNode], px: i32, py: i32, nx: i32, ny: i32) -> bool {
        let dx = px - nx;
        let dy = py - ny;

        if dx != 0 && dy != 0 {
            if let Some(t) = self.idx(nx + dx, ny) {
                if nodes[t].blocked {
                    return false;
                }
            }
            if let Some(t) = self.idx(nx, ny + dy) {
                if nodes[t].blocked {
                    return false;
                }
            }
        }
        true
    }

    fn backtrack(&self, nodes: &[AstarNode], goal: usize) -> Vec<(i32, i32)> {
        let mut path = Vec::new();
        let mut cursor = Some((nodes[goal].x, nodes[goal].y));

        while let Some((x, y)) = cursor {
            path.push((x, y));
            cursor = self.idx(x, y).and_then(|i| nodes[i].parent);
        }

        path.reverse();

        if path.len() < 3 {
            return path;
        }

        // Drop intermediate points that continue a straight run.
        let mut filtered: Vec<(i32, i32)> = vec![path[0]];
        for i in 1..path.len() - 1 {
            if !is_collinear(*filtered.last().unwrap(), path[i], path[i + 1]) {
                filtered.push(path[i]);
            }
        }
        filtered.push(*path.last().unwrap());

        // Line-of-sight pruning: keep a waypoint only where the direct line
        // from the current anchor would clip a blocked cell.
        let mut optimized: Vec<(i32, i32)> = vec![filtered[0]];
        let mut anchor = 0;
        for i in 2..filtered.len() {
            if !self.has_line_of_sight(filtered[anchor], filtered[i]) {
                optimized.push(filtered[i - 1]);
                anchor = i - 1;
            }
        }
        optimized.push(*filtered.last().unwrap());

        optimized
    }

    /// Bresenham traversal between two cells using the entity-sized blocked
    /// test at every step.
    pub fn has_line_of_sight(&self, from: (i32, i32), to: (i32, i32)) -> bool {
        let (mut x0, mut y0) = from;
        let (x1, y1) = to;

        let dx = (x1 - x0).abs();
        let dy = (y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx - dy;

        loop {
            if self.is_blocked(x0, y0) {
                return false;
            }

            if x0 == x1 && y0 == y1 {
                break;
            }

            let e2 = 2 * err;
            if e2 > -dy {
                err -= dy;
                x0 += sx;
            }
            if e2 < dx {
                err += dx;
                y0 += sy;
            }
        }
        true
    }
}

/// Diagonal-distance heuristic: 14 per diagonal step, 10 per straight step.
pub fn phyt(ax: i32, ay: i32, bx: i32, by: i32) -> i32 {
    let dx = (ax - bx).abs();
    let dy = (ay - by).abs();

    14 * dx.min(dy) + 10 * (dx - dy).abs()
}

fn is_collinear(a: (i32, i32), b: (i32, i32), c: (i32, i32)) -> bool {
    (b.0 - a.0) * (c.1 - b.1) == (b.1 - a.1) * (c.0 - b.0)
}

/// Removes and returns the open node with the lowest `f`, breaking ties on
/// the lowest `h`. Linear scan keeps node selection fully deterministic.
fn pop_lowest(nodes: &mut [AstarNode], open: &mut Vec<usize>) -> Option<usize> {
    if open.is_empty() {
        return None;
    }

    let mut best = 0;
    for i in 1..open.len() {
        let (cand, cur) = (&nodes[open[i]], &nodes[open[best]]);
        if cand.f < cur.f || (cand.f == cur.f && cand.h < cur.h) {
            best = i;
        }
    }

    let chosen = open.swap_remove(best);
    nodes[chosen].visited = true;
    nodes[chosen].in_open = false;
    Some(chosen)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(width: i32, height: i32, blocked: &[(i32, i32)]) -> GridPathfinder {
        let mut tiles = vec![Tile::default(); (width * height) as usize];
        for (x, y) in blocked {
            tiles[(y * width + x) as usize].blocked = true;
        }

        let mut finder = GridPathfinder::new(width, height, 1, 1);
        finder.set_tile_map(tiles);
        finder
    }

    fn assert_path_valid(finder: &GridPathfinder, path: &[(i32, i32)]) {
        for pair in path.windows(2) {
            assert!(
                finder.has_line_of_sight(pair[0], pair[1]),
                "no line of sight between {:?} and {:?}",
                pair[0],
                pair[1]
            );
        }
        for triple in path.windows(3) {
            assert!(
                !is_collinear(triple[0], triple[1], triple[2]),
                "collinear triple {:?}",
                triple
            );
        }
    }

    #[test]
    fn phyt_matches_diagonal_distance() {
        for (ax, ay, bx, by) in [(0, 0, 3, 3), (0, 0, 5, 2), (4, 1, 1, 7), (-2, 0, 2, -3)] {
            let dx = (ax - bx).abs();
            let dy = (ay - by).abs();
            assert_eq!(phyt(ax, ay, bx, by), 14 * dx.min(dy) + 10 * (dx - dy).abs());
        }
        assert_eq!(phyt(0, 0, 0, 0), 0);
        assert_eq!(phyt(0, 0, 1, 1), 14);
        assert_eq!(phyt(0, 0, 4, 0), 40);
    }

    #[test]
    fn empty_map_yields_no_path() {
        let mut finder = GridPathfinder::new(4, 4, 1, 1);
        assert!(finder.new_path(0, 0, 3, 3).is_empty());
    }

    #[test]
    fn blocked_goal_yields_no_path() {
        let mut finder = grid(4, 4, &[(3, 3)]);
        assert!(finder.new_path(0, 0, 3, 3).is_empty());
    }

    #[test]
    fn same_cell_is_a_single_waypoint() {
        let mut finder = grid(4, 4, &[]);
        assert_eq!(finder.new_path(2, 2, 2, 2), vec![(2, 2)]);
    }

    #[test]
    fn open_grid_goes_straight() {
        let mut finder = grid(8, 8, &[]);
        let path = finder.new_path(0, 0, 7, 7);

        // A clean diagonal collapses to its two endpoints.
        assert_eq!(path.first(), Some(&(0, 0)));
        assert_eq!(path.last(), Some(&(7, 7)));
        assert_path_valid(&finder, &path);
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn wall_forces_a_detour() {
        // Vertical wall at x = 2 covering rows 0..=2; the gap is above it.
        let mut finder = grid(5, 5, &[(2, 0), (2, 1), (2, 2)]);
        let path = finder.new_path(0, 2, 4, 2);

        assert!(path.len() >= 3, "straight line must be rejected: {path:?}");
        assert_eq!(path.first(), Some(&(0, 2)));
        assert_eq!(path.last(), Some(&(4, 2)));
        assert!(
            path[1..path.len() - 1].iter().all(|p| p.1 >= 3),
            "every intermediate waypoint must clear the wall, got {path:?}"
        );
        assert_path_valid(&finder, &path);
    }

    #[test]
    fn fully_walled_goal_is_unreachable() {
        let mut finder = grid(5, 5, &[(3, 1), (4, 1), (3, 2), (3, 3), (4, 3)]);
        // (4, 2) is boxed in by walls and the map edge.
        assert!(finder.new_path(0, 0, 4, 2).is_empty());
    }

    #[test]
    fn diagonal_never_cuts_a_corner() {
        // Block the two cells that would let a diagonal squeeze through.
        let mut finder = grid(3, 3, &[(1, 0), (0, 1)]);
        let path = finder.new_path(0, 0, 2, 2);

        // The only way out of (0,0) is forbidden, corner cuts included.
        assert!(path.is_empty(), "corner cut slipped through: {path:?}");
    }

    #[test]
    fn repeated_queries_are_deterministic() {
        let mut finder = grid(9, 9, &[(4, 3), (4, 4), (4, 5), (2, 7)]);
        let first = finder.new_path(0, 4, 8, 4);
        let second = finder.new_path(0, 4, 8, 4);
        assert_eq!(first, second);

        // A fresh searcher over the same seeds agrees as well.
        let mut again = grid(9, 9, &[(4, 3), (4, 4), (4, 5), (2, 7)]);
        assert_eq!(again.new_path(0, 4, 8, 4), first);
    }

    #[test]
    fn weighted_gap_steers_the_route() {
        // Wall at x = 2 with two gaps: a cheap one at the top and a swamp
        // tile at the bottom. The nearer swamp gap must lose to the far one.
        let width = 5;
        let mut tiles = vec![Tile::default(); 5 * 5];
        for y in 1..4 {
            tiles[(y * width + 2) as usize].blocked = true;
        }
        tiles[(4 * width + 2) as usize].weight = 50;

        let mut finder = GridPathfinder::new(5, 5, 1, 1);
        finder.set_tile_map(tiles);

        let path = finder.new_path(0, 3, 4, 3);
        assert!(
            path.iter().any(|p| p.1 <= 1),
            "expected the route to climb to the cheap crossing, got {path:?}"
        );
        assert!(
            path.iter().all(|p| p.1 != 4),
            "the swamp gap should never be entered, got {path:?}"
        );
        assert_path_valid(&finder, &path);
    }

    #[test]
    fn entity_footprint_widens_the_blocked_test() {
        let mut tiles = vec![Tile::default(); 4 * 4];
        tiles[(1 * 4 + 1) as usize].blocked = true;

        let mut finder = GridPathfinder::new(4, 4, 2, 2);
        finder.set_tile_map(tiles);

        // Any anchor whose 2x2 footprint overlaps (1,1) is blocked.
        assert!(finder.is_blocked(0, 0));
        assert!(finder.is_blocked(1, 1));
        assert!(!finder.is_blocked(2, 2));
        // Footprints poking past the map edge are blocked too.
        assert!(finder.is_blocked(3, 3));
    }
}
