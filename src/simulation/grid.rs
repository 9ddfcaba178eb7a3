//! CPU reference automaton
//!
//! [`CellGrid`] is the host-side picture of one generation. It seeds the GPU
//! textures, decodes readbacks, and mirrors `life_step.wgsl` cell for cell so
//! the kernel has something exact to be checked against.
//!
//! Row 0 is the bottom row, matching the texel layout the presentation pass
//! samples and the y-up pointer coordinates.

use std::fmt;

/// Pointer brush applied on top of the Life rule
///
/// Built from the same `mouse` vector and `radius_mouse` scalar the kernel
/// receives. Cells whose center lies strictly within `radius` cells of the
/// pointer are forced alive while the primary button is held and forced dead
/// while only the secondary button is held.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brush {
    pub mouse: [f32; 4],
    pub radius: f32,
}

impl Brush {
    pub fn new(mouse: [f32; 4], radius: f32) -> Self {
        Self { mouse, radius }
    }

    /// Forced state for the cell at (x, y), if the brush touches it
    pub fn forced_state(&self, x: u32, y: u32, width: u32, height: u32) -> Option<bool> {
        let primary = self.mouse[2] > 0.5;
        let secondary = self.mouse[3] > 0.5;
        if !primary && !secondary {
            return None;
        }

        let pointer_x = self.mouse[0] * width as f32;
        let pointer_y = self.mouse[1] * height as f32;
        let dx = x as f32 + 0.5 - pointer_x;
        let dy = y as f32 + 0.5 - pointer_y;
        if (dx * dx + dy * dy).sqrt() >= self.radius {
            return None;
        }

        Some(primary)
    }
}

/// One generation of a toroidal Life grid
#[derive(Clone, PartialEq, Eq)]
pub struct CellGrid {
    width: u32,
    height: u32,
    cells: Vec<bool>,
}

impl CellGrid {
    /// All-dead grid
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![false; (width * height) as usize],
        }
    }

    /// Grid with the given (x, y) cells alive; out-of-range coordinates are ignored
    pub fn with_live_cells(width: u32, height: u32, live: &[(u32, u32)]) -> Self {
        let mut grid = Self::new(width, height);
        for &(x, y) in live {
            if x < width && y < height {
                grid.set(x, y, true);
            }
        }
        grid
    }

    /// Decode single-channel texels; anything above one half is alive
    pub fn from_texels(width: u32, height: u32, texels: &[f32]) -> Self {
        let mut grid = Self::new(width, height);
        for (cell, &value) in grid.cells.iter_mut().zip(texels) {
            *cell = value > 0.5;
        }
        grid
    }

    /// Encode as `R32Float` texels, row 0 first
    pub fn to_texels(&self) -> Vec<f32> {
        self.cells
            .iter()
            .map(|&alive| if alive { 1.0 } else { 0.0 })
            .collect()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y * self.width + x) as usize
    }

    pub fn get(&self, x: u32, y: u32) -> bool {
        self.cells[self.index(x, y)]
    }

    pub fn set(&mut self, x: u32, y: u32, alive: bool) {
        let index = self.index(x, y);
        self.cells[index] = alive;
    }

    /// Fill every cell from a predicate over (x, y)
    pub fn fill_with<F>(&mut self, mut alive: F)
    where
        F: FnMut(u32, u32) -> bool,
    {
        for y in 0..self.height {
            for x in 0..self.width {
                let index = self.index(x, y);
                self.cells[index] = alive(x, y);
            }
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(false);
    }

    /// Number of live cells
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&alive| alive).count()
    }

    pub fn is_dead(&self) -> bool {
        !self.cells.iter().any(|&alive| alive)
    }

    /// Live Moore neighbors of (x, y), wrapping at every edge
    pub fn live_neighbors(&self, x: u32, y: u32) -> u32 {
        let (width, height) = (self.width as i64, self.height as i64);
        let mut count = 0;
        for dy in -1..=1i64 {
            for dx in -1..=1i64 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                // Each offset wraps on its own, so tiny grids see the same cell twice
                let nx = (x as i64 + dx).rem_euclid(width) as u32;
                let ny = (y as i64 + dy).rem_euclid(height) as u32;
                if self.get(nx, ny) {
                    count += 1;
                }
            }
        }
        count
    }

    /// Next generation under the plain Life rule
    pub fn step(&self) -> Self {
        self.step_with(None)
    }

    /// Next generation, with an optional pointer brush overriding the rule
    pub fn step_with(&self, brush: Option<&Brush>) -> Self {
        let mut next = Self::new(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                let neighbors = self.live_neighbors(x, y);
                let mut alive = matches!((self.get(x, y), neighbors), (true, 2) | (_, 3));

                if let Some(forced) =
                    brush.and_then(|b| b.forced_state(x, y, self.width, self.height))
                {
                    alive = forced;
                }

                next.set(x, y, alive);
            }
        }
        next
    }
}

impl fmt::Debug for CellGrid {
    /// Top row first, `#` alive and `.` dead
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CellGrid {}x{}", self.width, self.height)?;
        for y in (0..self.height).rev() {
            for x in 0..self.width {
                f.write_str(if self.get(x, y) { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn only_cell_with_neighbors(alive: bool, neighbors: usize) -> CellGrid {
        // Center cell at (2, 2) of a 5x5 grid; neighbors taken in a fixed ring order
        let ring = [(1, 1), (2, 1), (3, 1), (1, 2), (3, 2), (1, 3), (2, 3), (3, 3)];
        let mut grid = CellGrid::with_live_cells(5, 5, &ring[..neighbors]);
        grid.set(2, 2, alive);
        grid
    }

    #[test]
    fn test_transition_table() {
        for neighbors in 0..=8 {
            let from_dead = only_cell_with_neighbors(false, neighbors).step();
            assert_eq!(
                from_dead.get(2, 2),
                neighbors == 3,
                "dead cell with {} neighbors",
                neighbors
            );

            let from_live = only_cell_with_neighbors(true, neighbors).step();
            assert_eq!(
                from_live.get(2, 2),
                neighbors == 2 || neighbors == 3,
                "live cell with {} neighbors",
                neighbors
            );
        }
    }

    #[test]
    fn test_all_dead_is_fixed_point() {
        let mut grid = CellGrid::new(16, 9);
        for _ in 0..10 {
            grid = grid.step();
        }
        assert!(grid.is_dead());
    }

    #[test]
    fn test_block_is_still_life() {
        let block = CellGrid::with_live_cells(6, 6, &[(2, 2), (3, 2), (2, 3), (3, 3)]);
        assert_eq!(block.step(), block);
    }

    #[test]
    fn test_blinker_has_period_two() {
        let blinker = CellGrid::with_live_cells(5, 5, &[(2, 1), (2, 2), (2, 3)]);
        let once = blinker.step();
        assert_ne!(once, blinker);
        assert_eq!(
            once,
            CellGrid::with_live_cells(5, 5, &[(1, 2), (2, 2), (3, 2)])
        );
        assert_eq!(once.step(), blinker);
    }

    #[test]
    fn test_neighbors_wrap_at_corners() {
        // The four corners of a torus are mutual neighbors
        let grid = CellGrid::with_live_cells(8, 8, &[(7, 0), (0, 7), (7, 7)]);
        assert_eq!(grid.live_neighbors(0, 0), 3);

        // Dead corner with three live wrapped neighbors is born
        assert!(grid.step().get(0, 0));
    }

    #[test]
    fn test_single_column_counts_every_offset() {
        // Width 1: left, self and right columns are the same cell
        let grid = CellGrid::with_live_cells(1, 5, &[(0, 1), (0, 2), (0, 3)]);
        assert_eq!(grid.live_neighbors(0, 1), 5);
        assert_eq!(grid.live_neighbors(0, 2), 8);
        assert_eq!(grid.live_neighbors(0, 3), 5);
        assert_eq!(grid.live_neighbors(0, 0), 6);
    }

    #[test]
    fn test_single_cell_grid_is_its_own_neighborhood() {
        let alive = CellGrid::with_live_cells(1, 1, &[(0, 0)]);
        assert_eq!(alive.live_neighbors(0, 0), 8);
        assert!(alive.step().is_dead());
    }

    #[test]
    fn test_blinker_across_edge() {
        // Horizontal blinker straddling the left/right seam
        let grid = CellGrid::with_live_cells(6, 6, &[(5, 3), (0, 3), (1, 3)]);
        let next = grid.step();
        assert_eq!(
            next,
            CellGrid::with_live_cells(6, 6, &[(0, 2), (0, 3), (0, 4)])
        );
        assert_eq!(next.step(), grid);
    }

    #[test]
    fn test_primary_brush_forces_alive() {
        let grid = CellGrid::new(32, 32);
        // Pointer at the grid center, primary held, radius 3 cells
        let brush = Brush::new([0.5, 0.5, 1.0, 0.0], 3.0);
        let next = grid.step_with(Some(&brush));

        assert!(next.get(16, 16));
        assert!(next.get(15, 15));
        assert!(next.get(17, 16));
        assert!(!next.get(16, 20));
        assert!(!next.get(0, 0));
        assert!(next.population() > 0);
    }

    #[test]
    fn test_secondary_brush_erases() {
        let mut grid = CellGrid::new(16, 16);
        grid.fill_with(|_, _| true);
        let brush = Brush::new([0.5, 0.5, 0.0, 1.0], 2.0);
        let next = grid.step_with(Some(&brush));
        assert!(!next.get(8, 8));
        assert!(!next.get(7, 7));
    }

    #[test]
    fn test_released_brush_is_inert() {
        let block = CellGrid::with_live_cells(6, 6, &[(2, 2), (3, 2), (2, 3), (3, 3)]);
        let brush = Brush::new([0.1, 0.9, 0.0, 0.0], 10.0);
        assert_eq!(block.step_with(Some(&brush)), block);
    }

    #[test]
    fn test_texel_round_trip_keeps_layout() {
        let grid = CellGrid::with_live_cells(4, 3, &[(0, 0), (3, 2)]);
        let texels = grid.to_texels();
        assert_eq!(texels[0], 1.0);
        assert_eq!(texels[11], 1.0);
        assert_eq!(texels.iter().filter(|&&t| t > 0.0).count(), 2);
        assert_eq!(CellGrid::from_texels(4, 3, &texels), grid);
    }
}
