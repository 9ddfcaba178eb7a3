//! Built-in first generations
//!
//! Used when no seed image is configured, or when the configured image cannot
//! be decoded.

use rand::Rng;

use super::grid::CellGrid;

/// Classic Game of Life patterns
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SeedPattern {
    Empty,
    Random,
    Glider,
    Blinker,
    GosperGun,
}

/// Gosper glider gun, 36x9, rows counted downward from its top edge
const GOSPER_GUN: [(u32, u32); 36] = [
    (24, 0),
    (22, 1),
    (24, 1),
    (12, 2),
    (13, 2),
    (20, 2),
    (21, 2),
    (34, 2),
    (35, 2),
    (11, 3),
    (15, 3),
    (20, 3),
    (21, 3),
    (34, 3),
    (35, 3),
    (0, 4),
    (1, 4),
    (10, 4),
    (16, 4),
    (20, 4),
    (21, 4),
    (0, 5),
    (1, 5),
    (10, 5),
    (14, 5),
    (16, 5),
    (17, 5),
    (22, 5),
    (24, 5),
    (10, 6),
    (16, 6),
    (24, 6),
    (11, 7),
    (15, 7),
    (12, 8),
    (13, 8),
];

/// Glider heading down-right on screen, rows counted downward
const GLIDER: [(u32, u32); 5] = [(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)];

/// Probability of a cell being alive in the random pattern
const RANDOM_DENSITY: f64 = 0.3;

impl SeedPattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeedPattern::Empty => "Empty",
            SeedPattern::Random => "Random",
            SeedPattern::Glider => "Glider",
            SeedPattern::Blinker => "Blinker",
            SeedPattern::GosperGun => "Gosper Gun",
        }
    }

    /// Parse a config name, case-insensitively
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "empty" | "clear" | "" => Some(SeedPattern::Empty),
            "random" => Some(SeedPattern::Random),
            "glider" => Some(SeedPattern::Glider),
            "blinker" => Some(SeedPattern::Blinker),
            "gosper" | "gosper-gun" | "gosper_gun" | "gun" => Some(SeedPattern::GosperGun),
            _ => None,
        }
    }

    /// Build a grid of the given size holding this pattern
    ///
    /// Shapes that do not fit are clipped at the grid edge.
    pub fn build(&self, width: u32, height: u32) -> CellGrid {
        let mut grid = CellGrid::new(width, height);
        match self {
            SeedPattern::Empty => {}
            SeedPattern::Random => {
                let mut rng = rand::rng();
                grid.fill_with(|_, _| rng.random_bool(RANDOM_DENSITY));
            }
            SeedPattern::Glider => {
                let origin = (width / 2).saturating_sub(1);
                let top = (height / 2 + 1).min(height.saturating_sub(1));
                stamp(&mut grid, origin, top, &GLIDER);
            }
            SeedPattern::Blinker => {
                let center_x = width / 2;
                let center_y = height / 2;
                for dy in 0..3 {
                    let y = (center_y + dy).saturating_sub(1);
                    if center_x < width && y < height {
                        grid.set(center_x, y, true);
                    }
                }
            }
            SeedPattern::GosperGun => {
                let top = (height / 2 + 4).min(height.saturating_sub(1));
                stamp(&mut grid, 10.min(width.saturating_sub(1)), top, &GOSPER_GUN);
            }
        }
        grid
    }
}

/// Place a shape whose rows count downward from `top`
fn stamp(grid: &mut CellGrid, left: u32, top: u32, shape: &[(u32, u32)]) {
    for &(dx, dy) in shape {
        let x = left + dx;
        let Some(y) = top.checked_sub(dy) else {
            continue;
        };
        if x < grid.width() && y < grid.height() {
            grid.set(x, y, true);
        }
    }
}
