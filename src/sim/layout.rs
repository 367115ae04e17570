//! Static level geometry: rack rows and the exit region

use std::collections::HashSet;

use glam::IVec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{Cell, ExitRegion};

/// Vertical distance between procedural rack rows
const AISLE_HEIGHT: i32 = 4;
const RACK_ROWS: i32 = 4;
const GAP_WIDTH: i32 = 3;

/// Hand-authored boss floor: (row, gaps as half-open x ranges)
const FIXED_ROWS: [(i32, &[(i32, i32)]); 4] = [
    (3, &[(4, 7), (17, 20)]),
    (7, &[(10, 13)]),
    (11, &[(4, 7), (17, 20)]),
    (15, &[(10, 13)]),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutPolicy {
    /// Rack rows with one randomly placed gap each
    Procedural,
    /// Fixed rows with fixed gaps and a 2×2 exit
    Fixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutParams {
    pub width: i32,
    pub height: i32,
    pub policy: LayoutPolicy,
}

impl LayoutParams {
    pub fn exit(&self) -> ExitRegion {
        match self.policy {
            LayoutPolicy::Procedural => ExitRegion {
                origin: IVec2::new(self.width - 1, self.height / 2),
                size: 1,
            },
            LayoutPolicy::Fixed => ExitRegion {
                origin: IVec2::new(self.width - 2, self.height / 2 - 1),
                size: 2,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub racks: HashSet<Cell>,
    pub exit: ExitRegion,
}

/// Build the racks and exit for one level
pub fn generate_layout(params: &LayoutParams, rng: &mut Pcg32) -> Layout {
    let exit = params.exit();
    let mut racks = match params.policy {
        LayoutPolicy::Procedural => procedural_racks(params, &exit, rng),
        LayoutPolicy::Fixed => fixed_racks(params),
    };
    racks.retain(|cell| !exit.contains(*cell));

    log::debug!(
        "Layout {:?}: {} racks, exit at {}",
        params.policy,
        racks.len(),
        exit.origin
    );
    Layout { racks, exit }
}

fn procedural_racks(params: &LayoutParams, exit: &ExitRegion, rng: &mut Pcg32) -> HashSet<Cell> {
    let (w, h) = (params.width, params.height);
    let exit_rows = exit.origin.y..exit.origin.y + exit.size;
    let mut racks = HashSet::new();

    for i in 0..RACK_ROWS {
        let y = 2 + i * AISLE_HEIGHT;
        if y >= h - 1 || exit_rows.contains(&y) {
            continue;
        }

        let lo = w / 3;
        let hi = 2 * w / 3;
        let gap_start = if hi > lo { rng.random_range(lo..hi) } else { lo };

        for x in 1..w - 1 {
            if x < gap_start || x >= gap_start + GAP_WIDTH {
                racks.insert(IVec2::new(x, y));
            }
        }
    }
    racks
}

fn fixed_racks(params: &LayoutParams) -> HashSet<Cell> {
    let (w, h) = (params.width, params.height);
    let mut racks = HashSet::new();

    for (y, gaps) in FIXED_ROWS {
        if y >= h - 1 {
            continue;
        }
        for x in 1..w - 1 {
            if gaps.iter().all(|&(start, end)| x < start || x >= end) {
                racks.insert(IVec2::new(x, y));
            }
        }
    }
    racks
}
