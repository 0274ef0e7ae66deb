// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tile permutation — which grid cell each scrambled chunk belongs in.
//
// The table is declared as data and checked once when it is built: every
// source cell appears exactly once, every target is hit exactly once, and
// applying the mapping twice gives back the starting cell. The 4x4 table is
// specific to this publisher; no rule for other grid sizes is assumed.

use pagewerk_core::error::{PagewerkError, Result};

/// Rows of the scrambled grid.
pub const GRID_ROWS: u32 = 4;

/// Columns of the scrambled grid.
pub const GRID_COLS: u32 = 4;

/// A grid cell, 1-based `(row, col)`.
pub type Cell = (u32, u32);

/// Source cell -> restored cell for the publisher's scheme.
///
/// Diagonal cells stay put, off-diagonal cells swap with their transpose.
const RESTORE_TABLE: [(Cell, Cell); 16] = [
    ((1, 1), (1, 1)),
    ((2, 2), (2, 2)),
    ((3, 3), (3, 3)),
    ((4, 4), (4, 4)),
    ((1, 2), (2, 1)),
    ((1, 3), (3, 1)),
    ((1, 4), (4, 1)),
    ((2, 1), (1, 2)),
    ((2, 3), (3, 2)),
    ((2, 4), (4, 2)),
    ((3, 1), (1, 3)),
    ((3, 2), (2, 3)),
    ((3, 4), (4, 3)),
    ((4, 1), (1, 4)),
    ((4, 2), (2, 4)),
    ((4, 3), (3, 4)),
];

/// Immutable, validated cell mapping over a `rows x cols` grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TilePermutation {
    rows: u32,
    cols: u32,
    /// Target cell for each source cell, in row-major source order.
    targets: Vec<Cell>,
}

impl TilePermutation {
    /// The publisher's 4x4 transpose-with-fixed-diagonal mapping.
    pub fn standard() -> Result<Self> {
        Self::from_table(GRID_ROWS, GRID_COLS, &RESTORE_TABLE)
    }

    /// Build and validate a mapping from `(source, target)` pairs.
    ///
    /// Fails unless the table covers every cell once, is a bijection, and is
    /// its own inverse.
    pub fn from_table(rows: u32, cols: u32, table: &[(Cell, Cell)]) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(PagewerkError::InvalidPermutation(format!(
                "empty grid {rows}x{cols}"
            )));
        }
        let cell_count = rows.checked_mul(cols).ok_or_else(|| {
            PagewerkError::InvalidPermutation(format!("grid {rows}x{cols} is too large"))
        })? as usize;
        if table.len() != cell_count {
            return Err(PagewerkError::InvalidPermutation(format!(
                "{} entries for a {rows}x{cols} grid",
                table.len()
            )));
        }

        let in_grid = |(r, c): Cell| (1..=rows).contains(&r) && (1..=cols).contains(&c);
        let slot = |(r, c): Cell| ((r - 1) * cols + (c - 1)) as usize;

        let mut targets: Vec<Option<Cell>> = vec![None; cell_count];
        let mut hit = vec![false; cell_count];

        for &(source, target) in table {
            if !in_grid(source) || !in_grid(target) {
                return Err(PagewerkError::InvalidPermutation(format!(
                    "{source:?} -> {target:?} leaves the grid"
                )));
            }
            if targets[slot(source)].replace(target).is_some() {
                return Err(PagewerkError::InvalidPermutation(format!(
                    "source {source:?} listed twice"
                )));
            }
            if std::mem::replace(&mut hit[slot(target)], true) {
                return Err(PagewerkError::InvalidPermutation(format!(
                    "target {target:?} used twice"
                )));
            }
        }

        // Every slot is filled: table.len() == cell_count and no duplicates.
        let targets: Vec<Cell> = targets.into_iter().flatten().collect();

        for (i, &target) in targets.iter().enumerate() {
            let back = targets[slot(target)];
            let source = (i as u32 / cols + 1, i as u32 % cols + 1);
            if back != source {
                return Err(PagewerkError::InvalidPermutation(format!(
                    "not self-inverse: {source:?} -> {target:?} -> {back:?}"
                )));
            }
        }

        Ok(Self {
            rows,
            cols,
            targets,
        })
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Restored position of the chunk found at `(row, col)` (1-based), or
    /// `None` outside the grid.
    pub fn target(&self, row: u32, col: u32) -> Option<Cell> {
        if !(1..=self.rows).contains(&row) || !(1..=self.cols).contains(&col) {
            return None;
        }
        self.targets
            .get(((row - 1) * self.cols + (col - 1)) as usize)
            .copied()
    }

    /// All `(source, target)` pairs in row-major source order.
    pub fn cells(&self) -> impl Iterator<Item = (Cell, Cell)> + '_ {
        self.targets.iter().enumerate().map(move |(i, &target)| {
            let i = i as u32;
            ((i / self.cols + 1, i % self.cols + 1), target)
        })
    }
}
