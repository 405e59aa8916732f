//! Connection lines between nearby ambient particles.
//!
//! Every unordered pair closer than [`ConnectionConfig::distance`] gets a
//! line whose opacity falls linearly to zero at the threshold. The default
//! pass is a plain O(n²) loop, which is fine because the particle count is
//! capped. [`SpatialGrid`] buckets points into threshold-sized cells for
//! fields configured without a tight cap; it visits exactly the same pairs.

use crate::color::Color;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Connection line settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Pairs closer than this (pixels) are connected.
    pub distance: f32,
    /// Line opacity for two coincident particles.
    pub max_alpha: f32,
    /// Stroke width in pixels.
    pub width: f32,
    /// Line color. Its alpha is replaced per line.
    pub color: Color,
    /// Use a bucket grid instead of the all-pairs loop.
    pub spatial_grid: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            distance: 150.0,
            max_alpha: 0.15,
            width: 0.5,
            color: Color::rgb8(100, 255, 218, 1.0),
            spatial_grid: false,
        }
    }
}

impl ConnectionConfig {
    /// Opacity of a line between two particles `distance` apart, if one is drawn.
    #[inline]
    pub fn alpha(&self, distance: f32) -> Option<f32> {
        if self.distance > 0.0 && distance < self.distance {
            Some(self.max_alpha * (1.0 - distance / self.distance))
        } else {
            None
        }
    }
}

/// Call `f(i, j, distance)` for every unordered pair `i < j` closer than `max_distance`.
pub fn for_each_pair(points: &[Vec2], max_distance: f32, mut f: impl FnMut(usize, usize, f32)) {
    for i in 0..points.len() {
        for j in (i + 1)..points.len() {
            let d = points[i].distance(points[j]);
            if d < max_distance {
                f(i, j, d);
            }
        }
    }
}

/// Uniform bucket grid over the surface.
///
/// Cells are as wide as the query distance, so any pair within range lies
/// in the same or an adjacent cell. Points outside the surface are clamped
/// into the border cells.
#[derive(Debug, Clone, Default)]
pub struct SpatialGrid {
    cell_size: f32,
    cols: usize,
    rows: usize,
    cells: Vec<Vec<usize>>,
}

impl SpatialGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-bucket `points` for queries up to `cell_size` apart.
    pub fn rebuild(&mut self, points: &[Vec2], cell_size: f32, width: f32, height: f32) {
        self.cell_size = cell_size.max(1.0);
        self.cols = ((width.max(0.0) / self.cell_size).ceil() as usize).max(1);
        self.rows = ((height.max(0.0) / self.cell_size).ceil() as usize).max(1);

        let total = self.cols * self.rows;
        for cell in &mut self.cells {
            cell.clear();
        }
        self.cells.resize_with(total, Vec::new);

        for (i, p) in points.iter().enumerate() {
            let (col, row) = self.cell_of(*p);
            self.cells[row * self.cols + col].push(i);
        }
    }

    fn cell_of(&self, p: Vec2) -> (usize, usize) {
        let col = (p.x / self.cell_size).floor().max(0.0) as usize;
        let row = (p.y / self.cell_size).floor().max(0.0) as usize;
        (col.min(self.cols - 1), row.min(self.rows - 1))
    }

    /// Same contract as the free [`for_each_pair`], using the buckets from the last rebuild.
    ///
    /// `max_distance` must not exceed the cell size passed to [`rebuild`](Self::rebuild).
    pub fn for_each_pair(
        &self,
        points: &[Vec2],
        max_distance: f32,
        mut f: impl FnMut(usize, usize, f32),
    ) {
        // Forward half of the 3x3 neighbourhood, so each cell pair is visited once
        const FORWARD: [(isize, isize); 4] = [(1, 0), (-1, 1), (0, 1), (1, 1)];

        for row in 0..self.rows {
            for col in 0..self.cols {
                let here = &self.cells[row * self.cols + col];

                for (a, &i) in here.iter().enumerate() {
                    for &j in &here[a + 1..] {
                        emit(points, i, j, max_distance, &mut f);
                    }
                }

                for (dc, dr) in FORWARD {
                    let c = col as isize + dc;
                    let r = row as isize + dr;
                    if c < 0 || c >= self.cols as isize || r >= self.rows as isize {
                        continue;
                    }
                    let there = &self.cells[r as usize * self.cols + c as usize];
                    for &i in here {
                        for &j in there {
                            emit(points, i, j, max_distance, &mut f);
                        }
                    }
                }
            }
        }
    }
}

#[inline]
fn emit(points: &[Vec2], i: usize, j: usize, max_distance: f32, f: &mut impl FnMut(usize, usize, f32)) {
    let d = points[i].distance(points[j]);
    if d < max_distance {
        f(i.min(j), i.max(j), d);
    }
}
