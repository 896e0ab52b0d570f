//! # Cube Grid
//!
//! The 6 x N x N cell store and the mechanical rotation transformations.
//!
//! This module is pure data manipulation: it performs no locking and makes
//! no admission decisions. Callers (the [`Cube`](crate::Cube) facade) must
//! guarantee that every slice an operation touches is held exclusively, and
//! that a full-grid read never overlaps a mutation.
//!
//! Cells are stored as relaxed atomics so that two rotations of *disjoint*
//! slices may run from parallel threads without `unsafe` aliasing; the
//! cross-thread ordering that makes the values visible is provided entirely
//! by the sync layer's locks, never by the grid itself. Slice reads always
//! copy values out - nothing ever aliases the live grid during a mutation.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

use crate::geometry::{Color, Face, SliceOrient, SpinDirection, RING_TABLE};

/// The mutable 6 x N x N color grid.
///
/// Cells are laid out face-major, row-major, column-major in one flat
/// allocation; face `f` starts uniformly colored `f`.
pub struct CubeGrid {
    size: usize,
    cells: Box<[AtomicU8]>,
}

impl CubeGrid {
    /// Creates a solved grid of edge length `size`.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero.
    #[must_use]
    pub fn new(size: usize) -> Self {
        assert!(size >= 1, "cube size must be at least 1");
        let area = size * size;
        let cells = Face::ALL
            .iter()
            .flat_map(|&face| (0..area).map(move |_| AtomicU8::new(face.id())))
            .collect();
        Self { size, cells }
    }

    /// Edge length N of the cube.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn offset(&self, face: Face, row: usize, col: usize) -> usize {
        (face.index() * self.size + row) * self.size + col
    }

    /// Reads one cell.
    #[inline]
    #[must_use]
    pub fn get(&self, face: Face, row: usize, col: usize) -> Color {
        self.cells[self.offset(face, row, col)].load(Ordering::Relaxed)
    }

    #[inline]
    fn set(&self, face: Face, row: usize, col: usize, value: Color) {
        self.cells[self.offset(face, row, col)].store(value, Ordering::Relaxed);
    }

    /// Copies one row or column out of a face, in the given orientation.
    #[must_use]
    pub fn read_slice(&self, face: Face, index: usize, orient: SliceOrient) -> Vec<Color> {
        let n = self.size;
        match orient {
            SliceOrient::Row => (0..n).map(|c| self.get(face, index, c)).collect(),
            SliceOrient::RowRev => (0..n).map(|c| self.get(face, index, n - 1 - c)).collect(),
            SliceOrient::Col => (0..n).map(|r| self.get(face, r, index)).collect(),
            SliceOrient::ColRev => (0..n).map(|r| self.get(face, n - 1 - r, index)).collect(),
        }
    }

    /// Overwrites one row or column of a face, in the given orientation.
    pub fn write_slice(&self, face: Face, index: usize, orient: SliceOrient, values: &[Color]) {
        let n = self.size;
        debug_assert_eq!(values.len(), n);
        match orient {
            SliceOrient::Row => {
                for (c, &v) in values.iter().enumerate() {
                    self.set(face, index, c, v);
                }
            }
            SliceOrient::RowRev => {
                for (c, &v) in values.iter().enumerate() {
                    self.set(face, index, n - 1 - c, v);
                }
            }
            SliceOrient::Col => {
                for (r, &v) in values.iter().enumerate() {
                    self.set(face, r, index, v);
                }
            }
            SliceOrient::ColRev => {
                for (r, &v) in values.iter().enumerate() {
                    self.set(face, n - 1 - r, index, v);
                }
            }
        }
    }

    /// Permutes a face's own cells by 90 degrees, in place.
    pub fn spin_face(&self, face: Face, direction: SpinDirection) {
        let n = self.size;
        let old: Vec<Color> = (0..n * n).map(|i| self.get(face, i / n, i % n)).collect();
        for r in 0..n {
            for c in 0..n {
                let v = match direction {
                    SpinDirection::Clockwise => old[(n - 1 - c) * n + r],
                    SpinDirection::CounterClockwise => old[c * n + (n - 1 - r)],
                };
                self.set(face, r, c, v);
            }
        }
    }

    /// Applies the full rotation command for `(face, layer)`.
    ///
    /// The four ring slices named by [`RING_TABLE`] shift cyclically: ring
    /// position `i` receives the values read from position `(i + 3) % 4`,
    /// written forward at the same depth. A boundary layer additionally
    /// spins a cap: layer 0 spins `face` clockwise, layer `N-1` spins the
    /// opposite face counter-clockwise (on a size-1 cube only the near cap
    /// spins).
    ///
    /// The caller must hold this slice's layer lock and axis admission.
    pub fn rotate_layer(&self, face: Face, layer: usize) {
        let n = self.size;
        debug_assert!(layer < n);
        let ring = &RING_TABLE[face.index()];
        let reads: Vec<Vec<Color>> = ring
            .iter()
            .map(|entry| self.read_slice(entry.face, entry.depth(layer, n), entry.orient))
            .collect();
        for (i, entry) in ring.iter().enumerate() {
            self.write_slice(
                entry.face,
                entry.depth(layer, n),
                entry.orient.forward(),
                &reads[(i + 3) % 4],
            );
        }
        if layer == 0 {
            self.spin_face(face, SpinDirection::Clockwise);
        } else if layer == n - 1 {
            self.spin_face(face.opposite(), SpinDirection::CounterClockwise);
        }
    }

    /// Copies every cell into an immutable [`Snapshot`].
    ///
    /// The caller must guarantee no rotation is mutating the grid.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            size: self.size,
            cells: self
                .cells
                .iter()
                .map(|cell| cell.load(Ordering::Relaxed))
                .collect(),
        }
    }
}

/// An immutable copy of all 6 x N x N cells, face-major, row-major,
/// column-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    size: usize,
    cells: Vec<Color>,
}

impl Snapshot {
    /// Edge length N of the snapshotted cube.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// All cells in storage order.
    #[inline]
    #[must_use]
    pub fn cells(&self) -> &[Color] {
        &self.cells
    }

    /// Consumes the snapshot, returning the flat cell vector.
    #[inline]
    #[must_use]
    pub fn into_cells(self) -> Vec<Color> {
        self.cells
    }

    /// Reads one cell.
    #[inline]
    #[must_use]
    pub fn get(&self, face: Face, row: usize, col: usize) -> Color {
        self.cells[(face.index() * self.size + row) * self.size + col]
    }

    /// All cells of one face, row-major.
    #[must_use]
    pub fn face(&self, face: Face) -> &[Color] {
        let area = self.size * self.size;
        let start = face.index() * area;
        &self.cells[start..start + area]
    }

    /// Whether every face is uniformly colored.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        Face::ALL
            .iter()
            .all(|&f| self.face(f).iter().all(|&c| c == self.face(f)[0]))
    }
}

/// Renders the snapshot as one digit per cell in storage order. Only
/// meaningful while every color id is a single digit, which holds for the
/// canonical `0..=5` ids.
impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &cell in &self.cells {
            write!(f, "{}", char::from(b'0' + cell))?;
        }
        Ok(())
    }
}
