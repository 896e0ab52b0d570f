//! # Cube Geometry
//!
//! Faces, axes, and the fixed rotation geometry of the 3-D embedding.
//!
//! ## Face layout
//!
//! ```text
//!             ┌────┐
//!             │ Up │              face ids:  Up=0  Left=1  Front=2
//!        ┌────┼────┼────┬────┐               Right=3 Back=4 Down=5
//!        │Left│Frnt│Rght│Back│
//!        └────┼────┼────┴────┘    opposite pairs: 0-5, 1-3, 2-4
//!             │Down│
//!             └────┘
//! ```
//!
//! Each face is an N x N grid of [`Color`] ids; cell `(row, col)` of face
//! `f` starts out colored `f`.
//!
//! ## The ring table
//!
//! Rotating layer `L` around a face cyclically shifts one slice of each of
//! the four faces adjacent to that face's axis. [`RING_TABLE`] records, per
//! face, the ordered ring of those four neighbours and how each neighbour's
//! slice is addressed: rows or columns, forward or reversed read order, and
//! whether the slice index is `L` or `N-1-L`. The table is a geometric
//! constant of the embedding above, transcribed once and never re-derived.
//! Writes always go forward; reversal is applied on the read side only.

use crate::error::CubeError;

/// Number of faces on the cube.
pub const FACE_COUNT: usize = 6;

/// A single cell color id, `0..=5`.
pub type Color = u8;

/// One of the six faces of the cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Face {
    /// Top face (id 0).
    Up = 0,
    /// Left face (id 1).
    Left = 1,
    /// Front face (id 2).
    Front = 2,
    /// Right face (id 3).
    Right = 3,
    /// Back face (id 4).
    Back = 4,
    /// Bottom face (id 5).
    Down = 5,
}

impl Face {
    /// All faces in id order.
    pub const ALL: [Self; FACE_COUNT] = [
        Self::Up,
        Self::Left,
        Self::Front,
        Self::Right,
        Self::Back,
        Self::Down,
    ];

    /// Face id as an array index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Face id as a color: the color every cell of this face starts with.
    #[inline]
    #[must_use]
    pub const fn id(self) -> Color {
        self as u8
    }

    /// Convert from a raw `u8` id. Returns `None` for values outside `0..=5`.
    #[inline]
    #[must_use]
    pub const fn from_index(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Up),
            1 => Some(Self::Left),
            2 => Some(Self::Front),
            3 => Some(Self::Right),
            4 => Some(Self::Back),
            5 => Some(Self::Down),
            _ => None,
        }
    }

    /// The face on the opposite side of the cube.
    #[inline]
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Left => Self::Right,
            Self::Front => Self::Back,
            Self::Right => Self::Left,
            Self::Back => Self::Front,
            Self::Down => Self::Up,
        }
    }

    /// The rotation axis this face caps.
    #[inline]
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::Up | Self::Down => Axis::UpDown,
            Self::Left | Self::Right => Axis::LeftRight,
            Self::Front | Self::Back => Axis::FrontBack,
        }
    }

    /// Whether this face views its axis from the far cap.
    ///
    /// The two caps of an axis address the same physical slice from
    /// opposite ends: layer `L` seen from a far cap is layer `N-1-L` seen
    /// from the near cap.
    #[inline]
    #[must_use]
    pub const fn is_far_cap(self) -> bool {
        matches!(self, Self::Right | Self::Back | Self::Down)
    }
}

impl TryFrom<u8> for Face {
    type Error = CubeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_index(value).ok_or(CubeError::InvalidFace(value))
    }
}

/// One of the three rotation axes. Each axis owns two opposite cap faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Axis {
    /// Axis through `Up` and `Down` (faces 0 and 5).
    UpDown = 0,
    /// Axis through `Left` and `Right` (faces 1 and 3).
    LeftRight = 1,
    /// Axis through `Front` and `Back` (faces 2 and 4).
    FrontBack = 2,
}

impl Axis {
    /// Number of rotation axes.
    pub const COUNT: usize = 3;

    /// Axis id as an array index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Physical slice depth shared by both caps of an axis.
///
/// Rotations of `(face, layer)` and `(face.opposite(), size-1-layer)` move
/// the same physical slice and must contend for the same layer lock.
#[inline]
#[must_use]
pub const fn physical_depth(face: Face, layer: usize, size: usize) -> usize {
    if face.is_far_cap() {
        size - 1 - layer
    } else {
        layer
    }
}

/// Direction of an in-place 90-degree face spin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinDirection {
    /// `new[r][c] = old[N-1-c][r]`.
    Clockwise,
    /// `new[r][c] = old[c][N-1-r]`.
    CounterClockwise,
}

/// How a neighbour slice is addressed when read out of its face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceOrient {
    /// Row `index`, columns `0..N`.
    Row,
    /// Row `index`, columns `N-1..=0`.
    RowRev,
    /// Column `index`, rows `0..N`.
    Col,
    /// Column `index`, rows `N-1..=0`.
    ColRev,
}

impl SliceOrient {
    /// The forward (unreversed) variant of this orientation. Ring writes
    /// always use it; reversal applies on the read side only.
    #[inline]
    #[must_use]
    pub const fn forward(self) -> Self {
        match self {
            Self::Row | Self::RowRev => Self::Row,
            Self::Col | Self::ColRev => Self::Col,
        }
    }
}

/// One neighbour entry in a face's rotation ring.
#[derive(Debug, Clone, Copy)]
pub struct RingSlice {
    /// The neighbour face holding this slice.
    pub face: Face,
    /// How the slice is read out of that face.
    pub orient: SliceOrient,
    /// Whether the slice index is `N-1-layer` instead of `layer`.
    pub inverted_depth: bool,
}

impl RingSlice {
    const fn new(face: Face, orient: SliceOrient, inverted_depth: bool) -> Self {
        Self {
            face,
            orient,
            inverted_depth,
        }
    }

    /// Resolves the slice index on the neighbour face for a rotation of
    /// `layer` on a cube of edge length `size`.
    #[inline]
    #[must_use]
    pub const fn depth(&self, layer: usize, size: usize) -> usize {
        if self.inverted_depth {
            size - 1 - layer
        } else {
            layer
        }
    }
}

/// The fixed adjacency-and-orientation table, one ring per face.
///
/// Rotating layer `L` of `face` shifts every ring entry's slice to the next
/// entry: position `i` receives the values read from position `(i + 3) % 4`.
/// Entries are listed in the embedding's shift order; reversals encode how
/// neighbouring faces' local coordinates meet along the ring.
pub const RING_TABLE: [[RingSlice; 4]; FACE_COUNT] = {
    use Face::{Back, Down, Front, Left, Right, Up};
    use SliceOrient::{Col, ColRev, Row, RowRev};
    [
        // Up: row `L` of the four side faces
        [
            RingSlice::new(Back, Row, false),
            RingSlice::new(Right, Row, false),
            RingSlice::new(Front, Row, false),
            RingSlice::new(Left, Row, false),
        ],
        // Left: column `L` of Up/Front/Down, column `N-1-L` of Back
        [
            RingSlice::new(Up, Col, false),
            RingSlice::new(Front, Col, false),
            RingSlice::new(Down, ColRev, false),
            RingSlice::new(Back, ColRev, true),
        ],
        // Front: row `N-1-L` of Up, column `L` of Right, row `L` of Down,
        // column `N-1-L` of Left
        [
            RingSlice::new(Up, Row, true),
            RingSlice::new(Right, ColRev, false),
            RingSlice::new(Down, Row, false),
            RingSlice::new(Left, ColRev, true),
        ],
        // Right: mirror of Left, indices counted from the far cap
        [
            RingSlice::new(Up, ColRev, true),
            RingSlice::new(Back, ColRev, false),
            RingSlice::new(Down, Col, true),
            RingSlice::new(Front, Col, true),
        ],
        // Back: mirror of Front
        [
            RingSlice::new(Up, RowRev, false),
            RingSlice::new(Left, Col, false),
            RingSlice::new(Down, RowRev, true),
            RingSlice::new(Right, Col, true),
        ],
        // Down: row `N-1-L` of the four side faces, reverse shift order
        [
            RingSlice::new(Front, Row, true),
            RingSlice::new(Right, Row, true),
            RingSlice::new(Back, Row, true),
            RingSlice::new(Left, Row, true),
        ],
    ]
};
