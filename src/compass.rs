use crate::grid::GridCoordinate;

/// The four cardinal directions a passage can be carved in.
///
/// Each direction owns a fixed wall bit (the classic 1/2/4/8 encoding stored
/// in a grid cell's bitmask), a fixed `(dx, dy)` coordinate offset and a
/// fixed opposite.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug)]
pub enum GridDirection {
    North,
    South,
    East,
    West,
}

pub const DIRECTIONS: [GridDirection; 4] = [
    GridDirection::North,
    GridDirection::South,
    GridDirection::East,
    GridDirection::West,
];

impl GridDirection {
    /// The bit this direction occupies in a cell's wall bitmask.
    #[inline]
    pub fn wall_bit(self) -> u8 {
        match self {
            GridDirection::North => 1,
            GridDirection::South => 2,
            GridDirection::East => 4,
            GridDirection::West => 8,
        }
    }

    #[inline]
    pub fn opposite(self) -> GridDirection {
        match self {
            GridDirection::North => GridDirection::South,
            GridDirection::South => GridDirection::North,
            GridDirection::East => GridDirection::West,
            GridDirection::West => GridDirection::East,
        }
    }

    /// Column offset when moving one cell in this direction.
    #[inline]
    pub fn dx(self) -> isize {
        match self {
            GridDirection::East => 1,
            GridDirection::West => -1,
            _ => 0,
        }
    }

    /// Row offset when moving one cell in this direction. North is up, so
    /// it decreases y.
    #[inline]
    pub fn dy(self) -> isize {
        match self {
            GridDirection::North => -1,
            GridDirection::South => 1,
            _ => 0,
        }
    }
}

pub fn offset_coordinate(coord: GridCoordinate, dir: GridDirection) -> GridCoordinate {
    GridCoordinate::new(coord.x + dir.dx(), coord.y + dir.dy())
}

/// The direction leading from `from` to an adjacent coordinate `to`, or
/// `None` if the two coordinates are not orthogonal neighbours.
pub fn direction_between(from: GridCoordinate, to: GridCoordinate) -> Option<GridDirection> {
    match (to.x - from.x, to.y - from.y) {
        (1, 0) => Some(GridDirection::East),
        (-1, 0) => Some(GridDirection::West),
        (0, 1) => Some(GridDirection::South),
        (0, -1) => Some(GridDirection::North),
        _ => None,
    }
}
