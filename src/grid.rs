use crate::compass::{offset_coordinate, GridDirection, DIRECTIONS};
use crate::errors::{MazeError, Result};
use smallvec::SmallVec;

#[derive(Hash, Eq, PartialEq, Debug, Copy, Clone, Ord, PartialOrd)]
pub struct GridCoordinate {
    pub x: isize,
    pub y: isize,
}
impl GridCoordinate {
    pub fn new(x: isize, y: isize) -> GridCoordinate {
        GridCoordinate { x, y }
    }
}
pub type CoordinateSmallVec = SmallVec<[GridCoordinate; 4]>;

/// A `width x height` rectangle of cells, each holding a wall bitmask.
///
/// A zero mask means the cell is fully walled in (unvisited). A set
/// direction bit means an open passage towards that neighbour. Passages are
/// always mutually consistent: a cell has a direction bit set iff the
/// neighbour in that direction has the opposite bit set.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct MazeGrid {
    cells: Vec<u8>,
    width: usize,
    height: usize,
}

impl MazeGrid {
    pub fn new(width: isize, height: isize) -> Result<MazeGrid> {
        if width <= 0 || height <= 0 {
            return Err(MazeError::InvalidDimension { width, height });
        }
        Ok(MazeGrid {
            cells: vec![0; (width * height) as usize],
            width: width as usize,
            height: height as usize,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.width * self.height
    }

    /// The current wall bitmask of a cell.
    ///
    /// Panics if the coordinate is out of range - all callers are internal
    /// and must bounds-check first.
    #[inline]
    pub fn wall_mask(&self, coord: GridCoordinate) -> u8 {
        self.cells[self.cell_index(coord)]
    }

    /// Has any passage been carved from this cell yet?
    #[inline]
    pub fn is_carved(&self, coord: GridCoordinate) -> bool {
        self.wall_mask(coord) != 0
    }

    #[inline]
    pub fn is_passage_open(&self, coord: GridCoordinate, direction: GridDirection) -> bool {
        self.wall_mask(coord) & direction.wall_bit() != 0
    }

    /// Knock down the wall between a cell and its neighbour in `direction`,
    /// setting both sides of the passage in the same step.
    ///
    /// Panics if the neighbour is out of bounds - callers must bounds-check
    /// before carving.
    pub fn open_passage(&mut self, coord: GridCoordinate, direction: GridDirection) {
        let neighbour = self
            .neighbour_at_direction(coord, direction)
            .expect("open_passage neighbour must be in bounds");
        let cell = self.cell_index(coord);
        let other = self.cell_index(neighbour);
        self.cells[cell] |= direction.wall_bit();
        self.cells[other] |= direction.opposite().wall_bit();
    }

    /// Cell nodes that are to the North, South, East or West of a particular
    /// node, but not necessarily joined by a passage.
    pub fn neighbours(&self, coord: GridCoordinate) -> CoordinateSmallVec {
        DIRECTIONS
            .iter()
            .filter_map(|dir| self.neighbour_at_direction(coord, *dir))
            .collect()
    }

    pub fn neighbour_at_direction(
        &self,
        coord: GridCoordinate,
        direction: GridDirection,
    ) -> Option<GridCoordinate> {
        let neighbour_coord = offset_coordinate(coord, direction);
        if self.is_valid_coordinate(neighbour_coord) {
            Some(neighbour_coord)
        } else {
            None
        }
    }

    pub fn is_valid_coordinate(&self, coord: GridCoordinate) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && coord.x < self.width as isize
            && coord.y < self.height as isize
    }

    /// Count of open passages, each mutual passage counted once.
    pub fn links_count(&self) -> usize {
        let bits: usize = self
            .cells
            .iter()
            .map(|mask| mask.count_ones() as usize)
            .sum();
        // each passage sets one bit on both of its cells
        bits / 2
    }

    pub fn iter(&self) -> CellIter {
        CellIter {
            current_cell_number: 0,
            width: self.width,
            cells_count: self.size(),
        }
    }

    pub fn iter_row(&self) -> BatchIter {
        BatchIter {
            current_row: 0,
            width: self.width,
            height: self.height,
        }
    }

    #[inline]
    fn cell_index(&self, coord: GridCoordinate) -> usize {
        assert!(self.is_valid_coordinate(coord),
                "coordinate out of range for grid");
        (coord.y as usize * self.width) + coord.x as usize
    }
}

/// Row-major (top-to-bottom, left-to-right) walk over all cell coordinates.
#[derive(Debug, Copy, Clone)]
pub struct CellIter {
    current_cell_number: usize,
    width: usize,
    cells_count: usize,
}
impl Iterator for CellIter {
    type Item = GridCoordinate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cell_number < self.cells_count {
            let coord = index_to_grid_coordinate(self.width, self.current_cell_number);
            self.current_cell_number += 1;
            Some(coord)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower_bound = self.cells_count - self.current_cell_number;
        (lower_bound, Some(lower_bound))
    }
}

// Converting the Grid into an iterator (CellIter - the default most sensible)
impl<'a> IntoIterator for &'a MazeGrid {
    type Item = GridCoordinate;
    type IntoIter = CellIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterates over the grid one row of coordinates at a time.
#[derive(Debug, Copy, Clone)]
pub struct BatchIter {
    current_row: usize,
    width: usize,
    height: usize,
}
impl Iterator for BatchIter {
    type Item = Vec<GridCoordinate>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_row < self.height {
            let y = self.current_row as isize;
            let coords = (0..self.width)
                .map(|x| GridCoordinate::new(x as isize, y))
                .collect();
            self.current_row += 1;
            Some(coords)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower_bound = self.height - self.current_row;
        (lower_bound, Some(lower_bound))
    }
}

fn index_to_grid_coordinate(width: usize, one_dimensional_index: usize) -> GridCoordinate {
    let y = one_dimensional_index / width;
    let x = one_dimensional_index - (y * width);
    GridCoordinate {
        x: x as isize,
        y: y as isize,
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use itertools::Itertools;

    #[test]
    fn dimensions_must_be_positive() {
        assert_eq!(MazeGrid::new(0, 5).unwrap_err(),
                   MazeError::InvalidDimension { width: 0, height: 5 });
        assert_eq!(MazeGrid::new(4, -1).unwrap_err(),
                   MazeError::InvalidDimension { width: 4, height: -1 });
        assert_eq!(MazeGrid::new(-3, -3).unwrap_err(),
                   MazeError::InvalidDimension { width: -3, height: -3 });
        assert!(MazeGrid::new(1, 1).is_ok());
    }

    #[test]
    fn new_grid_is_fully_walled() {
        let g = MazeGrid::new(4, 3).unwrap();
        assert_eq!(g.size(), 12);
        for coord in g.iter() {
            assert_eq!(g.wall_mask(coord), 0);
            assert!(!g.is_carved(coord));
        }
        assert_eq!(g.links_count(), 0);
    }

    #[test]
    fn neighbour_cells() {
        let g = MazeGrid::new(10, 10).unwrap();

        let check_expected_neighbours = |coord, expected_neighbours: &[GridCoordinate]| {
            let neighbours: Vec<GridCoordinate> =
                g.neighbours(coord).iter().cloned().sorted().collect();
            let expected: Vec<GridCoordinate> =
                expected_neighbours.iter().cloned().sorted().collect();
            assert_eq!(neighbours, expected);
        };
        let gc = |x, y| GridCoordinate::new(x, y);

        // corners
        check_expected_neighbours(gc(0, 0), &[gc(1, 0), gc(0, 1)]);
        check_expected_neighbours(gc(9, 0), &[gc(8, 0), gc(9, 1)]);
        check_expected_neighbours(gc(0, 9), &[gc(0, 8), gc(1, 9)]);
        check_expected_neighbours(gc(9, 9), &[gc(9, 8), gc(8, 9)]);

        // side element examples
        check_expected_neighbours(gc(1, 0), &[gc(0, 0), gc(1, 1), gc(2, 0)]);
        check_expected_neighbours(gc(0, 1), &[gc(0, 0), gc(0, 2), gc(1, 1)]);

        // Some place with 4 neighbours inside the grid
        check_expected_neighbours(gc(1, 1), &[gc(0, 1), gc(1, 0), gc(2, 1), gc(1, 2)]);
    }

    #[test]
    fn neighbour_at_dir() {
        let g = MazeGrid::new(2, 2).unwrap();
        let gc = |x, y| GridCoordinate::new(x, y);
        let check_neighbour = |coord, dir: GridDirection, expected| {
            assert_eq!(g.neighbour_at_direction(coord, dir), expected);
        };
        check_neighbour(gc(0, 0), GridDirection::North, None);
        check_neighbour(gc(0, 0), GridDirection::South, Some(gc(0, 1)));
        check_neighbour(gc(0, 0), GridDirection::East, Some(gc(1, 0)));
        check_neighbour(gc(0, 0), GridDirection::West, None);

        check_neighbour(gc(1, 1), GridDirection::North, Some(gc(1, 0)));
        check_neighbour(gc(1, 1), GridDirection::South, None);
        check_neighbour(gc(1, 1), GridDirection::East, None);
        check_neighbour(gc(1, 1), GridDirection::West, Some(gc(0, 1)));
    }

    #[test]
    fn open_passage_sets_both_sides() {
        let mut g = MazeGrid::new(3, 3).unwrap();
        let a = GridCoordinate::new(1, 1);

        for dir in &DIRECTIONS {
            g.open_passage(a, *dir);
            let neighbour = g.neighbour_at_direction(a, *dir).unwrap();
            assert!(g.is_passage_open(a, *dir));
            assert!(g.is_passage_open(neighbour, dir.opposite()));
        }
        // one bit per direction on the centre cell, one on each neighbour
        assert_eq!(g.wall_mask(a), 0b1111);
        assert_eq!(g.links_count(), 4);
    }

    #[test]
    fn opening_a_passage_twice_changes_nothing() {
        let mut g = MazeGrid::new(2, 1).unwrap();
        let a = GridCoordinate::new(0, 0);
        g.open_passage(a, GridDirection::East);
        g.open_passage(a, GridDirection::East);
        assert_eq!(g.links_count(), 1);
    }

    #[test]
    #[should_panic]
    fn wall_mask_out_of_range_is_a_programming_error() {
        let g = MazeGrid::new(2, 2).unwrap();
        g.wall_mask(GridCoordinate::new(2, 0));
    }

    #[test]
    #[should_panic]
    fn open_passage_off_grid_is_a_programming_error() {
        let mut g = MazeGrid::new(2, 2).unwrap();
        g.open_passage(GridCoordinate::new(0, 0), GridDirection::North);
    }

    #[test]
    fn cell_iter() {
        let g = MazeGrid::new(2, 2).unwrap();
        assert_eq!(g.iter().collect::<Vec<GridCoordinate>>(),
                   &[GridCoordinate::new(0, 0),
                     GridCoordinate::new(1, 0),
                     GridCoordinate::new(0, 1),
                     GridCoordinate::new(1, 1)]);
    }

    #[test]
    fn cell_iter_covers_rectangles() {
        let g = MazeGrid::new(3, 2).unwrap();
        let coords: Vec<GridCoordinate> = g.iter().collect();
        assert_eq!(coords.len(), 6);
        assert_eq!(coords[0], GridCoordinate::new(0, 0));
        assert_eq!(coords[2], GridCoordinate::new(2, 0));
        assert_eq!(coords[3], GridCoordinate::new(0, 1));
        assert_eq!(coords[5], GridCoordinate::new(2, 1));
    }

    #[test]
    fn row_iter() {
        let g = MazeGrid::new(2, 2).unwrap();
        assert_eq!(g.iter_row().collect::<Vec<Vec<GridCoordinate>>>(),
                   &[&[GridCoordinate::new(0, 0), GridCoordinate::new(1, 0)],
                     &[GridCoordinate::new(0, 1), GridCoordinate::new(1, 1)]]);
    }
}
