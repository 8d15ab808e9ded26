use crate::compass::{direction_between, GridDirection, DIRECTIONS};
use crate::errors::Result;
use crate::grid::{CellIter, GridCoordinate, MazeGrid};
use crate::random::MazeRng;
use crate::unionfind::DisjointSet;
use itertools::Itertools;
use log::debug;
use smallvec::SmallVec;

/// The available maze carving algorithms.
///
/// All of them carve a perfect maze: a spanning tree of the grid graph, so
/// every cell is reachable from every other cell along exactly one route and
/// exactly `width * height - 1` passages are opened.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Strategy {
    Backtracker,
    BinaryTree,
    Prim,
    Kruskal,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::Backtracker,
        Strategy::BinaryTree,
        Strategy::Prim,
        Strategy::Kruskal,
    ];

    /// Build the carver for this strategy. Any set-up randomness (start
    /// cell selection, edge shuffling) is drawn from `rng` here, so stepwise
    /// and run-to-completion executions see identical draw sequences.
    pub fn carver(self, grid: &MazeGrid, rng: &mut MazeRng) -> Box<dyn Carver> {
        match self {
            Strategy::Backtracker => Box::new(Backtracker::new(rng)),
            Strategy::BinaryTree => Box::new(BinaryTree::new(grid)),
            Strategy::Prim => Box::new(Prim::new(grid, rng)),
            Strategy::Kruskal => Box::new(Kruskal::new(grid, rng)),
        }
    }

    /// Carve `grid` to completion.
    pub fn carve(self, grid: &mut MazeGrid, rng: &mut MazeRng) -> Result<()> {
        debug!("carving {:?} maze on a {}x{} grid",
               self,
               grid.width(),
               grid.height());
        let mut carver = self.carver(grid, rng);
        carver.carve_all(grid, rng)?;
        debug!("carved {} passages", grid.links_count());
        Ok(())
    }

    /// A lazy sequence of grid snapshots, one per carving step, for callers
    /// that want to observe or animate the run. The caller drives the
    /// iterator and decides its own pacing between frames.
    pub fn frames(self, grid: MazeGrid, mut rng: MazeRng) -> Frames {
        let carver = self.carver(&grid, &mut rng);
        Frames {
            grid,
            rng,
            carver,
            done: false,
        }
    }
}

/// One observable unit of carving work.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CarveStep {
    /// The carver acted on `cursor` (not every step removes a wall - the
    /// binary tree's origin cell, for example, has nothing to carve).
    Progress { cursor: GridCoordinate },
    /// The maze is fully carved.
    Done,
}

/// A carving algorithm driven one decision at a time.
///
/// The grid state after the final step is identical to a run-to-completion
/// carve with the same random source, since the pacing of `step` calls does
/// not change the order randomness is drawn in.
pub trait Carver {
    fn step(&mut self, grid: &mut MazeGrid, rng: &mut MazeRng) -> Result<CarveStep>;

    fn carve_all(&mut self, grid: &mut MazeGrid, rng: &mut MazeRng) -> Result<()> {
        while let CarveStep::Progress { .. } = self.step(grid, rng)? {}
        Ok(())
    }
}

type DirectionSmallVec = SmallVec<[GridDirection; 4]>;

/// Depth-first search from the origin with implicit backtracking, kept as an
/// explicit stack of `(cell, shuffled directions, next index)` frames so it
/// can be stepped. Produces long winding corridors with little branching.
pub struct Backtracker {
    stack: Vec<BacktrackerFrame>,
}

struct BacktrackerFrame {
    coord: GridCoordinate,
    directions: DirectionSmallVec,
    next_direction: usize,
}

impl BacktrackerFrame {
    fn shuffled(coord: GridCoordinate, rng: &mut MazeRng) -> BacktrackerFrame {
        let mut directions: DirectionSmallVec = DIRECTIONS.iter().copied().collect();
        rng.shuffle(&mut directions);
        BacktrackerFrame {
            coord,
            directions,
            next_direction: 0,
        }
    }
}

impl Backtracker {
    pub fn new(rng: &mut MazeRng) -> Backtracker {
        Backtracker {
            stack: vec![BacktrackerFrame::shuffled(GridCoordinate::new(0, 0), rng)],
        }
    }
}

impl Carver for Backtracker {
    fn step(&mut self, grid: &mut MazeGrid, rng: &mut MazeRng) -> Result<CarveStep> {
        loop {
            let carve_into = match self.stack.last_mut() {
                None => return Ok(CarveStep::Done),
                Some(frame) => {
                    let mut found = None;
                    while frame.next_direction < frame.directions.len() {
                        let direction = frame.directions[frame.next_direction];
                        frame.next_direction += 1;
                        if let Some(neighbour) = grid.neighbour_at_direction(frame.coord, direction)
                        {
                            if !grid.is_carved(neighbour) {
                                found = Some((frame.coord, direction, neighbour));
                                break;
                            }
                        }
                    }
                    found
                }
            };

            match carve_into {
                Some((coord, direction, neighbour)) => {
                    grid.open_passage(coord, direction);
                    self.stack.push(BacktrackerFrame::shuffled(neighbour, rng));
                    return Ok(CarveStep::Progress { cursor: neighbour });
                }
                // every neighbour visited - backtrack
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// Single row-major pass over the grid, carving North or West (whichever are
/// in bounds) at each cell. Fast and simple, but biased: the top row and the
/// left column each end up as one unbroken corridor.
pub struct BinaryTree {
    scan: CellIter,
}

impl BinaryTree {
    pub fn new(grid: &MazeGrid) -> BinaryTree {
        BinaryTree { scan: grid.iter() }
    }
}

impl Carver for BinaryTree {
    fn step(&mut self, grid: &mut MazeGrid, rng: &mut MazeRng) -> Result<CarveStep> {
        match self.scan.next() {
            None => Ok(CarveStep::Done),
            Some(coord) => {
                let mut candidates: SmallVec<[GridDirection; 2]> = SmallVec::new();
                if coord.y > 0 {
                    candidates.push(GridDirection::North);
                }
                if coord.x > 0 {
                    candidates.push(GridDirection::West);
                }
                // the origin cell has no candidates and carves nothing
                if !candidates.is_empty() {
                    let direction = *rng.choose(&candidates)?;
                    grid.open_passage(coord, direction);
                }
                Ok(CarveStep::Progress { cursor: coord })
            }
        }
    }
}

/// Per-cell book-keeping private to the Prim carver. Kept in its own array
/// rather than as marker bits in the grid's wall bitmask, so the public wall
/// queries never see strategy state.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum PrimCellState {
    Out,
    Frontier,
    In,
}

/// Randomized Prim: grow the maze from a random start cell, repeatedly
/// pulling a uniformly random frontier cell into the maze through a passage
/// to a uniformly random in-maze neighbour.
pub struct Prim {
    state: Vec<PrimCellState>,
    frontier: Vec<GridCoordinate>,
    width: usize,
}

impl Prim {
    pub fn new(grid: &MazeGrid, rng: &mut MazeRng) -> Prim {
        let mut prim = Prim {
            state: vec![PrimCellState::Out; grid.size()],
            frontier: Vec::new(),
            width: grid.width(),
        };
        let start = GridCoordinate::new(rng.uniform(grid.width()) as isize,
                                        rng.uniform(grid.height()) as isize);
        prim.mark(start, grid);
        prim
    }

    #[inline]
    fn state_index(&self, coord: GridCoordinate) -> usize {
        (coord.y as usize * self.width) + coord.x as usize
    }

    #[inline]
    fn state_of(&self, coord: GridCoordinate) -> PrimCellState {
        self.state[self.state_index(coord)]
    }

    /// Pull a cell into the maze and enqueue its untouched neighbours on the
    /// frontier. A coordinate enters the frontier at most once.
    fn mark(&mut self, coord: GridCoordinate, grid: &MazeGrid) {
        let index = self.state_index(coord);
        self.state[index] = PrimCellState::In;

        for direction in &DIRECTIONS {
            if let Some(neighbour) = grid.neighbour_at_direction(coord, *direction) {
                if self.state_of(neighbour) == PrimCellState::Out {
                    let neighbour_index = self.state_index(neighbour);
                    self.state[neighbour_index] = PrimCellState::Frontier;
                    self.frontier.push(neighbour);
                }
            }
        }
    }

    /// Neighbours of `coord` already pulled into the maze.
    fn in_maze_neighbours(&self, coord: GridCoordinate, grid: &MazeGrid) -> SmallVec<[GridCoordinate; 4]> {
        DIRECTIONS
            .iter()
            .filter_map(|dir| grid.neighbour_at_direction(coord, *dir))
            .filter(|neighbour| self.state_of(*neighbour) == PrimCellState::In)
            .collect()
    }
}

impl Carver for Prim {
    fn step(&mut self, grid: &mut MazeGrid, rng: &mut MazeRng) -> Result<CarveStep> {
        if self.frontier.is_empty() {
            return Ok(CarveStep::Done);
        }
        let frontier_index = rng.uniform(self.frontier.len());
        let cell = self.frontier.swap_remove(frontier_index);

        let in_neighbours = self.in_maze_neighbours(cell, grid);
        let neighbour = *rng.choose(&in_neighbours)?;
        let direction = direction_between(cell, neighbour)
            .expect("frontier cells are adjacent to their in-maze neighbours");

        grid.open_passage(cell, direction);
        self.mark(cell, grid);

        Ok(CarveStep::Progress { cursor: cell })
    }
}

/// Randomized Kruskal: shuffle every interior wall once, then accept each
/// wall whose two sides are not yet connected, merging their sets. Walls
/// between already-connected cells are discarded (they would form a cycle).
pub struct Kruskal {
    edges: Vec<(GridCoordinate, GridDirection)>,
    sets: DisjointSet,
    width: usize,
}

impl Kruskal {
    pub fn new(grid: &MazeGrid, rng: &mut MazeRng) -> Kruskal {
        // every cell's North and West wall, skipping the outer boundary
        let mut edges: Vec<(GridCoordinate, GridDirection)> = (0..grid.height())
            .cartesian_product(0..grid.width())
            .flat_map(|(y, x)| {
                let coord = GridCoordinate::new(x as isize, y as isize);
                let mut cell_edges: SmallVec<[(GridCoordinate, GridDirection); 2]> =
                    SmallVec::new();
                if y > 0 {
                    cell_edges.push((coord, GridDirection::North));
                }
                if x > 0 {
                    cell_edges.push((coord, GridDirection::West));
                }
                cell_edges
            })
            .collect();
        rng.shuffle(&mut edges);

        Kruskal {
            edges,
            sets: DisjointSet::new_forest(grid.width(), grid.height()),
            width: grid.width(),
        }
    }

    #[inline]
    fn set_index(&self, coord: GridCoordinate) -> usize {
        (coord.y as usize * self.width) + coord.x as usize
    }
}

impl Carver for Kruskal {
    fn step(&mut self, grid: &mut MazeGrid, _rng: &mut MazeRng) -> Result<CarveStep> {
        while let Some((coord, direction)) = self.edges.pop() {
            let neighbour = grid
                .neighbour_at_direction(coord, direction)
                .expect("edge list only holds in-bounds walls");
            let a = self.set_index(coord);
            let b = self.set_index(neighbour);
            if !self.sets.connected(a, b) {
                self.sets.union(a, b);
                grid.open_passage(coord, direction);
                return Ok(CarveStep::Progress { cursor: coord });
            }
        }
        Ok(CarveStep::Done)
    }
}

/// Snapshot of the grid after one carving step.
#[derive(Debug, Clone)]
pub struct Frame {
    pub grid: MazeGrid,
    /// The cell the carver last acted on. `None` on the final frame.
    pub cursor: Option<GridCoordinate>,
}

/// Iterator over carving steps, yielding a grid snapshot per step and a
/// final snapshot of the finished maze. See [`Strategy::frames`].
pub struct Frames {
    grid: MazeGrid,
    rng: MazeRng,
    carver: Box<dyn Carver>,
    done: bool,
}

impl Frames {
    /// Consume the iterator, returning the grid in its current state.
    pub fn into_grid(self) -> MazeGrid {
        self.grid
    }
}

impl Iterator for Frames {
    type Item = Result<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.carver.step(&mut self.grid, &mut self.rng) {
            Ok(CarveStep::Progress { cursor }) => Some(Ok(Frame {
                grid: self.grid.clone(),
                cursor: Some(cursor),
            })),
            Ok(CarveStep::Done) => {
                self.done = true;
                Some(Ok(Frame {
                    grid: self.grid.clone(),
                    cursor: None,
                }))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::compass::GridDirection;

    fn carved(strategy: Strategy, width: isize, height: isize, seed: u64) -> MazeGrid {
        let mut grid = MazeGrid::new(width, height).unwrap();
        let mut rng = MazeRng::new(Some(seed));
        strategy.carve(&mut grid, &mut rng).unwrap();
        grid
    }

    #[test]
    fn every_strategy_carves_every_cell() {
        for strategy in &Strategy::ALL {
            let grid = carved(*strategy, 6, 4, 11);
            for coord in grid.iter() {
                assert!(grid.is_carved(coord),
                        "{:?} left {:?} fully walled",
                        strategy,
                        coord);
            }
        }
    }

    #[test]
    fn every_strategy_opens_spanning_tree_edge_counts() {
        for strategy in &Strategy::ALL {
            let grid = carved(*strategy, 7, 5, 23);
            assert_eq!(grid.links_count(), 7 * 5 - 1, "{:?}", strategy);
        }
    }

    #[test]
    fn single_cell_grids_terminate_untouched() {
        for strategy in &Strategy::ALL {
            let grid = carved(*strategy, 1, 1, 0);
            assert_eq!(grid.wall_mask(GridCoordinate::new(0, 0)), 0, "{:?}", strategy);
            assert_eq!(grid.links_count(), 0);
        }
    }

    #[test]
    fn binary_tree_top_row_and_left_column_are_corridors() {
        let grid = carved(Strategy::BinaryTree, 6, 6, 5);

        // row 0 can only ever carve West, column 0 only North
        for x in 1..6 {
            assert!(grid.is_passage_open(GridCoordinate::new(x, 0), GridDirection::West));
        }
        for y in 1..6 {
            assert!(grid.is_passage_open(GridCoordinate::new(0, y), GridDirection::North));
        }
        assert!(!grid.is_passage_open(GridCoordinate::new(0, 0), GridDirection::North));
        assert!(!grid.is_passage_open(GridCoordinate::new(0, 0), GridDirection::West));
    }

    #[test]
    fn binary_tree_single_column_is_one_straight_corridor() {
        let grid = carved(Strategy::BinaryTree, 1, 6, 17);
        for y in 1..6 {
            assert_eq!(grid.wall_mask(GridCoordinate::new(0, y)) & GridDirection::North.wall_bit(),
                       GridDirection::North.wall_bit());
        }
        assert_eq!(grid.links_count(), 5);
    }

    #[test]
    fn stepwise_frames_match_run_to_completion() {
        for strategy in &Strategy::ALL {
            let complete = carved(*strategy, 5, 5, 77);

            let grid = MazeGrid::new(5, 5).unwrap();
            let rng = MazeRng::new(Some(77));
            let mut frames = strategy.frames(grid, rng);
            let mut last = None;
            while let Some(frame) = frames.next() {
                last = Some(frame.unwrap());
            }

            assert_eq!(last.unwrap().grid, complete, "{:?}", strategy);
            assert_eq!(frames.into_grid(), complete, "{:?}", strategy);
        }
    }

    #[test]
    fn final_frame_has_no_cursor() {
        let grid = MazeGrid::new(3, 3).unwrap();
        let rng = MazeRng::new(Some(1));
        let frames: Vec<Frame> = Strategy::Kruskal
            .frames(grid, rng)
            .map(|frame| frame.unwrap())
            .collect();

        let (final_frame, carving_frames) = frames.split_last().unwrap();
        assert!(final_frame.cursor.is_none());
        assert!(carving_frames.iter().all(|frame| frame.cursor.is_some()));
        // 3x3 spanning tree: 8 passages, one frame each, plus the final frame
        assert_eq!(carving_frames.len(), 8);
        assert_eq!(final_frame.grid.links_count(), 8);
    }

    #[test]
    fn same_seed_same_maze() {
        for strategy in &Strategy::ALL {
            assert_eq!(carved(*strategy, 8, 3, 99),
                       carved(*strategy, 8, 3, 99),
                       "{:?}",
                       strategy);
        }
    }
}
