use crate::compass::GridDirection;
use crate::grid::{GridCoordinate, MazeGrid};
use std::fmt;

/// ANSI control sequences used by animated rendering. The renderer itself
/// only emits the styling codes; clearing and homing the screen between
/// frames is the caller's job.
pub const CLEAR_SCREEN: &str = "\x1b[2J";
pub const CURSOR_HOME: &str = "\x1b[H";

const UNVISITED_STYLE: &str = "\x1b[47m";
const CURSOR_STYLE: &str = "\x1b[7m";
const RESET_STYLE: &str = "\x1b[m";

/// Render the grid as ASCII art, one text row per grid row.
///
/// The top border is a space followed by `2 * width - 1` underscores. Each
/// row starts with `|`; each cell contributes a floor glyph (space when its
/// South passage is open, else `_`) and a side glyph (`|` when its East wall
/// stands, otherwise a floor glyph so corridors running East merge visually
/// with open floors below them).
pub fn render(grid: &MazeGrid) -> String {
    render_cells(grid, |_| CellStyle::Plain)
}

/// Like [`render`] but with unvisited (fully walled) cells drawn on a
/// highlight background and the cursor cell, if any, in reverse video. Used
/// while a carve is being animated.
pub fn render_highlighted(grid: &MazeGrid, cursor: Option<GridCoordinate>) -> String {
    render_cells(grid, |coord| {
        if cursor == Some(coord) {
            CellStyle::Cursor
        } else if !grid.is_carved(coord) {
            CellStyle::Unvisited
        } else {
            CellStyle::Plain
        }
    })
}

/// The metadata line reported alongside a rendered maze:
/// `"<width> <height> <seed-or-'random'>"`.
pub fn metadata_line(grid: &MazeGrid, seed: Option<u64>) -> String {
    match seed {
        Some(s) => format!("{} {} {}", grid.width(), grid.height(), s),
        None => format!("{} {} random", grid.width(), grid.height()),
    }
}

#[derive(Copy, Clone, Eq, PartialEq)]
enum CellStyle {
    Plain,
    Unvisited,
    Cursor,
}

fn render_cells<StyleF>(grid: &MazeGrid, style_of: StyleF) -> String
    where StyleF: Fn(GridCoordinate) -> CellStyle
{
    // 2 glyphs per cell plus borders, newlines and some styling slack
    let mut output = String::with_capacity((grid.width() * 2 + 2) * (grid.height() + 1));

    output.push(' ');
    for _ in 0..(2 * grid.width() - 1) {
        output.push('_');
    }
    output.push('\n');

    for row in grid.iter_row() {
        output.push('|');
        for coord in row {
            let style = style_of(coord);
            match style {
                CellStyle::Plain => {}
                CellStyle::Unvisited => output.push_str(UNVISITED_STYLE),
                CellStyle::Cursor => output.push_str(CURSOR_STYLE),
            }

            output.push(floor_glyph(grid, coord));
            output.push(side_glyph(grid, coord));

            if style != CellStyle::Plain {
                output.push_str(RESET_STYLE);
            }
        }
        output.push('\n');
    }

    output
}

fn floor_glyph(grid: &MazeGrid, coord: GridCoordinate) -> char {
    if grid.is_passage_open(coord, GridDirection::South) {
        ' '
    } else {
        '_'
    }
}

fn side_glyph(grid: &MazeGrid, coord: GridCoordinate) -> char {
    if grid.is_passage_open(coord, GridDirection::East) {
        // an East passage implies an in-bounds East neighbour
        let east = grid
            .neighbour_at_direction(coord, GridDirection::East)
            .expect("open East passage implies an East neighbour");
        let floor_open = grid.is_passage_open(coord, GridDirection::South)
            || grid.is_passage_open(east, GridDirection::South);
        if floor_open {
            ' '
        } else {
            '_'
        }
    } else {
        '|'
    }
}

impl fmt::Display for MazeGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", render(self))
    }
}
