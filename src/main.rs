use docopt::Docopt;
use mazegen::{
    generators::Strategy,
    grid::MazeGrid,
    random::MazeRng,
    renderers,
};
use serde_derive::Deserialize;
use std::{
    io,
    io::prelude::*,
    thread,
    time::Duration,
};

const USAGE: &str = "Mazegen

Usage:
    mazegen_driver -h | --help
    mazegen_driver (backtracker|binary-tree|prim|kruskal) [--grid-width=<w> --grid-height=<h>] [--seed=<s>] [--animated --delay=<d>]

Options:
    -h --help           Show this screen.
    --grid-width=<w>    The grid width in a w*h grid [default: 10].
    --grid-height=<h>   The grid height in a w*h grid [default: 10].
    --seed=<s>          Unsigned integer RNG seed. The same seed, dimensions and algorithm always carve the same maze.
    --animated          Redraw the maze after every carving step.
    --delay=<d>         Seconds to pause between animation frames [default: 0.02].
";

#[derive(Debug, Deserialize)]
struct MazeArgs {
    cmd_backtracker: bool,
    cmd_binary_tree: bool,
    cmd_prim: bool,
    cmd_kruskal: bool,
    flag_grid_width: isize,
    flag_grid_height: isize,
    flag_seed: Option<u64>,
    flag_animated: bool,
    flag_delay: f64,
}

// We'll put our errors in an `errors` module, and other modules in
// this crate will `use errors::*;` to get access to everything
// `error_chain!` creates.
mod errors {
    use error_chain::*;
    error_chain! {

        foreign_links {
            DocOptFailure(::docopt::Error);
            Maze(::mazegen::errors::MazeError);
            Io(::std::io::Error);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {
    env_logger::init();

    let args: MazeArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;

    let strategy = selected_strategy(&args);
    let grid = MazeGrid::new(args.flag_grid_width, args.flag_grid_height)?;
    let rng = MazeRng::new(args.flag_seed);

    let maze = if args.flag_animated {
        animate(strategy, grid, rng, args.flag_delay)?
    } else {
        let mut grid = grid;
        let mut rng = rng;
        strategy.carve(&mut grid, &mut rng)?;
        print!("{}", renderers::render(&grid));
        grid
    };

    println!("{}", renderers::metadata_line(&maze, args.flag_seed));

    Ok(())
}

fn selected_strategy(args: &MazeArgs) -> Strategy {
    if args.cmd_backtracker {
        Strategy::Backtracker
    } else if args.cmd_binary_tree {
        Strategy::BinaryTree
    } else if args.cmd_prim {
        Strategy::Prim
    } else {
        Strategy::Kruskal
    }
}

/// Redraw the maze after every carving decision, pausing `delay_seconds`
/// between frames. Each frame clears back to the top of the screen so the
/// maze appears to carve itself in place.
fn animate(strategy: Strategy, grid: MazeGrid, rng: MazeRng, delay_seconds: f64) -> Result<MazeGrid> {
    let pause = Duration::from_secs_f64(delay_seconds);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    write!(out, "{}", renderers::CLEAR_SCREEN)?;

    let mut frames = strategy.frames(grid, rng);
    while let Some(frame) = frames.next() {
        let frame = frame?;
        write!(out,
               "{}{}",
               renderers::CURSOR_HOME,
               renderers::render_highlighted(&frame.grid, frame.cursor))?;
        out.flush()?;
        thread::sleep(pause);
    }

    Ok(frames.into_grid())
}
