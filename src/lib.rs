//! **mazegen** is a maze generation and visualisation library: one grid of
//! wall-bitmask cells, four interchangeable carving strategies, deterministic
//! seeding and optional step-by-step animation.

pub mod compass;
pub mod errors;
pub mod generators;
pub mod grid;
pub mod random;
pub mod renderers;
pub mod unionfind;
