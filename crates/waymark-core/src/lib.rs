//! **waymark-core** — Tile-grid routing for layered 2D worlds (geometry primitives).
//!
//! This crate provides the two types shared across the *waymark* workspace:
//! [`Point`], an integer coordinate used for both tile indices and pixel
//! positions, and [`Range`], a half-open integer rectangle used for tile
//! regions and pixel-space collision boxes alike.

pub mod geom;

pub use geom::{Point, Range};
