//! **waymark-world** — a ready-made layered world snapshot.
//!
//! [`MapSnapshot`] implements [`waymark_paths::Snapshot`] from plain
//! collections: a structural tile layer with tileset- and instance-level
//! properties, background "NoPath" markers, warps, placed objects,
//! characters, terrain features, furniture, farm buildings, and resource
//! clumps. Build one per world state, hand it to
//! [`waymark_paths::find_path`], and throw it away (or keep it — the
//! pathfinding core never mutates it).
//!
//! Embedders whose world already lives elsewhere can skip this crate and
//! implement the `Snapshot` trait directly.

mod snapshot;

pub use snapshot::{MapSnapshot, StructureTile};
