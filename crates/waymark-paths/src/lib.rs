//! Walkable-route search over layered tile worlds.
//!
//! Two strictly layered pieces:
//!
//! - the **passability oracle** ([`is_passable`]) reduces a world snapshot's
//!   overlapping data sources — warps, occupants, map bounds,
//!   structural-layer actions, background markers, farm buildings, resource
//!   clumps — to a single verdict per tile, memoized per call by
//!   [`PassableCache`];
//! - the **search engine** ([`find_path`]) runs four-directional unit-cost
//!   A* over the cached oracle and returns the route start..target
//!   inclusive, or one of three explicit [`PathError`] outcomes.
//!
//! The world is seen only through the [`Snapshot`] trait; `waymark-world`
//! ships a ready-made implementation, and embedders with their own world
//! model implement the trait directly. Each call owns its open set, closed
//! set, and cache, so independent calls may run concurrently as long as the
//! snapshot each one reads is not mutated underneath it.

mod astar;
mod distance;
mod oracle;
mod traits;

#[cfg(test)]
mod testgrid;

pub use astar::{PathError, find_path, find_path_with};
pub use distance::manhattan;
pub use oracle::{
    PassableCache, TILE_SIZE, collision_rect, is_passable, is_passable_cached, is_tile_occupied,
};
pub use traits::{NoPreference, Snapshot, SurfacePreference};
