use waymark_core::{Point, Range};

/// Read-only view of one map and its occupants, as consulted by the
/// passability oracle.
///
/// Implementations must answer for *any* integer coordinate, including ones
/// outside [`bounds`](Snapshot::bounds): off-map queries still reach the warp
/// and occupancy rules, and an off-map warp is walkable. Pixel-space queries
/// receive a probe rectangle computed by the oracle
/// ([`collision_rect`](crate::collision_rect)).
pub trait Snapshot {
    /// Tile-space bounds of the map's addressable area.
    fn bounds(&self) -> Range;

    /// A transition (warp) point sits on this tile.
    fn warp_at(&self, p: Point) -> bool;

    /// A placed object that blocks movement occupies the tile.
    fn blocking_object_at(&self, p: Point) -> bool;

    /// Any character's collision box intersects `rect` (pixel space).
    fn character_in(&self, rect: Range) -> bool;

    /// A blocking terrain feature keyed at `p` has a box intersecting `rect`.
    fn blocking_feature_at(&self, p: Point, rect: Range) -> bool;

    /// Any large terrain feature's box intersects `rect` (pixel space).
    fn large_feature_in(&self, rect: Range) -> bool;

    /// Furniture that blocks movement covers the tile.
    fn blocking_furniture_at(&self, p: Point) -> bool;

    /// The structural layer has a tile at `p`.
    fn structure_at(&self, p: Point) -> bool;

    /// "Action" value of the structural tile at `p`, if any.
    ///
    /// Tileset-level properties take precedence over tile-instance
    /// properties.
    fn structure_action(&self, p: Point) -> Option<&str>;

    /// The structural tile at `p` carries an explicit "Passable" property.
    fn structure_passable(&self, p: Point) -> bool;

    /// The background layer marks `p` as "NoPath".
    fn no_path_at(&self, p: Point) -> bool;

    /// Whether this map is a farm. Building footprints only block on farms.
    fn is_farm(&self) -> bool;

    /// A building's footprint covers the tile.
    fn building_at(&self, p: Point) -> bool;

    /// A resource clump occupies the tile.
    fn clump_at(&self, p: Point) -> bool;
}

/// Per-tile walking-surface preference.
///
/// A preferable neighbour's heuristic estimate gets a fixed -1 bonus, so
/// surfaces such as roads win ties against plain ground without changing
/// path length. The policy is supplied per call; the search loop never
/// hard-codes it.
pub trait SurfacePreference {
    /// Whether `p` is a mildly favoured walking surface.
    fn preferable(&self, p: Point) -> bool;
}

/// The base policy: no tile is preferred.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPreference;

impl SurfacePreference for NoPreference {
    fn preferable(&self, _p: Point) -> bool {
        false
    }
}
