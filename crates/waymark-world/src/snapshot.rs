//! In-memory world snapshot: layered tile metadata plus dynamic occupants.

use std::collections::{HashMap, HashSet};

use waymark_core::{Point, Range};
use waymark_paths::{Snapshot, TILE_SIZE};

/// Structural-layer tile metadata.
///
/// `sheet_action` models a tileset-level "Action" property and takes
/// precedence over the per-tile-instance `action`; `passable` is the
/// explicit "Passable" property the oracle consults when no action is
/// present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StructureTile {
    pub sheet_action: Option<String>,
    pub action: Option<String>,
    pub passable: bool,
}

impl StructureTile {
    /// A bare blocking tile with no properties.
    pub fn wall() -> Self {
        Self::default()
    }

    /// A tile with an instance-level "Action" value.
    pub fn with_action(action: impl Into<String>) -> Self {
        Self {
            action: Some(action.into()),
            ..Self::default()
        }
    }

    /// A structure tile carrying the explicit "Passable" property, such as
    /// a gate or a bridge plank.
    pub fn passable_tile() -> Self {
        Self {
            passable: true,
            ..Self::default()
        }
    }
}

/// Convert a tile-space rectangle to its pixel-space footprint.
fn tiles_to_px(r: Range) -> Range {
    Range::new(
        r.min.x * TILE_SIZE,
        r.min.y * TILE_SIZE,
        r.max.x * TILE_SIZE,
        r.max.y * TILE_SIZE,
    )
}

/// The full pixel box of a single tile.
fn tile_px(p: Point) -> Range {
    let px = p * TILE_SIZE;
    Range::new(px.x, px.y, px.x + TILE_SIZE, px.y + TILE_SIZE)
}

/// One map's layered state, frozen for pathfinding.
///
/// Built through the mutating setters below, then read through the
/// [`Snapshot`] trait. The pathfinding core never mutates it, so a snapshot
/// may be shared across concurrent calls as long as nobody else writes to
/// it mid-search.
#[derive(Debug, Default)]
pub struct MapSnapshot {
    bounds: Range,
    warps: HashSet<Point>,
    /// Placed objects: tile → passable.
    objects: HashMap<Point, bool>,
    /// Character collision boxes, pixel space.
    characters: Vec<Range>,
    /// Terrain features: tile → (pixel box, passable).
    features: HashMap<Point, (Range, bool)>,
    /// Large terrain features (always blocking), pixel space.
    large_features: Vec<Range>,
    /// Furniture: tile → passable.
    furniture: HashMap<Point, bool>,
    structures: HashMap<Point, StructureTile>,
    no_path: HashSet<Point>,
    farm: bool,
    /// Building footprints, tile space.
    buildings: Vec<Range>,
    /// Resource clump footprints, tile space.
    clumps: Vec<Range>,
}

impl MapSnapshot {
    /// An empty `width` × `height` map.
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            bounds: Range::new(0, 0, width, height),
            ..Self::default()
        }
    }

    /// Register a transition (warp) point. Warp tiles are always walkable,
    /// even off-map or on top of other blockers.
    pub fn add_warp(&mut self, p: Point) {
        self.warps.insert(p);
    }

    /// Place an object on a tile. Non-passable objects block it.
    pub fn place_object(&mut self, p: Point, passable: bool) {
        self.objects.insert(p, passable);
    }

    /// A character standing exactly on tile `p` (full-tile collision box).
    pub fn add_character(&mut self, p: Point) {
        self.characters.push(tile_px(p));
    }

    /// A character with an arbitrary pixel-space collision box — characters
    /// mid-walk straddle tile borders.
    pub fn add_character_box(&mut self, rect: Range) {
        self.characters.push(rect);
    }

    /// A terrain feature keyed at tile `p` with a full-tile box.
    pub fn add_terrain_feature(&mut self, p: Point, passable: bool) {
        self.features.insert(p, (tile_px(p), passable));
    }

    /// A large terrain feature covering a tile-space rectangle. Large
    /// features block every tile their box touches.
    pub fn add_large_feature(&mut self, tiles: Range) {
        self.large_features.push(tiles_to_px(tiles));
    }

    /// Put furniture on a tile. Non-passable furniture blocks it.
    pub fn place_furniture(&mut self, p: Point, passable: bool) {
        self.furniture.insert(p, passable);
    }

    /// Set the structural-layer tile at `p`.
    pub fn set_structure(&mut self, p: Point, tile: StructureTile) {
        self.structures.insert(p, tile);
    }

    /// Mark `p` "NoPath" on the background layer.
    pub fn mark_no_path(&mut self, p: Point) {
        self.no_path.insert(p);
    }

    /// Whether this map is a farm. Building footprints only block on farms.
    pub fn set_farm(&mut self, farm: bool) {
        self.farm = farm;
    }

    /// Add a building footprint (tile space).
    pub fn add_building(&mut self, tiles: Range) {
        self.buildings.push(tiles);
    }

    /// Add a resource clump footprint (tile space).
    pub fn add_clump(&mut self, tiles: Range) {
        self.clumps.push(tiles);
    }
}

impl Snapshot for MapSnapshot {
    fn bounds(&self) -> Range {
        self.bounds
    }

    fn warp_at(&self, p: Point) -> bool {
        self.warps.contains(&p)
    }

    fn blocking_object_at(&self, p: Point) -> bool {
        self.objects.get(&p).is_some_and(|&passable| !passable)
    }

    fn character_in(&self, rect: Range) -> bool {
        self.characters.iter().any(|b| b.overlaps(rect))
    }

    fn blocking_feature_at(&self, p: Point, rect: Range) -> bool {
        self.features
            .get(&p)
            .is_some_and(|&(b, passable)| !passable && b.overlaps(rect))
    }

    fn large_feature_in(&self, rect: Range) -> bool {
        self.large_features.iter().any(|b| b.overlaps(rect))
    }

    fn blocking_furniture_at(&self, p: Point) -> bool {
        self.furniture.get(&p).is_some_and(|&passable| !passable)
    }

    fn structure_at(&self, p: Point) -> bool {
        self.structures.contains_key(&p)
    }

    fn structure_action(&self, p: Point) -> Option<&str> {
        let tile = self.structures.get(&p)?;
        tile.sheet_action
            .as_deref()
            .or(tile.action.as_deref())
    }

    fn structure_passable(&self, p: Point) -> bool {
        self.structures.get(&p).is_some_and(|t| t.passable)
    }

    fn no_path_at(&self, p: Point) -> bool {
        self.no_path.contains(&p)
    }

    fn is_farm(&self) -> bool {
        self.farm
    }

    fn building_at(&self, p: Point) -> bool {
        self.buildings.iter().any(|b| b.contains(p))
    }

    fn clump_at(&self, p: Point) -> bool {
        self.clumps.iter().any(|c| c.contains(p))
    }
}
