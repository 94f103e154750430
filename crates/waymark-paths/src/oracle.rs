//! The passability oracle: layered map metadata in, one boolean out.
//!
//! Map metadata is sparse and inconsistently populated — some tiles encode
//! passability through an "Action" string, some through an explicit
//! "Passable" property, some only through what happens to stand on them —
//! so the oracle probes every source in a fixed priority order. Each source
//! is an independent rule returning a three-valued [`Verdict`]; the first
//! decisive verdict wins.

use std::collections::HashMap;

use waymark_core::{Point, Range};

use crate::traits::Snapshot;

/// Tile edge length in pixels.
pub const TILE_SIZE: i32 = 64;

/// Action prefix: locked door warps never admit a route.
const LOCKED_DOOR_WARP: &str = "LockedDoorWarp";
/// Action substrings that keep an action-bearing tile walkable.
const DOOR: &str = "Door";
const PASSABLE: &str = "Passable";

/// Outcome of a single passability rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Passable,
    Blocked,
    Undecided,
}

/// Pixel-space collision probe for a tile: a 62×62 box inset one pixel on
/// every side, so entities sitting exactly on a neighbouring tile's edge do
/// not register against this one.
#[inline]
pub fn collision_rect(p: Point) -> Range {
    let px = p * TILE_SIZE;
    Range::new(
        px.x + 1,
        px.y + 1,
        px.x + TILE_SIZE - 1,
        px.y + TILE_SIZE - 1,
    )
}

/// Whether something with a collision footprint occupies the tile: a
/// blocking placed object, a character, a blocking terrain feature, a large
/// terrain feature, or blocking furniture.
///
/// Occupancy is computed from the snapshot's per-tile and per-entity
/// collections, not from static map data.
pub fn is_tile_occupied<S: Snapshot>(snap: &S, p: Point) -> bool {
    if snap.blocking_object_at(p) {
        return true;
    }
    let rect = collision_rect(p);
    snap.character_in(rect)
        || snap.blocking_feature_at(p, rect)
        || snap.large_feature_in(rect)
        || snap.blocking_furniture_at(p)
}

/// Transitions override everything so a destination can always be reached,
/// even one whose tile would otherwise read as blocked or off-map.
fn warp_rule<S: Snapshot>(snap: &S, p: Point) -> Verdict {
    if snap.warp_at(p) {
        Verdict::Passable
    } else {
        Verdict::Undecided
    }
}

fn occupancy_rule<S: Snapshot>(snap: &S, p: Point) -> Verdict {
    if is_tile_occupied(snap, p) {
        Verdict::Blocked
    } else {
        Verdict::Undecided
    }
}

fn bounds_rule<S: Snapshot>(snap: &S, p: Point) -> Verdict {
    if snap.bounds().contains(p) {
        Verdict::Undecided
    } else {
        Verdict::Blocked
    }
}

/// Structural-layer metadata. An action tile walks only if its value names a
/// door or passable marker (the locked-door prefix check runs first, since
/// `LockedDoorWarp` itself contains `Door`); an action-less tile walks only
/// with the explicit "Passable" property. Either way a walkable outcome is
/// non-terminal: later rules can still veto it.
fn structure_rule<S: Snapshot>(snap: &S, p: Point) -> Verdict {
    if !snap.structure_at(p) {
        return Verdict::Undecided;
    }
    match snap.structure_action(p) {
        Some(action) => {
            if action.starts_with(LOCKED_DOOR_WARP) {
                Verdict::Blocked
            } else if !action.contains(DOOR) && !action.contains(PASSABLE) {
                Verdict::Blocked
            } else {
                Verdict::Undecided
            }
        }
        None => {
            if snap.structure_passable(p) {
                Verdict::Undecided
            } else {
                Verdict::Blocked
            }
        }
    }
}

fn no_path_rule<S: Snapshot>(snap: &S, p: Point) -> Verdict {
    if snap.no_path_at(p) {
        Verdict::Blocked
    } else {
        Verdict::Undecided
    }
}

fn building_rule<S: Snapshot>(snap: &S, p: Point) -> Verdict {
    if snap.is_farm() && snap.building_at(p) {
        Verdict::Blocked
    } else {
        Verdict::Undecided
    }
}

fn clump_rule<S: Snapshot>(snap: &S, p: Point) -> Verdict {
    if snap.clump_at(p) {
        Verdict::Blocked
    } else {
        Verdict::Undecided
    }
}

/// Decide whether an agent may enter the tile at `p`.
///
/// Pure with respect to the snapshot and total: any integer coordinate gets
/// an answer, with off-map tiles impassable unless a warp sits there.
pub fn is_passable<S: Snapshot>(snap: &S, p: Point) -> bool {
    let rules: [fn(&S, Point) -> Verdict; 7] = [
        warp_rule,
        occupancy_rule,
        bounds_rule,
        structure_rule,
        no_path_rule,
        building_rule,
        clump_rule,
    ];
    for rule in rules {
        match rule(snap, p) {
            Verdict::Passable => return true,
            Verdict::Blocked => return false,
            Verdict::Undecided => {}
        }
    }
    // No rule objected.
    true
}

/// Cache-wrapped variant of [`is_passable`].
pub fn is_passable_cached<S: Snapshot>(snap: &S, p: Point, cache: &mut PassableCache) -> bool {
    cache.passable(snap, p)
}

/// Memo of passability verdicts for one search call.
///
/// The world can change between calls, so a cache must never outlive the
/// call it was created for.
#[derive(Debug, Default)]
pub struct PassableCache {
    verdicts: HashMap<Point, bool>,
}

impl PassableCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached oracle query: computes on first sight of `p`, memoizes after.
    pub fn passable<S: Snapshot>(&mut self, snap: &S, p: Point) -> bool {
        match self.verdicts.get(&p) {
            Some(&v) => v,
            None => {
                let v = is_passable(snap, p);
                self.verdicts.insert(p, v);
                v
            }
        }
    }

    /// Number of distinct coordinates decided so far.
    pub fn len(&self) -> usize {
        self.verdicts.len()
    }

    /// Whether no coordinate has been decided yet.
    pub fn is_empty(&self) -> bool {
        self.verdicts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testgrid::TestMap;

    fn p(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn open_tile_is_passable() {
        let map = TestMap::open(5, 5);
        assert!(is_passable(&map, p(2, 2)));
    }

    #[test]
    fn off_map_is_impassable() {
        let map = TestMap::open(5, 5);
        assert!(!is_passable(&map, p(-1, 0)));
        assert!(!is_passable(&map, p(5, 0)));
        assert!(!is_passable(&map, p(0, 5)));
    }

    #[test]
    fn warp_overrides_everything() {
        let mut map = TestMap::open(5, 5);
        // Warp on a tile that is simultaneously occupied and marked NoPath.
        map.warps.insert(p(2, 2));
        map.blocking_objects.insert(p(2, 2));
        map.no_path.insert(p(2, 2));
        assert!(is_passable(&map, p(2, 2)));
        // Even an off-map warp is walkable.
        map.warps.insert(p(9, 9));
        assert!(is_passable(&map, p(9, 9)));
    }

    #[test]
    fn blocking_object_blocks() {
        let mut map = TestMap::open(5, 5);
        map.blocking_objects.insert(p(1, 1));
        assert!(!is_passable(&map, p(1, 1)));
        assert!(is_passable(&map, p(1, 2)));
    }

    #[test]
    fn character_blocks_its_tile_but_not_edge_neighbours() {
        let mut map = TestMap::open(5, 5);
        map.character(2, 2);
        assert!(!is_passable(&map, p(2, 2)));
        // The probe rect is inset one pixel, so a box flush against the
        // neighbouring tile's edge does not leak into it.
        assert!(is_passable(&map, p(1, 2)));
        assert!(is_passable(&map, p(2, 1)));
    }

    #[test]
    fn character_straddling_two_tiles_blocks_both() {
        let mut map = TestMap::open(5, 5);
        // A box halfway between tiles (1,1) and (2,1).
        map.character_boxes
            .push(Range::new(96, 64, 160, 128));
        assert!(!is_passable(&map, p(1, 1)));
        assert!(!is_passable(&map, p(2, 1)));
        assert!(is_passable(&map, p(3, 1)));
    }

    #[test]
    fn blocking_feature_and_furniture_block() {
        let mut map = TestMap::open(5, 5);
        map.blocking_features
            .insert(p(0, 1), collision_rect(p(0, 1)));
        map.blocking_furniture.insert(p(4, 4));
        assert!(!is_passable(&map, p(0, 1)));
        assert!(!is_passable(&map, p(4, 4)));
    }

    #[test]
    fn large_feature_blocks_every_tile_it_covers() {
        let mut map = TestMap::open(6, 6);
        // A 2×2-tile bush in pixel space.
        map.large_boxes.push(Range::new(64, 64, 192, 192));
        assert!(!is_passable(&map, p(1, 1)));
        assert!(!is_passable(&map, p(2, 2)));
        assert!(is_passable(&map, p(3, 3)));
    }

    #[test]
    fn bare_structure_tile_blocks() {
        let mut map = TestMap::open(5, 5);
        map.wall(3, 3);
        assert!(!is_passable(&map, p(3, 3)));
    }

    #[test]
    fn structure_with_passable_property_walks() {
        let mut map = TestMap::open(5, 5);
        map.passable_props.insert(p(3, 3));
        assert!(is_passable(&map, p(3, 3)));
    }

    #[test]
    fn door_and_passable_actions_walk_others_block() {
        let mut map = TestMap::open(8, 2);
        map.actions.insert(p(0, 0), "Door".into());
        map.actions.insert(p(1, 0), "Passable Bridge".into());
        map.actions.insert(p(2, 0), "Warp 3 3 Town".into());
        assert!(is_passable(&map, p(0, 0)));
        assert!(is_passable(&map, p(1, 0)));
        assert!(!is_passable(&map, p(2, 0)));
    }

    #[test]
    fn locked_door_warp_blocks_despite_containing_door() {
        let mut map = TestMap::open(5, 5);
        map.actions
            .insert(p(2, 0), "LockedDoorWarp 3 3 Town 800".into());
        assert!(!is_passable(&map, p(2, 0)));
    }

    #[test]
    fn tileset_action_takes_precedence_over_instance_action() {
        let mut map = TestMap::open(5, 5);
        map.sheet_actions.insert(p(2, 0), "Warp 3 3 Town".into());
        map.actions.insert(p(2, 0), "Door".into());
        assert!(!is_passable(&map, p(2, 0)));
    }

    #[test]
    fn no_path_vetoes_an_otherwise_walkable_tile() {
        let mut map = TestMap::open(5, 5);
        map.no_path.insert(p(1, 1));
        assert!(!is_passable(&map, p(1, 1)));
        // Also vetoes a door that the structure rule let through.
        map.actions.insert(p(2, 2), "Door".into());
        map.no_path.insert(p(2, 2));
        assert!(!is_passable(&map, p(2, 2)));
    }

    #[test]
    fn buildings_block_only_on_farms() {
        let mut map = TestMap::open(10, 10);
        map.buildings.push(Range::new(2, 2, 5, 4));
        assert!(is_passable(&map, p(3, 3)));
        map.farm = true;
        assert!(!is_passable(&map, p(3, 3)));
        assert!(is_passable(&map, p(5, 4)));
    }

    #[test]
    fn clump_blocks_its_footprint() {
        let mut map = TestMap::open(10, 10);
        map.clumps.push(Range::new(6, 6, 8, 8));
        assert!(!is_passable(&map, p(6, 7)));
        assert!(!is_passable(&map, p(7, 7)));
        assert!(is_passable(&map, p(8, 8)));
    }

    #[test]
    fn collision_rect_is_inset_one_pixel() {
        assert_eq!(collision_rect(p(0, 0)), Range::new(1, 1, 63, 63));
        assert_eq!(collision_rect(p(2, 1)), Range::new(129, 65, 191, 127));
    }

    #[test]
    fn cache_computes_each_coordinate_once() {
        let map = TestMap::open(5, 5);
        let mut cache = PassableCache::new();
        assert!(cache.is_empty());
        assert!(cache.passable(&map, p(1, 1)));
        assert!(cache.passable(&map, p(1, 1)));
        assert!(is_passable_cached(&map, p(1, 1), &mut cache));
        assert_eq!(map.evals_at(1, 1), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn cache_stores_negative_verdicts_too() {
        let mut map = TestMap::open(5, 5);
        map.wall(1, 1);
        let mut cache = PassableCache::new();
        assert!(!cache.passable(&map, p(1, 1)));
        assert!(!cache.passable(&map, p(1, 1)));
        assert_eq!(map.evals_at(1, 1), 1);
    }
}
