//! Test-only snapshot with per-coordinate oracle-evaluation counting.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use waymark_core::{Point, Range};

use crate::oracle::TILE_SIZE;
use crate::traits::Snapshot;

/// In-memory snapshot for unit tests.
///
/// Every data source the oracle probes is a plain collection. The warp rule
/// runs first in the chain, so its `warp_at` query doubles as a
/// per-coordinate evaluation counter that the cache-coherence tests read
/// back.
#[derive(Default)]
pub struct TestMap {
    pub bounds: Range,
    pub warps: HashSet<Point>,
    pub blocking_objects: HashSet<Point>,
    pub character_boxes: Vec<Range>,
    pub blocking_features: HashMap<Point, Range>,
    pub large_boxes: Vec<Range>,
    pub blocking_furniture: HashSet<Point>,
    /// Structure tiles with no properties at all.
    pub walls: HashSet<Point>,
    /// Tile-instance "Action" values.
    pub actions: HashMap<Point, String>,
    /// Tileset-level "Action" values (take precedence).
    pub sheet_actions: HashMap<Point, String>,
    /// Structure tiles carrying the explicit "Passable" property.
    pub passable_props: HashSet<Point>,
    pub no_path: HashSet<Point>,
    pub farm: bool,
    /// Building footprints, tile space.
    pub buildings: Vec<Range>,
    /// Resource clump footprints, tile space.
    pub clumps: Vec<Range>,
    pub evals: RefCell<HashMap<Point, u32>>,
}

impl TestMap {
    /// An open `w` × `h` map with nothing on it.
    pub fn open(w: i32, h: i32) -> Self {
        Self {
            bounds: Range::new(0, 0, w, h),
            ..Self::default()
        }
    }

    /// Put a bare structure tile (no properties) at (x, y).
    pub fn wall(&mut self, x: i32, y: i32) {
        self.walls.insert(Point::new(x, y));
    }

    /// A character standing exactly on tile (x, y).
    pub fn character(&mut self, x: i32, y: i32) {
        let px = Point::new(x, y) * TILE_SIZE;
        self.character_boxes
            .push(Range::new(px.x, px.y, px.x + TILE_SIZE, px.y + TILE_SIZE));
    }

    /// How many times the oracle evaluated (x, y).
    pub fn evals_at(&self, x: i32, y: i32) -> u32 {
        self.evals
            .borrow()
            .get(&Point::new(x, y))
            .copied()
            .unwrap_or(0)
    }

    /// Total oracle evaluations across all coordinates.
    pub fn total_evals(&self) -> u32 {
        self.evals.borrow().values().sum()
    }

    /// The highest per-coordinate evaluation count.
    pub fn max_evals(&self) -> u32 {
        self.evals.borrow().values().copied().max().unwrap_or(0)
    }
}

impl Snapshot for TestMap {
    fn bounds(&self) -> Range {
        self.bounds
    }

    fn warp_at(&self, p: Point) -> bool {
        *self.evals.borrow_mut().entry(p).or_insert(0) += 1;
        self.warps.contains(&p)
    }

    fn blocking_object_at(&self, p: Point) -> bool {
        self.blocking_objects.contains(&p)
    }

    fn character_in(&self, rect: Range) -> bool {
        self.character_boxes.iter().any(|b| b.overlaps(rect))
    }

    fn blocking_feature_at(&self, p: Point, rect: Range) -> bool {
        self.blocking_features
            .get(&p)
            .is_some_and(|b| b.overlaps(rect))
    }

    fn large_feature_in(&self, rect: Range) -> bool {
        self.large_boxes.iter().any(|b| b.overlaps(rect))
    }

    fn blocking_furniture_at(&self, p: Point) -> bool {
        self.blocking_furniture.contains(&p)
    }

    fn structure_at(&self, p: Point) -> bool {
        self.walls.contains(&p)
            || self.actions.contains_key(&p)
            || self.sheet_actions.contains_key(&p)
            || self.passable_props.contains(&p)
    }

    fn structure_action(&self, p: Point) -> Option<&str> {
        self.sheet_actions
            .get(&p)
            .or_else(|| self.actions.get(&p))
            .map(String::as_str)
    }

    fn structure_passable(&self, p: Point) -> bool {
        self.passable_props.contains(&p)
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
