//! Four-directional unit-cost A* over the cached passability oracle.

use std::collections::{BinaryHeap, HashMap};
use std::fmt;

use waymark_core::Point;

use crate::distance::manhattan;
use crate::oracle::PassableCache;
use crate::traits::{NoPreference, Snapshot, SurfacePreference};

/// Why a search produced no path.
///
/// All three are ordinary outcomes, not fatal conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathError {
    /// The target tile itself is not passable; no search was attempted.
    /// Retrying with the same target cannot succeed.
    InvalidTarget,
    /// The reachable space was exhausted without connecting the endpoints.
    /// With the same snapshot, retrying yields the same result.
    NoPathFound,
    /// The search closed more nodes than the configured cutoff allows.
    /// Retrying with a larger (or no) cutoff may still find a path.
    SearchBudgetExceeded,
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathError::InvalidTarget => write!(f, "target tile is not passable"),
            PathError::NoPathFound => write!(f, "no path between start and target"),
            PathError::SearchBudgetExceeded => write!(f, "search budget exceeded"),
        }
    }
}

impl std::error::Error for PathError {}

/// One search-time record. Nodes live in the call's arena; arena order is
/// discovery order, which is what the tie-break uses.
struct Node {
    pos: Point,
    g: i32,
    h: i32,
    /// Invariant: `f == g + h` whenever the node is comparable.
    f: i32,
    /// Arena index of the predecessor; `usize::MAX` for the start.
    parent: usize,
    /// Recorded for the surface-preference hook; scoring reads the bonus
    /// only at discovery, through `h`.
    #[allow(dead_code)]
    preferable: bool,
    closed: bool,
}

/// Heap entry: lowest `f` first, then earliest-discovered (lowest arena
/// index) — the reproducible tie-break policy.
#[derive(Clone, Copy, PartialEq, Eq)]
struct OpenRef {
    f: i32,
    idx: usize,
}

impl Ord for OpenRef {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reverse so BinaryHeap (a max-heap) pops smallest (f, idx) first.
        other.f.cmp(&self.f).then(other.idx.cmp(&self.idx))
    }
}

impl PartialOrd for OpenRef {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Find a walkable route from `from` to `to` with no surface preference.
///
/// See [`find_path_with`].
pub fn find_path<S: Snapshot>(
    snap: &S,
    from: Point,
    to: Point,
    cutoff: i32,
) -> Result<Vec<Point>, PathError> {
    find_path_with(snap, &NoPreference, from, to, cutoff)
}

/// Find a walkable route from `from` to `to`, both inclusive, moving one
/// orthogonal tile per step.
///
/// `cutoff` bounds how many nodes the search may finalize before giving up
/// with [`PathError::SearchBudgetExceeded`]; zero or negative means
/// unbounded. Passability is decided by the oracle through a cache scoped to
/// this one call, so a tile is never evaluated twice here but the world is
/// re-read on the next call.
pub fn find_path_with<S: Snapshot, W: SurfacePreference>(
    snap: &S,
    pref: &W,
    from: Point,
    to: Point,
    cutoff: i32,
) -> Result<Vec<Point>, PathError> {
    let mut cache = PassableCache::new();
    // An impassable destination can never be reached; refuse before doing
    // any search work.
    if !cache.passable(snap, to) {
        return Err(PathError::InvalidTarget);
    }

    let mut nodes: Vec<Node> = Vec::new();
    let mut index: HashMap<Point, usize> = HashMap::new();
    let mut open: BinaryHeap<OpenRef> = BinaryHeap::new();

    let start_pref = pref.preferable(from);
    let h0 = manhattan(from, to) - if start_pref { 1 } else { 0 };
    nodes.push(Node {
        pos: from,
        g: 0,
        h: h0,
        f: h0,
        parent: usize::MAX,
        preferable: start_pref,
        closed: false,
    });
    index.insert(from, 0);
    open.push(OpenRef { f: h0, idx: 0 });

    let mut closed_count: i32 = 0;

    while let Some(cur) = open.pop() {
        let ci = cur.idx;
        // Stale entry: the node was closed or re-scored since this push.
        if nodes[ci].closed || cur.f != nodes[ci].f {
            continue;
        }
        nodes[ci].closed = true;

        if nodes[ci].pos == to {
            return Ok(reconstruct(&nodes, ci));
        }

        closed_count += 1;
        if cutoff > 0 && closed_count > cutoff {
            return Err(PathError::SearchBudgetExceeded);
        }

        let cpos = nodes[ci].pos;
        let ng = nodes[ci].g + 1;
        for np in cpos.neighbors_4() {
            if !cache.passable(snap, np) {
                continue;
            }
            match index.get(&np).copied() {
                Some(ni) => {
                    let n = &mut nodes[ni];
                    if n.closed {
                        continue;
                    }
                    // A cheaper route to an open node: re-score, re-parent,
                    // and re-queue under its original discovery order.
                    if ng + n.h < n.f {
                        n.g = ng;
                        n.f = ng + n.h;
                        n.parent = ci;
                        open.push(OpenRef { f: ng + n.h, idx: ni });
                    }
                }
                None => {
                    let preferable = pref.preferable(np);
                    let h = manhattan(np, to) - if preferable { 1 } else { 0 };
                    let ni = nodes.len();
                    nodes.push(Node {
                        pos: np,
                        g: ng,
                        h,
                        f: ng + h,
                        parent: ci,
                        preferable,
                        closed: false,
                    });
                    index.insert(np, ni);
                    open.push(OpenRef { f: ng + h, idx: ni });
                }
            }
        }
    }

    Err(PathError::NoPathFound)
}

/// Walk predecessor links back to the start, then reverse so the path runs
/// start → target.
fn reconstruct(nodes: &[Node], mut ci: usize) -> Vec<Point> {
    let mut path = Vec::new();
    while ci != usize::MAX {
        path.push(nodes[ci].pos);
        ci = nodes[ci].parent;
    }
    path.reverse();
    path
}
