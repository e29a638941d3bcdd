//! Path finding and path following.
//!
//! The [`Navigator`] trait is the whole contract agents rely on: ask for a
//! path at a tolerance, follow it, check whether movement has finished, and
//! stop. [`GridNavigator`] answers with a bounded breadth-first search over
//! cells a two-high body fits into. The host calls
//! [`Navigator::next_step`] once per tick to move the body one node along.

use std::collections::{HashMap, VecDeque};

use kennel_types::{BlockPos, BlockTag, Locomotion, Vec3};

use crate::world::World;

/// Default cap on cells explored per search.
pub const DEFAULT_NODE_BUDGET: usize = 4096;

/// Default cap on how far (Chebyshev) a search strays from its start.
pub const DEFAULT_SEARCH_RANGE: u32 = 48;

/// A computed route, excluding the start cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavPath {
    nodes: VecDeque<BlockPos>,
    target: BlockPos,
    reaches_target: bool,
}

impl NavPath {
    /// Remaining nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no movement is needed.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Final node, if any.
    pub fn end(&self) -> Option<BlockPos> {
        self.nodes.back().copied()
    }

    /// The cell the path was requested for.
    pub const fn target(&self) -> BlockPos {
        self.target
    }

    /// Whether the end lies within the requested tolerance of the target.
    pub const fn reaches_target(&self) -> bool {
        self.reaches_target
    }
}

/// Host navigation engine, as seen by behaviors.
pub trait Navigator {
    /// How the owning body moves.
    fn locomotion(&self) -> Locomotion;

    /// Find a path from `from` to within `tolerance` cells of `target`.
    fn create_path(
        &self,
        world: &dyn World,
        from: BlockPos,
        target: BlockPos,
        tolerance: u32,
    ) -> Option<NavPath>;

    /// Start following a path. Returns `false` if the path is unusable.
    fn follow(&mut self, path: NavPath, speed: f64) -> bool;

    /// Move toward a point, settling for the closest reachable cell.
    fn move_to(&mut self, world: &dyn World, from: BlockPos, target: Vec3, speed: f64) -> bool;

    /// Whether there is no movement left to perform.
    fn is_done(&self) -> bool;

    /// Whether a path is being followed.
    fn is_in_progress(&self) -> bool {
        !self.is_done()
    }

    /// Abandon the current path.
    fn stop(&mut self);

    /// Pop the next cell to move into.
    fn next_step(&mut self) -> Option<BlockPos>;

    /// The next cell without consuming it.
    fn peek_step(&self) -> Option<BlockPos>;

    /// Up to `count` upcoming cells, nearest first.
    fn upcoming(&self, count: usize) -> Vec<BlockPos>;
}

/// Breadth-first navigator over a [`World`].
#[derive(Debug, Clone)]
pub struct GridNavigator {
    locomotion: Locomotion,
    path: Option<NavPath>,
    speed: f64,
    node_budget: usize,
    search_range: u32,
}

impl GridNavigator {
    /// Create an idle navigator.
    pub const fn new(locomotion: Locomotion) -> Self {
        Self {
            locomotion,
            path: None,
            speed: 0.0,
            node_budget: DEFAULT_NODE_BUDGET,
            search_range: DEFAULT_SEARCH_RANGE,
        }
    }

    /// Override search limits.
    #[must_use]
    pub const fn with_limits(mut self, node_budget: usize, search_range: u32) -> Self {
        self.node_budget = node_budget;
        self.search_range = search_range;
        self
    }

    /// Speed of the path currently followed.
    pub const fn speed(&self) -> f64 {
        self.speed
    }

    /// Path currently followed.
    pub const fn current_path(&self) -> Option<&NavPath> {
        self.path.as_ref()
    }

    fn passable(&self, world: &dyn World, pos: BlockPos) -> bool {
        if !world.is_loaded(pos) || !door_gap(world, pos) {
            return false;
        }
        match self.locomotion {
            Locomotion::Flying => true,
            Locomotion::Ground => {
                world.block(pos.below()).sturdy_top
                    || world.block(pos).water
                    || world.block(pos.below()).water
            }
        }
    }

    fn neighbors(&self, world: &dyn World, cell: BlockPos) -> Vec<BlockPos> {
        let mut out = Vec::with_capacity(14);
        match self.locomotion {
            Locomotion::Flying => {
                out.extend(cell.horizontal_neighbors());
                out.push(cell.above());
                out.push(cell.below());
            }
            Locomotion::Ground => {
                for side in cell.horizontal_neighbors() {
                    out.extend([side, side.above(), side.below()]);
                }
                if world.block(cell).water {
                    out.push(cell.above());
                    out.push(cell.below());
                }
            }
        }
        out
    }

    /// Bounded BFS. Returns the goal path, or the path to the explored cell
    /// closest to `target` when `settle` is set.
    fn search(
        &self,
        world: &dyn World,
        from: BlockPos,
        target: BlockPos,
        tolerance: u32,
        settle: bool,
    ) -> Option<NavPath> {
        let mut parents: HashMap<BlockPos, BlockPos> = HashMap::new();
        let mut queue = VecDeque::from([from]);
        parents.insert(from, from);
        let mut best = from;

        while let Some(cell) = queue.pop_front() {
            if chebyshev(cell, target) <= tolerance {
                return Some(build_path(&parents, from, cell, target, true));
            }
            if cell.dist_sqr(target) < best.dist_sqr(target) {
                best = cell;
            }
            if parents.len() >= self.node_budget {
                continue;
            }
            for next in self.neighbors(world, cell) {
                if parents.contains_key(&next)
                    || chebyshev(next, from) > self.search_range
                    || !self.passable(world, next)
                {
                    continue;
                }
                parents.insert(next, cell);
                queue.push_back(next);
            }
        }

        (settle && best != from).then(|| build_path(&parents, from, best, target, false))
    }
}

/// A closed door counts as passable; the body waits until it is opened.
fn door_gap(world: &dyn World, pos: BlockPos) -> bool {
    let clear = |p: BlockPos| !world.block(p).collision || world.block_has_tag(p, BlockTag::Door);
    clear(pos) && clear(pos.above())
}

fn chebyshev(a: BlockPos, b: BlockPos) -> u32 {
    a.x.abs_diff(b.x).max(a.y.abs_diff(b.y)).max(a.z.abs_diff(b.z))
}

fn build_path(
    parents: &HashMap<BlockPos, BlockPos>,
    from: BlockPos,
    end: BlockPos,
    target: BlockPos,
    reaches_target: bool,
) -> NavPath {
    let mut nodes = VecDeque::new();
    let mut cur = end;
    while cur != from {
        nodes.push_front(cur);
        match parents.get(&cur) {
            Some(&parent) => cur = parent,
            None => break,
        }
    }
    NavPath {
        nodes,
        target,
        reaches_target,
    }
}

impl Navigator for GridNavigator {
    fn locomotion(&self) -> Locomotion {
        self.locomotion
    }

    fn create_path(
        &self,
        world: &dyn World,
        from: BlockPos,
        target: BlockPos,
        tolerance: u32,
    ) -> Option<NavPath> {
        self.search(world, from, target, tolerance, false)
    }

    fn follow(&mut self, path: NavPath, speed: f64) -> bool {
        self.speed = speed;
        self.path = (!path.is_empty()).then_some(path);
        true
    }

    fn move_to(&mut self, world: &dyn World, from: BlockPos, target: Vec3, speed: f64) -> bool {
        match self.search(world, from, target.block_pos(), 1, true) {
            Some(path) => self.follow(path, speed),
            None => false,
        }
    }

    fn is_done(&self) -> bool {
        self.path.is_none()
    }

    fn stop(&mut self) {
        self.path = None;
    }

    fn next_step(&mut self) -> Option<BlockPos> {
        let path = self.path.as_mut()?;
        let step = path.nodes.pop_front();
        if path.nodes.is_empty() {
            self.path = None;
        }
        step
    }

    fn peek_step(&self) -> Option<BlockPos> {
        self.path.as_ref().and_then(|p| p.nodes.front().copied())
    }

    fn upcoming(&self, count: usize) -> Vec<BlockPos> {
        self.path
            .as_ref()
            .map(|p| p.nodes.iter().take(count).copied().collect())
            .unwrap_or_default()
    }
}
