//! Arena-backed Barnes-Hut quadtree.
//!
//! All nodes of a tree live in one `Vec` and refer to their children by index. The tree is
//! rebuilt from scratch every step; an index is only meaningful for the tree generation that
//! produced it.
//!
//! Coordinates follow the screen convention: `y` grows southward, so the south quadrants
//! are the ones with `y >= cy`.
use crate::particles::Particles;
use crate::utils::{
    softened_acceleration, SimulationParams, MAX_TREE_DEPTH, MIN_HALF_SIZE, MIN_ROOT_HALF_SIZE,
    ROOT_MARGIN, ROOT_SPAN_SCALE,
};

/// Index of the root node in [`BarnesHutTree::nodes`].
pub const ROOT: usize = 0;

/// The querying particle and the leaf its position descends to.
#[derive(Clone, Copy)]
struct OwnLeaf {
    node: usize,
    index: usize,
    mass: f64,
}

/// Represents a square region in 2D space.
///
/// Each `Quad` has a center position (cx, cy) and a half-size, which is half the length
/// of one side of the square.
///
/// # Examples
///
/// ```
/// use rs_gravity::particles::{Quad, Quadrant};
///
/// let quad = Quad { cx: 0.0, cy: 0.0, half_size: 1.0 };
/// assert!(quad.contains(0.5, 0.5));
/// assert!(!quad.contains(1.5, 0.5));
///
/// assert_eq!(quad.quadrant(0.5, 0.5), Quadrant::SouthEast);
/// let se = quad.child(Quadrant::SouthEast);
/// assert_eq!((se.cx, se.cy, se.half_size), (0.5, 0.5, 0.5));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quad {
    pub cx: f64,        // center x-coordinate
    pub cy: f64,        // center y-coordinate
    pub half_size: f64, // half the length of one side
}

/// The four children of a node, in storage order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Quadrant {
    NorthWest = 0,
    NorthEast = 1,
    SouthWest = 2,
    SouthEast = 3,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::NorthWest,
        Quadrant::NorthEast,
        Quadrant::SouthWest,
        Quadrant::SouthEast,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    fn is_east(self) -> bool {
        matches!(self, Quadrant::NorthEast | Quadrant::SouthEast)
    }

    fn is_south(self) -> bool {
        matches!(self, Quadrant::SouthWest | Quadrant::SouthEast)
    }
}

impl Quad {
    /// Returns true if the point (x, y) is inside this quad.
    ///
    /// Lower bounds are inclusive and upper bounds exclusive, matching [`Quad::quadrant`].
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.cx - self.half_size &&
            x <  self.cx + self.half_size &&
            y >= self.cy - self.half_size &&
            y <  self.cy + self.half_size
    }

    /// East iff `x >= cx`, south iff `y >= cy`.
    pub fn quadrant(&self, x: f64, y: f64) -> Quadrant {
        match (x >= self.cx, y >= self.cy) {
            (false, false) => Quadrant::NorthWest,
            (true, false) => Quadrant::NorthEast,
            (false, true) => Quadrant::SouthWest,
            (true, true) => Quadrant::SouthEast,
        }
    }

    pub fn child(&self, quadrant: Quadrant) -> Quad {
        let hs = self.half_size * 0.5;
        let dx = if quadrant.is_east() { hs } else { -hs };
        let dy = if quadrant.is_south() { hs } else { -hs };
        Quad { cx: self.cx + dx, cy: self.cy + dy, half_size: hs }
    }

    /// Subdivides the quad into four smaller quads in [`Quadrant::ALL`] order.
    pub fn subdivide(&self) -> [Quad; 4] {
        Quadrant::ALL.map(|quadrant| self.child(quadrant))
    }

    /// Square root cell for a set of particles: centered on their bounding box with
    /// `half_size = max(512, 0.75 * span + 128)`. `None` when there are no particles.
    pub fn enclosing(particles: &Particles) -> Option<Quad> {
        if particles.is_empty() {
            return None;
        }
        let (min_x, max_x) = min_max(&particles.position_x);
        let (min_y, max_y) = min_max(&particles.position_y);

        let span = (max_x - min_x).max(max_y - min_y);
        Some(Quad {
            cx: 0.5 * (min_x + max_x),
            cy: 0.5 * (min_y + max_y),
            half_size: MIN_ROOT_HALF_SIZE.max(ROOT_SPAN_SCALE * span + ROOT_MARGIN),
        })
    }
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}

/// What a leaf holds. Internal nodes keep `Empty`; use [`BarnesHutNode::is_leaf`] to tell
/// them apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Occupancy {
    Empty,
    /// Exactly one particle, by index into the store.
    Particle(usize),
    /// Two or more particles merged into the node's running mass and center of mass because
    /// the node hit the depth or size limit.
    Aggregate,
}

/// One cell of the tree.
#[derive(Clone, Debug, PartialEq)]
pub struct BarnesHutNode {
    pub quad: Quad,
    pub mass: f64,
    pub com_x: f64, // center of mass x
    pub com_y: f64, // center of mass y
    /// Indices into [`BarnesHutTree::nodes`], in [`Quadrant::ALL`] order.
    pub children: [Option<usize>; 4],
    pub occupancy: Occupancy,
}

impl BarnesHutNode {
    pub fn new(quad: Quad) -> Self {
        Self {
            quad,
            mass: 0.0,
            com_x: quad.cx,
            com_y: quad.cy,
            children: [None; 4],
            occupancy: Occupancy::Empty,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }

    pub fn child(&self, quadrant: Quadrant) -> Option<usize> {
        self.children[quadrant.index()]
    }
}

/// Barnes-Hut quadtree over a [`Particles`] store.
///
/// # Examples
///
/// ```
/// use rs_gravity::particles::{BarnesHutTree, Particles};
///
/// let mut particles = Particles::default();
/// particles.add(-100.0, 0.0, 0.0, 0.0, 1.0);
/// particles.add(100.0, 0.0, 0.0, 0.0, 3.0);
///
/// let mut tree = BarnesHutTree::new();
/// tree.build(&particles);
///
/// let root = tree.root().expect("non-empty tree");
/// assert_eq!(root.mass, 4.0);
/// assert_eq!(root.com_x, 50.0);
/// ```
#[derive(Clone, Debug, Default)]
pub struct BarnesHutTree {
    nodes: Vec<BarnesHutNode>,
}

impl BarnesHutTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[BarnesHutNode] {
        &self.nodes
    }

    pub fn root(&self) -> Option<&BarnesHutNode> {
        self.nodes.get(ROOT)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Rebuilds the tree from the current positions. Previous nodes are discarded but the
    /// allocation is reused.
    pub fn build(&mut self, particles: &Particles) {
        self.nodes.clear();
        let Some(root_quad) = Quad::enclosing(particles) else {
            return;
        };
        self.nodes.reserve(particles.count() * 3 + 64);
        self.create_node(root_quad);

        for index in 0..particles.count() {
            self.insert(ROOT, particles, index, 0);
        }

        self.compute_mass_properties(particles);
    }

    fn create_node(&mut self, quad: Quad) -> usize {
        self.nodes.push(BarnesHutNode::new(quad));
        self.nodes.len() - 1
    }

    fn child_for(&self, node: usize, x: f64, y: f64) -> usize {
        let current = &self.nodes[node];
        let quadrant = current.quad.quadrant(x, y);
        match current.child(quadrant) {
            Some(child) => child,
            None => unreachable!("internal node {} without {:?} child", node, quadrant),
        }
    }

    /// Iterative descent from `node`. Depth is bounded by `MAX_TREE_DEPTH` and
    /// `MIN_HALF_SIZE`, past which particles merge into an aggregate leaf.
    fn insert(&mut self, mut node: usize, particles: &Particles, index: usize, mut depth: usize) {
        let (px, py) = particles.position(index);
        loop {
            let current = &self.nodes[node];
            if !current.is_leaf() {
                node = self.child_for(node, px, py);
                depth += 1;
                continue;
            }

            match current.occupancy {
                Occupancy::Empty => {
                    self.nodes[node].occupancy = Occupancy::Particle(index);
                    return;
                }
                Occupancy::Aggregate => {
                    self.accumulate_into_leaf(node, particles, index);
                    return;
                }
                Occupancy::Particle(existing) => {
                    if depth >= MAX_TREE_DEPTH || current.quad.half_size <= MIN_HALF_SIZE {
                        self.accumulate_into_leaf(node, particles, index);
                        return;
                    }

                    self.subdivide(node);
                    let (ex, ey) = particles.position(existing);
                    let existing_child = self.child_for(node, ex, ey);
                    self.insert(existing_child, particles, existing, depth + 1);

                    node = self.child_for(node, px, py);
                    depth += 1;
                }
            }
        }
    }

    fn subdivide(&mut self, node: usize) {
        let quads = self.nodes[node].quad.subdivide();
        let mut children = [None; 4];
        for (slot, quad) in children.iter_mut().zip(quads) {
            *slot = Some(self.create_node(quad));
        }
        let parent = &mut self.nodes[node];
        parent.children = children;
        parent.occupancy = Occupancy::Empty;
    }

    /// Merges particle `index` into the leaf's running mass and center of mass, turning a
    /// single-particle leaf into an aggregate first.
    fn accumulate_into_leaf(&mut self, node: usize, particles: &Particles, index: usize) {
        let (px, py) = particles.position(index);
        let pm = particles.mass[index];
        let leaf = &mut self.nodes[node];

        match leaf.occupancy {
            Occupancy::Empty => {
                leaf.occupancy = Occupancy::Particle(index);
                return;
            }
            Occupancy::Particle(existing) => {
                let (ex, ey) = particles.position(existing);
                leaf.mass = particles.mass[existing];
                leaf.com_x = ex;
                leaf.com_y = ey;
                leaf.occupancy = Occupancy::Aggregate;
            }
            Occupancy::Aggregate => {}
        }

        let old_mass = leaf.mass;
        let new_mass = old_mass + pm;
        if new_mass > 0.0 {
            leaf.com_x = (leaf.com_x * old_mass + px * pm) / new_mass;
            leaf.com_y = (leaf.com_y * old_mass + py * pm) / new_mass;
        }
        leaf.mass = new_mass;
    }

    /// Post-order pass filling `mass`, `com_x` and `com_y` of every node.
    fn compute_mass_properties(&mut self, particles: &Particles) {
        let mut stack = vec![(ROOT, false)];
        while let Some((node, children_done)) = stack.pop() {
            let current = &self.nodes[node];

            if current.is_leaf() {
                let quad = current.quad;
                let leaf = &mut self.nodes[node];
                match leaf.occupancy {
                    Occupancy::Particle(index) => {
                        leaf.mass = particles.mass[index];
                        leaf.com_x = particles.position_x[index];
                        leaf.com_y = particles.position_y[index];
                    }
                    Occupancy::Empty => {
                        leaf.mass = 0.0;
                        leaf.com_x = quad.cx;
                        leaf.com_y = quad.cy;
                    }
                    Occupancy::Aggregate => {}
                }
                continue;
            }

            let children = current.children;
            if !children_done {
                stack.push((node, true));
                stack.extend(children.iter().flatten().map(|&child| (child, false)));
                continue;
            }

            let mut mass_sum = 0.0;
            let mut weighted_x = 0.0;
            let mut weighted_y = 0.0;
            for &child in children.iter().flatten() {
                let c = &self.nodes[child];
                mass_sum += c.mass;
                weighted_x += c.mass * c.com_x;
                weighted_y += c.mass * c.com_y;
            }

            let internal = &mut self.nodes[node];
            internal.mass = mass_sum;
            if mass_sum > 0.0 {
                internal.com_x = weighted_x / mass_sum;
                internal.com_y = weighted_y / mass_sum;
            } else {
                internal.com_x = internal.quad.cx;
                internal.com_y = internal.quad.cy;
            }
        }
    }

    /// Approximate gravitational acceleration on particle `index` of the store the tree was
    /// built from.
    ///
    /// The particle never attracts itself. Its own single-particle leaf is skipped, and an
    /// aggregate leaf it was merged into acts with the particle's mass taken out.
    ///
    /// `stack` is scratch space reused between calls to avoid reallocating per particle.
    pub fn acceleration_on(
        &self,
        index: usize,
        particles: &Particles,
        params: &SimulationParams,
        stack: &mut Vec<usize>,
    ) -> (f64, f64) {
        let (px, py) = particles.position(index);
        let own = self.leaf_for(px, py).map(|node| OwnLeaf { node, index, mass: particles.mass[index] });
        self.walk(px, py, own, params, stack)
    }

    /// Approximate gravitational acceleration at an arbitrary point `(px, py)` from every body
    /// in the tree.
    pub fn acceleration_at(&self, px: f64, py: f64, params: &SimulationParams, stack: &mut Vec<usize>) -> (f64, f64) {
        self.walk(px, py, None, params, stack)
    }

    /// Leaf reached by descending from the root along `(x, y)`, the same route insertion takes.
    pub fn leaf_for(&self, x: f64, y: f64) -> Option<usize> {
        if self.nodes.is_empty() {
            return None;
        }
        let mut node = ROOT;
        while !self.nodes[node].is_leaf() {
            node = self.child_for(node, x, y);
        }
        Some(node)
    }

    /// A cell is taken as one point mass when `(2 * half_size)^2 < theta^2 * (d^2 + eps^2)`;
    /// otherwise its children are visited, north-west first. Leaves always contribute directly
    /// and massless cells are pruned.
    fn walk(
        &self,
        px: f64,
        py: f64,
        own: Option<OwnLeaf>,
        params: &SimulationParams,
        stack: &mut Vec<usize>,
    ) -> (f64, f64) {
        let g = params.gravitational_constant;
        let softening_squared = params.softening_squared();
        let theta_squared = params.theta * params.theta;

        let mut ax = 0.0;
        let mut ay = 0.0;
        let mut add = |mass: f64, com_x: f64, com_y: f64| {
            let (dx, dy) = softened_acceleration(px, py, com_x, com_y, mass, g, softening_squared);
            ax += dx;
            ay += dy;
        };

        stack.clear();
        if self.nodes.is_empty() {
            return (0.0, 0.0);
        }
        stack.push(ROOT);

        while let Some(index) = stack.pop() {
            let node = &self.nodes[index];
            if node.mass <= 0.0 {
                continue;
            }

            if node.is_leaf() {
                match own {
                    Some(own) if own.node == index => match node.occupancy {
                        Occupancy::Particle(p) if p == own.index => {}
                        Occupancy::Aggregate => {
                            let rest = node.mass - own.mass;
                            if rest > 0.0 {
                                add(
                                    rest,
                                    (node.mass * node.com_x - own.mass * px) / rest,
                                    (node.mass * node.com_y - own.mass * py) / rest,
                                );
                            }
                        }
                        _ => add(node.mass, node.com_x, node.com_y),
                    },
                    _ => add(node.mass, node.com_x, node.com_y),
                }
                continue;
            }

            let dx = node.com_x - px;
            let dy = node.com_y - py;
            let d2 = dx * dx + dy * dy + softening_squared;
            let s = node.quad.half_size * 2.0;

            if s * s < theta_squared * d2 {
                add(node.mass, node.com_x, node.com_y);
            } else {
                stack.extend(node.children.iter().rev().flatten());
            }
        }

        (ax, ay)
    }

    /// Sum of the masses of every leaf reachable from the root.
    pub fn leaf_mass_sum(&self) -> f64 {
        self.leaves().map(|node| node.mass).sum()
    }

    pub fn aggregate_leaf_count(&self) -> usize {
        self.leaves().filter(|node| node.occupancy == Occupancy::Aggregate).count()
    }

    /// Depth-first walk over the leaves reachable from the root.
    pub fn leaves(&self) -> impl Iterator<Item = &BarnesHutNode> + '_ {
        let mut stack: Vec<usize> = if self.nodes.is_empty() { Vec::new() } else { vec![ROOT] };
        std::iter::from_fn(move || {
            while let Some(index) = stack.pop() {
                let node = &self.nodes[index];
                if node.is_leaf() {
                    return Some(node);
                }
                stack.extend(node.children.iter().rev().flatten());
            }
            None
        })
    }
}
