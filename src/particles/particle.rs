/// Structure-of-arrays storage for point masses.
///
/// Each attribute lives in its own vector and particle `i` is the `i`-th entry of all five.
/// Particles are only ever appended or cleared wholesale, so an index stays valid until the
/// next [`Particles::clear`].
///
/// # Examples
///
/// ```
/// use rs_gravity::particles::Particles;
///
/// let mut particles = Particles::default();
/// particles.reserve(2);
/// particles.add(1.0, 2.0, 0.0, 0.5, 3.0);
/// particles.add(-1.0, 0.0, 0.0, 0.0, 1.0);
///
/// assert_eq!(particles.count(), 2);
/// assert_eq!(particles.position(0), (1.0, 2.0));
/// assert_eq!(particles.total_mass(), 4.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Particles {
    pub position_x: Vec<f64>,
    pub position_y: Vec<f64>,
    pub velocity_x: Vec<f64>,
    pub velocity_y: Vec<f64>,
    pub mass: Vec<f64>,
}

impl Particles {
    pub fn with_capacity(capacity: usize) -> Self {
        let mut particles = Self::default();
        particles.reserve(capacity);
        particles
    }

    pub fn reserve(&mut self, count: usize) {
        self.position_x.reserve(count);
        self.position_y.reserve(count);
        self.velocity_x.reserve(count);
        self.velocity_y.reserve(count);
        self.mass.reserve(count);
    }

    pub fn clear(&mut self) {
        self.position_x.clear();
        self.position_y.clear();
        self.velocity_x.clear();
        self.velocity_y.clear();
        self.mass.clear();
    }

    pub fn add(&mut self, x: f64, y: f64, vx: f64, vy: f64, mass: f64) {
        self.position_x.push(x);
        self.position_y.push(y);
        self.velocity_x.push(vx);
        self.velocity_y.push(vy);
        self.mass.push(mass);
    }

    pub fn count(&self) -> usize {
        self.position_x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.position_x.is_empty()
    }

    pub fn position(&self, index: usize) -> (f64, f64) {
        (self.position_x[index], self.position_y[index])
    }

    pub fn velocity(&self, index: usize) -> (f64, f64) {
        (self.velocity_x[index], self.velocity_y[index])
    }

    pub fn total_mass(&self) -> f64 {
        self.mass.iter().sum()
    }

    /// Mass-weighted centroid, or `None` when the store holds no mass.
    pub fn center_of_mass(&self) -> Option<(f64, f64)> {
        let total = self.total_mass();
        if total <= 0.0 {
            return None;
        }
        let (wx, wy) = self
            .position_x
            .iter()
            .zip(&self.position_y)
            .zip(&self.mass)
            .fold((0.0, 0.0), |(wx, wy), ((x, y), m)| (wx + x * m, wy + y * m));
        Some((wx / total, wy / total))
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.velocity_x
            .iter()
            .zip(&self.velocity_y)
            .zip(&self.mass)
            .map(|((vx, vy), m)| 0.5 * m * (vx * vx + vy * vy))
            .sum()
    }

    pub fn max_speed(&self) -> f64 {
        self.velocity_x
            .iter()
            .zip(&self.velocity_y)
            .map(|(vx, vy)| (vx * vx + vy * vy).sqrt())
            .fold(0.0, f64::max)
    }
}
