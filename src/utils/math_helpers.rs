/// Plummer-softened gravitational acceleration at `(px, py)` due to a point mass `source_mass`
/// at `(sx, sy)`.
///
/// Returns `G * m * d / (|d|^2 + eps^2)^1.5` with `d = source - p`. `softening_squared` keeps the
/// result finite when the two points coincide.
///
/// # Examples
///
/// ```
/// use rs_gravity::utils::softened_acceleration;
///
/// // Unit mass one unit to the right, no softening: |a| = G / r^2
/// let (ax, ay) = softened_acceleration(0.0, 0.0, 1.0, 0.0, 1.0, 2.0, 0.0);
/// assert!((ax - 2.0).abs() < 1e-12);
/// assert_eq!(ay, 0.0);
///
/// // Coincident points stay finite with softening
/// let (ax, ay) = softened_acceleration(0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.01);
/// assert_eq!((ax, ay), (0.0, 0.0));
/// ```
#[inline]
pub fn softened_acceleration(
    px: f64,
    py: f64,
    sx: f64,
    sy: f64,
    source_mass: f64,
    gravitational_constant: f64,
    softening_squared: f64,
) -> (f64, f64) {
    let dx = sx - px;
    let dy = sy - py;
    let r2 = dx * dx + dy * dy + softening_squared;
    let inv_r = 1.0 / r2.sqrt();
    let inv_r3 = inv_r * inv_r * inv_r;
    let scale = gravitational_constant * source_mass * inv_r3;
    (dx * scale, dy * scale)
}
