//! Small helpers for normalising vectors and projecting onto circle tangents.
use glam::Vec2;

/// Returns the unit vector in the direction of `vector`.
///
/// The function checks that the vector is finite and non-zero before
/// normalising. If the input is invalid or the zero vector, it returns
/// [`Vec2::ZERO`].
///
/// # Examples
///
/// ```
/// use glam::Vec2;
/// use tilebound::vec_normalize;
/// let unit = vec_normalize(Vec2::new(3.0, 4.0));
/// assert!((unit.x - 0.6).abs() < 1e-6);
/// assert!((unit.y - 0.8).abs() < 1e-6);
///
/// assert_eq!(vec_normalize(Vec2::ZERO), Vec2::ZERO);
/// ```
#[must_use]
pub fn vec_normalize(vector: Vec2) -> Vec2 {
    if !vector.is_finite() {
        return Vec2::ZERO;
    }
    vector.try_normalize().unwrap_or(Vec2::ZERO)
}

/// Redirects `inertia` along the tangent of a circle at `radial`.
///
/// `radial` points from the circle's center to the point on its rim. The
/// result keeps the magnitude of `inertia` but only its tangential
/// direction. When `inertia` is purely radial there is no tangential
/// component and the input is returned unchanged.
///
/// # Examples
///
/// ```
/// use glam::Vec2;
/// use tilebound::vector_math::tangent_redirect;
/// let swung = tangent_redirect(Vec2::new(0.0, 1.0), Vec2::new(3.0, 4.0));
/// assert!((swung.length() - 5.0).abs() < 1e-5);
/// assert!(swung.y.abs() < 1e-5);
/// ```
#[must_use]
pub fn tangent_redirect(radial: Vec2, inertia: Vec2) -> Vec2 {
    let normal = vec_normalize(radial);
    let tangent = Vec2::new(normal.y, -normal.x);
    let projected = tangent * tangent.dot(inertia);
    match projected.try_normalize() {
        Some(direction) => direction * inertia.length(),
        None => inertia,
    }
}
