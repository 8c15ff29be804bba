//! 2D vector math shared by the flocking and bird models.

/// A 2D vector used for positions, velocities and forces.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    pub fn magnitude(&self) -> f32 {
        #[cfg(feature = "std")]
        {
            (self.x * self.x + self.y * self.y).sqrt()
        }
        #[cfg(not(feature = "std"))]
        {
            libm::sqrtf(self.x * self.x + self.y * self.y)
        }
    }

    pub fn magnitude_squared(&self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    pub fn normalize(&self) -> Self {
        let mag = self.magnitude();
        if mag > 0.0 {
            Self {
                x: self.x / mag,
                y: self.y / mag,
            }
        } else {
            Self::zero()
        }
    }

    /// Clamps the vector's length to `max`, preserving direction.
    ///
    /// A zero-length vector is within any non-negative bound, so it is
    /// returned unchanged. Applying `limit` twice is the same as once.
    pub fn limit(&self, max: f32) -> Self {
        let mag = self.magnitude();
        if mag > max {
            let normalized = self.normalize();
            Self {
                x: normalized.x * max,
                y: normalized.y * max,
            }
        } else {
            *self
        }
    }

    pub fn distance(&self, other: &Vec2) -> f32 {
        (*self - *other).magnitude()
    }

    /// Squared distance, used for neighbor tests to skip the square root.
    pub fn distance_squared(&self, other: &Vec2) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Angle of the vector in radians, measured from the positive x axis.
    pub fn heading(&self) -> f32 {
        #[cfg(feature = "std")]
        {
            self.y.atan2(self.x)
        }
        #[cfg(not(feature = "std"))]
        {
            libm::atan2f(self.y, self.x)
        }
    }

    pub fn lerp(&self, other: &Vec2, t: f32) -> Self {
        Self {
            x: lerp(self.x, other.x, t),
            y: lerp(self.y, other.y, t),
        }
    }
}

impl core::ops::Add for Vec2 {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl core::ops::Sub for Vec2 {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl core::ops::Mul<f32> for Vec2 {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

impl core::ops::Div<f32> for Vec2 {
    type Output = Self;

    fn div(self, scalar: f32) -> Self {
        Self {
            x: self.x / scalar,
            y: self.y / scalar,
        }
    }
}

impl core::ops::AddAssign for Vec2 {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

/// Linear interpolation between two scalars.
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Interpolates between two angles along the shorter angular path.
///
/// The difference is wrapped into (-π, π] before interpolating, so crossing
/// the ±π seam takes the short way around instead of spinning the long way.
pub fn lerp_angle(a: f32, b: f32, t: f32) -> f32 {
    let mut delta = b - a;
    while delta > core::f32::consts::PI {
        delta -= core::f32::consts::TAU;
    }
    while delta < -core::f32::consts::PI {
        delta += core::f32::consts::TAU;
    }
    a + delta * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f32::consts::PI;

    fn angular_distance(a: f32, b: f32) -> f32 {
        let mut d = b - a;
        while d > PI {
            d -= core::f32::consts::TAU;
        }
        while d < -PI {
            d += core::f32::consts::TAU;
        }
        d.abs()
    }

    #[test]
    fn test_magnitude() {
        let v = Vec2::new(3.0, 4.0);
        assert_eq!(v.magnitude(), 5.0);
        assert_eq!(v.magnitude_squared(), 25.0);
    }

    #[test]
    fn test_normalize() {
        let v = Vec2::new(3.0, 4.0);
        assert!((v.normalize().magnitude() - 1.0).abs() < 0.0001);
        assert_eq!(Vec2::zero().normalize(), Vec2::zero());
    }

    #[test]
    fn test_limit_clamps_long_vectors() {
        let v = Vec2::new(30.0, 40.0);
        let limited = v.limit(5.0);
        assert!((limited.magnitude() - 5.0).abs() < 0.0001);
        // Direction preserved
        assert!((limited.normalize().x - v.normalize().x).abs() < 0.0001);
    }

    #[test]
    fn test_limit_is_idempotent() {
        let v = Vec2::new(30.0, 40.0);
        let once = v.limit(5.0);
        let twice = once.limit(5.0);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_limit_zero_vector() {
        assert_eq!(Vec2::zero().limit(0.0), Vec2::zero());
        assert_eq!(Vec2::zero().limit(10.0), Vec2::zero());
    }

    #[test]
    fn test_operators() {
        let v1 = Vec2::new(1.0, 2.0);
        let v2 = Vec2::new(3.0, 4.0);

        assert_eq!(v1 + v2, Vec2::new(4.0, 6.0));
        assert_eq!(v2 - v1, Vec2::new(2.0, 2.0));
        assert_eq!(v1 * 2.0, Vec2::new(2.0, 4.0));
        assert_eq!(v2 / 2.0, Vec2::new(1.5, 2.0));
    }

    #[test]
    fn test_scalar_lerp() {
        assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
        assert_eq!(lerp(2.0, 2.0, 0.3), 2.0);
    }

    #[test]
    fn test_lerp_angle_wraps_at_pi() {
        // From just below +π to just above -π: the short way crosses the seam.
        let a = PI - 0.1;
        let b = -PI + 0.1;
        let mid = lerp_angle(a, b, 0.5);
        assert!(angular_distance(a, mid) < 0.2);
    }

    #[test]
    fn test_lerp_angle_converges() {
        let cases = [
            (0.0, 1.0),
            (3.0, -3.0),
            (-2.5, 2.5),
            (0.1, -0.1),
            (PI - 0.01, -PI + 0.5),
        ];
        for &(a, b) in &cases {
            for &t in &[0.1, 0.5, 0.9] {
                let out = lerp_angle(a, b, t);
                assert!(
                    angular_distance(out, b) < angular_distance(a, b),
                    "lerp_angle({a}, {b}, {t}) = {out} did not move toward target"
                );
            }
        }
    }
}
