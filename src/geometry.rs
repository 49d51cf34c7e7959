use std::f64::consts::TAU;

/// A sampled brush position in world space.
///
/// Pressure is carried along when the input device reports it, but nothing
/// in the rendering path reads it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub pressure: Option<f32>,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0, pressure: None };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, pressure: None }
    }

    pub fn with_pressure(mut self, pressure: f32) -> Self {
        self.pressure = Some(pressure);
        self
    }

    /// Rotate about the world origin by `angle` radians.
    pub fn rotated(&self, angle: f64) -> Point {
        let (sin, cos) = angle.sin_cos();
        Point {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
            pressure: self.pressure,
        }
    }
}

/// Rotation of replica `index` out of `count` around the world origin.
pub fn replica_angle(index: u32, count: u32) -> f64 {
    if count == 0 {
        return 0.0;
    }
    TAU / count as f64 * index as f64
}

/// A 2D affine transform stored as the six coefficients of
/// ```text
/// | a c e |
/// | b d f |
/// | 0 0 1 |
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform2D {
    pub const IDENTITY: Transform2D = Transform2D { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: 0.0, f: 0.0 };

    pub fn translate(tx: f64, ty: f64) -> Self {
        Self { e: tx, f: ty, ..Self::IDENTITY }
    }

    pub fn scale(s: f64) -> Self {
        Self { a: s, d: s, ..Self::IDENTITY }
    }

    pub fn rotate(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self { a: cos, b: sin, c: -sin, d: cos, e: 0.0, f: 0.0 }
    }

    /// `self · other`: `other` is applied to a point first, then `self`.
    ///
    /// This mirrors how a canvas context accumulates `translate`, `scale`,
    /// `rotate` calls.
    pub fn then(&self, other: &Transform2D) -> Transform2D {
        Transform2D {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (self.a * x + self.c * y + self.e, self.b * x + self.d * y + self.f)
    }

    pub fn apply_point(&self, p: &Point) -> (f64, f64) {
        self.apply(p.x, p.y)
    }

    /// Uniform scale factor, assuming no shear.
    pub fn scale_factor(&self) -> f64 {
        (self.a * self.a + self.b * self.b).sqrt()
    }
}
