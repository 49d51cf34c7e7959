use crate::geometry::{Point, Transform2D};

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 5.0;
/// Zoom change per unit of wheel delta.
pub const ZOOM_INTENSITY: f64 = 0.001;

/// Size of the drawing area in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }
}

/// View transform of the live canvas.
///
/// World (0, 0) sits at the viewport center when the pan offset is zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub pan_x: f64,
    pub pan_y: f64,
    zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: 1.0 }
    }
}

/// Map a screen pixel to world space under `camera`.
///
/// `world = (screen - viewport_center - pan) / zoom`
pub fn to_world(screen_x: f64, screen_y: f64, viewport: Viewport, camera: &Camera) -> Point {
    let (cx, cy) = viewport.center();
    Point::new(
        (screen_x - cx - camera.pan_x) / camera.zoom,
        (screen_y - cy - camera.pan_y) / camera.zoom,
    )
}

impl Camera {
    pub fn new(pan_x: f64, pan_y: f64, zoom: f64) -> Self {
        Self { pan_x, pan_y, zoom: clamp_zoom(zoom) }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn to_world(&self, screen_x: f64, screen_y: f64, viewport: Viewport) -> Point {
        to_world(screen_x, screen_y, viewport, self)
    }

    /// Inverse of [`to_world`].
    pub fn to_screen(&self, point: &Point, viewport: Viewport) -> (f64, f64) {
        self.world_to_screen(viewport).apply_point(point)
    }

    /// Render transform: translate by `viewport_center + pan`, then scale by `zoom`.
    pub fn world_to_screen(&self, viewport: Viewport) -> Transform2D {
        let (cx, cy) = viewport.center();
        Transform2D::translate(cx + self.pan_x, cy + self.pan_y).then(&Transform2D::scale(self.zoom))
    }

    pub fn pan(&mut self, delta_x: f64, delta_y: f64) {
        self.pan_x += delta_x;
        self.pan_y += delta_y;
    }

    /// Zoom by a wheel step while keeping the world point under the cursor fixed.
    pub fn zoom_at(&mut self, screen_x: f64, screen_y: f64, wheel_delta: f64, viewport: Viewport) {
        // The anchor must be resolved with the camera as it was before the zoom changes.
        let anchor = self.to_world(screen_x, screen_y, viewport);

        self.zoom = clamp_zoom(self.zoom - wheel_delta * ZOOM_INTENSITY);

        let (cx, cy) = viewport.center();
        self.pan_x = screen_x - cx - anchor.x * self.zoom;
        self.pan_y = screen_y - cy - anchor.y * self.zoom;
    }
}

fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_nan() {
        return 1.0;
    }
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}
