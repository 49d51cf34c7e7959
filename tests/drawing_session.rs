use egui::PointerButton;
use sigil_paint::audio::SilentAudio;
use sigil_paint::renderer::LIVE_GLOW;
use sigil_paint::rng::CosmeticRng;
use sigil_paint::{BrushSettings, Camera, Canvas, InputEvent, InputLocation, RecordingSurface, SymmetryMode, Viewport};

const VIEW: Viewport = Viewport { width: 800.0, height: 600.0 };

fn canvas() -> Canvas {
    Canvas::with_rng(Box::new(SilentAudio), CosmeticRng::new(1234))
}

/// Canvas pixel for a world point under the default camera.
fn screen(x: f64, y: f64) -> InputLocation {
    let (sx, sy) = Camera::default().to_screen(&sigil_paint::geometry::Point::new(x, y), VIEW);
    InputLocation::new(sx, sy)
}

fn press(canvas: &mut Canvas, brush: &BrushSettings, x: f64, y: f64) {
    let event = InputEvent::PointerDown { location: screen(x, y), button: PointerButton::Primary };
    canvas.handle_input(&event, VIEW, brush, 0);
}

fn drag(canvas: &mut Canvas, brush: &BrushSettings, x: f64, y: f64) {
    canvas.handle_input(&InputEvent::PointerMove { location: screen(x, y) }, VIEW, brush, 0);
}

fn release(canvas: &mut Canvas, brush: &BrushSettings) {
    let event = InputEvent::PointerUp { location: screen(0.0, 0.0), button: PointerButton::Primary };
    canvas.handle_input(&event, VIEW, brush, 1_000);
}

#[test]
fn six_fold_stroke_is_stored_and_drawn_six_times() {
    let brush = BrushSettings::default();
    assert_eq!(brush.symmetry, SymmetryMode::Six);
    let mut canvas = canvas();

    press(&mut canvas, &brush, 0.0, 0.0);
    for i in 1..5 {
        let d = i as f64 * 12.5;
        drag(&mut canvas, &brush, d, d);
    }
    release(&mut canvas, &brush);

    let strokes = canvas.document().strokes();
    assert_eq!(strokes.len(), 1);
    assert_eq!(strokes[0].symmetry(), 6);
    assert_eq!(strokes[0].points().len(), 5);
    let last = strokes[0].points()[4];
    assert!((last.x - 50.0).abs() < 1e-9 && (last.y - 50.0).abs() < 1e-9);

    let mut surface = RecordingSurface::new();
    canvas.render(&mut surface, VIEW, &brush);
    let rotations: Vec<f64> = surface
        .paths
        .iter()
        .filter(|p| p.style.glow == LIVE_GLOW)
        .map(|p| p.rotation)
        .collect();
    assert_eq!(rotations.len(), 6);
    for (s, rotation) in rotations.iter().enumerate() {
        assert!((rotation - s as f64 * std::f64::consts::FRAC_PI_3).abs() < 1e-12);
    }
}

#[test]
fn undo_on_empty_log_changes_nothing() {
    let mut canvas = canvas();
    assert!(!canvas.undo());
    assert!(canvas.document().is_empty());
    assert!(canvas.state().is_idle());
}

#[test]
fn clear_while_drawing_discards_the_gesture() {
    let brush = BrushSettings::default();
    let mut canvas = canvas();
    press(&mut canvas, &brush, 0.0, 0.0);
    for i in 1..10 {
        drag(&mut canvas, &brush, i as f64 * 3.0, 0.0);
    }
    canvas.clear();
    release(&mut canvas, &brush);
    assert!(canvas.document().is_empty());
}

#[test]
fn changing_symmetry_later_does_not_touch_existing_strokes() {
    let mut brush = BrushSettings::default();
    brush.symmetry = SymmetryMode::Four;
    let mut canvas = canvas();
    press(&mut canvas, &brush, 0.0, 0.0);
    drag(&mut canvas, &brush, 10.0, 0.0);
    drag(&mut canvas, &brush, 20.0, 0.0);
    release(&mut canvas, &brush);

    brush.symmetry = SymmetryMode::Twelve;
    let mut surface = RecordingSurface::new();
    canvas.render(&mut surface, VIEW, &brush);

    assert_eq!(canvas.document().strokes()[0].symmetry(), 4);
    let stroke_draws = surface.paths.iter().filter(|p| p.style.glow == LIVE_GLOW).count();
    assert_eq!(stroke_draws, 4);
    // Guides follow the current brush.
    let spokes = surface.paths.iter().filter(|p| p.style.glow == 0.0).count();
    assert_eq!(spokes, 12);
}

#[test]
fn short_gestures_never_reach_the_log() {
    let brush = BrushSettings::default();
    let mut canvas = canvas();
    press(&mut canvas, &brush, 0.0, 0.0);
    drag(&mut canvas, &brush, 5.0, 5.0);
    release(&mut canvas, &brush);
    assert!(canvas.document().is_empty());

    press(&mut canvas, &brush, 0.0, 0.0);
    drag(&mut canvas, &brush, 5.0, 5.0);
    drag(&mut canvas, &brush, 6.0, 6.0);
    release(&mut canvas, &brush);
    assert_eq!(canvas.document().len(), 1);
}

#[test]
fn zoom_keeps_the_point_under_the_cursor() {
    let mut camera = Camera::new(37.0, -12.0, 1.3);
    let before = camera.to_world(600.0, 150.0, VIEW);
    camera.zoom_at(600.0, 150.0, -250.0, VIEW);
    let after = camera.to_world(600.0, 150.0, VIEW);
    assert!((before.x - after.x).abs() < 1e-9);
    assert!((before.y - after.y).abs() < 1e-9);

    let (sx, sy) = camera.to_screen(&after, VIEW);
    assert!((sx - 600.0).abs() < 1e-9 && (sy - 150.0).abs() < 1e-9);
}
