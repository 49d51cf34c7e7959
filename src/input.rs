use egui::{Context, Event, Key, Modifiers, MouseWheelUnit, PointerButton, Pos2, Rect};

/// Pointer position relative to the canvas' top-left corner, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputLocation {
    pub x: f64,
    pub y: f64,
}

impl InputLocation {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Held keys that change what a drag does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputModifiers {
    /// Shift: smooth appended points
    pub stabilize: bool,
    /// Space: primary drag pans instead of drawing
    pub pan: bool,
}

/// Canvas-level input, already filtered to what the canvas cares about.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown {
        location: InputLocation,
        button: PointerButton,
    },
    PointerMove {
        location: InputLocation,
    },
    PointerUp {
        location: InputLocation,
        button: PointerButton,
    },
    /// The pointer left the canvas or the window.
    PointerLeave,
    /// DOM-style wheel delta: positive scrolls down (zooms out).
    Wheel {
        location: InputLocation,
        delta: f64,
    },
    ModifiersChanged(InputModifiers),
    Undo,
}

/// Approximate pixels per wheel unit, matching browser line/page deltas.
fn wheel_scale(unit: MouseWheelUnit) -> f64 {
    match unit {
        MouseWheelUnit::Point => 1.0,
        MouseWheelUnit::Line => 100.0,
        MouseWheelUnit::Page => 800.0,
    }
}

/// Turns raw egui input into [`InputEvent`]s for one canvas.
#[derive(Debug, Default)]
pub struct InputHandler {
    modifiers: InputModifiers,
    pointer_inside: bool,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    fn relative(canvas_rect: Rect, pos: Pos2) -> InputLocation {
        InputLocation::new((pos.x - canvas_rect.min.x) as f64, (pos.y - canvas_rect.min.y) as f64)
    }

    /// Drain this frame's input. Presses and wheel steps only count inside
    /// `canvas_rect`; releases count anywhere so a drag can always finish.
    pub fn process_input(&mut self, ctx: &Context, canvas_rect: Rect) -> Vec<InputEvent> {
        let mut events = Vec::new();

        ctx.input_mut(|input| {
            let modifiers = InputModifiers {
                stabilize: input.modifiers.shift,
                pan: input.key_down(Key::Space),
            };
            if modifiers != self.modifiers {
                self.modifiers = modifiers;
                events.push(InputEvent::ModifiersChanged(modifiers));
            }

            for event in &input.events {
                match event {
                    Event::PointerButton { pos, button, pressed, .. } => {
                        let location = Self::relative(canvas_rect, *pos);
                        if *pressed {
                            if canvas_rect.contains(*pos) {
                                events.push(InputEvent::PointerDown { location, button: *button });
                            }
                        } else {
                            events.push(InputEvent::PointerUp { location, button: *button });
                        }
                    }
                    Event::PointerMoved(pos) => {
                        let inside = canvas_rect.contains(*pos);
                        if inside {
                            events.push(InputEvent::PointerMove {
                                location: Self::relative(canvas_rect, *pos),
                            });
                        } else if self.pointer_inside {
                            events.push(InputEvent::PointerLeave);
                        }
                        self.pointer_inside = inside;
                    }
                    Event::PointerGone => {
                        if self.pointer_inside {
                            events.push(InputEvent::PointerLeave);
                        }
                        self.pointer_inside = false;
                    }
                    Event::MouseWheel { unit, delta, .. } => {
                        if let Some(pos) = input.pointer.hover_pos() {
                            if canvas_rect.contains(pos) {
                                events.push(InputEvent::Wheel {
                                    location: Self::relative(canvas_rect, pos),
                                    delta: -(delta.y as f64) * wheel_scale(*unit),
                                });
                            }
                        }
                    }
                    _ => {}
                }
            }

            if input.consume_key(Modifiers::COMMAND, Key::Z) {
                events.push(InputEvent::Undo);
            }
        });

        events
    }
}
