//! Drag/resize interaction for the danger-zone rectangle, modeled as a
//! small state machine over discrete pointer events so it is independent
//! of any particular UI toolkit.

use crate::geometry::ScreenRect;

/// Neither side of the rectangle may shrink below this, in layout pixels.
const MIN_SIDE: f32 = 50.0;

/// What the pointer went down on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    Body,
    ResizeHandle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Press {
        target: PointerTarget,
        x: f32,
        y: f32,
    },
    Move {
        x: f32,
        y: f32,
    },
    Release,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Interaction {
    Idle,
    Dragging { start: (f32, f32), initial: ScreenRect },
    Resizing { start: (f32, f32), initial: ScreenRect },
}

/// Consumes pointer events and mutates the rectangle. Press records the
/// gesture origin and the rect's geometry at that moment; moves apply
/// deltas against those; release returns to idle.
#[derive(Debug)]
pub struct RoiInteraction {
    state: Interaction,
}

impl Default for RoiInteraction {
    fn default() -> Self {
        Self::new()
    }
}

impl RoiInteraction {
    pub fn new() -> Self {
        Self {
            state: Interaction::Idle,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.state == Interaction::Idle
    }

    pub fn handle(&mut self, event: PointerEvent, rect: &mut ScreenRect) {
        match (self.state, event) {
            (Interaction::Idle, PointerEvent::Press { target, x, y }) => {
                self.state = match target {
                    PointerTarget::Body => Interaction::Dragging {
                        start: (x, y),
                        initial: *rect,
                    },
                    PointerTarget::ResizeHandle => Interaction::Resizing {
                        start: (x, y),
                        initial: *rect,
                    },
                };
            }
            (Interaction::Dragging { start, initial }, PointerEvent::Move { x, y }) => {
                rect.left = initial.left + (x - start.0);
                rect.top = initial.top + (y - start.1);
            }
            (Interaction::Resizing { start, initial }, PointerEvent::Move { x, y }) => {
                rect.width = (initial.width + (x - start.0)).max(MIN_SIDE);
                rect.height = (initial.height + (y - start.1)).max(MIN_SIDE);
            }
            (_, PointerEvent::Release) => {
                self.state = Interaction::Idle;
            }
            // A press during an active gesture, or a move while idle, is
            // ignored.
            _ => {}
        }
    }
}
