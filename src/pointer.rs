//! Axis-locked pointer integration.
//!
//! Every update moves the pointer one fixed step on each axis, snaps the
//! weaker axis back to the viewport center and clamps to the viewport. The
//! reachable region is a cross through the center; diagonals are unreachable.

use crate::types::{Direction, Horizontal, Pointer, Vertical, Viewport};

#[derive(Debug, Clone, Copy)]
pub struct PointerController {
    viewport: Viewport,
    step: i32,
}

impl PointerController {
    pub fn new(viewport: Viewport, step: i32) -> Self {
        Self { viewport, step }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn home(&self) -> Pointer {
        self.viewport.center()
    }

    pub fn update(&self, pointer: &mut Pointer, direction: Direction) {
        *pointer = self.advance(*pointer, direction);
    }

    pub fn advance(&self, pointer: Pointer, direction: Direction) -> Pointer {
        let stepped = apply_step(pointer, direction, self.step);
        clamp(axis_lock(stepped, self.viewport.center()), self.viewport)
    }
}

pub fn apply_step(p: Pointer, direction: Direction, step: i32) -> Pointer {
    let x = match direction.horizontal {
        Horizontal::Left => p.x.saturating_sub(step),
        Horizontal::Right => p.x.saturating_add(step),
    };
    let y = match direction.vertical {
        Vertical::Up => p.y.saturating_sub(step),
        Vertical::Down => p.y.saturating_add(step),
    };
    Pointer::new(x, y)
}

/// Keeps the axis with the strictly larger deviation; ties keep the vertical.
pub fn axis_lock(p: Pointer, center: Pointer) -> Pointer {
    if p.x.abs_diff(center.x) > p.y.abs_diff(center.y) {
        Pointer::new(p.x, center.y)
    } else {
        Pointer::new(center.x, p.y)
    }
}

pub fn clamp(p: Pointer, viewport: Viewport) -> Pointer {
    Pointer::new(p.x.clamp(0, viewport.width), p.y.clamp(0, viewport.height))
}
