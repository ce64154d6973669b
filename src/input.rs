// ============================================================================
// input.rs — Ping, Pong!
// Key bindings, held-key tracking, and per-frame paddle movement sampling.
// ============================================================================

use glam::Vec2;
use winit::keyboard::KeyCode;

use crate::world::{Paddle, WorldState};

/// Game actions bound to physical keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Binding {
    RightUp,
    RightDown,
    LeftUp,
    LeftDown,
    Quit,
}

impl Binding {
    pub fn from_key_code(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::ArrowUp => Some(Binding::RightUp),
            KeyCode::ArrowDown => Some(Binding::RightDown),
            KeyCode::KeyW => Some(Binding::LeftUp),
            KeyCode::KeyS => Some(Binding::LeftDown),
            KeyCode::KeyQ => Some(Binding::Quit),
            _ => None,
        }
    }
}

/// Tracks which movement keys are currently held down.
#[derive(Default, Debug)]
pub struct KeysHeld {
    pub up: bool,
    pub down: bool,
    pub w: bool,
    pub s: bool,
}

impl KeysHeld {
    /// Record a press/release. Quit is an edge event and is not tracked here.
    pub fn set(&mut self, binding: Binding, pressed: bool) {
        match binding {
            Binding::RightUp => self.up = pressed,
            Binding::RightDown => self.down = pressed,
            Binding::LeftUp => self.w = pressed,
            Binding::LeftDown => self.s = pressed,
            Binding::Quit => {}
        }
    }
}

/// Vertical direction for one paddle. Raise wins over lower when both are
/// held. A move that would carry the paddle's box past `field_top` this frame
/// is dropped.
pub fn paddle_movement(
    paddle: &Paddle,
    raise: bool,
    lower: bool,
    step: f32,
    field_top: f32,
) -> Vec2 {
    if raise {
        if paddle.top() + step > field_top {
            Vec2::ZERO
        } else {
            Vec2::Y
        }
    } else if lower {
        if paddle.bottom() - step < -field_top {
            Vec2::ZERO
        } else {
            Vec2::NEG_Y
        }
    } else {
        Vec2::ZERO
    }
}

/// Overwrite both paddles' movement from the held keys. Nothing held means
/// no movement this frame.
pub fn apply_keys(world: &mut WorldState, keys: &KeysHeld, dt: f32) {
    let step = world.speed * dt.max(0.0);
    let field_top = world.field_half_extents.y;

    world.right.movement = paddle_movement(&world.right, keys.up, keys.down, step, field_top);
    world.left.movement = paddle_movement(&world.left, keys.w, keys.s, step, field_top);
}
