//! 2D point helpers used by drone behaviors

use glam::Vec2;

pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

pub fn add(a: Vec2, b: Vec2) -> Vec2 {
    a + b
}

/// One grid step from `from` toward `to`: each axis moves by -1, 0 or 1.
pub fn step_toward(from: Vec2, to: Vec2) -> Vec2 {
    from + Vec2::new(sign(to.x - from.x), sign(to.y - from.y))
}

// glam's signum maps 0.0 to 1.0
fn sign(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}
