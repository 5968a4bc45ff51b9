//! Circle collision helpers
//!
//! Player, adversaries and projectiles are all treated as circles: a center
//! position plus a radius-like `size`. The helpers here are written once
//! against [`Body`] so every pairing uses the same distance test.

use glam::Vec2;

/// Anything with a center and a radius-like size
pub trait Body {
    fn pos(&self) -> Vec2;
    fn size(&self) -> f32;
}

/// True iff the centers are closer than the sum of the sizes
#[inline]
pub fn circles_overlap(a: &impl Body, b: &impl Body) -> bool {
    a.pos().distance(b.pos()) < a.size() + b.size()
}

/// True iff `body`'s center lies strictly inside the circle at `center`
///
/// Used for area effects, which contain centers rather than touching edges.
#[inline]
pub fn within_radius(body: &impl Body, center: Vec2, radius: f32) -> bool {
    body.pos().distance(center) < radius
}

/// Push two overlapping circles apart along the line joining their centers
///
/// When the centers are closer than `min_dist`, each moves half of the
/// penetration depth away from the other. Coincident centers have no
/// direction, so they are separated along +X (`a` right, `b` left).
///
/// Returns true if a correction was applied.
pub fn separate_overlap(a: &mut Vec2, b: &mut Vec2, min_dist: f32) -> bool {
    let delta = *a - *b;
    let distance = delta.length();
    if distance >= min_dist {
        return false;
    }

    let dir = if distance > 0.0 { delta / distance } else { Vec2::X };
    let push = dir * (min_dist - distance) / 2.0;
    *a += push;
    *b -= push;
    true
}

/// Unit vector from `from` toward `to`, or `None` when they coincide
#[inline]
pub fn direction_to(from: Vec2, to: Vec2) -> Option<Vec2> {
    let delta = to - from;
    let distance = delta.length();
    (distance > 0.0).then(|| delta / distance)
}
