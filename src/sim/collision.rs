//! Collision detection and response against static rectangles
//!
//! Two resolution policies: a one-sided landing test for platforms, and a
//! full AABB push-out for closed gates. Pipes and zones only report overlap;
//! deciding what an overlap means is up to the game.

use super::body::Body;
use super::geom::Rect;
use crate::consts::LANDING_THRESHOLD;

/// Snap the body onto any platform it has just dropped onto.
///
/// A landing needs horizontal overlap, the bottom edge below the platform top,
/// and the bottom edge *before* this step's vertical move within
/// `LANDING_THRESHOLD` of the top. Side contact never snaps.
/// Returns true if the body landed on at least one platform.
pub fn land_on_platforms(body: &mut Body, platforms: &[Rect], dt: f32) -> bool {
    let mut landed = false;
    for platform in platforms {
        let rect = body.rect();
        let previous_bottom = rect.bottom() - body.vel.y * dt;
        if rect.overlaps_x(platform)
            && rect.bottom() > platform.y
            && previous_bottom <= platform.y + LANDING_THRESHOLD
        {
            body.pos.y = platform.y - body.size.y;
            body.vel.y = 0.0;
            body.grounded = true;
            landed = true;
        }
    }
    landed
}

/// Push the body out of a solid rectangle along the axes it is moving on.
///
/// Horizontal motion is undone against the near face; downward motion lands
/// the body on top. Returns true if there was any overlap.
pub fn push_out_of_gate(body: &mut Body, gate: &Rect) -> bool {
    if !body.rect().overlaps(gate) {
        return false;
    }

    if body.vel.x > 0.0 {
        body.pos.x = gate.x - body.size.x;
    } else if body.vel.x < 0.0 {
        body.pos.x = gate.right();
    }

    if body.vel.y > 0.0 {
        body.pos.y = gate.y - body.size.y;
        body.vel.y = 0.0;
        body.grounded = true;
    }

    true
}

/// True if the rectangle overlaps any of the obstacles
pub fn hits_any<I>(rect: &Rect, obstacles: I) -> bool
where
    I: IntoIterator<Item = Rect>,
{
    obstacles.into_iter().any(|o| rect.overlaps(&o))
}
