//! Collision detection between the player sphere and obstacle boxes
//!
//! Closest-point test: clamp the sphere center into the box, then compare
//! the squared distance to that point against the squared radius.

use glam::Vec3;

use super::state::Obstacle;

/// Closest point on an axis-aligned box to `p`
#[inline]
pub fn closest_point_on_aabb(p: Vec3, min: Vec3, max: Vec3) -> Vec3 {
    p.clamp(min, max)
}

/// Whether a sphere overlaps an axis-aligned box
#[inline]
pub fn sphere_aabb_intersects(center: Vec3, radius: f32, min: Vec3, max: Vec3) -> bool {
    let closest = closest_point_on_aabb(center, min, max);
    closest.distance_squared(center) < radius * radius
}

/// Id of the first obstacle the player sphere touches
pub fn first_hit(player_pos: Vec3, player_radius: f32, obstacles: &[Obstacle]) -> Option<u32> {
    obstacles
        .iter()
        .find(|o| sphere_aabb_intersects(player_pos, player_radius, o.min(), o.max()))
        .map(|o| o.id)
}

/// Whether the player sphere touches any obstacle
#[inline]
pub fn check_collisions(player_pos: Vec3, player_radius: f32, obstacles: &[Obstacle]) -> bool {
    first_hit(player_pos, player_radius, obstacles).is_some()
}
