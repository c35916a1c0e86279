//! Forward probe and proximity capsule tests against axis-aligned boxes.
use bevy::{
    math::bounding::{Aabb3d, RayCast3d},
    prelude::*,
};

/// Returns the nearest target whose box the ray enters within `max_distance`.
pub fn cast_probe(
    origin: Vec3,
    direction: Dir3,
    max_distance: f32,
    targets: impl IntoIterator<Item = (Entity, Vec3, Vec3)>,
) -> Option<Entity> {
    let cast = RayCast3d::from_ray(Ray3d::new(origin, direction), max_distance);
    targets
        .into_iter()
        .filter_map(|(entity, center, half_extents)| {
            cast.aabb_intersection_at(&Aabb3d::new(center, half_extents))
                .map(|distance| (entity, distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(entity, _)| entity)
}

/// Vertical capsule centred on `center`, spanning `height` between the
/// centres of its end caps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capsule {
    pub center: Vec3,
    pub radius: f32,
    pub height: f32,
}

impl Capsule {
    pub fn overlaps_box(&self, box_center: Vec3, half_extents: Vec3) -> bool {
        self.distance_to_box(box_center, half_extents) <= self.radius
    }

    /// Shortest distance from the capsule's core segment to the box.
    pub fn distance_to_box(&self, box_center: Vec3, half_extents: Vec3) -> f32 {
        let offset = (self.center - box_center).abs();
        let dx = (offset.x - half_extents.x).max(0.0);
        let dz = (offset.z - half_extents.z).max(0.0);

        let half_height = self.height * 0.5;
        let segment_low = self.center.y - half_height;
        let segment_high = self.center.y + half_height;
        let box_low = box_center.y - half_extents.y;
        let box_high = box_center.y + half_extents.y;
        let dy = (segment_low.max(box_low) - segment_high.min(box_high)).max(0.0);

        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}
