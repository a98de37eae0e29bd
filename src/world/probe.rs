//! Ray probes against [`ProbeCollider`] boxes.
use bevy::{
    math::bounding::{Aabb3d, RayCast3d},
    prelude::*,
};

use crate::avatar::targeting::{ProbeHit, ProbeRequest, RayProbe};

use super::components::{ObjectId, ProbeCategory, ProbeCollider};

#[derive(Debug, Clone, Copy)]
struct ProbeVolume {
    object: ObjectId,
    category: ProbeCategory,
    bounds: Aabb3d,
}

/// Colliders captured for one frame of probing. Held items are left out by the caller.
#[derive(Debug, Default)]
pub struct ColliderSnapshot {
    volumes: Vec<ProbeVolume>,
}

impl FromIterator<(ObjectId, Vec3, ProbeCollider)> for ColliderSnapshot {
    fn from_iter<T: IntoIterator<Item = (ObjectId, Vec3, ProbeCollider)>>(iter: T) -> Self {
        Self {
            volumes: iter
                .into_iter()
                .map(|(object, center, collider)| ProbeVolume {
                    object,
                    category: collider.category,
                    bounds: Aabb3d::new(center, collider.half_extents),
                })
                .collect(),
        }
    }
}

impl RayProbe for ColliderSnapshot {
    /// Nearest collider of the requested category along the segment.
    fn probe(&self, request: &ProbeRequest) -> Option<ProbeHit> {
        let direction = Dir3::new(request.direction).ok()?;
        let ray = RayCast3d::new(request.origin, direction, request.max_distance);

        self.volumes
            .iter()
            .filter(|volume| volume.category == request.category)
            .filter(|volume| Some(volume.object) != request.ignore)
            .filter_map(|volume| {
                ray.aabb_intersection_at(&volume.bounds)
                    .map(|distance| ProbeHit {
                        object: volume.object,
                        distance,
                    })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NEAR: ObjectId = ObjectId::new(1);
    const FAR: ObjectId = ObjectId::new(2);
    const WALL: ObjectId = ObjectId::new(3);

    fn request(max_distance: f32) -> ProbeRequest {
        ProbeRequest {
            origin: Vec3::ZERO,
            direction: Vec3::NEG_Z,
            max_distance,
            category: ProbeCategory::WorldDynamic,
            ignore: None,
        }
    }

    fn snapshot() -> ColliderSnapshot {
        [
            (
                FAR,
                Vec3::new(0.0, 0.0, -10.0),
                ProbeCollider::new(Vec3::splat(0.5), ProbeCategory::WorldDynamic),
            ),
            (
                NEAR,
                Vec3::new(0.0, 0.0, -4.0),
                ProbeCollider::new(Vec3::splat(0.5), ProbeCategory::WorldDynamic),
            ),
            (
                WALL,
                Vec3::new(0.0, 0.0, -2.0),
                ProbeCollider::new(Vec3::splat(0.5), ProbeCategory::WorldStatic),
            ),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn nearest_matching_category_wins() {
        let hit = snapshot().probe(&request(150.0)).expect("ray should hit");
        assert_eq!(hit.object, NEAR);
        assert!((hit.distance - 3.5).abs() < 1e-4);
    }

    #[test]
    fn segment_length_limits_hits() {
        assert_eq!(snapshot().probe(&request(3.0)), None);
    }

    #[test]
    fn ignored_object_is_skipped() {
        let mut req = request(150.0);
        req.ignore = Some(NEAR);
        let hit = snapshot().probe(&req).expect("far box still in range");
        assert_eq!(hit.object, FAR);
    }

    #[test]
    fn zero_direction_never_hits() {
        let mut req = request(150.0);
        req.direction = Vec3::ZERO;
        assert_eq!(snapshot().probe(&req), None);
    }
}
