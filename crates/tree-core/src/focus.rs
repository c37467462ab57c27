//! Nearest-to-centre focus selection.

use glam::{Mat4, Vec3, Vec4};

use crate::camera::Camera;
use crate::object::ObjectId;

/// Screen-space distance from the viewport centre, in NDC units.
///
/// `None` when the point is behind the eye or beyond the far plane.
#[inline]
pub fn screen_distance(view_proj: &Mat4, world: Vec3) -> Option<f32> {
    let clip = *view_proj * Vec4::new(world.x, world.y, world.z, 1.0);
    if clip.w <= 0.0 {
        return None;
    }
    let ndc = clip.truncate() / clip.w;
    if ndc.z >= 1.0 {
        return None;
    }
    Some(ndc.x.hypot(ndc.y))
}

/// Pick the candidate closest to screen centre within `grab_radius`.
///
/// Candidates are `(id, world position)` in population order; on ties the
/// first one wins.
pub fn select_focus<I>(candidates: I, camera: &Camera, grab_radius: f32) -> Option<ObjectId>
where
    I: IntoIterator<Item = (ObjectId, Vec3)>,
{
    let view_proj = camera.view_projection();
    let mut best: Option<(ObjectId, f32)> = None;
    for (id, world) in candidates {
        let Some(dist) = screen_distance(&view_proj, world) else {
            continue;
        };
        if dist >= grab_radius {
            continue;
        }
        match best {
            Some((_, best_dist)) if dist >= best_dist => {}
            _ => best = Some((id, dist)),
        }
    }
    best.map(|(id, _)| id)
}
