//! SDF-based collision detection
//!
//! Static geometry is described by signed distance functions evaluated in the
//! shape's local frame. Negative inside, positive outside.

use glam::Vec3;

/// Signed distance to a sphere centered at the origin
#[inline]
pub fn sd_sphere(p: Vec3, radius: f32) -> f32 {
    p.length() - radius
}

/// Signed distance to an axis-aligned box centered at the origin
pub fn sd_box(p: Vec3, half_extents: Vec3) -> f32 {
    let q = p.abs() - half_extents;
    q.max(Vec3::ZERO).length() + q.max_element().min(0.0)
}

/// Signed distance to a Y-aligned capsule centered at the origin
pub fn sd_capsule(p: Vec3, half_height: f32, radius: f32) -> f32 {
    let y = p.y.clamp(-half_height, half_height);
    (p - Vec3::new(0.0, y, 0.0)).length() - radius
}

/// Signed distance to the half-space below a plane through the origin
#[inline]
pub fn sd_plane(p: Vec3, normal: Vec3) -> f32 {
    p.dot(normal)
}

/// Compute SDF gradient (surface normal) using central differences
pub fn sdf_gradient<F>(p: Vec3, sdf: F) -> Vec3
where
    F: Fn(Vec3) -> f32,
{
    let eps = 1.0e-3;
    let dx = sdf(p + Vec3::X * eps) - sdf(p - Vec3::X * eps);
    let dy = sdf(p + Vec3::Y * eps) - sdf(p - Vec3::Y * eps);
    let dz = sdf(p + Vec3::Z * eps) - sdf(p - Vec3::Z * eps);
    Vec3::new(dx, dy, dz).normalize_or_zero()
}

/// Reflect velocity off a surface with given normal
#[inline]
pub fn reflect(vel: Vec3, normal: Vec3) -> Vec3 {
    vel - 2.0 * vel.dot(normal) * normal
}

/// Sphere-trace a moving ball along `start -> end`
///
/// Returns `(t, normal)` where `t` is the fraction of the path travelled
/// before the ball first touches the surface.
pub fn raymarch_collision<F>(
    start: Vec3,
    end: Vec3,
    ball_radius: f32,
    max_steps: usize,
    sdf: F,
) -> Option<(f32, Vec3)>
where
    F: Fn(Vec3) -> f32,
{
    let dir = end - start;
    let total_dist = dir.length();
    if total_dist < 1.0e-6 {
        return None;
    }
    let dir_norm = dir / total_dist;
    let min_step = ball_radius * 0.05;

    let mut t = 0.0;

    for _ in 0..max_steps {
        let p = start + dir_norm * t;
        let d = sdf(p) - ball_radius;

        if d <= 0.0 {
            let normal = sdf_gradient(p, &sdf);
            return Some(((t / total_dist).min(1.0), normal));
        }

        t += d.max(min_step);

        if t > total_dist {
            break;
        }
    }

    // Landing exactly on the end point still counts
    let d = sdf(end) - ball_radius;
    if d <= 0.0 {
        return Some((1.0, sdf_gradient(end, &sdf)));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sd_box_inside_and_outside() {
        let half = Vec3::new(1.0, 2.0, 3.0);
        assert!((sd_box(Vec3::new(2.0, 0.0, 0.0), half) - 1.0).abs() < 1e-6);
        assert!((sd_box(Vec3::ZERO, half) + 1.0).abs() < 1e-6);
        // Corner distance
        let corner = sd_box(Vec3::new(2.0, 3.0, 3.0), half);
        assert!((corner - 2.0_f32.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn test_sd_capsule() {
        assert!((sd_capsule(Vec3::new(0.0, 3.0, 0.0), 1.0, 0.5) - 1.5).abs() < 1e-6);
        assert!((sd_capsule(Vec3::new(2.0, 0.5, 0.0), 1.0, 0.5) - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_gradient_of_plane_is_normal() {
        let n = sdf_gradient(Vec3::new(3.0, 1.0, -2.0), |p| sd_plane(p, Vec3::Y));
        assert!((n - Vec3::Y).length() < 1e-4);
    }

    #[test]
    fn test_reflect() {
        let reflected = reflect(Vec3::new(1.0, -1.0, 0.0), Vec3::Y);
        assert!((reflected - Vec3::new(1.0, 1.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_raymarch_hits_plane() {
        let hit = raymarch_collision(
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::new(0.0, -2.0, 0.0),
            0.5,
            64,
            |p| sd_plane(p, Vec3::Y),
        );
        let (t, normal) = hit.expect("should hit");
        // Touches when center is at y = 0.5, i.e. 1.5 of 4 units travelled
        assert!((t - 0.375).abs() < 0.02);
        assert!((normal - Vec3::Y).length() < 1e-3);
    }

    #[test]
    fn test_raymarch_misses() {
        let hit = raymarch_collision(
            Vec3::new(0.0, 5.0, 0.0),
            Vec3::new(10.0, 5.0, 0.0),
            0.5,
            64,
            |p| sd_sphere(p - Vec3::new(5.0, 0.0, 0.0), 1.0),
        );
        assert!(hit.is_none());
    }
}
