//! Fresnel, refraction and floor shading for the water surface.
//!
//! These functions are the CPU reference of `shaders/surface.wgsl` and
//! `shaders/water.wgsl`. The caustics model uses them directly and the tests
//! pin down the edge cases the shaders must guard.

use glam::{Vec2, Vec3, Vec4};

use crate::params::{LightingParams, PoolParams};

/// Refracted rays must descend at least this steeply to reach the floor
pub(crate) const MIN_DESCENT: f32 = 1e-4;

/// Schlick approximation of Fresnel reflectance
///
/// `cosine` is the cosine between the surface normal and the outgoing
/// direction (view or sun). It is clamped to `[0, 1]`, so grazing or
/// back-facing inputs saturate to full reflection.
pub fn schlick(n1: f32, n2: f32, cosine: f32) -> f32 {
    let r0 = ((n1 - n2) / (n1 + n2)).powi(2);
    let c = cosine.clamp(0.0, 1.0);
    r0 + (1.0 - r0) * (1.0 - c).powi(5)
}

/// Snell refraction of `incident` (pointing towards the surface) through `normal`
///
/// `eta` is `n_from / n_to`. Returns `None` on total internal reflection,
/// where the discriminant under the square root goes negative.
pub fn refract(incident: Vec3, normal: Vec3, eta: f32) -> Option<Vec3> {
    let cos_i = -normal.dot(incident);
    let k = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
    if k < 0.0 {
        return None;
    }
    Some(eta * incident + (eta * cos_i - k.sqrt()) * normal)
}

/// Mirror `incident` about `normal`
pub fn reflect(incident: Vec3, normal: Vec3) -> Vec3 {
    incident - 2.0 * normal.dot(incident) * normal
}

/// Intersect a ray with the floor plane `y = 0`
///
/// Returns the hit (x, z) or `None` when the ray does not travel downward
/// (grazing or rising rays never reach the floor).
pub fn trace_to_floor(origin: Vec3, direction: Vec3) -> Option<Vec2> {
    if direction.y > -MIN_DESCENT {
        return None;
    }
    let s = -origin.y / direction.y;
    let hit = origin + s * direction;
    Some(Vec2::new(hit.x, hit.z))
}

/// Map a floor point to caustics clip space `[-1, 1]²`
pub fn floor_to_clip(xz: Vec2, pool: &PoolParams) -> Vec2 {
    xz / pool.footprint() * 2.0 - Vec2::ONE
}

/// Map a floor point to caustics texture coordinates (v grows downward)
pub fn floor_to_texcoord(xz: Vec2, pool: &PoolParams) -> Vec2 {
    let uv = xz / pool.footprint();
    Vec2::new(uv.x, 1.0 - uv.y)
}

/// Where a refracted view ray picks up its color
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RefractionLookup {
    /// Shade the floor at this (x, z)
    Floor(Vec2),
    /// Sample the environment along this direction
    Environment(Vec3),
}

/// Decide floor vs environment for a refracted ray leaving `origin`
pub fn refraction_lookup(origin: Vec3, direction: Vec3, pool: &PoolParams) -> RefractionLookup {
    match trace_to_floor(origin, direction) {
        Some(hit) if pool.contains(hit) => RefractionLookup::Floor(hit),
        _ => RefractionLookup::Environment(direction),
    }
}

/// Phong floor shading with caustics folded into the albedo
///
/// `caustics` is the caustics buffer texel: rgb accumulated sun color,
/// alpha accumulated transmission.
pub fn shade_floor(
    texture_color: Vec3,
    caustics: Vec4,
    normal: Vec3,
    view_dir: Vec3,
    lighting: &LightingParams,
) -> Vec3 {
    let albedo = texture_color + caustics.w * caustics.truncate();
    let sun = lighting.sun_direction;

    let diffuse = normal.dot(sun).max(0.0);
    let reflected = reflect(-sun, normal);
    let power = 1.0 / (lighting.roughness * lighting.roughness) - 1.0;
    let specular = lighting.glossiness * reflected.dot(view_dir).max(0.0).powf(power);

    albedo * lighting.ambient_color + albedo * (diffuse + specular) * lighting.sun_color
}

/// Fresnel-weighted water color at a surface point
///
/// `environment` samples the cubemap along a direction; `floor` returns the
/// shaded floor color at an (x, z) for a given view direction.
pub fn shade_water<E, F>(
    position: Vec3,
    normal: Vec3,
    camera_position: Vec3,
    lighting: &LightingParams,
    pool: &PoolParams,
    environment: E,
    floor: F,
) -> Vec3
where
    E: Fn(Vec3) -> Vec3,
    F: Fn(Vec2, Vec3) -> Vec3,
{
    let view_dir = (camera_position - position).normalize();
    let mut coef = schlick(lighting.n_air, lighting.n_water, normal.dot(view_dir));

    let reflection = environment(reflect(-view_dir, normal));

    let refraction = match refract(-view_dir, normal, lighting.eta()) {
        Some(direction) => match refraction_lookup(position, direction, pool) {
            RefractionLookup::Floor(hit) => floor(hit, -direction),
            RefractionLookup::Environment(direction) => environment(direction),
        },
        None => {
            coef = 1.0;
            Vec3::ZERO
        }
    };

    coef * reflection + (1.0 - coef) * refraction
}
