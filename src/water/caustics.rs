//! Caustics scatter pass on the CPU.
//!
//! Every water vertex is moved to the floor point its refracted sunlight
//! ray hits, and the resulting triangles are rasterized additively into a
//! floor-aligned buffer. Where neighbouring triangles fold over each other
//! the light converges and the texels brighten.
//!
//! `shaders/caustics.wgsl` does the same on the GPU; this model exists so the
//! projection and accumulation rules can be checked without a device.

use glam::{Vec2, Vec3, Vec4};

use super::grid::WaterGrid;
use super::optics::{
    floor_to_clip, floor_to_texcoord, refract, schlick, trace_to_floor, MIN_DESCENT,
};
use super::wave::WaveField;
use crate::params::{LightingParams, PoolParams};
use crate::scene::FrameState;

/// Floor-aligned RGBA accumulation buffer (rgb = sun light, a = transmission)
#[derive(Debug, Clone)]
pub struct CausticsRenderTarget {
    resolution: u32,
    texels: Vec<Vec4>,
}

impl CausticsRenderTarget {
    /// Create a zeroed square target
    pub fn new(resolution: u32) -> Self {
        let count = (resolution * resolution) as usize;
        Self {
            resolution,
            texels: vec![Vec4::ZERO; count],
        }
    }

    pub fn texels(&self) -> &[Vec4] {
        &self.texels
    }

    /// Texel at column `x`, row `y` (row 0 is the far edge, `z = depth`)
    pub fn texel(&self, x: u32, y: u32) -> Vec4 {
        self.texels[(y * self.resolution + x) as usize]
    }

    /// Reset every texel to zero
    pub fn clear(&mut self) {
        self.texels.fill(Vec4::ZERO);
    }

    /// Rasterize one triangle given in clip space, adding interpolated values
    ///
    /// Pixel centers lying exactly on an edge shared by two triangles are
    /// counted for exactly one of them, so a closed mesh covers each texel
    /// once unless it folds over itself.
    pub fn accumulate(&mut self, clip: [Vec2; 3], values: [Vec4; 3]) {
        let res = self.resolution as f32;
        let to_pixel = |c: Vec2| Vec2::new((c.x * 0.5 + 0.5) * res, (0.5 - c.y * 0.5) * res);

        let mut p = clip.map(to_pixel);
        let mut v = values;

        let mut area = edge(p[0], p[1], p[2]);
        if area == 0.0 || !area.is_finite() {
            return;
        }
        if area < 0.0 {
            p.swap(1, 2);
            v.swap(1, 2);
            area = -area;
        }

        let min = p[0].min(p[1]).min(p[2]);
        let max = p[0].max(p[1]).max(p[2]);
        let last = self.resolution as i64 - 1;
        let x0 = ((min.x - 0.5).floor() as i64).max(0);
        let y0 = ((min.y - 0.5).floor() as i64).max(0);
        let x1 = ((max.x - 0.5).ceil() as i64).min(last);
        let y1 = ((max.y - 0.5).ceil() as i64).min(last);

        for y in y0..=y1 {
            for x in x0..=x1 {
                let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let w0 = edge(p[1], p[2], center);
                let w1 = edge(p[2], p[0], center);
                let w2 = edge(p[0], p[1], center);

                if !(covers(w0, p[1], p[2]) && covers(w1, p[2], p[0]) && covers(w2, p[0], p[1])) {
                    continue;
                }

                let value = (w0 * v[0] + w1 * v[1] + w2 * v[2]) / area;
                self.texels[(y * self.resolution as i64 + x) as usize] += value;
            }
        }
    }

    /// Bilinear lookup with clamp-to-edge, `uv` in texture space
    pub fn sample(&self, uv: Vec2) -> Vec4 {
        let res = self.resolution as f32;
        let max = self.resolution - 1;
        let x = (uv.x * res - 0.5).clamp(0.0, max as f32);
        let y = (uv.y * res - 0.5).clamp(0.0, max as f32);

        let (x0, y0) = (x.floor() as u32, y.floor() as u32);
        let (x1, y1) = ((x0 + 1).min(max), (y0 + 1).min(max));
        let (fx, fy) = (x - x0 as f32, y - y0 as f32);

        let top = self.texel(x0, y0).lerp(self.texel(x1, y0), fx);
        let bottom = self.texel(x0, y1).lerp(self.texel(x1, y1), fx);
        top.lerp(bottom, fy)
    }

    /// Caustics contribution at a floor point
    pub fn sample_floor(&self, xz: Vec2, pool: &PoolParams) -> Vec4 {
        self.sample(floor_to_texcoord(xz, pool))
    }
}

/// Signed doubled area of (a, b, p)
///
/// Evaluated in a canonical endpoint order so the two triangles sharing an
/// edge get exactly opposite values.
fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    let raw = |a: Vec2, b: Vec2| (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
    if (a.x, a.y) <= (b.x, b.y) {
        raw(a, b)
    } else {
        -raw(b, a)
    }
}

/// Inside test with a tie-break that only one direction of a shared edge wins
fn covers(w: f32, a: Vec2, b: Vec2) -> bool {
    if w > 0.0 {
        return true;
    }
    w == 0.0 && (b.y > a.y || (b.y == a.y && b.x < a.x))
}

/// A water vertex moved onto the floor along its refracted sun ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedPoint {
    /// Caustics clip-space position
    pub clip: Vec2,
    /// Fresnel transmission `1 - coef` at the surface
    pub transmission: f32,
}

/// Refract sunlight through one water point and project it onto the floor
///
/// Returns `None` when the sun is behind the local surface, the refraction is
/// undefined or the refracted ray does not reach the floor; triangles
/// touching such a point contribute nothing.
pub fn project_point(
    point: Vec2,
    wave: &WaveField,
    frame: &FrameState,
    lighting: &LightingParams,
    pool: &PoolParams,
) -> Option<ProjectedPoint> {
    let sample = wave.sample(point.x, point.y, frame.time_s);
    let world = frame
        .model
        .transform_point3(Vec3::new(point.x, sample.height, point.y));
    let normal = frame.model.transform_vector3(sample.normal).normalize();

    let sun = frame.sun_direction;
    let cosine = normal.dot(sun);
    if cosine <= MIN_DESCENT {
        return None;
    }
    let refracted = refract(-sun, normal, lighting.eta())?;
    let hit = trace_to_floor(world, refracted)?;

    Some(ProjectedPoint {
        clip: floor_to_clip(hit, pool),
        transmission: 1.0 - schlick(lighting.n_air, lighting.n_water, cosine),
    })
}

/// Run the whole caustics pass into `target`
///
/// Returns the number of triangles that contributed light.
pub fn render_caustics(
    target: &mut CausticsRenderTarget,
    grid: &WaterGrid,
    wave: &WaveField,
    frame: &FrameState,
    lighting: &LightingParams,
    pool: &PoolParams,
) -> usize {
    target.clear();

    let projected: Vec<Option<ProjectedPoint>> = grid
        .points
        .iter()
        .map(|p| project_point(Vec2::from_array(p.position), wave, frame, lighting, pool))
        .collect();

    let light = lighting.sun_color * lighting.caustics_intensity;
    let mut contributed = 0;

    for triangle in grid.triangles() {
        let [a, b, c] = triangle.map(|i| projected[i as usize]);
        let (Some(a), Some(b), Some(c)) = (a, b, c) else {
            continue;
        };

        target.accumulate(
            [a.clip, b.clip, c.clip],
            [
                light.extend(a.transmission),
                light.extend(b.transmission),
                light.extend(c.transmission),
            ],
        );
        contributed += 1;
    }

    contributed
}
