//! Water simulation and optics: wave field, grid, Fresnel shading and the
//! caustics scatter model.

pub mod caustics;
pub mod grid;
pub mod optics;
pub mod wave;

pub use caustics::{render_caustics, CausticsRenderTarget, ProjectedPoint};
pub use grid::{WaterGrid, WaterPoint};
pub use optics::{refract, schlick, RefractionLookup};
pub use wave::{WaveField, WaveSample};
