//! Water pool renderer library
//!
//! An animated pool: analytic wave field, Fresnel reflection and refraction,
//! and caustics scattered from the water surface onto a textured floor.

pub mod camera;
pub mod cli;
pub mod error;
pub mod input;
pub mod params;
pub mod rendering;
pub mod scene;
pub mod water;
