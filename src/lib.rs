//! Light-transport core of an offline physically based renderer.
//!
//! The crate estimates the radiance arriving along primary rays by
//! combining two integrators over a shared scene of triangles and
//! spheres: a pure Monte Carlo path tracer ([`MonteCarloRenderer`]) and a
//! photon-map-assisted tracer ([`PhotonMapRenderer`]) that substitutes a
//! precomputed photon gather for indirect and caustic illumination.
//!
//! The usual control flow is: assemble a [`Scene`], call
//! [`Scene::initialize`], optionally [`PhotonMap::build`], construct a
//! renderer and feed it primary rays, either one at a time through
//! [`Renderer::pixel_colour`] or in parallel batches through
//! [`render_rays`]. Camera models, multisampling, tone mapping and image
//! output all live outside this crate.

extern crate nalgebra as na;

mod aabb;
mod geometry;
mod material;
mod monte_carlo;
mod octree;
mod photon;
mod photon_renderer;
mod rendering;
mod sampling;
mod scene;
#[cfg(test)]
mod tests;
mod utils;

pub use aabb::Aabb;
pub use geometry::{Fp, Primitive, Ray, Vec3f, EPS};
pub use material::Material;
pub use monte_carlo::MonteCarloRenderer;
pub use photon::{Photon, PhotonKind, PhotonMap, PhotonMapConfig};
pub use photon_renderer::{PhotonGatherConfig, PhotonMapRenderer};
pub use rendering::{render_rays, Renderer, RendererError};
pub use scene::{Hit, RenderGroup, Scene, SceneError};
