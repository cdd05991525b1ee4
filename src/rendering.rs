use std::sync::atomic::{AtomicBool, Ordering};

use rand::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use rayon::prelude::*;
use thiserror::Error;

use crate::geometry::{Fp, Ray, Vec3f};

/// Radiance estimation for primary rays. Implementations are read-only
/// over all shared state during rendering and safe to call from many
/// workers at once.
pub trait Renderer: Sync {
    /// Radiance estimate for one primary ray. The result is always
    /// finite and non-negative per channel.
    fn pixel_colour(&self, ray: &Ray, rng: &mut dyn RngCore) -> Vec3f;
}

#[derive(Debug, Error)]
pub enum RendererError {
    #[error("maximum trace depth must be at least 1")]
    ZeroMaxDepth,
    #[error("the photon map renderer needs at least one emissive render group")]
    NoEmissiveGroups,
}

const TILE_SIZE: usize = 256;

/// Estimates radiance for a batch of primary rays in parallel. Rays are
/// split into fixed-size tiles; every tile owns a deterministic RNG
/// seeded from its index, so results are reproducible regardless of
/// which threads take which tiles. The cancel flag is checked once per
/// tile; cancelled tiles come back black.
pub fn render_rays<R: Renderer + ?Sized>(
    renderer: &R,
    rays: &[Ray],
    cancel: &AtomicBool,
) -> Vec<Vec3f> {
    rays.par_chunks(TILE_SIZE)
        .enumerate()
        .flat_map_iter(|(tile_index, tile)| {
            let mut rng = Xoshiro256StarStar::seed_from_u64(tile_index as u64);
            let cancelled = cancel.load(Ordering::Relaxed);
            tile.iter().map(move |ray| {
                if cancelled {
                    Vec3f::zeros()
                } else {
                    renderer.pixel_colour(ray, &mut rng)
                }
            })
        })
        .collect()
}

// NaN and infinity collapse to zero contribution, negative channels
// clamp to zero; pixel_colour's contract.
pub(crate) fn clamp_finite(colour: Vec3f) -> Vec3f {
    colour.map(|channel| {
        if channel.is_finite() {
            Fp::max(0.0, channel)
        } else {
            0.0
        }
    })
}
