use std::sync::atomic::AtomicBool;

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

use crate::geometry::{Fp, Primitive, Ray, Vec3f, EPS};
use crate::material::Material;
use crate::monte_carlo::MonteCarloRenderer;
use crate::octree::Octree;
use crate::photon::{PhotonKind, PhotonMap, PhotonMapConfig};
use crate::photon_renderer::{PhotonGatherConfig, PhotonMapRenderer};
use crate::rendering::{render_rays, Renderer, RendererError};
use crate::sampling::{cosine_weighted_hemisphere, reflect, refract, uniform_sphere_direction};
use crate::scene::{RenderGroup, Scene, SceneError};
use crate::utils::{almost_equal_floats, almost_equal_vecs};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn rng(seed: u64) -> Xoshiro256StarStar {
    Xoshiro256StarStar::seed_from_u64(seed)
}

// Two triangles spanning the quad a-b-c-d; the normal follows the
// winding.
fn quad(a: Vec3f, b: Vec3f, c: Vec3f, d: Vec3f) -> Vec<Primitive> {
    vec![Primitive::triangle(a, b, c), Primitive::triangle(a, c, d)]
}

fn single_sphere_scene(material: Material) -> Scene {
    let mut scene = Scene::new();
    let m = scene.add_material(material);
    scene.add_render_group(RenderGroup::with_primitives(
        m,
        vec![Primitive::sphere(Vec3f::zeros(), 1.0)],
    ));
    scene.initialize().unwrap();
    scene
}

// Closed box spanning [-3, 3] x [0, 5] x [-3, 3] with a spherical light
// near the ceiling and a glass sphere resting above the floor centre.
fn cornell_box_with_glass_sphere() -> Scene {
    let mut scene = Scene::new();
    let white = scene.add_material(Material::diffuse(Vec3f::new(0.8, 0.8, 0.8)));
    let red = scene.add_material(Material::diffuse(Vec3f::new(0.8, 0.1, 0.1)));
    let green = scene.add_material(Material::diffuse(Vec3f::new(0.1, 0.8, 0.1)));
    let glass = scene.add_material(Material::glass(1.5, 1.0));
    let light = scene.add_material(Material::emissive(Vec3f::new(5.0, 5.0, 5.0)));

    // Floor (+Y), ceiling (-Y), back wall (+Z).
    scene.add_render_group(RenderGroup::with_primitives(
        white,
        quad(
            Vec3f::new(-3.0, 0.0, 3.0),
            Vec3f::new(3.0, 0.0, 3.0),
            Vec3f::new(3.0, 0.0, -3.0),
            Vec3f::new(-3.0, 0.0, -3.0),
        ),
    ));
    scene.add_render_group(RenderGroup::with_primitives(
        white,
        quad(
            Vec3f::new(-3.0, 5.0, 3.0),
            Vec3f::new(-3.0, 5.0, -3.0),
            Vec3f::new(3.0, 5.0, -3.0),
            Vec3f::new(3.0, 5.0, 3.0),
        ),
    ));
    scene.add_render_group(RenderGroup::with_primitives(
        white,
        quad(
            Vec3f::new(3.0, 0.0, -3.0),
            Vec3f::new(3.0, 5.0, -3.0),
            Vec3f::new(-3.0, 5.0, -3.0),
            Vec3f::new(-3.0, 0.0, -3.0),
        ),
    ));
    // Left wall (+X), right wall (-X).
    scene.add_render_group(RenderGroup::with_primitives(
        red,
        quad(
            Vec3f::new(-3.0, 0.0, -3.0),
            Vec3f::new(-3.0, 5.0, -3.0),
            Vec3f::new(-3.0, 5.0, 3.0),
            Vec3f::new(-3.0, 0.0, 3.0),
        ),
    ));
    scene.add_render_group(RenderGroup::with_primitives(
        green,
        quad(
            Vec3f::new(3.0, 0.0, 3.0),
            Vec3f::new(3.0, 5.0, 3.0),
            Vec3f::new(3.0, 5.0, -3.0),
            Vec3f::new(3.0, 0.0, -3.0),
        ),
    ));
    scene.add_render_group(RenderGroup::with_primitives(
        glass,
        vec![Primitive::sphere(Vec3f::new(0.0, 1.0, 0.0), 0.8)],
    ));
    scene.add_render_group(RenderGroup::with_primitives(
        light,
        vec![Primitive::sphere(Vec3f::new(0.0, 4.2, 0.0), 0.4)],
    ));
    scene.initialize().unwrap();
    scene
}

#[test]
fn empty_scene_misses_and_renders_black() {
    let mut scene = Scene::new();
    scene.initialize().unwrap();
    let ray = Ray::new(Vec3f::new(0.0, 0.0, 5.0), Vec3f::new(0.0, 0.0, -1.0));
    assert!(scene.raycast(&ray, false).is_none());

    let renderer = MonteCarloRenderer::new(&scene, 5).unwrap();
    let colour = renderer.pixel_colour(&ray, &mut rng(1));
    assert_eq!(colour, Vec3f::zeros());
}

#[test]
fn primary_ray_sees_raw_emission() {
    let scene = single_sphere_scene(Material::emissive(Vec3f::new(1.0, 1.0, 1.0)));
    let renderer = MonteCarloRenderer::new(&scene, 1).unwrap();
    let ray = Ray::new(Vec3f::new(0.0, 0.0, 5.0), Vec3f::new(0.0, 0.0, -1.0));
    let colour = renderer.pixel_colour(&ray, &mut rng(2));
    assert!(almost_equal_vecs(&colour, &Vec3f::new(1.0, 1.0, 1.0)));
}

#[test]
fn adding_a_primitive_never_lengthens_the_nearest_hit() {
    let ray = Ray::new(Vec3f::new(0.0, 0.0, 5.0), Vec3f::new(0.0, 0.0, -1.0));

    let mut far_only = Scene::new();
    let m = far_only.add_material(Material::diffuse(Vec3f::new(0.5, 0.5, 0.5)));
    far_only.add_render_group(RenderGroup::with_primitives(
        m,
        vec![Primitive::sphere(Vec3f::new(0.0, 0.0, -10.0), 1.0)],
    ));
    far_only.initialize().unwrap();
    let far_t = far_only.raycast(&ray, false).unwrap().distance;

    let mut both = Scene::new();
    let m = both.add_material(Material::diffuse(Vec3f::new(0.5, 0.5, 0.5)));
    both.add_render_group(RenderGroup::with_primitives(
        m,
        vec![Primitive::sphere(Vec3f::new(0.0, 0.0, -10.0), 1.0)],
    ));
    both.add_render_group(RenderGroup::with_primitives(
        m,
        vec![Primitive::sphere(Vec3f::new(0.0, 0.0, -5.0), 1.0)],
    ));
    both.initialize().unwrap();
    let both_t = both.raycast(&ray, false).unwrap().distance;

    assert!(both_t <= far_t);
}

#[test]
fn raycast_ties_resolve_to_lowest_indices() {
    let triangle = || {
        Primitive::triangle(
            Vec3f::new(-1.0, -1.0, 0.0),
            Vec3f::new(1.0, -1.0, 0.0),
            Vec3f::new(0.0, 1.0, 0.0),
        )
    };
    let mut scene = Scene::new();
    let m = scene.add_material(Material::diffuse(Vec3f::new(0.5, 0.5, 0.5)));
    scene.add_render_group(RenderGroup::with_primitives(m, vec![triangle(), triangle()]));
    scene.add_render_group(RenderGroup::with_primitives(m, vec![triangle()]));
    scene.initialize().unwrap();

    let ray = Ray::new(Vec3f::new(0.0, 0.0, 5.0), Vec3f::new(0.0, 0.0, -1.0));
    let hit = scene.raycast(&ray, false).unwrap();
    assert_eq!((hit.group, hit.primitive), (0, 0));
}

#[test]
fn back_face_culling_drops_aligned_normals() {
    let scene = single_sphere_scene(Material::diffuse(Vec3f::new(0.5, 0.5, 0.5)));
    // From inside the sphere every visible surface is a back face.
    let ray = Ray::new(Vec3f::zeros(), Vec3f::new(0.0, 0.0, -1.0));
    assert!(scene.raycast(&ray, true).is_none());
    assert!(scene.raycast(&ray, false).is_some());
}

#[test]
fn initialize_derives_emissive_set_and_is_idempotent() {
    init_logging();
    let mut scene = cornell_box_with_glass_sphere();

    for (index, group) in scene.render_groups.iter().enumerate() {
        let emissive = scene.materials[group.material].is_emissive();
        assert_eq!(scene.emissive_groups().contains(&index), emissive);
    }

    let emissive_before = scene.emissive_groups().to_vec();
    let aabb_before = scene.aabb().clone();
    scene.initialize().unwrap();
    assert_eq!(scene.emissive_groups(), emissive_before.as_slice());
    assert_eq!(*scene.aabb(), aabb_before);
}

#[test]
fn scene_aabb_encloses_every_primitive() {
    let scene = cornell_box_with_glass_sphere();
    for group in &scene.render_groups {
        for primitive in &group.primitives {
            assert!(scene.aabb().contains(&primitive.aabb()));
        }
    }
}

#[test]
fn initialize_rejects_bad_refractive_index() {
    let mut scene = Scene::new();
    scene.add_material(Material {
        refractive_index: 0.5,
        ..Material::default()
    });
    match scene.initialize() {
        Err(SceneError::BadRefractiveIndex { index: 0, .. }) => {}
        other => panic!("expected BadRefractiveIndex, got {other:?}"),
    }
}

#[test]
fn renderer_constructors_reject_bad_configuration() {
    let scene = single_sphere_scene(Material::diffuse(Vec3f::new(0.5, 0.5, 0.5)));
    assert!(matches!(
        MonteCarloRenderer::new(&scene, 0),
        Err(RendererError::ZeroMaxDepth)
    ));

    let map = PhotonMap::build(&scene, &PhotonMapConfig::default());
    assert!(matches!(
        PhotonMapRenderer::new(&scene, 5, &map, PhotonGatherConfig::default()),
        Err(RendererError::NoEmissiveGroups)
    ));
}

#[test]
fn sampled_directions_are_unit_length() {
    let mut r = rng(3);
    let normal = Vec3f::new(0.0, 1.0, 0.0);
    for _ in 0..10_000 {
        let uniform = uniform_sphere_direction(&mut r);
        assert!(almost_equal_floats(uniform.norm(), 1.0));
        let cosine = cosine_weighted_hemisphere(&normal, &mut r);
        assert!(almost_equal_floats(cosine.norm(), 1.0));
        assert!(cosine.dot(&normal) > -10.0 * EPS);
        let reflected = reflect(&uniform, &normal);
        assert!(almost_equal_floats(reflected.norm(), 1.0));
    }
}

#[test]
fn refraction_round_trips_through_a_parallel_slab() {
    let normal = Vec3f::new(0.0, 0.0, 1.0);
    let eta = 1.5;
    for direction in [
        Vec3f::new(0.0, 0.0, -1.0),
        Vec3f::new(0.5, 0.0, -1.0).normalize(),
        Vec3f::new(0.3, -0.4, -1.0).normalize(),
    ] {
        let inside = refract(&direction, &normal, 1.0 / eta).unwrap();
        assert!(almost_equal_floats(inside.norm(), 1.0));
        let outside = refract(&inside, &normal, eta).unwrap();
        assert!(almost_equal_vecs(&outside, &direction));
    }
}

#[test]
fn refraction_reports_total_internal_reflection() {
    let normal = Vec3f::new(0.0, 0.0, 1.0);
    // Grazing exit from the dense side.
    let direction = Vec3f::new(0.9, 0.0, -0.1).normalize();
    assert!(refract(&direction, &normal, 1.5).is_none());
}

#[test]
fn octree_radius_query_matches_linear_scan() {
    let mut r = rng(4);
    let points: Vec<Vec3f> = (0..500)
        .map(|_| uniform_sphere_direction(&mut r) * 3.0)
        .collect();
    let tree = Octree::build(&points, 8, 0.01);

    for (centre, radius) in [
        (Vec3f::zeros(), 0.5),
        (Vec3f::new(1.0, 1.0, 1.0), 1.5),
        (Vec3f::new(-2.0, 0.5, 0.0), 3.0),
        (Vec3f::new(10.0, 0.0, 0.0), 1.0),
        (Vec3f::zeros(), 100.0),
    ] {
        let mut from_tree = Vec::new();
        tree.query_radius(&points, &centre, radius, &mut from_tree);
        from_tree.sort_unstable();

        let from_scan: Vec<usize> = (0..points.len())
            .filter(|&i| (points[i] - centre).norm_squared() <= radius * radius)
            .collect();
        assert_eq!(from_tree, from_scan);
    }
}

#[test]
fn photon_map_stores_positive_bounded_energy() {
    init_logging();
    let scene = cornell_box_with_glass_sphere();
    let config = PhotonMapConfig {
        photons_per_light_source: 5_000,
        ..PhotonMapConfig::default()
    };
    let map = PhotonMap::build(&scene, &config);

    let emission = Vec3f::new(5.0, 5.0, 5.0);
    let initial = emission / config.photons_per_light_source as Fp;
    for kind in PhotonKind::ALL {
        for photon in map.stored_photons(kind) {
            for channel in 0..3 {
                assert!(photon.energy[channel] >= 0.0);
                assert!(photon.energy[channel] <= initial[channel] + EPS);
            }
            assert!(almost_equal_floats(photon.incoming_direction.norm(), 1.0));
            assert!(scene.aabb().contains_point(&photon.position));
        }
    }
    assert!(!map.stored_photons(PhotonKind::Direct).is_empty());
    assert!(!map.stored_photons(PhotonKind::Indirect).is_empty());
    assert!(!map.stored_photons(PhotonKind::Caustic).is_empty());
}

#[test]
fn photon_gather_matches_linear_scan() {
    let scene = cornell_box_with_glass_sphere();
    let config = PhotonMapConfig {
        photons_per_light_source: 2_000,
        ..PhotonMapConfig::default()
    };
    let map = PhotonMap::build(&scene, &config);

    for kind in PhotonKind::ALL {
        for (centre, radius) in [
            (Vec3f::new(0.0, 0.0, 0.0), 0.5),
            (Vec3f::new(-2.0, 2.0, -2.0), 1.0),
            (Vec3f::new(0.0, 2.5, 0.0), 8.0),
        ] {
            let gathered = map.photons_within_radius(kind, &centre, radius);
            let expected = map
                .stored_photons(kind)
                .iter()
                .filter(|p| (p.position - centre).norm_squared() <= radius * radius)
                .count();
            assert_eq!(gathered.len(), expected);
            for photon in gathered {
                assert!((photon.position - centre).norm() <= radius + EPS);
            }
        }
    }
}

#[test]
fn direct_lighting_matches_analytic_value_under_a_small_emitter() {
    // White Lambertian floor, point-like spherical emitter straight
    // above the shaded point: the shadow-ray estimate converges on
    // emission * dot(N, L).
    let mut scene = Scene::new();
    let white = scene.add_material(Material::diffuse(Vec3f::new(1.0, 1.0, 1.0)));
    let light = scene.add_material(Material::emissive(Vec3f::new(1.0, 1.0, 1.0)));
    scene.add_render_group(RenderGroup::with_primitives(
        white,
        quad(
            Vec3f::new(-50.0, 0.0, 50.0),
            Vec3f::new(50.0, 0.0, 50.0),
            Vec3f::new(50.0, 0.0, -50.0),
            Vec3f::new(-50.0, 0.0, -50.0),
        ),
    ));
    scene.add_render_group(RenderGroup::with_primitives(
        light,
        vec![Primitive::sphere(Vec3f::new(0.0, 4.0, 0.0), 0.05)],
    ));
    scene.initialize().unwrap();

    let renderer = MonteCarloRenderer::new(&scene, 1).unwrap();
    let ray = Ray::new(
        Vec3f::new(0.0, 2.0, 2.0),
        Vec3f::new(0.0, -1.0, -1.0).normalize(),
    );
    let mut r = rng(5);
    let samples = 10_000;
    let mut sum = Vec3f::zeros();
    for _ in 0..samples {
        sum += renderer.pixel_colour(&ray, &mut r);
    }
    let average = sum / samples as Fp;
    for channel in 0..3 {
        assert!(
            (average[channel] - 1.0).abs() < 0.05,
            "channel {channel} averaged {}",
            average[channel]
        );
    }
}

#[test]
fn mirror_scales_the_reflected_radiance() {
    let mut scene = Scene::new();
    // Black-bodied mirror so only the reflective branch contributes.
    let mirror = scene.add_material(Material {
        surface_colour: Vec3f::zeros(),
        reflectivity: 0.8,
        ..Material::default()
    });
    let light = scene.add_material(Material::emissive(Vec3f::new(1.0, 1.0, 1.0)));
    // Mirror plane through the origin, tilted 45 degrees to bounce -Z
    // into +X.
    scene.add_render_group(RenderGroup::with_primitives(
        mirror,
        vec![Primitive::triangle(
            Vec3f::new(-10.0, -10.0, 10.0),
            Vec3f::new(10.0, -10.0, -10.0),
            Vec3f::new(0.0, 20.0, 0.0),
        )],
    ));
    // Emissive wall facing the reflected ray head-on.
    scene.add_render_group(RenderGroup::with_primitives(
        light,
        vec![Primitive::triangle(
            Vec3f::new(4.0, -10.0, -10.0),
            Vec3f::new(4.0, -10.0, 10.0),
            Vec3f::new(4.0, 20.0, 0.0),
        )],
    ));
    scene.initialize().unwrap();

    let renderer = MonteCarloRenderer::new(&scene, 2).unwrap();
    let ray = Ray::new(Vec3f::new(0.0, 0.0, 5.0), Vec3f::new(0.0, 0.0, -1.0));
    let colour = renderer.pixel_colour(&ray, &mut rng(6));
    for channel in 0..3 {
        assert!((colour[channel] - 0.8).abs() < 1e-3, "got {colour:?}");
    }
}

#[test]
fn glass_sphere_transmits_less_than_the_wall_behind_it() {
    let mut scene = Scene::new();
    let glass = scene.add_material(Material::glass(1.5, 1.0));
    let light = scene.add_material(Material::emissive(Vec3f::new(1.0, 1.0, 1.0)));
    scene.add_render_group(RenderGroup::with_primitives(
        glass,
        vec![Primitive::sphere(Vec3f::zeros(), 1.0)],
    ));
    // Emissive wall behind the sphere, facing the viewer.
    scene.add_render_group(RenderGroup::with_primitives(
        light,
        quad(
            Vec3f::new(-10.0, -10.0, -3.0),
            Vec3f::new(10.0, -10.0, -3.0),
            Vec3f::new(10.0, 10.0, -3.0),
            Vec3f::new(-10.0, 10.0, -3.0),
        ),
    ));
    scene.initialize().unwrap();

    let renderer = MonteCarloRenderer::new(&scene, 3).unwrap();
    let ray = Ray::new(Vec3f::new(0.0, 0.0, 5.0), Vec3f::new(0.0, 0.0, -1.0));
    let through_glass = renderer.pixel_colour(&ray, &mut rng(7));

    // The same wall seen with nothing in between.
    let offset_ray = Ray::new(Vec3f::new(5.0, 0.0, 5.0), Vec3f::new(0.0, 0.0, -1.0));
    let wall_only = renderer.pixel_colour(&offset_ray, &mut rng(7));

    for channel in 0..3 {
        assert!(through_glass[channel] > 0.0);
        assert!(through_glass[channel] < wall_only[channel]);
    }
}

#[test]
fn caustic_photons_focus_beneath_the_glass_sphere() {
    init_logging();
    let scene = cornell_box_with_glass_sphere();
    let config = PhotonMapConfig {
        photons_per_light_source: 20_000,
        ..PhotonMapConfig::default()
    };
    let map = PhotonMap::build(&scene, &config);

    // The glass sphere sits over the floor centre; the refracted light
    // must concentrate there.
    let near_spot = map.photons_within_radius(PhotonKind::Caustic, &Vec3f::zeros(), 1.0);
    assert!(!near_spot.is_empty());
}

#[test]
fn photon_map_renderer_brightens_the_caustic_spot() {
    // Open scene where the only strong light path to the floor spot runs
    // through the glass sphere: direct light is occluded by the sphere
    // itself, and stray bounces escape into the void.
    let mut scene = Scene::new();
    let white = scene.add_material(Material::diffuse(Vec3f::new(0.8, 0.8, 0.8)));
    let glass = scene.add_material(Material::glass(1.5, 1.0));
    let light = scene.add_material(Material::emissive(Vec3f::new(1.0, 1.0, 1.0)));
    scene.add_render_group(RenderGroup::with_primitives(
        white,
        quad(
            Vec3f::new(-3.0, 0.0, 3.0),
            Vec3f::new(3.0, 0.0, 3.0),
            Vec3f::new(3.0, 0.0, -3.0),
            Vec3f::new(-3.0, 0.0, -3.0),
        ),
    ));
    scene.add_render_group(RenderGroup::with_primitives(
        glass,
        vec![Primitive::sphere(Vec3f::new(0.0, 1.0, 0.0), 0.8)],
    ));
    scene.add_render_group(RenderGroup::with_primitives(
        light,
        vec![Primitive::sphere(Vec3f::new(0.0, 4.2, 0.0), 0.15)],
    ));
    scene.initialize().unwrap();

    let config = PhotonMapConfig {
        photons_per_light_source: 20_000,
        ..PhotonMapConfig::default()
    };
    let map = PhotonMap::build(&scene, &config);

    let monte_carlo = MonteCarloRenderer::new(&scene, 3).unwrap();
    let photon = PhotonMapRenderer::new(&scene, 3, &map, PhotonGatherConfig::default()).unwrap();

    // Aim past the glass sphere at the caustic spot on the floor.
    let origin = Vec3f::new(2.0, 1.5, 2.0);
    let direction = (-origin).normalize();
    let ray = Ray::new(origin, direction);

    let samples = 200;
    let mut mc_sum = 0.0;
    let mut pm_sum = 0.0;
    let mut r1 = rng(8);
    let mut r2 = rng(8);
    for _ in 0..samples {
        mc_sum += monte_carlo.pixel_colour(&ray, &mut r1).sum();
        pm_sum += photon.pixel_colour(&ray, &mut r2).sum();
    }
    assert!(
        pm_sum > mc_sum,
        "photon map {pm_sum} vs monte carlo {mc_sum}"
    );
}

#[test]
fn pixel_colour_is_finite_on_degenerate_rays() {
    let scene = single_sphere_scene(Material::diffuse(Vec3f::new(0.5, 0.5, 0.5)));
    let renderer = MonteCarloRenderer::new(&scene, 3).unwrap();
    for direction in [
        Vec3f::new(Fp::NAN, 0.0, 0.0),
        Vec3f::zeros(),
        Vec3f::new(Fp::INFINITY, 0.0, 0.0),
    ] {
        let ray = Ray::new(Vec3f::new(0.0, 0.0, 5.0), direction);
        let colour = renderer.pixel_colour(&ray, &mut rng(9));
        for channel in 0..3 {
            assert!(colour[channel].is_finite());
            assert!(colour[channel] >= 0.0);
        }
    }
}

#[test]
fn render_rays_is_parallel_deterministic_and_cancellable() {
    let scene = single_sphere_scene(Material::emissive(Vec3f::new(1.0, 1.0, 1.0)));
    let renderer = MonteCarloRenderer::new(&scene, 2).unwrap();
    let rays: Vec<Ray> = (0..1000)
        .map(|i| {
            let x = (i as Fp / 1000.0) - 0.5;
            Ray::new(
                Vec3f::new(x, 0.0, 5.0),
                Vec3f::new(0.0, 0.0, -1.0),
            )
        })
        .collect();

    let first = render_rays(&renderer, &rays, &AtomicBool::new(false));
    let second = render_rays(&renderer, &rays, &AtomicBool::new(false));
    assert_eq!(first.len(), rays.len());
    assert_eq!(first, second);
    assert!(first.iter().any(|c| c.max() > 0.0));

    let cancelled = render_rays(&renderer, &rays, &AtomicBool::new(true));
    assert_eq!(cancelled.len(), rays.len());
    assert!(cancelled.iter().all(|c| *c == Vec3f::zeros()));
}

#[test]
fn group_surface_sampling_stays_on_the_surface() {
    let mut r = rng(10);
    let group = RenderGroup::with_primitives(
        0,
        vec![
            Primitive::sphere(Vec3f::new(5.0, 0.0, 0.0), 2.0),
            Primitive::triangle(
                Vec3f::new(-1.0, 0.0, 0.0),
                Vec3f::new(1.0, 0.0, 0.0),
                Vec3f::new(0.0, 2.0, 0.0),
            ),
        ],
    );
    for _ in 0..1000 {
        let point = group.random_surface_point(&mut r);
        let on_sphere = almost_equal_floats((point - Vec3f::new(5.0, 0.0, 0.0)).norm(), 2.0);
        let on_triangle = point.z.abs() < 10.0 * EPS
            && point.y >= -10.0 * EPS
            && point.x.abs() <= 1.0 + 10.0 * EPS;
        assert!(on_sphere || on_triangle);
    }
}
