//! Scene objects: the obstacle source both worlds are built from

use glam::{Quat, Vec3};
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::OBSTACLE_TAG;
use crate::sim::{Collider, PhysicsWorld, Shape, Transform};

/// A placed object in the live scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub name: String,
    /// Optional tag (e.g. "Obstacle")
    #[serde(default)]
    pub tag: Option<String>,
    pub shape: Shape,
    pub transform: Transform,
    /// Whether the renderer draws this object
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

impl SceneObject {
    pub fn new(name: impl Into<String>, shape: Shape, transform: Transform) -> Self {
        Self {
            name: name.into(),
            tag: None,
            shape,
            transform,
            visible: true,
        }
    }

    pub fn tagged(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn is_tagged(&self, tag: &str) -> bool {
        self.tag.as_deref() == Some(tag)
    }

    pub fn collider(&self) -> Collider {
        Collider::new(self.shape, self.transform)
    }
}

/// All objects of the live scene
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    pub objects: Vec<SceneObject>,
}

impl Scene {
    pub fn new(objects: Vec<SceneObject>) -> Self {
        Self { objects }
    }

    pub fn iter(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.iter()
    }

    /// Build the live physics world: every object collides
    pub fn live_world(&self, gravity: Vec3) -> PhysicsWorld {
        let mut world = PhysicsWorld::new(gravity);
        for object in &self.objects {
            world.add_collider(object.collider());
        }
        world
    }

    /// Seeded test range: ground, a back wall, pillars and crates
    ///
    /// Some crates are left untagged (decoration that does collide in the
    /// live world but is not mirrored into the preview).
    pub fn demo(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut objects = vec![
            SceneObject::new("ground", Shape::HalfSpace, Transform::IDENTITY).tagged(OBSTACLE_TAG),
            SceneObject::new(
                "back_wall",
                Shape::Cuboid {
                    half_extents: Vec3::new(15.0, 4.0, 0.5),
                },
                Transform::from_translation(Vec3::new(0.0, 4.0, 40.0)),
            )
            .tagged(OBSTACLE_TAG),
        ];

        let pillars = rng.random_range(3..=6);
        for i in 0..pillars {
            let x = rng.random_range(-10.0..10.0);
            let z = rng.random_range(12.0..35.0);
            let half_height = rng.random_range(1.0..4.0);
            let radius = rng.random_range(0.4..1.2);
            objects.push(
                SceneObject::new(
                    format!("pillar_{i}"),
                    Shape::Capsule {
                        half_height,
                        radius,
                    },
                    Transform::from_translation(Vec3::new(x, half_height + radius, z)),
                )
                .tagged(OBSTACLE_TAG),
            );
        }

        let crates = rng.random_range(2..=5);
        for i in 0..crates {
            let size = rng.random_range(0.5..1.5);
            let x = rng.random_range(-8.0..8.0);
            let z = rng.random_range(8.0..30.0);
            let yaw = rng.random_range(0.0..std::f32::consts::TAU);
            let mut object = SceneObject::new(
                format!("crate_{i}"),
                Shape::Cuboid {
                    half_extents: Vec3::splat(size),
                },
                Transform::from_translation(Vec3::new(x, size, z))
                    .with_rotation(Quat::from_rotation_y(yaw)),
            );
            if rng.random_bool(0.7) {
                object = object.tagged(OBSTACLE_TAG);
            }
            objects.push(object);
        }

        log::debug!("Demo scene (seed {seed}): {} objects", objects.len());
        Self { objects }
    }
}
