//! Rapier-based query world for immutable level geometry.
//!
//! Builds an in-memory Rapier scene from a set of static collider definitions and
//! answers the controller's ground probe and camera sweep through [`CollisionWorld`].
//!
//! Design goals
//! - Deterministic: given the same inputs (sorted by `id`), build identical in-memory sets.
//! - Query-focused: supports scene queries and the Rapier `KinematicCharacterController`.
//! - Immutable world: statics do not move after construction.

use log::debug;
use rapier3d::{
    na::{Isometry3, Point3, Translation3, UnitQuaternion, Vector3},
    parry::query::ShapeCastOptions,
    prelude::*,
};

use crate::{
    error::WorldError,
    physics::CollisionWorld,
    types::{LayerMask, RayHit, Vec3},
};

/// Definition of one immutable world collider.
///
/// Conventions
/// - Units are meters.
/// - Rotation is a unit quaternion.
/// - For planes, the normal is derived from the pose: `normal = rotation * +Y`.
#[derive(Clone, Debug)]
pub struct WorldStaticDef {
    /// Stable unique identifier used to ensure deterministic insertion order.
    pub id: u32,
    /// World-space translation.
    pub translation: Vec3,
    /// World-space rotation.
    pub rotation: UnitQuaternion<f32>,
    /// Collision layer (0..32) matched against query masks.
    pub layer: u8,
    pub shape: ColliderShapeDef,
}

impl WorldStaticDef {
    /// Axis-aligned box centered at `translation`.
    pub fn cuboid(id: u32, translation: Vec3, half_extents: Vec3, layer: u8) -> Self {
        Self {
            id,
            translation,
            rotation: UnitQuaternion::identity(),
            layer,
            shape: ColliderShapeDef::Cuboid { half_extents },
        }
    }

    /// Horizontal infinite ground plane at `height`.
    pub fn ground_plane(id: u32, height: f32, layer: u8) -> Self {
        Self {
            id,
            translation: Vec3::new(0.0, height, 0.0),
            rotation: UnitQuaternion::identity(),
            layer,
            shape: ColliderShapeDef::Plane {
                offset_along_normal: 0.0,
            },
        }
    }
}

/// Supported static collider shapes.
#[derive(Clone, Debug)]
pub enum ColliderShapeDef {
    /// Infinite plane (half-space) offset along its pose-derived normal.
    Plane { offset_along_normal: f32 },

    /// Oriented cuboid with given half-extents (meters).
    Cuboid { half_extents: Vec3 },
}

/// In-memory Rapier structures needed for scene queries against a static world.
///
/// For immutable statics, these can be built once at startup and reused.
pub struct RapierQueryWorld {
    pub bodies: RigidBodySet,
    pub colliders: ColliderSet,
    pub broad_phase: BroadPhaseBvh,
    pub narrow_phase: NarrowPhase,
}

impl RapierQueryWorld {
    /// Build a query world from a list of static collider definitions.
    ///
    /// The input is sorted by `id` before insertion. Fails if a collider's layer does not
    /// fit in a [`LayerMask`].
    pub fn build(mut defs: Vec<WorldStaticDef>) -> Result<Self, WorldError> {
        defs.sort_by_key(|d| d.id);

        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();

        for def in defs.iter() {
            let mask = LayerMask::try_layer(def.layer).ok_or(WorldError::LayerOutOfRange {
                id: def.id,
                layer: def.layer,
            })?;
            let iso = Isometry3::from_parts(
                Translation3::new(def.translation.x, def.translation.y, def.translation.z),
                def.rotation,
            );

            let rb = RigidBodyBuilder::fixed().pose(iso).build();
            let rb_handle = bodies.insert(rb);

            let mut collider = collider_from_def(def);
            // The layer rides along in user data so query predicates can filter on it.
            collider.user_data = mask.0 as u128;
            colliders.insert_with_parent(collider, rb_handle, &mut bodies);
        }

        // Run collision detection once (no dynamics) so broad/narrow phases can answer queries.
        let mut broad_phase = BroadPhaseBvh::new();
        let mut narrow_phase = NarrowPhase::new();
        let mut collision_pipeline = CollisionPipeline::new();
        let hooks = ();
        let events = ();

        collision_pipeline.step(
            0.0,
            &mut broad_phase,
            &mut narrow_phase,
            &mut bodies,
            &mut colliders,
            &hooks,
            &events,
        );

        debug!("built static query world with {} colliders", colliders.len());

        Ok(Self {
            bodies,
            colliders,
            broad_phase,
            narrow_phase,
        })
    }

    /// Create a borrowed `QueryPipeline` view suitable for scene queries and KCC.
    pub fn query_pipeline<'a>(&'a self, filter: QueryFilter<'a>) -> QueryPipeline<'a> {
        self.broad_phase.as_query_pipeline(
            self.narrow_phase.query_dispatcher(),
            &self.bodies,
            &self.colliders,
            filter,
        )
    }
}

fn layer_of(collider: &Collider) -> LayerMask {
    LayerMask(collider.user_data as u32)
}

impl CollisionWorld for RapierQueryWorld {
    fn cast_down(&self, origin: Vec3, max_distance: f32, layers: LayerMask) -> Option<RayHit> {
        if max_distance <= 0.0 {
            return None;
        }

        let on_layers = |_: ColliderHandle, c: &Collider| layer_of(c).intersects(layers);
        let pipeline = self.query_pipeline(QueryFilter::default().predicate(&on_layers));

        let ray = Ray::new(
            Point3::new(origin.x, origin.y, origin.z),
            Vector3::new(0.0, -1.0, 0.0),
        );

        pipeline
            .cast_ray_and_get_normal(&ray, max_distance, true)
            .map(|(_handle, hit)| RayHit {
                point: origin - Vec3::y() * hit.time_of_impact,
                distance: hit.time_of_impact,
            })
    }

    fn cast_sphere(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
        layers: LayerMask,
    ) -> Option<RayHit> {
        let dir = direction.try_normalize(1.0e-6)?;
        if max_distance <= 0.0 {
            return None;
        }

        let on_layers = |_: ColliderHandle, c: &Collider| layer_of(c).intersects(layers);
        let pipeline = self.query_pipeline(QueryFilter::default().predicate(&on_layers));

        let shape_pos = Isometry3::translation(origin.x, origin.y, origin.z);
        let shape_vel = Vector3::new(dir.x, dir.y, dir.z);
        let ball = Ball::new(radius.max(0.0));
        let options = ShapeCastOptions::with_max_time_of_impact(max_distance);

        let (handle, hit) = pipeline.cast_shape(&shape_pos, &shape_vel, &ball, options)?;

        // Witness points are in the collider's local frame.
        let point = match self.colliders.get(handle) {
            Some(collider) => {
                let p = collider.position() * hit.witness1;
                Vec3::new(p.x, p.y, p.z)
            }
            None => origin + dir * (hit.time_of_impact + radius),
        };

        Some(RayHit {
            point,
            distance: hit.time_of_impact,
        })
    }
}

/// Build a Rapier collider from a `WorldStaticDef`.
///
/// The pose lives on the parent rigid-body, so the collider has an identity local
/// transform (planes excepted, see below).
fn collider_from_def(def: &WorldStaticDef) -> Collider {
    match &def.shape {
        ColliderShapeDef::Plane {
            offset_along_normal,
        } => {
            // The half-space sits at the body pose; shift it along the local normal only.
            let halfspace = HalfSpace::new(Vector::y_axis());
            ColliderBuilder::new(SharedShape::new(halfspace))
                .translation(Vector::y() * *offset_along_normal)
                .build()
        }

        ColliderShapeDef::Cuboid { half_extents } => {
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z).build()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GROUND: u8 = 0;
    const PROPS: u8 = 1;

    fn level() -> RapierQueryWorld {
        RapierQueryWorld::build(vec![
            WorldStaticDef::ground_plane(1, 0.0, GROUND),
            // A wall two meters behind the origin along -Z.
            WorldStaticDef::cuboid(
                2,
                Vec3::new(0.0, 1.0, -2.5),
                Vec3::new(5.0, 1.0, 0.5),
                PROPS,
            ),
        ])
        .expect("level layers are in range")
    }

    #[test]
    fn cast_down_hits_ground_plane() {
        let world = level();
        let hit = world
            .cast_down(Vec3::new(0.0, 0.5, 0.0), 1.0, LayerMask::ALL)
            .expect("ground under origin");

        assert!((hit.distance - 0.5).abs() < 1.0e-4);
        assert!(hit.point.y.abs() < 1.0e-4);
    }

    #[test]
    fn cast_down_respects_range() {
        let world = level();
        assert!(
            world
                .cast_down(Vec3::new(0.0, 2.0, 0.0), 1.0, LayerMask::ALL)
                .is_none()
        );
    }

    #[test]
    fn layer_mask_filters_colliders() {
        let world = level();
        let origin = Vec3::new(0.0, 1.0, 0.0);

        assert!(
            world
                .cast_sphere(origin, 0.2, -Vec3::z(), 5.0, LayerMask::layer(PROPS))
                .is_some()
        );
        assert!(
            world
                .cast_sphere(origin, 0.2, -Vec3::z(), 5.0, LayerMask::layer(GROUND))
                .is_none()
        );
    }

    #[test]
    fn sphere_cast_reports_wall_distance() {
        let world = level();
        let hit = world
            .cast_sphere(Vec3::new(0.0, 1.0, 0.0), 0.2, -Vec3::z(), 5.0, LayerMask::ALL)
            .expect("wall behind origin");

        // Wall face at z = -2.0, sphere radius 0.2.
        assert!((hit.distance - 1.8).abs() < 1.0e-3, "got {}", hit.distance);
        assert!((hit.point.z + 2.0).abs() < 1.0e-3, "got {:?}", hit.point);
    }

    #[test]
    fn build_rejects_layers_past_the_mask() {
        let err = RapierQueryWorld::build(vec![
            WorldStaticDef::ground_plane(1, 0.0, GROUND),
            WorldStaticDef::ground_plane(7, -1.0, 33),
        ])
        .err()
        .expect("layer 33 has no mask bit");

        assert!(matches!(
            err,
            WorldError::LayerOutOfRange { id: 7, layer: 33 }
        ));
    }

    #[test]
    fn sphere_cast_misses_open_space() {
        let world = level();
        assert!(
            world
                .cast_sphere(Vec3::new(0.0, 1.0, 0.0), 0.2, Vec3::z(), 5.0, LayerMask::ALL)
                .is_none()
        );
    }
}
