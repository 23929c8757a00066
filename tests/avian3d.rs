//! End-to-end tests against the Avian backend.
//!
//! Runs a headless app with real physics, a manual time step and zero
//! gravity, so the only vertical motion a body can pick up comes from the
//! hover force. The spatial query pipeline needs a few frames to warm up, so
//! assertions run after a short settling period.

#![cfg(feature = "avian3d")]

use std::time::Duration;

use avian3d::prelude::*;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use hover_controller::prelude::*;
use hover_controller::{HoverControllerPlugin, ATTACH_ANGULAR_DAMPING, ATTACH_LINEAR_DAMPING};

fn create_app() -> App {
    let mut app = App::new();
    app.add_plugins((
        MinimalPlugins,
        TransformPlugin,
        PhysicsPlugins::default(),
        HoverControllerPlugin::<Avian3dBackend>::default(),
    ));
    app.insert_resource(Gravity(Vec3::ZERO));
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
        1.0 / 60.0,
    )));
    app.finish();
    app
}

fn advance(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}

/// A large static slab whose top face sits at `y = 0`.
fn spawn_ground(app: &mut App) -> Entity {
    app.world_mut()
        .spawn((
            RigidBody::Static,
            Collider::cuboid(100.0, 10.0, 100.0),
            Transform::from_xyz(0.0, -5.0, 0.0),
        ))
        .id()
}

/// A dynamic sphere floating 100 units above the origin.
fn spawn_hover_body(app: &mut App) -> Entity {
    app.world_mut()
        .spawn((
            RigidBody::Dynamic,
            Collider::sphere(0.5),
            Transform::from_xyz(0.0, 100.0, 0.0),
        ))
        .id()
}

fn spawn_controller<C: Component + Default>(app: &mut App, body: Entity) {
    app.world_mut().spawn((
        C::default(),
        Transform::default(),
        GlobalTransform::from_xyz(0.0, 100.0, 0.0),
        ChildOf(body),
    ));
}

fn vertical_velocity(app: &App, body: Entity) -> f32 {
    app.world()
        .get::<LinearVelocity>(body)
        .map(|velocity| velocity.y)
        .unwrap_or(0.0)
}

#[test]
fn async_hover_pushes_the_body_upward() {
    let mut app = create_app();
    spawn_ground(&mut app);
    let body = spawn_hover_body(&mut app);
    spawn_controller::<AsyncHoverController>(&mut app, body);

    advance(&mut app, 20);

    let velocity = vertical_velocity(&app, body);
    assert!(velocity > 0.0, "expected upward velocity, got {velocity}");
}

#[test]
fn sync_hover_pushes_the_body_upward() {
    let mut app = create_app();
    spawn_ground(&mut app);
    let body = spawn_hover_body(&mut app);
    spawn_controller::<HoverController>(&mut app, body);

    advance(&mut app, 20);

    let velocity = vertical_velocity(&app, body);
    assert!(velocity > 0.0, "expected upward velocity, got {velocity}");
}

#[test]
fn no_surface_below_means_no_hover_force() {
    let mut app = create_app();
    let body = spawn_hover_body(&mut app);
    spawn_controller::<AsyncHoverController>(&mut app, body);

    advance(&mut app, 20);

    let velocity = app
        .world()
        .get::<LinearVelocity>(body)
        .map(|velocity| velocity.0)
        .unwrap_or(Vec3::ZERO);
    assert!(
        velocity.length() < 1e-4,
        "body moved without a surface below: {velocity}"
    );
}

#[test]
fn attachment_resets_damping_on_the_body() {
    let mut app = create_app();
    spawn_ground(&mut app);
    let body = app
        .world_mut()
        .spawn((
            RigidBody::Dynamic,
            Collider::sphere(0.5),
            Transform::from_xyz(0.0, 100.0, 0.0),
            LinearDamping(0.1),
            AngularDamping(0.1),
        ))
        .id();
    spawn_controller::<AsyncHoverController>(&mut app, body);

    advance(&mut app, 2);

    assert_eq!(
        app.world().get::<LinearDamping>(body).map(|d| d.0),
        Some(ATTACH_LINEAR_DAMPING)
    );
    assert_eq!(
        app.world().get::<AngularDamping>(body).map(|d| d.0),
        Some(ATTACH_ANGULAR_DAMPING)
    );
}

#[test]
fn hover_weakens_with_height() {
    let mut app = create_app();
    spawn_ground(&mut app);

    let near = spawn_hover_body(&mut app);
    app.world_mut()
        .entity_mut(near)
        .insert(Transform::from_xyz(0.0, 50.0, 0.0));
    app.world_mut().spawn((
        AsyncHoverController::default(),
        Transform::default(),
        GlobalTransform::from_xyz(0.0, 50.0, 0.0),
        ChildOf(near),
    ));

    let far = app
        .world_mut()
        .spawn((
            RigidBody::Dynamic,
            Collider::sphere(0.5),
            Transform::from_xyz(10.0, 150.0, 0.0),
        ))
        .id();
    app.world_mut().spawn((
        AsyncHoverController::default(),
        Transform::default(),
        GlobalTransform::from_xyz(10.0, 150.0, 0.0),
        ChildOf(far),
    ));

    advance(&mut app, 10);

    let near_velocity = vertical_velocity(&app, near);
    let far_velocity = vertical_velocity(&app, far);
    assert!(
        near_velocity > far_velocity,
        "closer body should be pushed harder: {near_velocity} <= {far_velocity}"
    );
}
