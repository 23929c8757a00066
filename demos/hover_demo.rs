//! Headless hover demo.
//!
//! Drops a sphere over a static slab and lets the asynchronous hover
//! controller fight gravity, logging the sphere's height once a second.
//!
//! Run with: `cargo run --example hover_demo`

use std::time::Duration;

use avian3d::prelude::*;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::time::common_conditions::on_timer;
use hover_controller::prelude::*;
use hover_controller::HoverControllerPlugin;

fn main() {
    App::new()
        .add_plugins((
            MinimalPlugins,
            TransformPlugin,
            LogPlugin::default(),
            PhysicsPlugins::default(),
            HoverControllerPlugin::<Avian3dBackend>::default(),
        ))
        .add_systems(Startup, setup)
        .add_systems(
            Update,
            report_height.run_if(on_timer(Duration::from_secs(1))),
        )
        .run();
}

#[derive(Component)]
struct Watched;

fn setup(mut commands: Commands) {
    // Ground slab, top face at y = 0.
    commands.spawn((
        RigidBody::Static,
        Collider::cuboid(200.0, 10.0, 200.0),
        Transform::from_xyz(0.0, -5.0, 0.0),
    ));

    // The hovering sphere, dropped from 150 units up.
    let body = commands
        .spawn((
            Watched,
            RigidBody::Dynamic,
            Collider::sphere(1.0),
            Transform::from_xyz(0.0, 150.0, 0.0),
        ))
        .id();

    // The controller rides along as a child of the body.
    commands.spawn((
        AsyncHoverController::default(),
        Transform::default(),
        ChildOf(body),
    ));
}

fn report_height(bodies: Query<(&Transform, &LinearVelocity), With<Watched>>) {
    for (transform, velocity) in &bodies {
        info!(
            "height {:.1}, vertical velocity {:.1}",
            transform.translation.y, velocity.y
        );
    }
}
