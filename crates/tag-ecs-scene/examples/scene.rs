//! Builds a small scene, watches entities come and go, then tears it down.
//!
//! Run with `RUST_LOG=debug cargo run -p tag-ecs-scene --example scene`.

use std::sync::Arc;

use tag_ecs_scene::prelude::*;
use tracing_subscriber::EnvFilter;

struct DemoNode {
    name: &'static str,
    kind: NodeKind,
    physics: bool,
    metadata: NodeMetadata,
}

impl SceneNode for DemoNode {
    fn name(&self) -> &str {
        self.name
    }

    fn kind(&self) -> NodeKind {
        self.kind
    }

    fn has_physics_body(&self) -> bool {
        self.physics
    }

    fn metadata(&self) -> &NodeMetadata {
        &self.metadata
    }

    fn destroy(&self) {
        tracing::info!(node = self.name, "host node destroyed");
    }
}

#[derive(Component)]
#[component(id = "health")]
struct Health {
    hp: i32,
}

fn node(name: &'static str, kind: NodeKind, physics: bool) -> Arc<dyn SceneNode> {
    Arc::new(DemoNode {
        name,
        kind,
        physics,
        metadata: NodeMetadata::new(),
    })
}

fn main() -> Result<(), SceneError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut world = World::new();

    world.on(EntityEvent::Add, &["enemy"], |e| {
        tracing::info!(entity = %e.id(), hp = ?e.field("hp"), "enemy spawned");
    })?;
    world.on(EntityEvent::Remove, &[NodeComp::ID], |e| {
        if let Some(node) = e.get::<NodeComp>() {
            tracing::info!(entity = %e.id(), node = node.node().name(), "node entity removed");
        }
    })?;

    world.add_node_entity(node("camera", NodeKind::Transform, false), items![])?;
    let hero = world.add_node_entity(
        node("hero", NodeKind::Mesh, true),
        items!["player", Health { hp: 100 }],
    )?;
    for name in ["goblin", "orc", "troll"] {
        world.add_node_entity(
            node(name, NodeKind::Mesh, false),
            items!["enemy", Health { hp: 30 }],
        )?;
    }

    tracing::info!(
        nodes = world.query_nodes::<&str>(&[]).len(),
        meshes = world.query_meshes::<&str>(&[]).len(),
        enemies = world.query_meshes(&["enemy"]).len(),
        archetypes = world.archetype_count(),
        "scene built"
    );

    if let Some(id) = hero.entity() {
        if let Some(mut entity) = world.entity_mut(id) {
            entity.set_field("hp", 75)?;
        }
        if let Some(inspection) = world.inspect(id) {
            tracing::info!(?inspection, "hero");
        }
    }

    // The host destroys the hero; the entity follows.
    world.node_destroyed(&hero)?;

    world.clear()?;
    tracing::info!(remaining = world.len(), "scene torn down");

    Ok(())
}
