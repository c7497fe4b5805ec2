//! Test that named fields land on the merged surface.

use tag_ecs::{Component, ComponentKind, EcsError, Value, World, items};

#[derive(Component)]
struct Door {
    locked: bool,
}

#[derive(Component)]
#[component(id = "color")]
struct Color {
    hex: String,
    alpha: f32,
}

fn main() {
    assert_eq!(Door::ID, "door");
    assert_eq!(Color::ID, "color");

    let mut world = World::new();
    let id = world
        .add_entity(items![Door { locked: true }, Color { hex: "#ff0000".into(), alpha: 1.0 }])
        .unwrap();

    let mut entity = world.entity_mut(id).unwrap();
    assert_eq!(entity.field("locked"), Some(Value::Bool(true)));
    assert_eq!(entity.field("hex"), Some(Value::Text("#ff0000".into())));

    entity.set_field("locked", false).unwrap();
    assert_eq!(entity.get::<Door>().map(|d| d.locked), Some(false));

    let err = entity.set_field("alpha", "opaque").unwrap_err();
    assert!(matches!(err, EcsError::FieldType { .. }));
}
