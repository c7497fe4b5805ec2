//! Test that wide integers, chars and options merge as fields.

use tag_ecs::{Component, EcsError, Value, World, items};

#[derive(Component)]
struct Counter {
    hits: u64,
    slot: usize,
    grade: char,
    label: Option<String>,
}

fn main() {
    let mut world = World::new();
    let id = world
        .add_entity(items![Counter { hits: u64::MAX, slot: 3, grade: 'a', label: None }])
        .unwrap();

    let mut entity = world.entity_mut(id).unwrap();
    assert_eq!(entity.field("hits"), None);
    assert_eq!(entity.field("slot"), Some(Value::Int(3)));
    assert_eq!(entity.field("grade"), Some(Value::Text("a".into())));
    assert_eq!(entity.field("label"), Some(Value::Null));

    entity.set_field("hits", 12).unwrap();
    entity.set_field("label", "first").unwrap();
    assert_eq!(entity.field("hits"), Some(Value::Int(12)));
    assert_eq!(entity.field("label"), Some(Value::Text("first".into())));

    let err = entity.set_field("slot", -1).unwrap_err();
    assert!(matches!(err, EcsError::FieldType { .. }));
}
