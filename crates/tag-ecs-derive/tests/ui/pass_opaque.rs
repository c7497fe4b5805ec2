//! Test that opaque containers and unit structs expose no fields.

use std::collections::HashMap;

use tag_ecs::{Component, ComponentKind, World, items};

#[derive(Component)]
#[component(opaque)]
struct Lookup(HashMap<String, u32>);

#[derive(Component)]
#[component(id = "is_my_entity")]
struct IsMyEntity;

fn main() {
    let mut world = World::new();
    let id = world
        .add_entity(items![Lookup(HashMap::new()), IsMyEntity])
        .unwrap();

    let entity = world.entity(id).unwrap();
    assert_eq!(entity.field_names().count(), 0);
    assert!(entity.is(Lookup::ID));
    assert!(entity.is(IsMyEntity::ID));
    assert!(entity.get::<Lookup>().is_some_and(|l| l.0.is_empty()));
}
