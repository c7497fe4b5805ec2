//! Integration tests for the entity store.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use parking_lot::Mutex;
use tag_ecs::prelude::*;
use tag_ecs::{RegistryConfig, WorldConfig};

#[derive(Component)]
struct Door {
    locked: bool,
}

#[derive(Component)]
struct Color {
    color: String,
}

#[derive(Component)]
struct IsMyEntity {
    is_my_entity: bool,
}

#[derive(Component)]
#[component(id = "pos")]
struct Pos {
    x: f64,
    y: f64,
}

#[derive(Component)]
#[component(id = "marker")]
struct Marker {
    x: f64,
}

#[derive(Component)]
#[component(id = "resource", dispose = Resource::release)]
struct Resource {
    #[component(skip)]
    released: Arc<AtomicUsize>,
}

impl Resource {
    fn release(&mut self) -> Result<(), DisposeError> {
        self.released.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn counter() -> Arc<AtomicUsize> {
    Arc::new(AtomicUsize::new(0))
}

#[test]
fn test_actor_player_enemy_scenario() {
    let mut world = World::new();

    let player = world.add_entity(items!["actor", "player"]).unwrap();
    let entity = world.entity(player).unwrap();
    assert!(entity.is("player"));
    assert!(!entity.is("enemy"));

    let enemies: Vec<EntityId> = (0..10)
        .map(|_| world.add_entity(items!["actor", "enemy"]).unwrap())
        .collect();
    assert_eq!(world.query_entities(&["actor"]).len(), 11);

    assert!(world.remove_entity(enemies[3]).unwrap());
    assert_eq!(world.query_entities(&["enemy"]).len(), 9);
    assert_eq!(world.query_entities(&["actor"]).len(), 10);
    assert!(
        world
            .query_entities(&["enemy"])
            .iter()
            .all(|e| e.id() != enemies[3])
    );
}

#[test]
fn test_every_added_tag_is_reported() {
    let mut world = World::new();
    let tags = ["a", "b", "c", "d"];
    let id = world.add_entity(tags.iter().map(|&t| Item::from(t))).unwrap();

    let entity = world.entity(id).unwrap();
    for tag in tags {
        assert!(entity.is(tag));
    }
}

#[test]
fn test_superset_matching_for_every_subset() {
    let mut world = World::new();
    let full = ["w", "x", "y", "z"];
    let id = world.add_entity(full.iter().map(|&t| Item::from(t))).unwrap();
    world.add_entity(items!["w"]).unwrap();

    for mask in 0u32..16 {
        let subset: Vec<&str> = full
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, &t)| t)
            .collect();
        let found = world.query_entities(&subset);
        assert!(found.iter().any(|e| e.id() == id), "subset {subset:?}");
    }
}

#[test]
fn test_merged_fields() {
    let mut world = World::new();
    let id = world
        .add_entity(items![
            Door { locked: true },
            Color {
                color: "#ff0000".into()
            }
        ])
        .unwrap();

    let entity = world.entity(id).unwrap();
    assert_eq!(entity.field("locked"), Some(Value::Bool(true)));
    assert_eq!(entity.field("color"), Some(Value::Text("#ff0000".into())));
    assert!(entity.is("door"));
    assert!(entity.is("color"));
}

#[test]
fn test_add_subscription_filters_on_all_tags() {
    let mut world = World::new();
    let hits = counter();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let (hits_clone, seen_clone) = (hits.clone(), seen.clone());
    world
        .on(EntityEvent::Add, &["myEntity", IsMyEntity::ID], move |e| {
            assert!(e.is_all(&["myEntity", IsMyEntity::ID]));
            hits_clone.fetch_add(1, Ordering::SeqCst);
            seen_clone.lock().push(e.id());
        })
        .unwrap();

    let id = world
        .add_entity(items!["myEntity", IsMyEntity { is_my_entity: true }])
        .unwrap();
    world.add_entity(items!["myEntity"]).unwrap();

    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(*seen.lock(), vec![id]);
}

#[test]
fn test_remove_emits_once_and_disposes_once() {
    let mut world = World::new();
    let removed = counter();
    let released = counter();

    let removed_clone = removed.clone();
    world
        .on(EntityEvent::Remove, &["resource"], move |_| {
            removed_clone.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

    let id = world
        .add_entity(items![
            "actor",
            Resource {
                released: released.clone()
            }
        ])
        .unwrap();

    assert!(world.remove_entity(id).unwrap());
    assert!(!world.remove_entity(id).unwrap());

    assert_eq!(removed.load(Ordering::SeqCst), 1);
    assert_eq!(released.load(Ordering::SeqCst), 1);
    assert!(world.query_entities(&["actor"]).is_empty());
}

#[test]
fn test_duplicate_field_conflicts() {
    let mut world = World::new();

    let err = world
        .add_entity(items![Pos { x: 1.0, y: 2.0 }, Marker { x: 0.5 }])
        .unwrap_err();
    assert!(matches!(
        err,
        EcsError::Conflict { ref field, ref component } if field == "x" && component == "marker"
    ));
    assert!(world.is_empty());

    let id = world.add_entity(items![Pos { x: 1.0, y: 2.0 }]).unwrap();
    assert!(world.add_component(id, Marker { x: 0.5 }.into()).is_err());
    assert!(!world.entity(id).unwrap().has("marker"));
}

#[test]
fn test_same_component_twice_replaces() {
    let mut world = World::new();
    let id = world
        .add_entity(items![Pos { x: 1.0, y: 2.0 }, Pos { x: 3.0, y: 4.0 }])
        .unwrap();

    let entity = world.entity(id).unwrap();
    assert_eq!(entity.len(), 1);
    assert_eq!(entity.field("x"), Some(Value::Float(3.0)));
    assert_eq!(entity.get::<Pos>().map(|p| p.y), Some(4.0));
}

#[test]
fn test_signatures_independent_of_order() {
    let registry = Registry::new();
    assert_eq!(
        registry.bit_for("alpha").unwrap(),
        registry.bit_for("alpha").unwrap()
    );

    let mut world = World::with_registry(registry.clone());
    let a = world.add_entity(items!["alpha", "beta", Door { locked: false }]).unwrap();
    let b = world.add_entity(items![Door { locked: true }, "beta", "alpha"]).unwrap();

    assert_eq!(
        world.entity(a).unwrap().archetype(),
        world.entity(b).unwrap().archetype()
    );
    assert_eq!(world.archetype_count(), 1);
}

#[test]
fn test_compiled_query_sees_later_entities() {
    let mut world = World::new();
    let query = world.compile_query(&["late", "bloomer"]).unwrap();
    assert_eq!(world.query(&query).count(), 0);

    world.add_entity(items!["late", "bloomer", "extra"]).unwrap();
    world.add_entity(items!["late"]).unwrap();
    assert_eq!(world.query(&query).count(), 1);
}

#[test]
fn test_baseline_queries() {
    let mut world = World::new();
    world.add_entity(items!["node", "xform", "player"]).unwrap();
    world.add_entity(items!["node", "player"]).unwrap();

    assert_eq!(world.query_with_baseline(&["node"], &["player"]).len(), 2);
    assert_eq!(
        world.query_with_baseline(&["node", "xform"], &["player"]).len(),
        1
    );
}

#[test]
fn test_registry_capacity() {
    let config = WorldConfig::new().registry(RegistryConfig::new().max_identifiers(2));
    let mut world = World::from_config(config);

    world.add_entity(items!["a", "b"]).unwrap();
    let err = world.add_entity(items!["c"]).unwrap_err();
    assert!(matches!(err, EcsError::RegistryExhausted { capacity: 2 }));
    assert_eq!(world.len(), 1);
}

#[test]
fn test_worlds_share_registry_but_not_events() {
    let registry = Registry::new();
    let mut first = World::with_registry(registry.clone());
    let mut second = World::with_registry(registry);
    let hits = counter();

    let hits_clone = hits.clone();
    first
        .on(EntityEvent::Add, &["shared"], move |_| {
            hits_clone.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

    first.add_entity(items!["shared"]).unwrap();
    second.add_entity(items!["shared"]).unwrap();

    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert!(first.registry().same_as(second.registry()));
    assert_eq!(second.query_entities(&["shared"]).len(), 1);
}

#[test]
fn test_wide_identifier_space() {
    let mut world = World::new();
    let tags: Vec<String> = (0..200).map(|i| format!("tag-{i}")).collect();

    let id = world.add_entity(tags.iter().cloned().map(Item::from)).unwrap();
    world.add_entity(items!["tag-0"]).unwrap();

    assert_eq!(world.registry().len(), 200);
    assert_eq!(world.query_entities(&["tag-0", "tag-199"]).len(), 1);
    assert_eq!(world.query_entities(&["tag-0"]).len(), 2);
    assert_eq!(world.entity(id).unwrap().archetype().count(), 200);
}
