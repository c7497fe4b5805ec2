//! Test readonly, opaque and skipped fields plus a custom disposer.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tag_ecs::{Component, DisposeError, EcsError, Value, World, items};

#[derive(Component)]
#[component(id = "handle", dispose = Handle::release)]
struct Handle {
    #[component(readonly)]
    slot: u32,
    #[component(opaque)]
    buffer: Vec<u8>,
    #[component(skip)]
    released: Arc<AtomicBool>,
}

impl Handle {
    fn release(&mut self) -> Result<(), DisposeError> {
        self.buffer.clear();
        self.released.store(true, Ordering::SeqCst);
        Ok(())
    }
}

fn main() {
    let released = Arc::new(AtomicBool::new(false));
    let mut world = World::new();
    let id = world
        .add_entity(items![Handle {
            slot: 3,
            buffer: vec![1, 2, 3],
            released: released.clone(),
        }])
        .unwrap();

    {
        let mut entity = world.entity_mut(id).unwrap();
        assert_eq!(entity.field("slot"), Some(Value::Int(3)));
        assert_eq!(entity.field("buffer"), None);
        assert_eq!(entity.field_owner("buffer"), Some("handle"));
        assert_eq!(entity.field_owner("released"), None);
        assert!(matches!(
            entity.set_field("slot", 4),
            Err(EcsError::ReadOnlyField { .. })
        ));
    }

    world.remove_entity(id).unwrap();
    assert!(released.load(Ordering::SeqCst));
}
