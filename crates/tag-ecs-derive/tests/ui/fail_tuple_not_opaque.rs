//! Test that tuple structs need `#[component(opaque)]`.

use tag_ecs::Component;

#[allow(dead_code)]
#[derive(Component)]
struct Handle(u64);

fn main() {}
