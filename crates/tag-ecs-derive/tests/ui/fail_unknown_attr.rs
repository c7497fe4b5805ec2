//! Test that unknown container attributes are rejected.

use tag_ecs::Component;

#[allow(dead_code)]
#[derive(Component)]
#[component(persist)]
struct Door {
    locked: bool,
}

fn main() {}
