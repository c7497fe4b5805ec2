//! Test that enums are rejected.

use tag_ecs::Component;

#[allow(dead_code)]
#[derive(Component)]
enum State {
    Open,
    Closed,
}

fn main() {}
