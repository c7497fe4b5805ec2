//! Test that unions are rejected.

use tag_ecs::Component;

#[allow(dead_code)]
#[derive(Component)]
union Bits {
    int: u32,
    float: f32,
}

fn main() {}
