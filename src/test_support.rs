//! Helpers for tests that drive systems through a headless app.

use bevy::prelude::*;
use std::time::Duration;

/// Run frames until `done` holds, giving pool tasks time to finish.
pub fn update_until(app: &mut App, mut done: impl FnMut(&mut World) -> bool) {
    for _ in 0..500 {
        app.update();
        if done(app.world_mut()) {
            return;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    panic!("app did not reach the expected state");
}

/// Number of live entities carrying component `C`.
pub fn count<C: Component>(world: &mut World) -> usize {
    let mut query = world.query::<&C>();
    query.iter(world).count()
}
