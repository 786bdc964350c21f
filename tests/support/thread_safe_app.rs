//! Shareable handle to a headless kinematics app for rspec fixtures.

use bevy::prelude::{App, Entity};
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// App wrapper that rspec contexts can clone and carry between threads.
#[derive(Debug)]
pub struct ThreadSafeApp(pub App);

impl Deref for ThreadSafeApp {
    type Target = App;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for ThreadSafeApp {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

// SAFETY: suites run with `parallel(false)` and every access goes through
// the mutex in `SharedApp`, so the app is never touched from two threads
// at once.
unsafe impl Send for ThreadSafeApp {}
unsafe impl Sync for ThreadSafeApp {}

/// Shared pointer type for the wrapped app.
pub type SharedApp = Arc<Mutex<ThreadSafeApp>>;

/// Wraps `app` for use as rspec state.
pub fn share(app: App) -> SharedApp {
    Arc::new(Mutex::new(ThreadSafeApp(app)))
}

/// Locks the shared app, recovering from a poisoned mutex.
pub fn lock_app(app: &SharedApp) -> MutexGuard<'_, ThreadSafeApp> {
    app.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Runs `ticks` frames of the shared app.
pub fn tick(app: &SharedApp, ticks: usize) {
    let mut guard = lock_app(app);
    for _ in 0..ticks {
        guard.update();
    }
}

/// Copies component `T` of `entity` out of the shared app.
pub fn component<T: bevy::prelude::Component + Copy>(app: &SharedApp, entity: Entity) -> T {
    let guard = lock_app(app);
    guard
        .world()
        .get::<T>(entity)
        .copied()
        .unwrap_or_else(|| panic!("{entity:?} has no {}", std::any::type_name::<T>()))
}
