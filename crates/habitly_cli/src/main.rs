//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `habitly_core` linkage.
//! - Exercise the gate and an in-memory store with deterministic output.

use habitly_core::{HabitStore, InMemorySlotRepository, SessionGate};

fn main() {
    println!("habitly_core ping={}", habitly_core::ping());
    println!("habitly_core version={}", habitly_core::core_version());

    let mut gate = SessionGate::default();
    let login = gate.attempt_login("test", "test123");
    println!("habitly_core gate authenticated={}", login.is_authenticated());

    let mut store = HabitStore::new(InMemorySlotRepository::new());
    store.load();
    if let Some(id) = store.add("smoke") {
        store.toggle_completion(id);
    }
    store.delete([0]);
    println!("habitly_core store roundtrip_len={}", store.len());
}
