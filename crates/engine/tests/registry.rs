use std::sync::Arc;
use std::thread;

use testament_engine::god::GodType;
use testament_engine::registry::AltarRegistry;
use testament_engine::world::position::{WorldId, WorldSite};

fn at(world: u32, x: i32, z: i32) -> WorldSite {
    WorldSite::new(WorldId(world), x, 70, z)
}

#[test]
fn last_write_wins() {
    let registry = AltarRegistry::new();
    assert_eq!(registry.register(GodType::Fallen, at(1, 0, 0)), None);
    assert_eq!(
        registry.register(GodType::Fallen, at(1, 500, 500)),
        Some(at(1, 0, 0))
    );
    assert_eq!(registry.get(WorldId(1), GodType::Fallen), Some(at(1, 500, 500)));
    assert_eq!(registry.len(), 1);
}

#[test]
fn unregister_removes_only_that_entry() {
    let registry = AltarRegistry::new();
    registry.register(GodType::Veil, at(1, 10, 10));
    registry.register(GodType::Sylvan, at(1, -10, 10));

    assert!(registry.unregister(WorldId(1), GodType::Veil));
    assert!(!registry.unregister(WorldId(1), GodType::Veil));
    assert!(!registry.has(WorldId(1), GodType::Veil));
    assert!(registry.has(WorldId(1), GodType::Sylvan));
}

#[test]
fn worlds_are_independent() {
    let registry = AltarRegistry::new();
    registry.register(GodType::Tempest, at(1, 0, 0));
    registry.register(GodType::Tempest, at(2, 0, 0));
    registry.register(GodType::Abyssal, at(2, 900, 0));

    assert_eq!(registry.len(), 3);
    assert_eq!(registry.in_world(WorldId(1)).len(), 1);
    assert_eq!(registry.sites_in(WorldId(2)).len(), 2);
    assert_eq!(registry.get(WorldId(2), GodType::Abyssal), Some(at(2, 900, 0)));
    assert_eq!(registry.get(WorldId(1), GodType::Abyssal), None);

    assert_eq!(registry.clear_world(WorldId(2)), 2);
    assert_eq!(registry.all(), vec![(GodType::Tempest, at(1, 0, 0))]);
}

#[test]
fn returned_sites_are_copies() {
    let registry = AltarRegistry::new();
    registry.register(GodType::Banishment, at(1, 3, 4));
    let mut site = registry.get(WorldId(1), GodType::Banishment).unwrap();
    site.x += 100;
    assert_eq!(registry.get(WorldId(1), GodType::Banishment), Some(at(1, 3, 4)));
}

#[test]
fn concurrent_registration() {
    let registry = Arc::new(AltarRegistry::new());
    let handles: Vec<_> = (0..8u32)
        .map(|w| {
            let registry = registry.clone();
            thread::spawn(move || {
                for (i, god) in GodType::ALL.into_iter().enumerate() {
                    registry.register(god, at(w, i as i32 * 1000, 0));
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(registry.len(), 8 * GodType::ALL.len());
    assert!(!registry.is_empty());
}
