// particle/tests.rs
// Particle construction and store lifecycle tests

use super::*;
use crate::species::Species;
use ultraviolet::Vec3;

#[test]
fn particle_ids_are_unique() {
    let a = Particle::new(Species::Deuterium, Vec3::zero(), Vec3::zero());
    let b = Particle::new(Species::Deuterium, Vec3::zero(), Vec3::zero());
    assert_ne!(a.id, b.id);
}

#[test]
fn new_particle_takes_species_constants() {
    let v = Vec3::new(0.3, 0.0, 0.4);
    let p = Particle::new(Species::Helium4, Vec3::zero(), v);
    assert!(p.active);
    assert_eq!(p.mass, Species::Helium4.mass());
    assert_eq!(p.charge, Species::Helium4.charge());
    assert_eq!(p.radius, Species::Helium4.radius());
    let expected = 0.5 * p.mass * 0.25;
    assert!((p.kinetic_energy - expected).abs() <= expected * 1e-5);
}

#[test]
fn neutron_is_not_charged() {
    let n = Particle::new(Species::Neutron, Vec3::zero(), Vec3::zero());
    assert!(!n.is_charged());
    assert!(Particle::new(Species::Electron, Vec3::zero(), Vec3::zero()).is_charged());
}

#[test]
fn finiteness_check_catches_nan_and_inf() {
    let mut p = Particle::new(Species::Tritium, Vec3::zero(), Vec3::zero());
    assert!(p.is_finite());
    p.vel.y = f32::NAN;
    assert!(!p.is_finite());
    p.vel.y = 0.0;
    p.pos.z = f32::INFINITY;
    assert!(!p.is_finite());
}

fn store_with(species: &[Species]) -> ParticleStore {
    let mut store = ParticleStore::new();
    for &s in species {
        store.push(Particle::new(s, Vec3::zero(), Vec3::zero()));
    }
    store
}

#[test]
fn counts_ignore_inactive_particles() {
    use Species::*;
    let mut store = store_with(&[Deuterium, Deuterium, Tritium, Helium4, Neutron]);
    store[1].active = false;
    let counts = store.counts();
    assert_eq!(counts.deuterium, 1);
    assert_eq!(counts.tritium, 1);
    assert_eq!(counts.helium, 1);
    assert_eq!(counts.neutron, 1);
    assert_eq!(counts.total(), 4);
    assert_eq!(store.active_count(), 4);
    assert_eq!(store.active_indices(Deuterium), vec![0]);
}

#[test]
fn compaction_only_above_threshold() {
    use Species::*;
    let mut store = store_with(&[Deuterium, Tritium, Deuterium, Tritium]);
    store[0].active = false;
    store[3].active = false;
    assert_eq!(store.compact_if_above(4), 0, "len == threshold keeps slots");
    assert_eq!(store.len(), 4);
    assert_eq!(store.compact_if_above(3), 2);
    assert_eq!(store.len(), 2);
    assert!(store.iter().all(|p| p.active));
    assert_eq!(store[0].species, Tritium);
    assert_eq!(store[1].species, Deuterium);
}
