// particle/store.rs
// Lazily-deleted particle arena. Indices stay stable until `compact` runs.

use crate::species::Species;

use super::Particle;

/// Active-particle counts per species.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SpeciesCounts {
    pub deuterium: usize,
    pub tritium: usize,
    pub helium: usize,
    pub neutron: usize,
    pub electron: usize,
}

impl SpeciesCounts {
    pub fn total(&self) -> usize {
        self.deuterium + self.tritium + self.helium + self.neutron + self.electron
    }

    pub fn get(&self, species: Species) -> usize {
        match species {
            Species::Deuterium => self.deuterium,
            Species::Tritium => self.tritium,
            Species::Helium4 => self.helium,
            Species::Neutron => self.neutron,
            Species::Electron => self.electron,
        }
    }

    fn bump(&mut self, species: Species) {
        match species {
            Species::Deuterium => self.deuterium += 1,
            Species::Tritium => self.tritium += 1,
            Species::Helium4 => self.helium += 1,
            Species::Neutron => self.neutron += 1,
            Species::Electron => self.electron += 1,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ParticleStore {
    particles: Vec<Particle>,
}

impl ParticleStore {
    pub fn new() -> Self {
        Self { particles: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { particles: Vec::with_capacity(capacity) }
    }

    /// Number of slots, active or not.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Append a particle and return its slot index.
    pub fn push(&mut self, particle: Particle) -> usize {
        self.particles.push(particle);
        self.particles.len() - 1
    }

    pub fn extend<I: IntoIterator<Item = Particle>>(&mut self, particles: I) {
        self.particles.extend(particles);
    }

    pub fn get(&self, index: usize) -> Option<&Particle> {
        self.particles.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Particle> {
        self.particles.get_mut(index)
    }

    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    pub fn as_mut_slice(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.particles.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Particle> {
        self.particles.iter_mut()
    }

    pub fn active(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter().filter(|p| p.active)
    }

    /// Slot indices of active particles of `species`, in slot order.
    pub fn active_indices(&self, species: Species) -> Vec<usize> {
        self.particles
            .iter()
            .enumerate()
            .filter(|(_, p)| p.active && p.species == species)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn active_count(&self) -> usize {
        self.particles.iter().filter(|p| p.active).count()
    }

    pub fn counts(&self) -> SpeciesCounts {
        let mut counts = SpeciesCounts::default();
        for p in self.active() {
            counts.bump(p.species);
        }
        counts
    }

    /// Drop inactive records when the store holds more than `threshold` slots.
    /// Returns the number of records removed. Invalidates slot indices.
    pub fn compact_if_above(&mut self, threshold: usize) -> usize {
        if self.particles.len() <= threshold {
            return 0;
        }
        self.compact()
    }

    pub fn compact(&mut self) -> usize {
        let before = self.particles.len();
        self.particles.retain(|p| p.active);
        before - self.particles.len()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

impl std::ops::Index<usize> for ParticleStore {
    type Output = Particle;

    fn index(&self, index: usize) -> &Particle {
        &self.particles[index]
    }
}

impl std::ops::IndexMut<usize> for ParticleStore {
    fn index_mut(&mut self, index: usize) -> &mut Particle {
        &mut self.particles[index]
    }
}
