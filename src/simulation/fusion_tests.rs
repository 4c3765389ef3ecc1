// simulation/fusion_tests.rs
// Fusion rate budget, single-pair reactions and the end-to-end burn

use super::fusion::*;
use super::Simulation;
use crate::config::{self, SimConfig};
use crate::particle::Particle;
use crate::species::Species;
use crate::units;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ultraviolet::Vec3;

fn inputs(deuterium: usize, tritium: usize, temperature: f32) -> FusionRateInputs {
    FusionRateInputs {
        deuterium,
        tritium,
        volume: crate::geometry::TorusGeometry::default().volume(),
        temperature,
        dt: config::DEFAULT_DT,
        fusion_boost: config::DEFAULT_FUSION_BOOST,
        max_fraction: config::DEFAULT_MAX_FUSION_FRACTION,
    }
}

fn ctx() -> FusionContext {
    FusionContext::from_config(&SimConfig::default(), 1e-3)
}

#[cfg(test)]
mod rate {
    use super::*;

    #[test]
    fn budget_never_exceeds_the_per_step_cap() {
        for &temperature in &[0.0, 1e7, 1e9, 5e9] {
            for &(d, t) in &[(0, 0), (1, 0), (3, 7), (100, 100), (5000, 20)] {
                for &boost in &[0.0, 1.0, 1e6, 1e9] {
                    for &fraction in &[0.0, 0.02, 0.5, 1.0] {
                        let b = fusion_budget(&FusionRateInputs {
                            fusion_boost: boost,
                            max_fraction: fraction,
                            ..inputs(d, t, temperature)
                        });
                        let pairs = d.min(t) as f32;
                        assert!(b.expected >= 0.0);
                        assert!(b.expected <= pairs * fraction + 1e-6, "{b:?}");
                        assert!(b.cap <= d.min(t));
                    }
                }
            }
        }
    }

    #[test]
    fn cold_plasma_does_not_fuse() {
        let full = |temperature| fusion_budget(&inputs(4200, 4200, temperature)).expected;
        assert!(full(0.0) < 1e-9, "{}", full(0.0));
        assert_eq!(full(-5.0), full(0.0));
        assert!(reactivity(f32::NAN).is_finite());
        let mut rng = StdRng::seed_from_u64(2);
        assert_eq!(stochastic_round(full(0.0), &mut rng), 0);
        let unboosted =
            |t| fusion_budget(&FusionRateInputs { fusion_boost: 1.0, ..inputs(4200, 4200, t) }).expected;
        let cooling: Vec<f32> = [1e9, 1e6, 1e3, 1.0, 0.0].iter().map(|&t| unboosted(t)).collect();
        assert!(cooling.windows(2).all(|w| w[1] < w[0]), "{cooling:?}");
    }

    #[test]
    fn empty_or_dilute_plasma_does_not_fuse() {
        assert_eq!(fusion_budget(&inputs(0, 500, 1e9)).expected, 0.0);
        let dilute = fusion_budget(&FusionRateInputs {
            volume: 1e12,
            fusion_boost: 1.0,
            ..inputs(10, 10, 1e9)
        });
        assert!(dilute.expected < 1e-9);
    }

    #[test]
    fn cap_is_floor_of_fraction_of_limiting_species() {
        let b = fusion_budget(&inputs(100, 260, 1e9));
        assert_eq!(b.max_pairs, 100);
        assert_eq!(b.cap, 2);
    }

    #[test]
    fn reactivity_grows_with_temperature() {
        assert!(reactivity(5e9) > reactivity(1e9));
        let t_kev = units::kelvin_to_kev(1e9);
        assert!((reactivity(1e9) - 1e-6 * t_kev.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn stochastic_rounding_is_unbiased() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(stochastic_round(3.0, &mut rng), 3);
        let trials = 20_000;
        let total: usize = (0..trials).map(|_| stochastic_round(2.25, &mut rng)).sum();
        let mean = total as f32 / trials as f32;
        assert!((mean - 2.25).abs() < 0.03, "mean {mean}");
    }
}

#[cfg(test)]
mod reaction {
    use super::*;

    fn pair(separation: f32, v_rel: f32) -> (Particle, Particle) {
        let d = Particle::new(
            Species::Deuterium,
            Vec3::new(1.2, 0.0, 0.0),
            Vec3::new(0.1 + v_rel, 0.02, 0.0),
        );
        let t = Particle::new(
            Species::Tritium,
            Vec3::new(1.2 + separation, 0.0, 0.0),
            Vec3::new(0.1, 0.02, 0.0),
        );
        (d, t)
    }

    #[test]
    fn forced_fusion_conserves_momentum_in_the_cm_frame() {
        let (mut d, mut t) = pair(0.01, 0.3);
        let mut rng = StdRng::seed_from_u64(4);
        let cm_vel = (d.momentum() + t.momentum()) / (d.mass + t.mass);
        let cm_pos = (d.pos * d.mass + t.pos * t.mass) / (d.mass + t.mass);

        let products = attempt_fusion(&mut d, &mut t, &ctx(), true, &mut rng).expect("forced");

        let FusionProducts { helium, neutron } = products;
        assert_eq!(helium.species, Species::Helium4);
        assert_eq!(neutron.species, Species::Neutron);
        assert!(!d.active && !t.active);
        assert!(helium.active && neutron.active);
        assert!((helium.pos - cm_pos).mag() < 1e-6);
        assert!((neutron.pos - cm_pos).mag() < 1e-6);

        // Momenta of ion-mass particles underflow f32 once squared, so compare
        // CM-frame velocities weighted by the mass ratio instead.
        let u_alpha = helium.vel - cm_vel;
        let u_neutron = neutron.vel - cm_vel;
        let residual = u_alpha * (helium.mass / neutron.mass) + u_neutron;
        assert!(u_neutron.mag() > 1.0, "products carry the release, {u_neutron:?}");
        assert!(residual.mag() <= 1e-4 * u_neutron.mag(), "residual {residual:?}");
    }

    #[test]
    fn center_of_mass_energy_uses_the_reduced_mass() {
        let (d, t) = pair(0.001, 1e7);
        let mu = d.mass / (d.mass + t.mass) * t.mass;
        assert!(mu > 1.9e-27 && mu < 2.1e-27, "mu {mu}");
        let e_cm = center_of_mass_energy(&d, &t);
        assert!(e_cm > 0.0);
        assert!((e_cm - 0.5 * mu * 1e14).abs() <= 1e-3 * e_cm, "e_cm {e_cm}");
        assert!(e_cm > units::FUSION_THRESHOLD_ENERGY);

        let (d, t) = pair(0.001, 0.0);
        assert_eq!(center_of_mass_energy(&d, &t), 0.0);
    }

    #[test]
    fn forced_fusion_ignores_separation() {
        let (mut d, mut t) = pair(1.0, 0.0);
        let mut rng = StdRng::seed_from_u64(5);
        assert!(attempt_fusion(&mut d, &mut t, &ctx(), true, &mut rng).is_some());
    }

    #[test]
    fn unforced_fusion_beyond_interaction_distance_changes_nothing() {
        let (mut d, mut t) = pair(config::FUSION_INTERACTION_DISTANCE * 2.0, 1e7);
        let (d0, t0) = (d.clone(), t.clone());
        let mut rng = StdRng::seed_from_u64(6);
        let mut untouched = rng.clone();

        assert!(attempt_fusion(&mut d, &mut t, &ctx(), false, &mut rng).is_none());

        assert!(d.active && t.active);
        assert_eq!((d.pos, d.vel), (d0.pos, d0.vel));
        assert_eq!((t.pos, t.vel), (t0.pos, t0.vel));
        assert_eq!(rng.random::<u64>(), untouched.random::<u64>(), "no draw consumed");
    }

    #[test]
    fn unforced_fusion_below_threshold_fails() {
        let (mut d, mut t) = pair(0.001, 0.5);
        let mut rng = StdRng::seed_from_u64(7);
        assert!(attempt_fusion(&mut d, &mut t, &ctx(), false, &mut rng).is_none());
        assert!(d.active && t.active);
    }

    #[test]
    fn energetic_close_pair_fuses_unforced() {
        let (mut d, mut t) = pair(0.001, 1e7);
        let mut rng = StdRng::seed_from_u64(8);
        assert!(attempt_fusion(&mut d, &mut t, &ctx(), false, &mut rng).is_some());
        assert!(!d.active && !t.active);
    }

    #[test]
    fn try_fuse_unforced_succeeds_for_an_energetic_close_pair() {
        let mut sim = Simulation::with_seed(10);
        let (d, t) = pair(0.001, 1e7);
        sim.particles.push(d);
        sim.particles.push(t);
        let event = sim.try_fuse(0, 1, false).expect("chance clamps to one");
        assert_eq!(sim.fusion_count, 1);
        assert!(!sim.particles[0].active && !sim.particles[1].active);
        assert_eq!(sim.particles[2].id, event.helium_id);
    }

    #[test]
    fn product_speeds_split_the_energy_release() {
        let (v_alpha, v_neutron) = product_speeds();
        let m_a = units::HELIUM_MASS;
        let m_n = units::NEUTRON_MASS;
        assert!((m_a * v_alpha - m_n * v_neutron).abs() <= 1e-5 * m_a * v_alpha);
        let energy = 0.5 * m_a * v_alpha * v_alpha + 0.5 * m_n * v_neutron * v_neutron;
        assert!((energy - units::FUSION_ENERGY).abs() <= 1e-4 * units::FUSION_ENERGY);
    }

    #[test]
    fn try_fuse_rejects_bad_indices() {
        let mut sim = Simulation::with_seed(9);
        sim.seed_thermal_plasma(1, 1);
        assert!(sim.try_fuse(0, 0, true).is_none());
        assert!(sim.try_fuse(0, 7, true).is_none());
        let event = sim.try_fuse(0, 1, true).expect("forced reaction");
        assert_eq!(sim.particles.len(), 4);
        assert_eq!(sim.particles[2].id, event.helium_id);
        assert_eq!(sim.particles[3].id, event.neutron_id);
        assert!(sim.try_fuse(0, 1, true).is_none(), "reactants already consumed");
    }
}

#[cfg(test)]
mod burn {
    use super::*;

    fn hot_config() -> SimConfig {
        SimConfig {
            temperature: 5e9,
            fusion_boost: 1e9,
            ..SimConfig::default()
        }
    }

    #[test]
    fn first_step_burns_and_conserves_particle_count() {
        let mut sim = Simulation::with_seed(2024);
        sim.set_config(hot_config());
        sim.seed_thermal_plasma(100, 100);
        let before = sim.particles.active_count();

        let report = sim.step(config::DEFAULT_DT);

        assert!(report.expected_fusions >= 1.0);
        assert!(report.fusions >= 1);
        assert_eq!(report.fusions + report.skipped_fusions, report.sampled_fusions);
        assert_eq!(report.created, 2 * report.fusions);
        assert_eq!(sim.events().len(), report.fusions);
        assert_eq!(sim.particles.active_count(), before);

        let counts = sim.particles.counts();
        assert_eq!(counts.helium, report.fusions);
        assert_eq!(counts.neutron, report.fusions);
        assert_eq!(counts.deuterium, 100 - report.fusions);
        assert_eq!(counts.tritium, 100 - report.fusions);
        assert_eq!(sim.fusion_count, report.fusions as u64);
    }

    #[test]
    fn products_are_appended_after_existing_particles() {
        let mut sim = Simulation::with_seed(77);
        sim.set_config(SimConfig { max_fusion_fraction_per_step: 1.0, ..hot_config() });
        sim.seed_thermal_plasma(1, 1);

        let report = sim.step(config::DEFAULT_DT);

        assert_eq!(report.fusions, 1);
        assert_eq!(sim.particles.len(), 4);
        assert!(!sim.particles[0].active && !sim.particles[1].active);
        assert_eq!(sim.particles[2].species, Species::Helium4);
        assert_eq!(sim.particles[3].species, Species::Neutron);
        let event = sim.events()[0];
        assert_eq!(event.helium_id, sim.particles[2].id);

        // No fuel left, so the products never feed back into sampling
        let next = sim.step(config::DEFAULT_DT);
        assert_eq!(next.sampled_fusions, 0);
        assert_eq!(next.expected_fusions, 0.0);
    }

    #[test]
    fn repeated_draws_on_a_consumed_pair_are_skipped() {
        let mut sim = Simulation::with_seed(5);
        sim.set_config(SimConfig { max_fusion_fraction_per_step: 1.0, ..hot_config() });
        sim.seed_thermal_plasma(2, 2);
        let mut fused = 0;
        for _ in 0..3 {
            let r = sim.step(config::DEFAULT_DT);
            assert_eq!(r.fusions + r.skipped_fusions, r.sampled_fusions);
            fused += r.fusions;
        }
        assert!(fused >= 1 && fused <= 2);
        assert_eq!(sim.particles.counts().helium, fused);
    }
}
