use crate::config::SimConfig;
use crate::frame::state::SimCommand;
use crate::profile_scope;
use crate::simulation::Simulation;

use super::simulation_loop::LoopState;

fn update_config(simulation: &mut Simulation, edit: impl FnOnce(&mut SimConfig)) {
    let mut cfg = simulation.config.clone();
    edit(&mut cfg);
    simulation.set_config(cfg);
}

pub fn handle_command(cmd: SimCommand, simulation: &mut Simulation, state: &mut LoopState) {
    profile_scope!("command_handling");
    match cmd {
        SimCommand::SetTimeScale(v) => update_config(simulation, |c| c.time_scale = v),
        SimCommand::SetTemperature(v) => update_config(simulation, |c| c.temperature = v),
        SimCommand::SetParticleDensity(v) => update_config(simulation, |c| c.particle_density = v),
        SimCommand::SetVelocityScale(v) => update_config(simulation, |c| c.velocity_scale = v),
        SimCommand::SetFusionBoost(v) => update_config(simulation, |c| c.fusion_boost = v),
        SimCommand::SetMaxFusionFraction(v) => {
            update_config(simulation, |c| c.max_fusion_fraction_per_step = v)
        }
        SimCommand::SetConfinementStrength(v) => {
            update_config(simulation, |c| c.confinement_strength = v)
        }
        SimCommand::SetCoreAttraction(v) => {
            update_config(simulation, |c| c.core_attraction_strength = v)
        }
        SimCommand::SetDriftOmega(v) => update_config(simulation, |c| c.drift_omega = v),
        SimCommand::SetWallLossProbability(v) => {
            update_config(simulation, |c| c.wall_loss_probability = v)
        }
        SimCommand::SetCoulomb(enabled) => update_config(simulation, |c| c.enable_coulomb = enabled),
        SimCommand::SetCoulombSolver(solver) => {
            update_config(simulation, |c| c.coulomb_solver = solver)
        }
        SimCommand::SetConfig(cfg) => simulation.set_config(cfg),
        SimCommand::InjectFuel { deuterium, tritium } => {
            simulation.inject_fuel(deuterium, tritium);
            println!("[refuel] +{} D + {} T", deuterium, tritium);
        }
        SimCommand::StartInjection { kick } => {
            let kicked = simulation.injection_kick(kick);
            state.running = true;
            println!("[injection] kick {:.3} applied to {} fuel ions, burn started", kick, kicked);
        }
        SimCommand::SetAutoFuel { enabled, threshold, batch_size } => {
            state.auto_fuel.enabled = enabled;
            state.auto_fuel.threshold = threshold;
            state.auto_fuel.batch_size = batch_size;
        }
        SimCommand::Reseed { deuterium, tritium } => {
            simulation.reset();
            state.flashes.clear();
            state.running = false;
            simulation.seed_thermal_plasma(deuterium, tritium);
        }
        SimCommand::Compact => {
            let removed = simulation.particles.compact();
            println!("[compact] removed {} inactive records on request", removed);
        }
        SimCommand::DeleteAll => {
            simulation.reset();
            state.flashes.clear();
        }
        SimCommand::StepOnce => state.step_once = true,
        SimCommand::Shutdown => state.shutdown = true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{self, CoulombSolver};
    use crate::simulation::AutoFuel;

    fn fixture() -> (Simulation, LoopState) {
        (Simulation::with_seed(1), LoopState::new(AutoFuel::default(), config::DEFAULT_DT))
    }

    #[test]
    fn setters_are_sanitized() {
        let (mut sim, mut state) = fixture();
        handle_command(SimCommand::SetTemperature(1e12), &mut sim, &mut state);
        handle_command(SimCommand::SetDriftOmega(f32::NAN), &mut sim, &mut state);
        handle_command(
            SimCommand::SetCoulombSolver(CoulombSolver::CellList { cutoff_debye_lengths: 4.0 }),
            &mut sim,
            &mut state,
        );
        assert_eq!(sim.config.temperature, config::TEMPERATURE_RANGE.1);
        assert_eq!(sim.config.drift_omega, config::DEFAULT_DRIFT_OMEGA);
        assert_eq!(sim.config.coulomb_solver, CoulombSolver::CellList { cutoff_debye_lengths: 4.0 });
    }

    #[test]
    fn start_injection_begins_the_burn() {
        let (mut sim, mut state) = fixture();
        sim.seed_thermal_plasma(5, 5);
        handle_command(SimCommand::StartInjection { kick: 0.25 }, &mut sim, &mut state);
        assert!(state.running);
    }

    #[test]
    fn delete_all_and_reseed() {
        let (mut sim, mut state) = fixture();
        handle_command(SimCommand::InjectFuel { deuterium: 3, tritium: 4 }, &mut sim, &mut state);
        assert_eq!(sim.particles.len(), 7);
        handle_command(SimCommand::DeleteAll, &mut sim, &mut state);
        assert!(sim.particles.is_empty());
        handle_command(SimCommand::Reseed { deuterium: 2, tritium: 2 }, &mut sim, &mut state);
        assert_eq!(sim.particles.active_count(), 4);
        assert!(!state.running);
    }

    #[test]
    fn step_once_and_shutdown_flags() {
        let (mut sim, mut state) = fixture();
        handle_command(SimCommand::StepOnce, &mut sim, &mut state);
        handle_command(SimCommand::Shutdown, &mut sim, &mut state);
        assert!(state.step_once && state.shutdown);
    }
}
