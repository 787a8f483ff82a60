use super::{render_json, simulation_options};
use crate::cli::{OutputArgs, SimulationArgs};
use crate::errors::CliError;
use buildwise_core::simulation::simulate_network;
use buildwise_core::task::build_network;
use buildwise_core::EngineConfig;

pub fn execute(
    config: &EngineConfig,
    area: f64,
    deadline: f64,
    simulation: SimulationArgs,
    output: OutputArgs,
) -> Result<String, CliError> {
    let options = simulation_options(config, simulation);
    let (network, _) = build_network(config.catalog.tasks(), config.dependency_policy.policy())?;
    let result = simulate_network(&network, area, deadline, &options)?;
    render_json(&result, output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_simulation_is_reproducible() {
        let config = EngineConfig::default();
        let args = SimulationArgs {
            trials: Some(50),
            seed: Some(3),
        };
        let output = OutputArgs { pretty: false };

        let first = execute(&config, 1000.0, 150.0, args, output).unwrap();
        let second = execute(&config, 1000.0, 150.0, args, output).unwrap();
        assert_eq!(first, second);

        let json: serde_json::Value = serde_json::from_str(&first).unwrap();
        assert_eq!(json["trials"], 50);
        assert_eq!(json["status"], "completed");
    }

    #[test]
    fn test_zero_trials_rejected() {
        let args = SimulationArgs {
            trials: Some(0),
            seed: None,
        };
        let err = execute(
            &EngineConfig::default(),
            1000.0,
            150.0,
            args,
            OutputArgs { pretty: false },
        )
        .unwrap_err();
        assert!(matches!(err, CliError::InvalidArgument { .. }));
    }
}
