use super::{render_json, simulation_options};
use crate::cli::AnalyzeArgs;
use crate::errors::CliError;
use buildwise_core::{EngineConfig, ProjectInput, SummarizerRegistry, analyze_project};

pub fn execute(config: &EngineConfig, args: &AnalyzeArgs) -> Result<String, CliError> {
    let input = ProjectInput {
        area: args.area,
        floors: args.floors,
        deadline: args.deadline,
        budget: args.budget,
        workforce_cap: args.workforce_cap,
        provider: args.provider.clone(),
    };
    let config = EngineConfig {
        simulation: simulation_options(config, args.simulation),
        ..config.clone()
    };

    let report = analyze_project(&config, &input, &SummarizerRegistry::with_defaults())?;
    render_json(&report, args.output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{OutputArgs, SimulationArgs};

    fn args(deadline: u32) -> AnalyzeArgs {
        AnalyzeArgs {
            area: 1000.0,
            floors: 2,
            deadline,
            budget: 5_000_000.0,
            workforce_cap: 40,
            provider: "template".to_string(),
            simulation: SimulationArgs {
                trials: Some(100),
                seed: Some(1),
            },
            output: OutputArgs { pretty: true },
        }
    }

    #[test]
    fn test_analyze_report() {
        let text = execute(&EngineConfig::default(), &args(200)).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(json["total_duration"], 145);
        assert_eq!(json["feasibility_status"], "Feasible");
        assert_eq!(json["simulation_results"]["trials"], 100);
    }

    #[test]
    fn test_analyze_reports_violations() {
        let text = execute(&EngineConfig::default(), &args(120)).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(json["feasibility_status"], "Infeasible");
        assert_eq!(
            json["constraint_issues"][0],
            "Deadline exceeded by 25 days."
        );
    }
}
