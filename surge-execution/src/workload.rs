//! External workload abstraction
//!
//! The load generator is an opaque collaborator: the orchestrator only knows
//! how to turn run parameters into a command line. Keeping that behind a
//! trait lets tests substitute a shell script and would let a deployment
//! swap in a different launcher without touching the supervisor.

use tokio::process::Command;

/// Validated parameters for one workload invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkloadSpec {
    /// Run length in seconds
    pub duration_secs: u32,
    /// Concurrency level
    pub clients: u32,
    /// Target endpoint
    pub url: String,
}

/// Something that can be launched as a load-generating subprocess
pub trait Workload: Send + Sync {
    /// Build the command launching this workload for the given parameters
    ///
    /// The supervisor owns stdio wiring and lifecycle; implementations only
    /// decide program and arguments.
    fn command(&self, spec: &WorkloadSpec) -> Command;

    /// Short human-readable description, used in logs
    fn describe(&self) -> String;
}

/// Workload launched via a fixed command-line contract:
/// `<program> <base_args...> -c <clients> -t <duration> <url>`
#[derive(Debug, Clone)]
pub struct CommandWorkload {
    program: String,
    base_args: Vec<String>,
}

impl CommandWorkload {
    pub fn new(program: impl Into<String>, base_args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            base_args,
        }
    }
}

impl Workload for CommandWorkload {
    fn command(&self, spec: &WorkloadSpec) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.base_args)
            .arg("-c")
            .arg(spec.clients.to_string())
            .arg("-t")
            .arg(spec.duration_secs.to_string())
            .arg(&spec.url);
        cmd
    }

    fn describe(&self) -> String {
        self.program.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_workload_argument_shape() {
        let workload = CommandWorkload::new("loadtest", vec!["--rps".to_string(), "100".to_string()]);
        let spec = WorkloadSpec {
            duration_secs: 30,
            clients: 4,
            url: "http://localhost:4000/api/health".to_string(),
        };

        let command = workload.command(&spec);
        let std_command = command.as_std();
        assert_eq!(std_command.get_program(), "loadtest");

        let args: Vec<_> = std_command
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec!["--rps", "100", "-c", "4", "-t", "30", "http://localhost:4000/api/health"]
        );
    }
}
