//! Process supervision for external load-generating workloads
//!
//! This crate owns the only mutable view of a run's OS process: the
//! supervisor spawns the workload, streams its output into a per-run log
//! artifact, delivers stop signals with forceful escalation, and reports the
//! exit outcome exactly once to an observer. Persisted state is somebody
//! else's job; the supervisor's tracking map is process-local and lost on
//! restart by design.

pub mod capture;
pub mod error;
pub mod supervisor;
pub mod workload;

pub use capture::{read_bounded, OutputCapture};
pub use error::{ExecutionError, ExecutionResult};
pub use supervisor::{ExitObserver, ExitOutcome, ProcessSupervisor, SupervisorConfig};
pub use workload::{CommandWorkload, Workload, WorkloadSpec};
