use crate::census::Census;
use crate::cli::CommandLineArgs;
use crate::error::SummaristError;
use crate::fees::FeeTable;
use crate::reducer::ReducePolicy;
use crate::resource_manager::ResourceManager;

use std::sync::Arc;

/// Shared application state passed to each request handler.
pub struct AppState {
    /// Command line arguments.
    pub args: CommandLineArgs,

    /// Resource manager.
    pub resource_manager: ResourceManager,

    /// Frequency table policy for reductions.
    pub policy: ReducePolicy,

    /// Violation fee reference table.
    pub fees: FeeTable,

    /// Census population table.
    pub census: Census,
}

impl AppState {
    /// Create and return an [AppState]. Loads both reference tables.
    pub fn new(args: &CommandLineArgs) -> Result<Self, SummaristError> {
        let task_limit = args
            .thread_limit
            .or_else(|| Some(default_task_limit(num_cpus::get())));
        let resource_manager = ResourceManager::new(task_limit);
        let policy = ReducePolicy {
            count_missing_in_frequency: !args.exclude_missing_from_frequency,
        };
        let fees = FeeTable::load(&args.violation_codes_file)?;
        let census = Census::load(&args.census_file)?;

        Ok(Self {
            args: args.clone(),
            resource_manager,
            policy,
            fees,
            census,
        })
    }
}

/// Default number of concurrent task permits: one core is left for the async
/// runtime, never fewer than one permit.
fn default_task_limit(cpus: usize) -> usize {
    cpus.saturating_sub(1).max(1)
}

/// AppState wrapped in an Atomic Reference Count (Arc) to allow multiple references.
pub type SharedAppState = Arc<AppState>;
