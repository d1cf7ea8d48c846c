//! Power estimation of processing-in-cache simulation runs (`picpower`).
//!
//! Merges the per-interval statistics of a simulation run, derives the activity
//! counters of every micro-architectural component, renders them into the input
//! document of an external power estimator, and folds the estimator's report
//! into a power stack.

// Modules
pub mod config;
pub mod data;
pub mod dram;
pub mod estimator;
pub mod fetch;
pub mod hierarchy;
pub mod metrics;
pub mod options;
pub mod report;
pub mod run;
pub mod stats;
pub mod taxonomy;
pub mod template;

// Exports
pub use self::{
	config::Config,
	estimator::Estimator,
	fetch::DirectoryFetcher,
	hierarchy::CacheHierarchy,
	metrics::MetricCalculator,
	options::{BankMapPolicy, Options},
	report::ComponentTree,
	run::{Analysis, AnalysisRun, OutputPaths, RunContext},
	stats::{MergedResult, StatsMerger},
	taxonomy::{PowerStack, PowerType},
};
