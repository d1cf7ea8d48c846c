//! Arguments

// Imports
use {
	picpower::{BankMapPolicy, PowerType},
	std::path::PathBuf,
};

/// Arguments
#[derive(Debug)]
#[derive(clap::Parser)]
pub struct Args {
	/// Log file
	///
	/// Specifies a file to perform verbose logging to.
	/// You can use `RUST_LOG_FILE` to set filtering options
	#[clap(long = "log-file")]
	pub log_file: Option<PathBuf>,

	/// Whether to append to the log file
	#[clap(long = "log-file-append")]
	pub log_file_append: bool,

	/// Results directory
	pub results_dir: PathBuf,

	/// Override config file
	#[clap(long = "config")]
	pub config_file: Option<PathBuf>,

	/// Output base path.
	///
	/// Outputs are written to `<output>.xml`, `<output>.txt`, `<output>.json` and `<output>.stack.json`
	#[clap(short = 'o', long = "output", default_value = "power")]
	pub output: PathBuf,

	/// Power type of the summary
	#[clap(short = 't', long = "power-type", value_enum, default_value_t = PowerType::Total)]
	pub power_type: PowerType,

	/// Bank mapping policy of in-bank PIC operations
	#[clap(short = 'p', long = "bank-map-policy", value_enum, default_value_t = BankMapPolicy::AllWays)]
	pub bank_map_policy: BankMapPolicy,

	/// Fraction of PIC operations performed in-bank.
	///
	/// Negative values (such as `-1`) leave it unset
	#[clap(long = "in-cache-frac", allow_negative_numbers = true)]
	pub in_bank_fraction: Option<f64>,

	/// Whether to add implicit accesses to cache access counts
	#[clap(short = 'i', long = "implicit-accesses")]
	pub add_implicit_accesses: bool,

	/// First marker
	#[clap(long = "first-marker", default_value_t = picpower::StatsMerger::DEFAULT_FIRST_MARKER)]
	pub first_marker: usize,

	/// Last marker (exclusive)
	#[clap(long = "last-marker", default_value_t = picpower::StatsMerger::DEFAULT_LAST_MARKER)]
	pub last_marker: usize,

	/// Estimator binary
	#[clap(long = "estimator", default_value = "mcpat")]
	pub estimator: PathBuf,

	/// Estimator shared library directory
	#[clap(long = "estimator-lib-dir")]
	pub estimator_lib_dir: Option<PathBuf>,

	/// Skips running the estimator, analyzing an existing report instead
	#[clap(long = "no-estimator-run")]
	pub no_estimator_run: bool,

	/// Skips printing the summary
	#[clap(long = "no-text")]
	pub no_text: bool,

	/// Keeps small items in the power stack
	#[clap(long = "no-collapse")]
	pub no_collapse: bool,
}
