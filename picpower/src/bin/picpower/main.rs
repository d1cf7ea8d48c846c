//! Power estimation of processing-in-cache simulation runs (`picpower`)

// Modules
mod args;

// Imports
use {
	self::args::Args,
	anyhow::Context,
	clap::Parser,
	picpower::{data, AnalysisRun, DirectoryFetcher, Estimator, Options, OutputPaths, StatsMerger},
	picpower_util::{logger, DisplayWrapper},
	std::fs,
};

fn main() -> Result<(), anyhow::Error> {
	// Get arguments
	let args = Args::parse();
	logger::pre_init::debug(format!("Args: {args:?}"));

	// Initialize logging
	logger::init(args.log_file.as_deref(), args.log_file_append);

	let options = Options {
		power_type:            args.power_type,
		bank_map_policy:       args.bank_map_policy,
		in_bank_fraction:      Options::normalize_in_bank_fraction(args.in_bank_fraction)?,
		add_implicit_accesses: args.add_implicit_accesses,
		nocollapse:            args.no_collapse,
		first_marker:          args.first_marker,
		last_marker:           args.last_marker,
	};
	tracing::debug!(?options, "Run options");

	// Merge all intervals
	let mut fetcher = DirectoryFetcher::new(&args.results_dir);
	let (merged, _) = StatsMerger::new(options.first_marker, options.last_marker)
		.merge(&mut fetcher)
		.context("Unable to merge results")?;
	anyhow::ensure!(
		merged.intervals > 0,
		"No results found in {:?} between markers {} and {}",
		args.results_dir,
		options.first_marker,
		options.last_marker
	);

	// Read the override config file
	let override_config = args
		.config_file
		.as_ref()
		.map(|path| fs::read_to_string(path).context("Unable to read config file"))
		.transpose()?;

	// Then run
	let run = AnalysisRun {
		options,
		estimator: match args.no_estimator_run {
			true => None,
			false => Some(Estimator::new(&args.estimator, args.estimator_lib_dir.clone())),
		},
		output: OutputPaths::new(&args.output),
	};
	let analysis = run
		.execute(merged, override_config.as_deref())
		.context("Unable to run analysis")?;

	if !args.no_text {
		print!(
			"{}",
			DisplayWrapper::new(|f| data::fmt_summary(&analysis.stack, analysis.time_s, f))
		);
	}

	Ok(())
}
