//! Pipeline tests

// Imports
use {
	picpower::{
		data::StackData,
		report::SEPARATOR_LEN,
		AnalysisRun,
		ComponentTree,
		DirectoryFetcher,
		Options,
		OutputPaths,
		PowerType,
		RunContext,
		StatsMerger,
	},
	std::{fs, path::Path},
};

/// Writes the result set of interval `idx` to `dir`
fn write_interval(dir: &Path, idx: usize) {
	let set = r#"{
		"results": {
			"performance_model.elapsed_time": [500000000000000],
			"dram.reads": [0],
			"dram.writes": [0],
			"ncores": 1
		},
		"config": {
			"general/total_cores": "1",
			"perf_model/cache/levels": "2",
			"perf_model/dram/num_controllers": "1"
		}
	}"#;
	let path = dir.join(format!("marker-1-{idx}_marker-2-{idx}.json"));
	fs::write(path, set).expect("Unable to write result set");
}

/// Builds an estimator report
fn report() -> String {
	let separator = "*".repeat(SEPARATOR_LEN);
	format!(
		"McPAT (version 1.3)
{separator}
Technology 45 nm
{separator}
Processor:
  Area = 50 mm^2
  Runtime Dynamic = 4.0 W
{separator}
Core:
  Runtime Dynamic = 4.0 W
  Execution Unit:
    Complex ALUs (Count: 1 ):
      Runtime Dynamic = 3.0 W
{separator}
"
	)
}

fn merge(dir: &Path) -> picpower::MergedResult {
	let (merged, _) = StatsMerger::new(StatsMerger::DEFAULT_FIRST_MARKER, StatsMerger::DEFAULT_FIRST_MARKER + 4)
		.merge(&mut DirectoryFetcher::new(dir))
		.expect("Unable to merge results");
	merged
}

fn assert_close(lhs: f64, rhs: f64) {
	assert!((lhs - rhs).abs() <= 1e-9 * lhs.abs().max(rhs.abs()), "{lhs} != {rhs}");
}

#[test]
fn existing_report() {
	let results_dir = tempfile::tempdir().expect("Unable to create temporary directory");
	self::write_interval(results_dir.path(), 64);
	self::write_interval(results_dir.path(), 66);
	let merged = self::merge(results_dir.path());
	assert_eq!(merged.intervals, 2);

	let output_dir = tempfile::tempdir().expect("Unable to create temporary directory");
	let output = OutputPaths::new(output_dir.path().join("power"));
	fs::write(output.report(), self::report()).expect("Unable to write report");

	let run = AnalysisRun {
		options: Options {
			power_type: PowerType::Dynamic,
			..Options::default()
		},
		estimator: None,
		output: output.clone(),
	};
	let analysis = run.execute(merged, None).expect("Unable to run analysis");

	assert_close(analysis.time_s, 1.0);
	let unit = &analysis.stack.units[0];
	assert_eq!(unit.total, 4.0);
	let labels = unit.items.iter().map(|item| item.label.as_str()).collect::<Vec<_>>();
	assert_eq!(labels, ["core-alu-complex", "core-other"]);

	// The estimator input isn't rendered when analyzing an existing report
	assert!(!output.input().exists());

	let tree = fs::read_to_string(output.tree()).expect("Unable to read component tree");
	let tree = serde_json::from_str::<ComponentTree>(&tree).expect("Unable to parse component tree");
	assert_eq!(tree, analysis.tree);
	assert_eq!(
		tree.single("DRAM").and_then(|dram| dram.get("Runtime Dynamic")),
		Some(&0.0)
	);

	let data = fs::read_to_string(output.stack()).expect("Unable to read stack data");
	let data = serde_json::from_str::<StackData>(&data).expect("Unable to parse stack data");
	assert_eq!(data.power_type, PowerType::Dynamic);
	assert_eq!(data.ncores, 1);
	assert_eq!(data.labels, ["core-alu-complex", "core-other"]);
	let energy = data.data[0].get("core-alu-complex").copied().expect("Missing energy");
	assert_close(energy, 3.0);
}

#[test]
fn override_config() {
	let results_dir = tempfile::tempdir().expect("Unable to create temporary directory");
	self::write_interval(results_dir.path(), 65);
	let merged = self::merge(results_dir.path());

	let context = RunContext::new(merged, Some("[general]\ntotal_cores = 2\n"), &Options::default())
		.expect("Unable to prepare run");
	assert_eq!(context.hierarchy.ncores, 2);
	assert_eq!(context.hierarchy.num_l2s, 0);
	assert_eq!(context.hierarchy.nuca_level, None);
}

#[test]
fn missing_report() {
	let results_dir = tempfile::tempdir().expect("Unable to create temporary directory");
	self::write_interval(results_dir.path(), 64);
	let merged = self::merge(results_dir.path());

	let output_dir = tempfile::tempdir().expect("Unable to create temporary directory");
	let run = AnalysisRun {
		options:   Options::default(),
		estimator: None,
		output:    OutputPaths::new(output_dir.path().join("power")),
	};
	assert!(run.execute(merged, None).is_err());
}
