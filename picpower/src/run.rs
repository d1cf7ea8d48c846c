//! Analysis run

// Imports
use {
	crate::{
		config::Config,
		data::StackData,
		dram,
		estimator::Estimator,
		hierarchy::CacheHierarchy,
		metrics::MetricCalculator,
		options::Options,
		report::ComponentTree,
		stats::{MergedResult, Stats, TopologyEntry},
		taxonomy::{self, PowerStack},
		template::{self, Template},
	},
	anyhow::Context,
	picpower_util::DisplayWrapper,
	std::{
		ffi::OsString,
		fs,
		io::{self, Write},
		path::{Path, PathBuf},
	},
};

/// Output paths of a run, sharing a common base
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct OutputPaths {
	base: PathBuf,
}

impl OutputPaths {
	/// Creates the output paths with base `base`
	pub fn new(base: impl Into<PathBuf>) -> Self {
		Self { base: base.into() }
	}

	/// Estimator input document
	pub fn input(&self) -> PathBuf {
		self.with_suffix(".xml")
	}

	/// Estimator report
	pub fn report(&self) -> PathBuf {
		self.with_suffix(".txt")
	}

	/// Component tree
	pub fn tree(&self) -> PathBuf {
		self.with_suffix(".json")
	}

	/// Stack data
	pub fn stack(&self) -> PathBuf {
		self.with_suffix(".stack.json")
	}

	fn with_suffix(&self, suffix: &str) -> PathBuf {
		let mut path = OsString::from(self.base.as_os_str());
		path.push(suffix);
		PathBuf::from(path)
	}
}

/// Run context.
///
/// Holds the statistics and configuration of a run, after NUCA has been mapped
/// onto its cache level.
#[derive(Clone, Debug)]
pub struct RunContext {
	pub stats:     Stats,
	pub config:    Config,
	pub topology:  Vec<TopologyEntry>,
	pub hierarchy: CacheHierarchy,
}

impl RunContext {
	/// Prepares the context of a merged result.
	///
	/// If `override_config` is set, it's layered over the merged configuration.
	pub fn new(merged: MergedResult, override_config: Option<&str>, options: &Options) -> Result<Self, anyhow::Error> {
		let MergedResult {
			results: mut stats,
			config,
			topology,
			..
		} = merged;

		let mut config = match override_config {
			Some(text) => Config::parse_layered(text, config).context("Unable to parse override configuration")?,
			None => config,
		};

		let hierarchy = CacheHierarchy::from_config(&config, &topology).context("Unable to derive cache hierarchy")?;
		tracing::debug!(?hierarchy, "Derived cache hierarchy");
		hierarchy
			.remap_nuca(&mut config, &mut stats, options)
			.context("Unable to map NUCA onto its cache level")?;

		Ok(Self {
			stats,
			config,
			topology,
			hierarchy,
		})
	}

	/// Renders the estimator input document
	pub fn render_input(&self, options: &Options) -> Result<template::Document, anyhow::Error> {
		let template = Template::for_hierarchy(&self.hierarchy);
		let mut calculator = MetricCalculator::new(&self.stats, &self.config, &self.hierarchy, options)
			.context("Unable to create metric calculator")?;
		tracing::debug!(
			"Metric calculator: {}",
			DisplayWrapper::new(|f| calculator.fmt_debug(f))
		);

		calculator.validate(&template).context("Template uses unknown fields")?;
		let document = template::render(&template, &self.config, &mut calculator).context("Unable to render template")?;

		let warned = calculator.power2().warned();
		if !warned.is_empty() {
			tracing::info!(?warned, "Rounded non power-of-two sizes");
		}

		Ok(document)
	}

	/// Analyzes an estimator report
	pub fn analyze(&self, report: &str, options: &Options) -> Result<Analysis, anyhow::Error> {
		let mut tree = ComponentTree::parse(report, self.hierarchy.nuca_level).context("Unable to parse report")?;

		let dram = dram::power_from_stats(&self.stats, &self.config).context("Unable to compute DRAM power")?;
		tracing::debug!(?dram, "Computed DRAM power");
		tree.insert_dram(&dram);

		let stack = taxonomy::aggregate(&tree, options.power_type, options.nocollapse)
			.context("Unable to aggregate power stack")?;
		let time_s = dram::elapsed_secs(&self.stats)?;
		let data = StackData::new(&stack, self.hierarchy.ncores, time_s);

		Ok(Analysis {
			tree,
			stack,
			data,
			time_s,
		})
	}
}

/// Analysis of a run
#[derive(PartialEq, Clone, Debug)]
pub struct Analysis {
	/// Component tree, including DRAM
	pub tree: ComponentTree,

	/// Power stack
	pub stack: PowerStack,

	/// Stack data
	pub data: StackData,

	/// Elapsed time, in seconds
	pub time_s: f64,
}

impl Analysis {
	/// Writes the component tree and stack data to `output`
	pub fn write(&self, output: &OutputPaths) -> Result<(), anyhow::Error> {
		self::write_json(&output.tree(), &self.tree).context("Unable to write component tree")?;
		self::write_json(&output.stack(), &self.data).context("Unable to write stack data")?;

		Ok(())
	}
}

/// Analysis run
#[derive(Clone, Debug)]
pub struct AnalysisRun {
	/// Options
	pub options: Options,

	/// Estimator.
	///
	/// If `None`, an existing report is analyzed.
	pub estimator: Option<Estimator>,

	/// Output paths
	pub output: OutputPaths,
}

impl AnalysisRun {
	/// Executes the run over a merged result
	pub fn execute(&self, merged: MergedResult, override_config: Option<&str>) -> Result<Analysis, anyhow::Error> {
		let context = RunContext::new(merged, override_config, &self.options)?;

		let input_path = self.output.input();
		let report_path = self.output.report();
		match &self.estimator {
			Some(estimator) => {
				let document = context.render_input(&self.options)?;
				let mut input = fs::File::create(&input_path)
					.with_context(|| format!("Unable to create estimator input {input_path:?}"))?;
				writeln!(input, "{document}").context("Unable to write estimator input")?;
				tracing::info!(path = ?input_path, "Wrote estimator input");

				estimator
					.run(&input_path, &report_path)
					.context("Unable to run estimator")?;
			},
			None => tracing::info!(path = ?report_path, "Skipping estimator, using existing report"),
		}

		let report =
			fs::read_to_string(&report_path).with_context(|| format!("Unable to read report {report_path:?}"))?;
		let analysis = context.analyze(&report, &self.options)?;
		analysis.write(&self.output)?;

		Ok(analysis)
	}
}

/// Writes `value` as json to `path`
fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), anyhow::Error> {
	let file = fs::File::create(path).with_context(|| format!("Unable to create {path:?}"))?;
	let mut writer = io::BufWriter::new(file);
	serde_json::to_writer(&mut writer, value).with_context(|| format!("Unable to serialize to {path:?}"))?;
	writer.flush().with_context(|| format!("Unable to flush {path:?}"))?;

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn output_paths() {
		let output = OutputPaths::new("runs/power.v2");
		assert_eq!(output.input(), Path::new("runs/power.v2.xml"));
		assert_eq!(output.report(), Path::new("runs/power.v2.txt"));
		assert_eq!(output.tree(), Path::new("runs/power.v2.json"));
		assert_eq!(output.stack(), Path::new("runs/power.v2.stack.json"));
	}
}
