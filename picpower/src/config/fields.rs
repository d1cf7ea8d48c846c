//! Configuration-derived fields of the estimator input

// Imports
use {
	super::Config,
	crate::template::Scope,
	std::{fmt, str::FromStr},
};

/// Configuration-derived field
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum CfgField {
	CoreClock,
	CoreVdd,
	IssueWidth,
	PeakIssueWidth,
	AluPerCore,
	WindowSize,
	MachineType,
	L2Clock,
	L3Clock,
	NocClock,
	L2Vdd,
	L3Vdd,
	NocVdd,
}

impl CfgField {
	/// All fields
	pub const ALL: [Self; 13] = [
		Self::CoreClock,
		Self::CoreVdd,
		Self::IssueWidth,
		Self::PeakIssueWidth,
		Self::AluPerCore,
		Self::WindowSize,
		Self::MachineType,
		Self::L2Clock,
		Self::L3Clock,
		Self::NocClock,
		Self::L2Vdd,
		Self::L3Vdd,
		Self::NocVdd,
	];

	/// Returns the name of this field, as used in templates
	pub fn name(self) -> &'static str {
		match self {
			Self::CoreClock => "core_clock",
			Self::CoreVdd => "core_vdd",
			Self::IssueWidth => "issue_width",
			Self::PeakIssueWidth => "peak_issue_width",
			Self::AluPerCore => "ALU_per_core",
			Self::WindowSize => "window_size",
			Self::MachineType => "machineType",
			Self::L2Clock => "L2_clock",
			Self::L3Clock => "L3_clock",
			Self::NocClock => "NoC_clock",
			Self::L2Vdd => "L2_vdd",
			Self::L3Vdd => "L3_vdd",
			Self::NocVdd => "NoC_vdd",
		}
	}

	/// Resolves this field for `scope`
	pub fn resolve(self, config: &Config, scope: Scope) -> Result<f64, anyhow::Error> {
		let core = scope.core();
		match self {
			Self::CoreClock => self::clock_mhz(config, core),
			Self::CoreVdd => self::vdd(config, core),
			Self::IssueWidth => self::dispatch_width(config, core),
			Self::PeakIssueWidth | Self::AluPerCore => self::peak_issue_width(config, core),
			Self::WindowSize => Ok(config.resolve_parse::<u64>("perf_model/core/interval_timer/window_size", core)? as f64),
			Self::MachineType => {
				let core_type = config.resolve("perf_model/core/type", core)?;
				let in_order = config.resolve_bool_or("perf_model/core/rob_timer/in_order", core, false)?;
				Ok(match core_type == "rob" && in_order {
					true => 1.0,
					false => 0.0,
				})
			},
			Self::L2Clock => self::cache_domain(config, "perf_model/l2_cache", core, self::clock_mhz),
			Self::L3Clock => self::cache_domain(config, "perf_model/l3_cache", core, self::clock_mhz),
			Self::L2Vdd => self::cache_domain(config, "perf_model/l2_cache", core, self::vdd),
			Self::L3Vdd => self::cache_domain(config, "perf_model/l3_cache", core, self::vdd),
			Self::NocClock => self::clock_mhz(config, None),
			Self::NocVdd => self::vdd(config, None),
		}
	}
}

impl FromStr for CfgField {
	type Err = anyhow::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::ALL
			.into_iter()
			.find(|field| field.name() == s)
			.ok_or_else(|| anyhow::anyhow!("Unknown configuration field {s:?}"))
	}
}

impl fmt::Display for CfgField {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// Clock, in MHz
fn clock_mhz(config: &Config, core: Option<usize>) -> Result<f64, anyhow::Error> {
	let frequency_ghz = config.resolve_parse::<f64>("perf_model/core/frequency", core)?;
	Ok(frequency_ghz * 1000.0)
}

/// Supply voltage, `0` when unset
fn vdd(config: &Config, core: Option<usize>) -> Result<f64, anyhow::Error> {
	config.resolve_parse_or("power/vdd", core, 0.0)
}

/// Dispatch width
fn dispatch_width(config: &Config, core: Option<usize>) -> Result<f64, anyhow::Error> {
	Ok(config.resolve_parse::<u64>("perf_model/core/interval_timer/dispatch_width", core)? as f64)
}

/// Peak issue width, 1.5x the dispatch width
pub fn peak_issue_width(config: &Config, core: Option<usize>) -> Result<f64, anyhow::Error> {
	Ok((self::dispatch_width(config, core)? * 1.5).trunc())
}

/// Resolves `f` in the DVFS domain of cache `prefix`
fn cache_domain(
	config: &Config,
	prefix: &str,
	core: Option<usize>,
	f: fn(&Config, Option<usize>) -> Result<f64, anyhow::Error>,
) -> Result<f64, anyhow::Error> {
	let key = format!("{prefix}/dvfs_domain");
	match config.resolve(&key, core)? {
		"core" => f(config, core),
		"global" => f(config, None),
		domain => anyhow::bail!("Unknown DVFS domain {domain:?} for {key:?}"),
	}
}
