//! Derived metrics
//!
//! Every statistic of the estimator input is derived from the simulator counters
//! by a formula, registered by name. Templates refer to formulas by that name.

// Modules
pub mod formulas;

// Imports
use {
	crate::{
		config::{CfgField, Config},
		hierarchy::CacheHierarchy,
		options::Options,
		stats::Stats,
		template::{BindingKind, Scope, Template},
	},
	anyhow::Context,
	std::{
		collections::{BTreeMap, BTreeSet},
		fmt,
		ops::Range,
	},
};

/// Statistic formula
pub type StatFormula = fn(&MetricCalculator<'_>, Scope) -> Result<f64, anyhow::Error>;

/// Tuple formula
pub type CombFormula = fn(&mut MetricCalculator<'_>, Scope) -> Result<Vec<f64>, anyhow::Error>;

/// Formula registry
#[derive(Clone, Default, Debug)]
pub struct Registry {
	stats: BTreeMap<&'static str, StatFormula>,
	combs: BTreeMap<&'static str, CombFormula>,
}

impl Registry {
	/// Creates a registry with all formulas
	pub fn new() -> Self {
		let mut registry = Self::default();
		formulas::register(&mut registry);
		registry
	}

	/// Registers a statistic formula
	pub fn stat(&mut self, name: &'static str, formula: StatFormula) {
		if self.stats.insert(name, formula).is_some() {
			tracing::warn!(name, "Statistic formula registered twice, keeping latest");
		}
	}

	/// Registers a tuple formula
	pub fn comb(&mut self, name: &'static str, formula: CombFormula) {
		if self.combs.insert(name, formula).is_some() {
			tracing::warn!(name, "Tuple formula registered twice, keeping latest");
		}
	}

	/// Returns if a formula named `name` of kind `kind` exists
	pub fn contains(&self, kind: BindingKind, name: &str) -> bool {
		match kind {
			BindingKind::Cfg => name.parse::<CfgField>().is_ok(),
			BindingKind::Stat => self.stats.contains_key(name),
			BindingKind::Comb => self.combs.contains_key(name),
		}
	}
}

/// Micro-op mix assumed when the core model didn't report one, as fractions of the instruction count
pub const FALLBACK_UOP_MIX: [(&str, f64); 6] = [
	("uop_fp_addsub", 0.05),
	("uop_fp_muldiv", 0.05),
	("uop_branch", 0.15),
	("uop_load", 0.25),
	("uop_store", 0.10),
	("uop_generic", 0.40),
];

/// Per-core counters
#[derive(PartialEq, Clone, Copy, Debug)]
pub struct CoreCounters {
	pub instructions:        f64,
	pub cycles_scale:        f64,
	pub cycles:              f64,
	pub idle_cycles:         f64,
	pub fp_instructions:     f64,
	pub fp_muldiv:           f64,
	pub branch_instructions: f64,
	pub ialu_accesses:       f64,
}

/// Power-of-two rounder.
///
/// Warns once for every distinct value it had to round.
#[derive(Clone, Default, Debug)]
pub struct Power2Rounder {
	warned: BTreeSet<u64>,
}

impl Power2Rounder {
	/// Rounds `num` up to a power of two
	pub fn round_up(&mut self, num: u64) -> u64 {
		let rounded = self::round_up_pow2(num);
		if rounded != num && self.warned.insert(num) {
			tracing::warn!("Associativity {num} is not a power of two, rounding up to {rounded}");
		}

		rounded
	}

	/// Returns all values that were rounded
	pub fn warned(&self) -> &BTreeSet<u64> {
		&self.warned
	}
}

/// Rounds `num` up to a power of two.
///
/// Zero is kept as zero.
pub fn round_up_pow2(num: u64) -> u64 {
	match num {
		0 => 0,
		_ => num.checked_next_power_of_two().unwrap_or(num),
	}
}

/// Metric calculator
#[derive(Debug)]
pub struct MetricCalculator<'a> {
	stats:             &'a Stats,
	config:            &'a Config,
	hierarchy:         &'a CacheHierarchy,
	options:           &'a Options,
	registry:          Registry,
	cores:             Vec<CoreCounters>,
	max_system_cycles: f64,
	power2:            Power2Rounder,
}

impl<'a> MetricCalculator<'a> {
	/// Creates a calculator over the counters of a run
	pub fn new(
		stats: &'a Stats,
		config: &'a Config,
		hierarchy: &'a CacheHierarchy,
		options: &'a Options,
	) -> Result<Self, anyhow::Error> {
		let ncores = hierarchy.ncores;
		let cycles_scale = self::core_list(stats, "fs_to_cycles_cores", ncores)?;
		let instructions = self::core_list(stats, "performance_model.instruction_count", ncores)?;
		let elapsed_time = self::core_list(stats, "performance_model.elapsed_time", ncores)?;
		let global_time = stats.scalar("global.time")?;

		let has_uop_mix = ["interval_timer", "rob_timer"]
			.iter()
			.any(|model| stats.contains(&format!("{model}.uop_branch")));
		if !has_uop_mix {
			tracing::warn!("No micro-op mix reported, estimating it from the instruction count");
		}

		let cores = (0..ncores)
			.map(|core| -> Result<_, anyhow::Error> {
				let uop = |name| self::uop(stats, name, core, instructions[core]);
				let fp_muldiv = uop("uop_fp_muldiv")?;
				Ok(CoreCounters {
					instructions: instructions[core],
					cycles_scale: cycles_scale[core],
					cycles: cycles_scale[core] * elapsed_time[core],
					// Note: The idle time counter isn't reliable over short intervals, so we derive it from the global time
					idle_cycles: cycles_scale[core] * (global_time - elapsed_time[core]).max(0.0),
					fp_instructions: uop("uop_fp_addsub")? + fp_muldiv,
					fp_muldiv,
					branch_instructions: uop("uop_branch")?,
					ialu_accesses: uop("uop_load")? + uop("uop_store")? + uop("uop_generic")?,
				})
			})
			.collect::<Result<Vec<_>, _>>()
			.context("Unable to compute per-core counters")?;

		let max_system_cycles = match cores.iter().map(|core| core.cycles).fold(0.0, f64::max) {
			cycles if cycles == 0.0 => 1.0,
			cycles => cycles,
		};

		Ok(Self {
			stats,
			config,
			hierarchy,
			options,
			registry: Registry::new(),
			cores,
			max_system_cycles,
			power2: Power2Rounder::default(),
		})
	}

	/// Checks that every field used by `template` exists
	pub fn validate(&self, template: &Template) -> Result<(), anyhow::Error> {
		for binding in template.bindings() {
			anyhow::ensure!(
				self.registry.contains(binding.kind, &binding.name),
				"Unknown template field {:?} ({:?})",
				binding.name,
				binding.kind
			);
		}

		Ok(())
	}

	/// Evaluates statistic `name` for `scope`
	pub fn stat(&self, name: &str, scope: Scope) -> Result<f64, anyhow::Error> {
		let formula = self
			.registry
			.stats
			.get(name)
			.with_context(|| format!("Unknown statistic {name:?}"))?;
		formula(self, scope)
	}

	/// Evaluates tuple `name` for `scope`
	pub fn comb(&mut self, name: &str, scope: Scope) -> Result<Vec<f64>, anyhow::Error> {
		let formula = *self
			.registry
			.combs
			.get(name)
			.with_context(|| format!("Unknown tuple {name:?}"))?;
		formula(self, scope)
	}

	pub fn stats(&self) -> &'a Stats {
		self.stats
	}

	pub fn config(&self) -> &'a Config {
		self.config
	}

	pub fn hierarchy(&self) -> &'a CacheHierarchy {
		self.hierarchy
	}

	pub fn options(&self) -> &'a Options {
		self.options
	}

	/// Returns the highest cycle count over all cores
	pub fn max_system_cycles(&self) -> f64 {
		self.max_system_cycles
	}

	/// Returns all per-core counters
	pub fn cores(&self) -> &[CoreCounters] {
		&self.cores
	}

	/// Returns the core of `scope`
	pub fn core(&self, scope: Scope) -> Result<usize, anyhow::Error> {
		scope.core().context("Statistic is only defined per core")
	}

	/// Returns the counters of the core of `scope`
	pub fn counters(&self, scope: Scope) -> Result<&CoreCounters, anyhow::Error> {
		let core = self.core(scope)?;
		self.cores
			.get(core)
			.with_context(|| format!("Core {core} out of range ({} cores)", self.cores.len()))
	}

	/// Returns the cores sharing the L2 bank of `scope`
	pub fn l2_cores(&self, scope: Scope) -> Result<Range<usize>, anyhow::Error> {
		Ok(self.hierarchy.l2_cores(self.core(scope)?))
	}

	/// Returns the cores sharing the L3 bank of `scope`
	pub fn l3_cores(&self, scope: Scope) -> Result<Range<usize>, anyhow::Error> {
		Ok(self.hierarchy.l3_cores(self.core(scope)?))
	}

	/// Returns the duty cycle of `activity`, clamped to `1`
	pub fn duty_cycle(&self, activity: f64) -> f64 {
		(activity / self.max_system_cycles).min(1.0)
	}

	/// Sums statistic `name` over `cores`
	pub fn sum_over(&self, name: &str, cores: Range<usize>) -> Result<f64, anyhow::Error> {
		cores.map(|core| self.stats.at(name, core)).sum()
	}

	/// Sums statistic `name` over `cores`, or returns `0` if it doesn't exist
	pub fn sum_over_or_zero(&self, name: &str, cores: Range<usize>) -> Result<f64, anyhow::Error> {
		match self.stats.contains(name) {
			true => self.sum_over(name, cores),
			false => Ok(0.0),
		}
	}

	/// Rounds `num` up to a power of two
	pub fn round_up_pow2(&mut self, num: u64) -> u64 {
		self.power2.round_up(num)
	}

	/// Returns the power-of-two rounder
	pub fn power2(&self) -> &Power2Rounder {
		&self.power2
	}

	/// Formats debug output to `f`
	pub fn fmt_debug(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
		write!(
			f,
			"{} cores, {} max cycles, {} statistic formulas, {} tuple formulas",
			self.cores.len(),
			self.max_system_cycles,
			self.registry.stats.len(),
			self.registry.combs.len()
		)?;
		for (core, counters) in self.cores.iter().enumerate() {
			write!(
				f,
				"\n\t#{core}: {} instructions, {} cycles ({} idle)",
				counters.instructions, counters.cycles, counters.idle_cycles
			)?;
		}

		Ok(())
	}
}

/// Returns the first `ncores` elements of per-core list `name`
fn core_list<'a>(stats: &'a Stats, name: &str, ncores: usize) -> Result<&'a [f64], anyhow::Error> {
	let values = stats.list(name)?;
	values
		.get(..ncores)
		.with_context(|| format!("Statistic {name:?} has {} elements, expected {ncores}", values.len()))
}

/// Returns micro-op counter `name` of `core`.
///
/// Prefers the interval model's counters over the ROB model's, and
/// falls back to a fixed fraction of the instructions if neither exist.
fn uop(stats: &Stats, name: &str, core: usize, instructions: f64) -> Result<f64, anyhow::Error> {
	for model in ["interval_timer", "rob_timer"] {
		let key = format!("{model}.{name}");
		if stats.contains(&key) {
			return stats.at(&key, core);
		}
	}

	let fraction = FALLBACK_UOP_MIX
		.iter()
		.find(|&&(uop, _)| uop == name)
		.map(|&(_, fraction)| fraction)
		.with_context(|| format!("Unknown micro-op counter {name:?}"))?;
	Ok(instructions * fraction)
}

#[cfg(test)]
mod tests {
	use {
		super::*,
		crate::stats::Value,
	};

	/// Single core running 1000 cycles at 1 cycle per fs
	fn stats() -> Stats {
		let mut stats = Stats::new();
		for (name, value) in [
			("fs_to_cycles_cores", Value::List(vec![1.0])),
			("performance_model.instruction_count", Value::List(vec![2000.0])),
			("performance_model.elapsed_time", Value::List(vec![1000.0])),
			("global.time", Value::Scalar(1200.0)),
			("interval_timer.uop_fp_addsub", Value::List(vec![100.0])),
			("interval_timer.uop_fp_muldiv", Value::List(vec![50.0])),
			("interval_timer.uop_branch", Value::List(vec![300.0])),
			("interval_timer.uop_load", Value::List(vec![500.0])),
			("interval_timer.uop_store", Value::List(vec![200.0])),
			("interval_timer.uop_generic", Value::List(vec![850.0])),
		] {
			stats.insert(name, value);
		}
		stats
	}

	fn hierarchy() -> CacheHierarchy {
		CacheHierarchy {
			ncores:          1,
			technology_node: 45,
			num_l2s:         1,
			private_l2s:     true,
			l2_shared_cores: 1,
			num_l3s:         0,
			l3_shared_cores: 0,
			nuca_level:      None,
		}
	}

	#[test]
	fn pow2() {
		assert_eq!(round_up_pow2(0), 0);
		assert_eq!(round_up_pow2(1), 1);
		assert_eq!(round_up_pow2(5), 8);
		assert_eq!(round_up_pow2(8), 8);
		assert_eq!(round_up_pow2(12), 16);
	}

	#[test]
	fn pow2_warns_once_per_value() {
		let mut rounder = Power2Rounder::default();
		for num in [5, 5, 8, 12, 5, 0] {
			rounder.round_up(num);
		}
		assert_eq!(rounder.warned().iter().copied().collect::<Vec<_>>(), [5, 12]);
	}

	#[test]
	fn core_counters() {
		let (stats, config, hierarchy, options) = (self::stats(), Config::new(), self::hierarchy(), Options::default());
		let calculator = MetricCalculator::new(&stats, &config, &hierarchy, &options).expect("Unable to create calculator");

		let counters = calculator.counters(Scope::PerCore(0)).expect("Missing core");
		assert_eq!(counters.cycles, 1000.0);
		assert_eq!(counters.idle_cycles, 200.0);
		assert_eq!(counters.fp_instructions, 150.0);
		assert_eq!(counters.branch_instructions, 300.0);
		assert_eq!(counters.ialu_accesses, 1550.0);
		assert_eq!(calculator.max_system_cycles(), 1000.0);
		assert_eq!(calculator.duty_cycle(500.0), 0.5);
		assert_eq!(calculator.duty_cycle(5000.0), 1.0);

		assert!(calculator.counters(Scope::SystemWide).is_err());
		assert!(calculator.counters(Scope::PerCore(1)).is_err());
	}

	#[test]
	fn fallback_uop_mix() {
		let mut stats = self::stats();
		let mut stripped = Stats::new();
		for (name, value) in stats.iter().filter(|(name, _)| !name.starts_with("interval_timer.")) {
			stripped.insert(name, value.clone());
		}
		stats = stripped;

		let (config, hierarchy, options) = (Config::new(), self::hierarchy(), Options::default());
		let calculator = MetricCalculator::new(&stats, &config, &hierarchy, &options).expect("Unable to create calculator");
		let counters = calculator.counters(Scope::PerCore(0)).expect("Missing core");

		assert!((counters.fp_instructions - 200.0).abs() < 1e-9);
		assert!((counters.branch_instructions - 300.0).abs() < 1e-9);
		assert!((counters.ialu_accesses - 1500.0).abs() < 1e-9);
	}

	#[test]
	fn zero_cycles_use_unit_denominator() {
		let mut stats = self::stats();
		stats.insert("performance_model.elapsed_time", Value::List(vec![0.0]));

		let (config, hierarchy, options) = (Config::new(), self::hierarchy(), Options::default());
		let calculator = MetricCalculator::new(&stats, &config, &hierarchy, &options).expect("Unable to create calculator");
		assert_eq!(calculator.max_system_cycles(), 1.0);
	}

	#[test]
	fn unknown_fields() {
		let (stats, config, hierarchy, options) = (self::stats(), Config::new(), self::hierarchy(), Options::default());
		let calculator = MetricCalculator::new(&stats, &config, &hierarchy, &options).expect("Unable to create calculator");

		let template = Template::for_hierarchy(&hierarchy);
		calculator.validate(&template).expect("Builtin template uses unknown fields");

		let bogus = Template::new(vec![crate::template::TemplateEntry {
			text:    "<stat value=\"%i\"/>".to_owned(),
			binding: Some(crate::template::Binding {
				kind:  BindingKind::Stat,
				name:  "L4.read_accesses".to_owned(),
				scope: Scope::PerCore(0),
			}),
		}]);
		let err = calculator.validate(&bogus).expect_err("Unknown field accepted");
		assert!(err.to_string().contains("L4.read_accesses"));
	}
}
