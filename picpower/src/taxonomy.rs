//! Power taxonomy
//!
//! Folds the estimator's component tree into a fixed set of categories,
//! under a power lens.

// Imports
use {
	crate::report::{ComponentRecord, ComponentTree, DRAM_LABEL, NUCA_LABEL},
	anyhow::Context,
	std::{collections::BTreeMap, fmt, str::FromStr},
};

/// Fraction of the total under which items are collapsed into the residual
pub const COLLAPSE_THRESHOLD: f64 = 0.01;

/// Label of the residual item
pub const OTHER_LABEL: &str = "other";

/// Power type
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
#[derive(clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PowerType {
	/// Runtime dynamic power
	Dynamic,

	/// Leakage power
	Static,

	/// Runtime dynamic and leakage power
	#[default]
	Total,

	/// Peak dynamic and leakage power
	Peak,

	/// Peak dynamic power
	#[value(name = "peakdynamic")]
	PeakDynamic,

	/// Area
	Area,

	/// Runtime dynamic power of processing-in-cache operations
	Pic,
}

impl PowerType {
	/// All power types
	pub const ALL: [Self; 7] = [
		Self::Dynamic,
		Self::Static,
		Self::Total,
		Self::Peak,
		Self::PeakDynamic,
		Self::Area,
		Self::Pic,
	];

	/// Returns the name of this power type
	pub fn name(self) -> &'static str {
		match self {
			Self::Dynamic => "dynamic",
			Self::Static => "static",
			Self::Total => "total",
			Self::Peak => "peak",
			Self::PeakDynamic => "peakdynamic",
			Self::Area => "area",
			Self::Pic => "pic",
		}
	}

	/// Returns the value of sub-structure `key` of `record` (or the whole record, if `None`) under this power type.
	///
	/// Missing metrics count as `0`.
	pub fn value(self, record: &ComponentRecord, key: Option<&str>) -> f64 {
		let metric = |name: &str| self::metric(record, key, name);
		let leakage = || metric("Subthreshold Leakage with power gating") + metric("Gate Leakage");
		match self {
			Self::Dynamic => metric("Runtime Dynamic"),
			Self::Static => leakage(),
			Self::Total => metric("Runtime Dynamic") + leakage(),
			Self::Peak => metric("Peak Dynamic") + leakage(),
			Self::PeakDynamic => metric("Peak Dynamic"),
			Self::Area => metric("Area") + metric("Area Overhead"),
			Self::Pic => metric("Runtime PIC Dynamic"),
		}
	}

	/// Returns the interconnect value of sub-structure `key` of `record` under this power type.
	///
	/// Only dynamic power is split into interconnect, for all other types this is `0`.
	pub fn interconnect_value(self, record: &ComponentRecord, key: Option<&str>) -> f64 {
		match self {
			Self::Dynamic | Self::Total => self::metric(record, key, "Runtime IC-total Dynamic"),
			_ => 0.0,
		}
	}
}

/// Returns metric `name` of sub-structure `key`, or `0` if missing
fn metric(record: &ComponentRecord, key: Option<&str>, name: &str) -> f64 {
	let value = match key {
		Some(key) => record.get(&format!("{key}/{name}")),
		None => record.get(name),
	};
	value.copied().unwrap_or(0.0)
}

impl FromStr for PowerType {
	type Err = anyhow::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::ALL
			.into_iter()
			.find(|power_type| power_type.name() == s)
			.with_context(|| format!("Unknown power type {s:?}"))
	}
}

impl fmt::Display for PowerType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// Power category
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
	Core,
	CoreIfetch,
	CoreAluComplex,
	CoreAluInt,
	CoreAluFp,
	CoreMem,
	CoreOther,
	Icache,
	Dcache,
	DcacheIc,
	L2,
	L2Ic,
	L3,
	Nuca,
	NucaIc,
	Noc,
	Dram,
}

impl Category {
	/// All categories, in stack order
	pub const ORDER: [Self; 17] = [
		Self::Core,
		Self::CoreIfetch,
		Self::CoreAluComplex,
		Self::CoreAluInt,
		Self::CoreAluFp,
		Self::CoreMem,
		Self::CoreOther,
		Self::Icache,
		Self::Dcache,
		Self::DcacheIc,
		Self::L2,
		Self::L2Ic,
		Self::L3,
		Self::Nuca,
		Self::NucaIc,
		Self::Noc,
		Self::Dram,
	];

	/// Returns the name of this category
	pub fn name(self) -> &'static str {
		match self {
			Self::Core => "core",
			Self::CoreIfetch => "core-ifetch",
			Self::CoreAluComplex => "core-alu-complex",
			Self::CoreAluInt => "core-alu-int",
			Self::CoreAluFp => "core-alu-fp",
			Self::CoreMem => "core-mem",
			Self::CoreOther => "core-other",
			Self::Icache => "icache",
			Self::Dcache => "dcache",
			Self::DcacheIc => "dcache-ic",
			Self::L2 => "l2",
			Self::L2Ic => "l2-ic",
			Self::L3 => "l3",
			Self::Nuca => "nuca",
			Self::NucaIc => "nuca-ic",
			Self::Noc => "noc",
			Self::Dram => "dram",
		}
	}

	/// Returns if this category is part of the core
	pub fn is_core(self) -> bool {
		matches!(
			self,
			Self::Core |
				Self::CoreIfetch |
				Self::CoreAluComplex |
				Self::CoreAluInt |
				Self::CoreAluFp |
				Self::CoreMem |
				Self::CoreOther
		)
	}

	/// Returns if this category is a cache
	pub fn is_cache(self) -> bool {
		matches!(
			self,
			Self::Icache |
				Self::Dcache |
				Self::DcacheIc |
				Self::L2 |
				Self::L2Ic |
				Self::L3 |
				Self::Nuca |
				Self::NucaIc
		)
	}

	/// Returns if this category lies outside of the core's own total
	fn is_uncore(self) -> bool {
		matches!(self, Self::L3 | Self::Nuca | Self::NucaIc | Self::Noc | Self::Dram)
	}

	/// Returns the core sub-structures attributed to this category
	fn core_structures(self) -> &'static [&'static str] {
		match self {
			Self::Core => &[
				"Execution Unit/Instruction Scheduler",
				"Execution Unit/Register Files",
				"Execution Unit/Results Broadcast Bus",
				"Renaming Unit",
			],
			Self::CoreIfetch => &[
				"Instruction Fetch Unit/Branch Predictor",
				"Instruction Fetch Unit/Branch Target Buffer",
				"Instruction Fetch Unit/Instruction Buffer",
				"Instruction Fetch Unit/Instruction Decoder",
			],
			Self::CoreAluComplex => &["Execution Unit/Complex ALUs"],
			Self::CoreAluInt => &["Execution Unit/Integer ALUs"],
			Self::CoreAluFp => &["Execution Unit/Floating Point Units"],
			Self::CoreMem => &[
				"Load Store Unit/LoadQ",
				"Load Store Unit/StoreQ",
				"Memory Management Unit",
			],
			Self::Icache => &["Instruction Fetch Unit/Instruction Cache"],
			Self::Dcache | Self::DcacheIc => &["Load Store Unit/Data Cache"],
			Self::L2 | Self::L2Ic => &["L2"],
			_ => &[],
		}
	}
}

impl fmt::Display for Category {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// Stack item
#[derive(PartialEq, Clone, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct StackItem {
	/// Category name, or the residual
	pub label: String,

	/// Value
	pub value: f64,
}

impl StackItem {
	/// Returns the category of this item.
	///
	/// Returns `None` for the residual.
	pub fn category(&self) -> Option<Category> {
		Category::ORDER
			.into_iter()
			.find(|category| category.name() == self.label)
	}
}

/// Stack of a single unit
#[derive(PartialEq, Clone, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct StackUnit {
	/// Value of every category
	pub raw: BTreeMap<Category, f64>,

	/// Items, in stack order, with small items collapsed
	pub items: Vec<StackItem>,

	/// Total of all categories
	pub total: f64,

	/// Residual of all collapsed items
	pub other: f64,

	/// Total relative to the largest unit
	pub scale: f64,
}

impl StackUnit {
	/// Returns the value of `category`
	pub fn get(&self, category: Category) -> f64 {
		self.raw.get(&category).copied().unwrap_or(0.0)
	}
}

/// Power stack
#[derive(PartialEq, Clone, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct PowerStack {
	/// Power type
	pub power_type: PowerType,

	/// Units.
	///
	/// The whole system is a single unit.
	pub units: Vec<StackUnit>,
}

/// Aggregates `tree` into a power stack under `power_type`.
///
/// Unless `nocollapse`, items under [`COLLAPSE_THRESHOLD`] of the total
/// are collapsed into the residual.
pub fn aggregate(tree: &ComponentTree, power_type: PowerType, nocollapse: bool) -> Result<PowerStack, anyhow::Error> {
	let raw = self::categorize(tree, power_type)?;
	let mut units = vec![self::collapse(raw, nocollapse)];

	let max_total = units.iter().map(|unit| unit.total).fold(0.0, f64::max);
	for unit in &mut units {
		unit.scale = match max_total {
			max_total if max_total == 0.0 => 1.0,
			max_total => unit.total / max_total,
		};
	}

	Ok(PowerStack { power_type, units })
}

/// Computes the value of every category
fn categorize(tree: &ComponentTree, power_type: PowerType) -> Result<BTreeMap<Category, f64>, anyhow::Error> {
	let core = tree.instances("Core").first().context("Report has no core")?;
	let processor = tree.single("Processor").context("Report has no processor")?;
	let dram = tree.single(DRAM_LABEL).context("Report has no DRAM")?;

	let core_value = |category: Category| -> f64 {
		category
			.core_structures()
			.iter()
			.map(|&structure| match category {
				Category::DcacheIc | Category::L2Ic => power_type.interconnect_value(core, Some(structure)),
				_ => power_type.value(core, Some(structure)),
			})
			.sum()
	};

	let mut raw = BTreeMap::new();
	for category in Category::ORDER {
		let value = match category {
			Category::L3 => tree
				.instances("L3")
				.iter()
				.map(|cache| power_type.value(cache, None))
				.sum(),
			Category::Nuca => tree
				.instances(NUCA_LABEL)
				.iter()
				.map(|cache| power_type.value(cache, None))
				.sum(),
			Category::NucaIc => tree
				.instances(NUCA_LABEL)
				.iter()
				.map(|cache| power_type.interconnect_value(cache, None))
				.sum(),
			Category::Noc => power_type.value(processor, Some("Total NoCs")),
			Category::Dram => power_type.value(dram, None),
			Category::CoreOther => 0.0,
			_ => core_value(category),
		};
		raw.insert(category, value);
	}

	// Interconnect is reported as part of its cache
	for (cache, interconnect) in [
		(Category::Dcache, Category::DcacheIc),
		(Category::L2, Category::L2Ic),
		(Category::Nuca, Category::NucaIc),
	] {
		let interconnect = raw.get(&interconnect).copied().unwrap_or(0.0);
		*raw.entry(cache).or_default() -= interconnect;
	}

	let attributed = raw
		.iter()
		.filter(|(category, _)| !category.is_uncore())
		.map(|(_, value)| value)
		.sum::<f64>();
	let core_other = power_type.value(core, None) - attributed;
	raw.insert(Category::CoreOther, core_other.max(0.0));

	Ok(raw)
}

/// Collapses the small items of `raw`
fn collapse(raw: BTreeMap<Category, f64>, nocollapse: bool) -> StackUnit {
	let total = raw.values().sum::<f64>();

	let mut items = vec![];
	let mut other = 0.0;
	for category in Category::ORDER {
		let value = raw.get(&category).copied().unwrap_or(0.0);
		match !nocollapse && value.abs() < COLLAPSE_THRESHOLD * total.abs() {
			true => other += value,
			false => items.push(StackItem {
				label: category.name().to_owned(),
				value,
			}),
		}
	}
	if other > 0.0 {
		items.push(StackItem {
			label: OTHER_LABEL.to_owned(),
			value: other,
		});
	}

	StackUnit {
		raw,
		items,
		total,
		other,
		scale: 1.0,
	}
}

#[cfg(test)]
mod tests {
	use {
		super::*,
		crate::{dram::DramPower, report::SEPARATOR_LEN},
	};

	/// Builds a component tree out of a core and processor block
	fn tree(core: &str) -> ComponentTree {
		let separator = "*".repeat(SEPARATOR_LEN);
		let report = format!(
			"McPAT\n{separator}\nTechnology\n{separator}\nProcessor:\n  Area = 1 mm^2\n{separator}\n{core}{separator}\n"
		);
		let mut tree = ComponentTree::parse(&report, None).expect("Unable to parse report");
		tree.insert_dram(&DramPower {
			dynamic: 0.0,
			static_: 0.0,
		});
		tree
	}

	#[test]
	fn complex_alu_only() {
		let tree = self::tree("Core:\n  Execution Unit:\n    Complex ALUs:\n      Runtime Dynamic = 2.0 W\n");
		let stack = aggregate(&tree, PowerType::Dynamic, false).expect("Unable to aggregate");
		let unit = &stack.units[0];

		assert_eq!(unit.get(Category::CoreAluComplex), 2.0);
		assert_eq!(unit.get(Category::CoreOther), 0.0);
		assert_eq!(unit.total, 2.0);
		assert_eq!(unit.scale, 1.0);
		assert_eq!(unit.items, [StackItem {
			label: "core-alu-complex".to_owned(),
			value: 2.0,
		}]);
	}

	#[test]
	fn interconnect_is_split() {
		let core = "Core:
  Runtime Dynamic = 10.0 W
  Load Store Unit:
    Data Cache:
      Runtime Dynamic = 4.0 W
      Runtime IC-total Dynamic = 1.0 W
  Execution Unit:
    Integer ALUs:
      Runtime Dynamic = 3.0 W
";
		let tree = self::tree(core);
		let stack = aggregate(&tree, PowerType::Total, true).expect("Unable to aggregate");
		let unit = &stack.units[0];

		assert_eq!(unit.get(Category::Dcache), 3.0);
		assert_eq!(unit.get(Category::DcacheIc), 1.0);
		assert_eq!(unit.get(Category::CoreAluInt), 3.0);
		assert_eq!(unit.get(Category::CoreOther), 3.0);
		assert_eq!(unit.items.len(), Category::ORDER.len());

		// Interconnect isn't split under the static lens
		let stack = aggregate(&tree, PowerType::Static, false).expect("Unable to aggregate");
		assert_eq!(stack.units[0].get(Category::DcacheIc), 0.0);
	}

	#[test]
	fn core_other_never_negative() {
		let core = "Core:
  Runtime Dynamic = 1.0 W
  Execution Unit:
    Integer ALUs:
      Runtime Dynamic = 3.0 W
";
		for power_type in PowerType::ALL {
			let stack = aggregate(&self::tree(core), power_type, false).expect("Unable to aggregate");
			assert!(stack.units[0].get(Category::CoreOther) >= 0.0);
		}
	}

	#[test]
	fn small_items_collapse() {
		let core = "Core:
  Runtime Dynamic = 100.0 W
  Execution Unit:
    Integer ALUs:
      Runtime Dynamic = 99.5 W
    Floating Point Units:
      Runtime Dynamic = 0.5 W
";
		let stack = aggregate(&self::tree(core), PowerType::Dynamic, false).expect("Unable to aggregate");
		let unit = &stack.units[0];
		let labels = unit.items.iter().map(|item| item.label.as_str()).collect::<Vec<_>>();

		assert_eq!(labels, ["core-alu-int", OTHER_LABEL]);
		assert_eq!(unit.other, 0.5);
	}

	#[test]
	fn missing_core() {
		let separator = "*".repeat(SEPARATOR_LEN);
		let report = format!("McPAT\n{separator}\nTechnology\n{separator}\nProcessor:\n  Area = 1 mm^2\n{separator}\n");
		let tree = ComponentTree::parse(&report, None).expect("Unable to parse report");
		assert!(aggregate(&tree, PowerType::Total, false).is_err());
	}

	#[test]
	fn power_type_names() {
		for power_type in PowerType::ALL {
			assert_eq!(power_type.name().parse::<PowerType>().ok(), Some(power_type));
		}
		assert!("leakage".parse::<PowerType>().is_err());
		assert_eq!(
			serde_json::to_string(&Category::CoreAluComplex).ok().as_deref(),
			Some("\"core-alu-complex\"")
		);
		assert_eq!(serde_json::to_string(&Category::L2Ic).ok().as_deref(), Some("\"l2-ic\""));
	}
}
