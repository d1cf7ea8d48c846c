//! Estimator report
//!
//! The estimator prints one block per component, separated by a line of `*`.
//! Inside each block, nesting is given by indentation, and metrics are
//! `name = value` lines.

// Imports
use {
	crate::{dram::DramPower, hierarchy::CacheLevel},
	anyhow::Context,
	itertools::Itertools,
	std::collections::{btree_map, BTreeMap},
};

/// Block separator
pub const SEPARATOR_LEN: usize = 89;

/// Components that have one instance per core or bank
pub const REPEATED_COMPONENTS: [&str; 3] = ["Core", "L2", "L3"];

/// Label of the cache level standing in for NUCA
pub const NUCA_LABEL: &str = "NUCA";

/// Label of the DRAM record
pub const DRAM_LABEL: &str = "DRAM";

/// Component record, from metric path to value
pub type ComponentRecord = BTreeMap<String, f64>;

/// Component
#[derive(PartialEq, Clone, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum Component {
	/// Single instance
	Single(ComponentRecord),

	/// Instance per core or bank, in report order
	Instances(Vec<ComponentRecord>),
}

/// Component tree
#[derive(PartialEq, Clone, Default, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ComponentTree {
	components: BTreeMap<String, Component>,
}

impl ComponentTree {
	/// Parses an estimator report.
	///
	/// If `nuca_level` is set, that cache level is relabeled as NUCA.
	pub fn parse(report: &str, nuca_level: Option<CacheLevel>) -> Result<Self, anyhow::Error> {
		let separator = "*".repeat(SEPARATOR_LEN);
		let blocks = report.split(separator.as_str()).collect::<Vec<_>>();

		// Note: The first two blocks are the banner and technology summary, and the last one is trailing text
		let blocks = match blocks.len() {
			len if len >= 3 => &blocks[2..len - 1],
			_ => &[][..],
		};

		let mut tree = Self::default();
		for block in blocks {
			let (label, record) = self::parse_block(block)?;
			tracing::trace!(label, metrics = record.len(), "Parsed component");

			match REPEATED_COMPONENTS.contains(&label) {
				true => {
					let label = match nuca_level {
						Some(level) if level.label() == label => NUCA_LABEL,
						_ => label,
					};
					match tree.components.entry(label.to_owned()).or_insert_with(|| Component::Instances(vec![])) {
						Component::Instances(instances) => instances.push(record),
						Component::Single(_) => anyhow::bail!("Component {label:?} is both repeated and unique"),
					}
				},
				false => match tree.components.entry(label.to_owned()) {
					btree_map::Entry::Vacant(entry) => {
						entry.insert(Component::Single(record));
					},
					btree_map::Entry::Occupied(_) => anyhow::bail!("Duplicate component {label:?}"),
				},
			}
		}

		anyhow::ensure!(!tree.components.is_empty(), "No valid output from estimator");
		Ok(tree)
	}

	/// Inserts the DRAM record
	pub fn insert_dram(&mut self, power: &DramPower) {
		self.components
			.insert(DRAM_LABEL.to_owned(), Component::Single(power.record()));
	}

	/// Returns all components
	pub fn components(&self) -> &BTreeMap<String, Component> {
		&self.components
	}

	/// Returns the unique component `label`
	pub fn single(&self, label: &str) -> Option<&ComponentRecord> {
		match self.components.get(label)? {
			Component::Single(record) => Some(record),
			Component::Instances(_) => None,
		}
	}

	/// Returns all instances of component `label`.
	///
	/// Returns an empty slice if it doesn't exist.
	pub fn instances(&self, label: &str) -> &[ComponentRecord] {
		match self.components.get(label) {
			Some(Component::Instances(instances)) => instances,
			_ => &[],
		}
	}
}

/// Nesting stack of a block
#[derive(Clone, Default, Debug)]
struct PrefixStack {
	/// Indentation and name of each level
	levels: Vec<(usize, String)>,
}

impl PrefixStack {
	/// Enters `name` at `indent`, leaving all levels at the same or deeper indentation
	fn enter(&mut self, indent: usize, name: &str) {
		while self.levels.last().is_some_and(|&(level_indent, _)| indent <= level_indent) {
			self.levels.pop();
		}
		self.levels.push((indent, name.trim().to_owned()));
	}

	/// Returns the path of metric `name` within the current level
	fn path(&self, name: &str) -> String {
		let path = self
			.levels
			.iter()
			.map(|(_, level)| level.as_str())
			.chain([name])
			.join("/");
		path.trim().to_owned()
	}
}

/// Parses a component block into its label and record
fn parse_block(block: &str) -> Result<(&str, ComponentRecord), anyhow::Error> {
	let mut lines = block.trim().lines();
	let label = lines.next().unwrap_or_default().trim().trim_matches(':');

	let mut prefix = PrefixStack::default();
	let mut record = ComponentRecord::new();
	for line in lines {
		if line.trim().is_empty() {
			continue;
		}

		match line.contains('=') {
			true => {
				let Some((name, value)) = self::parse_metric(line)
					.with_context(|| format!("Unable to parse metric {line:?} of component {label:?}"))?
				else {
					continue;
				};
				record.insert(prefix.path(name), value);
			},
			false => {
				let indent = line.len() - line.trim_start_matches(' ').len();
				let name = line[indent..].split([':', '(']).next().unwrap_or_default();
				prefix.enter(indent, name);
			},
		}
	}

	Ok((label, record))
}

/// Parses a `name = value` metric line.
///
/// Returns `None` if the line isn't a metric, and `0` for `nan` values.
fn parse_metric(line: &str) -> Result<Option<(&str, f64)>, anyhow::Error> {
	let Some((name, rest)) = line.trim_start_matches(' ').split_once('=') else {
		return Ok(None);
	};
	if name.is_empty() {
		return Ok(None);
	}

	let rest = rest.trim_start_matches(' ');
	let number_len = rest
		.find(|ch: char| !matches!(ch, '-' | '+' | '0'..='9' | '.' | 'e'))
		.unwrap_or(rest.len());
	if number_len == 0 {
		return Ok(None);
	}

	// Note: Structures without area report their gated leakage as `-nan`
	let (number, suffix) = rest.split_at(number_len);
	if suffix.starts_with("nan") {
		return Ok(Some((name, 0.0)));
	}

	let value = number
		.parse::<f64>()
		.with_context(|| format!("Invalid number {number:?}"))?;
	Ok(Some((name, value)))
}

#[cfg(test)]
mod tests {
	use super::*;

	/// Builds a report out of component blocks
	fn report(blocks: &[&str]) -> String {
		let separator = "*".repeat(SEPARATOR_LEN);
		let mut report = format!("McPAT (version 1.3)\n{separator}\nTechnology 45 nm\n");
		for block in blocks {
			report.push_str(&separator);
			report.push('\n');
			report.push_str(block);
		}
		report.push_str(&separator);
		report.push_str("\nDone\n");
		report
	}

	const CORE: &str = "Core:
  Area = 12.5 mm^2
  Runtime Dynamic = 2.0 W
  Instruction Fetch Unit:
    Area = 1.5 mm^2
    Instruction Cache:
      Runtime Dynamic = 0.25 W
    Branch Predictor (Count: 1):
      Runtime Dynamic = 0.125 W
  Execution Unit:
    Subthreshold Leakage with power gating = -nan W
    Complex ALUs (Count: 2 ):
      Runtime Dynamic = 1e-3 W
";

	#[test]
	fn nested_metrics() {
		let tree = ComponentTree::parse(&report(&[CORE]), None).expect("Unable to parse report");
		let cores = tree.instances("Core");
		assert_eq!(cores.len(), 1);

		let core = &cores[0];
		assert_eq!(core.get("Area"), Some(&12.5));
		assert_eq!(core.get("Runtime Dynamic"), Some(&2.0));
		assert_eq!(core.get("Instruction Fetch Unit/Area"), Some(&1.5));
		assert_eq!(
			core.get("Instruction Fetch Unit/Instruction Cache/Runtime Dynamic"),
			Some(&0.25)
		);
		assert_eq!(
			core.get("Instruction Fetch Unit/Branch Predictor/Runtime Dynamic"),
			Some(&0.125)
		);
		assert_eq!(
			core.get("Execution Unit/Subthreshold Leakage with power gating"),
			Some(&0.0)
		);
		assert_eq!(core.get("Execution Unit/Complex ALUs/Runtime Dynamic"), Some(&1e-3));
	}

	#[test]
	fn repeated_and_nuca() {
		let l2 = "L2\n  Runtime Dynamic = 0.5 W\n";
		let processor = "Processor:\n  Area = 100 mm^2\n";
		let report = report(&[processor, CORE, CORE, l2, l2]);

		let tree = ComponentTree::parse(&report, None).expect("Unable to parse report");
		assert_eq!(tree.instances("Core").len(), 2);
		assert_eq!(tree.instances("L2").len(), 2);
		assert_eq!(tree.single("Processor").and_then(|record| record.get("Area")), Some(&100.0));

		let tree = ComponentTree::parse(&report, Some(CacheLevel::L2)).expect("Unable to parse report");
		assert!(tree.instances("L2").is_empty());
		assert_eq!(tree.instances(NUCA_LABEL).len(), 2);
	}

	#[test]
	fn invalid_reports() {
		assert!(ComponentTree::parse("", None).is_err());
		assert!(ComponentTree::parse(&report(&[]), None).is_err());

		let processor = "Processor:\n  Area = 100 mm^2\n";
		assert!(ComponentTree::parse(&report(&[processor, processor]), None).is_err());

		let broken = "Processor:\n  Area = 1.2.3 mm^2\n";
		assert!(ComponentTree::parse(&report(&[broken]), None).is_err());
	}

	#[test]
	fn dram_record() {
		let mut tree = ComponentTree::parse(&report(&[CORE]), None).expect("Unable to parse report");
		tree.insert_dram(&DramPower {
			dynamic: 1.5,
			static_: 0.5,
		});

		let dram = tree.single(DRAM_LABEL).expect("Missing DRAM");
		assert_eq!(dram.get("Runtime Dynamic"), Some(&1.5));
		assert_eq!(dram.get("Gate Leakage"), Some(&0.0));
	}
}
