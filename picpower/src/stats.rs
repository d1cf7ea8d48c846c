//! Simulator statistics

// Modules
pub mod merger;

// Exports
pub use self::merger::{MarkerInterval, ResultFetcher, StatsMerger};

// Imports
use {
	crate::config::Config,
	anyhow::Context,
	std::collections::{btree_map, BTreeMap},
};

/// Statistic value.
///
/// Either a single number or one number per core.
#[derive(PartialEq, Clone, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum Value {
	/// Scalar
	Scalar(f64),

	/// Per-core list
	List(Vec<f64>),
}

impl Value {
	/// Returns the `idx`-th element of a per-core list.
	///
	/// Scalars have no elements.
	pub fn get(&self, idx: usize) -> Option<f64> {
		match self {
			Self::Scalar(_) => None,
			Self::List(values) => values.get(idx).copied(),
		}
	}

	/// Returns this value as a single number.
	///
	/// Single-element lists are accepted, since some statistics
	/// are only reported for one core.
	pub fn as_scalar(&self) -> Option<f64> {
		match self {
			Self::Scalar(value) => Some(*value),
			Self::List(values) => match values[..] {
				[value] => Some(value),
				_ => None,
			},
		}
	}

	/// Returns the sum of all elements
	pub fn sum(&self) -> f64 {
		match self {
			Self::Scalar(value) => *value,
			Self::List(values) => values.iter().sum(),
		}
	}

	/// Returns a name for this value's kind
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Scalar(_) => "scalar",
			Self::List(_) => "list",
		}
	}

	/// Combines two values of the same kind elementwise.
	///
	/// Lists of different lengths are truncated to the shorter one.
	///
	/// # Errors
	/// Returns an error if the kinds differ.
	pub fn zip_with(&self, other: &Self, f: impl Fn(f64, f64) -> f64) -> Result<Self, anyhow::Error> {
		match (self, other) {
			(Self::Scalar(lhs), Self::Scalar(rhs)) => Ok(Self::Scalar(f(*lhs, *rhs))),
			(Self::List(lhs), Self::List(rhs)) => {
				if lhs.len() != rhs.len() {
					tracing::warn!(
						"Combining lists of different lengths ({} and {}), truncating",
						lhs.len(),
						rhs.len()
					);
				}
				Ok(Self::List(lhs.iter().zip(rhs).map(|(&lhs, &rhs)| f(lhs, rhs)).collect()))
			},
			_ => anyhow::bail!("Cannot combine a {} with a {}", self.kind(), other.kind()),
		}
	}

	/// Applies `f` to every element
	pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
		match self {
			Self::Scalar(value) => Self::Scalar(f(*value)),
			Self::List(values) => Self::List(values.iter().map(|&value| f(value)).collect()),
		}
	}
}

/// Statistics, by name
#[derive(PartialEq, Clone, Default, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Stats {
	values: BTreeMap<String, Value>,
}

impl Stats {
	/// Creates empty statistics
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns if there are no statistics
	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	/// Returns if a statistic exists
	pub fn contains(&self, name: &str) -> bool {
		self.values.contains_key(name)
	}

	/// Returns a statistic
	pub fn get(&self, name: &str) -> Option<&Value> {
		self.values.get(name)
	}

	/// Inserts a statistic, replacing any previous value
	pub fn insert(&mut self, name: impl Into<String>, value: Value) {
		self.values.insert(name.into(), value);
	}

	/// Returns an iterator over all statistics
	pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.values.iter().map(|(name, value)| (name.as_str(), value))
	}

	/// Returns a required statistic
	pub fn require(&self, name: &str) -> Result<&Value, anyhow::Error> {
		self.get(name)
			.with_context(|| format!("Missing statistic {name:?}"))
	}

	/// Returns a required per-core list
	pub fn list(&self, name: &str) -> Result<&[f64], anyhow::Error> {
		match self.require(name)? {
			Value::List(values) => Ok(values),
			Value::Scalar(_) => anyhow::bail!("Statistic {name:?} is a scalar, expected a list"),
		}
	}

	/// Returns a required scalar
	pub fn scalar(&self, name: &str) -> Result<f64, anyhow::Error> {
		let value = self.require(name)?;
		value
			.as_scalar()
			.with_context(|| format!("Statistic {name:?} is a {}, expected a scalar", value.kind()))
	}

	/// Returns the `idx`-th element of a required per-core list
	pub fn at(&self, name: &str, idx: usize) -> Result<f64, anyhow::Error> {
		self.require(name)?
			.get(idx)
			.with_context(|| format!("Statistic {name:?} has no element {idx}"))
	}

	/// Returns the `idx`-th element of a per-core list, or `0` if the statistic doesn't exist
	pub fn at_or_zero(&self, name: &str, idx: usize) -> Result<f64, anyhow::Error> {
		match self.contains(name) {
			true => self.at(name, idx),
			false => Ok(0.0),
		}
	}
}

impl FromIterator<(String, Value)> for Stats {
	fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
		Self {
			values: iter.into_iter().collect(),
		}
	}
}

/// Topology entry, as reported by the simulator
#[derive(PartialEq, Eq, Clone, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct TopologyEntry {
	/// Component name
	pub name: String,

	/// Location (core) id
	pub location: usize,

	/// Memory id
	pub memory: usize,
}

/// Results of a single interval
#[derive(PartialEq, Clone, Default, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct ResultSet {
	/// Statistics
	pub results: Stats,

	/// Configuration snapshot
	#[serde(default)]
	pub config: Config,

	/// Topology
	#[serde(default)]
	pub topology: Vec<TopologyEntry>,
}

/// Merge policy of a statistic
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum MergePolicy {
	/// The latest value is kept, the value is usually the same over all intervals
	CopyAsIs,

	/// The latest value is kept, the value is expected to be zero
	AssertZero,

	/// Values are summed
	Additive,
}

impl MergePolicy {
	/// Statistics merged with [`MergePolicy::CopyAsIs`]
	pub const COPY_AS_IS: [&'static str; 15] = [
		"fs_to_cycles",
		"fs_to_cycles_cores",
		"corefreq",
		"ipc",
		"walltime",
		"ncores",
		"roi.ipstotal",
		"roi.instrs",
		"roi.walltime",
		"time.walltime",
		"power.NOC",
		"power.Processor",
		"power.NUCA",
		"power.DRAM",
		"power.Core",
	];

	/// Statistics merged with [`MergePolicy::AssertZero`]
	pub const ASSERT_ZERO: [&'static str; 3] = [
		"global.time_begin",
		"performance_model.elapsed_time_begin",
		"barrier.global_time_begin",
	];

	/// Returns the policy for statistic `name`
	pub fn for_stat(name: &str) -> Self {
		if Self::COPY_AS_IS.contains(&name) {
			Self::CopyAsIs
		} else if Self::ASSERT_ZERO.contains(&name) {
			Self::AssertZero
		} else {
			Self::Additive
		}
	}
}

/// Results merged over several intervals
#[derive(PartialEq, Clone, Default, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct MergedResult {
	/// Statistics
	pub results: Stats,

	/// Configuration of the latest interval
	pub config: Config,

	/// Topology of the latest interval
	pub topology: Vec<TopologyEntry>,

	/// Number of intervals folded in
	pub intervals: usize,
}

impl MergedResult {
	/// Creates an empty result
	pub fn new() -> Self {
		Self::default()
	}

	/// Folds an interval's result set into this one
	pub fn absorb(&mut self, set: ResultSet) -> Result<(), anyhow::Error> {
		self.merge_parts(set.results, set.config, set.topology)?;
		self.intervals += 1;

		Ok(())
	}

	/// Merges a later merged result into this one.
	///
	/// Merging is associative: folding intervals `[a, b]` and then `c` is
	/// the same as folding `a` and then `[b, c]`.
	pub fn merge(&mut self, other: Self) -> Result<(), anyhow::Error> {
		self.merge_parts(other.results, other.config, other.topology)?;
		self.intervals += other.intervals;

		Ok(())
	}

	/// Merges statistics, config and topology
	fn merge_parts(&mut self, results: Stats, config: Config, topology: Vec<TopologyEntry>) -> Result<(), anyhow::Error> {
		for (name, value) in results.values {
			match self.results.values.entry(name) {
				btree_map::Entry::Vacant(entry) => {
					entry.insert(value);
				},
				btree_map::Entry::Occupied(mut entry) => match MergePolicy::for_stat(entry.key()) {
					MergePolicy::CopyAsIs | MergePolicy::AssertZero => {
						entry.insert(value);
					},
					MergePolicy::Additive => {
						let merged = entry
							.get()
							.zip_with(&value, |lhs, rhs| lhs + rhs)
							.with_context(|| format!("Unable to merge statistic {:?}", entry.key()))?;
						entry.insert(merged);
					},
				},
			}
		}

		// Note: Empty intervals carry no configuration, so they don't override it
		if !config.is_empty() {
			self.config = config;
		}
		if !topology.is_empty() {
			self.topology = topology;
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn set(stats: impl IntoIterator<Item = (&'static str, Value)>) -> ResultSet {
		ResultSet {
			results: stats.into_iter().map(|(name, value)| (name.to_owned(), value)).collect(),
			..ResultSet::default()
		}
	}

	fn merged(sets: impl IntoIterator<Item = ResultSet>) -> MergedResult {
		let mut merged = MergedResult::new();
		for set in sets {
			merged.absorb(set).expect("Unable to absorb");
		}
		merged
	}

	#[test]
	fn additive_lists_sum_elementwise() {
		let merged = merged([
			set([("dram.reads", Value::List(vec![100.0]))]),
			set([("dram.reads", Value::List(vec![150.0]))]),
		]);

		assert_eq!(merged.results.get("dram.reads"), Some(&Value::List(vec![250.0])));
		assert_eq!(merged.intervals, 2);
	}

	#[test]
	fn copy_as_is_keeps_latest() {
		let merged = merged([
			set([("ncores", Value::Scalar(4.0))]),
			set([("ncores", Value::Scalar(4.0))]),
		]);
		assert_eq!(merged.results.get("ncores"), Some(&Value::Scalar(4.0)));

		// Frequencies change between intervals under DVFS
		let merged = self::merged([
			set([("corefreq", Value::List(vec![2.0, 2.0]))]),
			set([("corefreq", Value::List(vec![3.0, 1.5]))]),
		]);
		assert_eq!(merged.results.get("corefreq"), Some(&Value::List(vec![3.0, 1.5])));
	}

	#[test]
	fn assert_zero_keeps_latest() {
		let merged = merged([
			set([("global.time_begin", Value::Scalar(0.0))]),
			set([("global.time_begin", Value::Scalar(7.0))]),
		]);

		assert_eq!(merged.results.get("global.time_begin"), Some(&Value::Scalar(7.0)));
	}

	#[test]
	fn kind_mismatch_is_fatal() {
		let mut merged = merged([set([("L1-D.loads", Value::List(vec![1.0, 2.0]))])]);
		let err = merged
			.absorb(set([("L1-D.loads", Value::Scalar(3.0))]))
			.expect_err("Mismatched kinds merged");

		assert!(format!("{err:#}").contains("L1-D.loads"));
	}

	#[test]
	fn unequal_lists_truncate() {
		let merged = merged([
			set([("L2.loads", Value::List(vec![1.0, 2.0, 3.0]))]),
			set([("L2.loads", Value::List(vec![10.0, 20.0]))]),
		]);

		assert_eq!(merged.results.get("L2.loads"), Some(&Value::List(vec![11.0, 22.0])));
	}

	#[test]
	fn merge_is_associative() {
		let intervals = [
			set([
				("dram.reads", Value::List(vec![100.0, 5.0])),
				("global.time", Value::Scalar(1000.0)),
				("ncores", Value::Scalar(2.0)),
			]),
			set([
				("dram.reads", Value::List(vec![150.0, 7.0])),
				("global.time", Value::Scalar(2000.0)),
				("L1-D.loads", Value::List(vec![3.0, 4.0])),
			]),
			set([
				("dram.reads", Value::List(vec![1.0, 2.0])),
				("global.time", Value::Scalar(500.0)),
				("ncores", Value::Scalar(2.0)),
			]),
			set([("L1-D.loads", Value::List(vec![30.0, 40.0]))]),
		];

		let expected = merged(intervals.clone());
		for split in 0..=intervals.len() {
			let (lhs, rhs) = intervals.split_at(split);
			let mut lhs = merged(lhs.to_vec());
			lhs.merge(merged(rhs.to_vec())).expect("Unable to merge");
			assert_eq!(lhs, expected, "Split at {split} differed");
		}
	}

	#[test]
	fn empty_interval_keeps_config() {
		let mut first = set([("ncores", Value::Scalar(1.0))]);
		first.config.set("general/total_cores", "1");

		let merged = merged([first, ResultSet::default()]);
		assert_eq!(merged.config.resolve("general/total_cores", None).ok(), Some("1"));
		assert_eq!(merged.intervals, 2);
	}

	#[test]
	fn stats_accessors() {
		let stats = set([
			("global.time", Value::Scalar(5.0)),
			("L1-D.loads", Value::List(vec![1.0, 2.0])),
		])
		.results;

		assert_eq!(stats.scalar("global.time").ok(), Some(5.0));
		assert_eq!(stats.at("L1-D.loads", 1).ok(), Some(2.0));
		assert!(stats.at("L1-D.loads", 2).is_err());
		assert_eq!(stats.at_or_zero("L1-D.pic_ops_copy", 0).ok(), Some(0.0));
		assert!(stats.list("global.time").is_err());
	}
}
