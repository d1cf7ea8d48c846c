//! Cache hierarchy

// Imports
use {
	crate::{
		config::Config,
		options::Options,
		stats::{Stats, TopologyEntry, Value},
	},
	anyhow::Context,
	std::{fmt, ops::Range},
};

/// Shared cache level
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum CacheLevel {
	L2,
	L3,
}

impl CacheLevel {
	/// Returns the level number
	pub fn number(self) -> usize {
		match self {
			Self::L2 => 2,
			Self::L3 => 3,
		}
	}

	/// Returns the label of this level in statistics and estimator reports
	pub fn label(self) -> &'static str {
		match self {
			Self::L2 => "L2",
			Self::L3 => "L3",
		}
	}

	/// Returns the configuration prefix of this level
	pub fn config_prefix(self) -> &'static str {
		match self {
			Self::L2 => "perf_model/l2_cache",
			Self::L3 => "perf_model/l3_cache",
		}
	}
}

impl fmt::Display for CacheLevel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.label())
	}
}

/// Cache hierarchy
#[derive(PartialEq, Eq, Clone, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct CacheHierarchy {
	pub ncores:          usize,
	pub technology_node: u32,
	pub num_l2s:         usize,
	pub private_l2s:     bool,
	pub l2_shared_cores: usize,
	pub num_l3s:         usize,
	pub l3_shared_cores: usize,

	/// Level the NUCA slices are mapped onto
	pub nuca_level: Option<CacheLevel>,
}

impl CacheHierarchy {
	/// Default technology node, in nm
	pub const DEFAULT_TECHNOLOGY_NODE: u32 = 45;

	/// Derives the hierarchy from the configuration and topology
	pub fn from_config(config: &Config, topology: &[TopologyEntry]) -> Result<Self, anyhow::Error> {
		let ncores = config.resolve_parse::<usize>("general/total_cores", None)?;
		let technology_node =
			config.resolve_parse_or("power/technology_node", None, Self::DEFAULT_TECHNOLOGY_NODE)?;
		let mut l2_shared_cores = config.resolve_parse_or("perf_model/l2_cache/shared_cores", None, 0)?;
		let mut l3_shared_cores = config.resolve_parse_or("perf_model/l3_cache/shared_cores", None, 0)?;

		// Note: An L2 with zero access time is only there to interface with the NoC
		let (mut num_l2s, private_l2s) =
			match config.resolve_parse_or::<u64>("perf_model/l2_cache/data_access_time", None, 0)? > 0 {
				true => (
					self::banks(ncores, l2_shared_cores).context("Unable to get number of L2 banks")?,
					config.resolve_parse::<usize>("perf_model/l2_cache/shared_cores", None)? == 1,
				),
				false => (0, true),
			};

		let levels = config.resolve_parse::<usize>("perf_model/cache/levels", None)?;
		let nuca_enabled = config.resolve_or("perf_model/nuca/enabled", None, "false") == "true";
		let mut nuca_level = None;
		let num_l3s = match (levels >= 3, nuca_enabled) {
			(true, nuca_enabled) => {
				if nuca_enabled {
					tracing::warn!("L3 configured, NUCA power will be ignored");
				}
				self::banks(ncores, l3_shared_cores).context("Unable to get number of L3 banks")?
			},
			(false, true) => {
				let (num_nucas, nuca_shared_cores) = self::nuca_slices(config, topology, ncores)?;
				match num_l2s {
					0 => {
						num_l2s = num_nucas;
						l2_shared_cores = nuca_shared_cores;
						nuca_level = Some(CacheLevel::L2);
						0
					},
					_ => {
						l3_shared_cores = nuca_shared_cores;
						nuca_level = Some(CacheLevel::L3);
						num_nucas
					},
				}
			},
			(false, false) => 0,
		};

		Ok(Self {
			ncores,
			technology_node,
			num_l2s,
			private_l2s,
			l2_shared_cores,
			num_l3s,
			l3_shared_cores,
			nuca_level,
		})
	}

	/// Returns the cores sharing L2 bank `bank`
	pub fn l2_cores(&self, bank: usize) -> Range<usize> {
		self::bank_cores(self.ncores, self.l2_shared_cores, bank)
	}

	/// Returns the cores sharing L3 bank `bank`
	pub fn l3_cores(&self, bank: usize) -> Range<usize> {
		self::bank_cores(self.ncores, self.l3_shared_cores, bank)
	}

	/// Copies the NUCA configuration and statistics onto the level NUCA is mapped onto.
	///
	/// Does nothing if NUCA isn't mapped.
	pub fn remap_nuca(&self, config: &mut Config, stats: &mut Stats, options: &Options) -> Result<(), anyhow::Error> {
		let Some(level) = self.nuca_level else {
			return Ok(());
		};
		tracing::debug!(%level, "Mapping NUCA onto cache level");

		// Configuration
		let prefix = level.config_prefix();
		for (key, source) in [
			("data_access_time", "perf_model/nuca/data_access_time"),
			("associativity", "perf_model/nuca/associativity"),
			("cache_block_size", "perf_model/l2_cache/cache_block_size"),
			("cache_size", "perf_model/nuca/cache_size"),
		] {
			let value = config.resolve(source, None)?.to_owned();
			config.set(format!("{prefix}/{key}"), value);
		}
		config.set(format!("{prefix}/writeback_time"), "0");
		config.set(format!("{prefix}/dvfs_domain"), "global");

		// Statistics
		let label = level.label();
		let mut loads = stats.require("nuca-cache.reads")?.clone();
		if options.add_implicit_accesses {
			// Note: Dirty evictions cause a read
			loads = loads.zip_with(stats.require("nuca-cache.dirty_evicts")?, |lhs, rhs| lhs + rhs)?;
		}
		stats.insert(format!("{label}.loads"), loads);
		for (stat, source) in [
			("stores", "nuca-cache.writes"),
			("load-misses", "nuca-cache.read-misses"),
			("store-misses", "nuca-cache.write-misses"),
		] {
			let value = stats.require(source)?.clone();
			stats.insert(format!("{label}.{stat}"), value);
		}

		if stats.contains("nuca-cache.pic_ops_copy") {
			let copy = stats.require("nuca-cache.pic_ops_copy")?.clone();
			let cmp = stats
				.require("nuca-cache.pic_ops_cmp")?
				.zip_with(stats.require("nuca-cache.pic_ops_search")?, |lhs, rhs| lhs + rhs)?;
			let key_writes = stats.require("nuca-cache.pic_key_writes")?.clone();

			let in_bank = |value: &Value| match options.in_bank_fraction {
				Some(fraction) => value.map(|value| value * fraction),
				None => value.clone(),
			};
			let policy = options.bank_map_policy.suffix();
			stats.insert(format!("{label}.pic_ops_in_bank_copy_{policy}"), in_bank(&copy));
			stats.insert(format!("{label}.pic_ops_in_bank_cmp_{policy}"), in_bank(&cmp));
			stats.insert(format!("{label}.pic_ops_copy"), copy);
			stats.insert(format!("{label}.pic_ops_cmp"), cmp);
			stats.insert(format!("{label}.pic_key_writes"), key_writes);
		}

		Ok(())
	}
}

/// Returns the number of banks shared by `shared_cores` cores each
fn banks(ncores: usize, shared_cores: usize) -> Result<usize, anyhow::Error> {
	anyhow::ensure!(shared_cores > 0, "Number of shared cores must be positive");
	Ok(ncores.div_ceil(shared_cores))
}

/// Returns the cores of bank `bank`
fn bank_cores(ncores: usize, shared_cores: usize, bank: usize) -> Range<usize> {
	let start = shared_cores * bank;
	start.min(ncores)..(start + shared_cores).min(ncores)
}

/// Returns the number of NUCA slices, and the cores sharing each
fn nuca_slices(config: &Config, topology: &[TopologyEntry], ncores: usize) -> Result<(usize, usize), anyhow::Error> {
	let locations = config.resolve("perf_model/dram_directory/locations", None)?;
	if locations == "interleaved" {
		let shared_cores = config.resolve_parse::<usize>("perf_model/dram_directory/interleaving", None)?;
		let num_slices = self::banks(ncores, shared_cores).context("Unable to get number of NUCA slices")?;
		return Ok((num_slices, shared_cores));
	}

	// Note: Only slices at a regular interleaving are supported
	let slice_locations = topology
		.iter()
		.filter(|entry| entry.name == "nuca-cache")
		.map(|entry| entry.location)
		.collect::<Vec<_>>();
	anyhow::ensure!(!slice_locations.is_empty(), "No NUCA slices found in topology");
	let num_slices = slice_locations.len();
	let shared_cores = ncores / num_slices;
	let is_regular = slice_locations
		.iter()
		.enumerate()
		.all(|(idx, &location)| location == idx * shared_cores);
	anyhow::ensure!(is_regular, "Unsupported tag directory locations {locations:?}");

	Ok((num_slices, shared_cores))
}

#[cfg(test)]
mod tests {
	use {super::*, crate::options::BankMapPolicy};

	fn config(values: &[(&str, &str)]) -> Config {
		let mut config = Config::new();
		config.set("general/total_cores", "4");
		config.set("perf_model/cache/levels", "2");
		for &(key, value) in values {
			config.set(key, value);
		}
		config
	}

	#[test]
	fn shared_l2() {
		let config = config(&[
			("perf_model/l2_cache/data_access_time", "8"),
			("perf_model/l2_cache/shared_cores", "3"),
		]);
		let hierarchy = CacheHierarchy::from_config(&config, &[]).expect("Unable to derive hierarchy");

		assert_eq!(hierarchy.num_l2s, 2);
		assert!(!hierarchy.private_l2s);
		assert_eq!(hierarchy.l2_cores(0), 0..3);
		assert_eq!(hierarchy.l2_cores(1), 3..4);
		assert_eq!(hierarchy.num_l3s, 0);
		assert_eq!(hierarchy.technology_node, 45);
		assert_eq!(hierarchy.nuca_level, None);
	}

	#[test]
	fn zero_shared_cores() {
		let config = config(&[
			("perf_model/cache/levels", "3"),
			("perf_model/l3_cache/shared_cores", "0"),
		]);
		assert!(CacheHierarchy::from_config(&config, &[]).is_err());
	}

	#[test]
	fn nuca_from_topology() {
		let config = config(&[
			("perf_model/nuca/enabled", "true"),
			("perf_model/dram_directory/locations", "dram"),
		]);
		let slice = |location| TopologyEntry {
			name: "nuca-cache".to_owned(),
			location,
			memory: location,
		};

		let hierarchy =
			CacheHierarchy::from_config(&config, &[slice(0), slice(2)]).expect("Unable to derive hierarchy");
		assert_eq!(hierarchy.nuca_level, Some(CacheLevel::L2));
		assert_eq!(hierarchy.num_l2s, 2);
		assert_eq!(hierarchy.l2_shared_cores, 2);

		assert!(CacheHierarchy::from_config(&config, &[slice(0), slice(1)]).is_err());
	}

	#[test]
	fn remap_nuca_onto_l3() {
		let mut config = config(&[
			("perf_model/l2_cache/data_access_time", "8"),
			("perf_model/l2_cache/shared_cores", "1"),
			("perf_model/l2_cache/cache_block_size", "64"),
			("perf_model/nuca/enabled", "true"),
			("perf_model/nuca/data_access_time", "20"),
			("perf_model/nuca/associativity", "16"),
			("perf_model/nuca/cache_size", "1024"),
			("perf_model/dram_directory/locations", "interleaved"),
			("perf_model/dram_directory/interleaving", "4"),
		]);
		let hierarchy = CacheHierarchy::from_config(&config, &[]).expect("Unable to derive hierarchy");
		assert_eq!(hierarchy.nuca_level, Some(CacheLevel::L3));
		assert_eq!(hierarchy.num_l3s, 1);
		assert_eq!(hierarchy.num_l2s, 4);

		let mut stats = Stats::new();
		for (name, values) in [
			("nuca-cache.reads", vec![10.0]),
			("nuca-cache.dirty_evicts", vec![2.0]),
			("nuca-cache.writes", vec![5.0]),
			("nuca-cache.read-misses", vec![1.0]),
			("nuca-cache.write-misses", vec![0.0]),
			("nuca-cache.pic_ops_copy", vec![4.0]),
			("nuca-cache.pic_ops_cmp", vec![3.0]),
			("nuca-cache.pic_ops_search", vec![1.0]),
			("nuca-cache.pic_key_writes", vec![6.0]),
		] {
			stats.insert(name, Value::List(values));
		}
		let options = Options {
			add_implicit_accesses: true,
			in_bank_fraction: Some(0.5),
			bank_map_policy: BankMapPolicy::MoreSets,
			..Options::default()
		};

		hierarchy
			.remap_nuca(&mut config, &mut stats, &options)
			.expect("Unable to remap NUCA");
		assert_eq!(config.resolve("perf_model/l3_cache/cache_size", None).ok(), Some("1024"));
		assert_eq!(config.resolve("perf_model/l3_cache/dvfs_domain", None).ok(), Some("global"));
		assert_eq!(stats.get("L3.loads"), Some(&Value::List(vec![12.0])));
		assert_eq!(stats.get("L3.pic_ops_cmp"), Some(&Value::List(vec![4.0])));
		assert_eq!(stats.get("L3.pic_ops_in_bank_copy_more_sets"), Some(&Value::List(vec![2.0])));
		assert_eq!(stats.get("L3.pic_ops_in_bank_cmp_more_sets"), Some(&Value::List(vec![2.0])));
	}
}
