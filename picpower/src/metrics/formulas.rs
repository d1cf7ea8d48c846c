//! Formulas

// Imports
use {
	super::{MetricCalculator, Registry},
	crate::{config::fields, template::Scope},
	anyhow::Context,
	std::ops::Range,
};

/// Registers the processing-in-cache formulas of a cache under `$name`
macro_rules! register_pic {
	($registry:expr, $name:literal, $cache:expr) => {
		$registry.stat(concat!($name, ".pic_copy_ops"), |calc, scope| $cache.copy_ops(calc, scope));
		$registry.stat(concat!($name, ".pic_copy_ops_in_bank"), |calc, scope| $cache.copy_ops_in_bank(calc, scope));
		$registry.stat(concat!($name, ".pic_copy_tag_access"), |calc, scope| $cache.copy_tag_access(calc, scope));
		$registry.stat(concat!($name, ".pic_copy_read_miss"), |calc, scope| $cache.copy_read_miss(calc, scope));
		$registry.stat(concat!($name, ".pic_copy_write_miss"), |calc, scope| $cache.copy_write_miss(calc, scope));
		$registry.stat(concat!($name, ".pic_cmp_ops"), |calc, scope| $cache.cmp_ops(calc, scope));
		$registry.stat(concat!($name, ".pic_cmp_ops_in_bank"), |calc, scope| $cache.cmp_ops_in_bank(calc, scope));
		$registry.stat(concat!($name, ".pic_cmp_tag_access"), |calc, scope| $cache.cmp_tag_access(calc, scope));
		$registry.stat(concat!($name, ".pic_cmp_read_miss"), |calc, scope| $cache.cmp_read_miss(calc, scope));
		$registry.stat(concat!($name, ".pic_cmp_write_miss"), |calc, scope| $cache.cmp_write_miss(calc, scope));
		$registry.stat(concat!($name, ".pic_key_writes"), |calc, scope| $cache.key_writes(calc, scope));
	};
}

/// Registers all formulas onto `registry`
pub fn register(registry: &mut Registry) {
	self::register_system(registry);
	self::register_pipeline(registry);
	self::register_duty_cycles(registry);
	self::register_l1(registry);
	self::register_directories(registry);
	self::register_l2(registry);
	self::register_l3(registry);
	self::register_network(registry);
	self::register_memory(registry);
	self::register_structures(registry);

	register_pic!(registry, "dcache", PicCache::L1D);
	register_pic!(registry, "L2", PicCache::L2);
	register_pic!(registry, "L3", PicCache::L3);
}

fn register_system(registry: &mut Registry) {
	registry.stat("total_system_cycles", |calc, _| Ok(calc.max_system_cycles().trunc()));
	registry.stat("total_system_idle_cycles", |_, _| Ok(0.0));
	registry.stat("total_system_busy_cycles", |calc, _| Ok(calc.max_system_cycles().trunc()));
}

fn register_pipeline(registry: &mut Registry) {
	registry.stat("total_cycles", |calc, scope| Ok(calc.counters(scope)?.cycles));
	registry.stat("idle_cycles", |calc, scope| Ok(calc.counters(scope)?.idle_cycles));
	registry.stat("busy_cycles", |calc, scope| {
		let core = calc.counters(scope)?;
		Ok(core.cycles - core.idle_cycles)
	});

	registry.stat("total_instructions", |calc, scope| Ok(calc.counters(scope)?.instructions));
	registry.stat("committed_ins", |calc, scope| Ok(calc.counters(scope)?.instructions.trunc()));
	registry.stat("committed_int", |calc, scope| Ok(calc.counters(scope)?.instructions * 0.5));
	registry.stat("committed_fp", |calc, scope| Ok(calc.counters(scope)?.instructions * 0.5));
	registry.stat("integer_ins", |calc, scope| {
		let core = calc.counters(scope)?;
		Ok(core.instructions.trunc() - core.fp_instructions.trunc() - core.branch_instructions.trunc())
	});
	registry.stat("fp_ins", |calc, scope| Ok(calc.counters(scope)?.fp_instructions.trunc()));
	registry.stat("branch_ins", |calc, scope| Ok(calc.counters(scope)?.branch_instructions.trunc()));
	registry.stat("branch_mis", |calc, scope| {
		calc.stats().at_or_zero("branch_predictor.num-incorrect", calc.core(scope)?)
	});
	registry.stat("function_calls", |calc, scope| Ok(calc.counters(scope)?.instructions * 0.05));

	registry.stat("loads", |calc, scope| {
		let (stats, core) = (calc.stats(), calc.core(scope)?);
		Ok(stats.at("L1-D.loads", core)?.trunc() +
			stats.at_or_zero("L1-D.pic_vops_cmp", core)?.trunc() +
			stats.at_or_zero("L1-D.pic_vops_search", core)?.trunc())
	});
	registry.stat("stores", |calc, scope| {
		let (stats, core) = (calc.stats(), calc.core(scope)?);
		Ok(stats.at("L1-D.stores", core)?.trunc() + stats.at_or_zero("L1-D.pic_vops_copy", core)?.trunc())
	});

	registry.stat("BTB.read_accesses", |calc, scope| Ok(calc.counters(scope)?.branch_instructions.trunc()));
	registry.stat("RAT_rename.reads", |calc, scope| Ok(2.0 * calc.counters(scope)?.instructions));
	registry.stat("RAT_rename.writes", |calc, scope| Ok(calc.counters(scope)?.instructions));
	registry.stat("RAT_fp_rename.reads", |calc, scope| Ok(2.0 * calc.counters(scope)?.fp_instructions.trunc()));
	registry.stat("RAT_fp_rename.writes", |calc, scope| Ok(calc.counters(scope)?.fp_instructions.trunc()));
	registry.stat("ROB_reads", |calc, scope| Ok(calc.counters(scope)?.instructions));
	registry.stat("ROB_writes", |calc, scope| Ok(calc.counters(scope)?.instructions));

	// Instruction window
	registry.stat("instr.reads", |calc, scope| Ok(calc.counters(scope)?.instructions));
	registry.stat("instr.writes", |calc, scope| Ok(calc.counters(scope)?.instructions));
	registry.stat("instr.wakeup", |calc, scope| Ok(calc.counters(scope)?.instructions * 2.0));
	registry.stat("instr.fp.reads", |calc, scope| Ok(calc.counters(scope)?.fp_instructions.trunc() * 0.5));
	registry.stat("instr.fp.writes", |calc, scope| Ok(calc.counters(scope)?.fp_instructions.trunc() * 0.5));
	registry.stat("instr.fp.wakeup", |calc, scope| Ok(calc.counters(scope)?.fp_instructions.trunc() * 0.5));

	registry.stat("window_switches.ialu_accesses", |calc, scope| Ok(calc.counters(scope)?.ialu_accesses));
	registry.stat("window_switches.fpu_accesses", |calc, scope| Ok(calc.counters(scope)?.fp_instructions));
	registry.stat("window_switches.mul_accesses", |calc, scope| Ok(calc.counters(scope)?.fp_muldiv));
	registry.stat("window_switches.cdb_alu_accesses", |calc, scope| Ok(calc.counters(scope)?.ialu_accesses));
	registry.stat("window_switches.cdb_fpu_accesses", |calc, scope| Ok(calc.counters(scope)?.fp_instructions));
	registry.stat("window_switches.cdb_mul_accesses", |calc, scope| Ok(calc.counters(scope)?.fp_muldiv));

	// Register files
	registry.stat("RF_accesses.int_regfile_reads", |calc, scope| Ok(calc.counters(scope)?.instructions * 1.5));
	registry.stat("RF_accesses.int_regfile_writes", |calc, scope| Ok(calc.counters(scope)?.instructions * 0.75));
	registry.stat("RF_accesses.fp_regfile_reads", |calc, scope| {
		Ok(calc.counters(scope)?.fp_instructions.trunc() * 0.25)
	});
	registry.stat("RF_accesses.fp_regfile_writes", |calc, scope| {
		Ok(calc.counters(scope)?.fp_instructions.trunc() * 0.125)
	});
}

fn register_duty_cycles(registry: &mut Registry) {
	registry.stat("IFU.duty_cycle", |calc, scope| Ok(calc.duty_cycle(calc.counters(scope)?.instructions)));
	registry.stat("LSU.duty_cycle", |calc, scope| Ok(calc.duty_cycle(self::accesses(calc, "L1-D", scope)?)));
	registry.stat("MemManU.D.duty_cycle", |calc, scope| Ok(calc.duty_cycle(self::accesses(calc, "L1-D", scope)?)));
	registry.stat("MemManU.I.duty_cycle", |calc, scope| Ok(calc.duty_cycle(self::accesses(calc, "L1-I", scope)?)));
	registry.stat("FPU.duty_cycle", |calc, scope| Ok(calc.duty_cycle(calc.counters(scope)?.fp_instructions.trunc())));
	registry.stat("MUL.duty_cycle", |calc, scope| Ok(calc.duty_cycle(calc.counters(scope)?.fp_muldiv)));
	registry.stat("ALU.duty_cycle", |calc, scope| {
		let core = calc.counters(scope)?;
		let alus = fields::peak_issue_width(calc.config(), scope.core())?;
		anyhow::ensure!(alus > 0.0, "Core has no ALUs");
		Ok(((core.instructions - core.fp_instructions) / (calc.max_system_cycles() * alus)).min(1.0))
	});
}

/// Returns the truncated loads plus stores of cache `cache`
fn accesses(calc: &MetricCalculator<'_>, cache: &str, scope: Scope) -> Result<f64, anyhow::Error> {
	let (stats, core) = (calc.stats(), calc.core(scope)?);
	Ok(stats.at(&format!("{cache}.loads"), core)?.trunc() + stats.at(&format!("{cache}.stores"), core)?.trunc())
}

fn register_l1(registry: &mut Registry) {
	registry.stat("itlb_total_accesses", |calc, scope| Ok(calc.counters(scope)?.instructions * 0.5));
	registry.stat("itlb_misses", |calc, scope| Ok(calc.counters(scope)?.instructions * (0.5 * 0.5 / 10000.0)));

	// Note: The instruction TLB is accessed exactly as often as the instruction cache
	registry.stat("itlb.total_accesses", |calc, scope| {
		let (stats, core) = (calc.stats(), calc.core(scope)?);
		Ok(stats.at("L1-I.loads", core)? + stats.at("L1-I.stores", core)?)
	});
	registry.stat("itlb.total_misses", |calc, scope| {
		let (stats, core) = (calc.stats(), calc.core(scope)?);
		Ok(stats.at("L1-I.load-misses", core)? + stats.at("L1-I.store-misses", core)?)
	});
	registry.stat("icache.read_accesses", |calc, scope| calc.stats().at("L1-I.loads", calc.core(scope)?));
	registry.stat("icache.read_misses", |calc, scope| calc.stats().at("L1-I.load-misses", calc.core(scope)?));

	registry.stat("dtlb.total_accesses", |calc, scope| calc.stats().at("dtlb.access", calc.core(scope)?));
	registry.stat("dtlb.total_misses", |calc, scope| calc.stats().at("dtlb.miss", calc.core(scope)?));

	registry.stat("dcache.read_accesses", |calc, scope| {
		let (stats, core) = (calc.stats(), calc.core(scope)?);
		let mut accesses = stats.at("L1-D.loads", core)?.trunc();
		if calc.options().add_implicit_accesses {
			accesses += stats.at("L1-D.dirty_evicts", core)?.trunc() + stats.at("L1-D.dirty_backinval", core)?.trunc();
		}
		Ok(accesses)
	});
	registry.stat("dcache.write_accesses", |calc, scope| {
		let (stats, core) = (calc.stats(), calc.core(scope)?);
		let mut accesses = stats.at("L1-D.stores", core)?.trunc();
		if calc.options().add_implicit_accesses {
			accesses += stats.at("L1-D.load-misses", core)?.trunc();
		}
		Ok(accesses)
	});
	registry.stat("dcache.read_misses", |calc, scope| calc.stats().at("L1-D.load-misses", calc.core(scope)?));
	registry.stat("dcache.write_misses", |calc, scope| calc.stats().at("L1-D.store-misses", calc.core(scope)?));
}

/// Directories aren't simulated, so their activity is estimated from the instruction count
fn register_directories(registry: &mut Registry) {
	registry.stat("L1_directory.read_accesses", |calc, scope| Ok(calc.counters(scope)?.instructions * 2.0));
	registry.stat("L1_directory.write_accesses", |calc, scope| Ok(calc.counters(scope)?.instructions * 0.06667));
	registry.stat("L1_directory.read_misses", |calc, scope| Ok(calc.counters(scope)?.instructions * 0.00408));
	registry.stat("L1_directory.write_misses", |calc, scope| Ok(calc.counters(scope)?.instructions * 0.00005));
	registry.stat("L1_directory.conflicts", |calc, scope| Ok(calc.counters(scope)?.instructions * 0.00005));

	registry.stat("L2_directory.read_accesses", |calc, scope| Ok(calc.counters(scope)?.instructions * 0.125));
	registry.stat("L2_directory.write_accesses", |calc, scope| Ok(calc.counters(scope)?.instructions * 0.0625));
	registry.stat("L2_directory.read_misses", |calc, scope| Ok(calc.counters(scope)?.instructions * 0.004));
	registry.stat("L2_directory.write_misses", |calc, scope| Ok(calc.counters(scope)?.instructions * 0.0004));
	registry.stat("L2_directory.conflicts", |calc, scope| Ok(calc.counters(scope)?.instructions * 0.00025));
}

fn register_l2(registry: &mut Registry) {
	registry.stat("L2.read_accesses", |calc, scope| {
		let cores = calc.l2_cores(scope)?;
		let mut accesses = calc.sum_over("L2.loads", cores.clone())?;
		if calc.options().add_implicit_accesses {
			accesses += calc.sum_over("L2.dirty_evicts", cores.clone())? + calc.sum_over("L2.dirty_backinval", cores)?;
		}
		Ok(accesses)
	});
	registry.stat("L2.write_accesses", |calc, scope| {
		let cores = calc.l2_cores(scope)?;
		let mut accesses = calc.sum_over("L2.stores", cores.clone())?;
		if calc.options().add_implicit_accesses {
			accesses += calc.sum_over("L2.load-misses", cores.clone())? + calc.sum_over("L2.writebacks", cores)?;
		}
		Ok(accesses)
	});
	registry.stat("L2.read_misses", |calc, scope| calc.sum_over("L2.load-misses", calc.l2_cores(scope)?));
	registry.stat("L2.write_misses", |calc, scope| calc.sum_over("L2.store-misses", calc.l2_cores(scope)?));
	registry.stat("L2_duty_cycle", |calc, scope| {
		let cores = calc.l2_cores(scope)?;
		let accesses = calc.sum_over("L2.loads", cores.clone())? + calc.sum_over("L2.stores", cores)?;
		Ok(calc.duty_cycle(accesses))
	});
}

fn register_l3(registry: &mut Registry) {
	registry.stat("L3.read_accesses", |calc, scope| calc.sum_over_or_zero("L3.loads", calc.l3_cores(scope)?));
	registry.stat("L3.write_accesses", |calc, scope| calc.sum_over_or_zero("L3.stores", calc.l3_cores(scope)?));
	registry.stat("L3.read_misses", |calc, scope| calc.sum_over_or_zero("L3.load-misses", calc.l3_cores(scope)?));
	registry.stat("L3.write_misses", |calc, scope| calc.sum_over_or_zero("L3.store-misses", calc.l3_cores(scope)?));
	registry.stat("L3_duty_cycle", |calc, scope| {
		if !calc.stats().contains("L3.loads") {
			return Ok(0.0);
		}

		let cores = calc.l3_cores(scope)?;
		let accesses = calc.sum_over("L3.loads", cores.clone())? + calc.sum_over("L3.stores", cores)?;
		Ok(calc.duty_cycle(accesses))
	});
}

/// Mesh link directions
const MESH_DIRECTIONS: [&str; 4] = ["up", "down", "left", "right"];

fn register_network(registry: &mut Registry) {
	// `1` for a mesh, `0` for a bus
	registry.stat("NoC.type", |calc, _| {
		let stats = calc.stats();
		let is_mesh = stats.contains("network.shmem-1.mesh.link-in.num-requests") ||
			stats.contains("network.shmem-1.mesh.packets-in");
		Ok(f64::from(u8::from(is_mesh)))
	});

	registry.stat("NoC.total_accesses", |calc, _| {
		let stats = calc.stats();
		if stats.contains("network.shmem-1.mesh.link-in.num-requests") {
			return MESH_DIRECTIONS
				.iter()
				.map(|direction| -> Result<f64, anyhow::Error> {
					let requests = stats.require(&format!("network.shmem-1.mesh.link-{direction}.num-requests"))?;
					Ok(requests.sum())
				})
				.sum();
		}
		if stats.contains("network.shmem-1.mesh.packets-in") {
			return Ok(stats.require("network.shmem-1.mesh.packets-in")?.sum());
		}

		let bus_requests = ["network.shmem-1.bus.num-requests", "network.shmem-1.bus.num-packets"]
			.into_iter()
			.find(|name| stats.contains(name))
			.unwrap_or("bus.num-requests");
		Ok(stats.at(bus_requests, 0)?.trunc())
	});

	registry.stat("NoC.duty_cycle", |calc, _| {
		let stats = calc.stats();
		if stats.contains("network.shmem-1.mesh.link-left.total-time-used") {
			let mut total_time_used = 0.0;
			let mut links_used = 0_usize;
			for direction in MESH_DIRECTIONS {
				total_time_used += stats
					.require(&format!("network.shmem-1.mesh.link-{direction}.total-time-used"))?
					.sum();
				links_used += stats
					.list(&format!("network.shmem-1.mesh.link-{direction}.num-requests"))?
					.iter()
					.filter(|&&requests| requests > 0.0)
					.count();
			}

			// Note: Links at the mesh boundary don't exist, so we only average over the links that saw any traffic
			let avg_time_used = total_time_used / links_used.max(1) as f64;
			let elapsed_time = match stats.at("performance_model.elapsed_time_end", 0)? {
				time if time == 0.0 => 1.0,
				time => time,
			};
			return Ok(avg_time_used / elapsed_time);
		}

		// Mesh without link accounting
		if stats.contains("network.shmem-1.mesh.packets-in") {
			return Ok(0.5);
		}

		let time_used = match stats.contains("network.shmem-1.bus.time-used") {
			true => stats.at("network.shmem-1.bus.time-used", 0)?,
			false => stats.at("bus.time-used", 0)?,
		};
		let cycles_scale = calc
			.cores()
			.last()
			.map(|core| core.cycles_scale)
			.context("System has no cores")?;
		Ok(calc.duty_cycle(cycles_scale * time_used))
	});
}

fn register_memory(registry: &mut Registry) {
	registry.stat("memory.reads", |calc, _| Ok(calc.stats().at("dram.reads", 0)?.trunc()));
	registry.stat("memory.writes", |calc, _| Ok(calc.stats().at("dram.writes", 0)?.trunc()));
	registry.stat("memory.accesses", |calc, _| {
		let stats = calc.stats();
		Ok(stats.at("dram.reads", 0)?.trunc() + stats.at("dram.writes", 0)?.trunc())
	});
}

/// Cache geometry
#[derive(Clone, Copy, Debug)]
struct Geometry {
	size_kib:      u64,
	block_size:    u64,
	associativity: u64,
}

impl Geometry {
	/// Reads the geometry of cache `prefix`, with missing keys as `0`
	fn resolve(calc: &MetricCalculator<'_>, prefix: &str, core: usize) -> Result<Self, anyhow::Error> {
		let config = calc.config();
		let get = |key: &str| config.resolve_parse_or::<u64>(&format!("{prefix}/{key}"), Some(core), 0);
		Ok(Self {
			size_kib:      get("cache_size")?,
			block_size:    get("cache_block_size")?,
			associativity: get("associativity")?,
		})
	}
}

fn register_structures(registry: &mut Registry) {
	// size, block size, associativity, banks, throughput, latency, unused, write-back
	registry.comb("icache_cfg", |calc, scope| {
		let core = calc.core(scope)?;
		let geometry = Geometry::resolve(calc, "perf_model/l1_icache", core)?;
		let latency = calc
			.config()
			.resolve_parse::<u64>("perf_model/l1_icache/data_access_time", Some(core))?;
		let associativity = calc.round_up_pow2(geometry.associativity);
		Ok(self::tuple([
			geometry.size_kib * 1024,
			geometry.block_size,
			associativity,
			1,
			1,
			latency,
			0,
			1,
		]))
	});

	// Note: The throughput and latency are relaxed, or the estimator over-sizes the cache trying to meet them
	registry.comb("dcache_cfg", |calc, scope| {
		let core = calc.core(scope)?;
		let geometry = Geometry::resolve(calc, "perf_model/l1_dcache", core)?;
		let latency = calc
			.config()
			.resolve_parse::<u64>("perf_model/l1_dcache/data_access_time", Some(core))?;
		let associativity = calc.round_up_pow2(geometry.associativity);
		Ok(self::tuple([
			geometry.size_kib * 1024,
			geometry.block_size,
			associativity,
			2,
			10,
			10 * latency,
			0,
			1,
		]))
	});

	registry.comb("L2_config", |calc, scope| {
		let core = calc.core(scope)?;
		let geometry = Geometry::resolve(calc, "perf_model/l2_cache", core)?;
		let latency = calc
			.config()
			.resolve_parse_or::<u64>("perf_model/l2_cache/data_access_time", Some(core), 0)?;
		let associativity = calc.round_up_pow2(geometry.associativity);
		Ok(self::tuple([
			geometry.size_kib * 1024,
			geometry.block_size,
			associativity,
			8,
			1,
			latency,
			0,
			1,
		]))
	});

	// Note: The L3 always uses 64-byte blocks and has no unused field
	registry.comb("L3_config", |calc, scope| {
		let core = calc.core(scope)?;
		let geometry = Geometry::resolve(calc, "perf_model/l3_cache", core)?;
		let latency = calc
			.config()
			.resolve_parse_or::<u64>("perf_model/l3_cache/data_access_time", Some(core), 0)?;
		let associativity = calc.round_up_pow2(geometry.associativity);
		Ok(self::tuple([geometry.size_kib * 1024, 64, associativity, 16, 16, latency, 1]))
	});
}

fn tuple<const N: usize>(values: [u64; N]) -> Vec<f64> {
	values.into_iter().map(|value| value as f64).collect()
}

/// Cores sharing a cache
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
enum Sharing {
	/// Private to each core
	Private,

	/// Shared like the L2 banks
	L2,

	/// Shared like the L3 banks
	L3,
}

/// Cache with processing-in-cache counters
#[derive(Clone, Copy, Debug)]
pub struct PicCache {
	/// Statistics prefix
	prefix: &'static str,

	/// Cores sharing each instance
	sharing: Sharing,

	/// Whether searches are counted as compares
	folds_search: bool,

	/// Whether the in-bank fraction overrides the in-bank counters
	uses_in_bank_fraction: bool,
}

impl PicCache {
	pub const L1D: Self = Self {
		prefix:                "L1-D",
		sharing:               Sharing::Private,
		folds_search:          true,
		uses_in_bank_fraction: true,
	};
	pub const L2: Self = Self {
		prefix:                "L2",
		sharing:               Sharing::L2,
		folds_search:          true,
		uses_in_bank_fraction: true,
	};
	// Note: The L3 never reported searches separately
	pub const L3: Self = Self {
		prefix:                "L3",
		sharing:               Sharing::L3,
		folds_search:          false,
		uses_in_bank_fraction: false,
	};

	/// Returns the cores whose counters make up `scope`
	fn cores(self, calc: &MetricCalculator<'_>, scope: Scope) -> Result<Range<usize>, anyhow::Error> {
		match self.sharing {
			Sharing::Private => calc.core(scope).map(|core| core..core + 1),
			Sharing::L2 => calc.l2_cores(scope),
			Sharing::L3 => calc.l3_cores(scope),
		}
	}

	/// Sums counter `name` over the cores of `scope`, or `0` if it doesn't exist
	fn counter(self, calc: &MetricCalculator<'_>, name: &str, scope: Scope) -> Result<f64, anyhow::Error> {
		calc.sum_over_or_zero(&format!("{}.{name}", self.prefix), self.cores(calc, scope)?)
	}

	/// Sums the `{name}_{kind}` counter, plus the search counter if searches are folded into compares
	fn compare_counter(self, calc: &MetricCalculator<'_>, name: &str, scope: Scope) -> Result<f64, anyhow::Error> {
		let mut value = self.counter(calc, &format!("{name}_cmp"), scope)?;
		if self.folds_search {
			value += self.counter(calc, &format!("{name}_search"), scope)?;
		}
		Ok(value.trunc())
	}

	fn in_bank_fraction(self, calc: &MetricCalculator<'_>) -> Option<f64> {
		match self.uses_in_bank_fraction {
			true => calc.options().in_bank_fraction,
			false => None,
		}
	}

	pub fn copy_ops(self, calc: &MetricCalculator<'_>, scope: Scope) -> Result<f64, anyhow::Error> {
		self.counter(calc, "pic_ops_copy", scope)
	}

	pub fn copy_ops_in_bank(self, calc: &MetricCalculator<'_>, scope: Scope) -> Result<f64, anyhow::Error> {
		match self.in_bank_fraction(calc) {
			Some(fraction) => Ok(fraction * self.counter(calc, "pic_ops_copy", scope)?),
			None => {
				let policy = calc.options().bank_map_policy;
				self.counter(calc, &format!("pic_ops_in_bank_copy_{policy}"), scope)
			},
		}
	}

	pub fn copy_tag_access(self, calc: &MetricCalculator<'_>, scope: Scope) -> Result<f64, anyhow::Error> {
		self.counter(calc, "pic_ops_tag_access_copy", scope)
	}

	pub fn copy_read_miss(self, calc: &MetricCalculator<'_>, scope: Scope) -> Result<f64, anyhow::Error> {
		self.counter(calc, "pic_ops_read_miss_copy", scope)
	}

	pub fn copy_write_miss(self, calc: &MetricCalculator<'_>, scope: Scope) -> Result<f64, anyhow::Error> {
		self.counter(calc, "pic_ops_write_miss_copy", scope)
	}

	pub fn cmp_ops(self, calc: &MetricCalculator<'_>, scope: Scope) -> Result<f64, anyhow::Error> {
		self.compare_counter(calc, "pic_ops", scope)
	}

	pub fn cmp_ops_in_bank(self, calc: &MetricCalculator<'_>, scope: Scope) -> Result<f64, anyhow::Error> {
		match self.in_bank_fraction(calc) {
			// Note: Searches are only counted when compares were reported
			Some(fraction) => {
				let compares = format!("{}.pic_ops_cmp", self.prefix);
				if !calc.stats().contains(&compares) {
					return Ok(0.0);
				}

				let cores = self.cores(calc, scope)?;
				let searches = format!("{}.pic_ops_search", self.prefix);
				let ops = calc.sum_over(&compares, cores.clone())? + calc.sum_over(&searches, cores)?;
				Ok((fraction * ops).trunc())
			},
			None => {
				let policy = calc.options().bank_map_policy;
				self.compare_counter(calc, &format!("pic_ops_in_bank_{policy}"), scope)
			},
		}
	}

	pub fn cmp_tag_access(self, calc: &MetricCalculator<'_>, scope: Scope) -> Result<f64, anyhow::Error> {
		self.compare_counter(calc, "pic_ops_tag_access", scope)
	}

	pub fn cmp_read_miss(self, calc: &MetricCalculator<'_>, scope: Scope) -> Result<f64, anyhow::Error> {
		self.compare_counter(calc, "pic_ops_read_miss", scope)
	}

	pub fn cmp_write_miss(self, calc: &MetricCalculator<'_>, scope: Scope) -> Result<f64, anyhow::Error> {
		self.compare_counter(calc, "pic_ops_write_miss", scope)
	}

	pub fn key_writes(self, calc: &MetricCalculator<'_>, scope: Scope) -> Result<f64, anyhow::Error> {
		self.counter(calc, "pic_key_writes", scope)
	}
}
