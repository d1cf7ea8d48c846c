//! DRAM power model.
//!
//! The estimator doesn't model main memory, so DRAM power is computed directly
//! from the number of reads and writes, using per-chip power figures of a DDR3 part.

// Imports
use {
	crate::{config::Config, report::ComponentRecord, stats::Stats},
	anyhow::Context,
};

/// Static power per chip (active standby + refresh), in W
pub const POWER_STATIC: f64 = 0.102 + 0.009;

/// Power per chip while reading (activate + read + dq), in W
pub const POWER_READ: f64 = 0.388 + 0.271 + 0.019;

/// Power per chip while writing (activate + write + dq + write termination), in W
pub const POWER_WRITE: f64 = 0.388 + 0.238 + 0.019 + 0.180;

/// Clock, in MHz
pub const CLOCK_MHZ: f64 = 266.0;

/// Static off-chip interface power per chip, in W.
///
/// 175 mW per DIMM, spread over 8 chips.
pub const POWER_STATIC_OFFCHIP_INTERFACE: f64 = 0.175 / 8.0;

/// Static TSV interface power per chip, in W.
///
/// 9.34 mW for a 64-bit data bus, spread over 8 chips.
pub const POWER_STATIC_TSV_INTERFACE: f64 = 0.00934 / 8.0;

/// Default chips per DIMM
pub const DEFAULT_CHIPS_PER_DIMM: f64 = 8.0;

/// Default DIMMs per socket
pub const DEFAULT_DIMMS_PER_SOCKET: f64 = 4.0;

/// DRAM configuration
#[derive(PartialEq, Clone, Copy, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct DramConfig {
	pub sockets:          f64,
	pub chips_per_dimm:   f64,
	pub dimms_per_socket: f64,
	pub is_3d:            bool,
}

impl DramConfig {
	/// Reads the DRAM configuration
	pub fn from_config(config: &Config) -> Result<Self, anyhow::Error> {
		let controllers = config.resolve_parse::<i64>("perf_model/dram/num_controllers", None)?;
		let sockets = match controllers > 0 {
			true => controllers as f64,
			false => {
				let total_cores = config.resolve_parse::<f64>("general/total_cores", None)?;
				let interleaving = config.resolve_parse::<f64>("perf_model/dram/controllers_interleaving", None)?;
				anyhow::ensure!(interleaving > 0.0, "DRAM controller interleaving must be positive");
				(total_cores / interleaving).ceil()
			},
		};

		Ok(Self {
			sockets,
			chips_per_dimm: config.resolve_parse_or("perf_model/dram/chips_per_dimm", None, DEFAULT_CHIPS_PER_DIMM)?,
			dimms_per_socket: config.resolve_parse_or(
				"perf_model/dram/dimms_per_controller",
				None,
				DEFAULT_DIMMS_PER_SOCKET,
			)?,
			is_3d: config.resolve_bool_or("power/3d_dram", None, false)?,
		})
	}

	/// Returns the total number of chips
	pub fn chips(&self) -> f64 {
		self.chips_per_dimm * self.dimms_per_socket * self.sockets
	}
}

/// DRAM power
#[derive(PartialEq, Clone, Copy, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct DramPower {
	/// Dynamic power, in W
	pub dynamic: f64,

	/// Static power, in W
	pub static_: f64,
}

impl DramPower {
	/// Returns this power as a component record
	pub fn record(&self) -> ComponentRecord {
		[
			("Peak Dynamic", self.dynamic),
			("Runtime Dynamic", self.dynamic),
			("Subthreshold Leakage", self.static_),
			("Subthreshold Leakage with power gating", self.static_),
			("Gate Leakage", 0.0),
			("Area", 0.0),
		]
		.into_iter()
		.map(|(name, value)| (name.to_owned(), value))
		.collect()
	}
}

/// Computes the DRAM power for `reads` reads and `writes` writes over `elapsed_secs` seconds
pub fn power(reads: f64, writes: f64, elapsed_secs: f64, config: &DramConfig) -> DramPower {
	let cycles = match elapsed_secs * CLOCK_MHZ * 1e6 {
		cycles if cycles == 0.0 => 1.0,
		cycles => cycles,
	};
	let read_duty_cycle = reads / config.sockets / cycles;
	let write_duty_cycle = writes / config.sockets / cycles;

	let chip_dynamic = read_duty_cycle * POWER_READ + write_duty_cycle * POWER_WRITE;
	let chip_static = POWER_STATIC +
		match config.is_3d {
			true => POWER_STATIC_TSV_INTERFACE,
			false => POWER_STATIC_OFFCHIP_INTERFACE,
		};

	DramPower {
		dynamic: chip_dynamic * config.chips(),
		static_: chip_static * config.chips(),
	}
}

/// Computes the DRAM power of a run
pub fn power_from_stats(stats: &Stats, config: &Config) -> Result<DramPower, anyhow::Error> {
	let dram_config = DramConfig::from_config(config).context("Unable to read DRAM configuration")?;
	let reads = stats.require("dram.reads")?.sum();
	let writes = stats.require("dram.writes")?.sum();
	let elapsed_secs = self::elapsed_secs(stats)?;
	tracing::trace!(?dram_config, reads, writes, elapsed_secs, "Computing DRAM power");

	Ok(self::power(reads, writes, elapsed_secs, &dram_config))
}

/// Returns the elapsed time of the run, in seconds.
///
/// Uses the elapsed time of the first core.
pub fn elapsed_secs(stats: &Stats) -> Result<f64, anyhow::Error> {
	let elapsed_fs = stats.at("performance_model.elapsed_time", 0)?;
	Ok(elapsed_fs * 1e-15)
}

#[cfg(test)]
mod tests {
	use {super::*, crate::stats::Value};

	fn assert_close(lhs: f64, rhs: f64) {
		assert!((lhs - rhs).abs() <= 1e-9 * lhs.abs().max(rhs.abs()), "{lhs} != {rhs}");
	}

	fn single_controller() -> DramConfig {
		let mut config = Config::new();
		config.set("perf_model/dram/num_controllers", "1");
		DramConfig::from_config(&config).expect("Unable to read config")
	}

	#[test]
	fn closed_form() {
		let config = single_controller();
		assert_eq!(config.chips(), 32.0);

		let power = self::power(1e6, 5e5, 1e-3, &config);
		let cycles = 266_000.0;
		let chip_dynamic = (1e6 / cycles) * POWER_READ + (5e5 / cycles) * POWER_WRITE;
		assert_close(power.dynamic, 32.0 * chip_dynamic);
		assert_close(power.static_, 32.0 * (POWER_STATIC + POWER_STATIC_OFFCHIP_INTERFACE));
	}

	#[test]
	fn four_cores_single_controller() {
		let mut config = Config::new();
		config.set("perf_model/dram/num_controllers", "1");
		config.set("general/total_cores", "4");
		config.set("perf_model/dram/controllers_interleaving", "4");
		config.set("perf_model/dram/chips_per_dimm", "8");
		config.set("perf_model/dram/dimms_per_controller", "4");
		config.set("power/3d_dram", "false");

		// 1e6 reads and 5e5 writes over 1 ms (1e12 fs), split over the cores
		let stats = [
			("dram.reads", Value::List(vec![4e5, 3e5, 2e5, 1e5])),
			("dram.writes", Value::List(vec![5e5, 0.0, 0.0, 0.0])),
			("performance_model.elapsed_time", Value::List(vec![1e12, 1e12, 1e12, 1e12])),
		]
		.into_iter()
		.map(|(name, value)| (name.to_owned(), value))
		.collect::<Stats>();
		let power = self::power_from_stats(&stats, &config).expect("Unable to compute DRAM power");

		// (1e6 * 0.678 + 5e5 * 0.825) / 266000 W per chip, over 32 chips
		assert_close(power.dynamic, 32.0 * 1_090_500.0 / 266_000.0);
		assert_close(power.dynamic, 131.187_969_924_812);
		// (0.111 + 0.175 / 8) W per chip, over 32 chips
		assert_close(power.static_, 4.252);
	}

	#[test]
	fn linear_in_accesses() {
		let config = single_controller();
		let base = self::power(1e6, 5e5, 1e-3, &config);
		let doubled = self::power(2e6, 1e6, 1e-3, &config);

		assert_close(doubled.dynamic, 2.0 * base.dynamic);
		assert_close(doubled.static_, base.static_);
	}

	#[test]
	fn inverse_in_time() {
		let config = single_controller();
		let base = self::power(1e6, 5e5, 1e-3, &config);
		let longer = self::power(1e6, 5e5, 2e-3, &config);

		assert_close(longer.dynamic, base.dynamic / 2.0);
	}

	#[test]
	fn zero_time_counts_as_one_cycle() {
		let config = single_controller();
		let power = self::power(10.0, 0.0, 0.0, &config);
		assert_close(power.dynamic, 10.0 * POWER_READ * 32.0);
	}

	#[test]
	fn sockets_from_interleaving() {
		let mut config = Config::new();
		config.set("perf_model/dram/num_controllers", "-1");
		config.set("general/total_cores", "16");
		config.set("perf_model/dram/controllers_interleaving", "6");
		config.set("perf_model/dram/chips_per_dimm", "9");
		config.set("power/3d_dram", "true");

		let config = DramConfig::from_config(&config).expect("Unable to read config");
		assert_eq!(config.sockets, 3.0);
		assert_eq!(config.chips(), 9.0 * 4.0 * 3.0);

		let power = self::power(0.0, 0.0, 1.0, &config);
		assert_close(power.static_, config.chips() * (POWER_STATIC + POWER_STATIC_TSV_INTERFACE));
	}

	#[test]
	fn record() {
		let record = DramPower {
			dynamic: 2.0,
			static_: 0.5,
		}
		.record();

		assert_eq!(record["Peak Dynamic"], 2.0);
		assert_eq!(record["Runtime Dynamic"], 2.0);
		assert_eq!(record["Subthreshold Leakage with power gating"], 0.5);
		assert_eq!(record["Gate Leakage"], 0.0);
	}
}
