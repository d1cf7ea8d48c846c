//! Run options

// Imports
use {
	crate::{stats::StatsMerger, taxonomy::PowerType},
	std::fmt,
};

/// Run options
#[derive(PartialEq, Clone, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Options {
	/// Power lens of the summary
	pub power_type: PowerType,

	/// Bank mapping policy of the in-bank PIC counters
	pub bank_map_policy: BankMapPolicy,

	/// Fraction of PIC operations performed in-bank.
	///
	/// When set, in-bank counters are derived from the raw operation counts
	/// instead of being read from the statistics.
	pub in_bank_fraction: Option<f64>,

	/// Whether to add implicit accesses (dirty evictions, back-invalidations, ...)
	/// to the cache access counts
	pub add_implicit_accesses: bool,

	/// Whether to keep small items in the power stack instead of collapsing them
	pub nocollapse: bool,

	/// First marker
	pub first_marker: usize,

	/// Last marker (exclusive)
	pub last_marker: usize,
}

impl Default for Options {
	fn default() -> Self {
		Self {
			power_type:            PowerType::Total,
			bank_map_policy:       BankMapPolicy::AllWays,
			in_bank_fraction:      None,
			add_implicit_accesses: false,
			nocollapse:            false,
			first_marker:          StatsMerger::DEFAULT_FIRST_MARKER,
			last_marker:           StatsMerger::DEFAULT_LAST_MARKER,
		}
	}
}

impl Options {
	/// Normalizes an in-bank fraction given by the user.
	///
	/// Negative fractions (`-1` by convention) leave it unset.
	/// Fractions above 1 aren't valid.
	pub fn normalize_in_bank_fraction(fraction: Option<f64>) -> Result<Option<f64>, anyhow::Error> {
		match fraction {
			Some(fraction) if fraction < 0.0 => Ok(None),
			Some(fraction) => {
				anyhow::ensure!(fraction <= 1.0, "In-bank fraction must be at most 1, found {fraction}");
				Ok(Some(fraction))
			},
			None => Ok(None),
		}
	}
}

/// Bank mapping policy
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
#[derive(clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum BankMapPolicy {
	/// Operands are spread over all ways of a set
	#[value(name = "all_ways")]
	AllWays,

	/// Operands are spread over more sets
	#[value(name = "more_sets")]
	MoreSets,
}

impl BankMapPolicy {
	/// Returns the suffix of the in-bank statistics of this policy
	pub fn suffix(self) -> &'static str {
		match self {
			Self::AllWays => "all_ways",
			Self::MoreSets => "more_sets",
		}
	}
}

impl fmt::Display for BankMapPolicy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.suffix())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn options_from_partial_json() {
		let options = serde_json::from_str::<Options>(r#"{ "bank_map_policy": "more_sets", "in_bank_fraction": 0.25 }"#)
			.expect("Unable to parse options");

		assert_eq!(options.bank_map_policy, BankMapPolicy::MoreSets);
		assert_eq!(options.in_bank_fraction, Some(0.25));
		assert_eq!(options.power_type, PowerType::Total);
		assert_eq!(options.first_marker, 64);
		assert_eq!(options.last_marker, 5000);
	}

	#[test]
	fn in_bank_fraction() {
		assert_eq!(Options::normalize_in_bank_fraction(None).ok(), Some(None));
		assert_eq!(Options::normalize_in_bank_fraction(Some(-1.0)).ok(), Some(None));
		assert_eq!(Options::normalize_in_bank_fraction(Some(0.0)).ok(), Some(Some(0.0)));
		assert_eq!(Options::normalize_in_bank_fraction(Some(0.75)).ok(), Some(Some(0.75)));
		assert_eq!(Options::normalize_in_bank_fraction(Some(1.0)).ok(), Some(Some(1.0)));
		assert!(Options::normalize_in_bank_fraction(Some(1.5)).is_err());
		assert!(Options::normalize_in_bank_fraction(Some(f64::NAN)).is_err());
	}
}
