//! Interval merger

// Imports
use {
	super::{MergedResult, ResultSet},
	anyhow::Context,
	std::{fmt, ops::Range},
};

/// Marker interval.
///
/// Region of interest delimited by the `marker-1-<idx>` and `marker-2-<idx>` tags.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct MarkerInterval {
	pub idx: usize,
}

impl MarkerInterval {
	/// Creates the interval with index `idx`
	pub fn new(idx: usize) -> Self {
		Self { idx }
	}

	/// Returns the begin tag
	pub fn begin(&self) -> String {
		format!("marker-1-{}", self.idx)
	}

	/// Returns the end tag
	pub fn end(&self) -> String {
		format!("marker-2-{}", self.idx)
	}
}

impl fmt::Display for MarkerInterval {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}..{}", self.begin(), self.end())
	}
}

/// Result fetcher
pub trait ResultFetcher {
	/// Fetches the results of an interval.
	///
	/// Returns `None` if no results were recorded for it.
	fn fetch(&mut self, interval: &MarkerInterval) -> Result<Option<ResultSet>, anyhow::Error>;
}

impl<F> ResultFetcher for F
where
	F: FnMut(&MarkerInterval) -> Result<Option<ResultSet>, anyhow::Error>,
{
	fn fetch(&mut self, interval: &MarkerInterval) -> Result<Option<ResultSet>, anyhow::Error> {
		self(interval)
	}
}

/// Stats merger
#[derive(Clone, Debug)]
pub struct StatsMerger {
	/// Marker indices to visit
	markers: Range<usize>,
}

impl StatsMerger {
	/// Default first marker
	pub const DEFAULT_FIRST_MARKER: usize = 64;

	/// Default last marker (exclusive)
	pub const DEFAULT_LAST_MARKER: usize = 5000;

	/// Creates a new merger over markers `first_marker..last_marker`
	pub fn new(first_marker: usize, last_marker: usize) -> Self {
		Self {
			markers: first_marker..last_marker,
		}
	}

	/// Merges all intervals fetched from `fetcher`.
	///
	/// Returns the merged result and the number of marker indices visited.
	pub fn merge<F: ResultFetcher>(&self, fetcher: &mut F) -> Result<(MergedResult, usize), anyhow::Error> {
		let mut merged = MergedResult::new();
		let mut visited = 0;
		for idx in self.markers.clone() {
			let interval = MarkerInterval::new(idx);
			visited += 1;

			let Some(set) = fetcher
				.fetch(&interval)
				.with_context(|| format!("Unable to fetch results of interval {interval}"))?
			else {
				tracing::debug!(%interval, "No results for interval, skipping");
				continue;
			};

			tracing::trace!(%interval, stats = set.results.iter().count(), "Merging interval");
			merged
				.absorb(set)
				.with_context(|| format!("Unable to merge results of interval {interval}"))?;
		}

		tracing::info!(
			"Merged {} intervals ({visited} markers visited)",
			merged.intervals
		);

		Ok((merged, visited))
	}
}

impl Default for StatsMerger {
	fn default() -> Self {
		Self::new(Self::DEFAULT_FIRST_MARKER, Self::DEFAULT_LAST_MARKER)
	}
}

#[cfg(test)]
mod tests {
	use {
		super::*,
		crate::stats::{Stats, Value},
	};

	fn set(name: &str, value: Value) -> ResultSet {
		ResultSet {
			results: Stats::from_iter([(name.to_owned(), value)]),
			..ResultSet::default()
		}
	}

	#[test]
	fn markers() {
		let interval = MarkerInterval::new(64);
		assert_eq!(interval.begin(), "marker-1-64");
		assert_eq!(interval.end(), "marker-2-64");
	}

	#[test]
	fn dram_reads_sum() {
		let mut fetcher = |interval: &MarkerInterval| -> Result<Option<ResultSet>, anyhow::Error> {
			Ok(match interval.idx {
				64 => Some(set("dram.reads", Value::List(vec![100.0]))),
				65 => Some(set("dram.reads", Value::List(vec![150.0]))),
				_ => None,
			})
		};

		let (merged, visited) = StatsMerger::new(64, 66).merge(&mut fetcher).expect("Unable to merge");
		assert_eq!(merged.results.get("dram.reads"), Some(&Value::List(vec![250.0])));
		assert_eq!(visited, 2);
	}

	#[test]
	fn absent_intervals_are_skipped() {
		let mut fetcher = |interval: &MarkerInterval| -> Result<Option<ResultSet>, anyhow::Error> {
			Ok((interval.idx % 2 == 0).then(|| set("ncores", Value::Scalar(4.0))))
		};

		let (merged, visited) = StatsMerger::new(0, 10).merge(&mut fetcher).expect("Unable to merge");
		assert_eq!(merged.results.get("ncores"), Some(&Value::Scalar(4.0)));
		assert_eq!(merged.intervals, 5);
		assert_eq!(visited, 10);
	}

	#[test]
	fn fetch_errors_propagate() {
		let mut fetcher =
			|_: &MarkerInterval| -> Result<Option<ResultSet>, anyhow::Error> { anyhow::bail!("Disk on fire") };

		let err = StatsMerger::new(0, 1)
			.merge(&mut fetcher)
			.expect_err("Fetch error was swallowed");
		assert!(format!("{err:#}").contains("Disk on fire"));
	}
}
