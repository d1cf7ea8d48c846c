//! Result set fetching

// Imports
use {
	crate::stats::{MarkerInterval, ResultFetcher, ResultSet},
	anyhow::Context,
	std::{
		fs,
		io,
		path::{Path, PathBuf},
	},
};

/// Fetches result sets from a results directory.
///
/// Each interval is stored as `<begin>_<end>.json`, containing a [`ResultSet`].
#[derive(Clone, Debug)]
pub struct DirectoryFetcher {
	/// Results directory
	dir: PathBuf,
}

impl DirectoryFetcher {
	/// Creates a fetcher over `dir`
	pub fn new(dir: impl Into<PathBuf>) -> Self {
		Self { dir: dir.into() }
	}

	/// Returns the path of the result set of `interval`
	pub fn interval_path(&self, interval: &MarkerInterval) -> PathBuf {
		self.dir.join(format!("{}_{}.json", interval.begin(), interval.end()))
	}

	/// Returns the results directory
	pub fn dir(&self) -> &Path {
		&self.dir
	}
}

impl ResultFetcher for DirectoryFetcher {
	fn fetch(&mut self, interval: &MarkerInterval) -> Result<Option<ResultSet>, anyhow::Error> {
		let path = self.interval_path(interval);
		let file = match fs::File::open(&path) {
			Ok(file) => file,
			Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
			Err(err) => return Err(err).with_context(|| format!("Unable to open result set {path:?}")),
		};

		let set = serde_json::from_reader(io::BufReader::new(file))
			.with_context(|| format!("Unable to parse result set {path:?}"))?;
		tracing::trace!(?path, "Fetched result set");

		Ok(Some(set))
	}
}

#[cfg(test)]
mod tests {
	use {
		super::*,
		crate::stats::{StatsMerger, Value},
	};

	#[test]
	fn directory() {
		let dir = tempfile::tempdir().expect("Unable to create temporary directory");
		let write = |idx: usize, contents: &str| {
			let path = dir.path().join(format!("marker-1-{idx}_marker-2-{idx}.json"));
			fs::write(path, contents).expect("Unable to write result set");
		};
		write(
			1,
			r#"{ "results": { "dram.reads": [100], "ncores": 4 }, "config": { "general/total_cores": "4" } }"#,
		);
		write(3, r#"{ "results": { "dram.reads": [150], "ncores": 4 } }"#);

		let mut fetcher = DirectoryFetcher::new(dir.path());
		assert!(fetcher
			.fetch(&MarkerInterval::new(2))
			.expect("Unable to fetch interval")
			.is_none());

		let (merged, visited) = StatsMerger::new(0, 5)
			.merge(&mut fetcher)
			.expect("Unable to merge intervals");
		assert_eq!(visited, 5);
		assert_eq!(merged.intervals, 2);
		assert_eq!(merged.results.get("dram.reads"), Some(&Value::List(vec![250.0])));
		assert_eq!(merged.results.get("ncores"), Some(&Value::Scalar(4.0)));
		assert_eq!(merged.config.resolve("general/total_cores", None).ok(), Some("4"));
	}

	#[test]
	fn invalid_set() {
		let dir = tempfile::tempdir().expect("Unable to create temporary directory");
		fs::write(dir.path().join("marker-1-0_marker-2-0.json"), "{ results").expect("Unable to write result set");

		let mut fetcher = DirectoryFetcher::new(dir.path());
		assert!(fetcher.fetch(&MarkerInterval::new(0)).is_err());
	}
}
