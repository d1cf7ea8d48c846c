//! External power estimator

// Imports
use {
	anyhow::Context,
	std::{
		env,
		fs,
		path::{Path, PathBuf},
		process::{Command, Stdio},
	},
};

/// External power estimator
#[derive(Clone, Debug)]
pub struct Estimator {
	/// Estimator binary
	binary: PathBuf,

	/// Directory with the estimator's shared libraries, if any
	library_dir: Option<PathBuf>,
}

impl Estimator {
	/// Creates an estimator that runs `binary`
	pub fn new(binary: impl Into<PathBuf>, library_dir: Option<PathBuf>) -> Self {
		Self {
			binary: binary.into(),
			library_dir,
		}
	}

	/// Returns the command to estimate the power of `input`
	pub fn command(&self, input: &Path) -> Command {
		let mut command = Command::new(&self.binary);
		command
			.args(["-print_level", "5", "-opt_for_clk", "1", "-infile"])
			.arg(input)
			.stdin(Stdio::null());

		if let Some(library_dir) = &self.library_dir {
			let mut library_path = env::var_os("LD_LIBRARY_PATH").unwrap_or_default();
			if !library_path.is_empty() {
				library_path.push(":");
			}
			library_path.push(library_dir.as_os_str());
			command.env("LD_LIBRARY_PATH", library_path);
		}

		command
	}

	/// Runs the estimator on `input`, writing its report to `output`
	pub fn run(&self, input: &Path, output: &Path) -> Result<(), anyhow::Error> {
		let report = fs::File::create(output).with_context(|| format!("Unable to create report file {output:?}"))?;

		let mut command = self.command(input);
		command.stdout(report);
		tracing::debug!(?command, "Running estimator");

		let status = command
			.status()
			.with_context(|| format!("Unable to run estimator {:?}", self.binary))?;
		anyhow::ensure!(status.success(), "Estimator exited with {status}");

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn args() {
		let estimator = Estimator::new("mcpat", None);
		let command = estimator.command(Path::new("power.xml"));
		let args = command
			.get_args()
			.map(|arg| arg.to_string_lossy().into_owned())
			.collect::<Vec<_>>();
		assert_eq!(args, [
			"-print_level",
			"5",
			"-opt_for_clk",
			"1",
			"-infile",
			"power.xml"
		]);
	}

	#[test]
	fn library_dir() {
		let estimator = Estimator::new("mcpat", Some(PathBuf::from("/opt/mcpat/lib")));
		let command = estimator.command(Path::new("power.xml"));
		let library_path = command
			.get_envs()
			.find(|&(name, _)| name == "LD_LIBRARY_PATH")
			.and_then(|(_, value)| value)
			.expect("Missing library path");
		assert!(library_path.to_string_lossy().ends_with("/opt/mcpat/lib"));
	}

	#[test]
	fn missing_binary() {
		let dir = tempfile::tempdir().expect("Unable to create temporary directory");
		let estimator = Estimator::new(dir.path().join("missing-estimator"), None);
		assert!(estimator
			.run(&dir.path().join("power.xml"), &dir.path().join("power.txt"))
			.is_err());
	}
}
