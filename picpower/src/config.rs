//! Simulator configuration

// Modules
pub mod fields;

// Exports
pub use self::fields::CfgField;

// Imports
use {
	anyhow::Context,
	picpower_util::ParseConfigBool,
	std::{collections::BTreeMap, fmt, str::FromStr},
};

/// Simulator configuration.
///
/// Keys are `/`-namespaced (e.g. `perf_model/l2_cache/cache_size`). A key
/// may be overridden for a single core with `key[core]`.
#[derive(PartialEq, Eq, Clone, Default, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Config {
	values: BTreeMap<String, String>,
}

impl Config {
	/// Creates an empty configuration
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns if the configuration is empty
	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	/// Sets `key` to `value`
	pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
		self.values.insert(key.into(), value.into());
	}

	/// Returns if `key` is set, for any core
	pub fn contains(&self, key: &str) -> bool {
		self.values.contains_key(key)
	}

	/// Looks up `key`, preferring the override for `core`
	fn lookup(&self, key: &str, core: Option<usize>) -> Option<&str> {
		core.and_then(|core| self.values.get(&format!("{key}[{core}]")))
			.or_else(|| self.values.get(key))
			.map(String::as_str)
	}

	/// Resolves `key` for `core`
	pub fn resolve(&self, key: &str, core: Option<usize>) -> Result<&str, anyhow::Error> {
		self.lookup(key, core)
			.with_context(|| format!("Missing configuration key {key:?}"))
	}

	/// Resolves `key` for `core`, or returns `default` if unset
	pub fn resolve_or<'a>(&'a self, key: &str, core: Option<usize>, default: &'a str) -> &'a str {
		self.lookup(key, core).unwrap_or(default)
	}

	/// Resolves and parses `key` for `core`
	pub fn resolve_parse<T>(&self, key: &str, core: Option<usize>) -> Result<T, anyhow::Error>
	where
		T: FromStr,
		T::Err: fmt::Display,
	{
		let value = self.resolve(key, core)?;
		self::parse_value(key, value)
	}

	/// Resolves and parses `key` for `core`, or returns `default` if unset
	pub fn resolve_parse_or<T>(&self, key: &str, core: Option<usize>, default: T) -> Result<T, anyhow::Error>
	where
		T: FromStr,
		T::Err: fmt::Display,
	{
		match self.lookup(key, core) {
			Some(value) => self::parse_value(key, value),
			None => Ok(default),
		}
	}

	/// Resolves `key` for `core` as a boolean
	pub fn resolve_bool(&self, key: &str, core: Option<usize>) -> Result<bool, anyhow::Error> {
		let value = self.resolve(key, core)?;
		value
			.parse_config_bool()
			.with_context(|| format!("Configuration key {key:?} is not a boolean: {value:?}"))
	}

	/// Resolves `key` for `core` as a boolean, or returns `default` if unset
	pub fn resolve_bool_or(&self, key: &str, core: Option<usize>, default: bool) -> Result<bool, anyhow::Error> {
		match self.contains_for(key, core) {
			true => self.resolve_bool(key, core),
			false => Ok(default),
		}
	}

	/// Returns if `key` is set for `core`
	fn contains_for(&self, key: &str, core: Option<usize>) -> bool {
		self.lookup(key, core).is_some()
	}

	/// Parses a configuration file, layered over `base`.
	///
	/// The file is made of `[section]` headers and `key = value` lines.
	/// Keys are namespaced by the latest section. Everything after a `#` or `;`
	/// is a comment, and values may be quoted.
	pub fn parse_layered(text: &str, mut base: Self) -> Result<Self, anyhow::Error> {
		let mut section = None::<String>;
		for (line_idx, line) in text.lines().enumerate() {
			let line = self::strip_comment(line).trim();
			if line.is_empty() {
				continue;
			}

			// Section header
			if let Some(name) = line.strip_prefix('[') {
				let name = name
					.strip_suffix(']')
					.with_context(|| format!("Unterminated section header on line {}", line_idx + 1))?
					.trim();
				section = (!name.is_empty()).then(|| name.to_owned());
				continue;
			}

			let (key, value) = line
				.split_once('=')
				.with_context(|| format!("Expected `key = value` on line {}: {line:?}", line_idx + 1))?;
			let key = key.trim();
			anyhow::ensure!(!key.is_empty(), "Empty key on line {}", line_idx + 1);
			let value = self::unquote(value.trim());

			let key = match &section {
				Some(section) => format!("{section}/{key}"),
				None => key.to_owned(),
			};
			tracing::trace!(?key, ?value, "Overriding configuration");
			base.set(key, value);
		}

		Ok(base)
	}
}

/// Parses a configuration value
fn parse_value<T>(key: &str, value: &str) -> Result<T, anyhow::Error>
where
	T: FromStr,
	T::Err: fmt::Display,
{
	value
		.trim()
		.parse()
		.map_err(|err| anyhow::anyhow!("Unable to parse configuration key {key:?} ({value:?}): {err}"))
}

/// Strips a trailing comment, ignoring comment characters within quotes
fn strip_comment(line: &str) -> &str {
	let mut in_quotes = false;
	for (idx, ch) in line.char_indices() {
		match ch {
			'"' => in_quotes = !in_quotes,
			'#' | ';' if !in_quotes => return &line[..idx],
			_ => (),
		}
	}

	line
}

/// Removes surrounding quotes from a value
fn unquote(value: &str) -> &str {
	value
		.strip_prefix('"')
		.and_then(|value| value.strip_suffix('"'))
		.unwrap_or(value)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn config(values: &[(&str, &str)]) -> Config {
		let mut config = Config::new();
		for &(key, value) in values {
			config.set(key, value);
		}
		config
	}

	#[test]
	fn per_core_override() {
		let config = config(&[
			("perf_model/core/frequency", "2.66"),
			("perf_model/core/frequency[1]", "1.0"),
		]);

		assert_eq!(config.resolve("perf_model/core/frequency", Some(0)).ok(), Some("2.66"));
		assert_eq!(config.resolve("perf_model/core/frequency", Some(1)).ok(), Some("1.0"));
		assert_eq!(config.resolve("perf_model/core/frequency", None).ok(), Some("2.66"));
	}

	#[test]
	fn missing_key() {
		let config = Config::new();
		let err = config.resolve("general/total_cores", None).expect_err("Resolved missing key");
		assert!(err.to_string().contains("general/total_cores"));

		assert_eq!(config.resolve_or("power/technology_node", None, "45"), "45");
		assert_eq!(config.resolve_parse_or("perf_model/dram/chips_per_dimm", None, 8).ok(), Some(8));
	}

	#[test]
	fn typed() {
		let config = config(&[
			("general/total_cores", "4"),
			("power/3d_dram", "true"),
			("perf_model/l2_cache/shared_cores", "two"),
		]);

		assert_eq!(config.resolve_parse::<usize>("general/total_cores", None).ok(), Some(4));
		assert_eq!(config.resolve_bool("power/3d_dram", None).ok(), Some(true));
		assert_eq!(config.resolve_bool_or("power/missing", None, false).ok(), Some(false));
		assert!(config.resolve_parse::<usize>("perf_model/l2_cache/shared_cores", None).is_err());
	}

	#[test]
	fn layered() {
		let base = config(&[("general/total_cores", "4"), ("power/vdd", "1.2")]);
		let text = r#"
# Overrides
[general]
total_cores = 16 ; more cores

[perf_model/dram]
num_controllers = -1
type = "ddr # 3"
"#;

		let config = Config::parse_layered(text, base).expect("Unable to parse");
		assert_eq!(config.resolve("general/total_cores", None).ok(), Some("16"));
		assert_eq!(config.resolve("power/vdd", None).ok(), Some("1.2"));
		assert_eq!(config.resolve("perf_model/dram/num_controllers", None).ok(), Some("-1"));
		assert_eq!(config.resolve("perf_model/dram/type", None).ok(), Some("ddr # 3"));
	}

	#[test]
	fn layered_rejects_garbage() {
		assert!(Config::parse_layered("[general\n", Config::new()).is_err());
		assert!(Config::parse_layered("total_cores 4\n", Config::new()).is_err());
	}
}
