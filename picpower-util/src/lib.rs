//! Utilities

// Modules
pub mod logger;
pub mod sci;

// Exports
pub use sci::SciValue;

// Imports
use std::{cell::RefCell, fmt};

/// Extension trait for parsing the boolean spelling used by simulator configurations
#[extend::ext(name = ParseConfigBool)]
pub impl str {
	/// Parses `true`/`false`/`1`/`0` (case-insensitive, surrounding whitespace ignored).
	///
	/// Returns `None` for anything else.
	fn parse_config_bool(&self) -> Option<bool> {
		match self.trim().to_ascii_lowercase().as_str() {
			"true" | "1" => Some(true),
			"false" | "0" => Some(false),
			_ => None,
		}
	}
}

/// [`fmt::Display`] helper to display using a `FnMut(&mut fmt::Formatter)`
pub struct DisplayWrapper<F: FnMut(&mut fmt::Formatter) -> fmt::Result>(RefCell<F>);

impl<F: FnMut(&mut fmt::Formatter) -> fmt::Result> DisplayWrapper<F> {
	/// Creates a new display wrapper
	#[must_use]
	pub const fn new(func: F) -> Self {
		Self(RefCell::new(func))
	}
}

impl<F: FnMut(&mut fmt::Formatter) -> fmt::Result> fmt::Display for DisplayWrapper<F> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		// Note: `f` cannot be re-entrant, so this cannot fail
		self.0.borrow_mut()(f)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn config_bool_spellings() {
		assert_eq!("true".parse_config_bool(), Some(true));
		assert_eq!(" TRUE ".parse_config_bool(), Some(true));
		assert_eq!("1".parse_config_bool(), Some(true));
		assert_eq!("false".parse_config_bool(), Some(false));
		assert_eq!("0".parse_config_bool(), Some(false));
		assert_eq!("yes".parse_config_bool(), None);
	}

	#[test]
	fn display_wrapper_forwards() {
		let wrapper = DisplayWrapper::new(|f| write!(f, "{}-{}", 1, 2));
		assert_eq!(wrapper.to_string(), "1-2");
	}
}
