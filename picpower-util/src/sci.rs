//! Scientific (SI-prefixed) values

// Imports
use std::fmt;

/// A value scaled to the nearest SI prefix, as used for energy columns
#[derive(PartialEq, Clone, Copy, Debug)]
pub struct SciValue {
	/// Scaled mantissa
	pub mantissa: f64,

	/// SI prefix of the mantissa (empty for unscaled values)
	pub prefix: &'static str,
}

impl SciValue {
	/// Prefixes, from largest to smallest, with their exponents
	const PREFIXES: [(i32, &'static str); 9] = [
		(12, "T"),
		(9, "G"),
		(6, "M"),
		(3, "k"),
		(0, ""),
		(-3, "m"),
		(-6, "u"),
		(-9, "n"),
		(-12, "p"),
	];

	/// Scales `value` so that its mantissa lies in `1..1000` whenever possible.
	///
	/// Zero and non-finite values are left unscaled. Values below the smallest prefix
	/// are expressed in that prefix.
	pub fn new(value: f64) -> Self {
		if value == 0.0 || !value.is_finite() {
			return Self {
				mantissa: value,
				prefix:   "",
			};
		}

		let magnitude = value.abs();
		let (exp, prefix) = Self::PREFIXES
			.iter()
			.copied()
			.find(|&(exp, _)| magnitude >= 10f64.powi(exp))
			.unwrap_or(Self::PREFIXES[Self::PREFIXES.len() - 1]);

		Self {
			mantissa: value / 10f64.powi(exp),
			prefix,
		}
	}
}

impl fmt::Display for SciValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match f.precision() {
			Some(precision) => write!(f, "{:.*} {}", precision, self.mantissa, self.prefix),
			None => write!(f, "{} {}", self.mantissa, self.prefix),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn assert_close(lhs: f64, rhs: f64) {
		assert!((lhs - rhs).abs() < 1e-9, "{lhs} != {rhs}");
	}

	#[test]
	fn scales_to_prefix() {
		let value = SciValue::new(0.0042);
		assert_close(value.mantissa, 4.2);
		assert_eq!(value.prefix, "m");

		let value = SciValue::new(12_500.0);
		assert_close(value.mantissa, 12.5);
		assert_eq!(value.prefix, "k");

		let value = SciValue::new(3.0);
		assert_close(value.mantissa, 3.0);
		assert_eq!(value.prefix, "");
	}

	#[test]
	fn zero_and_tiny() {
		assert_eq!(SciValue::new(0.0), SciValue {
			mantissa: 0.0,
			prefix:   "",
		});
		assert_eq!(SciValue::new(1e-15).prefix, "p");
	}

	#[test]
	fn display_respects_precision() {
		assert_eq!(format!("{:.2}", SciValue::new(0.0042)), "4.20 m");
	}
}
