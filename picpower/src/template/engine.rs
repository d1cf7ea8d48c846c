//! Template rendering

// Imports
use {
	super::{Binding, BindingKind, Template},
	crate::{config::CfgField, config::Config, metrics::MetricCalculator},
	anyhow::Context,
	std::fmt,
};

/// Rendered document
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Document {
	lines: Vec<String>,
}

impl Document {
	/// Returns all lines
	pub fn lines(&self) -> &[String] {
		&self.lines
	}
}

impl fmt::Display for Document {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (idx, line) in self.lines.iter().enumerate() {
			if idx != 0 {
				f.write_str("\n")?;
			}
			f.write_str(line)?;
		}

		Ok(())
	}
}

/// Renders `template`
pub fn render(
	template: &Template,
	config: &Config,
	calculator: &mut MetricCalculator<'_>,
) -> Result<Document, anyhow::Error> {
	let lines = template
		.entries()
		.iter()
		.map(|entry| match &entry.binding {
			None => Ok(entry.text.clone()),
			Some(binding) => {
				let values = self::binding_values(binding, config, calculator)
					.with_context(|| format!("Unable to evaluate {:?} for {}", binding.name, binding.scope))?;
				tracing::trace!(name = %binding.name, scope = %binding.scope, ?values, "Evaluated binding");
				self::substitute(&entry.text, &values)
					.with_context(|| format!("Unable to render {:?} for {}", binding.name, binding.scope))
			},
		})
		.collect::<Result<Vec<_>, anyhow::Error>>()?;

	Ok(Document { lines })
}

/// Evaluates the values of a binding
fn binding_values(
	binding: &Binding,
	config: &Config,
	calculator: &mut MetricCalculator<'_>,
) -> Result<Vec<f64>, anyhow::Error> {
	match binding.kind {
		BindingKind::Cfg => {
			let field = binding.name.parse::<CfgField>()?;
			Ok(vec![field.resolve(config, binding.scope)?])
		},
		BindingKind::Stat => Ok(vec![calculator.stat(&binding.name, binding.scope)?]),
		BindingKind::Comb => calculator.comb(&binding.name, binding.scope),
	}
}

/// Substitutes `values` into the placeholders of `text`
pub fn substitute(text: &str, values: &[f64]) -> Result<String, anyhow::Error> {
	let (segments, placeholders) = super::split_placeholders(text);
	anyhow::ensure!(
		placeholders.len() == values.len(),
		"Line has {} placeholders, but {} values were given",
		placeholders.len(),
		values.len()
	);

	let mut line = segments[0].to_owned();
	for ((placeholder, &value), segment) in placeholders.iter().zip(values).zip(&segments[1..]) {
		line.push_str(&placeholder.format(value)?);
		line.push_str(segment);
	}

	Ok(line)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn substitute_values() {
		assert_eq!(
			substitute("<stat name=\"x\" value=\"%i\"/>", &[12.7]).ok().as_deref(),
			Some("<stat name=\"x\" value=\"12\"/>")
		);
		assert_eq!(
			substitute("value=\"%i,%i,%i, %f\"", &[32768.0, 64.0, 8.0, 0.25]).ok().as_deref(),
			Some("value=\"32768,64,8, 0.250000\"")
		);
	}

	#[test]
	fn count_mismatch() {
		assert!(substitute("value=\"%i,%i\"", &[1.0]).is_err());
		assert!(substitute("value=\"%i\"", &[1.0, 2.0]).is_err());
		assert!(substitute("value=\"1\"", &[1.0]).is_err());
	}

	#[test]
	fn document_joins_lines() {
		let document = Document {
			lines: vec!["<a>".to_owned(), "</a>".to_owned()],
		};
		assert_eq!(document.to_string(), "<a>\n</a>");
	}
}
