//! Estimator input template
//!
//! The estimator input is an ordered list of lines. Most lines are literal,
//! but some are bound to a configuration field, a derived statistic or a
//! tuple of values, which are substituted into the line's placeholders when
//! rendering.

// Modules
pub mod engine;
pub mod layout;

// Exports
pub use self::engine::{render, Document};

// Imports
use {crate::hierarchy::CacheHierarchy, std::fmt};

/// Scope of a binding
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Scope {
	/// A single core, or a single cache bank
	PerCore(usize),

	/// The whole system
	SystemWide,
}

impl Scope {
	/// Returns the core index of this scope, if any
	pub fn core(self) -> Option<usize> {
		match self {
			Self::PerCore(core) => Some(core),
			Self::SystemWide => None,
		}
	}
}

impl fmt::Display for Scope {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::PerCore(core) => write!(f, "#{core}"),
			Self::SystemWide => f.write_str("system"),
		}
	}
}

/// Binding kind
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum BindingKind {
	/// Configuration field
	Cfg,

	/// Derived statistic
	Stat,

	/// Tuple of values
	Comb,
}

/// Binding
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Binding {
	pub kind:  BindingKind,
	pub name:  String,
	pub scope: Scope,
}

/// Template entry
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct TemplateEntry {
	/// Text, with placeholders if bound
	pub text: String,

	/// Binding
	pub binding: Option<Binding>,
}

/// Template
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Template {
	entries: Vec<TemplateEntry>,
}

impl Template {
	/// Creates a template from its entries
	pub fn new(entries: Vec<TemplateEntry>) -> Self {
		Self { entries }
	}

	/// Builds the estimator input template for `hierarchy`
	pub fn for_hierarchy(hierarchy: &CacheHierarchy) -> Self {
		layout::build(hierarchy)
	}

	/// Returns all entries
	pub fn entries(&self) -> &[TemplateEntry] {
		&self.entries
	}

	/// Returns all bindings
	pub fn bindings(&self) -> impl Iterator<Item = &Binding> {
		self.entries.iter().filter_map(|entry| entry.binding.as_ref())
	}
}

/// Placeholder
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Placeholder {
	/// Integer (`%i`, `%d` or `%u`), truncated towards zero
	Int,

	/// Float (`%f`), with 6 decimal places
	Float,
}

impl Placeholder {
	/// Formats `value`
	pub fn format(self, value: f64) -> Result<String, anyhow::Error> {
		match self {
			Self::Int => {
				anyhow::ensure!(value.is_finite(), "Cannot format {value} as an integer");
				Ok(format!("{}", value.trunc() as i128))
			},
			Self::Float => Ok(format!("{value:.6}")),
		}
	}
}

/// Splits `text` around its placeholders.
///
/// Returns the literal segments between placeholders, and the placeholders themselves.
/// There is always exactly one more segment than placeholders.
pub fn split_placeholders(text: &str) -> (Vec<&str>, Vec<Placeholder>) {
	let mut segments = vec![];
	let mut placeholders = vec![];

	let mut segment_start = 0;
	let mut chars = text.char_indices().peekable();
	while let Some((idx, ch)) = chars.next() {
		if ch != '%' {
			continue;
		}

		let placeholder = match chars.peek() {
			Some((_, 'i' | 'd' | 'u')) => Placeholder::Int,
			Some((_, 'f')) => Placeholder::Float,
			_ => continue,
		};
		chars.next();

		segments.push(&text[segment_start..idx]);
		placeholders.push(placeholder);
		segment_start = idx + 2;
	}
	segments.push(&text[segment_start..]);

	(segments, placeholders)
}
