//! Output data

// Imports
use {
	crate::taxonomy::{PowerStack, PowerType},
	picpower_util::SciValue,
	std::{collections::BTreeMap, fmt},
};

/// Stack data, as consumed by plotting tools
#[derive(PartialEq, Clone, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct StackData {
	pub power_type: PowerType,
	pub labels:     Vec<String>,
	pub data:       Vec<BTreeMap<String, f64>>,
	pub ncores:     usize,
	pub time_s:     f64,
}

impl StackData {
	/// Creates the stack data of `stack`.
	///
	/// Values are energies, in J, except for the area power type, where they're areas, in mm^2.
	pub fn new(stack: &PowerStack, ncores: usize, time_s: f64) -> Self {
		let mut labels = Vec::<String>::new();
		let data = stack
			.units
			.iter()
			.map(|unit| {
				unit.items
					.iter()
					.map(|item| {
						if !labels.contains(&item.label) {
							labels.push(item.label.clone());
						}

						let value = match stack.power_type {
							PowerType::Area => item.value,
							_ => item.value * time_s,
						};
						(item.label.clone(), value)
					})
					.collect()
			})
			.collect();

		Self {
			power_type: stack.power_type,
			labels,
			data,
			ncores,
			time_s,
		}
	}
}

/// Formats a summary of `stack` over `time_s` seconds to `f`
pub fn fmt_summary(stack: &PowerStack, time_s: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
	let is_area = stack.power_type == PowerType::Area;
	match is_area {
		true => writeln!(f, "                         Area    Area %")?,
		false => writeln!(f, "                     Power     Energy    Energy %")?,
	}

	let row = |f: &mut fmt::Formatter<'_>, name: &str, value: f64, total: f64| {
		let share = match total {
			total if total == 0.0 => 0.0,
			total => 100.0 * value / total,
		};
		match is_area {
			true => writeln!(f, "  {name:<12}    {value:6.4} mm^2   {share:6.4}%"),
			false => {
				let energy = SciValue::new(value * time_s);
				writeln!(
					f,
					"  {name:<12}    {value:6.4} W   {:6.4} {}J    {share:6.4}%",
					energy.mantissa, energy.prefix
				)
			},
		}
	};

	for unit in &stack.units {
		let mut total_core = 0.0;
		let mut total_cache = 0.0;
		for item in &unit.items {
			row(f, &item.label, item.value, unit.total)?;
			match item.category() {
				Some(category) if category.is_core() => total_core += item.value,
				Some(category) if category.is_cache() => total_cache += item.value,
				_ => (),
			}
		}

		writeln!(f)?;
		row(f, "core", total_core, unit.total)?;
		row(f, "cache", total_cache, unit.total)?;
		row(f, "total", unit.total, unit.total)?;
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use {
		super::*,
		crate::taxonomy::{Category, StackItem, StackUnit},
		picpower_util::DisplayWrapper,
	};

	fn stack(power_type: PowerType) -> PowerStack {
		let items = vec![
			StackItem {
				label: "core-alu-int".to_owned(),
				value: 3.0,
			},
			StackItem {
				label: "dcache".to_owned(),
				value: 1.0,
			},
		];
		PowerStack {
			power_type,
			units: vec![StackUnit {
				raw: [(Category::CoreAluInt, 3.0), (Category::Dcache, 1.0)].into_iter().collect(),
				items,
				total: 4.0,
				other: 0.0,
				scale: 1.0,
			}],
		}
	}

	#[test]
	fn energies() {
		let data = StackData::new(&stack(PowerType::Total), 4, 0.5);
		assert_eq!(data.labels, ["core-alu-int", "dcache"]);
		assert_eq!(data.data[0].get("core-alu-int"), Some(&1.5));
		assert_eq!(data.ncores, 4);

		let data = StackData::new(&stack(PowerType::Area), 4, 0.5);
		assert_eq!(data.data[0].get("core-alu-int"), Some(&3.0));
	}

	#[test]
	fn summary() {
		let stack = self::stack(PowerType::Dynamic);
		let summary = DisplayWrapper::new(|f| fmt_summary(&stack, 0.5, f)).to_string();
		let lines = summary.lines().collect::<Vec<_>>();

		assert_eq!(lines[0], "                     Power     Energy    Energy %");
		assert_eq!(lines[1], "  core-alu-int    3.0000 W   1.5000 J    75.0000%");
		assert_eq!(lines[3], "");
		assert_eq!(lines[4], "  core            3.0000 W   1.5000 J    75.0000%");
		assert_eq!(lines[5], "  cache           1.0000 W   500.0000 mJ    25.0000%");
		assert_eq!(lines[6], "  total           4.0000 W   2.0000 J    100.0000%");
	}

	#[test]
	fn area_summary() {
		let stack = self::stack(PowerType::Area);
		let summary = DisplayWrapper::new(|f| fmt_summary(&stack, 0.5, f)).to_string();
		let lines = summary.lines().collect::<Vec<_>>();

		assert_eq!(lines[0], "                         Area    Area %");
		assert_eq!(lines[2], "  dcache          1.0000 mm^2   25.0000%");
	}
}
