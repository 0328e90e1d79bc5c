use std::fmt::{Display, Formatter};

use average::Mean;
use comfy_table::{Cell, CellAlignment, Table, modifiers, presets};
use itertools::{Itertools, MinMaxResult};

use crate::{
    core::module::Module,
    fmt::FormattedPercentage,
    prelude::*,
    quantity::resistance::Ohms,
};

/// Balance quality of the assembled modules.
#[must_use]
#[derive(Copy, Clone, Debug)]
pub struct ModuleStatistics {
    pub min: Ohms,
    pub max: Ohms,
    pub average: Ohms,
}

impl ModuleStatistics {
    /// Difference between the most and the least resistive modules.
    pub fn spread(&self) -> Ohms {
        self.max - self.min
    }

    /// Spread in percent of the average module resistance.
    pub fn relative_spread(&self) -> f64 {
        if self.average.0 > 0.0 { self.spread().0 / self.average.0 * 100.0 } else { 0.0 }
    }
}

impl TryFrom<&[Module]> for ModuleStatistics {
    type Error = Error;

    fn try_from(modules: &[Module]) -> Result<Self> {
        let resistances: Vec<Ohms> = modules
            .iter()
            .map(|module| {
                ensure!(!module.is_empty(), "module #{} is empty", module.id());
                module
                    .resistance()
                    .with_context(|| format!("module #{} has no conductance", module.id()))
            })
            .collect::<Result<_>>()?;
        let (min, max) = match resistances.iter().copied().minmax() {
            MinMaxResult::NoElements => bail!("no modules to compute the statistics of"),
            MinMaxResult::OneElement(resistance) => (resistance, resistance),
            MinMaxResult::MinMax(min, max) => (min, max),
        };
        let average: Mean = resistances.iter().map(|resistance| resistance.0).collect();
        Ok(Self { min, max, average: Ohms(average.mean()) })
    }
}

impl Display for ModuleStatistics {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_FULL_CONDENSED)
            .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
            .enforce_styling();
        for (name, value) in [
            ("Min resistance", format!("{:.6}", self.min)),
            ("Max resistance", format!("{:.6}", self.max)),
            ("Avg resistance", format!("{:.6}", self.average)),
            (
                "Spread",
                format!("{:.6} ({:.4})", self.spread(), FormattedPercentage(self.relative_spread())),
            ),
        ] {
            table.add_row(vec![
                Cell::new(name),
                Cell::new(value).set_alignment(CellAlignment::Right),
            ]);
        }
        write!(f, "{table}")
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::core::{assembly::assemble, cell::Cell, layout::Layout};

    fn modules(resistances: &[f64], series: usize) -> Result<Vec<Module>> {
        let cells = resistances
            .iter()
            .enumerate()
            .map(|(rank, resistance)| Cell::try_new(format!("{rank}"), Ohms(*resistance), rank))
            .collect::<Result<Vec<_>, _>>()?;
        let layout =
            Layout::builder().series(series).parallel(resistances.len() / series).build()?;
        Ok(assemble(cells, layout)?)
    }

    #[test]
    fn spread_ok() -> Result {
        let statistics = ModuleStatistics::try_from(modules(&[1.0, 2.0, 4.0], 3)?.as_slice())?;
        assert_eq!(statistics.min, Ohms(1.0));
        assert_eq!(statistics.max, Ohms(4.0));
        assert_abs_diff_eq!(statistics.average.0, 7.0 / 3.0, epsilon = 1e-12);
        assert_eq!(statistics.spread(), Ohms(3.0));
        assert_abs_diff_eq!(statistics.relative_spread(), 300.0 / (7.0 / 3.0), epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn single_module() -> Result {
        let statistics = ModuleStatistics::try_from(modules(&[2.0, 2.0], 1)?.as_slice())?;
        assert_eq!(statistics.min, Ohms(1.0));
        assert_eq!(statistics.max, Ohms(1.0));
        assert_eq!(statistics.relative_spread(), 0.0);
        Ok(())
    }

    #[test]
    fn degenerate_average() {
        let statistics = ModuleStatistics { min: Ohms(0.0), max: Ohms(0.0), average: Ohms(0.0) };
        assert_eq!(statistics.relative_spread(), 0.0);
    }

    #[test]
    fn empty_module_is_undefined() {
        assert!(ModuleStatistics::try_from([Module::new(1, 4)].as_slice()).is_err());
    }

    #[test]
    fn no_modules_is_undefined() {
        let modules: [Module; 0] = [];
        assert!(ModuleStatistics::try_from(modules.as_slice()).is_err());
    }
}
