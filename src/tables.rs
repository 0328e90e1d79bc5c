use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{core::module::Module, fmt::FormattedPercentage, quantity::resistance::Ohms};

/// Deviation from the average module resistance that is highlighted.
const DEVIATION_WARNING_PERCENT: f64 = 1.0;

pub fn build_modules_table(modules: &[Module], average_resistance: Ohms) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table.set_header(vec![
        Cell::new("Module").set_alignment(CellAlignment::Right),
        Cell::new("Cells").set_alignment(CellAlignment::Right),
        Cell::new("Conductance").set_alignment(CellAlignment::Right),
        Cell::new("Resistance").set_alignment(CellAlignment::Right),
        Cell::new("Deviation").set_alignment(CellAlignment::Right),
    ]);
    for module in modules {
        let resistance = module.resistance();
        let deviation = resistance
            .filter(|_| average_resistance.0 > 0.0)
            .map(|resistance| (resistance.0 / average_resistance.0 - 1.0) * 100.0);
        table.add_row(vec![
            Cell::new(module.id()).set_alignment(CellAlignment::Right),
            Cell::new(module.len())
                .set_alignment(CellAlignment::Right)
                .add_attribute(Attribute::Dim),
            Cell::new(format!("{:.3}", module.total_conductance()))
                .set_alignment(CellAlignment::Right),
            Cell::new(resistance.map_or_else(String::new, |resistance| format!("{resistance:.6}")))
                .set_alignment(CellAlignment::Right),
            Cell::new(deviation.map_or_else(String::new, |deviation| {
                format!("{:+.4}", FormattedPercentage(deviation))
            }))
            .set_alignment(CellAlignment::Right)
            .fg(match deviation {
                Some(deviation) if deviation.abs() >= DEVIATION_WARNING_PERCENT => Color::Red,
                Some(_) => Color::Green,
                None => Color::Reset,
            }),
        ]);
    }
    table
}
