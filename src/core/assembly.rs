use std::cmp::Reverse;

use tracing::{debug, instrument};

use crate::core::{cell::Cell, error::Error, layout::Layout, module::Module};

/// Distribute the cells over the modules, balancing the modules' total conductance.
///
/// Greedy least-loaded-first partitioning, akin to the [LPT][1] scheduling:
///
/// - The most conductive cells are placed first.
/// - Each cell goes into the non-full module with the lowest total conductance.
/// - Ties go to the module with the lowest ID.
///
/// The outcome depends only on the cell order and the layout.
///
/// [1]: https://en.wikipedia.org/wiki/Longest-processing-time-first_scheduling
#[instrument(skip_all, fields(n_cells = cells.len(), layout = %layout))]
pub fn assemble(mut cells: Vec<Cell>, layout: Layout) -> Result<Vec<Module>, Error> {
    // Stable, so the equally conductive cells keep their order:
    cells.sort_by_key(|cell| Reverse(cell.conductance()));

    let mut modules =
        (1..=layout.series).map(|id| Module::new(id, layout.parallel)).collect::<Vec<_>>();

    for (n_assigned, cell) in cells.into_iter().enumerate() {
        let Some(module) = modules
            .iter_mut()
            .filter(|module| module.len() < layout.parallel)
            .min_by_key(|module| module.total_conductance())
        else {
            return Err(Error::AssemblyExhausted {
                serial_number: cell.serial_number().to_string(),
                n_assigned,
            });
        };
        module.push(cell);
    }

    if let Some(module) = modules.iter().find(|module| module.len() != layout.parallel) {
        debug!(module.id = module.id(), len = module.len(), "underfilled module");
        return Err(Error::Underfilled {
            n_cells: modules.iter().map(Module::len).sum(),
            required: layout.n_cells(),
        });
    }

    Ok(modules)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use approx::assert_abs_diff_eq;
    use itertools::Itertools;

    use super::*;
    use crate::{
        core::selection::Selection,
        prelude::Result,
        quantity::resistance::{Ohms, Siemens},
        statistics::ModuleStatistics,
    };

    fn population(resistances: &[f64]) -> Result<Vec<Cell>> {
        Ok(resistances
            .iter()
            .enumerate()
            .map(|(rank, resistance)| Cell::try_new(format!("{rank}"), Ohms(*resistance), rank))
            .collect::<Result<_, _>>()?)
    }

    fn layout(series: usize, parallel: usize) -> Result<Layout> {
        Layout::builder().series(series).parallel(parallel).build()
    }

    fn member_ranks(module: &Module) -> Vec<usize> {
        module.members().iter().map(Cell::origin_rank).collect()
    }

    #[test]
    fn capacity_limits_placement() -> Result {
        let modules = assemble(population(&[1.0, 2.0, 3.0, 4.0])?, layout(2, 2)?)?;
        assert_eq!(modules.iter().map(Module::id).collect_vec(), [1, 2]);
        assert_eq!(member_ranks(&modules[0]), [0, 3]);
        assert_eq!(member_ranks(&modules[1]), [1, 2]);
        Ok(())
    }

    #[test]
    fn ties_go_to_lowest_id() -> Result {
        let modules = assemble(population(&[1.0, 1.0, 1.0])?, layout(3, 1)?)?;
        assert_eq!(member_ranks(&modules[0]), [0]);
        assert_eq!(member_ranks(&modules[1]), [1]);
        assert_eq!(member_ranks(&modules[2]), [2]);
        Ok(())
    }

    #[test]
    fn most_conductive_cell_goes_first() -> Result {
        // Given in ascending conductance, which the assembler must reverse:
        let modules = assemble(population(&[4.0, 2.0, 1.0])?, layout(3, 1)?)?;
        assert_eq!(member_ranks(&modules[0]), [2]);
        assert_eq!(member_ranks(&modules[1]), [1]);
        assert_eq!(member_ranks(&modules[2]), [0]);
        assert!(modules[0].total_conductance() > modules[1].total_conductance());
        Ok(())
    }

    #[test]
    fn partitions_the_selection() -> Result {
        let resistances =
            (0_u32..60).map(|i| 0.010 + 0.0001 * f64::from((i * 37) % 23)).collect_vec();
        let cells = population(&resistances)?;
        let modules = assemble(cells, layout(12, 5)?)?;
        assert_eq!(modules.len(), 12);
        assert!(modules.iter().all(|module| module.len() == 5));
        let ranks = modules.iter().flat_map(member_ranks).collect::<HashSet<_>>();
        assert_eq!(ranks.len(), 60);
        for module in &modules {
            assert_abs_diff_eq!(
                module.total_conductance().0,
                module.recompute_conductance().0,
                epsilon = 1e-9,
            );
        }
        Ok(())
    }

    #[test]
    fn idempotent() -> Result {
        let resistances = [0.013, 0.011, 0.012, 0.011, 0.014, 0.010, 0.012, 0.013, 0.015];
        let first = assemble(population(&resistances)?, layout(3, 3)?)?;
        let second = assemble(population(&resistances)?, layout(3, 3)?)?;
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn too_many_cells_exhaust_the_modules() -> Result {
        let error = assemble(population(&[1.0, 2.0, 3.0])?, layout(1, 2)?).unwrap_err();
        assert!(matches!(error, Error::AssemblyExhausted { n_assigned: 2, .. }));
        Ok(())
    }

    #[test]
    fn too_few_cells_underfill_the_modules() -> Result {
        let error = assemble(population(&[1.0, 2.0, 3.0])?, layout(2, 2)?).unwrap_err();
        assert!(matches!(error, Error::Underfilled { n_cells: 3, required: 4 }));
        Ok(())
    }

    #[test]
    fn balances_the_reference_population() -> Result {
        let mut resistances = vec![1.0; 16];
        resistances.extend([2.0; 4]);
        let layout = layout(2, 8)?;

        let selection = Selection::select(population(&resistances)?, layout.n_cells())?;
        assert_eq!((selection.n_skipped_low, selection.n_skipped_high), (2, 2));

        let modules = assemble(selection.cells, layout)?;
        let max_conductance = modules.iter().map(Module::total_conductance).max().unwrap();
        let min_conductance = modules.iter().map(Module::total_conductance).min().unwrap();
        assert!(max_conductance - min_conductance <= Siemens(1.0));
        assert_eq!(modules[0].total_conductance(), Siemens(7.5));
        assert_eq!(modules[1].total_conductance(), Siemens(7.5));

        let statistics = ModuleStatistics::try_from(modules.as_slice())?;
        assert_eq!(format!("{:.4}", statistics.relative_spread()), "0.0000");
        assert_abs_diff_eq!(statistics.average.0, 1.0 / 7.5, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn rejected_values_never_reach_modules() -> Result {
        let cells = ["0.012", "0", "-0.5", "0.013", "0.011", "0.014"]
            .into_iter()
            .enumerate()
            .filter_map(|(rank, field)| Cell::try_parse(format!("{rank}"), Some(field), rank).ok())
            .collect_vec();
        assert_eq!(cells.len(), 4);
        let modules = assemble(Selection::select(cells, 4)?.cells, layout(2, 2)?)?;
        let ranks = modules.iter().flat_map(member_ranks).sorted().collect_vec();
        assert_eq!(ranks, [0, 3, 4, 5]);
        Ok(())
    }
}
