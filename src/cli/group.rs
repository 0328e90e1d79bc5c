use std::path::PathBuf;

use clap::Parser;

use crate::{
    core::{assembly::assemble, layout::Layout, selection::Selection},
    prelude::*,
    records::{
        assignment::{self, RowOrder},
        cells::{CellRecords, Columns},
    },
    statistics::ModuleStatistics,
    tables::build_modules_table,
};

#[derive(Parser)]
pub struct GroupArgs {
    /// Cell characterization results.
    #[clap(long, env = "INPUT")]
    input: PathBuf,

    /// Module assignment output.
    #[clap(long, env = "OUTPUT", default_value = "modules.csv")]
    output: PathBuf,

    /// Number of modules in series.
    #[clap(long, env = "SERIES")]
    series: usize,

    /// Number of cells in parallel per module.
    #[clap(long, env = "PARALLEL")]
    parallel: usize,

    /// Order the output rows as the input instead of grouping them by module.
    #[clap(long, env = "SORT_INPUT")]
    sort_input: bool,

    /// Zero-based position of the serial number field.
    #[clap(long, env = "SERIAL_COLUMN", default_value = "0")]
    serial_column: usize,

    /// Zero-based position of the internal resistance field, in ohms.
    #[clap(long, env = "RESISTANCE_COLUMN", default_value = "5")]
    resistance_column: usize,
}

impl GroupArgs {
    #[instrument(skip_all)]
    pub fn run(&self) -> Result {
        let layout = Layout::builder().series(self.series).parallel(self.parallel).build()?;
        let columns =
            Columns { serial_number: self.serial_column, resistance: self.resistance_column };

        let records = CellRecords::read(&self.input, columns)?;
        for rejection in &records.rejections {
            warn!("{rejection}");
        }
        info!(
            n_valid = records.cells.len(),
            n_rejected = records.rejections.len(),
            "read the cells",
        );

        let n_available = records.cells.len();
        let selection = Selection::select(records.cells, layout.n_cells())?;
        info!(
            n_selected = selection.cells.len(),
            n_available,
            n_skipped_low = selection.n_skipped_low,
            n_skipped_high = selection.n_skipped_high,
            "selected the cells",
        );

        let modules = assemble(selection.cells, layout)?;
        for module in &modules {
            debug!(
                id = module.id(),
                total_conductance = ?module.total_conductance(),
                recomputed_conductance = ?module.recompute_conductance(),
                "module",
            );
        }
        let statistics = ModuleStatistics::try_from(modules.as_slice())?;
        info!(%layout, "assembled the modules");

        let order = if self.sort_input { RowOrder::Input } else { RowOrder::Module };
        assignment::save(&self.output, &modules, order)?;
        info!(path = %self.output.display(), "saved the assignment");

        println!("{}", build_modules_table(&modules, statistics.average));
        println!("{statistics}");
        Ok(())
    }
}
