use std::{fs::File, io::stdout, path::PathBuf};

use clap::Parser;

use crate::{labels::Grid, prelude::*};

#[derive(Parser)]
pub struct LabelsArgs {
    #[clap(long = "boxes", env = "LABEL_BOXES", default_value = "3")]
    n_boxes: usize,

    /// Lettered rows per box.
    #[clap(long = "rows", env = "LABEL_ROWS", default_value = "10")]
    n_rows: usize,

    #[clap(long = "columns", env = "LABEL_COLUMNS", default_value = "13")]
    n_columns: usize,

    /// Output file, standard output if omitted.
    #[clap(long, env = "LABELS_PATH")]
    output: Option<PathBuf>,
}

impl LabelsArgs {
    #[instrument(
        skip_all,
        fields(n_boxes = self.n_boxes, n_rows = self.n_rows, n_columns = self.n_columns),
    )]
    pub fn run(&self) -> Result {
        let grid = Grid { n_boxes: self.n_boxes, n_rows: self.n_rows, n_columns: self.n_columns };
        match &self.output {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("failed to create `{}`", path.display()))?;
                grid.write(file)?;
                info!(path = %path.display(), "saved the labels");
            }
            None => grid.write(stdout().lock())?,
        }
        Ok(())
    }
}
