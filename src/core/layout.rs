use std::fmt::{Display, Formatter};

use bon::bon;

use crate::prelude::*;

/// Pack topology: `series` modules of `parallel` cells each.
#[must_use]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Layout {
    /// Number of modules in the series string.
    pub series: usize,

    /// Number of cells per module.
    pub parallel: usize,
}

#[bon]
impl Layout {
    #[builder]
    pub fn new(series: usize, parallel: usize) -> Result<Self> {
        ensure!(series != 0, "at least one module in series is required");
        ensure!(parallel != 0, "at least one cell in parallel is required");
        ensure!(
            series.checked_mul(parallel).is_some(),
            "{series}S{parallel}P overflows the cell count",
        );
        Ok(Self { series, parallel })
    }
}

impl Layout {
    /// Total number of cells in the pack.
    pub const fn n_cells(self) -> usize {
        self.series * self.parallel
    }
}

impl Display for Layout {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}S{}P", self.series, self.parallel)
    }
}
