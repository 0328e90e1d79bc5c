use tracing::{debug, instrument};

use crate::core::{cell::Cell, error::Error};

/// Cells picked from the middle of the population ranked by resistance.
#[must_use]
#[derive(Debug)]
pub struct Selection {
    /// Selected cells, ordered by resistance ascending.
    pub cells: Vec<Cell>,

    /// Number of the lowest-resistance cells left out.
    pub n_skipped_low: usize,

    /// Number of the highest-resistance cells left out.
    pub n_skipped_high: usize,
}

impl Selection {
    /// Rank the cells by resistance and trim the excess symmetrically from both tails.
    ///
    /// When the excess is odd, the extra cell is trimmed from the high-resistance tail.
    /// Cells with equal resistance keep their relative input order.
    #[instrument(skip_all, fields(n_available = cells.len(), n_required = n_required))]
    pub fn select(mut cells: Vec<Cell>, n_required: usize) -> Result<Self, Error> {
        let n_available = cells.len();
        let Some(excess) = n_available.checked_sub(n_required) else {
            return Err(Error::InsufficientPopulation {
                available: n_available,
                required: n_required,
            });
        };

        cells.sort_by_key(Cell::resistance);

        let n_skipped_low = excess / 2;
        let n_skipped_high = excess - n_skipped_low;
        cells.truncate(n_skipped_low + n_required);
        cells.drain(..n_skipped_low);

        debug!(n_skipped_low, n_skipped_high, "selected");
        Ok(Self { cells, n_skipped_low, n_skipped_high })
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;
    use crate::{prelude::Result, quantity::resistance::Ohms};

    fn population(resistances: &[f64]) -> Result<Vec<Cell>> {
        Ok(resistances
            .iter()
            .enumerate()
            .map(|(rank, resistance)| Cell::try_new(format!("{rank}"), Ohms(*resistance), rank))
            .collect::<Result<_, _>>()?)
    }

    fn serial_numbers(cells: &[Cell]) -> Vec<&str> {
        cells.iter().map(Cell::serial_number).collect()
    }

    #[test]
    fn trims_both_tails() -> Result {
        let cells = population(&[5.0, 1.0, 4.0, 2.0, 7.0, 3.0, 6.0])?;
        let selection = Selection::select(cells, 4)?;
        assert_eq!(selection.n_skipped_low, 1);
        assert_eq!(selection.n_skipped_high, 2);
        assert_eq!(serial_numbers(&selection.cells), ["3", "5", "2", "0"]);
        Ok(())
    }

    #[test]
    fn exact_population_is_identity() -> Result {
        let cells = population(&[1.0, 2.0, 3.0])?;
        let selection = Selection::select(cells, 3)?;
        assert_eq!((selection.n_skipped_low, selection.n_skipped_high), (0, 0));
        assert_eq!(serial_numbers(&selection.cells), ["0", "1", "2"]);
        Ok(())
    }

    #[test]
    fn insufficient_population() -> Result {
        let cells = population(&[1.0, 2.0, 3.0])?;
        let error = Selection::select(cells, 4).unwrap_err();
        assert!(matches!(error, Error::InsufficientPopulation { available: 3, required: 4 }));
        assert_eq!(error.to_string(), "not enough cells: 3 valid, 4 required");
        Ok(())
    }

    #[test]
    fn ties_keep_input_order() -> Result {
        let cells = population(&[2.0, 1.0, 2.0, 1.0, 2.0])?;
        let selection = Selection::select(cells, 5)?;
        assert_eq!(serial_numbers(&selection.cells), ["1", "3", "0", "2", "4"]);
        Ok(())
    }

    #[test]
    fn selected_count_matches_requirement() -> Result {
        for n_available in 16_u32..=25 {
            let resistances = (0..n_available).map(|i| f64::from(i % 7 + 1)).collect_vec();
            let selection = Selection::select(population(&resistances)?, 16)?;
            let excess = usize::try_from(n_available)? - 16;
            assert_eq!(selection.cells.len(), 16);
            assert_eq!(selection.n_skipped_low, excess / 2);
            assert_eq!(selection.n_skipped_high, excess - excess / 2);
        }
        Ok(())
    }
}
