use std::{fs::File, io::Read, path::Path};

use csv::{ReaderBuilder, StringRecord};

use crate::{
    core::{
        cell::Cell,
        error::{Error as CellError, Rejection},
    },
    prelude::*,
};

/// Field positions in the cell characterization records.
#[derive(Copy, Clone, Debug)]
pub struct Columns {
    pub serial_number: usize,
    pub resistance: usize,
}

impl Default for Columns {
    /// Layout of the measurement results file: the DCIR mean is the 6th field.
    fn default() -> Self {
        Self { serial_number: 0, resistance: 5 }
    }
}

/// Cell population read from a CSV dataset.
#[must_use]
#[derive(Debug)]
pub struct CellRecords {
    /// Valid cells in the input order.
    pub cells: Vec<Cell>,

    /// [`CellError::RecordRejected`] for every excluded record.
    pub rejections: Vec<CellError>,
}

impl CellRecords {
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn read(path: &Path, columns: Columns) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("failed to open `{}`", path.display()))?;
        Self::from_reader(file, columns)
            .with_context(|| format!("failed to read the cells from `{}`", path.display()))
    }

    /// Read the records, skipping the header row.
    pub fn from_reader<R: Read>(reader: R, columns: Columns) -> Result<Self> {
        let mut reader = ReaderBuilder::new().has_headers(true).flexible(true).from_reader(reader);
        let mut cells = Vec::new();
        let mut rejections = Vec::new();

        for (origin_rank, record) in reader.records().enumerate() {
            let record = record?;
            let line = match record.position() {
                Some(position) => usize::try_from(position.line())?,
                None => origin_rank + 2,
            };
            match Self::parse(&record, columns, origin_rank) {
                Ok(cell) => cells.push(cell),
                Err(reason) => rejections.push(CellError::RecordRejected { line, reason }),
            }
        }

        debug!(n_cells = cells.len(), n_rejections = rejections.len(), "read");
        Ok(Self { cells, rejections })
    }

    fn parse(
        record: &StringRecord,
        columns: Columns,
        origin_rank: usize,
    ) -> Result<Cell, Rejection> {
        let serial_number = record
            .get(columns.serial_number)
            .map(str::trim)
            .filter(|serial_number| !serial_number.is_empty())
            .ok_or(Rejection::MissingSerialNumber)?;
        Cell::try_parse(serial_number, record.get(columns.resistance), origin_rank)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::quantity::resistance::Ohms;

    // language=csv
    const RESULTS: &str = "\
Serial Number,OCV (V),R0 (Ohm),R0 Charge (Ohm),R0 Discharge (Ohm),DCIR (Ohm),DCIR Charge (Ohm),DCIR Discharge (Ohm)
1A01,3.61,0.011,0.010,0.012,0.0150,0.0148,0.0152
1A02,3.60,0.012,0.011,0.013,0,0.0,0.0
1A03,3.62,0.010,0.010,0.010,-0.01,0.0,0.0
1A04,3.59,0.013,0.012,0.014,n/a,0.0,0.0
1A05,3.61
1A06,3.60,0.011,0.011,0.011,0.0161,0.0160,0.0162
";

    #[test]
    fn read_ok() -> Result {
        let records = CellRecords::from_reader(RESULTS.as_bytes(), Columns::default())?;

        assert_eq!(records.cells.len(), 2);
        assert_eq!(records.cells[0].serial_number(), "1A01");
        assert_eq!(records.cells[0].resistance(), Ohms(0.015));
        assert_eq!(records.cells[0].origin_rank(), 0);
        assert_eq!(records.cells[1].serial_number(), "1A06");
        assert_eq!(records.cells[1].origin_rank(), 5);

        let rejections = records
            .rejections
            .iter()
            .map(|rejection| match rejection {
                CellError::RecordRejected { line, reason } => Ok((*line, reason.clone())),
                _ => bail!("unexpected error: {rejection}"),
            })
            .collect::<Result<Vec<_>>>()?;
        assert_eq!(
            rejections,
            [
                (3, Rejection::NonPositiveResistance(Ohms(0.0))),
                (4, Rejection::NonPositiveResistance(Ohms(-0.01))),
                (5, Rejection::InvalidResistance("n/a".to_string())),
                (6, Rejection::MissingResistance),
            ],
        );
        Ok(())
    }

    #[test]
    fn custom_columns() -> Result {
        let data = "serial,dcir\nX1,0.02\nX2,0.03\n";
        let columns = Columns { serial_number: 0, resistance: 1 };
        let records = CellRecords::from_reader(data.as_bytes(), columns)?;
        assert_eq!(records.cells.len(), 2);
        assert!(records.rejections.is_empty());
        Ok(())
    }

    #[test]
    fn missing_serial_number() -> Result {
        let data = "serial,dcir\n,0.02\n";
        let columns = Columns { serial_number: 0, resistance: 1 };
        let records = CellRecords::from_reader(data.as_bytes(), columns)?;
        assert!(records.cells.is_empty());
        assert!(matches!(
            records.rejections[..],
            [CellError::RecordRejected { line: 2, reason: Rejection::MissingSerialNumber }],
        ));
        Ok(())
    }

    #[test]
    fn header_only() -> Result {
        let records = CellRecords::from_reader("a,b,c,d,e,f\n".as_bytes(), Columns::default())?;
        assert!(records.cells.is_empty());
        assert!(records.rejections.is_empty());
        Ok(())
    }

    #[test]
    fn read_file_with_bom() -> Result {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all("\u{feff}Serial Number,DCIR (Ohm)\n1A01,0.015\n".as_bytes())?;
        let records = CellRecords::read(file.path(), Columns { serial_number: 0, resistance: 1 })?;
        assert_eq!(records.cells.len(), 1);
        assert_eq!(records.cells[0].serial_number(), "1A01");
        Ok(())
    }

    #[test]
    fn missing_file_fails() {
        let result = CellRecords::read(Path::new("/nonexistent/cells.csv"), Columns::default());
        assert!(result.is_err());
    }
}
