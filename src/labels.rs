//! Serial number labels for the cells stored in grid boxes.

use std::io::Write;

use serde::Serialize;

use crate::prelude::*;

/// Label of a single cell slot.
#[must_use]
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Label {
    /// Running number of the label, starting with one.
    #[serde(rename = "Count")]
    pub count: usize,

    #[serde(rename = "Box")]
    pub box_number: usize,

    #[serde(rename = "Row")]
    pub row: char,

    /// Zero-padded column number.
    #[serde(rename = "Column")]
    pub column: String,

    /// `{box}{row}{column}`, for example, `2C07`.
    #[serde(rename = "Serial")]
    pub serial_number: String,
}

/// Dimensions of the storage boxes.
#[derive(Copy, Clone, Debug)]
pub struct Grid {
    pub n_boxes: usize,

    /// Rows are lettered, hence there may be 26 at most.
    pub n_rows: usize,

    pub n_columns: usize,
}

impl Grid {
    /// Enumerate the slots box by box, row by row.
    pub fn labels(self) -> Result<impl Iterator<Item = Label>> {
        ensure!(self.n_rows <= 26, "at most 26 lettered rows are supported, got {}", self.n_rows);
        let labels = (1..=self.n_boxes)
            .flat_map(move |box_number| {
                ('A'..='Z').take(self.n_rows).flat_map(move |row| {
                    (1..=self.n_columns).map(move |column| (box_number, row, column))
                })
            })
            .enumerate()
            .map(|(index, (box_number, row, column))| {
                let column = format!("{column:02}");
                let serial_number = format!("{box_number}{row}{column}");
                Label { count: index + 1, box_number, row, column, serial_number }
            });
        Ok(labels)
    }

    /// Write the labels as CSV.
    pub fn write<W: Write>(self, writer: W) -> Result {
        let mut writer = csv::Writer::from_writer(writer);
        for label in self.labels()? {
            writer.serialize(label)?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;

    #[test]
    fn labels_ok() -> Result {
        let labels = Grid { n_boxes: 3, n_rows: 10, n_columns: 13 }.labels()?.collect_vec();
        assert_eq!(labels.len(), 390);
        assert_eq!(
            labels[0],
            Label {
                count: 1,
                box_number: 1,
                row: 'A',
                column: "01".to_string(),
                serial_number: "1A01".to_string(),
            },
        );
        assert_eq!(labels[13].serial_number, "1B01");
        assert_eq!(labels[130].serial_number, "2A01");
        assert_eq!(labels[389].serial_number, "3J13");
        assert_eq!(labels[389].count, 390);
        Ok(())
    }

    #[test]
    fn too_many_rows() {
        assert!(Grid { n_boxes: 1, n_rows: 27, n_columns: 1 }.labels().is_err());
    }

    #[test]
    fn write_ok() -> Result {
        let mut buffer = Vec::new();
        Grid { n_boxes: 1, n_rows: 2, n_columns: 2 }.write(&mut buffer)?;
        // language=csv
        let expected = "\
Count,Box,Row,Column,Serial
1,1,A,01,1A01
2,1,A,02,1A02
3,1,B,01,1B01
4,1,B,02,1B02
";
        assert_eq!(String::from_utf8(buffer)?, expected);
        Ok(())
    }
}
