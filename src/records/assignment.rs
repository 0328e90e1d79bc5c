use std::{fs::File, io::Write, path::Path};

use itertools::Itertools;
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::{core::module::Module, prelude::*};

/// Order of the rows in the assignment file, it does not affect the assignment itself.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum RowOrder {
    /// Grouped by module, cells in the order they have been assigned.
    #[default]
    Module,

    /// Same order as the cells appeared in the input.
    Input,
}

#[derive(Serialize)]
struct Row<'a> {
    #[serde(rename = "Module ID")]
    module_id: usize,

    #[serde(rename = "Serial Number")]
    serial_number: &'a str,

    #[serde(rename = "Cell DCIR (Ohm)")]
    cell_resistance: String,

    #[serde(rename = "Module Parallel DCIR (Ohm)")]
    module_resistance: String,

    #[serde(skip)]
    origin_rank: usize,
}

/// Write the module assignment of every cell.
#[instrument(skip_all, fields(path = %path.display(), ?order))]
pub fn save(path: &Path, modules: &[Module], order: RowOrder) -> Result {
    replace_file(path, |file| write(file, modules, order))
}

/// Write into a sibling temporary file and move it over `path` only when the write succeeded.
fn replace_file(path: &Path, fill: impl FnOnce(&mut File) -> Result) -> Result {
    let directory = path.parent().filter(|parent| !parent.as_os_str().is_empty());
    let mut file = NamedTempFile::new_in(directory.unwrap_or_else(|| Path::new(".")))
        .with_context(|| format!("failed to create a temporary file for `{}`", path.display()))?;
    fill(file.as_file_mut()).with_context(|| format!("failed to write `{}`", path.display()))?;
    file.persist(path).with_context(|| format!("failed to save `{}`", path.display()))?;
    Ok(())
}

pub fn write<W: Write>(writer: W, modules: &[Module], order: RowOrder) -> Result {
    let mut rows = modules
        .iter()
        .flat_map(|module| {
            let module_resistance =
                module.resistance().map_or_else(String::new, |resistance| {
                    format!("{:.6}", resistance.0)
                });
            module.members().iter().map(move |cell| Row {
                module_id: module.id(),
                serial_number: cell.serial_number(),
                cell_resistance: format!("{:.6}", cell.resistance().0),
                module_resistance: module_resistance.clone(),
                origin_rank: cell.origin_rank(),
            })
        })
        .collect_vec();
    if order == RowOrder::Input {
        rows.sort_by_key(|row| row.origin_rank);
    }

    let mut writer = csv::Writer::from_writer(writer);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
