//! Reading and writing the run's artifacts. Writers overwrite existing files.

use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use crate::{
    error::{PlacementErr, Result},
    generator::{FEATURES, LABEL, PlacementData, StudentRecord},
    model::ModelParams,
};

/// Creates `dir` and its parents, succeeding if it already exists.
pub fn ensure_dir(dir: impl AsRef<Path>) -> Result<()> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(PlacementErr::io(dir))
}

/// Writes the model document as JSON.
pub fn write_model(path: impl AsRef<Path>, model: &ModelParams) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(PlacementErr::io(path))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer(&mut writer, model)?;
    writer.flush().map_err(PlacementErr::io(path))?;

    log::info!("wrote model to {}", path.display());
    Ok(())
}

/// Reads a model document and checks its shape.
pub fn read_model(path: impl AsRef<Path>) -> Result<ModelParams> {
    let path = path.as_ref();
    let file = File::open(path).map_err(PlacementErr::io(path))?;

    let model: ModelParams = serde_json::from_reader(BufReader::new(file))?;
    model.validate()?;
    Ok(model)
}

/// Writes the table as CSV with a header row and no index column.
pub fn write_dataset(path: impl AsRef<Path>, data: &PlacementData) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)?;

    for record in data.records() {
        writer.serialize(record)?;
    }
    writer.flush().map_err(PlacementErr::io(path))?;

    log::info!("wrote {} rows to {}", data.len(), path.display());
    Ok(())
}

/// Reads a table written by `write_dataset`.
///
/// # Errors
/// Returns `PlacementErr::InvalidInput` if the header isn't the expected one, or a csv error if
/// a row doesn't parse.
pub fn read_dataset(path: impl AsRef<Path>) -> Result<PlacementData> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)?;

    let expected: Vec<&str> = FEATURES.iter().copied().chain([LABEL]).collect();
    let header = reader.headers()?;
    if header.iter().ne(expected.iter().copied()) {
        return Err(PlacementErr::InvalidInput(format!(
            "{} has header {:?}, expected {:?}",
            path.display(),
            header,
            expected
        )));
    }

    let records = reader
        .deserialize::<StudentRecord>()
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(PlacementData::new(records))
}
