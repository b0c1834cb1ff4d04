use crate::{catalogue::CellPreset, prelude::*, tables::build_catalogue_table};

/// Print the built-in cells.
pub fn cells() -> Result {
    let cells = CellPreset::BUILT_IN
        .into_iter()
        .map(|preset| Ok((preset.key(), preset.resolve(None)?)))
        .collect::<Result<Vec<_>>>()?;
    println!("{}", build_catalogue_table(&cells));
    Ok(())
}
