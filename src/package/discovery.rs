use anyhow::Result;
use log::debug;
use std::path::Path;

use crate::runtime::Runtime;

/// List the entry names of a directory, sorted by name.
///
/// Both files and subdirectories are returned; entries whose names are not
/// valid UTF-8 are skipped.
#[tracing::instrument(skip(runtime))]
pub fn entry_names<R: Runtime>(runtime: &R, dir: &Path) -> Result<Vec<String>> {
    let mut names: Vec<String> = runtime
        .read_dir(dir)?
        .into_iter()
        .filter_map(|path| match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => Some(name.to_string()),
            None => {
                debug!("Skipping entry with a non UTF-8 name: {:?}", path);
                None
            }
        })
        .collect();
    names.sort();
    Ok(names)
}
