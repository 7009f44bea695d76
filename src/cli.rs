//! Offline renderings of the two upload flows.

use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::core::MergeError;
use crate::pipeline::{
    Export, InputMode, RawFile, combine_files, combined_export, filter_by_mpan, filtered_export,
};

pub fn read_raw_files(paths: &[PathBuf]) -> Result<Vec<RawFile>, MergeError> {
    paths
        .iter()
        .map(|path| {
            let bytes = std::fs::read(path)
                .map_err(|e| MergeError::IoError(format!("reading {}: {}", path.display(), e)))?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            Ok(RawFile::new(name, bytes))
        })
        .collect()
}

/// Combines headed CSV files into `output`. Returns the number of rows written.
pub fn combine(files: &[PathBuf], output: &Path) -> Result<usize, MergeError> {
    let combined = combine_files(read_raw_files(files)?, InputMode::WithHeader);
    let table = combined.table?;
    write_export(&combined_export(&table)?, output)?;
    Ok(table.num_rows())
}

/// Combines headerless MPAN files and writes the rows of `mpan`.
///
/// Writes to `output`, or to `<MPAN>_filtered.xlsx` in the working
/// directory. Returns the number of rows written.
pub fn filter(mpan: &str, files: &[PathBuf], output: Option<&Path>) -> Result<usize, MergeError> {
    if mpan.is_empty() {
        return Err(MergeError::EmptyQuery);
    }
    let combined = combine_files(read_raw_files(files)?, InputMode::Headerless);
    let table = combined.table?;
    let filtered = filter_by_mpan(&table, mpan)?;
    if filtered.is_empty() {
        warn!("{}", MergeError::NoMatch(mpan.to_string()));
        return Err(MergeError::NoMatch(mpan.to_string()));
    }

    let export = filtered_export(&filtered, mpan)?;
    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&export.file_name));
    write_export(&export, &path)?;
    Ok(filtered.num_rows())
}

fn write_export(export: &Export, path: &Path) -> Result<(), MergeError> {
    std::fs::write(path, &export.bytes)
        .map_err(|e| MergeError::IoError(format!("writing {}: {}", path.display(), e)))?;
    info!("wrote {} ({} bytes)", path.display(), export.bytes.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_combine_writes_workbook() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "a.csv", "a,b,c,d\n1,2,3,4\n");
        let b = write(&dir, "b.csv", "a,b,c,d\n5,6,7,8\n9,10,11,12\n");
        let out = dir.path().join("combined_data.xlsx");

        assert_eq!(combine(&[a, b], &out), Ok(3));
        assert!(std::fs::metadata(&out).unwrap().len() > 0);
    }

    #[test]
    fn test_combine_without_valid_files() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "a.csv", "a,b,c\n1,2,3\n");
        let out = dir.path().join("combined_data.xlsx");

        assert_eq!(combine(&[a], &out), Err(MergeError::NoValidInput));
        assert!(!out.exists());
    }

    #[test]
    fn test_missing_input_file() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out.xlsx");
        let err = combine(&[dir.path().join("nope.csv")], &out);
        assert!(matches!(err, Err(MergeError::IoError(_))));
    }

    #[test]
    fn test_filter_writes_matching_rows() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "a.csv", "MPAN000,a,b,c\nMPAN001,d,e,f\n");
        let out = dir.path().join("MPAN001_filtered.xlsx");

        assert_eq!(filter("MPAN001", &[a], Some(out.as_path())), Ok(1));
        assert!(out.exists());
    }

    #[test]
    fn test_filter_no_match() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "a.csv", "MPAN000,a,b,c\n");
        let out = dir.path().join("x.xlsx");

        assert_eq!(
            filter("MPAN999", &[a], Some(out.as_path())),
            Err(MergeError::NoMatch("MPAN999".to_string()))
        );
        assert!(!out.exists());
    }

    #[test]
    fn test_filter_empty_key() {
        assert_eq!(filter("", &[], None), Err(MergeError::EmptyQuery));
    }
}
