use std::path::{Path, PathBuf};

use crate::ledger::*;

pub fn simplify_file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// The entries of a directory, sorted by path.
pub fn list_entries(dir: &Path) -> PipelineResult<Vec<PathBuf>> {
    let path = dir.display().to_string();
    let mut entries: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(dir).context(ReadingDirSnafu { path: path.clone() })? {
        let entry = entry.context(ReadingDirSnafu { path: path.clone() })?;
        entries.push(entry.path());
    }
    entries.sort();
    Ok(entries)
}

/// Only regular `.txt` files are ledgers.
pub fn is_input_file(path: &Path) -> bool {
    path.is_file() && path.extension().map_or(false, |ext| ext == "txt")
}

/// `<output_dir>/<input file name with the new extension>`
pub fn output_path(output_dir: &Path, input: &Path, extension: &str) -> PathBuf {
    let file_name = simplify_file_name(input);
    output_dir.join(Path::new(&file_name).with_extension(extension))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_names() {
        assert_eq!(
            output_path(Path::new("out"), Path::new("in/Jane Doe.txt"), "json"),
            PathBuf::from("out/Jane Doe.json")
        );
        assert_eq!(
            output_path(Path::new("out"), Path::new("/tmp/11-5-2024.txt"), "csv"),
            PathBuf::from("out/11-5-2024.csv")
        );
    }

    #[test]
    fn only_txt_files_are_inputs() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "x").unwrap();
        fs::write(dir.path().join("b.TXT"), "x").unwrap();
        fs::write(dir.path().join("c.json"), "x").unwrap();
        fs::create_dir(dir.path().join("d.txt")).unwrap();
        let inputs: Vec<String> = list_entries(dir.path())
            .unwrap()
            .iter()
            .filter(|p| is_input_file(p))
            .map(|p| simplify_file_name(p))
            .collect();
        assert_eq!(inputs, vec!["a.txt"]);
    }
}
