use std::path::{Path, PathBuf};

/// Every `.json` file under the folder, sorted.
pub fn read_json_files(folder_path: &Path) -> Result<Vec<PathBuf>, std::io::Error> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(folder_path)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() {
            if path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        } else if path.is_dir() {
            files.extend(read_json_files(&path)?);
        }
    }

    files.sort();

    Ok(files)
}

#[cfg(test)]
mod tests {
    use std::env;

    use super::*;

    #[test]
    fn test_read_json_files() {
        let current_dir = env::current_dir().unwrap();
        let folder_path = current_dir.join("tests/fixtures/read_folder");
        let files = read_json_files(&folder_path).unwrap();

        assert_eq!(
            files,
            vec![
                current_dir.join("tests/fixtures/read_folder/file1.json"),
                current_dir.join("tests/fixtures/read_folder/subfolder1/file2.json"),
            ]
        );
    }
}
