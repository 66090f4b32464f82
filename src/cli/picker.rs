//! Interactive rig-file picker.
//!
//! clap handles structured flags/subcommands; the picker provides the
//! "run `rig` and choose a file" UX. It searches the current working directory
//! for files with a rig-export extension.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::error::AppError;

/// Default directory recursion depth.
const DEFAULT_SEARCH_DEPTH: usize = 4;

/// Extensions the instrument software writes.
const RIG_EXTENSIONS: [&str; 3] = ["csv", "txt", "dat"];

/// Prompt the user to select a rig file from the current directory tree.
///
/// Accepts a number from the list or an explicit path; `q` cancels.
pub fn prompt_for_input_path() -> Result<PathBuf, AppError> {
    let files = discover_rig_files(Path::new("."));
    if files.is_empty() {
        return Err(AppError::io(
            "No .csv/.txt/.dat files found. Provide one with `rig tui <file>`.",
        ));
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    choose_from(&files, &mut stdin.lock(), &mut stdout)
}

fn choose_from(files: &[PathBuf], input: &mut impl BufRead, out: &mut impl Write) -> Result<PathBuf, AppError> {
    let write_err = |e: io::Error| AppError::io(format!("Failed to write prompt: {e}"));

    writeln!(out, "Found {} rig file(s):", files.len()).map_err(write_err)?;
    for (idx, path) in files.iter().enumerate() {
        writeln!(out, "{:>3}) {}", idx + 1, pretty_path(path)).map_err(write_err)?;
    }

    loop {
        write!(out, "Select a file by number (1-{}) or type a path (q to quit): ", files.len())
            .map_err(write_err)?;
        out.flush().map_err(write_err)?;

        let mut line = String::new();
        let bytes = input
            .read_line(&mut line)
            .map_err(|e| AppError::io(format!("Failed to read input: {e}")))?;
        if bytes == 0 {
            return Err(AppError::io("No input received. Provide a path with `rig tui <file>`."));
        }

        let line = line.trim();
        if line.eq_ignore_ascii_case("q") {
            return Err(AppError::io("Canceled."));
        }

        if let Ok(choice) = line.parse::<usize>() {
            if (1..=files.len()).contains(&choice) {
                return validate_input_path(&files[choice - 1]);
            }
            writeln!(out, "Invalid choice: {choice}. Enter a number between 1 and {}.", files.len())
                .map_err(write_err)?;
            continue;
        }

        match validate_input_path(Path::new(line)) {
            Ok(path) => return Ok(path),
            Err(err) => writeln!(out, "{err}").map_err(write_err)?,
        }
    }
}

/// Validate that `path` is an existing regular file.
pub fn validate_input_path(path: &Path) -> Result<PathBuf, AppError> {
    if !path.exists() {
        return Err(AppError::io(format!("File not found: {}", path.display())));
    }
    if path.is_dir() {
        return Err(AppError::io(format!(
            "Expected a file, got a directory: {}",
            path.display()
        )));
    }
    Ok(path.to_path_buf())
}

/// Discover rig files under `root` (deterministic order).
pub fn discover_rig_files(root: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    find_rig_files_inner(root, 0, DEFAULT_SEARCH_DEPTH, &mut out);
    out.sort_by_key(|p| pretty_path(p));
    out
}

fn find_rig_files_inner(root: &Path, depth: usize, max_depth: usize, out: &mut Vec<PathBuf>) {
    if depth > max_depth {
        return;
    }

    let Ok(entries) = fs::read_dir(root) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };

        if file_type.is_dir() {
            if !should_skip_dir(&path) {
                find_rig_files_inner(&path, depth + 1, max_depth, out);
            }
            continue;
        }

        if file_type.is_file() && has_rig_extension(&path) {
            out.push(path);
        }
    }
}

fn has_rig_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| RIG_EXTENSIONS.iter().any(|r| ext.eq_ignore_ascii_case(r)))
}

fn should_skip_dir(path: &Path) -> bool {
    let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("");
    matches!(name, ".git" | "target" | "node_modules" | "debug")
}

pub fn pretty_path(path: &Path) -> String {
    let stripped = path.strip_prefix("./").unwrap_or(path);
    stripped.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discovers_rig_extensions_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.TXT"), "").unwrap();
        fs::write(dir.path().join("a.csv"), "").unwrap();
        fs::write(dir.path().join("notes.md"), "").unwrap();
        fs::create_dir(dir.path().join("target")).unwrap();
        fs::write(dir.path().join("target").join("c.dat"), "").unwrap();

        let found = discover_rig_files(dir.path());
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.csv", "b.TXT"]);
    }

    #[test]
    fn prompt_retries_until_valid_choice() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("run.dat");
        fs::write(&file, "").unwrap();
        let files = vec![file.clone()];

        let mut input = io::Cursor::new("7\n1\n");
        let mut out = Vec::new();
        let chosen = choose_from(&files, &mut input, &mut out).unwrap();
        assert_eq!(chosen, file);
        assert!(String::from_utf8(out).unwrap().contains("Invalid choice: 7"));
    }

    #[test]
    fn prompt_cancel_and_eof() {
        let files = vec![PathBuf::from("x.csv")];
        assert!(choose_from(&files, &mut io::Cursor::new("q\n"), &mut Vec::new()).is_err());
        assert!(choose_from(&files, &mut io::Cursor::new(""), &mut Vec::new()).is_err());
    }
}
