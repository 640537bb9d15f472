use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::{fs, io};

use crate::error::MarkovError;
use crate::model::snapshot::Snapshot;

/// Reads a text file and returns its non-blank lines.
///
/// - Reads the entire file into memory
/// - Splits on `\n` / `\r\n`
pub(crate) fn read_file<P: AsRef<Path>>(filename: P) -> io::Result<Vec<String>> {
	let mut contents = String::new();
	File::open(filename)?.read_to_string(&mut contents)?;
	Ok(contents
		.lines()
		.filter(|line| !line.trim().is_empty())
		.map(str::to_owned)
		.collect())
}

/// Builds an output path based on an input path and a new extension.
///
/// Example:
/// `data/input.txt` + `"bin"` → `data/input.bin`
pub(crate) fn build_output_path<P: AsRef<Path>>(
	input_path: P,
	output_extension: &str,
) -> io::Result<PathBuf> {
	let input_path = input_path.as_ref();

	let parent = input_path.parent().unwrap_or_else(|| Path::new("."));
	let file_stem = input_path
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Input path has no filename"))?;

	let mut output = PathBuf::from(parent);
	output.push(file_stem);
	output.set_extension(output_extension);

	Ok(output)
}

fn is_json<P: AsRef<Path>>(path: P) -> bool {
	path.as_ref().extension() == Some(std::ffi::OsStr::new("json"))
}

/// Writes a snapshot: JSON for `.json` paths, postcard otherwise.
pub fn save_snapshot<P: AsRef<Path>>(snapshot: &Snapshot, path: P) -> Result<(), MarkovError> {
	if is_json(&path) {
		fs::write(path, snapshot.to_json()?)?;
	} else {
		fs::write(path, snapshot.to_bytes()?)?;
	}
	Ok(())
}

/// Reads a snapshot written by [`save_snapshot`].
pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<Snapshot, MarkovError> {
	if is_json(&path) {
		Snapshot::from_json(&fs::read_to_string(path)?)
	} else {
		Snapshot::from_bytes(&fs::read(path)?)
	}
}
