//! Class names of the deployed model.
//!
//! The model's output index `i` refers to the `i`-th name in *sorted* order,
//! whatever the order of the file on disk. `ClassNames` sorts on
//! construction and is immutable afterwards; share it behind an `Arc`.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassNames {
    names: Vec<String>,
}

impl ClassNames {
    /// Build from names in any order
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
        names.sort();
        ClassNames { names }
    }

    /// One name per line, line terminators stripped. Every line counts,
    /// including blank ones, since dropping a line would shift all the
    /// indices after it
    pub fn from_reader<R: BufRead>(reader: R) -> io::Result<Self> {
        let names = reader.lines().collect::<io::Result<Vec<String>>>()?;
        if names.iter().any(|name| name.is_empty()) {
            warn!("class names file contains blank lines");
        }
        Ok(ClassNames::new(names))
    }

    /// Load the class names file at `path`
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("failed to open class names file {}", path.display()))?;
        let classes = ClassNames::from_reader(BufReader::new(file))
            .with_context(|| format!("failed to read class names file {}", path.display()))?;
        info!("loaded {} class names from {}", classes.len(), path.display());
        Ok(classes)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    #[test]
    fn sorted_regardless_of_input_order() {
        let a = ClassNames::new(["sigma", "alpha", "beta"]);
        let b = ClassNames::new(["beta", "sigma", "alpha"]);
        assert_eq!(a, b);
        assert_eq!(a.as_slice(), ["alpha", "beta", "sigma"]);
    }

    #[test]
    fn sorts_by_code_point() {
        // Uppercase sorts before lowercase, `_` sits between them
        let names = ClassNames::new(["b", "A", "_x", "a", "B"]);
        assert_eq!(names.as_slice(), ["A", "B", "_x", "a", "b"]);
    }

    #[test]
    fn reader_strips_line_terminators() {
        let names = ClassNames::from_reader(Cursor::new("zeta\r\nalpha\nmu\n")).unwrap();
        assert_eq!(names.as_slice(), ["alpha", "mu", "zeta"]);
        assert_eq!(names.get(1), Some("mu"));
        assert_eq!(names.get(3), None);
    }

    #[test]
    fn blank_lines_keep_their_slot() {
        let names = ClassNames::from_reader(Cursor::new("b\n\na\n")).unwrap();
        assert_eq!(names.as_slice(), ["", "a", "b"]);
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "integral\nalpha\nsum\n").unwrap();
        let names = ClassNames::load(file.path()).unwrap();
        assert_eq!(names.len(), 3);
        assert_eq!(names.get(0), Some("alpha"));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(ClassNames::load("/definitely/not/here.txt").is_err());
    }
}
