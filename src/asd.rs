use itertools::Itertools;
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

#[derive(Debug, thiserror::Error)]
pub enum AsdError {
    #[error("failed to open the ASD file")]
    Io(#[from] std::io::Error),
    #[error("line {line}: failed to parse {value:?} as a number")]
    Parse { line: usize, value: String },
    #[error("line {line}: expected {want} columns, found {found}")]
    Columns {
        line: usize,
        want: usize,
        found: usize,
    },
    #[error("no data rows found")]
    Empty,
    #[error("frequency axis is not strictly increasing at sample {index}")]
    Monotonic { index: usize },
}
type Result<T> = std::result::Result<T, AsdError>;

/// Amplitude spectral density read verbatim from a whitespace-delimited text
/// file, one `(frequency, amplitude)` sample per row
#[derive(Debug, Default, Clone)]
pub struct AsdSeries {
    pub frequency: Vec<f64>,
    pub amplitude: Vec<f64>,
}
impl AsdSeries {
    /// Two-column mode: exactly `(frequency, amplitude)` per row, no header
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load(path, 1, 0)
    }
    /// Selected-column mode: one header row skipped, frequency in column 0 and
    /// the amplitude in the requested column
    pub fn from_path_column<P: AsRef<Path>>(path: P, column: usize) -> Result<Self> {
        Self::load(path, column, 1)
    }
    fn load<P: AsRef<Path>>(path: P, column: usize, header_rows: usize) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        log::info!("Loading {:?}...", path.as_ref());
        let mut this = Self::default();
        for (k, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            let row = line.trim();
            if k < header_rows || row.is_empty() || row.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = row.split_whitespace().collect();
            // plain mode requires exactly two columns, selected mode only that
            // the requested column exists
            let want = if header_rows == 0 { 2 } else { column + 1 };
            if (header_rows == 0 && fields.len() != 2) || fields.len() < want {
                return Err(AsdError::Columns {
                    line: k + 1,
                    want,
                    found: fields.len(),
                });
            }
            let parse = |value: &str| {
                value.parse::<f64>().map_err(|_| AsdError::Parse {
                    line: k + 1,
                    value: value.to_string(),
                })
            };
            this.frequency.push(parse(fields[0])?);
            this.amplitude.push(parse(fields[column])?);
        }
        if this.frequency.is_empty() {
            return Err(AsdError::Empty);
        }
        if let Some((index, _)) = this
            .frequency
            .iter()
            .tuple_windows()
            .find_position(|(a, b)| b <= a)
        {
            return Err(AsdError::Monotonic { index: index + 1 });
        }
        Ok(this)
    }
    pub fn len(&self) -> usize {
        self.frequency.len()
    }
    pub fn is_empty(&self) -> bool {
        self.frequency.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn stage(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("psd-pack-asd-{}-{}", std::process::id(), name));
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn two_column() {
        let path = stage("plain.txt", "10.0 1e-23\n20.0 2e-23\n\n# trailer\n30.0 1.5e-23\n");
        let asd = AsdSeries::from_path(&path).unwrap();
        assert_eq!(asd.frequency, vec![10.0, 20.0, 30.0]);
        assert_eq!(asd.amplitude, vec![1e-23, 2e-23, 1.5e-23]);
    }
    #[test]
    fn two_column_rejects_extra_columns() {
        let path = stage("wide.txt", "10.0 1e-23 2e-23\n");
        assert!(matches!(
            AsdSeries::from_path(&path),
            Err(AsdError::Columns { found: 3, .. })
        ));
    }
    #[test]
    fn selected_column_skips_header() {
        let path = stage(
            "o5.txt",
            "freq O5aStrain O5bStrain O5cStrain\n10.0 1e-23 2e-23 3e-23\n20.0 4e-23 5e-23 6e-23\n",
        );
        let asd = AsdSeries::from_path_column(&path, 2).unwrap();
        assert_eq!(asd.frequency, vec![10.0, 20.0]);
        assert_eq!(asd.amplitude, vec![2e-23, 5e-23]);
    }
    #[test]
    fn missing_column() {
        let path = stage("narrow.txt", "freq O5aStrain\n10.0 1e-23\n");
        assert!(matches!(
            AsdSeries::from_path_column(&path, 4),
            Err(AsdError::Columns { want: 5, found: 2, .. })
        ));
    }
    #[test]
    fn bad_number() {
        let path = stage("garbled.txt", "10.0 1e-23\n20.0 not-a-number\n");
        match AsdSeries::from_path(&path) {
            Err(AsdError::Parse { line, value }) => {
                assert_eq!(line, 2);
                assert_eq!(value, "not-a-number");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }
    #[test]
    fn empty_file() {
        let path = stage("empty.txt", "# nothing here\n");
        assert!(matches!(AsdSeries::from_path(&path), Err(AsdError::Empty)));
    }
    #[test]
    fn unordered_frequencies() {
        let path = stage("shuffled.txt", "10.0 1e-23\n30.0 2e-23\n20.0 3e-23\n");
        assert!(matches!(
            AsdSeries::from_path(&path),
            Err(AsdError::Monotonic { index: 2 })
        ));
    }
}
