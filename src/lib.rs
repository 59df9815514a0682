//! `psd-pack` packs per-detector amplitude spectral density (ASD) text files
//! into a single LIGO-LW `psd.xml` document.
//!
//! Each requested detector file is read as `(frequency, amplitude)` samples,
//! squared into a power spectral density and resampled by log-log linear
//! interpolation onto the fixed 10 Hz to 4096 Hz, 1 Hz grid shared by every
//! series in the output. The document records the invoking command line as
//! provenance and is gzip-compressed when the output path ends in `.gz`.
//!
//! ```no_run
//! use psd_pack::{Detector, Packer, Provenance};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let doc = Packer::default()
//!     .provenance(Provenance::from_env())
//!     .source(Detector::H1, "aligo_asd.txt")
//!     .source(Detector::V1, "avirgo_asd.txt")
//!     .pack()?;
//! doc.write(Some("psd.xml.gz".as_ref()))?;
//! # Ok(())
//! # }
//! ```

pub mod asd;
pub mod detector;
mod error;
pub mod ligolw;
pub mod pack;
pub mod series;

pub use crate::asd::AsdSeries;
pub use crate::detector::{ColumnSelection, Detector, ObservingScenario};
pub use crate::error::Error;
pub use crate::ligolw::{Provenance, PsdDocument};
pub use crate::pack::Packer;
pub use crate::series::FrequencySeries;
