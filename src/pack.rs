use std::path::{Path, PathBuf};

use strum::IntoEnumIterator;

use crate::{
    asd::AsdSeries,
    detector::{ColumnSelection, Detector, ObservingScenario},
    error::Error,
    ligolw::{Provenance, PsdDocument},
    series::FrequencySeries,
};

/// Builder assembling a [`PsdDocument`] from per-detector ASD files.
///
/// Detectors are processed in canonical registry order; a detector appears in
/// the document iff a source was given for it. The first failing file aborts
/// the whole pack.
#[derive(Debug, Default)]
pub struct Packer {
    sources: Vec<(Detector, PathBuf, Option<usize>)>,
    scenario: Option<ObservingScenario>,
    provenance: Provenance,
}
impl Packer {
    /// Observing-scenario column preset, applied to the detectors it is
    /// defined for
    pub fn scenario(self, scenario: ObservingScenario) -> Self {
        Self {
            scenario: Some(scenario),
            ..self
        }
    }
    pub fn provenance(self, provenance: Provenance) -> Self {
        Self { provenance, ..self }
    }
    /// ASD file for one detector
    pub fn source<P: AsRef<Path>>(mut self, detector: Detector, path: P) -> Self {
        self.sources
            .push((detector, path.as_ref().to_path_buf(), None));
        self
    }
    /// ASD file for one detector, amplitude taken from an explicit column
    pub fn source_with_column<P: AsRef<Path>>(
        mut self,
        detector: Detector,
        path: P,
        column: usize,
    ) -> Self {
        self.sources
            .push((detector, path.as_ref().to_path_buf(), Some(column)));
        self
    }
    pub fn pack(self) -> Result<PsdDocument, Error> {
        let mut doc = PsdDocument::new(self.provenance.clone());
        for detector in Detector::iter() {
            let source = self.sources.iter().find(|(d, ..)| *d == detector);
            if let Some((_, path, column)) = source {
                let selection = ColumnSelection::resolve(detector, *column, self.scenario);
                let asd = match selection {
                    Some(selection) => AsdSeries::from_path_column(path, selection.column())?,
                    None => AsdSeries::from_path(path)?,
                };
                let name = path
                    .file_stem()
                    .and_then(|stem| stem.to_str())
                    .unwrap_or("psd")
                    .to_string();
                let series = FrequencySeries::from_asd(name, &asd)?;
                log::info!(
                    "{}: {} ASD samples resampled onto {} grid points",
                    detector,
                    asd.len(),
                    series.len()
                );
                doc.insert(detector, series);
            }
        }
        Ok(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs::File, io::Write, path::PathBuf};

    fn stage(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("psd-pack-pack-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }
    fn o5_file(name: &str) -> PathBuf {
        stage(
            name,
            "freq O5aStrain O5bStrain O5cStrain\n\
             5.0 1e-23 2e-23 3e-23\n\
             100.0 4e-24 5e-24 6e-24\n\
             5000.0 7e-24 8e-24 9e-24\n",
        )
    }

    #[test]
    fn absent_detectors_stay_absent() {
        let path = stage("v1.txt", "5.0 1e-23\n5000.0 2e-23\n");
        let doc = Packer::default()
            .source(Detector::V1, &path)
            .pack()
            .unwrap();
        assert_eq!(doc.instruments().collect::<Vec<_>>(), vec!["V1"]);
    }
    #[test]
    fn scenario_matches_explicit_column() {
        let path = o5_file("o5-h1.txt");
        let by_scenario = Packer::default()
            .scenario(ObservingScenario::O5a)
            .source(Detector::H1, &path)
            .pack()
            .unwrap();
        let by_column = Packer::default()
            .source_with_column(Detector::H1, &path, 1)
            .pack()
            .unwrap();
        assert_eq!(
            by_scenario.get("H1").unwrap().data,
            by_column.get("H1").unwrap().data
        );
    }
    #[test]
    fn scenario_ignored_outside_ligo_4k() {
        // a two-column file for V1 still reads in plain mode under --config
        let v1 = stage("v1-plain.txt", "5.0 1e-23\n5000.0 2e-23\n");
        let doc = Packer::default()
            .scenario(ObservingScenario::O5c)
            .source(Detector::V1, &v1)
            .pack()
            .unwrap();
        assert_eq!(doc.len(), 1);
    }
    #[test]
    fn series_named_after_file_stem() {
        let path = stage("aligo_O5.txt", "5.0 1e-23\n5000.0 2e-23\n");
        let doc = Packer::default()
            .source(Detector::L1, &path)
            .pack()
            .unwrap();
        assert_eq!(doc.get("L1").unwrap().name, "aligo_O5");
    }
    #[test]
    fn bad_column_aborts_the_pack() {
        let path = o5_file("o5-l1.txt");
        let result = Packer::default()
            .source_with_column(Detector::L1, &path, 7)
            .pack();
        assert!(result.is_err());
    }
}
