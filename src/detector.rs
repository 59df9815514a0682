use std::{fmt, str::FromStr};
use strum_macros::EnumIter;

#[derive(Debug, thiserror::Error)]
pub enum DetectorError {
    #[error("detector prefix {0:?} is not recognized, expected G1, H1, H2, I1, K1, L1, T1 or V1")]
    Prefix(String),
    #[error(r#"observing scenario {0:?} is not recognized, expected "O5a", "O5b" or "O5c""#)]
    Scenario(String),
}
type Result<T> = std::result::Result<T, DetectorError>;

/// Gravitational-wave detector registry, iterated in canonical prefix order
#[derive(EnumIter, Clone, Copy, PartialEq, Eq, Debug)]
pub enum Detector {
    G1,
    H1,
    H2,
    I1,
    K1,
    L1,
    T1,
    V1,
}
impl Detector {
    /// Two-character frame prefix
    pub fn prefix(&self) -> &'static str {
        use Detector::*;
        match self {
            G1 => "G1",
            H1 => "H1",
            H2 => "H2",
            I1 => "I1",
            K1 => "K1",
            L1 => "L1",
            T1 => "T1",
            V1 => "V1",
        }
    }
    pub fn long_name(&self) -> &'static str {
        use Detector::*;
        match self {
            G1 => "GEO_600",
            H1 => "LHO_4k",
            H2 => "LHO_2k",
            I1 => "LIO_4k",
            K1 => "KAGRA",
            L1 => "LLO_4k",
            T1 => "TAMA_300",
            V1 => "VIRGO",
        }
    }
}
impl fmt::Display for Detector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.prefix())
    }
}
impl FromStr for Detector {
    type Err = DetectorError;
    fn from_str(s: &str) -> Result<Self> {
        use Detector::*;
        match s {
            "G1" => Ok(G1),
            "H1" => Ok(H1),
            "H2" => Ok(H2),
            "I1" => Ok(I1),
            "K1" => Ok(K1),
            "L1" => Ok(L1),
            "T1" => Ok(T1),
            "V1" => Ok(V1),
            _ => Err(DetectorError::Prefix(s.to_string())),
        }
    }
}

/// O5 observing scenario preset, selecting one strain column of the shared
/// multi-column ASD file
#[derive(EnumIter, Clone, Copy, PartialEq, Eq, Debug)]
pub enum ObservingScenario {
    O5a,
    O5b,
    O5c,
}
impl ObservingScenario {
    /// Amplitude column holding this scenario's strain ASD
    pub fn column(&self) -> usize {
        match self {
            ObservingScenario::O5a => 1,
            ObservingScenario::O5b => 2,
            ObservingScenario::O5c => 3,
        }
    }
    /// The scenario files exist only for the two LIGO 4km instruments
    pub fn applies_to(&self, detector: Detector) -> bool {
        matches!(detector, Detector::H1 | Detector::L1)
    }
}
impl fmt::Display for ObservingScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObservingScenario::O5a => write!(f, "O5a"),
            ObservingScenario::O5b => write!(f, "O5b"),
            ObservingScenario::O5c => write!(f, "O5c"),
        }
    }
}
impl FromStr for ObservingScenario {
    type Err = DetectorError;
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "O5a" => Ok(ObservingScenario::O5a),
            "O5b" => Ok(ObservingScenario::O5b),
            "O5c" => Ok(ObservingScenario::O5c),
            _ => Err(DetectorError::Scenario(s.to_string())),
        }
    }
}

/// Amplitude column selection policy for one detector's input file
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ColumnSelection {
    /// Fixed column resolved through the scenario preset table
    Scenario(ObservingScenario),
    /// Free-form column index, any detector
    Explicit(usize),
}
impl ColumnSelection {
    /// Per-detector resolution: an explicit column wins over a scenario preset,
    /// a preset applies only where valid, otherwise the file is read in plain
    /// two-column mode (`None`)
    pub fn resolve(
        detector: Detector,
        explicit: Option<usize>,
        scenario: Option<ObservingScenario>,
    ) -> Option<Self> {
        match (explicit, scenario) {
            (Some(column), _) => Some(ColumnSelection::Explicit(column)),
            (None, Some(scenario)) if scenario.applies_to(detector) => {
                Some(ColumnSelection::Scenario(scenario))
            }
            _ => None,
        }
    }
    pub fn column(&self) -> usize {
        match self {
            ColumnSelection::Scenario(scenario) => scenario.column(),
            ColumnSelection::Explicit(column) => *column,
        }
    }
}
