use crate::asd::AsdSeries;

/// Start of the fixed output frequency grid [Hz]
pub const F0: f64 = 10.0;
/// Exclusive end of the fixed output frequency grid [Hz]
pub const F_MAX: f64 = 4096.0;
/// Grid spacing [Hz]
pub const DF: f64 = 1.0;

/// The fixed grid shared by every packed PSD: `10, 11, ..., 4095` Hz
pub fn frequency_grid() -> Vec<f64> {
    let n = ((F_MAX - F0) / DF) as usize;
    (0..n).map(|k| F0 + k as f64 * DF).collect()
}

#[derive(Debug, thiserror::Error)]
pub enum SeriesError {
    #[error("frequency {value} at sample {index} is not a strictly positive finite number")]
    Frequency { index: usize, value: f64 },
    #[error("amplitude {value} at sample {index} is not a strictly positive finite number")]
    Amplitude { index: usize, value: f64 },
    #[error("at least 2 samples are required for log-log resampling, found {0}")]
    TooShort(usize),
}
type Result<T> = std::result::Result<T, SeriesError>;

/// A power spectral density resampled onto the fixed frequency grid
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencySeries {
    pub name: String,
    /// GPS epoch [s]
    pub epoch: f64,
    /// Grid start frequency [Hz]
    pub f0: f64,
    /// Grid spacing [Hz]
    pub df: f64,
    /// Physical unit of the data
    pub unit: String,
    pub data: Vec<f64>,
}
impl FrequencySeries {
    /// Square the amplitudes into powers, then resample onto the fixed grid by
    /// linear interpolation in log-log space. Grid frequencies outside the
    /// sampled range follow the nearest segment's log-log slope.
    ///
    /// The log transform is undefined for zero or negative samples, so those
    /// fail here rather than seeding the output with NaNs.
    pub fn from_asd<S: Into<String>>(name: S, asd: &AsdSeries) -> Result<Self> {
        if asd.len() < 2 {
            return Err(SeriesError::TooShort(asd.len()));
        }
        for (index, &value) in asd.frequency.iter().enumerate() {
            if !(value.is_finite() && value > 0.0) {
                return Err(SeriesError::Frequency { index, value });
            }
        }
        for (index, &value) in asd.amplitude.iter().enumerate() {
            if !(value.is_finite() && value > 0.0) {
                return Err(SeriesError::Amplitude { index, value });
            }
        }
        let ln_f: Vec<f64> = asd.frequency.iter().map(|f| f.ln()).collect();
        let ln_p: Vec<f64> = asd.amplitude.iter().map(|a| (a * a).ln()).collect();
        let data = frequency_grid()
            .into_iter()
            .map(|f| interp(f.ln(), &ln_f, &ln_p).exp())
            .collect();
        Ok(Self {
            name: name.into(),
            epoch: 0.0,
            f0: F0,
            df: DF,
            unit: String::from("s"),
            data,
        })
    }
    pub fn len(&self) -> usize {
        self.data.len()
    }
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
    /// Grid frequency of each sample
    pub fn frequencies(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.data.len()).map(move |k| self.f0 + k as f64 * self.df)
    }
}

/// Piecewise-linear interpolation over a strictly increasing axis of at least
/// two samples, extending the end segments' slopes outside the sampled range
fn interp(x: f64, xs: &[f64], ys: &[f64]) -> f64 {
    let j = match xs.binary_search_by(|v| v.partial_cmp(&x).unwrap()) {
        Ok(j) => return ys[j],
        Err(j) => j.clamp(1, xs.len() - 1),
    };
    let (x0, x1) = (xs[j - 1], xs[j]);
    let (y0, y1) = (ys[j - 1], ys[j]);
    y0 + (y1 - y0) * (x - x0) / (x1 - x0)
}
