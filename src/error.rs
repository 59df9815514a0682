use crate::{asd::AsdError, detector::DetectorError, ligolw::LigolwError, series::SeriesError};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Error in the `asd` module")]
    Asd(#[from] AsdError),
    #[error("Error in the `detector` module")]
    Detector(#[from] DetectorError),
    #[error("Error in the `series` module")]
    Series(#[from] SeriesError),
    #[error("Error in the `ligolw` module")]
    Ligolw(#[from] LigolwError),
}
