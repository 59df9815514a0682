use std::path::PathBuf;

use psd_pack::{Detector, ObservingScenario, Packer, Provenance};
use structopt::StructOpt;
use strum::IntoEnumIterator;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "psd-pack",
    about = "Pack detector ASD text files into a LIGO-LW psd.xml document"
)]
struct Opt {
    /// Name of output file, gzipped if it ends in .gz [default: stdout]
    #[structopt(short, long, parse(from_os_str))]
    output: Option<PathBuf>,
    /// Observing scenario column preset (O5a, O5b or O5c; H1 and L1 only)
    #[structopt(long)]
    config: Option<ObservingScenario>,
    /// ASD file for the GEO_600 detector
    #[structopt(long = "G1", parse(from_os_str))]
    g1: Option<PathBuf>,
    /// ASD file for the LHO_4k detector
    #[structopt(long = "H1", parse(from_os_str))]
    h1: Option<PathBuf>,
    /// ASD file for the LHO_2k detector
    #[structopt(long = "H2", parse(from_os_str))]
    h2: Option<PathBuf>,
    /// ASD file for the LIO_4k detector
    #[structopt(long = "I1", parse(from_os_str))]
    i1: Option<PathBuf>,
    /// ASD file for the KAGRA detector
    #[structopt(long = "K1", parse(from_os_str))]
    k1: Option<PathBuf>,
    /// ASD file for the LLO_4k detector
    #[structopt(long = "L1", parse(from_os_str))]
    l1: Option<PathBuf>,
    /// ASD file for the TAMA_300 detector
    #[structopt(long = "T1", parse(from_os_str))]
    t1: Option<PathBuf>,
    /// ASD file for the VIRGO detector
    #[structopt(long = "V1", parse(from_os_str))]
    v1: Option<PathBuf>,
    /// Amplitude column of the G1 file (header row skipped)
    #[structopt(long = "G1-column")]
    g1_column: Option<usize>,
    /// Amplitude column of the H1 file (header row skipped)
    #[structopt(long = "H1-column")]
    h1_column: Option<usize>,
    /// Amplitude column of the H2 file (header row skipped)
    #[structopt(long = "H2-column")]
    h2_column: Option<usize>,
    /// Amplitude column of the I1 file (header row skipped)
    #[structopt(long = "I1-column")]
    i1_column: Option<usize>,
    /// Amplitude column of the K1 file (header row skipped)
    #[structopt(long = "K1-column")]
    k1_column: Option<usize>,
    /// Amplitude column of the L1 file (header row skipped)
    #[structopt(long = "L1-column")]
    l1_column: Option<usize>,
    /// Amplitude column of the T1 file (header row skipped)
    #[structopt(long = "T1-column")]
    t1_column: Option<usize>,
    /// Amplitude column of the V1 file (header row skipped)
    #[structopt(long = "V1-column")]
    v1_column: Option<usize>,
}
impl Opt {
    fn source(&self, detector: Detector) -> (Option<&PathBuf>, Option<usize>) {
        use Detector::*;
        match detector {
            G1 => (self.g1.as_ref(), self.g1_column),
            H1 => (self.h1.as_ref(), self.h1_column),
            H2 => (self.h2.as_ref(), self.h2_column),
            I1 => (self.i1.as_ref(), self.i1_column),
            K1 => (self.k1.as_ref(), self.k1_column),
            L1 => (self.l1.as_ref(), self.l1_column),
            T1 => (self.t1.as_ref(), self.t1_column),
            V1 => (self.v1.as_ref(), self.v1_column),
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opt = Opt::from_args();

    let mut packer = Packer::default().provenance(Provenance::from_env());
    if let Some(scenario) = opt.config {
        packer = packer.scenario(scenario);
    }
    for detector in Detector::iter() {
        if let (Some(path), column) = opt.source(detector) {
            packer = match column {
                Some(column) => packer.source_with_column(detector, path, column),
                None => packer.source(detector, path),
            };
        }
    }

    let doc = packer.pack()?;
    doc.write(opt.output.as_deref())?;
    Ok(())
}
