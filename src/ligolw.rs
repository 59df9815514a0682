//! LIGO-LW XML serialization of a set of per-detector PSDs.
//!
//! The schema is a fixed external contract: an outer `LIGO_LW` element holding
//! `process`/`process_params` provenance tables and one
//! `LIGO_LW Name="REAL8FrequencySeries"` block per instrument, each with an
//! epoch, an instrument name and a two-column `(frequency, value)` text stream.

use regex::Regex;
use std::{
    collections::BTreeMap,
    fs,
    io::{self, Read, Write},
    path::Path,
    str::FromStr,
};

use flate2::{read::GzDecoder, write::GzEncoder, Compression};

use crate::series::FrequencySeries;

#[derive(Debug, thiserror::Error)]
pub enum LigolwError {
    #[error("failed to read or write the LIGO-LW document")]
    Io(#[from] std::io::Error),
    #[error("invalid LIGO-LW pattern")]
    Regex(#[from] regex::Error),
    #[error("no `{0}` element found in the document")]
    Missing(&'static str),
    #[error("failed to parse {0:?} as a number in a LIGO-LW stream")]
    Number(String),
    #[error("series {name:?} stream holds an odd number of entries")]
    Stream { name: String },
}
type Result<T> = std::result::Result<T, LigolwError>;

/// Record of the command line that produced a document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Provenance {
    pub program: String,
    pub args: Vec<String>,
}
impl Provenance {
    pub fn from_env() -> Self {
        let mut args = std::env::args();
        let program = args
            .next()
            .as_deref()
            .map(Path::new)
            .and_then(Path::file_name)
            .and_then(|name| name.to_str())
            .unwrap_or("psd-pack")
            .to_string();
        Self {
            program,
            args: args.collect(),
        }
    }
    /// `(param, value)` rows for the `process_params` table: each flag is
    /// paired with its following value when one is present
    fn param_rows(&self) -> Vec<(String, String)> {
        let mut rows = Vec::new();
        let mut args = self.args.iter().peekable();
        while let Some(arg) = args.next() {
            if arg.starts_with('-') {
                let value = match args.peek() {
                    Some(next) if !next.starts_with('-') => {
                        args.next().cloned().unwrap_or_default()
                    }
                    _ => String::new(),
                };
                rows.push((arg.clone(), value));
            } else {
                rows.push((String::new(), arg.clone()));
            }
        }
        rows
    }
}

/// A LIGO-LW `psd.xml` document: an ordered instrument → PSD mapping plus the
/// provenance of the run that built it
#[derive(Debug, Default)]
pub struct PsdDocument {
    psds: BTreeMap<String, FrequencySeries>,
    provenance: Provenance,
}
impl PsdDocument {
    pub fn new(provenance: Provenance) -> Self {
        Self {
            psds: BTreeMap::new(),
            provenance,
        }
    }
    pub fn insert<S: ToString>(&mut self, instrument: S, series: FrequencySeries) {
        self.psds.insert(instrument.to_string(), series);
    }
    pub fn get(&self, instrument: &str) -> Option<&FrequencySeries> {
        self.psds.get(instrument)
    }
    pub fn instruments(&self) -> impl Iterator<Item = &str> {
        self.psds.keys().map(|k| k.as_str())
    }
    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }
    pub fn len(&self) -> usize {
        self.psds.len()
    }
    pub fn is_empty(&self) -> bool {
        self.psds.is_empty()
    }

    /// Serialize the document as LIGO-LW XML into any sink
    pub fn write_to<W: Write>(&self, mut w: W) -> Result<()> {
        writeln!(w, "<?xml version='1.0' encoding='utf-8'?>")?;
        writeln!(
            w,
            r#"<!DOCTYPE LIGO_LW SYSTEM "http://ldas-sw.ligo.caltech.edu/doc/ligolwAPI/html/ligolw_dtd.txt">"#
        )?;
        writeln!(w, "<LIGO_LW>")?;
        self.write_process_tables(&mut w)?;
        writeln!(w, "\t<LIGO_LW Name=\"psd\">")?;
        for (instrument, series) in &self.psds {
            writeln!(w, "\t\t<LIGO_LW Name=\"REAL8FrequencySeries\">")?;
            writeln!(
                w,
                "\t\t\t<Time Type=\"GPS\" Name=\"epoch\">{}</Time>",
                series.epoch
            )?;
            writeln!(
                w,
                "\t\t\t<Param Type=\"lstring\" Name=\"instrument:param\">{}</Param>",
                instrument
            )?;
            writeln!(
                w,
                "\t\t\t<Array Type=\"real_8\" Name=\"{}:array\" Unit=\"{}\">",
                series.name, series.unit
            )?;
            writeln!(
                w,
                "\t\t\t\t<Dim Start=\"{}\" Scale=\"{}\" Name=\"Frequency\" Unit=\"s^-1\">{}</Dim>",
                series.f0,
                series.df,
                series.len()
            )?;
            writeln!(w, "\t\t\t\t<Dim Name=\"Frequency,Real\">2</Dim>")?;
            writeln!(w, "\t\t\t\t<Stream Delimiter=\" \" Type=\"Text\">")?;
            for (f, value) in series.frequencies().zip(&series.data) {
                writeln!(w, "\t\t\t\t\t{} {:e}", f, value)?;
            }
            writeln!(w, "\t\t\t\t</Stream>")?;
            writeln!(w, "\t\t\t</Array>")?;
            writeln!(w, "\t\t</LIGO_LW>")?;
        }
        writeln!(w, "\t</LIGO_LW>")?;
        writeln!(w, "</LIGO_LW>")?;
        Ok(())
    }

    fn write_process_tables<W: Write>(&self, w: &mut W) -> io::Result<()> {
        writeln!(w, "\t<Table Name=\"process:table\">")?;
        writeln!(w, "\t\t<Column Name=\"program\" Type=\"lstring\"/>")?;
        writeln!(w, "\t\t<Column Name=\"process_id\" Type=\"int_8s\"/>")?;
        writeln!(w, "\t\t<Column Name=\"comment\" Type=\"lstring\"/>")?;
        writeln!(
            w,
            "\t\t<Stream Name=\"process:table\" Delimiter=\",\" Type=\"Text\">"
        )?;
        writeln!(w, "\t\t\t\"{}\",0,\"\"", self.provenance.program)?;
        writeln!(w, "\t\t</Stream>")?;
        writeln!(w, "\t</Table>")?;
        writeln!(w, "\t<Table Name=\"process_params:table\">")?;
        writeln!(w, "\t\t<Column Name=\"program\" Type=\"lstring\"/>")?;
        writeln!(w, "\t\t<Column Name=\"process_id\" Type=\"int_8s\"/>")?;
        writeln!(w, "\t\t<Column Name=\"param\" Type=\"lstring\"/>")?;
        writeln!(w, "\t\t<Column Name=\"type\" Type=\"lstring\"/>")?;
        writeln!(w, "\t\t<Column Name=\"value\" Type=\"lstring\"/>")?;
        writeln!(
            w,
            "\t\t<Stream Name=\"process_params:table\" Delimiter=\",\" Type=\"Text\">"
        )?;
        for (param, value) in self.provenance.param_rows() {
            writeln!(
                w,
                "\t\t\t\"{}\",0,\"{}\",\"lstring\",\"{}\"",
                self.provenance.program, param, value
            )?;
        }
        writeln!(w, "\t\t</Stream>")?;
        writeln!(w, "\t</Table>")?;
        Ok(())
    }

    /// Write the document to the given path, or to stdout when there is none.
    /// A path ending in `.gz` gets a gzip-compressed stream; file output goes
    /// through a temporary sibling and an atomic rename so an interrupted run
    /// never leaves a partial document at the requested path.
    pub fn write(&self, path: Option<&Path>) -> Result<()> {
        let path = match path {
            None => return self.write_to(io::stdout().lock()),
            Some(path) => path,
        };
        log::info!("Writing {:?}...", path);
        let tmp = match path.file_name().and_then(|name| name.to_str()) {
            Some(name) => path.with_file_name(format!("{}.tmp", name)),
            None => path.with_file_name("psd.xml.tmp"),
        };
        let file = fs::File::create(&tmp)?;
        if gzipped(path) {
            let mut gz = GzEncoder::new(io::BufWriter::new(file), Compression::default());
            self.write_to(&mut gz)?;
            gz.finish()?.flush()?;
        } else {
            let mut buf = io::BufWriter::new(file);
            self.write_to(&mut buf)?;
            buf.flush()?;
        }
        fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Read a document back, gzip-transparently for `.gz` paths
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::info!("Loading {:?}...", path);
        let mut contents = String::new();
        let mut file = fs::File::open(path)?;
        if gzipped(path) {
            GzDecoder::new(file).read_to_string(&mut contents)?;
        } else {
            file.read_to_string(&mut contents)?;
        }
        contents.parse()
    }
}

fn gzipped(path: &Path) -> bool {
    path.extension().map(|ext| ext == "gz").unwrap_or(false)
}

fn number(value: &str) -> Result<f64> {
    value
        .trim()
        .parse()
        .map_err(|_| LigolwError::Number(value.to_string()))
}

impl FromStr for PsdDocument {
    type Err = LigolwError;

    fn from_str(s: &str) -> Result<Self> {
        let re_block = Regex::new(r#"(?s)<LIGO_LW Name="REAL8FrequencySeries">.*?</LIGO_LW>"#)?;
        let re_epoch = Regex::new(r#"<Time Type="GPS" Name="epoch">([^<]+)</Time>"#)?;
        let re_instrument =
            Regex::new(r#"<Param Type="lstring" Name="instrument:param">([^<]+)</Param>"#)?;
        let re_array = Regex::new(r#"<Array Type="real_8" Name="([^"]+):array" Unit="([^"]*)">"#)?;
        let re_dim = Regex::new(r#"<Dim Start="([^"]+)" Scale="([^"]+)" Name="Frequency""#)?;
        let re_stream = Regex::new(r#"(?s)<Stream Delimiter=" " Type="Text">(.*?)</Stream>"#)?;
        let re_program = Regex::new(
            r#"(?s)<Stream Name="process:table" Delimiter="," Type="Text">\s*"([^"]*)""#,
        )?;
        let re_param_row = Regex::new(r#""[^"]*",0,"([^"]*)","lstring","([^"]*)""#)?;

        let mut provenance = Provenance::default();
        if let Some(capts) = re_program.captures(s) {
            provenance.program = capts.get(1).unwrap().as_str().to_string();
        }
        for capts in re_param_row.captures_iter(s) {
            let (param, value) = (capts.get(1).unwrap().as_str(), capts.get(2).unwrap().as_str());
            if !param.is_empty() {
                provenance.args.push(param.to_string());
            }
            if !value.is_empty() {
                provenance.args.push(value.to_string());
            }
        }

        let mut this = Self::new(provenance);
        for block in re_block.find_iter(s) {
            let block = block.as_str();
            let instrument = re_instrument
                .captures(block)
                .ok_or(LigolwError::Missing("instrument:param"))?
                .get(1)
                .unwrap()
                .as_str()
                .to_string();
            let epoch = number(
                re_epoch
                    .captures(block)
                    .ok_or(LigolwError::Missing("epoch"))?
                    .get(1)
                    .unwrap()
                    .as_str(),
            )?;
            let array = re_array
                .captures(block)
                .ok_or(LigolwError::Missing("Array"))?;
            let name = array.get(1).unwrap().as_str().to_string();
            let unit = array.get(2).unwrap().as_str().to_string();
            let dim = re_dim.captures(block).ok_or(LigolwError::Missing("Dim"))?;
            let f0 = number(dim.get(1).unwrap().as_str())?;
            let df = number(dim.get(2).unwrap().as_str())?;
            let stream = re_stream
                .captures(block)
                .ok_or(LigolwError::Missing("Stream"))?
                .get(1)
                .unwrap()
                .as_str();
            let entries: Vec<&str> = stream.split_whitespace().collect();
            if entries.len() % 2 != 0 {
                return Err(LigolwError::Stream { name });
            }
            let data = entries
                .chunks(2)
                .map(|pair| number(pair[1]))
                .collect::<Result<Vec<f64>>>()?;
            this.insert(
                instrument,
                FrequencySeries {
                    name,
                    epoch,
                    f0,
                    df,
                    unit,
                    data,
                },
            );
        }
        if this.is_empty() {
            return Err(LigolwError::Missing("REAL8FrequencySeries"));
        }
        Ok(this)
    }
}
