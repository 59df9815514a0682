use std::{fs::File, io::Write, path::PathBuf};

use psd_pack::{Detector, ObservingScenario, Packer, Provenance, PsdDocument};

fn stage(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("psd-pack-it-{}-{}", std::process::id(), name));
    let mut file = File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

const O5_FILE: &str = "freq O5aStrain O5bStrain O5cStrain\n\
    5.0 1.2e-23 1.0e-23 0.8e-23\n\
    20.0 5.0e-24 4.0e-24 3.0e-24\n\
    300.0 3.0e-24 2.5e-24 2.0e-24\n\
    5000.0 8.0e-24 7.0e-24 6.0e-24\n";

#[test]
fn pack_write_read() {
    let o5 = stage("o5.txt", O5_FILE);
    let virgo = stage("avirgo.txt", "5.0 2e-23\n100.0 5e-24\n5000.0 9e-24\n");
    let out = std::env::temp_dir().join(format!("psd-pack-it-{}-psd.xml.gz", std::process::id()));

    let doc = Packer::default()
        .provenance(Provenance {
            program: String::from("psd-pack"),
            args: vec![String::from("--config"), String::from("O5b")],
        })
        .scenario(ObservingScenario::O5b)
        .source(Detector::H1, &o5)
        .source(Detector::L1, &o5)
        .source(Detector::V1, &virgo)
        .pack()
        .unwrap();
    doc.write(Some(&out)).unwrap();

    let readback = PsdDocument::from_path(&out).unwrap();
    assert_eq!(
        readback.instruments().collect::<Vec<_>>(),
        vec!["H1", "L1", "V1"]
    );
    for instrument in ["H1", "L1", "V1"] {
        let series = readback.get(instrument).unwrap();
        assert_eq!(series.f0, 10.0);
        assert_eq!(series.df, 1.0);
        assert_eq!(series.len(), 4086);
    }
    // H1 and L1 read the same scenario column of the same file
    assert_eq!(
        readback.get("H1").unwrap().data,
        readback.get("L1").unwrap().data
    );
    // the command line travels with the document
    assert_eq!(readback.provenance().args, vec!["--config", "O5b"]);
}

#[test]
fn psd_is_squared_asd() {
    // flat 3e-23 ASD over the whole grid packs to a flat 9e-46 PSD
    let flat = stage("flat.txt", "5.0 3e-23\n5000.0 3e-23\n");
    let doc = Packer::default()
        .source(Detector::K1, &flat)
        .pack()
        .unwrap();
    for value in &doc.get("K1").unwrap().data {
        assert!(((value - 9e-46) / 9e-46).abs() < 1e-12);
    }
}

#[test]
fn bad_column_produces_no_output() {
    let o5 = stage("o5-bad.txt", O5_FILE);
    let out = std::env::temp_dir().join(format!(
        "psd-pack-it-{}-never-written.xml",
        std::process::id()
    ));
    let result = Packer::default()
        .source_with_column(Detector::H1, &o5, 9)
        .pack();
    assert!(result.is_err());
    assert!(!out.exists());
}
