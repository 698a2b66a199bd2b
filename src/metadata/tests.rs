use std::fs;
use std::path::PathBuf;

use super::*;
use crate::xml::ParseError;

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/Sample_Run.d")
}

/// Copy the fixture run into a temporary directory
fn fixture_copy() -> (tempfile::TempDir, PathBuf) {
    let temp = tempfile::tempdir().unwrap();
    let run = temp.path().join("Copy.d");
    let acq_data = run.join(ACQ_DATA);
    fs::create_dir_all(&acq_data).unwrap();
    for entry in fs::read_dir(acq_data_dir(fixture())).unwrap() {
        let entry = entry.unwrap();
        fs::copy(entry.path(), acq_data.join(entry.file_name())).unwrap();
    }
    (temp, run)
}

#[test]
fn test_is_datafile() {
    assert!(is_datafile(fixture()));

    let temp = tempfile::tempdir().unwrap();
    assert!(!is_datafile(temp.path()));
    assert!(!is_datafile(temp.path().join("does_not_exist.d")));

    let run = temp.path().join("Empty.d");
    fs::create_dir_all(run.join(ACQ_DATA)).unwrap();
    assert!(!is_datafile(&run));

    fs::write(run.join(ACQ_DATA).join("Contents.xml"), "").unwrap();
    assert!(is_datafile(&run));

    let file = temp.path().join("file.d");
    fs::write(&file, "").unwrap();
    assert!(!is_datafile(&file));
}

#[test]
fn test_not_a_datafile_names_path() {
    let temp = tempfile::tempdir().unwrap();
    let err = extract_metadata(temp.path()).unwrap_err();
    assert!(matches!(err, MetadataError::NotADatafile(ref path) if path == temp.path()));
    assert_eq!(
        err.to_string(),
        format!("'{}' does not appear to be a valid .d datafile.", temp.path().display())
    );
}

#[test]
fn test_extract_does_not_create_directories() {
    let temp = tempfile::tempdir().unwrap();
    let missing = temp.path().join("a/b/Missing.d");
    assert!(extract_metadata(&missing).is_err());
    assert!(!temp.path().join("a").exists());
}

#[test]
fn test_prepare_filepath() {
    let temp = tempfile::tempdir().unwrap();
    let nested = temp.path().join("out/json/metadata.json");

    let prepared = prepare_filepath(&nested, false).unwrap();
    assert_eq!(prepared, nested);
    assert!(!temp.path().join("out").exists());

    prepare_filepath(&nested, true).unwrap();
    assert!(temp.path().join("out/json").is_dir());
    assert!(!nested.exists());

    // Relative paths are made absolute against the working directory
    let cwd = std::env::current_dir().unwrap();
    assert_eq!(
        prepare_filepath("metadata.json", false).unwrap(),
        cwd.join("metadata.json")
    );
    assert_eq!(
        prepare_filepath(PathBuf::from("runs").join("..").join("Sample.d"), false).unwrap(),
        cwd.join("runs").join("..").join("Sample.d")
    );
}

#[test]
fn test_extract_names_absolute_path() {
    let err = extract_metadata("No_Such_Run.d").unwrap_err();
    let expected = std::env::current_dir().unwrap().join("No_Such_Run.d");
    assert!(matches!(err, MetadataError::NotADatafile(ref path) if *path == expected));
    assert!(err.to_string().contains(&expected.display().to_string()));
}

#[test]
fn test_extract_fixture() {
    let metadata = extract_metadata(fixture()).unwrap();
    assert_eq!(metadata.contents.instrument_name, "Instrument 1");
    assert_eq!(metadata.devices.len(), 4);
    assert_eq!(metadata.method.devices.len(), 4);
}

#[test]
fn test_parser_failure_propagates() {
    let (_temp, run) = fixture_copy();
    let msts = acq_data_dir(&run).join("MSTS.xml");
    let xml = fs::read_to_string(&msts).unwrap();
    fs::write(&msts, xml.replace("<NumOfScans>1163", "<NumOfScans>many")).unwrap();

    let err = match extract_metadata(&run).unwrap_err() {
        MetadataError::Parse(err) => err,
        other => panic!("unexpected error {:?}", other),
    };
    assert!(matches!(err, ParseError::InFile { ref path, .. } if path == &msts));
    assert!(matches!(err.root_cause(), ParseError::Schema(_)));

    let err = match extract_metadata_with(&run, &ParseOptions::without_validation()) {
        Err(MetadataError::Parse(err)) => err,
        other => panic!("unexpected result {:?}", other),
    };
    assert!(matches!(
        err.root_cause(),
        ParseError::InvalidField { ref field, .. } if field == "NumOfScans"
    ));
}

#[test]
fn test_missing_file_propagates() {
    let (_temp, run) = fixture_copy();
    fs::remove_file(acq_data_dir(&run).join("sample_info.xml")).unwrap();

    let err = extract_metadata(&run).unwrap_err();
    assert!(matches!(
        err,
        MetadataError::Parse(ref e) if matches!(e.root_cause(), ParseError::Io { .. })
    ));
}

#[test]
fn test_check_report() {
    let (_temp, run) = fixture_copy();
    let report = check_datafile(&run, &ParseOptions::default()).unwrap();
    assert_eq!(report.checks.len(), 8);
    assert_eq!(report.success_count(), 8);
    assert!(!report.has_failures());

    fs::remove_file(acq_data_dir(&run).join("MSTS.xml")).unwrap();
    let devices = acq_data_dir(&run).join("Devices.xml");
    let xml = fs::read_to_string(&devices).unwrap();
    fs::write(&devices, xml.replace("<Type>31</Type>", "<Type>pump</Type>")).unwrap();

    let report = check_datafile(&run, &ParseOptions::default()).unwrap();
    assert_eq!(report.success_count(), 6);
    assert_eq!(report.missing_count(), 1);
    assert_eq!(report.failure_count(), 1);
    assert!(report.has_failures());

    let failed = report
        .checks
        .iter()
        .find(|check| check.file_name == "Devices.xml")
        .unwrap();
    match &failed.status {
        CheckStatus::Failed(message) => assert!(message.contains("/Devices/Device[3]/Type")),
        other => panic!("unexpected status {:?}", other),
    }

    let text = report.to_string();
    assert!(text.contains("[⚠] MSTS.xml - not present"));
    assert!(text.contains("Summary: 6 parsed, 1 missing, 1 failed"));
}

#[test]
fn test_check_rejects_non_datafile() {
    let temp = tempfile::tempdir().unwrap();
    assert!(matches!(
        check_datafile(temp.path(), &ParseOptions::default()),
        Err(MetadataError::NotADatafile(_))
    ));
}

#[test]
fn test_json_round_trip() {
    let metadata = extract_metadata(fixture()).unwrap();
    let json = metadata.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let keys: Vec<&str> = value
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys.len(), 8);
    for key in [
        "method",
        "contents",
        "default_mass_cal",
        "device_config_info",
        "devices",
        "ms_actual_defs",
        "ms_time_segments",
        "sample_info",
    ] {
        assert!(keys.contains(&key), "missing key {}", key);
    }

    let restored = MetadataDict::from_json(&metadata.to_json_pretty().unwrap()).unwrap();
    assert_eq!(restored, metadata);
}
