//! Integration tests for agilent-metadata
//!
//! These tests read the sample run directory under `tests/data` end to end.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use agilent_metadata::metadata::{
    acq_data_dir, extract_metadata, extract_metadata_with, is_datafile, MetadataError,
};
use agilent_metadata::records::{
    read_acq_method, read_contents_xml, read_devices_xml, ActualDataType, DeviceList,
};
use agilent_metadata::schema::SchemaError;
use agilent_metadata::xml::{
    AcqStatus, CalibrationFormula, DeviceType, DeviceVendor, ParseError, ParseOptions,
    ScalarValue, SeparationTechnique, StoredDataType, XmlFile,
};
use tempfile::tempdir;

fn sample_run() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/Sample_Run.d")
}

/// Copy the sample run into `dir`, returning the path of the copy
fn copy_run(dir: &Path) -> PathBuf {
    let run = dir.join("Sample_Run.d");
    let acq_data = acq_data_dir(&run);
    fs::create_dir_all(&acq_data).unwrap();
    for entry in fs::read_dir(acq_data_dir(sample_run())).unwrap() {
        let entry = entry.unwrap();
        fs::copy(entry.path(), acq_data.join(entry.file_name())).unwrap();
    }
    run
}

fn edit(run: &Path, file_name: &str, from: &str, to: &str) {
    let path = acq_data_dir(run).join(file_name);
    let xml = fs::read_to_string(&path).unwrap();
    assert!(xml.contains(from), "{} does not contain {:?}", file_name, from);
    fs::write(&path, xml.replace(from, to)).unwrap();
}

/// Test the complete extraction of the sample run
#[test]
fn test_extract_sample_run() {
    let metadata = extract_metadata(sample_run()).unwrap();

    let contents = &metadata.contents;
    assert_eq!(contents.version, 2);
    assert_eq!(contents.acq_status, AcqStatus::Stop);
    assert_eq!(contents.separation_technique, SeparationTechnique::LC);
    assert_eq!(contents.total_run_duration, Duration::from_secs_f64(816.2));
    assert_eq!(contents.acquired_time.offset().local_minus_utc(), 0);

    let qtof = metadata.devices.get_device(1).unwrap();
    assert_eq!(qtof.display_name, "QTOF");
    assert_eq!(qtof.device_type, DeviceType::QuadrupoleTimeOfFlight);
    assert_eq!(qtof.vendor, DeviceVendor::Agilent);
    assert_eq!(qtof.stored_data_type, StoredDataType::MASS_SPECTRA);
    let pump = metadata.devices.get_device(3).unwrap();
    assert!(pump.stored_data_type.contains(StoredDataType::CHROMATOGRAMS));
    assert!(pump.stored_data_type.contains(StoredDataType::INSTRUMENT_CURVES));

    assert_eq!(metadata.device_config_info.devices().len(), 4);
    let pump_parameters: Vec<_> = metadata
        .device_config_info
        .parameters_for("BinPump_1")
        .collect();
    assert_eq!(pump_parameters.len(), 1);
    assert_eq!(pump_parameters[0].value, "1300");
    assert_eq!(pump_parameters[0].units, "bar");

    let calibration = &metadata.default_mass_cal[0];
    assert_eq!(calibration[1].calibration_formula, CalibrationFormula::Polynomial);
    assert_eq!(calibration[1].values[&3], -26.5306611190631);

    assert_eq!(
        metadata.ms_actual_defs.get_actual(60).unwrap().data_type,
        ActualDataType::Int64
    );
    assert_eq!(
        metadata.ms_actual_defs.get_actual(361).unwrap().summary(),
        "<Actual('Min Range', id=361)>"
    );

    assert_eq!(metadata.ms_time_segments.len(), 1);
    assert_eq!(metadata.ms_time_segments[0].n_scans, 1163);

    let dilution = metadata.sample_info.get_field("Dilution").unwrap();
    assert_eq!(dilution.value, ScalarValue::Int(1));
    assert!(dilution.overridden);
}

#[test]
fn test_method_devices_are_cross_referenced() {
    let metadata = extract_metadata(sample_run()).unwrap();
    let method = &metadata.method;
    assert_eq!(method.version, 5.0);
    assert_eq!(method.name, "Alkanes.m");
    assert_eq!(method.filename.drive(), Some("D:"));
    assert_eq!(method.filename.file_stem(), Some("Alkanes"));

    let sampler = &method.devices[0];
    assert_eq!(sampler.device_id, "HiP-ALS_1");
    assert_eq!(sampler.display_name, "Multisampler");
    assert!(sampler.rc_device);

    for device in &method.devices {
        assert_eq!(device.configuration.len(), 1, "{}", device.device_id);
    }
    assert_eq!(
        sampler.configuration[0]["needle_wash"],
        ScalarValue::Text("Standard Wash".to_string())
    );

    let tcc = method.get_device("TCC_1").unwrap();
    assert_eq!(tcc.configuration[0]["left_temperature"], ScalarValue::Int(40));

    let qtof = method.get_device("QTOF_1").unwrap();
    assert!(!qtof.rc_device);
    assert_eq!(
        qtof.configuration[0]["name"],
        ScalarValue::Text("Q-TOF Acquisition".to_string())
    );
}

#[test]
fn test_per_file_readers_match_aggregate() {
    let metadata = extract_metadata(sample_run()).unwrap();
    let dir = acq_data_dir(sample_run());

    assert_eq!(read_contents_xml(&dir).unwrap(), metadata.contents);
    assert_eq!(read_devices_xml(&dir).unwrap(), metadata.devices);
    assert_eq!(read_acq_method(&dir).unwrap(), metadata.method);
}

#[test]
fn test_is_datafile() {
    assert!(is_datafile(sample_run()));
    assert!(!is_datafile(acq_data_dir(sample_run())));
    assert!(!is_datafile(acq_data_dir(sample_run()).join("Contents.xml")));
    assert!(!is_datafile(sample_run().join("missing.d")));
}

#[test]
fn test_not_a_datafile() {
    let dir = tempdir().unwrap();
    let run = dir.path().join("Empty.d");
    fs::create_dir_all(&run).unwrap();

    let err = extract_metadata(&run).unwrap_err();
    assert!(matches!(err, MetadataError::NotADatafile(_)));
    assert_eq!(
        err.to_string(),
        format!("'{}' does not appear to be a valid .d datafile.", run.display())
    );
}

#[test]
fn test_unknown_rc_device_fails_extraction() {
    let dir = tempdir().unwrap();
    let run = copy_run(dir.path());
    edit(
        &run,
        "AcqMethod.xml",
        "&lt;ModuleDisplayName&gt;Column Comp.",
        "&lt;ModuleDisplayName&gt;Valve Drive",
    );

    let err = extract_metadata(&run).unwrap_err();
    let MetadataError::Parse(parse_error) = &err else {
        panic!("unexpected error {:?}", err);
    };
    assert!(matches!(
        parse_error.root_cause(),
        ParseError::UnknownDevice(name) if name == "Valve Drive"
    ));
    assert!(err.to_string().ends_with("Unknown Device Valve Drive"));
}

#[test]
fn test_schema_violation_reports_path() {
    let dir = tempdir().unwrap();
    let run = copy_run(dir.path());
    let next_device = "</Device>\n  <Device DeviceID=\"3\">";
    edit(
        &run,
        "Devices.xml",
        &format!("<Delay>0</Delay>\n    <Vendor>1</Vendor>\n  {}", next_device),
        &format!("<Delay>soon</Delay>\n    <Vendor>1</Vendor>\n  {}", next_device),
    );

    let acq_data = acq_data_dir(&run);
    let err = DeviceList::read_from_dir(acq_data, &ParseOptions::default()).unwrap_err();
    match err.root_cause() {
        ParseError::Schema(SchemaError::Violation { path, .. }) => {
            assert_eq!(path, "/Devices/Device[2]/Delay");
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_validation_can_be_disabled() {
    let dir = tempdir().unwrap();
    let run = copy_run(dir.path());
    // An element the schema does not declare, but the parser ignores
    edit(
        &run,
        "DeviceConfigInfo.xml",
        "<DisplayName>Q-TOF</DisplayName>",
        "<DisplayName>Q-TOF</DisplayName>\n    <Location>Bench 2</Location>",
    );

    let err = extract_metadata(&run).unwrap_err();
    assert!(matches!(
        err,
        MetadataError::Parse(ref e) if matches!(e.root_cause(), ParseError::Schema(_))
    ));

    let metadata = extract_metadata_with(&run, &ParseOptions::without_validation()).unwrap();
    assert_eq!(
        metadata.device_config_info.get_device("QTOF_1").unwrap().display_name,
        "Q-TOF"
    );
}

#[test]
fn test_invalid_enum_is_not_defaulted() {
    let dir = tempdir().unwrap();
    let run = copy_run(dir.path());
    edit(&run, "Contents.xml", "<AcqStatus>3</AcqStatus>", "<AcqStatus>7</AcqStatus>");

    let err = extract_metadata(&run).unwrap_err();
    assert!(matches!(
        err,
        MetadataError::Parse(ref e)
            if matches!(e.root_cause(), ParseError::InvalidField { field, .. } if field == "AcqStatus")
    ));
}

#[test]
fn test_json_round_trip() {
    let metadata = extract_metadata(sample_run()).unwrap();
    let json = metadata.to_json_pretty().unwrap();
    let restored = agilent_metadata::MetadataDict::from_json(&json).unwrap();
    assert_eq!(restored, metadata);
    assert_eq!(restored.devices.get_device(4).unwrap().display_name, "Column Comp.");
}
