//! Integration tests for the spasecite CLI commands.
//!
//! Everything here runs offline: conversion works on local fixture files and
//! the upload paths are exercised only up to the credential check. Tests run
//! in serial because the credential lookup reads environment variables.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use serial_test::serial;
use tempfile::tempdir;

// Helper function to create a clean command instance with no ambient
// DataCite credentials.
fn spasecite() -> Command {
  let mut cmd = Command::cargo_bin("spasecite").unwrap();
  cmd.env_remove("DATACITE_USERNAME").env_remove("DATACITE_PASSWORD");
  cmd
}

const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Spase xmlns="http://www.spase-group.org/data/schema">
  <Version>2.6.1</Version>
  <NumericalData>
    <ResourceID>spase://NASA/NumericalData/ACE/MAG/L2/PT16S</ResourceID>
    <ResourceHeader>
      <ResourceName>ACE Magnetic Field 16-Second Level 2 Data</ResourceName>
      <ReleaseDate>2023-05-04T12:34:56Z</ReleaseDate>
      <Description>Magnetic field vectors at 16 second resolution.</Description>
      <Contact>
        <PersonID>spase://SMWG/Person/Charles.W.Smith</PersonID>
        <Role>PrincipalInvestigator</Role>
      </Contact>
      <PublicationInfo>
        <Authors>Smith, Charles W.</Authors>
        <PublicationDate>2022-01-01T00:00:00Z</PublicationDate>
        <PublishedBy>Space Physics Data Facility</PublishedBy>
      </PublicationInfo>
    </ResourceHeader>
    <AccessInformation>
      <RepositoryID>spase://SMWG/Repository/NASA/GSFC/SPDF</RepositoryID>
      <Format>CDF</Format>
    </AccessInformation>
    <MeasurementType>MagneticField</MeasurementType>
    <ObservedRegion>Heliosphere.NearEarth</ObservedRegion>
    <Association>
      <AssociationID>spase://NASA/NumericalData/ACE/MAG/L2/PT1H</AssociationID>
      <AssociationType>PartOf</AssociationType>
    </Association>
  </NumericalData>
</Spase>"#;

// A record with no publication info, release date, or repository: nothing
// to derive a publisher or publication year from.
const SPARSE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Spase xmlns="http://www.spase-group.org/data/schema">
  <Version>2.6.1</Version>
  <NumericalData>
    <ResourceID>spase://NASA/NumericalData/Sparse</ResourceID>
    <ResourceHeader>
      <ResourceName>A sparse record</ResourceName>
      <Contact>
        <PersonID>spase://SMWG/Person/Jane.E.Doe</PersonID>
        <Role>PrincipalInvestigator</Role>
      </Contact>
    </ResourceHeader>
  </NumericalData>
</Spase>"#;

// Helper to write a fixture and return its path.
fn write_fixture(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
  let path = dir.join(name);
  std::fs::write(&path, content).unwrap();
  path
}

#[test]
#[serial]
fn test_convert_writes_the_record_tree() {
  let dir = tempdir().unwrap();
  let input = write_fixture(dir.path(), "PT16S.xml", SAMPLE);
  let out = dir.path().join("dois");

  spasecite()
    .arg("convert")
    .arg(&input)
    .arg("--out")
    .arg(&out)
    .arg("--prefix")
    .arg("10.48322")
    .arg("--accept-defaults")
    .assert()
    .success()
    .stdout(predicate::str::contains("Converted record written"))
    .stdout(predicate::str::contains("1 creator(s)"));

  let record_path = out.join("NASA/NumericalData/ACE/MAG/L2/PT16S.json");
  assert!(record_path.exists());

  let content = std::fs::read_to_string(&record_path).unwrap();
  assert!(content.contains(r#""type": "dois""#));
  assert!(content.contains(r#""prefix": "10.48322""#));
  assert!(content.contains("IsPartOf"));

  dir.close().unwrap();
}

#[test]
#[serial]
fn test_convert_is_idempotent() {
  let dir = tempdir().unwrap();
  let input = write_fixture(dir.path(), "PT16S.xml", SAMPLE);
  let out = dir.path().join("dois");
  let record_path = out.join("NASA/NumericalData/ACE/MAG/L2/PT16S.json");

  spasecite()
    .arg("convert")
    .arg(&input)
    .arg("--out")
    .arg(&out)
    .arg("--accept-defaults")
    .assert()
    .success();
  let first = std::fs::read(&record_path).unwrap();

  spasecite()
    .arg("convert")
    .arg(&input)
    .arg("--out")
    .arg(&out)
    .arg("--accept-defaults")
    .assert()
    .success();
  let second = std::fs::read(&record_path).unwrap();

  assert_eq!(first, second);
  dir.close().unwrap();
}

#[test]
#[serial]
fn test_convert_reports_missing_fields() {
  let dir = tempdir().unwrap();
  let input = write_fixture(dir.path(), "Sparse.xml", SPARSE);

  spasecite()
    .arg("convert")
    .arg(&input)
    .arg("--out")
    .arg(dir.path().join("dois"))
    .arg("--accept-defaults")
    .assert()
    .failure()
    .stderr(predicate::str::contains("Missing required SPASE field"));

  dir.close().unwrap();
}

#[test]
#[serial]
fn test_convert_rejects_non_xml_input() {
  let dir = tempdir().unwrap();
  let input = write_fixture(dir.path(), "record.json", "{}");

  spasecite()
    .arg("convert")
    .arg(&input)
    .arg("--out")
    .arg(dir.path().join("dois"))
    .arg("--accept-defaults")
    .assert()
    .failure()
    .stderr(predicate::str::contains("must be an XML file"));

  dir.close().unwrap();
}

#[test]
#[serial]
fn test_publish_requires_credentials() {
  let dir = tempdir().unwrap();
  let input = write_fixture(dir.path(), "PT16S.xml", SAMPLE);
  let out = dir.path().join("dois");

  spasecite()
    .arg("convert")
    .arg(&input)
    .arg("--out")
    .arg(&out)
    .arg("--accept-defaults")
    .assert()
    .success();

  // Non-interactive run with no environment credentials stops before any
  // network traffic.
  spasecite()
    .arg("publish")
    .arg(out.join("NASA/NumericalData/ACE/MAG/L2/PT16S.json"))
    .arg("--test")
    .arg("--accept-defaults")
    .assert()
    .failure()
    .stderr(predicate::str::contains("DATACITE_USERNAME"));

  dir.close().unwrap();
}

#[test]
#[serial]
fn test_publish_rejects_unvalidated_records() {
  let dir = tempdir().unwrap();
  let record = dir.path().join("bad.json");
  // A syntactically valid record missing every required field.
  std::fs::write(
    &record,
    r#"{"data":{"type":"dois","attributes":{"url":"","creators":[],"titles":[],"publisher":{"name":""},"publicationYear":0,"types":{"resourceTypeGeneral":""}}}}"#,
  )
  .unwrap();

  spasecite()
    .arg("publish")
    .arg(&record)
    .arg("--test")
    .arg("--accept-defaults")
    .assert()
    .failure()
    .stderr(predicate::str::contains("Missing required SPASE field"));

  dir.close().unwrap();
}
