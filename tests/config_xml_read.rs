//! Config files on disk: sections, DEFAULT inheritance, legacy keys, validation.

use serial_test::serial;
use std::fs;
use tempfile::tempdir;

use move_files::config::xml::load_config_from_xml_path;
use move_files::config::{CONFIG_ENV, ConfigSource, LoadResult};
use move_files::{BatchLimit, ConfigIssue, LogLevel, MoveFilesError, load_or_init, resolve_config_source};

const XML: &str = r#"<config>
  <log_level>info</log_level>
  <log_file>  </log_file>
  <section name="DEFAULT">
    <source_path>/data/outgoing</source_path>
    <target_path>/mnt/archive</target_path>
    <batch_size>0</batch_size>
  </section>
  <section name="NIGHTLY">
    <batch_size>5000</batch_size>
    <connect>yes</connect>
    <target_drive>nas:/export</target_drive>
    <share>/mnt/archive</share>
  </section>
  <section name="broken">
    <batch_size>many</batch_size>
    <connect_source>sometimes</connect_source>
    <connect_target>on</connect_target>
  </section>
</config>"#;

#[test]
fn sections_inherit_and_validate() {
    let td = tempdir().unwrap();
    let path = td.path().join("config.xml");
    fs::write(&path, XML).unwrap();

    let file = load_config_from_xml_path(&path).unwrap();
    assert_eq!(file.log_level, Some(LogLevel::Info));
    assert_eq!(file.log_file, None, "blank log_file means unset");
    assert_eq!(file.section_names(), vec!["DEFAULT", "NIGHTLY", "broken"]);

    let default = file.section("default").unwrap().validate().unwrap();
    assert_eq!(default.batch_size, BatchLimit::Unlimited);
    assert!(default.target_share.is_none());

    let nightly = file.section("nightly").unwrap().validate().unwrap();
    assert_eq!(nightly.section, "NIGHTLY");
    assert_eq!(nightly.batch_size, BatchLimit::Entries(5000));
    assert_eq!(nightly.source_path, std::path::PathBuf::from("/data/outgoing"));
    let share = nightly.target_share.expect("legacy connect/share map to the target role");
    assert_eq!(share.drive, "nas:/export");
    assert_eq!(share.share, "/mnt/archive");
}

#[test]
fn all_issues_are_reported_together() {
    let td = tempdir().unwrap();
    let path = td.path().join("config.xml");
    fs::write(&path, XML).unwrap();
    let file = load_config_from_xml_path(&path).unwrap();

    let err = file.section("BROKEN").unwrap().validate().unwrap_err();
    let MoveFilesError::InvalidConfig { section, issues } = err else {
        panic!("expected InvalidConfig");
    };
    assert_eq!(section, "BROKEN");
    assert_eq!(
        issues,
        vec![
            ConfigIssue::BatchSizeNotInteger("many".into()),
            ConfigIssue::NotBoolean {
                key: "connect_source",
                value: "sometimes".into()
            },
            ConfigIssue::Missing("target_drive"),
            ConfigIssue::Missing("target_share"),
        ]
    );
}

#[test]
fn bad_legacy_connect_is_reported_even_when_connect_target_is_set() {
    let td = tempdir().unwrap();
    let path = td.path().join("config.xml");
    fs::write(
        &path,
        r#"<config><section name="DEFAULT">
    <source_path>/data/outgoing</source_path>
    <target_path>/mnt/archive</target_path>
    <connect_target>yes</connect_target>
    <connect>maybe</connect>
    <target_drive>nas:/export</target_drive>
    <target_share>/mnt/archive</target_share>
  </section></config>"#,
    )
    .unwrap();
    let file = load_config_from_xml_path(&path).unwrap();

    let err = file.section("DEFAULT").unwrap().validate().unwrap_err();
    let MoveFilesError::InvalidConfig { issues, .. } = err else {
        panic!("expected InvalidConfig");
    };
    assert_eq!(
        issues,
        vec![ConfigIssue::NotBoolean {
            key: "connect",
            value: "maybe".into()
        }]
    );
}

#[test]
fn malformed_xml_is_a_read_error() {
    let td = tempdir().unwrap();
    let path = td.path().join("bad.xml");
    fs::write(&path, "<config><section name=\"DEFAULT\"><source_path>/x</config>").unwrap();
    let err = load_config_from_xml_path(&path).unwrap_err();
    assert_eq!(err.code(), 12);
}

#[test]
fn explicit_missing_file_is_an_error_not_a_template() {
    let td = tempdir().unwrap();
    let path = td.path().join("absent.xml");
    assert!(load_or_init(&ConfigSource::Flag(path.clone())).is_err());
    assert!(!path.exists());
}

#[test]
fn default_location_gets_a_loadable_template() {
    let td = tempdir().unwrap();
    let path = td.path().join("move_files").join("config.xml");
    let created = load_or_init(&ConfigSource::Default(path.clone())).unwrap();
    assert!(matches!(created, LoadResult::CreatedTemplate(ref p) if *p == path));

    let LoadResult::Loaded(file) = load_or_init(&ConfigSource::Default(path)).unwrap() else {
        panic!("second call should load the template");
    };
    let s = file.section("DEFAULT").unwrap().validate().unwrap();
    assert_eq!(s.batch_size, BatchLimit::Unlimited);
}

#[test]
#[serial]
fn flag_beats_env_beats_default() {
    let td = tempdir().unwrap();
    let env_cfg = td.path().join("env.xml");
    let flag_cfg = td.path().join("flag.xml");

    unsafe {
        std::env::set_var(CONFIG_ENV, &env_cfg);
    }
    assert_eq!(
        resolve_config_source(Some(&flag_cfg)),
        Some(ConfigSource::Flag(flag_cfg.clone()))
    );
    assert_eq!(resolve_config_source(None), Some(ConfigSource::Env(env_cfg)));

    unsafe {
        std::env::remove_var(CONFIG_ENV);
    }
    assert!(matches!(resolve_config_source(None), Some(ConfigSource::Default(_)) | None));
}
