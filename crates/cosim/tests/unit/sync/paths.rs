//! # Trial Path Tests

use std::path::{Path, PathBuf};

use cosim_core::common::error::ConfigError;
use cosim_core::config::{Config, GeneralConfig};
use cosim_core::sync::TrialPaths;
use rstest::rstest;

#[test]
fn test_paths_derive_from_output_dir() {
    let paths = TrialPaths::new("/tmp/run7").unwrap();
    assert_eq!(paths.output_dir(), Path::new("/tmp/run7"));
    assert_eq!(paths.target_program(), Path::new("/tmp/run7/.input_0.elf"));
    assert_eq!(paths.signature_file(), Path::new("/tmp/run7/.rtl_sig_0.txt"));
}

#[test]
fn test_empty_output_dir_is_rejected() {
    assert!(matches!(TrialPaths::new(""), Err(ConfigError::EmptyOutputDir)));
}

#[rstest]
#[case(&["sim", "+output=/tmp/a"], "/tmp/a")]
#[case(&["+output=/tmp/a", "+verbose", "+output=/tmp/b"], "/tmp/b")]
#[case(&["+max-cycles=100", "+output=rel/dir"], "rel/dir")]
fn test_from_args_picks_last_output(#[case] args: &[&str], #[case] expected: &str) {
    let paths = TrialPaths::from_args(args.iter().copied()).unwrap();
    assert_eq!(paths.output_dir(), Path::new(expected));
}

#[rstest]
#[case(&[])]
#[case(&["sim", "+verbose"])]
#[case(&["+output="])]
fn test_from_args_without_output_fails(#[case] args: &[&str]) {
    assert!(matches!(
        TrialPaths::from_args(args.iter().copied()),
        Err(ConfigError::EmptyOutputDir)
    ));
}

#[rstest]
#[case(Some("/tmp/cli"), Some("/tmp/config"), "/tmp/cli")]
#[case(None, Some("/tmp/config"), "/tmp/config")]
#[case(Some("/tmp/cli"), None, "/tmp/cli")]
fn test_resolve_prefers_explicit_dir(
    #[case] explicit: Option<&str>,
    #[case] configured: Option<&str>,
    #[case] expected: &str,
) {
    let general = GeneralConfig {
        output_dir: configured.map(PathBuf::from),
        ..GeneralConfig::default()
    };
    let paths = TrialPaths::resolve(explicit.map(Path::new), &general).unwrap();
    assert_eq!(paths.target_program(), Path::new(expected).join(".input_0.elf").as_path());
}

#[test]
fn test_resolve_without_any_dir_fails() {
    assert!(matches!(
        TrialPaths::resolve(None, &GeneralConfig::default()),
        Err(ConfigError::EmptyOutputDir)
    ));
}

#[test]
fn test_resolve_reads_dir_from_json_config() {
    let config = Config::from_json(r#"{ "general": { "output_dir": "/tmp/run7" } }"#).unwrap();
    let paths = TrialPaths::resolve(None, &config.general).unwrap();
    assert_eq!(paths.signature_file(), Path::new("/tmp/run7/.rtl_sig_0.txt"));
}
