mod common;

use mdtoc_core::AnyEmptyResult;
use mdtoc_core::SAMPLE_CONFIG;

#[test]
fn can_init() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::mdtoc_cmd()
		.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Created"));

	let config_path = tmp.path().join("mdtoc.toml");
	assert!(config_path.exists());

	let config_content = std::fs::read_to_string(&config_path)?;
	assert_eq!(config_content, SAMPLE_CONFIG);
	assert!(config_content.contains("toc_caption"));
	assert!(config_content.contains("toc_max_level = 3"));

	Ok(())
}

#[test]
fn init_does_not_overwrite() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let config_path = tmp.path().join("mdtoc.toml");
	std::fs::write(&config_path, "existing config")?;

	common::mdtoc_cmd()
		.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("already exists"));

	assert_eq!(std::fs::read_to_string(&config_path)?, "existing config");

	Ok(())
}

#[test]
fn init_respects_other_config_candidates() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::create_dir_all(tmp.path().join(".config"))?;
	std::fs::write(tmp.path().join(".config/mdtoc.toml"), "toc_max_level = 2\n")?;

	common::mdtoc_cmd()
		.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("already exists"));

	assert!(!tmp.path().join("mdtoc.toml").exists());

	Ok(())
}
