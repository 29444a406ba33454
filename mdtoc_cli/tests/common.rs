use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

#[allow(dead_code)]
pub const README: &str = "# Title\n\nIntro.\n\n## Install\n\n```sh\n# not a heading\n```\n\n## Usage\n\n#### Deep\n";

pub fn mdtoc_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("mdtoc"));
	cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
	cmd
}
