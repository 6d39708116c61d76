use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub fn mdtab_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("mdtab"));
	cmd.env("NO_COLOR", "1").env_remove("MDTAB_LOG");
	cmd
}
