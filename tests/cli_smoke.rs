use assert_cmd::Command;
use predicates::str::contains;

#[test]
fn taskdash_help_works() {
    Command::cargo_bin("taskdash")
        .expect("binary")
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("Task Dashboard"));
}

#[test]
fn subcommand_help_works() {
    let subcommands = [
        "add", "list", "edit", "done", "status", "rm", "reorder", "move", "dash",
    ];

    for cmd in subcommands {
        Command::cargo_bin("taskdash")
            .expect("binary")
            .arg(cmd)
            .arg("--help")
            .assert()
            .success();
    }
}
