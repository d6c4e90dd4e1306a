use assert_cmd::prelude::*;
use std::process::Command;

#[test]
fn run_one_way() {
    // only one legal action exists at every step, so the plan is the same
    // no matter how successors get shuffled
    Command::main_binary()
        .unwrap()
        .arg("levels/one-way.txt")
        .assert()
        .success()
        .stdout("Push(S)\n");
}

#[test]
fn run_one_way_greedy_flood_fill() {
    Command::main_binary()
        .unwrap()
        .arg("--strategy")
        .arg("greedy")
        .arg("--flood-fill")
        .arg("levels/one-way.txt")
        .assert()
        .success()
        .stdout("Push(S)\n");
}

#[test]
fn run_one_way_uppercase_selector() {
    // selectors match regardless of case, like the original client
    Command::main_binary()
        .unwrap()
        .arg("--strategy")
        .arg("ASTAR")
        .arg("levels/one-way.txt")
        .assert()
        .success()
        .stdout("Push(S)\n");
}

#[test]
fn run_no_solution() {
    // sealed goal chamber - a normal failure outcome, not an error
    Command::main_binary()
        .unwrap()
        .arg("levels/no-solution.txt")
        .assert()
        .success()
        .stdout("No solution\n");
}

#[test]
fn run_already_solved() {
    // no boxes and no goals - empty plan, nothing on stdout
    Command::main_binary()
        .unwrap()
        .arg("levels/empty.txt")
        .assert()
        .success()
        .stdout("");
}

#[test]
fn run_invalid_weight() {
    Command::main_binary()
        .unwrap()
        .arg("--weight")
        .arg("lots")
        .arg("levels/one-way.txt")
        .assert()
        .failure()
        .stdout("");
}

#[test]
fn run_missing_file() {
    Command::main_binary()
        .unwrap()
        .arg("levels/does-not-exist.txt")
        .assert()
        .failure()
        .stdout("");
}
