use std::{env, path::PathBuf, process::Command};

// Compiles the fixture plugin the integration tests load through the real
// discovery path. rustc is invoked directly because the fixture must be a
// standalone cdylib artifact, not a workspace member the tests link against.
fn main() {
    let fixture = "tests/fixtures/basic_hook.rs";
    println!("cargo:rerun-if-changed={fixture}");

    let out = PathBuf::from(env::var("OUT_DIR").unwrap());
    let rustc = env::var("RUSTC").unwrap_or_else(|_| "rustc".into());
    let status = Command::new(&rustc)
        .args(["--crate-type=cdylib", "--edition=2021", fixture, "-o"])
        .arg(out.join("libbasic_hook.so"))
        .status()
        .expect("failed to run rustc for the fixture plugin");
    if !status.success() {
        panic!("fixture plugin failed to compile");
    }
}
