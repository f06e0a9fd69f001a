//! The llvm-ext build script.
//!
//! Compiles the C++ shims in `src/wrappers.cc` against the LLVM headers
//! reported by `llvm-config`. Linking the LLVM libraries themselves stays
//! with `llvm-sys`'s build script; this one only adds the shim objects.

use std::env;
use std::path::PathBuf;
use std::process::Command;

use semver::Version;

/// Minimum LLVM the shims are written against.
const MINIMUM_LLVM_MAJOR: u64 = 14;

/// Locate `llvm-config`, preferring the prefix `llvm-sys` builds against.
fn llvm_config_path() -> PathBuf {
    if let Ok(prefix) = env::var("LLVM_SYS_140_PREFIX") {
        return PathBuf::from(prefix).join("bin").join("llvm-config");
    }
    PathBuf::from("llvm-config")
}

/// Get the output from running `llvm-config` with the given argument.
fn llvm_config(arg: &str) -> String {
    let out = Command::new(llvm_config_path())
        .arg(arg)
        .output()
        .unwrap_or_else(|e| panic!("failed to execute llvm-config: {e}"));
    String::from_utf8(out.stdout).expect("llvm-config output was not UTF-8")
}

/// The LLVM version from `llvm-config --version`, with any `svn`/`git`
/// suffix dropped.
fn llvm_version() -> Version {
    let raw = llvm_config("--version");
    let numeric: String = raw
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    Version::parse(&numeric)
        .unwrap_or_else(|e| panic!("could not parse llvm-config version '{}': {e}", raw.trim()))
}

fn main() {
    println!("cargo::rerun-if-changed=src/wrappers.cc");
    println!("cargo::rerun-if-env-changed=LLVM_SYS_140_PREFIX");

    let version = llvm_version();
    assert!(
        version.major >= MINIMUM_LLVM_MAJOR,
        "LLVM {MINIMUM_LLVM_MAJOR} or higher is required (found {version})"
    );

    let mut build = cc::Build::new();
    build.cpp(true).file("src/wrappers.cc");
    for flag in llvm_config("--cxxflags").split_whitespace() {
        build.flag(flag);
    }
    build.compile("llvm_ext_wrappers");
}
