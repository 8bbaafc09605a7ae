//! Build script: embeds the `DEVTOOLS_VERSION` used by `devtools version`.
use std::process::Command;

fn main() {
    // A release pipeline sets DEVTOOLS_VERSION; local builds use git describe.
    if let Ok(version) = std::env::var("DEVTOOLS_VERSION") {
        println!("cargo:rustc-env=DEVTOOLS_VERSION={version}");
    } else if let Ok(output) = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        && output.status.success()
    {
        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !version.is_empty() {
            println!("cargo:rustc-env=DEVTOOLS_VERSION={version}");
        }
    }

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-env-changed=DEVTOOLS_VERSION");
}
