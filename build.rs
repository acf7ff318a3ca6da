use std::process::Command;

/// Exposes `IMAGE_ENHANCER_VERSION` to the binary: the package version,
/// followed by `git describe --tags --always --dirty` in parentheses when
/// built from a git checkout, e.g. `0.1.0 (v0.1.0-3-gabc1234-dirty)`.
fn main() {
    for path in [".git/HEAD", ".git/index", ".git/refs/tags"] {
        println!("cargo:rerun-if-changed={path}");
    }

    let package = std::env::var("CARGO_PKG_VERSION").unwrap_or_default();
    let version = match git_describe() {
        Some(describe) => format!("{package} ({describe})"),
        None => package,
    };
    println!("cargo:rustc-env=IMAGE_ENHANCER_VERSION={version}");
}

fn git_describe() -> Option<String> {
    let out = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        .ok()
        .filter(|out| out.status.success())?;
    let describe = String::from_utf8(out.stdout).ok()?.trim().to_owned();
    (!describe.is_empty()).then_some(describe)
}
