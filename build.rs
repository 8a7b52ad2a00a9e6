//! Build script: version metadata and the CUDA pre-flight check.
//!
//! The `cuda` feature compiles both whisper.cpp and the candle kernels with
//! nvcc, so a missing toolkit is reported here before either of them fails
//! deep inside its own build output.

use std::process::Command;

fn main() {
    // Embed git short hash for version string
    if let Ok(output) = Command::new("git")
        .args(["rev-parse", "--short=7", "HEAD"])
        .output()
        && output.status.success()
    {
        let hash = String::from_utf8_lossy(&output.stdout).trim().to_string();
        println!("cargo:rustc-env=GIT_HASH={}", hash);
    }
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/heads/");

    if std::env::var_os("CARGO_FEATURE_CUDA").is_some() {
        check_cuda();
    }
}

fn check_cuda() {
    let toolkit = Command::new("nvcc")
        .arg("--version")
        .output()
        .ok()
        .filter(|out| out.status.success());

    let Some(out) = toolkit else {
        panic!(
            "\n\n\
            `nvcc` not found: the `cuda` feature needs the CUDA toolkit.\n\
            Install it from https://developer.nvidia.com/cuda-downloads\n\
            or build without GPU support: cargo build --release\n",
        );
    };

    let text = String::from_utf8_lossy(&out.stdout);
    match parse_cuda_version(&text) {
        Some((major, minor)) => println!("cargo::warning=CUDA toolkit {major}.{minor}"),
        None => println!("cargo::warning=CUDA toolkit (version unknown)"),
    }
    if let Some(driver) = driver_cuda_version() {
        println!("cargo::warning=CUDA driver supports up to {driver}");
    }
    println!(
        "cargo::warning=If the build fails with 'Unsupported gpu architecture', \
         the GPU needs a newer toolkit"
    );
}

/// Parse "release X.Y" from nvcc --version output.
fn parse_cuda_version(text: &str) -> Option<(u32, u32)> {
    // nvcc output: "Cuda compilation tools, release 12.4, V12.4.131"
    let after = text.split_once("release ")?.1;
    let (version, _) = after.split_once(',')?;
    let (major, minor) = version.split_once('.')?;
    Some((major.parse().ok()?, minor.parse().ok()?))
}

/// CUDA version reported in the nvidia-smi header ("CUDA Version: X.Y").
fn driver_cuda_version() -> Option<String> {
    let output = Command::new("nvidia-smi").output().ok()?;
    if !output.status.success() {
        return None;
    }

    let text = String::from_utf8_lossy(&output.stdout);
    let after = text.split_once("CUDA Version:")?.1.trim_start();
    let version: String = after
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    (!version.is_empty()).then_some(version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_cuda_version_standard() {
        let text = "nvcc: NVIDIA (R) Cuda compiler driver\n\
                    Copyright (c) 2005-2024 NVIDIA Corporation\n\
                    Cuda compilation tools, release 12.4, V12.4.131\n\
                    Build cuda_12.4.r12.4/compiler.34097967_0";
        assert_eq!(parse_cuda_version(text), Some((12, 4)));
    }

    #[test]
    fn parse_cuda_version_no_match() {
        assert_eq!(parse_cuda_version("no version here"), None);
    }

    #[test]
    fn parse_cuda_version_partial() {
        assert_eq!(parse_cuda_version("release abc, V1"), None);
    }
}
