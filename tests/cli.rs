#![cfg(all(feature = "cli", feature = "generation"))]

//! Process-level checks for the binaries that need no model.

use std::process::Command;

const AVATAR_ENV: &[&str] = &[
    "AVATAR_CHAT_MODEL",
    "AVATAR_SPEECH_MODEL",
    "AVATAR_LANGUAGE",
    "AVATAR_AUDIO_PATH",
    "AVATAR_ACCELERATOR",
];

fn command(bin: &str) -> Command {
    let mut cmd = Command::new(bin);
    for key in AVATAR_ENV {
        cmd.env_remove(key);
    }
    cmd
}

#[test]
fn chat_without_utterance_exits_non_zero() {
    let output = command(env!("CARGO_BIN_EXE_avatar-chat")).output().unwrap();

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("UTTERANCE"), "stderr: {stderr}");
}

#[test]
fn chat_rejects_unknown_model_before_loading() {
    let output = command(env!("CARGO_BIN_EXE_avatar-chat"))
        .args(["--model", "gpt-9", "hello"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("gpt-9"), "stderr: {stderr}");
}

#[test]
fn chat_lists_models() {
    let output = command(env!("CARGO_BIN_EXE_avatar-chat"))
        .arg("--list-models")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for name in ["flan-t5-small", "flan-t5-base", "flan-t5-large"] {
        assert!(stdout.contains(name), "missing {name} in: {stdout}");
    }
}

#[test]
fn transcribe_rejects_missing_model_file() {
    let output = command(env!("CARGO_BIN_EXE_avatar-transcribe"))
        .args(["--model", "/nonexistent/ggml-custom.bin"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn transcribe_rejects_invalid_accelerator_env() {
    let output = command(env!("CARGO_BIN_EXE_avatar-transcribe"))
        .env("AVATAR_ACCELERATOR", "quantum")
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("runtime.accelerator"), "stderr: {stderr}");
}

#[test]
fn transcribe_ignores_chat_settings() {
    let output = command(env!("CARGO_BIN_EXE_avatar-transcribe"))
        .env("AVATAR_CHAT_MODEL", "my-own-t5")
        .args(["--model", "/nonexistent/ggml-custom.bin"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("speech.model"), "stderr: {stderr}");
    assert!(!stderr.contains("chat.model"), "stderr: {stderr}");
}

#[test]
fn chat_ignores_speech_settings() {
    let output = command(env!("CARGO_BIN_EXE_avatar-chat"))
        .env("AVATAR_SPEECH_MODEL", "whisper-ultra")
        .args(["--model", "gpt-9", "hello"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("chat.model"), "stderr: {stderr}");
    assert!(!stderr.contains("speech.model"), "stderr: {stderr}");
}
