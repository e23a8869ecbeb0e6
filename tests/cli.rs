use assert_cmd::Command;
use deepfilter_denoise::audio::{AudioClip, AudioFormat};
use predicates::prelude::*;
use tempfile::TempDir;

fn denoise() -> Command {
    let mut cmd = Command::cargo_bin("denoise").unwrap();
    cmd.env_remove("DEEPFILTER_MODEL_DIR").env_remove("RUST_LOG");
    cmd
}

#[test]
fn missing_input_exits_before_model_load() {
    let dir = TempDir::new().unwrap();

    denoise()
        .arg(dir.path().join("absent.wav"))
        .arg("--model-dir")
        .arg(dir.path().join("no-models-here"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Input file not found"))
        .stderr(predicate::str::contains("Processing aborted."))
        .stderr(predicate::str::contains("no-models-here").not());
}

#[test]
fn unknown_model_name_is_rejected_by_parser() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("clip.wav");
    AudioClip::new_mono(48000, vec![0.0; 480], AudioFormat::Int16).save_to_file(&input).unwrap();

    denoise()
        .arg(&input)
        .args(["-m", "DeepFilterNet4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("DeepFilterNet4"))
        .stdout(predicate::str::contains("=== DeepFilterNet Denoise ===").not());

    assert!(!dir.path().join("clip_denoise_DeepFilterNet.wav").exists());
}

#[test]
fn help_lists_model_variants() {
    denoise()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("DeepFilterNet2"))
        .stdout(predicate::str::contains("DeepFilterNet3"))
        .stdout(predicate::str::contains("--model"));
}

#[test]
fn missing_model_file_fails_without_output() {
    let dir = TempDir::new().unwrap();
    let models = dir.path().join("models");
    std::fs::create_dir(&models).unwrap();
    let input = dir.path().join("talk.wav");
    AudioClip::new_mono(48000, vec![0.1; 4800], AudioFormat::Int16).save_to_file(&input).unwrap();

    denoise()
        .arg(&input)
        .args(["-m", "DeepFilterNet3"])
        .arg("--model-dir")
        .arg(&models)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("talk_denoise_DeepFilterNet.wav"))
        .stderr(predicate::str::contains("DeepFilterNet3.onnx"))
        .stderr(predicate::str::contains("Processing aborted."));

    assert!(!dir.path().join("talk_denoise_DeepFilterNet.wav").exists());
}

#[test]
fn bad_config_file_exits_with_error() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("denoise.toml");
    std::fs::write(&config, "[model\nvariant = 3").unwrap();
    let input = dir.path().join("talk.wav");
    AudioClip::new_mono(48000, vec![0.1; 480], AudioFormat::Int16).save_to_file(&input).unwrap();

    denoise()
        .arg(&input)
        .arg("-c")
        .arg(&config)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to parse config file"));
}

#[test]
fn config_file_verbose_enables_debug_logging() {
    let dir = TempDir::new().unwrap();
    let models = dir.path().join("models");
    std::fs::create_dir(&models).unwrap();
    let config = dir.path().join("denoise.toml");
    std::fs::write(&config, "[output]\nverbose = true\n").unwrap();
    let input = dir.path().join("talk.wav");
    AudioClip::new_mono(48000, vec![0.1; 480], AudioFormat::Int16).save_to_file(&input).unwrap();

    denoise()
        .arg(&input)
        .arg("-c")
        .arg(&config)
        .arg("--model-dir")
        .arg(&models)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("DEBUG"))
        .stderr(predicate::str::contains("Model directory:"));
}
