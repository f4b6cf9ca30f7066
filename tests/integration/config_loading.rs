use codeaudit::config::{ConfigLoader, DegradedReason, Readiness, RunSettings};
use codeaudit::provider::ProviderType;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn defaults_without_a_config_file() {
    let temp = TempDir::new().unwrap();
    let config = ConfigLoader::load(temp.path()).unwrap();
    assert_eq!(config.provider.provider_type, ProviderType::OpenAI);
    assert_eq!(config.provider.model, "gpt-4");
    assert_eq!(config.provider.default_options.temperature, Some(0.1));
    assert_eq!(config.provider.request_timeout_secs, 120);
    assert_eq!(config.run.max_iterations, 15);
    assert_eq!(config.workspace.base_dir, PathBuf::from("fixtures"));
    assert_eq!(config.logging.level, "warn");
}

#[test]
fn workspace_file_overrides_defaults() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("codeaudit.toml"),
        r#"
[provider]
provider_type = "ollama"
model = "llama3"
endpoint = "http://localhost:11434/v1"

[provider.default_options]
max_tokens = 2048

[workspace]
base_dir = "samples"
output_dir = "reports"

[run]
max_iterations = 4
"#,
    )
    .unwrap();

    let config = ConfigLoader::load(temp.path()).unwrap();
    assert_eq!(config.provider.provider_type, ProviderType::Ollama);
    assert_eq!(config.provider.default_options.max_tokens, Some(2048));
    assert_eq!(config.provider.default_options.temperature, Some(0.1));
    assert_eq!(config.run.max_iterations, 4);

    let settings = RunSettings::resolve_with(&config, temp.path(), None, no_env).unwrap();
    assert_eq!(settings.readiness, Readiness::Ready);
    assert_eq!(settings.provider.model, "llama3");
    assert_eq!(settings.workspace.base_dir, temp.path().join("samples"));
    assert_eq!(
        settings.workspace.output_dir,
        temp.path().join("samples").join("reports")
    );
}

#[test]
fn explicit_file_is_loaded() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("alt.toml");
    fs::write(&path, "[provider]\nmodel = \"gpt-4o\"\n").unwrap();
    let config = ConfigLoader::load_from_file(&path).unwrap();
    assert_eq!(config.provider.model, "gpt-4o");
}

#[test]
fn invalid_values_fail_resolution() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("codeaudit.toml"),
        "[provider]\nprovider_type = \"local\"\n",
    )
    .unwrap();
    let config = ConfigLoader::load(temp.path()).unwrap();
    assert!(RunSettings::resolve_with(&config, temp.path(), None, no_env).is_err());
}

#[test]
fn placeholder_key_from_environment_degrades() {
    let temp = TempDir::new().unwrap();
    let config = ConfigLoader::load(temp.path()).unwrap();
    let settings = RunSettings::resolve_with(&config, temp.path(), Some("gpt-4o"), |key| {
        (key == "OPENAI_API_KEY").then(|| "your_openai_api_key_here".to_string())
    })
    .unwrap();
    assert_eq!(
        settings.readiness,
        Readiness::Degraded(DegradedReason::CredentialPlaceholder)
    );
    assert_eq!(settings.provider.model, "gpt-4o");
}
