use clap::{CommandFactory, Parser};
use codeaudit::tooling::cli::{Cli, CliContext, Commands};

use crate::integration::support::seeded_workspace;

#[test]
fn parse_valid_command_matrix() {
    let cases: Vec<Vec<&str>> = vec![
        vec!["codeaudit", "run"],
        vec!["codeaudit", "run", "--model", "gpt-4o-mini"],
        vec!["codeaudit", "run", "--task-file", "./task.md"],
        vec!["codeaudit", "selfcheck"],
        vec!["codeaudit", "doctor"],
        vec!["codeaudit", "doctor", "--format", "json", "--test-connectivity"],
        vec!["codeaudit", "tools", "--format", "json"],
        vec!["codeaudit", "config"],
        vec![
            "codeaudit",
            "--workspace",
            "/tmp/ws",
            "--config",
            "/tmp/ws/alt.toml",
            "--log-output",
            "file",
            "--log-file",
            "/tmp/ws/audit.log",
            "selfcheck",
        ],
    ];

    for args in cases {
        let parsed = Cli::try_parse_from(args.clone());
        assert!(parsed.is_ok(), "expected valid parse for args: {args:?}");
    }
}

#[test]
fn parse_rejects_unknown_commands_and_flags() {
    assert!(Cli::try_parse_from(["codeaudit"]).is_err());
    assert!(Cli::try_parse_from(["codeaudit", "audit"]).is_err());
    assert!(Cli::try_parse_from(["codeaudit", "run", "--retries", "3"]).is_err());
}

#[test]
fn help_lists_every_command() {
    let help = Cli::command().render_help().to_string();
    for name in ["run", "selfcheck", "doctor", "tools", "config"] {
        assert!(help.contains(name), "help is missing {name}");
    }
}

#[test]
fn workspace_config_file_is_discovered() {
    let workspace = seeded_workspace();
    std::fs::write(
        workspace.path().join("codeaudit.toml"),
        "[workspace]\ntarget = \"other.py\"\n",
    )
    .unwrap();
    let context = CliContext::new(workspace.path().to_path_buf(), None).unwrap();
    assert_eq!(context.config().workspace.target, "other.py");

    let output = context.execute(&Commands::Selfcheck).unwrap();
    assert_eq!(output.exit_code, 1);
    assert!(output.text.contains("Error: File 'other.py' not found."));
}

#[test]
fn explicit_config_file_must_exist() {
    let workspace = seeded_workspace();
    let missing = workspace.path().join("missing.toml");
    assert!(CliContext::new(workspace.path().to_path_buf(), Some(missing)).is_err());
}
