//! Integration tests for the codeaudit agent

mod audit_run;
mod cli_contracts;
mod config_loading;
mod fixture_ground_truth;
mod support;
mod tool_contracts;
