//! Agent and Task Descriptors
//!
//! Immutable records describing who the model plays (role, goal, backstory,
//! tools) and what it is asked to do (instructions, expected output), plus
//! rendering of both into chat prompts.

pub mod descriptor;
pub mod prompt;
pub mod task;

pub use descriptor::AgentDescriptor;
pub use prompt::{render_system_prompt, render_task_prompt, resolve_prompt_path};
pub use task::TaskDescriptor;
