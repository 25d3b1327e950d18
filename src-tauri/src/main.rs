#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app_constants;
mod app_runtime;
mod app_types;
mod build_mode;
mod content_source;
mod desktop_bridge_commands;
mod exit_events;
mod helper_readiness;
mod launch_plan;
mod launch_strategy;
mod logging;
mod main_window;
mod process_control;
mod process_supervisor;
mod runtime_paths;
mod shell_config;
mod shell_lifecycle;
mod single_instance;
mod startup_task;

pub(crate) use app_constants::*;
pub(crate) use app_types::{ShellBridgeState, ShellContext};
pub(crate) use logging::{append_desktop_log, append_shutdown_log, append_startup_log};

fn main() {
    app_runtime::run();
}
