use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use crate::{logging, LOG_ROTATE_BYTES};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LaunchPlan {
    pub(crate) cmd: String,
    pub(crate) args: Vec<String>,
    pub(crate) cwd: PathBuf,
    pub(crate) hide_console: bool,
}

pub(crate) fn build_debug_command(plan: &LaunchPlan) -> Vec<String> {
    let mut parts = vec![plan.cmd.clone()];
    parts.extend(plan.args.clone());
    parts
}

pub(crate) fn custom_launch_plan(
    pieces: &[String],
    cwd: PathBuf,
    hide_console: bool,
) -> Result<LaunchPlan, String> {
    let (cmd, args) = pieces
        .split_first()
        .ok_or_else(|| "Custom helper command is empty.".to_string())?;

    Ok(LaunchPlan {
        cmd: cmd.clone(),
        args: args.to_vec(),
        cwd,
        hide_console,
    })
}

pub(crate) fn build_command(plan: &LaunchPlan, log_path: Option<&Path>) -> Result<Command, String> {
    if !plan.cwd.is_dir() {
        return Err(format!(
            "Helper working directory does not exist: {}",
            plan.cwd.display()
        ));
    }

    let mut command = Command::new(&plan.cmd);
    command
        .args(&plan.args)
        .current_dir(&plan.cwd)
        .stdin(Stdio::null())
        .env("PYTHONUNBUFFERED", "1");

    #[cfg(target_os = "windows")]
    {
        use std::os::windows::process::CommandExt;
        const CREATE_NO_WINDOW: u32 = 0x0800_0000;
        if plan.hide_console {
            command.creation_flags(CREATE_NO_WINDOW);
        }
    }

    match log_path {
        Some(log_path) => {
            if let Some(log_parent) = log_path.parent() {
                fs::create_dir_all(log_parent).map_err(|error| {
                    format!(
                        "Failed to create helper log directory {}: {}",
                        log_parent.display(),
                        error
                    )
                })?;
            }
            logging::rotate_if_needed(log_path, LOG_ROTATE_BYTES).map_err(|error| {
                format!("Failed to rotate helper log {}: {}", log_path.display(), error)
            })?;
            let stdout_file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_path)
                .map_err(|error| {
                    format!("Failed to open helper log {}: {}", log_path.display(), error)
                })?;
            let stderr_file = stdout_file
                .try_clone()
                .map_err(|error| format!("Failed to clone helper log handle: {error}"))?;
            command.stdout(Stdio::from(stdout_file));
            command.stderr(Stdio::from(stderr_file));
        }
        None => {
            command.stdout(Stdio::null());
            command.stderr(Stdio::null());
        }
    }

    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_launch_plan_splits_command_and_args() {
        let pieces = vec!["uv".to_string(), "run".to_string(), "api.py".to_string()];
        let plan = custom_launch_plan(&pieces, PathBuf::from("/srv"), false)
            .expect("custom plan should build");
        assert_eq!(plan.cmd, "uv");
        assert_eq!(plan.args, vec!["run".to_string(), "api.py".to_string()]);
        assert_eq!(build_debug_command(&plan), pieces);
    }

    #[test]
    fn custom_launch_plan_rejects_empty_command() {
        assert!(custom_launch_plan(&[], PathBuf::from("/srv"), false).is_err());
    }

    #[test]
    fn build_command_rejects_missing_working_directory() {
        let temp = tempfile::tempdir().expect("tempdir");
        let plan = LaunchPlan {
            cmd: "api".to_string(),
            args: Vec::new(),
            cwd: temp.path().join("missing"),
            hide_console: true,
        };
        let error = build_command(&plan, None).expect_err("missing cwd should fail");
        assert!(error.contains("does not exist"));
    }

    #[test]
    fn build_command_creates_log_directory() {
        let temp = tempfile::tempdir().expect("tempdir");
        let log_path = temp.path().join("logs").join("helper.log");
        let plan = LaunchPlan {
            cmd: "api".to_string(),
            args: Vec::new(),
            cwd: temp.path().to_path_buf(),
            hide_console: false,
        };
        build_command(&plan, Some(&log_path)).expect("command should build");
        assert!(log_path.is_file());
    }

    #[test]
    fn build_command_rotates_oversized_helper_log() {
        let temp = tempfile::tempdir().expect("tempdir");
        let log_path = temp.path().join("helper.log");
        fs::File::create(&log_path)
            .and_then(|file| file.set_len(LOG_ROTATE_BYTES))
            .expect("oversized log");
        let plan = LaunchPlan {
            cmd: "api".to_string(),
            args: Vec::new(),
            cwd: temp.path().to_path_buf(),
            hide_console: false,
        };

        build_command(&plan, Some(&log_path)).expect("command should build");
        assert!(temp.path().join("helper.log.1").is_file());
        assert_eq!(fs::metadata(&log_path).expect("metadata").len(), 0);
    }
}
