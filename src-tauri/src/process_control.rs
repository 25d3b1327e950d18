#[cfg(target_os = "windows")]
use std::process::{Command, Stdio};
use std::{
    process::{Child, ExitStatus},
    thread,
    time::{Duration, Instant},
};

const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(50);
#[cfg(target_os = "windows")]
const REAP_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StopSignal {
    /// Ask the helper to shut down, then kill it once the grace period runs out.
    Interrupt,
    Kill,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StopOutcome {
    NotStarted,
    AlreadyExited,
    Stopped,
    Killed,
    /// The polite stop could not be delivered, so the helper was terminated outright.
    ForceKilled,
}

impl StopOutcome {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not started",
            Self::AlreadyExited => "already exited",
            Self::Stopped => "stopped",
            Self::Killed => "killed after grace period",
            Self::ForceKilled => "force killed",
        }
    }
}

pub(crate) fn stop_child_process(
    child: &mut Child,
    signal: StopSignal,
    grace: Duration,
) -> Result<StopOutcome, String> {
    if child
        .try_wait()
        .map_err(|error| format!("Failed to poll helper process status: {error}"))?
        .is_some()
    {
        return Ok(StopOutcome::AlreadyExited);
    }

    #[cfg(target_os = "windows")]
    {
        // Windows has no SIGINT for detached processes; terminate the whole tree.
        let _ = signal;
        let tree_killed = Command::new("taskkill")
            .args(["/pid", &child.id().to_string(), "/t", "/f"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .stdin(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false);
        if !tree_killed {
            terminate(child)?;
        }

        if wait_with_grace(child, grace.max(REAP_TIMEOUT))?.is_none() {
            return Err(format!(
                "Helper process {} did not exit after termination",
                child.id()
            ));
        }
        return Ok(if tree_killed {
            StopOutcome::Stopped
        } else {
            StopOutcome::ForceKilled
        });
    }

    #[cfg(not(target_os = "windows"))]
    {
        let mut outcome = match signal {
            StopSignal::Interrupt => StopOutcome::Killed,
            StopSignal::Kill => StopOutcome::Stopped,
        };
        if signal == StopSignal::Interrupt {
            match send_interrupt(child) {
                Ok(()) => {
                    if wait_with_grace(child, grace)?.is_some() {
                        return Ok(StopOutcome::Stopped);
                    }
                }
                Err(_) => outcome = StopOutcome::ForceKilled,
            }
        }

        terminate(child)?;
        child
            .wait()
            .map_err(|error| format!("Failed to wait for helper process: {error}"))?;
        Ok(outcome)
    }
}

#[cfg(not(target_os = "windows"))]
fn send_interrupt(child: &Child) -> Result<(), String> {
    let pid = libc::pid_t::try_from(child.id())
        .map_err(|_| format!("Helper pid {} is out of range", child.id()))?;
    // SAFETY: `pid` belongs to a child that has not been reaped yet.
    if unsafe { libc::kill(pid, libc::SIGINT) } == 0 {
        Ok(())
    } else {
        Err(format!(
            "Failed to interrupt helper process {pid}: {}",
            std::io::Error::last_os_error()
        ))
    }
}

fn terminate(child: &mut Child) -> Result<(), String> {
    if let Err(error) = child.kill() {
        // The process may have exited between the last poll and the kill.
        if child.try_wait().ok().flatten().is_none() {
            return Err(format!("Failed to kill helper process: {error}"));
        }
    }
    Ok(())
}

pub(crate) fn wait_with_grace(
    child: &mut Child,
    grace: Duration,
) -> Result<Option<ExitStatus>, String> {
    let deadline = Instant::now() + grace;
    loop {
        if let Some(status) = child
            .try_wait()
            .map_err(|error| format!("Failed to poll helper process status: {error}"))?
        {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        thread::sleep(EXIT_POLL_INTERVAL);
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::{
        io::{BufRead, BufReader},
        process::{Command, Stdio},
    };

    use super::*;

    fn spawn_sleep() -> Child {
        Command::new("sleep")
            .arg("30")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .expect("sleep should spawn")
    }

    #[test]
    fn interrupt_stops_process_within_grace_period() {
        let mut child = spawn_sleep();
        let outcome = stop_child_process(&mut child, StopSignal::Interrupt, Duration::from_secs(5))
            .expect("stop should succeed");
        assert_eq!(outcome, StopOutcome::Stopped);
        assert!(child.try_wait().expect("poll").is_some());
    }

    #[test]
    fn interrupt_lets_helper_shut_down_on_its_own() {
        let mut child = Command::new("/bin/sh")
            .args([
                "-c",
                "trap 'exit 0' INT; echo ready; while :; do sleep 0.1; done",
            ])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .expect("sh should spawn");
        let mut line = String::new();
        BufReader::new(child.stdout.take().expect("stdout"))
            .read_line(&mut line)
            .expect("read ready line");
        assert_eq!(line.trim(), "ready");

        let outcome = stop_child_process(&mut child, StopSignal::Interrupt, Duration::from_secs(5))
            .expect("stop should succeed");
        assert_eq!(outcome, StopOutcome::Stopped);
        let status = child.wait().expect("wait");
        assert_eq!(status.code(), Some(0));
    }

    #[test]
    fn kill_stops_process_immediately() {
        let mut child = spawn_sleep();
        let outcome = stop_child_process(&mut child, StopSignal::Kill, Duration::ZERO)
            .expect("stop should succeed");
        assert_eq!(outcome, StopOutcome::Stopped);
    }

    #[test]
    fn stop_reports_already_exited_process() {
        let mut child = Command::new("true").spawn().expect("true should spawn");
        child.wait().expect("wait");
        let outcome = stop_child_process(&mut child, StopSignal::Interrupt, Duration::ZERO)
            .expect("stop should succeed");
        assert_eq!(outcome, StopOutcome::AlreadyExited);
    }

    #[test]
    fn wait_with_grace_times_out_for_running_process() {
        let mut child = spawn_sleep();
        let status = wait_with_grace(&mut child, Duration::from_millis(100)).expect("poll");
        assert!(status.is_none());
        let _ = child.kill();
        let _ = child.wait();
    }
}
