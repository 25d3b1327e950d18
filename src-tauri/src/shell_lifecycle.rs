use crate::{content_source::ContentSource, process_control::StopOutcome};

/// Window operations the lifecycle needs from the GUI runtime.
pub(crate) trait ShellHost {
    fn open_window_count(&self) -> usize;
    fn create_main_window(&self, spec: &MainWindowSpec) -> Result<(), String>;
    fn focus_main_window(&self) -> Result<(), String>;
    /// Only reached when `on_ready` sees `InstanceLock::HeldElsewhere`.
    fn request_quit(&self, exit_code: i32);
}

pub(crate) trait HelperControl {
    fn start_helper(&self) -> Result<Option<u32>, String>;
    fn stop_helper(&self) -> Result<StopOutcome, String>;
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MainWindowSpec {
    pub(crate) title: &'static str,
    pub(crate) width: f64,
    pub(crate) height: f64,
    pub(crate) content: ContentSource,
    pub(crate) open_devtools: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LifecyclePhase {
    NotStarted,
    SingleWindowOpen,
    AllWindowsClosed,
    Quitting,
}

impl LifecyclePhase {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not-started",
            Self::SingleWindowOpen => "single-window-open",
            Self::AllWindowsClosed => "all-windows-closed",
            Self::Quitting => "quitting",
        }
    }
}

/// What the application does once its last window is gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PlatformConvention {
    /// macOS: stay alive in the dock until the user quits explicitly.
    StayActive,
    QuitOnAllClosed,
}

impl PlatformConvention {
    pub(crate) fn current() -> Self {
        if cfg!(target_os = "macos") {
            Self::StayActive
        } else {
            Self::QuitOnAllClosed
        }
    }
}

/// Result of the single-instance check. In the running app the single-instance plugin
/// exits a contending process before setup, so setup always reports `Acquired`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InstanceLock {
    Acquired,
    HeldElsewhere,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReadyOutcome {
    WindowCreated { helper_pid: Option<u32> },
    YieldedToExistingInstance,
    AlreadyStarted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AllClosedDecision {
    KeepRunning,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SecondInstanceAction {
    FocusedExisting,
    CreatedWindow,
    Ignored,
}

#[derive(Debug)]
pub(crate) struct ShellLifecycle {
    phase: LifecyclePhase,
    convention: PlatformConvention,
    helper_stopped: bool,
}

impl ShellLifecycle {
    pub(crate) fn new(convention: PlatformConvention) -> Self {
        Self {
            phase: LifecyclePhase::NotStarted,
            convention,
            helper_stopped: false,
        }
    }

    pub(crate) fn phase(&self) -> LifecyclePhase {
        self.phase
    }

    pub(crate) fn is_quitting(&self) -> bool {
        self.phase == LifecyclePhase::Quitting
    }

    /// Runtime-ready handler. The helper is always started before the window exists;
    /// a failed helper start is logged and the window is still created.
    pub(crate) fn on_ready<F>(
        &mut self,
        lock: InstanceLock,
        host: &dyn ShellHost,
        helper: &dyn HelperControl,
        spec: &MainWindowSpec,
        log: F,
    ) -> Result<ReadyOutcome, String>
    where
        F: Fn(&str),
    {
        if self.phase != LifecyclePhase::NotStarted {
            log(&format!(
                "ready event ignored in phase {}",
                self.phase.as_str()
            ));
            return Ok(ReadyOutcome::AlreadyStarted);
        }

        if lock == InstanceLock::HeldElsewhere {
            log("another instance holds the single-instance lock; quitting");
            self.phase = LifecyclePhase::Quitting;
            self.helper_stopped = true;
            host.request_quit(0);
            return Ok(ReadyOutcome::YieldedToExistingInstance);
        }

        let helper_pid = match helper.start_helper() {
            Ok(Some(pid)) => {
                log(&format!("helper process started: pid={pid}"));
                Some(pid)
            }
            Ok(None) => {
                log("helper launch disabled for this build");
                None
            }
            Err(error) => {
                log(&format!("failed to start helper process: {error}"));
                None
            }
        };

        host.create_main_window(spec)?;
        self.phase = LifecyclePhase::SingleWindowOpen;
        Ok(ReadyOutcome::WindowCreated { helper_pid })
    }

    pub(crate) fn on_all_windows_closed(&mut self) -> AllClosedDecision {
        if self.is_quitting() {
            return AllClosedDecision::Quit;
        }

        match self.convention {
            PlatformConvention::StayActive => {
                self.phase = LifecyclePhase::AllWindowsClosed;
                AllClosedDecision::KeepRunning
            }
            PlatformConvention::QuitOnAllClosed => {
                self.phase = LifecyclePhase::Quitting;
                AllClosedDecision::Quit
            }
        }
    }

    /// Re-activation (dock click). Returns whether a window was created.
    pub(crate) fn on_activate(
        &mut self,
        host: &dyn ShellHost,
        spec: &MainWindowSpec,
    ) -> Result<bool, String> {
        if matches!(
            self.phase,
            LifecyclePhase::NotStarted | LifecyclePhase::Quitting
        ) {
            return Ok(false);
        }
        if host.open_window_count() > 0 {
            return Ok(false);
        }

        host.create_main_window(spec)?;
        self.phase = LifecyclePhase::SingleWindowOpen;
        Ok(true)
    }

    pub(crate) fn on_second_instance(
        &mut self,
        host: &dyn ShellHost,
        spec: &MainWindowSpec,
    ) -> Result<SecondInstanceAction, String> {
        match self.phase {
            LifecyclePhase::NotStarted | LifecyclePhase::Quitting => {
                Ok(SecondInstanceAction::Ignored)
            }
            LifecyclePhase::SingleWindowOpen | LifecyclePhase::AllWindowsClosed => {
                if host.open_window_count() > 0 {
                    host.focus_main_window()?;
                    return Ok(SecondInstanceAction::FocusedExisting);
                }
                host.create_main_window(spec)?;
                self.phase = LifecyclePhase::SingleWindowOpen;
                Ok(SecondInstanceAction::CreatedWindow)
            }
        }
    }

    /// Enters `Quitting` and stops the helper. Only the first call reaches the helper.
    pub(crate) fn begin_quit<F>(&mut self, helper: &dyn HelperControl, log: F) -> bool
    where
        F: Fn(&str),
    {
        self.phase = LifecyclePhase::Quitting;
        if self.helper_stopped {
            return false;
        }
        self.helper_stopped = true;

        match helper.stop_helper() {
            Ok(outcome) => log(&format!("helper process {}", outcome.as_str())),
            Err(error) => log(&format!("failed to stop helper process: {error}")),
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, path::PathBuf};

    use super::*;

    #[derive(Default)]
    struct RecordingShell {
        calls: RefCell<Vec<&'static str>>,
        windows: RefCell<usize>,
        fail_helper_start: bool,
    }

    impl RecordingShell {
        fn calls(&self) -> Vec<&'static str> {
            self.calls.borrow().clone()
        }

        fn close_all_windows(&self) {
            *self.windows.borrow_mut() = 0;
        }
    }

    impl ShellHost for RecordingShell {
        fn open_window_count(&self) -> usize {
            *self.windows.borrow()
        }

        fn create_main_window(&self, _spec: &MainWindowSpec) -> Result<(), String> {
            self.calls.borrow_mut().push("create_window");
            *self.windows.borrow_mut() += 1;
            Ok(())
        }

        fn focus_main_window(&self) -> Result<(), String> {
            self.calls.borrow_mut().push("focus_window");
            Ok(())
        }

        fn request_quit(&self, _exit_code: i32) {
            self.calls.borrow_mut().push("quit");
        }
    }

    impl HelperControl for RecordingShell {
        fn start_helper(&self) -> Result<Option<u32>, String> {
            self.calls.borrow_mut().push("start_helper");
            if self.fail_helper_start {
                return Err("helper missing".to_string());
            }
            Ok(Some(42))
        }

        fn stop_helper(&self) -> Result<StopOutcome, String> {
            self.calls.borrow_mut().push("stop_helper");
            Ok(StopOutcome::Stopped)
        }
    }

    fn spec() -> MainWindowSpec {
        MainWindowSpec {
            title: "Component Gallery",
            width: 800.0,
            height: 600.0,
            content: ContentSource::Packaged(PathBuf::from("index.html")),
            open_devtools: false,
        }
    }

    fn started(convention: PlatformConvention, shell: &RecordingShell) -> ShellLifecycle {
        let mut lifecycle = ShellLifecycle::new(convention);
        lifecycle
            .on_ready(InstanceLock::Acquired, shell, shell, &spec(), |_| {})
            .expect("ready should succeed");
        lifecycle
    }

    #[test]
    fn on_ready_starts_helper_before_creating_window() {
        let shell = RecordingShell::default();
        let mut lifecycle = ShellLifecycle::new(PlatformConvention::QuitOnAllClosed);
        let outcome = lifecycle
            .on_ready(InstanceLock::Acquired, &shell, &shell, &spec(), |_| {})
            .expect("ready should succeed");

        assert_eq!(
            outcome,
            ReadyOutcome::WindowCreated {
                helper_pid: Some(42)
            }
        );
        assert_eq!(shell.calls(), vec!["start_helper", "create_window"]);
        assert_eq!(lifecycle.phase(), LifecyclePhase::SingleWindowOpen);
    }

    #[test]
    fn on_ready_creates_window_even_when_helper_fails() {
        let shell = RecordingShell {
            fail_helper_start: true,
            ..RecordingShell::default()
        };
        let mut lifecycle = ShellLifecycle::new(PlatformConvention::QuitOnAllClosed);
        let logs = RefCell::new(Vec::new());
        let outcome = lifecycle
            .on_ready(InstanceLock::Acquired, &shell, &shell, &spec(), |line| {
                logs.borrow_mut().push(line.to_string())
            })
            .expect("ready should succeed");

        assert_eq!(outcome, ReadyOutcome::WindowCreated { helper_pid: None });
        assert_eq!(shell.open_window_count(), 1);
        assert!(logs.borrow()[0].contains("helper missing"));
    }

    #[test]
    fn contending_instance_quits_without_window_or_helper() {
        let shell = RecordingShell::default();
        let mut lifecycle = ShellLifecycle::new(PlatformConvention::QuitOnAllClosed);
        let outcome = lifecycle
            .on_ready(InstanceLock::HeldElsewhere, &shell, &shell, &spec(), |_| {})
            .expect("ready should succeed");

        assert_eq!(outcome, ReadyOutcome::YieldedToExistingInstance);
        assert_eq!(shell.calls(), vec!["quit"]);
        assert_eq!(shell.open_window_count(), 0);
        assert!(!lifecycle.begin_quit(&shell, |_| {}));
    }

    #[test]
    fn second_ready_event_does_not_create_another_window() {
        let shell = RecordingShell::default();
        let mut lifecycle = started(PlatformConvention::QuitOnAllClosed, &shell);
        let outcome = lifecycle
            .on_ready(InstanceLock::Acquired, &shell, &shell, &spec(), |_| {})
            .expect("ready should succeed");
        assert_eq!(outcome, ReadyOutcome::AlreadyStarted);
        assert_eq!(shell.open_window_count(), 1);
    }

    #[test]
    fn second_instance_focuses_existing_window() {
        let shell = RecordingShell::default();
        let mut lifecycle = started(PlatformConvention::QuitOnAllClosed, &shell);
        let action = lifecycle
            .on_second_instance(&shell, &spec())
            .expect("second instance should be handled");
        assert_eq!(action, SecondInstanceAction::FocusedExisting);
        assert_eq!(shell.open_window_count(), 1);
    }

    #[test]
    fn second_instance_recreates_window_after_all_closed_on_stay_active_platform() {
        let shell = RecordingShell::default();
        let mut lifecycle = started(PlatformConvention::StayActive, &shell);
        shell.close_all_windows();
        assert_eq!(
            lifecycle.on_all_windows_closed(),
            AllClosedDecision::KeepRunning
        );
        let action = lifecycle
            .on_second_instance(&shell, &spec())
            .expect("second instance should be handled");
        assert_eq!(action, SecondInstanceAction::CreatedWindow);
        assert_eq!(lifecycle.phase(), LifecyclePhase::SingleWindowOpen);
    }

    #[test]
    fn all_windows_closed_keeps_running_on_stay_active_platform() {
        let shell = RecordingShell::default();
        let mut lifecycle = started(PlatformConvention::StayActive, &shell);
        shell.close_all_windows();
        assert_eq!(
            lifecycle.on_all_windows_closed(),
            AllClosedDecision::KeepRunning
        );
        assert_eq!(lifecycle.phase(), LifecyclePhase::AllWindowsClosed);
        assert!(!shell.calls().contains(&"stop_helper"));
    }

    #[test]
    fn all_windows_closed_quits_on_other_platforms() {
        let shell = RecordingShell::default();
        let mut lifecycle = started(PlatformConvention::QuitOnAllClosed, &shell);
        shell.close_all_windows();
        assert_eq!(lifecycle.on_all_windows_closed(), AllClosedDecision::Quit);
        assert!(lifecycle.is_quitting());
    }

    #[test]
    fn activate_with_no_windows_creates_exactly_one() {
        let shell = RecordingShell::default();
        let mut lifecycle = started(PlatformConvention::StayActive, &shell);
        shell.close_all_windows();
        lifecycle.on_all_windows_closed();

        assert!(lifecycle.on_activate(&shell, &spec()).expect("activate"));
        assert!(!lifecycle.on_activate(&shell, &spec()).expect("activate"));
        assert_eq!(shell.open_window_count(), 1);
        assert_eq!(lifecycle.phase(), LifecyclePhase::SingleWindowOpen);
    }

    #[test]
    fn activate_is_ignored_while_quitting() {
        let shell = RecordingShell::default();
        let mut lifecycle = started(PlatformConvention::QuitOnAllClosed, &shell);
        shell.close_all_windows();
        lifecycle.begin_quit(&shell, |_| {});
        assert!(!lifecycle.on_activate(&shell, &spec()).expect("activate"));
        assert_eq!(
            lifecycle
                .on_second_instance(&shell, &spec())
                .expect("second instance"),
            SecondInstanceAction::Ignored
        );
        assert_eq!(shell.open_window_count(), 0);
    }

    #[test]
    fn begin_quit_stops_helper_exactly_once() {
        let shell = RecordingShell::default();
        let mut lifecycle = started(PlatformConvention::QuitOnAllClosed, &shell);
        assert!(lifecycle.begin_quit(&shell, |_| {}));
        assert!(!lifecycle.begin_quit(&shell, |_| {}));
        let stops = shell
            .calls()
            .into_iter()
            .filter(|call| *call == "stop_helper")
            .count();
        assert_eq!(stops, 1);
        assert_eq!(lifecycle.phase(), LifecyclePhase::Quitting);
    }

    #[test]
    fn platform_convention_matches_target_os() {
        let expected = if cfg!(target_os = "macos") {
            PlatformConvention::StayActive
        } else {
            PlatformConvention::QuitOnAllClosed
        };
        assert_eq!(PlatformConvention::current(), expected);
    }
}
