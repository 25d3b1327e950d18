use std::{
    fs::{self, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
    sync::Mutex,
};

use chrono::Local;

use crate::{runtime_paths, DESKTOP_LOG_FILE, LOG_ROTATE_BYTES};

static LOG_WRITE_LOCK: Mutex<()> = Mutex::new(());

pub(crate) fn resolve_desktop_log_path(log_dir: Option<PathBuf>, file_name: &str) -> PathBuf {
    log_dir
        .unwrap_or_else(std::env::temp_dir)
        .join(file_name)
}

pub(crate) fn format_log_line(category: &str, message: &str) -> String {
    format!(
        "[{}] [{}] {}",
        Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
        category,
        message
    )
}

pub(crate) fn rotate_if_needed(path: &Path, max_bytes: u64) -> io::Result<()> {
    let size = match fs::metadata(path) {
        Ok(metadata) => metadata.len(),
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(error) => return Err(error),
    };
    if size < max_bytes {
        return Ok(());
    }

    let mut rotated = path.as_os_str().to_owned();
    rotated.push(".1");
    fs::rename(path, PathBuf::from(rotated))
}

pub(crate) fn append_log_line(path: &Path, line: &str, max_bytes: u64) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    rotate_if_needed(path, max_bytes)?;

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{line}")
}

fn append_log(category: &str, message: &str) {
    let line = format_log_line(category, message);
    eprintln!("{line}");

    let path = resolve_desktop_log_path(
        runtime_paths::resolve_log_dir(runtime_paths::default_packaged_root_dir()),
        DESKTOP_LOG_FILE,
    );
    let _guard = LOG_WRITE_LOCK.lock();
    if let Err(error) = append_log_line(&path, &line, LOG_ROTATE_BYTES) {
        eprintln!("failed to write desktop log {}: {}", path.display(), error);
    }
}

pub(crate) fn append_startup_log(message: &str) {
    append_log("startup", message);
}

pub(crate) fn append_desktop_log(message: &str) {
    append_log("desktop", message);
}

pub(crate) fn append_shutdown_log(message: &str) {
    append_log("shutdown", message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_log_line_includes_category_and_message() {
        let line = format_log_line("startup", "desktop process starting");
        assert!(line.starts_with('['));
        assert!(line.ends_with("[startup] desktop process starting"));
    }

    #[test]
    fn append_log_line_creates_parent_directory() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("logs").join("desktop.log");
        append_log_line(&path, "first", 1024).expect("append first");
        append_log_line(&path, "second", 1024).expect("append second");

        let content = fs::read_to_string(&path).expect("read log");
        assert_eq!(content, "first\nsecond\n");
    }

    #[test]
    fn append_log_line_rotates_oversized_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("desktop.log");
        fs::write(&path, "0123456789").expect("seed log");

        append_log_line(&path, "fresh", 8).expect("append after rotation");

        assert_eq!(fs::read_to_string(&path).expect("read log"), "fresh\n");
        assert_eq!(
            fs::read_to_string(temp.path().join("desktop.log.1")).expect("read rotated"),
            "0123456789"
        );
    }

    #[test]
    fn resolve_desktop_log_path_prefers_log_dir() {
        let dir = PathBuf::from("/tmp/gallery-logs");
        assert_eq!(
            resolve_desktop_log_path(Some(dir.clone()), DESKTOP_LOG_FILE),
            dir.join(DESKTOP_LOG_FILE)
        );
    }
}
