// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowgen-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowgen and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! File logging.
//!
//! The terminal belongs to the TUI, so diagnostics go to a daily-rotated file in the configured
//! log directory. `RUST_LOG` overrides the default level.

use std::fs;
use std::io;
use std::path::Path;
use std::time::{Duration, SystemTime};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

const LOG_FILE_PREFIX: &str = "flowgen.log";
const LOG_RETENTION: Duration = Duration::from_secs(3 * 24 * 60 * 60);

/// Installs the global subscriber. Keep the returned guard alive until exit so buffered lines
/// are flushed.
pub fn init(log_dir: &Path, debug: bool) -> io::Result<WorkerGuard> {
    fs::create_dir_all(log_dir)?;
    cleanup_old_logs(log_dir, LOG_RETENTION)?;

    let appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false).with_target(true))
        .try_init()
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err.to_string()))?;

    Ok(guard)
}

/// Removes flowgen log files last modified more than `max_age` ago. Other files are left alone.
pub fn cleanup_old_logs(log_dir: &Path, max_age: Duration) -> io::Result<usize> {
    if !log_dir.exists() {
        return Ok(0);
    }
    let Some(cutoff) = SystemTime::now().checked_sub(max_age) else {
        return Ok(0);
    };

    let mut removed = 0;
    for entry in fs::read_dir(log_dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let is_ours = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with(LOG_FILE_PREFIX));
        if !is_ours {
            continue;
        }
        let modified = entry.metadata().and_then(|meta| meta.modified());
        if matches!(modified, Ok(modified) if modified < cutoff) && fs::remove_file(&path).is_ok() {
            removed += 1;
        }
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::cleanup_old_logs;
    use std::fs;
    use std::time::Duration;

    #[test]
    fn cleanup_removes_only_expired_flowgen_logs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let ours = dir.path().join("flowgen.log.2026-01-01");
        let other = dir.path().join("other-app.log");
        fs::write(&ours, "old").expect("write");
        fs::write(&other, "old").expect("write");
        std::thread::sleep(Duration::from_millis(20));

        let removed = cleanup_old_logs(dir.path(), Duration::from_millis(1)).expect("cleanup");

        assert_eq!(removed, 1);
        assert!(!ours.exists());
        assert!(other.exists());
    }

    #[test]
    fn cleanup_keeps_recent_logs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let recent = dir.path().join("flowgen.log.2026-10-18");
        fs::write(&recent, "recent").expect("write");

        let removed =
            cleanup_old_logs(dir.path(), Duration::from_secs(3 * 24 * 60 * 60)).expect("cleanup");

        assert_eq!(removed, 0);
        assert!(recent.exists());
    }

    #[test]
    fn cleanup_ignores_missing_dir_and_subdirectories() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert_eq!(
            cleanup_old_logs(&dir.path().join("missing"), Duration::ZERO).expect("cleanup"),
            0
        );

        let subdir = dir.path().join("flowgen.log.subdir");
        fs::create_dir(&subdir).expect("mkdir");
        cleanup_old_logs(dir.path(), Duration::ZERO).expect("cleanup");
        assert!(subdir.exists());
    }
}
