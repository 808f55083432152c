//! Progress reporting and log output collaborators.
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Receives status updates while a report runs.
pub trait Progress {
    fn set_message(&mut self, message: &str);
    fn advance(&mut self);
}

/// Receives pre-formatted report lines.
pub trait LogSink {
    fn log_topic(&mut self, line: &str);
    fn log_contributor(&mut self, line: &str);
    fn log_new_user(&mut self, line: &str);
}

impl<T: Progress + ?Sized> Progress for &mut T {
    fn set_message(&mut self, message: &str) {
        (**self).set_message(message)
    }

    fn advance(&mut self) {
        (**self).advance()
    }
}

impl<T: LogSink + ?Sized> LogSink for &mut T {
    fn log_topic(&mut self, line: &str) {
        (**self).log_topic(line)
    }

    fn log_contributor(&mut self, line: &str) {
        (**self).log_contributor(line)
    }

    fn log_new_user(&mut self, line: &str) {
        (**self).log_new_user(line)
    }
}

/// Reports progress through the `log` facade, one record per step.
#[derive(Debug, Default)]
pub struct LogProgress {
    message: String,
    step: usize,
}

impl LogProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn steps(&self) -> usize {
        self.step
    }
}

impl Progress for LogProgress {
    fn set_message(&mut self, message: &str) {
        self.message.clear();
        self.message.push_str(message);
    }

    fn advance(&mut self) {
        self.step += 1;
        log::info!("[{}] {}", self.step, self.message);
    }
}

/// Drives a terminal progress bar or spinner.
impl Progress for indicatif::ProgressBar {
    fn set_message(&mut self, message: &str) {
        indicatif::ProgressBar::set_message(self, message.to_owned());
    }

    fn advance(&mut self) {
        self.inc(1);
    }
}

/// Writes each kind of report line to its own file inside a directory:
/// `topics.log`, `contributors.log` and `new_users.log`.
///
/// Files are truncated when the log is created.
pub struct FileLog {
    dir: PathBuf,
    topics: BufWriter<File>,
    contributors: BufWriter<File>,
    new_users: BufWriter<File>,
}

impl FileLog {
    pub fn create(dir: impl AsRef<Path>) -> io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;

        let open = |name: &str| File::create(dir.join(name)).map(BufWriter::new);
        Ok(Self {
            topics: open("topics.log")?,
            contributors: open("contributors.log")?,
            new_users: open("new_users.log")?,
            dir,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.topics.flush()?;
        self.contributors.flush()?;
        self.new_users.flush()
    }

    fn write(writer: &mut BufWriter<File>, name: &str, line: &str) {
        if let Err(e) = writeln!(writer, "{}", line.trim_end_matches('\n')) {
            log::warn!("Failed to write to {}: {}", name, e);
        }
    }
}

impl LogSink for FileLog {
    fn log_topic(&mut self, line: &str) {
        Self::write(&mut self.topics, "topics.log", line);
    }

    fn log_contributor(&mut self, line: &str) {
        Self::write(&mut self.contributors, "contributors.log", line);
    }

    fn log_new_user(&mut self, line: &str) {
        Self::write(&mut self.new_users, "new_users.log", line);
    }
}

impl Drop for FileLog {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            log::warn!("Failed to flush logs in {}: {}", self.dir.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar_tracks_steps() {
        let mut bar = indicatif::ProgressBar::hidden();
        Progress::set_message(&mut bar, "Fetching feed...");
        bar.advance();
        Progress::set_message(&mut bar, "Retrieving members...");
        bar.advance();

        assert_eq!(bar.position(), 2);
        assert_eq!(bar.message(), "Retrieving members...");
    }

    #[test]
    fn test_file_log_writes_one_line_per_call() {
        let dir = tempfile::tempdir().unwrap();
        let logs = dir.path().join("logs");

        {
            let mut log = FileLog::create(&logs).unwrap();
            log.log_topic("g_1\t Likes: 10\t Comments: 3\n");
            log.log_topic("g_2\t Likes: 0\t Comments: 0");
            log.log_contributor("u1\tAnn\tPoints: 4\tTopics: 1\tComments: 3");
            log.log_new_user("42\tBob\n");
        }

        let read = |name: &str| fs::read_to_string(logs.join(name)).unwrap();
        assert_eq!(
            read("topics.log"),
            "g_1\t Likes: 10\t Comments: 3\ng_2\t Likes: 0\t Comments: 0\n"
        );
        assert_eq!(
            read("contributors.log"),
            "u1\tAnn\tPoints: 4\tTopics: 1\tComments: 3\n"
        );
        assert_eq!(read("new_users.log"), "42\tBob\n");
    }

    #[test]
    fn test_file_log_truncates_previous_run() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("topics.log"), "stale\n").unwrap();

        let mut log = FileLog::create(dir.path()).unwrap();
        log.log_topic("fresh");
        log.flush().unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join("topics.log")).unwrap(),
            "fresh\n"
        );
    }

    #[test]
    fn test_log_progress_counts_steps() {
        let mut progress = LogProgress::new();
        progress.set_message("Fetching feed...");
        progress.advance();
        progress.advance();
        assert_eq!(progress.steps(), 2);
    }
}
