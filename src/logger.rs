use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use log::{Level, LevelFilter, Log, Metadata, Record};
use time::{OffsetDateTime, macros::format_description};

/// Terminal stream log lines go to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Console {
    Stdout,
    Stderr,
}

/// `log` backend printing to a console stream and, optionally, appending to a file
pub struct Logger {
    level: Level,
    console: Option<Console>,
    colors: bool,
    file: Option<Mutex<File>>,
}

impl Logger {
    pub fn new(level: Level, console: Option<Console>, colors: bool) -> Self {
        Self { level, console, colors, file: None }
    }

    /// Also append uncolored lines to `path`. A file that cannot be opened is ignored.
    pub fn with_file(mut self, path: &Path) -> Self {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => self.file = Some(Mutex::new(file)),
            Err(e) => eprintln!("Cannot open log file {:?}: {}", path, e),
        }
        self
    }

    /// Install a logger configured from `POSTSHELF_LOG` (or `RUST_LOG`),
    /// `POSTSHELF_LOG_FILE` and `NO_COLOR`, at info level by default
    pub fn init() -> Result<(), log::SetLoggerError> {
        Self::init_with_default(Level::Info)
    }

    /// Like [`Logger::init`], falling back to `default` when no level is configured
    pub fn init_with_default(default: Level) -> Result<(), log::SetLoggerError> {
        let level = ["POSTSHELF_LOG", "RUST_LOG"]
            .iter()
            .find_map(|key| std::env::var(key).ok()?.parse::<Level>().ok())
            .unwrap_or(default);

        let mut logger = Logger::new(level, Some(Console::Stderr), std::env::var_os("NO_COLOR").is_none());
        if let Some(path) = std::env::var_os("POSTSHELF_LOG_FILE") {
            logger = logger.with_file(Path::new(&path));
        }

        log::set_max_level(LevelFilter::Trace);
        log::set_logger(Box::leak(Box::new(logger)))
    }

    fn timestamp() -> String {
        OffsetDateTime::now_utc()
            .format(format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"))
            .unwrap_or_default()
    }

    fn color(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1b[31m",
            Level::Warn => "\x1b[33m",
            Level::Info => "\x1b[36m",
            Level::Debug => "\x1b[35m",
            Level::Trace => "\x1b[37m",
        }
    }

    fn line(record: &Record, timestamp: &str, colored: bool) -> String {
        let level = record.level();
        let (start, end) = if colored { (Self::color(level), "\x1b[0m") } else { ("", "") };
        format!(
            "{start}[{timestamp}] {:<5}{end} {}: {}\n",
            level.as_str(),
            record.target(),
            record.args()
        )
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let timestamp = Self::timestamp();

        if let Some(console) = self.console {
            let line = Self::line(record, &timestamp, self.colors);
            let _ = match console {
                Console::Stdout => std::io::stdout().write_all(line.as_bytes()),
                Console::Stderr => std::io::stderr().write_all(line.as_bytes()),
            };
        }

        if let Some(Ok(mut file)) = self.file.as_ref().map(Mutex::lock) {
            let _ = file.write_all(Self::line(record, &timestamp, false).as_bytes());
        }
    }

    fn flush(&self) {
        let _ = match self.console {
            Some(Console::Stdout) => std::io::stdout().flush(),
            Some(Console::Stderr) => std::io::stderr().flush(),
            None => Ok(()),
        };
        if let Some(Ok(mut file)) = self.file.as_ref().map(Mutex::lock) {
            let _ = file.flush();
        }
    }
}
