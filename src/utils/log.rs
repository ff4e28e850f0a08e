use crate::utils::config::Config;
use chrono::Local;
use env_logger::{Builder, Target};
use log::LevelFilter;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::process;

pub fn parse_level(level: &str) -> LevelFilter {
    match level {
        level if level.eq_ignore_ascii_case("off") => LevelFilter::Off,
        level if level.eq_ignore_ascii_case("error") => LevelFilter::Error,
        level if level.eq_ignore_ascii_case("warn") => LevelFilter::Warn,
        level if level.eq_ignore_ascii_case("info") => LevelFilter::Info,
        level if level.eq_ignore_ascii_case("debug") => LevelFilter::Debug,
        level if level.eq_ignore_ascii_case("trace") => LevelFilter::Trace,
        _ => LevelFilter::Warn,
    }
}

/// Installs the global logger. Records go to standard error, and to a
/// dated file as well when a log directory is configured; standard output
/// stays free for commands.
pub fn init_logger(config: &Config) {
    let level = parse_level(&config.logger_level);

    let mut writers: Vec<Box<dyn Write + Send + Sync>> = vec![Box::new(io::stderr())];
    let mut file_error = None;
    if let Some(dir) = &config.logger_dir {
        match open_log_file(dir) {
            Ok(file) => writers.push(Box::new(file)),
            Err(e) => file_error = Some(e),
        }
    }

    Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "[PID:{}][{}] {} - {}",
                process::id(),
                record.level(),
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.args()
            )
        })
        .target(Target::Pipe(Box::new(MultiWriter { writers })))
        .filter(Some(config.name.as_str()), level)
        .filter(None, LevelFilter::Warn)
        .init();

    if let Some(e) = file_error {
        log::warn!("cannot open log file, logging to stderr only: {}", e);
    }
    log::debug!("log level set to {}", level);
}

fn open_log_file(dir: &std::path::Path) -> io::Result<File> {
    fs::create_dir_all(dir)?;
    let date = Local::now().format("%Y-%m-%d");
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(format!("minish_{}.log", date)))
}

struct MultiWriter {
    writers: Vec<Box<dyn Write + Send + Sync>>,
}

impl Write for MultiWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for writer in &mut self.writers {
            writer.write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        for writer in &mut self.writers {
            writer.flush()?;
        }
        Ok(())
    }
}
