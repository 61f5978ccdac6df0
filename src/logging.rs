use anyhow::Result;
use log::LevelFilter;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

pub fn log_file_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("plugandtest")
        .join("logs")
        .join("portal.log")
}

pub fn parse_level(level: &str) -> LevelFilter {
    LevelFilter::from_str(level).unwrap_or_else(|_| {
        eprintln!("Unknown log level '{}', using info", level);
        LevelFilter::Info
    })
}

/// Send log output to a file so it never draws over the terminal UI. Falls back
/// to env_logger on stderr when the file cannot be opened.
pub fn init(level: &str) -> Result<()> {
    let level = parse_level(level);
    let path = log_file_path();

    let file = path
        .parent()
        .map(fs::create_dir_all)
        .transpose()
        .map_err(anyhow::Error::from)
        .and_then(|_| fern::log_file(&path).map_err(anyhow::Error::from));

    match file {
        Ok(file) => {
            fern::Dispatch::new()
                .format(|out, message, record| {
                    out.finish(format_args!(
                        "{} {:<5} [{}] {}",
                        chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                        record.level(),
                        record.target(),
                        message
                    ))
                })
                .level(level)
                .chain(file)
                .apply()?;
            log::info!("Logging to {}", path.display());
        }
        Err(e) => {
            env_logger::Builder::new().filter_level(level).try_init()?;
            log::warn!("Could not open log file {}: {}", path.display(), e);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_levels_case_insensitively() {
        assert_eq!(parse_level("debug"), LevelFilter::Debug);
        assert_eq!(parse_level("WARN"), LevelFilter::Warn);
        assert_eq!(parse_level("off"), LevelFilter::Off);
        assert_eq!(parse_level("chatty"), LevelFilter::Info);
    }

    #[test]
    fn log_file_lives_under_plugandtest() {
        let path = log_file_path();
        assert!(path.ends_with("plugandtest/logs/portal.log"));
    }
}
