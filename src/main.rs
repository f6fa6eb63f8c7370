#![windows_subsystem = "windows"]

use std::{error::Error, io::Write, path::PathBuf, process};

use iced::Size;
use tracing::error;

use biodata_gui::{
    config::{Config, ConfigError, DEFAULT_FILE_NAME},
    gui::App,
    logger, VERSION,
};

#[derive(Debug, PartialEq)]
enum Arg {
    DatadirPath(PathBuf),
}

fn parse_args(args: Vec<String>) -> Result<Vec<Arg>, Box<dyn Error>> {
    let mut res = Vec::new();

    if args.len() > 1 && (args[1] == "--version" || args[1] == "-v") {
        eprintln!("{}", VERSION);
        process::exit(1);
    }

    if args.len() > 1 && (args[1] == "--help" || args[1] == "-h") {
        eprintln!(
            r#"
Usage: biodata-gui [OPTIONS]

Options:
    --datadir <PATH>    Path of the biodata-gui datadir
    -v, --version       Display biodata-gui version
    -h, --help          Print help
        "#
        );
        process::exit(1);
    }

    for (i, arg) in args.iter().enumerate() {
        if arg == "--datadir" {
            if let Some(a) = args.get(i + 1) {
                res.push(Arg::DatadirPath(PathBuf::from(a)));
            } else {
                return Err("missing arg to --datadir".into());
            }
        } else if arg.contains("--") {
            return Err(format!("unknown arg: {}", arg).into());
        }
    }

    Ok(res)
}

fn default_datadir() -> Result<PathBuf, Box<dyn Error>> {
    dirs::data_dir()
        .map(|d| d.join("biodata-gui"))
        .ok_or_else(|| "Failed to locate the platform data directory".into())
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = parse_args(std::env::args().collect())?;
    let datadir = match args.as_slice() {
        [] => default_datadir()?,
        [Arg::DatadirPath(path)] => path.clone(),
        _ => {
            return Err("Unknown args combination".into());
        }
    };
    if !datadir.exists() {
        std::fs::create_dir_all(&datadir)?;
    }

    let config = match Config::from_file(&datadir.join(DEFAULT_FILE_NAME)) {
        Ok(config) => config,
        // The file is optional, its absence means defaults.
        Err(ConfigError::NotFound) => Config::default(),
        Err(e) => return Err(e.into()),
    };

    let log_level = match logger::parse_log_level()? {
        Some(level) => level,
        None => config.log_level()?,
    };
    logger::setup_logger(log_level, &datadir)?;

    setup_panic_hook();

    let window_settings = iced::window::Settings {
        min_size: Some(Size {
            width: 900.0,
            height: 600.0,
        }),
        ..Default::default()
    };

    if let Err(e) = iced::application(App::title, App::update, App::view)
        .subscription(App::subscription)
        .window(window_settings)
        .run_with(move || App::new(config))
    {
        error!("{}", e);
        Err(format!("Failed to launch UI: {}", e).into())
    } else {
        Ok(())
    }
}

// A panic in any thread should stop the main thread, and print the panic.
fn setup_panic_hook() {
    std::panic::set_hook(Box::new(move |panic_info| {
        let file = panic_info
            .location()
            .map(|l| l.file())
            .unwrap_or_else(|| "'unknown'");
        let line = panic_info
            .location()
            .map(|l| l.line().to_string())
            .unwrap_or_else(|| "'unknown'".to_string());

        let bt = backtrace::Backtrace::new();
        let info = panic_info
            .payload()
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| panic_info.payload().downcast_ref::<String>().cloned());
        error!(
            "panic occurred at line {} of file {}: {:?}\n{:?}",
            line, file, info, bt
        );

        std::io::stdout().flush().expect("Flushing stdout");
        std::process::exit(1);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args() {
        assert!(parse_args(vec!["--meth".into()]).is_err());
        assert!(parse_args(vec!["--datadir".into()]).is_err());
        assert_eq!(
            Some(vec![Arg::DatadirPath(PathBuf::from("hello"))]),
            parse_args(vec!["--datadir".into(), "hello".into()]).ok()
        );
        assert_eq!(Some(vec![]), parse_args(vec!["biodata-gui".into()]).ok());
    }
}
