use std::io::Write;

use serial_test::serial;
use tempfile::NamedTempFile;

use super::*;

#[test]
fn defaults_are_valid() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");
    assert_eq!(settings.backend.base_url.as_str(), "http://127.0.0.1:3000/");
    assert_eq!(settings.server.addr.port(), DEFAULT_PORT);
    assert_eq!(settings.board.page_size.get(), 10);
    assert_eq!(settings.board.page_step.get(), 5);
    assert_eq!(settings.logging.level, LevelFilter::INFO);
    assert!(matches!(settings.logging.format, LogFormat::Compact));
}

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.server.port = Some(4000);
    raw.logging.level = Some("info".to_string());
    raw.backend.base_url = Some("http://file.example".to_string());

    let overrides = ServeOverrides {
        server_port: Some(4321),
        log_level: Some("debug".to_string()),
        backend_url: Some("https://api.example/v1".to_string()),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.server.addr.port(), 4321);
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
    assert_eq!(settings.backend.base_url.as_str(), "https://api.example/v1");
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    let overrides = ServeOverrides {
        log_json: Some(true),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn paging_is_carried_into_the_board() {
    let mut raw = RawSettings::default();
    raw.apply_serve_overrides(&ServeOverrides {
        page_size: Some(20),
        page_step: Some(10),
        ..Default::default()
    });
    let settings = Settings::from_raw(raw).expect("valid settings");
    let paging = Paging::from(&settings.board);
    assert_eq!(
        paging,
        Paging {
            page_size: 20,
            step: 10,
        }
    );
}

#[test]
fn zero_page_size_is_rejected() {
    let mut raw = RawSettings::default();
    raw.board.page_size = Some(0);
    let err = Settings::from_raw(raw).expect_err("zero page size");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "board.page_size",
            ..
        }
    ));
}

#[test]
fn non_http_backend_is_rejected() {
    let mut raw = RawSettings::default();
    raw.backend.base_url = Some("ftp://example.com".to_string());
    let err = Settings::from_raw(raw).expect_err("ftp backend");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "backend.base_url",
            ..
        }
    ));
}

#[test]
fn relative_backend_is_rejected() {
    let mut raw = RawSettings::default();
    raw.backend.base_url = Some("/posts".to_string());
    assert!(Settings::from_raw(raw).is_err());
}

#[test]
fn default_to_serve_command() {
    let args = CliArgs::parse_from(["postboard"]);
    let command = args
        .command
        .unwrap_or(Command::Serve(Box::<ServeArgs>::default()));
    assert!(matches!(command, Command::Serve(_)));
}

#[test]
fn parse_serve_overrides() {
    let args = CliArgs::parse_from([
        "postboard",
        "serve",
        "--backend-url",
        "http://localhost:5000",
        "--server-host",
        "0.0.0.0",
        "--page-step",
        "3",
    ]);

    match args.command.expect("serve command") {
        Command::Serve(serve) => {
            assert_eq!(
                serve.overrides.backend_url.as_deref(),
                Some("http://localhost:5000")
            );
            assert_eq!(serve.overrides.server_host.as_deref(), Some("0.0.0.0"));
            assert_eq!(serve.overrides.page_step, Some(3));
        }
    }
}

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(".toml").expect("tmp file");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

/// Sets an environment variable for the lifetime of the guard.
struct EnvVar(&'static str);

impl EnvVar {
    fn set(key: &'static str, value: &str) -> Self {
        // SAFETY: tests touching the environment are serialized with `#[serial]`.
        unsafe { std::env::set_var(key, value) };
        Self(key)
    }
}

impl Drop for EnvVar {
    fn drop(&mut self) {
        // SAFETY: see `EnvVar::set`.
        unsafe { std::env::remove_var(self.0) };
    }
}

#[test]
#[serial]
fn environment_beats_file_and_cli_beats_environment() {
    let file = config_file(
        "[backend]\nbase_url = \"http://from-file:9000\"\n\n[board]\npage_size = 25\npage_step = 4\n",
    );
    let _size = EnvVar::set("POSTBOARD__BOARD__PAGE_SIZE", "30");
    let _url = EnvVar::set("POSTBOARD__BACKEND__BASE_URL", "http://from-env:7000");

    let args = CliArgs {
        config_file: Some(file.path().to_path_buf()),
        command: None,
    };
    let settings = load(&args).expect("settings load");
    assert_eq!(settings.board.page_size.get(), 30);
    assert_eq!(settings.backend.base_url.as_str(), "http://from-env:7000/");
    // Untouched by the environment, so the file still wins over defaults.
    assert_eq!(settings.board.page_step.get(), 4);

    let args = CliArgs::parse_from([
        "postboard",
        "--config-file",
        file.path().to_str().expect("utf8 path"),
        "serve",
        "--page-size",
        "40",
    ]);
    let settings = load(&args).expect("settings load");
    assert_eq!(settings.board.page_size.get(), 40);
    assert_eq!(settings.backend.base_url.as_str(), "http://from-env:7000/");
}

#[test]
#[serial]
fn invalid_environment_value_is_reported() {
    let _url = EnvVar::set("POSTBOARD__BACKEND__BASE_URL", "ftp://files.example");
    let args = CliArgs {
        config_file: None,
        command: None,
    };
    let err = load(&args).expect_err("non-http backend");
    assert!(matches!(err, LoadError::Invalid { key, .. } if key == "backend.base_url"));
}

#[test]
#[serial]
fn explicit_config_file_is_loaded() {
    let file = config_file("[backend]\nbase_url = \"http://from-file:9000\"\n\n[board]\npage_size = 25\n");

    let args = CliArgs {
        config_file: Some(file.path().to_path_buf()),
        command: None,
    };
    let settings = load(&args).expect("settings load");
    assert_eq!(settings.backend.base_url.as_str(), "http://from-file:9000/");
    assert_eq!(settings.board.page_size.get(), 25);
}
