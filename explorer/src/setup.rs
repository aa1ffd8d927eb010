use explorer_config::Config;

/// Initializes logging from the config.
pub fn init_logging(config: &Config) {
    explorer_log::init(config.logging());
}

/// Print spawn infos to the log.
pub fn dump_spawn_infos(config: &Config) {
    if config.path().as_os_str().is_empty() {
        explorer_log::debug!("running explorer without config folder");
    } else {
        explorer_log::debug!(
            "running explorer from config folder {}",
            config.path().display()
        );
    }

    let catalogs = config.catalogs();
    match catalogs.test_names {
        Some(ref path) => explorer_log::debug!("  test names: {}", path.display()),
        None => explorer_log::debug!("  test names: -"),
    };
    match catalogs.countries {
        Some(ref path) => explorer_log::debug!("  countries: {}", path.display()),
        None => explorer_log::debug!("  countries: -"),
    };
    explorer_log::debug!("  log level: {}", config.logging().level.name());
}
