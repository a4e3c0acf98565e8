mod ui;

use tracing::warn;
use tracing_subscriber::EnvFilter;

use naipes::Settings;
use naipes::config::SETTINGS_FILE_NAME;

fn main() -> glib::ExitCode {
    let settings_path = glib::user_config_dir()
        .join("naipes")
        .join(SETTINGS_FILE_NAME);
    let loaded = Settings::load(&settings_path);
    let log_filter = match &loaded {
        Ok(settings) => settings.log_filter.clone(),
        Err(_) => Settings::default().log_filter,
    };

    // RUST_LOG wins over the settings file.
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let settings = loaded.unwrap_or_else(|err| {
        warn!(%err, path = %settings_path.display(), "using default settings");
        Settings::default()
    });

    ui::app::run(settings)
}
