use std::time::Duration;

use groupstats::{report, Config, FileLog, HttpGraphClient, Mapper};
use indicatif::ProgressBar;

fn main() -> groupstats::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_secs()
        .init();

    let path = std::env::var("GROUPSTATS_CONFIG").unwrap_or_else(|_| "groupstats.toml".into());
    let config = Config::load(&path)?;

    let client = HttpGraphClient::new(&config.graph)?;
    let log = FileLog::create(&config.log_dir)?;

    let spinner = ProgressBar::new_spinner();
    spinner.enable_steady_tick(Duration::from_millis(120));

    let mut mapper = Mapper::new(config, client, spinner.clone(), log);
    let summary = report::generate(&mut mapper, chrono::Utc::now());
    spinner.finish_and_clear();

    println!("{}", summary?);
    Ok(())
}
