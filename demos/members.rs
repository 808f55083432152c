use groupstats::{Config, FileLog, HttpGraphClient, LogProgress, Mapper};

fn main() -> groupstats::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::load("groupstats.toml")?;
    let client = HttpGraphClient::new(&config.graph)?;
    let log = FileLog::create(&config.log_dir)?;

    let mut mapper = Mapper::new(config, client, LogProgress::new(), log);
    println!("new members: {}", mapper.new_users_count()?);
    Ok(())
}
