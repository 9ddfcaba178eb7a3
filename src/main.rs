use anyhow::Context;
use gpu_life::LifeConfig;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = LifeConfig::from_env();
    log::info!(
        "Starting {}x{} simulation (fullscreen: {}, radius: {})",
        config.width,
        config.height,
        config.fullscreen,
        config.radius
    );

    gpu_life::run(config).context("GPU Life terminated with an error")
}
