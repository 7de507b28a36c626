use std::path::PathBuf;

use clap::Parser;
use log::info;
use oppai_bridge::calculator::{Outcome, PpCalculator};
use oppai_bridge::config::Config;
use oppai_bridge::game_mode::GameMode;
use oppai_bridge::mods::Mods;
use oppai_bridge::request::CalculationRequest;
use url::Url;

#[derive(Parser)]
struct Opts {
    map_id: u32,
    #[arg(long, default_value_t = Mods::NOMOD)]
    mods: Mods,
    #[arg(long, default_value_t = 0)]
    combo: u32,
    #[arg(long, default_value_t = 0)]
    nmiss: u32,
    #[arg(long)]
    mode: Option<GameMode>,
    #[arg(long, default_value_t = 100.0)]
    acc: f64,
    /// TOML file providing `data_dir`, `map_endpoint` and `calculator`.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    data_dir: Option<PathBuf>,
    #[arg(long)]
    map_endpoint: Option<Url>,
    #[arg(long)]
    calculator: Option<PathBuf>,
    /// Print the whole calculator output as json.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let opts = Opts::parse();
    let mut config = Config::load_or_default(opts.config.as_deref())?;
    if let Some(data_dir) = opts.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(map_endpoint) = opts.map_endpoint {
        config.map_endpoint = map_endpoint;
    }
    if let Some(calculator) = opts.calculator {
        config.calculator = calculator;
    }

    let request = CalculationRequest::builder()
        .map_id(opts.map_id)
        .mods(opts.mods)
        .combo(opts.combo)
        .nmiss(opts.nmiss)
        .mode(opts.mode)
        .acc(opts.acc)
        .build();

    let calculator = PpCalculator::new(&config)?;
    let outcome = calculator.calculate(&request).await?;
    match &outcome {
        Outcome::Ready(_) => {}
        Outcome::Failed => info!("Beatmap {} is unavailable.", opts.map_id),
        Outcome::Empty => info!("The calculator does not support this mode."),
    }
    let result = outcome.into_result();

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("pp:          {:.2}", result.pp());
        println!("  acc:       {:.2}", result.acc_pp());
        println!("  aim:       {:.2}", result.aim_pp());
        println!("  speed:     {:.2}", result.speed_pp());
        println!("stars:       {:.2}", result.stars());
        println!("  acc:       {:.2}", result.acc_stars());
        println!("  aim:       {:.2}", result.aim_stars());
        println!("  speed:     {:.2}", result.speed_stars());
    }
    Ok(())
}
