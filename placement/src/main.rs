use placement::configs::PlacementConfig;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = PlacementConfig::from_env()?;
    let report = placement::run(&config)?;

    println!("Model trained. Accuracy: {:.2}", report.accuracy);
    println!("Model saved to {}", report.model_path.display());
    println!("Dataset saved to {}", report.dataset_path.display());

    Ok(())
}
