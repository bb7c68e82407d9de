use anyhow::Result;
use converger_core::ConvergeConfig;

pub async fn run(config: &ConvergeConfig) -> Result<()> {
    println!("Authenticating with Google Calendar...");

    converger_provider_google::authenticate(&config.credentials_file, &config.token_file).await?;

    println!();
    println!("Now converge a calendar with:");
    println!("  gcal-converger run --title-prefix-filter <PREFIX> < events.json");

    Ok(())
}
