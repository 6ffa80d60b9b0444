use anyhow::Context;
use notion_text::NotionRequest;
use tracing_subscriber::EnvFilter;

/// Reads `[notion]` from Config.toml and `NOTION_TOKEN` from Secrets.toml at
/// the workspace root, then prints the envelope as JSON.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let secrets = util::load_env()?;
    let config = util::load_config("Config.toml")?;

    let request = NotionRequest::from_config(&config, &secrets)?;

    let envelope = notion_text::fetch_text(&request).await;

    println!(
        "{}",
        serde_json::to_string_pretty(&envelope)
            .context("failed to serialize envelope")?
    );

    Ok(())
}
