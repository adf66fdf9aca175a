use anyhow::Result;
use clap::Parser;
use gitlab_tally::cli::{run, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    // GITLAB_PRIVATE_TOKEN and friends may come from a local .env file.
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let result = run(cli).await;
    if let Err(e) = &result {
        tracing::error!(error = %e, "gitlab-tally failed");
    }
    result
}
