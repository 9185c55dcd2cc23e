use clap::Parser;

// CLI argument structure
#[derive(Parser, Debug, Clone)]
#[command(name = "claude-gateway")]
#[command(about = "Rate-limited relay for the Anthropic Messages API")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, default_value_t = 8080)]
    pub port: u16,

    // Base URL of the upstream completion API
    #[arg(long, default_value = "https://api.anthropic.com")]
    pub upstream_url: String,

    // Model requested on every upstream call
    #[arg(long, default_value = "claude-sonnet-4-6")]
    pub model: String,

    // Rate limit max requests per window per client
    #[arg(long, default_value_t = 50)]
    pub rate_limit: u32,

    // Rate limit window in seconds
    #[arg(long, default_value_t = 3600)]
    pub rate_window: u64,
}
