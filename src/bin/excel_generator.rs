//! Excel Generator Service binary
//!
//! HTTP service that turns JSON sheets into a downloadable .xlsx file.

use clap::Parser;
use excel_generator::api::{
    run_until_signal,
    server::{init_tracing, DEFAULT_BODY_LIMIT},
    ServerConfig,
};

#[derive(Parser, Debug)]
#[command(name = "excel-generator")]
#[command(version)]
#[command(about = "Excel Generator Service - HTTP API that builds .xlsx files from JSON sheets")]
#[command(long_about = r#"
Excel Generator Service - HTTP API that builds .xlsx files from JSON sheets

Endpoints:
  - GET  /                - Service descriptor
  - GET  /health          - Health check
  - POST /generate-excel  - Generate a multi-sheet Excel file

Request body for /generate-excel:
  {"sheets": {"Sheet1": [["Name", "Age"], ["Ada", 36]]}, "filename": "people.xlsx"}

Features:
  - CORS enabled for cross-origin requests
  - Graceful shutdown on SIGINT/SIGTERM
  - Tracing and structured logging (RUST_LOG)

Example usage:
  excel-generator                      # Start on 0.0.0.0:3000
  PORT=8080 excel-generator
  excel-generator --host 127.0.0.1 --port 9000

  curl -X POST http://localhost:3000/generate-excel \
    -H "Content-Type: application/json" \
    -d '{"sheets": {"Sheet1": [["a", 1], ["b", 2]]}}' -o out.xlsx
"#)]
struct Args {
    /// Host address to bind to
    #[arg(short = 'H', long, default_value = "0.0.0.0", env = "BIND_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "3000", env = "PORT")]
    port: u16,

    /// Maximum request body size in bytes
    #[arg(long, default_value_t = DEFAULT_BODY_LIMIT, env = "BODY_LIMIT_BYTES")]
    body_limit: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing();

    let config = ServerConfig {
        host: args.host,
        port: args.port,
        body_limit: args.body_limit,
    };

    run_until_signal(config).await
}
