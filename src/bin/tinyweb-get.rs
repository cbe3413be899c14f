use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use tinyweb::config::load_or_default;
use tinyweb::http::fetch;
use tinyweb::observability::logging;
use tinyweb::{ClientError, FetchRequest};

#[derive(Parser)]
#[command(name = "tinyweb-get")]
#[command(about = "Fetch a URL with a single GET and print the raw response", long_about = None)]
struct Cli {
    /// HTTP proxy, as http://[username:password@]proxy-host:proxy-port
    #[arg(short = 'p', long = "proxy", value_name = "PROXY")]
    proxy: Option<String>,

    /// Optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// URL to retrieve, e.g. https://www.example.com/index.html
    url: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Usage errors exit with 1; --help and --version are not errors.
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error - {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<(), ClientError> {
    let config = load_or_default(cli.config.as_deref())?;

    if let Err(e) = logging::init(&config.observability) {
        eprintln!("Warning: logging unavailable: {e}");
    }

    let request = FetchRequest::parse(&cli.url, cli.proxy.as_deref())?;

    let mut stdout = tokio::io::stdout();
    let received = fetch(&request, &config.client, &mut stdout).await?;

    tracing::debug!(bytes = received, "Response complete");
    Ok(())
}
