// src/main.rs

use pystep::{cli, logging, run};

#[tokio::main]
async fn main() {
    match run_main().await {
        Ok(result) if result.is_success() => {}
        Ok(_) => std::process::exit(1),
        Err(err) => {
            eprintln!("pystep error: {err:?}");
            std::process::exit(1);
        }
    }
}

async fn run_main() -> anyhow::Result<pystep::types::BuildResult> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;
    run(args).await
}
