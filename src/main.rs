// src/main.rs

use devctl::paths::DevPaths;
use devctl::{cli, logging, run};

#[tokio::main]
async fn main() {
    if let Err(err) = run_main().await {
        eprintln!("devctl error: {err:?}");
        std::process::exit(1);
    }
}

async fn run_main() -> anyhow::Result<()> {
    // The root is required before anything else, including argument errors.
    let paths = DevPaths::from_env()?;
    let args = cli::parse();
    logging::init_logging(args.log_level, Some(&paths.supervisor_log()))?;
    run(args, paths).await?;
    Ok(())
}
