use checker_site::{App, Checker, Config, Error, HttpProbe, Workspace, run_menu};
use log::{error, info};
use tokio::io::{self, BufReader};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            error!("{e}");
            1
        }
    };

    // A pending stdin read would otherwise keep the runtime alive on shutdown.
    std::process::exit(code);
}

async fn run() -> Result<(), Error> {
    let workspace = Workspace::locate()?;
    workspace.ensure()?;
    info!("Using workspace {}", workspace.root().display());

    let config = Config::load(workspace.config_path())?;
    match config.config.max_in_flight {
        Some(max) if max > 0 => info!("At most {max} probes in flight"),
        _ => info!("One probe per site, no concurrency cap"),
    }
    if config.config.timeout_secs > 0 {
        info!("Timeout: {} seconds", config.config.timeout_secs);
    } else {
        info!("No per-probe timeout");
    }

    let checker = Checker::from_config(HttpProbe::new()?, &config.config);
    let mut app = App::new(workspace, checker);

    let token = CancellationToken::new();
    let shutdown = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            shutdown.cancel();
        }
    });

    let mut stdout = io::stdout();
    run_menu(BufReader::new(io::stdin()), &mut stdout, &mut app, token).await?;

    info!("Goodbye");
    Ok(())
}
