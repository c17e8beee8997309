use clap::Parser;
use env_logger::Env;
use log::{error, info, warn};

use fleetpoll::application::{App, Poller};
use fleetpoll::domain::{Job, SettingsRepository};
use fleetpoll::infrastructure::{
    prompt_credentials, SshShell, TomlInventory, TomlSettingsRepository,
};

#[derive(Parser)]
#[clap(author, version, about)]
struct Args {
    #[clap(
        short,
        long,
        help = "Specify the config file.",
        default_value = "./config.toml"
    )]
    config_path: String,
    #[clap(
        short,
        long,
        help = "Specify the inventory file. Values found are written back into it.",
        default_value = "./inventory.toml"
    )]
    inventory_path: String,
    #[clap(short, long, help = "Login name. Prompted for when not given here or in the config.")]
    username: Option<String>,
    #[clap(
        short('j'),
        long,
        help = "Maximum number of hosts to talk to at the same time."
    )]
    concurrency: Option<usize>,
    #[clap(long, help = "Print the final report as JSON.")]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("fleetpoll=info")).init();

    info!("config_path:    {}", args.config_path);
    info!("inventory_path: {}", args.inventory_path);

    let mut settings_repo = TomlSettingsRepository::new(&args.config_path).await?;
    let mut settings = settings_repo.get().await?;
    if let Some(concurrency) = args.concurrency {
        settings.concurrency = concurrency;
    }

    info!("command:        {}", settings.command);
    info!("pattern:        {}", settings.pattern.as_str());
    info!("concurrency:    {}", settings.concurrency());

    let inventory = TomlInventory::new(&args.inventory_path).await?;

    let username = args.username.or_else(|| settings.username.clone());
    let credentials = prompt_credentials(username)?;

    let job = Job {
        credentials,
        command: settings.command.clone(),
        pattern: settings.pattern.clone(),
        timeouts: settings.timeouts(),
    };
    let poller = Poller::new(SshShell::new(settings.port), settings.concurrency());

    info!("start app.");
    let app = App::new(inventory, poller, job);

    let report = tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            warn!("interrupted. inventory was not saved.");
            std::process::exit(130);
        }
        result = app.run() => match result {
            Ok(report) => report,
            Err(why) => {
                error!("{why}");
                return Err(why.into());
            }
        },
    };

    if args.json {
        println!("{}", report.to_json()?);
    } else {
        report.to_table().printstd();
    }

    info!(
        "all groups processed: {} ok, {} failed. results saved in \"{}\"",
        report.succeeded(),
        report.failed(),
        args.inventory_path
    );

    Ok(())
}
