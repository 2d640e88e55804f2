#[macro_use]
extern crate failure;

use clap::Parser;
use env_logger::Env;
use log::{debug, error, info};
use plate_console::admin::VehicleAdmin;
use plate_console::console::{self, Command, Dialogs, TerminalDialogs};
use plate_console::recognition::RecognitionDisplay;
use plate_console::{ApiClient, Config, View};
use std::io;
use tokio::task::block_in_place;

#[derive(Parser, Debug)]
#[command(
    name = "plate-console",
    version,
    about = "Gate console: live plate recognition and whitelist management."
)]
struct Args {
    #[arg(
        default_value = "/",
        value_name = "VIEW",
        help = "Page to open: / (recognition) or /manage (vehicle whitelist)."
    )]
    view: View,

    #[arg(
        short,
        long,
        value_name = "URL",
        help = "Gate server base URL (overrides CONSOLE_SERVER)."
    )]
    server: Option<String>,

    #[arg(
        long,
        value_name = "MS",
        help = "Recognition poll interval in milliseconds (overrides POLL_INTERVAL_MS)."
    )]
    interval_ms: Option<u64>,

    #[arg(
        long,
        value_name = "N",
        help = "Number of recent results to show (overrides RECENT_LIMIT)."
    )]
    limit: Option<usize>,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    info!("Starting plate-console");

    if let Err(e) = run(Args::parse()).await {
        error!("{}", e);
        std::process::exit(1);
    }
    info!("Exiting main");
}

async fn run(args: Args) -> Result<(), failure::Error> {
    let mut config = Config::from_env()?;
    if let Some(server) = &args.server {
        config = config.with_server(server)?;
    }
    if let Some(ms) = args.interval_ms {
        config = config.with_poll_interval_ms(ms)?;
    }
    if let Some(limit) = args.limit {
        config.recent_limit = limit;
    }

    info!("Opening {} against {}", args.view, config.server);
    let api = ApiClient::new(config.server.clone());
    match args.view {
        View::Recognition => run_recognition(api, &config).await,
        View::VehicleAdmin => run_admin(api).await,
    }
}

async fn run_recognition(api: ApiClient, config: &Config) -> Result<(), failure::Error> {
    let mut display =
        RecognitionDisplay::mount(api, config.poll_interval, config.recent_limit).await;
    print!("{}", console::render_panel_text(display.panel()));
    loop {
        let updated = tokio::select! {
            updated = display.next_update() => updated,
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    error!("Unable to listen for Ctrl-C: {}", e);
                }
                break;
            }
        };
        if !updated {
            display.unmount().await;
            return Err(format_err!("Recognition poller stopped unexpectedly"));
        }
        print!("{}", console::render_panel_text(display.panel()));
    }
    display.unmount().await;
    Ok(())
}

/// Terminal dialogs block on stdin, so hand the worker thread over first.
struct Blocking<D>(D);

impl<D: Dialogs> Dialogs for Blocking<D> {
    fn alert(&mut self, message: &str) {
        self.0.alert(message);
    }

    fn confirm(&mut self, question: &str) -> bool {
        let inner = &mut self.0;
        block_in_place(|| inner.confirm(question))
    }
}

async fn run_admin(api: ApiClient) -> Result<(), failure::Error> {
    let dialogs = Blocking(TerminalDialogs::new(io::stdin().lock(), io::stdout()));
    let mut admin = VehicleAdmin::mount(api, dialogs).await;
    println!("{}", console::HELP);
    print!("{}", console::render_table_text(admin.table()));

    loop {
        let dialogs = &mut admin.dialogs_mut().0;
        let line = match block_in_place(|| dialogs.prompt("> ")) {
            Some(line) => line,
            None => break,
        };
        if line.trim().is_empty() {
            continue;
        }
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };
        let outcome = match command {
            Command::List => {
                admin.load().await;
                None
            }
            Command::Add { plate, note } => {
                admin.form_mut().set_plate(&plate);
                admin.form_mut().set_note(&note);
                Some(admin.submit().await)
            }
            Command::Delete(plate) => Some(admin.delete(&plate).await),
            Command::Click(row) => Some(admin.click(row).await),
            Command::Show => {
                println!("{}", admin.element().render());
                continue;
            }
            Command::Help => {
                println!("{}", console::HELP);
                continue;
            }
            Command::Quit => break,
        };
        if let Some(outcome) = outcome {
            debug!("Command finished with {:?}", outcome);
        }
        print!("{}", console::render_table_text(admin.table()));
    }
    admin.unmount();
    Ok(())
}
