use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod command;
mod interactive;
mod supervisor;

#[derive(Parser)]
#[command(name = "svc")]
#[command(about = "A CLI tool for installing and controlling systemd services")]
#[command(version)]
struct Cli {
    /// Print all executed commands to stderr
    #[arg(short = 'v', long = "verbose", global = true)]
    verbose: bool,

    /// Service definition file
    #[arg(short = 'c', long = "config", global = true, default_value = "service.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Write the unit file and enable the service")]
    Install(command::Install),
    #[command(about = "Disable the service and remove its unit file")]
    Uninstall(command::Uninstall),
    #[command(about = "Start the service")]
    Start(command::Start),
    #[command(about = "Stop the service")]
    Stop(command::Stop),
    #[command(about = "Restart the service")]
    Restart(command::Restart),
    #[command(about = "Show whether the service is running")]
    Status(command::Status),
    #[command(about = "Print the unit file to stdout")]
    Generate(command::Generate),
    #[command(about = "Show the key directives of the installed unit file")]
    Show(command::Show),
    #[command(about = "Create a service definition interactively")]
    #[command(alias = "create")]
    New(command::New),
    #[command(about = "Show logs for the service")]
    Logs(command::Logs),
    #[command(about = "Perform a named action: start, stop, restart, install or uninstall")]
    Control(command::Control),
    #[command(about = "Run the configured program in the foreground until signalled")]
    Run(command::Run),
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = cli.config.as_path();
    match cli.command {
        Commands::Install(install_cmd) => install_cmd.run(config)?,
        Commands::Uninstall(uninstall_cmd) => uninstall_cmd.run(config)?,
        Commands::Start(start_cmd) => start_cmd.run(config)?,
        Commands::Stop(stop_cmd) => stop_cmd.run(config)?,
        Commands::Restart(restart_cmd) => restart_cmd.run(config)?,
        Commands::Status(status_cmd) => status_cmd.run(config)?,
        Commands::Generate(generate_cmd) => generate_cmd.run(config)?,
        Commands::Show(show_cmd) => show_cmd.run(config)?,
        Commands::New(new_cmd) => new_cmd.run(config)?,
        Commands::Logs(logs_cmd) => logs_cmd.run(config)?,
        Commands::Control(control_cmd) => control_cmd.run(config)?,
        Commands::Run(run_cmd) => run_cmd.run(config)?,
    }
    Ok(())
}
