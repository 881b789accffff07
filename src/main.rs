use clap::Parser;
use quota_audit::cli::{
    context, handle_completions, handle_config_init, inventory, reconcile, Cli, Commands,
    ConfigCommands,
};
use quota_audit::logging::init_tracing;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Config(ConfigCommands::Init(args)) => handle_config_init(&args),
        Commands::Completions(args) => {
            handle_completions(&args);
            Ok(())
        }
        command => run(&cli.config, cli.log_level.as_deref(), command).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(
    config_path: &std::path::Path,
    log_level: Option<&str>,
    command: Commands,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = context::load_config(config_path, log_level)?;
    init_tracing(&config.logging)?;

    match command {
        Commands::CrosscheckUsage(args) => reconcile::handle_crosscheck_usage(&config, &args).await,
        Commands::CrosscheckQuotas(args) => {
            reconcile::handle_crosscheck_quotas(&config, &args).await
        }
        Commands::CompareQuotas(args) => reconcile::handle_compare_quotas(&config, &args).await,
        Commands::RevertQuotas(args) => reconcile::handle_revert_quotas(&config, &args).await,
        Commands::Allocations(args) => inventory::handle_allocations(&config, &args).await,
        Commands::LocalQuotas(args) => inventory::handle_local_quotas(&config, &args).await,
        Commands::AllocationHomes(args) => inventory::handle_allocation_homes(&config, &args).await,
        Commands::AllocationManagers(args) => {
            inventory::handle_allocation_managers(&config, &args).await
        }
        Commands::InstanceUsage(args) => inventory::handle_instance_usage(&config, &args).await,
        Commands::Aggregates(args) => inventory::handle_aggregates(&config, &args).await,
        Commands::Config(_) | Commands::Completions(_) => Ok(()),
    }
}
