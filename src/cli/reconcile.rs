//! Reconciliation command handlers

use super::context::{connect_cloud, connect_registry};
use crate::cli::{CompareArgs, ReportArgs, RevertArgs};
use crate::config::AuditConfig;
use crate::ledger::{DeltaLedger, LedgerColumns};
use crate::reconcile::Reconciler;
use crate::report::render;

/// Handle `quota-audit crosscheck-usage`
pub async fn handle_crosscheck_usage(
    config: &AuditConfig,
    args: &ReportArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let registry = connect_registry(config)?;
    let cloud = connect_cloud(config).await?;
    let reconciler = Reconciler::new(&cloud.identity, &cloud.compute, &registry);

    let outcome = reconciler.crosscheck_usage().await?;
    render(&outcome.report(), args.format, &args.destination())?;
    eprintln!("{}", outcome.summary());
    Ok(())
}

/// Handle `quota-audit crosscheck-quotas`
pub async fn handle_crosscheck_quotas(
    config: &AuditConfig,
    args: &ReportArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let registry = connect_registry(config)?;
    let cloud = connect_cloud(config).await?;
    let reconciler = Reconciler::new(&cloud.identity, &cloud.compute, &registry);

    let outcome = reconciler.crosscheck_quotas().await?;
    render(&outcome.report(), args.format, &args.destination())?;
    eprintln!("{}", outcome.summary());
    Ok(())
}

/// Handle `quota-audit compare-quotas`
pub async fn handle_compare_quotas(
    config: &AuditConfig,
    args: &CompareArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let registry = connect_registry(config)?;
    let cloud = connect_cloud(config).await?;
    let reconciler = Reconciler::new(&cloud.identity, &cloud.compute, &registry);

    let outcome = reconciler.compare_tenant(&args.name_or_id).await?;
    for line in outcome.lines() {
        println!("{}", line);
    }
    Ok(())
}

/// Handle `quota-audit revert-quotas`
pub async fn handle_revert_quotas(
    config: &AuditConfig,
    args: &RevertArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let ledger = match &args.ledger {
        Some(path) => Some(DeltaLedger::load(path, ledger_columns(args))?),
        None => None,
    };

    let registry = connect_registry(config)?;
    let cloud = connect_cloud(config).await?;
    let reconciler = Reconciler::new(&cloud.identity, &cloud.compute, &registry);

    let outcome = reconciler.revert_quotas(ledger.as_ref()).await?;
    render(&outcome.report(), args.report.format, &args.report.destination())?;
    eprintln!("{}", outcome.summary());
    Ok(())
}

fn ledger_columns(args: &RevertArgs) -> LedgerColumns {
    LedgerColumns {
        tenant: args.tenant_column,
        cores: args.core_column,
        instances: args.instance_column,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    #[test]
    fn test_ledger_columns_from_args() {
        let cli = Cli::try_parse_from([
            "quota-audit",
            "revert-quotas",
            "--ledger",
            "bump.csv",
            "--instance-column",
            "7",
        ])
        .unwrap();
        let Commands::RevertQuotas(args) = cli.command else {
            panic!("Expected RevertQuotas command");
        };
        assert_eq!(
            ledger_columns(&args),
            LedgerColumns {
                tenant: 0,
                cores: 1,
                instances: 7,
            }
        );
    }

    #[tokio::test]
    async fn test_revert_missing_ledger_fails_before_connecting() {
        let cli = Cli::try_parse_from([
            "quota-audit",
            "revert-quotas",
            "--ledger",
            "/nonexistent/bump.csv",
        ])
        .unwrap();
        let Commands::RevertQuotas(args) = cli.command else {
            panic!("Expected RevertQuotas command");
        };
        let err = handle_revert_quotas(&AuditConfig::default(), &args)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/bump.csv"));
    }
}
