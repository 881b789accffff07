//! Host aggregate membership within an availability zone.

use crate::clients::{ClientError, ComputeService};
use crate::model::Aggregate;
use crate::report::Report;
use std::collections::BTreeSet;

/// One row per aggregate in `zone`, one column per host, `X` marking
/// membership. With no explicit hosts, every host of those aggregates is
/// shown.
pub fn aggregate_report(aggregates: &[Aggregate], zone: &str, hosts: &[String]) -> Report {
    let mut in_zone: Vec<&Aggregate> = aggregates
        .iter()
        .filter(|a| a.availability_zone.as_deref() == Some(zone))
        .collect();
    in_zone.sort_by(|a, b| a.name.cmp(&b.name));

    let hosts: BTreeSet<&str> = if hosts.is_empty() {
        in_zone
            .iter()
            .flat_map(|a| a.hosts.iter().map(String::as_str))
            .collect()
    } else {
        hosts.iter().map(String::as_str).collect()
    };

    let mut report = Report::new(
        std::iter::once("Aggregates").chain(hosts.iter().copied()),
    );
    for aggregate in in_zone {
        let mut row = vec![aggregate.name.clone()];
        row.extend(hosts.iter().map(|host| {
            if aggregate.hosts.iter().any(|h| h == host) {
                "X".to_string()
            } else {
                String::new()
            }
        }));
        report.push_row(row);
    }
    report
}

pub async fn aggregates(
    compute: &dyn ComputeService,
    zone: &str,
    hosts: &[String],
) -> Result<Report, ClientError> {
    let all = compute.list_aggregates().await?;
    Ok(aggregate_report(&all, zone, hosts))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aggregate(name: &str, zone: Option<&str>, hosts: &[&str]) -> Aggregate {
        Aggregate {
            name: name.to_string(),
            availability_zone: zone.map(String::from),
            hosts: hosts.iter().map(|h| h.to_string()).collect(),
        }
    }

    fn fixture() -> Vec<Aggregate> {
        vec![
            aggregate("gpu", Some("melbourne"), &["cn-2"]),
            aggregate("general", Some("melbourne"), &["cn-1", "cn-2"]),
            aggregate("other", Some("monash"), &["mn-1"]),
            aggregate("orphan", None, &["cn-3"]),
        ]
    }

    #[test]
    fn test_all_hosts_in_zone() {
        let report = aggregate_report(&fixture(), "melbourne", &[]);
        assert_eq!(report.columns(), ["Aggregates", "cn-1", "cn-2"]);
        assert_eq!(report.rows()[0], ["general", "X", "X"]);
        assert_eq!(report.rows()[1], ["gpu", "", "X"]);
    }

    #[test]
    fn test_explicit_hosts() {
        let hosts = vec!["cn-2".to_string(), "cn-9".to_string()];
        let report = aggregate_report(&fixture(), "melbourne", &hosts);
        assert_eq!(report.columns(), ["Aggregates", "cn-2", "cn-9"]);
        assert_eq!(report.rows()[1], ["gpu", "X", ""]);
    }

    #[test]
    fn test_unknown_zone_is_empty() {
        let report = aggregate_report(&fixture(), "tasmania", &[]);
        assert!(report.is_empty());
        assert_eq!(report.columns(), ["Aggregates"]);
    }
}
