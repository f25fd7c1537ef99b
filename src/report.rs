//! Report generation for search results.
//!
//! Generates both JSON and human-readable text output.

use color_eyre::eyre::{Context, Result};

use crate::search::{millis, SearchReport, StrategyRegistry};
use crate::topology::Topology;

/// Output rendering selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Render one search in the requested format
pub fn render_report(report: &SearchReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(format_report(report)),
        OutputFormat::Json => report_json(report),
    }
}

/// Render a comparison run in the requested format
pub fn render_comparison(reports: &[SearchReport], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(format_comparison(reports)),
        OutputFormat::Json => comparison_json(reports),
    }
}

/// Human-readable summary of one search
pub fn format_report(report: &SearchReport) -> String {
    let outcome = &report.outcome;
    let mut lines: Vec<String> = Vec::new();

    match &outcome.found_at {
        Some(finder) if outcome.is_found() => {
            lines.push(format!(
                "[{}] Resource {} WAS found at node {}",
                report.algorithm, report.resource, finder
            ));
            lines.push(format!("    Path: {}", outcome.path.join(" -> ")));
        }
        _ => {
            lines.push(format!(
                "[{}] Resource {} was NOT found from {} (ttl {})",
                report.algorithm, report.resource, report.start, report.ttl
            ));
        }
    }

    lines.push(format!("    Messages exchanged: {}", outcome.messages));
    lines.push(format!("    Nodes involved: {}", outcome.nodes_involved));
    lines.push(format!(
        "    Elapsed: {:.3} ms",
        millis(report.elapsed)
    ));

    lines.join("\n")
}

/// One line per strategy, aligned for side-by-side reading
pub fn format_comparison(reports: &[SearchReport]) -> String {
    let mut lines = vec![format!(
        "{:<22} {:<6} {:<8} {:>9} {:>6} {:>11}",
        "algorithm", "found", "at", "messages", "nodes", "elapsed_ms"
    )];

    for report in reports {
        let outcome = &report.outcome;
        lines.push(format!(
            "{:<22} {:<6} {:<8} {:>9} {:>6} {:>11.3}",
            report.algorithm.name(),
            if outcome.is_found() { "yes" } else { "no" },
            outcome.found_at.as_deref().unwrap_or("-"),
            outcome.messages,
            outcome.nodes_involved,
            millis(report.elapsed)
        ));
    }

    lines.join("\n")
}

/// Short description of a validated topology
pub fn format_topology_summary(topology: &Topology) -> String {
    let min_degree = topology.nodes().map(|n| n.degree()).min().unwrap_or(0);
    let max_degree = topology.nodes().map(|n| n.degree()).max().unwrap_or(0);
    let resources: usize = topology.nodes().map(|n| n.resources().len()).sum();

    format!(
        "Topology OK: {} nodes, {} links, degrees {}..{} (allowed {}..{}), {} hosted resources",
        topology.len(),
        topology.edge_count(),
        min_degree,
        max_degree,
        topology.min_neighbors(),
        topology.max_neighbors(),
        resources
    )
}

/// Banner listing the strategies a user may request
pub fn format_available(registry: &StrategyRegistry) -> String {
    let mut lines = vec!["Available search algorithms:".to_string()];
    for name in registry.names() {
        lines.push(format!("    {}", name));
    }
    lines.join("\n")
}

/// JSON rendering of one search
pub fn report_json(report: &SearchReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("Failed to serialize search report to JSON")
}

/// JSON rendering of a comparison run
pub fn comparison_json(reports: &[SearchReport]) -> Result<String> {
    serde_json::to_string_pretty(reports).context("Failed to serialize comparison to JSON")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{Outcome, SearchStatus, Strategy};
    use std::time::Duration;

    fn report(found: bool) -> SearchReport {
        let outcome = if found {
            Outcome {
                status: SearchStatus::Found,
                found_at: Some("n3".to_string()),
                path: vec!["n1".to_string(), "n2".to_string(), "n3".to_string()],
                messages: 4,
                nodes_involved: 4,
            }
        } else {
            Outcome {
                status: SearchStatus::Exhausted,
                found_at: None,
                path: Vec::new(),
                messages: 2,
                nodes_involved: 3,
            }
        };

        SearchReport {
            algorithm: Strategy::Flooding,
            start: "n1".to_string(),
            resource: "f".to_string(),
            ttl: "2".to_string(),
            outcome,
            elapsed: Duration::from_micros(1500),
        }
    }

    #[test]
    fn test_format_found() {
        let text = format_report(&report(true));
        assert!(text.contains("WAS found at node n3"));
        assert!(text.contains("Path: n1 -> n2 -> n3"));
        assert!(text.contains("Messages exchanged: 4"));
        assert!(text.contains("Elapsed: 1.500 ms"));
    }

    #[test]
    fn test_format_not_found() {
        let text = format_report(&report(false));
        assert!(text.contains("was NOT found"));
        assert!(!text.contains("Path:"));
        assert!(text.contains("Nodes involved: 3"));
    }

    #[test]
    fn test_format_comparison() {
        let text = format_comparison(&[report(true), report(false)]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("yes"));
        assert!(lines[2].contains("no"));
    }

    #[test]
    fn test_json_report() {
        let json = report_json(&report(true)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["path"][2], "n3");
        assert_eq!(value["elapsed_ms"], 1.5);
    }

    #[test]
    fn test_render_formats() {
        let text = render_report(&report(true), OutputFormat::Text).unwrap();
        assert!(text.starts_with("[flooding]"));

        let json = render_comparison(&[report(false)], OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["status"], "exhausted");
    }

    #[test]
    fn test_available_lists_every_strategy() {
        let text = format_available(&StrategyRegistry::standard());
        for name in ["flooding", "informed_flooding", "random_walk", "informed_random_walk"] {
            assert!(text.contains(name));
        }
    }
}
