//! Output formatting module

use haulmatch_app::app::MatchSummary;
use haulmatch_domain::model::{Load, Vehicle};
use haulmatch_domain::service::CommissionEntry;
use haulmatch_store::LedgerStats;
use haulmatch_types::{OutputFormat, Result};

pub fn output_match_summary(output_format: OutputFormat, summary: &MatchSummary) -> Result<()> {
    if output_format == OutputFormat::Json {
        let content = serde_json::to_string_pretty(summary)?;
        println!("{}", content);
        return Ok(());
    }

    if let Some(ref report) = summary.report {
        println!("{}", report);
    }

    if !summary.ranked.is_empty() {
        println!("Ranked Candidates (tightest fit first)");
        println!(
            "{:<4} {:<18} {:>9} {:>12} {:>14}",
            "#", "Plate", "Size(ft)", "Limit(t)", "Headroom(kg)"
        );
        println!("{}", "-".repeat(62));
        for (index, ranked) in summary.ranked.iter().enumerate() {
            println!(
                "{:<4} {:<18} {:>9.1} {:>12.2} {:>14.0}",
                index + 1,
                ranked.vehicle.plate_number,
                ranked.vehicle.vehicle_size_ft,
                ranked.vehicle.passing_limit_tons,
                ranked.weight_headroom_kg
            );
        }
    }

    Ok(())
}

pub fn output_loads(output_format: OutputFormat, loads: &[Load]) -> Result<()> {
    if output_format == OutputFormat::Json {
        let content = serde_json::to_string_pretty(loads)?;
        println!("{}", content);
        return Ok(());
    }

    if loads.is_empty() {
        println!("No loads found.");
        return Ok(());
    }

    println!(
        "{:<38} {:<24} {:>9} {:>11} {:<10}",
        "Load", "Route", "Size(ft)", "Weight(kg)", "Status"
    );
    println!("{}", "-".repeat(96));
    for load in loads {
        let route = format!("{} -> {}", load.origin, load.destination);
        println!(
            "{:<38} {:<24} {:>9.1} {:>11.0} {:<10}",
            truncate(&load.id, 36),
            truncate(&route, 22),
            load.vehicle_requirement.size_ft,
            load.total_weight_kg(),
            load.status.label()
        );
    }
    Ok(())
}

pub fn output_vehicles(output_format: OutputFormat, vehicles: &[Vehicle]) -> Result<()> {
    if output_format == OutputFormat::Json {
        let content = serde_json::to_string_pretty(vehicles)?;
        println!("{}", content);
        return Ok(());
    }

    if vehicles.is_empty() {
        println!("No vehicles found.");
        return Ok(());
    }

    println!(
        "{:<18} {:>9} {:>9} {:<12} {:<8} {:<11} {:<9}",
        "Plate", "Size(ft)", "Limit(t)", "Type", "Class", "Status", "Approved"
    );
    println!("{}", "-".repeat(84));
    for vehicle in vehicles {
        println!(
            "{:<18} {:>9.1} {:>9.2} {:<12} {:<8} {:<11} {:<9}",
            truncate(&vehicle.plate_number, 16),
            vehicle.vehicle_size_ft,
            vehicle.passing_limit_tons,
            truncate(&vehicle.vehicle_type, 10),
            vehicle.vehicle_class().label(),
            vehicle.status.label(),
            if vehicle.is_approved { "yes" } else { "no" }
        );
    }
    Ok(())
}

pub fn output_ledger(
    output_format: OutputFormat,
    entries: &[&CommissionEntry],
    stats: &LedgerStats,
) -> Result<()> {
    if output_format == OutputFormat::Json {
        let content = serde_json::to_string_pretty(entries)?;
        println!("{}", content);
        return Ok(());
    }

    println!("Commission Ledger");
    println!("=================");
    println!("Entries:  {}", stats.entry_count);
    println!("Pending:  {:.2}", stats.pending_amount);
    println!("Deducted: {:.2}", stats.deducted_amount);
    println!("Paid:     {:.2}", stats.paid_amount);
    println!("Total:    {:.2}", stats.total_amount());

    if !entries.is_empty() {
        println!();
        println!(
            "{:<38} {:>7} {:>11} {:<9}",
            "Load", "Rate", "Amount", "Status"
        );
        println!("{}", "-".repeat(68));
        for entry in entries {
            println!(
                "{:<38} {:>6.0}% {:>11.2} {:<9}",
                truncate(&entry.load_id, 36),
                entry.rate * 100.0,
                entry.amount,
                entry.status.label()
            );
        }
    }
    Ok(())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.len() > max_len {
        format!("{}...", &s[..max_len.saturating_sub(3)])
    } else {
        s.to_string()
    }
}
