use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};
use iris_optimizer::{
    plan::route_plan::RoutePlan,
    solver::optimization_result::{Coverage, OptimizationResult, Violation},
};
use iris_simulation::comparison::{ComparisonReport, ReplicationSummary};
use jiff::SignedDuration;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table
}

/// Offset from midnight as `HH:MM`, whole minutes rounded down.
pub fn format_clock(time: SignedDuration) -> String {
    let minutes = time.as_mins();
    let sign = if minutes < 0 { "-" } else { "" };
    let minutes = minutes.abs();
    format!("{sign}{:02}:{:02}", minutes / 60, minutes % 60)
}

fn format_minutes(duration: SignedDuration) -> String {
    format!("{} min", duration.as_mins())
}

pub fn build_routes_table(plan: &RoutePlan) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "Vehicle", "Stops", "Load", "Depart", "Return", "Travel", "Overtime", "Sequence",
    ]);

    for route in plan.routes() {
        let sequence = route
            .stops
            .iter()
            .map(|stop| stop.customer_external_id.as_str())
            .collect::<Vec<_>>()
            .join(" → ");

        table.add_row(vec![
            Cell::new(&route.vehicle_external_id),
            Cell::new(route.stops.len()).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.1}", route.load)).set_alignment(CellAlignment::Right),
            Cell::new(format_clock(route.departure)).add_attribute(Attribute::Dim),
            Cell::new(format_clock(route.planned_return)),
            Cell::new(format_minutes(route.travel_time)).set_alignment(CellAlignment::Right),
            Cell::new(format_minutes(route.overtime))
                .set_alignment(CellAlignment::Right)
                .fg(if route.overtime.is_positive() {
                    Color::Red
                } else {
                    Color::Green
                }),
            Cell::new(sequence).add_attribute(Attribute::Dim),
        ]);
    }

    table
}

/// Late arrivals, overtime and unserved customers of an optimization.
pub fn build_issues_table(result: &OptimizationResult) -> Option<Table> {
    if result.is_feasible() {
        return None;
    }

    let mut table = new_table();
    table.set_header(vec!["Issue", "Subject", "Amount"]);

    for violation in &result.violations {
        let (issue, subject, amount) = match violation {
            Violation::LateArrival {
                customer_external_id,
                lateness,
                ..
            } => ("Late arrival", customer_external_id, format_minutes(*lateness)),
            Violation::Overtime {
                vehicle_external_id,
                overtime,
                ..
            } => ("Overtime", vehicle_external_id, format_minutes(*overtime)),
        };
        table.add_row(vec![
            Cell::new(issue).fg(Color::DarkYellow),
            Cell::new(subject),
            Cell::new(amount).set_alignment(CellAlignment::Right),
        ]);
    }

    if let Coverage::Infeasible { unserved, .. } = &result.coverage {
        for customer in unserved {
            table.add_row(vec![
                Cell::new("Unserved").fg(Color::Red),
                Cell::new(&customer.customer_external_id),
                Cell::new(format!("{:.1}", customer.demand)).set_alignment(CellAlignment::Right),
            ]);
        }
    }

    Some(table)
}

pub fn build_comparison_table(report: &ComparisonReport) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "Plan", "Vehicles", "Unserved", "Late stops", "Lateness", "Weather delay", "Overtime",
        "Storm legs", "Cost",
    ]);

    let best = report.optimized.total_cost().min(report.baseline.total_cost());
    for (name, outcome, seed, unserved_demand) in [
        (
            "Optimized",
            &report.optimized,
            report.optimized_seed,
            report.coverage.optimized_unserved_demand,
        ),
        (
            "Baseline",
            &report.baseline,
            report.baseline_seed,
            report.coverage.baseline_unserved_demand,
        ),
    ] {
        table.add_row(vec![
            Cell::new(format!("{name} (seed {seed})")),
            Cell::new(outcome.totals.vehicles_used).set_alignment(CellAlignment::Right),
            Cell::new(format!("{} ({unserved_demand:.1})", outcome.unserved.len()))
                .set_alignment(CellAlignment::Right)
                .fg(if outcome.unserved.is_empty() {
                    Color::Green
                } else {
                    Color::Red
                }),
            Cell::new(outcome.totals.late_stops).set_alignment(CellAlignment::Right),
            Cell::new(format_minutes(outcome.totals.total_lateness))
                .set_alignment(CellAlignment::Right),
            Cell::new(format_minutes(outcome.totals.weather_delay))
                .set_alignment(CellAlignment::Right)
                .add_attribute(Attribute::Dim),
            Cell::new(format_minutes(outcome.totals.overtime)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.0}%", outcome.storm_exposure * 100.0))
                .set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", outcome.total_cost()))
                .set_alignment(CellAlignment::Right)
                .fg(if outcome.total_cost() <= best {
                    Color::Green
                } else {
                    Color::Red
                }),
        ]);
    }

    table
}

pub fn build_saving_table(report: &ComparisonReport) -> Table {
    let mut table = new_table();
    table
        .set_header(vec!["Saving", "Ratio", "Same customers"])
        .add_row(vec![
            Cell::new(format!("{:.2}", report.saving)).fg(if report.saving >= 0.0 {
                Color::Green
            } else {
                Color::Red
            }),
            Cell::new(format!("{:.1}%", report.saving_ratio * 100.0)),
            if report.coverage.same_customers_served {
                Cell::new("yes").fg(Color::Green)
            } else {
                Cell::new("no").fg(Color::DarkYellow)
            },
        ]);
    table
}

pub fn build_replications_table(summary: &ReplicationSummary) -> Table {
    let mut table = new_table();
    table
        .set_header(vec![
            "Replications",
            "Optimized cost",
            "Baseline cost",
            "Mean saving",
            "Min saving",
            "Non-negative",
        ])
        .add_row(vec![
            Cell::new(summary.replications),
            Cell::new(format!("{:.2}", summary.mean_optimized_cost)),
            Cell::new(format!("{:.2}", summary.mean_baseline_cost)),
            Cell::new(format!("{:.2}", summary.mean_saving)).fg(if summary.mean_saving >= 0.0 {
                Color::Green
            } else {
                Color::Red
            }),
            Cell::new(format!("{:.2}", summary.min_saving)).add_attribute(Attribute::Dim),
            Cell::new(format!("{:.0}%", summary.non_negative_saving_share * 100.0)),
        ]);
    table
}
