//! Utility functions for reporting and persisting results.

use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use crate::driver::SolverSolution;
use crate::problem::Problem;
use crate::solution::Solution;

/// Format a duration as hours, minutes, and seconds.
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}h {:02}m {:02}s", hours, minutes, seconds)
}

/// Parse a non-negative, finite number of seconds.
pub fn parse_seconds(value: &str) -> Result<Duration, String> {
    let seconds: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("`{}` is not a number of seconds", value))?;
    Duration::try_from_secs_f64(seconds)
        .map_err(|_| format!("`{}` is not a valid time limit in seconds", value))
}

/// One aired commercial in the report, by external ids.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentReport {
    pub commercial_id: u32,
    pub position: usize,
    pub start_time: u32,
    pub end_time: u32,
    pub revenue: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryReport {
    pub inventory_id: u32,
    pub hour: u32,
    pub duration: u32,
    pub filled: u32,
    pub assignments: Vec<AssignmentReport>,
}

/// Per-inventory schedules of a solution, keyed by external ids.
pub fn schedule_report(solution: &Solution, problem: &Problem) -> Vec<InventoryReport> {
    (0..solution.num_inventories())
        .map(|index| {
            let inventory = problem.inventory(index);
            InventoryReport {
                inventory_id: inventory.id,
                hour: inventory.hour,
                duration: inventory.duration,
                filled: solution.utilization(index),
                assignments: solution
                    .schedule(index)
                    .iter()
                    .map(|assignment| AssignmentReport {
                        commercial_id: problem.commercial(assignment.commercial).id,
                        position: assignment.position,
                        start_time: assignment.start_time,
                        end_time: assignment.end_time,
                        revenue: assignment.revenue,
                    })
                    .collect(),
            }
        })
        .collect()
}

#[derive(Serialize)]
struct SolutionReport<'a> {
    #[serde(flatten)]
    summary: &'a SolverSolution,
    unassigned: Vec<u32>,
    schedules: Vec<InventoryReport>,
}

/// Save a solver result as pretty JSON.
pub fn save_solution<P: AsRef<Path>>(
    result: &SolverSolution,
    problem: &Problem,
    path: P,
) -> io::Result<()> {
    let report = SolutionReport {
        summary: result,
        unassigned: result
            .best
            .unassigned_commercials()
            .into_iter()
            .map(|index| problem.commercial(index).id)
            .collect(),
        schedules: schedule_report(&result.best, problem),
    };

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &report)?;
    writeln!(writer)?;
    writer.flush()
}

/// Save a problem in the instance JSON format it can be loaded from.
pub fn save_problem<P: AsRef<Path>>(problem: &Problem, path: P) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &problem.to_instance())?;
    writeln!(writer)?;
    writer.flush()
}

/// Human-readable summary of a run.
pub struct SearchSummary {
    pub instance: String,
    pub iterations: u64,
    pub runtime: Duration,
    pub revenue: f64,
    pub assigned: usize,
    pub commercials: usize,
    pub checkpoints: usize,
}

impl SearchSummary {
    pub fn from_result(result: &SolverSolution, problem: &Problem) -> Self {
        SearchSummary {
            instance: result.instance.clone(),
            iterations: result.iterations,
            runtime: Duration::from_secs_f64(result.elapsed_seconds.max(0.0)),
            revenue: result.revenue,
            assigned: result.best.num_assigned(),
            commercials: problem.num_commercials(),
            checkpoints: result.checkpoints.len(),
        }
    }

    /// Format the summary as a string.
    pub fn format(&self) -> String {
        format!(
            "Search Summary for {}:
- Iterations: {}
- Runtime: {}
- Best Revenue: {:.2}
- Assigned Commercials: {} / {}
- Improvements: {}",
            self.instance,
            self.iterations,
            format_duration(self.runtime),
            self.revenue,
            self.assigned,
            self.commercials,
            self.checkpoints
        )
    }
}
