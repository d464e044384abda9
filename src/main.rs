//! Retirement Planner CLI
//!
//! Command-line interface for running savings projections

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use retirement_planner::plan::{load_plan, UserId};
use retirement_planner::projection::{ProjectionConfig, ProjectionHorizon, ProjectionResult};
use retirement_planner::storage::{CsvPlanCache, JsonDirectoryStore, PlanRepository};
use retirement_planner::{Planner, ScenarioRunner};

#[derive(Parser)]
#[command(name = "retirement_planner", version, about = "Project retirement savings year by year")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Project a plan file and print the yearly table
    Project {
        /// Plan document (JSON)
        plan: PathBuf,

        /// Save the plan for this user after projecting
        #[arg(long)]
        user: Option<String>,

        #[command(flatten)]
        storage: StorageArgs,

        /// Keep projecting after retirement, drawing down expenses
        #[arg(long)]
        through_life: bool,

        /// Write the yearly rows to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Print the full result as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Compare final savings across step-up rates
    Sweep {
        plan: PathBuf,

        /// Step-up rates in percent
        #[arg(long, value_delimiter = ',', default_values_t = vec![0.0, 5.0, 10.0])]
        rates: Vec<f64>,

        #[arg(long)]
        through_life: bool,
    },

    /// Print a user's saved plan as JSON
    Load {
        #[arg(long)]
        user: String,

        #[command(flatten)]
        storage: StorageArgs,
    },
}

#[derive(clap::Args)]
struct StorageArgs {
    /// Directory of saved plans
    #[arg(long, default_value = "data/plans")]
    store: PathBuf,

    /// Local cache used when the plan directory is unavailable
    #[arg(long, default_value = "data/plan_cache.csv")]
    cache: PathBuf,
}

impl StorageArgs {
    fn repository(&self) -> PlanRepository {
        PlanRepository::new(
            Box::new(JsonDirectoryStore::new(&self.store)),
            Box::new(CsvPlanCache::new(&self.cache)),
        )
    }
}

fn config(through_life: bool) -> ProjectionConfig {
    ProjectionConfig {
        horizon: if through_life {
            ProjectionHorizon::ThroughLifeExpectancy
        } else {
            ProjectionHorizon::UntilRetirement
        },
    }
}

fn main() -> Result<()> {
    env_logger::init();

    match Cli::parse().command {
        Command::Project { plan, user, storage, through_life, csv, json } => {
            let plan_path = plan;
            let plan = load_plan(&plan_path)
                .with_context(|| format!("loading plan {}", plan_path.display()))?;

            for issue in plan.validate() {
                eprintln!("warning: {}", issue);
            }

            let planner = Planner::with_repository(config(through_life), storage.repository());
            let user = user.map(UserId::new);
            let (result, save) = planner.compute_projection_tracked(&plan, user.as_ref());

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_report(&result);
            }

            if let Some(path) = csv {
                write_rows_csv(&result, &path)
                    .with_context(|| format!("writing {}", path.display()))?;
                eprintln!("Yearly rows written to: {}", path.display());
            }

            // The process is about to exit, so give the background save a chance to land
            if let Some(outcome) = save.wait() {
                eprintln!("Plan save: {:?}", outcome);
            }
        }

        Command::Sweep { plan, rates, through_life } => {
            let plan_path = plan;
            let plan = load_plan(&plan_path)
                .with_context(|| format!("loading plan {}", plan_path.display()))?;

            let runner = ScenarioRunner::with_config(config(through_life));
            println!("{:>8} {:>18} {:>18}", "Step-up", "At Retirement", "Final");
            println!("{}", "-".repeat(46));
            for (rate, result) in runner.run_step_up_sweep(&plan, &rates) {
                println!(
                    "{:>7.1}% {:>18.2} {:>18.2}",
                    rate, result.analysis.projected_retirement_savings, result.total
                );
            }
        }

        Command::Load { user, storage } => {
            let plan = storage.repository().load(&UserId::new(user));
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
    }

    Ok(())
}

fn print_report(result: &ProjectionResult) {
    println!("Retirement Planner v{}", env!("CARGO_PKG_VERSION"));
    println!("======================\n");

    println!("{:>4} {:>16} {:>16} {:>14} {:>16} {:>8}",
        "Age", "Starting", "Planned Exp", "Step-up", "Ending", "Status");
    println!("{}", "-".repeat(80));
    for row in &result.yearly_projections {
        println!("{:>4} {:>16.2} {:>16.2} {:>14.2} {:>16.2} {:>8}",
            row.age,
            row.starting_savings,
            row.planned_expenses,
            row.additional_savings,
            row.ending_savings,
            row.status.as_str(),
        );
    }

    let analysis = &result.analysis;
    println!("\nBreakdown:");
    for (label, value) in &result.breakdown {
        println!("  {}: {:.2}", label, value);
    }

    println!("\nAnalysis:");
    println!("  Savings Rate: {:.1}%", analysis.savings_rate);
    println!("  Years to Retirement: {}", analysis.years_to_retirement);
    println!("  Monthly Surplus: {:.2}", analysis.monthly_surplus);
    println!("  Projected Retirement Savings: {:.0}", analysis.projected_retirement_savings);
    println!("  Retirement Corpus Needed: {:.0}", analysis.retirement_corpus_needed);
    println!("  Allocation:");
    for (class, share) in &analysis.investment_allocation {
        println!("    {:<32} {:>5.1}%", class.label(), share);
    }

    let summary = result.summary();
    println!("\nSummary:");
    println!("  Years Projected: {}", summary.total_years);
    println!("  Peak Savings: {:.2}", summary.peak_savings);
    println!("  Final Savings: {:.2}", summary.final_savings);
    println!("  Corpus Gap: {:.2}", summary.corpus_gap);
}

fn write_rows_csv(result: &ProjectionResult, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in &result.yearly_projections {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
