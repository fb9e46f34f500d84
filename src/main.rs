use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use sqlx::postgres::PgPoolOptions;

mod classify;
mod db;
mod metrics;
mod models;
mod objectives;
mod report;
mod selector;
mod view;

use models::PeriodRecord;
use view::{View, ViewStatus};

#[derive(Parser)]
#[command(name = "leads-dashboard")]
#[command(about = "Sales funnel analytics for Freekap leads", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Csv,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the full dashboard as a markdown report
    Report {
        /// Month for the conversion ratios card, e.g. 2025-06
        #[arg(long)]
        month: Option<String>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Track monthly objectives for the current month
    Monthly {
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Track weekly objective averages across fetched weeks
    Weekly {
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Compare conversion ratios with the desired ratios
    Ratios {
        /// Month to compare, defaults to the most recent one
        #[arg(long)]
        month: Option<String>,
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// List the months available for selection
    Months,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let database_url = std::env::var("DATABASE_URL")
        .context("DATABASE_URL must be set to the leads Postgres instance")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("failed to connect to Postgres")?;

    match cli.command {
        Commands::Report { month, out } => {
            let mut monthly = View::new();
            monthly.load(db::fetch_monthly_series(&pool)).await;
            if let Some(month) = month {
                monthly.select_period(month);
            }

            let mut weekly = View::new();
            weekly.load(db::fetch_weekly_series(&pool)).await;

            let report = report::build_report(&monthly, &weekly);
            std::fs::write(&out, report)?;
            println!("Report written to {}.", out.display());
        }
        Commands::Monthly { format } => {
            let mut view = View::new();
            view.load(db::fetch_monthly_series(&pool)).await;
            let rows = view::monthly_objective_rows(&view);
            match format {
                OutputFormat::Json => {
                    println!("{}", report::to_json(&view::snapshot(&view, &rows))?);
                }
                _ if view.status() == ViewStatus::Error => {
                    render_error("Objectifs Mensuels", view.error_message());
                }
                OutputFormat::Text => {
                    match models::latest(view.series()) {
                        Some(record) => {
                            println!("Objectifs Mensuels ({})", record.period_label())
                        }
                        None => println!("Objectifs Mensuels"),
                    }
                    print!("{}", report::objectives_text("Totaux", &rows));
                }
                OutputFormat::Csv => print!("{}", report::rows_csv(&rows)?),
            }
        }
        Commands::Weekly { format } => {
            let mut view = View::new();
            view.load(db::fetch_weekly_series(&pool)).await;
            let rows = view::weekly_objective_rows(&view);
            match format {
                OutputFormat::Json => {
                    println!("{}", report::to_json(&view::snapshot(&view, &rows))?);
                }
                _ if view.status() == ViewStatus::Error => {
                    render_error("Objectifs Hebdomadaires", view.error_message());
                }
                OutputFormat::Text => {
                    println!(
                        "Objectifs Hebdomadaires (moyenne sur {} semaines)",
                        view.series().len()
                    );
                    print!("{}", report::objectives_text("Moyenne Hebdo", &rows));
                }
                OutputFormat::Csv => print!("{}", report::rows_csv(&rows)?),
            }
        }
        Commands::Ratios { month, format } => {
            let mut view = View::new();
            view.load(db::fetch_monthly_series(&pool)).await;
            if let Some(month) = month {
                view.select_period(month);
            }
            let rows = view::conversion_rows(&view);
            match format {
                OutputFormat::Json => {
                    println!("{}", report::to_json(&view::snapshot(&view, &rows))?);
                }
                _ if view.status() == ViewStatus::Error => {
                    render_error("Ratios de Conversion", view.error_message());
                }
                OutputFormat::Text => {
                    match view.resolved() {
                        Some(record) => {
                            println!("Ratios de Conversion ({})", record.period_label())
                        }
                        None => println!("Ratios de Conversion (aucun mois sélectionné)"),
                    }
                    print!("{}", report::conversions_text(&rows));
                }
                OutputFormat::Csv => print!("{}", report::rows_csv(&rows)?),
            }
        }
        Commands::Months => {
            let mut view: View<models::MonthlyEventCount> = View::new();
            view.load(db::fetch_monthly_series(&pool)).await;
            if view.status() == ViewStatus::Error {
                render_error("Months", view.error_message());
                return Ok(());
            }
            let periods = view.available_periods();
            if periods.is_empty() {
                println!("No months available.");
            } else {
                println!("Available months:");
                for (key, label) in periods {
                    println!("- {key}: {label}");
                }
            }
        }
    }

    Ok(())
}

fn render_error(title: &str, message: Option<&str>) {
    println!("{title}: error loading data");
    println!("{}", message.unwrap_or("unknown error"));
}
