use crate::cli::{RefreshArgs, ReminderArgs};
use crate::infra::Runtime;
use chrono::{Local, Utc};
use tinysteps::config::AppConfig;
use tinysteps::error::AppError;
use tinysteps::telemetry;

/// Loads config, starts logging and opens the store for a one-shot job.
pub(crate) fn prepare() -> Result<(AppConfig, Runtime), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    let runtime = Runtime::build(&config)?;
    Ok((config, runtime))
}

pub(crate) fn run_send_reminders(args: ReminderArgs) -> Result<(), AppError> {
    let (_, runtime) = prepare()?;
    let today = Local::now().date_naive();
    let report = runtime
        .reminder_job()
        .run(today, i64::from(args.days), args.dry_run)
        .map_err(AppError::command)?;

    if args.dry_run {
        println!(
            "Dry run: {} of {} events would get a reminder ({} already notified)",
            report.created, report.scanned, report.skipped
        );
        return Ok(());
    }

    runtime.persist()?;
    println!(
        "Sent {} reminders for {} events ({} skipped)",
        report.created, report.scanned, report.skipped
    );
    Ok(())
}

pub(crate) async fn run_refresh_articles(args: RefreshArgs) -> Result<(), AppError> {
    let (_, runtime) = prepare()?;
    let report = runtime
        .context
        .articles
        .refresh(args.topic.as_deref(), Utc::now())
        .await
        .map_err(AppError::command)?;
    runtime.persist()?;

    println!(
        "Fetched {} articles: {} new, {} updated, {} skipped",
        report.fetched, report.created, report.updated, report.skipped
    );
    Ok(())
}
