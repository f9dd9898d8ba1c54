use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::report::{Period, ReportLogic};
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::info;
use crate::utils::date;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List { period, now } = cmd {
        let pool = DbPool::open(&cfg.database)?;

        let period = if *now {
            let today = date::today();
            Period::Range(today, today)
        } else {
            resolve_period(period)?
        };

        let sessions = ReportLogic::load(&pool.conn, period)?;

        if sessions.is_empty() {
            info("No sessions for the selected period.");
            return Ok(());
        }

        ReportLogic::print(&sessions);
    }
    Ok(())
}

fn resolve_period(period: &Option<String>) -> AppResult<Period> {
    match period.as_deref() {
        Some("all") => Ok(Period::All),
        Some(p) => {
            let (from, to) = date::resolve_range(p).map_err(AppError::InvalidDate)?;
            Ok(Period::Range(from, to))
        }
        None => {
            let (from, to) = date::current_month().map_err(AppError::InvalidDate)?;
            Ok(Period::Range(from, to))
        }
    }
}
