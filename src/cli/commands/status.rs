use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::clock::SystemClock;
use crate::core::punch::PunchLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::utils::formatting::snapshot_details;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Status { json } = cmd {
        let mut pool = DbPool::open(&cfg.database)?;
        let mut logic = PunchLogic::load(&pool.conn, SystemClock)?;

        if logic.settle(cfg.reset_delay())?.is_some() {
            logic.persist(&mut pool.conn)?;
        }

        let snapshot = logic.tracker().snapshot();

        if *json {
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        } else {
            println!("{}", snapshot_details(&snapshot));
        }
    }

    Ok(())
}
