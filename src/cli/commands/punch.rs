use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::clock::SystemClock;
use crate::core::punch::{PunchAction, PunchLogic};
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::{BreakCategory, SessionSnapshot, Transition, WorkLocation};
use crate::ui::messages::{info, transition};
use crate::utils::formatting::snapshot_details;

fn parse_location(pos: &Option<String>, cfg: &Config) -> AppResult<WorkLocation> {
    match pos {
        Some(code) => WorkLocation::from_code(code).ok_or_else(|| {
            AppError::InvalidPosition(format!(
                "Invalid location code '{}'. Use one of O, R, H, F (office, remote, home, field)",
                code
            ))
        }),
        None => cfg.default_location(),
    }
}

fn parse_break(kind: &Option<String>, cfg: &Config) -> AppResult<BreakCategory> {
    match kind {
        Some(k) => BreakCategory::parse(k).ok_or_else(|| {
            AppError::InvalidBreakKind(format!(
                "'{}'. Use one of lunch, tea, short, meeting, other",
                k
            ))
        }),
        None => cfg.default_break_category(),
    }
}

fn describe(kind: Transition, snapshot: &SessionSnapshot) -> String {
    let at = snapshot.taken_at.format("%H:%M:%S");
    let session = snapshot.session.as_ref();

    match kind {
        Transition::CheckIn => format!(
            "Checked in at {} ({}).",
            at,
            session
                .map(|s| s.check_in_location.label())
                .unwrap_or("-")
        ),
        Transition::StartBreak => format!(
            "Break started at {} ({}).",
            at,
            session
                .and_then(|s| s.open_break())
                .map(|b| b.category.as_str())
                .unwrap_or("-")
        ),
        Transition::EndBreak => format!("Back to work at {}.", at),
        Transition::CheckOut => format!("Checked out at {}.", at),
        Transition::Reset => "Ready for the next check-in.".to_string(),
        Transition::EditNote => "Note updated.".to_string(),
    }
}

/// Handle `in`, `break`, `resume`, `out`, `reset` and `note`.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let action = match cmd {
        Commands::In { pos, note } => PunchAction::In {
            location: parse_location(pos, cfg)?,
            note: note.clone(),
        },
        Commands::Break { kind } => PunchAction::Break(parse_break(kind, cfg)?),
        Commands::Resume => PunchAction::Resume,
        Commands::Out { note } => PunchAction::Out { note: note.clone() },
        Commands::Reset => PunchAction::Reset,
        Commands::Note { text } => PunchAction::Note(text.clone()),
        _ => return Ok(()),
    };
    let kind = action.transition();

    let mut pool = DbPool::open(&cfg.database)?;
    let mut logic = PunchLogic::load(&pool.conn, SystemClock)?;

    if logic.settle(cfg.reset_delay())?.is_some() {
        info("Previous session closed more than the reset delay ago: starting over.");
    }

    // anche se la transizione fallisce, l'eventuale reset va salvato
    let result = logic.apply(action);
    logic.persist(&mut pool.conn)?;
    let snapshot = result?;

    transition(kind, describe(kind, &snapshot));
    println!("{}", snapshot_details(&snapshot));
    Ok(())
}
