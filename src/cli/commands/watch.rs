use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::clock::{Clock, SystemClock};
use crate::core::punch::PunchLogic;
use crate::core::scheduler::TickScheduler;
use crate::core::tracker::AttendanceTracker;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::info;
use crate::utils::colors::{CYAN, RESET};
use crate::utils::formatting::snapshot_line;
use std::time::Duration;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Watch { ticks, interval_ms } = cmd {
        let mut pool = DbPool::open(&cfg.database)?;
        let mut logic = PunchLogic::load(&pool.conn, SystemClock)?;
        if logic.settle(cfg.reset_delay())?.is_some() {
            logic.persist(&mut pool.conn)?;
        }

        let tracker = logic.tracker().clone();
        let snapshot = tracker.snapshot();
        println!("{}", snapshot_line(&snapshot));

        if !snapshot.status.is_active() {
            info("No open session: nothing to watch.");
            return Ok(());
        }

        let period = interval_ms
            .map(Duration::from_millis)
            .unwrap_or_else(|| cfg.tick_interval());

        println!("{}▶ Watching (Ctrl-C to stop)…{}", CYAN, RESET);

        // un solo thread: il tick e la stampa non girano mai in parallelo
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let published = runtime.block_on(watch(tracker, period, *ticks));

        tracing::debug!(published, "watch finished");
    }

    Ok(())
}

/// Print every snapshot the scheduler publishes until it stops: after
/// `ticks` refreshes, when the session closes, or on Ctrl-C.
async fn watch<C: Clock + 'static>(
    tracker: AttendanceTracker<C>,
    period: Duration,
    ticks: Option<usize>,
) -> usize {
    let mut snapshots = tracker.subscribe_snapshots();
    snapshots.borrow_and_update();

    let scheduler = TickScheduler::spawn_bounded(tracker, period, ticks);
    let cancel = scheduler.cancellation();
    let done = scheduler.join();
    tokio::pin!(done);

    loop {
        tokio::select! {
            biased;
            changed = snapshots.changed() => {
                if changed.is_err() {
                    cancel.cancel();
                    return (&mut done).await;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                println!("{}", snapshot_line(&snapshot));
            }
            published = &mut done => return published,
            _ = tokio::signal::ctrl_c() => {
                println!();
                cancel.cancel();
            }
        }
    }
}
