use crate::core::history::HistoryTotals;
use crate::db::models::StoredSession;
use crate::db::queries::{load_all_sessions, load_sessions_between};
use crate::errors::AppResult;
use crate::utils::colors::{GREY, RESET};
use crate::utils::formatting::{bold, secs2hms};
use chrono::NaiveDate;
use rusqlite::Connection;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Range(NaiveDate, NaiveDate),
    All,
}

pub struct ReportLogic;

impl ReportLogic {
    pub fn load(conn: &Connection, period: Period) -> AppResult<Vec<StoredSession>> {
        match period {
            Period::Range(from, to) => load_sessions_between(conn, &from, &to),
            Period::All => load_all_sessions(conn),
        }
    }

    pub fn print(sessions: &[StoredSession]) {
        let mut by_day: BTreeMap<NaiveDate, Vec<&StoredSession>> = BTreeMap::new();
        for s in sessions {
            by_day.entry(s.sealed.date()).or_default().push(s);
        }

        for (date, day) in &by_day {
            println!("\n{}", bold(&format!("=== {} ({}) ===", date, date.format("%a"))));

            for (i, s) in day.iter().enumerate() {
                println!(
                    "#{:<2} {} → {}  {:<6}  elapsed {}  break {}  net {}",
                    i + 1,
                    s.sealed.check_in.format("%H:%M:%S"),
                    s.sealed.check_out().format("%H:%M:%S"),
                    s.sealed.check_in_location.label(),
                    secs2hms(s.elapsed_seconds),
                    secs2hms(s.break_seconds),
                    secs2hms(s.net_seconds),
                );

                for b in s.sealed.closed_breaks() {
                    let end = b
                        .end
                        .map(|e| e.format("%H:%M:%S").to_string())
                        .unwrap_or_else(|| "--:--:--".into());
                    println!(
                        "    {GREY}{:<8} {} → {}{RESET}",
                        b.category.as_str(),
                        b.start.format("%H:%M:%S"),
                        end
                    );
                }

                if let Some(note) = &s.sealed.check_in_note {
                    println!("    {GREY}in:  {}{RESET}", note);
                }
                if let Some(note) = &s.sealed.check_out_note {
                    println!("    {GREY}out: {}{RESET}", note);
                }
            }

            let totals = HistoryTotals::of(day.iter().map(|s| &s.sealed));
            println!(
                "Day total: {} session(s), net {}",
                totals.sessions,
                secs2hms(totals.net_seconds)
            );
        }

        let all = HistoryTotals::of(sessions.iter().map(|s| &s.sealed));
        println!(
            "\n{} {} session(s) | elapsed {} | break {} | net {}",
            bold("Total:"),
            all.sessions,
            secs2hms(all.elapsed_seconds),
            secs2hms(all.break_seconds),
            secs2hms(all.net_seconds),
        );
    }
}
