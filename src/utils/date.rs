use chrono::{Datelike, Months, NaiveDate};

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// First and last day of the month containing `d`.
pub fn month_bounds(d: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    let first = d.with_day(1)?;
    let last = first.checked_add_months(Months::new(1))?.pred_opt()?;
    Some((first, last))
}

/// Resolve a single period token into an inclusive date range:
/// `YYYY-MM-DD` (one day), `YYYY-MM` (a month) or `YYYY` (a year).
pub fn bounds_of_period(p: &str) -> Result<(NaiveDate, NaiveDate), String> {
    let p = p.trim();

    // YYYY-MM-DD
    if let Some(d) = parse_date(p) {
        return Ok((d, d));
    }

    // YYYY-MM
    if let Some(dm) = parse_date(&format!("{}-01", p)) {
        return month_bounds(dm).ok_or_else(|| format!("Invalid period: {}", p));
    }

    // YYYY
    if p.len() == 4
        && let Ok(year) = p.parse::<i32>()
        && let (Some(first), Some(last)) = (
            NaiveDate::from_ymd_opt(year, 1, 1),
            NaiveDate::from_ymd_opt(year, 12, 31),
        )
    {
        return Ok((first, last));
    }

    Err(format!("Invalid period: {}", p))
}

/// Resolve `start:end` (each side any format accepted by
/// [`bounds_of_period`]) or a single period.
pub fn resolve_range(p: &str) -> Result<(NaiveDate, NaiveDate), String> {
    let (from, to) = match p.split_once(':') {
        Some((start, end)) => (bounds_of_period(start)?.0, bounds_of_period(end)?.1),
        None => bounds_of_period(p)?,
    };

    if from > to {
        return Err(format!("Invalid range: {} is after {}", from, to));
    }
    Ok((from, to))
}

pub fn current_month() -> Result<(NaiveDate, NaiveDate), String> {
    month_bounds(today()).ok_or_else(|| "Cannot compute current month".to_string())
}
