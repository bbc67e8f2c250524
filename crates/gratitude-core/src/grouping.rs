//! Calendar-week buckets (Sunday to Saturday, viewer's local time).

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Days, NaiveDate, TimeZone};

use gratitude_types::api::WeekBucket;
use gratitude_types::models::Note;

/// Most recent Sunday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.weekday().num_days_from_sunday()))
}

/// `"Oct 11 - Oct 17, 2026"`; the year is repeated only when the week spans two.
pub fn week_label(start: NaiveDate) -> String {
    let end = start + Days::new(6);
    if start.year() == end.year() {
        format!("{} - {}", start.format("%b %-d"), end.format("%b %-d, %Y"))
    } else {
        format!("{} - {}", start.format("%b %-d, %Y"), end.format("%b %-d, %Y"))
    }
}

/// Week a note belongs to, seen from `now`'s timezone. Notes still waiting
/// for their server timestamp count as this week.
pub fn note_week<Tz: TimeZone>(note: &Note, now: &DateTime<Tz>) -> NaiveDate {
    let date = match note.created_at {
        Some(ts) => ts.with_timezone(&now.timezone()).date_naive(),
        None => now.date_naive(),
    };
    week_start(date)
}

/// Buckets `notes` by week, newest week first. Order inside a bucket follows
/// the input, which is the store's newest-first order.
pub fn group_by_week<'a, Tz, I>(notes: I, now: &DateTime<Tz>) -> Vec<WeekBucket>
where
    Tz: TimeZone,
    I: IntoIterator<Item = &'a Note>,
{
    let current = week_start(now.date_naive());

    let mut weeks: BTreeMap<NaiveDate, Vec<Note>> = BTreeMap::new();
    for note in notes {
        weeks.entry(note_week(note, now)).or_default().push(note.clone());
    }

    weeks
        .into_iter()
        .rev()
        .map(|(start, notes)| WeekBucket {
            week_start: start,
            label: week_label(start),
            is_current: start == current,
            notes,
        })
        .collect()
}
