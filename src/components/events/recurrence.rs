use super::models::Event;
use crate::utils::time::{format_timestamp, parse_timestamp, recurrence_step};
use tracing::debug;
use uuid::Uuid;

/// Number of occurrences synthesized for each recurring event
pub const OCCURRENCE_COUNT: i32 = 10;

/// Expand recurring events into their upcoming occurrences.
///
/// Every base event is kept, and each recurring one is followed by
/// [`OCCURRENCE_COUNT`] copies with fresh ids, shifted by 1x..Nx the rule's
/// step. Events with unparseable timestamps pass through unexpanded.
pub fn expand(events: Vec<Event>) -> Vec<Event> {
    expand_with(events, || Uuid::new_v4().to_string())
}

/// Same as [`expand`] with a caller-supplied id generator
pub fn expand_with<F>(events: Vec<Event>, mut next_id: F) -> Vec<Event>
where
    F: FnMut() -> String,
{
    let mut expanded = Vec::with_capacity(events.len());

    for event in events {
        let occurrences = occurrences_of(&event, &mut next_id);
        expanded.push(event);
        expanded.extend(occurrences);
    }

    expanded
}

fn occurrences_of<F>(event: &Event, next_id: &mut F) -> Vec<Event>
where
    F: FnMut() -> String,
{
    let Some(rule) = event.recurrence_rule() else {
        return Vec::new();
    };

    let (Some(start), Some(end)) = (
        parse_timestamp(&event.start_time),
        parse_timestamp(&event.end_time),
    ) else {
        debug!("Skipping expansion of event {}: unparseable timestamps", event.id);
        return Vec::new();
    };

    let step = recurrence_step(rule);

    (1..=OCCURRENCE_COUNT)
        .map_while(|n| {
            let offset = step * n;
            let start = start.checked_add_signed(offset)?;
            let end = end.checked_add_signed(offset)?;
            Some(Event {
                id: next_id(),
                start_time: format_timestamp(&start),
                end_time: format_timestamp(&end),
                ..event.clone()
            })
        })
        .collect()
}

/// Sort ascending by the raw `start_time` string
pub fn sort_by_start_time(events: &mut [Event]) {
    events.sort_by(|a, b| a.start_time.cmp(&b.start_time));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn event(id: &str, start: &str, end: &str, recurring: Option<&str>) -> Event {
        Event {
            id: id.to_string(),
            title: format!("Event {}", id),
            description: String::new(),
            start_time: start.to_string(),
            end_time: end.to_string(),
            recurring: recurring.map(str::to_string),
        }
    }

    #[test]
    fn test_daily_expansion() {
        let base = event("a", "2025-01-01T00:00:00", "2025-01-01T01:00:00", Some("daily"));
        let expanded = expand(vec![base.clone()]);

        assert_eq!(expanded.len(), 11);
        assert_eq!(expanded[0], base);

        let starts: Vec<&str> = expanded[1..].iter().map(|e| e.start_time.as_str()).collect();
        assert_eq!(starts[0], "2025-01-02T00:00:00");
        assert_eq!(starts[9], "2025-01-11T00:00:00");
        assert_eq!(expanded[10].end_time, "2025-01-11T01:00:00");

        for occurrence in &expanded[1..] {
            assert_eq!(occurrence.title, base.title);
            assert_eq!(occurrence.recurring.as_deref(), Some("daily"));
            assert_ne!(occurrence.id, base.id);
        }
    }

    #[test]
    fn test_weekly_and_monthly_steps() {
        let weekly = event("w", "2025-01-01T10:00:00", "2025-01-01T11:00:00", Some("weekly"));
        let monthly = event("m", "2025-01-01T10:00:00", "2025-01-01T11:00:00", Some("monthly"));
        let expanded = expand(vec![weekly, monthly]);

        assert_eq!(expanded.len(), 22);
        assert_eq!(expanded[1].start_time, "2025-01-08T10:00:00");
        assert_eq!(expanded[10].start_time, "2025-03-12T10:00:00");
        // 30-day months, not calendar months
        assert_eq!(expanded[12].start_time, "2025-01-31T10:00:00");
        assert_eq!(expanded[13].start_time, "2025-03-02T10:00:00");
    }

    #[test]
    fn test_unknown_rule_collapses_to_zero_step() {
        let base = event("b", "2025-01-01T00:00:00", "2025-01-01T01:00:00", Some("biweekly"));
        let expanded = expand(vec![base]);

        assert_eq!(expanded.len(), 11);
        assert!(expanded
            .iter()
            .all(|e| e.start_time == "2025-01-01T00:00:00"));
    }

    #[test]
    fn test_non_recurring_passes_through() {
        let events = vec![
            event("a", "2025-01-01T00:00:00", "2025-01-01T01:00:00", None),
            event("b", "2025-01-01T00:00:00", "2025-01-01T01:00:00", Some("")),
        ];
        assert_eq!(expand(events.clone()), events);
    }

    #[test]
    fn test_none_tag_is_degenerate_not_absent() {
        let base = event("n", "2025-01-01T00:00:00", "2025-01-01T01:00:00", Some("none"));
        let expanded = expand(vec![base.clone()]);

        assert_eq!(expanded.len(), 11);
        assert_eq!(expanded[0], base);
        assert!(expanded
            .iter()
            .all(|e| e.start_time == "2025-01-01T00:00:00" && e.end_time == "2025-01-01T01:00:00"));
    }

    #[test]
    fn test_malformed_timestamps_pass_through() {
        let events = vec![
            event("a", "soon", "2025-01-01T01:00:00", Some("daily")),
            event("b", "2025-01-01T00:00:00", "later", Some("weekly")),
        ];
        assert_eq!(expand(events.clone()), events);
    }

    #[test]
    fn test_occurrence_ids_are_unique_and_not_stable() {
        let base = event("a", "2025-01-01T00:00:00", "2025-01-01T01:00:00", Some("daily"));

        let first = expand(vec![base.clone()]);
        let second = expand(vec![base]);

        let first_ids: HashSet<&str> = first.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(first_ids.len(), 11);

        for (a, b) in first[1..].iter().zip(second[1..].iter()) {
            assert_eq!(a.start_time, b.start_time);
            assert_ne!(a.id, b.id);
        }
    }

    #[test]
    fn test_expand_with_custom_ids() {
        let base = event("a", "2025-01-01T00:00:00", "2025-01-01T01:00:00", Some("daily"));
        let mut counter = 0;
        let expanded = expand_with(vec![base], || {
            counter += 1;
            format!("occ-{}", counter)
        });

        assert_eq!(expanded[1].id, "occ-1");
        assert_eq!(expanded[10].id, "occ-10");
    }

    #[test]
    fn test_sort_by_start_time() {
        let mut events = vec![
            event("late", "2025-03-01T00:00:00", "2025-03-01T01:00:00", None),
            event("early", "2025-01-01T00:00:00", "2025-01-01T01:00:00", None),
            event("mid", "2025-02-01T00:00:00", "2025-02-01T01:00:00", None),
        ];
        sort_by_start_time(&mut events);

        let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["early", "mid", "late"]);
    }
}
