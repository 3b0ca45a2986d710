//! Shared-window computation

use huddle_api::PlayerAvailability;
use huddle_util::TimeRange;

/// Latest start and earliest end across `ranges`.
///
/// Returns `None` for an empty input or when the ranges do not overlap.
/// Order of the input does not matter.
pub fn intersect<I>(ranges: I) -> Option<TimeRange>
where
    I: IntoIterator<Item = TimeRange>,
{
    let mut ranges = ranges.into_iter();
    let first = ranges.next()?;

    let (start, end) = ranges.fold((first.start(), first.end()), |(start, end), r| {
        (start.max(r.start()), end.min(r.end()))
    });

    TimeRange::new(start, end)
}

/// Intersection over the players that are available; everyone else is skipped.
pub fn intersect_available<'a, I>(players: I) -> Option<TimeRange>
where
    I: IntoIterator<Item = &'a PlayerAvailability>,
{
    intersect(players.into_iter().filter_map(PlayerAvailability::time_range))
}
