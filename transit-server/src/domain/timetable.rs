//! Stop timetables and boarding lookups.
//!
//! A timetable lists, for one stop on one route direction and service day,
//! the time each trip arrives there. Feeds store it as two aligned columns
//! (arrival times and trip ids); [`Timetable::from_columns`] checks the
//! alignment once so the rest of the planner can trust it.

use chrono::Duration;

use super::{ClockTime, DomainError, StopId, TripId};

/// One scheduled arrival of a trip at a stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimetableEntry {
    pub arrival: ClockTime,
    pub trip: TripId,
}

impl TimetableEntry {
    pub fn new(arrival: ClockTime, trip: TripId) -> Self {
        Self { arrival, trip }
    }
}

/// Arrivals of every trip at a single stop, in feed order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timetable {
    entries: Vec<TimetableEntry>,
}

impl Timetable {
    /// Build a timetable from already-parsed entries.
    pub fn new(entries: Vec<TimetableEntry>) -> Self {
        Self { entries }
    }

    /// Build a timetable from the aligned arrival-time and trip-id columns.
    ///
    /// Fails if the columns differ in length or a time does not parse.
    ///
    /// # Examples
    ///
    /// ```
    /// use transit_server::domain::{StopId, Timetable};
    ///
    /// let stop = StopId::new("S1");
    /// let ok = Timetable::from_columns(&stop, &["07:00:00", "07:30:00"], &["T1", "T2"]);
    /// assert_eq!(ok.unwrap().len(), 2);
    ///
    /// let bad = Timetable::from_columns(&stop, &["07:00:00"], &["T1", "T2"]);
    /// assert!(bad.is_err());
    /// ```
    pub fn from_columns<A, T>(
        stop: &StopId,
        arrival_times: &[A],
        trip_ids: &[T],
    ) -> Result<Self, DomainError>
    where
        A: AsRef<str>,
        T: AsRef<str>,
    {
        if arrival_times.len() != trip_ids.len() {
            return Err(DomainError::TimetableLengthMismatch {
                stop: stop.clone(),
                arrivals: arrival_times.len(),
                trips: trip_ids.len(),
            });
        }

        let entries = arrival_times
            .iter()
            .zip(trip_ids)
            .map(|(time, trip)| {
                let arrival = ClockTime::parse_hms(time.as_ref()).map_err(|source| {
                    DomainError::BadArrivalTime {
                        stop: stop.clone(),
                        source,
                    }
                })?;
                Ok(TimetableEntry::new(arrival, TripId::new(trip.as_ref())))
            })
            .collect::<Result<Vec<_>, DomainError>>()?;

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[TimetableEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The arrival time of `trip` at this stop, if the trip calls here.
    ///
    /// This is how a rider staying on the same vehicle continues.
    pub fn match_by_trip(&self, trip: &TripId) -> Option<ClockTime> {
        self.entries
            .iter()
            .find(|e| &e.trip == trip)
            .map(|e| e.arrival)
    }

    /// Whether `trip` calls at this stop.
    pub fn serves_trip(&self, trip: &TripId) -> bool {
        self.entries.iter().any(|e| &e.trip == trip)
    }

    /// The earliest arrival a rider at this stop at `reference` can still catch.
    ///
    /// Candidates must arrive no earlier than `reference + buffer` and, when
    /// `max_wait` is set, no later than `reference + max_wait`. `None` means
    /// the wait is unbounded. Ties keep the first entry in feed order.
    pub fn closest_arrival(
        &self,
        reference: ClockTime,
        max_wait: Option<Duration>,
        buffer: Duration,
    ) -> Option<&TimetableEntry> {
        self.closest_arrival_where(reference, max_wait, buffer, |_| true)
    }

    /// [`closest_arrival`](Self::closest_arrival) restricted to entries
    /// accepted by `predicate`.
    pub fn closest_arrival_where<F>(
        &self,
        reference: ClockTime,
        max_wait: Option<Duration>,
        buffer: Duration,
        predicate: F,
    ) -> Option<&TimetableEntry>
    where
        F: Fn(&TimetableEntry) -> bool,
    {
        let earliest = reference.checked_add(buffer)?;
        let latest = match max_wait {
            Some(wait) => Some(reference.checked_add(wait)?),
            None => None,
        };

        self.entries
            .iter()
            .filter(|e| e.arrival >= earliest)
            .filter(|e| latest.is_none_or(|latest| e.arrival <= latest))
            .filter(|e| predicate(e))
            .min_by_key(|e| e.arrival)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> ClockTime {
        ClockTime::parse_hms(s).unwrap()
    }

    fn timetable(rows: &[(&str, &str)]) -> Timetable {
        let times: Vec<_> = rows.iter().map(|(time, _)| *time).collect();
        let trips: Vec<_> = rows.iter().map(|(_, trip)| *trip).collect();
        Timetable::from_columns(&StopId::new("S"), &times, &trips).unwrap()
    }

    #[test]
    fn closest_respects_buffer() {
        let tt = timetable(&[("08:03:00", "T1"), ("08:05:00", "T2"), ("08:20:00", "T3")]);

        let hit = tt
            .closest_arrival(t("08:00:00"), Some(Duration::minutes(20)), Duration::minutes(5))
            .unwrap();
        assert_eq!(hit.trip, TripId::new("T2"));
    }

    #[test]
    fn closest_respects_max_wait() {
        let tt = timetable(&[("08:30:00", "T1")]);

        assert!(
            tt.closest_arrival(t("08:00:00"), Some(Duration::minutes(20)), Duration::minutes(5))
                .is_none()
        );
        // Unbounded wait still finds it
        let hit = tt
            .closest_arrival(t("08:00:00"), None, Duration::minutes(5))
            .unwrap();
        assert_eq!(hit.arrival, t("08:30:00"));
    }

    #[test]
    fn closest_ignores_feed_order() {
        let tt = timetable(&[("09:00:00", "LATE"), ("08:10:00", "EARLY")]);
        let hit = tt
            .closest_arrival(t("08:00:00"), None, Duration::minutes(5))
            .unwrap();
        assert_eq!(hit.trip, TripId::new("EARLY"));
    }

    #[test]
    fn closest_ties_keep_first() {
        let tt = timetable(&[("08:10:00", "A"), ("08:10:00", "B")]);
        let hit = tt
            .closest_arrival(t("08:00:00"), None, Duration::minutes(5))
            .unwrap();
        assert_eq!(hit.trip, TripId::new("A"));
    }

    #[test]
    fn closest_where_filters_trips() {
        let tt = timetable(&[("08:10:00", "A"), ("08:12:00", "B")]);
        let hit = tt
            .closest_arrival_where(t("08:00:00"), None, Duration::minutes(5), |e| {
                e.trip.as_str() == "B"
            })
            .unwrap();
        assert_eq!(hit.trip, TripId::new("B"));
    }

    #[test]
    fn match_by_trip_finds_continuation() {
        let tt = timetable(&[("08:10:00", "A"), ("08:12:00", "B")]);
        assert_eq!(tt.match_by_trip(&TripId::new("B")), Some(t("08:12:00")));
        assert_eq!(tt.match_by_trip(&TripId::new("C")), None);
        assert!(tt.serves_trip(&TripId::new("A")));
    }

    #[test]
    fn mismatched_columns_rejected() {
        let err = Timetable::from_columns(&StopId::new("S9"), &["08:00:00"], &["A", "B"])
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::TimetableLengthMismatch {
                stop: StopId::new("S9"),
                arrivals: 1,
                trips: 2,
            }
        );
    }

    #[test]
    fn bad_time_rejected() {
        let err = Timetable::from_columns(&StopId::new("S9"), &["8am"], &["A"]).unwrap_err();
        assert!(matches!(err, DomainError::BadArrivalTime { .. }));
    }
}
