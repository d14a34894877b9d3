pub mod observer;
pub mod score;

pub use observer::{ObserverList, RosterEvent, SubscriptionId};

use crate::model::{AircraftRecord, Field, FieldValue, Side};
use crate::prelude::{CoreError, CoreResult, ValidationError, ValidationReason};
use crate::telemetry::log::LogManager;

/// Ordered, mutable collection of records for one side.
///
/// Ids handed out by [`append`](Roster::append) are never reused within the
/// roster's lifetime. [`replace_all`](Roster::replace_all) takes records as
/// given and does not check them for duplicate ids.
///
/// The counter is wider than an id so that a roster holding `u32::MAX`
/// still has `id < next_id` for every record; appending past that point
/// fails instead of wrapping.
#[derive(Debug)]
pub struct Roster {
    side: Side,
    records: Vec<AircraftRecord>,
    next_id: u64,
    observers: ObserverList,
    logger: LogManager,
}

impl Roster {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            records: Vec::new(),
            next_id: 1,
            observers: ObserverList::new(),
            logger: LogManager::new(format!("roster[{}]", side)),
        }
    }

    pub fn with_records(side: Side, records: Vec<AircraftRecord>) -> Self {
        let mut roster = Self::new(side);
        roster.replace_all(records);
        roster
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn get(&self, index: usize) -> Option<AircraftRecord> {
        self.records.get(index).cloned()
    }

    /// Situation score of the current records; see [`score::side_score`].
    pub fn score(&self) -> u64 {
        score::side_score(&self.records)
    }

    /// Independent copy of the current records.
    pub fn snapshot(&self) -> Vec<AircraftRecord> {
        self.records.clone()
    }

    pub fn into_records(self) -> Vec<AircraftRecord> {
        self.records
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&RosterEvent) + 'static,
    {
        let id = self.observers.subscribe(callback);
        self.logger
            .detail(&format!("{} observers registered", self.observers.len()));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Appends `record` under a freshly assigned id, which is returned.
    ///
    /// Fails with [`CoreError::IdsExhausted`] once every `u32` id has been
    /// handed out; the roster is left unchanged.
    pub fn append(&mut self, mut record: AircraftRecord) -> CoreResult<u32> {
        let id = u32::try_from(self.next_id).map_err(|_| {
            self.logger.warn("no ids left to assign");
            CoreError::IdsExhausted
        })?;
        self.next_id += 1;
        record.id = id;
        self.logger
            .detail(&format!("appended id {} ({})", id, record.kind));
        self.records.push(record);
        self.notify_resized();
        Ok(id)
    }

    /// Removes the record at `index`; out-of-range indices are ignored.
    pub fn remove_at(&mut self, index: usize) -> Option<AircraftRecord> {
        if index >= self.records.len() {
            return None;
        }
        let removed = self.records.remove(index);
        self.logger.detail(&format!("removed id {}", removed.id));
        self.notify_resized();
        Some(removed)
    }

    pub fn clear(&mut self) {
        let count = self.records.len();
        self.records.clear();
        self.logger.detail(&format!("cleared {} records", count));
        self.notify_resized();
    }

    /// Wholesale reset, as used by file loads.
    pub fn replace_all(&mut self, records: Vec<AircraftRecord>) {
        self.next_id = records
            .iter()
            .map(|record| u64::from(record.id))
            .max()
            .map_or(1, |max| max + 1);
        self.records = records;
        self.logger.record(&format!(
            "loaded {} records, next id {}",
            self.records.len(),
            self.next_id
        ));
        self.notify_resized();
    }

    /// Validated single-field edit of the record at `index`.
    pub fn set_field(
        &mut self,
        index: usize,
        field: Field,
        raw: &str,
    ) -> Result<(), ValidationError> {
        self.edit(index, field, |record| record.set_field(field, raw))
    }

    /// Typed counterpart of [`set_field`](Self::set_field).
    pub fn set_value(
        &mut self,
        index: usize,
        field: Field,
        value: impl Into<FieldValue>,
    ) -> Result<(), ValidationError> {
        let value = value.into();
        self.edit(index, field, |record| record.set_value(field, value))
    }

    fn edit<F>(&mut self, index: usize, field: Field, apply: F) -> Result<(), ValidationError>
    where
        F: FnOnce(&mut AircraftRecord) -> Result<(), ValidationError>,
    {
        let record = self
            .records
            .get_mut(index)
            .ok_or_else(|| ValidationError::new(field, ValidationReason::IndexOutOfBounds))?;
        match apply(record) {
            Ok(()) => {
                self.observers.notify(RosterEvent::ContentChanged);
                Ok(())
            }
            Err(err) => {
                self.logger
                    .warn(&format!("rejected edit at row {}: {}", index, err));
                Err(err)
            }
        }
    }

    fn notify_resized(&mut self) {
        self.observers
            .notify(RosterEvent::CountChanged(self.records.len()));
        self.observers.notify(RosterEvent::ContentChanged);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn record(kind: &str) -> AircraftRecord {
        AircraftRecord::new(kind, "standby").with_position(120.0, 30.0, 6000.0)
    }

    fn ids(roster: &Roster) -> Vec<u32> {
        roster.snapshot().iter().map(|r| r.id).collect()
    }

    fn recorder(roster: &mut Roster) -> Rc<RefCell<Vec<RosterEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        roster.subscribe(move |event| sink.borrow_mut().push(*event));
        events
    }

    #[test]
    fn append_assigns_sequential_ids_that_are_never_reused() {
        let mut roster = Roster::new(Side::Red);
        assert_eq!(roster.append(record("a")).unwrap(), 1);
        roster.append(record("b")).unwrap();
        roster.append(record("c")).unwrap();
        assert_eq!(ids(&roster), vec![1, 2, 3]);

        let removed = roster.remove_at(1).unwrap();
        assert_eq!(removed.id, 2);
        assert_eq!(roster.append(record("d")).unwrap(), 4);
        assert_eq!(ids(&roster), vec![1, 3, 4]);
    }

    #[test]
    fn append_ignores_caller_supplied_id() {
        let mut roster = Roster::new(Side::Blue);
        roster.append(record("a").with_id(99)).unwrap();
        assert_eq!(ids(&roster), vec![1]);
        assert_eq!(roster.next_id(), 2);
    }

    #[test]
    fn remove_at_out_of_range_is_a_silent_no_op() {
        let mut roster = Roster::new(Side::Red);
        roster.append(record("a")).unwrap();
        let events = recorder(&mut roster);

        assert!(roster.remove_at(5).is_none());
        assert_eq!(roster.len(), 1);
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn replace_all_recomputes_next_id_without_deduplicating() {
        let mut roster = Roster::new(Side::Red);
        roster.replace_all(vec![record("a").with_id(4), record("b").with_id(4)]);
        assert_eq!(ids(&roster), vec![4, 4]);
        assert_eq!(roster.next_id(), 5);

        roster.replace_all(Vec::new());
        assert_eq!(roster.next_id(), 1);
    }

    #[test]
    fn snapshot_is_detached_from_the_roster() {
        let mut roster = Roster::new(Side::Red);
        roster.append(record("a")).unwrap();
        let mut copy = roster.snapshot();
        copy[0].kind = "tampered".into();
        copy.clear();
        assert_eq!(roster.get(0).unwrap().kind, "a");
    }

    #[test]
    fn structural_changes_notify_count_then_content() {
        let mut roster = Roster::new(Side::Red);
        let events = recorder(&mut roster);

        roster.append(record("a")).unwrap();
        roster.clear();
        assert_eq!(
            *events.borrow(),
            vec![
                RosterEvent::CountChanged(1),
                RosterEvent::ContentChanged,
                RosterEvent::CountChanged(0),
                RosterEvent::ContentChanged,
            ]
        );
    }

    #[test]
    fn set_field_notifies_only_on_success() {
        let mut roster = Roster::new(Side::Red);
        roster.append(record("a")).unwrap();
        let events = recorder(&mut roster);

        roster.set_field(0, Field::Heading, "45").unwrap();
        assert!(roster.set_field(0, Field::Heading, "400").is_err());
        assert_eq!(
            roster.set_field(3, Field::Heading, "10").unwrap_err().reason,
            ValidationReason::IndexOutOfBounds
        );

        assert_eq!(*events.borrow(), vec![RosterEvent::ContentChanged]);
        assert_eq!(roster.get(0).unwrap().heading, 45.0);
    }

    #[test]
    fn direct_id_edit_does_not_touch_the_counter() {
        let mut roster = Roster::new(Side::Red);
        roster.append(record("a")).unwrap();
        roster.append(record("b")).unwrap();
        roster.set_value(1, Field::Id, 1u32).unwrap();
        assert_eq!(ids(&roster), vec![1, 1]);
        assert_eq!(roster.next_id(), 3);
    }

    #[test]
    fn append_after_highest_possible_id_fails_without_wrapping() {
        let mut roster = Roster::new(Side::Blue);
        roster.replace_all(vec![record("edge").with_id(u32::MAX)]);
        assert_eq!(roster.next_id(), u64::from(u32::MAX) + 1);
        let events = recorder(&mut roster);

        let err = roster.append(record("late")).unwrap_err();
        assert!(matches!(err, CoreError::IdsExhausted));
        assert_eq!(ids(&roster), vec![u32::MAX]);
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn append_hands_out_the_last_id_once() {
        let mut roster = Roster::new(Side::Red);
        roster.replace_all(vec![record("a").with_id(u32::MAX - 1)]);
        assert_eq!(roster.append(record("b")).unwrap(), u32::MAX);
        assert!(roster.append(record("c")).is_err());
        assert_eq!(roster.len(), 2);
    }

    #[test]
    fn score_tracks_roster_content() {
        let mut roster = Roster::new(Side::Red);
        assert_eq!(roster.score(), 0);
        roster.append(record("a")).unwrap();
        // 10 base + 15 (alt 6000) + 5 (speed 0) + 5 (standby)
        assert_eq!(roster.score(), 35);
        roster.set_field(0, Field::Status, "combat").unwrap();
        assert_eq!(roster.score(), 45);
    }
}
