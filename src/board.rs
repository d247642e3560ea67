//! Kanban grouping of records by status, plus the drag-and-drop session
//! that drives moves between columns.
//!
//! A [`Board`] is a value: moves return a new board and a [`StatusChange`]
//! describing what the host should persist. Nothing here writes to storage.

use crate::model::{Record, RecordId};
use crate::status::{canonical_column_order, RecordKind, Status};
use indexmap::IndexMap;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Board {
    columns: IndexMap<Status, Vec<Record>>,
}

/// A move the host still has to make durable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub record_id: RecordId,
    pub kind: RecordKind,
    pub from: Status,
    pub to: Status,
}

/// Partition records into status columns, keeping source order inside each
/// column. Records without a status are left out entirely.
pub fn group_by_status(records: &[Record]) -> Board {
    let mut columns: IndexMap<Status, Vec<Record>> = IndexMap::new();
    for record in records {
        if let Some(status) = record.status() {
            columns
                .entry(status.clone())
                .or_default()
                .push(record.clone());
        }
    }
    Board { columns }
}

impl Board {
    pub fn column(&self, status: &Status) -> &[Record] {
        self.columns.get(status).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Non-empty columns: known statuses in canonical order, then unknown
    /// ones in the order they were first seen.
    pub fn ordered_columns(&self) -> Vec<&Status> {
        let known = canonical_column_order()
            .iter()
            .filter_map(|s| self.columns.get_key_value(s))
            .filter(|(_, records)| !records.is_empty())
            .map(|(status, _)| status);
        let unknown = self
            .columns
            .iter()
            .filter(|(status, records)| status.rank().is_none() && !records.is_empty())
            .map(|(status, _)| status);
        known.chain(unknown).collect()
    }

    pub fn len(&self) -> usize {
        self.columns.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.columns.values().flatten()
    }

    /// Column currently holding the record with `id`.
    pub fn locate(&self, id: &str) -> Option<&Status> {
        self.columns
            .iter()
            .find(|(_, records)| records.iter().any(|r| r.id() == id))
            .map(|(status, _)| status)
    }

    /// Move `record` from one column to another. Every entry sharing the
    /// record's id leaves `from`; one copy stamped with `to` is appended to
    /// `to`. Moving onto the same column changes nothing.
    pub fn move_record(
        &self,
        record: &Record,
        from: &Status,
        to: &Status,
    ) -> (Board, Option<StatusChange>) {
        if from == to {
            return (self.clone(), None);
        }
        let mut next = self.clone();
        if let Some(origin) = next.columns.get_mut(from) {
            origin.retain(|r| r.id() != record.id());
        }
        let mut moved = record.clone();
        moved.set_status(to.clone());
        next.columns.entry(to.clone()).or_default().push(moved);
        debug!(record = record.id(), %from, %to, "moved record");
        let change = StatusChange {
            record_id: record.id().to_string(),
            kind: record.kind(),
            from: from.clone(),
            to: to.clone(),
        };
        (next, Some(change))
    }
}

/// Drag session over a board. Every transition returns a new state;
/// `end_drag` always lands on `Idle`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        record: Record,
        from: Status,
        hovered: Option<Status>,
    },
}

impl DragState {
    pub fn begin_drag(record: Record, from: Status) -> Self {
        DragState::Dragging {
            record,
            from,
            hovered: None,
        }
    }

    pub fn hover_column(self, column: Option<Status>) -> Self {
        match self {
            DragState::Idle => DragState::Idle,
            DragState::Dragging { record, from, .. } => DragState::Dragging {
                record,
                from,
                hovered: column,
            },
        }
    }

    pub fn end_drag(self) -> Self {
        DragState::Idle
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Dragging { .. })
    }

    pub fn hovered(&self) -> Option<&Status> {
        match self {
            DragState::Dragging { hovered, .. } => hovered.as_ref(),
            DragState::Idle => None,
        }
    }

    /// Drop the dragged record on `target` and close the session.
    pub fn drop_on(self, board: &Board, target: &Status) -> (Board, Option<StatusChange>, Self) {
        match self {
            DragState::Dragging { record, from, .. } => {
                let (next, change) = board.move_record(&record, &from, target);
                (next, change, DragState::Idle)
            }
            DragState::Idle => (board.clone(), None, DragState::Idle),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::task;
    use pretty_assertions::assert_eq;

    fn ids(records: &[Record]) -> Vec<&str> {
        records.iter().map(Record::id).collect()
    }

    #[test]
    fn grouping_keeps_source_order_and_skips_statusless() {
        let records = vec![
            task("t1", Some(Status::Pending), None),
            task("t2", Some(Status::Approved), None),
            task("t3", None, None),
            task("t4", Some(Status::Pending), None),
        ];
        let board = group_by_status(&records);
        assert_eq!(ids(board.column(&Status::Pending)), vec!["t1", "t4"]);
        assert_eq!(ids(board.column(&Status::Approved)), vec!["t2"]);
        assert_eq!(board.len(), 3);
        assert_eq!(board.locate("t3"), None);
    }

    #[test]
    fn every_status_record_lands_in_exactly_one_column() {
        let records = vec![
            task("a", Some(Status::Completed), None),
            task("b", Some(Status::Other("BLOCKED".into())), None),
            task("c", None, None),
            task("d", Some(Status::InProgress), None),
            task("e", Some(Status::Completed), None),
        ];
        let board = group_by_status(&records);
        for record in records.iter().filter(|r| r.status().is_some()) {
            let hits = board.records().filter(|r| r.id() == record.id()).count();
            assert_eq!(hits, 1, "{}", record.id());
            assert_eq!(board.locate(record.id()), record.status());
        }
        assert_eq!(board.len(), 4);
    }

    #[test]
    fn columns_follow_canonical_order_then_first_seen() {
        let records = vec![
            task("a", Some(Status::Other("BLOCKED".into())), None),
            task("b", Some(Status::Completed), None),
            task("c", Some(Status::Other("PARKED".into())), None),
            task("d", Some(Status::Pending), None),
        ];
        let board = group_by_status(&records);
        assert_eq!(
            board.ordered_columns(),
            vec![
                &Status::Pending,
                &Status::Completed,
                &Status::Other("BLOCKED".into()),
                &Status::Other("PARKED".into()),
            ]
        );
    }

    #[test]
    fn move_to_same_column_is_a_no_op() {
        let records = vec![task("t1", Some(Status::Pending), None)];
        let board = group_by_status(&records);
        let (next, change) = board.move_record(&records[0], &Status::Pending, &Status::Pending);
        assert_eq!(next, board);
        assert_eq!(change, None);
    }

    #[test]
    fn move_appends_and_restamps() {
        let records = vec![
            task("t1", Some(Status::Pending), None),
            task("t2", Some(Status::Pending), None),
            task("t3", Some(Status::Approved), None),
        ];
        let board = group_by_status(&records);
        let (next, change) = board.move_record(&records[0], &Status::Pending, &Status::Approved);
        assert_eq!(ids(next.column(&Status::Pending)), vec!["t2"]);
        assert_eq!(ids(next.column(&Status::Approved)), vec!["t3", "t1"]);
        assert_eq!(
            next.column(&Status::Approved)[1].status(),
            Some(&Status::Approved)
        );
        assert_eq!(
            change,
            Some(StatusChange {
                record_id: "t1".into(),
                kind: RecordKind::Task,
                from: Status::Pending,
                to: Status::Approved,
            })
        );
        // the input board is untouched
        assert_eq!(ids(board.column(&Status::Pending)), vec!["t1", "t2"]);
    }

    #[test]
    fn move_into_missing_column_creates_it() {
        let records = vec![task("t1", Some(Status::Pending), None)];
        let board = group_by_status(&records);
        let (next, _) = board.move_record(&records[0], &Status::Pending, &Status::Approved);
        assert_eq!(next.ordered_columns(), vec![&Status::Approved]);
        assert_eq!(next.len(), 1);
    }

    #[test]
    fn duplicate_ids_collapse_on_move() {
        let records = vec![
            task("t1", Some(Status::Pending), None),
            task("t1", Some(Status::Pending), None),
        ];
        let board = group_by_status(&records);
        let (next, _) = board.move_record(&records[1], &Status::Pending, &Status::Completed);
        assert!(next.column(&Status::Pending).is_empty());
        assert_eq!(ids(next.column(&Status::Completed)), vec!["t1"]);
    }

    #[test]
    fn drag_session_always_ends_idle() {
        let records = vec![task("t1", Some(Status::Pending), None)];
        let board = group_by_status(&records);

        let state = DragState::begin_drag(records[0].clone(), Status::Pending)
            .hover_column(Some(Status::Approved));
        assert_eq!(state.hovered(), Some(&Status::Approved));
        assert_eq!(state.clone().end_drag(), DragState::Idle);

        let (next, change, state) = state.drop_on(&board, &Status::Approved);
        assert_eq!(state, DragState::Idle);
        assert!(change.is_some());
        assert_eq!(ids(next.column(&Status::Approved)), vec!["t1"]);

        let (same, change, state) = DragState::Idle.drop_on(&board, &Status::Approved);
        assert_eq!(same, board);
        assert_eq!(change, None);
        assert!(!state.is_dragging());
        assert_eq!(DragState::Idle.hover_column(Some(Status::Pending)), DragState::Idle);
    }
}
