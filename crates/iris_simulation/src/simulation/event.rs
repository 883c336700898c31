use std::{cmp::Ordering, collections::BinaryHeap};

use jiff::SignedDuration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Leaves the current location for the next stop, or for the depot once
    /// every stop is served.
    Depart,
    Arrive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub time: SignedDuration,
    /// Index of the route in the simulated plan.
    pub route: usize,
    pub kind: EventKind,
    sequence: u64,
}

impl Ord for Event {
    // Reversed so that the binary heap pops the earliest event first, ties in
    // insertion order.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .time
            .cmp(&self.time)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Time-ordered queue of pending vehicle events.
#[derive(Debug, Default)]
pub struct EventQueue {
    heap: BinaryHeap<Event>,
    next_sequence: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        EventQueue::default()
    }

    pub fn push(&mut self, time: SignedDuration, route: usize, kind: EventKind) {
        self.heap.push(Event {
            time,
            route,
            kind,
            sequence: self.next_sequence,
        });
        self.next_sequence += 1;
    }

    pub fn pop(&mut self) -> Option<Event> {
        self.heap.pop()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pops_earliest_first() {
        let mut queue = EventQueue::new();
        queue.push(SignedDuration::from_mins(30), 0, EventKind::Arrive);
        queue.push(SignedDuration::from_mins(10), 1, EventKind::Depart);
        queue.push(SignedDuration::from_mins(20), 2, EventKind::Depart);

        let routes: Vec<usize> = std::iter::from_fn(|| queue.pop())
            .map(|event| event.route)
            .collect();

        assert_eq!(routes, vec![1, 2, 0]);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut queue = EventQueue::new();
        let time = SignedDuration::from_hours(8);
        queue.push(time, 2, EventKind::Depart);
        queue.push(time, 0, EventKind::Depart);
        queue.push(time, 1, EventKind::Depart);

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.pop().map(|event| event.route), Some(2));
        assert_eq!(queue.pop().map(|event| event.route), Some(0));
        assert_eq!(queue.pop().map(|event| event.route), Some(1));
        assert!(queue.is_empty());
    }
}
