// EventQueue is a normal binary heap, except that elements are assigned a
// "handle" and can be deleted using this handle.

use slab::Slab;
use std::cmp::Ordering;

use crate::beachline::ArcHandle;
use crate::geometry::Point;
use crate::Site;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CircleEvent {
    pub arc: ArcHandle,
    pub center: Point,
    /// Bottom of the circle; the sweep position at which the arc vanishes.
    pub sweep: Point,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    Site(Site),
    Circle(CircleEvent),
}

impl Event {
    pub fn point(&self) -> Point {
        match self {
            Event::Site(site) => site.point(),
            Event::Circle(circle) => circle.sweep,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Event::Site(_) => 0,
            Event::Circle(_) => 1,
        }
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub struct EventHandle(usize);

struct Entry {
    event: Event,
    seq: u64,
    heap_index: usize,
}

impl Entry {
    // Higher y first, then lower x, then site events, then insertion order.
    fn cmp(&self, other: &Entry) -> Ordering {
        let a = self.event.point();
        let b = other.event.point();
        b.y.total_cmp(&a.y)
            .then_with(|| a.x.total_cmp(&b.x))
            .then_with(|| self.event.rank().cmp(&other.event.rank()))
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

#[derive(Default)]
pub struct EventQueue {
    entries: Slab<Entry>,
    heap: Vec<usize>,
    next_seq: u64,
}

impl EventQueue {
    pub fn with_capacity(n: usize) -> EventQueue {
        EventQueue {
            entries: Slab::with_capacity(n),
            heap: Vec::with_capacity(n),
            next_seq: 0,
        }
    }

    pub fn insert(&mut self, event: Event) -> EventHandle {
        let seq = self.next_seq;
        self.next_seq += 1;
        let key = self.entries.insert(Entry {
            event,
            seq,
            heap_index: self.heap.len(),
        });
        self.heap.push(key);
        self.heapify_up(self.heap.len() - 1);
        EventHandle(key)
    }

    pub fn get(&self, handle: EventHandle) -> Option<&Event> {
        self.entries.get(handle.0).map(|entry| &entry.event)
    }

    pub fn pop(&mut self) -> Option<Event> {
        let key = *self.heap.first()?;
        Some(self.remove_at(key))
    }

    /// Removes a pending event. Returns `None` if the handle was already
    /// popped or removed.
    pub fn remove(&mut self, handle: EventHandle) -> Option<Event> {
        if !self.entries.contains(handle.0) {
            return None;
        }
        Some(self.remove_at(handle.0))
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    fn remove_at(&mut self, key: usize) -> Event {
        let at = self.entries[key].heap_index;
        let last = self.heap.len() - 1;
        self.swap(at, last);
        self.heap.pop();
        let entry = self.entries.remove(key);
        if at < self.heap.len() {
            // The moved element can be out of place in either direction
            self.heapify_down(at);
            self.heapify_up(at);
        }
        entry.event
    }

    fn less(&self, i: usize, j: usize) -> bool {
        self.entries[self.heap[i]].cmp(&self.entries[self.heap[j]]) == Ordering::Less
    }

    fn heapify_up(&mut self, mut at: usize) {
        while at > 0 {
            let parent = (at - 1) / 2;
            if !self.less(at, parent) {
                break;
            }
            self.swap(at, parent);
            at = parent;
        }
    }

    fn heapify_down(&mut self, mut at: usize) {
        loop {
            let left = 2 * at + 1;
            let right = left + 1;
            let mut smallest = at;
            if left < self.heap.len() && self.less(left, smallest) {
                smallest = left;
            }
            if right < self.heap.len() && self.less(right, smallest) {
                smallest = right;
            }
            if smallest == at {
                break;
            }
            self.swap(smallest, at);
            at = smallest;
        }
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.heap.swap(i, j);
        let (a, b) = (self.heap[i], self.heap[j]);
        self.entries[a].heap_index = i;
        self.entries[b].heap_index = j;
    }
}
