//! Opt-in registry of named points.
//!
//! Most code holds [`Point`]s directly. Components that need to look points
//! up by name (editors, debug overlays, scripted scenes) own a
//! [`PointRegistry`] instead of relying on shared global state.

use std::collections::HashMap;

use slotmap::{SlotMap, new_key_type};

use crate::point::Point;

new_key_type! {
    /// Identifies a point stored in a [`PointRegistry`].
    pub struct PointId;
}

#[derive(Debug, Clone)]
struct Entry {
    name: String,
    point: Point,
}

/// An arena of points addressable by ID or by unique name.
#[derive(Debug, Default)]
pub struct PointRegistry {
    points: SlotMap<PointId, Entry>,
    names: HashMap<String, PointId>,
    counter: u64,
}

impl PointRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a point under a generated name ("1", "2", ...).
    pub fn insert(&mut self, point: Point) -> PointId {
        loop {
            self.counter += 1;
            let name = self.counter.to_string();
            if !self.names.contains_key(&name) {
                return self.insert_entry(name, point);
            }
        }
    }

    /// Store a point under `name`.
    ///
    /// Returns `None` if the name is already taken.
    pub fn insert_named(&mut self, name: impl Into<String>, point: Point) -> Option<PointId> {
        let name = name.into();
        if self.names.contains_key(&name) {
            return None;
        }
        Some(self.insert_entry(name, point))
    }

    fn insert_entry(&mut self, name: String, point: Point) -> PointId {
        let id = self.points.insert(Entry {
            name: name.clone(),
            point,
        });
        self.names.insert(name, id);
        id
    }

    /// Look up a point by ID.
    pub fn get(&self, id: PointId) -> Option<&Point> {
        self.points.get(id).map(|entry| &entry.point)
    }

    /// Look up a point by ID for mutation.
    pub fn get_mut(&mut self, id: PointId) -> Option<&mut Point> {
        self.points.get_mut(id).map(|entry| &mut entry.point)
    }

    /// The name a point was registered under.
    pub fn name(&self, id: PointId) -> Option<&str> {
        self.points.get(id).map(|entry| entry.name.as_str())
    }

    /// Find a point's ID by name.
    pub fn find_by_name(&self, name: &str) -> Option<PointId> {
        self.names.get(name).copied()
    }

    /// Remove a point, returning it.
    pub fn remove(&mut self, id: PointId) -> Option<Point> {
        let entry = self.points.remove(id)?;
        self.names.remove(&entry.name);
        Some(entry.point)
    }

    /// Number of stored points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The stored point nearest to `target` and its distance.
    pub fn nearest_to(&self, target: &Point) -> Option<(PointId, f32)> {
        self.points
            .iter()
            .map(|(id, entry)| (id, entry.point.get_distance(target)))
            .fold(None, |best, candidate| match best {
                Some((_, distance)) if distance <= candidate.1 => best,
                _ => Some(candidate),
            })
    }

    /// Advance every stored point by its velocity.
    pub fn update_all(&mut self, delta: f32) {
        for entry in self.points.values_mut() {
            entry.point.update(delta);
        }
    }

    /// Iterate over `(id, name, point)` triples.
    pub fn iter(&self) -> impl Iterator<Item = (PointId, &str, &Point)> {
        self.points
            .iter()
            .map(|(id, entry)| (id, entry.name.as_str(), &entry.point))
    }
}
