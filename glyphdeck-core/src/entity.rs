//! Overlay entities: positioned glyph sprites painted on top of a surface.
//!
//! The `EntityLayer` owns the collection and a single layer-level dirty
//! flag. The contract around that flag is consume-once: every mutation here
//! sets it, and only the entity render step clears it (after it has
//! repainted the layer's cached texture). Nothing else may reset it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cell::Cell;
use crate::geometry::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

/// Where an entity sits. Grid positions go through the surface's font
/// metrics at paint time; pixel positions are used verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityPosition {
    Grid(Point),
    Pixels(Point),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub position: EntityPosition,
    pub visible: bool,
    pub appearance: Cell,
}

impl Entity {
    pub fn new(position: EntityPosition, appearance: Cell) -> Self {
        Self {
            id: EntityId::new(),
            position,
            visible: true,
            appearance,
        }
    }
}

/// Ordered entity collection with a layer-level dirty flag.
///
/// Insertion order is paint order: later entities paint over earlier ones at
/// overlapping positions.
#[derive(Debug, Default)]
pub struct EntityLayer {
    entities: Vec<Entity>,
    dirty: bool,
}

impl EntityLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entity: Entity) -> EntityId {
        let id = entity.id;
        self.entities.push(entity);
        self.dirty = true;
        id
    }

    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let idx = self.entities.iter().position(|e| e.id == id)?;
        self.dirty = true;
        Some(self.entities.remove(idx))
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Mutable access marks the layer dirty; callers are assumed to mutate.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let e = self.entities.iter_mut().find(|e| e.id == id)?;
        self.dirty = true;
        Some(e)
    }

    pub fn set_visible(&mut self, id: EntityId, visible: bool) {
        if let Some(e) = self.get_mut(id) {
            e.visible = visible;
        }
    }

    /// The currently-visible subset, in insertion (= paint) order.
    pub fn visible_entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| e.visible)
    }

    /// Mutable variant for the render step, which clears per-cell dirty
    /// flags as it paints. Does NOT set the layer dirty flag.
    pub fn visible_entities_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut().filter(|e| e.visible)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Consume the dirty flag. Called by the entity render step after a
    /// repaint batch — the single authoritative reset point.
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }
}
