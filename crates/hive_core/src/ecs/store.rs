// store.rs - Entity store: id -> partial component bag
//
// Ids are dense and only grow, so the store is a Vec of slots indexed by the
// raw id. A removed entity leaves a hole that is never refilled; slot order is
// insertion order and doubles as the iteration order of every scan. Each
// entry keeps the kind bitset computed when it was added; matching a
// selector is one AND + compare.
//
// The store is used through `&self` everywhere. Queries are cursors over the
// live slots rather than snapshots: each step re-borrows the Vec, so effects
// may add, remove and mutate entities while a query is being walked.

use crate::ecs::capability::SharedBag;
use crate::ecs::{Capability, EntityId, Kind, KindSet, Schema, Slot};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;
use thiserror::Error;

/// Errors reported by entity store operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EntityStoreError {
    #[error("entity {id} does not exist")]
    NotFound { id: EntityId },
}

struct Record<S> {
    kinds: KindSet,
    bag: SharedBag<S>,
}

impl<S> Clone for Record<S> {
    fn clone(&self) -> Self {
        Self {
            kinds: self.kinds,
            bag: Rc::clone(&self.bag),
        }
    }
}

/// Holds every entity of a simulation and its partial component bag.
pub struct EntityStore<S: Schema> {
    slots: RefCell<Vec<Option<Record<S>>>>,
    live: Cell<usize>,
}

impl<S: Schema> EntityStore<S> {
    /// Create an empty store. The first id handed out is 0.
    pub fn new() -> Self {
        Self {
            slots: RefCell::new(Vec::new()),
            live: Cell::new(0),
        }
    }

    /// Insert a new entity holding `bag` and return its fresh id. O(1)
    /// amortized.
    pub fn add(&self, bag: S) -> EntityId {
        let kinds = bag.kinds();
        let record = Record {
            kinds,
            bag: Rc::new(RefCell::new(bag)),
        };

        let mut slots = self.slots.borrow_mut();
        let id = EntityId::from_raw(slots.len() as u64);
        slots.push(Some(record));
        drop(slots);
        self.live.set(self.live.get() + 1);

        tracing::trace!(%id, components = ?kinds.names::<S>(), "entity added");
        id
    }

    /// Delete an entity, returning its final bag.
    ///
    /// Views of the entity that are still held keep working but are no
    /// longer reachable from the store.
    pub fn remove(&self, id: EntityId) -> Result<S, EntityStoreError> {
        let record = self
            .slots
            .borrow_mut()
            .get_mut(index(id))
            .and_then(Option::take)
            .ok_or(EntityStoreError::NotFound { id })?;
        self.live.set(self.live.get() - 1);
        tracing::trace!(%id, "entity removed");
        let bag = record.bag.borrow().clone();
        Ok(bag)
    }

    /// Point lookup.
    pub fn get(&self, id: EntityId) -> Option<EntityRef<S>> {
        self.slots
            .borrow()
            .get(index(id))
            .and_then(Option::as_ref)
            .map(|record| EntityRef::new(id, record.clone()))
    }

    pub fn contains(&self, id: EntityId) -> bool {
        matches!(self.slots.borrow().get(index(id)), Some(Some(_)))
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.live.get()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids of live entities in insertion order.
    pub fn ids(&self) -> Vec<EntityId> {
        self.records().into_iter().map(|(id, _)| id).collect()
    }

    /// Lazily yield `(id, view)` for every entity holding all kinds of `C`,
    /// in insertion order.
    pub fn query<C: Capability<S>>(&self) -> Query<'_, S, C> {
        Query {
            cursor: Cursor::new(self, C::kinds()),
            _capability: PhantomData,
        }
    }

    /// Lazily yield every entity in insertion order.
    pub fn all(&self) -> Entities<'_, S> {
        Entities {
            cursor: Cursor::new(self, KindSet::EMPTY),
        }
    }

    /// Clone out every `(id, bag)` pair.
    pub fn snapshot(&self) -> Vec<(EntityId, S)> {
        self.records()
            .into_iter()
            .map(|(id, record)| (id, record.bag.borrow().clone()))
            .collect()
    }

    /// First entity after `after` (or from the start) whose kinds cover
    /// `selector`. The slots are borrowed only for the duration of the call.
    pub(crate) fn next_matching(
        &self,
        after: Option<EntityId>,
        selector: KindSet,
    ) -> Option<(EntityId, KindSet, SharedBag<S>)> {
        let start = after.map_or(0, |id| index(id) + 1);
        let slots = self.slots.borrow();
        slots
            .iter()
            .enumerate()
            .skip(start)
            .find_map(|(raw, slot)| match slot {
                Some(record) if record.kinds.is_superset_of(selector) => Some((
                    EntityId::from_raw(raw as u64),
                    record.kinds,
                    Rc::clone(&record.bag),
                )),
                _ => None,
            })
    }

    fn records(&self) -> Vec<(EntityId, Record<S>)> {
        self.slots
            .borrow()
            .iter()
            .enumerate()
            .filter_map(|(raw, slot)| {
                slot.as_ref()
                    .map(|record| (EntityId::from_raw(raw as u64), record.clone()))
            })
            .collect()
    }
}

fn index(id: EntityId) -> usize {
    id.raw() as usize
}

impl<S: Schema> Default for EntityStore<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Schema> fmt::Debug for EntityStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityStore")
            .field("len", &self.len())
            .field("next_id", &self.slots.borrow().len())
            .finish()
    }
}

/// Live handle to one entity, as returned by `get` and `all`.
pub struct EntityRef<S> {
    id: EntityId,
    kinds: KindSet,
    bag: SharedBag<S>,
}

impl<S: Schema> EntityRef<S> {
    fn new(id: EntityId, record: Record<S>) -> Self {
        Self {
            id,
            kinds: record.kinds,
            bag: record.bag,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Kinds present on this entity.
    pub fn kinds(&self) -> KindSet {
        self.kinds
    }

    pub fn has<K: Kind<S>>(&self) -> bool {
        self.kinds.contains(K::INDEX)
    }

    /// Current value of one component, if present.
    pub fn get<K: Kind<S>>(&self) -> Option<K::Value> {
        K::field(&self.bag.borrow()).cloned()
    }

    /// Live slot for one component, if present.
    pub fn slot<K: Kind<S>>(&self) -> Option<Slot<S, K>> {
        Slot::new(&self.bag)
    }

    /// Live view over a capability set, if every kind is present.
    pub fn view<C: Capability<S>>(&self) -> Option<C::View> {
        C::view(&self.bag)
    }

    /// Clone of the full partial bag as it is right now.
    pub fn snapshot(&self) -> S {
        self.bag.borrow().clone()
    }
}

impl<S> Clone for EntityRef<S> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            kinds: self.kinds,
            bag: Rc::clone(&self.bag),
        }
    }
}

impl<S: Schema> fmt::Debug for EntityRef<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityRef")
            .field("id", &self.id)
            .field("bag", &*self.bag.borrow())
            .finish()
    }
}

struct Cursor<'s, S: Schema> {
    store: &'s EntityStore<S>,
    selector: KindSet,
    after: Option<EntityId>,
}

impl<'s, S: Schema> Cursor<'s, S> {
    fn new(store: &'s EntityStore<S>, selector: KindSet) -> Self {
        Self {
            store,
            selector,
            after: None,
        }
    }

    fn advance(&mut self) -> Option<(EntityId, KindSet, SharedBag<S>)> {
        let hit = self.store.next_matching(self.after, self.selector)?;
        self.after = Some(hit.0);
        Some(hit)
    }
}

/// Iterator returned by [`EntityStore::query`].
pub struct Query<'s, S: Schema, C> {
    cursor: Cursor<'s, S>,
    _capability: PhantomData<fn() -> C>,
}

impl<S: Schema, C: Capability<S>> Iterator for Query<'_, S, C> {
    type Item = (EntityId, C::View);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (id, _, bag) = self.cursor.advance()?;
            if let Some(view) = C::view(&bag) {
                return Some((id, view));
            }
        }
    }
}

/// Iterator returned by [`EntityStore::all`].
pub struct Entities<'s, S: Schema> {
    cursor: Cursor<'s, S>,
}

impl<S: Schema> Iterator for Entities<'_, S> {
    type Item = (EntityId, EntityRef<S>);

    fn next(&mut self) -> Option<Self::Item> {
        let (id, kinds, bag) = self.cursor.advance()?;
        Some((id, EntityRef { id, kinds, bag }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::test_schema::{kind, Bag};
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    fn bag(health: Option<f32>, position: Option<(i32, i32)>, tag: Option<&str>) -> Bag {
        Bag {
            health,
            position,
            tag: tag.map(str::to_string),
        }
    }

    #[test]
    fn ids_start_at_zero_and_are_never_reused() {
        let store = EntityStore::<Bag>::new();
        let a = store.add(Bag::default());
        let b = store.add(Bag::default());
        assert_eq!(a.raw(), 0);
        assert_eq!(b.raw(), 1);

        store.remove(b).unwrap();
        let c = store.add(Bag::default());
        assert!(c > b);
        assert_eq!(c.raw(), 2);
    }

    #[test]
    fn removed_entities_disappear() {
        let store = EntityStore::<Bag>::new();
        let a = store.add(bag(Some(1.0), None, None));
        let b = store.add(bag(Some(2.0), None, None));

        let removed = store.remove(a).unwrap();
        assert_eq!(removed.health, Some(1.0));
        assert!(store.get(a).is_none());
        assert!(!store.contains(a));
        assert_eq!(
            store.query::<(kind::Health,)>().map(|(id, _)| id).collect::<Vec<_>>(),
            vec![b]
        );
        assert_eq!(store.remove(a), Err(EntityStoreError::NotFound { id: a }));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn query_matches_presence_in_insertion_order() {
        let store = EntityStore::<Bag>::new();
        let dead = store.add(bag(Some(0.0), Some((0, 0)), None));
        let _no_health = store.add(bag(None, Some((1, 1)), None));
        let tagged = store.add(bag(Some(4.0), Some((2, 2)), Some("x")));

        let ids: Vec<_> = store
            .query::<(kind::Health, kind::Position)>()
            .map(|(id, _)| id)
            .collect();
        assert_eq!(ids, vec![dead, tagged]);
    }

    #[test]
    fn empty_selector_matches_empty_bags() {
        let store = EntityStore::<Bag>::new();
        let empty = store.add(Bag::default());
        let full = store.add(bag(Some(1.0), Some((0, 0)), Some("t")));
        let ids: Vec<_> = store.query::<()>().map(|(id, ())| id).collect();
        assert_eq!(ids, vec![empty, full]);
        assert_eq!(store.all().count(), 2);
    }

    #[test]
    fn query_sees_mutations_made_while_iterating() {
        let store = EntityStore::<Bag>::new();
        let first = store.add(bag(Some(10.0), None, None));
        let second = store.add(bag(Some(10.0), None, None));

        let mut seen = Vec::new();
        for (id, (health,)) in store.query::<(kind::Health,)>() {
            seen.push((id, health.get()));
            if id == first {
                // Damage the entity the query has not reached yet.
                let other = store.get(second).unwrap();
                other.slot::<kind::Health>().unwrap().update(|h| *h -= 3.0);
                // And add one it will reach.
                store.add(bag(Some(1.0), None, None));
            }
        }
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[1], (second, 7.0));
    }

    #[test]
    fn removal_during_query_skips_the_removed_entity() {
        let store = EntityStore::<Bag>::new();
        let a = store.add(bag(Some(1.0), None, None));
        let b = store.add(bag(Some(1.0), None, None));
        let c = store.add(bag(Some(1.0), None, None));

        let mut seen = Vec::new();
        for (id, _) in store.query::<(kind::Health,)>() {
            seen.push(id);
            if id == a {
                store.remove(b).unwrap();
            }
        }
        assert_eq!(seen, vec![a, c]);
    }

    #[test]
    fn view_writes_are_visible_through_get() {
        let store = EntityStore::<Bag>::new();
        let id = store.add(bag(Some(5.0), Some((1, 2)), None));
        for (_, (position,)) in store.query::<(kind::Position,)>() {
            position.set((9, 9));
        }
        let entity = store.get(id).unwrap();
        assert_eq!(entity.get::<kind::Position>(), Some((9, 9)));
        assert!(entity.has::<kind::Health>());
        assert!(!entity.has::<kind::Tag>());
        assert_eq!(entity.snapshot().position, Some((9, 9)));
        assert_eq!(store.snapshot(), vec![(id, entity.snapshot())]);
    }

    /// Ids `query::<C>()` yields next to the ids whose bag holds every kind
    /// flagged in `want` (health, position, tag).
    fn compare<C: Capability<Bag>>(
        store: &EntityStore<Bag>,
        added: &[(EntityId, Bag)],
        want: [bool; 3],
    ) -> (Vec<EntityId>, Vec<EntityId>) {
        let queried = store.query::<C>().map(|(id, _)| id).collect();
        let expected = added
            .iter()
            .filter(|(_, b)| {
                (!want[0] || b.health.is_some())
                    && (!want[1] || b.position.is_some())
                    && (!want[2] || b.tag.is_some())
            })
            .map(|(id, _)| *id)
            .collect();
        (queried, expected)
    }

    #[test]
    fn query_is_exactly_the_superset_relation() {
        use kind::{Health as H, Position as P, Tag as T};

        let mut rng = SmallRng::seed_from_u64(0x5eed);
        for _ in 0..200 {
            let store = EntityStore::<Bag>::new();
            let mut added = Vec::new();
            for _ in 0..rng.gen_range(0..12) {
                let entity = bag(
                    rng.gen_bool(0.5).then(|| rng.gen_range(0..3) as f32),
                    rng.gen_bool(0.5).then_some((0, 0)),
                    rng.gen_bool(0.5).then_some("t"),
                );
                added.push((store.add(entity.clone()), entity));
            }
            // Remove a few so holes are part of every scan.
            for (id, _) in added.iter().filter(|_| rng.gen_bool(0.2)) {
                store.remove(*id).unwrap();
            }
            added.retain(|(id, _)| store.contains(*id));

            let results = [
                compare::<()>(&store, &added, [false, false, false]),
                compare::<(H,)>(&store, &added, [true, false, false]),
                compare::<(P,)>(&store, &added, [false, true, false]),
                compare::<(T,)>(&store, &added, [false, false, true]),
                compare::<(H, P)>(&store, &added, [true, true, false]),
                compare::<(H, T)>(&store, &added, [true, false, true]),
                compare::<(P, T)>(&store, &added, [false, true, true]),
                compare::<(T, P, H)>(&store, &added, [true, true, true]),
            ];
            for (queried, expected) in results {
                assert_eq!(queried, expected);
            }
        }
    }
}
