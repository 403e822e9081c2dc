// behavior.rs - Behavior declaration DSL
//
// Three steps, each its own type so a step cannot be skipped:
//
//     declare.behavior("acquire target")        -> BehaviorBuilder
//         .requires::<(Position, Mode)>()       -> GatedBehavior
//         .effect(|cx, (position, mode), id| …) -> Behavior
//
// The capability tuple fixes the effect's view type at compile time and the
// matching `KindSet` at runtime. After `effect`, the capability type is
// erased so behaviors of one system can share a Vec.

use crate::ecs::capability::SharedBag;
use crate::ecs::{
    Capability, EntityId, EntityRef, EntityStore, EntityStoreError, KindSet, Schema,
};
use std::fmt;
use std::marker::PhantomData;

/// What an effect sees besides its own view.
pub struct SystemContext<'a, S: Schema, X> {
    /// Every entity except the one the effect is running on.
    pub others: Others<'a, S>,
    /// The system's private state, shared by all of its behaviors.
    pub local: &'a mut X,
    /// Index of the tick being run (the first tick is 0).
    pub tick: u64,
}

/// The entity store as seen from inside an effect.
///
/// The entity being run is hidden: its components are reachable only
/// through the effect's declared view.
pub struct Others<'a, S: Schema> {
    store: &'a EntityStore<S>,
    current: EntityId,
}

impl<'a, S: Schema> Others<'a, S> {
    pub(crate) fn new(store: &'a EntityStore<S>, current: EntityId) -> Self {
        Self { store, current }
    }

    /// The entity the effect is running on.
    pub fn current(&self) -> EntityId {
        self.current
    }

    /// Look up another entity. `None` for the current one.
    pub fn get(&self, id: EntityId) -> Option<EntityRef<S>> {
        if id == self.current {
            return None;
        }
        self.store.get(id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        id != self.current && self.store.contains(id)
    }

    /// Every other entity, in insertion order.
    pub fn all(&self) -> impl Iterator<Item = (EntityId, EntityRef<S>)> + 'a {
        let current = self.current;
        self.store.all().filter(move |(id, _)| *id != current)
    }

    /// Every other entity holding all kinds of `C`, in insertion order.
    pub fn query<C: Capability<S>>(&self) -> impl Iterator<Item = (EntityId, C::View)> + 'a {
        let current = self.current;
        self.store
            .query::<C>()
            .filter(move |(id, _)| *id != current)
    }

    /// Spawn a new entity. Later behaviors of this tick will see it.
    pub fn add(&self, bag: S) -> EntityId {
        self.store.add(bag)
    }

    /// Delete an entity. The current entity may remove itself; its bag is
    /// dropped rather than handed back.
    pub fn remove(&self, id: EntityId) -> Result<(), EntityStoreError> {
        self.store.remove(id).map(drop)
    }
}

impl<S: Schema> Clone for Others<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: Schema> Copy for Others<'_, S> {}

type Invoke<S, X> = Box<dyn Fn(&mut SystemContext<'_, S, X>, EntityId, &SharedBag<S>) -> bool>;

fn erase<S, X, F>(invoke: F) -> Invoke<S, X>
where
    S: Schema,
    X: 'static,
    F: Fn(&mut SystemContext<'_, S, X>, EntityId, &SharedBag<S>) -> bool + 'static,
{
    Box::new(invoke)
}

/// A named effect gated by a capability set.
pub struct Behavior<S: Schema, X = ()> {
    name: String,
    kinds: KindSet,
    invoke: Invoke<S, X>,
}

impl<S: Schema, X: 'static> Behavior<S, X> {
    /// Start declaring a behavior. Factories usually go through
    /// [`Declare::behavior`] instead.
    pub fn named(name: impl Into<String>) -> BehaviorBuilder<S, X> {
        BehaviorBuilder {
            name: name.into(),
            _marker: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Kinds an entity must hold to be visited.
    pub fn kinds(&self) -> KindSet {
        self.kinds
    }

    /// Field names of the capability set, in schema order.
    pub fn components(&self) -> Vec<&'static str> {
        self.kinds.names::<S>()
    }

    /// Run the effect for one entity. Returns false if the entity no longer
    /// holds the capability set.
    pub(crate) fn invoke(
        &self,
        cx: &mut SystemContext<'_, S, X>,
        id: EntityId,
        bag: &SharedBag<S>,
    ) -> bool {
        (self.invoke)(cx, id, bag)
    }
}

impl<S: Schema, X> fmt::Debug for Behavior<S, X> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Behavior")
            .field("name", &self.name)
            .field("components", &self.kinds.names::<S>())
            .finish()
    }
}

/// Behavior with a name and nothing else yet.
pub struct BehaviorBuilder<S, X> {
    name: String,
    _marker: PhantomData<fn() -> (S, X)>,
}

impl<S: Schema, X: 'static> BehaviorBuilder<S, X> {
    /// Declare the component kinds this behavior reads and writes, as a
    /// tuple of kind markers. `()` runs against every entity.
    pub fn requires<C: Capability<S>>(self) -> GatedBehavior<S, X, C> {
        GatedBehavior {
            name: self.name,
            _marker: PhantomData,
        }
    }
}

/// Behavior with a name and a capability set, waiting for its effect.
pub struct GatedBehavior<S, X, C> {
    name: String,
    _marker: PhantomData<fn() -> (S, X, C)>,
}

impl<S: Schema, X: 'static, C: Capability<S>> GatedBehavior<S, X, C> {
    /// Supply the effect. It runs once per matching entity per tick and
    /// receives the system context, a live view over exactly `C`, and the
    /// entity's id.
    pub fn effect<F>(self, effect: F) -> Behavior<S, X>
    where
        F: Fn(&mut SystemContext<'_, S, X>, C::View, EntityId) + 'static,
    {
        let invoke = erase::<S, X, _>(move |cx, id, bag| match C::view(bag) {
            Some(view) => {
                effect(cx, view, id);
                true
            }
            None => false,
        });

        Behavior {
            name: self.name,
            kinds: C::kinds(),
            invoke,
        }
    }
}

/// Behavior declaration helper handed to system factories.
pub struct Declare<S, X = ()> {
    _marker: PhantomData<fn() -> (S, X)>,
}

impl<S: Schema, X: 'static> Declare<S, X> {
    pub(crate) fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }

    /// Name a new behavior of this system.
    pub fn behavior(&self, name: impl Into<String>) -> BehaviorBuilder<S, X> {
        Behavior::named(name)
    }
}
