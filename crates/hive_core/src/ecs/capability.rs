// capability.rs - Capability sets and live component views
//
// A capability set is a tuple of kind markers, e.g. `(Position, Mode)`. It
// decides two things at once: which entities a behavior matches (the runtime
// `KindSet`) and what the behavior's effect receives (the `View`, one `Slot`
// per declared kind). The effect's context reaches other entities only
// through `Others`, which hides the entity being run, so the view is the
// effect's one path to its own components.

use crate::ecs::{Kind, KindSet, Schema};
use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::rc::Rc;

/// Shared, live component bag of one entity.
pub(crate) type SharedBag<S> = Rc<RefCell<S>>;

/// Live handle to one component of one entity.
///
/// Slots never hold a borrow between calls: every read sees the value as it
/// is right now, and every write is immediately visible to any other slot,
/// `EntityRef` or query that touches the same entity. An effect may therefore
/// look up (and mutate) other entities, or itself, while holding its view.
pub struct Slot<S, K> {
    bag: SharedBag<S>,
    _kind: PhantomData<fn() -> K>,
}

impl<S: Schema, K: Kind<S>> Slot<S, K> {
    pub(crate) fn new(bag: &SharedBag<S>) -> Option<Self> {
        K::field(&bag.borrow())?;
        Some(Self {
            bag: Rc::clone(bag),
            _kind: PhantomData,
        })
    }

    /// Current value (cloned out).
    pub fn get(&self) -> K::Value {
        self.read(Clone::clone)
    }

    /// Borrow the current value for the duration of `f`.
    ///
    /// `f` must not write to the same entity.
    pub fn read<R>(&self, f: impl FnOnce(&K::Value) -> R) -> R {
        let bag = self.bag.borrow();
        match K::field(&bag) {
            Some(value) => f(value),
            None => vanished::<S, K>(),
        }
    }

    /// Overwrite the value.
    pub fn set(&self, value: K::Value) {
        self.replace(value);
    }

    /// Overwrite the value, returning the previous one.
    pub fn replace(&self, value: K::Value) -> K::Value {
        let mut bag = self.bag.borrow_mut();
        match K::field_mut(&mut bag) {
            Some(slot) => mem::replace(slot, value),
            None => vanished::<S, K>(),
        }
    }

    /// Read-modify-write. The bag is not borrowed while `f` runs.
    pub fn update<R>(&self, f: impl FnOnce(&mut K::Value) -> R) -> R {
        let mut value = self.get();
        let out = f(&mut value);
        self.set(value);
        out
    }

    /// Field name of the kind behind this slot.
    pub fn name(&self) -> &'static str {
        K::NAME
    }
}

impl<S, K> Clone for Slot<S, K> {
    fn clone(&self) -> Self {
        Self {
            bag: Rc::clone(&self.bag),
            _kind: PhantomData,
        }
    }
}

impl<S: Schema, K: Kind<S>> fmt::Debug for Slot<S, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.read(|value| f.debug_tuple("Slot").field(&K::NAME).field(value).finish())
    }
}

// Components are only ever attached when an entity is added, and the store
// hands out no way to clear a field, so a slot created over a present kind
// keeps pointing at a present kind.
#[cold]
fn vanished<S: Schema, K: Kind<S>>() -> ! {
    unreachable!("component `{}` vanished from a live entity", K::NAME)
}

/// A set of component kinds that a behavior or query requires.
///
/// Implemented for `()` (matches everything) and tuples of up to eight kinds.
pub trait Capability<S: Schema>: 'static {
    /// What an effect receives for one matching entity.
    type View;

    /// Runtime selector; duplicate kinds collapse.
    fn kinds() -> KindSet;

    #[doc(hidden)]
    fn view(bag: &Rc<RefCell<S>>) -> Option<Self::View>;
}

impl<S: Schema> Capability<S> for () {
    type View = ();

    fn kinds() -> KindSet {
        KindSet::EMPTY
    }

    fn view(_bag: &SharedBag<S>) -> Option<Self::View> {
        Some(())
    }
}

macro_rules! impl_capability {
    ($($kind:ident),+) => {
        impl<S: Schema, $($kind: Kind<S>),+> Capability<S> for ($($kind,)+) {
            type View = ($(Slot<S, $kind>,)+);

            fn kinds() -> KindSet {
                let mut kinds = KindSet::EMPTY;
                $(kinds.insert(<$kind as Kind<S>>::INDEX);)+
                kinds
            }

            fn view(bag: &SharedBag<S>) -> Option<Self::View> {
                Some(($(Slot::<S, $kind>::new(bag)?,)+))
            }
        }
    };
}

impl_capability!(K1);
impl_capability!(K1, K2);
impl_capability!(K1, K2, K3);
impl_capability!(K1, K2, K3, K4);
impl_capability!(K1, K2, K3, K4, K5);
impl_capability!(K1, K2, K3, K4, K5, K6);
impl_capability!(K1, K2, K3, K4, K5, K6, K7);
impl_capability!(K1, K2, K3, K4, K5, K6, K7, K8);
