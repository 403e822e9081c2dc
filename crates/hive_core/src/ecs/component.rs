// component.rs - Component schema and kind markers
//
// A schema is one plain struct whose fields are all optional: an entity's
// "partial bag". Every field gets a zero-sized marker type (its kind) that
// carries the value type, the field name and a stable bit index. Kinds are
// what behaviors declare and what the store matches on.

use std::fmt;

/// Upper bound on kinds per schema (one bit each in a `KindSet`).
pub const MAX_KINDS: usize = 64;

/// Set of component kinds, one bit per kind index.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct KindSet(u64);

impl KindSet {
    /// The empty selector. Every entity matches it.
    pub const EMPTY: Self = Self(0);

    /// Set containing a single kind index.
    #[inline]
    pub const fn single(index: u32) -> Self {
        Self(1 << index)
    }

    #[inline]
    pub fn insert(&mut self, index: u32) {
        debug_assert!((index as usize) < MAX_KINDS, "kind index {index} out of range");
        *self = self.union(Self::single(index));
    }

    #[inline]
    pub const fn contains(self, index: u32) -> bool {
        self.is_superset_of(Self::single(index))
    }

    /// Whether every kind in `selector` is also in `self`.
    #[inline]
    pub const fn is_superset_of(self, selector: KindSet) -> bool {
        self.0 & selector.0 == selector.0
    }

    #[inline]
    pub const fn union(self, other: KindSet) -> Self {
        Self(self.0 | other.0)
    }

    #[inline]
    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Kind indices in ascending order.
    pub fn indices(self) -> impl Iterator<Item = u32> {
        (0..MAX_KINDS as u32).filter(move |&index| self.contains(index))
    }

    /// Field names of the kinds in this set, in schema order.
    pub fn names<S: Schema>(self) -> Vec<&'static str> {
        self.indices()
            .filter_map(|index| S::KINDS.get(index as usize).copied())
            .collect()
    }
}

impl fmt::Debug for KindSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.indices()).finish()
    }
}

/// A partial component bag: the full schema with every field optional.
///
/// Implemented by the `schema!` macro, never by hand.
pub trait Schema: Clone + fmt::Debug + 'static {
    /// Field names in declaration order; the position is the kind index.
    const KINDS: &'static [&'static str];

    /// Kinds present in this bag.
    fn kinds(&self) -> KindSet;
}

/// One named, typed slot of schema `S`.
///
/// Marker types implementing this are generated by `schema!`; they are
/// uninhabited and only ever used at the type level.
pub trait Kind<S: Schema>: 'static {
    type Value: Clone + fmt::Debug + 'static;

    /// Field name in the schema.
    const NAME: &'static str;

    /// Bit index in a `KindSet`.
    const INDEX: u32;

    fn field(bag: &S) -> Option<&Self::Value>;

    fn field_mut(bag: &mut S) -> Option<&mut Self::Value>;
}

/// Declare a component schema.
///
/// Generates the partial-bag struct (all fields `Option`), a module of kind
/// markers and the `Schema`/`Kind` impls tying them together. Extra attributes
/// on the struct are forwarded, so serde derives can be layered on.
///
/// # Example
/// ```
/// use hive_core::schema;
///
/// #[derive(Clone, Copy, Debug, PartialEq)]
/// pub enum Mode { Idle, Busy }
///
/// schema! {
///     /// Per-entity state.
///     pub struct State in kind {
///         health: Health => f32,
///         mode: Mode => Mode,
///     }
/// }
///
/// let bag = State { health: Some(3.0), ..Default::default() };
/// assert_eq!(hive_core::ecs::Schema::kinds(&bag).len(), 1);
/// ```
#[macro_export]
macro_rules! schema {
    (
        $(#[$meta:meta])*
        $vis:vis struct $schema:ident in $module:ident {
            $($field:ident : $kind:ident => $ty:ty),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        $vis struct $schema {
            $(pub $field: ::core::option::Option<$ty>,)+
        }

        #[doc = concat!("Component kinds of [`", stringify!($schema), "`].")]
        $vis mod $module {
            $(
                #[doc = concat!("The `", stringify!($field), "` component.")]
                #[derive(Debug)]
                pub enum $kind {}
            )+
        }

        impl $crate::ecs::Schema for $schema {
            const KINDS: &'static [&'static str] = &[$(stringify!($field)),+];

            fn kinds(&self) -> $crate::ecs::KindSet {
                let mut kinds = $crate::ecs::KindSet::EMPTY;
                $(
                    if self.$field.is_some() {
                        kinds.insert(<$module::$kind as $crate::ecs::Kind<$schema>>::INDEX);
                    }
                )+
                kinds
            }
        }

        const _: () = assert!(
            <$schema as $crate::ecs::Schema>::KINDS.len() <= $crate::ecs::MAX_KINDS,
            "schema declares more kinds than a KindSet can hold"
        );

        $crate::__schema_kinds!($schema, $module, 0; $($field : $kind => $ty),+);
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __schema_kinds {
    ($schema:ident, $module:ident, $index:expr;) => {};
    ($schema:ident, $module:ident, $index:expr; $field:ident : $kind:ident => $ty:ty $(, $($rest:tt)*)?) => {
        impl $crate::ecs::Kind<$schema> for $module::$kind {
            type Value = $ty;
            const NAME: &'static str = stringify!($field);
            const INDEX: u32 = $index;

            #[inline]
            fn field(bag: &$schema) -> ::core::option::Option<&$ty> {
                bag.$field.as_ref()
            }

            #[inline]
            fn field_mut(bag: &mut $schema) -> ::core::option::Option<&mut $ty> {
                bag.$field.as_mut()
            }
        }

        $crate::__schema_kinds!($schema, $module, $index + 1; $($($rest)*)?);
    };
}
