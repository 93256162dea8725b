//! Opaque list items identified by runtime type.

use std::any::{Any, TypeId};
use std::fmt;
use std::rc::Rc;

/// Runtime identity of an item type.
///
/// Pairs the compiler-issued `TypeId` (used for lookups) with the type name
/// (used only for diagnostics).
#[derive(Debug, Clone, Copy)]
pub struct ItemType {
    id: TypeId,
    name: &'static str,
}

impl ItemType {
    /// The item type of `T`.
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for ItemType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ItemType {}

impl std::hash::Hash for ItemType {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A type-erased, reference-counted list item.
///
/// Cloning is cheap and shares the payload, so a render slot can keep the
/// last bound item alive without copying it. The payload's type is fixed at
/// construction.
///
/// ```
/// use motley_list::AnyItem;
///
/// #[derive(Debug, PartialEq)]
/// struct Note(&'static str);
///
/// let item = AnyItem::new(Note("a"));
/// assert!(item.is::<Note>());
/// assert_eq!(item.downcast_ref::<Note>(), Some(&Note("a")));
/// assert!(item.downcast_ref::<String>().is_none());
/// ```
#[derive(Clone)]
pub struct AnyItem {
    value: Rc<dyn Any>,
    item_type: ItemType,
}

impl AnyItem {
    /// Wrap a payload.
    pub fn new<T: 'static>(value: T) -> Self {
        Self::from_rc(Rc::new(value))
    }

    /// Wrap an already shared payload without cloning it.
    pub fn from_rc<T: 'static>(value: Rc<T>) -> Self {
        Self {
            value,
            item_type: ItemType::of::<T>(),
        }
    }

    pub fn item_type(&self) -> ItemType {
        self.item_type
    }

    pub fn type_id(&self) -> TypeId {
        self.item_type.id()
    }

    pub fn type_name(&self) -> &'static str {
        self.item_type.name()
    }

    pub fn is<T: 'static>(&self) -> bool {
        self.item_type.id() == TypeId::of::<T>()
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Shared handle to the payload if it is a `T`.
    pub fn downcast_rc<T: 'static>(&self) -> Option<Rc<T>> {
        Rc::clone(&self.value).downcast::<T>().ok()
    }

    /// Whether both handles point at the same payload.
    pub fn ptr_eq(&self, other: &AnyItem) -> bool {
        Rc::ptr_eq(&self.value, &other.value)
    }
}

impl fmt::Debug for AnyItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyItem")
            .field("type", &self.item_type.name())
            .finish_non_exhaustive()
    }
}

/// Wrap each payload of a homogeneous collection.
///
/// Heterogeneous lists are usually built with [`AnyItem::new`] per element;
/// this is a shorthand for the single-type case.
pub fn items<T, I>(values: I) -> Vec<AnyItem>
where
    T: 'static,
    I: IntoIterator<Item = T>,
{
    values.into_iter().map(AnyItem::new).collect()
}
