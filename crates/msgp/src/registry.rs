//! Bijective mapping between wire type ids and Rust types.

use std::any::{Any, TypeId};

use dashmap::mapref::entry::Entry as MapEntry;
use dashmap::DashMap;
use tracing::{debug, error};

use crate::{Error, Message};

/// Reserved id meaning "no value".
pub const NIL_TYPE_ID: u16 = 0;

type Factory = fn() -> Box<dyn Message>;

#[derive(Clone, Copy)]
struct Entry {
    type_id: TypeId,
    name: &'static str,
    factory: Factory,
}

fn make<T: Message + Default>() -> Box<dyn Message> {
    Box::new(T::default())
}

/// Maps type ids to factories and concrete types back to ids.
///
/// Both directions stay consistent: an id names at most one type and a type
/// owns at most one id. Registration may race with lookups from any thread.
#[derive(Default)]
pub struct Registry {
    by_id: DashMap<u16, Entry>,
    by_type: DashMap<TypeId, u16>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associates `id` with `T`.
    ///
    /// Registering the same pair again is a no-op.
    ///
    /// # Panics
    ///
    /// Panics if `id` is [`NIL_TYPE_ID`], if `id` already names another type,
    /// or if `T` already owns another id. A failing call never publishes
    /// anything, so concurrent lookups cannot observe the rejected pairing.
    pub fn register<T: Message + Default>(&self, id: u16) {
        let name = std::any::type_name::<T>();
        if id == NIL_TYPE_ID {
            error!(type_name = name, "attempt to register the nil type id");
            panic!("msgp: cannot register {name} under reserved type id 0");
        }
        let entry = Entry {
            type_id: TypeId::of::<T>(),
            name,
            factory: make::<T>,
        };

        // Lock order: `by_type`, then `by_id`. The type slot stays locked until
        // the id is claimed.
        let by_type = self.by_type.entry(entry.type_id);
        let owner = match &by_type {
            MapEntry::Occupied(o) => Some(*o.get()),
            MapEntry::Vacant(_) => None,
        };
        if let Some(owner) = owner.filter(|&owner| owner != id) {
            drop(by_type);
            error!(id, owner, type_name = name, "type registered under two ids");
            panic!("msgp: {name} is already registered as type id {owner}, cannot register it as {id}");
        }

        let inserted = match self.by_id.entry(id) {
            MapEntry::Occupied(o) => {
                let existing = o.get().name;
                if o.get().type_id != entry.type_id {
                    drop(o);
                    drop(by_type);
                    error!(id, existing, type_name = name, "duplicate type id");
                    panic!("msgp: type id {id} is already registered to {existing}, cannot register {name}");
                }
                false
            }
            MapEntry::Vacant(v) => {
                v.insert(entry);
                true
            }
        };
        if let MapEntry::Vacant(v) = by_type {
            v.insert(id);
        }

        if inserted {
            debug!(id, type_name = name, "registered message type");
        }
    }

    /// Builds a default instance of the type registered under `id`.
    pub fn resolve(&self, id: u16) -> Result<Box<dyn Message>, Error> {
        let factory = self
            .by_id
            .get(&id)
            .map(|e| e.factory)
            .ok_or(Error::UnknownTypeId(id))?;
        Ok(factory())
    }

    /// Returns the id registered for the concrete type of `value`.
    pub fn identify(&self, value: &dyn Message) -> Result<u16, Error> {
        let any: &dyn Any = value;
        self.by_type
            .get(&any.type_id())
            .map(|id| *id)
            .ok_or_else(|| Error::UnregisteredType(value.type_name()))
    }

    pub fn id_of<T: Message>(&self) -> Option<u16> {
        self.by_type.get(&TypeId::of::<T>()).map(|id| *id)
    }

    /// Name of the type registered under `id`.
    pub fn type_name(&self, id: u16) -> Option<&'static str> {
        self.by_id.get(&id).map(|e| e.name)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{catch_unwind, AssertUnwindSafe};

    use super::*;
    use crate::{Decoder, Encoder};

    macro_rules! unit_message {
        ($name:ident) => {
            #[derive(Debug, Default)]
            struct $name;

            impl Message for $name {
                fn marshal_msg(&self, en: &mut Encoder) -> Result<(), Error> {
                    en.write_nil();
                    Ok(())
                }

                fn unmarshal_msg<'b>(&mut self, bts: &'b [u8]) -> Result<&'b [u8], Error> {
                    let mut dc = Decoder::new(bts);
                    dc.read_nil()?;
                    Ok(dc.remaining())
                }

                fn msg_size(&self) -> usize {
                    1
                }
            }
        };
    }

    unit_message!(Alpha);
    unit_message!(Beta);

    #[test]
    fn test_register_and_lookup() {
        let reg = Registry::new();
        reg.register::<Alpha>(1);
        reg.register::<Alpha>(1);
        reg.register::<Beta>(2);
        assert_eq!(reg.len(), 2);
        assert!(reg.resolve(1).unwrap().is::<Alpha>());
        assert_eq!(reg.identify(&Beta).unwrap(), 2);
        assert_eq!(reg.id_of::<Alpha>(), Some(1));
        assert!(reg.type_name(2).unwrap().ends_with("Beta"));
        assert!(matches!(reg.resolve(3), Err(Error::UnknownTypeId(3))));
    }

    #[test]
    fn test_unregistered_type() {
        let reg = Registry::new();
        assert!(matches!(reg.identify(&Alpha), Err(Error::UnregisteredType(_))));
    }

    #[test]
    fn test_type_conflict_leaves_state() {
        let reg = Registry::new();
        reg.register::<Alpha>(1);
        let result = catch_unwind(AssertUnwindSafe(|| reg.register::<Alpha>(2)));
        assert!(result.is_err());
        assert!(matches!(reg.resolve(2), Err(Error::UnknownTypeId(2))));
        assert_eq!(reg.id_of::<Alpha>(), Some(1));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_first_map_conflict_leaves_state() {
        let reg = Registry::new();
        reg.register::<Alpha>(1);
        let result = catch_unwind(AssertUnwindSafe(|| reg.register::<Beta>(1)));
        assert!(result.is_err());
        assert_eq!(reg.id_of::<Beta>(), None);
        assert!(reg.resolve(1).unwrap().is::<Alpha>());
    }

    #[test]
    fn test_rejected_pairing_is_never_visible() {
        let reg = Registry::new();
        reg.register::<Alpha>(1);
        std::thread::scope(|s| {
            s.spawn(|| {
                for _ in 0..200 {
                    let result = catch_unwind(AssertUnwindSafe(|| reg.register::<Alpha>(2)));
                    assert!(result.is_err());
                }
            });
            s.spawn(|| {
                for _ in 0..2_000 {
                    assert!(matches!(reg.resolve(2), Err(Error::UnknownTypeId(2))));
                    assert_eq!(reg.id_of::<Alpha>(), Some(1));
                }
            });
        });
        assert_eq!(reg.len(), 1);
    }

    #[test]
    #[should_panic(expected = "reserved type id 0")]
    fn test_nil_id_panics() {
        Registry::new().register::<Alpha>(NIL_TYPE_ID);
    }
}
