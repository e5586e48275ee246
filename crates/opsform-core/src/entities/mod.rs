// ── Builtin entity catalog ──
//
// Field and rule tables for every dialog of the admin console. Each
// submodule exposes `descriptors()` and `rules()`; `builtin_registry()`
// compiles them all.

pub mod access_control;
pub mod account;
pub mod campaign;
pub mod device;
pub mod portal;
pub mod radius;
pub mod site;
pub mod ssid;
pub mod voucher;

use crate::error::SchemaError;
use crate::model::{ConditionalRule, EntityKind, FieldDescriptor};
use crate::registry::SchemaRegistry;

/// Descriptor and rule tables for a builtin entity kind.
pub fn tables(kind: EntityKind) -> (Vec<FieldDescriptor>, Vec<ConditionalRule>) {
    match kind {
        EntityKind::Site => (site::descriptors(), site::rules()),
        EntityKind::Ssid => (ssid::descriptors(), ssid::rules()),
        EntityKind::Device => (device::descriptors(), device::rules()),
        EntityKind::Portal => (portal::descriptors(), portal::rules()),
        EntityKind::Voucher => (voucher::descriptors(), voucher::rules()),
        EntityKind::Campaign => (campaign::descriptors(), campaign::rules()),
        EntityKind::RadiusProfile => (radius::descriptors(), radius::rules()),
        EntityKind::AccessControl => (access_control::descriptors(), access_control::rules()),
        EntityKind::Account => (account::descriptors(), account::rules()),
    }
}

/// Register every builtin entity kind into `registry`.
pub fn register_builtin(registry: &mut SchemaRegistry) -> Result<(), SchemaError> {
    use strum::IntoEnumIterator;

    for kind in EntityKind::iter() {
        let (descriptors, rules) = tables(kind);
        registry.register(kind, descriptors, rules)?;
    }
    Ok(())
}

/// A registry holding the whole builtin catalog.
pub fn builtin_registry() -> Result<SchemaRegistry, SchemaError> {
    let mut registry = SchemaRegistry::new();
    register_builtin(&mut registry)?;
    Ok(registry)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_builtin_table_compiles() {
        let registry = builtin_registry().unwrap();
        assert_eq!(registry.len(), EntityKind::iter().count());
        for kind in EntityKind::iter() {
            assert!(!registry.get(kind).unwrap().is_empty(), "{kind} has no fields");
        }
    }

    #[test]
    fn choice_fields_carry_option_lists() {
        let registry = builtin_registry().unwrap();
        let portal = registry.get(EntityKind::Portal).unwrap();
        let auth = portal.iter().find(|d| d.name == "authType").unwrap();
        assert_eq!(auth.options.len(), 5);
    }
}
