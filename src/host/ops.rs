//! Capsule ops exposed to the host.
//!
//! Raw-integer entry points in the style the host calls them: selectors and
//! tokens arrive as `u64` slots and are decoded here before touching the
//! table.

use std::sync::Arc;

use super::{op_ids, HostRegistry};
use crate::capsule::CapsuleId;

/// Register the capsule ops under their fixed IDs.
pub fn register_capsule_ops(registry: &mut HostRegistry) {
    registry.register_with_id(
        op_ids::CAPSULE_MAKE,
        "capsule_make",
        "Create a capsule. Args: selector (1=add, 2=multiply), payload. Returns token.",
        2,
        true,
        Arc::new(|table, args, outputs| {
            let selector = args[0] as u32;
            let payload = args[1] as i64;
            let id = table.create_from_raw(selector, payload)?;
            outputs[0] = id.as_raw();
            Ok(id.as_raw() as i64)
        }),
    );

    registry.register_with_id(
        op_ids::CAPSULE_INVOKE,
        "capsule_invoke",
        "Invoke a capsule's bound behavior. Args: token, arg. Returns result.",
        2,
        true,
        Arc::new(|table, args, outputs| {
            let id = CapsuleId::from_raw(args[0]);
            let arg = args[1] as i64;
            let result = table.invoke(id, arg)?;
            outputs[0] = result as u64;
            Ok(result)
        }),
    );

    registry.register_with_id(
        op_ids::CAPSULE_FREE,
        "capsule_free",
        "Release a capsule. Args: token. Returns 0 on success.",
        1,
        true,
        Arc::new(|table, args, outputs| {
            let id = CapsuleId::from_raw(args[0]);
            table.release(id)?;
            outputs[0] = 0;
            Ok(0)
        }),
    );

    registry.register_with_id(
        op_ids::CAPSULE_LIVE_COUNT,
        "capsule_live_count",
        "Number of live capsules. Returns count.",
        0,
        true,
        Arc::new(|table, _args, outputs| {
            let count = table.live_count();
            outputs[0] = count as u64;
            Ok(count as i64)
        }),
    );
}
