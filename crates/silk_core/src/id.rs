//! Shared generational keys
//!
//! Triggers and timelines live in slotmaps owned by their respective
//! components, but their keys cross crate boundaries: a trigger holds a
//! non-owning timeline reference, and diagnostics name both. Defining the
//! key types here keeps those references free of crate cycles.

use slotmap::new_key_type;

new_key_type! {
    /// Key for a registered scroll trigger.
    pub struct TriggerKey;

    /// Key for a timeline managed by the timeline engine.
    pub struct TimelineKey;
}
