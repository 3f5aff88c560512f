use std::sync::atomic::{AtomicUsize, Ordering};

/// Source of the ids generated for collaboration, participant, diagram,
/// plane and message flow elements. Callers add the `id` prefix.
pub trait IdGenerator {
    fn next_id(&self) -> String;
}

/// Random v4 UUIDs.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// `1`, `2`, `3`, ... Useful when the output has to be reproducible.
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: AtomicUsize,
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        (self.next.fetch_add(1, Ordering::Relaxed) + 1).to_string()
    }
}

impl<G: IdGenerator + ?Sized> IdGenerator for &G {
    fn next_id(&self) -> String {
        (**self).next_id()
    }
}
