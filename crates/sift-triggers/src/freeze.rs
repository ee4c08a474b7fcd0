//! One-way sealing of trigger drafts.
//!
//! Drafts and sealed triggers are distinct types. Freezing consumes the draft
//! and yields the sealed value, which exposes no mutators, so writing to a
//! frozen trigger is a compile error. Sealed values implement [`Freeze`] as
//! the identity, which makes freezing idempotent:
//! `draft.freeze().freeze() == draft.freeze()`.

/// A value that can be sealed into an immutable form.
pub trait Freeze {
    /// The sealed form.
    type Frozen;

    /// Seal the value, recursively sealing everything it owns.
    fn freeze(self) -> Self::Frozen;

    /// Whether the value is already sealed.
    fn is_frozen(&self) -> bool;
}

/// Implements [`Freeze`] as the identity for an already sealed type.
macro_rules! sealed {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::freeze::Freeze for $ty {
                type Frozen = Self;

                fn freeze(self) -> Self {
                    self
                }

                fn is_frozen(&self) -> bool {
                    true
                }
            }
        )+
    };
}

pub(crate) use sealed;
