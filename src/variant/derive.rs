//! Capability traits of alternative lists, and the standard traits of
//! [`Variant`] built on them.
//!
//! Each trait holds for a list when every alternative implements the
//! corresponding standard trait, so for example `Variant<S>: Clone` exactly
//! when every alternative of `S` is `Clone`.

use core::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
};

use super::{
    Variant,
    repr::{AltList, Cons},
    storage::TaggedStorage,
};

pub trait AltClone: AltList {
    #[doc(hidden)]
    unsafe fn clone_at(src: *const Self::Repr, dst: *mut Self::Repr, tag: u8);

    #[doc(hidden)]
    unsafe fn clone_from_at(dst: *mut Self::Repr, src: *const Self::Repr, tag: u8);
}

impl AltClone for () {
    unsafe fn clone_at(_: *const Self::Repr, _: *mut Self::Repr, tag: u8) {
        unreachable!("alternative index {tag} out of range")
    }

    unsafe fn clone_from_at(_: *mut Self::Repr, _: *const Self::Repr, tag: u8) {
        unreachable!("alternative index {tag} out of range")
    }
}

impl<Head: Clone, Tail: AltClone> AltClone for (Head, Tail) {
    unsafe fn clone_at(src: *const Self::Repr, dst: *mut Self::Repr, tag: u8) {
        if tag == 0 {
            unsafe { Cons::head_mut(dst).write((*Cons::head(src)).clone()) }
        } else {
            unsafe { Tail::clone_at(Cons::tail(src), Cons::tail_mut(dst), tag - 1) }
        }
    }

    unsafe fn clone_from_at(dst: *mut Self::Repr, src: *const Self::Repr, tag: u8) {
        if tag == 0 {
            unsafe { (*Cons::head_mut(dst)).clone_from(&*Cons::head(src)) }
        } else {
            unsafe { Tail::clone_from_at(Cons::tail_mut(dst), Cons::tail(src), tag - 1) }
        }
    }
}

pub trait AltPartialEq: AltList {
    #[doc(hidden)]
    unsafe fn eq_at(this: *const Self::Repr, other: *const Self::Repr, tag: u8) -> bool;
}

impl AltPartialEq for () {
    unsafe fn eq_at(_: *const Self::Repr, _: *const Self::Repr, tag: u8) -> bool {
        unreachable!("alternative index {tag} out of range")
    }
}

impl<Head: PartialEq, Tail: AltPartialEq> AltPartialEq for (Head, Tail) {
    unsafe fn eq_at(this: *const Self::Repr, other: *const Self::Repr, tag: u8) -> bool {
        if tag == 0 {
            unsafe { *Cons::head(this) == *Cons::head(other) }
        } else {
            unsafe { Tail::eq_at(Cons::tail(this), Cons::tail(other), tag - 1) }
        }
    }
}

pub trait AltPartialOrd: AltPartialEq {
    #[doc(hidden)]
    unsafe fn partial_cmp_at(
        this: *const Self::Repr,
        other: *const Self::Repr,
        tag: u8,
    ) -> Option<Ordering>;
}

impl AltPartialOrd for () {
    unsafe fn partial_cmp_at(
        _: *const Self::Repr,
        _: *const Self::Repr,
        tag: u8,
    ) -> Option<Ordering> {
        unreachable!("alternative index {tag} out of range")
    }
}

impl<Head: PartialOrd, Tail: AltPartialOrd> AltPartialOrd for (Head, Tail) {
    unsafe fn partial_cmp_at(
        this: *const Self::Repr,
        other: *const Self::Repr,
        tag: u8,
    ) -> Option<Ordering> {
        if tag == 0 {
            unsafe { (*Cons::head(this)).partial_cmp(&*Cons::head(other)) }
        } else {
            unsafe { Tail::partial_cmp_at(Cons::tail(this), Cons::tail(other), tag - 1) }
        }
    }
}

pub trait AltOrd: AltPartialOrd {
    #[doc(hidden)]
    unsafe fn cmp_at(this: *const Self::Repr, other: *const Self::Repr, tag: u8) -> Ordering;
}

impl AltOrd for () {
    unsafe fn cmp_at(_: *const Self::Repr, _: *const Self::Repr, tag: u8) -> Ordering {
        unreachable!("alternative index {tag} out of range")
    }
}

impl<Head: Ord, Tail: AltOrd> AltOrd for (Head, Tail) {
    unsafe fn cmp_at(this: *const Self::Repr, other: *const Self::Repr, tag: u8) -> Ordering {
        if tag == 0 {
            unsafe { (*Cons::head(this)).cmp(&*Cons::head(other)) }
        } else {
            unsafe { Tail::cmp_at(Cons::tail(this), Cons::tail(other), tag - 1) }
        }
    }
}

pub trait AltHash: AltList {
    #[doc(hidden)]
    unsafe fn hash_at<H: Hasher>(this: *const Self::Repr, tag: u8, state: &mut H);
}

impl AltHash for () {
    unsafe fn hash_at<H: Hasher>(_: *const Self::Repr, tag: u8, _: &mut H) {
        unreachable!("alternative index {tag} out of range")
    }
}

impl<Head: Hash, Tail: AltHash> AltHash for (Head, Tail) {
    unsafe fn hash_at<H: Hasher>(this: *const Self::Repr, tag: u8, state: &mut H) {
        if tag == 0 {
            unsafe { (*Cons::head(this)).hash(state) }
        } else {
            unsafe { Tail::hash_at(Cons::tail(this), tag - 1, state) }
        }
    }
}

pub trait AltDebug: AltList {
    #[doc(hidden)]
    unsafe fn debug_at(this: *const Self::Repr, tag: u8, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl AltDebug for () {
    unsafe fn debug_at(_: *const Self::Repr, tag: u8, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        unreachable!("alternative index {tag} out of range")
    }
}

impl<Head: fmt::Debug, Tail: AltDebug> AltDebug for (Head, Tail) {
    unsafe fn debug_at(
        this: *const Self::Repr,
        tag: u8,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        if tag == 0 {
            unsafe { fmt::Debug::fmt(&*Cons::head(this), f) }
        } else {
            unsafe { Tail::debug_at(Cons::tail(this), tag - 1, f) }
        }
    }
}

impl<S: AltClone> Clone for Variant<S> {
    fn clone(&self) -> Self {
        let mut storage = TaggedStorage::valueless();
        if let Some(tag) = self.storage.tag() {
            // A panicking clone leaves `storage` valueless, so nothing is
            // dropped twice.
            unsafe {
                S::clone_at(self.storage.raw().as_ptr(), storage.raw_mut().as_mut_ptr(), tag);
                storage.mark(tag);
            }
        }
        Variant { storage }
    }

    /// Clone-assigns from `source`.
    ///
    /// An active alternative shared with `source` is updated in place with
    /// its own `clone_from`. Otherwise `source` is cloned into a temporary
    /// first, so a panicking clone leaves `self` untouched.
    fn clone_from(&mut self, source: &Self) {
        match source.storage.tag() {
            None => self.make_valueless(),
            Some(tag) if self.storage.tag() == Some(tag) => unsafe {
                S::clone_from_at(
                    self.storage.raw_mut().as_mut_ptr(),
                    source.storage.raw().as_ptr(),
                    tag,
                )
            },
            Some(_) => *self = source.clone(),
        }
    }
}

impl<S: AltPartialEq> PartialEq for Variant<S> {
    fn eq(&self, other: &Self) -> bool {
        match (self.storage.tag(), other.storage.tag()) {
            (Some(tag), Some(other_tag)) if tag == other_tag => unsafe {
                S::eq_at(self.storage.raw().as_ptr(), other.storage.raw().as_ptr(), tag)
            },
            (tag, other_tag) => tag.is_none() && other_tag.is_none(),
        }
    }
}

impl<S: AltPartialEq + Eq> Eq for Variant<S> {}

impl<S: AltPartialOrd> PartialOrd for Variant<S> {
    /// Orders by active index first, valueless lowest, then by the active
    /// alternatives.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.storage.tag().cmp(&other.storage.tag()) {
            Ordering::Equal => match self.storage.tag() {
                None => Some(Ordering::Equal),
                Some(tag) => unsafe {
                    S::partial_cmp_at(
                        self.storage.raw().as_ptr(),
                        other.storage.raw().as_ptr(),
                        tag,
                    )
                },
            },
            other => Some(other),
        }
    }
}

impl<S: AltOrd + Eq> Ord for Variant<S> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.storage
            .tag()
            .cmp(&other.storage.tag())
            .then_with(|| match self.storage.tag() {
                None => Ordering::Equal,
                Some(tag) => unsafe {
                    S::cmp_at(self.storage.raw().as_ptr(), other.storage.raw().as_ptr(), tag)
                },
            })
    }
}

impl<S: AltHash> Hash for Variant<S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.storage.tag().hash(state);
        if let Some(tag) = self.storage.tag() {
            unsafe { S::hash_at(self.storage.raw().as_ptr(), tag, state) }
        }
    }
}

impl<S: AltDebug> fmt::Debug for Variant<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.storage.tag() {
            None => f.write_str("Valueless"),
            Some(tag) => unsafe { S::debug_at(self.storage.raw().as_ptr(), tag, f) },
        }
    }
}
