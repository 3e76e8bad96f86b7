//! The module dealing with the underlying representation of the [`Variant`]
//! type.
//!
//! # Implementation details
//!
//! The alternatives of a variant live in a hand-written recursive union, so
//! the memory layout of a variant resembles a tagged union:
//!
//! ```rust,no_run
//! # use core::convert::Infallible;
//! # use core::mem::{ManuallyDrop, MaybeUninit};
//!
//! struct Nil(Infallible);
//! #[repr(C)]
//! union Cons<T, Next> {
//!     data: ManuallyDrop<T>,
//!     next: ManuallyDrop<Next>,
//! }
//!
//! // For example only. Not actually defined.
//! struct RawVariant2<T1, T2> {
//!     tag: Option<u8>,
//!     data: MaybeUninit<Cons<T1, Cons<T2, Nil>>>,
//! }
//! ```
//!
//! Nothing in the union records which field is live. [`RawStorage`] never
//! drops anything on its own; the tag and the drop logic belong to the
//! tagged storage one level up.
//!
//! [`Variant`]: crate::Variant

use core::{
    convert::Infallible,
    marker::PhantomData,
    mem::{self, ManuallyDrop, MaybeUninit},
    ptr,
};

use crate::tag::{Tag, UInt, UTerm};

/// The terminator type of the underlying union of the [`Variant`] type.
///
/// [`Variant`]: crate::Variant
pub struct Nil(pub(crate) Infallible);

/// The accumulator type of the underlying union of the [`Variant`] type.
///
/// [`Variant`]: crate::Variant
#[repr(C)]
pub union Cons<T, U> {
    pub(crate) data: ManuallyDrop<T>,
    pub(crate) next: ManuallyDrop<U>,
}

impl<T, U> Cons<T, U> {
    /// # Safety
    ///
    /// `this` must point to an allocation of `Cons<T, U>`.
    pub(crate) unsafe fn head(this: *const Self) -> *const T {
        let ptr = unsafe { ptr::addr_of!((*this).data) }.cast::<T>();
        debug_assert_eq!(ptr.cast(), this);
        ptr
    }

    /// # Safety
    ///
    /// `this` must point to an allocation of `Cons<T, U>`.
    pub(crate) unsafe fn head_mut(this: *mut Self) -> *mut T {
        let ptr = unsafe { ptr::addr_of_mut!((*this).data) }.cast::<T>();
        debug_assert_eq!(ptr.cast(), this);
        ptr
    }

    /// # Safety
    ///
    /// `this` must point to an allocation of `Cons<T, U>`.
    pub(crate) unsafe fn tail(this: *const Self) -> *const U {
        let ptr = unsafe { ptr::addr_of!((*this).next) }.cast::<U>();
        debug_assert_eq!(ptr.cast(), this);
        ptr
    }

    /// # Safety
    ///
    /// `this` must point to an allocation of `Cons<T, U>`.
    pub(crate) unsafe fn tail_mut(this: *mut Self) -> *mut U {
        let ptr = unsafe { ptr::addr_of_mut!((*this).next) }.cast::<U>();
        debug_assert_eq!(ptr.cast(), this);
        ptr
    }
}

/// The trait that type lists implement to support its corresponding tagged
/// union representation for the [`Variant`] type.
///
/// [`Variant`]: crate::Variant
pub trait AltList {
    /// The underlying representation of the `Variant` type.
    type Repr;

    /// The number of alternatives in the list.
    const LEN: usize;

    /// Whether dropping any alternative runs code. When it does not, every
    /// reset of the storage is skipped.
    const NEEDS_DROP: bool;

    #[doc(hidden)]
    unsafe fn drop_at(this: *mut Self::Repr, tag: u8);

    #[doc(hidden)]
    unsafe fn swap_at(this: *mut Self::Repr, other: *mut Self::Repr, tag: u8);

    #[doc(hidden)]
    fn type_name(tag: u8) -> &'static str;
}

impl AltList for () {
    type Repr = Nil;

    const LEN: usize = 0;
    const NEEDS_DROP: bool = false;

    unsafe fn drop_at(_: *mut Nil, tag: u8) {
        unreachable!("alternative index {tag} out of range")
    }

    unsafe fn swap_at(_: *mut Nil, _: *mut Nil, tag: u8) {
        unreachable!("alternative index {tag} out of range")
    }

    fn type_name(tag: u8) -> &'static str {
        unreachable!("alternative index {tag} out of range")
    }
}

impl<Head, Tail> AltList for (Head, Tail)
where
    Tail: AltList,
{
    type Repr = Cons<Head, Tail::Repr>;

    const LEN: usize = 1 + Tail::LEN;
    const NEEDS_DROP: bool = mem::needs_drop::<Head>() || Tail::NEEDS_DROP;

    unsafe fn drop_at(this: *mut Self::Repr, tag: u8) {
        if tag == 0 {
            unsafe { ptr::drop_in_place(Cons::head_mut(this)) }
        } else {
            unsafe { Tail::drop_at(Cons::tail_mut(this), tag - 1) }
        }
    }

    unsafe fn swap_at(this: *mut Self::Repr, other: *mut Self::Repr, tag: u8) {
        if tag == 0 {
            unsafe { mem::swap(&mut *Cons::head_mut(this), &mut *Cons::head_mut(other)) }
        } else {
            unsafe { Tail::swap_at(Cons::tail_mut(this), Cons::tail_mut(other), tag - 1) }
        }
    }

    fn type_name(tag: u8) -> &'static str {
        match tag.checked_sub(1) {
            None => core::any::type_name::<Head>(),
            Some(tag) => Tail::type_name(tag),
        }
    }
}

/// The trait that type lists implement to resolve the alternative at index
/// tag `U`.
pub trait Alt<U: Tag>: AltList {
    /// The alternative type at index `U`.
    type Type;

    #[doc(hidden)]
    unsafe fn as_ptr(this: *const Self::Repr) -> *const Self::Type;

    #[doc(hidden)]
    unsafe fn as_mut_ptr(this: *mut Self::Repr) -> *mut Self::Type;
}

impl<Head, Tail> Alt<UTerm> for (Head, Tail)
where
    Tail: AltList,
{
    type Type = Head;

    unsafe fn as_ptr(this: *const Self::Repr) -> *const Head {
        unsafe { Cons::head(this) }
    }

    unsafe fn as_mut_ptr(this: *mut Self::Repr) -> *mut Head {
        unsafe { Cons::head_mut(this) }
    }
}

impl<Head, Tail, U: Tag> Alt<UInt<U>> for (Head, Tail)
where
    Tail: Alt<U>,
{
    type Type = Tail::Type;

    unsafe fn as_ptr(this: *const Self::Repr) -> *const Self::Type {
        unsafe { Tail::as_ptr(Cons::tail(this)) }
    }

    unsafe fn as_mut_ptr(this: *mut Self::Repr) -> *mut Self::Type {
        unsafe { Tail::as_mut_ptr(Cons::tail_mut(this)) }
    }
}

/// The trait that type lists implement to locate the alternative of type `T`
/// and its index tag `U`.
///
/// `U` is inferred when `T` occurs exactly once in the list; otherwise it is
/// ambiguous and has to be spelled out.
pub trait Split<T, U: Tag>: Alt<U, Type = T> {}

impl<Head, Tail> Split<Head, UTerm> for (Head, Tail) where Tail: AltList {}

impl<Head, Tail, T, U: Tag> Split<T, UInt<U>> for (Head, Tail) where Tail: Split<T, U> {}

/// The trait that type lists implement to locate the alternative that can be
/// built from a `Src` through [`From`].
///
/// Resolution succeeds when exactly one alternative accepts `Src`.
pub trait Convert<Src, U: Tag>: Alt<U> {
    #[doc(hidden)]
    fn convert(src: Src) -> Self::Type;
}

impl<Head, Tail, Src> Convert<Src, UTerm> for (Head, Tail)
where
    Head: From<Src>,
    Tail: AltList,
{
    fn convert(src: Src) -> Head {
        Head::from(src)
    }
}

impl<Head, Tail, Src, U: Tag> Convert<Src, UInt<U>> for (Head, Tail)
where
    Tail: Convert<Src, U>,
{
    fn convert(src: Src) -> Self::Type {
        Tail::convert(src)
    }
}

/// Untagged storage for exactly one alternative of the list `S`.
pub struct RawStorage<S: AltList> {
    repr: MaybeUninit<S::Repr>,
    _marker: PhantomData<S>,
}

impl<S: AltList> RawStorage<S> {
    /// Storage with no live alternative.
    pub(crate) const fn undefined() -> Self {
        RawStorage {
            repr: MaybeUninit::uninit(),
            _marker: PhantomData,
        }
    }

    pub(crate) fn new_at<U: Tag>(value: S::Type) -> Self
    where
        S: Alt<U>,
    {
        let mut this = Self::undefined();
        this.set::<U>(value);
        this
    }

    /// Writes `value` as alternative `U`. A live alternative already in the
    /// storage is overwritten without being dropped.
    pub(crate) fn set<U: Tag>(&mut self, value: S::Type) -> &mut S::Type
    where
        S: Alt<U>,
    {
        unsafe {
            let ptr = S::as_mut_ptr(self.repr.as_mut_ptr());
            ptr.write(value);
            &mut *ptr
        }
    }

    /// # Safety
    ///
    /// Alternative `U` must be live.
    pub(crate) unsafe fn get<U: Tag>(&self) -> &S::Type
    where
        S: Alt<U>,
    {
        unsafe { &*S::as_ptr(self.repr.as_ptr()) }
    }

    /// # Safety
    ///
    /// Alternative `U` must be live.
    pub(crate) unsafe fn get_mut<U: Tag>(&mut self) -> &mut S::Type
    where
        S: Alt<U>,
    {
        unsafe { &mut *S::as_mut_ptr(self.repr.as_mut_ptr()) }
    }

    /// Moves alternative `U` out of the storage.
    ///
    /// # Safety
    ///
    /// Alternative `U` must be live, and must be treated as dead afterwards.
    pub(crate) unsafe fn read<U: Tag>(&self) -> S::Type
    where
        S: Alt<U>,
    {
        unsafe { S::as_ptr(self.repr.as_ptr()).read() }
    }

    /// Drops the alternative at runtime index `tag`.
    ///
    /// # Safety
    ///
    /// The alternative at `tag` must be live, and is dead afterwards.
    pub(crate) unsafe fn reset(&mut self, tag: u8) {
        if S::NEEDS_DROP {
            unsafe { S::drop_at(self.repr.as_mut_ptr(), tag) }
        }
    }

    /// Swaps the alternatives at runtime index `tag` of both storages.
    ///
    /// # Safety
    ///
    /// The alternative at `tag` must be live in both storages.
    pub(crate) unsafe fn swap(&mut self, other: &mut Self, tag: u8) {
        unsafe { S::swap_at(self.repr.as_mut_ptr(), other.repr.as_mut_ptr(), tag) }
    }

    pub(crate) fn as_ptr(&self) -> *const S::Repr {
        self.repr.as_ptr()
    }

    pub(crate) fn as_mut_ptr(&mut self) -> *mut S::Repr {
        self.repr.as_mut_ptr()
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc, string::String};

    use super::*;
    use crate::tag::*;

    struct Counted(Rc<Cell<usize>>);

    impl Drop for Counted {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn layout() {
        type L = T![u8, u64, [u8; 3]];
        assert_eq!(L::LEN, 3);
        assert_eq!(mem::size_of::<<L as AltList>::Repr>(), mem::size_of::<u64>());
        assert_eq!(mem::align_of::<<L as AltList>::Repr>(), mem::align_of::<u64>());
        assert_eq!(<() as AltList>::LEN, 0);
    }

    #[test]
    fn needs_drop() {
        assert!(!<T![u8, f64, (u16, char)] as AltList>::NEEDS_DROP);
        assert!(<T![u8, String] as AltList>::NEEDS_DROP);
        assert!(!<() as AltList>::NEEDS_DROP);
    }

    #[test]
    fn set_get_reset() {
        type L = T![u32, Counted];
        let drops = Rc::new(Cell::new(0));

        let mut raw = RawStorage::<L>::new_at::<U0>(7);
        assert_eq!(unsafe { *raw.get::<U0>() }, 7);
        unsafe { *raw.get_mut::<U0>() += 1 };
        assert_eq!(unsafe { raw.read::<U0>() }, 8);

        raw.set::<U1>(Counted(drops.clone()));
        assert_eq!(drops.get(), 0);
        unsafe { raw.reset(1) };
        assert_eq!(drops.get(), 1);

        // Nothing is live anymore, so dropping the storage must not touch it.
        drop(raw);
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn swap_in_place() {
        type L = T![u8, String];
        let mut a = RawStorage::<L>::new_at::<U1>("a".into());
        let mut b = RawStorage::<L>::new_at::<U1>("b".into());
        unsafe {
            a.swap(&mut b, 1);
            assert_eq!(a.get::<U1>(), "b");
            assert_eq!(b.get::<U1>(), "a");
            a.reset(1);
            b.reset(1);
        }
    }

    #[test]
    fn type_names() {
        type L = T![u8, String];
        assert_eq!(L::type_name(0), "u8");
        assert!(L::type_name(1).ends_with("String"));
    }
}
