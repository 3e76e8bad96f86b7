//! Visitation of one or more variants at once.
//!
//! A visitor is a type implementing [`Visitor`], which fixes the result type,
//! and [`Visit<Args>`] for every combination of arguments it can be called
//! with. The arguments are passed as a tuple list:
//!
//! - [`visit`] resolves each `&Variant<S>` to `&T` and each
//!   `&mut Variant<S>` to `&mut T`, where `T` is the active alternative;
//! - [`visit_index`] resolves each variant to the type-level index of its
//!   active alternative ([`U0`], [`U1`], ...).
//!
//! # Dispatch
//!
//! Resolution walks the argument list and, for every argument, recurses over
//! its alternative list until the runtime index is reached. The result is
//! monomorphized once per visitor and argument list into nested branches:
//! one cell per combination of alternatives, so visiting variants of `N` and
//! `M` alternatives instantiates `N * M` calls to the visitor. The count is
//! available as [`VisitArgs::CELLS`] (see [`dispatch_cells`]); it grows as a
//! product, which matters when several large variants are visited together.
//!
//! # Examples
//!
//! ```rust
//! use tvariant::{
//!     Variant, t,
//!     visit::{Visit, Visitor, visit},
//! };
//!
//! struct Add;
//!
//! impl Visitor for Add {
//!     type Output = f64;
//! }
//!
//! impl<'a, 'b, A, B> Visit<(&'a A, (&'b B, ()))> for Add
//! where
//!     A: Copy + Into<f64>,
//!     B: Copy + Into<f64>,
//! {
//!     fn visit(self, (a, (b, ())): (&'a A, (&'b B, ()))) -> f64 {
//!         (*a).into() + (*b).into()
//!     }
//! }
//!
//! let a: Variant![i32, f32] = Variant::new(2i32);
//! let b: Variant![u8, f64] = Variant::new(0.5f64);
//! assert_eq!(visit(Add, t![&a, &b]), Ok(2.5));
//! ```
//!
//! [`U0`]: crate::tag::U0
//! [`U1`]: crate::tag::U1

use crate::{
    error::BadVariantAccess,
    tag::{Tag, UInt, UTerm},
    variant::{
        Variant,
        repr::{AltList, Cons},
    },
};

/// An operation over resolved variants, with a single result type.
pub trait Visitor {
    type Output;
}

/// The case of a [`Visitor`] for one combination of resolved arguments.
pub trait Visit<Args>: Visitor {
    fn visit(self, args: Args) -> Self::Output;
}

/// The rest of a dispatch, waiting for one more resolved argument.
pub trait Continuation {
    type Output;
}

pub trait Resume<X>: Continuation {
    fn resume(self, x: X) -> Self::Output;
}

/// Appends an element at the end of a tuple list.
pub trait Append<X> {
    type Output;

    fn append(self, x: X) -> Self::Output;
}

impl<X> Append<X> for () {
    type Output = (X, ());

    fn append(self, x: X) -> Self::Output {
        (x, ())
    }
}

impl<X, Head, Tail: Append<X>> Append<X> for (Head, Tail) {
    type Output = (Head, Tail::Output);

    fn append(self, x: X) -> Self::Output {
        (self.0, self.1.append(x))
    }
}

/// Resolves a runtime index of the list to a shared reference to the
/// alternative.
pub trait ResolveRef<'a, K: Continuation>: AltList {
    #[doc(hidden)]
    unsafe fn resolve_ref(this: *const Self::Repr, tag: u8, k: K) -> <K as Continuation>::Output;
}

impl<'a, K: Continuation> ResolveRef<'a, K> for () {
    unsafe fn resolve_ref(_: *const Self::Repr, tag: u8, _: K) -> <K as Continuation>::Output {
        unreachable!("alternative index {tag} out of range")
    }
}

impl<'a, K, Head, Tail> ResolveRef<'a, K> for (Head, Tail)
where
    K: Resume<&'a Head>,
    Head: 'a,
    Tail: ResolveRef<'a, K>,
{
    unsafe fn resolve_ref(this: *const Self::Repr, tag: u8, k: K) -> <K as Continuation>::Output {
        if tag == 0 {
            k.resume(unsafe { &*Cons::head(this) })
        } else {
            unsafe { Tail::resolve_ref(Cons::tail(this), tag - 1, k) }
        }
    }
}

/// Resolves a runtime index of the list to a mutable reference to the
/// alternative.
pub trait ResolveMut<'a, K: Continuation>: AltList {
    #[doc(hidden)]
    unsafe fn resolve_mut(this: *mut Self::Repr, tag: u8, k: K) -> <K as Continuation>::Output;
}

impl<'a, K: Continuation> ResolveMut<'a, K> for () {
    unsafe fn resolve_mut(_: *mut Self::Repr, tag: u8, _: K) -> <K as Continuation>::Output {
        unreachable!("alternative index {tag} out of range")
    }
}

impl<'a, K, Head, Tail> ResolveMut<'a, K> for (Head, Tail)
where
    K: Resume<&'a mut Head>,
    Head: 'a,
    Tail: ResolveMut<'a, K>,
{
    unsafe fn resolve_mut(this: *mut Self::Repr, tag: u8, k: K) -> <K as Continuation>::Output {
        if tag == 0 {
            k.resume(unsafe { &mut *Cons::head_mut(this) })
        } else {
            unsafe { Tail::resolve_mut(Cons::tail_mut(this), tag - 1, k) }
        }
    }
}

/// Resolves a runtime index of the list to its type-level index, counting
/// from `O`.
pub trait ResolveIndex<K: Continuation, O>: AltList {
    #[doc(hidden)]
    fn resolve_index(tag: u8, k: K) -> <K as Continuation>::Output;
}

impl<K: Continuation, O> ResolveIndex<K, O> for () {
    fn resolve_index(tag: u8, _: K) -> <K as Continuation>::Output {
        unreachable!("alternative index {tag} out of range")
    }
}

impl<K, O, Head, Tail> ResolveIndex<K, O> for (Head, Tail)
where
    K: Resume<O>,
    O: Tag,
    Tail: ResolveIndex<K, UInt<O>>,
{
    fn resolve_index(tag: u8, k: K) -> <K as Continuation>::Output {
        if tag == 0 {
            k.resume(O::MARKER)
        } else {
            Tail::resolve_index(tag - 1, k)
        }
    }
}

/// A tuple list of variant references that can be visited together.
pub trait VisitArgs {
    /// The number of alternative combinations, which is the number of
    /// visitor cases the dispatch instantiates.
    const CELLS: usize;
}

impl VisitArgs for () {
    const CELLS: usize = 1;
}

impl<'a, S: AltList, Rest: VisitArgs> VisitArgs for (&'a Variant<S>, Rest) {
    const CELLS: usize = S::LEN * Rest::CELLS;
}

impl<'a, S: AltList, Rest: VisitArgs> VisitArgs for (&'a mut Variant<S>, Rest) {
    const CELLS: usize = S::LEN * Rest::CELLS;
}

/// The number of dispatch cells of visiting the argument list `A`.
///
/// # Examples
///
/// ```rust
/// use tvariant::{Variant, visit::dispatch_cells};
///
/// type A = Variant![u8, u16];
/// type B = Variant![u8, u16, u32];
/// assert_eq!(dispatch_cells::<(&A, (&B, ()))>(), 6);
/// ```
pub const fn dispatch_cells<A: VisitArgs>() -> usize {
    A::CELLS
}

/// A value dispatch in progress: `done` holds the references resolved so
/// far, `rest` the variants still to resolve.
pub struct Pending<V, Done, Rest> {
    visitor: V,
    done: Done,
    rest: Rest,
}

impl<V: Visitor, Done, Rest> Continuation for Pending<V, Done, Rest> {
    type Output = Result<V::Output, BadVariantAccess>;
}

impl<X, V, Done, Rest> Resume<X> for Pending<V, Done, Rest>
where
    V: Visitor,
    Done: Append<X>,
    Rest: Dispatch<V, Done::Output>,
{
    fn resume(self, x: X) -> Result<V::Output, BadVariantAccess> {
        self.rest.dispatch(self.visitor, self.done.append(x))
    }
}

/// A tuple list of variant references that [`visit`] accepts for `V`.
pub trait Dispatch<V: Visitor, Done>: VisitArgs {
    #[doc(hidden)]
    fn dispatch(self, visitor: V, done: Done) -> Result<V::Output, BadVariantAccess>;
}

impl<V: Visit<Done>, Done> Dispatch<V, Done> for () {
    fn dispatch(self, visitor: V, done: Done) -> Result<V::Output, BadVariantAccess> {
        Ok(visitor.visit(done))
    }
}

impl<'a, S, Rest, V, Done> Dispatch<V, Done> for (&'a Variant<S>, Rest)
where
    S: ResolveRef<'a, Pending<V, Done, Rest>>,
    Rest: VisitArgs,
    V: Visitor,
{
    fn dispatch(self, visitor: V, done: Done) -> Result<V::Output, BadVariantAccess> {
        let (variant, rest) = self;
        let tag = variant
            .storage
            .tag()
            .ok_or(BadVariantAccess::Valueless { requested: None })?;
        let pending = Pending { visitor, done, rest };
        unsafe { S::resolve_ref(variant.storage.raw().as_ptr(), tag, pending) }
    }
}

impl<'a, S, Rest, V, Done> Dispatch<V, Done> for (&'a mut Variant<S>, Rest)
where
    S: ResolveMut<'a, Pending<V, Done, Rest>>,
    Rest: VisitArgs,
    V: Visitor,
{
    fn dispatch(self, visitor: V, done: Done) -> Result<V::Output, BadVariantAccess> {
        let (variant, rest) = self;
        let tag = variant
            .storage
            .tag()
            .ok_or(BadVariantAccess::Valueless { requested: None })?;
        let pending = Pending { visitor, done, rest };
        unsafe { S::resolve_mut(variant.storage.raw_mut().as_mut_ptr(), tag, pending) }
    }
}

/// An index dispatch in progress: `done` holds the indices resolved so far.
pub struct PendingIndex<V, Done, Rest> {
    visitor: V,
    done: Done,
    rest: Rest,
}

impl<V: Visitor, Done, Rest> Continuation for PendingIndex<V, Done, Rest> {
    type Output = Result<V::Output, BadVariantAccess>;
}

impl<X, V, Done, Rest> Resume<X> for PendingIndex<V, Done, Rest>
where
    V: Visitor,
    Done: Append<X>,
    Rest: DispatchIndex<V, Done::Output>,
{
    fn resume(self, x: X) -> Result<V::Output, BadVariantAccess> {
        self.rest.dispatch_index(self.visitor, self.done.append(x))
    }
}

/// A tuple list of variant references that [`visit_index`] accepts for `V`.
pub trait DispatchIndex<V: Visitor, Done>: VisitArgs {
    #[doc(hidden)]
    fn dispatch_index(self, visitor: V, done: Done) -> Result<V::Output, BadVariantAccess>;
}

impl<V: Visit<Done>, Done> DispatchIndex<V, Done> for () {
    fn dispatch_index(self, visitor: V, done: Done) -> Result<V::Output, BadVariantAccess> {
        Ok(visitor.visit(done))
    }
}

impl<'a, S, Rest, V, Done> DispatchIndex<V, Done> for (&'a Variant<S>, Rest)
where
    S: ResolveIndex<PendingIndex<V, Done, Rest>, UTerm>,
    Rest: VisitArgs,
    V: Visitor,
{
    fn dispatch_index(self, visitor: V, done: Done) -> Result<V::Output, BadVariantAccess> {
        let (variant, rest) = self;
        let tag = variant
            .storage
            .tag()
            .ok_or(BadVariantAccess::Valueless { requested: None })?;
        S::resolve_index(tag, PendingIndex { visitor, done, rest })
    }
}

impl<'a, S, Rest, V, Done> DispatchIndex<V, Done> for (&'a mut Variant<S>, Rest)
where
    S: ResolveIndex<PendingIndex<V, Done, Rest>, UTerm>,
    Rest: VisitArgs,
    V: Visitor,
{
    fn dispatch_index(self, visitor: V, done: Done) -> Result<V::Output, BadVariantAccess> {
        let (variant, rest) = self;
        let tag = variant
            .storage
            .tag()
            .ok_or(BadVariantAccess::Valueless { requested: None })?;
        S::resolve_index(tag, PendingIndex { visitor, done, rest })
    }
}

/// Calls `visitor` with the active alternatives of every variant in `args`.
///
/// Fails with [`BadVariantAccess::Valueless`] without calling the visitor if
/// any of the variants is valueless.
pub fn visit<V, A>(visitor: V, args: A) -> Result<V::Output, BadVariantAccess>
where
    V: Visitor,
    A: Dispatch<V, ()>,
{
    args.dispatch(visitor, ())
}

/// Calls `visitor` with the type-level indices of the active alternatives of
/// every variant in `args`.
///
/// # Examples
///
/// ```rust
/// use tvariant::{
///     Variant, t,
///     tag::Tag,
///     visit::{Visit, Visitor, visit_index},
/// };
///
/// struct Indices;
///
/// impl Visitor for Indices {
///     type Output = (usize, usize);
/// }
///
/// impl<A: Tag, B: Tag> Visit<(A, (B, ()))> for Indices {
///     fn visit(self, _: (A, (B, ()))) -> (usize, usize) {
///         (A::INDEX, B::INDEX)
///     }
/// }
///
/// let a: Variant![i32, f64] = Variant::new(1i32);
/// let b: Variant![u8, char, bool] = Variant::new('c');
/// assert_eq!(visit_index(Indices, t![&a, &b]), Ok((0, 1)));
/// ```
pub fn visit_index<V, A>(visitor: V, args: A) -> Result<V::Output, BadVariantAccess>
where
    V: Visitor,
    A: DispatchIndex<V, ()>,
{
    args.dispatch_index(visitor, ())
}

impl<S: AltList> Variant<S> {
    /// Calls `visitor` with a reference to the active alternative.
    pub fn visit<'a, V>(&'a self, visitor: V) -> Result<V::Output, BadVariantAccess>
    where
        V: Visitor,
        (&'a Self, ()): Dispatch<V, ()>,
    {
        visit(visitor, (self, ()))
    }

    /// Calls `visitor` with a mutable reference to the active alternative.
    pub fn visit_mut<'a, V>(&'a mut self, visitor: V) -> Result<V::Output, BadVariantAccess>
    where
        V: Visitor,
        (&'a mut Self, ()): Dispatch<V, ()>,
    {
        visit(visitor, (self, ()))
    }

    /// Calls `visitor` with the type-level index of the active alternative.
    pub fn visit_index<'a, V>(&'a self, visitor: V) -> Result<V::Output, BadVariantAccess>
    where
        V: Visitor,
        (&'a Self, ()): DispatchIndex<V, ()>,
    {
        visit_index(visitor, (self, ()))
    }
}

#[cfg(test)]
mod tests {
    use std::{
        cell::Cell,
        format,
        string::{String, ToString},
    };

    use super::*;

    struct Indices;

    impl Visitor for Indices {
        type Output = (usize, usize);
    }

    impl<A: Tag, B: Tag> Visit<(A, (B, ()))> for Indices {
        fn visit(self, _: (A, (B, ()))) -> (usize, usize) {
            (A::INDEX, B::INDEX)
        }
    }

    struct Describe<'c>(&'c Cell<usize>);

    impl Visitor for Describe<'_> {
        type Output = String;
    }

    impl<'a> Visit<(&'a i32, ())> for Describe<'_> {
        fn visit(self, (value, ()): (&'a i32, ())) -> String {
            self.0.set(self.0.get() + 1);
            format!("int {value}")
        }
    }

    impl<'a> Visit<(&'a String, ())> for Describe<'_> {
        fn visit(self, (value, ()): (&'a String, ())) -> String {
            self.0.set(self.0.get() + 1);
            format!("string {value:?}")
        }
    }

    struct Add;

    impl Visitor for Add {
        type Output = f64;
    }

    impl<'a, 'b, A, B> Visit<(&'a A, (&'b B, ()))> for Add
    where
        A: Copy + Into<f64>,
        B: Copy + Into<f64>,
    {
        fn visit(self, (a, (b, ())): (&'a A, (&'b B, ()))) -> f64 {
            (*a).into() + (*b).into()
        }
    }

    struct Grow;

    impl Visitor for Grow {
        type Output = ();
    }

    impl<'a> Visit<(&'a mut i32, ())> for Grow {
        fn visit(self, (value, ()): (&'a mut i32, ())) {
            *value += 1;
        }
    }

    impl<'a> Visit<(&'a mut String, ())> for Grow {
        fn visit(self, (value, ()): (&'a mut String, ())) {
            value.push('+');
        }
    }

    struct CopyInto;

    impl Visitor for CopyInto {
        type Output = ();
    }

    impl<'a, 'b, T: Clone> Visit<(&'a T, (&'b mut T, ()))> for CopyInto {
        fn visit(self, (src, (dst, ())): (&'a T, (&'b mut T, ()))) {
            dst.clone_from(src);
        }
    }

    impl<'a, 'b> Visit<(&'a i32, (&'b mut String, ()))> for CopyInto {
        fn visit(self, (src, (dst, ())): (&'a i32, (&'b mut String, ()))) {
            *dst = src.to_string();
        }
    }

    impl<'a, 'b> Visit<(&'a String, (&'b mut i32, ()))> for CopyInto {
        fn visit(self, (src, (dst, ())): (&'a String, (&'b mut i32, ()))) {
            *dst = src.len() as i32;
        }
    }

    type IntOrString = crate::Variant![i32, String];

    #[test]
    fn resolved_indices_match_runtime_indices() {
        let a: crate::Variant![i32, f64] = Variant::new(1i32);
        let b: crate::Variant![u8, String, char] = Variant::new(String::from("b"));
        assert_eq!(visit_index(Indices, crate::t![&a, &b]), Ok((0, 1)));

        let a: crate::Variant![i32, f64] = Variant::new(1.0f64);
        let b: crate::Variant![u8, String, char] = Variant::new('c');
        assert_eq!(visit_index(Indices, crate::t![&a, &b]), Ok((1, 2)));
    }

    #[test]
    fn visits_single_variant() {
        let calls = Cell::new(0);
        let v = IntOrString::new(3i32);
        assert_eq!(v.visit(Describe(&calls)).as_deref(), Ok("int 3"));
        let v = IntOrString::new("x".to_string());
        assert_eq!(v.visit(Describe(&calls)).as_deref(), Ok("string \"x\""));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn visits_two_variants() {
        let a: crate::Variant![i32, f32] = Variant::new(2i32);
        let b: crate::Variant![u8, f64, u16] = Variant::new(0.5f64);
        assert_eq!(visit(Add, crate::t![&a, &b]), Ok(2.5));

        let a: crate::Variant![i32, f32] = Variant::new(1.5f32);
        let b: crate::Variant![u8, f64, u16] = Variant::new(3u16);
        assert_eq!(visit(Add, crate::t![&a, &b]), Ok(4.5));
    }

    #[test]
    fn visits_mutably() {
        let mut v = IntOrString::new(1i32);
        v.visit_mut(Grow).unwrap();
        assert_eq!(v.get::<i32, _>(), Ok(&2));

        let mut v = IntOrString::new("a".to_string());
        visit(Grow, crate::t![&mut v]).unwrap();
        assert_eq!(v.get::<String, _>().map(String::as_str), Ok("a+"));
    }

    #[test]
    fn visits_mixed_references() {
        let src = IntOrString::new(12i32);
        let mut dst = IntOrString::new("old".to_string());
        visit(CopyInto, crate::t![&src, &mut dst]).unwrap();
        assert_eq!(dst.get::<String, _>().map(String::as_str), Ok("12"));

        let src = IntOrString::new("four".to_string());
        visit(CopyInto, crate::t![&src, &mut dst]).unwrap();
        assert_eq!(dst.get::<String, _>().map(String::as_str), Ok("four"));
    }

    #[test]
    fn valueless_is_rejected_before_visiting() {
        let calls = Cell::new(0);
        let mut v = IntOrString::new(1i32);
        v.make_valueless();
        assert_eq!(
            v.visit(Describe(&calls)),
            Err(BadVariantAccess::Valueless { requested: None })
        );
        assert_eq!(calls.get(), 0);

        let a: crate::Variant![i32, f32] = Variant::new(2i32);
        let mut b: crate::Variant![u8, f64, u16] = Variant::new(1u8);
        b.make_valueless();
        assert!(visit(Add, crate::t![&a, &b]).unwrap_err().is_valueless());
        assert!(visit_index(Indices, crate::t![&a, &b]).is_err());
        assert_eq!(v.visit_index(Single), Err(BadVariantAccess::Valueless { requested: None }));
    }

    struct Single;

    impl Visitor for Single {
        type Output = usize;
    }

    impl<A: Tag> Visit<(A, ())> for Single {
        fn visit(self, _: (A, ())) -> usize {
            A::INDEX
        }
    }

    #[test]
    fn single_index() {
        let v: crate::Variant![u8, u16, u32, u64] = Variant::new(4u32);
        assert_eq!(v.visit_index(Single), Ok(2));
    }

    #[test]
    fn index_of_mutable_arguments() {
        let a: crate::Variant![i32, f64] = Variant::new(2.0f64);
        let mut b: crate::Variant![u8, String, char] = Variant::new('z');
        assert_eq!(visit_index(Indices, crate::t![&a, &mut b]), Ok((1, 2)));

        let mut c: crate::Variant![u8, u16, u32, u64] = Variant::new(1u64);
        assert_eq!(visit_index(Single, crate::t![&mut c]), Ok(3));
        c.make_valueless();
        assert!(visit_index(Single, crate::t![&mut c]).unwrap_err().is_valueless());
    }

    #[test]
    fn cells_are_the_product_of_alternative_counts() {
        type A = crate::Variant![i32, f32];
        type B = crate::Variant![u8, f64, u16];
        assert_eq!(dispatch_cells::<(&A, ())>(), 2);
        assert_eq!(dispatch_cells::<(&A, (&mut B, ()))>(), 6);
        assert_eq!(dispatch_cells::<(&A, (&B, (&B, ())))>(), 18);
        assert_eq!(dispatch_cells::<()>(), 1);
    }
}
