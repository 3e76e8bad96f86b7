//! The [`Variant`] container.

mod access;
pub mod derive;
pub mod repr;
mod storage;

use self::{
    repr::{Alt, AltList, Convert, Split},
    storage::TaggedStorage,
};
use crate::tag::{Tag, UTerm};

/// The alternative type of the list `S` at index tag `U`.
pub type AltType<S, U> = <S as Alt<U>>::Type;

/// A value holding exactly one alternative of the type list `S`, or nothing
/// at all after a failed switch between alternatives.
///
/// The type is usually spelled with the [`Variant!`](crate::Variant!)
/// macro: `Variant![i32, String]` is `Variant<(i32, (String, ()))>`.
pub struct Variant<S: AltList> {
    pub(crate) storage: TaggedStorage<S>,
}

impl<Head, Tail> Default for Variant<(Head, Tail)>
where
    Head: Default,
    Tail: AltList,
{
    /// Default-constructs the first alternative.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tvariant::Variant;
    ///
    /// let v: Variant![i32, String] = Default::default();
    /// assert_eq!(v.index(), Some(0));
    /// assert_eq!(v.get::<i32, _>(), Ok(&0));
    /// ```
    fn default() -> Self {
        Self::new_at::<UTerm>(Head::default())
    }
}

impl<S: AltList> Variant<S> {
    /// The number of alternatives of this variant type.
    pub const ALTERNATIVES: usize = S::LEN;

    /// Constructs the alternative at index tag `U`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tvariant::{Variant, tag::U1};
    ///
    /// let v: Variant![u8, u8] = Variant::new_at::<U1>(7);
    /// assert_eq!(v.index(), Some(1));
    /// ```
    pub fn new_at<U: Tag>(value: AltType<S, U>) -> Self
    where
        S: Alt<U>,
    {
        Variant {
            storage: TaggedStorage::new_at::<U>(value),
        }
    }

    /// Constructs the alternative of type `T`, which must occur exactly once
    /// in the list.
    pub fn new<T, U: Tag>(value: T) -> Self
    where
        S: Split<T, U>,
    {
        Self::new_at::<U>(value)
    }

    /// Constructs the single alternative that implements `From<Src>`.
    ///
    /// When several alternatives accept `Src` the index has to be named
    /// explicitly with `convert::<_, U>`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tvariant::Variant;
    ///
    /// type V = Variant![i32, String];
    /// assert_eq!(V::convert(3i32).index(), Some(0));
    /// assert_eq!(V::convert("hi").index(), Some(1));
    /// ```
    ///
    /// Both `i64` and `f64` implement `From<i32>`, so the alternative is not
    /// picked by declaration order; the call is rejected:
    ///
    /// ```rust,compile_fail
    /// use tvariant::Variant;
    ///
    /// let v = <Variant![i64, f64]>::convert(3i32);
    /// ```
    ///
    /// Naming the index settles it:
    ///
    /// ```rust
    /// use tvariant::{Variant, tag::U1};
    ///
    /// let v = <Variant![i64, f64]>::convert::<_, U1>(3i32);
    /// assert_eq!(v.index(), Some(1));
    /// assert_eq!(v.get::<f64, _>(), Ok(&3.0));
    /// ```
    pub fn convert<Src, U: Tag>(src: Src) -> Self
    where
        S: Convert<Src, U>,
    {
        Self::new_at::<U>(S::convert(src))
    }

    /// The index of the active alternative, or `None` if the variant is
    /// valueless.
    pub fn index(&self) -> Option<usize> {
        self.storage.tag().map(usize::from)
    }

    pub fn is_valueless(&self) -> bool {
        self.storage.tag().is_none()
    }

    /// The type name of the active alternative.
    pub fn type_name(&self) -> Option<&'static str> {
        self.storage.tag().map(S::type_name)
    }

    /// Drops the active alternative, if any, leaving the variant valueless.
    pub fn make_valueless(&mut self) {
        if let Some(tag) = self.storage.tag() {
            event!(trace, "dropping alternative {tag}; variant is now valueless");
            self.storage.reset();
        }
    }

    /// Moves the content out, leaving `self` valueless.
    pub fn take(&mut self) -> Self {
        Variant {
            storage: self.storage.take_all(),
        }
    }

    /// Replaces the content with the alternative at `U`.
    ///
    /// The active alternative is dropped first, even if it is `U` itself.
    pub fn emplace_at<U: Tag>(&mut self, value: AltType<S, U>) -> &mut AltType<S, U>
    where
        S: Alt<U>,
    {
        self.emplace_with::<U>(|| value)
    }

    /// Replaces the content with the alternative of type `T`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tvariant::Variant;
    ///
    /// let mut v: Variant![i32, String] = Variant::new(1i32);
    /// v.emplace(String::from("x"));
    /// assert_eq!(v.get::<String, _>().map(String::as_str), Ok("x"));
    /// ```
    pub fn emplace<T, U: Tag>(&mut self, value: T) -> &mut T
    where
        S: Split<T, U>,
    {
        self.emplace_at::<U>(value)
    }

    /// Drops the active alternative, then constructs alternative `U` with
    /// `f`.
    ///
    /// If `f` panics the variant is left valueless.
    pub fn emplace_with<U: Tag>(
        &mut self,
        f: impl FnOnce() -> AltType<S, U>,
    ) -> &mut AltType<S, U>
    where
        S: Alt<U>,
    {
        self.make_valueless();
        let value = f();
        event!(trace, "emplacing alternative {}", U::VALUE);
        self.storage.set::<U>(value)
    }

    /// Drops the active alternative, then tries to construct alternative `U`
    /// with `f`.
    ///
    /// If `f` fails the variant is left valueless and the error is returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tvariant::{Variant, tag::U1};
    ///
    /// let mut v: Variant![i32, u8] = Variant::new(300i32);
    /// let res = v.try_emplace_with::<U1, _>(|| u8::try_from(300i32));
    /// assert!(res.is_err());
    /// assert!(v.is_valueless());
    /// ```
    pub fn try_emplace_with<U: Tag, E>(
        &mut self,
        f: impl FnOnce() -> Result<AltType<S, U>, E>,
    ) -> Result<&mut AltType<S, U>, E>
    where
        S: Alt<U>,
    {
        self.make_valueless();
        match f() {
            Ok(value) => {
                event!(trace, "emplacing alternative {}", U::VALUE);
                Ok(self.storage.set::<U>(value))
            }
            Err(err) => {
                event!(
                    debug,
                    "constructing alternative {} failed; variant left valueless",
                    U::VALUE
                );
                Err(err)
            }
        }
    }

    /// Assigns to the alternative at `U`: in place if it is already active,
    /// by emplacing otherwise.
    fn replace_at<U: Tag>(&mut self, value: AltType<S, U>) -> &mut AltType<S, U>
    where
        S: Alt<U>,
    {
        if self.storage.tag() == Some(U::VALUE) {
            let slot = unsafe { self.storage.raw_mut().get_mut::<U>() };
            *slot = value;
            slot
        } else {
            self.emplace_at::<U>(value)
        }
    }

    /// Assigns a value of the alternative type `T`.
    ///
    /// Unlike [`emplace`](Self::emplace), an active `T` is assigned in place
    /// instead of being dropped and rebuilt.
    pub fn set<T, U: Tag>(&mut self, value: T) -> &mut T
    where
        S: Split<T, U>,
    {
        self.replace_at::<U>(value)
    }

    /// Assigns the single alternative that implements `From<Src>`, the
    /// assigning counterpart of [`convert`](Self::convert).
    pub fn assign<Src, U: Tag>(&mut self, src: Src) -> &mut AltType<S, U>
    where
        S: Convert<Src, U>,
    {
        self.replace_at::<U>(S::convert(src))
    }

    /// Move-assigns from another variant of the same type.
    ///
    /// If both hold the same alternative the payload is assigned in place;
    /// otherwise the active alternative is dropped and `source`'s is moved
    /// in. A valueless `source` makes `self` valueless.
    pub fn assign_from(&mut self, mut source: Self) {
        match source.storage.tag() {
            None => self.make_valueless(),
            Some(tag) if self.storage.tag() == Some(tag) => {
                // The old payload leaves with `source`.
                self.storage.swap_same(&mut source.storage)
            }
            Some(_) => {
                self.make_valueless();
                self.storage = source.storage;
            }
        }
    }

    /// Swaps the contents of two variants, valueless ones included.
    pub fn swap(&mut self, other: &mut Self) {
        match (self.storage.tag(), other.storage.tag()) {
            (None, None) => {}
            (None, Some(_)) => self.storage = other.storage.take_all(),
            (Some(_), None) => other.storage = self.storage.take_all(),
            (Some(tag), Some(other_tag)) if tag == other_tag => {
                self.storage.swap_same(&mut other.storage)
            }
            (Some(_), Some(_)) => {
                let mine = self.storage.take_all();
                self.storage = other.storage.take_all();
                other.storage = mine;
            }
        }
    }
}
