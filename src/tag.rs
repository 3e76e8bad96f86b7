//! Type-level alternative indices.
//!
//! An index is a Peano number: [`UTerm`] is zero and [`UInt<U>`] is the
//! successor of `U`. Every index type is zero-sized and can be produced as a
//! value through [`Tag::MARKER`], which is how index visitation hands the
//! resolved indices to a visitor.

use core::{fmt, marker::PhantomData};

pub struct UTerm;

pub struct UInt<U>(PhantomData<U>);

pub trait Tag: Sized {
    /// The runtime value of this index, as stored in a variant's marker.
    const VALUE: u8;

    /// [`Tag::VALUE`] widened for comparison against [`Variant::index`].
    ///
    /// [`Variant::index`]: crate::Variant::index
    const INDEX: usize = Self::VALUE as usize;

    /// The zero-sized value of this index.
    const MARKER: Self;
}

impl Tag for UTerm {
    const VALUE: u8 = 0;
    const MARKER: Self = UTerm;
}

impl<U: Tag> Tag for UInt<U> {
    const VALUE: u8 = 1 + U::VALUE;
    const MARKER: Self = UInt(PhantomData);
}

impl fmt::Debug for UTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U0")
    }
}

impl<U: Tag> fmt::Debug for UInt<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U{}", Self::VALUE)
    }
}

pub type U0 = UTerm;
pub type U1 = UInt<U0>;
pub type U2 = UInt<U1>;
pub type U3 = UInt<U2>;
pub type U4 = UInt<U3>;
pub type U5 = UInt<U4>;
pub type U6 = UInt<U5>;
pub type U7 = UInt<U6>;
pub type U8 = UInt<U7>;
pub type U9 = UInt<U8>;

pub type U10 = UInt<U9>;
pub type U11 = UInt<U10>;
pub type U12 = UInt<U11>;
