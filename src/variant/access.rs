use super::{
    AltType, Variant,
    repr::{Alt, AltList, Split},
};
use crate::{error::BadVariantAccess, tag::Tag};

impl<S: AltList> Variant<S> {
    /// Returns whether the alternative at index tag `U` is active.
    pub fn holds_at<U: Tag>(&self) -> bool
    where
        S: Alt<U>,
    {
        self.storage.tag() == Some(U::VALUE)
    }

    /// Returns whether the alternative of type `T` is active.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tvariant::Variant;
    ///
    /// let v: Variant![i32, String] = Variant::new(1i32);
    /// assert!(v.holds::<i32, _>());
    /// assert!(!v.holds::<String, _>());
    /// ```
    pub fn holds<T, U: Tag>(&self) -> bool
    where
        S: Split<T, U>,
    {
        self.holds_at::<U>()
    }

    pub fn get_at_if<U: Tag>(&self) -> Option<&AltType<S, U>>
    where
        S: Alt<U>,
    {
        self.storage.get::<U>()
    }

    pub fn get_at_if_mut<U: Tag>(&mut self) -> Option<&mut AltType<S, U>>
    where
        S: Alt<U>,
    {
        self.storage.get_mut::<U>()
    }

    pub fn get_if<T, U: Tag>(&self) -> Option<&T>
    where
        S: Split<T, U>,
    {
        self.get_at_if::<U>()
    }

    pub fn get_if_mut<T, U: Tag>(&mut self) -> Option<&mut T>
    where
        S: Split<T, U>,
    {
        self.get_at_if_mut::<U>()
    }

    /// Returns the alternative at index tag `U`, or an error naming the
    /// active alternative.
    pub fn get_at<U: Tag>(&self) -> Result<&AltType<S, U>, BadVariantAccess>
    where
        S: Alt<U>,
    {
        let active = self.index();
        self.get_at_if::<U>()
            .ok_or_else(|| BadVariantAccess::new(U::INDEX, active))
    }

    pub fn get_at_mut<U: Tag>(&mut self) -> Result<&mut AltType<S, U>, BadVariantAccess>
    where
        S: Alt<U>,
    {
        let active = self.index();
        self.get_at_if_mut::<U>()
            .ok_or_else(|| BadVariantAccess::new(U::INDEX, active))
    }

    /// Returns the alternative of type `T`, or an error naming the active
    /// alternative.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tvariant::{BadVariantAccess, Variant};
    ///
    /// let v: Variant![i32, String] = Variant::new(1i32);
    /// assert_eq!(v.get::<i32, _>(), Ok(&1));
    /// assert_eq!(
    ///     v.get::<String, _>(),
    ///     Err(BadVariantAccess::WrongAlternative { requested: 1, active: 0 }),
    /// );
    /// ```
    pub fn get<T, U: Tag>(&self) -> Result<&T, BadVariantAccess>
    where
        S: Split<T, U>,
    {
        self.get_at::<U>()
    }

    pub fn get_mut<T, U: Tag>(&mut self) -> Result<&mut T, BadVariantAccess>
    where
        S: Split<T, U>,
    {
        self.get_at_mut::<U>()
    }

    /// Moves the alternative at index tag `U` out, or gives the variant back
    /// untouched.
    pub fn try_unwrap_at<U: Tag>(mut self) -> Result<AltType<S, U>, Self>
    where
        S: Alt<U>,
    {
        match self.storage.take::<U>() {
            Some(value) => Ok(value),
            None => Err(self),
        }
    }

    pub fn try_unwrap<T, U: Tag>(self) -> Result<T, Self>
    where
        S: Split<T, U>,
    {
        self.try_unwrap_at::<U>()
    }
}
