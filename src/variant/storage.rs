use super::repr::{Alt, AltList, RawStorage};
use crate::tag::Tag;

/// [`RawStorage`] paired with the index of its live alternative.
///
/// This is the only place that drops alternatives: [`TaggedStorage::reset`]
/// runs on every transition away from an alternative and on drop.
pub(crate) struct TaggedStorage<S: AltList> {
    tag: Option<u8>,
    raw: RawStorage<S>,
}

impl<S: AltList> TaggedStorage<S> {
    pub(crate) const fn valueless() -> Self {
        TaggedStorage {
            tag: None,
            raw: RawStorage::undefined(),
        }
    }

    pub(crate) fn new_at<U: Tag>(value: S::Type) -> Self
    where
        S: Alt<U>,
    {
        TaggedStorage {
            tag: Some(U::VALUE),
            raw: RawStorage::new_at::<U>(value),
        }
    }

    pub(crate) fn tag(&self) -> Option<u8> {
        self.tag
    }

    /// Drops the live alternative, if any.
    ///
    /// The tag is cleared before the drop runs, so a panicking destructor
    /// leaves the storage valueless instead of pointing at a dead value.
    pub(crate) fn reset(&mut self) {
        if let Some(tag) = self.tag.take() {
            unsafe { self.raw.reset(tag) }
        }
    }

    /// Places alternative `U` into valueless storage.
    pub(crate) fn set<U: Tag>(&mut self, value: S::Type) -> &mut S::Type
    where
        S: Alt<U>,
    {
        debug_assert!(self.tag.is_none(), "setting over a live alternative");
        self.tag = Some(U::VALUE);
        self.raw.set::<U>(value)
    }

    /// Records `tag` as live after the raw storage was written directly.
    ///
    /// # Safety
    ///
    /// The storage must be valueless and hold a live alternative at `tag`.
    pub(crate) unsafe fn mark(&mut self, tag: u8) {
        debug_assert!(self.tag.is_none(), "marking over a live alternative");
        self.tag = Some(tag);
    }

    pub(crate) fn get<U: Tag>(&self) -> Option<&S::Type>
    where
        S: Alt<U>,
    {
        (self.tag == Some(U::VALUE)).then(|| unsafe { self.raw.get::<U>() })
    }

    pub(crate) fn get_mut<U: Tag>(&mut self) -> Option<&mut S::Type>
    where
        S: Alt<U>,
    {
        if self.tag == Some(U::VALUE) {
            Some(unsafe { self.raw.get_mut::<U>() })
        } else {
            None
        }
    }

    /// Moves alternative `U` out, leaving the storage valueless.
    pub(crate) fn take<U: Tag>(&mut self) -> Option<S::Type>
    where
        S: Alt<U>,
    {
        if self.tag != Some(U::VALUE) {
            return None;
        }
        self.tag = None;
        Some(unsafe { self.raw.read::<U>() })
    }

    /// Moves the whole content out, leaving `self` valueless.
    pub(crate) fn take_all(&mut self) -> Self {
        match self.tag.take() {
            None => Self::valueless(),
            Some(tag) => TaggedStorage {
                tag: Some(tag),
                raw: unsafe { core::ptr::read(&self.raw) },
            },
        }
    }

    /// Swaps the payloads of two storages holding the same alternative.
    pub(crate) fn swap_same(&mut self, other: &mut Self) {
        match (self.tag, other.tag) {
            (Some(tag), Some(other_tag)) if tag == other_tag => unsafe {
                self.raw.swap(&mut other.raw, tag)
            },
            (tag, other_tag) => {
                unreachable!("swapping payloads of alternatives {tag:?} and {other_tag:?}")
            }
        }
    }

    pub(crate) fn raw(&self) -> &RawStorage<S> {
        &self.raw
    }

    pub(crate) fn raw_mut(&mut self) -> &mut RawStorage<S> {
        &mut self.raw
    }
}

impl<S: AltList> Drop for TaggedStorage<S> {
    fn drop(&mut self) {
        self.reset()
    }
}
