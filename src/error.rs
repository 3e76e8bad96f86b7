use thiserror::Error;

/// The error returned by signaling retrieval and by value visitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum BadVariantAccess {
    /// A retrieval named an alternative other than the active one.
    #[error(
        "bad variant access: alternative {requested} was requested, \
         but alternative {active} is active"
    )]
    WrongAlternative { requested: usize, active: usize },

    /// The variant holds no alternative.
    ///
    /// `requested` is the index a retrieval asked for; it is `None` when the
    /// access came from visitation.
    #[error("bad variant access: the variant is valueless")]
    Valueless { requested: Option<usize> },
}

impl BadVariantAccess {
    pub(crate) fn new(requested: usize, active: Option<usize>) -> Self {
        match active {
            Some(active) => BadVariantAccess::WrongAlternative { requested, active },
            None => BadVariantAccess::Valueless {
                requested: Some(requested),
            },
        }
    }

    /// Returns whether the access failed because the variant was valueless.
    pub fn is_valueless(&self) -> bool {
        matches!(self, BadVariantAccess::Valueless { .. })
    }
}
