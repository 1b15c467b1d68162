//! Partial-update primitives shared by entity patches.

/// Change to an optional field that callers may also clear.
///
/// Absence of a field in a request maps to [`Clearable::Unchanged`]; an
/// explicit `null` maps to [`Clearable::Clear`].
///
/// # Examples
/// ```
/// use taskboard::domain::Clearable;
///
/// let mut description = Some("draft".to_owned());
/// Clearable::Unchanged.apply_to(&mut description);
/// assert_eq!(description.as_deref(), Some("draft"));
///
/// Clearable::Clear.apply_to(&mut description);
/// assert!(description.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Clearable<T> {
    /// Leave the stored value alone.
    #[default]
    Unchanged,
    /// Remove the stored value.
    Clear,
    /// Replace the stored value.
    Set(T),
}

impl<T> Clearable<T> {
    /// Build from a request field that distinguishes absent from `null`.
    pub fn from_nullable(field: Option<Option<T>>) -> Self {
        match field {
            None => Self::Unchanged,
            Some(None) => Self::Clear,
            Some(Some(value)) => Self::Set(value),
        }
    }

    /// Whether this patch leaves the field untouched.
    pub const fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }

    /// Borrowing view in the absent / `null` / value shape.
    pub fn as_nullable(&self) -> Option<Option<&T>> {
        match self {
            Self::Unchanged => None,
            Self::Clear => Some(None),
            Self::Set(value) => Some(Some(value)),
        }
    }

    /// Write the change into `slot`.
    pub fn apply_to(self, slot: &mut Option<T>) {
        match self {
            Self::Unchanged => {}
            Self::Clear => *slot = None,
            Self::Set(value) => *slot = Some(value),
        }
    }
}

/// Overwrite `slot` when a replacement is present.
pub fn apply_field<T>(replacement: Option<T>, slot: &mut T) {
    if let Some(value) = replacement {
        *slot = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nullable_mapping_distinguishes_absent_and_null() {
        assert_eq!(Clearable::<u8>::from_nullable(None), Clearable::Unchanged);
        assert_eq!(Clearable::<u8>::from_nullable(Some(None)), Clearable::Clear);
        assert_eq!(Clearable::from_nullable(Some(Some(3_u8))), Clearable::Set(3));
    }

    #[test]
    fn set_replaces_existing_value() {
        let mut slot = None;
        Clearable::Set(7_u8).apply_to(&mut slot);
        assert_eq!(slot, Some(7));
    }

    #[test]
    fn apply_field_ignores_absent_replacement() {
        let mut name = "Sprint".to_owned();
        apply_field(None, &mut name);
        assert_eq!(name, "Sprint");
        apply_field(Some("Release".to_owned()), &mut name);
        assert_eq!(name, "Release");
    }
}
