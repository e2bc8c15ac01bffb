/// Explicit "not given" marker for fields where `None` is itself a meaningful
/// value. `Unset` means "fall back to whatever the surrounding machinery
/// considers the default", a `Set` value is taken verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsetOr<T> {
    Unset,
    Set(T),
}

impl<T> UnsetOr<T> {
    pub fn is_unset(&self) -> bool {
        matches!(self, UnsetOr::Unset)
    }

    pub fn is_set(&self) -> bool {
        !self.is_unset()
    }

    pub fn set(&mut self, value: T) {
        *self = UnsetOr::Set(value);
    }

    pub fn as_ref(&self) -> UnsetOr<&T> {
        match self {
            UnsetOr::Unset => UnsetOr::Unset,
            UnsetOr::Set(value) => UnsetOr::Set(value),
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            UnsetOr::Unset => None,
            UnsetOr::Set(value) => Some(value),
        }
    }

    pub fn unwrap_or(self, default: T) -> T {
        match self {
            UnsetOr::Unset => default,
            UnsetOr::Set(value) => value,
        }
    }

    pub fn unwrap_or_else<F: FnOnce() -> T>(self, default: F) -> T {
        match self {
            UnsetOr::Unset => default(),
            UnsetOr::Set(value) => value,
        }
    }
}

impl<T> Default for UnsetOr<T> {
    fn default() -> Self {
        UnsetOr::Unset
    }
}

impl<T> From<Option<T>> for UnsetOr<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            None => UnsetOr::Unset,
            Some(value) => UnsetOr::Set(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unset() {
        let value: UnsetOr<u16> = Default::default();
        assert!(value.is_unset());
        assert_eq!(value.into_option(), None);
    }

    #[test]
    fn set_value_is_kept_verbatim() {
        let mut value = UnsetOr::Unset;
        value.set("text/plain".to_string());
        assert!(value.is_set());
        assert_eq!(value.unwrap_or("fallback".to_string()), "text/plain");
    }

    #[test]
    fn unset_falls_back() {
        let value: UnsetOr<String> = UnsetOr::Unset;
        assert_eq!(value.unwrap_or_else(|| "fallback".to_string()), "fallback");
    }

    #[test]
    fn option_round_trip() {
        assert_eq!(UnsetOr::from(Some(1)), UnsetOr::Set(1));
        assert_eq!(UnsetOr::<i32>::from(None), UnsetOr::Unset);
    }
}
