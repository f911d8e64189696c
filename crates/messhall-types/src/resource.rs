//! Four-state lifecycle union for asynchronous call outcomes

/// Lifecycle of an asynchronous value as seen by a caller.
///
/// `Idle` and `Loading` are deliberately distinct: `Idle` means nothing has
/// been requested yet (callers must not react to it), while `Loading` means a
/// request is in flight. Collapsing the two breaks callers that key
/// "don't re-trigger" behavior on the difference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource<T> {
    /// Nothing requested yet.
    Idle,
    /// Request in flight.
    Loading,
    /// Request finished with a value.
    Success(T),
    /// Request failed; the message is operator-readable.
    Error(String),
}

impl<T> Resource<T> {
    /// Whether this is `Idle`.
    #[inline]
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Resource::Idle)
    }

    /// Whether this is `Loading`.
    #[inline]
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Resource::Loading)
    }

    /// The success value, if any.
    #[inline]
    #[must_use]
    pub fn as_success(&self) -> Option<&T> {
        match self {
            Resource::Success(value) => Some(value),
            _ => None,
        }
    }

    /// Map the success value, preserving the other three states.
    #[must_use]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resource<U> {
        match self {
            Resource::Idle => Resource::Idle,
            Resource::Loading => Resource::Loading,
            Resource::Success(value) => Resource::Success(f(value)),
            Resource::Error(message) => Resource::Error(message),
        }
    }
}

impl<T, E: std::fmt::Display> From<Result<T, E>> for Resource<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Resource::Success(value),
            Err(err) => Resource::Error(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_and_loading_stay_distinct() {
        let idle: Resource<u8> = Resource::Idle;
        let loading: Resource<u8> = Resource::Loading;
        assert!(idle.is_idle() && !idle.is_loading());
        assert!(loading.is_loading() && !loading.is_idle());
        assert_ne!(idle, loading);
    }

    #[test]
    fn map_touches_only_success() {
        let doubled = Resource::Success(21).map(|n| n * 2);
        assert_eq!(doubled, Resource::Success(42));

        let err: Resource<i32> = Resource::Error("boom".into());
        assert_eq!(err.map(|n| n * 2), Resource::Error("boom".into()));
    }

    #[test]
    fn from_result_maps_both_arms() {
        let ok: Resource<u8> = Ok::<_, std::io::Error>(7).into();
        assert_eq!(ok, Resource::Success(7));

        let err: Resource<u8> = Err::<u8, _>(std::fmt::Error).into();
        assert!(matches!(err, Resource::Error(_)));
    }
}
