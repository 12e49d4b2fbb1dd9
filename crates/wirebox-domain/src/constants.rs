//! Domain layer constants

/// Separator used when rendering a dependency or cycle path
pub const PATH_SEPARATOR: &str = " -> ";

/// Member name every `Disposable` capability exposes
pub const DISPOSE_MEMBER: &str = "dispose";
