//! Primitive type classification
//!
//! Constructor parameters of primitive type are configuration values, not
//! services. They are never resolved from the registry and never count
//! as dependencies.

use once_cell::sync::Lazy;
use std::any::{TypeId, type_name};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};
use wirebox_domain::ParamType;

const OPTION_PREFIX: &str = "core::option::Option<";

/// Type-name prefixes of raw collections and compound builtins
const COLLECTION_PREFIXES: &[&str] = &[
    "alloc::vec::Vec<",
    "alloc::collections::vec_deque::VecDeque<",
    "alloc::collections::btree::map::BTreeMap<",
    "alloc::collections::btree::set::BTreeSet<",
    "std::collections::hash::map::HashMap<",
    "std::collections::hash::set::HashSet<",
    "[",
    "(",
    "&str",
    "&'static str",
];

macro_rules! primitive_table {
    ($($ty:ty),* $(,)?) => {
        vec![$((TypeId::of::<$ty>(), type_name::<$ty>())),*]
    };
}

static PRIMITIVES: Lazy<Vec<(TypeId, &'static str)>> = Lazy::new(|| {
    primitive_table![
        String,
        str,
        &'static str,
        char,
        bool,
        u8,
        u16,
        u32,
        u64,
        u128,
        usize,
        i8,
        i16,
        i32,
        i64,
        i128,
        isize,
        f32,
        f64,
        (),
        Vec<u8>,
        PathBuf,
        Path,
        Duration,
        Instant,
        SystemTime,
        chrono::DateTime<chrono::Utc>,
        chrono::NaiveDate,
        chrono::NaiveTime,
        chrono::NaiveDateTime,
        serde_json::Value,
    ]
});

/// Whether a parameter type is a builtin value rather than a service
///
/// One level of `Option` is unwrapped first. A type declared with
/// [`ParamType::optional`] already carries its inner key, so only a type
/// spelled out as `Option<T>` has its name unwrapped.
pub fn is_primitive_type(ty: &ParamType) -> bool {
    let key = ty.key();
    let name = key.type_name();

    let spelled_option = if ty.is_optional() {
        None
    } else {
        name.strip_prefix(OPTION_PREFIX)
            .and_then(|rest| rest.strip_suffix('>'))
    };
    if let Some(inner) = spelled_option {
        return is_primitive_name(inner);
    }

    PRIMITIVES.iter().any(|(id, _)| *id == key.type_id()) || has_collection_prefix(name)
}

fn is_primitive_name(name: &str) -> bool {
    PRIMITIVES.iter().any(|(_, known)| *known == name) || has_collection_prefix(name)
}

fn has_collection_prefix(name: &str) -> bool {
    COLLECTION_PREFIXES
        .iter()
        .any(|prefix| name.starts_with(prefix))
}
