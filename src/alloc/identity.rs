/*!
 * Test Identity
 * Resolution of caller-supplied identities to display names
 */

use crate::core::errors::{AllocError, AllocResult};

/// Record keys accepted as a test name, in lookup order
const NAME_KEYS: [&str; 4] = ["name", "tname", "testname", "test_name"];

/// Anything a test name can be derived from.
///
/// Implementors resolve themselves to a display name; `None` means the
/// identity carries no usable name and the request must supply one
/// explicitly.
pub trait TestIdentity {
    fn display_name(&self) -> Option<&str>;
}

impl TestIdentity for &str {
    fn display_name(&self) -> Option<&str> {
        Some(self)
    }
}

impl TestIdentity for String {
    fn display_name(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

/// Heterogeneous identities: a bare string, or a record carrying its name
/// under one of the accepted keys. Anything else resolves to nothing.
impl TestIdentity for serde_json::Value {
    fn display_name(&self) -> Option<&str> {
        match self {
            serde_json::Value::String(s) => Some(s),
            serde_json::Value::Object(map) => NAME_KEYS
                .iter()
                .find_map(|key| map.get(*key).and_then(serde_json::Value::as_str)),
            _ => None,
        }
    }
}

/// Final lookup name: explicit request name wins over the identity,
/// lowercased, with the disambiguating index appended when supplied.
pub(crate) fn resolve_name(
    identity: &dyn TestIdentity,
    explicit: Option<&str>,
    index: Option<u32>,
) -> AllocResult<String> {
    let name = explicit
        .or_else(|| identity.display_name())
        .ok_or(AllocError::IdentityUnresolved)?;
    let mut name = name.to_lowercase();
    if let Some(index) = index {
        name = format!("{name}_{index}");
    }
    Ok(name)
}
