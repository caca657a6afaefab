/// The person a ticket is filed on behalf of.
#[derive(Debug, Clone)]
pub struct Reporter {
    pub email: String,
    pub username: String,
}

/// Opaque backend account identifier, only ever obtained from the backend's
/// user directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountId(pub String);

impl AccountId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
