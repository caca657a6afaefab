/// Opaque backend priority identifier, resolved by name per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityId(pub String);

impl PriorityId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One entry of the backend's priority enumeration.
#[derive(Debug, Clone)]
pub struct Priority {
    pub id: PriorityId,
    pub name: String,
}
