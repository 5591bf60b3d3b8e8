/// Identity of the user a request is acting for
///
/// Session resolution and authentication happen outside this core; every
/// operation that touches user-owned data takes the context explicitly
/// instead of reading ambient session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserContext {
    /// Stable user identifier (the store key for preferences and plans)
    pub user_id: String,
}

impl UserContext {
    /// Create a context for the given user id
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}
