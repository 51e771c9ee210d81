/// Shared types used across the codebase

/// Write operations, used to decide how a constraint violation reads to the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update,
    Delete,
}
