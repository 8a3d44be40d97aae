use pickqueue_core_types::RequestId;
use thiserror::Error;

/// Result type alias using QueueError
pub type Result<T> = std::result::Result<T, QueueError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that the presentation layer and
/// tests can match on without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Membership
    DuplicateMember,
    MemberNotFound,
    InvalidName,

    // Rotation
    EmptyQueue,
    CannotDefer,
    NotCurrentPicker,

    // Queries
    InvalidLimit,

    // Integrity
    /// Stored positions are not the dense permutation 1..=N
    CorruptQueue,

    // Integration/IO
    StorageFailure,
    Io,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::DuplicateMember => "ERR_DUPLICATE_MEMBER",
            ExErrorKind::MemberNotFound => "ERR_MEMBER_NOT_FOUND",
            ExErrorKind::InvalidName => "ERR_INVALID_NAME",
            ExErrorKind::EmptyQueue => "ERR_EMPTY_QUEUE",
            ExErrorKind::CannotDefer => "ERR_CANNOT_DEFER",
            ExErrorKind::NotCurrentPicker => "ERR_NOT_CURRENT_PICKER",
            ExErrorKind::InvalidLimit => "ERR_INVALID_LIMIT",
            ExErrorKind::CorruptQueue => "ERR_CORRUPT_QUEUE",
            ExErrorKind::StorageFailure => "ERR_STORAGE_FAILURE",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Whether the caller may reasonably retry the same operation unchanged
    pub fn is_retryable(&self) -> bool {
        matches!(self, ExErrorKind::StorageFailure | ExErrorKind::Io)
    }
}

/// Canonical structured error type
///
/// Carries a classification plus optional context (operation, member name,
/// position, request id) for logging and rendering.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    member: Option<String>,
    current_picker: Option<String>,
    position: Option<u32>,
    request_id: Option<RequestId>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            member: None,
            current_picker: None,
            position: None,
            request_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add member name context
    pub fn with_member(mut self, name: impl Into<String>) -> Self {
        self.member = Some(name.into());
        self
    }

    /// Add the name of the member who actually holds position 1
    pub fn with_current_picker(mut self, name: impl Into<String>) -> Self {
        self.current_picker = Some(name.into());
        self
    }

    /// Add position context
    pub fn with_position(mut self, position: u32) -> Self {
        self.position = Some(position);
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn member(&self) -> Option<&str> {
        self.member.as_deref()
    }

    pub fn current_picker(&self) -> Option<&str> {
        self.current_picker.as_deref()
    }

    pub fn position(&self) -> Option<u32> {
        self.position
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(member) = &self.member {
            write!(f, " (member: {})", member)?;
        }
        if let Some(position) = self.position {
            write!(f, " (position: {})", position)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Domain error taxonomy for queue operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueueError {
    /// A member with the same name (case-insensitive) already exists
    #[error("{name} is already in the queue")]
    DuplicateMember { name: String },

    /// No member matches the given name (case-insensitive)
    #[error("Member not found: {name}")]
    MemberNotFound { name: String },

    /// Name is blank after normalization
    #[error("Invalid member name: {name:?}")]
    InvalidName { name: String },

    /// Operation requires at least one member
    #[error("The queue is empty")]
    EmptyQueue,

    /// Defer on a single-member queue
    #[error("{name} cannot defer: they are the only member in the queue")]
    CannotDefer { name: String },

    /// Defer requested by someone other than the position-1 member
    #[error("{name} is not the current picker (current picker: {current})")]
    NotCurrentPicker { name: String, current: String },

    /// History limit outside [1, 50]
    #[error("History limit {limit} is out of range")]
    InvalidLimit { limit: i64 },

    /// Positions read back from storage are not a dense permutation
    #[error("Queue positions are corrupt: {reason}")]
    CorruptQueue { reason: String },

    /// Persistence layer failed
    #[error("Storage failure: {message}")]
    Storage { message: String },
}

/// Conversion from QueueError to the canonical ExError
impl From<QueueError> for ExError {
    fn from(err: QueueError) -> Self {
        match err {
            QueueError::DuplicateMember { name } => ExError::new(ExErrorKind::DuplicateMember)
                .with_member(name)
                .with_message("Member already exists"),

            QueueError::MemberNotFound { name } => ExError::new(ExErrorKind::MemberNotFound)
                .with_member(name)
                .with_message("Member not found"),

            QueueError::InvalidName { name } => ExError::new(ExErrorKind::InvalidName)
                .with_member(name)
                .with_message("Member name must not be blank"),

            QueueError::EmptyQueue => {
                ExError::new(ExErrorKind::EmptyQueue).with_message("The queue is empty")
            }

            QueueError::CannotDefer { name } => ExError::new(ExErrorKind::CannotDefer)
                .with_member(name)
                .with_message("Cannot defer with only one member in the queue"),

            QueueError::NotCurrentPicker { name, current } => {
                ExError::new(ExErrorKind::NotCurrentPicker)
                    .with_member(name)
                    .with_current_picker(current)
                    .with_message("Only the current picker can defer")
            }

            QueueError::InvalidLimit { limit } => ExError::new(ExErrorKind::InvalidLimit)
                .with_message(format!("History limit {} is outside [1, 50]", limit)),

            QueueError::CorruptQueue { reason } => {
                ExError::new(ExErrorKind::CorruptQueue).with_message(reason)
            }

            QueueError::Storage { message } => {
                ExError::new(ExErrorKind::StorageFailure).with_message(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_codes() {
        let cases = [
            (ExErrorKind::DuplicateMember, "ERR_DUPLICATE_MEMBER"),
            (ExErrorKind::MemberNotFound, "ERR_MEMBER_NOT_FOUND"),
            (ExErrorKind::EmptyQueue, "ERR_EMPTY_QUEUE"),
            (ExErrorKind::CannotDefer, "ERR_CANNOT_DEFER"),
            (ExErrorKind::NotCurrentPicker, "ERR_NOT_CURRENT_PICKER"),
            (ExErrorKind::InvalidLimit, "ERR_INVALID_LIMIT"),
            (ExErrorKind::StorageFailure, "ERR_STORAGE_FAILURE"),
        ];
        for (kind, expected_code) in cases {
            assert_eq!(kind.code(), expected_code, "Wrong code for {:?}", kind);
        }
    }

    #[test]
    fn test_not_current_picker_carries_both_names() {
        let err: ExError = QueueError::NotCurrentPicker {
            name: "Bob".into(),
            current: "Alice".into(),
        }
        .into();
        assert_eq!(err.kind(), ExErrorKind::NotCurrentPicker);
        assert_eq!(err.member(), Some("Bob"));
        assert_eq!(err.current_picker(), Some("Alice"));
    }

    #[test]
    fn test_storage_failure_is_retryable() {
        let err: ExError = QueueError::Storage {
            message: "database is locked".into(),
        }
        .into();
        assert!(err.kind().is_retryable());
        assert!(!ExErrorKind::DuplicateMember.is_retryable());
    }

    #[test]
    fn test_display_includes_code_op_and_member() {
        let err = ExError::new(ExErrorKind::MemberNotFound)
            .with_op("remove_member")
            .with_member("Zed")
            .with_message("Member not found");
        let rendered = err.to_string();
        assert!(rendered.starts_with("[ERR_MEMBER_NOT_FOUND]"));
        assert!(rendered.contains("remove_member"));
        assert!(rendered.contains("(member: Zed)"));
    }

    #[test]
    fn test_display_includes_position() {
        let err = ExError::new(ExErrorKind::NotCurrentPicker)
            .with_member("Bob")
            .with_position(3);
        assert_eq!(err.position(), Some(3));
        assert!(err.to_string().ends_with("(member: Bob) (position: 3)"));
    }
}
