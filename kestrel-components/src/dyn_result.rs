pub type AnyError = Box<dyn std::error::Error + Send + Sync>;
pub type AnyResult<T> = std::result::Result<T, AnyError>;
