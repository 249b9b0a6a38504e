//! Configuration validation

use super::error::ConfigResult;

/// Configuration objects that can check their own field ranges
///
/// # Example
/// ```rust,ignore
/// use heapbounds_ir::config::Validatable;
///
/// fn build_service<C: Validatable>(config: C) -> ConfigResult<()> {
///     config.validate()?;
///     // ...
/// }
/// ```
pub trait Validatable {
    /// `Err(ConfigError)` names the first invalid field
    fn validate(&self) -> ConfigResult<()>;

    /// Name used as the prefix of validation messages
    fn config_name(&self) -> &'static str {
        "Config"
    }
}
