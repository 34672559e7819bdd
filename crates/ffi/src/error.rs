use fire_risk_core::{PredictError, RetrainError, TrainingError};
use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

/// Common interface for FFI error types.
///
/// This trait provides a unified way to handle errors across the FFI boundary,
/// allowing both simple error codes and custom error messages.
///
/// # Design
/// - `code()` - Returns the error code to be passed across FFI boundary
/// - `msg()` - Returns the error message for diagnostic purposes
pub(crate) trait FireRiskError {
    /// Returns the error code to be returned across the FFI boundary.
    fn code(&self) -> FireRiskErrorCode;

    /// Returns the human-readable error message.
    fn msg(&self) -> &str;
}

/// Default implementation of `FireRiskError` for the boundary's failure cases.
///
/// Wraps a `FireRiskErrorCode` with a message and provides one constructor
/// per error kind (except Ok, which represents success).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefaultFireRiskError {
    code: FireRiskErrorCode,
    msg: String,
}

impl DefaultFireRiskError {
    /// Create error for null pointer passed where non-null required.
    ///
    /// # Arguments
    /// * `param_name` - The name of the parameter that was null (e.g., `"out_instance"`, `"ptr"`)
    pub fn null_pointer(param_name: &str) -> Self {
        Self {
            code: FireRiskErrorCode::NullPointer,
            msg: format!("Parameter '{param_name}' cannot be null"),
        }
    }

    /// Create error for poisoned lock.
    ///
    /// # Arguments
    /// * `lock_name` - The name of the lock that was poisoned (e.g., `"RwLock"`)
    pub fn lock_poisoned(lock_name: &str) -> Self {
        Self {
            code: FireRiskErrorCode::LockPoisoned,
            msg: format!("Lock '{lock_name}' was poisoned by a panic in another thread"),
        }
    }

    /// Create error for a malformed argument.
    pub fn invalid_input(message: String) -> Self {
        Self {
            code: FireRiskErrorCode::InvalidInput,
            msg: message,
        }
    }

    /// Create error for a startup that produced no usable model.
    pub fn initialization_failed(error: &TrainingError) -> Self {
        Self {
            code: FireRiskErrorCode::InitializationFailed,
            msg: format!("Engine initialization failed: {error}"),
        }
    }
}

impl FireRiskError for DefaultFireRiskError {
    fn code(&self) -> FireRiskErrorCode {
        self.code
    }

    fn msg(&self) -> &str {
        &self.msg
    }
}

impl From<PredictError> for DefaultFireRiskError {
    fn from(error: PredictError) -> Self {
        let code = match error {
            PredictError::InvalidInput { .. } => FireRiskErrorCode::InvalidInput,
            PredictError::NonFiniteOutput(_) => FireRiskErrorCode::PredictionFailed,
        };
        Self {
            code,
            msg: error.to_string(),
        }
    }
}

impl From<RetrainError> for DefaultFireRiskError {
    fn from(error: RetrainError) -> Self {
        let code = match error {
            RetrainError::Training(_) => FireRiskErrorCode::InitializationFailed,
            RetrainError::Persist(_) => FireRiskErrorCode::PersistFailed,
        };
        Self {
            code,
            msg: format!("Retrain failed, previous model kept: {error}"),
        }
    }
}

/// FFI error codes returned by fire risk functions.
/// Follows standard C convention: 0 = success, non-zero = error.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireRiskErrorCode {
    /// Operation completed successfully.
    Ok = 0,

    /// Invalid pointer: null pointer passed where non-null required.
    NullPointer = 1,

    /// Lock poisoned: internal synchronization primitive was poisoned by a panic.
    LockPoisoned = 2,

    /// A feature value was NaN or infinite, or a string argument was not valid UTF-8.
    InvalidInput = 3,

    /// The model produced a non-finite output.
    PredictionFailed = 4,

    /// No usable model could be loaded or trained.
    InitializationFailed = 5,

    /// A retrained model could not be written to disk.
    PersistFailed = 6,
}

impl From<DefaultFireRiskError> for FireRiskErrorCode {
    fn from(error: DefaultFireRiskError) -> Self {
        error.code
    }
}

thread_local! {
    /// Thread-local storage for the most recent FFI error (C string, error code).
    /// The CString is stored so the pointer handed out by `fire_risk_get_last_error`
    /// stays valid until the next failing call on this thread.
    static LAST_ERROR: RefCell<(Option<CString>, FireRiskErrorCode)> = const { RefCell::new((None, FireRiskErrorCode::Ok)) };
}

/// Internal helper to read `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error<F, R>(f: F) -> R
where
    F: FnOnce(&(Option<CString>, FireRiskErrorCode)) -> R,
{
    LAST_ERROR.with_borrow(f)
}

/// Internal helper to mutate `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut (Option<CString>, FireRiskErrorCode)) -> R,
{
    LAST_ERROR.with_borrow_mut(f)
}

/// Retrieve the most recent FFI error message as a null-terminated C string.
///
/// Returns:
/// - A borrowed pointer to the error message if an error occurred.
/// - `null` if no error has occurred or the error message cannot be converted to C string.
///
/// # Thread Safety
/// Error messages are stored per-thread (thread-local storage), so this is thread-safe.
///
/// # Lifetime
/// The returned pointer is valid until the next FFI call on this thread that sets
/// or clears the error, or until the thread terminates.
///
/// **DO NOT FREE THIS POINTER** - it is managed internally.
///
/// Example:
/// ```c
/// FireRiskPrediction out;
/// if (fire_risk_predict(engine, 30.0, 40.0, NAN, 5.0, 0.5, &out) != Ok) {
///     const char* error = fire_risk_get_last_error();
///     if (error) {
///         printf("Prediction failed: %s\n", error);
///     }
/// }
/// ```
#[no_mangle]
pub extern "C" fn fire_risk_get_last_error() -> *const c_char {
    with_last_error(|(cstring, _code)| cstring.as_ref().map_or(ptr::null(), |cs| cs.as_ptr()))
}

/// Retrieve the most recent FFI error code.
///
/// Returns `FireRiskErrorCode::Ok` (0) if no error has occurred on this thread,
/// otherwise the code from the last failed operation.
#[no_mangle]
pub extern "C" fn fire_risk_get_last_error_code() -> FireRiskErrorCode {
    with_last_error(|(_cstring, code)| *code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fire_risk_core::Feature;

    #[test]
    fn test_predict_errors_map_to_codes() {
        let invalid: DefaultFireRiskError = PredictError::InvalidInput {
            feature: Feature::Rainfall,
            value: f64::NAN,
        }
        .into();
        assert_eq!(invalid.code(), FireRiskErrorCode::InvalidInput);
        assert!(invalid.msg().contains("rainfall"));

        let non_finite: DefaultFireRiskError = PredictError::NonFiniteOutput(f64::INFINITY).into();
        assert_eq!(non_finite.code(), FireRiskErrorCode::PredictionFailed);
    }

    #[test]
    fn test_null_pointer_message() {
        let err = DefaultFireRiskError::null_pointer("ptr");
        assert_eq!(err.code(), FireRiskErrorCode::NullPointer);
        assert_eq!(err.msg(), "Parameter 'ptr' cannot be null");
    }
}
