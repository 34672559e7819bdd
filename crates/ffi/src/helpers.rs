use crate::error::{with_last_error_mut, DefaultFireRiskError, FireRiskError, FireRiskErrorCode};
use crate::instance::FireRiskInstance;
use std::ffi::{c_char, CStr, CString};
use std::path::PathBuf;

/// Set the thread-local error message and code.
/// Internal helper for FFI functions to record failure details.
/// Accepts any type implementing `FireRiskError` trait.
pub(crate) fn set_last_error(error: &impl FireRiskError) {
    with_last_error_mut(|(cstring, code)| {
        *cstring = CString::new(error.msg()).ok();
        *code = error.code();
    });
}

/// Track an error by setting it in thread-local storage and returning its code.
#[inline]
pub(crate) fn track_error(error: &impl FireRiskError) -> FireRiskErrorCode {
    set_last_error(error);
    error.code()
}

/// Record the error of a failed result and hand back its code, or clear the
/// last error and pass the value through.
pub(crate) fn track_result<T, E: FireRiskError>(result: Result<T, E>) -> Result<T, FireRiskErrorCode> {
    match result {
        Ok(value) => {
            clear_last_error();
            Ok(value)
        }
        Err(error) => Err(track_error(&error)),
    }
}

/// Clear the thread-local error message and code.
/// Internal helper called on successful operations.
pub(crate) fn clear_last_error() {
    with_last_error_mut(|(cstring, code)| {
        *cstring = None;
        *code = FireRiskErrorCode::Ok;
    });
}

/// Borrow the instance behind an opaque handle.
///
/// # Safety
/// `ptr` must be null or a live pointer returned by `fire_risk_new`.
pub(crate) unsafe fn instance_from_ptr<'a>(
    ptr: *const FireRiskInstance,
) -> Result<&'a FireRiskInstance, DefaultFireRiskError> {
    // SAFETY: caller guarantees a non-null `ptr` came from `fire_risk_new`.
    unsafe { ptr.as_ref() }.ok_or_else(|| DefaultFireRiskError::null_pointer("ptr"))
}

/// Read an optional path argument. Null selects the default artifact location.
///
/// # Safety
/// `path` must be null or point to a NUL-terminated string.
pub(crate) unsafe fn optional_path(
    path: *const c_char,
) -> Result<Option<PathBuf>, DefaultFireRiskError> {
    if path.is_null() {
        return Ok(None);
    }
    // SAFETY: non-null and NUL-terminated per the caller contract.
    let raw = unsafe { CStr::from_ptr(path) };
    raw.to_str()
        .map(|s| Some(PathBuf::from(s)))
        .map_err(|e| DefaultFireRiskError::invalid_input(format!("model_path is not valid UTF-8: {e}")))
}
