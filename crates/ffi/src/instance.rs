use fire_risk_core::{EngineConfig, RiskEngine};
use std::os::raw::c_char;
use std::ptr;
use std::sync::{Mutex, RwLock};

use crate::error::{DefaultFireRiskError, FireRiskErrorCode};
use crate::helpers::{optional_path, track_error, track_result};

/// The risk scoring context handed to C callers as an opaque pointer.
///
/// # Thread Safety
/// `FireRiskInstance` can be shared across threads. The engine sits behind an
/// `RwLock`:
/// - **Predictions** take a read lock and run concurrently
/// - **Retraining** fits the replacement model on a copy without holding the
///   lock, then takes the write lock only to swap it in
///
/// Concurrent `fire_risk_retrain` calls are serialized by `retrain_lock`: a
/// second call waits for the first to finish, then trains from the engine the
/// first one installed.
pub struct FireRiskInstance {
    pub(crate) engine: RwLock<RiskEngine>,
    pub(crate) retrain_lock: Mutex<()>,
}

impl FireRiskInstance {
    /// Load or train the model described by `config`.
    ///
    /// # Errors
    ///
    /// Returns `FireRiskErrorCode::InitializationFailed` if no usable model could be produced.
    pub(crate) fn new(config: EngineConfig) -> Result<Box<Self>, DefaultFireRiskError> {
        let engine = RiskEngine::initialize(config)
            .map_err(|e| DefaultFireRiskError::initialization_failed(&e))?;
        Ok(Box::new(Self {
            engine: RwLock::new(engine),
            retrain_lock: Mutex::new(()),
        }))
    }
}

/// Create a new risk engine and return it via out-parameter.
///
/// Loads the model artifact at `model_path`, or trains a fresh model from the
/// synthetic corpus and writes it there when the artifact is missing or
/// unreadable. This can take a moment on first start.
///
/// Parameters
/// - `model_path`: NUL-terminated UTF-8 path of the model artifact, or null for
///   the default `forest_fire_model.bin` in the working directory.
/// - `out_instance`: Pointer to receive the created instance. Must be non-null.
///   - On success: set to valid `FireRiskInstance` pointer
///   - On failure: set to null
///
/// Returns
/// - `FireRiskErrorCode::Ok` (0) - success, `out_instance` contains valid pointer
/// - `FireRiskErrorCode::NullPointer` - `out_instance` is null
/// - `FireRiskErrorCode::InvalidInput` - `model_path` is not valid UTF-8
/// - `FireRiskErrorCode::InitializationFailed` - no model could be loaded or trained
///
/// # Safety
///
/// - `out_instance` must be a valid, non-null pointer to writable memory.
/// - `model_path` must be null or point to a NUL-terminated string.
/// - The caller takes ownership of the returned instance and MUST call `fire_risk_destroy`
///   exactly once to avoid memory leaks.
///
/// Example (C)
/// ```c
/// FireRiskInstance* engine = NULL;
/// if (fire_risk_new("models/forest_fire_model.bin", &engine) != Ok) {
///     fprintf(stderr, "Failed to start risk engine: %s\n", fire_risk_get_last_error());
///     return;
/// }
/// // ... use engine ...
/// fire_risk_destroy(engine);
/// ```
#[no_mangle]
pub unsafe extern "C" fn fire_risk_new(
    model_path: *const c_char,
    out_instance: *mut *mut FireRiskInstance,
) -> FireRiskErrorCode {
    if out_instance.is_null() {
        return track_error(&DefaultFireRiskError::null_pointer("out_instance"));
    }

    let config = unsafe { optional_path(model_path) }.map(|path| match path {
        Some(path) => EngineConfig::with_model_path(path),
        None => EngineConfig::default(),
    });

    match track_result(config.and_then(FireRiskInstance::new)) {
        Ok(instance) => {
            unsafe {
                *out_instance = Box::into_raw(instance);
            }
            FireRiskErrorCode::Ok
        }
        Err(code) => {
            unsafe {
                // Set to null on error (per documentation contract)
                *out_instance = ptr::null_mut();
            }
            code
        }
    }
}

/// Destroys an instance previously created by `fire_risk_new`.
///
/// Behavior:
/// - If `ptr` is null, this function is a no-op.
/// - Otherwise the engine and its in-memory model are dropped. The artifact on
///   disk is left in place.
///
/// # Safety
/// - The pointer MUST have been created by `fire_risk_new`.
/// - The pointer MUST NOT have been freed already.
/// - After calling this function, the caller must not use the pointer again.
#[no_mangle]
pub unsafe extern "C" fn fire_risk_destroy(ptr: *mut FireRiskInstance) {
    if ptr.is_null() {
        return;
    }

    // SAFETY: The pointer was created by `Box::into_raw` in `fire_risk_new`
    // and has not been freed. Reclaiming the Box runs the destructor.
    unsafe {
        drop(Box::from_raw(ptr));
    }
}
