//! Error types for wasmlog.
//!
//! Every error carries a stable code so that host faults can be matched in
//! logs without parsing messages. Startup errors (E1xx) are unrecoverable for
//! the process; bridge errors (E2xx) terminate the guest call that raised them.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for wasmlog operations.
#[derive(Error, Debug)]
pub enum WasmlogError {
    // =========================================================================
    // Module Acquisition Errors (E100-E199)
    // =========================================================================
    /// The module artifact could not be read.
    #[error("E101: Failed to read module at {path}: {cause}")]
    ModuleRead {
        /// Location of the artifact.
        path: PathBuf,
        /// Reason for the failure.
        cause: String,
    },

    /// The module bytes did not compile.
    #[error("E102: Failed to compile module '{module}': {cause}")]
    ModuleCompile {
        /// Module name.
        module: String,
        /// Reason for the failure.
        cause: String,
    },

    /// Instantiation failed (unresolved imports, start function trap, limits).
    #[error("E103: Failed to instantiate module '{module}': {cause}")]
    Instantiate {
        /// Module name.
        module: String,
        /// Reason for the failure.
        cause: String,
    },

    /// A required export is missing from the instance.
    #[error("E104: Module '{module}' does not export '{export}'")]
    MissingExport {
        /// Module name.
        module: String,
        /// The missing export.
        export: String,
    },

    // =========================================================================
    // Bridge Errors (E200-E299)
    // =========================================================================
    /// The calling instance exposes no linear memory.
    #[error("E201: Host function '{function}' called by an instance without exported memory")]
    MissingMemory {
        /// The host function that needed memory.
        function: String,
    },

    /// The module declares the bridge import with an unusable signature.
    #[error("E202: Invalid signature for import '{import}': {cause}")]
    ImportSignature {
        /// Fully qualified import (`namespace::name`).
        import: String,
        /// Description of the mismatch.
        cause: String,
    },

    /// A memory view reached past the end of linear memory.
    #[error(
        "E203: Boundary violation: range [{ptr}, {ptr}+{len}) exceeds memory size {memory_size}"
    )]
    BoundaryViolation {
        /// Start offset.
        ptr: u32,
        /// Byte count.
        len: u32,
        /// Memory size at the time of the access.
        memory_size: usize,
    },

    /// A host function could not be registered.
    #[error("E204: Host function '{function}' failed: {cause}")]
    HostFunction {
        /// The host function name.
        function: String,
        /// Reason for the failure.
        cause: String,
    },

    // =========================================================================
    // Invocation Errors (E300-E399)
    // =========================================================================
    /// The guest trapped during a call.
    #[error("E301: Guest trapped in '{function}': {cause}")]
    GuestTrap {
        /// The export being called.
        function: String,
        /// Trap description.
        cause: String,
    },

    /// The export to call does not exist or is not a function.
    #[error("E302: Module '{module}' has no function export '{export}'")]
    ExportNotFound {
        /// Module name.
        module: String,
        /// The requested export.
        export: String,
    },

    // =========================================================================
    // Process State Errors (E400-E499)
    // =========================================================================
    /// The process-wide instance was used before startup completed.
    #[error("E401: Module instance is not initialized")]
    NotInitialized,

    /// The process-wide instance was installed twice.
    #[error("E402: Module instance is already initialized")]
    AlreadyInitialized,

    // =========================================================================
    // Configuration Errors (E800-E899)
    // =========================================================================
    /// Configuration file could not be parsed.
    #[error("E801: Failed to parse config at {path}: {cause}")]
    ConfigParse {
        /// The config file.
        path: PathBuf,
        /// Reason for the parse failure.
        cause: String,
    },

    /// A configuration value is invalid.
    #[error("E802: Invalid config value for '{field}': {cause}")]
    ConfigValue {
        /// The offending field.
        field: String,
        /// Why the value was rejected.
        cause: String,
    },

    // =========================================================================
    // I/O Errors (E900-E999)
    // =========================================================================
    /// Generic I/O error.
    #[error("E901: I/O error at {path}: {source}")]
    Io {
        /// The path involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for wasmlog operations.
pub type Result<T> = std::result::Result<T, WasmlogError>;

impl WasmlogError {
    /// Get the error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::ModuleRead { .. } => "E101",
            Self::ModuleCompile { .. } => "E102",
            Self::Instantiate { .. } => "E103",
            Self::MissingExport { .. } => "E104",
            Self::MissingMemory { .. } => "E201",
            Self::ImportSignature { .. } => "E202",
            Self::BoundaryViolation { .. } => "E203",
            Self::HostFunction { .. } => "E204",
            Self::GuestTrap { .. } => "E301",
            Self::ExportNotFound { .. } => "E302",
            Self::NotInitialized => "E401",
            Self::AlreadyInitialized => "E402",
            Self::ConfigParse { .. } => "E801",
            Self::ConfigValue { .. } => "E802",
            Self::Io { .. } => "E901",
        }
    }

    /// Check if this error happened while acquiring or instantiating a module.
    #[must_use]
    pub fn is_startup_error(&self) -> bool {
        matches!(
            self,
            Self::ModuleRead { .. }
                | Self::ModuleCompile { .. }
                | Self::Instantiate { .. }
                | Self::MissingExport { .. }
                | Self::ImportSignature { .. }
        )
    }

    /// Check if this error terminates the guest operation that raised it.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::BoundaryViolation { .. } | Self::MissingMemory { .. } | Self::GuestTrap { .. }
        )
    }
}
