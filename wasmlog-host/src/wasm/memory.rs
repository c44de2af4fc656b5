//! Memory views into WASM linear memory.
//!
//! A view is only ever materialized as an owned snapshot: the bytes are
//! copied out of linear memory before anything else looks at them, so a
//! guest that mutates or grows its memory later cannot affect a record that
//! was already taken.

use wasmlog_core::error::{Result, WasmlogError};

/// A `(ptr, len)` range within WASM linear memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WasmPtr {
    /// Offset within WASM linear memory.
    pub offset: u32,
    /// Size of the range in bytes.
    pub size: u32,
}

impl WasmPtr {
    /// Create a new WASM pointer.
    pub const fn new(offset: u32, size: u32) -> Self {
        Self { offset, size }
    }

    /// Reinterpret the raw `i32` arguments a guest passes as unsigned.
    pub const fn from_raw(ptr: i32, len: i32) -> Self {
        Self::new(ptr as u32, len as u32)
    }

    /// End offset, exclusive. Computed in 64 bits so it cannot overflow.
    pub const fn end(&self) -> u64 {
        self.offset as u64 + self.size as u64
    }

    /// Whether the range fits in a memory of `memory_size` bytes.
    pub fn fits(&self, memory_size: usize) -> bool {
        self.end() <= memory_size as u64
    }

    fn boundary_violation(&self, memory_size: usize) -> WasmlogError {
        WasmlogError::BoundaryViolation {
            ptr: self.offset,
            len: self.size,
            memory_size,
        }
    }
}

/// Copy the bytes of `ptr` out of `memory`.
///
/// A zero-length range yields an empty snapshot as long as its offset is not
/// past the end of memory.
pub fn snapshot(memory: &[u8], ptr: WasmPtr) -> Result<Vec<u8>> {
    if !ptr.fits(memory.len()) {
        return Err(ptr.boundary_violation(memory.len()));
    }
    let start = ptr.offset as usize;
    let end = start + ptr.size as usize;
    Ok(memory[start..end].to_vec())
}

/// Copy `data` into `memory` at `offset`.
pub fn write_at(memory: &mut [u8], offset: u32, data: &[u8]) -> Result<()> {
    let size = u32::try_from(data.len()).map_err(|_| WasmlogError::BoundaryViolation {
        ptr: offset,
        len: u32::MAX,
        memory_size: memory.len(),
    })?;
    let ptr = WasmPtr::new(offset, size);
    if !ptr.fits(memory.len()) {
        return Err(ptr.boundary_violation(memory.len()));
    }
    let start = offset as usize;
    memory[start..start + data.len()].copy_from_slice(data);
    Ok(())
}

/// Decode a snapshot as UTF-8, substituting U+FFFD for malformed sequences.
pub fn decode_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
