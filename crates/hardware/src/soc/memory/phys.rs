//! Physical Memory Windows.
//!
//! Maps a physical address range (an AXI BRAM controller or GPIO block in the
//! programmable logic) into the process through `/dev/mem`, and exposes it as a
//! [`Device`] with volatile 32-bit accesses. Requires root or `CAP_SYS_RAWIO`.
//!
//! The window does not have to start on a page boundary: the mapping is made
//! from the enclosing page and accesses are shifted by the in-page offset.

use std::fs::OpenOptions;
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::AsRawFd;
use std::ptr;

use crate::common::{BringupError, Result};
use crate::soc::traits::{Device, check_word_access};

/// Device node exposing physical memory.
const DEV_MEM: &str = "/dev/mem";

/// A `/dev/mem` mapping of one physical region.
#[derive(Debug)]
pub struct PhysRegion {
    /// Region name used in diagnostics.
    name: String,
    /// Physical base address of the region.
    base_addr: u64,
    /// Region size in bytes, as requested.
    size: u64,
    /// Start of the page-aligned mapping.
    map_ptr: *mut u8,
    /// Length of the page-aligned mapping.
    map_len: usize,
    /// Offset of `base_addr` inside the mapping.
    page_offset: usize,
}

impl PhysRegion {
    /// Maps `size` bytes of physical memory starting at `base_addr`.
    ///
    /// # Errors
    ///
    /// Returns [`BringupError::Io`] when `/dev/mem` cannot be opened and
    /// [`BringupError::Map`] when `mmap` rejects the window.
    pub fn map(name: impl Into<String>, base_addr: u64, size: u64) -> Result<Self> {
        let name = name.into();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_SYNC)
            .open(DEV_MEM)
            .map_err(|e| BringupError::io(DEV_MEM, e))?;

        // SAFETY: sysconf has no preconditions.
        let page_size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
        if page_size <= 0 {
            return Err(BringupError::Map {
                base: base_addr,
                size,
                reason: "could not determine page size".to_string(),
            });
        }
        let page_size = page_size as u64;
        let page_base = base_addr & !(page_size - 1);
        let page_offset = (base_addr - page_base) as usize;
        let map_len = page_offset + size as usize;

        // SAFETY: a fresh shared mapping is requested (no fixed address), the fd
        // is valid for the duration of the call, and the result is checked
        // against MAP_FAILED before use.
        let map_ptr = unsafe {
            libc::mmap(
                ptr::null_mut(),
                map_len,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_SHARED,
                file.as_raw_fd(),
                page_base as libc::off_t,
            )
        };

        if map_ptr == libc::MAP_FAILED {
            return Err(BringupError::Map {
                base: base_addr,
                size,
                reason: std::io::Error::last_os_error().to_string(),
            });
        }

        tracing::debug!("mapped {name} at {base_addr:#x} ({size:#x} bytes)");

        Ok(Self {
            name,
            base_addr,
            size,
            map_ptr: map_ptr.cast::<u8>(),
            map_len,
            page_offset,
        })
    }

    /// Returns a pointer to the word at `offset` after bounds checking.
    fn word_ptr(&self, offset: u64) -> *mut u32 {
        check_word_access(&self.name, offset, self.size);
        // SAFETY: the bounds check above keeps the word inside the mapping.
        unsafe {
            self.map_ptr
                .add(self.page_offset + offset as usize)
                .cast::<u32>()
        }
    }
}

impl Device for PhysRegion {
    fn name(&self) -> &str {
        &self.name
    }

    fn address_range(&self) -> (u64, u64) {
        (self.base_addr, self.size)
    }

    fn read_u32(&mut self, offset: u64) -> u32 {
        let p = self.word_ptr(offset);
        // SAFETY: `p` is aligned and inside the live mapping; volatile because
        // the hardware can change the value between reads.
        unsafe { ptr::read_volatile(p) }
    }

    fn write_u32(&mut self, offset: u64, val: u32) {
        let p = self.word_ptr(offset);
        // SAFETY: `p` is aligned and inside the live mapping; volatile because
        // every store is a bus transaction with side effects.
        unsafe { ptr::write_volatile(p, val) }
    }
}

impl Drop for PhysRegion {
    fn drop(&mut self) {
        // SAFETY: `map_ptr`/`map_len` describe the mapping created in `map`,
        // and drop runs at most once.
        let rc = unsafe { libc::munmap(self.map_ptr.cast::<libc::c_void>(), self.map_len) };
        if rc != 0 {
            tracing::warn!("munmap of {} failed", self.name);
        }
    }
}
