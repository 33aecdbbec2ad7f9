//! Configuration for bring-up runs.
//!
//! This module defines the structures that parameterise the handshake. It provides:
//! 1. **Defaults:** The address map and timing of the reference block design.
//! 2. **Structures:** Memory map, GPIO control, data layout, and polling policy.
//! 3. **Loading:** JSON documents where every field is optional.
//!
//! A `Config` is passed explicitly to every run; nothing here is global, so two
//! boards (or a board and a test double) can be driven with independent settings.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::common::{BringupError, Result};

/// Default configuration constants.
///
/// These values match the block design the validation scripts were written for.
mod defaults {
    /// AXI BRAM controller 0 (instruction memory).
    pub const IRAM_BASE: u64 = 0x4000_0000;

    /// AXI BRAM controller 1 (data memory).
    pub const DRAM_BASE: u64 = 0x4200_0000;

    /// AXI GPIO block driving `rst_n` and sampling `done_flag`.
    pub const GPIO_BASE: u64 = 0x4120_0000;

    /// Size of each BRAM window (16 KiB).
    pub const BRAM_SIZE: u64 = 0x4000;

    /// Size of the GPIO register window.
    pub const GPIO_SIZE: u64 = 0x1_0000;

    /// Channel 1 data register: bit 0 drives `rst_n`.
    pub const RESET_REG: u64 = 0x0000;

    /// Channel 1 tri-state register: 0 makes every pin an output.
    pub const TRI_REG: u64 = 0x0004;

    /// Channel 2 data register: bit 0 samples `done_flag`.
    pub const DONE_REG: u64 = 0x0008;

    /// Mask selecting the done bit in `DONE_REG`.
    pub const DONE_MASK: u32 = 0x1;

    /// `rst_n` is active low: 0 holds the core in reset.
    pub const RESET_ACTIVE: u32 = 0x0;

    /// Writing 1 releases the core.
    pub const RESET_INACTIVE: u32 = 0x1;

    /// How long reset is held before release.
    pub const RESET_HOLD_MS: u64 = 100;

    /// Start of the data RAM as seen by the core's load/store unit.
    pub const DATA_RAM_START: u64 = 0x1000;

    /// Offset of the working array from `DATA_RAM_START`.
    pub const ARRAY_START_OFFSET: u64 = 0x0040;

    /// Offset of the status word from `DATA_RAM_START`.
    pub const STATUS_FLAG_OFFSET: u64 = 0x1000;

    /// Number of words in the working array.
    pub const ARRAY_LEN: usize = 32;

    /// Completion marker written by test programs.
    pub const MAGIC: u32 = crate::common::MAGIC_DONE;

    /// Delay between done-flag polls.
    pub const POLL_INTERVAL_MS: u64 = 1;

    /// Give up waiting for done after this long.
    pub const TIMEOUT_MS: u64 = 10_000;

    /// Log a progress line every this many polls.
    pub const PROGRESS_EVERY: u64 = 1000;
}

/// Root configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Physical placement of the three regions.
    #[serde(default)]
    pub memory_map: MemoryMapConfig,
    /// GPIO register layout and reset polarity.
    #[serde(default)]
    pub control: ControlConfig,
    /// Where programs expect their data and status words.
    #[serde(default)]
    pub layout: LayoutConfig,
    /// Polling policy.
    #[serde(default)]
    pub handshake: HandshakeConfig,
}

impl Config {
    /// Parses a configuration from a JSON document. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`BringupError::Config`] on malformed JSON or mistyped fields, and
    /// [`BringupError::InvalidConfig`] if the values fail [`Config::validate`].
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the handshake cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`BringupError::InvalidConfig`] for a zero poll interval, which
    /// would never let a virtual clock reach the deadline.
    pub fn validate(&self) -> Result<()> {
        if self.handshake.poll_interval_ms == 0 {
            return Err(BringupError::InvalidConfig(
                "handshake.poll_interval_ms must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`BringupError::Io`] if the file cannot be read and
    /// [`BringupError::Config`] or [`BringupError::InvalidConfig`] if it does not parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| BringupError::io(path, e))?;
        Self::from_json_str(&text)
    }
}

/// Physical address map of the programmable-logic design.
#[derive(Debug, Clone, Deserialize)]
pub struct MemoryMapConfig {
    /// Instruction BRAM base address.
    #[serde(default = "MemoryMapConfig::default_iram_base")]
    pub iram_base: u64,

    /// Data BRAM base address.
    #[serde(default = "MemoryMapConfig::default_dram_base")]
    pub dram_base: u64,

    /// GPIO register block base address.
    #[serde(default = "MemoryMapConfig::default_gpio_base")]
    pub gpio_base: u64,

    /// Size of each BRAM window in bytes.
    #[serde(default = "MemoryMapConfig::default_bram_size")]
    pub bram_size: u64,

    /// Size of the GPIO window in bytes.
    #[serde(default = "MemoryMapConfig::default_gpio_size")]
    pub gpio_size: u64,
}

impl MemoryMapConfig {
    fn default_iram_base() -> u64 {
        defaults::IRAM_BASE
    }
    fn default_dram_base() -> u64 {
        defaults::DRAM_BASE
    }
    fn default_gpio_base() -> u64 {
        defaults::GPIO_BASE
    }
    fn default_bram_size() -> u64 {
        defaults::BRAM_SIZE
    }
    fn default_gpio_size() -> u64 {
        defaults::GPIO_SIZE
    }
}

impl Default for MemoryMapConfig {
    fn default() -> Self {
        Self {
            iram_base: defaults::IRAM_BASE,
            dram_base: defaults::DRAM_BASE,
            gpio_base: defaults::GPIO_BASE,
            bram_size: defaults::BRAM_SIZE,
            gpio_size: defaults::GPIO_SIZE,
        }
    }
}

/// GPIO register layout and signal polarity.
#[derive(Debug, Clone, Deserialize)]
pub struct ControlConfig {
    /// Offset of the register driving the reset line.
    #[serde(default = "ControlConfig::default_reset_reg")]
    pub reset_reg: u64,

    /// Offset of the channel direction register, written to 0 before reset.
    /// `null` skips the direction setup.
    #[serde(default = "ControlConfig::default_tri_reg")]
    pub tri_reg: Option<u64>,

    /// Offset of the register sampling the done flag.
    #[serde(default = "ControlConfig::default_done_reg")]
    pub done_reg: u64,

    /// Bits of the done register that signal completion.
    #[serde(default = "ControlConfig::default_done_mask")]
    pub done_mask: u32,

    /// Value that holds the core in reset.
    #[serde(default = "ControlConfig::default_reset_active")]
    pub reset_active: u32,

    /// Value that lets the core run.
    #[serde(default = "ControlConfig::default_reset_inactive")]
    pub reset_inactive: u32,

    /// Reset hold time in milliseconds.
    #[serde(default = "ControlConfig::default_reset_hold_ms")]
    pub reset_hold_ms: u64,
}

impl ControlConfig {
    fn default_reset_reg() -> u64 {
        defaults::RESET_REG
    }
    fn default_tri_reg() -> Option<u64> {
        Some(defaults::TRI_REG)
    }
    fn default_done_reg() -> u64 {
        defaults::DONE_REG
    }
    fn default_done_mask() -> u32 {
        defaults::DONE_MASK
    }
    fn default_reset_active() -> u32 {
        defaults::RESET_ACTIVE
    }
    fn default_reset_inactive() -> u32 {
        defaults::RESET_INACTIVE
    }
    fn default_reset_hold_ms() -> u64 {
        defaults::RESET_HOLD_MS
    }

    /// Reset hold time as a `Duration`.
    pub const fn reset_hold(&self) -> Duration {
        Duration::from_millis(self.reset_hold_ms)
    }

    /// Returns `true` if any done bit is set in a raw done-register value.
    pub const fn is_done(&self, status: u32) -> bool {
        status & self.done_mask != 0
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            reset_reg: defaults::RESET_REG,
            tri_reg: Some(defaults::TRI_REG),
            done_reg: defaults::DONE_REG,
            done_mask: defaults::DONE_MASK,
            reset_active: defaults::RESET_ACTIVE,
            reset_inactive: defaults::RESET_INACTIVE,
            reset_hold_ms: defaults::RESET_HOLD_MS,
        }
    }
}

/// Data-memory layout shared with the test programs.
#[derive(Debug, Clone, Deserialize)]
pub struct LayoutConfig {
    /// Start of the data RAM region used by programs.
    #[serde(default = "LayoutConfig::default_data_ram_start")]
    pub data_ram_start: u64,

    /// Offset of the working array from `data_ram_start`.
    #[serde(default = "LayoutConfig::default_array_start_offset")]
    pub array_start_offset: u64,

    /// Offset of the status word from `data_ram_start`.
    #[serde(default = "LayoutConfig::default_status_flag_offset")]
    pub status_flag_offset: u64,

    /// Number of words in the working array.
    #[serde(default = "LayoutConfig::default_array_len")]
    pub array_len: usize,

    /// Completion marker programs write to the status word.
    #[serde(default = "LayoutConfig::default_magic")]
    pub magic: u32,
}

impl LayoutConfig {
    fn default_data_ram_start() -> u64 {
        defaults::DATA_RAM_START
    }
    fn default_array_start_offset() -> u64 {
        defaults::ARRAY_START_OFFSET
    }
    fn default_status_flag_offset() -> u64 {
        defaults::STATUS_FLAG_OFFSET
    }
    fn default_array_len() -> usize {
        defaults::ARRAY_LEN
    }
    fn default_magic() -> u32 {
        defaults::MAGIC
    }

    /// Data-memory offset of the first array word.
    pub const fn array_base(&self) -> u64 {
        self.data_ram_start + self.array_start_offset
    }

    /// Data-memory offset of the status word.
    pub const fn status_addr(&self) -> u64 {
        self.data_ram_start + self.status_flag_offset
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            data_ram_start: defaults::DATA_RAM_START,
            array_start_offset: defaults::ARRAY_START_OFFSET,
            status_flag_offset: defaults::STATUS_FLAG_OFFSET,
            array_len: defaults::ARRAY_LEN,
            magic: defaults::MAGIC,
        }
    }
}

/// Done-flag polling policy.
#[derive(Debug, Clone, Deserialize)]
pub struct HandshakeConfig {
    /// Delay between polls in milliseconds.
    #[serde(default = "HandshakeConfig::default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Deadline in milliseconds, measured from reset release.
    #[serde(default = "HandshakeConfig::default_timeout_ms")]
    pub timeout_ms: u64,

    /// Emit a progress line every this many polls (0 disables).
    #[serde(default = "HandshakeConfig::default_progress_every")]
    pub progress_every: u64,
}

impl HandshakeConfig {
    fn default_poll_interval_ms() -> u64 {
        defaults::POLL_INTERVAL_MS
    }
    fn default_timeout_ms() -> u64 {
        defaults::TIMEOUT_MS
    }
    fn default_progress_every() -> u64 {
        defaults::PROGRESS_EVERY
    }

    /// Delay between polls.
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Polling deadline.
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for HandshakeConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: defaults::POLL_INTERVAL_MS,
            timeout_ms: defaults::TIMEOUT_MS,
            progress_every: defaults::PROGRESS_EVERY,
        }
    }
}
