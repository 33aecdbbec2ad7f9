//! Platform construction and the top-level `Platform` type.
//!
//! This module assembles the three regions a run needs. It performs:
//! 1. **Physical mapping:** Opens `/dev/mem` windows at the configured base addresses.
//! 2. **Host-side assembly:** Builds the same layout from `Bram` buffers, for offline runs.
//! 3. **Custom assembly:** Accepts arbitrary `Device` implementations (test doubles, remote links).

use std::fmt;

use crate::config::Config;
use crate::soc::devices::ControlBlock;
use crate::soc::memory::Bram;
use crate::soc::traits::Device;

/// Boxed region, dynamically dispatched so physical and host-side devices mix freely.
pub type Region = Box<dyn Device>;

/// The instruction memory, data memory, and control block of one board.
pub struct Platform {
    /// Instruction BRAM; the core fetches from offset 0 after reset.
    pub iram: Region,
    /// Data BRAM; holds input arrays, result arrays, and the status word.
    pub dram: Region,
    /// GPIO control block driving reset and sampling done.
    pub control: ControlBlock<Region>,
}

impl Platform {
    /// Assembles a platform from already-constructed regions.
    ///
    /// # Arguments
    ///
    /// * `iram` - Instruction memory region.
    /// * `dram` - Data memory region.
    /// * `gpio` - GPIO register region.
    /// * `config` - Configuration supplying the GPIO register layout.
    pub fn new(iram: Region, dram: Region, gpio: Region, config: &Config) -> Self {
        Self {
            iram,
            dram,
            control: ControlBlock::new(gpio, config.control.clone()),
        }
    }

    /// Maps the three regions from physical memory at the configured addresses.
    ///
    /// # Errors
    ///
    /// Returns the first mapping failure; regions mapped before it are released.
    #[cfg(unix)]
    pub fn map_physical(config: &Config) -> crate::common::Result<Self> {
        use crate::soc::memory::phys::PhysRegion;

        let map = &config.memory_map;
        let iram = PhysRegion::map("IRAM", map.iram_base, map.bram_size)?;
        let dram = PhysRegion::map("DRAM", map.dram_base, map.bram_size)?;
        let gpio = PhysRegion::map("GPIO", map.gpio_base, map.gpio_size)?;

        tracing::info!(
            "IRAM @ {:#x}  DRAM @ {:#x}  GPIO @ {:#x}",
            map.iram_base,
            map.dram_base,
            map.gpio_base
        );

        Ok(Self::new(
            Box::new(iram),
            Box::new(dram),
            Box::new(gpio),
            config,
        ))
    }

    /// Builds the same layout out of zeroed host-side buffers.
    ///
    /// Nothing drives the done flag in this layout, so runs against it time out
    /// unless a test double replaces the GPIO region.
    pub fn in_memory(config: &Config) -> Self {
        let map = &config.memory_map;
        Self::new(
            Box::new(Bram::new("IRAM", map.iram_base, map.bram_size)),
            Box::new(Bram::new("DRAM", map.dram_base, map.bram_size)),
            Box::new(Bram::new("GPIO", map.gpio_base, map.gpio_size)),
            config,
        )
    }
}

impl fmt::Debug for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Platform")
            .field("iram", &self.iram.address_range())
            .field("dram", &self.dram.address_range())
            .field("control", self.control.config())
            .finish()
    }
}
