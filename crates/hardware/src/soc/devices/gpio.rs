//! Reset/Done Control Block.
//!
//! Typed access to the AXI GPIO block that connects the host to the core's
//! control pins.
//!
//! # Registers
//!
//! * `reset_reg` (default `0x00`): Channel 1 data. Bit 0 drives `rst_n`
//!   (active low: `0` = held in reset, `1` = running).
//! * `tri_reg` (default `0x04`): Channel 1 direction. `0` = all outputs.
//! * `done_reg` (default `0x08`): Channel 2 data. Bit 0 samples `done_flag`.

use crate::config::ControlConfig;
use crate::soc::traits::Device;

/// Control/status view over a GPIO region.
#[derive(Debug)]
pub struct ControlBlock<D> {
    /// Underlying GPIO region.
    gpio: D,
    /// Register layout and polarity.
    config: ControlConfig,
}

impl<D: Device> ControlBlock<D> {
    /// Wraps a GPIO region with the given register layout.
    pub const fn new(gpio: D, config: ControlConfig) -> Self {
        Self { gpio, config }
    }

    /// Configures the reset channel as outputs, if a direction register is defined.
    ///
    /// The AXI GPIO comes out of its own reset with every pin as an input, in
    /// which case writes to the data register never reach `rst_n`.
    pub fn configure_outputs(&mut self) {
        if let Some(tri) = self.config.tri_reg {
            self.gpio.write_u32(tri, 0);
            let readback = self.gpio.read_u32(tri);
            if readback != 0 {
                tracing::warn!("GPIO direction register reads {readback:#x}, expected 0x0");
            }
        }
    }

    /// Drives the reset line to its active level.
    pub fn assert_reset(&mut self) {
        self.gpio
            .write_u32(self.config.reset_reg, self.config.reset_active);
    }

    /// Drives the reset line to its inactive level, letting the core run.
    pub fn release_reset(&mut self) {
        self.gpio
            .write_u32(self.config.reset_reg, self.config.reset_inactive);
    }

    /// Reads back the reset register.
    pub fn reset_level(&mut self) -> u32 {
        self.gpio.read_u32(self.config.reset_reg)
    }

    /// Reads the raw done register.
    pub fn status(&mut self) -> u32 {
        self.gpio.read_u32(self.config.done_reg)
    }

    /// Returns `true` if any done bit is set in `status`.
    pub const fn is_done(&self, status: u32) -> bool {
        self.config.is_done(status)
    }

    /// Returns the register layout.
    pub const fn config(&self) -> &ControlConfig {
        &self.config
    }
}
