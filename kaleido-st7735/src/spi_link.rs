//! SPI transport adapter.
//!
//! Adapts a blocking `embedded-hal` SPI bus plus a data/command select
//! pin to the [`DisplayLink`] boundary. The controller samples the DC
//! line with each byte, so the bus must be drained before the line
//! toggles; data bytes go out back to back without waiting.

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;
use kaleido_hal::DisplayLink;

/// Either side of the transport can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiLinkError<S, P> {
    /// SPI bus error
    Bus(S),
    /// DC pin error
    Pin(P),
}

/// A display link over SPI with a dedicated DC (data/command) pin.
///
/// Reset and chip-select sequencing stay with the board bring-up code;
/// this adapter only owns the steady-state byte protocol.
pub struct SpiLink<SPI, DC> {
    spi: SPI,
    dc: DC,
}

impl<SPI, DC> SpiLink<SPI, DC> {
    pub fn new(spi: SPI, dc: DC) -> Self {
        Self { spi, dc }
    }

    /// Tear down the adapter and hand the peripherals back.
    pub fn release(self) -> (SPI, DC) {
        (self.spi, self.dc)
    }
}

impl<SPI: SpiBus, DC: OutputPin> DisplayLink for SpiLink<SPI, DC> {
    type Error = SpiLinkError<SPI::Error, DC::Error>;

    fn write_command(&mut self, command: u8) -> Result<(), Self::Error> {
        // Finish any in-flight data bytes before switching line state
        self.spi.flush().map_err(SpiLinkError::Bus)?;
        self.dc.set_low().map_err(SpiLinkError::Pin)?;

        self.spi.write(&[command]).map_err(SpiLinkError::Bus)?;
        self.spi.flush().map_err(SpiLinkError::Bus)?;

        self.dc.set_high().map_err(SpiLinkError::Pin)
    }

    fn write_data(&mut self, data: u8) -> Result<(), Self::Error> {
        self.spi.write(&[data]).map_err(SpiLinkError::Bus)
    }
}
