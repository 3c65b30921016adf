//! Display link abstraction
//!
//! A panel controller is driven over a byte-oriented synchronous serial
//! link with a separate data/command select line. This trait captures
//! exactly that boundary: two blocking byte writes, one per line state.

/// Byte-output primitive for a display controller.
///
/// Both operations block until any previous transmission has completed,
/// so a driver may toggle chip state between calls without racing the
/// shift register. Transport initialization, reset sequencing and timing
/// configuration are the implementor's concern, not the driver's.
pub trait DisplayLink {
    /// Error type for link operations
    type Error;

    /// Write one byte with the data/command select line in command state.
    fn write_command(&mut self, command: u8) -> Result<(), Self::Error>;

    /// Write one byte with the data/command select line in data state.
    fn write_data(&mut self, data: u8) -> Result<(), Self::Error>;
}
