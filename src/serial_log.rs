//! Serial log: lines are formatted into a ring buffer during the cycle,
//! then sent at once on the USART.
use embedded_hal::serial;
use ringbuffer::{ConstGenericRingBuffer, RingBuffer};

/// Output buffer, instantiated within the main function rather than as a
/// global, mutex-protected variable. When full, the oldest bytes are dropped.
#[derive(Default)]
pub struct SerialLog<const BUFFER_SIZE: usize> {
    output: ConstGenericRingBuffer<u8, BUFFER_SIZE>,
}

/// Implement ufmt::uWrite for the log, to be able to call ufmt::uwriteln
impl<const BUFFER_SIZE: usize> ufmt::uWrite for SerialLog<BUFFER_SIZE> {
    type Error = ();

    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        for byte in s.as_bytes() {
            self.output.push(*byte);
        }
        Ok(())
    }
}

impl<const BUFFER_SIZE: usize> SerialLog<BUFFER_SIZE> {
    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }

    /// Send the whole buffer on the serial line. On error, the remaining
    /// bytes stay in the buffer for the next call.
    pub fn flush<S: serial::Write<u8>>(&mut self, serial: &mut S) -> Result<(), S::Error> {
        while let Some(byte) = self.output.peek().copied() {
            nb::block!(serial.write(byte))?;
            self.output.dequeue();
        }
        Ok(())
    }
}
