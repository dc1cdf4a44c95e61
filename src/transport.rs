//! The byte pipe between the driver and the UPS.

use embedded_io::{Error as _, ErrorKind, ErrorType, Read, ReadReady, Write};
use fugit::MillisDurationU32;

use crate::frame::EOI;

/// Synchronous, request/response access to the UPS.
pub trait Transport: ErrorType {
    /// Throw away anything already received, so a stray byte from an earlier exchange is not
    /// mistaken for the start of the next response.
    fn flush_input(&mut self) -> Result<(), Self::Error>;

    /// Send a whole frame, returning the number of bytes written.
    fn send(&mut self, frame: &[u8]) -> Result<usize, Self::Error>;

    /// Receive up to `buf.len()` bytes, waiting at most `timeout`.
    ///
    /// `Ok(0)` means nothing arrived in time, which callers treat differently to an error from
    /// the port itself.
    fn receive(&mut self, buf: &mut [u8], timeout: MillisDurationU32)
    -> Result<usize, Self::Error>;
}

/// You can create a [`SerialTransport`] from any port which implements [embedded_io::Read],
/// [embedded_io::ReadReady] & [embedded_io::Write].
///
/// `embedded_io` has no notion of a read deadline, so the port's own read timeout bounds each
/// read. Configure it to the driver's timeout. A read which fails with
/// [`ErrorKind::TimedOut`] (or would block) ends the response.
pub struct SerialTransport<S> {
    port: S,
}

impl<S> SerialTransport<S> {
    pub fn new(port: S) -> Self {
        Self { port }
    }

    pub fn port(&self) -> &S {
        &self.port
    }

    pub fn port_mut(&mut self) -> &mut S {
        &mut self.port
    }

    pub fn into_inner(self) -> S {
        self.port
    }
}

impl<S: ErrorType> ErrorType for SerialTransport<S> {
    type Error = S::Error;
}

impl<S: Read + ReadReady + Write> Transport for SerialTransport<S> {
    fn flush_input(&mut self) -> Result<(), Self::Error> {
        let mut scratch = [0u8; 32];
        while self.port.read_ready()? {
            match self.port.read(&mut scratch) {
                Ok(0) => break,
                Ok(n) => log::trace!("flushed: {:02X?}", &scratch[..n]),
                Err(e) if is_end_of_data(e.kind()) => break,
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    fn send(&mut self, frame: &[u8]) -> Result<usize, Self::Error> {
        self.port.write_all(frame)?;
        self.port.flush()?;
        Ok(frame.len())
    }

    fn receive(
        &mut self,
        buf: &mut [u8],
        _timeout: MillisDurationU32,
    ) -> Result<usize, Self::Error> {
        let mut received = 0;
        // Keep reading until the EOI arrives, the buffer is full or the port runs dry.
        while received < buf.len() {
            match self.port.read(&mut buf[received..]) {
                Ok(0) => break,
                Ok(bytes_read) => {
                    let chunk = &buf[received..received + bytes_read];
                    if let Some(end) = chunk.iter().position(|&b| b == EOI) {
                        // Anything after the EOI belongs to no frame of ours.
                        received += end + 1;
                        break;
                    }
                    received += bytes_read;
                }
                Err(e) if is_end_of_data(e.kind()) => break,
                Err(e) => return Err(e),
            }
        }
        Ok(received)
    }
}

fn is_end_of_data(kind: ErrorKind) -> bool {
    matches!(kind, ErrorKind::Other | ErrorKind::TimedOut)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_serial::{MockSerial, MockSerialError};
    use fugit::ExtU32;

    #[test]
    fn flush_discards_stale_input() {
        let mut mock = MockSerial::new();
        mock.set_read_data(b"\x0D\x7E21").unwrap();
        let mut transport = SerialTransport::new(mock);

        transport.flush_input().unwrap();
        assert!(!transport.port_mut().read_ready().unwrap());
    }

    #[test]
    fn receive_stops_at_eoi() {
        let mut mock = MockSerial::new();
        mock.queue_response(b"\x7E21\x0D\x7E").unwrap();
        let mut transport = SerialTransport::new(mock);
        transport.send(b"ping").unwrap();

        let mut buf = [0u8; 16];
        let n = transport.receive(&mut buf, 1000.millis()).unwrap();
        assert_eq!(&buf[..n], b"\x7E21\x0D");
        assert_eq!(transport.port().written_data(), b"ping");
    }

    #[test]
    fn receive_stops_when_port_runs_dry() {
        let mut mock = MockSerial::new();
        mock.queue_response(b"\x7E2101").unwrap();
        let mut transport = SerialTransport::new(mock);
        transport.send(b"ping").unwrap();

        let mut buf = [0u8; 16];
        assert_eq!(transport.receive(&mut buf, 1000.millis()).unwrap(), 5);
    }

    #[test]
    fn receive_nothing_is_zero() {
        let mut transport = SerialTransport::new(MockSerial::new());
        let mut buf = [0u8; 16];
        assert_eq!(transport.receive(&mut buf, 1000.millis()).unwrap(), 0);
    }

    #[test]
    fn receive_fills_at_most_buffer() {
        let mut mock = MockSerial::new();
        mock.queue_response(&[b'0'; 40]).unwrap();
        let mut transport = SerialTransport::new(mock);
        transport.send(b"ping").unwrap();

        let mut buf = [0u8; 16];
        assert_eq!(transport.receive(&mut buf, 1000.millis()).unwrap(), 16);
    }

    #[test]
    fn port_errors_propagate() {
        let mut mock = MockSerial::new();
        mock.set_read_data(b"data").unwrap();
        mock.set_read_error(true);
        let mut transport = SerialTransport::new(mock);

        let mut buf = [0u8; 16];
        assert!(matches!(
            transport.receive(&mut buf, 1000.millis()),
            Err(MockSerialError::SimulatedError)
        ));
    }
}
