//! We use this mocking module in unit tests to emulate the UPS on the end of a serial port.

use crate::{
    checksum::{length_checksum, payload_checksum},
    frame::{EOI, SOI},
    hex::encode_u8,
};

/// Our mock type used to emulate a serial port.
///
/// Responses queued with [`MockSerial::queue_response`] become readable one per write, the way
/// the UPS answers one frame at a time.
pub struct MockSerial {
    /// Buffer to store data written to the mock serial port
    write_buffer: heapless::Vec<u8, 1024>,
    /// Data currently waiting to be read
    read_buffer: heapless::Vec<u8, 256>,
    /// Current position in the read buffer
    read_position: usize,
    /// Responses released by subsequent writes
    responses: heapless::Deque<heapless::Vec<u8, 256>, 8>,
    /// Number of write calls seen
    writes: usize,
    /// Flag to simulate write errors
    should_error_on_write: bool,
    /// Flag to simulate read errors
    should_error_on_read: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum MockSerialError {
    /// Simulated buffer overflow
    #[error("Mock buffer overflow")]
    BufferOverflow,
    /// Generic simulated error for testing
    #[error("Simulated serial error")]
    SimulatedError,
    /// Would block - no data available
    #[error("No data available")]
    WouldBlock,
}

impl embedded_io::Error for MockSerialError {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self {
            MockSerialError::BufferOverflow => embedded_io::ErrorKind::OutOfMemory,
            MockSerialError::SimulatedError => embedded_io::ErrorKind::BrokenPipe,
            MockSerialError::WouldBlock => embedded_io::ErrorKind::Other,
        }
    }
}

impl embedded_io::ErrorType for MockSerial {
    type Error = MockSerialError;
}

impl embedded_io::Write for MockSerial {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        if self.should_error_on_write {
            return Err(MockSerialError::SimulatedError);
        }

        self.write_buffer
            .extend_from_slice(buf)
            .map_err(|_| MockSerialError::BufferOverflow)?;
        self.writes += 1;

        if let Some(response) = self.responses.pop_front() {
            self.read_buffer = response;
            self.read_position = 0;
        }

        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        if self.should_error_on_write {
            return Err(MockSerialError::SimulatedError);
        }
        Ok(())
    }
}

impl embedded_io::Read for MockSerial {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if self.should_error_on_read {
            return Err(MockSerialError::SimulatedError);
        }

        if self.read_position >= self.read_buffer.len() {
            return Err(MockSerialError::WouldBlock);
        }

        let available = &self.read_buffer[self.read_position..];
        let bytes_to_read = core::cmp::min(buf.len(), available.len());
        buf[..bytes_to_read].copy_from_slice(&available[..bytes_to_read]);

        self.read_position += bytes_to_read;
        Ok(bytes_to_read)
    }
}

impl embedded_io::ReadReady for MockSerial {
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(self.read_position < self.read_buffer.len())
    }
}

impl MockSerial {
    /// Create a new MockSerial instance with empty buffers
    pub fn new() -> Self {
        Self {
            write_buffer: heapless::Vec::new(),
            read_buffer: heapless::Vec::new(),
            read_position: 0,
            responses: heapless::Deque::new(),
            writes: 0,
            should_error_on_write: false,
            should_error_on_read: false,
        }
    }

    /// Set data which is readable right now, before anything is written
    pub fn set_read_data(&mut self, data: &[u8]) -> Result<(), MockSerialError> {
        self.read_buffer.clear();
        self.read_position = 0;
        self.read_buffer
            .extend_from_slice(data)
            .map_err(|_| MockSerialError::BufferOverflow)
    }

    /// Queue the answer to the next write. An empty answer simulates a UPS which stays silent.
    pub fn queue_response(&mut self, data: &[u8]) -> Result<(), MockSerialError> {
        let mut response = heapless::Vec::new();
        response
            .extend_from_slice(data)
            .map_err(|_| MockSerialError::BufferOverflow)?;
        self.responses
            .push_back(response)
            .map_err(|_| MockSerialError::BufferOverflow)
    }

    /// Get a reference to the data that was written to this mock serial port
    pub fn written_data(&self) -> &[u8] {
        &self.write_buffer
    }

    /// Number of writes, which is one per frame sent
    pub fn write_count(&self) -> usize {
        self.writes
    }

    /// Clear the write buffer
    pub fn clear_written_data(&mut self) {
        self.write_buffer.clear();
        self.writes = 0;
    }

    /// Configure whether write operations should fail with an error
    pub fn set_write_error(&mut self, should_error: bool) {
        self.should_error_on_write = should_error;
    }

    /// Configure whether read operations should fail with an error
    pub fn set_read_error(&mut self, should_error: bool) {
        self.should_error_on_read = should_error;
    }
}

/// Build a well formed reply from a UPS at address `01`.
pub fn device_reply(rtn: u8, info: &str) -> Vec<u8> {
    let mut frame = vec![SOI];
    frame.extend_from_slice(b"21012A");
    frame.extend_from_slice(&encode_u8(rtn));
    frame.extend_from_slice(&length_checksum(info.len() as u16));
    frame.extend_from_slice(info.as_bytes());
    let checksum = payload_checksum(&frame[1..]);
    frame.extend_from_slice(&checksum);
    frame.push(EOI);
    frame
}

/// INFO of `len` zero characters with `fields` written over it at their offsets.
pub fn info_with(len: usize, fields: &[(usize, &str)]) -> String {
    let mut info = vec![b'0'; len];
    for (offset, value) in fields {
        info[*offset..*offset + value.len()].copy_from_slice(value.as_bytes());
    }
    String::from_utf8(info).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Response;
    use embedded_io::{Error, Read, ReadReady, Write};

    #[test]
    fn test_new_mock_serial() {
        let mock = MockSerial::new();
        assert_eq!(mock.written_data().len(), 0);
        assert_eq!(mock.read_position, 0);
        assert_eq!(mock.write_count(), 0);
        assert!(!mock.should_error_on_write);
        assert!(!mock.should_error_on_read);
    }

    #[test]
    fn test_write_multiple_times() {
        let mut mock = MockSerial::new();
        mock.write(b"Hello, ").unwrap();
        mock.write(b"World!").unwrap();

        assert_eq!(mock.written_data(), b"Hello, World!");
        assert_eq!(mock.write_count(), 2);
    }

    #[test]
    fn test_write_buffer_overflow() {
        let mut mock = MockSerial::new();
        let large_data = vec![0u8; 1100];

        let result = mock.write(&large_data);
        assert!(matches!(result.unwrap_err(), MockSerialError::BufferOverflow));
    }

    #[test]
    fn test_read_preloaded_data() {
        let mut mock = MockSerial::new();
        mock.set_read_data(b"Hello World").unwrap();

        let mut buffer1 = [0u8; 5];
        let mut buffer2 = [0u8; 6];
        assert_eq!(mock.read(&mut buffer1).unwrap(), 5);
        assert_eq!(mock.read(&mut buffer2).unwrap(), 6);
        assert_eq!(&buffer1, b"Hello");
        assert_eq!(&buffer2, b" World");
        assert!(matches!(
            mock.read(&mut buffer1).unwrap_err(),
            MockSerialError::WouldBlock
        ));
    }

    #[test]
    fn test_responses_released_per_write() {
        let mut mock = MockSerial::new();
        mock.queue_response(b"first").unwrap();
        mock.queue_response(b"").unwrap();
        mock.queue_response(b"third").unwrap();

        let mut buffer = [0u8; 10];
        assert!(!mock.read_ready().unwrap());

        mock.write(b"1").unwrap();
        assert_eq!(mock.read(&mut buffer).unwrap(), 5);
        assert_eq!(&buffer[..5], b"first");

        mock.write(b"2").unwrap();
        assert!(!mock.read_ready().unwrap());

        mock.write(b"3").unwrap();
        assert_eq!(mock.read(&mut buffer).unwrap(), 5);
        assert_eq!(&buffer[..5], b"third");
    }

    #[test]
    fn test_error_flags_toggle() {
        let mut mock = MockSerial::new();

        mock.set_write_error(true);
        assert!(mock.write(b"test").is_err());
        assert!(mock.flush().is_err());

        mock.set_write_error(false);
        assert!(mock.write(b"test").is_ok());

        mock.set_read_data(b"data").unwrap();
        mock.set_read_error(true);
        let mut buffer = [0u8; 10];
        assert!(mock.read(&mut buffer).is_err());

        mock.set_read_error(false);
        assert!(mock.read(&mut buffer).is_ok());
    }

    #[test]
    fn test_error_kinds() {
        assert!(matches!(
            MockSerialError::WouldBlock.kind(),
            embedded_io::ErrorKind::Other
        ));
        assert!(matches!(
            MockSerialError::SimulatedError.kind(),
            embedded_io::ErrorKind::BrokenPipe
        ));
    }

    #[test]
    fn test_device_reply_shape() {
        let reply = device_reply(0x00, "0A0B");
        assert_eq!(reply, b"\x7E21012A00C0040A0BFCAF\x0D");
        assert!(Response::new(&reply).verify_checksums().is_ok());
    }

    #[test]
    fn test_info_with() {
        assert_eq!(info_with(8, &[(2, "E2"), (6, "01")]), "00E20001");
    }
}
