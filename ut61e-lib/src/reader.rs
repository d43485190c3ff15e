use crate::constants::{FRAME_LEN, READ_RETRIES, TERMINATOR};
use crate::error::DmmError;
use crate::frame::{Frame, is_frame_valid};
use bytes::{Bytes, BytesMut};
use std::io::{ErrorKind, Read};
use tracing::{debug, trace};

/// The two primitives the reader needs from a byte stream.
pub trait Transport {
    /// Drop everything received but not yet read.
    fn discard_input(&mut self) -> Result<(), DmmError>;

    /// Read until `terminator` has been received, `max_len` bytes have been
    /// read, or the transport's timeout expires. A timeout is not an error:
    /// whatever arrived so far is returned, possibly nothing.
    fn read_until(&mut self, terminator: &[u8], max_len: usize) -> Result<Bytes, DmmError>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn discard_input(&mut self) -> Result<(), DmmError> {
        (**self).discard_input()
    }

    fn read_until(&mut self, terminator: &[u8], max_len: usize) -> Result<Bytes, DmmError> {
        (**self).read_until(terminator, max_len)
    }
}

/// Transport over any reader, e.g. a captured byte stream.
///
/// There is no receive buffer to discard, so `discard_input` does nothing.
pub struct StreamTransport<R> {
    inner: R,
}

impl<R: Read> StreamTransport<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Transport for StreamTransport<R> {
    fn discard_input(&mut self) -> Result<(), DmmError> {
        Ok(())
    }

    fn read_until(&mut self, terminator: &[u8], max_len: usize) -> Result<Bytes, DmmError> {
        read_until_from(&mut self.inner, terminator, max_len, || false)
    }
}

/// Byte-at-a-time read loop shared by the transports.
///
/// Stops on the terminator, on `max_len`, on end of stream, on a read
/// timeout, or once `expired` reports the attempt's deadline has passed.
pub(crate) fn read_until_from<R: Read + ?Sized>(
    reader: &mut R,
    terminator: &[u8],
    max_len: usize,
    mut expired: impl FnMut() -> bool,
) -> Result<Bytes, DmmError> {
    let mut buf = BytesMut::with_capacity(max_len);
    let mut byte = [0u8; 1];

    while buf.len() < max_len {
        match reader.read(&mut byte) {
            Ok(0) => break,
            Ok(_) => {
                buf.extend_from_slice(&byte);
                if buf.ends_with(terminator) {
                    break;
                }
            }
            Err(e) if e.kind() == ErrorKind::TimedOut || e.kind() == ErrorKind::WouldBlock => break,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
        if expired() {
            break;
        }
    }

    Ok(buf.freeze())
}

/// Pulls one complete frame per cycle from a transport.
pub struct FrameReader<T> {
    transport: T,
    retries: usize,
}

impl<T: Transport> FrameReader<T> {
    pub fn new(transport: T) -> Self {
        Self::with_retries(transport, READ_RETRIES)
    }

    /// At least one attempt is always made.
    pub fn with_retries(transport: T, retries: usize) -> Self {
        Self {
            transport,
            retries: retries.max(1),
        }
    }

    pub fn retries(&self) -> usize {
        self.retries
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Reads one frame, or returns empty bytes once every attempt failed.
    ///
    /// Pending input is discarded before each attempt so a stale partial
    /// frame is never joined with fresh bytes.
    pub fn read_raw(&mut self) -> Result<Bytes, DmmError> {
        for attempt in 1..=self.retries {
            self.transport.discard_input()?;
            let data = self.transport.read_until(&TERMINATOR, FRAME_LEN)?;
            trace!(attempt, bytes = hex::encode(&data), "Serial read");

            if is_frame_valid(&data) {
                return Ok(data);
            }
            debug!(
                attempt,
                len = data.len(),
                bytes = hex::encode(&data),
                "Discarding incomplete frame"
            );
        }

        debug!(retries = self.retries, "No valid frame this cycle");
        Ok(Bytes::new())
    }

    /// Like [`read_raw`](Self::read_raw) but hands back a validated frame.
    pub fn read_frame(&mut self) -> Result<Option<Frame>, DmmError> {
        let data = self.read_raw()?;
        if data.is_empty() {
            return Ok(None);
        }
        Ok(Some(Frame::try_from(data.as_ref())?))
    }
}
