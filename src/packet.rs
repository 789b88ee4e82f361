use std::fmt;

use crate::{Error, header::Header};

/// RTP Packet.
///
/// The payload and the raw packet are views into the buffer the packet
/// was decoded from or encoded into; the packet owns no bytes of its
/// own.  The caller keeps that buffer alive and unmodified for as long
/// as the packet is in use, which the borrow checker enforces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Packet<'a> {
    pub header: Header<'a>,
    pub payload: &'a [u8],
    pub raw: &'a [u8],
}

impl<'a> Packet<'a> {
    /// Parses a whole packet: the header, then everything after the
    /// header's payload offset as the payload.
    ///
    /// # Unit Test
    ///
    /// ```
    /// use rtp_codec::Packet;
    ///
    /// let buffer = [
    ///     0x90, 0xe0, 0x69, 0x8f, 0xd9, 0xc2, 0x93, 0xda, 0x1c, 0x64,
    ///     0x27, 0x82, 0x00, 0x01, 0x00, 0x01, 0xff, 0xff, 0xff, 0xff,
    ///     0x98, 0x36, 0xbe, 0x88, 0x9e,
    /// ];
    ///
    /// let packet = Packet::decode(&buffer[..]).unwrap();
    /// assert_eq!(packet.payload, &[0x98, 0x36, 0xbe, 0x88, 0x9e][..]);
    /// assert_eq!(packet.raw, &buffer[..]);
    /// ```
    pub fn decode(bytes: &'a [u8]) -> Result<Self, Error> {
        let header = Header::decode(bytes)?;
        let payload = &bytes[header.payload_offset()..];

        Ok(Self {
            header,
            payload,
            raw: bytes,
        })
    }

    /// Serializes the packet into the start of `buf`, returning the
    /// number of bytes written.  The raw view is repointed at the
    /// written sub-range of `buf`.
    ///
    /// # Unit Test
    ///
    /// ```
    /// use rtp_codec::Packet;
    ///
    /// let buffer = [
    ///     0x90, 0xe0, 0x69, 0x8f, 0xd9, 0xc2, 0x93, 0xda, 0x1c, 0x64,
    ///     0x27, 0x82, 0x00, 0x01, 0x00, 0x01, 0xff, 0xff, 0xff, 0xff,
    ///     0x98, 0x36, 0xbe, 0x88, 0x9e,
    /// ];
    ///
    /// let mut writer = [0u8; 1500];
    /// let mut packet = Packet::decode(&buffer[..]).unwrap();
    /// let size = packet.encode(&mut writer).unwrap();
    ///
    /// assert_eq!(size, buffer.len());
    /// assert_eq!(packet.raw, &buffer[..]);
    /// ```
    pub fn encode(&mut self, buf: &'a mut [u8]) -> Result<usize, Error> {
        let offset = self.header.encode(&mut buf[..])?;
        let size = offset + self.payload.len();
        if buf.len() < size {
            return Err(Error::ShortBuffer);
        }

        buf[offset..size].copy_from_slice(self.payload);
        self.raw = &buf[..size];
        Ok(size)
    }

    /// The size of the packet once encoded.
    pub fn size(&self) -> usize {
        self.header.size() + self.payload.len()
    }
}

impl fmt::Display for Packet<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "RTP PACKET:")?;
        writeln!(f, "\tVersion: {}", self.header.version)?;
        writeln!(f, "\tMarker: {}", self.header.marker)?;
        writeln!(f, "\tPayload Type: {}", self.header.payload_type)?;
        writeln!(f, "\tSequence Number: {}", self.header.sequence_number)?;
        writeln!(f, "\tTimestamp: {}", self.header.timestamp)?;
        writeln!(f, "\tSSRC: {} ({:x})", self.header.ssrc, self.header.ssrc)?;
        write!(f, "\tPayload Length: {}", self.payload.len())
    }
}
