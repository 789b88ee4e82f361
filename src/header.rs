use bytes::{Buf, BufMut};

use crate::{
    Error,
    extensions::{ExtensionProfile, Extensions, check_element},
};

const VERSION_MASK: u8 = 0b11000000;
const PADDING_MASK: u8 = 0b00100000;
const EXTENSION_MASK: u8 = 0b00010000;
const CSRC_COUNT_MASK: u8 = 0b00001111;
const MARKER_MASK: u8 = 0b10000000;
const PAYLOAD_TYPE_MASK: u8 = 0b01111111;

const MIN_HEADER_SIZE: usize = 4;
const FIXED_HEADER_SIZE: usize = 12;
const CSRC_SIZE: usize = 4;
const MAX_CSRC_COUNT: usize = 15;
const EXTENSION_HEADER_SIZE: usize = 4;

/// RTP Header.
///
/// ### RTP Fixed Header Fields
///
/// ```bash
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
///  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///  |V=2|P|X|  CC   |M|     PT      |       sequence number         |
///  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///  |                           timestamp                           |
///  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///  |           synchronization source (SSRC) identifier            |
///  +=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+
///  |            contributing source (CSRC) identifiers             |
///  |                             ....                              |
///  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header<'a> {
    /// The version of RTP.  The version defined by RFC 3550 is two; the
    /// codec stores whatever arrived on the wire and leaves validation
    /// to the caller.
    pub version: u8,
    /// If the padding bit is set, the packet contains one or more
    /// additional padding octets at the end which are not part of the
    /// payload.  The last octet of the padding contains a count of how
    /// many padding octets should be ignored, including itself.
    pub padding: bool,
    /// If the extension bit is set, the fixed header is followed by
    /// exactly one header extension block.
    pub extension: bool,
    /// The interpretation of the marker is defined by a profile.  It is
    /// intended to allow significant events such as frame boundaries to
    /// be marked in the packet stream.
    pub marker: bool,
    /// Identifies the format of the RTP payload; the mapping to a media
    /// encoding is negotiated out-of-band.
    pub payload_type: u8,
    /// Increments by one for each RTP data packet sent, wrapping modulo
    /// 2^16; used by the receiver to detect packet loss and to restore
    /// packet sequence.
    pub sequence_number: u16,
    /// The sampling instant of the first octet in the RTP data packet,
    /// in a media-dependent clock.
    pub timestamp: u32,
    /// Identifies the synchronization source.  This identifier should be
    /// chosen randomly, with the intent that no two synchronization
    /// sources within the same RTP session will have the same SSRC.
    pub ssrc: u32,
    /// The contributing sources for the payload contained in this
    /// packet, inserted by mixers.  The 4-bit CC field bounds the list
    /// at 15 entries; longer lists are rejected on encode instead of
    /// truncating the count.
    pub csrc: Vec<u32>,
    /// Selects the extension block encoding; only meaningful while
    /// `extension` is set.
    pub extension_profile: ExtensionProfile,
    /// The header extension elements, in wire order.
    pub extensions: Extensions<'a>,
    // byte count consumed by header plus extension block, maintained by
    // decode and encode.
    payload_offset: usize,
}

impl<'a> Header<'a> {
    /// Parses the header at the start of the given packet bytes.
    ///
    /// Every element payload is a view into `bytes`, which therefore
    /// must outlive the header and stay unmodified while it is in use.
    ///
    /// # Unit Test
    ///
    /// ```
    /// use rtp_codec::Header;
    ///
    /// let buffer = [
    ///     0x90, 0xe0, 0x69, 0x8f, 0xd9, 0xc2, 0x93, 0xda, 0x1c, 0x64,
    ///     0x27, 0x82, 0x00, 0x01, 0x00, 0x01, 0xff, 0xff, 0xff, 0xff,
    ///     0x98, 0x36, 0xbe, 0x88, 0x9e,
    /// ];
    ///
    /// let header = Header::decode(&buffer[..]).unwrap();
    /// assert_eq!(header.version, 2);
    /// assert_eq!(header.marker, true);
    /// assert_eq!(header.payload_type, 96);
    /// assert_eq!(header.sequence_number, 27023);
    /// assert_eq!(header.timestamp, 0xd9c293da);
    /// assert_eq!(header.ssrc, 0x1c642782);
    /// assert_eq!(header.get_extension(0), Some(&[0xff, 0xff, 0xff, 0xff][..]));
    /// assert_eq!(header.payload_offset(), 20);
    /// ```
    pub fn decode(bytes: &'a [u8]) -> Result<Self, Error> {
        if bytes.len() < MIN_HEADER_SIZE {
            return Err(Error::InsufficientHeaderBytes);
        }

        let version = (bytes[0] & VERSION_MASK) >> 6;
        let padding = ((bytes[0] & PADDING_MASK) >> 5) == 1;
        let extension = ((bytes[0] & EXTENSION_MASK) >> 4) == 1;
        let csrc_count = (bytes[0] & CSRC_COUNT_MASK) as usize;
        let marker = ((bytes[1] & MARKER_MASK) >> 7) == 1;
        let payload_type = bytes[1] & PAYLOAD_TYPE_MASK;

        let mut offset = FIXED_HEADER_SIZE + csrc_count * CSRC_SIZE;
        if bytes.len() < offset {
            return Err(Error::InsufficientCsrcBytes);
        }

        let mut buf = &bytes[2..];
        let sequence_number = buf.get_u16();
        let timestamp = buf.get_u32();
        let ssrc = buf.get_u32();
        let csrc = (0..csrc_count).map(|_| buf.get_u32()).collect();

        let mut extension_profile = ExtensionProfile::default();
        let mut extensions = Extensions::default();

        if extension {
            if bytes.len() < offset + EXTENSION_HEADER_SIZE {
                return Err(Error::InsufficientExtensionBytes);
            }

            extension_profile =
                u16::from_be_bytes([bytes[offset], bytes[offset + 1]]).into();
            let length = u16::from_be_bytes([bytes[offset + 2], bytes[offset + 3]]);
            offset += EXTENSION_HEADER_SIZE;

            let (elements, consumed) =
                Extensions::decode(extension_profile, length as usize, &bytes[offset..])?;

            extensions = elements;
            offset += consumed;
        }

        Ok(Self {
            version,
            padding,
            extension,
            marker,
            payload_type,
            sequence_number,
            timestamp,
            ssrc,
            csrc,
            extension_profile,
            extensions,
            payload_offset: offset,
        })
    }

    /// Serializes the header into the start of `buf`, returning the
    /// number of bytes written.
    ///
    /// The destination must hold at least [`size`](Self::size) bytes,
    /// otherwise nothing is written and `ShortBuffer` is returned.
    ///
    /// # Unit Test
    ///
    /// ```
    /// use rtp_codec::Header;
    ///
    /// let buffer = [
    ///     0x80, 0x60, 0x69, 0x8f, 0xd9, 0xc2, 0x93, 0xda, 0x1c, 0x64,
    ///     0x27, 0x82,
    /// ];
    ///
    /// let mut header = Header::default();
    /// header.version = 2;
    /// header.payload_type = 96;
    /// header.sequence_number = 27023;
    /// header.timestamp = 0xd9c293da;
    /// header.ssrc = 0x1c642782;
    ///
    /// let mut writer = [0u8; 12];
    /// let size = header.encode(&mut writer).unwrap();
    /// assert_eq!(size, 12);
    /// assert_eq!(&writer[..], &buffer[..]);
    /// ```
    pub fn encode(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        if self.csrc.len() > MAX_CSRC_COUNT {
            return Err(Error::CsrcListTooLong);
        }

        if self.extension {
            self.extensions.check(self.extension_profile)?;
        }

        let size = self.size();
        if buf.len() < size {
            return Err(Error::ShortBuffer);
        }

        let mut first = (self.version << 6) | self.csrc.len() as u8;
        if self.padding {
            first |= PADDING_MASK;
        }

        if self.extension {
            first |= EXTENSION_MASK;
        }

        let mut second = self.payload_type & PAYLOAD_TYPE_MASK;
        if self.marker {
            second |= MARKER_MASK;
        }

        let mut writer = &mut buf[..];
        writer.put_u8(first);
        writer.put_u8(second);
        writer.put_u16(self.sequence_number);
        writer.put_u32(self.timestamp);
        writer.put_u32(self.ssrc);

        for item in &self.csrc {
            writer.put_u32(*item);
        }

        if self.extension {
            writer.put_u16(self.extension_profile.into());
            self.extensions.encode(self.extension_profile, &mut writer);
        }

        self.payload_offset = size;
        Ok(size)
    }

    /// The size of the header once encoded, extension block included.
    ///
    /// # Unit Test
    ///
    /// ```
    /// use rtp_codec::Header;
    ///
    /// let mut header = Header::default();
    /// header.version = 2;
    /// header.csrc.push(0x12345678);
    ///
    /// assert_eq!(header.size(), 16);
    /// ```
    pub fn size(&self) -> usize {
        let mut size = FIXED_HEADER_SIZE + self.csrc.len() * CSRC_SIZE;
        if self.extension {
            size += EXTENSION_HEADER_SIZE + self.extensions.wire_size(self.extension_profile);
        }

        size
    }

    /// Sets a header extension element.
    ///
    /// The id and payload size are validated against the active profile.
    /// If no extension block is active yet, a profile is selected from
    /// the payload size: under 16 bytes activates the one-byte form,
    /// over 16 (up to 255) the two-byte form.  Exactly 16 bytes sits on
    /// the boundary of the two forms and is rejected as
    /// `AmbiguousExtensionProfile`; pick a profile first by setting a
    /// shorter or longer element.  Nothing is modified on error.
    ///
    /// # Unit Test
    ///
    /// ```
    /// use rtp_codec::{ExtensionProfile, Header};
    ///
    /// let mut header = Header::default();
    /// header.set_extension(1, &[0xde, 0xad, 0xbe, 0xef]).unwrap();
    ///
    /// assert_eq!(header.extension, true);
    /// assert_eq!(header.extension_profile, ExtensionProfile::OneByte);
    /// assert!(header.set_extension(15, &[0xaa]).is_err());
    /// ```
    pub fn set_extension(&mut self, id: u8, payload: &'a [u8]) -> Result<(), Error> {
        let profile = if self.extension {
            self.extension_profile
        } else {
            match payload.len() {
                size if size < 16 => ExtensionProfile::OneByte,
                16 => return Err(Error::AmbiguousExtensionProfile),
                size if size < 256 => ExtensionProfile::TwoByte,
                _ => return Err(Error::PayloadTooLarge),
            }
        };

        check_element(profile, id, payload)?;

        self.extension = true;
        self.extension_profile = profile;
        self.extensions.set(id, payload);
        Ok(())
    }

    /// Gets a header extension payload by id, or `None` if the packet
    /// carries no such element.
    pub fn get_extension(&self, id: u8) -> Option<&'a [u8]> {
        self.extensions.get(id)
    }

    /// Byte count consumed by the header and extension block, as
    /// recomputed by the last decode or encode.  The packet payload
    /// starts here.
    pub fn payload_offset(&self) -> usize {
        self.payload_offset
    }
}
