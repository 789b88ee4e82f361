use bytes::BufMut;
use num_enum::FromPrimitive;

use crate::Error;

const ONE_BYTE_ID_RESERVED: u8 = 0xF;

/// The 16-bit value required by the RTP specification for a header
/// extension, labeled in the RTP specification as "defined by profile".
///
/// In the one-byte header form of extensions this field takes the fixed
/// bit pattern 0xBEDE (the first version of that specification was
/// written on the feast day of the Venerable Bede).  The two-byte form
/// uses the fixed pattern 0x1000, of which the low 12 bits are appbits
/// and ignored here.  Any other value is a profile-specific extension
/// with no internal structure.
///
/// # Unit Test
///
/// ```
/// use rtp_codec::ExtensionProfile;
///
/// assert_eq!(ExtensionProfile::from(0xBEDE), ExtensionProfile::OneByte);
/// assert_eq!(ExtensionProfile::from(0x1000), ExtensionProfile::TwoByte);
/// assert_eq!(ExtensionProfile::from(0x9999), ExtensionProfile::Generic(0x9999));
/// assert_eq!(u16::from(ExtensionProfile::OneByte), 0xBEDE);
/// assert_eq!(u16::from(ExtensionProfile::Generic(0x9999)), 0x9999);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
#[repr(u16)]
pub enum ExtensionProfile {
    OneByte = 0xBEDE,
    TwoByte = 0x1000,
    #[num_enum(catch_all)]
    Generic(u16),
}

impl Default for ExtensionProfile {
    fn default() -> Self {
        Self::Generic(0)
    }
}

impl From<ExtensionProfile> for u16 {
    fn from(value: ExtensionProfile) -> Self {
        match value {
            ExtensionProfile::OneByte => 0xBEDE,
            ExtensionProfile::TwoByte => 0x1000,
            ExtensionProfile::Generic(profile) => profile,
        }
    }
}

/// A single header extension element.
///
/// The payload is a view into the buffer the packet was decoded from, or
/// into whatever slice the caller passed to
/// [`set_extension`](crate::Header::set_extension).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extension<'a> {
    pub id: u8,
    pub data: &'a [u8],
}

/// The header extension element list.
///
/// The wire encodings do not mandate any element order, but repeated
/// encodes of the same logical state must produce the same bytes, so the
/// list keeps elements in insertion order instead of using an unordered
/// map.  Lookups scan the list; it holds at most 14 elements in the
/// one-byte form and is short in practice for the others.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extensions<'a>(Vec<Extension<'a>>);

impl<'a> Extensions<'a> {
    /// Gets the payload of the element with the given id.
    ///
    /// Only the first matching element is returned; a missing id is not
    /// an error.
    ///
    /// # Unit Test
    ///
    /// ```
    /// use rtp_codec::Extensions;
    ///
    /// let mut extensions = Extensions::default();
    /// extensions.set(2, &[0xaa, 0x36, 0x3f]);
    ///
    /// assert_eq!(extensions.get(2), Some(&[0xaa, 0x36, 0x3f][..]));
    /// assert_eq!(extensions.get(3), None);
    /// ```
    pub fn get(&self, id: u8) -> Option<&'a [u8]> {
        self.0.iter().find(|it| it.id == id).map(|it| it.data)
    }

    /// Sets the payload of the element with the given id.
    ///
    /// An existing element is replaced in place, keeping its position in
    /// the encoded element order.
    ///
    /// # Unit Test
    ///
    /// ```
    /// use rtp_codec::Extensions;
    ///
    /// let mut extensions = Extensions::default();
    /// extensions.set(2, &[0xaa]);
    /// extensions.set(5, &[0x36]);
    /// extensions.set(2, &[0x3f]);
    ///
    /// assert_eq!(extensions.len(), 2);
    /// assert_eq!(extensions.get(2), Some(&[0x3f][..]));
    /// ```
    pub fn set(&mut self, id: u8, data: &'a [u8]) {
        match self.0.iter_mut().find(|it| it.id == id) {
            Some(it) => it.data = data,
            None => self.0.push(Extension { id, data }),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Extension<'a>> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Parses the element region that follows the profile and length
    /// fields, returning the list and the number of bytes consumed.
    ///
    /// `length` is the raw 16-bit length field: the element count for the
    /// RFC 8285 forms, the number of 32-bit words for the generic form.
    pub(crate) fn decode(
        profile: ExtensionProfile,
        length: usize,
        buf: &'a [u8],
    ) -> Result<(Self, usize), Error> {
        match profile {
            ExtensionProfile::OneByte => Self::decode_one_byte(length, buf),
            ExtensionProfile::TwoByte => Self::decode_two_byte(length, buf),
            ExtensionProfile::Generic(_) => Self::decode_generic(length, buf),
        }
    }

    fn decode_one_byte(count: usize, buf: &'a [u8]) -> Result<(Self, usize), Error> {
        let mut elements = Vec::new();
        let mut offset = 0;
        let mut parsed = 0;

        while parsed < count {
            if buf.len() <= offset {
                return Err(Error::InsufficientExtensionBytes);
            }

            // a zero byte is padding, not an element.
            let head = buf[offset];
            if head == 0 {
                offset += 1;
                continue;
            }

            let id = head >> 4;
            let size = ((head & 0xF) + 1) as usize;
            offset += 1;

            // id 15 is reserved and terminates processing of the entire
            // extension; elements before it are kept.
            if id == ONE_BYTE_ID_RESERVED {
                break;
            }

            if buf.len() < offset + size {
                return Err(Error::InsufficientExtensionBytes);
            }

            elements.push(Extension {
                id,
                data: &buf[offset..offset + size],
            });

            offset += size;
            parsed += 1;
        }

        Ok((Self(elements), offset))
    }

    fn decode_two_byte(count: usize, buf: &'a [u8]) -> Result<(Self, usize), Error> {
        let mut elements = Vec::new();
        let mut offset = 0;
        let mut parsed = 0;

        while parsed < count {
            if buf.len() <= offset {
                return Err(Error::InsufficientExtensionBytes);
            }

            let id = buf[offset];
            if id == 0 {
                offset += 1;
                continue;
            }

            offset += 1;
            if buf.len() <= offset {
                return Err(Error::InsufficientExtensionBytes);
            }

            let size = buf[offset] as usize;
            offset += 1;

            if buf.len() < offset + size {
                return Err(Error::InsufficientExtensionBytes);
            }

            elements.push(Extension {
                id,
                data: &buf[offset..offset + size],
            });

            offset += size;
            parsed += 1;
        }

        Ok((Self(elements), offset))
    }

    fn decode_generic(words: usize, buf: &'a [u8]) -> Result<(Self, usize), Error> {
        let size = words * 4;
        if buf.len() < size {
            return Err(Error::InsufficientExtensionLengthBytes);
        }

        // one opaque blob under the synthetic id 0.
        Ok((
            Self(vec![Extension {
                id: 0,
                data: &buf[..size],
            }]),
            size,
        ))
    }

    /// Validates every element against the active profile before any byte
    /// is written.
    pub(crate) fn check(&self, profile: ExtensionProfile) -> Result<(), Error> {
        for it in &self.0 {
            check_element(profile, it.id, it.data)?;
        }

        // the generic length field counts 32-bit words, in 16 bits.
        if let ExtensionProfile::Generic(_) = profile {
            let size = self.wire_size(profile);
            if size % 4 != 0 {
                return Err(Error::ShortBuffer);
            }

            if size / 4 > u16::MAX as usize {
                return Err(Error::PayloadTooLarge);
            }
        }

        Ok(())
    }

    /// Encoded size of the element region, excluding the 4-byte profile
    /// and length fields.
    pub(crate) fn wire_size(&self, profile: ExtensionProfile) -> usize {
        match profile {
            ExtensionProfile::OneByte => self.0.iter().map(|it| 1 + it.data.len()).sum(),
            ExtensionProfile::TwoByte => self.0.iter().map(|it| 2 + it.data.len()).sum(),
            ExtensionProfile::Generic(_) => self.get(0).map(|it| it.len()).unwrap_or(0),
        }
    }

    /// Writes the length field and the elements.  Assumes [`check`] has
    /// passed and the buffer holds [`wire_size`] + 2 bytes.
    ///
    /// [`check`]: Self::check
    /// [`wire_size`]: Self::wire_size
    pub(crate) fn encode(&self, profile: ExtensionProfile, buf: &mut impl BufMut) {
        match profile {
            ExtensionProfile::OneByte => {
                buf.put_u16(self.0.len() as u16);

                for it in &self.0 {
                    buf.put_u8((it.id << 4) | (it.data.len() as u8 - 1));
                    buf.put(it.data);
                }
            }
            ExtensionProfile::TwoByte => {
                buf.put_u16(self.0.len() as u16);

                for it in &self.0 {
                    buf.put_u8(it.id);
                    buf.put_u8(it.data.len() as u8);
                    buf.put(it.data);
                }
            }
            ExtensionProfile::Generic(_) => {
                let data = self.get(0).unwrap_or(&[]);
                buf.put_u16((data.len() / 4) as u16);
                buf.put(data);
            }
        }
    }
}

impl<'a> IntoIterator for &'a Extensions<'a> {
    type Item = &'a Extension<'a>;
    type IntoIter = std::slice::Iter<'a, Extension<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Checks one element against the id range and payload size limit of the
/// given profile.
///
/// The one-byte form carries 1-16 payload bytes under ids 1-14.  The
/// two-byte form carries 0-255 payload bytes under ids 1-255; its length
/// field is a single byte, so 256 bytes are rejected rather than letting
/// the count wrap to zero on the wire.  The generic form knows only the
/// synthetic id 0.
pub(crate) fn check_element(
    profile: ExtensionProfile,
    id: u8,
    data: &[u8],
) -> Result<(), Error> {
    match profile {
        ExtensionProfile::OneByte => {
            if !(1..=14).contains(&id) {
                return Err(Error::InvalidExtensionId);
            }

            if data.is_empty() || data.len() > 16 {
                return Err(Error::PayloadTooLarge);
            }
        }
        ExtensionProfile::TwoByte => {
            if id == 0 {
                return Err(Error::InvalidExtensionId);
            }

            if data.len() > 255 {
                return Err(Error::PayloadTooLarge);
            }
        }
        ExtensionProfile::Generic(_) => {
            if id != 0 {
                return Err(Error::InvalidExtensionId);
            }
        }
    }

    Ok(())
}
