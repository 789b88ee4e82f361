//! ## RTP: A Transport Protocol for Real-Time Applications
//!
//! [RFC3550]: https://tools.ietf.org/html/rfc3550
//! [RFC8285]: https://tools.ietf.org/html/rfc8285
//!
//! The real-time transport protocol (RTP) provides end-to-end delivery
//! services for data with real-time characteristics, such as interactive
//! audio and video.  Those services include payload type identification,
//! sequence numbering, timestamping and delivery monitoring.  Applications
//! typically run RTP on top of UDP to make use of its multiplexing and
//! checksum services; both protocols contribute parts of the transport
//! protocol functionality.
//!
//! This crate is the packet codec only: it turns a datagram received from
//! the network into a structured [`Packet`] and a structured packet back
//! into wire bytes.  The fixed header and contributing source list follow
//! [RFC3550]; the optional header extension block supports the one-byte
//! (0xBEDE) and two-byte (0x1000) encodings of [RFC8285] as well as the
//! legacy profile-specific form.  Decoding never copies packet data: the
//! payload, the raw packet and every extension element are views into the
//! buffer the caller handed in, so the codec can sit on the per-packet
//! hot path of a media transport.
//!
//! Transport I/O, SRTP, RTCP and payload depacketization are the business
//! of the layers above and below this one.

pub mod extensions;
pub mod header;
pub mod packet;

pub use self::{
    extensions::{Extension, ExtensionProfile, Extensions},
    header::Header,
    packet::Packet,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    InsufficientHeaderBytes,
    InsufficientCsrcBytes,
    InsufficientExtensionBytes,
    InsufficientExtensionLengthBytes,
    ShortBuffer,
    CsrcListTooLong,
    InvalidExtensionId,
    PayloadTooLarge,
    AmbiguousExtensionProfile,
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}
