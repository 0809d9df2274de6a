//! The QOIG decoder.
//!
//! A per-pixel state machine: pending run repeats and raw-block bytes are
//! served first; otherwise one opcode byte is read and dispatched on its
//! two-bit tag, with the literal bytes (QOIG_OP_RGB, QOIG_OP_RGBA, the
//! run extension, and - when enabled - QOIG_OP_RGBRUN) taking precedence
//! inside their tag class. Cache updates mirror the encoder's exactly;
//! for any stream prefix both sides hold identical cache state.

use crate::{
    consts::*,
    encode::RawKind,
    header::{FormatFlags, Header},
    palette::{LONG_EXACT_SEED, LONG_NEAR_SEED},
    utils::{apply_diff, apply_luma, hash, local_hash, long_hash, unlikely},
    Rgba,
};
use snafu::{ensure, Snafu};

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

#[cfg(feature = "std")]
mod std_api;
#[cfg(feature = "std")]
pub use std_api::*;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum DecodeError {
    #[snafu(display("not a QOIG stream (bad magic)"))]
    InvalidMagic,
    #[snafu(display("unsupported channel count {channels}"))]
    InvalidChannels { channels: u8 },
    #[snafu(display("cache split index {index} is not valid here"))]
    InvalidCacheIndex { index: u8 },
    #[snafu(display("image dimensions must be nonzero"))]
    EmptyImage,
    #[snafu(display("{width}x{height} exceeds the decoder's pixel limit"))]
    ImageTooLarge { width: u32, height: u32 },
    #[snafu(display("input ended inside the opcode stream"))]
    UnexpectedEof,
    #[snafu(display("opcode {byte:#04x} cannot follow an index into a near cache"))]
    MalformedStream { byte: u8 },
    #[snafu(display("output buffer holds {len} bytes but the image needs {needed}"))]
    OutputTooSmall { len: usize, needed: usize },
    #[cfg(feature = "std")]
    #[snafu(display("reading the input failed"))]
    Io { source: std::io::Error },
    #[cfg(feature = "std")]
    #[snafu(display("delivering a row failed"))]
    SinkIo { source: std::io::Error },
}

/// Where opcode bytes come from. The slice reader reports
/// [`DecodeError::UnexpectedEof`] on exhaustion; the std layer adds an
/// `io::Read` adapter.
pub(crate) trait ByteReader {
    fn next_byte(&mut self) -> Result<u8, DecodeError>;
    fn read_into(&mut self, buf: &mut [u8]) -> Result<(), DecodeError>;
}

pub(crate) struct SliceReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }
}

impl ByteReader for SliceReader<'_> {
    #[inline]
    fn next_byte(&mut self) -> Result<u8, DecodeError> {
        let byte = *self.data.get(self.pos).ok_or(DecodeError::UnexpectedEof)?;
        self.pos += 1;
        Ok(byte)
    }

    #[inline]
    fn read_into(&mut self, buf: &mut [u8]) -> Result<(), DecodeError> {
        let end = self.pos + buf.len();
        let src = self
            .data
            .get(self.pos..end)
            .ok_or(DecodeError::UnexpectedEof)?;
        buf.copy_from_slice(src);
        self.pos = end;
        Ok(())
    }
}

/// Per-image decoder state.
pub struct QoigDecodeContext {
    current: Rgba,
    run: u32,
    raw_left: u8,
    raw_kind: RawKind,
    cache: [Rgba; 64],
    longcache1: [Rgba; 256],
    longcache2: [Rgba; 256],
    clen: u8,
    near_end: u8,
    longruns: bool,
    longindex: bool,
    rawblocks: bool,
}

impl QoigDecodeContext {
    pub fn new(flags: &FormatFlags) -> Result<Self, DecodeError> {
        ensure!(
            flags.clen_index <= 30,
            InvalidCacheIndexSnafu {
                index: flags.clen_index
            }
        );
        ensure!(
            !(flags.longindex && flags.clen_index == 30),
            InvalidCacheIndexSnafu {
                index: flags.clen_index
            }
        );
        let clen = CACHE_LENGTHS[flags.clen_index as usize];
        let zero = Rgba::new(0, 0, 0, 0);
        let mut ctx = Self {
            current: Rgba::new_opaque(),
            run: 0,
            raw_left: 0,
            raw_kind: RawKind::Rgb,
            cache: [zero; 64],
            longcache1: if flags.longindex {
                LONG_EXACT_SEED
            } else {
                [zero; 256]
            },
            longcache2: if flags.longindex {
                LONG_NEAR_SEED
            } else {
                [zero; 256]
            },
            clen,
            near_end: 64 - 2 * flags.longindex as u8,
            longruns: flags.longruns,
            longindex: flags.longindex,
            rawblocks: flags.rawblocks,
        };
        if clen > 0 {
            let start = ctx.current;
            ctx.cache[hash(start, clen) as usize] = start;
            if ctx.longindex {
                ctx.longcache1[long_hash(start) as usize] = start;
            }
        }
        Ok(ctx)
    }

    /// Mirror of the encoder's near-region insertion for raw pixels.
    fn near_write(&mut self) {
        if self.clen < self.near_end {
            let m = local_hash(self.current, self.clen as u32, self.near_end as u32) as usize;
            if self.longindex {
                let t = self.cache[m];
                if t != self.current {
                    self.longcache2[local_hash(t, 0, 256) as usize] = t;
                }
            }
            self.cache[m] = self.current;
        }
    }

    /// Mirror of the encoder's exact-slot insertion, applied after every
    /// decoded opcode.
    fn exact_write(&mut self) {
        if self.clen > 0 {
            let h = hash(self.current, self.clen) as usize;
            if self.longindex {
                let t = self.cache[h];
                if t != self.current {
                    self.longcache1[long_hash(t) as usize] = t;
                }
            }
            self.cache[h] = self.current;
        }
    }

    fn read_raw<B: ByteReader>(&mut self, r: &mut B) -> Result<(), DecodeError> {
        match self.raw_kind {
            RawKind::Rgb => {
                let mut px = [0u8; 3];
                r.read_into(&mut px)?;
                self.current = Rgba::new(px[0], px[1], px[2], self.current.a);
            }
            RawKind::Rgba => {
                let mut px = [0u8; 4];
                r.read_into(&mut px)?;
                self.current = Rgba::new(px[0], px[1], px[2], px[3]);
            }
        }
        self.near_write();
        Ok(())
    }

    /// After an index into a near region, exactly one QOIG_OP_DIFF or
    /// QOIG_OP_LUMA frame follows and applies to the indexed entry.
    fn apply_follow<B: ByteReader>(&mut self, r: &mut B, base: Rgba) -> Result<Rgba, DecodeError> {
        let byte = r.next_byte()?;
        match byte & QOIG_OP_MASK {
            QOIG_OP_DIFF => Ok(apply_diff(base, byte)),
            QOIG_OP_LUMA => {
                let second = r.next_byte()?;
                Ok(apply_luma(base, byte, second))
            }
            _ => MalformedStreamSnafu { byte }.fail(),
        }
    }

    fn op_index<B: ByteReader>(&mut self, r: &mut B, i: u8) -> Result<(), DecodeError> {
        if self.longindex && i == LONG_INDEX_EXACT {
            let j = r.next_byte()?;
            self.current = self.longcache1[j as usize];
        } else if self.longindex && i == LONG_INDEX_NEAR {
            let j = r.next_byte()?;
            let base = self.longcache2[j as usize];
            self.current = self.apply_follow(r, base)?;
        } else if i < self.clen {
            self.current = self.cache[i as usize];
        } else {
            let base = self.cache[i as usize];
            self.current = self.apply_follow(r, base)?;
        }
        Ok(())
    }

    /// Decodes the next pixel of the image.
    fn next_pixel<B: ByteReader>(&mut self, r: &mut B) -> Result<Rgba, DecodeError> {
        if self.run > 0 {
            self.run -= 1;
            return Ok(self.current);
        }
        if self.raw_left > 0 {
            self.raw_left -= 1;
            self.read_raw(r)?;
        } else {
            let byte = r.next_byte()?;
            match byte & QOIG_OP_MASK {
                QOIG_OP_INDEX => self.op_index(r, byte & QOIG_ARG_MASK)?,
                QOIG_OP_DIFF => {
                    if self.rawblocks && byte == QOIG_OP_RGBRUN {
                        let head = r.next_byte()?;
                        self.raw_kind = if head & 0x80 != 0 {
                            RawKind::Rgba
                        } else {
                            RawKind::Rgb
                        };
                        self.raw_left = (head & 0x7F) + 1;
                        self.read_raw(r)?;
                    } else {
                        self.current = apply_diff(self.current, byte);
                    }
                }
                QOIG_OP_LUMA => {
                    let second = r.next_byte()?;
                    self.current = apply_luma(self.current, byte, second);
                }
                _ => {
                    if unlikely(byte >= QOIG_OP_RGB) {
                        // A literal reads like a raw block of one.
                        self.raw_kind = if byte == QOIG_OP_RGBA {
                            RawKind::Rgba
                        } else {
                            RawKind::Rgb
                        };
                        self.read_raw(r)?;
                    } else {
                        let mut run = (byte & QOIG_ARG_MASK) as u32;
                        if self.longruns && run == 61 {
                            let ext = r.next_byte()?;
                            if ext < 128 {
                                run += ext as u32;
                            } else {
                                let low = r.next_byte()?;
                                run += (((ext & 0x7F) as u32) << 8) + low as u32 + 128;
                            }
                        }
                        self.run = run;
                    }
                }
            }
        }
        self.exact_write();
        Ok(self.current)
    }

    /// Parses just the header of an encoded stream.
    pub fn decode_header(data: &[u8]) -> Result<Header, DecodeError> {
        Header::parse(data)
    }

    /// Decodes a complete QOIG file into `out`, which must hold at least
    /// `width * height * channels` bytes. Returns the parsed header.
    pub fn decode_to_slice(data: &[u8], out: &mut [u8]) -> Result<Header, DecodeError> {
        let header = Header::parse(data)?;
        let mut ctx = Self::new(&header.flags)?;
        let channels = header.desc.channels as usize;
        let needed = header.desc.pixel_count() * channels;
        ensure!(
            out.len() >= needed,
            OutputTooSmallSnafu {
                len: out.len(),
                needed
            }
        );
        let mut reader = SliceReader::new(&data[QOIG_HEADER_SIZE..]);
        for chunk in out[..needed].chunks_exact_mut(channels) {
            let px = ctx.next_pixel(&mut reader)?;
            chunk[0] = px.r;
            chunk[1] = px.g;
            chunk[2] = px.b;
            if channels == 4 {
                chunk[3] = px.a;
            }
        }
        Ok(header)
    }

    /// Decodes a complete QOIG file, appending the pixel data to `out` in
    /// the header's channel count. Returns the parsed header.
    #[cfg(feature = "alloc")]
    pub fn decode_to_vec(data: &[u8], out: &mut Vec<u8>) -> Result<Header, DecodeError> {
        let header = Header::parse(data)?;
        let needed = header.desc.pixel_count() * header.desc.channels as usize;
        let start = out.len();
        out.resize(start + needed, 0);
        Self::decode_to_slice(data, &mut out[start..])?;
        Ok(header)
    }
}

#[cfg(all(test, feature = "alloc"))]
mod tests {
    use super::*;
    use crate::{encode::QoigEncodeContext, EncodeConfig, QoigDesc};

    fn encode(pixels: &[u8], desc: &QoigDesc, cfg: &EncodeConfig) -> Vec<u8> {
        let mut out = Vec::new();
        QoigEncodeContext::encode_to_vec(pixels, desc, cfg, &mut out).unwrap();
        out
    }

    #[test]
    fn truncated_stream_is_an_error() {
        let desc = QoigDesc::new(2, 2, 4);
        let pixels = [
            9, 200, 40, 255, 130, 7, 88, 255, 13, 13, 13, 255, 200, 1, 2, 255,
        ];
        let encoded = encode(&pixels, &desc, &EncodeConfig::PLAIN_QOI);
        let mut out = Vec::new();
        // Drop the footer plus the final opcode's payload.
        let cut = &encoded[..encoded.len() - 11];
        assert!(matches!(
            QoigDecodeContext::decode_to_vec(cut, &mut out),
            Err(DecodeError::UnexpectedEof)
        ));
    }

    #[test]
    fn missing_footer_is_accepted() {
        let desc = QoigDesc::new(1, 1, 4);
        let pixels = [9, 200, 40, 255];
        let encoded = encode(&pixels, &desc, &EncodeConfig::PLAIN_QOI);
        let body = &encoded[..encoded.len() - QOIG_FOOTER.len()];
        let mut out = Vec::new();
        QoigDecodeContext::decode_to_vec(body, &mut out).unwrap();
        assert_eq!(out, pixels);
    }

    #[test]
    fn bad_follow_opcode_is_malformed() {
        // Split index 0: the whole primary cache is near region, so an
        // OP_INDEX must be chased by a diff or luma frame - an OP_RUN
        // byte there is malformed.
        let flags = FormatFlags {
            clen_index: 0,
            longruns: false,
            longindex: false,
            rawblocks: false,
        };
        let header = Header {
            desc: QoigDesc::new(1, 1, 4),
            flags,
        };
        let mut data = header.to_bytes().to_vec();
        data.extend_from_slice(&[QOIG_OP_INDEX | 5, QOIG_OP_RUN | 3]);
        let mut out = Vec::new();
        assert!(matches!(
            QoigDecodeContext::decode_to_vec(&data, &mut out),
            Err(DecodeError::MalformedStream { byte }) if byte == QOIG_OP_RUN | 3
        ));
    }

    #[test]
    fn three_channel_output_drops_alpha() {
        let desc = QoigDesc::new(2, 1, 3);
        let pixels = [10, 20, 30, 255, 200, 90, 14, 255];
        let encoded = encode(&pixels, &desc, &EncodeConfig::PLAIN_QOI);
        let mut out = Vec::new();
        let header = QoigDecodeContext::decode_to_vec(&encoded, &mut out).unwrap();
        assert_eq!(header.desc.channels, 3);
        assert_eq!(out, [10, 20, 30, 200, 90, 14]);
    }

    #[test]
    fn output_slice_must_fit() {
        let desc = QoigDesc::new(2, 1, 4);
        let pixels = [10, 20, 30, 255, 200, 90, 14, 255];
        let encoded = encode(&pixels, &desc, &EncodeConfig::PLAIN_QOI);
        let mut out = [0u8; 7];
        assert!(matches!(
            QoigDecodeContext::decode_to_slice(&encoded, &mut out),
            Err(DecodeError::OutputTooSmall { len: 7, needed: 8 })
        ));
    }
}
