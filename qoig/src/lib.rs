//! QOIG reference implementation.
//!
//! QOIG is a lossless raster image codec derived from QOI. It keeps QOI's
//! byte-aligned opcode design and decoding speed, and adds four optional
//! features that fill the gap between QOI's short codes (1-2 bytes) and its
//! long ones (4-5 bytes): a split primary cache with a near-match section,
//! long runs, a pair of 256-entry secondary caches, and raw pixel blocks.
//! A stream produced with every feature disabled and the cache split at 64
//! is a plain QOI stream, byte for byte.
//!
//! # Format
//!
//! ## Header (14 bytes)
//!
//! - bytes 0..3: magic `qoi`
//! - byte 3: flag byte
//!   - bit 7: long runs enabled
//!   - bit 6: long indexing *disabled*
//!   - bit 5: raw blocks *disabled*
//!   - bits 4..0: cache split index, XORed with 24
//! - bytes 4..8: u32be width
//! - bytes 8..12: u32be height
//! - byte 12: channel count (3 or 4)
//! - byte 13: colorspace (0 = sRGB with linear alpha)
//!
//! The XOR and the inverted disable bits make the plain-QOI configuration
//! (split index 30, everything off) produce flag byte `0x66`, so the first
//! four bytes read `qoif` exactly as in QOI.
//!
//! The split index selects one of 31 cache split points (none divisible by
//! 3, 5, or 7, to keep the hashing uniform):
//!
//! ```plain
//! 0 1 2 4 8 11 13 16 17 19 22 23 26 29 31 32 34 37 38 41
//! 43 44 46 47 52 53 58 59 61 62 64
//! ```
//!
//! Primary cache slots below the split hold exact matches under QOI's hash
//! reduced modulo the split; slots from the split up to the end of the near
//! region (64, or 62 when long indexing is on) hold near matches under a
//! locality hash that maps similar colors to the same slot.
//!
//! ## Stream format
//!
//! ```plain
//! .- QOIG_OP_INDEX ---------.
//! |         Byte[0]         |
//! |  7  6  5  4  3  2  1  0 |
//! |-------+-----------------|
//! |  0  0 |     index       |
//! `-------------------------`
//! ```
//!
//! - 2-bit tag b00
//! - 6-bit index into the primary cache
//! - An index below the split is the decoded pixel. An index at or above
//!   the split addresses the near region: the *next* opcode must be a
//!   QOIG_OP_DIFF or QOIG_OP_LUMA and is applied on top of the indexed
//!   pixel instead of the previous one.
//! - With long indexing on, index 62 is followed by one byte addressing
//!   the long exact cache (that entry is the decoded pixel), and index 63
//!   is followed by one byte addressing the long near cache plus a
//!   QOIG_OP_DIFF or QOIG_OP_LUMA applied on top of that entry.
//!
//! ```plain
//! .- QOIG_OP_DIFF ----------.
//! |         Byte[0]         |
//! |  7  6  5  4  3  2  1  0 |
//! |-------+-----+-----+-----|
//! |  0  1 |  dr |  dg |  db |
//! `-------------------------`
//! ```
//!
//! - 2-bit tag b01
//! - 2-bit red/green/blue channel differences, wrapping, -2..1, bias 2
//! - The alpha value remains unchanged.
//!
//! ```plain
//! .- QOIG_OP_LUMA ------------------------------------.
//! |         Byte[0]         |         Byte[1]         |
//! |  7  6  5  4  3  2  1  0 |  7  6  5  4  3  2  1  0 |
//! |-------+-----------------+-------------+-----------|
//! |  1  0 |   green diff    |   dr - dg   |  db - dg  |
//! `---------------------------------------------------`
//! ```
//!
//! - 2-bit tag b10
//! - 6-bit green channel difference -32..31, bias 32
//! - 4-bit red and blue differences minus the green difference, -8..7,
//!   bias 8
//! - The alpha value remains unchanged.
//!
//! ```plain
//! .- QOIG_OP_RUN -----------.
//! |         Byte[0]         |
//! |  7  6  5  4  3  2  1  0 |
//! |-------+-----------------|
//! |  1  1 |       run       |
//! `-------------------------`
//! ```
//!
//! - 2-bit tag b11
//! - 6-bit run length repeating the previous pixel, 1..62, bias -1.
//!   Run values 63 and 64 are occupied by QOIG_OP_RGB and QOIG_OP_RGBA.
//! - With long runs on, the byte `0xFD` (run 62) is always followed by an
//!   extension:
//!
//! ```plain
//! .- long run extension ---.------------------------.
//! |         Byte[1]        |  Byte[2] (iff e == 1)  |
//! | 7  6  5  4  3  2  1  0 | 7  6  5  4  3  2  1  0 |
//! |---+--------------------+------------------------|
//! | e |    extra (high)    |      extra (low)       |
//! `-------------------------------------------------`
//! ```
//!
//!   With `e == 0` the extra length is the low 7 bits (0..127); with
//!   `e == 1` a second byte follows and the extra length is the 15-bit
//!   value plus 128 (128..32895). Total run = 62 + extra, at most 32957.
//!
//! ```plain
//! .- QOIG_OP_RGBRUN ----------------------------------.
//! |         Byte[0]         |         Byte[1]         |
//! |  7  6  5  4  3  2  1  0 |  7  6  5  4  3  2  1  0 |
//! |-------------------------+----+--------------------|
//! |  0  1  1  0  1  0  1  0 |  t |  length of run - 2 |
//! `---------------------------------------------------`
//! ```
//!
//! - 8-bit tag `0x6A` (only when raw blocks are enabled, and never directly
//!   after a near-region index, where the same byte is a QOIG_OP_DIFF)
//! - `t` selects 3-byte (`0`) or 4-byte (`1`) pixels; length 2..129
//! - The block's raw pixel data follows with no interleaved opcodes.
//!
//! QOIG_OP_RGB (`0xFE`, three bytes of r,g,b follow, alpha unchanged) and
//! QOIG_OP_RGBA (`0xFF`, four bytes of r,g,b,a follow) are as in QOI.
//!
//! The stream ends with seven `0x00` bytes followed by `0x01`.
//!
//! Both sides start from pixel `(0, 0, 0, 255)`, a zeroed primary cache
//! with the starting pixel pre-inserted at its exact slot, and - with long
//! indexing on - two fixed 256-entry seed palettes in the long caches. The
//! caches are part of the wire format: encoder and decoder must mutate
//! them identically.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod consts;
pub mod decode;
pub mod encode;
pub mod header;
mod palette;
pub mod tune;
mod utils;

use consts::QOIG_SRGB;
use header::FormatFlags;

/// One pixel, in the channel order the wire format uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// The implicit pixel preceding the image: opaque black.
    #[inline]
    pub const fn new_opaque() -> Self {
        Self::new(0, 0, 0, 255)
    }
}

/// Image-level metadata carried in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QoigDesc {
    pub width: u32,
    pub height: u32,
    /// 3 or 4. Selects the decoder's output layout; encoder input is
    /// always 4-byte RGBA.
    pub channels: u8,
    pub colorspace: u8,
}

impl QoigDesc {
    pub const fn new(width: u32, height: u32, channels: u8) -> Self {
        Self {
            width,
            height,
            channels,
            colorspace: QOIG_SRGB,
        }
    }

    pub(crate) fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Encoder settings. `clen_index`, `longruns`, `longindex`, and
/// `rawblocks` are carried in the header; `searchcache` and `bytecap`
/// only shape the encoder's choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeConfig {
    /// Index into the cache split table, 0..=30.
    pub clen_index: u8,
    pub longruns: bool,
    pub longindex: bool,
    pub rawblocks: bool,
    /// Scan the whole near region for a usable slot instead of probing
    /// only the locality-hashed one.
    pub searchcache: bool,
    /// Stop consuming input after this many raw RGBA bytes. Used by the
    /// tuning driver to rank configurations on an image prefix.
    pub bytecap: Option<u32>,
}

impl EncodeConfig {
    /// Backwards-compatible plain QOI output.
    pub const PLAIN_QOI: Self = Self {
        clen_index: 30,
        longruns: false,
        longindex: false,
        rawblocks: false,
        searchcache: false,
        bytecap: None,
    };

    /// Good fast compression: every stream feature, no cache search.
    pub const fn fast(clen_index: u8) -> Self {
        Self {
            clen_index,
            longruns: true,
            longindex: true,
            rawblocks: true,
            searchcache: false,
            bytecap: None,
        }
    }

    /// Max compression: every stream feature plus the near-cache search.
    pub const fn max(clen_index: u8) -> Self {
        let mut cfg = Self::fast(clen_index);
        cfg.searchcache = true;
        cfg
    }

    /// The split index as it will appear in the header. Split value 64
    /// leaves no near region once the long caches claim indices 62 and 63,
    /// so long indexing forces the next split down.
    pub(crate) const fn resolved_clen_index(&self) -> u8 {
        if self.longindex && self.clen_index == 30 {
            29
        } else {
            self.clen_index
        }
    }

    pub fn flags(&self) -> FormatFlags {
        FormatFlags {
            clen_index: self.resolved_clen_index(),
            longruns: self.longruns,
            longindex: self.longindex,
            rawblocks: self.rawblocks,
        }
    }
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self::fast(26)
    }
}
