//! Opcode bytes and wire-format constants.

/// 2-bit tag `00`: index into the primary cache.
pub const QOIG_OP_INDEX: u8 = 0x00;
/// 2-bit tag `01`: small wrapping channel deltas.
pub const QOIG_OP_DIFF: u8 = 0x40;
/// 2-bit tag `10`: green-relative deltas, second byte follows.
pub const QOIG_OP_LUMA: u8 = 0x80;
/// 2-bit tag `11`: run of the previous pixel.
pub const QOIG_OP_RUN: u8 = 0xC0;
/// Literal: r,g,b follow, alpha unchanged.
pub const QOIG_OP_RGB: u8 = 0xFE;
/// Literal: r,g,b,a follow.
pub const QOIG_OP_RGBA: u8 = 0xFF;
/// Literal: raw pixel block header, only valid with raw blocks enabled.
pub const QOIG_OP_RGBRUN: u8 = 0x6A;

/// Mask selecting the 2-bit opcode tag.
pub const QOIG_OP_MASK: u8 = 0xC0;
/// Mask selecting the 6-bit opcode argument.
pub const QOIG_ARG_MASK: u8 = 0x3F;

/// OP_INDEX argument announcing a long-exact cache index byte.
pub(crate) const LONG_INDEX_EXACT: u8 = 62;
/// OP_INDEX argument announcing a long-near cache index byte.
pub(crate) const LONG_INDEX_NEAR: u8 = 63;

/// The 31 permitted cache split points; none is divisible by 3, 5, or 7.
/// The header carries an index into this table.
pub const CACHE_LENGTHS: [u8; 31] = [
    0, 1, 2, 4, 8, 11, 13, 16, 17, 19, 22, 23, 26, 29, 31, 32, 34, 37, 38, 41, 43, 44, 46, 47, 52,
    53, 58, 59, 61, 62, 64,
];

/// Longest run expressible by a bare QOIG_OP_RUN.
pub(crate) const MAX_SHORT_RUN: u32 = 62;
/// Longest run expressible with the long-run extension: 62 + 128 + 32767.
pub(crate) const MAX_LONG_RUN: u32 = 32957;
/// Most pixels a single raw block can hold.
pub(crate) const RAW_BLOCK_CAP: usize = 129;

pub const QOIG_MAGIC: [u8; 3] = *b"qoi";
pub const QOIG_HEADER_SIZE: usize = 14;
pub const QOIG_FOOTER: [u8; 8] = [0, 0, 0, 0, 0, 0, 0, 1];

/// Colorspace tag: sRGB with linear alpha.
pub const QOIG_SRGB: u8 = 0;

/// Decoders refuse images above this pixel count.
pub const QOIG_PIXELS_MAX: u64 = 400_000_000;
