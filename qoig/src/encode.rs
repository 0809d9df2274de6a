//! The QOIG encoder.
//!
//! One pixel at a time, the encoder emits the first applicable opcode in a
//! fixed priority order: run extension, exact primary index, exact long
//! index, direct diff/luma, indexed diff/luma against the near region,
//! long-near indexed diff/luma, and finally raw bytes. With raw blocks
//! enabled the raw fallback does not emit immediately: pixels collect in a
//! deferred buffer that becomes a single QOIG_OP_RGBRUN block, flushed as
//! soon as any cheaper opcode wins, the pixel kind changes, the block
//! fills, or the image ends.

use crate::{
    consts::*,
    header::Header,
    palette::{LONG_EXACT_SEED, LONG_NEAR_SEED},
    utils::{channel_distance, diff_op, hash, local_hash, long_hash, luma_op},
    EncodeConfig, QoigDesc, Rgba,
};
use itertools::Itertools;
use snafu::{ensure, Snafu};

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

#[cfg(feature = "std")]
mod std_api;
#[cfg(feature = "std")]
pub use std_api::*;

#[derive(Debug, Snafu)]
pub enum EncodeError {
    #[snafu(display(
        "image dimensions don't match the pixel data: {width} * {height} pixels expected, got {pixel_count}"
    ))]
    InvalidDimensions {
        width: u32,
        height: u32,
        pixel_count: usize,
    },
    #[snafu(display("cache split index {index} is out of range (0..=30)"))]
    InvalidCacheIndex { index: u8 },
    #[cfg(feature = "std")]
    #[snafu(display("writing the output failed"))]
    Io { source: std::io::Error },
}

/// Where the opcode stream goes. `Vec` collects it, [`NullSink`] discards
/// it (the byte count alone drives the tuning probes), and the std layer
/// adds an `io::Write` adapter.
pub(crate) trait ByteSink {
    fn put(&mut self, bytes: &[u8]) -> Result<(), EncodeError>;
}

#[cfg(feature = "alloc")]
impl ByteSink for Vec<u8> {
    #[inline]
    fn put(&mut self, bytes: &[u8]) -> Result<(), EncodeError> {
        self.extend_from_slice(bytes);
        Ok(())
    }
}

pub(crate) struct NullSink;

impl ByteSink for NullSink {
    #[inline]
    fn put(&mut self, _: &[u8]) -> Result<(), EncodeError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RawKind {
    Rgb,
    Rgba,
}

impl RawKind {
    #[inline]
    pub(crate) fn flag_bit(self) -> u8 {
        match self {
            RawKind::Rgb => 0,
            RawKind::Rgba => 0x80,
        }
    }
}

/// The deferred-emit state for raw pixels. A lone raw pixel stays pending
/// until the next pixel decides whether it becomes a bare QOIG_OP_RGB(A)
/// or the start of a block.
#[derive(Debug, Clone, Copy)]
enum RawState {
    Idle,
    Pending { pixel: Rgba, kind: RawKind },
    Buffering { kind: RawKind },
}

/// Per-image encoder state.
pub struct QoigEncodeContext {
    prev: Rgba,
    run: u32,
    raw: RawState,
    rawbuf: [Rgba; RAW_BLOCK_CAP],
    rawlen: usize,
    cache: [Rgba; 64],
    longcache1: [Rgba; 256],
    longcache2: [Rgba; 256],
    clen: u8,
    near_end: u8,
    longruns: bool,
    longindex: bool,
    rawblocks: bool,
    searchcache: bool,
    pixel_cap: Option<u64>,
    written: u64,
}

impl QoigEncodeContext {
    pub fn new(cfg: &EncodeConfig) -> Result<Self, EncodeError> {
        ensure!(
            cfg.clen_index <= 30,
            InvalidCacheIndexSnafu {
                index: cfg.clen_index
            }
        );
        let clen = CACHE_LENGTHS[cfg.resolved_clen_index() as usize];
        let zero = Rgba::new(0, 0, 0, 0);
        let mut ctx = Self {
            prev: Rgba::new_opaque(),
            run: 0,
            raw: RawState::Idle,
            rawbuf: [zero; RAW_BLOCK_CAP],
            rawlen: 0,
            cache: [zero; 64],
            longcache1: if cfg.longindex {
                LONG_EXACT_SEED
            } else {
                [zero; 256]
            },
            longcache2: if cfg.longindex {
                LONG_NEAR_SEED
            } else {
                [zero; 256]
            },
            clen,
            near_end: 64 - 2 * cfg.longindex as u8,
            longruns: cfg.longruns,
            longindex: cfg.longindex,
            rawblocks: cfg.rawblocks,
            searchcache: cfg.searchcache,
            pixel_cap: cfg.bytecap.map(|bytes| bytes as u64 / 4),
            written: 0,
        };
        if clen > 0 {
            let start = ctx.prev;
            ctx.cache[hash(start, clen) as usize] = start;
            if ctx.longindex {
                ctx.longcache1[long_hash(start) as usize] = start;
            }
        }
        Ok(ctx)
    }

    /// Opcode bytes emitted so far (header and footer not included).
    pub fn stream_len(&self) -> u64 {
        self.written
    }

    #[inline]
    fn put<S: ByteSink>(&mut self, s: &mut S, bytes: &[u8]) -> Result<(), EncodeError> {
        self.written += bytes.len() as u64;
        s.put(bytes)
    }

    /// Writes opcode bytes, first flushing whatever the raw buffer holds
    /// so the stream stays in pixel order.
    #[inline]
    fn emit<S: ByteSink>(&mut self, s: &mut S, bytes: &[u8]) -> Result<(), EncodeError> {
        self.flush_raw(s)?;
        self.put(s, bytes)
    }

    fn put_single<S: ByteSink>(
        &mut self,
        s: &mut S,
        pixel: Rgba,
        kind: RawKind,
    ) -> Result<(), EncodeError> {
        match kind {
            RawKind::Rgb => self.put(s, &[QOIG_OP_RGB, pixel.r, pixel.g, pixel.b]),
            RawKind::Rgba => self.put(s, &[QOIG_OP_RGBA, pixel.r, pixel.g, pixel.b, pixel.a]),
        }
    }

    fn flush_block<S: ByteSink>(&mut self, s: &mut S, kind: RawKind) -> Result<(), EncodeError> {
        let len = core::mem::take(&mut self.rawlen);
        self.put(s, &[QOIG_OP_RGBRUN, (len as u8 - 2) | kind.flag_bit()])?;
        for i in 0..len {
            let px = self.rawbuf[i];
            match kind {
                RawKind::Rgb => self.put(s, &[px.r, px.g, px.b])?,
                RawKind::Rgba => self.put(s, &[px.r, px.g, px.b, px.a])?,
            }
        }
        Ok(())
    }

    fn flush_raw<S: ByteSink>(&mut self, s: &mut S) -> Result<(), EncodeError> {
        match core::mem::replace(&mut self.raw, RawState::Idle) {
            RawState::Idle => Ok(()),
            RawState::Pending { pixel, kind } => self.put_single(s, pixel, kind),
            RawState::Buffering { kind } => self.flush_block(s, kind),
        }
    }

    fn flush_run<S: ByteSink>(&mut self, s: &mut S) -> Result<(), EncodeError> {
        let run = core::mem::take(&mut self.run);
        if run <= MAX_SHORT_RUN - self.longruns as u32 {
            self.emit(s, &[QOIG_OP_RUN | (run - 1) as u8])
        } else {
            self.emit(s, &[QOIG_OP_RUN | 61])?;
            let extra = run - MAX_SHORT_RUN;
            if extra < 128 {
                self.put(s, &[extra as u8])
            } else {
                let extra = extra - 128;
                self.put(s, &[0x80 | (extra >> 8) as u8, extra as u8])
            }
        }
    }

    /// Encodes one pixel.
    fn push<S: ByteSink>(&mut self, s: &mut S, px: Rgba) -> Result<(), EncodeError> {
        let last = self.prev;

        if px == last && (self.run < MAX_SHORT_RUN || (self.longruns && self.run < MAX_LONG_RUN)) {
            self.run += 1;
            return Ok(());
        }
        if self.run > 0 {
            self.flush_run(s)?;
            // The run saturated but the color continues: start the next one.
            if px == last {
                self.run = 1;
                return Ok(());
            }
        }

        self.prev = px;

        if self.clen > 0 {
            let h = hash(px, self.clen);
            let occupant = self.cache[h as usize];
            if px == occupant {
                return self.emit(s, &[QOIG_OP_INDEX | h]);
            }
            self.cache[h as usize] = px;
            if self.longindex {
                let lh = long_hash(px);
                let long_occupant = self.longcache1[lh as usize];
                // The displaced exact-slot occupant overflows into the
                // long-exact cache; the probe reads the slot first.
                self.longcache1[long_hash(occupant) as usize] = occupant;
                if px == long_occupant {
                    return self.emit(s, &[QOIG_OP_INDEX | LONG_INDEX_EXACT, lh]);
                }
            }
        }

        if let Some(op) = diff_op(px, last) {
            return self.emit(s, &[op]);
        }
        if let Some(bytes) = luma_op(px, last) {
            return self.emit(s, &bytes);
        }

        if self.clen < self.near_end {
            let mut m = local_hash(px, self.clen as u32, self.near_end as u32);
            let mut candidate = self.cache[m as usize];
            if let Some(op) = diff_op(px, candidate) {
                return self.emit(s, &[QOIG_OP_INDEX | m, op]);
            }
            if self.searchcache {
                let mut best: Option<(u8, Rgba, u32)> = None;
                for j in self.clen..self.near_end {
                    let t = self.cache[j as usize];
                    if let Some(op) = diff_op(px, t) {
                        return self.emit(s, &[QOIG_OP_INDEX | j, op]);
                    }
                    if luma_op(px, t).is_some() {
                        let d = channel_distance(px, t);
                        if best.map_or(true, |(_, _, bd)| d < bd) {
                            best = Some((j, t, d));
                        }
                    }
                }
                if let Some((j, t, _)) = best {
                    m = j;
                    candidate = t;
                }
            }
            if let Some(bytes) = luma_op(px, candidate) {
                return self.emit(s, &[QOIG_OP_INDEX | m, bytes[0], bytes[1]]);
            }

            // Interrupting a same-alpha RGB block for a long-indexed diff
            // costs more bytes than continuing the block.
            let building_rgb_block =
                matches!(self.raw, RawState::Buffering { kind: RawKind::Rgb }) && px.a == last.a;
            if self.longindex && !building_rgb_block {
                let mut m = local_hash(px, 0, 256);
                let mut candidate = self.longcache2[m as usize];
                if let Some(op) = diff_op(px, candidate) {
                    return self.emit(s, &[QOIG_OP_INDEX | LONG_INDEX_NEAR, m, op]);
                }
                if self.searchcache {
                    let mut best: Option<(u8, Rgba, u32)> = None;
                    for j in 0..=255u8 {
                        let t = self.longcache2[j as usize];
                        if let Some(op) = diff_op(px, t) {
                            return self.emit(s, &[QOIG_OP_INDEX | LONG_INDEX_NEAR, j, op]);
                        }
                        if px.a != last.a && luma_op(px, t).is_some() {
                            let d = channel_distance(px, t);
                            if best.map_or(true, |(_, _, bd)| d < bd) {
                                best = Some((j, t, d));
                            }
                        }
                    }
                    if let Some((j, t, _)) = best {
                        m = j;
                        candidate = t;
                    }
                }
                // A same-alpha long-indexed luma never beats QOIG_OP_RGB,
                // and interrupting any raw block for one costs a byte.
                if px.a != last.a && !matches!(self.raw, RawState::Buffering { .. }) {
                    if let Some(bytes) = luma_op(px, candidate) {
                        return self
                            .emit(s, &[QOIG_OP_INDEX | LONG_INDEX_NEAR, m, bytes[0], bytes[1]]);
                    }
                }
            }
        }

        if self.rawblocks {
            self.buffer_raw(s, px, last)?;
        } else if px.a == last.a {
            self.emit(s, &[QOIG_OP_RGB, px.r, px.g, px.b])?;
        } else {
            self.emit(s, &[QOIG_OP_RGBA, px.r, px.g, px.b, px.a])?;
        }

        // Raw pixels also land in the near region, displacing the old
        // occupant into the long-near cache.
        if self.clen < self.near_end {
            let m = local_hash(px, self.clen as u32, self.near_end as u32) as usize;
            if self.longindex {
                let t = self.cache[m];
                if t != px {
                    self.longcache2[local_hash(t, 0, 256) as usize] = t;
                }
            }
            self.cache[m] = px;
        }
        Ok(())
    }

    fn buffer_raw<S: ByteSink>(
        &mut self,
        s: &mut S,
        px: Rgba,
        last: Rgba,
    ) -> Result<(), EncodeError> {
        let same_alpha = px.a == last.a;
        if let RawState::Buffering { kind } = self.raw {
            let kind_change = match kind {
                RawKind::Rgb => !same_alpha,
                RawKind::Rgba => same_alpha,
            };
            if self.rawlen == RAW_BLOCK_CAP || kind_change {
                self.raw = RawState::Idle;
                self.flush_block(s, kind)?;
            }
        }
        match self.raw {
            RawState::Idle => {
                let kind = if same_alpha { RawKind::Rgb } else { RawKind::Rgba };
                self.raw = RawState::Pending { pixel: px, kind };
            }
            RawState::Pending {
                pixel,
                kind: RawKind::Rgb,
            } if !same_alpha => {
                // The pending pixel can't join an RGBA block (its own
                // alpha step is already encoded); write it out alone.
                self.put_single(s, pixel, RawKind::Rgb)?;
                self.raw = RawState::Pending {
                    pixel: px,
                    kind: RawKind::Rgba,
                };
            }
            RawState::Pending { pixel, kind } => {
                self.rawbuf[0] = pixel;
                self.rawbuf[1] = px;
                self.rawlen = 2;
                self.raw = RawState::Buffering { kind };
            }
            RawState::Buffering { .. } => {
                self.rawbuf[self.rawlen] = px;
                self.rawlen += 1;
            }
        }
        Ok(())
    }

    /// Flushes the pending run and raw state at end of image.
    fn finish<S: ByteSink>(&mut self, s: &mut S) -> Result<(), EncodeError> {
        if self.run > 0 {
            self.flush_run(s)?;
        }
        self.flush_raw(s)
    }

    /// Feeds a raw RGBA byte slice through the encoder, honoring the
    /// configured byte cap, and flushes.
    pub(crate) fn encode_pixels<S: ByteSink>(
        &mut self,
        pixels: &[u8],
        s: &mut S,
    ) -> Result<(), EncodeError> {
        let cap = self.pixel_cap.unwrap_or(u64::MAX);
        for (i, (r, g, b, a)) in pixels.iter().copied().tuples().enumerate() {
            if i as u64 >= cap {
                break;
            }
            self.push(s, Rgba::new(r, g, b, a))?;
        }
        self.finish(s)
    }
}

fn check_dimensions(pixels: &[u8], desc: &QoigDesc) -> Result<(), EncodeError> {
    ensure!(
        pixels.len() == desc.pixel_count() * 4,
        InvalidDimensionsSnafu {
            width: desc.width,
            height: desc.height,
            pixel_count: pixels.len() / 4,
        }
    );
    Ok(())
}

#[cfg(feature = "alloc")]
impl QoigEncodeContext {
    /// Encodes raw RGBA pixels as a complete QOIG file (header, opcode
    /// stream, footer) and returns the opcode byte count.
    pub fn encode_to_vec(
        pixels: &[u8],
        desc: &QoigDesc,
        cfg: &EncodeConfig,
        out: &mut Vec<u8>,
    ) -> Result<u64, EncodeError> {
        check_dimensions(pixels, desc)?;
        let mut ctx = Self::new(cfg)?;
        let header = Header {
            desc: *desc,
            flags: cfg.flags(),
        };
        out.extend_from_slice(&header.to_bytes());
        ctx.encode_pixels(pixels, out)?;
        out.extend_from_slice(&QOIG_FOOTER);
        Ok(ctx.written)
    }
}

/// Runs the encoder without emitting anything and reports the opcode byte
/// count the configuration would produce.
pub fn simulate_len(
    pixels: &[u8],
    desc: &QoigDesc,
    cfg: &EncodeConfig,
) -> Result<u64, EncodeError> {
    check_dimensions(pixels, desc)?;
    let mut ctx = QoigEncodeContext::new(cfg)?;
    ctx.encode_pixels(pixels, &mut NullSink)?;
    Ok(ctx.written)
}

#[cfg(all(test, feature = "alloc"))]
mod tests {
    use super::*;

    fn encode_payload(pixels: &[Rgba], cfg: &EncodeConfig) -> Vec<u8> {
        let mut ctx = QoigEncodeContext::new(cfg).unwrap();
        let mut out = Vec::new();
        for &px in pixels {
            ctx.push(&mut out, px).unwrap();
        }
        ctx.finish(&mut out).unwrap();
        assert_eq!(ctx.stream_len(), out.len() as u64);
        out
    }

    #[test]
    fn short_run_forms() {
        let cfg = EncodeConfig::PLAIN_QOI;
        let pixels = [Rgba::new_opaque(); 5];
        assert_eq!(encode_payload(&pixels, &cfg), [QOIG_OP_RUN | 4]);

        // 62 repeats still fit one byte without long runs.
        let pixels = [Rgba::new_opaque(); 62];
        assert_eq!(encode_payload(&pixels, &cfg), [0xFD]);

        // 63 spill into a second run opcode.
        let pixels = [Rgba::new_opaque(); 63];
        assert_eq!(encode_payload(&pixels, &cfg), [0xFD, QOIG_OP_RUN]);
    }

    #[test]
    fn long_run_forms() {
        let cfg = EncodeConfig {
            longruns: true,
            ..EncodeConfig::PLAIN_QOI
        };
        // A run of exactly 62 needs the zero extension byte.
        let pixels = [Rgba::new_opaque(); 62];
        assert_eq!(encode_payload(&pixels, &cfg), [0xFD, 0x00]);

        let pixels = [Rgba::new_opaque(); 63];
        assert_eq!(encode_payload(&pixels, &cfg), [0xFD, 0x01]);

        // 1000 = 62 + 938; 938 - 128 = 810 = 0x32A.
        let pixels = vec![Rgba::new_opaque(); 1000];
        assert_eq!(encode_payload(&pixels, &cfg), [0xFD, 0x83, 0x2A]);

        // Saturation at 32957 starts a fresh run.
        let pixels = vec![Rgba::new_opaque(); 32958];
        assert_eq!(
            encode_payload(&pixels, &cfg),
            [0xFD, 0xFF, 0xFF, QOIG_OP_RUN]
        );
    }

    #[test]
    fn raw_block_collects_and_flushes() {
        let cfg = EncodeConfig {
            rawblocks: true,
            ..EncodeConfig::PLAIN_QOI
        };
        let a = Rgba::new(200, 10, 60, 255);
        let b = Rgba::new(10, 200, 130, 255);
        let c = Rgba::new(90, 45, 210, 255);
        let out = encode_payload(&[a, b, c], &cfg);
        assert_eq!(
            out,
            [
                QOIG_OP_RGBRUN,
                1, // 3 pixels - 2, RGB kind
                200, 10, 60, 10, 200, 130, 90, 45, 210,
            ]
        );

        // A lone raw pixel stays a bare literal.
        assert_eq!(encode_payload(&[a], &cfg), [QOIG_OP_RGB, 200, 10, 60]);
    }

    #[test]
    fn pending_rgb_splits_on_alpha_change() {
        let cfg = EncodeConfig {
            rawblocks: true,
            ..EncodeConfig::PLAIN_QOI
        };
        let a = Rgba::new(200, 10, 60, 255);
        let d = Rgba::new(90, 45, 210, 128);
        let out = encode_payload(&[a, d], &cfg);
        assert_eq!(
            out,
            [
                QOIG_OP_RGB, 200, 10, 60, //
                QOIG_OP_RGBA, 90, 45, 210, 128,
            ]
        );
    }

    #[test]
    fn run_interrupts_raw_block_in_pixel_order() {
        let cfg = EncodeConfig {
            rawblocks: true,
            ..EncodeConfig::PLAIN_QOI
        };
        let a = Rgba::new(200, 10, 60, 255);
        let b = Rgba::new(10, 200, 130, 255);
        let out = encode_payload(&[a, b, b, b], &cfg);
        assert_eq!(
            out,
            [
                QOIG_OP_RGBRUN,
                0, // 2 pixels, RGB kind
                200, 10, 60, 10, 200, 130, //
                QOIG_OP_RUN | 1,
            ]
        );
    }

    #[test]
    fn block_caps_at_129_pixels() {
        let cfg = EncodeConfig {
            rawblocks: true,
            ..EncodeConfig::PLAIN_QOI
        };
        // 131 distinct far-apart colors: 129 fill a block, the remaining
        // two start the next one.
        let pixels: Vec<Rgba> = (0..131)
            .map(|i| {
                let v = (i * 83 % 256) as u8;
                Rgba::new(v, v.wrapping_add(101).wrapping_mul(3), v.wrapping_mul(7), 255)
            })
            .collect();
        let out = encode_payload(&pixels, &cfg);
        assert_eq!(out[0], QOIG_OP_RGBRUN);
        assert_eq!(out[1], 127);
        let after = 2 + 129 * 3;
        assert_eq!(out[after], QOIG_OP_RGBRUN);
        assert_eq!(out[after + 1], 0);
        assert_eq!(out.len(), after + 2 + 2 * 3);
    }

    #[test]
    fn byte_cap_truncates_input() {
        let desc = QoigDesc::new(4, 2, 4);
        let mut pixels = Vec::new();
        for i in 0..8u8 {
            pixels.extend_from_slice(&[i, 200, 40u8.wrapping_mul(i), 255]);
        }
        let full = simulate_len(&pixels, &desc, &EncodeConfig::PLAIN_QOI).unwrap();
        let capped = simulate_len(
            &pixels,
            &desc,
            &EncodeConfig {
                bytecap: Some(8),
                ..EncodeConfig::PLAIN_QOI
            },
        )
        .unwrap();
        assert!(capped < full);
    }

    #[test]
    fn rejects_bad_config_and_dimensions() {
        let desc = QoigDesc::new(2, 2, 4);
        let pixels = [0u8; 16];
        let cfg = EncodeConfig {
            clen_index: 31,
            ..EncodeConfig::PLAIN_QOI
        };
        assert!(matches!(
            simulate_len(&pixels, &desc, &cfg),
            Err(EncodeError::InvalidCacheIndex { index: 31 })
        ));
        assert!(matches!(
            simulate_len(&pixels[..12], &desc, &EncodeConfig::PLAIN_QOI),
            Err(EncodeError::InvalidDimensions { .. })
        ));
    }
}
