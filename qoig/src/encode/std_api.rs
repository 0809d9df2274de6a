use super::{ByteSink, EncodeError, IoSnafu, QoigEncodeContext};
use crate::{consts::QOIG_FOOTER, header::Header, EncodeConfig, QoigDesc, Rgba};
use itertools::Itertools;
use snafu::ResultExt;
use std::io::{self, Write};

/// What a [`RowSource`] reports after filling a row buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStatus {
    /// A row was produced and more follow.
    Row,
    /// A row was produced and it is the final one.
    LastRow,
    /// No row was produced; the image is exhausted.
    End,
}

/// Pull-based supplier of RGBA rows, `4 * width` bytes each. The encoder
/// never seeks and never asks for a row again.
pub trait RowSource {
    fn next_row(&mut self, row: &mut [u8]) -> io::Result<RowStatus>;
}

/// Serves rows out of one contiguous RGBA buffer.
pub struct SliceRows<'a> {
    pixels: &'a [u8],
    row_len: usize,
    offset: usize,
}

impl<'a> SliceRows<'a> {
    /// `pixels` must hold whole rows of `width` RGBA pixels.
    pub fn new(pixels: &'a [u8], width: u32) -> Self {
        Self {
            pixels,
            row_len: width as usize * 4,
            offset: 0,
        }
    }
}

impl RowSource for SliceRows<'_> {
    fn next_row(&mut self, row: &mut [u8]) -> io::Result<RowStatus> {
        if self.offset >= self.pixels.len() {
            return Ok(RowStatus::End);
        }
        let end = self.offset + self.row_len;
        row[..self.row_len].copy_from_slice(&self.pixels[self.offset..end]);
        self.offset = end;
        Ok(if self.offset >= self.pixels.len() {
            RowStatus::LastRow
        } else {
            RowStatus::Row
        })
    }
}

struct IoSink<W: Write>(W);

impl<W: Write> ByteSink for IoSink<W> {
    #[inline]
    fn put(&mut self, bytes: &[u8]) -> Result<(), EncodeError> {
        self.0.write_all(bytes).context(IoSnafu)
    }
}

impl QoigEncodeContext {
    /// Pulls rows from `source` and writes a complete QOIG file to `w`.
    /// Returns the opcode byte count (header and footer excluded).
    pub fn encode_rows<R, W>(
        desc: &QoigDesc,
        cfg: &EncodeConfig,
        source: &mut R,
        w: W,
    ) -> Result<u64, EncodeError>
    where
        R: RowSource,
        W: Write,
    {
        let mut ctx = Self::new(cfg)?;
        let mut sink = IoSink(w);
        let header = Header {
            desc: *desc,
            flags: cfg.flags(),
        };
        sink.put(&header.to_bytes())?;

        let mut row = vec![0u8; desc.width as usize * 4];
        let cap = ctx.pixel_cap.unwrap_or(u64::MAX);
        let mut consumed = 0u64;
        'rows: loop {
            let status = source.next_row(&mut row).context(IoSnafu)?;
            if status == RowStatus::End {
                break;
            }
            for (r, g, b, a) in row.iter().copied().tuples() {
                if consumed >= cap {
                    break 'rows;
                }
                ctx.push(&mut sink, Rgba::new(r, g, b, a))?;
                consumed += 1;
            }
            if status == RowStatus::LastRow {
                break;
            }
        }
        ctx.finish(&mut sink)?;
        sink.put(&QOIG_FOOTER)?;
        Ok(ctx.written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn streamed_rows_match_the_slice_path() {
        let desc = QoigDesc::new(3, 2, 4);
        let pixels: Vec<u8> = (0..desc.pixel_count())
            .flat_map(|i| [i as u8 * 41, 7, i as u8, 255])
            .collect();
        let cfg = EncodeConfig::fast(12);

        let mut from_slice = Vec::new();
        QoigEncodeContext::encode_to_vec(&pixels, &desc, &cfg, &mut from_slice).unwrap();

        let mut streamed = Vec::new();
        let mut rows = SliceRows::new(&pixels, desc.width);
        QoigEncodeContext::encode_rows(&desc, &cfg, &mut rows, &mut streamed).unwrap();

        assert_eq!(from_slice, streamed);
    }
}
