use super::{ByteReader, DecodeError, QoigDecodeContext};
use crate::{consts::QOIG_HEADER_SIZE, header::Header};
use std::io::{self, Read};

/// Push-based consumer of decoded rows, delivered in the header's
/// channel count (3 or 4 bytes per pixel).
pub trait RowSink {
    fn push_row(&mut self, row: &[u8]) -> io::Result<()>;
}

/// Collects every row into one contiguous buffer.
impl RowSink for Vec<u8> {
    fn push_row(&mut self, row: &[u8]) -> io::Result<()> {
        self.extend_from_slice(row);
        Ok(())
    }
}

struct IoReader<R: Read> {
    inner: R,
}

impl<R: Read> IoReader<R> {
    fn fill(&mut self, buf: &mut [u8]) -> Result<(), DecodeError> {
        self.inner.read_exact(buf).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => DecodeError::UnexpectedEof,
            _ => DecodeError::Io { source: e },
        })
    }
}

impl<R: Read> ByteReader for IoReader<R> {
    #[inline]
    fn next_byte(&mut self) -> Result<u8, DecodeError> {
        let mut byte = [0u8; 1];
        self.fill(&mut byte)?;
        Ok(byte[0])
    }

    #[inline]
    fn read_into(&mut self, buf: &mut [u8]) -> Result<(), DecodeError> {
        self.fill(buf)
    }
}

impl QoigDecodeContext {
    /// Decodes a QOIG stream row by row, pushing each finished row into
    /// `sink`. Returns the parsed header.
    pub fn decode_rows<R, S>(input: R, sink: &mut S) -> Result<Header, DecodeError>
    where
        R: Read,
        S: RowSink,
    {
        let mut reader = IoReader { inner: input };
        let mut header_bytes = [0u8; QOIG_HEADER_SIZE];
        reader.fill(&mut header_bytes)?;
        let header = Header::parse(&header_bytes)?;
        let mut ctx = Self::new(&header.flags)?;

        let channels = header.desc.channels as usize;
        let mut row = vec![0u8; header.desc.width as usize * channels];
        for _ in 0..header.desc.height {
            for chunk in row.chunks_exact_mut(channels) {
                let px = ctx.next_pixel(&mut reader)?;
                chunk[0] = px.r;
                chunk[1] = px.g;
                chunk[2] = px.b;
                if channels == 4 {
                    chunk[3] = px.a;
                }
            }
            sink.push_row(&row)
                .map_err(|e| DecodeError::SinkIo { source: e })?;
        }
        Ok(header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{encode::QoigEncodeContext, EncodeConfig, QoigDesc};

    #[test]
    fn streamed_rows_match_the_slice_path() {
        let desc = QoigDesc::new(5, 3, 4);
        let pixels: Vec<u8> = (0..desc.pixel_count())
            .flat_map(|i| [(i as u8).wrapping_mul(29), 255 - i as u8, 3, 255])
            .collect();
        let mut encoded = Vec::new();
        QoigEncodeContext::encode_to_vec(&pixels, &desc, &EncodeConfig::max(4), &mut encoded)
            .unwrap();

        let mut from_slice = Vec::new();
        QoigDecodeContext::decode_to_vec(&encoded, &mut from_slice).unwrap();

        let mut streamed = Vec::new();
        QoigDecodeContext::decode_rows(&encoded[..], &mut streamed).unwrap();

        assert_eq!(from_slice, streamed);
        assert_eq!(streamed, pixels);
    }
}
