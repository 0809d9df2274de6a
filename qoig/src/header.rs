//! The 14-byte file header and its flag byte.

use crate::{
    consts::{QOIG_HEADER_SIZE, QOIG_MAGIC, QOIG_PIXELS_MAX},
    decode::{
        DecodeError, EmptyImageSnafu, ImageTooLargeSnafu, InvalidCacheIndexSnafu,
        InvalidChannelsSnafu, InvalidMagicSnafu, UnexpectedEofSnafu,
    },
    QoigDesc,
};
use byteorder::{BigEndian, ByteOrder};
use snafu::ensure;

/// The stream features carried in the header's flag byte.
///
/// The byte packs `longruns` into bit 7, the *disable* state of
/// `longindex` and `rawblocks` into bits 6 and 5, and `clen_index ^ 24`
/// into the low five bits, so that plain QOI comes out as `b'f'`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatFlags {
    pub clen_index: u8,
    pub longruns: bool,
    pub longindex: bool,
    pub rawblocks: bool,
}

impl FormatFlags {
    pub const fn to_byte(self) -> u8 {
        (self.longruns as u8) << 7
            | ((!self.longindex) as u8) << 6
            | ((!self.rawblocks) as u8) << 5
            | (self.clen_index ^ 24)
    }

    pub fn from_byte(byte: u8) -> Result<Self, DecodeError> {
        let clen_index = (byte & 0x1F) ^ 24;
        ensure!(clen_index <= 30, InvalidCacheIndexSnafu { index: clen_index });
        let flags = Self {
            clen_index,
            longruns: byte >> 7 != 0,
            longindex: byte >> 6 & 1 == 0,
            rawblocks: byte >> 5 & 1 == 0,
        };
        // Split 64 and the long caches are mutually exclusive; an encoder
        // never produces this combination.
        ensure!(
            !(flags.longindex && clen_index == 30),
            InvalidCacheIndexSnafu { index: clen_index }
        );
        Ok(flags)
    }
}

/// Everything the header carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub desc: QoigDesc,
    pub flags: FormatFlags,
}

impl Header {
    pub fn to_bytes(&self) -> [u8; QOIG_HEADER_SIZE] {
        let mut bytes = [0; QOIG_HEADER_SIZE];
        bytes[..3].copy_from_slice(&QOIG_MAGIC);
        bytes[3] = self.flags.to_byte();
        BigEndian::write_u32(&mut bytes[4..8], self.desc.width);
        BigEndian::write_u32(&mut bytes[8..12], self.desc.height);
        bytes[12] = self.desc.channels;
        bytes[13] = self.desc.colorspace;
        bytes
    }

    pub fn parse(data: &[u8]) -> Result<Self, DecodeError> {
        ensure!(data.len() >= QOIG_HEADER_SIZE, UnexpectedEofSnafu);
        ensure!(data[..3] == QOIG_MAGIC, InvalidMagicSnafu);
        let flags = FormatFlags::from_byte(data[3])?;
        let width = BigEndian::read_u32(&data[4..8]);
        let height = BigEndian::read_u32(&data[8..12]);
        let channels = data[12];
        ensure!(
            channels == 3 || channels == 4,
            InvalidChannelsSnafu { channels }
        );
        ensure!(width > 0 && height > 0, EmptyImageSnafu);
        ensure!(
            width as u64 * height as u64 <= QOIG_PIXELS_MAX,
            ImageTooLargeSnafu { width, height }
        );
        Ok(Self {
            desc: QoigDesc {
                width,
                height,
                channels,
                colorspace: data[13],
            },
            flags,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EncodeConfig;

    #[test]
    fn plain_qoi_reads_qoif() {
        let flags = EncodeConfig::PLAIN_QOI.flags();
        assert_eq!(flags.to_byte(), b'f');
        let header = Header {
            desc: QoigDesc::new(1, 1, 4),
            flags,
        };
        assert_eq!(&header.to_bytes()[..4], b"qoif");
    }

    #[test]
    fn flag_byte_round_trips() {
        for clen_index in 0..=30 {
            for bits in 0..8u8 {
                let flags = FormatFlags {
                    clen_index,
                    longruns: bits & 1 != 0,
                    longindex: bits & 2 != 0,
                    rawblocks: bits & 4 != 0,
                };
                if flags.longindex && clen_index == 30 {
                    continue;
                }
                assert_eq!(FormatFlags::from_byte(flags.to_byte()).unwrap(), flags);
            }
        }
    }

    #[test]
    fn rejects_bad_headers() {
        let good = Header {
            desc: QoigDesc::new(2, 3, 4),
            flags: EncodeConfig::PLAIN_QOI.flags(),
        }
        .to_bytes();

        let mut bad = good;
        bad[0] = b'x';
        assert!(matches!(
            Header::parse(&bad),
            Err(DecodeError::InvalidMagic)
        ));

        let mut bad = good;
        bad[12] = 5;
        assert!(matches!(
            Header::parse(&bad),
            Err(DecodeError::InvalidChannels { channels: 5 })
        ));

        let mut bad = good;
        bad[4..8].copy_from_slice(&0u32.to_be_bytes());
        assert!(matches!(Header::parse(&bad), Err(DecodeError::EmptyImage)));

        // Index 31 in the low bits: 31 ^ 24 = 7.
        let mut bad = good;
        bad[3] = 0x60 | 7;
        assert!(matches!(
            Header::parse(&bad),
            Err(DecodeError::InvalidCacheIndex { index: 31 })
        ));

        // Split 64 with long indexing on.
        let mut bad = good;
        bad[3] = 0x20 | 6;
        assert!(matches!(
            Header::parse(&bad),
            Err(DecodeError::InvalidCacheIndex { index: 30 })
        ));

        assert!(matches!(
            Header::parse(&good[..10]),
            Err(DecodeError::UnexpectedEof)
        ));
    }
}
