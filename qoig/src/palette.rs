//! Seed palettes for the two long caches.
//!
//! Both caches start from a fixed 256-color palette resembling common
//! image colors. The tables are wire format: changing an entry breaks
//! every existing stream, so they are kept as `0xRRGGBBAA` words and
//! expanded per channel, which makes them independent of host byte order.

use crate::Rgba;

const fn expand(words: &[u32; 256]) -> [Rgba; 256] {
    let mut out = [Rgba::new(0, 0, 0, 0); 256];
    let mut i = 0;
    while i < 256 {
        let [r, g, b, a] = words[i].to_be_bytes();
        out[i] = Rgba::new(r, g, b, a);
        i += 1;
    }
    out
}

pub(crate) const LONG_EXACT_SEED: [Rgba; 256] = expand(&LONG_EXACT_WORDS);
pub(crate) const LONG_NEAR_SEED: [Rgba; 256] = expand(&LONG_NEAR_WORDS);

#[rustfmt::skip]
const LONG_EXACT_WORDS: [u32; 256] = [
    0x0000FFFF, 0xFFCC33FF, 0x003300FF, 0x66CC66FF, 0x993399FF, 0xFFCCFFFF,
    0x0033CCFF, 0xFFFF00FF, 0x838383FF, 0x66FF33FF, 0x996666FF, 0xFFFFCCFF,
    0x006699FF, 0x66FFFFFF, 0xDDDDDDFF, 0x6C6C6CFF, 0x999933FF, 0xCC0066FF,
    0x009966FF, 0x330099FF, 0x9999FFFF, 0xC6C6C6FF, 0x99CC00FF, 0xCC3333FF,
    0x00CC33FF, 0x333366FF, 0x99CCCCFF, 0xCC33FFFF, 0x00CCFFFF, 0xCC6600FF,
    0x00FF00FF, 0x336633FF, 0x99FF99FF, 0xCC66CCFF, 0x00FFCCFF, 0x3366FFFF,
    0xFF0000FF, 0x339900FF, 0x660033FF, 0xCC9999FF, 0xFF00CCFF, 0x3399CCFF,
    0x6600FFFF, 0x101010FF, 0x663300FF, 0xCCCC66FF, 0xFF3399FF, 0x33CC99FF,
    0x6633CCFF, 0x6A6A6AFF, 0xF9F9F9FF, 0xCCFF33FF, 0xFF6666FF, 0x33FF66FF,
    0x666699FF, 0xCCFFFFFF, 0x535353FF, 0xE2E2E2FF, 0xFF9933FF, 0x000000FF,
    0x669966FF, 0x990099FF, 0xFF99FFFF, 0x0000CCFF, 0xFFCC00FF, 0x5A5A5AFF,
    0x66CC33FF, 0x993366FF, 0xFFCCCCFF, 0x003399FF, 0x66CCFFFF, 0xB4B4B4FF,
    0x66FF00FF, 0x996633FF, 0xFFFF99FF, 0x006666FF, 0x66FFCCFF, 0x9966FFFF,
    0x9D9D9DFF, 0x999900FF, 0xCC0033FF, 0x009933FF, 0x330066FF, 0x9999CCFF,
    0xCC00FFFF, 0x0099FFFF, 0xCC3300FF, 0x00CC00FF, 0x333333FF, 0x99CC99FF,
    0xCC33CCFF, 0x00CCCCFF, 0x3333FFFF, 0xFEFEFEFF, 0x336600FF, 0x99FF66FF,
    0xCC6699FF, 0x00FF99FF, 0x3366CCFF, 0x585858FF, 0xE7E7E7FF, 0x660000FF,
    0xCC9966FF, 0xFF0099FF, 0x339999FF, 0x6600CCFF, 0x414141FF, 0xD0D0D0FF,
    0xCCCC33FF, 0xFF3366FF, 0x33CC66FF, 0x663399FF, 0xCCCCFFFF, 0x2A2A2AFF,
    0xCCFF00FF, 0xFF6633FF, 0x33FF33FF, 0x666666FF, 0xCCFFCCFF, 0xFF66FFFF,
    0x33FFFFFF, 0xFF9900FF, 0x313131FF, 0x669933FF, 0x990066FF, 0xFF99CCFF,
    0x000099FF, 0x6699FFFF, 0x8B8B8BFF, 0x66CC00FF, 0x993333FF, 0xFFCC99FF,
    0x003366FF, 0x66CCCCFF, 0x9933FFFF, 0x747474FF, 0x996600FF, 0xFFFF66FF,
    0x006633FF, 0x66FF99FF, 0x9966CCFF, 0xCECECEFF, 0x0066FFFF, 0xCC0000FF,
    0x009900FF, 0x330033FF, 0x999999FF, 0xCC00CCFF, 0x0099CCFF, 0x3300FFFF,
    0xD5D5D5FF, 0x333300FF, 0x99CC66FF, 0xCC3399FF, 0x00CC99FF, 0x3333CCFF,
    0x2F2F2FFF, 0xBEBEBEFF, 0x99FF33FF, 0xCC6666FF, 0x00FF66FF, 0x336699FF,
    0x99FFFFFF, 0x181818FF, 0xA7A7A7FF, 0xCC9933FF, 0xFF0066FF, 0x339966FF,
    0x660099FF, 0xCC99FFFF, 0x010101FF, 0xCCCC00FF, 0xFF3333FF, 0x33CC33FF,
    0x663366FF, 0xCCCCCCFF, 0xFF33FFFF, 0x33CCFFFF, 0xFF6600FF, 0x33FF00FF,
    0x666633FF, 0xCCFF99FF, 0xFF66CCFF, 0x33FFCCFF, 0x6666FFFF, 0x626262FF,
    0x669900FF, 0x990033FF, 0xFF9999FF, 0x000066FF, 0x6699CCFF, 0x9900FFFF,
    0x4B4B4BFF, 0x993300FF, 0xFFCC66FF, 0x003333FF, 0x66CC99FF, 0x9933CCFF,
    0xA5A5A5FF, 0x0033FFFF, 0xFFFF33FF, 0x006600FF, 0x66FF66FF, 0x996699FF,
    0xFFFFFFFF, 0x0066CCFF, 0x1D1D1DFF, 0xACACACFF, 0x330000FF, 0x999966FF,
    0xCC0099FF, 0x009999FF, 0x3300CCFF, 0x060606FF, 0x959595FF, 0x99CC33FF,
    0xCC3366FF, 0x00CC66FF, 0x333399FF, 0x99CCFFFF, 0xEFEFEFFF, 0x99FF00FF,
    0xCC6633FF, 0x00FF33FF, 0x336666FF, 0x99FFCCFF, 0xCC66FFFF, 0x00FFFFFF,
    0xCC9900FF, 0xFF0033FF, 0x339933FF, 0x660066FF, 0xCC99CCFF, 0xFF00FFFF,
    0x3399FFFF, 0xFF3300FF, 0x33CC00FF, 0x663333FF, 0xCCCC99FF, 0xFF33CCFF,
    0x33CCCCFF, 0x6633FFFF, 0x393939FF, 0x666600FF, 0xCCFF66FF, 0xFF6699FF,
    0x33FF99FF, 0x6666CCFF, 0x939393FF, 0x222222FF, 0x990000FF, 0xFF9966FF,
    0x000033FF, 0x669999FF, 0x9900CCFF, 0x7C7C7CFF,
];

#[rustfmt::skip]
const LONG_NEAR_WORDS: [u32; 256] = [
    0x3333FFFF, 0x545454FF, 0xACACACFF, 0xCCCC00FF, 0xCC6600FF, 0xFFCC66FF,
    0xFF6666FF, 0x333366FF, 0x585858FF, 0x636363FF, 0xFF99CCFF, 0xFF33CCFF,
    0x3300CCFF, 0x8F8F8FFF, 0x9A9A9AFF, 0x66FFCCFF, 0xB0B0B0FF, 0xFF9933FF,
    0xFF3333FF, 0x330033FF, 0xDCDCDCFF, 0xE7E7E7FF, 0x66FF33FF, 0xFF0099FF,
    0x3C3C3CFF, 0x99FF33FF, 0xECECECFF, 0x66CC99FF, 0x666699FF, 0x3F3F3FFF,
    0xFF0000FF, 0x996699FF, 0xCCCCFFFF, 0xCC66FFFF, 0x66CC00FF, 0x666600FF,
    0x8C8C8CFF, 0x99CC00FF, 0x996600FF, 0xCCCC66FF, 0xCC6666FF, 0x003366FF,
    0xCECECEFF, 0xD9D9D9FF, 0xCC99CCFF, 0xCC33CCFF, 0x0000CCFF, 0x242424FF,
    0x7C7C7CFF, 0x33FFCCFF, 0x262626FF, 0xCC9933FF, 0xCC3333FF, 0x000033FF,
    0x525252FF, 0x5D5D5DFF, 0x33FF33FF, 0xCC0099FF, 0x7E7E7EFF, 0xFF00FFFF,
    0xFFFF99FF, 0x33CC99FF, 0x336699FF, 0x66CCFFFF, 0xCC0000FF, 0xCBCBCBFF,
    0xFF0066FF, 0xFFFF00FF, 0x33CC00FF, 0x336600FF, 0x66CC66FF, 0x666666FF,
    0xBCBCBCFF, 0x99CC66FF, 0x996666FF, 0x6699CCFF, 0x6633CCFF, 0x4F4F4FFF,
    0x9999CCFF, 0x9933CCFF, 0x707070FF, 0x7B7B7BFF, 0x669933FF, 0x663333FF,
    0x9C9C9CFF, 0x999933FF, 0x993333FF, 0xBDBDBDFF, 0x660099FF, 0xD3D3D3FF,
    0x00FF33FF, 0x990099FF, 0xF4F4F4FF, 0xCC00FFFF, 0xCCFF99FF, 0x660000FF,
    0xFFFFFFFF, 0x33CCFFFF, 0x990000FF, 0x414141FF, 0xCC0066FF, 0xCCFF00FF,
    0x00CC00FF, 0xFFFF66FF, 0x33CC66FF, 0x336666FF, 0x8E8E8EFF, 0x999999FF,
    0xFFCCCCFF, 0xFF66CCFF, 0x3333CCFF, 0xC5C5C5FF, 0xD0D0D0FF, 0xDBDBDBFF,
    0xE6E6E6FF, 0xFFCC33FF, 0xFF6633FF, 0x333333FF, 0x8C8C8CFF, 0xE4E4E4FF,
    0xFF9999FF, 0xFF3399FF, 0x330099FF, 0x494949FF, 0x6600FFFF, 0x66FF99FF,
    0x6A6A6AFF, 0xFF9900FF, 0xFF3300FF, 0x330000FF, 0xCCFFFFFF, 0x660066FF,
    0x66FF00FF, 0xB7B7B7FF, 0x990066FF, 0x99FF00FF, 0xD8D8D8FF, 0xCCFF66FF,
    0x00CC66FF, 0x006666FF, 0x1C1C1CFF, 0x747474FF, 0xCCCCCCFF, 0xCC66CCFF,
    0x0033CCFF, 0x3B3B3BFF, 0x464646FF, 0x515151FF, 0x5C5C5CFF, 0xCCCC33FF,
    0xCC6633FF, 0x003333FF, 0x888888FF, 0x939393FF, 0xCC9999FF, 0xCC3399FF,
    0xFF99FFFF, 0xFF33FFFF, 0x3300FFFF, 0x33FF99FF, 0xE0E0E0FF, 0xCC9900FF,
    0xCC3300FF, 0xFF9966FF, 0xFF3366FF, 0x330066FF, 0x33FF00FF, 0x2D2D2DFF,
    0x66FF66FF, 0xFF00CCFF, 0x4E4E4EFF, 0x99FF66FF, 0x646464FF, 0x66CCCCFF,
    0x6666CCFF, 0x858585FF, 0xFF0033FF, 0x9966CCFF, 0xA6A6A6FF, 0xB1B1B1FF,
    0x66CC33FF, 0x666633FF, 0xD2D2D2FF, 0x99CC33FF, 0x996633FF, 0x669999FF,
    0x663399FF, 0x444444FF, 0x999999FF, 0x993399FF, 0xCC99FFFF, 0xCC33FFFF,
    0x669900FF, 0x663300FF, 0x565656FF, 0x999900FF, 0x993300FF, 0xCC9966FF,
    0xCC3366FF, 0x000066FF, 0x00FF00FF, 0xA3A3A3FF, 0x33FF66FF, 0xCC00CCFF,
    0xC4C4C4FF, 0xCFCFCFFF, 0xFFFFCCFF, 0x33CCCCFF, 0x3366CCFF, 0xFBFBFBFF,
    0xCC0033FF, 0x848484FF, 0xDCDCDCFF, 0xFFFF33FF, 0x33CC33FF, 0x336633FF,
    0x484848FF, 0x535353FF, 0xFFCC99FF, 0xFF6699FF, 0x333399FF, 0x6699FFFF,
    0x6633FFFF, 0x959595FF, 0x9999FFFF, 0xFFCC00FF, 0xFF6600FF, 0x333300FF,
    0x669966FF, 0x663366FF, 0xE2E2E2FF, 0x999966FF, 0x993366FF, 0x141414FF,
    0x6600CCFF, 0xC4C4C4FF, 0x00FF66FF, 0x9900CCFF, 0x3A3A3AFF, 0x454545FF,
    0xCCFFCCFF, 0x660033FF, 0x0066CCFF, 0x717171FF, 0x990033FF, 0x878787FF,
    0x929292FF, 0xCCFF33FF, 0x00CC33FF, 0x006633FF, 0xBEBEBEFF, 0xC9C9C9FF,
    0xCCCC99FF, 0xCC6699FF, 0xFFCCFFFF, 0xFF66FFFF,
];
