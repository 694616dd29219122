// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bit accessors: indexed reads and writes of bits, nibbles, bytes, halfwords
// and words, plus channel expansion for the compact 16-bit colour formats.
//
// The top-level functions address raster scanlines (`&[u8]`): sub-byte values
// are MSB-first and multi-byte values are little-endian. The `word` module
// addresses packed scanlines (`&[u32]`), where each word holds its first
// pixel in the most significant position.
//
// None of these functions check bounds beyond what slice indexing already
// does; callers validate dimensions once per conversion.

// ---------------------------------------------------------------------------
// Raster scanline access
// ---------------------------------------------------------------------------

/// Bit `index`, where pixel 0 is the most significant bit of byte 0.
#[inline]
pub fn get_bit(data: &[u8], index: usize) -> u8 {
    (data[index >> 3] >> (7 - (index & 7))) & 1
}

/// Write bit `index` without disturbing its neighbours.
#[inline]
pub fn set_bit(data: &mut [u8], index: usize, value: u8) {
    let byte = &mut data[index >> 3];
    *byte &= !(0x80 >> (index & 7));
    *byte |= (value & 1) << (7 - (index & 7));
}

/// Nibble `index`, where pixel 0 is the high nibble of byte 0.
#[inline]
pub fn get_qbit(data: &[u8], index: usize) -> u8 {
    (data[index >> 1] >> (4 * (1 - (index & 1)))) & 0x0F
}

/// Write nibble `index` without disturbing its sibling.
#[inline]
pub fn set_qbit(data: &mut [u8], index: usize, value: u8) {
    let byte = &mut data[index >> 1];
    *byte &= !(0xF0 >> (4 * (index & 1)));
    *byte |= (value & 0x0F) << (4 * (1 - (index & 1)));
}

#[inline]
pub fn get_byte(data: &[u8], index: usize) -> u8 {
    data[index]
}

#[inline]
pub fn set_byte(data: &mut [u8], index: usize, value: u8) {
    data[index] = value;
}

/// Little-endian halfword `index` (bytes `2*index..2*index + 2`).
#[inline]
pub fn get_u16(data: &[u8], index: usize) -> u16 {
    let at = index * 2;
    u16::from_le_bytes([data[at], data[at + 1]])
}

#[inline]
pub fn set_u16(data: &mut [u8], index: usize, value: u16) {
    let at = index * 2;
    data[at..at + 2].copy_from_slice(&value.to_le_bytes());
}

/// Little-endian word `index` (bytes `4*index..4*index + 4`).
#[inline]
pub fn get_u32(data: &[u8], index: usize) -> u32 {
    let at = index * 4;
    u32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]])
}

#[inline]
pub fn set_u32(data: &mut [u8], index: usize, value: u32) {
    let at = index * 4;
    data[at..at + 4].copy_from_slice(&value.to_le_bytes());
}

// ---------------------------------------------------------------------------
// Packed scanline access
// ---------------------------------------------------------------------------

/// Accessors over word-aligned packed scanlines.
///
/// Value `n` of width `w` bits lives in word `n / (32 / w)`, shifted so that
/// the lowest `n` within a word occupies the most significant bits. Byte 0 of
/// a line is therefore bits 24..32 of word 0 regardless of host endianness.
pub mod word {
    #[inline]
    fn shift(index: usize, bits: u32) -> (usize, u32) {
        let per_word = (32 / bits) as usize;
        let slot = (index % per_word) as u32;
        (index / per_word, 32 - bits * (slot + 1))
    }

    #[inline]
    fn get_field(line: &[u32], index: usize, bits: u32) -> u32 {
        let (word, shift) = shift(index, bits);
        let mask = (1u32 << bits) - 1;
        (line[word] >> shift) & mask
    }

    #[inline]
    fn set_field(line: &mut [u32], index: usize, bits: u32, value: u32) {
        let (word, shift) = shift(index, bits);
        let mask = ((1u32 << bits) - 1) << shift;
        line[word] = (line[word] & !mask) | ((value << shift) & mask);
    }

    #[inline]
    pub fn get_bit(line: &[u32], index: usize) -> u8 {
        get_field(line, index, 1) as u8
    }

    #[inline]
    pub fn set_bit(line: &mut [u32], index: usize, value: u8) {
        set_field(line, index, 1, u32::from(value));
    }

    /// 2-bit value `index`.
    #[inline]
    pub fn get_dibit(line: &[u32], index: usize) -> u8 {
        get_field(line, index, 2) as u8
    }

    #[inline]
    pub fn set_dibit(line: &mut [u32], index: usize, value: u8) {
        set_field(line, index, 2, u32::from(value));
    }

    #[inline]
    pub fn get_qbit(line: &[u32], index: usize) -> u8 {
        get_field(line, index, 4) as u8
    }

    #[inline]
    pub fn set_qbit(line: &mut [u32], index: usize, value: u8) {
        set_field(line, index, 4, u32::from(value));
    }

    #[inline]
    pub fn get_byte(line: &[u32], index: usize) -> u8 {
        get_field(line, index, 8) as u8
    }

    #[inline]
    pub fn set_byte(line: &mut [u32], index: usize, value: u8) {
        set_field(line, index, 8, u32::from(value));
    }

    #[inline]
    pub fn get_u16(line: &[u32], index: usize) -> u16 {
        get_field(line, index, 16) as u16
    }

    #[inline]
    pub fn set_u16(line: &mut [u32], index: usize, value: u16) {
        set_field(line, index, 16, u32::from(value));
    }

    #[inline]
    pub fn get_u32(line: &[u32], index: usize) -> u32 {
        line[index]
    }

    #[inline]
    pub fn set_u32(line: &mut [u32], index: usize, value: u32) {
        line[index] = value;
    }
}

// ---------------------------------------------------------------------------
// Channel packing and expansion
// ---------------------------------------------------------------------------

/// Pack channels as `0xRRGGBBAA`, the 32 bpp packed pixel layout.
#[inline]
pub const fn encode_rgba(red: u8, green: u8, blue: u8, alpha: u8) -> u32 {
    ((red as u32) << 24) | ((green as u32) << 16) | ((blue as u32) << 8) | alpha as u32
}

/// Inverse of [`encode_rgba`], returning `(red, green, blue, alpha)`.
#[inline]
pub const fn decode_rgba(value: u32) -> (u8, u8, u8, u8) {
    (
        (value >> 24) as u8,
        (value >> 16) as u8,
        (value >> 8) as u8,
        value as u8,
    )
}

/// Widen a 5-bit channel to 8 bits by replicating its high bits.
#[inline]
pub const fn expand5to8(channel: u8) -> u8 {
    let c = channel & 0x1F;
    (c << 3) | (c >> 2)
}

/// Widen a 6-bit channel to 8 bits by replicating its high bits.
#[inline]
pub const fn expand6to8(channel: u8) -> u8 {
    let c = channel & 0x3F;
    (c << 2) | (c >> 4)
}

/// Decode `x RRRRR GGGGG BBBBB` into an opaque `0xRRGGBBAA` word.
#[inline]
pub const fn rgb555_to_rgba(value: u16) -> u32 {
    let red = ((value >> 10) & 0x1F) as u8;
    let green = ((value >> 5) & 0x1F) as u8;
    let blue = (value & 0x1F) as u8;
    encode_rgba(expand5to8(red), expand5to8(green), expand5to8(blue), 0xFF)
}

/// Decode `RRRRR GGGGGG BBBBB` into an opaque `0xRRGGBBAA` word.
#[inline]
pub const fn rgb565_to_rgba(value: u16) -> u32 {
    let red = ((value >> 11) & 0x1F) as u8;
    let green = ((value >> 5) & 0x3F) as u8;
    let blue = (value & 0x1F) as u8;
    encode_rgba(expand5to8(red), expand6to8(green), expand5to8(blue), 0xFF)
}

/// Decode `A RRRRR GGGGG BBBBB`; the alpha bit becomes 0 or 255.
#[inline]
pub const fn argb1555_to_rgba(value: u16) -> u32 {
    let alpha = if value & 0x8000 != 0 { 0xFF } else { 0 };
    (rgb555_to_rgba(value) & 0xFFFF_FF00) | alpha
}

/// Narrow an 8-bit channel to 5 bits, rounding to the nearest level.
#[inline]
pub const fn contract8to5(channel: u8) -> u8 {
    ((channel as u16 * 31 + 127) / 255) as u8
}

/// Narrow an 8-bit channel to 6 bits, rounding to the nearest level.
#[inline]
pub const fn contract8to6(channel: u8) -> u8 {
    ((channel as u16 * 63 + 127) / 255) as u8
}

/// Narrow an `0xRRGGBBAA` word to `0 RRRRR GGGGG BBBBB`, dropping alpha.
#[inline]
pub const fn rgba_to_rgb555(value: u32) -> u16 {
    let (red, green, blue, _) = decode_rgba(value);
    ((contract8to5(red) as u16) << 10)
        | ((contract8to5(green) as u16) << 5)
        | contract8to5(blue) as u16
}

/// Narrow an `0xRRGGBBAA` word to `RRRRR GGGGGG BBBBB`, dropping alpha.
#[inline]
pub const fn rgba_to_rgb565(value: u32) -> u16 {
    let (red, green, blue, _) = decode_rgba(value);
    ((contract8to5(red) as u16) << 11)
        | ((contract8to6(green) as u16) << 5)
        | contract8to5(blue) as u16
}
