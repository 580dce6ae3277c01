//! Fixed-width palette indices packed back-to-back across 64-bit words.
//!
//! Entries carry no padding, so one entry may straddle two 32-bit halves and, through
//! them, two 64-bit words. Logical order is Y-major, then Z, then X:
//! `index = y * (width * depth) + z * width + x`.

const HALF_BITS: usize = 32;

/// One 64-bit word split into its 32-bit halves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PackedWord {
    pub hi: u32,
    pub lo: u32,
}

impl PackedWord {
    #[inline]
    pub const fn new(hi: u32, lo: u32) -> Self {
        Self { hi, lo }
    }
}

impl From<u64> for PackedWord {
    #[inline]
    fn from(v: u64) -> Self {
        Self {
            hi: (v >> 32) as u32,
            lo: v as u32,
        }
    }
}

impl From<i64> for PackedWord {
    #[inline]
    fn from(v: i64) -> Self {
        Self::from(v as u64)
    }
}

impl From<PackedWord> for u64 {
    #[inline]
    fn from(w: PackedWord) -> Self {
        (u64::from(w.hi) << 32) | u64::from(w.lo)
    }
}

/// Bits per entry for a palette of `palette_size` states: `max(2, ceil(log2(n)))`.
pub fn bits_per_block(palette_size: usize) -> u32 {
    let needed = match palette_size {
        0 | 1 => 0,
        n => usize::BITS - (n - 1).leading_zeros(),
    };
    needed.clamp(2, 32)
}

/// Decoded `[width][height][depth]` grid of raw palette indices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateIndexGrid {
    pub width: usize,
    pub height: usize,
    pub depth: usize,
    data: Vec<u32>,
}

impl StateIndexGrid {
    pub fn new(width: usize, height: usize, depth: usize) -> Self {
        Self {
            width,
            height,
            depth,
            data: vec![0; width * height * depth],
        }
    }

    #[inline]
    fn idx(&self, x: usize, y: usize, z: usize) -> Option<usize> {
        if x < self.width && y < self.height && z < self.depth {
            Some((x * self.height + y) * self.depth + z)
        } else {
            None
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> Option<u32> {
        self.idx(x, y, z).map(|i| self.data[i])
    }

    pub fn set(&mut self, x: usize, y: usize, z: usize, v: u32) {
        if let Some(i) = self.idx(x, y, z) {
            self.data[i] = v;
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// `(x, y, z, index)` for every cell, x outermost.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, usize, u32)> + '_ {
        let (h, d) = (self.height, self.depth);
        self.data.iter().enumerate().map(move |(i, &v)| {
            let z = i % d;
            let y = (i / d) % h;
            let x = i / (d * h);
            (x, y, z, v)
        })
    }
}

#[inline]
fn linear_index(x: usize, y: usize, z: usize, width: usize, depth: usize) -> usize {
    y * (width * depth) + z * width + x
}

// Even half-index -> low half of word h/2, odd -> high half. Missing words read as zero.
#[inline]
fn half(words: &[PackedWord], h: usize) -> u32 {
    match words.get(h / 2) {
        Some(w) if h % 2 == 0 => w.lo,
        Some(w) => w.hi,
        None => 0,
    }
}

#[inline]
fn extract(words: &[PackedWord], index: usize, bits: u32) -> u32 {
    let bits = bits as usize;
    let mask = ((1u64 << bits) - 1) as u32;
    let start = index * bits;
    let start_half = start / HALF_BITS;
    let end_half = (start + bits - 1) / HALF_BITS;
    let local = start % HALF_BITS;
    if start_half == end_half {
        (half(words, start_half) >> local) & mask
    } else {
        let low = half(words, start_half) >> local;
        let high = half(words, start_half + 1) << (HALF_BITS - local);
        (low | high) & mask
    }
}

/// Unpacks a `width x height x depth` region. Truncated input decodes as zeros.
pub fn decode_block_states(
    words: &[PackedWord],
    palette_size: usize,
    width: usize,
    height: usize,
    depth: usize,
) -> StateIndexGrid {
    let bits = bits_per_block(palette_size);
    let mut grid = StateIndexGrid::new(width, height, depth);
    for x in 0..width {
        for y in 0..height {
            for z in 0..depth {
                let index = linear_index(x, y, z, width, depth);
                let v = extract(words, index, bits);
                let i = (x * height + y) * depth + z;
                grid.data[i] = v;
            }
        }
    }
    grid
}

/// Inverse of [`decode_block_states`]: packs `grid` into 64-bit words.
pub fn pack_block_states(grid: &StateIndexGrid, palette_size: usize) -> Vec<i64> {
    let bits = bits_per_block(palette_size) as usize;
    let mask = (1u64 << bits) - 1;
    let total_bits = grid.len() * bits;
    let mut words = vec![0u64; total_bits.div_ceil(64)];
    for (x, y, z, v) in grid.iter() {
        let index = linear_index(x, y, z, grid.width, grid.depth);
        let v = u64::from(v) & mask;
        let start = index * bits;
        let (word, shift) = (start / 64, start % 64);
        words[word] |= v << shift;
        if shift + bits > 64 {
            words[word + 1] |= v >> (64 - shift);
        }
    }
    words.into_iter().map(|w| w as i64).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_table() {
        let sizes = [1usize, 2, 3, 4, 5, 8, 16, 17];
        let bits: Vec<u32> = sizes.iter().map(|&n| bits_per_block(n)).collect();
        assert_eq!(bits, vec![2, 2, 2, 2, 3, 3, 4, 5]);
        assert_eq!(bits_per_block(0), 2);
        assert_eq!(bits_per_block(1 << 20), 20);
        assert_eq!(bits_per_block((1 << 20) + 1), 21);
    }

    #[test]
    fn word_halves() {
        let w = PackedWord::from(-1i64);
        assert_eq!(w, PackedWord::new(u32::MAX, u32::MAX));
        let w = PackedWord::from(0x0000_0001_8000_0000u64);
        assert_eq!(w, PackedWord::new(1, 0x8000_0000));
        assert_eq!(u64::from(w), 0x0000_0001_8000_0000);
    }

    #[test]
    fn straddles_half_boundary() {
        // 5-bit entries: entry 6 occupies bits 30..35 of word 0.
        let value = 0b10110u64;
        let word = PackedWord::from(value << 30);
        assert_eq!(extract(&[word], 6, 5), value as u32);
    }

    #[test]
    fn straddles_word_boundary() {
        // 5-bit entries: entry 12 occupies bits 60..65, crossing into word 1.
        let value = 0b11011u64;
        let w0 = PackedWord::from(value << 60);
        let w1 = PackedWord::from(value >> 4);
        assert_eq!(extract(&[w0, w1], 12, 5), value as u32);
        // Without the second word only the low four bits survive.
        assert_eq!(extract(&[w0], 12, 5), (value & 0b1111) as u32);
    }
}
