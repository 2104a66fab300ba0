//! Memory tape of fixed-width cells that grows on demand.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

/// Default number of cells a fresh tape starts with.
pub const DEFAULT_MEMORY_SIZE: usize = 30_000;

/// Largest initial tape accepted from configuration (1 GiB of cells).
/// Growth during execution is not capped.
pub const MAX_MEMORY_SIZE: usize = 1 << 28;

/// Width of one tape cell. Arithmetic wraps modulo `2^bits`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellWidth {
    Four,
    #[default]
    Eight,
    Sixteen,
    ThirtyTwo,
}

impl CellWidth {
    pub fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            4 => Some(CellWidth::Four),
            8 => Some(CellWidth::Eight),
            16 => Some(CellWidth::Sixteen),
            32 => Some(CellWidth::ThirtyTwo),
            _ => None,
        }
    }

    pub fn bits(self) -> u32 {
        match self {
            CellWidth::Four => 4,
            CellWidth::Eight => 8,
            CellWidth::Sixteen => 16,
            CellWidth::ThirtyTwo => 32,
        }
    }

    /// `2^bits`, the number of distinct values a cell can hold.
    pub fn modulus(self) -> u64 {
        1u64 << self.bits()
    }
}

impl fmt::Display for CellWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

impl FromStr for CellWidth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .ok()
            .and_then(CellWidth::from_bits)
            .ok_or_else(|| format!("cell size must be one of 4, 8, 16, 32 (got '{s}')"))
    }
}

/// Zero-initialised cells, each kept in `[0, 2^W)`.
///
/// The tape only ever grows to the right: when an index past the end is
/// requested it is extended by half its current length (repeatedly, if one
/// step is not enough) with zero cells.
#[derive(Debug, Clone)]
pub struct Tape {
    cells: Vec<u32>,
    width: CellWidth,
}

impl Tape {
    /// A tape of `len` zero cells. A zero length is bumped to one cell so
    /// growth always makes progress.
    pub fn new(len: usize, width: CellWidth) -> Self {
        Self {
            cells: vec![0; len.max(1)],
            width,
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn width(&self) -> CellWidth {
        self.width
    }

    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    /// Grow until `index` is addressable. Idempotent; never shrinks and
    /// never touches existing cells.
    pub fn ensure_capacity(&mut self, index: usize) {
        if index < self.cells.len() {
            return;
        }
        let old_len = self.cells.len();
        let mut new_len = old_len;
        while new_len <= index {
            new_len += (new_len / 2).max(1);
        }
        self.cells.resize(new_len, 0);
        debug!(old_len, new_len, index, "tape grown");
    }

    /// Value at `index`, growing the tape first if needed.
    pub fn get(&mut self, index: usize) -> u32 {
        self.ensure_capacity(index);
        self.cells[index]
    }

    /// Store `value` reduced modulo `2^W`.
    pub fn set(&mut self, index: usize, value: u64) {
        self.ensure_capacity(index);
        self.cells[index] = (value % self.width.modulus()) as u32;
    }

    /// Add a signed `delta` with true (always non-negative) modulo.
    pub fn add(&mut self, index: usize, delta: i64) {
        let modulus = self.width.modulus();
        let step = delta.rem_euclid(modulus as i64) as u64;
        let current = self.get(index) as u64;
        self.set(index, current + step);
    }
}
