//! Sine lookup table.

use crate::constants::SINE_TABLE_SIZE;

const INDEX_MASK: usize = SINE_TABLE_SIZE - 1;

const _: () = assert!(SINE_TABLE_SIZE.is_power_of_two());

/// One full sine cycle, `sin(2π·i / SINE_TABLE_SIZE)`, rounded to `f32`.
#[rustfmt::skip]
pub const SINE_TABLE: [f32; SINE_TABLE_SIZE] = [
    0.0, 0.024541229, 0.049067676, 0.07356457, 0.09801714, 0.12241068, 0.14673047, 0.17096189,
    0.19509032, 0.21910124, 0.24298018, 0.26671275, 0.29028466, 0.31368175, 0.33688986, 0.35989505,
    0.38268343, 0.4052413, 0.42755508, 0.44961134, 0.47139674, 0.4928982, 0.51410276, 0.53499764,
    0.55557024, 0.57580817, 0.5956993, 0.6152316, 0.6343933, 0.65317285, 0.671559, 0.68954057,
    0.70710677, 0.7242471, 0.7409511, 0.7572088, 0.77301043, 0.7883464, 0.8032075, 0.8175848,
    0.8314696, 0.8448536, 0.8577286, 0.87008697, 0.8819213, 0.8932243, 0.9039893, 0.9142098,
    0.9238795, 0.9329928, 0.94154406, 0.94952816, 0.95694035, 0.96377605, 0.97003126, 0.9757021,
    0.98078525, 0.98527765, 0.9891765, 0.99247956, 0.9951847, 0.99729043, 0.99879545, 0.9996988,
    1.0, 0.9996988, 0.99879545, 0.99729043, 0.9951847, 0.99247956, 0.9891765, 0.98527765,
    0.98078525, 0.9757021, 0.97003126, 0.96377605, 0.95694035, 0.94952816, 0.94154406, 0.9329928,
    0.9238795, 0.9142098, 0.9039893, 0.8932243, 0.8819213, 0.87008697, 0.8577286, 0.8448536,
    0.8314696, 0.8175848, 0.8032075, 0.7883464, 0.77301043, 0.7572088, 0.7409511, 0.7242471,
    0.70710677, 0.68954057, 0.671559, 0.65317285, 0.6343933, 0.6152316, 0.5956993, 0.57580817,
    0.55557024, 0.53499764, 0.51410276, 0.4928982, 0.47139674, 0.44961134, 0.42755508, 0.4052413,
    0.38268343, 0.35989505, 0.33688986, 0.31368175, 0.29028466, 0.26671275, 0.24298018, 0.21910124,
    0.19509032, 0.17096189, 0.14673047, 0.12241068, 0.09801714, 0.07356457, 0.049067676, 0.024541229,
    0.0, -0.024541229, -0.049067676, -0.07356457, -0.09801714, -0.12241068, -0.14673047, -0.17096189,
    -0.19509032, -0.21910124, -0.24298018, -0.26671275, -0.29028466, -0.31368175, -0.33688986, -0.35989505,
    -0.38268343, -0.4052413, -0.42755508, -0.44961134, -0.47139674, -0.4928982, -0.51410276, -0.53499764,
    -0.55557024, -0.57580817, -0.5956993, -0.6152316, -0.6343933, -0.65317285, -0.671559, -0.68954057,
    -0.70710677, -0.7242471, -0.7409511, -0.7572088, -0.77301043, -0.7883464, -0.8032075, -0.8175848,
    -0.8314696, -0.8448536, -0.8577286, -0.87008697, -0.8819213, -0.8932243, -0.9039893, -0.9142098,
    -0.9238795, -0.9329928, -0.94154406, -0.94952816, -0.95694035, -0.96377605, -0.97003126, -0.9757021,
    -0.98078525, -0.98527765, -0.9891765, -0.99247956, -0.9951847, -0.99729043, -0.99879545, -0.9996988,
    -1.0, -0.9996988, -0.99879545, -0.99729043, -0.9951847, -0.99247956, -0.9891765, -0.98527765,
    -0.98078525, -0.9757021, -0.97003126, -0.96377605, -0.95694035, -0.94952816, -0.94154406, -0.9329928,
    -0.9238795, -0.9142098, -0.9039893, -0.8932243, -0.8819213, -0.87008697, -0.8577286, -0.8448536,
    -0.8314696, -0.8175848, -0.8032075, -0.7883464, -0.77301043, -0.7572088, -0.7409511, -0.7242471,
    -0.70710677, -0.68954057, -0.671559, -0.65317285, -0.6343933, -0.6152316, -0.5956993, -0.57580817,
    -0.55557024, -0.53499764, -0.51410276, -0.4928982, -0.47139674, -0.44961134, -0.42755508, -0.4052413,
    -0.38268343, -0.35989505, -0.33688986, -0.31368175, -0.29028466, -0.26671275, -0.24298018, -0.21910124,
    -0.19509032, -0.17096189, -0.14673047, -0.12241068, -0.09801714, -0.07356457, -0.049067676, -0.024541229,
];

/// Truncating lookups into [`SINE_TABLE`].
///
/// No interpolation, so results match `sin(2π·phase)` to within one table
/// step. The table itself is a `const`, so a `SineTable` costs nothing to
/// build and can live in a `static`.
#[derive(Debug, Clone, Copy)]
pub struct SineTable {
    table: &'static [f32; SINE_TABLE_SIZE],
}

impl SineTable {
    pub const fn new() -> Self {
        SineTable { table: &SINE_TABLE }
    }

    /// Sine of `2π·phase` for a phase in `[0, 1)`.
    ///
    /// The index wraps with a power-of-two mask, so a phase of exactly 1.0
    /// lands back on entry 0.
    #[inline(always)]
    pub fn lookup(&self, phase: f32) -> f32 {
        let index = (phase * SINE_TABLE_SIZE as f32) as usize & INDEX_MASK;
        self.table[index]
    }
}

impl Default for SineTable {
    fn default() -> Self {
        Self::new()
    }
}
