//! HUB75 LED panel scan-out.
//!
//! A HUB75 panel shows two rows at a time: row `y` of the upper half and row
//! `y + H/2` of the lower half share one row address. Each row pair is
//! refreshed by shifting one column per clock on six colour lines, latching
//! the shift register, then enabling the outputs for a hold time. Persistence
//! of vision does the rest, so the scan must be repeated continuously.
//!
//! Output enable (OE) is active low and is held high while the address lines
//! change and while data is shifted, so the panel never shows a half-written
//! row.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin, PinState};

use super::framebuffer::{Framebuffer, Rgb};

/// The panel's control and data lines.
///
/// All lines share one pin type; boards with mixed pin types can erase them
/// behind a common wrapper.
pub struct Hub75Pins<P> {
    pub r1: P,
    pub g1: P,
    pub b1: P,
    pub r2: P,
    pub g2: P,
    pub b2: P,
    /// Row address lines A..E, least significant first.
    pub addr: [P; 5],
    pub clk: P,
    pub lat: P,
    /// Output enable, active low.
    pub oe: P,
}

/// How channel intensities become on/off LED states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// Any non-zero channel lights the LED. One hold per row pair.
    Binary,
    /// Binary code modulation over the top `depth` bits (1..=8) of each
    /// channel. Plane `p` is held for `hold_us << p`.
    BitPlanes(u8),
}

impl ScanMode {
    /// Number of passes per frame.
    pub fn planes(self) -> u8 {
        match self {
            ScanMode::Binary => 1,
            ScanMode::BitPlanes(depth) => depth.clamp(1, 8),
        }
    }

    fn lit(self, level: u8, plane: u8) -> bool {
        match self {
            ScanMode::Binary => level != 0,
            ScanMode::BitPlanes(_) => {
                let bit = 8 - self.planes() + plane;
                (level >> bit) & 1 != 0
            }
        }
    }

    fn hold_us(self, base: u32, plane: u8) -> u32 {
        match self {
            ScanMode::Binary => base,
            ScanMode::BitPlanes(_) => base << plane,
        }
    }
}

/// HUB75 driver for panels up to 64 row pairs (5 address lines).
///
/// # Example
/// ```ignore
/// let mut panel = Hub75::new(pins, delay, ScanMode::Binary);
/// panel.init()?;
/// loop {
///     panel.refresh(&fb)?;
/// }
/// ```
pub struct Hub75<P, D> {
    pins: Hub75Pins<P>,
    delay: D,
    mode: ScanMode,
    hold_us: u32,
    row: usize,
    plane: u8,
}

impl<P, D> Hub75<P, D>
where
    P: OutputPin,
    D: DelayNs,
{
    /// Row-pair on-time used by [`new`](Self::new), in microseconds.
    pub const DEFAULT_HOLD_US: u32 = 100;

    pub fn new(pins: Hub75Pins<P>, delay: D, mode: ScanMode) -> Self {
        Self {
            pins,
            delay,
            mode,
            hold_us: Self::DEFAULT_HOLD_US,
            row: 0,
            plane: 0,
        }
    }

    /// Drive every line low and blank the panel.
    pub fn init(&mut self) -> Result<(), P::Error> {
        let p = &mut self.pins;
        for pin in [&mut p.r1, &mut p.g1, &mut p.b1, &mut p.r2, &mut p.g2, &mut p.b2] {
            pin.set_low()?;
        }
        for pin in p.addr.iter_mut() {
            pin.set_low()?;
        }
        p.clk.set_low()?;
        p.lat.set_low()?;
        p.oe.set_high()?;
        self.row = 0;
        self.plane = 0;
        info!("hub75: init, hold {} us", self.hold_us);
        Ok(())
    }

    pub fn mode(&self) -> ScanMode {
        self.mode
    }

    /// Switch scan mode. The row-at-a-time scan restarts from row 0.
    pub fn set_mode(&mut self, mode: ScanMode) {
        self.mode = mode;
        self.row = 0;
        self.plane = 0;
    }

    pub fn hold_us(&self) -> u32 {
        self.hold_us
    }

    /// Row-pair on-time. In [`ScanMode::BitPlanes`] this is the least
    /// significant plane's time.
    pub fn set_hold_us(&mut self, hold_us: u32) {
        self.hold_us = hold_us;
    }

    /// Scan the whole frame once: every plane of every row pair.
    pub fn refresh<const W: usize, const H: usize>(
        &mut self,
        fb: &Framebuffer<W, H>,
    ) -> Result<(), P::Error> {
        for plane in 0..self.mode.planes() {
            for row in 0..H / 2 {
                self.scan_row(fb, row, plane)?;
            }
        }
        Ok(())
    }

    /// Scan one row pair and advance. Sized for a timer interrupt: call it
    /// once per period to spread a frame over `H / 2 * planes` calls.
    pub fn scan_next_row<const W: usize, const H: usize>(
        &mut self,
        fb: &Framebuffer<W, H>,
    ) -> Result<(), P::Error> {
        let rows = H / 2;
        if rows == 0 {
            return Ok(());
        }
        if self.row >= rows {
            self.row = 0;
        }
        self.scan_row(fb, self.row, self.plane)?;

        self.row += 1;
        if self.row == rows {
            self.row = 0;
            self.plane += 1;
            if self.plane >= self.mode.planes() {
                self.plane = 0;
            }
        }
        Ok(())
    }

    /// Release the pins and delay provider.
    pub fn release(self) -> (Hub75Pins<P>, D) {
        (self.pins, self.delay)
    }

    fn scan_row<const W: usize, const H: usize>(
        &mut self,
        fb: &Framebuffer<W, H>,
        row: usize,
        plane: u8,
    ) -> Result<(), P::Error> {
        self.pins.oe.set_high()?;
        for (bit, pin) in self.pins.addr.iter_mut().enumerate() {
            pin.set_state(PinState::from((row >> bit) & 1 != 0))?;
        }

        let upper = fb.row(row);
        let lower = fb.row(row + H / 2);
        for (top, bottom) in upper.iter().zip(lower.iter()) {
            self.shift_pixel(*top, *bottom, plane)?;
        }

        self.pins.lat.set_high()?;
        self.pins.lat.set_low()?;

        self.pins.oe.set_low()?;
        self.delay.delay_us(self.mode.hold_us(self.hold_us, plane));
        self.pins.oe.set_high()
    }

    fn shift_pixel(&mut self, top: Rgb, bottom: Rgb, plane: u8) -> Result<(), P::Error> {
        let mode = self.mode;
        let lit = |level| PinState::from(mode.lit(level, plane));
        let p = &mut self.pins;
        p.r1.set_state(lit(top.r))?;
        p.g1.set_state(lit(top.g))?;
        p.b1.set_state(lit(top.b))?;
        p.r2.set_state(lit(bottom.r))?;
        p.g2.set_state(lit(bottom.g))?;
        p.b2.set_state(lit(bottom.b))?;
        p.clk.set_high()?;
        p.clk.set_low()
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::RefCell;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;

    // Line indices into `Bus::levels`.
    const R1: usize = 0;
    const B2: usize = 5;
    const A0: usize = 6;
    const CLK: usize = 11;
    const LAT: usize = 12;
    const OE: usize = 13;
    const LINES: usize = 14;

    // ── Mock panel ────────────────────────────────────────────────────

    /// Simulated shift register and latch of a panel up to 64 wide.
    struct Bus {
        levels: [bool; LINES],
        /// Six colour bits per column, R1 in bit 0 .. B2 in bit 5.
        shift: [u8; 64],
        col: usize,
        /// Latched data per row address.
        latched: [[u8; 64]; 32],
        last_addr: usize,
        clocks: usize,
        latches: usize,
        /// Clock edges seen while OE was low (panel lit).
        clocks_while_lit: usize,
        /// Nanoseconds of delay spent with OE low.
        on_ns: u64,
    }

    impl Bus {
        fn new() -> Self {
            Self {
                levels: [false; LINES],
                shift: [0; 64],
                col: 0,
                latched: [[0; 64]; 32],
                last_addr: 0,
                clocks: 0,
                latches: 0,
                clocks_while_lit: 0,
                on_ns: 0,
            }
        }

        fn addr(&self) -> usize {
            (0..5).filter(|&i| self.levels[A0 + i]).map(|i| 1 << i).sum()
        }

        fn set(&mut self, line: usize, high: bool) {
            let rising = high && !self.levels[line];
            self.levels[line] = high;
            if !rising {
                return;
            }
            if line == CLK {
                self.clocks += 1;
                if !self.levels[OE] {
                    self.clocks_while_lit += 1;
                }
                let bits = (R1..=B2)
                    .filter(|&l| self.levels[l])
                    .fold(0u8, |acc, l| acc | (1 << l));
                if self.col < 64 {
                    self.shift[self.col] = bits;
                }
                self.col += 1;
            } else if line == LAT {
                self.latches += 1;
                let addr = self.addr();
                self.latched[addr] = self.shift;
                self.last_addr = addr;
                self.shift = [0; 64];
                self.col = 0;
            }
        }
    }

    struct MockPin<'a> {
        bus: &'a RefCell<Bus>,
        line: usize,
    }

    impl ErrorType for MockPin<'_> {
        type Error = Infallible;
    }

    impl OutputPin for MockPin<'_> {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.bus.borrow_mut().set(self.line, false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.bus.borrow_mut().set(self.line, true);
            Ok(())
        }
    }

    struct MockDelay<'a> {
        bus: &'a RefCell<Bus>,
    }

    impl DelayNs for MockDelay<'_> {
        fn delay_ns(&mut self, ns: u32) {
            let mut bus = self.bus.borrow_mut();
            if !bus.levels[OE] {
                bus.on_ns += ns as u64;
            }
        }
    }

    // ── Helpers ───────────────────────────────────────────────────────

    fn make_panel(bus: &RefCell<Bus>, mode: ScanMode) -> Hub75<MockPin<'_>, MockDelay<'_>> {
        let pin = |line| MockPin { bus, line };
        let pins = Hub75Pins {
            r1: pin(0),
            g1: pin(1),
            b1: pin(2),
            r2: pin(3),
            g2: pin(4),
            b2: pin(5),
            addr: core::array::from_fn(|i| pin(A0 + i)),
            clk: pin(CLK),
            lat: pin(LAT),
            oe: pin(OE),
        };
        let mut panel = Hub75::new(pins, MockDelay { bus }, mode);
        panel.init().unwrap();
        panel
    }

    // ── Tests ─────────────────────────────────────────────────────────

    #[test]
    fn init_blanks_the_panel() {
        let bus = RefCell::new(Bus::new());
        let _panel = make_panel(&bus, ScanMode::Binary);
        let bus = bus.borrow();
        assert!(bus.levels[OE]);
        assert!(bus.levels[..OE].iter().all(|&l| !l));
    }

    #[test]
    fn cleared_frame_scans_all_off() {
        let bus = RefCell::new(Bus::new());
        let mut panel = make_panel(&bus, ScanMode::Binary);
        let mut fb = Framebuffer::<64, 64>::new();
        fb.fill(Rgb::WHITE);
        fb.clear();
        panel.refresh(&fb).unwrap();

        let bus = bus.borrow();
        assert_eq!(bus.latches, 32);
        assert_eq!(bus.clocks, 32 * 64);
        assert!(bus.latched.iter().all(|row| row.iter().all(|&c| c == 0)));
        assert_eq!(bus.on_ns, 32 * 100_000);
    }

    #[test]
    fn halves_map_to_upper_and_lower_lines() {
        let bus = RefCell::new(Bus::new());
        let mut panel = make_panel(&bus, ScanMode::Binary);
        let mut fb = Framebuffer::<64, 64>::new();
        fb.set_pixel(3, 0, Rgb::RED);
        fb.set_pixel(5, 40, Rgb::new(0, 0, 1));
        fb.set_pixel(63, 31, Rgb::GREEN);
        panel.refresh(&fb).unwrap();

        let bus = bus.borrow();
        assert_eq!(bus.latched[0][3], 1 << R1);
        assert_eq!(bus.latched[8][5], 1 << B2);
        assert_eq!(bus.latched[31][63], 1 << 1);
        let lit: usize = bus
            .latched
            .iter()
            .map(|row| row.iter().filter(|&&c| c != 0).count())
            .sum();
        assert_eq!(lit, 3);
    }

    #[test]
    fn outputs_stay_blank_while_shifting() {
        let bus = RefCell::new(Bus::new());
        let mut panel = make_panel(&bus, ScanMode::Binary);
        let mut fb = Framebuffer::<64, 64>::new();
        fb.fill(Rgb::WHITE);
        panel.refresh(&fb).unwrap();
        panel.refresh(&fb).unwrap();

        let bus = bus.borrow();
        assert_eq!(bus.clocks_while_lit, 0);
        assert!(bus.levels[OE]);
    }

    #[test]
    fn scan_next_row_walks_row_pairs() {
        let bus = RefCell::new(Bus::new());
        let mut panel = make_panel(&bus, ScanMode::Binary);
        let fb = Framebuffer::<8, 8>::new();
        for expected in [0, 1, 2, 3, 0] {
            panel.scan_next_row(&fb).unwrap();
            assert_eq!(bus.borrow().last_addr, expected);
        }
        assert_eq!(bus.borrow().clocks, 5 * 8);
    }

    #[test]
    fn bit_planes_weight_hold_time() {
        let bus = RefCell::new(Bus::new());
        let mut panel = make_panel(&bus, ScanMode::BitPlanes(3));
        panel.set_hold_us(10);
        let fb = Framebuffer::<4, 4>::new();
        panel.refresh(&fb).unwrap();

        // 2 row pairs x (10 + 20 + 40) us
        assert_eq!(bus.borrow().on_ns, 2 * 70_000);
        assert_eq!(bus.borrow().latches, 2 * 3);
    }

    #[test]
    fn bit_planes_use_top_bits() {
        let bus = RefCell::new(Bus::new());
        let mut panel = make_panel(&bus, ScanMode::BitPlanes(2));
        let mut fb = Framebuffer::<4, 2>::new();
        // bit 6 only: lit on plane 0, dark on plane 1
        fb.set_pixel(0, 0, Rgb::new(0x40, 0, 0));
        // bit 7 only: dark on plane 0, lit on plane 1
        fb.set_pixel(1, 0, Rgb::new(0x80, 0, 0));
        // below the modulated bits: never lit
        fb.set_pixel(2, 0, Rgb::new(0x3F, 0, 0));

        panel.scan_next_row(&fb).unwrap();
        assert_eq!(bus.borrow().latched[0][..3], [1, 0, 0]);
        panel.scan_next_row(&fb).unwrap();
        assert_eq!(bus.borrow().latched[0][..3], [0, 1, 0]);
    }

    #[test]
    fn scan_mode_depth_is_clamped() {
        assert_eq!(ScanMode::Binary.planes(), 1);
        assert_eq!(ScanMode::BitPlanes(0).planes(), 1);
        assert_eq!(ScanMode::BitPlanes(12).planes(), 8);
    }
}
