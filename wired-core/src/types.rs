//! Core adapter types: generic pad ids, axis metadata, per-port wired buffers.

/// Number of physical controller ports on the adapter.
pub const MAX_PORTS: usize = 4;

/// Size of the per-port output and override-mask buffers.
pub const OUTPUT_LEN: usize = 32;

/// Number of turbo slots (one per generic pad button id).
pub const TURBO_SLOTS: usize = 32;

/// Generic pad button ids.
///
/// The adapter maps every controller onto this 32-slot layout. Console
/// engines translate a slot into their own button bit through a
/// per-console `[u32; 32]` table, and turbo settings are indexed by it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum PadBtn {
    LxLeft = 0,
    LxRight,
    LyDown,
    LyUp,
    RxLeft,
    RxRight,
    RyDown,
    RyUp,
    LdLeft,
    LdRight,
    LdDown,
    LdUp,
    RdLeft,
    RdRight,
    RdDown,
    RdUp,
    RbLeft,
    RbRight,
    RbDown,
    RbUp,
    Mm,
    Ms,
    Mt,
    Mq,
    Lm,
    Ls,
    Lt,
    Lj,
    Rm,
    Rs,
    Rt,
    Rj,
}

impl PadBtn {
    /// Slot index in 32-entry tables.
    #[inline]
    #[must_use]
    pub const fn idx(self) -> usize {
        self as usize
    }
}

/// Generic analog axes, in the order console axis tables list them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Axis {
    Lx = 0,
    Ly,
    Rx,
    Ry,
    TrigL,
    TrigR,
}

/// Number of generic axes.
pub const AXES_MAX: usize = 6;

impl Axis {
    /// All axes in table order.
    pub const ALL: [Axis; AXES_MAX] = [
        Axis::Lx,
        Axis::Ly,
        Axis::Rx,
        Axis::Ry,
        Axis::TrigL,
        Axis::TrigR,
    ];

    /// Button slot that carries this axis's turbo setting.
    #[must_use]
    pub const fn btn_id(self) -> PadBtn {
        match self {
            Axis::Lx => PadBtn::LxLeft,
            Axis::Ly => PadBtn::LyDown,
            Axis::Rx => PadBtn::RxLeft,
            Axis::Ry => PadBtn::RyDown,
            Axis::TrigL => PadBtn::Lm,
            Axis::TrigR => PadBtn::Rm,
        }
    }
}

/// Map an axis table index to its turbo button slot.
///
/// Indices past the generic axes fall back to slot 0.
#[inline]
#[must_use]
pub const fn axis_to_btn_id(axis: usize) -> usize {
    if axis < AXES_MAX {
        Axis::ALL[axis].btn_id().idx()
    } else {
        0
    }
}

/// Per-axis metadata a console engine supplies for its axis bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisMeta {
    /// Value reported when the axis is at rest.
    pub neutral: u8,
    /// Largest deflection from neutral.
    pub abs_max: u8,
}

/// Generic state for one wired port.
///
/// `output` is what the console engine reports to the console, laid out in
/// the console's own wire format. `output_mask` is the override mask the
/// engine applies on top: button bytes are AND-masked, axis bytes replace
/// the output when nonzero. `cnt_mask` holds the turbo slot settings and
/// `frame_cnt` mirrors the engine's poll counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WiredData {
    pub output: [u8; OUTPUT_LEN],
    pub output_mask: [u8; OUTPUT_LEN],
    pub cnt_mask: [u8; TURBO_SLOTS],
    pub frame_cnt: u32,
}

impl WiredData {
    /// All-zero buffers, no turbo, frame 0.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            output: [0; OUTPUT_LEN],
            output_mask: [0; OUTPUT_LEN],
            cnt_mask: [0; TURBO_SLOTS],
            frame_cnt: 0,
        }
    }

    /// Little-endian 16-bit view of `output` at word index `idx`.
    #[inline]
    #[must_use]
    pub fn output16(&self, idx: usize) -> u16 {
        u16::from_le_bytes([self.output[idx * 2], self.output[idx * 2 + 1]])
    }

    /// Little-endian 16-bit view of `output_mask` at word index `idx`.
    #[inline]
    #[must_use]
    pub fn output_mask16(&self, idx: usize) -> u16 {
        u16::from_le_bytes([self.output_mask[idx * 2], self.output_mask[idx * 2 + 1]])
    }

    #[inline]
    pub fn set_output16(&mut self, idx: usize, value: u16) {
        self.output[idx * 2..idx * 2 + 2].copy_from_slice(&value.to_le_bytes());
    }

    #[inline]
    pub fn set_output_mask16(&mut self, idx: usize, value: u16) {
        self.output_mask[idx * 2..idx * 2 + 2].copy_from_slice(&value.to_le_bytes());
    }
}

impl Default for WiredData {
    fn default() -> Self {
        Self::new()
    }
}

/// The generic adapter's wired side: selected console and per-port buffers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WiredAdapter {
    pub system_id: crate::system::SystemId,
    pub data: [WiredData; MAX_PORTS],
}

impl WiredAdapter {
    #[must_use]
    pub const fn new(system_id: crate::system::SystemId) -> Self {
        Self {
            system_id,
            data: [WiredData::new(); MAX_PORTS],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output16_is_little_endian() {
        let mut data = WiredData::new();
        data.output[0] = 0x34;
        data.output[1] = 0x12;
        assert_eq!(data.output16(0), 0x1234);

        data.set_output_mask16(0, 0xBEEF);
        assert_eq!(data.output_mask[0], 0xEF);
        assert_eq!(data.output_mask[1], 0xBE);
        assert_eq!(data.output_mask16(0), 0xBEEF);
    }

    #[test]
    fn test_axis_to_btn_id() {
        assert_eq!(axis_to_btn_id(0), PadBtn::LxLeft.idx());
        assert_eq!(axis_to_btn_id(1), PadBtn::LyDown.idx());
        assert_eq!(axis_to_btn_id(2), PadBtn::RxLeft.idx());
        assert_eq!(axis_to_btn_id(3), PadBtn::RyDown.idx());
        assert_eq!(axis_to_btn_id(4), 24);
        assert_eq!(axis_to_btn_id(5), 28);
        assert_eq!(axis_to_btn_id(6), 0);
    }

    #[test]
    fn test_pad_btn_layout() {
        assert_eq!(PadBtn::LdLeft.idx(), 8);
        assert_eq!(PadBtn::RbLeft.idx(), 16);
        assert_eq!(PadBtn::Rj.idx(), 31);
    }
}
