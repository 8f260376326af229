//! GameCube device definitions: identities, report layout, turbo tables.
//!
//! Pad report, as sent on the wire and stored in [`WiredData::output`]:
//!
//! | Byte | Content |
//! |------|---------|
//! | 0 | `0 0 ORIGIN START Y X B A` |
//! | 1 | `1 L R Z UP DOWN RIGHT LEFT` |
//! | 2, 3 | main stick X, Y |
//! | 4, 5 | C-stick X, Y |
//! | 6, 7 | L, R analog triggers |
//! | 8, 9 | analog A, B |
//!
//! Bytes 0 and 1 are accessed as one little-endian `u16`.

use wired_core::turbo::{gen_turbo_mask_axes8, gen_turbo_mask_btns16_pos};
use wired_core::{AxisMeta, DevMode, PadBtn, WiredData, AXES_MAX, TURBO_SLOTS};

/// Pad identity reply.
pub const GC_IDENT: [u8; 3] = [0x09, 0x00, 0x20];

/// Keyboard identity reply.
pub const GC_KB_IDENT: [u8; 3] = [0x08, 0x20, 0x00];

/// Pad report at rest, also the origin/recalibrate reply.
pub const GC_NEUTRAL: [u8; 10] = [0x00, 0x80, 0x80, 0x80, 0x80, 0x80, 0x20, 0x20, 0x00, 0x00];

/// Button bits of the 16-bit report word.
pub mod buttons {
    pub const A: u16 = 0x0001;
    pub const B: u16 = 0x0002;
    pub const X: u16 = 0x0004;
    pub const Y: u16 = 0x0008;
    pub const START: u16 = 0x0010;
    /// Set until the console has fetched the origin.
    pub const ORIGIN: u16 = 0x0020;
    pub const D_LEFT: u16 = 0x0100;
    pub const D_RIGHT: u16 = 0x0200;
    pub const D_DOWN: u16 = 0x0400;
    pub const D_UP: u16 = 0x0800;
    pub const Z: u16 = 0x1000;
    pub const R: u16 = 0x2000;
    pub const L: u16 = 0x4000;
    /// Always set in a pad report.
    pub const USE_ORIGIN: u16 = 0x8000;
}

/// Trigger digital bits within report byte 1.
pub const TRIG_R_BIT: u8 = (buttons::R >> 8) as u8;
pub const TRIG_L_BIT: u8 = (buttons::L >> 8) as u8;

/// Origin flag within report byte 0.
pub const ORIGIN_BIT: u8 = buttons::ORIGIN as u8;

/// Offset of the first axis byte in the report.
pub const AXES_OFFSET: usize = 2;

/// Generic button slot to report bit.
pub const GC_BTNS_MASK: [u32; TURBO_SLOTS] = {
    let mut mask = [0u32; TURBO_SLOTS];
    mask[PadBtn::LdLeft.idx()] = buttons::D_LEFT as u32;
    mask[PadBtn::LdRight.idx()] = buttons::D_RIGHT as u32;
    mask[PadBtn::LdDown.idx()] = buttons::D_DOWN as u32;
    mask[PadBtn::LdUp.idx()] = buttons::D_UP as u32;
    mask[PadBtn::RbLeft.idx()] = buttons::B as u32;
    mask[PadBtn::RbRight.idx()] = buttons::X as u32;
    mask[PadBtn::RbDown.idx()] = buttons::A as u32;
    mask[PadBtn::RbUp.idx()] = buttons::Y as u32;
    mask[PadBtn::Ms.idx()] = buttons::START as u32;
    mask[PadBtn::Lm.idx()] = buttons::L as u32;
    mask[PadBtn::Rm.idx()] = buttons::R as u32;
    mask[PadBtn::Rs.idx()] = buttons::Z as u32;
    mask
};

/// Generic axis to report axis index (relative to [`AXES_OFFSET`]).
pub const GC_AXES_IDX: [u8; AXES_MAX] = [0, 1, 2, 3, 4, 5];

pub const GC_AXES_META: [AxisMeta; AXES_MAX] = [
    AxisMeta { neutral: 0x80, abs_max: 0x64 },
    AxisMeta { neutral: 0x80, abs_max: 0x64 },
    AxisMeta { neutral: 0x80, abs_max: 0x5C },
    AxisMeta { neutral: 0x80, abs_max: 0x5C },
    AxisMeta { neutral: 0x20, abs_max: 0xD0 },
    AxisMeta { neutral: 0x20, abs_max: 0xD0 },
];

/// Load the rest state for `dev_mode` into a port's buffers.
pub fn init_buffer(dev_mode: DevMode, wired_data: &mut WiredData) {
    wired_data.output = [0; wired_core::OUTPUT_LEN];
    wired_data.output_mask = [0; wired_core::OUTPUT_LEN];
    match dev_mode {
        DevMode::Keyboard => {}
        _ => {
            wired_data.output[..GC_NEUTRAL.len()].copy_from_slice(&GC_NEUTRAL);
            wired_data.set_output_mask16(0, 0xFFFF);
        }
    }
}

/// Rebuild the override mask for the port's current frame.
///
/// Buttons in their turbo off phase lose their mask bit; axes in their off
/// phase get their neutral value as a literal override. Everything else
/// passes through.
pub fn gen_turbo_mask(wired_data: &mut WiredData) {
    let mut btns = 0xFFFFu16;
    gen_turbo_mask_btns16_pos(wired_data, &mut btns, &GC_BTNS_MASK);

    let mut axes = [0u8; AXES_MAX];
    gen_turbo_mask_axes8(wired_data, &mut axes, AXES_MAX, &GC_AXES_IDX, &GC_AXES_META);

    wired_data.set_output_mask16(0, btns);
    wired_data.output_mask[AXES_OFFSET..AXES_OFFSET + AXES_MAX].copy_from_slice(&axes);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_buffer_pad() {
        let mut data = WiredData::new();
        data.output[20] = 0xAA;
        data.output_mask[3] = 0x55;
        init_buffer(DevMode::Pad, &mut data);

        assert_eq!(&data.output[..10], &GC_NEUTRAL);
        assert_eq!(data.output[20], 0);
        assert_eq!(data.output_mask16(0), 0xFFFF);
        assert!(data.output_mask[2..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_init_buffer_keyboard() {
        let mut data = WiredData::new();
        data.output[0] = 0x12;
        init_buffer(DevMode::Keyboard, &mut data);
        assert!(data.output.iter().all(|&b| b == 0));
        assert!(data.output_mask.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_trigger_bits() {
        assert_eq!(TRIG_L_BIT, 0x40);
        assert_eq!(TRIG_R_BIT, 0x20);
        assert_eq!(ORIGIN_BIT, 0x20);
    }

    #[test]
    fn test_axes_meta_ranges_stay_in_byte() {
        for (i, meta) in GC_AXES_META.iter().enumerate() {
            assert!(meta.neutral as u16 + meta.abs_max as u16 <= 0xFF, "axis {i}");
        }
        // Sticks swing both ways around neutral, triggers only up.
        for meta in &GC_AXES_META[..4] {
            assert!(meta.abs_max <= meta.neutral);
        }
        assert_eq!(GC_AXES_META[4].neutral + GC_AXES_META[4].abs_max, 0xF0);
    }

    #[test]
    fn test_gen_turbo_mask_without_turbo_passes_everything() {
        let mut data = WiredData::new();
        data.output_mask[4] = 0x33;
        gen_turbo_mask(&mut data);
        assert_eq!(data.output_mask16(0), 0xFFFF);
        assert!(data.output_mask[2..8].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_gen_turbo_mask_button_and_trigger() {
        let mut data = WiredData::new();
        // A: 4-frame positive logic; L trigger axis: 4-frame negative logic.
        data.cnt_mask[PadBtn::RbDown.idx()] = 0b11 << 1;
        data.cnt_mask[PadBtn::Lm.idx()] = (0b11 << 1) | 1;

        data.frame_cnt = 4;
        gen_turbo_mask(&mut data);
        assert_eq!(data.output_mask16(0), !(buttons::A | buttons::L));
        assert_eq!(data.output_mask[AXES_OFFSET + 4], 0x20);

        data.frame_cnt = 7;
        gen_turbo_mask(&mut data);
        assert_eq!(data.output_mask16(0), 0xFFFF);
        assert_eq!(data.output_mask[AXES_OFFSET + 4], 0);
    }
}
