//! Turbo masking.
//!
//! Each of the 32 generic button slots carries a turbo setting in
//! [`WiredData::cnt_mask`]. Bit 0 selects the logic, the upper 7 bits are a
//! window matched against the port's frame counter:
//!
//! - negative logic (bit 0 set): the input is off while `window & frame_cnt == 0`
//! - positive logic (bit 0 clear): the input is off while `window & frame_cnt != window`
//!
//! A window of `0b11` therefore gives a 4-frame period. A zero window
//! disables turbo for the slot.
//!
//! The passes below rewrite a console's override mask (or report buffer)
//! for the current frame. "Off" means cleared for active-high buttons, set
//! for active-low buttons, and the neutral value for axes.

use crate::types::{axis_to_btn_id, AxisMeta, WiredData, TURBO_SLOTS};

/// Whether a slot with setting `cnt_mask` is in its off phase at `frame_cnt`.
#[inline]
#[must_use]
pub const fn turbo_off(cnt_mask: u8, frame_cnt: u32) -> bool {
    let window = (cnt_mask >> 1) as u32;
    if window == 0 {
        false
    } else if cnt_mask & 1 != 0 {
        window & frame_cnt == 0
    } else {
        window & frame_cnt != window
    }
}

/// 16-bit active-high buttons: clear turbo buttons during their off phase.
pub fn gen_turbo_mask_btns16_pos(wired_data: &WiredData, buttons: &mut u16, btns_mask: &[u32; TURBO_SLOTS]) {
    for (&cnt_mask, &bit) in wired_data.cnt_mask.iter().zip(btns_mask) {
        if bit != 0 && turbo_off(cnt_mask, wired_data.frame_cnt) {
            *buttons &= !(bit as u16);
        }
    }
}

/// 16-bit active-low buttons: set turbo buttons during their off phase.
pub fn gen_turbo_mask_btns16_neg(wired_data: &WiredData, buttons: &mut u16, btns_mask: &[u32; TURBO_SLOTS]) {
    for (&cnt_mask, &bit) in wired_data.cnt_mask.iter().zip(btns_mask) {
        if bit != 0 && turbo_off(cnt_mask, wired_data.frame_cnt) {
            *buttons |= bit as u16;
        }
    }
}

/// 32-bit active-low buttons spread over parallel banks.
///
/// `buttons[j]` is paired with `btns_mask[j]`; extra entries on either side
/// are ignored.
pub fn gen_turbo_mask_btns32(wired_data: &WiredData, buttons: &mut [u32], btns_mask: &[[u32; TURBO_SLOTS]]) {
    for (i, &cnt_mask) in wired_data.cnt_mask.iter().enumerate() {
        if !turbo_off(cnt_mask, wired_data.frame_cnt) {
            continue;
        }
        for (bank, mask) in buttons.iter_mut().zip(btns_mask) {
            *bank |= mask[i];
        }
    }
}

/// 8-bit axes: force turbo axes to their neutral value during the off phase.
///
/// Axis `i` lives at `axes[axes_idx[i]]` and takes its turbo setting from
/// the button slot returned by [`axis_to_btn_id`].
pub fn gen_turbo_mask_axes8(
    wired_data: &WiredData,
    axes: &mut [u8],
    axes_cnt: usize,
    axes_idx: &[u8],
    axes_meta: &[AxisMeta],
) {
    for i in 0..axes_cnt {
        let cnt_mask = wired_data.cnt_mask[axis_to_btn_id(i)];
        if turbo_off(cnt_mask, wired_data.frame_cnt) {
            axes[axes_idx[i] as usize] = axes_meta[i].neutral;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PadBtn;

    const POS_4: u8 = 0b11 << 1;
    const NEG_4: u8 = (0b11 << 1) | 1;

    fn with_turbo(slot: usize, cnt_mask: u8, frame_cnt: u32) -> WiredData {
        let mut data = WiredData::new();
        data.cnt_mask[slot] = cnt_mask;
        data.frame_cnt = frame_cnt;
        data
    }

    #[test]
    fn test_positive_logic_passes_one_frame_in_four() {
        let pass: [bool; 8] = core::array::from_fn(|f| !turbo_off(POS_4, f as u32));
        assert_eq!(pass, [false, false, false, true, false, false, false, true]);
    }

    #[test]
    fn test_negative_logic_forces_off_one_frame_in_four() {
        let off: [bool; 8] = core::array::from_fn(|f| turbo_off(NEG_4, f as u32));
        assert_eq!(off, [true, false, false, false, true, false, false, false]);
    }

    #[test]
    fn test_zero_window_never_forces_off() {
        for cnt_mask in [0u8, 1] {
            for frame in [0u32, 1, 2, 3, 0x7F, u32::MAX] {
                assert!(!turbo_off(cnt_mask, frame));
            }
        }
    }

    #[test]
    fn test_wider_window_doubles_period() {
        let window_8: u8 = 0b111 << 1;
        let passes = (0..16u32).filter(|&f| !turbo_off(window_8, f)).count();
        assert_eq!(passes, 2);
        assert!(!turbo_off(window_8, 7));
        assert!(!turbo_off(window_8, 15));
    }

    #[test]
    fn test_btns16_pos_clears_only_mapped_slots() {
        let mut map = [0u32; TURBO_SLOTS];
        map[PadBtn::RbDown.idx()] = 0x0001;

        let data = with_turbo(PadBtn::RbDown.idx(), POS_4, 0);
        let mut buttons = 0xFFFFu16;
        gen_turbo_mask_btns16_pos(&data, &mut buttons, &map);
        assert_eq!(buttons, 0xFFFE);

        let data = with_turbo(PadBtn::RbDown.idx(), POS_4, 3);
        let mut buttons = 0xFFFFu16;
        gen_turbo_mask_btns16_pos(&data, &mut buttons, &map);
        assert_eq!(buttons, 0xFFFF);

        // Turbo on a slot the console does not map is ignored.
        let data = with_turbo(PadBtn::RbUp.idx(), POS_4, 0);
        let mut buttons = 0xFFFFu16;
        gen_turbo_mask_btns16_pos(&data, &mut buttons, &map);
        assert_eq!(buttons, 0xFFFF);
    }

    #[test]
    fn test_btns16_neg_sets_bits() {
        let mut map = [0u32; TURBO_SLOTS];
        map[PadBtn::Ms.idx()] = 0x0100;

        let data = with_turbo(PadBtn::Ms.idx(), NEG_4, 4);
        let mut buttons = 0x0000u16;
        gen_turbo_mask_btns16_neg(&data, &mut buttons, &map);
        assert_eq!(buttons, 0x0100);
    }

    #[test]
    fn test_btns32_sets_every_bank() {
        let mut banks = [[0u32; TURBO_SLOTS]; 2];
        banks[0][PadBtn::RbLeft.idx()] = 1 << 20;
        banks[1][PadBtn::RbLeft.idx()] = 1 << 3;

        let data = with_turbo(PadBtn::RbLeft.idx(), POS_4, 1);
        let mut buttons = [0u32; 2];
        gen_turbo_mask_btns32(&data, &mut buttons, &banks);
        assert_eq!(buttons, [1 << 20, 1 << 3]);

        let data = with_turbo(PadBtn::RbLeft.idx(), POS_4, 7);
        let mut buttons = [0u32; 2];
        gen_turbo_mask_btns32(&data, &mut buttons, &banks);
        assert_eq!(buttons, [0, 0]);
    }

    #[test]
    fn test_axes8_writes_neutral() {
        let meta = [AxisMeta { neutral: 0x80, abs_max: 0x64 }; 6];
        let idx = [0u8, 1, 2, 3, 4, 5];

        // Left trigger axis aliases the Lm slot.
        let data = with_turbo(PadBtn::Lm.idx(), NEG_4, 8);
        let mut axes = [0u8; 6];
        gen_turbo_mask_axes8(&data, &mut axes, 6, &idx, &meta);
        assert_eq!(axes, [0, 0, 0, 0, 0x80, 0]);

        let data = with_turbo(PadBtn::Lm.idx(), NEG_4, 9);
        let mut axes = [0u8; 6];
        gen_turbo_mask_axes8(&data, &mut axes, 6, &idx, &meta);
        assert_eq!(axes, [0; 6]);
    }
}
