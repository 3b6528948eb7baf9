/// Fixed number of sub-slots a multi-select answer expands into.
pub const CRISIS_SLOTS: usize = 9;
/// Option meaning no crisis situation applies.
pub const NONE_SELECTION: &str = "Ninguna";

const EMPTY_SCORE: u8 = 0;
const NONE_SCORE: u8 = 1;
const SELECTED_SCORE: u8 = 5;

/// Expand a comma-joined multi-select answer into positional indicator scores.
///
/// Selections keep their original order; anything past the ninth is dropped and missing
/// positions score zero.
pub fn decompose(raw: &str) -> [u8; CRISIS_SLOTS] {
    let mut slots = [EMPTY_SCORE; CRISIS_SLOTS];
    for (slot, token) in slots.iter_mut().zip(raw.split(',').map(str::trim)) {
        *slot = score_selection(token);
    }
    slots
}

fn score_selection(token: &str) -> u8 {
    match token {
        "" => EMPTY_SCORE,
        NONE_SELECTION => NONE_SCORE,
        _ => SELECTED_SCORE,
    }
}
