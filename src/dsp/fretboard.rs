//! Fretboard — maps a (string, fret) position to a frequency.

/// Number of strings on the instrument (one voice per string).
pub const STRING_COUNT: usize = 6;

/// Open-string frequencies in standard tuning (E2 A2 D3 G3 B3 E4).
pub const OPEN_STRING_FREQUENCIES: [f64; STRING_COUNT] = [
    82.41,  // E2
    110.00, // A2
    146.83, // D3
    196.00, // G3
    246.94, // B3
    329.63, // E4
];

/// Frequency in Hz of `fret` on string `string_index`.
///
/// Equal temperament: each fret raises the pitch by one semitone,
/// `open * 2^(fret / 12)`. Out-of-range strings and negative frets
/// map to `0.0` (silence) instead of failing.
pub fn fret_to_frequency(string_index: usize, fret: i32) -> f64 {
    if string_index >= STRING_COUNT || fret < 0 {
        return 0.0;
    }
    OPEN_STRING_FREQUENCIES[string_index] * (2.0_f64).powf(fret as f64 / 12.0)
}
