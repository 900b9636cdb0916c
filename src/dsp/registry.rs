//! Voice registry — one slot per string.
//!
//! A fixed array of optional voices indexed by string, so a string can
//! never hold two voices and retiring a voice is just emptying its slot.
//! Nothing here allocates.

use super::fretboard::STRING_COUNT;
use super::voice::Voice;

#[derive(Debug, Clone, Default)]
pub struct VoiceRegistry {
    slots: [Option<Voice>; STRING_COUNT],
}

impl VoiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put `voice` on its string, replacing whatever was ringing there.
    /// Voices whose string index has no slot are dropped.
    pub fn insert(&mut self, voice: Voice) -> bool {
        match self.slots.get_mut(voice.string_index) {
            Some(slot) => {
                *slot = Some(voice);
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, string_index: usize) -> Option<Voice> {
        self.slots.get_mut(string_index).and_then(Option::take)
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
    }

    pub fn get(&self, string_index: usize) -> Option<&Voice> {
        self.slots.get(string_index).and_then(Option::as_ref)
    }

    /// Number of live voices.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Voice> {
        self.slots.iter().flatten()
    }

    /// Render one sample from every live voice, retiring the ones that
    /// have rung out. Returns the summed contribution and how many
    /// voices are still live afterwards.
    pub fn next_sample(&mut self, damping: f64) -> (f64, usize) {
        let mut sum = 0.0;
        let mut live = 0;
        for slot in self.slots.iter_mut() {
            let Some(voice) = slot.as_mut() else { continue };
            match voice.next_sample(damping) {
                Some(s) => {
                    sum += s;
                    live += 1;
                }
                None => *slot = None,
            }
        }
        (sum, live)
    }
}
