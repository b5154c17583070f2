use crate::{Key, KeyEvent, KeyEvents, Note};

/// Something producing sound in response to a key being held, which can be told to stop and which
/// eventually falls silent after being told to stop.
pub trait Voice {
    /// Begin fading out. Called exactly once per voice, when its key is released.
    fn release(&mut self);

    /// True once the voice is silent and may be dropped.
    fn is_finished(&self) -> bool;
}

struct HeldVoice<V> {
    key: Key,
    note: Note,
    voice: V,
}

/// Associates voices with the keys that started them. Each key has at most one held voice. When
/// a key is released its voice is detached from the key and kept in a separate collection until
/// it has finished fading out, so pressing the key again starts a new voice rather than
/// interrupting the fade.
pub struct VoiceTable<V>
where
    V: Voice,
{
    held: Vec<HeldVoice<V>>,
    releasing: Vec<V>,
}

impl<V> Default for VoiceTable<V>
where
    V: Voice,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V> VoiceTable<V>
where
    V: Voice,
{
    pub fn new() -> Self {
        Self {
            held: Vec::new(),
            releasing: Vec::new(),
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.iter().any(|held| held.key == key)
    }

    /// Starts a new voice for `key` unless it already has one. Returns whether a voice was
    /// started. Presses of a key which is already held (such as keyboard auto-repeat) are
    /// ignored.
    pub fn press<F>(&mut self, key: Key, note: Note, make_voice: F) -> bool
    where
        F: FnOnce(Note) -> V,
    {
        if self.is_held(key) {
            return false;
        }
        log::debug!("Starting voice for {:?} ({})", key, note);
        self.held.push(HeldVoice {
            key,
            note,
            voice: make_voice(note),
        });
        true
    }

    /// Releases the voice held by `key`, if any. Returns whether there was a voice to release.
    pub fn release(&mut self, key: Key) -> bool {
        match self.held.iter().position(|held| held.key == key) {
            Some(index) => {
                let HeldVoice { note, mut voice, .. } = self.held.remove(index);
                log::debug!("Releasing voice for {:?} ({})", key, note);
                voice.release();
                self.releasing.push(voice);
                true
            }
            None => false,
        }
    }

    /// Apply a key event. Returns whether the event changed the set of held voices.
    pub fn handle<F>(&mut self, key_event: &KeyEvent, make_voice: F) -> bool
    where
        F: FnOnce(Note) -> V,
    {
        if key_event.pressed {
            self.press(key_event.key, key_event.note, make_voice)
        } else {
            self.release(key_event.key)
        }
    }

    /// Apply all the events from a single frame in order.
    pub fn handle_events<F>(&mut self, key_events: &KeyEvents, mut make_voice: F)
    where
        F: FnMut(Note) -> V,
    {
        if key_events.release_all() {
            self.release_all();
        }
        for key_event in key_events.iter() {
            self.handle(key_event, &mut make_voice);
        }
    }

    /// Release every held voice.
    pub fn release_all(&mut self) {
        for HeldVoice { mut voice, .. } in self.held.drain(..) {
            voice.release();
            self.releasing.push(voice);
        }
    }

    /// Drop released voices which have finished fading out. Returns the number of voices dropped.
    pub fn collect_finished(&mut self) -> usize {
        let before = self.releasing.len();
        self.releasing.retain(|voice| !voice.is_finished());
        let num_dropped = before - self.releasing.len();
        if num_dropped > 0 {
            log::debug!("Dropped {} finished voice(s)", num_dropped);
        }
        num_dropped
    }

    /// Every voice that may still be producing sound, held or releasing.
    pub fn voices_mut(&mut self) -> impl Iterator<Item = &mut V> {
        self.held
            .iter_mut()
            .map(|held| &mut held.voice)
            .chain(self.releasing.iter_mut())
    }

    pub fn held_keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.held.iter().map(|held| held.key)
    }

    pub fn num_held(&self) -> usize {
        self.held.len()
    }

    pub fn num_sounding(&self) -> usize {
        self.held.len() + self.releasing.len()
    }
}
