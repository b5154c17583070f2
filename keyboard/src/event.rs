use crate::{Key, Note};
use padkeys_core::{FrameSig, FrameSigT, SigCtx};
use smallvec::{SmallVec, smallvec};
use std::{
    mem,
    sync::{Arc, RwLock},
};

/// A key being pressed or released
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeyEvent {
    /// The computer key that generated this event
    pub key: Key,
    /// Which note corresponds to the key
    pub note: Note,
    /// Whether the key was pressed or released
    pub pressed: bool,
    /// Set on presses generated by the OS while the key is held down
    pub repeat: bool,
}

impl KeyEvent {
    pub fn press(key: Key, note: Note) -> Self {
        Self {
            key,
            note,
            pressed: true,
            repeat: false,
        }
    }

    pub fn release(key: Key, note: Note) -> Self {
        Self {
            key,
            note,
            pressed: false,
            repeat: false,
        }
    }
}

/// A collection of simultaneous key events. When dealing with streams of key events it's necessary
/// to group them into a collection because multiple key events may occur during the same frame.
/// This collection only uses the heap when more than four events occur in the same frame which is
/// very unlikely.
#[derive(Clone, Debug, Default)]
pub struct KeyEvents {
    events: SmallVec<[KeyEvent; 4]>,
    /// Every held key should be released before the events are applied, such as when the window
    /// loses focus and key releases can no longer be observed.
    release_all: bool,
}

impl KeyEvents {
    pub fn empty() -> Self {
        Self {
            events: smallvec![],
            release_all: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && !self.release_all
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn push(&mut self, key_event: KeyEvent) {
        self.events.push(key_event);
    }

    /// Request that all held keys be released. Events pushed before this call are discarded
    /// since they would be released immediately anyway.
    pub fn set_release_all(&mut self) {
        self.events.clear();
        self.release_all = true;
    }

    pub fn release_all(&self) -> bool {
        self.release_all
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeyEvent> {
        self.events.iter()
    }
}

impl IntoIterator for KeyEvents {
    type Item = KeyEvent;

    type IntoIter = smallvec::IntoIter<[KeyEvent; 4]>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}

impl FromIterator<KeyEvent> for KeyEvents {
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = KeyEvent>,
    {
        Self {
            events: iter.into_iter().collect(),
            release_all: false,
        }
    }
}

/// Events pushed by the input handler and drained by the audio side once per frame. Clones share
/// the same underlying queue.
#[derive(Clone, Default)]
pub struct KeyEventQueue(Arc<RwLock<KeyEvents>>);

impl KeyEventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, key_event: KeyEvent) {
        self.0.write().unwrap().push(key_event);
    }

    pub fn push_release_all(&self) {
        self.0.write().unwrap().set_release_all();
    }

    /// Removes and returns all events pushed since the previous call.
    pub fn drain(&self) -> KeyEvents {
        mem::take(&mut *self.0.write().unwrap())
    }

    /// A frame signal yielding the events pushed since the previous frame. There should only be
    /// one consumer as each event is only yielded once.
    pub fn frame_sig(self) -> FrameSig<impl FrameSigT<Item = KeyEvents>> {
        FrameSig::from_fn(move |_ctx: &SigCtx| self.drain())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const CTX: SigCtx = SigCtx {
        sample_rate_hz: 48_000.0,
        batch_index: 0,
        num_samples: 256,
    };

    #[test]
    fn events_drained_once() {
        let queue = KeyEventQueue::new();
        let mut sig = queue.clone().frame_sig();
        queue.push(KeyEvent::press(Key::A, Note::A_4));
        queue.push(KeyEvent::release(Key::A, Note::A_4));
        let events = sig.frame_sample(&CTX);
        assert_eq!(events.len(), 2);
        assert!(events.iter().next().unwrap().pressed);
        assert!(sig.frame_sample(&CTX).is_empty());
    }

    #[test]
    fn release_all_discards_earlier_events() {
        let queue = KeyEventQueue::new();
        queue.push(KeyEvent::press(Key::A, Note::A_4));
        queue.push_release_all();
        queue.push(KeyEvent::press(Key::S, Note::B_4));
        let events = queue.drain();
        assert!(events.release_all());
        assert_eq!(events.iter().map(|e| e.key).collect::<Vec<_>>(), vec![Key::S]);
        assert!(!queue.drain().release_all());
    }

    #[test]
    fn events_collected_in_order() {
        let events = [Key::A, Key::S, Key::D]
            .into_iter()
            .map(|key| KeyEvent::press(key, Note::A_4))
            .collect::<KeyEvents>();
        let keys = events.into_iter().map(|e| e.key).collect::<Vec<_>>();
        assert_eq!(keys, vec![Key::A, Key::S, Key::D]);
    }
}
