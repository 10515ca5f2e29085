use crossbeam_channel::{unbounded, Receiver, Sender};

/// A dirty block on its way to backing storage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlushEvent {
    pub tag:    u32,
    pub data:   u32,
}

/// Send side of the write-back notification channel.
///
/// The backing store is modeled as always accepting, so a port with no
/// observer attached (or one whose receiver has gone away) swallows the
/// notification.
#[derive(Debug)]
pub(crate) struct FlushPort {
    tx: Option<Sender<FlushEvent>>,
}

impl FlushPort {
    pub fn closed() -> Self {
        Self {
            tx: None
        }
    }

    /// Attach an observer, replacing any previous one.
    pub fn open(&mut self) -> Receiver<FlushEvent> {
        let (tx, rx) = unbounded();
        self.tx = Some(tx);
        rx
    }

    pub fn send(&self, tag: u32, data: u32) {
        if let Some(tx) = &self.tx {
            tx.send(FlushEvent { tag, data }).ok();
        }
    }
}
