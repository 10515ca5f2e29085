use crate::utils::bits::*;

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct BlockFlags: u8 {
        const VALID = bit!(0);
        const DIRTY = bit!(1);
    }
}

/// One cache line.
///
/// A block lives in exactly one slot at a time: a way in a set array, or
/// an entry in the victim FIFO. Moving it between the two is a transfer,
/// never a copy that leaves the source valid. An invalid block is never
/// dirty and its tag is meaningless.
#[derive(Clone, Copy, Debug, Default)]
pub struct Block {
    flags:  BlockFlags,
    tag:    u32,
    data:   u32,
}

impl Block {
    pub fn new(tag: u32, dirty: bool) -> Self {
        let mut flags = BlockFlags::VALID;
        if dirty {
            flags.insert(BlockFlags::DIRTY);
        }
        Self {
            flags,
            tag,
            data: 0,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.flags.contains(BlockFlags::VALID)
    }

    pub fn is_dirty(&self) -> bool {
        self.flags.contains(BlockFlags::DIRTY)
    }

    pub fn tag(&self) -> u32 {
        self.tag
    }

    pub fn data(&self) -> u32 {
        self.data
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.flags.insert(BlockFlags::DIRTY);
    }

    pub(crate) fn clear_dirty(&mut self) {
        self.flags.remove(BlockFlags::DIRTY);
    }

    pub(crate) fn invalidate(&mut self) {
        self.flags = BlockFlags::empty();
    }
}
