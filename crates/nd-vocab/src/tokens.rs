/// Padding id.
pub const PAD: u32 = 0;
/// Unknown-word id.
pub const UNK: u32 = 1;
/// Sentence-start id, seeded into step 0 of every beam.
pub const BEGIN: u32 = 2;
/// Sentence-end id. A hypothesis emitting it is terminal.
pub const END: u32 = 3;

/// The structural tokens every vocabulary reserves at ids 0..=3.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reserved {
    Pad = PAD,
    Unk = UNK,
    Begin = BEGIN,
    End = END,
}

impl Reserved {
    /// All reserved tokens in id order.
    pub const ALL: [Reserved; 4] = [Reserved::Pad, Reserved::Unk, Reserved::Begin, Reserved::End];

    pub fn id(self) -> u32 {
        self as u32
    }

    /// Surface form used when rendering.
    pub fn word(self) -> &'static str {
        match self {
            Reserved::Pad => "<pad>",
            Reserved::Unk => "unk",
            Reserved::Begin => "<b>",
            Reserved::End => "<e>",
        }
    }

    pub fn from_id(id: u32) -> Option<Reserved> {
        match id {
            PAD => Some(Reserved::Pad),
            UNK => Some(Reserved::Unk),
            BEGIN => Some(Reserved::Begin),
            END => Some(Reserved::End),
            _ => None,
        }
    }

    /// True for the sentence boundary markers (`BEGIN` and `END`).
    pub fn is_boundary(id: u32) -> bool {
        id == BEGIN || id == END
    }
}
