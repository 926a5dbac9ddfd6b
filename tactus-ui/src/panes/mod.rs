mod metronome_pane;

pub use metronome_pane::{EntryOutcome, MetronomePane};
