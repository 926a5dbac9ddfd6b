//! Tone synthesis seam.

use tactus_types::ToneSpec;

/// Host audio service that turns a [`ToneSpec`] into audible output.
///
/// Implementations may fail (no device, stream refused). Callers treat every
/// failure as non-fatal: the beat keeps going without sound.
pub trait ToneSynth {
    fn play(&mut self, tone: &ToneSpec) -> Result<(), String>;

    /// Forget a previous failure so the next `play` tries to open output again.
    fn reset_failure(&mut self) {}
}

/// Synth that discards every tone. Used when audio is disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSynth;

impl ToneSynth for SilentSynth {
    fn play(&mut self, _tone: &ToneSpec) -> Result<(), String> {
        Ok(())
    }
}

impl<S: ToneSynth + ?Sized> ToneSynth for Box<S> {
    fn play(&mut self, tone: &ToneSpec) -> Result<(), String> {
        (**self).play(tone)
    }

    fn reset_failure(&mut self) {
        (**self).reset_failure()
    }
}
