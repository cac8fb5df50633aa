//! Generated alert tone.
//!
//! No audio asset ships with the app. The alert is a sine wave with a short
//! linear attack followed by an exponential decay, rendered on demand.

use std::f32::consts::PI;
use std::io::{self, Write};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Level the decay ends at.
const DECAY_FLOOR: f32 = 0.0001;

/// Named tone presets offered in the notification settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundPreset {
    #[default]
    Default,
    Soft,
    Energy,
    Minimal,
}

impl SoundPreset {
    /// Pitch of the generated tone for this preset.
    ///
    /// Presets only change the pitch; envelope and length are shared.
    /// `Default` is the 440 Hz alert, the others sit a fourth below and a
    /// fifth and an octave above it.
    pub fn frequency_hz(self) -> f32 {
        match self {
            SoundPreset::Default => 440.0,
            SoundPreset::Soft => 330.0,
            SoundPreset::Energy => 660.0,
            SoundPreset::Minimal => 880.0,
        }
    }
}

impl FromStr for SoundPreset {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(SoundPreset::Default),
            "soft" => Ok(SoundPreset::Soft),
            "energy" => Ok(SoundPreset::Energy),
            "minimal" => Ok(SoundPreset::Minimal),
            _ => Err(ValidationError::InvalidValue {
                field: "sound".into(),
                message: format!("unknown sound preset '{s}'"),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency_hz: f32,
    pub duration: Duration,
    pub attack: Duration,
    /// 0.0 .. 1.0
    pub volume: f32,
}

impl Default for Tone {
    fn default() -> Self {
        Self {
            frequency_hz: 440.0,
            duration: Duration::from_secs(3),
            attack: Duration::from_millis(100),
            volume: 1.0,
        }
    }
}

impl Tone {
    /// Tone for a preset at a 0-100 volume setting.
    pub fn from_settings(preset: SoundPreset, volume_pct: u8) -> Self {
        Self {
            frequency_hz: preset.frequency_hz(),
            volume: f32::from(volume_pct.min(100)) / 100.0,
            ..Self::default()
        }
    }

    /// Envelope gain at `t` seconds, before volume scaling.
    pub fn envelope(&self, t: f32) -> f32 {
        let attack = self.attack.as_secs_f32();
        let total = self.duration.as_secs_f32();
        if t < 0.0 || t >= total {
            return 0.0;
        }
        if t < attack {
            return t / attack;
        }
        let decay_len = (total - attack).max(f32::EPSILON);
        DECAY_FLOOR.powf((t - attack) / decay_len)
    }

    /// Mono samples in -1.0 ..= 1.0.
    pub fn render(&self, sample_rate: u32) -> Vec<f32> {
        let count = (self.duration.as_secs_f32() * sample_rate as f32) as usize;
        (0..count)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                (2.0 * PI * self.frequency_hz * t).sin() * self.envelope(t) * self.volume
            })
            .collect()
    }

    /// Write the rendered tone as a 16-bit PCM mono WAV stream.
    pub fn write_wav<W: Write>(&self, mut out: W, sample_rate: u32) -> io::Result<()> {
        let samples = self.render(sample_rate);
        let data_len = (samples.len() * 2) as u32;

        out.write_all(b"RIFF")?;
        out.write_all(&(36 + data_len).to_le_bytes())?;
        out.write_all(b"WAVE")?;

        out.write_all(b"fmt ")?;
        out.write_all(&16u32.to_le_bytes())?;
        out.write_all(&1u16.to_le_bytes())?; // PCM
        out.write_all(&1u16.to_le_bytes())?; // mono
        out.write_all(&sample_rate.to_le_bytes())?;
        out.write_all(&(sample_rate * 2).to_le_bytes())?;
        out.write_all(&2u16.to_le_bytes())?;
        out.write_all(&16u16.to_le_bytes())?;

        out.write_all(b"data")?;
        out.write_all(&data_len.to_le_bytes())?;
        for s in samples {
            let v = (s.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16;
            out.write_all(&v.to_le_bytes())?;
        }
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_ramps_then_decays() {
        let tone = Tone::default();
        assert_eq!(tone.envelope(0.0), 0.0);
        assert!((tone.envelope(0.05) - 0.5).abs() < 1e-4);
        assert!((tone.envelope(0.1) - 1.0).abs() < 1e-4);
        assert!(tone.envelope(1.0) < tone.envelope(0.5));
        assert!(tone.envelope(2.999) < 0.001);
        assert_eq!(tone.envelope(3.0), 0.0);
    }

    #[test]
    fn render_length_and_range() {
        let tone = Tone::from_settings(SoundPreset::Default, 50);
        let samples = tone.render(8_000);
        assert_eq!(samples.len(), 24_000);
        assert!(samples.iter().all(|s| s.abs() <= 0.5 + 1e-6));
    }

    #[test]
    fn wav_header_is_consistent() {
        let tone = Tone {
            duration: Duration::from_millis(500),
            ..Tone::default()
        };
        let mut buf = Vec::new();
        tone.write_wav(&mut buf, 8_000).unwrap();
        assert_eq!(&buf[0..4], b"RIFF");
        assert_eq!(&buf[8..12], b"WAVE");
        let data_len = u32::from_le_bytes([buf[40], buf[41], buf[42], buf[43]]);
        assert_eq!(data_len, 4_000 * 2);
        assert_eq!(buf.len(), 44 + data_len as usize);
    }

    #[test]
    fn presets_parse() {
        assert_eq!("Soft".parse::<SoundPreset>().unwrap(), SoundPreset::Soft);
        assert!("loud".parse::<SoundPreset>().is_err());
        assert_eq!(Tone::from_settings(SoundPreset::Minimal, 200).volume, 1.0);
    }

    #[test]
    fn presets_only_change_pitch() {
        let base = Tone::from_settings(SoundPreset::Default, 80);
        assert_eq!(base.frequency_hz, 440.0);
        for preset in [SoundPreset::Soft, SoundPreset::Energy, SoundPreset::Minimal] {
            let tone = Tone::from_settings(preset, 80);
            assert_eq!(tone.frequency_hz, preset.frequency_hz());
            assert_ne!(tone.frequency_hz, base.frequency_hz);
            assert_eq!(tone.duration, base.duration);
            assert_eq!(tone.volume, base.volume);
        }
    }
}
