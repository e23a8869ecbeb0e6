//! In-memory audio clips and WAV file processing

use std::path::Path;
use std::fs::File;
use std::io::BufWriter;
use hound::{WavReader, WavWriter, SampleFormat};
use ndarray::{Array1, Array2, ArrayView1, Axis};
use crate::error::{DenoiseError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Int16,
    Int24,
    Int32,
    Float32,
}

impl AudioFormat {
    pub fn name(&self) -> &'static str {
        match self {
            AudioFormat::Int16 => "int16",
            AudioFormat::Int24 => "int24",
            AudioFormat::Int32 => "int32",
            AudioFormat::Float32 => "float32",
        }
    }

    pub fn bits_per_sample(&self) -> u16 {
        match self {
            AudioFormat::Int16 => 16,
            AudioFormat::Int24 => 24,
            AudioFormat::Int32 | AudioFormat::Float32 => 32,
        }
    }

    pub fn to_sample_format(self) -> SampleFormat {
        match self {
            AudioFormat::Float32 => SampleFormat::Float,
            _ => SampleFormat::Int,
        }
    }

    fn from_spec(spec: &hound::WavSpec) -> Result<Self> {
        match (spec.sample_format, spec.bits_per_sample) {
            (SampleFormat::Int, 8 | 16) => Ok(AudioFormat::Int16),
            (SampleFormat::Int, 24) => Ok(AudioFormat::Int24),
            (SampleFormat::Int, 32) => Ok(AudioFormat::Int32),
            (SampleFormat::Float, 32) => Ok(AudioFormat::Float32),
            (format, bits) => Err(DenoiseError::audio(format!(
                "Unsupported WAV sample format: {:?} {}-bit", format, bits
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AudioHeader {
    pub sample_rate: u32,
    pub channels: u16,
    pub format: AudioFormat,
    pub total_frames: usize,
    pub duration: f64,
}

impl AudioHeader {
    pub fn new(sample_rate: u32, channels: u16, format: AudioFormat, total_frames: usize) -> Self {
        let duration = if sample_rate > 0 {
            total_frames as f64 / sample_rate as f64
        } else {
            0.0
        };

        Self {
            sample_rate,
            channels,
            format,
            total_frames,
            duration,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(DenoiseError::audio("Sample rate cannot be 0"));
        }

        if self.channels == 0 {
            return Err(DenoiseError::audio("Channel count cannot be 0"));
        }

        if self.total_frames == 0 {
            return Err(DenoiseError::audio("Audio contains no samples"));
        }

        Ok(())
    }

    pub fn to_wav_spec(&self) -> hound::WavSpec {
        hound::WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: self.format.bits_per_sample(),
            sample_format: self.format.to_sample_format(),
        }
    }
}

/// Decoded audio, laid out `[channels, frames]` with samples in `[-1.0, 1.0]`.
#[derive(Debug, Clone)]
pub struct AudioClip {
    pub header: AudioHeader,
    pub data: Array2<f32>,
}

impl AudioClip {
    pub fn new(sample_rate: u32, data: Array2<f32>, format: AudioFormat) -> Result<Self> {
        if data.nrows() == 0 {
            return Err(DenoiseError::audio("Audio must have at least one channel"));
        }
        let channels = u16::try_from(data.nrows())
            .map_err(|_| DenoiseError::audio(format!("Too many channels: {}", data.nrows())))?;
        let header = AudioHeader::new(sample_rate, channels, format, data.ncols());
        Ok(Self { header, data })
    }

    pub fn new_mono(sample_rate: u32, samples: Vec<f32>, format: AudioFormat) -> Self {
        let frames = samples.len();
        let data = Array1::from(samples).insert_axis(Axis(0));
        Self {
            header: AudioHeader::new(sample_rate, 1, format, frames),
            data,
        }
    }

    /// Build a clip from frame-interleaved samples (`L R L R ...`).
    pub fn from_interleaved(samples: &[f32], channels: u16, sample_rate: u32, format: AudioFormat) -> Result<Self> {
        if channels == 0 {
            return Err(DenoiseError::audio("Channel count cannot be 0"));
        }
        let ch = channels as usize;
        let frames = samples.len() / ch;
        if samples.len() % ch != 0 {
            log::warn!("Dropping {} trailing samples of an incomplete frame", samples.len() % ch);
        }

        let mut data = Array2::zeros((ch, frames));
        for (i, frame) in samples.chunks_exact(ch).enumerate() {
            for (c, &sample) in frame.iter().enumerate() {
                data[[c, i]] = sample;
            }
        }

        Self::new(sample_rate, data, format)
    }

    pub fn to_interleaved(&self) -> Vec<f32> {
        self.data.t().iter().copied().collect()
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path)
            .map_err(|e| DenoiseError::Audio {
                message: format!("Cannot open audio file {}: {}", path.display(), e)
            })?;

        let mut reader = WavReader::new(std::io::BufReader::new(file))
            .map_err(|e| DenoiseError::Audio {
                message: format!("Cannot create WAV reader: {}", e)
            })?;

        let spec = reader.spec();
        let format = AudioFormat::from_spec(&spec)?;

        let samples: Vec<f32> = match spec.sample_format {
            SampleFormat::Float => reader.samples::<f32>()
                .collect::<std::result::Result<_, _>>()?,
            SampleFormat::Int => {
                let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader.samples::<i32>()
                    .map(|sample| sample.map(|s| s as f32 / scale))
                    .collect::<std::result::Result<_, _>>()?
            }
        };

        let clip = Self::from_interleaved(&samples, spec.channels, spec.sample_rate, format)?;
        clip.header.validate()?;
        Ok(clip)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| DenoiseError::Audio {
                    message: format!("Cannot create output directory: {}", e)
                })?;
        }

        let file = File::create(path)
            .map_err(|e| DenoiseError::Audio {
                message: format!("Cannot create output file {}: {}", path.display(), e)
            })?;

        let spec = self.header.to_wav_spec();
        let mut writer = WavWriter::new(BufWriter::new(file), spec)
            .map_err(|e| DenoiseError::Audio {
                message: format!("Cannot create WAV writer: {}", e)
            })?;

        for frame in self.data.axis_iter(Axis(1)) {
            for &sample in frame.iter() {
                let clamped = sample.clamp(-1.0, 1.0);
                match self.header.format {
                    AudioFormat::Float32 => writer.write_sample(clamped)?,
                    AudioFormat::Int16 => writer.write_sample((clamped * i16::MAX as f32) as i16)?,
                    AudioFormat::Int24 => writer.write_sample((clamped * 8_388_607.0) as i32)?,
                    AudioFormat::Int32 => writer.write_sample((clamped as f64 * i32::MAX as f64) as i32)?,
                }
            }
        }

        writer.finalize()
            .map_err(|e| DenoiseError::Audio {
                message: format!("Failed to finalize WAV writing: {}", e)
            })?;

        Ok(())
    }

    pub fn channel(&self, index: usize) -> ArrayView1<'_, f32> {
        self.data.row(index)
    }

    pub fn sample_rate(&self) -> u32 {
        self.header.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.header.channels
    }

    pub fn frames(&self) -> usize {
        self.header.total_frames
    }

    pub fn duration(&self) -> f64 {
        self.header.duration
    }

    pub fn format(&self) -> AudioFormat {
        self.header.format
    }

    /// Same samples, different on-disk encoding.
    pub fn with_format(mut self, format: AudioFormat) -> Self {
        self.header.format = format;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.header.validate()?;

        if self.data.ncols() != self.header.total_frames {
            return Err(DenoiseError::audio(
                format!("Data length mismatch: header shows {} frames, actual {} frames",
                       self.header.total_frames, self.data.ncols())
            ));
        }

        if self.data.nrows() != self.header.channels as usize {
            return Err(DenoiseError::audio(
                format!("Channel count mismatch: header shows {} channels, actual {} channels",
                       self.header.channels, self.data.nrows())
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_audio_format() {
        assert_eq!(AudioFormat::Int16.name(), "int16");
        assert_eq!(AudioFormat::Int16.bits_per_sample(), 16);
        assert_eq!(AudioFormat::Int24.bits_per_sample(), 24);
        assert_eq!(AudioFormat::Float32.to_sample_format(), SampleFormat::Float);
        assert_eq!(AudioFormat::Int32.to_sample_format(), SampleFormat::Int);
    }

    #[test]
    fn test_audio_header_validation() {
        let header = AudioHeader::new(48000, 1, AudioFormat::Float32, 1000);
        assert!(header.validate().is_ok());
        assert!((header.duration - 1000.0 / 48000.0).abs() < f64::EPSILON);

        assert!(AudioHeader::new(0, 1, AudioFormat::Float32, 1000).validate().is_err());
        assert!(AudioHeader::new(48000, 0, AudioFormat::Float32, 1000).validate().is_err());
        assert!(AudioHeader::new(48000, 1, AudioFormat::Float32, 0).validate().is_err());
    }

    #[test]
    fn test_interleaving() {
        let samples = vec![0.1, -0.1, 0.2, -0.2, 0.3, -0.3];
        let clip = AudioClip::from_interleaved(&samples, 2, 16000, AudioFormat::Float32).unwrap();
        assert_eq!(clip.channels(), 2);
        assert_eq!(clip.frames(), 3);
        assert_eq!(clip.channel(0).to_vec(), vec![0.1, 0.2, 0.3]);
        assert_eq!(clip.channel(1).to_vec(), vec![-0.1, -0.2, -0.3]);
        assert_eq!(clip.to_interleaved(), samples);
        assert!(clip.validate().is_ok());
    }

    #[test]
    fn test_incomplete_frame_dropped() {
        let clip = AudioClip::from_interleaved(&[0.1, 0.2, 0.3], 2, 16000, AudioFormat::Int16).unwrap();
        assert_eq!(clip.frames(), 1);
    }

    #[test]
    fn test_zero_channels_rejected() {
        assert!(AudioClip::from_interleaved(&[0.1], 0, 16000, AudioFormat::Int16).is_err());
        assert!(AudioClip::new(16000, Array2::zeros((0, 4)), AudioFormat::Int16).is_err());
    }

    #[test]
    fn test_float_wav_file() {
        let original = AudioClip::new_mono(16000, vec![0.1, 0.2, 0.3, 0.4, 0.5], AudioFormat::Float32);

        let temp_file = NamedTempFile::new().unwrap();
        original.save_to_file(temp_file.path()).unwrap();
        let loaded = AudioClip::from_file(temp_file.path()).unwrap();

        assert_eq!(loaded.sample_rate(), 16000);
        assert_eq!(loaded.channels(), 1);
        assert_eq!(loaded.format(), AudioFormat::Float32);
        for (a, b) in loaded.channel(0).iter().zip(original.channel(0).iter()) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn test_int16_stereo_wav_file() {
        let samples = vec![0.5, -0.5, 0.25, -0.25];
        let original = AudioClip::from_interleaved(&samples, 2, 44100, AudioFormat::Int16).unwrap();

        let temp_file = NamedTempFile::new().unwrap();
        original.save_to_file(temp_file.path()).unwrap();

        let reader = hound::WavReader::open(temp_file.path()).unwrap();
        assert_eq!(reader.spec().bits_per_sample, 16);
        assert_eq!(reader.spec().channels, 2);

        let loaded = AudioClip::from_file(temp_file.path()).unwrap();
        assert_eq!(loaded.frames(), 2);
        for (a, b) in loaded.to_interleaved().iter().zip(samples.iter()) {
            assert!((a - b).abs() < 1e-3);
        }
    }

    #[test]
    fn test_out_of_range_samples_clamped() {
        let clip = AudioClip::new_mono(8000, vec![1.5, -2.0], AudioFormat::Int16);
        let temp_file = NamedTempFile::new().unwrap();
        clip.save_to_file(temp_file.path()).unwrap();

        let mut reader = hound::WavReader::open(temp_file.path()).unwrap();
        let raw: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(raw, vec![i16::MAX, -i16::MAX]);
    }

    #[test]
    fn test_not_a_wav_file() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), b"definitely not RIFF").unwrap();
        assert!(AudioClip::from_file(temp_file.path()).is_err());
    }
}
