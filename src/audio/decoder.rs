//! Compressed/container formats decoded through symphonia

use std::fs::File;
use std::path::Path;
use symphonia::core::{
    audio::SampleBuffer, codecs::{Decoder, DecoderOptions}, errors::Error as SymphoniaError,
    formats::{FormatOptions, FormatReader}, io::MediaSourceStream, meta::MetadataOptions,
    probe::Hint,
};
use symphonia::default::{get_codecs, get_probe};
use crate::audio::{AudioClip, AudioFormat};
use crate::error::{DenoiseError, Result};

fn open_format(path: &Path) -> Result<Box<dyn FormatReader>> {
    let file = File::open(path)
        .map_err(|e| DenoiseError::audio(format!("Cannot open audio file {}: {}", path.display(), e)))?;

    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;

    Ok(probed.format)
}

/// Read the sample rate from the container header without decoding.
pub fn probe_sample_rate(path: &Path) -> Result<u32> {
    let format = open_format(path)?;
    let track = format.default_track()
        .ok_or_else(|| DenoiseError::audio("No default track found"))?;

    track.codec_params.sample_rate
        .ok_or_else(|| DenoiseError::audio("Container does not report a sample rate"))
}

/// Rate and channel count every decoded buffer must share.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StreamLayout {
    sample_rate: u32,
    channels: usize,
}

impl StreamLayout {
    /// Adopt `next` on the first buffer; reject later buffers with a different layout.
    fn merge(current: &mut Option<Self>, next: Self) -> Result<()> {
        match *current {
            None => {
                *current = Some(next);
                Ok(())
            }
            Some(layout) if layout == next => Ok(()),
            Some(layout) => Err(DenoiseError::audio(format!(
                "Stream changed mid-file from {} Hz/{} ch to {} Hz/{} ch",
                layout.sample_rate, layout.channels, next.sample_rate, next.channels
            ))),
        }
    }
}

fn make_decoder(format: &dyn FormatReader) -> Result<(u32, Box<dyn Decoder>)> {
    let track = format.default_track()
        .ok_or_else(|| DenoiseError::audio("No default track found"))?;
    let decoder = get_codecs().make(&track.codec_params, &DecoderOptions::default())?;
    Ok((track.id, decoder))
}

pub fn decode_file(path: &Path) -> Result<AudioClip> {
    let mut format = open_format(path)?;
    let (mut track_id, mut decoder) = make_decoder(&*format)?;

    let mut layout: Option<StreamLayout> = None;
    let mut samples: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
            Err(SymphoniaError::ResetRequired) => {
                log::warn!("Stream reset in {}, recreating decoder", path.display());
                (track_id, decoder) = make_decoder(&*format)?;
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(msg)) => {
                log::warn!("Skipping corrupt packet: {}", msg);
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let spec = *decoded.spec();
        StreamLayout::merge(&mut layout, StreamLayout {
            sample_rate: spec.rate,
            channels: spec.channels.count(),
        })?;

        let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
        buffer.copy_interleaved_ref(decoded);
        samples.extend_from_slice(buffer.samples());
    }

    let layout = layout.ok_or_else(|| DenoiseError::audio(format!(
        "No audio decoded from {}", path.display()
    )))?;

    log::debug!(
        "Decoded {}: sample_rate={}, channels={}, samples={}",
        path.display(), layout.sample_rate, layout.channels, samples.len()
    );

    let channels = u16::try_from(layout.channels)
        .map_err(|_| DenoiseError::audio(format!("Too many channels: {}", layout.channels)))?;
    let clip = AudioClip::from_interleaved(&samples, channels, layout.sample_rate, AudioFormat::Int16)?;
    clip.header.validate()?;
    Ok(clip)
}
