use std::io::Cursor;

use myna::application::ports::RecognitionError;
use myna::infrastructure::audio::audio_decoder::{decode_to_mono_pcm, RECOGNITION_SAMPLE_RATE};

fn encode_wav(samples: &[f32], sample_rate: u32, channels: u16) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for &sample in samples {
            writer
                .write_sample((sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16)
                .unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

/// One second of a 440 Hz sine at the given rate.
fn sine_second(sample_rate: u32) -> Vec<f32> {
    (0..sample_rate)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            (t * 440.0 * 2.0 * std::f32::consts::PI).sin() * 0.5
        })
        .collect()
}

#[test]
fn given_wav_at_recognition_rate_then_samples_decode_unchanged() {
    let samples = sine_second(RECOGNITION_SAMPLE_RATE);
    let wav = encode_wav(&samples, RECOGNITION_SAMPLE_RATE, 1);

    let decoded = decode_to_mono_pcm(&wav).unwrap();

    assert_eq!(decoded.len(), samples.len());
    for (decoded, original) in decoded.iter().zip(&samples) {
        assert!((decoded - original).abs() < 0.001);
    }
}

#[test]
fn given_wav_at_higher_rate_then_output_is_resampled_to_recognition_rate() {
    let samples = sine_second(48_000);
    let wav = encode_wav(&samples, 48_000, 1);

    let decoded = decode_to_mono_pcm(&wav).unwrap();

    let expected = RECOGNITION_SAMPLE_RATE as usize;
    let deviation = (decoded.len() as i64 - expected as i64).abs();
    assert!(
        deviation < 100,
        "expected about {} samples, got {}",
        expected,
        decoded.len()
    );
}

#[test]
fn given_stereo_wav_then_channels_are_downmixed_to_mono() {
    let mono = sine_second(RECOGNITION_SAMPLE_RATE);
    let mut interleaved = Vec::with_capacity(mono.len() * 2);
    for &sample in &mono {
        interleaved.push(sample);
        interleaved.push(-sample);
    }
    let wav = encode_wav(&interleaved, RECOGNITION_SAMPLE_RATE, 2);

    let decoded = decode_to_mono_pcm(&wav).unwrap();

    assert_eq!(decoded.len(), mono.len());
    // Opposite-phase channels cancel out in the downmix.
    for sample in &decoded {
        assert!(sample.abs() < 0.001);
    }
}

#[test]
fn given_unreadable_bytes_then_decoding_fails() {
    let result = decode_to_mono_pcm(b"this is not audio at all");

    assert!(matches!(result, Err(RecognitionError::DecodingFailed(_))));
}

#[test]
fn given_empty_input_then_decoding_fails() {
    let result = decode_to_mono_pcm(&[]);

    assert!(matches!(result, Err(RecognitionError::DecodingFailed(_))));
}
