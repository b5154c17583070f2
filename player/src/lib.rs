use anyhow::anyhow;
use cpal::{
    BufferSize, Device, OutputCallbackInfo, StreamConfig, SupportedBufferSize,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use padkeys_core::{SigCtx, SigSampleIntoBufT};
use std::{
    ops::ControlFlow,
    sync::{Arc, RwLock, mpsc},
};

#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// default: 0.01
    pub target_latency_s: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_latency_s: 0.01,
        }
    }
}

pub struct Player {
    device: Device,
}

struct SyncCommandRequestNumSamples(usize);
struct SyncCommandDone;

/// Clamp the ideal number of frames per buffer into the range supported by the device. The ideal
/// size is rounded down to a multiple of 4 as alsa complains if the buffer size is not evenly
/// divisible by 4.
fn choose_buffer_size(
    sample_rate_hz: u32,
    target_latency_s: f32,
    supported: &SupportedBufferSize,
) -> BufferSize {
    let ideal_buffer_size =
        ((sample_rate_hz as f32 * target_latency_s) as u32) & (!3);
    match supported {
        SupportedBufferSize::Range { min, max } => {
            BufferSize::Fixed(ideal_buffer_size.clamp(*min, (*max).max(*min)))
        }
        SupportedBufferSize::Unknown => BufferSize::Default,
    }
}

impl Player {
    pub fn new() -> anyhow::Result<Self> {
        let host = cpal::default_host();
        log::info!("cpal host: {}", host.id().name());
        let device = host
            .default_output_device()
            .ok_or(anyhow!("no output device"))?;
        if let Ok(name) = device.name() {
            log::info!("cpal device: {}", name);
        } else {
            log::info!("cpal device: (no name)");
        }
        Ok(Self { device })
    }

    fn choose_config(&self, config: Config) -> anyhow::Result<StreamConfig> {
        let default_config = self.device.default_output_config()?;
        let sample_rate = default_config.sample_rate();
        let buffer_size = choose_buffer_size(
            sample_rate.0,
            config.target_latency_s,
            default_config.buffer_size(),
        );
        Ok(StreamConfig {
            channels: default_config.channels(),
            sample_rate,
            buffer_size,
        })
    }

    fn make_stream_sync_mono(
        &self,
        stream_config: &StreamConfig,
        buf: Arc<RwLock<Vec<f32>>>,
        send_sync_command_request_num_samples: mpsc::Sender<
            SyncCommandRequestNumSamples,
        >,
        recv_sync_command_done: mpsc::Receiver<SyncCommandDone>,
    ) -> anyhow::Result<cpal::Stream> {
        log::info!("sample rate: {}", stream_config.sample_rate.0);
        log::info!("num channels: {}", stream_config.channels);
        log::info!("buffer size: {:?}", stream_config.buffer_size);
        let channels = stream_config.channels.max(1) as usize;
        let stream = self.device.build_output_stream(
            stream_config,
            move |data: &mut [f32], _: &OutputCallbackInfo| {
                // If the main thread has stopped then output silence until the stream is dropped.
                if send_sync_command_request_num_samples
                    .send(SyncCommandRequestNumSamples(data.len() / channels))
                    .is_err()
                {
                    data.fill(0.0);
                    return;
                }
                let Ok(SyncCommandDone) = recv_sync_command_done.recv() else {
                    data.fill(0.0);
                    return;
                };
                let Ok(buf) = buf.read() else {
                    data.fill(0.0);
                    return;
                };
                for (output, &input) in data.chunks_mut(channels).zip(buf.iter())
                {
                    // The same sample is played on every channel.
                    output.fill(input);
                }
            },
            |err| log::error!("stream error: {}", err),
            None,
        )?;
        Ok(stream)
    }

    /// Play an audio stream where samples are calculated with synchronous control flow while
    /// filling the audio buffer. This has the lowest possible latency and lets the signal stay on
    /// the main thread. After each buffer is computed, `f` is called with its samples. Playback
    /// stops when `f` returns `ControlFlow::Break`.
    pub fn play_signal_sync_mono_callback<S, F>(
        &self,
        mut sig: S,
        mut f: F,
        config: Config,
    ) -> anyhow::Result<()>
    where
        S: SigSampleIntoBufT<Item = f32>,
        F: FnMut(&[f32]) -> ControlFlow<()>,
    {
        // channel for cpal thread to send messages to main thread
        let (
            send_sync_command_request_num_samples,
            recv_sync_command_request_num_samples,
        ) = mpsc::channel::<SyncCommandRequestNumSamples>();
        let (send_sync_command_done, recv_sync_command_done) =
            mpsc::channel::<SyncCommandDone>();
        // buffer for sending samples from main thread to cpal thread
        let buffer = Arc::new(RwLock::new(Vec::new()));
        let stream_config = self.choose_config(config)?;
        let stream = self.make_stream_sync_mono(
            &stream_config,
            Arc::clone(&buffer),
            send_sync_command_request_num_samples,
            recv_sync_command_done,
        )?;
        stream.play()?;
        let mut ctx = SigCtx {
            sample_rate_hz: stream_config.sample_rate.0 as f32,
            batch_index: 0,
            num_samples: 0,
        };
        let result = loop {
            let Ok(SyncCommandRequestNumSamples(num_samples)) =
                recv_sync_command_request_num_samples.recv()
            else {
                break Err(anyhow!("cpal thread stopped unexpectedly"));
            };
            {
                ctx.num_samples = num_samples;
                let Ok(mut buffer) = buffer.write() else {
                    break Err(anyhow!("cpal thread panicked"));
                };
                if send_sync_command_done.send(SyncCommandDone).is_err() {
                    break Err(anyhow!("cpal thread stopped unexpectedly"));
                }
                // sample the signal directly into the buffer shared with the cpal thread
                sig.sample_into_buf(&ctx, &mut buffer);
            }
            let flow = match buffer.read() {
                Ok(buffer) => f(&buffer),
                Err(_) => break Err(anyhow!("cpal thread panicked")),
            };
            ctx.batch_index += 1;
            if flow.is_break() {
                break Ok(());
            }
        };
        // The cpal thread may be waiting on this channel. Close it before dropping the stream, as
        // dropping the stream waits for the cpal thread.
        drop(send_sync_command_done);
        drop(recv_sync_command_request_num_samples);
        drop(stream);
        result
    }

    /// Like `play_signal_sync_mono_callback` but plays until an error occurs.
    pub fn play_signal_sync_mono<S>(
        &self,
        sig: S,
        config: Config,
    ) -> anyhow::Result<()>
    where
        S: SigSampleIntoBufT<Item = f32>,
    {
        self.play_signal_sync_mono_callback(
            sig,
            |_| ControlFlow::Continue(()),
            config,
        )
    }
}
