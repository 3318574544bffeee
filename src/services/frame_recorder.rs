// src/services/frame_recorder.rs
// FrameRecorder captures frames from a wgpu::Texture and encodes them to video.
// Encoding gets its own thread so the render loop never waits on ffmpeg.
// Frames are piped directly into ffmpeg for h264 encoding.

use nannou::{image::RgbaImage, wgpu};
use std::{
    io::Write,
    path::{Path, PathBuf},
    process::{Child, ChildStdin, Command, Stdio},
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        mpsc::{channel, Receiver, Sender},
        Arc,
    },
    thread::{self, JoinHandle},
};

use crate::error::{Error, Result};

const BATCH_SIZE: usize = 10;
const RESOLVED_TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;
const PIXEL_SIZE: u32 = 4; // bytes per pixel of RESOLVED_TEXTURE_FORMAT

// RGBA bytes, width, height
type FrameData = (Vec<u8>, u32, u32);

struct WorkerThread {
    thread_handle: Option<JoinHandle<()>>,
    frame_sender: Option<Sender<FrameData>>, // dropped to end the recording
    thread_completed: Arc<AtomicBool>,
    frames_queued: Arc<AtomicUsize>,
    frames_written: Arc<AtomicUsize>,
}

impl WorkerThread {
    /// Spawns the encoding thread feeding `sink`; `process` is waited on once the sink is closed.
    fn spawn<W: Write + Send + 'static>(sink: W, process: Option<Child>) -> Self {
        let frames_queued = Arc::new(AtomicUsize::new(0));
        let frames_written = Arc::new(AtomicUsize::new(0));
        let thread_completed = Arc::new(AtomicBool::new(false));

        let (sender, receiver) = channel();

        let frames_written_clone = frames_written.clone();
        let thread_completed_clone = thread_completed.clone();

        let thread_handle = thread::spawn(move || {
            worker_thread_function(receiver, sink, process, frames_written_clone);
            thread_completed_clone.store(true, Ordering::SeqCst);
        });

        Self {
            thread_handle: Some(thread_handle),
            frame_sender: Some(sender),
            thread_completed,
            frames_queued,
            frames_written,
        }
    }

    /// Closes the channel and blocks until every queued frame is written.
    fn finish(&mut self) {
        drop(self.frame_sender.take());
        if let Some(handle) = self.thread_handle.take() {
            if let Err(e) = handle.join() {
                log::error!("Error joining worker thread: {:?}", e);
            }
        }
    }
}

impl Drop for WorkerThread {
    fn drop(&mut self) {
        self.finish();
    }
}

pub struct FrameRecorder {
    worker_thread: Option<WorkerThread>,
    output_path: PathBuf,
    fps: u32,
    frame_limit: u32,
    frame_number: u32,
    capture_pending: bool,

    // capture pipeline
    width: u32,
    height: u32,
    texture_reshaper: wgpu::TextureReshaper,
    resolved_texture: wgpu::Texture, // for MSAA resolution
    staging_buffer: wgpu::Buffer,
}

impl FrameRecorder {
    pub fn new(
        device: &wgpu::Device,
        render_texture: &wgpu::Texture,
        output_path: &Path,
        frame_limit: u32,
        fps: u32,
    ) -> Result<Self> {
        // Ensure output directory exists
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let width = render_texture.width();
        let height = render_texture.height();

        // Create a texture for resolving MSAA
        let resolved_texture = wgpu::TextureBuilder::new()
            .size([width, height])
            .sample_count(1)
            .format(RESOLVED_TEXTURE_FORMAT)
            .usage(
                wgpu::TextureUsages::RENDER_ATTACHMENT
                    | wgpu::TextureUsages::COPY_SRC
                    | wgpu::TextureUsages::TEXTURE_BINDING,
            )
            .build(device);

        let texture_reshaper = wgpu::TextureReshaper::new(
            device,
            &render_texture.view().build(),
            render_texture.sample_count(), // source samples
            render_texture.sample_type(),
            1, // destination samples (no MSAA)
            RESOLVED_TEXTURE_FORMAT,
        );

        let bytes_per_row = padded_bytes_per_row(width);
        let staging_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Frame Capture Staging Buffer"),
            size: (bytes_per_row * height) as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        Ok(Self {
            worker_thread: None,
            output_path: output_path.to_path_buf(),
            fps,
            frame_limit,
            frame_number: 0,
            capture_pending: false,
            width,
            height,
            texture_reshaper,
            resolved_texture,
            staging_buffer,
        })
    }

    /// Starts ffmpeg and the encoding thread. Fails if ffmpeg cannot be launched.
    pub fn start(&mut self) -> Result<()> {
        if self.is_recording() {
            return Ok(());
        }
        self.cleanup_completed_worker();

        let (process, stdin) =
            start_ffmpeg_process(&self.output_path, self.width, self.height, self.fps)?;
        self.worker_thread = Some(WorkerThread::spawn(stdin, Some(process)));
        self.frame_number = 0;
        log::info!("Recording started: {}", self.output_path.display());
        Ok(())
    }

    /// Stops accepting frames; the worker flushes what it has and closes ffmpeg.
    pub fn stop(&mut self) {
        if let Some(worker) = self.worker_thread.as_mut() {
            if worker.frame_sender.take().is_some() {
                log::info!("Recording stopped after {} frames", self.frame_number);
            }
        }
    }

    /// Stops recording and waits until ffmpeg has every captured frame and has exited.
    pub fn finish(&mut self) {
        self.stop();
        if let Some(mut worker) = self.worker_thread.take() {
            let (processed, total) = (
                worker.frames_written.load(Ordering::SeqCst),
                worker.frames_queued.load(Ordering::SeqCst),
            );
            if processed < total {
                log::info!("Waiting for {} frames to be encoded", total - processed);
            }
            worker.finish();
        }
    }

    pub fn is_recording(&self) -> bool {
        self.worker_thread
            .as_ref()
            .is_some_and(|worker| worker.frame_sender.is_some())
    }

    pub fn frames_captured(&self) -> u32 {
        self.frame_number
    }

    pub fn cleanup_completed_worker(&mut self) {
        let completed = self
            .worker_thread
            .as_ref()
            .is_some_and(|worker| worker.thread_completed.load(Ordering::SeqCst));

        if completed {
            if let Some(mut worker) = self.worker_thread.take() {
                worker.finish();
            }
        }
    }

    /// Encodes the MSAA resolve and the texture-to-buffer copy for this frame.
    /// Returns false when nothing was encoded.
    pub fn encode_capture(&mut self, encoder: &mut wgpu::CommandEncoder) -> bool {
        if !self.is_recording() || self.capture_pending {
            return false;
        }
        if self.frame_number >= self.frame_limit {
            log::warn!("Frame limit of {} reached", self.frame_limit);
            self.stop();
            return false;
        }

        // Step 1: Use the reshaper to resolve MSAA
        self.texture_reshaper
            .encode_render_pass(&self.resolved_texture.view().build(), encoder);

        // Step 2: Copy from resolved texture to staging buffer
        encoder.copy_texture_to_buffer(
            self.resolved_texture.as_image_copy(),
            wgpu::ImageCopyBuffer {
                buffer: &self.staging_buffer,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_bytes_per_row(self.width)),
                    rows_per_image: Some(self.height),
                },
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );

        self.capture_pending = true;
        true
    }

    /// Reads back the frame encoded by `encode_capture`. Call after the encoder was submitted.
    pub fn finish_capture(&mut self, device: &wgpu::Device) -> Result<()> {
        if !self.capture_pending {
            return Ok(());
        }
        self.capture_pending = false;

        // Step 3: Map the buffer and wait for the GPU
        let slice = self.staging_buffer.slice(..);
        let (map_sender, map_receiver) = channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = map_sender.send(result);
        });
        device.poll(wgpu::Maintain::Wait);

        match map_receiver.recv() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(Error::Encoder(format!("buffer mapping error: {}", e))),
            Err(_) => return Err(Error::Encoder("buffer mapping was never completed".to_string())),
        }

        let unpadded_data = {
            let mapped_memory = slice.get_mapped_range();
            unpad_rows(
                &mapped_memory,
                self.width * PIXEL_SIZE,
                padded_bytes_per_row(self.width),
                self.height,
            )
        };
        self.staging_buffer.unmap();

        // Step 4: Hand the frame to the encoding thread
        let Some(worker) = self.worker_thread.as_ref() else {
            return Ok(());
        };
        let Some(sender) = worker.frame_sender.as_ref() else {
            return Ok(());
        };
        worker.frames_queued.fetch_add(1, Ordering::SeqCst);
        if sender.send((unpadded_data, self.width, self.height)).is_err() {
            worker.frames_queued.fetch_sub(1, Ordering::SeqCst);
            return Err(Error::Encoder("encoding thread has exited".to_string()));
        }
        self.frame_number += 1;
        Ok(())
    }

    /// (frames written to ffmpeg, frames captured)
    pub fn get_queue_status(&self) -> (usize, usize) {
        match self.worker_thread.as_ref() {
            Some(worker) => (
                worker.frames_written.load(Ordering::SeqCst),
                worker.frames_queued.load(Ordering::SeqCst),
            ),
            None => (0, 0),
        }
    }

    pub fn has_pending_frames(&self) -> bool {
        self.worker_thread
            .as_ref()
            .is_some_and(|worker| !worker.thread_completed.load(Ordering::SeqCst))
    }
}

fn worker_thread_function<W: Write>(
    receiver: Receiver<FrameData>,
    sink: W,
    process: Option<Child>,
    frames_written: Arc<AtomicUsize>,
) {
    let mut sink = Some(sink);
    let mut frame_batch = Vec::new();
    let mut batch_count = 0;

    // Runs until the sender is dropped and every queued frame is received
    while let Ok((frame_data, width, height)) = receiver.recv() {
        match rgba_to_rgb(frame_data, width, height) {
            Some(rgb) => {
                frame_batch.extend_from_slice(&rgb);
                batch_count += 1;
            }
            None => log::error!("Dropped malformed {}x{} frame", width, height),
        }

        if batch_count >= BATCH_SIZE {
            write_batch(&mut sink, &mut frame_batch, &mut batch_count, &frames_written);
        }
    }

    // Write any remaining frames, then close the pipe to signal end of input
    write_batch(&mut sink, &mut frame_batch, &mut batch_count, &frames_written);
    drop(sink.take());

    if let Some(mut process) = process {
        match process.wait() {
            Ok(status) if status.success() => log::info!("FFmpeg process completed successfully"),
            Ok(status) => log::error!("FFmpeg exited with non-zero status: {}", status),
            Err(e) => log::error!("Failed to wait for FFmpeg process: {}", e),
        }
    }
    log::debug!("FFmpeg worker thread finished");
}

fn write_batch<W: Write>(
    stdin: &mut Option<W>,
    frame_batch: &mut Vec<u8>,
    batch_count: &mut usize,
    frames_written: &AtomicUsize,
) {
    if *batch_count == 0 {
        return;
    }
    let result = stdin.as_mut().map(|pipe| pipe.write_all(frame_batch));
    match result {
        Some(Ok(())) => {
            frames_written.fetch_add(*batch_count, Ordering::SeqCst);
        }
        Some(Err(e)) => {
            log::error!("Failed to write frames to FFmpeg: {}", e);
            // ffmpeg is gone, stop feeding it
            *stdin = None;
        }
        None => {}
    }
    frame_batch.clear();
    *batch_count = 0;
}

/// Share of captured frames already written, 1.0 when nothing was captured.
pub fn encode_progress(processed: usize, total: usize) -> f32 {
    if total == 0 {
        return 1.0;
    }
    (processed as f32 / total as f32).min(1.0)
}

fn rgba_to_rgb(frame_data: Vec<u8>, width: u32, height: u32) -> Option<Vec<u8>> {
    let image_buffer = RgbaImage::from_raw(width, height, frame_data)?;
    Some(
        nannou::image::DynamicImage::ImageRgba8(image_buffer)
            .to_rgb8()
            .into_raw(),
    )
}

/// wgpu requires buffer rows aligned to 256 bytes.
pub fn padded_bytes_per_row(width: u32) -> u32 {
    wgpu::util::align_to(width * PIXEL_SIZE, 256)
}

/// Drops the alignment padding at the end of each row.
pub fn unpad_rows(padded: &[u8], row_bytes: u32, padded_row_bytes: u32, height: u32) -> Vec<u8> {
    let row_bytes = row_bytes as usize;
    let padded_row_bytes = padded_row_bytes as usize;
    let mut unpadded = Vec::with_capacity(row_bytes * height as usize);
    for row in padded.chunks(padded_row_bytes).take(height as usize) {
        unpadded.extend_from_slice(&row[..row_bytes.min(row.len())]);
    }
    unpadded
}

pub fn ffmpeg_args(output_path: &Path, width: u32, height: u32, fps: u32) -> Vec<String> {
    let fps = fps.to_string();
    vec![
        "-f".into(),
        "rawvideo".into(), // Input format is raw video data
        "-pixel_format".into(),
        "rgb24".into(), // matches the RGB8 conversion
        "-video_size".into(),
        format!("{}x{}", width, height),
        "-framerate".into(),
        fps.clone(),
        "-i".into(),
        "-".into(), // Read from stdin
        "-r".into(),
        fps, // force output frame rate
        "-c:v".into(),
        "libx264".into(),
        "-preset".into(),
        "medium".into(),
        "-crf".into(),
        "18".into(),
        "-pix_fmt".into(),
        "yuv420p".into(),
        "-y".into(), // Overwrite output file if it exists
        output_path.to_string_lossy().into_owned(),
    ]
}

fn start_ffmpeg_process(
    output_path: &Path,
    width: u32,
    height: u32,
    fps: u32,
) -> Result<(Child, ChildStdin)> {
    log::info!("Starting FFmpeg process to encode to {}", output_path.display());

    let stderr = if log::log_enabled!(log::Level::Debug) {
        Stdio::inherit()
    } else {
        Stdio::null()
    };

    let mut process = Command::new("ffmpeg")
        .args(ffmpeg_args(output_path, width, height, fps))
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(stderr)
        .spawn()
        .map_err(|e| Error::Encoder(format!("failed to start ffmpeg: {}", e)))?;

    let stdin = process
        .stdin
        .take()
        .ok_or_else(|| Error::Encoder("failed to open stdin for ffmpeg".to_string()))?;

    Ok((process, stdin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Clone, Default)]
    struct SharedSink(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedSink {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn queue_frames(worker: &WorkerThread, count: u8) {
        let sender = worker.frame_sender.as_ref().unwrap();
        for i in 0..count {
            sender.send((vec![i, i, i, 255], 1, 1)).unwrap();
        }
    }

    #[test]
    fn test_finish_flushes_partial_batch() {
        let sink = SharedSink::default();
        let mut worker = WorkerThread::spawn(sink.clone(), None);
        queue_frames(&worker, 13);

        worker.finish();

        assert!(worker.thread_completed.load(Ordering::SeqCst));
        assert_eq!(worker.frames_written.load(Ordering::SeqCst), 13);
        let bytes = sink.0.lock().unwrap();
        assert_eq!(bytes.len(), 13 * 3);
        assert_eq!(&bytes[36..], &[12, 12, 12]);
    }

    #[test]
    fn test_dropping_worker_drains_queue() {
        let sink = SharedSink::default();
        let worker = WorkerThread::spawn(sink.clone(), None);
        queue_frames(&worker, 7);

        drop(worker);

        assert_eq!(sink.0.lock().unwrap().len(), 7 * 3);
    }

    #[test]
    fn test_encode_progress() {
        assert_eq!(encode_progress(0, 0), 1.0);
        assert_eq!(encode_progress(25, 100), 0.25);
        assert_eq!(encode_progress(100, 100), 1.0);
        assert_eq!(encode_progress(12, 10), 1.0);
    }

    #[test]
    fn test_padded_bytes_per_row() {
        assert_eq!(padded_bytes_per_row(64), 256);
        assert_eq!(padded_bytes_per_row(65), 512);
        assert_eq!(padded_bytes_per_row(1000), 4096);
    }

    #[test]
    fn test_unpad_rows() {
        // 2x2 image, rows padded from 8 to 12 bytes
        let padded: Vec<u8> = vec![
            1, 2, 3, 4, 5, 6, 7, 8, 0, 0, 0, 0, //
            9, 10, 11, 12, 13, 14, 15, 16, 0, 0, 0, 0,
        ];
        let unpadded = unpad_rows(&padded, 8, 12, 2);
        assert_eq!(unpadded, (1..=16).collect::<Vec<u8>>());
    }

    #[test]
    fn test_rgba_to_rgb() {
        let rgba = vec![10, 20, 30, 255, 40, 50, 60, 128];
        assert_eq!(rgba_to_rgb(rgba, 2, 1), Some(vec![10, 20, 30, 40, 50, 60]));
        assert_eq!(rgba_to_rgb(vec![0; 3], 2, 1), None);
    }

    #[test]
    fn test_ffmpeg_args() {
        let args = ffmpeg_args(Path::new("out/drone.mp4"), 1000, 800, 5);
        let position = |flag: &str| args.iter().position(|a| a == flag).unwrap();
        assert_eq!(args[position("-video_size") + 1], "1000x800");
        assert_eq!(args[position("-framerate") + 1], "5");
        assert_eq!(args[position("-r") + 1], "5");
        assert_eq!(args[position("-pix_fmt") + 1], "yuv420p");
        assert!(args.contains(&"-y".to_string()));
        assert_eq!(args.last().unwrap(), "out/drone.mp4");
    }

    #[test]
    fn test_write_batch_without_pipe_discards() {
        let written = AtomicUsize::new(0);
        let mut batch = vec![1, 2, 3];
        let mut count = 1;
        write_batch::<Vec<u8>>(&mut None, &mut batch, &mut count, &written);
        assert!(batch.is_empty());
        assert_eq!(count, 0);
        assert_eq!(written.load(Ordering::SeqCst), 0);
    }
}
