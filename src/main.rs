// src/main.rs
use nannou::prelude::*;
use std::path::PathBuf;

use rubblescan::{
    animation::{Animator, FrameSequencer},
    config::Config,
    models::{FrameSequence, Scene, SignalTables},
    services::{encode_progress, FrameRecorder, Timeline},
    views::{Figure, FigureStyle},
};

struct Model {
    // Core components:
    animator: Animator,
    figure: Figure,
    sequencer: FrameSequencer,

    // Rendering components:
    texture: wgpu::Texture,
    draw: nannou::Draw,
    draw_renderer: nannou::draw::Renderer,
    texture_reshaper: wgpu::TextureReshaper,

    // Output:
    frame_recorder: FrameRecorder,
    timeline: Option<Timeline>,
    timeline_path: PathBuf,
    exit_requested: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    nannou::app(model).update(update).exit(exit).run();
}

fn model(app: &App) -> Model {
    // Escape goes through the same graceful quit as Q
    app.set_exit_on_escape(false);

    let config = Config::load().unwrap_or_else(|e| {
        log::error!("Failed to load config file: {}", e);
        std::process::exit(1);
    });

    // Precompute everything the animation reads
    let signals = SignalTables::new(&config.scene, &config.signals);
    let frames = FrameSequence::new(
        config.scene.x_min,
        config.scene.x_max,
        config.scene.frame_count,
    );
    let animator = Animator::new(&config.scene, signals);
    let scene = Scene::new(&config.scene, &config.signals);

    // Create window
    let window_id = app
        .new_window()
        .title("Drone Detection System")
        .size(config.window.width, config.window.height)
        .view(view)
        .key_pressed(key_pressed)
        .build()
        .unwrap_or_else(|e| {
            log::error!("Failed to create window: {:?}", e);
            std::process::exit(1);
        });
    let Some(window) = app.window(window_id) else {
        log::error!("Window closed before startup completed");
        std::process::exit(1);
    };

    // Set up render texture
    let device = window.device();
    let draw = nannou::Draw::new();
    let texture = wgpu::TextureBuilder::new()
        .size([
            config.rendering.texture_width,
            config.rendering.texture_height,
        ])
        // RENDER_ATTACHMENT for the `Draw` render pass, sampled by both reshapers.
        .usage(wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING)
        .sample_count(config.rendering.texture_samples)
        .format(wgpu::TextureFormat::Rgba16Float)
        .build(device);

    let draw_renderer = nannou::draw::RendererBuilder::new()
        .build_from_texture_descriptor(device, texture.descriptor());

    // Texture reshaper for presenting to the window
    let texture_view = texture.view().build();
    let texture_reshaper = wgpu::TextureReshaper::new(
        device,
        &texture_view,
        texture.sample_count(),
        texture.sample_type(),
        window.msaa_samples(),
        Frame::TEXTURE_FORMAT,
    );

    let figure_bounds = Rect::from_w_h(
        config.rendering.texture_width as f32,
        config.rendering.texture_height as f32,
    );
    let figure = Figure::new(scene, FigureStyle::new(&config.style), figure_bounds);

    // Create the frame recorder; a missing encoder ends the run here
    let mut frame_recorder = FrameRecorder::new(
        device,
        &texture,
        &config.resolve_video_path(),
        frames.len() as u32,
        config.output.fps,
    )
    .and_then(|mut recorder| recorder.start().map(|_| recorder))
    .unwrap_or_else(|e| {
        log::error!("Cannot record video: {}", e);
        std::process::exit(1);
    });
    log::info!("Rendering {} frames at {} fps", frames.len(), config.output.fps);
    if frames.is_empty() {
        frame_recorder.stop();
    }

    let timeline = config
        .output
        .write_timeline
        .then(|| Timeline::new(config.output.fps, config.scene.threshold));

    Model {
        animator,
        figure,
        sequencer: FrameSequencer::new(frames, config.output.fps),

        texture,
        draw,
        draw_renderer,
        texture_reshaper,

        frame_recorder,
        timeline,
        timeline_path: config.resolve_timeline_path(),
        exit_requested: false,
    }
}

fn key_pressed(_app: &App, model: &mut Model, key: Key) {
    // Graceful quit that waits for the encoder to finish
    if matches!(key, Key::Q | Key::Escape) && !model.exit_requested {
        let (processed, total) = model.frame_recorder.get_queue_status();
        log::info!("Processed {} frames out of {}", processed, total);
        finish_recording(model);
        model.exit_requested = true;
    }
}

fn update(app: &App, model: &mut Model, update: Update) {
    if model.exit_requested {
        handle_exit_state(app, model);
        return;
    }

    if model.sequencer.recording_complete() {
        finish_recording(model);
    }

    let Some(step) = model
        .sequencer
        .next_frame(update.since_last.as_secs_f32())
    else {
        return;
    };

    /*********************  Main per-frame update **********************/
    model.draw.reset();
    let state = model.animator.update(step.frame);
    model.figure.draw(&model.draw, state);
    if step.capture {
        if let Some(timeline) = model.timeline.as_mut() {
            timeline.record(state);
        }
    }
    /*******************************************************************/

    render_and_capture(app, model, step.capture);
}

// Runs however the app ends: Q, Escape or closing the window
fn exit(_app: &App, mut model: Model) {
    finish_recording(&mut model);
    model.frame_recorder.finish();
    log::info!(
        "Video complete with {} frames",
        model.frame_recorder.frames_captured()
    );
}

// Draw the state of Model into the given Frame
fn view(_app: &App, model: &Model, frame: Frame) {
    //resize texture to screen
    let mut encoder = frame.command_encoder();

    model
        .texture_reshaper
        .encode_render_pass(frame.texture_view(), &mut encoder);
}

fn finish_recording(model: &mut Model) {
    if !model.sequencer.finish_recording() {
        return;
    }
    model.frame_recorder.stop();

    if let Some(timeline) = model.timeline.take() {
        if let Err(e) = timeline.write(&model.timeline_path) {
            log::error!("Failed to write timeline: {}", e);
        }
    }

    log::info!(
        "Recorded {} of {} frames, looping playback (press Q to quit)",
        model.frame_recorder.frames_captured(),
        model.sequencer.len()
    );
}

// ******************************* Rendering and Capture *****************************

fn render_and_capture(app: &App, model: &mut Model, capture: bool) {
    let window = app.main_window();
    let device = window.device();
    let ce_desc = wgpu::CommandEncoderDescriptor {
        label: Some("Figure renderer"),
    };
    let mut encoder = device.create_command_encoder(&ce_desc);
    let texture_view = model.texture.view().build();

    model.draw_renderer.encode_render_pass(
        device,
        &mut encoder,
        &model.draw,
        1.0,
        model.texture.size(),
        &texture_view,
        None,
    );

    let captured = capture && model.frame_recorder.encode_capture(&mut encoder);

    window.queue().submit(Some(encoder.finish()));

    if captured {
        if let Err(e) = model.frame_recorder.finish_capture(device) {
            log::error!("Frame capture failed: {}", e);
            model.frame_recorder.stop();
        }
    }
}

// ******************************* Exit State Handling *******************************

fn handle_exit_state(app: &App, model: &mut Model) {
    if model.frame_recorder.has_pending_frames() {
        draw_progress_screen(app, model);
        std::thread::sleep(std::time::Duration::from_millis(200));
    } else {
        model.frame_recorder.cleanup_completed_worker();
        app.quit(); // quit only once all frames are encoded
    }
}

fn draw_progress_screen(app: &App, model: &mut Model) {
    model.draw.reset();
    let draw = &model.draw;
    draw.background().color(WHITE);

    let (processed, total) = model.frame_recorder.get_queue_status();
    let progress = encode_progress(processed, total);

    draw.text(&format!("Encoding video: {} of {} frames", processed, total))
        .xy(pt2(0.0, 40.0))
        .wh(vec2(600.0, 40.0))
        .font_size(24)
        .color(BLACK);

    // Outlined track with the encoded share filled from the left
    let track = Rect::from_x_y_w_h(0.0, -20.0, 500.0, 24.0);
    let filled = Rect::from_w_h(track.w() * progress, track.h()).align_left_of(track);
    draw.rect()
        .xy(filled.xy())
        .wh(filled.wh())
        .color(rgb(0.0, 0.5, 0.0));
    draw.rect()
        .xy(track.xy())
        .wh(track.wh())
        .no_fill()
        .stroke(BLACK)
        .stroke_weight(1.0);

    render_and_capture(app, model, false);
}
