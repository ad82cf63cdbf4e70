use clap::{CommandFactory, Parser};
use kview::cli::Args;
use kview::config::ViewerConfig;
use kview::display;
use kview::image::RenderOptions;
use kview::screenshot;
use kview::sensor::{RecordingSource, SensorEvent, SensorSession};
use kview::status::{Status, StatusBar};
use kview::{ProcessError, StreamView};
use tracing::{debug, warn};

fn main() {
    let args = Args::parse();

    if args.files.is_empty() {
        let _ = Args::command().print_help();
        println!();
        return;
    }

    let config = match ViewerConfig::try_from(&args) {
        Ok(config) => config,
        Err(e) => {
            println!("Error: {e}");
            std::process::exit(2);
        }
    };
    kview::logger::init(config.log_level());

    let multiple_files = args.files.len() > 1;
    let mut any_failed = false;

    for (idx, file_path) in args.files.iter().enumerate() {
        if multiple_files {
            println!("{}", file_path.display());
        }

        if let Err(e) = process_file(file_path, &config) {
            println!("Error: {e}");
            any_failed = true;
        }

        if multiple_files && idx < args.files.len() - 1 {
            println!();
        }
    }

    if any_failed {
        std::process::exit(1);
    }
}

/// What playing a recording left behind
struct Playback {
    view: StreamView,
    status: StatusBar,
    null_frames: u64,
    stats: kview::sensor::ChannelStats,
}

/// Play a single recording, then show and optionally save the last picture
fn process_file(file_path: &std::path::Path, config: &ViewerConfig) -> Result<(), ProcessError> {
    // Stages 1-3: open, stream, render
    let mut playback = play_recording(file_path, config)?;

    // Stage 4: Verbose output
    if config.verbose {
        kview::print_stream_info(config);
        kview::print_summary(&playback.view, &playback.stats, playback.null_frames);
    }

    // Stage 5: Convert the last picture
    let image = playback
        .view
        .image()
        .map_err(|e| ProcessError::ConversionFailed(format!("{e:#}")))?;

    // Stage 6: Display
    display::print_image(&image, config)
        .map_err(|e| ProcessError::DisplayFailed(format!("{e:#}")))?;

    // Stage 7: Screenshot; a failure only changes the status
    if let Some(shot) = &config.screenshot {
        playback.status.set(screenshot::save_screenshot(
            &image,
            &shot.dir,
            &shot.prefix,
            config.kind,
        ));
    }

    if let Some(status) = playback.status.current()
        && (config.verbose || *status != Status::Running)
    {
        println!("{status}");
    }

    Ok(())
}

fn play_recording(file_path: &std::path::Path, config: &ViewerConfig) -> Result<Playback, ProcessError> {
    // Stage 1: Open the recording
    let source = RecordingSource::open(file_path, config.kind, config.description, config.depth_range)
        .map_err(|e| ProcessError::OpenFailed(e.to_string()))?;

    let mut session = SensorSession::open(source);
    let mut status = StatusBar::default();
    status.set(Status::on_open(session.is_available()));

    // Stage 2: Start the frame reader
    let reader = session
        .open_reader(config.kind, config.capacity, config.policy)
        .map_err(|e| ProcessError::StreamFailed(e.to_string()))?;

    let options = RenderOptions {
        far_field: config.far_field,
        ..RenderOptions::default()
    };
    let mut view = StreamView::new(config.kind, config.description, options);
    let mut delivered = 0u64;
    let mut null_frames = 0u64;

    // Stage 3: Render every delivered frame in order
    for event in reader.events() {
        match event {
            SensorEvent::Frame(frame) => {
                view.process(Some(&frame))
                    .map_err(|e| ProcessError::ConversionFailed(e.to_string()))?;
            }
            SensorEvent::NullFrame => {
                null_frames += 1;
                view.process(None)
                    .map_err(|e| ProcessError::ConversionFailed(e.to_string()))?;
            }
            SensorEvent::Availability(available) => {
                status.set(Status::from_availability(available));
                continue;
            }
            SensorEvent::Failed(msg) => {
                warn!(file = %file_path.display(), error = %msg, "stream failed");
                return Err(ProcessError::StreamFailed(msg));
            }
        }

        delivered += 1;
        if config.frame_limit.is_some_and(|limit| delivered >= limit.get()) {
            debug!(delivered, "frame limit reached");
            break;
        }
    }

    let stats = reader.stats();
    reader.close();
    session.close();

    if view.rendered() == 0 {
        return Err(ProcessError::NoFrameRendered {
            skipped: view.skipped(),
        });
    }

    Ok(Playback {
        view,
        status,
        null_frames,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use kview::body::{Body, BodyFrame, CameraSpacePoint, JointType, TrackingState};
    use kview::image::OutputBuffer;
    use std::io::Write;
    use std::path::Path;
    use tempfile::NamedTempFile;

    fn config(argv: &[&str]) -> ViewerConfig {
        let args = Args::try_parse_from(std::iter::once("kview").chain(argv.iter().copied())).unwrap();
        ViewerConfig::try_from(&args).unwrap()
    }

    fn depth_recording(frames: &[[u16; 4]]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for frame in frames {
            for sample in frame {
                file.write_all(&sample.to_le_bytes()).unwrap();
            }
        }
        file.flush().unwrap();
        file
    }

    const TINY: [&str; 4] = ["--frame-width", "2", "--frame-height", "2"];

    #[test]
    fn test_missing_file_returns_openfailed_error() {
        let result = process_file(Path::new("/no/such/recording.raw"), &config(&TINY));
        assert_matches!(result, Err(ProcessError::OpenFailed(_)));
    }

    #[test]
    fn test_empty_recording_returns_noframerendered_error() {
        let file = depth_recording(&[]);
        let result = process_file(file.path(), &config(&TINY));
        assert_matches!(result, Err(ProcessError::NoFrameRendered { skipped: 0 }));
    }

    #[test]
    fn test_last_complete_frame_wins() {
        let mut file = depth_recording(&[[4000, 0, 0, 0], [500, 500, 500, 500]]);
        // Truncated trailing frame is skipped
        file.write_all(&[0x10, 0x00]).unwrap();
        file.flush().unwrap();

        let playback = play_recording(file.path(), &config(&TINY)).unwrap();
        assert_eq!(playback.view.rendered(), 2);
        assert_eq!(playback.view.skipped(), 1);
        assert_eq!(playback.view.buffer(), &OutputBuffer::Depth(vec![16; 4]));
        assert_eq!(playback.status.current(), Some(&Status::Running));
    }

    #[test]
    fn test_stray_trailing_byte_is_skipped() {
        let mut file = depth_recording(&[[4000; 4]]);
        file.write_all(&[0x10]).unwrap();
        file.flush().unwrap();

        let playback = play_recording(file.path(), &config(&TINY)).unwrap();
        assert_eq!(playback.view.rendered(), 1);
        assert_eq!(playback.view.skipped(), 1);
        assert_eq!(playback.view.buffer(), &OutputBuffer::Depth(vec![129; 4]));
    }

    #[test]
    fn test_frame_limit_stops_early() {
        let file = depth_recording(&[[4000; 4], [500; 4], [1000; 4]]);
        let mut argv = TINY.to_vec();
        argv.extend(["--frames", "1"]);

        let playback = play_recording(file.path(), &config(&argv)).unwrap();
        assert_eq!(playback.view.rendered(), 1);
        assert_eq!(playback.view.buffer(), &OutputBuffer::Depth(vec![129; 4]));
    }

    #[test]
    fn test_body_recording_with_null_frames() {
        let mut body = Body {
            is_tracked: true,
            ..Body::default()
        };
        let head = body.joint_mut(JointType::Head);
        head.position = CameraSpacePoint { x: 0.0, y: 0.0, z: 2.0 };
        head.tracking_state = TrackingState::Tracked;
        let line = serde_json::to_string(&BodyFrame {
            relative_time_ms: 0,
            bodies: vec![body],
        })
        .unwrap();

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{line}\n").unwrap();
        file.flush().unwrap();

        let playback = play_recording(file.path(), &config(&["--stream", "body"])).unwrap();
        assert_eq!(playback.view.rendered(), 1);
        assert_eq!(playback.null_frames, 1);
    }

    #[test]
    fn test_corrupt_body_recording_returns_streamfailed_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{{not json").unwrap();
        file.flush().unwrap();

        let result = play_recording(file.path(), &config(&["--stream", "body"]));
        assert_matches!(result.err(), Some(ProcessError::StreamFailed(msg)) if msg.contains("line 1"));
    }
}
