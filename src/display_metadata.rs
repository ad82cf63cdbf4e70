use crate::config::ViewerConfig;
use crate::sensor::ChannelStats;
use crate::types::StreamKind;
use crate::view::StreamView;

pub fn print_stream_info(config: &ViewerConfig) {
    println!("{:20}: {}", "Stream", config.kind);
    println!("{:20}: {}", "Frame", config.description);

    if config.kind == StreamKind::Depth {
        let mode = if config.far_field { " (far field)" } else { "" };
        println!("{:20}: {} mm{}", "Reliable Depth", config.depth_range, mode);
    }

    if let Some(limit) = config.frame_limit {
        println!("{:20}: {}", "Frame Limit", limit);
    }

    println!("{:20}: {} ({:?})", "Queue", config.capacity.get(), config.policy);

    if let Some(screenshot) = &config.screenshot {
        println!("{:20}: {}", "Screenshot Dir", screenshot.dir.display());
    }

    println!();
}

pub fn print_summary(view: &StreamView, stats: &ChannelStats, null_frames: u64) {
    println!("{:20}: {}", "Frames Rendered", view.rendered());
    println!("{:20}: {}", "Frames Skipped", view.skipped());
    print_count("Null Frames", null_frames);
    print_count("Frames Dropped", stats.dropped_oldest);
}

fn print_count(name: &str, value: u64) {
    if value > 0 {
        println!("{name:20}: {value}");
    }
}
