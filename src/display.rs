use anyhow::{anyhow, Result};
use image::DynamicImage;
use viuer::{print, Config as ViuerConfig};
use crate::config::ViewerConfig;
use std::io::{IsTerminal, Write};

/// Terminal size to request from the renderer
///
/// Width wins when both are given; nothing given means 24 columns.
#[must_use]
pub fn terminal_size(columns: Option<u32>, rows: Option<u32>) -> (Option<u32>, Option<u32>) {
    match (columns, rows) {
        (Some(w), ..) => (Some(w), None),
        (None, Some(h)) => (None, Some(h)),
        (None, None) => (Some(24), None),
    }
}

pub fn print_image(image: &DynamicImage, config: &ViewerConfig) -> Result<()> {
    let is_tty = std::io::stdout().is_terminal();
    let (width, height) = terminal_size(config.columns, config.rows);

    let viuer_config = ViuerConfig {
        width,
        height,
        absolute_offset: false,
        use_kitty: is_tty,
        use_iterm: is_tty,
        use_sixel: is_tty,
        ..Default::default()
    };

    std::io::stdout().flush()
        .map_err(|e| anyhow!("Failed to flush stdout: {e}"))?;

    print(image, &viuer_config)
        .map_err(|e| anyhow!("Failed to display image: {e}"))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_size_defaults_to_24_columns() {
        assert_eq!(terminal_size(None, None), (Some(24), None));
        assert_eq!(terminal_size(Some(80), Some(20)), (Some(80), None));
        assert_eq!(terminal_size(None, Some(20)), (None, Some(20)));
    }
}
