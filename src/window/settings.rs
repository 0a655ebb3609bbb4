//! Window settings
//!
//! Configuration for window creation.

/// Settings for creating a window.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSettings {
    /// Window title.
    pub title: String,
    /// Initial window size (width, height) in logical pixels.
    pub size: (u32, u32),
    /// Whether the window is resizable.
    pub resizable: bool,
    /// Present in step with the display refresh.
    pub vsync: bool,
    /// Upper bound on physical pixels per logical pixel for the render
    /// resolution. HiDPI displays above it render at a reduced size.
    pub max_pixel_ratio: f64,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "outline-scene".to_string(),
            size: (1280, 720),
            resizable: true,
            vsync: true,
            max_pixel_ratio: 2.0,
        }
    }
}

impl WindowSettings {
    /// Create new window settings with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the window title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the initial window size.
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    /// Set whether the window is resizable.
    pub fn resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    /// Set whether to enable vsync.
    pub fn vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    /// Cap the render resolution at `ratio` physical pixels per logical pixel.
    pub fn max_pixel_ratio(mut self, ratio: f64) -> Self {
        self.max_pixel_ratio = ratio;
        self
    }

    /// Render pixels per physical window pixel for a display with
    /// `scale_factor`. Never above 1.
    pub(crate) fn render_scale(&self, scale_factor: f64) -> f64 {
        if scale_factor <= 0.0 || self.max_pixel_ratio <= 0.0 {
            return 1.0;
        }
        scale_factor.min(self.max_pixel_ratio) / scale_factor
    }

    /// Render size for a physical window size. Zero stays zero.
    pub(crate) fn render_size(&self, physical: (u32, u32), scale_factor: f64) -> (u32, u32) {
        let scale = self.render_scale(scale_factor);
        let apply = |v: u32| (v as f64 * scale).round() as u32;
        (apply(physical.0), apply(physical.1))
    }

    pub(crate) fn present_mode(&self) -> wgpu::PresentMode {
        if self.vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let settings = WindowSettings::new().title("demo").size(640, 480).vsync(false);
        assert_eq!(settings.title, "demo");
        assert_eq!(settings.size, (640, 480));
        assert_eq!(settings.present_mode(), wgpu::PresentMode::AutoNoVsync);
        assert_eq!(WindowSettings::default().present_mode(), wgpu::PresentMode::AutoVsync);
    }

    #[test]
    fn test_pixel_ratio_cap() {
        let settings = WindowSettings::default();
        assert_eq!(settings.max_pixel_ratio, 2.0);
        assert_eq!(settings.render_scale(1.0), 1.0);
        assert_eq!(settings.render_scale(2.0), 1.0);
        assert!((settings.render_scale(3.0) - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(settings.render_size((3000, 1500), 3.0), (2000, 1000));
        assert_eq!(settings.render_size((1280, 720), 1.5), (1280, 720));
        assert_eq!(settings.render_size((0, 0), 3.0), (0, 0));

        let uncapped = WindowSettings::default().max_pixel_ratio(4.0);
        assert_eq!(uncapped.render_size((3000, 1500), 3.0), (3000, 1500));
    }
}
