//! Interfaces to everything the host environment provides: window lookup,
//! pointer injection, screen capture, match state, configuration, the
//! notification surface and hot-key registration.
//!
//! All traits are synchronous and object-safe; the squelch executor is the
//! async seam and drives blocking primitives through `spawn_blocking`.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{ensure, Result};
use image::ImageFormat;

/// A point in window-client pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A window's client rectangle in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientRect {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl ClientRect {
    pub fn with_size(width: i32, height: i32) -> Self {
        Self {
            left: 0,
            top: 0,
            width,
            height,
        }
    }
}

/// Width/height of a capture region in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionSize {
    pub width: u32,
    pub height: u32,
}

/// Opaque handle to the game window, minted by the host's window locator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowHandle(pub u64);

/// Game modes reported by the host's match state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    None,
    Ranked,
    Casual,
    Arena,
    Brawl,
    Friendly,
    Practice,
    Spectator,
    Duels,
    Battlegrounds,
}

impl GameMode {
    /// Whether the opponent can be squelched in this mode. Practice and
    /// battlegrounds-style modes have no opponent emote menu.
    pub fn supports_squelch(self) -> bool {
        !matches!(self, GameMode::None | GameMode::Practice | GameMode::Battlegrounds)
    }
}

/// A modifier + key combination for the host's hot-key service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hotkey {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub key: char,
}

impl Hotkey {
    pub const fn ctrl_alt(key: char) -> Self {
        Self {
            ctrl: true,
            alt: true,
            shift: false,
            key,
        }
    }
}

/// An immutable pixel buffer captured from the screen. Rows are tightly
/// packed; pixels are RGB (3 bytes) or RGBA (4 bytes, alpha ignored).
#[derive(Debug, Clone)]
pub struct CapturedFrame {
    width: u32,
    height: u32,
    bytes_per_pixel: u8,
    data: Vec<u8>,
}

impl CapturedFrame {
    pub fn new(width: u32, height: u32, bytes_per_pixel: u8, data: Vec<u8>) -> Result<Self> {
        ensure!(width > 0 && height > 0, "captured frame must be non-empty");
        ensure!(
            bytes_per_pixel == 3 || bytes_per_pixel == 4,
            "unsupported pixel layout: {} bytes per pixel",
            bytes_per_pixel
        );
        let expected = width as usize * height as usize * bytes_per_pixel as usize;
        ensure!(
            data.len() == expected,
            "pixel buffer length {} does not match {}x{}x{}",
            data.len(),
            width,
            height,
            bytes_per_pixel
        );
        Ok(Self {
            width,
            height,
            bytes_per_pixel,
            data,
        })
    }

    /// Decode a PNG-encoded capture, for hosts whose capture primitive
    /// returns encoded bytes rather than a raw buffer.
    pub fn from_png(png_bytes: &[u8]) -> Result<Self> {
        let img = image::load_from_memory_with_format(png_bytes, ImageFormat::Png)?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self::new(width, height, 4, rgba.into_raw())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bytes_per_pixel(&self) -> u8 {
        self.bytes_per_pixel
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// Locates the game window and reports focus.
pub trait WindowLocator: Send + Sync {
    fn is_target_foreground(&self) -> bool;
    fn target_window(&self) -> Option<WindowHandle>;
    fn client_rect(&self, window: WindowHandle, include_borders: bool) -> Result<ClientRect>;
}

/// Injects pointer movement and clicks into the game window.
pub trait PointerInput: Send + Sync {
    /// Move the pointer to `point` and click. A non-committing click
    /// (`commit = false`) only surfaces hover UI; a committing click
    /// activates the control under the pointer.
    fn move_and_click(&self, window: WindowHandle, point: Point, commit: bool) -> Result<()>;
    fn pointer_position(&self) -> Point;
    fn set_pointer_position(&self, point: Point);
}

/// Captures a pixel region anchored at a point in the game window.
pub trait ScreenCapture: Send + Sync {
    fn capture_region(
        &self,
        window: WindowHandle,
        anchor: Point,
        size: RegionSize,
    ) -> Result<CapturedFrame>;
}

/// Reports whether a match is running and in which mode.
pub trait MatchState: Send + Sync {
    fn game_in_progress(&self) -> bool;
    fn current_mode(&self) -> GameMode;
}

/// Externally owned configuration, re-read on every wait so the host can
/// reconfigure the delay while an attempt is in flight.
pub trait SquelchConfig: Send + Sync {
    fn hover_delay(&self) -> Duration;
}

/// Short-lived on-screen text notice; dismissal is host-owned.
pub trait Notifier: Send + Sync {
    fn show(&self, text: &str);
}

/// Host hot-key registration.
pub trait HotkeyService: Send + Sync {
    fn register(
        &self,
        hotkey: Hotkey,
        name: &str,
        action: Box<dyn Fn() + Send + Sync>,
    ) -> Result<()>;
    fn unregister(&self, hotkey: &Hotkey);
}

/// Bundle of host services handed to the plugin at construction.
#[derive(Clone)]
pub struct HostServices {
    pub window: Arc<dyn WindowLocator>,
    pub pointer: Arc<dyn PointerInput>,
    pub capture: Arc<dyn ScreenCapture>,
    pub match_state: Arc<dyn MatchState>,
    pub config: Arc<dyn SquelchConfig>,
    pub notifier: Arc<dyn Notifier>,
    pub hotkeys: Arc<dyn HotkeyService>,
}
