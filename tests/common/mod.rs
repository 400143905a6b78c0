#![allow(dead_code)]

//! Fake host services for driving the squelch loop deterministically.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Result};
use autosquelch::services::{
    CapturedFrame, ClientRect, GameMode, HostServices, Hotkey, HotkeyService, MatchState,
    Notifier, Point, PointerInput, RegionSize, ScreenCapture, SquelchConfig, WindowHandle,
    WindowLocator,
};

/// The pointer position the fakes start from, so restore is observable.
pub const PARKED_POINTER: Point = Point { x: 777, y: 333 };

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerAction {
    Hover(Point),
    Commit(Point),
    Restore(Point),
}

pub struct FakePointer {
    actions: Mutex<Vec<PointerAction>>,
    position: Mutex<Point>,
}

impl FakePointer {
    pub fn new() -> Self {
        Self {
            actions: Mutex::new(Vec::new()),
            position: Mutex::new(PARKED_POINTER),
        }
    }

    pub fn actions(&self) -> Vec<PointerAction> {
        self.actions.lock().unwrap().clone()
    }

    pub fn commit_count(&self) -> usize {
        self.actions()
            .iter()
            .filter(|action| matches!(action, PointerAction::Commit(_)))
            .count()
    }

    pub fn hover_count(&self) -> usize {
        self.actions()
            .iter()
            .filter(|action| matches!(action, PointerAction::Hover(_)))
            .count()
    }
}

impl PointerInput for FakePointer {
    fn move_and_click(&self, _window: WindowHandle, point: Point, commit: bool) -> Result<()> {
        *self.position.lock().unwrap() = point;
        let action = if commit {
            PointerAction::Commit(point)
        } else {
            PointerAction::Hover(point)
        };
        self.actions.lock().unwrap().push(action);
        Ok(())
    }

    fn pointer_position(&self) -> Point {
        *self.position.lock().unwrap()
    }

    fn set_pointer_position(&self, point: Point) {
        *self.position.lock().unwrap() = point;
        self.actions.lock().unwrap().push(PointerAction::Restore(point));
    }
}

pub struct FakeWindow {
    pub foreground: AtomicBool,
    pub handle: Mutex<Option<WindowHandle>>,
    pub rect: Mutex<ClientRect>,
}

impl FakeWindow {
    pub fn new() -> Self {
        Self {
            foreground: AtomicBool::new(true),
            handle: Mutex::new(Some(WindowHandle(1))),
            rect: Mutex::new(ClientRect::with_size(1920, 1080)),
        }
    }
}

impl WindowLocator for FakeWindow {
    fn is_target_foreground(&self) -> bool {
        self.foreground.load(Ordering::SeqCst)
    }

    fn target_window(&self) -> Option<WindowHandle> {
        *self.handle.lock().unwrap()
    }

    fn client_rect(&self, _window: WindowHandle, _include_borders: bool) -> Result<ClientRect> {
        Ok(*self.rect.lock().unwrap())
    }
}

/// Serves uniform gray frames from a queue of gray values; the last value
/// repeats once the queue runs dry. Can fail on demand, and can trip a flag
/// after the n-th sample to exercise mid-loop cancellation.
pub struct FakeCapture {
    grays: Mutex<VecDeque<u8>>,
    pub samples: AtomicU32,
    pub fail: AtomicBool,
    trip: Mutex<Option<(u32, Arc<AtomicBool>)>>,
}

impl FakeCapture {
    pub fn with_grays(grays: &[u8]) -> Self {
        Self {
            grays: Mutex::new(grays.iter().copied().collect()),
            samples: AtomicU32::new(0),
            fail: AtomicBool::new(false),
            trip: Mutex::new(None),
        }
    }

    pub fn trip_flag_after(&self, samples: u32, flag: Arc<AtomicBool>) {
        *self.trip.lock().unwrap() = Some((samples, flag));
    }

    pub fn sample_count(&self) -> u32 {
        self.samples.load(Ordering::SeqCst)
    }
}

impl ScreenCapture for FakeCapture {
    fn capture_region(
        &self,
        _window: WindowHandle,
        _anchor: Point,
        size: RegionSize,
    ) -> Result<CapturedFrame> {
        let sample = self.samples.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some((after, flag)) = &*self.trip.lock().unwrap() {
            if sample >= *after {
                flag.store(true, Ordering::SeqCst);
            }
        }

        if self.fail.load(Ordering::SeqCst) {
            return Err(anyhow!("capture service unavailable"));
        }

        let gray = {
            let mut grays = self.grays.lock().unwrap();
            if grays.len() > 1 {
                grays.pop_front().unwrap()
            } else {
                grays.front().copied().unwrap_or(0)
            }
        };
        let data = vec![gray; (size.width * size.height * 3) as usize];
        CapturedFrame::new(size.width, size.height, 3, data)
    }
}

pub struct FakeMatchState {
    pub in_progress: AtomicBool,
    pub mode: Mutex<GameMode>,
}

impl FakeMatchState {
    pub fn new() -> Self {
        Self {
            in_progress: AtomicBool::new(true),
            mode: Mutex::new(GameMode::Ranked),
        }
    }
}

impl MatchState for FakeMatchState {
    fn game_in_progress(&self) -> bool {
        self.in_progress.load(Ordering::SeqCst)
    }

    fn current_mode(&self) -> GameMode {
        *self.mode.lock().unwrap()
    }
}

pub struct FixedDelay(pub Duration);

impl SquelchConfig for FixedDelay {
    fn hover_delay(&self) -> Duration {
        self.0
    }
}

#[derive(Default)]
pub struct FakeNotifier {
    pub messages: Mutex<Vec<String>>,
}

impl Notifier for FakeNotifier {
    fn show(&self, text: &str) {
        self.messages.lock().unwrap().push(text.to_string());
    }
}

type HotkeyAction = Box<dyn Fn() + Send + Sync>;

#[derive(Default)]
pub struct FakeHotkeys {
    bindings: Mutex<Vec<(Hotkey, String, HotkeyAction)>>,
}

impl FakeHotkeys {
    pub fn press(&self, hotkey: Hotkey) {
        let bindings = self.bindings.lock().unwrap();
        for (bound, _, action) in bindings.iter() {
            if *bound == hotkey {
                action();
            }
        }
    }

    pub fn binding_count(&self) -> usize {
        self.bindings.lock().unwrap().len()
    }
}

impl HotkeyService for FakeHotkeys {
    fn register(&self, hotkey: Hotkey, name: &str, action: HotkeyAction) -> Result<()> {
        self.bindings
            .lock()
            .unwrap()
            .push((hotkey, name.to_string(), action));
        Ok(())
    }

    fn unregister(&self, hotkey: &Hotkey) {
        self.bindings
            .lock()
            .unwrap()
            .retain(|(bound, _, _)| bound != hotkey);
    }
}

/// One bundle of fakes, each half shared with the test for inspection.
pub struct TestHost {
    pub window: Arc<FakeWindow>,
    pub pointer: Arc<FakePointer>,
    pub capture: Arc<FakeCapture>,
    pub match_state: Arc<FakeMatchState>,
    pub notifier: Arc<FakeNotifier>,
    pub hotkeys: Arc<FakeHotkeys>,
}

impl TestHost {
    pub fn new(capture: FakeCapture) -> Self {
        Self {
            window: Arc::new(FakeWindow::new()),
            pointer: Arc::new(FakePointer::new()),
            capture: Arc::new(capture),
            match_state: Arc::new(FakeMatchState::new()),
            notifier: Arc::new(FakeNotifier::default()),
            hotkeys: Arc::new(FakeHotkeys::default()),
        }
    }

    pub fn services(&self) -> HostServices {
        HostServices {
            window: self.window.clone(),
            pointer: self.pointer.clone(),
            capture: self.capture.clone(),
            match_state: self.match_state.clone(),
            config: Arc::new(FixedDelay(Duration::from_millis(1))),
            notifier: self.notifier.clone(),
            hotkeys: self.hotkeys.clone(),
        }
    }
}
