//! System automation capabilities: volume, brightness, lock, screenshot,
//! minimize, type-text, shutdown.
//!
//! One [`SystemControl`] struct covers all eight actions, parameterized by
//! [`SystemAction`]; each instance registers under its own capability name.
//! Actions shell out to platform tools and absorb every failure into a
//! reply sentence.  Whether a graphical session exists is probed exactly
//! once per process; without one, every session-bound action answers the
//! same fixed sentence instead of failing per call.

use std::sync::OnceLock;

use async_trait::async_trait;
use tokio::process::Command;

use vox_core::capability::{Capability, CapabilityArgs, Outcome, names};

/// Fixed reply for every session-bound action when no graphical session is
/// available.
pub const CANNOT_CONTROL_REPLY: &str =
    "I can't control this system right now: no graphical session is available.";

/// Reply for shutdown requests.  Powering off is never done automatically.
#[cfg(target_os = "windows")]
const SHUTDOWN_REPLY: &str = "I can request a shutdown, but for safety, please confirm manually. \
     (Command: shutdown /s /t 5)";
#[cfg(not(target_os = "windows"))]
const SHUTDOWN_REPLY: &str = "I can request a shutdown, but for safety, please confirm manually. \
     (Command: shutdown -h now)";

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// The system operations Vox can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemAction {
    SetVolume,
    MuteVolume,
    SetBrightness,
    LockSession,
    Screenshot,
    MinimizeWindows,
    TypeText,
    Shutdown,
}

impl SystemAction {
    /// Every concrete action, for registry wiring.
    pub const ALL: [SystemAction; 8] = [
        Self::SetVolume,
        Self::MuteVolume,
        Self::SetBrightness,
        Self::LockSession,
        Self::Screenshot,
        Self::MinimizeWindows,
        Self::TypeText,
        Self::Shutdown,
    ];

    fn capability_name(self) -> &'static str {
        match self {
            Self::SetVolume => names::VOLUME_SET,
            Self::MuteVolume => names::VOLUME_MUTE,
            Self::SetBrightness => names::BRIGHTNESS_SET,
            Self::LockSession => names::LOCK,
            Self::Screenshot => names::SCREENSHOT,
            Self::MinimizeWindows => names::MINIMIZE,
            Self::TypeText => names::TYPE_TEXT,
            Self::Shutdown => names::SHUTDOWN,
        }
    }

    fn description(self) -> &'static str {
        match self {
            Self::SetVolume => "Sets the output volume to an approximate percentage.",
            Self::MuteVolume => "Toggles the output volume mute state.",
            Self::SetBrightness => "Sets the display brightness (0-100).",
            Self::LockSession => "Locks the machine.",
            Self::Screenshot => "Takes a screenshot and saves it to the working directory.",
            Self::MinimizeWindows => "Minimizes all open windows.",
            Self::TypeText => "Types the given text into the focused window.",
            Self::Shutdown => "Explains how to shut the machine down; never powers off by itself.",
        }
    }

    /// Shutdown only talks; everything else needs a session to act on.
    fn needs_session(self) -> bool {
        !matches!(self, Self::Shutdown)
    }
}

// ---------------------------------------------------------------------------
// Capability
// ---------------------------------------------------------------------------

/// One system action exposed as a capability.
#[derive(Debug)]
pub struct SystemControl {
    action: SystemAction,
}

impl SystemControl {
    #[must_use]
    pub fn new(action: SystemAction) -> Self {
        Self { action }
    }
}

#[async_trait]
impl Capability for SystemControl {
    fn name(&self) -> &str {
        self.action.capability_name()
    }

    fn description(&self) -> &str {
        self.action.description()
    }

    async fn invoke(&self, args: CapabilityArgs) -> Outcome {
        if self.action.needs_session() && !session_available() {
            return Outcome::Failed(CANNOT_CONTROL_REPLY.to_owned());
        }

        match self.action {
            SystemAction::SetVolume => match args.level {
                Some(level) => set_volume(level).await,
                None => Outcome::Failed("Please give me a volume level.".to_owned()),
            },
            SystemAction::MuteVolume => mute_volume().await,
            SystemAction::SetBrightness => match args.level {
                Some(level) => set_brightness(level).await,
                None => Outcome::Failed("Please give me a brightness level.".to_owned()),
            },
            SystemAction::LockSession => lock_session().await,
            SystemAction::Screenshot => take_screenshot().await,
            SystemAction::MinimizeWindows => minimize_windows().await,
            SystemAction::TypeText => match args.text.as_deref() {
                Some(text) if !text.is_empty() => type_text(text).await,
                _ => Outcome::Failed("There was nothing to type.".to_owned()),
            },
            SystemAction::Shutdown => Outcome::Done(SHUTDOWN_REPLY.to_owned()),
        }
    }
}

// ---------------------------------------------------------------------------
// Session probe
// ---------------------------------------------------------------------------

/// Probed once; the result holds for the life of the process.
fn session_available() -> bool {
    static AVAILABLE: OnceLock<bool> = OnceLock::new();
    *AVAILABLE.get_or_init(|| {
        let available = detect_session();
        if !available {
            tracing::warn!("no graphical session detected, system actions disabled");
        }
        available
    })
}

#[cfg(target_os = "linux")]
fn detect_session() -> bool {
    let has = |var: &str| std::env::var_os(var).is_some_and(|v| !v.is_empty());
    has("DISPLAY") || has("WAYLAND_DISPLAY")
}

#[cfg(not(target_os = "linux"))]
fn detect_session() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

async fn set_volume(level: u32) -> Outcome {
    let (program, args) = volume_command(level);
    match run(program, &args).await {
        Ok(()) => Outcome::Done(format!("Volume adjusted to approx {level}%.")),
        Err(e) => Outcome::Failed(format!("Error setting volume: {e}")),
    }
}

async fn mute_volume() -> Outcome {
    let (program, args) = mute_command();
    match run(program, &args).await {
        Ok(()) => Outcome::Done("Volume muted/unmuted.".to_owned()),
        Err(e) => Outcome::Failed(format!("Error muting volume: {e}")),
    }
}

async fn set_brightness(level: u32) -> Outcome {
    let level = clamp_brightness(level);
    let (program, args) = brightness_command(level);
    match run(program, &args).await {
        Ok(()) => Outcome::Done(format!("Brightness set to {level}%.")),
        Err(e) => Outcome::Failed(format!("Error setting brightness: {e}")),
    }
}

async fn lock_session() -> Outcome {
    let (program, args) = lock_command();
    match run(program, &args).await {
        Ok(()) => Outcome::Done("Locking PC.".to_owned()),
        Err(e) => Outcome::Failed(format!("Error locking PC: {e}")),
    }
}

async fn take_screenshot() -> Outcome {
    let filename = screenshot_filename(chrono::Local::now());
    let (program, args) = screenshot_command(&filename);
    match run(program, &args).await {
        Ok(()) => Outcome::Done(format!("Screenshot saved as {filename}.")),
        Err(e) => Outcome::Failed(format!("Error taking screenshot: {e}")),
    }
}

async fn minimize_windows() -> Outcome {
    let (program, args) = minimize_command();
    match run(program, &args).await {
        Ok(()) => Outcome::Done("Minimized all windows.".to_owned()),
        Err(e) => Outcome::Failed(format!("Error minimizing windows: {e}")),
    }
}

async fn type_text(text: &str) -> Outcome {
    let (program, args) = type_command(text);
    match run(program, &args).await {
        Ok(()) => Outcome::Done(format!("Typed: {text}")),
        Err(e) => Outcome::Failed(format!("Error typing text: {e}")),
    }
}

/// Run a platform tool to completion.  No retry, no timeout: a hung tool is
/// the platform's problem, per the fire-and-forget contract.
async fn run(program: &str, args: &[String]) -> Result<(), String> {
    tracing::debug!(program, ?args, "running system command");
    match Command::new(program).args(args).status().await {
        Ok(status) if status.success() => Ok(()),
        Ok(status) => Err(format!("{program} exited with {status}")),
        Err(e) => Err(format!("failed to run {program}: {e}")),
    }
}

fn clamp_brightness(level: u32) -> u32 {
    level.min(100)
}

fn screenshot_filename(now: chrono::DateTime<chrono::Local>) -> String {
    format!("screenshot_{}.png", now.format("%Y%m%d_%H%M%S"))
}

// ---------------------------------------------------------------------------
// Platform command tables
// ---------------------------------------------------------------------------

#[cfg(target_os = "linux")]
mod platform {
    pub fn volume_command(level: u32) -> (&'static str, Vec<String>) {
        (
            "pactl",
            vec![
                "set-sink-volume".into(),
                "@DEFAULT_SINK@".into(),
                format!("{level}%"),
            ],
        )
    }

    pub fn mute_command() -> (&'static str, Vec<String>) {
        (
            "pactl",
            vec![
                "set-sink-mute".into(),
                "@DEFAULT_SINK@".into(),
                "toggle".into(),
            ],
        )
    }

    pub fn brightness_command(level: u32) -> (&'static str, Vec<String>) {
        ("brightnessctl", vec!["set".into(), format!("{level}%")])
    }

    pub fn lock_command() -> (&'static str, Vec<String>) {
        ("loginctl", vec!["lock-session".into()])
    }

    pub fn screenshot_command(filename: &str) -> (&'static str, Vec<String>) {
        ("scrot", vec![filename.to_owned()])
    }

    pub fn minimize_command() -> (&'static str, Vec<String>) {
        ("xdotool", vec!["key".into(), "super+d".into()])
    }

    pub fn type_command(text: &str) -> (&'static str, Vec<String>) {
        (
            "xdotool",
            vec!["type".into(), "--delay".into(), "50".into(), text.to_owned()],
        )
    }
}

#[cfg(target_os = "macos")]
mod platform {
    pub fn volume_command(level: u32) -> (&'static str, Vec<String>) {
        (
            "osascript",
            vec!["-e".into(), format!("set volume output volume {level}")],
        )
    }

    pub fn mute_command() -> (&'static str, Vec<String>) {
        (
            "osascript",
            vec![
                "-e".into(),
                "set volume output muted not (output muted of (get volume settings))".into(),
            ],
        )
    }

    pub fn brightness_command(level: u32) -> (&'static str, Vec<String>) {
        ("brightness", vec![format!("{:.2}", f64::from(level) / 100.0)])
    }

    pub fn lock_command() -> (&'static str, Vec<String>) {
        ("pmset", vec!["displaysleepnow".into()])
    }

    pub fn screenshot_command(filename: &str) -> (&'static str, Vec<String>) {
        ("screencapture", vec![filename.to_owned()])
    }

    pub fn minimize_command() -> (&'static str, Vec<String>) {
        (
            "osascript",
            vec![
                "-e".into(),
                r#"tell application "System Events" to keystroke "m" using {command down, option down}"#
                    .into(),
            ],
        )
    }

    pub fn type_command(text: &str) -> (&'static str, Vec<String>) {
        let escaped = text.replace('\\', "\\\\").replace('"', "\\\"");
        (
            "osascript",
            vec![
                "-e".into(),
                format!(r#"tell application "System Events" to keystroke "{escaped}""#),
            ],
        )
    }
}

#[cfg(target_os = "windows")]
mod platform {
    pub fn volume_command(level: u32) -> (&'static str, Vec<String>) {
        // nircmd's scale is 0..65535.
        let raw = level.saturating_mul(65535) / 100;
        ("nircmd.exe", vec!["setsysvolume".into(), raw.to_string()])
    }

    pub fn mute_command() -> (&'static str, Vec<String>) {
        ("nircmd.exe", vec!["mutesysvolume".into(), "2".into()])
    }

    pub fn brightness_command(level: u32) -> (&'static str, Vec<String>) {
        (
            "powershell",
            vec![
                "-NoProfile".into(),
                "-Command".into(),
                format!(
                    "(Get-WmiObject -Namespace root/WMI -Class WmiMonitorBrightnessMethods).WmiSetBrightness(1,{level})"
                ),
            ],
        )
    }

    pub fn lock_command() -> (&'static str, Vec<String>) {
        ("rundll32.exe", vec!["user32.dll,LockWorkStation".into()])
    }

    pub fn screenshot_command(filename: &str) -> (&'static str, Vec<String>) {
        (
            "nircmd.exe",
            vec!["savescreenshot".into(), filename.to_owned()],
        )
    }

    pub fn minimize_command() -> (&'static str, Vec<String>) {
        (
            "powershell",
            vec![
                "-NoProfile".into(),
                "-Command".into(),
                "(New-Object -ComObject Shell.Application).MinimizeAll()".into(),
            ],
        )
    }

    pub fn type_command(text: &str) -> (&'static str, Vec<String>) {
        let escaped = text.replace('\'', "''");
        (
            "powershell",
            vec![
                "-NoProfile".into(),
                "-Command".into(),
                format!(
                    "Add-Type -AssemblyName System.Windows.Forms; \
                     [System.Windows.Forms.SendKeys]::SendWait('{escaped}')"
                ),
            ],
        )
    }
}

use platform::{
    brightness_command, lock_command, minimize_command, mute_command, screenshot_command,
    type_command, volume_command,
};

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
