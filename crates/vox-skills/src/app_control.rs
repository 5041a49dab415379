//! Application open/close capabilities.
//!
//! A small catalog maps friendly names ("notepad", "chrome") to concrete
//! executable identifiers per platform; anything not in the catalog is
//! attempted as a literal target.  Launch is a detached spawn — the router
//! never waits on the application.  Termination runs the platform's kill
//! command and checks its exit status, since "nothing to close" is a normal
//! answer, not a failure.

use std::collections::HashMap;
use std::sync::OnceLock;

use async_trait::async_trait;
use tokio::process::Command;

use vox_core::capability::{Capability, CapabilityArgs, Outcome, names};

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[cfg(target_os = "windows")]
const CATALOG_ENTRIES: &[(&str, &str)] = &[
    ("notepad", "notepad.exe"),
    ("calculator", "calc.exe"),
    ("paint", "mspaint.exe"),
    ("chrome", "chrome.exe"),
    ("firefox", "firefox.exe"),
    ("edge", "msedge.exe"),
    ("word", "winword.exe"),
    ("excel", "excel.exe"),
    ("powerpoint", "powerpnt.exe"),
    ("outlook", "outlook.exe"),
    ("spotify", "spotify.exe"),
    ("vlc", "vlc.exe"),
];

#[cfg(target_os = "macos")]
const CATALOG_ENTRIES: &[(&str, &str)] = &[
    ("notepad", "TextEdit"),
    ("calculator", "Calculator"),
    ("paint", "Preview"),
    ("chrome", "Google Chrome"),
    ("firefox", "Firefox"),
    ("edge", "Microsoft Edge"),
    ("word", "Microsoft Word"),
    ("excel", "Microsoft Excel"),
    ("powerpoint", "Microsoft PowerPoint"),
    ("outlook", "Microsoft Outlook"),
    ("spotify", "Spotify"),
    ("vlc", "VLC"),
];

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const CATALOG_ENTRIES: &[(&str, &str)] = &[
    ("notepad", "gedit"),
    ("calculator", "gnome-calculator"),
    ("paint", "gimp"),
    ("chrome", "google-chrome"),
    ("firefox", "firefox"),
    ("edge", "microsoft-edge"),
    ("word", "libreoffice"),
    ("excel", "libreoffice"),
    ("powerpoint", "libreoffice"),
    ("outlook", "thunderbird"),
    ("spotify", "spotify"),
    ("vlc", "vlc"),
];

fn catalog() -> &'static HashMap<&'static str, &'static str> {
    static CATALOG: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    CATALOG.get_or_init(|| CATALOG_ENTRIES.iter().copied().collect())
}

/// Resolve a friendly name to an executable identifier, falling back to the
/// name itself as a literal target.
fn resolve(app: &str) -> &str {
    catalog().get(app).copied().unwrap_or(app)
}

/// The friendly names the catalog knows, sorted.
pub fn known_apps() -> Vec<&'static str> {
    let mut apps: Vec<&'static str> = catalog().keys().copied().collect();
    apps.sort_unstable();
    apps
}

// ---------------------------------------------------------------------------
// Open
// ---------------------------------------------------------------------------

/// Launches an application by friendly or literal name.
#[derive(Debug, Default)]
pub struct AppOpen;

impl AppOpen {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Capability for AppOpen {
    fn name(&self) -> &str {
        names::APP_OPEN
    }

    fn description(&self) -> &str {
        "Opens an application by name. Knows a set of friendly names and \
         tries anything else as a literal program."
    }

    async fn invoke(&self, args: CapabilityArgs) -> Outcome {
        let app = match args.text.as_deref().map(str::trim) {
            Some(app) if !app.is_empty() => app.to_owned(),
            _ => return Outcome::Done("Please specify which application to open.".to_owned()),
        };

        let target = resolve(&app);
        tracing::debug!(app = %app, target = %target, "launching application");

        match launch(target) {
            Ok(()) => Outcome::Done(format!("Opening {app}.")),
            Err(e) => {
                tracing::warn!(app = %app, target = %target, error = %e, "launch failed");
                Outcome::Failed(format!("Sorry, I couldn't open {app}."))
            }
        }
    }
}

/// Detached spawn; the child outlives the request.
#[cfg(target_os = "macos")]
fn launch(target: &str) -> std::io::Result<()> {
    Command::new("open").args(["-a", target]).spawn().map(|_| ())
}

#[cfg(not(target_os = "macos"))]
fn launch(target: &str) -> std::io::Result<()> {
    Command::new(target).spawn().map(|_| ())
}

// ---------------------------------------------------------------------------
// Close
// ---------------------------------------------------------------------------

/// Terminates an application by friendly or literal name.
#[derive(Debug, Default)]
pub struct AppClose;

impl AppClose {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Capability for AppClose {
    fn name(&self) -> &str {
        names::APP_CLOSE
    }

    fn description(&self) -> &str {
        "Closes a running application by name."
    }

    async fn invoke(&self, args: CapabilityArgs) -> Outcome {
        let app = match args.text.as_deref().map(str::trim) {
            Some(app) if !app.is_empty() => app.to_owned(),
            _ => return Outcome::Done("Please specify which application to close.".to_owned()),
        };

        let target = resolve(&app);
        tracing::debug!(app = %app, target = %target, "terminating application");

        let (program, kill_args) = terminate_command(target);
        match Command::new(program).args(&kill_args).output().await {
            Ok(output) if output.status.success() => Outcome::Done(format!("Closed {app}.")),
            Ok(_) => Outcome::Done(format!("Couldn't find {app} to close.")),
            Err(e) => {
                tracing::warn!(app = %app, error = %e, "terminate failed");
                Outcome::Failed(format!("Sorry, I couldn't close {app}."))
            }
        }
    }
}

#[cfg(target_os = "windows")]
fn terminate_command(target: &str) -> (&'static str, Vec<String>) {
    let image = if target.ends_with(".exe") {
        target.to_owned()
    } else {
        format!("{target}.exe")
    };
    ("taskkill", vec!["/f".into(), "/im".into(), image])
}

#[cfg(not(target_os = "windows"))]
fn terminate_command(target: &str) -> (&'static str, Vec<String>) {
    ("pkill", vec!["-x".into(), target.to_owned()])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_resolves_friendly_names() {
        // The concrete identifier is platform-specific; what matters is
        // that a known name resolves to something else.
        assert_ne!(resolve("chrome"), "chrome");
        assert!(catalog().contains_key("notepad"));
    }

    #[test]
    fn unknown_name_is_literal_target() {
        assert_eq!(resolve("qwertyuiop"), "qwertyuiop");
    }

    #[test]
    fn known_apps_is_sorted_and_complete() {
        let apps = known_apps();
        assert_eq!(apps.len(), CATALOG_ENTRIES.len());
        let mut sorted = apps.clone();
        sorted.sort_unstable();
        assert_eq!(apps, sorted);
    }

    #[tokio::test]
    async fn open_without_argument_asks_again() {
        let outcome = AppOpen::new().invoke(CapabilityArgs::none()).await;
        assert_eq!(
            outcome,
            Outcome::Done("Please specify which application to open.".to_owned())
        );
    }

    #[tokio::test]
    async fn close_without_argument_asks_again() {
        let outcome = AppClose::new().invoke(CapabilityArgs::text("   ")).await;
        assert_eq!(
            outcome,
            Outcome::Done("Please specify which application to close.".to_owned())
        );
    }

    #[cfg(not(target_os = "windows"))]
    #[test]
    fn terminate_uses_exact_process_match() {
        let (program, args) = terminate_command("firefox");
        assert_eq!(program, "pkill");
        assert_eq!(args, ["-x", "firefox"]);
    }

    #[cfg(target_os = "windows")]
    #[test]
    fn terminate_appends_exe_suffix() {
        let (program, args) = terminate_command("firefox");
        assert_eq!(program, "taskkill");
        assert_eq!(args, ["/f", "/im", "firefox.exe"]);
    }
}
