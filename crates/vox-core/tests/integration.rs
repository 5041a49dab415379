//! End-to-end routing tests: rule set + registry + router together, with a
//! recording capability standing in for the real automation skills.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use vox_core::capability::names;
use vox_core::{
    Capability, CapabilityArgs, CapabilityRegistry, IntentRouter, Outcome, RouteOutcome,
};

/// Records every invocation so tests can assert on the extracted arguments.
struct Recorder {
    name: &'static str,
    calls: Arc<Mutex<Vec<CapabilityArgs>>>,
}

#[async_trait]
impl Capability for Recorder {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        "records invocations"
    }

    async fn invoke(&self, args: CapabilityArgs) -> Outcome {
        self.calls.lock().unwrap().push(args);
        Outcome::Done(format!("{} done.", self.name))
    }
}

struct Harness {
    router: IntentRouter,
    calls: Arc<Mutex<Vec<(&'static str, CapabilityArgs)>>>,
}

/// Wire a recorder for every built-in capability name, all feeding one
/// shared call log tagged with the capability name.
fn harness() -> Harness {
    struct Tagged {
        name: &'static str,
        log: Arc<Mutex<Vec<(&'static str, CapabilityArgs)>>>,
    }

    #[async_trait]
    impl Capability for Tagged {
        fn name(&self) -> &str {
            self.name
        }
        fn description(&self) -> &str {
            "records invocations"
        }
        async fn invoke(&self, args: CapabilityArgs) -> Outcome {
            self.log.lock().unwrap().push((self.name, args));
            Outcome::Done(format!("{} done.", self.name))
        }
    }

    let log = Arc::new(Mutex::new(Vec::new()));
    let registry = CapabilityRegistry::new();
    for name in [
        names::APP_OPEN,
        names::APP_CLOSE,
        names::WEB_SEARCH,
        names::VOLUME_SET,
        names::VOLUME_MUTE,
        names::BRIGHTNESS_SET,
        names::LOCK,
        names::SCREENSHOT,
        names::MINIMIZE,
        names::TYPE_TEXT,
        names::SHUTDOWN,
    ] {
        registry.register(Arc::new(Tagged {
            name,
            log: Arc::clone(&log),
        }));
    }

    Harness {
        router: IntentRouter::new(registry),
        calls: log,
    }
}

impl Harness {
    fn calls(&self) -> Vec<(&'static str, CapabilityArgs)> {
        self.calls.lock().unwrap().clone()
    }
}

#[tokio::test]
async fn open_notepad_invokes_app_open_with_exact_argument() {
    let h = harness();
    let outcome = h.router.route("open notepad").await;

    assert_eq!(outcome, RouteOutcome::Handled("app_open done.".into()));
    assert_eq!(
        h.calls(),
        [(names::APP_OPEN, CapabilityArgs::text("notepad"))]
    );
}

#[tokio::test]
async fn open_the_x_strips_the_article() {
    let h = harness();
    h.router.route("open the calculator").await;
    assert_eq!(
        h.calls(),
        [(names::APP_OPEN, CapabilityArgs::text("calculator"))]
    );
}

#[tokio::test]
async fn mixed_case_argument_arrives_lowercased() {
    let h = harness();
    h.router.route("Open Notepad").await;
    assert_eq!(
        h.calls(),
        [(names::APP_OPEN, CapabilityArgs::text("notepad"))]
    );
}

#[tokio::test]
async fn close_invokes_app_close() {
    let h = harness();
    h.router.route("close firefox").await;
    assert_eq!(
        h.calls(),
        [(names::APP_CLOSE, CapabilityArgs::text("firefox"))]
    );
}

#[tokio::test]
async fn search_fires_once_with_both_phrases_removed() {
    let h = harness();
    h.router.route("google search for borrow checker").await;
    assert_eq!(
        h.calls(),
        [(names::WEB_SEARCH, CapabilityArgs::text("borrow checker"))]
    );
}

#[tokio::test]
async fn set_volume_extracts_level() {
    let h = harness();
    h.router.route("set volume to 73").await;
    assert_eq!(h.calls(), [(names::VOLUME_SET, CapabilityArgs::level(73))]);
}

#[tokio::test]
async fn increase_volume_uses_fixed_approximation() {
    let h = harness();
    h.router.route("increase volume").await;
    assert_eq!(h.calls(), [(names::VOLUME_SET, CapabilityArgs::level(50))]);
}

#[tokio::test]
async fn volume_down_invokes_nothing() {
    let h = harness();
    let outcome = h.router.route("volume down please").await;
    assert!(matches!(outcome, RouteOutcome::Handled(_)));
    assert!(h.calls().is_empty());
}

#[tokio::test]
async fn brightness_level_passes_through_unclamped() {
    // The router passes 150 through; clamping is the capability's concern.
    let h = harness();
    h.router.route("set brightness to 150").await;
    assert_eq!(
        h.calls(),
        [(names::BRIGHTNESS_SET, CapabilityArgs::level(150))]
    );
}

#[tokio::test]
async fn ambiguous_utterance_honors_priority_order() {
    // Triggers both open-app and volume; only the earlier rule fires.
    let h = harness();
    h.router.route("open volume settings").await;
    assert_eq!(
        h.calls(),
        [(names::APP_OPEN, CapabilityArgs::text("volume"))]
    );
}

#[tokio::test]
async fn extraction_failure_falls_through_to_later_rule() {
    // The open trigger holds but has no argument; the screenshot rule
    // further down still gets its chance.
    let h = harness();
    h.router.route("screenshot what i open").await;
    assert_eq!(h.calls(), [(names::SCREENSHOT, CapabilityArgs::none())]);
}

#[tokio::test]
async fn unmatched_utterance_invokes_nothing() {
    let h = harness();
    let outcome = h.router.route("what is the capital of France").await;
    assert_eq!(outcome, RouteOutcome::Unhandled);
    assert!(h.calls().is_empty());
}

#[tokio::test]
async fn failed_capability_reply_is_still_handled() {
    struct AlwaysFails;

    #[async_trait]
    impl Capability for AlwaysFails {
        fn name(&self) -> &str {
            names::APP_OPEN
        }
        fn description(&self) -> &str {
            "always fails"
        }
        async fn invoke(&self, args: CapabilityArgs) -> Outcome {
            let app = args.text.unwrap_or_default();
            Outcome::Failed(format!("Sorry, I couldn't open {app}."))
        }
    }

    let registry = CapabilityRegistry::new();
    registry.register(Arc::new(AlwaysFails));
    let router = IntentRouter::new(registry);

    let outcome = router.route("open nonexistent").await;
    assert_eq!(
        outcome,
        RouteOutcome::Handled("Sorry, I couldn't open nonexistent.".into())
    );
}

#[tokio::test]
async fn recorder_standalone_smoke() {
    // Direct registry invocation, without the router in front.
    let calls = Arc::new(Mutex::new(Vec::new()));
    let registry = CapabilityRegistry::new();
    registry.register(Arc::new(Recorder {
        name: names::TYPE_TEXT,
        calls: Arc::clone(&calls),
    }));

    let reply = registry
        .invoke(names::TYPE_TEXT, CapabilityArgs::text("hello"))
        .await;
    assert_eq!(reply, "type_text done.");
    assert_eq!(calls.lock().unwrap().len(), 1);
}
