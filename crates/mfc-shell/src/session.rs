//! Scripted keyboard session
//!
//! Walks through what a keyboard and screen-reader user does on the
//! appointments page and prints what they would hear.

use anyhow::{ensure, Result};
use mfc_a11y::{
    AccessibilityRuntime, HostEnvironment, MemorySpeech, MemoryStore, Navigator, Politeness, RuntimeConfig,
    ShortcutBinding, Voice,
};
use mfc_dom::KeyboardEvent;

use crate::page::{clinic_page, formatted_values};

const PAGE_URL: &str = "https://clinic.example/appointments";
const TICK_MS: u64 = 100;

pub fn run(config: RuntimeConfig) -> Result<()> {
    let (doc, page) = clinic_page(PAGE_URL)?;

    let speech = MemorySpeech::new(vec![
        Voice::new("Samantha", "en-US"),
        Voice::new("Xiaoxiao", "zh-SG"),
        Voice::new("Amira", "ms-MY"),
        Voice::new("Valluvar", "ta-IN"),
    ]);
    let spoken = speech.log();
    let host = HostEnvironment::new(Navigator::new("Win32", "Mozilla/5.0 (Windows NT 10.0; Win64; x64)"))
        .with_global("nvda")
        .with_speech(speech)
        .with_storage(MemoryStore::new());

    let mut runtime = AccessibilityRuntime::new(doc, host, config);
    tracing::info!(
        screen_reader = %runtime.capabilities().screen_reader,
        language = %runtime.current_language(),
        "runtime ready"
    );

    let book = page.book_button;
    let signature = runtime.register_shortcut(
        ShortcutBinding::new("b", "Book appointment", move |doc, _| {
            doc.focus(book);
        })
        .ctrl()
        .category("booking"),
    );
    for binding in runtime.shortcuts().iter() {
        println!("shortcut  {:<12} {}", binding.signature().chord(), binding.description);
    }

    let mut event = KeyboardEvent::new("b", page.book_button).ctrl();
    let outcome = runtime.handle_keydown(&mut event);
    tracing::info!(?outcome, "pressed {}", signature.chord());

    // Open the booking dialog
    runtime.save_focus("booking");
    ensure!(runtime.trap_focus(page.dialog), "booking dialog has nothing to focus");

    runtime.document_mut().focus(page.cancel);
    let mut tab = KeyboardEvent::new("Tab", page.cancel);
    let outcome = runtime.handle_keydown(&mut tab);
    tracing::info!(?outcome, "tab from last dialog control");
    ensure!(
        runtime.document().active_element() == Some(page.patient_name),
        "focus did not wrap to the first dialog control"
    );

    let mut escape = KeyboardEvent::new("Escape", page.patient_name);
    let outcome = runtime.handle_keydown(&mut escape);
    tracing::info!(?outcome, "escape from the patient name field");
    ensure!(runtime.focus_trap_depth() == 0, "escape did not close the booking dialog");
    runtime.restore_focus("booking");
    settle(&mut runtime);

    runtime.announce("Your appointment is confirmed", "booking", Politeness::Polite);
    settle(&mut runtime);

    for code in ["zh", "xx", "ta"] {
        if runtime.set_language(code) {
            println!(
                "language  {}  {}",
                runtime.current_language(),
                runtime.get_localized_text("appointment_booking", None)
            );
            for (kind, text) in formatted_values(runtime.document()) {
                println!("          {kind:<9} {text}");
            }
        } else {
            println!("language  {code}  rejected, still {}", runtime.current_language());
        }
        settle(&mut runtime);
    }

    println!();
    for entry in runtime.announcer().history() {
        println!(
            "{:>6}ms  [{}] {:<10} {}",
            entry.emitted_at, entry.priority, entry.category, entry.text
        );
    }
    for utterance in spoken.borrow().iter() {
        println!(
            "spoken    {} via {}: {}",
            utterance.lang,
            utterance.voice.as_deref().unwrap_or("default voice"),
            utterance.text
        );
    }
    Ok(())
}

/// Let the announcement queue drain
fn settle(runtime: &mut AccessibilityRuntime) {
    while runtime.announcer().is_processing() {
        runtime.advance_time(TICK_MS);
    }
}
