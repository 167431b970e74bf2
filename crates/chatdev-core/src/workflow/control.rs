//! Control-token detection for the natural-language sentinel protocol.
//!
//! The workflow manager steers the model with literal text commands
//! (`START PHASE <name>`, `SWITCH`, ...) and watches replies for literal
//! tokens. Substring matching against free-form model text is inherently
//! fuzzy; keeping every probe in this module lets a structured signalling
//! mechanism replace it later without touching the state machine.

pub const SUCCESS: &str = "SUCCESS";
pub const SWITCH: &str = "SWITCH";
pub const END_CONVERSATION: &str = "END CONVERSATION";

/// A reply acknowledges the sanity check or a phase start when its text
/// ends with `SUCCESS`; any trailing content after the token fails it.
pub fn acknowledged(text: &str) -> bool {
    text.ends_with(SUCCESS)
}

/// A reply closes the running conversation when `END CONVERSATION`
/// appears anywhere in it.
pub fn requests_conversation_end(text: &str) -> bool {
    text.contains(END_CONVERSATION)
}

pub fn start_phase_command(name: &str) -> String {
    format!("START PHASE {name}")
}

pub fn start_conversation_command(name: &str) -> String {
    format!("START CONVERSATION {name}")
}
