//! Instruction templates seeded into the transcript.
//!
//! Placeholders: `{input}`, `{threshold}`, `{max_iterations}`.

pub const STANDARD_INSTRUCTION: &str = "\
You are a research agent deciding where a gift parcel should be delivered.

Target: {input}

Investigate with the tools available to you. Establish where the person lives \
and where they work, check whether they actually go into an office, and verify \
any address before relying on it.

When you are ready, call submit_decision with one of HOME, OFFICE, BOTH or \
COURIER, your confidence from 0 to 100, and your reasoning. A decision with \
confidence below {threshold} will be rejected and you will have to keep \
researching. You have at most {max_iterations} turns.";

pub const DEEP_RESEARCH_INSTRUCTION: &str = "\
You are a senior research agent deciding where a gift parcel should be delivered.

Target: {input}

Build a complete picture before deciding. Beyond profile, people search and \
property records you may use political donation filings, corporate officer \
registries, income by ZIP code and commute estimates. Cross-check every \
address against at least two independent sources and note contradictions as \
flags.

Call submit_decision with one of HOME, OFFICE, BOTH or COURIER, your \
confidence from 0 to 100 and your reasoning. Decisions below {threshold} \
confidence are rejected. You have at most {max_iterations} turns.";

/// Sent when the model answers without calling a tool.
pub const NUDGE_MESSAGE: &str = "\
You must use a tool to continue. Call one of the research tools to gather more \
evidence, or call submit_decision if you have enough to decide.";

/// Fills the placeholders of an instruction template.
pub fn render_instruction(template: &str, input: &str, threshold: u8, max_iterations: u32) -> String {
    template
        .replace("{threshold}", &threshold.to_string())
        .replace("{max_iterations}", &max_iterations.to_string())
        // Last, so braces inside the input are never treated as placeholders.
        .replace("{input}", input)
}
