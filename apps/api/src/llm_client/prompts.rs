// Prompt fragments shared by every classifier prompt.

/// Appended to every system prompt.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to every extraction prompt.
pub const NO_INVENTION_INSTRUCTION: &str = "\
    CRITICAL: Only report information that literally appears in the text. \
    Do NOT infer, interpolate, or invent skills, employers, dates, or degrees. \
    If a field is not present, return an empty string or an empty list for it.";
