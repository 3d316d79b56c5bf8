// Prompt fragments shared by more than one feature.
// Feature-specific prompts live in a prompts.rs next to the feature.

/// Placeholder used in prompts for inputs the user left blank.
pub const NOT_SPECIFIED: &str = "Not specified";
