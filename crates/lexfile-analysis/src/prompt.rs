//! Prompt construction under fixed character ceilings.
//!
//! Pure functions: no I/O, deterministic for the same inputs. The ceilings
//! keep the external call's latency and cost predictable; text beyond them is
//! silently dropped.

/// Ceiling for the initial analysis prompt body.
pub const ANALYSIS_CHAR_LIMIT: usize = 10_000;

/// Ceiling for the document body in follow-up prompts. Applied to the fresh,
/// untruncated document text, independently of the analysis ceiling.
pub const FOLLOWUP_CHAR_LIMIT: usize = 8_000;

/// System instruction for the initial analysis call.
pub const ANALYSIS_SYSTEM_PROMPT: &str = "You are a legal document analysis expert.";

/// System instruction for follow-up answers.
pub const FOLLOWUP_SYSTEM_PROMPT: &str = "You are a helpful legal assistant.";

/// First `limit` characters of `text`, char-boundary safe.
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Build the seven-section analysis instruction for one document.
pub fn build_analysis_prompt(text: &str, filename: &str) -> String {
    let sample = truncate_chars(text, ANALYSIS_CHAR_LIMIT);

    format!(
        "You are a legal document analyzer. Analyze this document and provide:\n\
         \n\
         1. **Document Type**: Identify the type (Contract, Brief, Correspondence, etc.)\n\
         2. **Summary**: 2-3 sentence summary\n\
         3. **Key Parties**: List important parties/entities\n\
         4. **Important Dates**: Extract significant dates\n\
         5. **Legal Issues**: Main legal matters\n\
         6. **Action Items**: Required actions\n\
         7. **Risk Assessment**: Brief risk assessment\n\
         \n\
         Filename: {}\n\
         \n\
         Content (first {} chars):\n\
         {}\n\
         \n\
         Format your response clearly and concisely.",
        filename, ANALYSIS_CHAR_LIMIT, sample
    )
}

/// Build a follow-up prompt scoped to one document's text and prior analysis.
pub fn build_followup_prompt(
    question: &str,
    document_text: &str,
    prior_analysis: &str,
    filename: &str,
) -> String {
    let excerpt = truncate_chars(document_text, FOLLOWUP_CHAR_LIMIT);

    format!(
        "You are a legal assistant helping with a document.\n\
         \n\
         Document Filename: {}\n\
         Document Content (excerpt):\n\
         {}\n\
         \n\
         Previous Analysis:\n\
         {}\n\
         \n\
         User Question: {}\n\
         \n\
         Answer the user's question based on the document content. \
         If the answer is not in the document, state that clearly.",
        filename, excerpt, prior_analysis, question
    )
}
