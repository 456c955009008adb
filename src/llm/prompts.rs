//! The script-generation prompt contract

use crate::models::PageContext;

/// System-style instructions for userscript generation. `{requirement}` is
/// substituted with the user's requirement; page context, when available, is
/// appended as its own block.
pub const GEN_SCRIPT_PROMPT: &str = r#"You are a JavaScript expert good at writing user scripts.

# Task
You will generate a userscript according to user requirement.
This script will be injected to web page by a browser extension like Tampermonkey, but not all userscript features are supported.

The script MUST follow these rules:
1. Start with a metadata block using // ==UserScript== format
2. Include at least one @match directive to specify where the script runs
3. Optionally include @run-at directive (document_start, document_end, or document_idle)
4. Do not use unsupported directives, which is listed below:
    - @include
    - @exclude
    - @grant
    - @require
5. Use vanilla JavaScript that works in modern browsers
6. Use proper error handling for DOM operations
7. Add descriptive comments for complex logic
8. The user script should be relative short (less than 100 lines of code) and simple.

# Output
If the requirement is reasonable and suitable for userscript, output the full code (wrapped by "```javascript" and "```") without any explanation.
Otherwise, explain why and suggest alternative solutions.

<requirement>
{requirement}
</requirement>
"#;

/// Assemble the full prompt for a requirement, with the page the user is
/// looking at when known.
pub fn build_prompt(requirement: &str, page: Option<&PageContext>) -> String {
    let mut prompt = GEN_SCRIPT_PROMPT.replace("{requirement}", requirement);

    if let Some(page) = page {
        prompt.push_str("\n<page_context>\n");
        prompt.push_str(&format!("URL: {}\n", page.url));
        prompt.push_str(&format!("Title: {}\n", page.title));
        if let Some(selection) = &page.selection {
            prompt.push_str(&format!("Selected HTML:\n{}\n", selection));
        }
        prompt.push_str("</page_context>\n");
    }

    prompt
}
