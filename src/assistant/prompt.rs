//! Instruction preamble and workspace snapshot for assistant requests.

use crate::workspace::WorkspaceStore;

/// Per-file content cap in the workspace snapshot, in characters.
pub const SNAPSHOT_CONTENT_LIMIT: usize = 3000;

/// Fixed behavioral prolog sent with every chat request.
///
/// This is the external contract the backend must honor for file mutation:
/// replies may end with exactly one fenced JSON action block, and may open
/// with a bold specialist label.
const BEHAVIOR_PROLOG: &str = "\
You are the assistant inside OmniScience, a multi-document workspace. The \
user works in virtual files (chat, code, doc, sheet, whiteboard, slide, \
note); you can read them all and rewrite them on request.

When you want to change the workspace, end your reply with exactly one \
fenced JSON block, and put nothing after it:

```json
{\"action\": \"create_file\" | \"update_file\" | \"switch_tab\", \
\"file_id\": \"...\", \"file_type\": \"doc\" | \"code\" | \"sheet\" | \
\"whiteboard\" | \"slide\", \"file_name\": \"...\", \"content\": \"...\"}
```

For update_file and switch_tab, identify the target by file_name or \
file_id. Content encodings: sheets are comma-delimited rows, one row per \
line; slides are a title line followed by body lines; chats are managed for \
you and must not be rewritten. If you are answering as a particular \
specialist, open your reply with the specialist's name in bold.";

/// Build the full system instruction: behavioral prolog plus a snapshot of
/// every file (id, name, kind, and up to the first
/// [`SNAPSHOT_CONTENT_LIMIT`] characters of content).
pub fn system_instruction(store: &WorkspaceStore) -> String {
    let mut out = String::from(BEHAVIOR_PROLOG);
    out.push_str("\n\nCurrent workspace files:\n");
    if store.files().is_empty() {
        out.push_str("(none)\n");
        return out;
    }
    for file in store.files() {
        out.push_str(&format!(
            "- id: {} | name: {} | type: {}\n",
            file.id, file.name, file.kind
        ));
        out.push_str("  content: ");
        out.push_str(&truncate_chars(&file.content, SNAPSHOT_CONTENT_LIMIT));
        out.push('\n');
    }
    out
}

fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}
