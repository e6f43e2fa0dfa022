// ABOUTME: Pure text utilities for GraphQL mutation handling: parse operation names
// ABOUTME: out of schema text and filter generated mutation calls down to an accepted set.

/// Extract the mutation operation names declared across the given schema texts.
///
/// Scans each schema for a `type Mutation` block and collects the field names
/// declared as `name(...)` inside it, in first-seen order across all schemas,
/// skipping duplicates. Schemas without a mutation block contribute nothing:
/// agents may legitimately accept query-only schemas, so that is not an error.
///
/// This is a tolerant line-based scan, not a grammar parser. Text produced by
/// an LLM is semi-structured at best; anything unrecognizable is ignored.
pub fn parse_mutation_names(schemas: &[String]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();

    for schema in schemas {
        let mut in_mutation_block = false;
        for line in schema.lines() {
            let trimmed = line.trim();
            if !in_mutation_block {
                if is_mutation_block_open(trimmed) {
                    in_mutation_block = true;
                }
                continue;
            }
            if trimmed.starts_with('}') {
                in_mutation_block = false;
                continue;
            }
            if let Some(name) = leading_identifier_before_paren(trimmed)
                && !names.iter().any(|n| n == name)
            {
                names.push(name.to_string());
            }
        }
    }

    names
}

/// Keep only the mutation calls whose operation name is in `accepted_names`,
/// preserving order and leaving the call text untouched.
///
/// The operation name of a call is the first identifier immediately followed
/// by `(`, after any leading whitespace or `mutation { ... }` wrapper. Calls
/// with no recognizable operation name are dropped rather than treated as an
/// error. Filtering is idempotent: re-filtering an already filtered list with
/// the same accepted set is a no-op.
pub fn filter_mutation_calls(calls: &[String], accepted_names: &[String]) -> Vec<String> {
    calls
        .iter()
        .filter(|call| {
            operation_name(call).is_some_and(|name| accepted_names.iter().any(|n| n == name))
        })
        .cloned()
        .collect()
}

/// True if a trimmed schema line opens the mutation operation block.
/// Tolerates whitespace variation between `type`, `Mutation`, and `{`.
fn is_mutation_block_open(trimmed: &str) -> bool {
    let Some(rest) = trimmed.strip_prefix("type") else {
        return false;
    };
    let rest = rest.trim_start();
    match rest.strip_prefix("Mutation") {
        Some(tail) => tail.trim_start().is_empty() || tail.trim_start().starts_with('{'),
        None => false,
    }
}

/// If `trimmed` starts with `name(`, return the identifier.
fn leading_identifier_before_paren(trimmed: &str) -> Option<&str> {
    let end = trimmed
        .char_indices()
        .find(|(_, c)| !is_identifier_char(*c))
        .map(|(i, _)| i)?;
    if end == 0 || !trimmed[end..].starts_with('(') {
        return None;
    }
    Some(&trimmed[..end])
}

/// The identifier immediately preceding the first `(` in a mutation call, if
/// any. The preceding character may be multi-byte, so the slice start is the
/// UTF-8 length of the trailing identifier run, never a raw byte offset.
fn operation_name(call: &str) -> Option<&str> {
    let paren = call.find('(')?;
    let head = &call[..paren];
    let name_len: usize = head
        .chars()
        .rev()
        .take_while(|c| is_identifier_char(*c))
        .map(char::len_utf8)
        .sum();
    if name_len == 0 {
        return None;
    }
    Some(&head[head.len() - name_len..])
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
