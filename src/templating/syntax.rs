//! `[[ ]]` template syntax.
//!
//! | Tag | Meaning |
//! |---|---|
//! | `[[name]]` | HTML-escaped variable, dotted lookup (`user.name`), `.` for the current item |
//! | `[[& name]]`, `[[{name}]]` | unescaped variable |
//! | `[[#name]]..[[/name]]` | section: once per list item, once for a truthy value |
//! | `[[^name]]..[[/name]]` | inverted section: only when the value is falsy or missing |
//! | `[[> name]]` | partial, rendered with the current bindings |
//! | `[[! text]]` | comment |

use serde_json::Value;

const OPEN: &str = "[[";
const CLOSE: &str = "]]";

/// Parsed template node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Text(String),
    Variable { name: String, escape: bool },
    Section {
        name: String,
        inverted: bool,
        children: Vec<Node>,
    },
    Partial(String),
}

/// Parse template source into nodes. Errors carry a human-readable message.
pub fn parse(source: &str) -> Result<Vec<Node>, String> {
    // Each frame is an open section: (name, inverted, nodes so far).
    let mut stack: Vec<(String, bool, Vec<Node>)> = vec![(String::new(), false, Vec::new())];
    let mut rest = source;

    while let Some(start) = rest.find(OPEN) {
        push_text(&mut stack, &rest[..start]);

        let after_open = &rest[start + OPEN.len()..];
        let end = after_open
            .find(CLOSE)
            .ok_or_else(|| format!("unclosed tag at `{}`", preview(&rest[start..])))?;
        let tag = after_open[..end].trim();
        rest = &after_open[end + CLOSE.len()..];

        let current = &mut stack.last_mut().ok_or("empty section stack")?.2;
        match tag.chars().next() {
            None => return Err("empty tag".to_string()),
            Some('!') => {}
            Some('#') => stack.push((tag[1..].trim().to_string(), false, Vec::new())),
            Some('^') => stack.push((tag[1..].trim().to_string(), true, Vec::new())),
            Some('/') => {
                let name = tag[1..].trim();
                if stack.len() < 2 {
                    return Err(format!("unexpected closing tag `{}`", name));
                }
                let (open, inverted, children) = stack.pop().ok_or("empty section stack")?;
                if open != name {
                    return Err(format!("section `{}` closed by `{}`", open, name));
                }
                stack
                    .last_mut()
                    .ok_or("empty section stack")?
                    .2
                    .push(Node::Section {
                        name: open,
                        inverted,
                        children,
                    });
            }
            Some('>') => current.push(Node::Partial(tag[1..].trim().to_string())),
            Some('&') => current.push(Node::Variable {
                name: tag[1..].trim().to_string(),
                escape: false,
            }),
            Some('{') => current.push(Node::Variable {
                name: tag[1..].trim_end_matches('}').trim().to_string(),
                escape: false,
            }),
            Some(_) => current.push(Node::Variable {
                name: tag.to_string(),
                escape: true,
            }),
        }
    }
    push_text(&mut stack, rest);

    if stack.len() > 1 {
        let open: Vec<&str> = stack[1..].iter().map(|(name, _, _)| name.as_str()).collect();
        return Err(format!("unclosed section `{}`", open.join("`, `")));
    }
    Ok(stack.pop().map(|(_, _, nodes)| nodes).unwrap_or_default())
}

fn push_text(stack: &mut [(String, bool, Vec<Node>)], text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some((_, _, nodes)) = stack.last_mut() {
        nodes.push(Node::Text(text.to_string()));
    }
}

fn preview(text: &str) -> String {
    text.chars().take(20).collect()
}

/// Look `name` up through the context stack, innermost scope first.
pub fn lookup<'a>(contexts: &[&'a Value], name: &str) -> Option<&'a Value> {
    if name == "." {
        return contexts.last().copied();
    }

    let mut segments = name.split('.');
    let first = segments.next()?;
    let mut value = contexts
        .iter()
        .rev()
        .find_map(|context| context.as_object().and_then(|map| map.get(first)))?;

    for segment in segments {
        value = value.as_object()?.get(segment)?;
    }
    Some(value)
}

/// Truthiness used by sections.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(_) => true,
    }
}

/// Text form of a bound value.
pub fn display(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Render nodes against a context stack. Partials are expanded by `partial`,
/// which receives the partial name and the current stack.
pub fn render<E>(
    nodes: &[Node],
    contexts: &mut Vec<&Value>,
    out: &mut String,
    partial: &mut dyn FnMut(&str, &[&Value]) -> Result<String, E>,
) -> Result<(), E> {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Variable { name, escape } => {
                let text = display(lookup(contexts, name));
                if *escape {
                    out.push_str(&escape_html(&text));
                } else {
                    out.push_str(&text);
                }
            }
            Node::Section {
                name,
                inverted,
                children,
            } => {
                let value = lookup(contexts, name);
                if *inverted {
                    if !is_truthy(value) {
                        render(children, contexts, out, partial)?;
                    }
                    continue;
                }
                match value {
                    Some(Value::Array(items)) => {
                        for item in items {
                            contexts.push(item);
                            let rendered = render(children, contexts, out, partial);
                            contexts.pop();
                            rendered?;
                        }
                    }
                    Some(item) if is_truthy(Some(item)) => {
                        contexts.push(item);
                        let rendered = render(children, contexts, out, partial);
                        contexts.pop();
                        rendered?;
                    }
                    _ => {}
                }
            }
            Node::Partial(name) => out.push_str(&partial(name, contexts)?),
        }
    }
    Ok(())
}
