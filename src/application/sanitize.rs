// Strips reasoning markup that thinking models emit around their answer.

const OPEN: &str = "<think>";
const CLOSE: &str = "</think>";

const END_OF_TURN: &[&str] = &["<|im_end|>", "<|eot_id|>"];

/// Remove `<think>` spans from a raw model reply.
///
/// - matched pairs are removed along with their contents
/// - a close marker with no open marker drops everything up to and including it
/// - an open marker with no close marker drops everything from it to the end
///
/// Text on either side of a removed span is joined with a single space and the
/// result is trimmed. Applying it twice gives the same text.
pub fn sanitize(raw: &str) -> String {
    let mut text = raw.to_string();
    for token in END_OF_TURN {
        text = text.replace(token, "");
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text.as_str();

    loop {
        match (rest.find(OPEN), rest.find(CLOSE)) {
            (None, None) => {
                push_segment(&mut out, rest);
                break;
            }
            // Leaked reasoning: the opener was never emitted (or was cut off).
            (None, Some(close)) => {
                out.clear();
                rest = &rest[close + CLOSE.len()..];
            }
            (Some(open), Some(close)) if close < open => {
                out.clear();
                rest = &rest[close + CLOSE.len()..];
            }
            (Some(open), _) => {
                push_segment(&mut out, &rest[..open]);
                let inside = &rest[open + OPEN.len()..];
                match inside.find(CLOSE) {
                    Some(close) => rest = &inside[close + CLOSE.len()..],
                    None => break,
                }
            }
        }
    }

    out.trim().to_string()
}

fn push_segment(out: &mut String, segment: &str) {
    if out.trim().is_empty() {
        out.clear();
        out.push_str(segment);
        return;
    }
    let segment = segment.trim_start();
    if segment.is_empty() {
        return;
    }
    let kept = out.trim_end().len();
    out.truncate(kept);
    out.push(' ');
    out.push_str(segment);
}
