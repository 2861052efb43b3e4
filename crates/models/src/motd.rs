use serde_json::Value;

/// Server descriptions come in three shapes on the wire: a bare string, an
/// object carrying only `text`, or an object with an `extra` list of styled
/// segments. Anything else parses as `Unknown`, which renders as an empty
/// MOTD; callers are expected to log the anomaly.
#[derive(Debug, Clone, PartialEq)]
pub enum Motd {
    Plain(String),
    Text(String),
    Extra { segments: Vec<MotdSegment>, raw: Value },
    Unknown,
}

/// One styled segment of an `extra` description.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MotdSegment {
    pub text: String,
    pub color: String,
    pub bold: bool,
}

impl Motd {
    pub fn parse(description: &Value) -> Self {
        match description {
            Value::String(text) => Motd::Plain(text.clone()),
            Value::Object(fields) => {
                if let Some(extra) = fields.get("extra") {
                    match extra.as_array() {
                        Some(items) => Motd::Extra {
                            segments: items.iter().map(parse_segment).collect(),
                            raw: extra.clone(),
                        },
                        None => Motd::Unknown,
                    }
                } else if let Some(Value::String(text)) = fields.get("text") {
                    Motd::Text(text.clone())
                } else {
                    Motd::Unknown
                }
            }
            _ => Motd::Unknown,
        }
    }

    /// Plain-text rendering: the concatenated `text` of every segment.
    pub fn plain_text(&self) -> String {
        match self {
            Motd::Plain(text) | Motd::Text(text) => text.clone(),
            Motd::Extra { segments, .. } => {
                segments.iter().map(|s| s.text.as_str()).collect()
            }
            Motd::Unknown => String::new(),
        }
    }

    /// HTML rendering of the styled segments. Only the `extra` shape has
    /// one; each segment gets its own `<span>` with inline color and weight,
    /// and newlines become `<br>`.
    pub fn formatted_html(&self) -> Option<String> {
        let Motd::Extra { segments, .. } = self else {
            return None;
        };

        let mut html = String::from("<span>");
        for (i, segment) in segments.iter().enumerate() {
            html.push_str("<span");
            if !segment.color.is_empty() || segment.bold {
                html.push_str(" style='");
                if !segment.color.is_empty() {
                    html.push_str("color: ");
                    html.push_str(&segment.color);
                    html.push_str("; ");
                }
                if segment.bold {
                    html.push_str(" font-weight: bold; ");
                }
                html.push('\'');
            }
            html.push('>');
            html.push_str(&segment.text);
            html.push_str("</span>");
            if i != segments.len() - 1 {
                html.push(' ');
            }
        }
        html.push_str("</span>");

        Some(html.replace('\n', "<br>"))
    }

    /// The raw `extra` list, carried through to `motd_extra` verbatim.
    pub fn extra_value(&self) -> Option<Value> {
        match self {
            Motd::Extra { raw, .. } => Some(raw.clone()),
            _ => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Motd::Unknown)
    }
}

fn parse_segment(value: &Value) -> MotdSegment {
    let mut segment = MotdSegment::default();
    if let Value::Object(fields) = value {
        if let Some(Value::String(text)) = fields.get("text") {
            segment.text = text.clone();
        }
        if let Some(Value::String(color)) = fields.get("color") {
            segment.color = color.clone();
        }
        if let Some(Value::Bool(bold)) = fields.get("bold") {
            segment.bold = *bold;
        }
    }
    segment
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_string_description() {
        let motd = Motd::parse(&json!("A Minecraft Server"));
        assert_eq!(motd.plain_text(), "A Minecraft Server");
        assert_eq!(motd.formatted_html(), None);
        assert_eq!(motd.extra_value(), None);
    }

    #[test]
    fn object_with_text_only() {
        let motd = Motd::parse(&json!({ "text": "hello" }));
        assert_eq!(motd, Motd::Text("hello".to_string()));
        assert_eq!(motd.plain_text(), "hello");
        assert_eq!(motd.formatted_html(), None);
    }

    #[test]
    fn extra_segments_concatenate_and_render() {
        let description = json!({
            "extra": [
                { "text": "Hello", "color": "red", "bold": true },
                { "text": "world" }
            ]
        });
        let motd = Motd::parse(&description);

        assert_eq!(motd.plain_text(), "Helloworld");
        assert_eq!(
            motd.formatted_html().unwrap(),
            "<span><span style='color: red;  font-weight: bold; '>Hello</span> \
             <span>world</span></span>"
        );
        assert_eq!(motd.extra_value(), Some(json!([
            { "text": "Hello", "color": "red", "bold": true },
            { "text": "world" }
        ])));
    }

    #[test]
    fn newlines_become_breaks() {
        let description = json!({ "extra": [{ "text": "line1\nline2" }] });
        let motd = Motd::parse(&description);
        assert_eq!(
            motd.formatted_html().unwrap(),
            "<span><span>line1<br>line2</span></span>"
        );
    }

    #[test]
    fn unknown_shapes_yield_empty_motd() {
        assert!(Motd::parse(&json!(42)).is_unknown());
        assert!(Motd::parse(&json!({ "weird": true })).is_unknown());
        assert!(Motd::parse(&json!({ "extra": "not a list" })).is_unknown());
        assert_eq!(Motd::parse(&json!(42)).plain_text(), "");
    }
}
