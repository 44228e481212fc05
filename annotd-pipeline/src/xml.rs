//! XML serialization of annotations

use crate::annotation::Annotation;

/// Serialize an annotation to the XML wire form.
///
/// Layout: `<root><document><sentences>` with one `<sentence>` per split,
/// each carrying its `<tokens>` with word text and character offsets.
pub(crate) fn serialize(annotation: &Annotation) -> String {
    let mut out = String::with_capacity(256 + annotation.token_count() * 128);
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str("<root>\n  <document>\n    <sentences>\n");
    for (sentence_id, sentence) in annotation.sentences.iter().enumerate() {
        out.push_str(&format!("      <sentence id=\"{}\">\n", sentence_id + 1));
        out.push_str("        <tokens>\n");
        for (token_id, token) in sentence.tokens.iter().enumerate() {
            out.push_str(&format!("          <token id=\"{}\">\n", token_id + 1));
            out.push_str(&format!(
                "            <word>{}</word>\n",
                escape(&token.word)
            ));
            out.push_str(&format!(
                "            <CharacterOffsetBegin>{}</CharacterOffsetBegin>\n",
                token.begin
            ));
            out.push_str(&format!(
                "            <CharacterOffsetEnd>{}</CharacterOffsetEnd>\n",
                token.end
            ));
            out.push_str("          </token>\n");
        }
        out.push_str("        </tokens>\n");
        out.push_str("      </sentence>\n");
    }
    out.push_str("    </sentences>\n  </document>\n</root>\n");
    out
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{Sentence, Token};

    fn annotation(words: &[&str]) -> Annotation {
        let mut pos = 0;
        let tokens = words
            .iter()
            .map(|w| {
                let begin = pos;
                pos += w.chars().count() + 1;
                Token {
                    word: w.to_string(),
                    begin,
                    end: begin + w.chars().count(),
                }
            })
            .collect();
        Annotation {
            text: words.join(" "),
            sentences: vec![Sentence { tokens }],
        }
    }

    #[test]
    fn test_document_shape() {
        let xml = serialize(&annotation(&["Hello", "world"]));
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<sentence id=\"1\">"));
        assert!(xml.contains("<word>Hello</word>"));
        assert!(xml.contains("<CharacterOffsetBegin>6</CharacterOffsetBegin>"));
        assert!(xml.ends_with("</root>\n"));
    }

    #[test]
    fn test_reserved_characters_are_escaped() {
        let xml = serialize(&annotation(&["a<b", "c&d", "\"quoted\""]));
        assert!(xml.contains("<word>a&lt;b</word>"));
        assert!(xml.contains("<word>c&amp;d</word>"));
        assert!(xml.contains("<word>&quot;quoted&quot;</word>"));
    }

    #[test]
    fn test_empty_annotation_serializes_empty_sentence_list() {
        let empty = Annotation {
            text: String::new(),
            sentences: Vec::new(),
        };
        let xml = serialize(&empty);
        assert!(xml.contains("<sentences>\n    </sentences>"));
    }

    #[test]
    fn test_escape_roundtrip_free_text() {
        assert_eq!(escape("no specials"), "no specials");
        assert_eq!(escape("<&>'\""), "&lt;&amp;&gt;&apos;&quot;");
    }
}
