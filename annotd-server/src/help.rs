//! Help and usage text

use std::io::Write;

/// Short usage summary, printed after any fatal configuration error.
pub const USAGE: &str = "usage:\n  annotd -port 9900 -httpport 9901 -nlpdir /path/to/annotation/resources";

/// Print the usage summary.
pub fn print_usage(out: &mut impl Write) {
    let _ = writeln!(out, "{USAGE}");
}

/// Print help for a topic. A bare `-h`/`-help` arrives as the topic
/// `"true"`; anything else unknown gets a pointer back to `-help`.
pub fn print_help(out: &mut impl Write, topic: &str) {
    if topic.to_lowercase().starts_with("annotator") {
        print_annotator_help(out);
    } else if !topic.eq_ignore_ascii_case("true") {
        let _ = writeln!(out, "unknown help topic: {topic}");
        let _ = writeln!(out, "see -help for a list of all help topics.");
    } else {
        print_general_help(out);
    }
}

fn print_general_help(out: &mut impl Write) {
    let _ = writeln!(out, "The following properties can be defined:");
    let _ = writeln!(
        out,
        "(if -props is not given, the built-in defaults are used)"
    );
    let _ = writeln!(
        out,
        "\t\"props\" - path to a file with configuration properties"
    );
    let _ = writeln!(
        out,
        "\t\"annotators\" - comma separated list of annotators"
    );
    let _ = writeln!(
        out,
        "\tThe following annotators are supported: tokenize, ssplit"
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "\tIf annotator \"tokenize\" is defined:");
    let _ = writeln!(
        out,
        "\t\"tokenize.whitespace\" - if true, tokenize on whitespace only"
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "Command line flags:");
    let _ = writeln!(
        out,
        "\t\"-port\" - line-protocol listener port (default 9900)"
    );
    let _ = writeln!(out, "\t\"-httpport\" - HTTP facade port (default 9901)");
    let _ = writeln!(
        out,
        "\t\"-nlpdir\" - directory holding annotation resources"
    );
    let _ = writeln!(
        out,
        "\t\"threads\" - bound on concurrently annotated requests"
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "Run with -help [topic] for more help on a specific topic.");
    let _ = writeln!(out, "Current topics include: annotators");
}

fn print_annotator_help(out: &mut impl Write) {
    let _ = writeln!(out, "annotd currently supports the following annotators:");
    let _ = writeln!(
        out,
        "\ttokenize - split text into tokens with character offsets"
    );
    let _ = writeln!(
        out,
        "\tssplit - group tokens into sentences (requires tokenize)"
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "Options:");
    let _ = writeln!(
        out,
        "\ttokenize.whitespace - if true, tokenize on whitespace only"
    );
    let _ = writeln!(
        out,
        "\tan abbreviations.txt file in the -nlpdir directory extends the"
    );
    let _ = writeln!(out, "\tsentence-splitting abbreviation list");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn captured(topic: &str) -> String {
        let mut buffer = Vec::new();
        print_help(&mut buffer, topic);
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_general_help_lists_properties() {
        let text = captured("true");
        assert!(text.contains("The following properties can be defined"));
        assert!(text.contains("annotators"));
        assert!(text.contains("Current topics include: annotators"));
    }

    #[test]
    fn test_annotator_topic() {
        let text = captured("annotators");
        assert!(text.contains("tokenize"));
        assert!(text.contains("ssplit"));
    }

    #[test]
    fn test_unknown_topic() {
        let text = captured("parser");
        assert!(text.contains("unknown help topic: parser"));
        assert!(text.contains("see -help"));
    }
}
