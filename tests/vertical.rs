use std::io;

use pos_vertical::{
    Alignment, ConvertOptions, Driver, Error, MergeOptions, RawLines, align, merge,
};

const WORKED_EXAMPLE: &str = "S/S عنوان/NOUN-MS ال+/DET حلق/NOUN-FS +ة/NSUFF :/PUNC انتخاب/NOUN-FP +ات/NSUFF ال+/DET مغرب/NOUN-MS و+/CONJ مسار/NOUN-MS ال+/DET إصلاح/NOUN-MS E/E \n";

fn convert(options: ConvertOptions, tagged: &str, lemma: &str) -> (String, String) {
    let mut out = Vec::new();
    let mut diagnostics = Vec::new();
    Driver::new(options)
        .convert(
            RawLines::new(tagged.as_bytes()),
            RawLines::new(lemma.as_bytes()),
            &mut out,
            &mut diagnostics,
        )
        .unwrap();
    (
        String::from_utf8(out).unwrap(),
        String::from_utf8(diagnostics).unwrap(),
    )
}

#[test]
fn worked_example_end_to_end() {
    let (out, diagnostics) = convert(
        ConvertOptions::default(),
        WORKED_EXAMPLE,
        "عنوان حلقة : انتخاب مغرب مسار إصلاح\n",
    );

    assert!(diagnostics.is_empty());
    let lines = out.lines().collect::<Vec<_>>();
    assert_eq!(lines.first(), Some(&"<s>"));
    assert_eq!(lines.last(), Some(&"</s>"));
    assert_eq!(lines.len(), 9);
    assert_eq!(lines[2], "الحلقة\tNOUN-FS\tحلقة");
    assert_eq!(lines[6], "ومسار\tNOUN-MS\tمسار");
}

#[test]
fn counts_agree_for_aligned_sentences() {
    let merged = merge(WORKED_EXAMPLE, MergeOptions::default())
        .unwrap()
        .line()
        .unwrap();
    let Alignment::Record(record) = align(
        WORKED_EXAMPLE,
        "عنوان حلقة : انتخاب مغرب مسار إصلاح",
        MergeOptions::default(),
    )
    .unwrap() else {
        panic!("Expected a record");
    };

    assert_eq!(merged.tokens.len(), merged.tags.len());
    assert_eq!(record.tokens(), merged.tokens.as_slice());
    assert_eq!(record.tags().len(), record.lemmas().len());
}

#[test]
fn mismatch_produces_no_output_and_one_diagnostic() {
    let (out, diagnostics) = convert(
        ConvertOptions::default(),
        "S/S x/X E/E \nS/S a/A b/B c/C E/E \n",
        "x\na b\n",
    );

    assert_eq!(out, "<s>\nx\tX\tx\n</s>\n");
    assert_eq!(diagnostics.matches("Token count mismatch").count(), 1);
    assert!(diagnostics.starts_with("Line 1:"));
}

#[test]
fn empty_sentence_needs_empty_lemma_line() {
    let (out, diagnostics) = convert(ConvertOptions::default(), "S/S E/E \n", "\n");
    assert_eq!(out, "<s>\n</s>\n");
    assert!(diagnostics.is_empty());

    let (out, diagnostics) = convert(ConvertOptions::default(), "S/S E/E \n", "stray\n");
    assert!(out.is_empty());
    assert!(diagnostics.contains("(0 tokens, 1 lemmas)"));
}

#[test]
fn longer_stream_is_silently_truncated() {
    let (out, diagnostics) = convert(
        ConvertOptions::default(),
        "S/S a/A E/E \n",
        "a\nb\nc\n",
    );
    assert_eq!(out, "<s>\na\tA\ta\n</s>\n");
    assert!(diagnostics.is_empty());
}

#[test]
fn fatal_error_carries_line_number() {
    let result = Driver::default().run(
        RawLines::new("S/S a/A E/E \nS/S +x/SUFF E/E \nS/S b/B x E/E \n".as_bytes()),
        RawLines::new("a\nx\nb\n".as_bytes()),
        &mut io::sink(),
        &mut io::sink(),
    );

    match result {
        Err(Error::AtLine { line, source }) => {
            assert_eq!(line, 2);
            assert!(matches!(*source, Error::MalformedUnit { position: 2, .. }));
        }
        other => panic!("Expected an error at line 2, got {:?}", other),
    }
}

#[test]
fn options_serialize_flat() {
    let options = ConvertOptions {
        merge: MergeOptions {
            truncate_tags: true,
        },
        parallel: false,
    };
    assert_eq!(
        serde_json::to_string(&options).unwrap(),
        r#"{"truncate_tags":true,"parallel":false}"#
    );
}
