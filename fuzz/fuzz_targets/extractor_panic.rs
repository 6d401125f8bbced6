#![no_main]
use libfuzzer_sys::fuzz_target;
use seqbuild_log::ErrorExtractor;

fuzz_target!(|data: &[u8]| {
    // Lossy conversion keeps inputs that are "almost" text in play.
    let s = String::from_utf8_lossy(data);
    let records = ErrorExtractor::new().parse(&s);
    assert!(records.len() <= s.lines().filter(|l| l.contains(": error:")).count());

    // Streaming in two halves must agree with one-shot parsing.
    let mid = (0..=s.len() / 2).rev().find(|&i| s.is_char_boundary(i)).unwrap_or(0);
    let mut extractor = ErrorExtractor::new();
    let mut streamed = extractor.update(&s[..mid]);
    streamed.extend(extractor.update(&s[mid..]));
    streamed.extend(extractor.finish());
    assert_eq!(streamed, records);
});
