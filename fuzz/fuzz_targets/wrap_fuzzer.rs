//! Fuzz target for chat line word wrap
//!
//! Wrapping must only ever turn spaces into line breaks, apart from one
//! leading break before an overlong first word, and must leave the line
//! alone when the width is 0.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tchat_app::format::wrap;

#[derive(Debug, Arbitrary)]
struct Input {
    line: String,
    width: u8,
}

fuzz_target!(|input: Input| {
    // Breaks already in the line are indistinguishable from inserted ones
    if input.line.contains('\n') {
        return;
    }

    let wrapped = wrap(&input.line, usize::from(input.width));
    if input.width == 0 {
        assert_eq!(wrapped, input.line);
    }
    let body = wrapped.strip_prefix('\n').unwrap_or(&wrapped);
    assert_eq!(body.replace('\n', " "), input.line);
});
